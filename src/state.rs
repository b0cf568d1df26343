//! Centralized application state with context passing pattern
//!
//! `AppState` is a single struct containing the whole book: catalog, page
//! target, turn scheduler, per-sheet animation and the scene composer.
//! Core methods are pure and take explicit clock values, so the full page
//! flow is unit-testable natively; the WASM bindings are thin wrappers
//! that feed in the host clock and translate errors.
//!
//! The host owns the single [`App`] handle and drives it from its render
//! loop. There is no global state behind it.

use serde::Deserialize;

use crate::camera::Camera;
use crate::page::{
    Catalog, PageStore, PageStoreError, TurnScheduler, BACK_COVER_TEXTURE, COVER_TEXTURE,
};
use crate::scene::{SceneComposer, SceneDescription, COVER_ROUGHNESS_TEXTURE, ENVIRONMENT_PRESET};
use crate::skeleton::{build_page_mesh, PageMesh};
use crate::turn::TurnAnimator;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Host-supplied setup, deserialized from a plain JS object. Every field
/// is optional; an empty config yields the bare cover-only book.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Interior picture texture ids, in reading order.
    pub pictures: Vec<String>,
    /// Overrides the front cover texture id.
    pub cover: Option<String>,
    /// Overrides the back cover texture id.
    pub back_cover: Option<String>,
    /// Overrides the cover roughness map id.
    pub cover_roughness: Option<String>,
    /// Overrides the environment preset.
    pub environment: Option<String>,
    /// Viewport width in CSS pixels, used to pick the starting camera.
    pub viewport_width: Option<f32>,
    /// Overrides the page flip sound URL.
    pub flip_sound: Option<String>,
}

/// Per-frame clock fed by the host's animation loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    start_ms: Option<f64>,
    now_ms: f64,
    dt_s: f32,
}

impl FrameClock {
    /// Record a new frame time, returning the delta in seconds. The first
    /// frame and any backwards clock jump yield a zero delta.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.start_ms {
            None => {
                self.start_ms = Some(now_ms);
                0.0
            }
            Some(_) => ((now_ms - self.now_ms).max(0.0) / 1000.0) as f32,
        };
        self.now_ms = now_ms;
        self.dt_s = dt;
        dt
    }

    /// Timestamp of the latest frame.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Seconds since the first frame.
    pub fn elapsed_s(&self) -> f32 {
        match self.start_ms {
            Some(start) => ((self.now_ms - start) / 1000.0) as f32,
            None => 0.0,
        }
    }

    pub fn dt_s(&self) -> f32 {
        self.dt_s
    }
}

/// Functions should take explicit references to what they need, not access
/// this struct directly via globals.
pub struct AppState {
    pub catalog: Catalog,
    pub store: PageStore,
    pub scheduler: TurnScheduler,
    pub animator: TurnAnimator,
    pub composer: SceneComposer,
    pub camera: Camera,
    /// Shared geometry for every sheet.
    pub mesh: PageMesh,
    /// Static setup handed to the host once.
    pub description: SceneDescription,
    pub clock: FrameClock,
    /// URL of the flip sound the host should play on target changes.
    pub flip_sound: String,
}

impl AppState {
    pub fn new(config: BookConfig) -> Self {
        let cover = config.cover.as_deref().unwrap_or(COVER_TEXTURE);
        let back_cover = config.back_cover.as_deref().unwrap_or(BACK_COVER_TEXTURE);
        let roughness = config
            .cover_roughness
            .as_deref()
            .unwrap_or(COVER_ROUGHNESS_TEXTURE);
        let environment = config.environment.as_deref().unwrap_or(ENVIRONMENT_PRESET);

        let catalog = Catalog::build(&config.pictures, cover, back_cover);
        let store = PageStore::new(catalog.len());
        let scheduler = TurnScheduler::new(store.target());
        let animator = TurnAnimator::new(catalog.len());
        let description = SceneDescription::build(&catalog, environment, roughness);
        let camera = match config.viewport_width {
            Some(width) => Camera::for_viewport(width),
            None => Camera::default(),
        };

        Self {
            store,
            scheduler,
            animator,
            description,
            camera,
            catalog,
            composer: SceneComposer::new(),
            mesh: build_page_mesh(),
            clock: FrameClock::default(),
            flip_sound: config
                .flip_sound
                .unwrap_or_else(|| crate::audio::FLIP_SOUND.to_owned()),
        }
    }

    /// Advance the clock, the staged page walk and every sheet's easing.
    pub fn advance(&mut self, now_ms: f64) {
        let dt = self.clock.advance(now_ms);
        self.scheduler.advance(now_ms, &self.store);
        self.animator.advance(now_ms, dt, self.scheduler.displayed());
    }

    /// Request a page. On a change the scheduler restarts its walk from
    /// the currently displayed sheet. Returns whether the target moved.
    pub fn set_page(&mut self, page: usize, now_ms: f64) -> Result<bool, PageStoreError> {
        let changed = self.store.set_target(page)?;
        if changed {
            self.scheduler.retarget(now_ms, &self.store);
        }
        Ok(changed)
    }

    /// A click on a sheet turns it: forward if it still lies to the
    /// right, back if it is already turned. Returns the resulting target.
    pub fn click_page(&mut self, index: usize, now_ms: f64) -> Result<usize, PageStoreError> {
        let opened = self.scheduler.displayed() > index;
        let target = if opened {
            index
        } else {
            index.saturating_add(1)
        };
        self.set_page(target, now_ms)?;

        // The pointer is about to travel with the turning sheet; drop the
        // highlight as the click lands.
        if let Some(page) = self.animator.page_mut(index) {
            page.set_hovered(false);
        }
        Ok(target)
    }

    /// Pointer enter/leave for a sheet. Returns false for an unknown index.
    pub fn hover_page(&mut self, index: usize, hovered: bool) -> bool {
        match self.animator.page_mut(index) {
            Some(page) => {
                page.set_hovered(hovered);
                true
            }
            None => false,
        }
    }

    /// Texture readiness for a sheet. Returns false for an unknown index.
    pub fn set_page_ready(&mut self, index: usize, ready: bool) -> bool {
        match self.animator.page_mut(index) {
            Some(page) => {
                page.set_ready(ready);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> BookConfig {
        BookConfig {
            pictures: (0..16).map(|i| format!("shot-{:02}", i)).collect(),
            ..BookConfig::default()
        }
    }

    #[test]
    fn test_config_overrides_flow_into_the_scene() {
        let state = AppState::new(BookConfig {
            pictures: vec!["page-a".to_owned()],
            cover: Some("custom-cover".to_owned()),
            back_cover: Some("custom-back".to_owned()),
            cover_roughness: Some("custom-rough".to_owned()),
            environment: Some("sunset".to_owned()),
            flip_sound: Some("/sfx/flip.mp3".to_owned()),
            ..BookConfig::default()
        });

        assert_eq!(state.catalog.page(0).unwrap().front, "custom-cover");
        assert_eq!(state.catalog.page(1).unwrap().back, "custom-back");
        assert_eq!(state.description.environment, "sunset");
        assert!(state.description.textures.iter().any(|id| id == "custom-rough"));
        assert_eq!(state.flip_sound, "/sfx/flip.mp3");
    }

    #[test]
    fn test_clock_first_frame_has_zero_delta() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(5000.0), 0.0);
        assert_eq!(clock.elapsed_s(), 0.0);

        let dt = clock.advance(5016.0);
        assert!((dt - 0.016).abs() < 1e-6);
        assert!((clock.elapsed_s() - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_clock_ignores_backwards_jumps() {
        let mut clock = FrameClock::default();
        clock.advance(1000.0);
        clock.advance(1100.0);
        assert_eq!(clock.advance(900.0), 0.0);
    }

    #[test]
    fn test_set_page_drives_the_walk() {
        let mut state = AppState::new(sample_config());
        assert_eq!(state.catalog.len(), 9);

        state.set_page(5, 0.0).unwrap();
        assert_eq!(state.scheduler.displayed(), 1, "first turn is immediate");

        let mut now = 0.0;
        while !state.scheduler.is_idle() {
            now += 10.0;
            state.advance(now);
            assert!(now < 10_000.0, "walk failed to converge");
        }
        assert_eq!(state.scheduler.displayed(), 5);
    }

    #[test]
    fn test_set_page_rejects_past_back_cover() {
        let mut state = AppState::new(sample_config());
        let err = state.set_page(42, 0.0).unwrap_err();
        assert!(matches!(err, PageStoreError::OutOfRange { .. }));
        assert_eq!(state.store.target(), 0);
        assert!(state.scheduler.is_idle());
    }

    #[test]
    fn test_click_toggles_a_sheet() {
        let mut state = AppState::new(sample_config());
        state.hover_page(0, true);

        let target = state.click_page(0, 0.0).unwrap();
        assert_eq!(target, 1);
        assert!(
            !state.animator.page(0).unwrap().is_hovered(),
            "click should drop the hover highlight"
        );

        // Converged after the immediate step, so a second click turns the
        // sheet back.
        assert!(state.scheduler.is_idle());
        let target = state.click_page(0, 100.0).unwrap();
        assert_eq!(target, 0);
    }

    #[test]
    fn test_click_on_last_sheet_reaches_back_cover() {
        let mut state = AppState::new(sample_config());
        let last = state.catalog.len() - 1;
        state.store.set_target(last).unwrap();
        state.scheduler = TurnScheduler::new(last);

        let target = state.click_page(last, 0.0).unwrap();
        assert_eq!(target, state.catalog.len());
    }

    #[test]
    fn test_click_on_unknown_sheet_is_rejected() {
        let mut state = AppState::new(sample_config());
        assert!(state.click_page(99, 0.0).is_err());
        assert!(!state.hover_page(99, true));
        assert!(!state.set_page_ready(99, true));
    }

    #[test]
    fn test_advance_moves_ready_sheets() {
        let mut state = AppState::new(sample_config());
        for i in 0..state.catalog.len() {
            state.set_page_ready(i, true);
        }

        state.advance(0.0);
        state.set_page(1, 0.0).unwrap();
        let mut now = 0.0;
        for _ in 0..120 {
            now += 1000.0 / 60.0;
            state.advance(now);
        }

        let tip = state.animator.page(0).unwrap().joint_palette()[crate::skeleton::JOINT_COUNT - 1];
        assert!(
            !tip.abs_diff_eq(glam::Mat4::IDENTITY, 1e-3),
            "turned sheet should have bent away from rest"
        );
    }
}

/// Handle the JS host keeps for the lifetime of the page.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct App {
    pub(crate) state: AppState,
}

#[cfg(target_arch = "wasm32")]
impl App {
    pub(crate) fn page_or_err(&self, index: usize) -> Result<&crate::turn::PageTurn, JsValue> {
        self.state
            .animator
            .page(index)
            .ok_or_else(|| JsValue::from_str(&format!("no sheet {}", index)))
    }
}

/// Build the book from a host config object.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_book(config: JsValue) -> Result<App, JsValue> {
    // Set up panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let config: BookConfig = if config.is_undefined() || config.is_null() {
        BookConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?
    };

    let state = AppState::new(config);
    log::info!(
        "book ready: {} sheets, {} textures",
        state.catalog.len(),
        state.description.textures.len()
    );
    Ok(App { state })
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    /// Drive one frame. `now_ms` is the host's monotonic clock, typically
    /// `performance.now()`.
    pub fn advance(&mut self, now_ms: f64) {
        self.state.advance(now_ms);
    }

    /// Jump the target to a page; the displayed page walks there one
    /// sheet at a time.
    pub fn set_page(&mut self, page: usize) -> Result<(), JsValue> {
        let now = self.state.clock.now_ms();
        let changed = self.state.set_page(page, now).map_err(|e| {
            log::warn!("{}", e);
            JsValue::from_str(&e.to_string())
        })?;
        if changed {
            crate::audio::play_flip(&self.state.flip_sound);
        }
        Ok(())
    }

    /// Click on a sheet, turning it forward or back. Returns the new
    /// target page.
    pub fn click_page(&mut self, index: usize) -> Result<usize, JsValue> {
        let now = self.state.clock.now_ms();
        let before = self.state.store.target();
        let target = self.state.click_page(index, now).map_err(|e| {
            log::warn!("{}", e);
            JsValue::from_str(&e.to_string())
        })?;
        if target != before {
            crate::audio::play_flip(&self.state.flip_sound);
        }
        Ok(target)
    }

    /// Pointer entered or left a sheet.
    pub fn hover_page(&mut self, index: usize, hovered: bool) -> Result<(), JsValue> {
        if self.state.hover_page(index, hovered) {
            Ok(())
        } else {
            Err(JsValue::from_str(&format!("no sheet {}", index)))
        }
    }

    /// Mark a sheet's textures loaded (or unloaded). Unready sheets hold
    /// their rest pose.
    pub fn set_page_ready(&mut self, index: usize, ready: bool) -> Result<(), JsValue> {
        if self.state.set_page_ready(index, ready) {
            Ok(())
        } else {
            Err(JsValue::from_str(&format!("no sheet {}", index)))
        }
    }

    /// Whether a sheet's textures have been marked loaded.
    pub fn page_is_ready(&self, index: usize) -> Result<bool, JsValue> {
        Ok(self.page_or_err(index)?.is_ready())
    }

    /// Number of sheets in the book.
    pub fn page_count(&self) -> usize {
        self.state.catalog.len()
    }

    /// Currently requested page.
    pub fn target_page(&self) -> usize {
        self.state.store.target()
    }

    /// Page the book currently shows.
    pub fn displayed_page(&self) -> usize {
        self.state.scheduler.displayed()
    }

    /// Bumped on every accepted target change; cheap to poll for UI
    /// highlighting.
    pub fn page_epoch(&self) -> u64 {
        self.state.store.epoch()
    }

    /// Whether sheets are still walking toward the target.
    pub fn is_turning(&self) -> bool {
        !self.state.scheduler.is_idle()
    }

    /// URL of the flip sound, for hosts that preload audio.
    pub fn flip_sound(&self) -> String {
        self.state.flip_sound.clone()
    }
}
