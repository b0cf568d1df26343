//! Scene composition for the host renderer.
//!
//! The host owns the GPU; this module hands it everything it needs to draw
//! a frame: a static scene description at startup (lights, environment,
//! texture manifest, per-sheet materials) and per-frame transforms sampled
//! from the animation state. The whole book rides a gentle idle drift so
//! it never sits dead still.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::page::Catalog;
use crate::turn::PageTurn;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Base tilt of the floating group, leaning the book toward the viewer.
pub const BOOK_TILT_X: f32 = -FRAC_PI_4;
/// Yaw of the book inside the floating group, spine toward the camera.
pub const BOOK_YAW_Y: f32 = -FRAC_PI_2;

pub const FLOAT_SPEED: f32 = 2.0;
pub const FLOAT_ROTATION_INTENSITY: f32 = 2.0;
pub const FLOAT_INTENSITY: f32 = 1.0;

/// Plain page color and the dark tint on the spine-side edge.
pub const PAGE_COLOR: &str = "white";
pub const SPINE_EDGE_COLOR: &str = "#111";
/// Hover highlight color on the two picture faces.
pub const EMISSIVE_COLOR: &str = "purple";
/// Constant roughness of interior picture faces; covers use a map instead.
pub const INTERIOR_ROUGHNESS: f32 = 0.1;
/// Default roughness map for the two outward cover faces.
pub const COVER_ROUGHNESS_TEXTURE: &str = "book-cover-roughness";

pub const ENVIRONMENT_PRESET: &str = "studio";

pub const LIGHT_POSITION: [f32; 3] = [2.0, 5.0, 2.0];
pub const LIGHT_INTENSITY: f32 = 2.5;
pub const SHADOW_MAP_SIZE: u32 = 2048;
pub const SHADOW_BIAS: f32 = -0.0001;

pub const SHADOW_PLANE_Y: f32 = -1.5;
pub const SHADOW_PLANE_SIZE: f32 = 100.0;
pub const SHADOW_PLANE_OPACITY: f32 = 0.2;

/// Idle drift of the whole book, a slow bob with a slight wobble.
#[derive(Debug, Clone, Copy)]
pub struct FloatMotion {
    pub speed: f32,
    pub rotation_intensity: f32,
    pub float_intensity: f32,
}

impl Default for FloatMotion {
    fn default() -> Self {
        Self {
            speed: FLOAT_SPEED,
            rotation_intensity: FLOAT_ROTATION_INTENSITY,
            float_intensity: FLOAT_INTENSITY,
        }
    }
}

impl FloatMotion {
    /// Drift transform at `t` seconds since startup.
    pub fn transform(&self, t: f32) -> Mat4 {
        let phase = t / 4.0 * self.speed;
        let rx = phase.cos() / 8.0 * self.rotation_intensity;
        let ry = phase.sin() / 8.0 * self.rotation_intensity;
        let rz = phase.sin() / 20.0 * self.rotation_intensity;
        let y = phase.sin() / 10.0 * self.float_intensity;
        Mat4::from_translation(Vec3::new(0.0, y, 0.0))
            * Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, rx, ry, rz))
    }
}

/// Builds world transforms for the book and its sheets.
#[derive(Debug, Clone, Default)]
pub struct SceneComposer {
    float: FloatMotion,
}

impl SceneComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// World transform of the book group at `elapsed_s` since startup.
    pub fn book_transform(&self, elapsed_s: f32) -> Mat4 {
        Mat4::from_rotation_x(BOOK_TILT_X)
            * self.float.transform(elapsed_s)
            * Mat4::from_rotation_y(BOOK_YAW_Y)
    }

    /// World transform of one sheet.
    pub fn page_model(&self, elapsed_s: f32, page: &PageTurn, displayed: usize) -> Mat4 {
        self.book_transform(elapsed_s) * page.root_transform(displayed)
    }
}

/// Roughness treatment of a picture face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Roughness {
    /// Sample a roughness texture (the two outward cover faces).
    Map { texture: String },
    /// Constant roughness (interior faces).
    Constant { value: f32 },
}

/// Material recipe for one sheet, slots beyond the shared edge slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMaterials {
    pub front_texture: String,
    pub back_texture: String,
    pub front_roughness: Roughness,
    pub back_roughness: Roughness,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub position: [f32; 3],
    pub intensity: f32,
    pub cast_shadow: bool,
    pub shadow_map_size: [u32; 2],
    pub shadow_bias: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowPlane {
    pub position_y: f32,
    pub size: f32,
    pub opacity: f32,
}

/// Everything static the host needs to set a scene up once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub environment: String,
    pub light: DirectionalLight,
    pub shadow_plane: ShadowPlane,
    /// Textures to load before sheets report ready, first-use order.
    pub textures: Vec<String>,
    pub page_color: String,
    pub spine_edge_color: String,
    pub emissive_color: String,
    pub pages: Vec<PageMaterials>,
}

impl SceneDescription {
    pub fn build(catalog: &Catalog, environment: &str, cover_roughness: &str) -> Self {
        let pages = catalog
            .pages()
            .iter()
            .enumerate()
            .map(|(index, page)| {
                let map = || Roughness::Map {
                    texture: cover_roughness.to_owned(),
                };
                let flat = || Roughness::Constant {
                    value: INTERIOR_ROUGHNESS,
                };
                PageMaterials {
                    front_texture: page.front.clone(),
                    back_texture: page.back.clone(),
                    front_roughness: if catalog.is_cover(index) { map() } else { flat() },
                    back_roughness: if catalog.is_back_cover(index) { map() } else { flat() },
                }
            })
            .collect();

        let mut textures = catalog.texture_manifest();
        if !textures.iter().any(|id| id == cover_roughness) {
            textures.push(cover_roughness.to_owned());
        }

        Self {
            environment: environment.to_owned(),
            light: DirectionalLight {
                position: LIGHT_POSITION,
                intensity: LIGHT_INTENSITY,
                cast_shadow: true,
                shadow_map_size: [SHADOW_MAP_SIZE, SHADOW_MAP_SIZE],
                shadow_bias: SHADOW_BIAS,
            },
            shadow_plane: ShadowPlane {
                position_y: SHADOW_PLANE_Y,
                size: SHADOW_PLANE_SIZE,
                opacity: SHADOW_PLANE_OPACITY,
            },
            textures,
            page_color: PAGE_COLOR.to_owned(),
            spine_edge_color: SPINE_EDGE_COLOR.to_owned(),
            emissive_color: EMISSIVE_COLOR.to_owned(),
            pages,
        }
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Convert to JSON string
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}


// Frame data getters for the render loop
#[cfg(target_arch = "wasm32")]
use crate::state::App;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    /// Static scene setup: lights, environment, texture manifest and
    /// per-sheet materials. Serialize once after `init`.
    pub fn scene_description(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state.description)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Interleaved vertex buffer for the shared page mesh.
    pub fn page_vertex_data(&self) -> Vec<u8> {
        self.state.mesh.vertex_bytes().to_vec()
    }

    /// Triangle indices for the shared page mesh.
    pub fn page_index_data(&self) -> Vec<u16> {
        self.state.mesh.indices.clone()
    }

    /// Index runs per material slot, as `[start, count, slot]` triples.
    pub fn page_material_groups(&self) -> Vec<u32> {
        self.state
            .mesh
            .groups
            .iter()
            .flat_map(|g| [g.start, g.count, g.material])
            .collect()
    }

    /// Byte stride of one vertex in `page_vertex_data`.
    pub fn vertex_stride(&self) -> u32 {
        std::mem::size_of::<crate::skeleton::PageVertex>() as u32
    }

    /// Column-major world matrix of one sheet.
    pub fn page_model_matrix(&self, index: usize) -> Result<Vec<f32>, JsValue> {
        let page = self.page_or_err(index)?;
        let elapsed = self.state.clock.elapsed_s();
        let model = self
            .state
            .composer
            .page_model(elapsed, page, self.state.scheduler.displayed());
        Ok(model.to_cols_array().to_vec())
    }

    /// Column-major skinning matrices of one sheet, joint 0 first.
    pub fn page_joint_matrices(&self, index: usize) -> Result<Vec<f32>, JsValue> {
        let page = self.page_or_err(index)?;
        Ok(page
            .joint_palette()
            .iter()
            .flat_map(|m| m.to_cols_array())
            .collect())
    }

    /// Current hover highlight intensity of one sheet's picture faces.
    pub fn page_emissive(&self, index: usize) -> Result<f32, JsValue> {
        Ok(self.page_or_err(index)?.emissive())
    }

    /// Whether the pointer cursor should show (some sheet is hovered).
    pub fn wants_pointer_cursor(&self) -> bool {
        self.state.animator.any_hovered()
    }

    /// Column-major view matrix of the orbit camera.
    pub fn camera_view_matrix(&self) -> Vec<f32> {
        self.state.camera.view_matrix().to_cols_array().to_vec()
    }

    /// Column-major projection matrix for the given aspect ratio.
    pub fn camera_projection_matrix(&self, aspect: f32) -> Vec<f32> {
        self.state
            .camera
            .projection_matrix(aspect)
            .to_cols_array()
            .to_vec()
    }
}
