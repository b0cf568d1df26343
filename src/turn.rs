//! Per-sheet turn animation.
//!
//! Each sheet carries persistently eased joint angles. Every frame the
//! animator derives target angles from the displayed page and eases the
//! current angles toward them, so sheets keep moving smoothly when the
//! target changes mid-turn. Three curve regions shape the paper: an inward
//! curl near the spine, a gentler outward counter-curve toward the free
//! edge, and a travelling bulge that only exists while a turn is in
//! flight.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::math::{damp, damp_angle};
use crate::skeleton::{compute_joint_palette, JointAngles, JOINT_COUNT, PAGE_DEPTH};

/// Smooth time for the swing (turn) axis, seconds.
pub const EASING_FACTOR: f32 = 0.5;
/// Smooth time for the fold axis, seconds.
pub const EASING_FACTOR_FOLD: f32 = 0.3;

/// Weight of the inward curl near the spine.
pub const INSIDE_CURVE_STRENGTH: f32 = 0.18;
/// Weight of the outward counter-curve toward the free edge.
pub const OUTSIDE_CURVE_STRENGTH: f32 = 0.05;
/// Weight of the travelling bulge while a turn is in flight.
pub const TURNING_CURVE_STRENGTH: f32 = 0.09;

/// Joints below this index belong to the inside curve region.
pub const INSIDE_CURVE_JOINTS: usize = 8;

/// Duration of the turn bulge envelope.
pub const TURN_BULGE_MS: f64 = 400.0;

/// Fan-out per sheet while the book lies open, degrees of extra swing.
pub const FAN_SPREAD_DEG: f32 = 0.8;
/// Peak fold excursion at the height of a turn, degrees.
pub const FOLD_DEG: f32 = 2.0;

/// Emissive intensity a hovered sheet eases toward.
pub const HOVER_EMISSIVE: f32 = 0.22;
/// Smooth time for the hover highlight, seconds.
pub const EMISSIVE_SMOOTH_TIME: f32 = 0.16;

/// Animation state of a single sheet.
#[derive(Debug, Clone)]
pub struct PageTurn {
    index: usize,
    /// Eased articulation. Entry 0 belongs to the sheet root transform,
    /// entries 1.. to the chain joints.
    eased: [JointAngles; JOINT_COUNT],
    turned_at_ms: f64,
    last_opened: bool,
    hovered: bool,
    ready: bool,
    emissive: f32,
}

impl PageTurn {
    fn new(index: usize) -> Self {
        Self {
            index,
            eased: [JointAngles::default(); JOINT_COUNT],
            // Far in the past so a fresh book shows no bulge.
            turned_at_ms: f64::NEG_INFINITY,
            last_opened: false,
            hovered: false,
            ready: false,
            emissive: 0.0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the host has finished loading this sheet's textures. An
    /// unready sheet sits at rest and is skipped by the animator, then
    /// eases in from rest once it becomes ready.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// Current hover highlight intensity for the two picture faces.
    pub fn emissive(&self) -> f32 {
        self.emissive
    }

    fn advance(&mut self, now_ms: f64, dt: f32, displayed: usize, page_count: usize) {
        if !self.ready {
            return;
        }

        let opened = displayed > self.index;
        if opened != self.last_opened {
            self.turned_at_ms = now_ms;
            self.last_opened = opened;
        }
        let elapsed = (now_ms - self.turned_at_ms).min(TURN_BULGE_MS);
        let envelope = ((elapsed / TURN_BULGE_MS) as f32 * PI).sin();

        let book_closed = displayed == 0 || displayed == page_count;
        let mut base = if opened { -FRAC_PI_2 } else { FRAC_PI_2 };
        if !book_closed {
            base += (self.index as f32 * FAN_SPREAD_DEG).to_radians();
        }

        for (j, joint) in self.eased.iter_mut().enumerate() {
            let inside = if j < INSIDE_CURVE_JOINTS {
                (j as f32 * 0.2 + 0.25).sin()
            } else {
                0.0
            };
            let outside = if j >= INSIDE_CURVE_JOINTS {
                (j as f32 * 0.3 + 0.09).cos()
            } else {
                0.0
            };
            let wave = (j as f32 * PI / JOINT_COUNT as f32).sin() * envelope;

            let mut swing_target = INSIDE_CURVE_STRENGTH * inside * base
                - OUTSIDE_CURVE_STRENGTH * outside * base
                + TURNING_CURVE_STRENGTH * wave * base;
            let mut fold_base = (base.signum() * FOLD_DEG).to_radians();

            // A closed book lies flat: the root takes the whole turn and
            // the chain straightens out.
            if book_closed {
                swing_target = if j == 0 { base } else { 0.0 };
                fold_base = 0.0;
            }

            let fold_wave = if j > INSIDE_CURVE_JOINTS {
                (j as f32 * PI / JOINT_COUNT as f32 - 0.5).sin() * envelope
            } else {
                0.0
            };

            joint.swing = damp_angle(joint.swing, swing_target, EASING_FACTOR, dt);
            joint.fold = damp_angle(joint.fold, fold_base * fold_wave, EASING_FACTOR_FOLD, dt);
        }

        let emissive_target = if self.hovered { HOVER_EMISSIVE } else { 0.0 };
        self.emissive = damp(self.emissive, emissive_target, EMISSIVE_SMOOTH_TIME, dt);
    }

    /// Root transform of this sheet in book space. Carries the spine hinge
    /// rotation plus the stacking offset that keeps turned sheets in front
    /// of the ones still to come. The offset applies inside the rotated
    /// frame so each pile separates along its own surface normal.
    pub fn root_transform(&self, displayed: usize) -> Mat4 {
        let z = (displayed as f32 - self.index as f32) * PAGE_DEPTH;
        let rotation = Quat::from_euler(EulerRot::XYZ, self.eased[0].fold, self.eased[0].swing, 0.0);
        Mat4::from_quat(rotation) * Mat4::from_translation(Vec3::new(0.0, 0.0, z))
    }

    /// Skinning palette for this sheet. The root entry is forced to rest
    /// because its rotation already lives on [`Self::root_transform`].
    pub fn joint_palette(&self) -> Vec<Mat4> {
        let mut chain = self.eased;
        chain[0] = JointAngles::default();
        compute_joint_palette(&chain)
    }
}

/// Drives every sheet of the book.
#[derive(Debug, Clone)]
pub struct TurnAnimator {
    pages: Vec<PageTurn>,
}

impl TurnAnimator {
    pub fn new(page_count: usize) -> Self {
        Self {
            pages: (0..page_count).map(PageTurn::new).collect(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[PageTurn] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&PageTurn> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut PageTurn> {
        self.pages.get_mut(index)
    }

    /// True while any sheet is hovered; the host mirrors this as the
    /// pointer cursor.
    pub fn any_hovered(&self) -> bool {
        self.pages.iter().any(PageTurn::is_hovered)
    }

    /// Ease every sheet toward the pose implied by the displayed page.
    pub fn advance(&mut self, now_ms: f64, dt: f32, displayed: usize) {
        let page_count = self.pages.len();
        for page in &mut self.pages {
            page.advance(now_ms, dt, displayed, page_count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::PAGE_WIDTH;

    const DT: f32 = 1.0 / 60.0;

    fn ready_animator(page_count: usize) -> TurnAnimator {
        let mut animator = TurnAnimator::new(page_count);
        for i in 0..page_count {
            animator.page_mut(i).unwrap().set_ready(true);
        }
        animator
    }

    fn settle(animator: &mut TurnAnimator, from_ms: f64, seconds: f32, displayed: usize) -> f64 {
        let mut now = from_ms;
        for _ in 0..(seconds * 60.0) as usize {
            now += 1000.0 / 60.0;
            animator.advance(now, DT, displayed);
        }
        now
    }

    fn tip_in_book_space(page: &PageTurn, displayed: usize) -> Vec3 {
        let palette = page.joint_palette();
        let posed = palette[JOINT_COUNT - 1].transform_point3(Vec3::new(PAGE_WIDTH, 0.0, 0.0));
        page.root_transform(displayed).transform_point3(posed)
    }

    #[test]
    fn test_closed_book_rest_pose() {
        let mut animator = ready_animator(9);
        settle(&mut animator, 0.0, 5.0, 0);

        for page in animator.pages() {
            assert!(
                (page.eased[0].swing - FRAC_PI_2).abs() < 0.01,
                "sheet {} root should rest at a quarter turn, got {}",
                page.index(),
                page.eased[0].swing
            );
            for joint in &page.eased[1..] {
                assert!(joint.swing.abs() < 1e-4, "chain should lie straight");
                assert!(joint.fold.abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_fully_turned_book_rest_pose() {
        let mut animator = ready_animator(9);
        settle(&mut animator, 0.0, 6.0, 9);

        for page in animator.pages() {
            assert!(
                (page.eased[0].swing + FRAC_PI_2).abs() < 0.01,
                "sheet {} should rest turned over, got {}",
                page.index(),
                page.eased[0].swing
            );
            for joint in &page.eased[1..] {
                assert!(joint.swing.abs() < 0.01);
                assert!(joint.fold.abs() < 0.01);
            }
        }
    }

    #[test]
    fn test_open_book_splays_sheets_to_both_sides() {
        let mut animator = ready_animator(9);
        settle(&mut animator, 0.0, 6.0, 1);

        let turned = tip_in_book_space(animator.page(0).unwrap(), 1);
        let upcoming = tip_in_book_space(animator.page(1).unwrap(), 1);

        assert!(
            turned.z > 0.4 * PAGE_WIDTH,
            "turned sheet should curl over to +z, tip at {:?}",
            turned
        );
        assert!(
            upcoming.z < -0.4 * PAGE_WIDTH,
            "upcoming sheet should stay on -z, tip at {:?}",
            upcoming
        );

        // The chain bends but never stretches.
        for tip in [turned, upcoming] {
            assert!(tip.length() <= PAGE_WIDTH + 1e-3);
            assert!(tip.length() > 0.7 * PAGE_WIDTH);
        }
    }

    #[test]
    fn test_fold_only_lives_during_a_turn() {
        let mut animator = ready_animator(9);
        let now = settle(&mut animator, 0.0, 6.0, 1);

        let settled_fold: f32 = animator.page(0).unwrap().eased[12..]
            .iter()
            .map(|j| j.fold.abs())
            .sum();
        assert!(settled_fold < 0.01, "fold should vanish at rest");

        // Turning the next sheet restarts its bulge; 200ms in, the outer
        // joints of sheet 1 pick up fold.
        let mut now = now;
        animator.advance(now + 1.0, DT, 2);
        let mid_turn_end = now + 200.0;
        while now < mid_turn_end {
            now += 1000.0 / 60.0;
            animator.advance(now, DT, 2);
        }
        let mid_fold: f32 = animator.page(1).unwrap().eased[12..]
            .iter()
            .map(|j| j.fold.abs())
            .sum();
        assert!(
            mid_fold > 0.005,
            "outer joints should fold mid-turn, got {}",
            mid_fold
        );

        // And it decays again once the envelope runs out.
        settle(&mut animator, now, 6.0, 2);
        let late_fold: f32 = animator.page(1).unwrap().eased[12..]
            .iter()
            .map(|j| j.fold.abs())
            .sum();
        assert!(
            late_fold < 0.01,
            "fold should decay after the turn, got {}",
            late_fold
        );
    }

    #[test]
    fn test_turning_back_restarts_the_bulge() {
        let mut animator = ready_animator(9);
        let now = settle(&mut animator, 0.0, 6.0, 2);
        assert!(animator.page(1).unwrap().last_opened);

        // Turning sheet 1 back stamps a fresh bulge start.
        animator.advance(now + 16.0, DT, 1);
        let page = animator.page(1).unwrap();
        assert!(!page.last_opened);
        assert!((page.turned_at_ms - (now + 16.0)).abs() < 1e-6);
    }

    #[test]
    fn test_unready_sheet_stays_at_rest() {
        let mut animator = TurnAnimator::new(3);
        animator.page_mut(0).unwrap().set_ready(true);
        settle(&mut animator, 0.0, 2.0, 0);

        // Sheet 0 has moved toward the closed-book pose, sheet 1 has not.
        assert!(animator.page(0).unwrap().eased[0].swing > 0.5);
        let pending = animator.page(1).unwrap();
        assert_eq!(pending.eased, [JointAngles::default(); JOINT_COUNT]);
        assert!(pending.joint_palette()[JOINT_COUNT - 1].abs_diff_eq(Mat4::IDENTITY, 1e-5));

        // Once textures land the sheet eases in from rest.
        animator.page_mut(1).unwrap().set_ready(true);
        settle(&mut animator, 2000.0, 1.0, 0);
        assert!(animator.page(1).unwrap().eased[0].swing > 0.5);
    }

    #[test]
    fn test_hover_highlight_eases_both_ways() {
        let mut animator = ready_animator(2);
        animator.page_mut(0).unwrap().set_hovered(true);
        assert!(animator.any_hovered());

        let mut previous = 0.0;
        let now = settle(&mut animator, 0.0, 0.1, 0);
        let rising = animator.page(0).unwrap().emissive();
        assert!(rising > previous, "highlight should rise while hovered");
        previous = rising;

        let now = settle(&mut animator, now, 2.0, 0);
        let settled = animator.page(0).unwrap().emissive();
        assert!(
            (settled - HOVER_EMISSIVE).abs() < 1e-3,
            "highlight should settle at {}, got {}",
            HOVER_EMISSIVE,
            settled
        );
        assert!(settled > previous);

        animator.page_mut(0).unwrap().set_hovered(false);
        settle(&mut animator, now, 2.0, 0);
        assert!(animator.page(0).unwrap().emissive() < 1e-3);
        assert!(!animator.any_hovered());
    }

    #[test]
    fn test_fan_spread_orders_open_sheets() {
        let mut animator = ready_animator(9);
        settle(&mut animator, 0.0, 6.0, 4);

        // Sheets still to the right share a base pose plus a per-index fan
        // offset, so later sheets rest at a slightly larger swing.
        let near = animator.page(5).unwrap().eased[0].swing;
        let far = animator.page(8).unwrap().eased[0].swing;
        assert!(
            far > near,
            "fan spread should order open sheets, got {} vs {}",
            near,
            far
        );
    }
}
