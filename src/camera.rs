use glam::{Mat4, Quat, Vec3};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Elevation limits as dot product of the target-to-eye direction with
/// world up. The orbit may pass below the book but never through the
/// poles, where the Y-up view matrix degenerates.
const MIN_UP_DOT: f32 = -0.98;
const MAX_UP_DOT: f32 = 0.98;

/// Dolly limits.
const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 20.0;

/// Vertical field of view in degrees.
pub const CAMERA_FOV_DEG: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Orbit center: the book floats around the scene origin.
pub const CAMERA_TARGET: Vec3 = Vec3::ZERO;

/// Reading position for comfortable viewports.
pub const DEFAULT_EYE: Vec3 = Vec3::new(-0.5, 1.0, 4.0);
/// Reading position for narrow viewports, pulled back so the whole book
/// stays in frame.
pub const NARROW_EYE: Vec3 = Vec3::new(-0.5, 1.0, 9.0);
/// Viewport widths at or below this use [`NARROW_EYE`].
pub const NARROW_VIEWPORT_PX: f32 = 800.0;

/// The camera orbits around a fixed target point. Its position is determined
/// by rotating a "back" vector (0, 0, distance) by the orientation quaternion.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// Quaternion representing the camera's orbital rotation
    pub orientation: Quat,
    /// Distance from target point
    pub distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_eye(DEFAULT_EYE)
    }
}

impl Camera {
    /// Place the camera at `eye`, looking at [`CAMERA_TARGET`].
    pub fn from_eye(eye: Vec3) -> Self {
        let offset = eye - CAMERA_TARGET;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let orientation = Quat::from_rotation_arc(Vec3::Z, offset.normalize_or_zero());
        Self {
            orientation,
            distance,
        }
    }

    /// Starting position for a given viewport width, pulled back on
    /// narrow screens.
    pub fn for_viewport(width_px: f32) -> Self {
        if width_px > NARROW_VIEWPORT_PX {
            Self::from_eye(DEFAULT_EYE)
        } else {
            Self::from_eye(NARROW_EYE)
        }
    }

    /// Compute new camera with rotation applied
    ///
    /// Returns a new Camera with the rotation applied, or the original
    /// camera if the rotation would exceed elevation limits.
    pub fn with_rotation(self, axis: Vec3, angle: f32) -> Camera {
        let axis = axis.normalize_or_zero();
        if axis.length_squared() < 0.5 {
            return self; // Invalid axis
        }

        let delta = Quat::from_axis_angle(axis, angle);
        let new_orientation = (delta * self.orientation).normalize();

        let new_dir = new_orientation * Vec3::Z;
        let up_dot = new_dir.y;

        if (MIN_UP_DOT..=MAX_UP_DOT).contains(&up_dot) {
            Camera {
                orientation: new_orientation,
                ..self
            }
        } else {
            // Allow rotations that bring us back inside the limits
            let old_dir = self.orientation * Vec3::Z;
            let old_up_dot = old_dir.y;
            let moving_to_valid = (old_up_dot < MIN_UP_DOT && up_dot > old_up_dot)
                || (old_up_dot > MAX_UP_DOT && up_dot < old_up_dot);

            if moving_to_valid {
                Camera {
                    orientation: new_orientation,
                    ..self
                }
            } else {
                self // Reject rotation
            }
        }
    }

    /// Dolly toward or away from the target. `factor` multiplies the
    /// current distance, so wheel deltas compose naturally.
    pub fn zoomed(self, factor: f32) -> Camera {
        if !factor.is_finite() || factor <= 0.0 {
            return self;
        }
        Camera {
            distance: (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE),
            ..self
        }
    }

    /// Compute camera eye position
    pub fn eye_position(&self) -> Vec3 {
        let offset = self.orientation * Vec3::new(0.0, 0.0, self.distance);
        CAMERA_TARGET + offset
    }

    /// Compute camera's local right axis
    ///
    /// This is the axis to rotate around for up/down elevation changes.
    pub fn right_axis(&self) -> Vec3 {
        let eye = self.eye_position();
        let forward = (CAMERA_TARGET - eye).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        // Return X axis if degenerate (looking straight up/down)
        if right.length_squared() < 0.5 {
            Vec3::X
        } else {
            right
        }
    }

    /// Compute view matrix
    ///
    /// Uses world up (Y axis) for the up vector to ensure proper orbit
    /// behavior without unwanted roll.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), CAMERA_TARGET, Vec3::Y)
    }

    /// Perspective projection for the given viewport aspect ratio.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(CAMERA_FOV_DEG.to_radians(), aspect.max(1e-3), CAMERA_NEAR, CAMERA_FAR)
    }
}


// App methods for camera control
#[cfg(target_arch = "wasm32")]
use crate::state::App;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl App {
    /// Update camera from spherical coordinates (orbit camera)
    /// azimuth: horizontal angle in radians (0 = front, PI/2 = right side)
    /// elevation: vertical angle in radians (0 = level, PI/2 = top-down)
    /// distance: distance from target point
    pub fn update_camera(&mut self, azimuth: f32, elevation: f32, distance: f32) {
        let yaw_quat = Quat::from_rotation_y(azimuth);
        let pitch_quat = Quat::from_rotation_x(elevation);
        let orientation = (yaw_quat * pitch_quat).normalize();

        self.state.camera = Camera {
            orientation,
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
        };
    }

    /// Apply a rotation to the camera around a world-space axis
    ///
    /// Rotates the camera's stored quaternion orientation incrementally.
    /// Clamps elevation short of the poles.
    ///
    /// # Arguments
    /// * `axis_x, axis_y, axis_z` - World-space axis to rotate around (should be normalized)
    /// * `angle` - Rotation angle in radians
    pub fn rotate_camera(&mut self, axis_x: f32, axis_y: f32, axis_z: f32, angle: f32) {
        let axis = Vec3::new(axis_x, axis_y, axis_z);
        self.state.camera = self.state.camera.with_rotation(axis, angle);
    }

    /// Dolly the camera; factors below one move in, above one move out.
    pub fn zoom_camera(&mut self, factor: f32) {
        self.state.camera = self.state.camera.zoomed(factor);
    }

    /// Get the camera's right axis (for vertical input rotation)
    pub fn get_camera_right_axis(&self) -> Vec<f32> {
        self.state.camera.right_axis().to_array().to_vec()
    }
}
