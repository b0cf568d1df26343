//! Flipbook Wasm Core
//!
//! Interactive 3D page flip book core from Rust using wasm-bindgen. The
//! host renders; this crate owns the book: page geometry and skinning,
//! the staged page walk, per-sheet turn easing and the orbit camera.

pub mod audio;
pub mod camera;
mod math;
pub mod page;
pub mod scene;
pub mod skeleton;
pub mod state;
pub mod turn;

pub use math::{damp, damp_angle, wrap_angle, Mat4, Quat, Vec3};
pub use state::{AppState, BookConfig};

// Re-exports for the WASM API
#[cfg(target_arch = "wasm32")]
pub use state::{init_book, App};
