//! Common structs and addressing math shared between lumigrid's host code
//! and its WGSL kernels.
//!
//! Everything `#[repr(C)]` in here mirrors a struct declared in one of the
//! shaders under `lumigrid/shaders/` - field order and padding must stay in
//! sync by hand.

mod atlas;
mod camera;
mod light;
pub mod octahedral;
mod passes;
mod probe_grid;
mod scene_info;
mod triangle;

pub use self::atlas::*;
pub use self::camera::*;
pub use self::light::*;
pub use self::passes::*;
pub use self::probe_grid::*;
pub use self::scene_info::*;
pub use self::triangle::*;

/// Triangle id stored in the trace atlas for texels whose ray left the scene.
pub const MISS_ID: u32 = u32::MAX;
