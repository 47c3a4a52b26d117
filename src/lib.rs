//! Terracarve - a chunked voxel terrain engine with real-time sculpting

pub mod core;
pub mod math;
pub mod mesh;
pub mod terrain;
pub mod voxel;
pub mod sculpt;
pub mod scene;
