//! Isosurface mesh extraction

pub mod data;
pub mod surface_nets;

pub use data::MeshData;
