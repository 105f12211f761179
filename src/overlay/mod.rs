pub mod engine;
pub mod engine_model;
pub mod geometry;
pub mod host;
pub mod scene;
