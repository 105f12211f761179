pub mod console;
pub mod context;
pub mod replay_model;
pub mod runner;
