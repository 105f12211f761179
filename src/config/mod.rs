pub mod options;
pub mod runtime_config;
