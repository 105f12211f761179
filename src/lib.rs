pub mod channel;
pub mod cli;
pub mod config;
pub mod host;
pub mod inject;
pub mod overlay;
pub mod replay;
pub mod tagger;
pub mod toggle;
pub mod trace;

pub use channel::message::EditRequest;
pub use config::{options::VisualEditOptions, runtime_config::RuntimeConfig};
pub use overlay::{
    engine::OverlayEngine,
    engine_model::{Dispatch, EngineEvent, EnginePhase},
};
pub use tagger::tagger::{Tagger, tag_source};
