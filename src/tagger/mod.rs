pub mod dynamic;
pub mod source_path;
pub mod tagger;
pub mod tree_model;
