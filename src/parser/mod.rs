// Settings-update DSL parser module

pub mod ast;
pub mod command;
pub mod lexer;
pub mod pipeline;
pub mod scale;

// Public API re-exports
pub use ast::{Command, Pipeline};
pub use pipeline::parse_pipeline;
