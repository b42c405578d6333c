pub mod commands;
pub mod context;
pub mod export;
pub mod repl;

pub use context::CliContext;
pub use repl::readline;
