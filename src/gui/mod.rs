//! Desktop form over the same assembler the CLI uses.

pub mod app;
pub mod form;

pub use app::run;
