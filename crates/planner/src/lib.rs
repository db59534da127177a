pub mod compiler;
pub mod execution;
pub mod index;
pub mod operators;
pub mod request;
pub mod spatial;
pub mod sql;

#[cfg(test)]
mod tests;

pub use compiler::{FilterCompiler, QueryBackend};
pub use index::{IndexCompiler, IndexQueryRenderer};
pub use sql::{SqlCompiler, SqlQueryRenderer, SqlSchema};
