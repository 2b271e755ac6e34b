//! File system plumbing for `makesite`: pattern expansion, reading and
//! writing documents.

mod fs;
mod source;

pub use fs::*;
pub use source::*;

type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
