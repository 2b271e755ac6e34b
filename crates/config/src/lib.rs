//! Site configuration and content headers for `makesite`.

mod coerce;
mod config;
mod content_dir;
mod header;

pub mod path;

pub use self::coerce::*;
pub use self::config::*;
pub use self::content_dir::*;
pub use self::header::*;

type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
