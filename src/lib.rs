//! A static site generator for flat content trees.
//!
//! Content files (Markdown or HTML with an optional `key: value` header) are
//! rendered through Liquid layouts into standalone pages, per-directory post
//! collections, index pages and RSS feeds.

pub use crate::error::Error;
pub use crate::report::Report;
pub use crate::site::{BuildOptions, build};
pub use makesite_config::Config;

pub mod collection;
pub mod content;
pub mod datetime;
pub mod error;
pub mod index;
pub mod mark;
pub mod page;
pub mod params;
pub mod report;
pub mod site;
pub mod template;
