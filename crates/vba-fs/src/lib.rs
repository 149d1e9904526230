//! Filesystem layer for VBA module synchronization
//!
//! Provides normalized path handling, atomic text I/O, flat directory
//! listing and format-agnostic structured file storage.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
