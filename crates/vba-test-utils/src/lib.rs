//! Shared test utilities for the vba-sync workspace.
//!
//! This crate is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`host`]: in-memory [`FakeHost`] implementing the handle traits
//! - [`folder`]: [`TestFolder`] for module folders on disk

pub mod folder;
pub mod host;

pub use folder::TestFolder;
pub use host::{FakeComponent, FakeDocument, FakeHost, FakeProject, HostEvent};
