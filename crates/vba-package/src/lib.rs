//! File-backed document host for VBA module synchronization
//!
//! Documents are stored as structured "package" files (TOML, JSON or YAML,
//! chosen by extension) holding the document kind, its metadata, the
//! stencils docked to it and its code project. [`PackageHost`] plays the
//! role of the automation application: it opens, tracks, reopens, saves
//! and closes documents, and hands out handles implementing the
//! `vba-core` capability traits.
//!
//! ```text
//! kind = "drawing"
//! docked = ["stencils/Shapes.vss.toml"]
//!
//! [[project.components]]
//! name = "ThisDocument"
//! kind = "document"
//! code = "Private Sub Document_Opened(ByVal doc As IVDocument)\nEnd Sub"
//! ```

pub mod codec;
pub mod host;
pub mod model;

pub use host::{OpenMode, PackageComponent, PackageDocument, PackageHost, PackageProject};
pub use model::{ComponentFile, DocumentFile, ProjectFile};
