//! Module classification: component kind <-> file extension

use serde::{Deserialize, Serialize};

/// The kind of a code component.
///
/// Only [`Standard`](Self::Standard), [`Class`](Self::Class) and
/// [`Form`](Self::Form) take part in synchronization. Document modules such
/// as `ThisDocument` are [`Other`](Self::Other).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Standard,
    Class,
    Form,
    #[serde(alias = "document")]
    Other,
}

impl ComponentKind {
    /// Every kind that maps to a file extension.
    pub const SYNCABLE: [ComponentKind; 3] = [Self::Standard, Self::Class, Self::Form];

    /// File extension (with leading dot) used for this kind, or `None` when
    /// components of this kind are excluded from sync.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Self::Standard => Some(".bas"),
            Self::Class => Some(".cls"),
            Self::Form => Some(".frm"),
            Self::Other => None,
        }
    }

    /// Kind encoded by a file extension. Accepts the extension with or
    /// without the leading dot, in any case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        match extension.to_ascii_lowercase().as_str() {
            "bas" => Some(Self::Standard),
            "cls" => Some(Self::Class),
            "frm" => Some(Self::Form),
            _ => None,
        }
    }

    /// True for kinds that have a file extension.
    pub fn is_syncable(self) -> bool {
        self.extension().is_some()
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Standard => "standard",
            Self::Class => "class",
            Self::Form => "form",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}
