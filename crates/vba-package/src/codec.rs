//! Native module file format
//!
//! Module files start with a header the VBA editor writes on export:
//! an optional `VERSION` line, an optional `BEGIN ... END` block (class
//! instancing or form designer properties) and a run of `Attribute` lines,
//! of which `VB_Name` names the component. Everything after the header is
//! code. Lines are written with CRLF.

use std::path::Path;

use vba_core::{ComponentKind, HostError, HostResult};

const FORM_DESIGNER_CLSID: &str = "{C62A69F0-16DC-11CE-9E98-00AA00574A4F}";

/// A module file split into its name and code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSource {
    /// Value of `Attribute VB_Name`, if present
    pub name: Option<String>,
    pub lines: Vec<String>,
}

/// Render a component in the native file format.
pub fn encode(name: &str, kind: ComponentKind, lines: &[String]) -> String {
    let mut header: Vec<String> = Vec::new();
    match kind {
        ComponentKind::Class => {
            header.push("VERSION 1.0 CLASS".into());
            header.push("BEGIN".into());
            header.push("  MultiUse = -1  'True".into());
            header.push("END".into());
        }
        ComponentKind::Form => {
            header.push("VERSION 5.00".into());
            header.push(format!("Begin {FORM_DESIGNER_CLSID} {name}"));
            header.push(format!("   Caption         =   \"{name}\""));
            header.push("End".into());
        }
        ComponentKind::Standard | ComponentKind::Other => {}
    }
    header.push(format!("Attribute VB_Name = \"{name}\""));
    if matches!(kind, ComponentKind::Class | ComponentKind::Form) {
        header.push("Attribute VB_GlobalNameSpace = False".into());
        header.push("Attribute VB_Creatable = False".into());
        header.push(format!(
            "Attribute VB_PredeclaredId = {}",
            if kind == ComponentKind::Form { "True" } else { "False" }
        ));
        header.push("Attribute VB_Exposed = False".into());
    }

    let mut out = String::new();
    for line in header.iter().chain(lines) {
        out.push_str(line);
        out.push_str("\r\n");
    }
    out
}

/// Parse a module file. `path` is only used in error messages.
pub fn decode(path: &Path, content: &str) -> HostResult<ModuleSource> {
    let mut lines = content.lines().peekable();
    let mut name = None;

    if lines
        .peek()
        .is_some_and(|line| line.trim_start().starts_with("VERSION "))
    {
        lines.next();
    }

    if lines.peek().is_some_and(|line| is_begin(line)) {
        let mut depth = 0usize;
        loop {
            let Some(line) = lines.next() else {
                return Err(HostError::Malformed {
                    path: path.to_path_buf(),
                    message: "unterminated BEGIN block".into(),
                });
            };
            if is_begin(line) {
                depth += 1;
            } else if is_end(line) {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }
    }

    while let Some(line) = lines.peek() {
        let Some(attribute) = line.trim_start().strip_prefix("Attribute ") else {
            break;
        };
        if let Some((key, value)) = attribute.split_once('=')
            && key.trim() == "VB_Name"
        {
            let value = value.trim().trim_matches('"');
            if value.is_empty() {
                return Err(HostError::Malformed {
                    path: path.to_path_buf(),
                    message: "empty VB_Name attribute".into(),
                });
            }
            name = Some(value.to_string());
        }
        lines.next();
    }

    Ok(ModuleSource {
        name,
        lines: lines.map(str::to_string).collect(),
    })
}

fn is_begin(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("BEGIN") || line.starts_with("Begin ") || line.starts_with("BEGIN ")
}

fn is_end(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("END")
}
