//! Saved file to compile target mapping.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// MQL source kinds the hooks react to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// MQL5 expert, indicator or script.
    Mq5,

    /// MQL4 expert, indicator or script.
    Mq4,

    /// MQL4 include file. Not compiled on its own.
    Mqh,
}

impl SourceKind {
    /// Classify a file name by extension. Matching is case-sensitive, like
    /// the `*.mq5` style registry patterns.
    pub fn of(file_name: &str) -> Option<Self> {
        match Path::new(file_name).extension()?.to_str()? {
            "mq5" => Some(SourceKind::Mq5),
            "mq4" => Some(SourceKind::Mq4),
            "mqh" => Some(SourceKind::Mqh),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SourceKind::Mq5 => "mq5",
            SourceKind::Mq4 => "mq4",
            SourceKind::Mqh => "mqh",
        }
    }
}

/// What to hand to the compiler for a saved file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileTarget {
    /// File that triggered the hook.
    pub saved: String,

    /// File passed to the compiler.
    pub target: String,

    pub kind: SourceKind,
}

impl CompileTarget {
    /// Resolve `file_name` against the kinds a hook accepts.
    ///
    /// `.mq5` and `.mq4` compile themselves; `.mqh` compiles `companion_main`.
    /// Returns `None` for files the hook does not handle.
    pub fn resolve(file_name: &str, accepts: &[SourceKind], companion_main: &str) -> Option<Self> {
        let kind = SourceKind::of(file_name).filter(|k| accepts.contains(k))?;
        let target = match kind {
            SourceKind::Mqh => companion_main.to_string(),
            SourceKind::Mq5 | SourceKind::Mq4 => file_name.to_string(),
        };
        Some(Self {
            saved: file_name.to_string(),
            target,
            kind,
        })
    }

    /// True when an include redirected the compile to another file.
    pub fn is_redirected(&self) -> bool {
        self.saved != self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MQL4: &[SourceKind] = &[SourceKind::Mq4, SourceKind::Mqh];

    #[test]
    fn test_mq5_compiles_itself() {
        let target =
            CompileTarget::resolve("Grids Zero - 1.01.mq5", &[SourceKind::Mq5], "").unwrap();
        assert_eq!(target.target, "Grids Zero - 1.01.mq5");
        assert_eq!(target.kind, SourceKind::Mq5);
        assert!(!target.is_redirected());
    }

    #[test]
    fn test_mqh_redirects_to_companion() {
        let target = CompileTarget::resolve("Panel.mqh", MQL4, "Grids 2.3/Grids 2.3.mq4").unwrap();
        assert_eq!(target.saved, "Panel.mqh");
        assert_eq!(target.target, "Grids 2.3/Grids 2.3.mq4");
        assert!(target.is_redirected());
    }

    #[test]
    fn test_unaccepted_kinds_are_filtered() {
        assert!(CompileTarget::resolve("Grid.mq4", &[SourceKind::Mq5], "").is_none());
        assert!(CompileTarget::resolve("Grid.mq5", MQL4, "main.mq4").is_none());
        assert!(CompileTarget::resolve("notes.txt", MQL4, "main.mq4").is_none());
        assert!(CompileTarget::resolve("Makefile", MQL4, "main.mq4").is_none());
    }

    #[test]
    fn test_extension_is_case_sensitive() {
        assert_eq!(SourceKind::of("GRID.mq5"), Some(SourceKind::Mq5));
        assert_eq!(SourceKind::of("GRID.MQ5"), None);
        assert!(CompileTarget::resolve("Grid.MQ4", MQL4, "main.mq4").is_none());
        assert_eq!(SourceKind::Mqh.extension(), "mqh");
    }
}
