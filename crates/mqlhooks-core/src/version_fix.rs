//! Auto-fix for the MQL5 Market version format error.
//!
//! [`normalize_version`] is a best-effort heuristic, not a validator: inputs
//! with three or more segments lose everything after the second one.
//!
//! [`apply_version_fix`] rewrites the value of the first
//! `#property version "<old>"` declaration in place. Token spacing may vary
//! and trailing comments are kept; only the quoted value changes.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::error::{HookError, Result};

/// Normalize an invalid version string to `major.minor`.
///
/// Non-digit, non-period characters are dropped; the first segment is the
/// major (default `1`), the second the minor (default `00`, left-padded to two
/// digits). Further segments are ignored.
pub fn normalize_version(invalid: &str) -> String {
    let cleaned: String = invalid
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let mut parts = cleaned.split('.');

    let major = parts.next().filter(|s| !s.is_empty()).unwrap_or("1");
    let minor = parts.next().filter(|s| !s.is_empty()).unwrap_or("00");

    format!("{major:0>1}.{minor:0>2}")
}

/// A planned version rewrite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionFix {
    pub old: String,
    pub new: String,
}

impl VersionFix {
    /// Plan a fix for the given invalid version.
    pub fn for_invalid(old: impl Into<String>) -> Self {
        let old = old.into();
        let new = normalize_version(&old);
        Self { old, new }
    }

    /// Whether applying the fix would change nothing.
    pub fn is_noop(&self) -> bool {
        self.old == self.new
    }
}

/// Result of applying a version fix to a source file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FixOutcome {
    /// The declaration was rewritten; `line` is 1-indexed.
    Applied { line: usize },

    /// No matching declaration; the file was not touched.
    DeclarationNotFound,
}

/// Byte range of the quoted value in a `#property version "<value>"` line,
/// if the line declares exactly `value`.
fn version_value_span(line: &str, value: &str) -> Option<(usize, usize)> {
    let body = line.trim_start();
    let rest = body.strip_prefix("#property")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start().strip_prefix("version")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let after = rest.strip_prefix('"')?.strip_prefix(value)?.strip_prefix('"')?;
    let tail = after.trim_start();
    if !(tail.is_empty() || tail.starts_with("//")) {
        return None;
    }

    let start = line.len() - rest.len() + 1;
    Some((start, start + value.len()))
}

/// Rewrite `content`, returning the new text and the 1-indexed line changed.
pub fn rewrite_version(content: &str, old: &str, new: &str) -> Option<(String, usize)> {
    let mut offset = 0;
    for (idx, raw) in content.split_inclusive('\n').enumerate() {
        let line = raw.trim_end_matches(['\n', '\r']);
        if let Some((start, end)) = version_value_span(line, old) {
            let mut out = String::with_capacity(content.len() + new.len());
            out.push_str(&content[..offset + start]);
            out.push_str(new);
            out.push_str(&content[offset + end..]);
            return Some((out, idx + 1));
        }
        offset += raw.len();
    }
    None
}

/// Apply a version fix to the source file at `path`.
///
/// Returns [`FixOutcome::DeclarationNotFound`] without writing when no
/// declaration matches.
pub async fn apply_version_fix(path: &Path, fix: &VersionFix) -> Result<FixOutcome> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| HookError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

    let Some((rewritten, line)) = rewrite_version(&content, &fix.old, &fix.new) else {
        tracing::warn!(
            file = %path.display(),
            version = %fix.old,
            "version declaration not found"
        );
        return Ok(FixOutcome::DeclarationNotFound);
    };

    tokio::fs::write(path, rewritten)
        .await
        .map_err(|source| HookError::WriteFile {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(
        file = %path.display(),
        old = %fix.old,
        new = %fix.new,
        line,
        "version declaration rewritten"
    );
    Ok(FixOutcome::Applied { line })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_valid_is_idempotent() {
        assert_eq!(normalize_version("1.00"), "1.00");
        assert_eq!(normalize_version(&normalize_version("2.15")), "2.15");
    }

    #[test]
    fn test_normalize_strips_and_truncates() {
        assert_eq!(normalize_version("v1.2.3-beta"), "1.02");
    }

    #[test]
    fn test_normalize_defaults_major() {
        assert_eq!(normalize_version(".5"), "1.05");
    }

    #[test]
    fn test_normalize_edge_cases() {
        assert_eq!(normalize_version(""), "1.00");
        assert_eq!(normalize_version("beta"), "1.00");
        assert_eq!(normalize_version("3"), "3.00");
        assert_eq!(normalize_version("1."), "1.00");
        assert_eq!(normalize_version("10.123"), "10.123");
        assert_eq!(normalize_version("1.01b"), "1.01");
    }

    #[test]
    fn test_version_fix_plan() {
        let fix = VersionFix::for_invalid("v2.3");
        assert_eq!(fix.new, "2.03");
        assert!(!fix.is_noop());
        assert!(VersionFix::for_invalid("1.00").is_noop());
    }

    #[test]
    fn test_rewrite_canonical_declaration() {
        let src = "#property copyright \"me\"\n#property version     \"1.0.1\"\n#property strict\n";
        let (out, line) = rewrite_version(src, "1.0.1", "1.00").expect("found");
        assert_eq!(line, 2);
        assert_eq!(
            out,
            "#property copyright \"me\"\n#property version     \"1.00\"\n#property strict\n"
        );
    }

    #[test]
    fn test_rewrite_tolerates_spacing_and_comments() {
        let src = "  #property\tversion \"v3\"   // bump me\r\nint x;\r\n";
        let (out, line) = rewrite_version(src, "v3", "3.00").expect("found");
        assert_eq!(line, 1);
        assert_eq!(out, "  #property\tversion \"3.00\"   // bump me\r\nint x;\r\n");
    }

    #[test]
    fn test_rewrite_only_first_declaration() {
        let src = "#property version \"1.2.3\"\n#property version \"1.2.3\"\n";
        let (out, _) = rewrite_version(src, "1.2.3", "1.02").expect("found");
        assert_eq!(out, "#property version \"1.02\"\n#property version \"1.2.3\"\n");
    }

    #[test]
    fn test_rewrite_ignores_other_values_and_properties() {
        let src = "#property version \"2.00\"\n#property versionx \"1.2.3\"\n// #property version \"1.2.3\"\n";
        assert!(rewrite_version(src, "1.2.3", "1.02").is_none());
    }

    #[tokio::test]
    async fn test_apply_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Grid.mq5");
        std::fs::write(&path, "#property version     \"1.01b\"\nvoid OnTick() {}\n").unwrap();

        let fix = VersionFix::for_invalid("1.01b");
        let outcome = apply_version_fix(&path, &fix).await.unwrap();
        assert_eq!(outcome, FixOutcome::Applied { line: 1 });
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "#property version     \"1.01\"\nvoid OnTick() {}\n"
        );
    }

    #[tokio::test]
    async fn test_apply_missing_declaration_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Grid.mq5");
        let original = b"#property strict\r\nvoid OnTick() {}\n\xE2\x9C\x93\n";
        std::fs::write(&path, original).unwrap();

        let fix = VersionFix::for_invalid("1.01b");
        let outcome = apply_version_fix(&path, &fix).await.unwrap();
        assert_eq!(outcome, FixOutcome::DeclarationNotFound);
        assert_eq!(std::fs::read(&path).unwrap(), original);
    }

    #[tokio::test]
    async fn test_apply_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let fix = VersionFix::for_invalid("x");
        let err = apply_version_fix(&dir.path().join("none.mq5"), &fix)
            .await
            .unwrap_err();
        assert!(matches!(err, HookError::ReadFile { .. }));
    }
}
