//! Compile log analysis types.

use serde::{Deserialize, Serialize};

/// Known compile error patterns, in rule-table order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// `version 'x' is incompatible with MQL5 Market`
    VersionFormat,
    /// `event handling function not found`
    MissingEventHandler,
    /// `undeclared identifier 'x'`
    UndeclaredIdentifier,
    /// `syntax error`
    SyntaxError,
    /// `N errors, M warnings`
    ErrorSummary,
}

/// Automatic fix kinds. Only the version format has one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FixKind {
    #[serde(rename = "fixVersionFormat")]
    FixVersionFormat,
}

impl FixKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixKind::FixVersionFormat => "fixVersionFormat",
        }
    }
}

/// One log line matched against one rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchedError {
    /// The matching log line, trimmed.
    pub raw_line: String,

    /// Which rule matched.
    pub kind: ErrorKind,

    /// Human-readable description of the rule.
    pub message: String,

    /// First capture group, if the rule has one.
    pub captured: Option<String>,
}

/// An auto-fix the analyzer found applicable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixDescriptor {
    pub kind: FixKind,

    /// Fix input, e.g. the invalid version string.
    pub data: Option<String>,
}

/// Output of the compile log analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorAnalysis {
    /// Matches in line order, then rule order within a line.
    pub errors: Vec<MatchedError>,

    /// One suggestion per entry in `errors`, same order.
    pub suggestions: Vec<String>,

    /// Applicable fixes, in match order.
    pub fixes: Vec<FixDescriptor>,

    /// True when at least one fix descriptor was produced.
    pub auto_fixable: bool,
}

impl ErrorAnalysis {
    /// Whether nothing matched.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Version strings to fix, in match order.
    pub fn version_fixes(&self) -> impl Iterator<Item = &str> {
        self.fixes
            .iter()
            .filter(|f| f.kind == FixKind::FixVersionFormat)
            .filter_map(|f| f.data.as_deref())
    }
}
