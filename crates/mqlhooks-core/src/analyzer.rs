//! Compile log analyzer.
//!
//! Scans MetaEditor compiler log text line by line against a fixed, ordered
//! rule table and collects matched errors, suggestions and applicable fixes.
//! A line may match several rules; every match is recorded, duplicates
//! included, so the output is stable for identical input.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::analysis::{ErrorAnalysis, ErrorKind, FixDescriptor, FixKind, MatchedError};

/// One entry of the rule table.
#[derive(Debug)]
pub struct ErrorRule {
    pub kind: ErrorKind,
    pub pattern: Regex,
    pub message: &'static str,
    pub suggestion: &'static str,
    pub fix: Option<FixKind>,
}

static RULES: LazyLock<Vec<ErrorRule>> = LazyLock::new(|| {
    vec![
        ErrorRule {
            kind: ErrorKind::VersionFormat,
            pattern: Regex::new(r"version '([^']+)' is incompatible with MQL5 Market")
                .expect("version rule regex"),
            message: "version string does not meet MQL5 Market requirements",
            suggestion: "version must use the xxx.yyy format (e.g. 1.00, 2.15)",
            fix: Some(FixKind::FixVersionFormat),
        },
        ErrorRule {
            kind: ErrorKind::MissingEventHandler,
            pattern: Regex::new(r"event handling function not found")
                .expect("event handler rule regex"),
            message: "missing required event handler",
            suggestion: "make sure OnInit(), OnDeinit(), OnTick() and the other required handlers are defined",
            fix: None,
        },
        ErrorRule {
            kind: ErrorKind::UndeclaredIdentifier,
            pattern: Regex::new(r"undeclared identifier '([^']+)'")
                .expect("identifier rule regex"),
            message: "undeclared identifier",
            suggestion: "check variable and function names, or look for a missing #include",
            fix: None,
        },
        ErrorRule {
            kind: ErrorKind::SyntaxError,
            pattern: Regex::new(r"syntax error").expect("syntax rule regex"),
            message: "syntax error",
            suggestion: "check the code syntax, especially brackets and semicolons",
            fix: None,
        },
        ErrorRule {
            kind: ErrorKind::ErrorSummary,
            pattern: Regex::new(r"(\d+) errors?, (\d+) warnings?").expect("summary rule regex"),
            message: "compiler reported errors and warnings",
            suggestion: "review the individual error and warning messages",
            fix: None,
        },
    ]
});

/// The rule table, in evaluation order.
pub fn rules() -> &'static [ErrorRule] {
    &RULES
}

/// Analyze the full text of a compile log.
pub fn analyze_compile_log(log: &str) -> ErrorAnalysis {
    let mut analysis = ErrorAnalysis::default();

    for line in log.lines() {
        for rule in rules() {
            let Some(caps) = rule.pattern.captures(line) else {
                continue;
            };
            let captured = caps
                .get(1)
                .map(|m| m.as_str().to_string())
                .filter(|s| !s.is_empty());

            analysis.errors.push(MatchedError {
                raw_line: line.trim().to_string(),
                kind: rule.kind,
                message: rule.message.to_string(),
                captured: captured.clone(),
            });
            analysis.suggestions.push(rule.suggestion.to_string());

            if let Some(kind) = rule.fix {
                analysis.auto_fixable = true;
                analysis.fixes.push(FixDescriptor {
                    kind,
                    data: captured,
                });
            }
        }
    }

    analysis
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSION_LINE: &str =
        "Grids Zero - 1.01.mq5 : error 1: version '1.01b' is incompatible with MQL5 Market";

    #[test]
    fn test_empty_log_is_clean() {
        let analysis = analyze_compile_log("");
        assert!(analysis.errors.is_empty());
        assert!(analysis.suggestions.is_empty());
        assert!(analysis.fixes.is_empty());
        assert!(!analysis.auto_fixable);
    }

    #[test]
    fn test_version_line_is_auto_fixable() {
        let analysis = analyze_compile_log(VERSION_LINE);
        assert!(analysis.auto_fixable);
        assert_eq!(analysis.fixes.len(), 1);
        assert_eq!(analysis.fixes[0].kind, FixKind::FixVersionFormat);
        assert_eq!(analysis.fixes[0].data.as_deref(), Some("1.01b"));
        assert_eq!(analysis.errors[0].captured.as_deref(), Some("1.01b"));
        assert_eq!(analysis.errors[0].kind, ErrorKind::VersionFormat);
    }

    #[test]
    fn test_one_fix_per_matching_line() {
        let log = format!("{VERSION_LINE}\nsomething else\n{VERSION_LINE}\n");
        let analysis = analyze_compile_log(&log);
        assert_eq!(analysis.fixes.len(), 2);
        assert_eq!(analysis.errors.len(), 2);
    }

    #[test]
    fn test_line_matching_two_rules_yields_two_entries() {
        let log = "line 3: syntax error near 'x'\n\
                   Grid.mq5(10,5) : undeclared identifier 'Lots' - syntax error\n";
        let analysis = analyze_compile_log(log);
        let kinds: Vec<ErrorKind> = analysis.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::SyntaxError,
                ErrorKind::UndeclaredIdentifier,
                ErrorKind::SyntaxError,
            ]
        );
        assert_eq!(analysis.suggestions.len(), 3);
        assert_eq!(analysis.errors[1].captured.as_deref(), Some("Lots"));
        assert!(!analysis.auto_fixable);
    }

    #[test]
    fn test_summary_line_captures_error_count() {
        let analysis = analyze_compile_log("Result: 3 errors, 1 warning");
        assert_eq!(analysis.errors.len(), 1);
        assert_eq!(analysis.errors[0].kind, ErrorKind::ErrorSummary);
        assert_eq!(analysis.errors[0].captured.as_deref(), Some("3"));
    }

    #[test]
    fn test_raw_line_is_trimmed() {
        let analysis = analyze_compile_log("   event handling function not found   \r\n");
        assert_eq!(
            analysis.errors[0].raw_line,
            "event handling function not found"
        );
        assert_eq!(analysis.errors[0].kind, ErrorKind::MissingEventHandler);
        assert!(analysis.errors[0].captured.is_none());
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let log = format!("{VERSION_LINE}\n0 errors, 0 warnings\nsyntax error\n");
        assert_eq!(analyze_compile_log(&log), analyze_compile_log(&log));
    }

    #[test]
    fn test_rule_table_order() {
        let kinds: Vec<ErrorKind> = rules().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::VersionFormat,
                ErrorKind::MissingEventHandler,
                ErrorKind::UndeclaredIdentifier,
                ErrorKind::SyntaxError,
                ErrorKind::ErrorSummary,
            ]
        );
        assert_eq!(rules().iter().filter(|r| r.fix.is_some()).count(), 1);
    }
}
