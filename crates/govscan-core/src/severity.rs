//! Canonical severity normalisation.
//!
//! Every parser routes tool-specific severity representations through
//! [`Severity::normalize`]. No other constructor for a finding's severity
//! field exists in this crate, so a `Severity` is always one of the five
//! canonical variants.

use serde::{Deserialize, Serialize};

/// Canonical, totally ordered vulnerability severity.
///
/// Declared low-to-high so the derived `Ord` matches the ranking
/// `CRITICAL > HIGH > MEDIUM > LOW > INFO` used throughout the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        };
        write!(f, "{s}")
    }
}

/// The three shapes a scanner may report severity in.
#[derive(Debug, Clone)]
pub enum SeverityInput<'a> {
    /// A string token such as `"ERROR"`, `"high"`, `"WARNING"`.
    Text(&'a str),
    /// A small integer risk code (ZAP-style: 0-3).
    Code(i64),
    /// A CVSS base score.
    Cvss(f64),
}

impl Severity {
    /// The single entry point for turning a tool-specific severity
    /// representation into the canonical enum. Unknown text tokens
    /// collapse to `MEDIUM`; out-of-range codes do too.
    pub fn normalize(input: SeverityInput<'_>) -> Severity {
        match input {
            SeverityInput::Text(s) => Self::from_text(s),
            SeverityInput::Code(c) => Self::from_code(c),
            SeverityInput::Cvss(score) => Self::from_cvss(score),
        }
    }

    fn from_text(s: &str) -> Severity {
        match s.trim().to_uppercase().as_str() {
            "ERROR" | "CRITICAL" => Severity::Critical,
            "WARNING" | "HIGH" => Severity::High,
            "INFO" | "MEDIUM" => Severity::Medium,
            "NOTE" | "LOW" => Severity::Low,
            _ => Severity::Medium,
        }
    }

    fn from_code(code: i64) -> Severity {
        match code {
            3 => Severity::High,
            2 => Severity::Medium,
            1 => Severity::Low,
            0 => Severity::Info,
            _ => Severity::Medium,
        }
    }

    fn from_cvss(score: f64) -> Severity {
        if score >= 9.0 {
            Severity::Critical
        } else if score >= 7.0 {
            Severity::High
        } else if score >= 4.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}
