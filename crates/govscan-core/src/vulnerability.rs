//! The discriminated vulnerability model shared by every parser and by the
//! orchestrator's per-finding routing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// Free-form, tool-specific metadata attached to a finding.
pub type Metadata = HashMap<String, serde_json::Value>;

/// Confidence a scanner assigned to a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// HTTP method observed by a DAST scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    pub fn from_str_or_get(s: &str) -> HttpMethod {
        match s.trim().to_uppercase().as_str() {
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            "OPTIONS" => HttpMethod::Options,
            "HEAD" => HttpMethod::Head,
            _ => HttpMethod::Get,
        }
    }
}

/// Exploitability band derived from a CVSS-style score. `Unknown` is used
/// when the source data carries no score at all (distinct from `Low`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exploitability {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl Exploitability {
    pub fn from_score(score: Option<f64>) -> Exploitability {
        let Some(score) = score else {
            return Exploitability::Unknown;
        };
        if score >= 9.0 {
            Exploitability::Critical
        } else if score >= 7.0 {
            Exploitability::High
        } else if score >= 4.0 {
            Exploitability::Medium
        } else {
            Exploitability::Low
        }
    }
}

impl std::fmt::Display for Exploitability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Exploitability::Critical => "CRITICAL",
            Exploitability::High => "HIGH",
            Exploitability::Medium => "MEDIUM",
            Exploitability::Low => "LOW",
            Exploitability::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// A static-analysis finding (source-code level).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SastFinding {
    pub title: String,
    pub severity: Severity,
    pub category: String,
    pub file_path: String,
    pub line_number: u32,
    pub cwe_id: Option<String>,
    pub description: String,
    pub recommendation: String,
    pub confidence: Confidence,
    pub owasp_category: Option<String>,
    pub code_snippet: Option<String>,
    pub metadata: Metadata,
}

/// A software-composition-analysis finding (dependency level).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaFinding {
    pub package_name: String,
    pub current_version: String,
    pub vulnerable_range: String,
    pub patched_version: Option<String>,
    pub advisory_id: String,
    pub severity: Severity,
    pub description: String,
    pub exploitability: Exploitability,
    pub fix_available: bool,
    pub direct_dependency: bool,
    /// Ordered dependency chain; the first entry is the root package.
    pub dependency_chain: Vec<String>,
    pub metadata: Metadata,
}

/// A dynamic-application-testing finding (runtime level).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DastFinding {
    pub url: String,
    /// URL path with numeric ids and UUID-shaped runs canonicalised away.
    pub endpoint: String,
    pub method: HttpMethod,
    pub issue_type: String,
    pub risk_level: Severity,
    pub confidence: Confidence,
    pub cwe_id: Option<String>,
    pub description: String,
    pub solution: String,
    pub evidence: String,
    pub metadata: Metadata,
}

/// Tag identifying which arm of [`Vulnerability`] a value holds. Mirrors the
/// discriminant carried on `PolicyResult` so routing and reporting code can
/// match on a plain copyable value instead of the finding itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VulnKind {
    Sast,
    Sca,
    Dast,
}

impl std::fmt::Display for VulnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VulnKind::Sast => "SAST",
            VulnKind::Sca => "SCA",
            VulnKind::Dast => "DAST",
        };
        write!(f, "{s}")
    }
}

/// A single normalised security issue, regardless of source dialect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "vuln_type")]
pub enum Vulnerability {
    #[serde(rename = "SAST")]
    Sast(SastFinding),
    #[serde(rename = "SCA")]
    Sca(ScaFinding),
    #[serde(rename = "DAST")]
    Dast(DastFinding),
}

impl Vulnerability {
    pub fn kind(&self) -> VulnKind {
        match self {
            Vulnerability::Sast(_) => VulnKind::Sast,
            Vulnerability::Sca(_) => VulnKind::Sca,
            Vulnerability::Dast(_) => VulnKind::Dast,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Vulnerability::Sast(f) => f.severity,
            Vulnerability::Sca(f) => f.severity,
            Vulnerability::Dast(f) => f.risk_level,
        }
    }

    /// A short human title used in prompts, progress events, and logs.
    pub fn title(&self) -> String {
        match self {
            Vulnerability::Sast(f) => f.title.clone(),
            Vulnerability::Sca(f) => format!("{} {}", f.package_name, f.advisory_id),
            Vulnerability::Dast(f) => f.issue_type.clone(),
        }
    }

    /// Category / issue-type field, used when building retrieval queries.
    pub fn category(&self) -> &str {
        match self {
            Vulnerability::Sast(f) => &f.category,
            Vulnerability::Sca(f) => &f.advisory_id,
            Vulnerability::Dast(f) => &f.issue_type,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Vulnerability::Sast(f) => &f.description,
            Vulnerability::Sca(f) => &f.description,
            Vulnerability::Dast(f) => &f.description,
        }
    }

    pub fn cwe_id(&self) -> Option<&str> {
        match self {
            Vulnerability::Sast(f) => f.cwe_id.as_deref(),
            Vulnerability::Sca(_) => None,
            Vulnerability::Dast(f) => f.cwe_id.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sast() -> Vulnerability {
        Vulnerability::Sast(SastFinding {
            title: "SQL Injection".into(),
            severity: Severity::Critical,
            category: "SQL Injection".into(),
            file_path: "app/auth.py".into(),
            line_number: 45,
            cwe_id: Some("CWE-89".into()),
            description: "User input concatenated into SQL query".into(),
            recommendation: "Use parameterised queries".into(),
            confidence: Confidence::High,
            owasp_category: None,
            code_snippet: None,
            metadata: Metadata::new(),
        })
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(sast().kind(), VulnKind::Sast);
    }

    #[test]
    fn exploitability_bands_and_unknown() {
        assert_eq!(Exploitability::from_score(None), Exploitability::Unknown);
        assert_eq!(Exploitability::from_score(Some(9.1)), Exploitability::Critical);
        assert_eq!(Exploitability::from_score(Some(1.0)), Exploitability::Low);
    }

    #[test]
    fn serde_tag_round_trips() {
        let v = sast();
        let json = serde_json::to_string(&v).unwrap();
        assert!(json.contains("\"vuln_type\":\"SAST\""));
        let back: Vulnerability = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), VulnKind::Sast);
    }
}
