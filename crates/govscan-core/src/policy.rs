//! Per-run results: a generated policy tied to one finding, the aggregate
//! coverage and comparison reports, and the payload handed to renderers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::vulnerability::{VulnKind, Vulnerability};

/// No input source (SAST/SCA/DAST) was supplied to a run.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("no input supplied: at least one of sast/sca/dast source is required")]
    EmptyInput,
}

/// One generated policy, tied to exactly one finding.
///
/// The constructors enforce the invariant that exactly one of `policy_text`
/// / `error` is populated; there is no public way to build a value that
/// violates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResult {
    pub vulnerability: Vulnerability,
    pub vuln_type: VulnKind,
    pub policy_text: Option<String>,
    pub model_label: String,
    pub compliance_context: String,
    pub error: Option<String>,
}

impl PolicyResult {
    pub fn success(
        vulnerability: Vulnerability,
        policy_text: impl Into<String>,
        model_label: impl Into<String>,
        compliance_context: impl Into<String>,
    ) -> Self {
        let vuln_type = vulnerability.kind();
        Self {
            vulnerability,
            vuln_type,
            policy_text: Some(policy_text.into()),
            model_label: model_label.into(),
            compliance_context: compliance_context.into(),
            error: None,
        }
    }

    pub fn failure(
        vulnerability: Vulnerability,
        error: impl Into<String>,
        model_label: impl Into<String>,
        compliance_context: impl Into<String>,
    ) -> Self {
        let vuln_type = vulnerability.kind();
        Self {
            vulnerability,
            vuln_type,
            policy_text: None,
            model_label: model_label.into(),
            compliance_context: compliance_context.into(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.policy_text.is_some()
    }
}

/// Per-group (NIST function / ISO domain) breakdown within a framework.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GroupCoverage {
    pub total: usize,
    pub covered: usize,
    pub percentage: f64,
}

/// Coverage of a single compliance framework against the generated policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkCoverage {
    pub total_controls: usize,
    pub covered_controls: Vec<String>,
    pub coverage_percentage: f64,
    pub by_group: HashMap<String, GroupCoverage>,
    pub gaps: Vec<String>,
}

impl FrameworkCoverage {
    pub fn empty(total_controls: usize, all_ids: &[String]) -> Self {
        let mut gaps = all_ids.to_vec();
        gaps.sort();
        Self {
            total_controls,
            covered_controls: Vec::new(),
            coverage_percentage: 0.0,
            by_group: HashMap::new(),
            gaps,
        }
    }
}

/// Coverage across both frameworks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub nist_csf: FrameworkCoverage,
    pub iso_27001: FrameworkCoverage,
    pub overall_score: f64,
}

/// Letter grade for a [`ComparisonReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    F,
    D,
    C,
    B,
    A,
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{s}")
    }
}

impl Grade {
    pub fn from_overall_similarity(overall: f64) -> Grade {
        if overall >= 90.0 {
            Grade::A
        } else if overall >= 80.0 {
            Grade::B
        } else if overall >= 70.0 {
            Grade::C
        } else if overall >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

/// Word/character/section counts for one side of a comparison.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextStats {
    pub word_count: usize,
    pub char_count: usize,
    pub section_count: usize,
}

/// Output of the policy comparator (C12).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub bleu_score: f64,
    pub rouge_l_fmeasure: f64,
    pub key_terms_coverage: f64,
    pub overall_similarity: f64,
    pub grade: Grade,
    pub reference_stats: TextStats,
    pub generated_stats: TextStats,
    pub interpretation: String,
}

/// Per-type counts of findings the parsers produced before slicing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParsedCounts {
    pub sast: usize,
    pub sca: usize,
    pub dast: usize,
}

/// The immutable payload a run hands to renderers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub results: Vec<PolicyResult>,
    pub parsed_counts: ParsedCounts,
    pub coverage: CoverageReport,
    pub timestamp: DateTime<Utc>,
    pub comparison: Option<ComparisonReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vulnerability::{Confidence, SastFinding};
    use crate::severity::Severity;

    fn finding() -> Vulnerability {
        Vulnerability::Sast(SastFinding {
            title: "SQL Injection".into(),
            severity: Severity::Critical,
            category: "SQL Injection".into(),
            file_path: "app/auth.py".into(),
            line_number: 45,
            cwe_id: Some("CWE-89".into()),
            description: "desc".into(),
            recommendation: "rec".into(),
            confidence: Confidence::High,
            owasp_category: None,
            code_snippet: None,
            metadata: Default::default(),
        })
    }

    #[test]
    fn success_sets_policy_text_not_error() {
        let r = PolicyResult::success(finding(), "POLICY...", "large", "ctx");
        assert!(r.policy_text.is_some());
        assert!(r.error.is_none());
        assert!(r.is_success());
    }

    #[test]
    fn failure_sets_error_not_policy_text() {
        let r = PolicyResult::failure(finding(), "timeout", "large", "ctx");
        assert!(r.policy_text.is_none());
        assert!(r.error.is_some());
        assert!(!r.is_success());
    }

    #[test]
    fn grade_is_monotonic_in_overall_similarity() {
        assert_eq!(Grade::from_overall_similarity(99.0), Grade::A);
        assert_eq!(Grade::from_overall_similarity(85.0), Grade::B);
        assert_eq!(Grade::from_overall_similarity(75.0), Grade::C);
        assert_eq!(Grade::from_overall_similarity(65.0), Grade::D);
        assert_eq!(Grade::from_overall_similarity(10.0), Grade::F);
        assert!(Grade::A > Grade::B && Grade::B > Grade::C && Grade::C > Grade::D && Grade::D > Grade::F);
    }

    #[test]
    fn empty_framework_coverage_has_all_gaps() {
        let ids = vec!["PR.AC-4".to_string(), "DE.CM-7".to_string()];
        let fc = FrameworkCoverage::empty(108, &ids);
        assert_eq!(fc.coverage_percentage, 0.0);
        assert!(fc.covered_controls.is_empty());
        assert_eq!(fc.gaps.len(), 2);
    }
}
