//! Control-id extraction from generated policy text and catalogue-backed
//! coverage aggregation.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use govscan_core::{CoverageReport, FrameworkCoverage, GroupCoverage, Framework, PolicyResult};
use regex::Regex;

use crate::catalogue::{control_ids, iso_group, nist_group, total_controls};

/// Coverage analysis was invoked with no catalogue loaded for a framework.
#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    #[error("no catalogue loaded for {0}")]
    CatalogueMissing(Framework),
}

fn nist_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Z]{2}\.[A-Z]{2}-\d+\b").unwrap())
}

fn iso_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bA\.\d+(?:\.\d+){0,2}\b").unwrap())
}

/// Extract every NIST CSF-shaped id from free text, regardless of catalogue
/// validity. Deduplicated, insertion order not guaranteed.
pub fn extract_nist_ids(text: &str) -> HashSet<String> {
    nist_regex().find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Extract every ISO 27001-shaped id from free text, regardless of
/// catalogue validity.
pub fn extract_iso_ids(text: &str) -> HashSet<String> {
    iso_regex().find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Run the coverage analyser over a run's policy results.
///
/// Extraction always reads the policy text directly, never a
/// `compliance_mapping`-style field, so the metric reflects what the model
/// actually said rather than a separately (and inconsistently) populated
/// field.
///
/// Returns alongside the report any frameworks whose catalogue turned out
/// to hold zero controls — callers should surface these as warnings rather
/// than silently presenting a 0% score as if every control were missed.
pub fn analyze(results: &[PolicyResult]) -> (CoverageReport, Vec<CoverageError>) {
    let combined_text: String = results
        .iter()
        .filter_map(|r| r.policy_text.as_deref())
        .collect::<Vec<_>>()
        .join("\n");

    let mut warnings = Vec::new();
    let nist_csf = framework_coverage(
        Framework::NistCsf,
        extract_nist_ids(&combined_text),
        |id| nist_group(id).map(String::from),
        &mut warnings,
    );
    let iso_27001 = framework_coverage(
        Framework::Iso27001,
        extract_iso_ids(&combined_text),
        iso_group,
        &mut warnings,
    );

    let overall_score = (nist_csf.coverage_percentage + iso_27001.coverage_percentage) / 2.0;

    (
        CoverageReport {
            nist_csf,
            iso_27001,
            overall_score,
        },
        warnings,
    )
}

fn framework_coverage(
    framework: Framework,
    extracted: HashSet<String>,
    group_of: impl Fn(&str) -> Option<String>,
    warnings: &mut Vec<CoverageError>,
) -> FrameworkCoverage {
    let total = total_controls(framework);
    if total == 0 {
        warnings.push(CoverageError::CatalogueMissing(framework));
        return FrameworkCoverage {
            total_controls: 0,
            covered_controls: Vec::new(),
            coverage_percentage: 0.0,
            by_group: HashMap::new(),
            gaps: Vec::new(),
        };
    }

    let valid: HashSet<String> = control_ids(framework).into_iter().collect();
    let mut covered: Vec<String> = extracted.into_iter().filter(|id| valid.contains(id)).collect();
    covered.sort();

    let coverage_percentage = percentage(covered.len(), total);

    let mut group_totals: HashMap<String, usize> = HashMap::new();
    for id in &valid {
        if let Some(g) = group_of(id) {
            *group_totals.entry(g.to_string()).or_insert(0) += 1;
        }
    }
    let mut group_covered: HashMap<String, usize> = HashMap::new();
    for id in &covered {
        if let Some(g) = group_of(id) {
            *group_covered.entry(g.to_string()).or_insert(0) += 1;
        }
    }

    let mut by_group = HashMap::new();
    for (group, group_total) in &group_totals {
        let group_covered_count = group_covered.get(group).copied().unwrap_or(0);
        by_group.insert(
            group.clone(),
            GroupCoverage {
                total: *group_total,
                covered: group_covered_count,
                percentage: percentage(group_covered_count, *group_total),
            },
        );
    }

    let covered_set: HashSet<&String> = covered.iter().collect();
    let mut gaps: Vec<String> = valid.into_iter().filter(|id| !covered_set.contains(id)).collect();
    gaps.sort();

    FrameworkCoverage {
        total_controls: total,
        covered_controls: covered,
        coverage_percentage,
        by_group,
        gaps,
    }
}

fn percentage(covered: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = 100.0 * covered as f64 / total as f64;
    (raw * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use govscan_core::{Confidence, SastFinding, Severity, Vulnerability};

    fn policy(text: &str) -> PolicyResult {
        let vuln = Vulnerability::Sast(SastFinding {
            title: "t".into(),
            severity: Severity::Medium,
            category: "c".into(),
            file_path: "f".into(),
            line_number: 0,
            cwe_id: None,
            description: "d".into(),
            recommendation: String::new(),
            confidence: Confidence::Medium,
            owasp_category: None,
            code_snippet: None,
            metadata: Default::default(),
        });
        PolicyResult::success(vuln, text, "large", "ctx")
    }

    #[test]
    fn extracts_and_deduplicates_nist_ids() {
        let results = vec![policy("See PR.AC-4 and PR.AC-4 and DE.CM-7.")];
        let (report, warnings) = analyze(&results);
        let mut covered = report.nist_csf.covered_controls.clone();
        covered.sort();
        assert_eq!(covered, vec!["DE.CM-7".to_string(), "PR.AC-4".to_string()]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn discards_catalogue_invalid_ids() {
        let results = vec![policy("Mapping: A.14.2.5 and A.999.999.999.")];
        let (report, _) = analyze(&results);
        assert_eq!(report.iso_27001.covered_controls, vec!["A.14.2.5".to_string()]);
    }

    #[test]
    fn empty_results_yields_zero_coverage_no_panic() {
        let (report, warnings) = analyze(&[]);
        assert_eq!(report.nist_csf.coverage_percentage, 0.0);
        assert_eq!(report.iso_27001.coverage_percentage, 0.0);
        assert_eq!(report.overall_score, 0.0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn percentage_matches_covered_over_total() {
        let results = vec![policy("PR.AC-4 DE.CM-7")];
        let (report, _) = analyze(&results);
        let expected: f64 = (100.0f64 * 2.0 / 108.0 * 10.0).round() / 10.0;
        assert_eq!(report.nist_csf.coverage_percentage, expected);
    }
}
