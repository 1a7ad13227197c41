//! The policy comparator: BLEU-4, ROUGE-L, and security-lexicon coverage
//! combined into a weighted similarity score and letter grade.

pub mod bleu;
pub mod error;
pub mod interpretation;
pub mod lexicon;
pub mod preprocess;
pub mod rouge;
pub mod stats;

pub use error::CompareError;

use govscan_core::{ComparisonReport, Grade};

const MIN_LENGTH: usize = 50;
const BLEU_WEIGHT: f64 = 0.4;
const ROUGE_WEIGHT: f64 = 0.4;
const LEXICON_WEIGHT: f64 = 0.2;

/// Compare a reference policy text against the concatenation of generated
/// `policy_text`s (callers join them with a blank line before calling).
pub fn compare(reference_text: &str, generated_text: &str) -> Result<ComparisonReport, CompareError> {
    if reference_text.trim().len() < MIN_LENGTH || generated_text.trim().len() < MIN_LENGTH {
        return Err(CompareError::TooShort);
    }

    let reference_pre = preprocess::preprocess(reference_text);
    let generated_pre = preprocess::preprocess(generated_text);
    let reference_tokens = preprocess::tokenize(&reference_pre);
    let generated_tokens = preprocess::tokenize(&generated_pre);

    let bleu_score = bleu::bleu4(&reference_tokens, &generated_tokens);
    let rouge_l_fmeasure = rouge::rouge_l(&reference_tokens, &generated_tokens);
    let key_terms_coverage = lexicon::coverage(&reference_pre, &generated_pre);

    let overall_similarity =
        100.0 * (BLEU_WEIGHT * bleu_score + ROUGE_WEIGHT * rouge_l_fmeasure + LEXICON_WEIGHT * key_terms_coverage);
    let grade = Grade::from_overall_similarity(overall_similarity);

    let reference_stats = stats::compute(reference_text);
    let generated_stats = stats::compute(generated_text);

    let interpretation = interpretation::build(overall_similarity, bleu_score, rouge_l_fmeasure, key_terms_coverage);

    Ok(ComparisonReport {
        bleu_score,
        rouge_l_fmeasure,
        key_terms_coverage,
        overall_similarity,
        grade,
        reference_stats,
        generated_stats,
        interpretation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "POLICY IDENTIFIER: GOV-0001\n\nRISK STATEMENT: This finding exposes the application to unauthorised access through weak authentication and missing encryption controls, creating a vulnerability that requires immediate patching and ongoing monitoring.";

    #[test]
    fn rejects_text_under_fifty_characters() {
        let err = compare("short", SAMPLE).unwrap_err();
        assert!(matches!(err, CompareError::TooShort));
    }

    #[test]
    fn reflexive_comparison_scores_near_ceiling() {
        let report = compare(SAMPLE, SAMPLE).unwrap();
        assert!(report.bleu_score >= 0.99);
        assert!(report.rouge_l_fmeasure >= 0.99);
        assert!(report.overall_similarity >= 99.0);
        assert_eq!(report.grade, Grade::A);
    }

    #[test]
    fn all_metrics_are_bounded() {
        let other = "This document discusses quarterly gardening schedules and has nothing to do with security at all, just flowers and soil composition notes.";
        let report = compare(SAMPLE, other).unwrap();
        assert!((0.0..=1.0).contains(&report.bleu_score));
        assert!((0.0..=1.0).contains(&report.rouge_l_fmeasure));
        assert!((0.0..=1.0).contains(&report.key_terms_coverage));
        assert!((0.0..=100.0).contains(&report.overall_similarity));
    }
}
