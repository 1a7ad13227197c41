//! Corpus-BLEU with a single reference and a single hypothesis, averaging
//! 1- through 4-gram modified precisions with a brevity penalty.

use std::collections::HashMap;

fn ngrams(tokens: &[String], n: usize) -> HashMap<Vec<&str>, usize> {
    let mut counts = HashMap::new();
    if tokens.len() < n {
        return counts;
    }
    for window in tokens.windows(n) {
        let gram: Vec<&str> = window.iter().map(String::as_str).collect();
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

fn modified_precision(reference: &[String], hypothesis: &[String], n: usize) -> (usize, usize) {
    let hyp_counts = ngrams(hypothesis, n);
    let ref_counts = ngrams(reference, n);

    let mut clipped_total = 0usize;
    let mut total = 0usize;
    for (gram, count) in &hyp_counts {
        let ref_count = ref_counts.get(gram).copied().unwrap_or(0);
        clipped_total += count.min(&ref_count);
        total += count;
    }
    (clipped_total, total)
}

/// BLEU-4 score in `[0, 1]`. Returns 0.0 if the hypothesis is empty or if
/// any n-gram order has zero possible matches (metric-library failure is
/// not fatal — it just yields 0.0, per the comparator's failure model).
pub fn bleu4(reference_tokens: &[String], hypothesis_tokens: &[String]) -> f64 {
    if hypothesis_tokens.is_empty() || reference_tokens.is_empty() {
        return 0.0;
    }

    let mut log_precision_sum = 0.0;
    for n in 1..=4 {
        let (clipped, total) = modified_precision(reference_tokens, hypothesis_tokens, n);
        if total == 0 || clipped == 0 {
            return 0.0;
        }
        log_precision_sum += (clipped as f64 / total as f64).ln();
    }
    let geometric_mean = (log_precision_sum / 4.0).exp();

    let c = hypothesis_tokens.len() as f64;
    let r = reference_tokens.len() as f64;
    let brevity_penalty = if c > r { 1.0 } else { (1.0 - r / c).exp() };

    (geometric_mean * brevity_penalty).clamp(0.0, 1.0)
}
