//! ROUGE-L: F-measure over the longest common subsequence of stemmed
//! tokens.

use rust_stemmers::{Algorithm, Stemmer};

const BETA: f64 = 1.2;

fn stem_all(tokens: &[String]) -> Vec<String> {
    let stemmer = Stemmer::create(Algorithm::English);
    tokens.iter().map(|t| stemmer.stem(t).to_string()).collect()
}

fn lcs_len(a: &[String], b: &[String]) -> usize {
    let (n, m) = (a.len(), b.len());
    if n == 0 || m == 0 {
        return 0;
    }
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }
    dp[n][m]
}

/// ROUGE-L F-measure in `[0, 1]`.
pub fn rouge_l(reference_tokens: &[String], hypothesis_tokens: &[String]) -> f64 {
    if reference_tokens.is_empty() || hypothesis_tokens.is_empty() {
        return 0.0;
    }

    let reference = stem_all(reference_tokens);
    let hypothesis = stem_all(hypothesis_tokens);

    let lcs = lcs_len(&reference, &hypothesis) as f64;
    let recall = lcs / reference.len() as f64;
    let precision = lcs / hypothesis.len() as f64;

    if recall + precision == 0.0 {
        return 0.0;
    }

    let beta_sq = BETA * BETA;
    ((1.0 + beta_sq) * recall * precision / (recall + beta_sq * precision)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn identical_texts_score_near_one() {
        let t = toks("access control policies must be established and reviewed regularly");
        assert!(rouge_l(&t, &t) >= 0.99);
    }

    #[test]
    fn stemming_matches_inflected_forms() {
        let r = toks("the system monitors connections continuously");
        let h = toks("the system monitored connection continuous");
        assert!(rouge_l(&r, &h) > 0.8);
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(rouge_l(&[], &toks("something")), 0.0);
    }
}
