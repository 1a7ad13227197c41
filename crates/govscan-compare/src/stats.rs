//! Word/character/section counts computed from the raw (non-preprocessed)
//! text, for the comparator's statistics block.

use std::sync::OnceLock;

use govscan_core::TextStats;
use regex::Regex;

fn all_caps_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[A-Z][A-Z \t]{2,}$").unwrap())
}

fn numbered_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\d+\.").unwrap())
}

fn title_colon_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[A-Za-z ]+:\s*$").unwrap())
}

pub fn compute(raw_text: &str) -> TextStats {
    let word_count = raw_text.split_whitespace().count();
    let char_count = raw_text.chars().filter(|c| !c.is_whitespace()).count();

    let section_count = all_caps_header().find_iter(raw_text).count()
        + numbered_line().find_iter(raw_text).count()
        + title_colon_line().find_iter(raw_text).count();

    TextStats {
        word_count,
        char_count,
        section_count: section_count.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_words_and_nonwhitespace_chars() {
        let stats = compute("hello world");
        assert_eq!(stats.word_count, 2);
        assert_eq!(stats.char_count, 10);
    }

    #[test]
    fn section_count_clamped_to_minimum_one() {
        let stats = compute("just a plain sentence with no headers");
        assert_eq!(stats.section_count, 1);
    }

    #[test]
    fn detects_section_heuristics() {
        let text = "POLICY IDENTIFIER\nsome text\n1. first requirement\nRisk Statement:\nmore text";
        let stats = compute(text);
        assert!(stats.section_count >= 3);
    }
}
