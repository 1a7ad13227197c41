//! Fixed-template interpretation text, composed from four short rubrics.
//! No NLG — every sentence is a literal template filled with the score.

fn overall_band(overall: f64) -> &'static str {
    if overall >= 90.0 {
        "The generated policy is highly similar to the reference."
    } else if overall >= 70.0 {
        "The generated policy is moderately similar to the reference."
    } else if overall >= 50.0 {
        "The generated policy shows limited similarity to the reference."
    } else {
        "The generated policy diverges substantially from the reference."
    }
}

fn bleu_band(bleu: f64) -> &'static str {
    if bleu >= 0.5 {
        "N-gram precision (BLEU-4) indicates strong phrase-level overlap."
    } else if bleu >= 0.2 {
        "N-gram precision (BLEU-4) indicates some phrase-level overlap."
    } else {
        "N-gram precision (BLEU-4) indicates little phrase-level overlap."
    }
}

fn rouge_band(rouge: f64) -> &'static str {
    if rouge >= 0.5 {
        "Sequence overlap (ROUGE-L) indicates strong structural alignment."
    } else if rouge >= 0.2 {
        "Sequence overlap (ROUGE-L) indicates partial structural alignment."
    } else {
        "Sequence overlap (ROUGE-L) indicates weak structural alignment."
    }
}

fn lexicon_band(lexicon: f64) -> &'static str {
    if lexicon >= 0.8 {
        "Most security terminology from the reference is present in the generated policy."
    } else if lexicon >= 0.4 {
        "Some security terminology from the reference is missing from the generated policy."
    } else {
        "Much of the reference's security terminology is absent from the generated policy."
    }
}

pub fn build(overall: f64, bleu: f64, rouge: f64, lexicon: f64) -> String {
    format!(
        "{} {} {} {}",
        overall_band(overall),
        bleu_band(bleu),
        rouge_band(rouge),
        lexicon_band(lexicon)
    )
}
