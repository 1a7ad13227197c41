//! Static, deterministic control catalogues for NIST CSF and ISO 27001
//! Annex A, generated from per-function/per-domain count tables rather
//! than hand-enumerated as a flat string literal, so the totals (108, 114)
//! stay auditable against the table they came from.

use govscan_core::Framework;

/// NIST CSF 1.1 functions, each with its categories and the number of
/// subcategories in that category. Sums to 108.
const NIST_TABLE: &[(&str, &[(&str, u32)])] = &[
    ("ID", &[("AM", 6), ("BE", 5), ("GV", 4), ("RA", 6), ("RM", 3), ("SC", 5)]),
    ("PR", &[("AC", 7), ("AT", 5), ("DS", 8), ("IP", 12), ("MA", 2), ("PT", 5)]),
    ("DE", &[("AE", 5), ("CM", 8), ("DP", 5)]),
    ("RS", &[("RP", 1), ("CO", 5), ("AN", 5), ("MI", 3), ("IM", 2)]),
    ("RC", &[("RP", 1), ("IM", 2), ("CO", 3)]),
];

/// ISO/IEC 27001:2013 Annex A domains, each with its subdomains and the
/// number of controls in that subdomain. Sums to 114.
const ISO_TABLE: &[(&str, &[(&str, u32)])] = &[
    ("5", &[("1", 2)]),
    ("6", &[("1", 5), ("2", 2)]),
    ("7", &[("1", 2), ("2", 3), ("3", 1)]),
    ("8", &[("1", 4), ("2", 3), ("3", 3)]),
    ("9", &[("1", 2), ("2", 6), ("3", 1), ("4", 5)]),
    ("10", &[("1", 2)]),
    ("11", &[("1", 6), ("2", 9)]),
    ("12", &[("1", 4), ("2", 1), ("3", 1), ("4", 4), ("5", 1), ("6", 2), ("7", 1)]),
    ("13", &[("1", 3), ("2", 4)]),
    ("14", &[("1", 3), ("2", 9), ("3", 1)]),
    ("15", &[("1", 3), ("2", 2)]),
    ("16", &[("1", 7)]),
    ("17", &[("1", 3), ("2", 1)]),
    ("18", &[("1", 5), ("2", 3)]),
];

/// The ordered list of valid control ids for a framework.
pub fn control_ids(framework: Framework) -> Vec<String> {
    match framework {
        Framework::NistCsf => nist_ids(),
        Framework::Iso27001 => iso_ids(),
    }
}

fn nist_ids() -> Vec<String> {
    let mut ids = Vec::new();
    for (function, categories) in NIST_TABLE {
        for (category, count) in *categories {
            for n in 1..=*count {
                ids.push(format!("{function}.{category}-{n}"));
            }
        }
    }
    ids
}

fn iso_ids() -> Vec<String> {
    let mut ids = Vec::new();
    for (domain, subdomains) in ISO_TABLE {
        for (subdomain, count) in *subdomains {
            for n in 1..=*count {
                ids.push(format!("A.{domain}.{subdomain}.{n}"));
            }
        }
    }
    ids
}

/// Total number of controls in a framework's catalogue.
pub fn total_controls(framework: Framework) -> usize {
    match framework {
        Framework::NistCsf => NIST_TABLE
            .iter()
            .flat_map(|(_, cats)| cats.iter())
            .map(|(_, count)| *count as usize)
            .sum(),
        Framework::Iso27001 => ISO_TABLE
            .iter()
            .flat_map(|(_, subs)| subs.iter())
            .map(|(_, count)| *count as usize)
            .sum(),
    }
}

/// NIST CSF function (`ID`, `PR`, `DE`, `RS`, `RC`) a control id belongs to,
/// derived by the two-letter prefix before the dot.
pub fn nist_group(control_id: &str) -> Option<&str> {
    control_id.split('.').next()
}

/// ISO domain (`A.5`, `A.9`, ...) a control id belongs to, derived by the
/// first two dot-separated tokens.
pub fn iso_group(control_id: &str) -> Option<String> {
    let mut parts = control_id.split('.');
    let a = parts.next()?;
    let domain = parts.next()?;
    Some(format!("{a}.{domain}"))
}
