//! Fixed security-vocabulary set used by the lexicon-coverage metric.

pub const SECURITY_TERMS: &[&str] = &[
    "authentication",
    "authorisation",
    "authorization",
    "access control",
    "encryption",
    "vulnerability",
    "patch",
    "firewall",
    "injection",
    "xss",
    "csrf",
    "compliance",
    "audit",
    "monitoring",
    "logging",
    "certificate",
    "tls",
    "ssl",
    "malware",
    "phishing",
    "exploit",
    "remediation",
    "risk assessment",
    "incident response",
    "data breach",
    "penetration testing",
    "threat model",
    "least privilege",
    "segregation of duties",
    "password policy",
    "multi-factor",
    "session management",
    "input validation",
    "sanitisation",
    "sanitization",
    "cryptography",
    "hashing",
    "key management",
    "backup",
    "disaster recovery",
    "business continuity",
    "asset management",
    "configuration management",
    "patch management",
    "vulnerability scanning",
    "security policy",
    "governance",
    "data classification",
    "network segmentation",
    "intrusion detection",
    "intrusion prevention",
    "security awareness",
    "third-party risk",
    "supply chain",
    "zero trust",
    "least functionality",
    "change management",
    "access review",
    "role-based access",
    "endpoint protection",
    "secure coding",
];

/// Fraction of the reference's lexicon terms that also appear in the
/// generated text. Vacuously `1.0` when the reference contains none of the
/// listed terms at all.
pub fn coverage(reference_preprocessed: &str, generated_preprocessed: &str) -> f64 {
    let reference_terms: Vec<&str> = SECURITY_TERMS
        .iter()
        .filter(|t| reference_preprocessed.contains(*t))
        .copied()
        .collect();

    if reference_terms.is_empty() {
        return 1.0;
    }

    let matched = reference_terms
        .iter()
        .filter(|t| generated_preprocessed.contains(*t))
        .count();

    matched as f64 / reference_terms.len() as f64
}
