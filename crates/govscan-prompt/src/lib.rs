//! System and user prompt construction.
//!
//! Two templates: a fixed system prompt establishing the policy-writer
//! role and the six-section output skeleton, and a user-prompt builder
//! that interpolates a vulnerability's fields, the formatted compliance
//! context, and its severity. Neither template is ever parsed back into
//! structure — downstream code only scans the model's free text for
//! control identifiers.

use govscan_core::Vulnerability;

pub const SYSTEM_PROMPT: &str = r#"You are a governance, risk, and compliance policy writer embedded in an automated security pipeline. You will be given one normalised vulnerability finding and a block of relevant compliance-framework excerpts retrieved for that finding.

Write a single governance policy document addressing this finding. Your response MUST be a plain-text document containing exactly these section headers, in this order:

POLICY IDENTIFIER
RISK STATEMENT
COMPLIANCE MAPPING
POLICY REQUIREMENTS
REMEDIATION PLAN
MONITORING

Under COMPLIANCE MAPPING, cite specific control identifiers from the supplied compliance context where they apply (e.g. "PR.AC-4", "A.9.1.1"). Do not invent control identifiers that were not supplied in the context. Do not wrap the output in JSON, markdown code fences, or any other structured container — plain text with the section headers above is the only contract."#;

/// Build the user prompt for one vulnerability.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build_user_prompt(vuln: &Vulnerability, compliance_context: &str) -> String {
        let severity = vuln.severity();
        let kind = vuln.kind();
        let title = vuln.title();
        let category = vuln.category();
        let description = vuln.description();
        let cwe = vuln.cwe_id().unwrap_or("none");

        format!(
            r#"## Finding

- Type: {kind}
- Title: {title}
- Category: {category}
- Severity: {severity}
- CWE: {cwe}
- Description: {description}

## Relevant Compliance Framework Excerpts

{compliance_context}

## Task

Write the governance policy document for this finding following the section
skeleton given in your instructions. Ground the COMPLIANCE MAPPING section in
the excerpts above; if no excerpts were retrieved, note that explicitly
rather than fabricating control identifiers."#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govscan_core::{Confidence, SastFinding, Severity};

    fn sast() -> Vulnerability {
        Vulnerability::Sast(SastFinding {
            title: "SQL Injection".into(),
            severity: Severity::Critical,
            category: "SQL Injection".into(),
            file_path: "app/auth.py".into(),
            line_number: 45,
            cwe_id: Some("CWE-89".into()),
            description: "User input concatenated into SQL query".into(),
            recommendation: String::new(),
            confidence: Confidence::High,
            owasp_category: None,
            code_snippet: None,
            metadata: Default::default(),
        })
    }

    #[test]
    fn system_prompt_names_all_six_sections() {
        for section in [
            "POLICY IDENTIFIER",
            "RISK STATEMENT",
            "COMPLIANCE MAPPING",
            "POLICY REQUIREMENTS",
            "REMEDIATION PLAN",
            "MONITORING",
        ] {
            assert!(SYSTEM_PROMPT.contains(section));
        }
    }

    #[test]
    fn user_prompt_interpolates_finding_fields() {
        let prompt = PromptBuilder::build_user_prompt(&sast(), "[1] NIST_CSF PR.AC-4: Access — ...");
        assert!(prompt.contains("SQL Injection"));
        assert!(prompt.contains("CWE-89"));
        assert!(prompt.contains("CRITICAL"));
        assert!(prompt.contains("PR.AC-4"));
    }
}
