//! Static-analysis report parsing: format detection across Semgrep,
//! SonarQube, and Bandit dialects, plus a generic-row fallback.

use govscan_core::{Confidence, SastFinding, Severity, SeverityInput};
use serde_json::Value;

use crate::error::ParseError;

const SNIPPET_HEAD_LINES: usize = 10;
const SNIPPET_TAIL_LINES: usize = 10;

/// CWE number → human category, used when neither the check id nor the
/// message yields a keyword match.
const CWE_CATEGORY_TABLE: &[(&str, &str)] = &[
    ("CWE-89", "SQL Injection"),
    ("CWE-79", "Cross-Site Scripting"),
    ("CWE-22", "Path Traversal"),
    ("CWE-78", "Command Injection"),
    ("CWE-502", "Insecure Deserialization"),
    ("CWE-798", "Hardcoded Credentials"),
    ("CWE-327", "Weak Cryptography"),
];

const KEYWORD_CATEGORY_TABLE: &[(&str, &str)] = &[
    ("sql-injection", "SQL Injection"),
    ("sqli", "SQL Injection"),
    ("xss", "Cross-Site Scripting"),
    ("path-traversal", "Path Traversal"),
    ("command-injection", "Command Injection"),
    ("deserialization", "Insecure Deserialization"),
    ("hardcoded", "Hardcoded Credentials"),
    ("crypto", "Weak Cryptography"),
    ("csrf", "Cross-Site Request Forgery"),
    ("ssrf", "Server-Side Request Forgery"),
];

const DEFAULT_CATEGORY: &str = "Code Security Issue";

/// Parse a SAST report blob, detecting the dialect by its JSON shape.
pub fn parse(blob: &str) -> Result<Vec<SastFinding>, ParseError> {
    let root: Value =
        serde_json::from_str(blob).map_err(|e| ParseError::MalformedInput(e.to_string()))?;

    if root.get("results").and_then(Value::as_array).is_some() {
        parse_semgrep(&root)
    } else if root.get("issues").and_then(Value::as_array).is_some() {
        parse_sonarqube(&root)
    } else if root.get("errors").and_then(Value::as_array).is_some() {
        parse_bandit(&root)
    } else {
        parse_generic(&root)
    }
}

fn parse_semgrep(root: &Value) -> Result<Vec<SastFinding>, ParseError> {
    let results = root["results"].as_array().cloned().unwrap_or_default();
    Ok(results
        .iter()
        .map(|r| {
            let check_id = r.get("check_id").and_then(Value::as_str).unwrap_or("");
            let message = r
                .pointer("/extra/message")
                .and_then(Value::as_str)
                .unwrap_or("");
            let severity_text = r
                .pointer("/extra/severity")
                .and_then(Value::as_str)
                .unwrap_or("");
            let cwe_list = r.pointer("/extra/metadata/cwe");
            let cwe_id = first_cwe(cwe_list);
            let line = r
                .pointer("/start/line")
                .and_then(Value::as_u64)
                .unwrap_or(0) as u32;
            let snippet = r.pointer("/extra/lines").and_then(Value::as_str);
            let owasp = r
                .pointer("/extra/metadata/owasp")
                .and_then(Value::as_array)
                .and_then(|a| a.first())
                .and_then(Value::as_str)
                .map(String::from);

            build_finding(
                check_id,
                message,
                severity_text,
                cwe_id.as_deref(),
                r.get("path").and_then(Value::as_str).unwrap_or(""),
                line,
                snippet,
                owasp,
            )
        })
        .collect())
}

fn parse_sonarqube(root: &Value) -> Result<Vec<SastFinding>, ParseError> {
    let issues = root["issues"].as_array().cloned().unwrap_or_default();
    Ok(issues
        .iter()
        .map(|i| {
            let rule = i.get("rule").and_then(Value::as_str).unwrap_or("");
            let message = i.get("message").and_then(Value::as_str).unwrap_or("");
            let severity_text = i.get("severity").and_then(Value::as_str).unwrap_or("");
            let line = i
                .pointer("/textRange/startLine")
                .and_then(Value::as_u64)
                .unwrap_or(0) as u32;
            let component = i.get("component").and_then(Value::as_str).unwrap_or("");

            build_finding(rule, message, severity_text, None, component, line, None, None)
        })
        .collect())
}

fn parse_bandit(root: &Value) -> Result<Vec<SastFinding>, ParseError> {
    let results = root.get("results").and_then(Value::as_array);
    let items = results
        .or_else(|| root.get("errors").and_then(Value::as_array))
        .cloned()
        .unwrap_or_default();
    Ok(items
        .iter()
        .map(|r| {
            let test_id = r.get("test_id").and_then(Value::as_str).unwrap_or("");
            let issue_text = r.get("issue_text").and_then(Value::as_str).unwrap_or("");
            let severity_text = r
                .get("issue_severity")
                .and_then(Value::as_str)
                .unwrap_or("");
            let cwe_id = r
                .pointer("/issue_cwe/id")
                .and_then(Value::as_u64)
                .map(|n| format!("CWE-{n}"));
            let line = r.get("line_number").and_then(Value::as_u64).unwrap_or(0) as u32;
            let filename = r.get("filename").and_then(Value::as_str).unwrap_or("");
            let snippet = r.get("code").and_then(Value::as_str);

            build_finding(
                test_id,
                issue_text,
                severity_text,
                cwe_id.as_deref(),
                filename,
                line,
                snippet,
                None,
            )
        })
        .collect())
}

fn parse_generic(root: &Value) -> Result<Vec<SastFinding>, ParseError> {
    let rows = root.as_array().cloned().unwrap_or_default();
    Ok(rows
        .iter()
        .map(|r| {
            let check_id = r.get("check_id").and_then(Value::as_str).unwrap_or("");
            let message = r.get("message").and_then(Value::as_str).unwrap_or("");
            let severity_text = r.get("severity").and_then(Value::as_str).unwrap_or("");
            let line = r.get("line").and_then(Value::as_u64).unwrap_or(0) as u32;
            let path = r.get("path").and_then(Value::as_str).unwrap_or("");

            build_finding(check_id, message, severity_text, None, path, line, None, None)
        })
        .collect())
}

fn first_cwe(list: Option<&Value>) -> Option<String> {
    list.and_then(Value::as_array)
        .and_then(|a| a.first())
        .and_then(Value::as_str)
        .map(String::from)
}

fn resolve_category(check_id: &str, message: &str, cwe_id: Option<&str>) -> String {
    let lower_check = check_id.to_lowercase();
    for (keyword, category) in KEYWORD_CATEGORY_TABLE {
        if lower_check.contains(keyword) {
            return category.to_string();
        }
    }
    if let Some(cwe) = cwe_id {
        for (cwe_key, category) in CWE_CATEGORY_TABLE {
            if cwe.eq_ignore_ascii_case(cwe_key) {
                return category.to_string();
            }
        }
    }
    let lower_message = message.to_lowercase();
    for (keyword, category) in KEYWORD_CATEGORY_TABLE {
        if lower_message.contains(keyword) {
            return category.to_string();
        }
    }
    DEFAULT_CATEGORY.to_string()
}

fn truncate_snippet(snippet: &str) -> String {
    let lines: Vec<&str> = snippet.lines().collect();
    if lines.len() <= SNIPPET_HEAD_LINES + SNIPPET_TAIL_LINES {
        return snippet.to_string();
    }
    let head = &lines[..SNIPPET_HEAD_LINES];
    let tail = &lines[lines.len() - SNIPPET_TAIL_LINES..];
    let mut out = head.join("\n");
    out.push_str("\n... (truncated) ...\n");
    out.push_str(&tail.join("\n"));
    out
}

#[allow(clippy::too_many_arguments)]
fn build_finding(
    check_id: &str,
    message: &str,
    severity_text: &str,
    cwe_id: Option<&str>,
    file_path: &str,
    line_number: u32,
    snippet: Option<&str>,
    owasp_category: Option<String>,
) -> SastFinding {
    let category = resolve_category(check_id, message, cwe_id);
    SastFinding {
        title: if check_id.is_empty() {
            category.clone()
        } else {
            check_id.to_string()
        },
        severity: Severity::normalize(SeverityInput::Text(severity_text)),
        category,
        file_path: file_path.to_string(),
        line_number,
        cwe_id: cwe_id.map(String::from),
        description: message.to_string(),
        recommendation: String::new(),
        confidence: Confidence::Medium,
        owasp_category,
        code_snippet: snippet.map(truncate_snippet),
        metadata: Default::default(),
    }
}
