//! Dynamic-application-testing report parsing: ZAP markup export, Nuclei
//! JSON, and a generic JSON fallback.

use govscan_core::{Confidence, DastFinding, HttpMethod, Severity, SeverityInput};
use serde::Deserialize;
use serde_json::Value;

use crate::endpoint::canonicalize;
use crate::error::ParseError;

/// Parse a DAST report blob, sniffing markup vs. JSON by its first
/// non-whitespace character.
pub fn parse(blob: &str) -> Result<Vec<DastFinding>, ParseError> {
    let trimmed = blob.trim();
    if trimmed.starts_with('<') {
        parse_zap(trimmed)
    } else {
        let root: Value = serde_json::from_str(trimmed)
            .map_err(|e| ParseError::MalformedInput(e.to_string()))?;
        if root.is_array() {
            Ok(parse_nuclei(&root))
        } else if root.get("vulnerabilities").is_some() {
            Ok(parse_generic(&root))
        } else {
            Err(ParseError::MalformedInput(
                "unrecognised DAST JSON shape".to_string(),
            ))
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
struct ZapReport {
    #[serde(default)]
    site: Vec<ZapSite>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
struct ZapSite {
    #[serde(default)]
    alerts: ZapAlerts,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
struct ZapAlerts {
    #[serde(default, rename = "alertitem")]
    alertitem: Vec<ZapAlertItem>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
struct ZapAlertItem {
    #[serde(default)]
    pluginid: String,
    #[serde(default)]
    alert: String,
    #[serde(default)]
    riskcode: i64,
    #[serde(default)]
    confidence: i64,
    #[serde(default)]
    cweid: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    solution: String,
    #[serde(default)]
    instances: ZapInstances,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
struct ZapInstances {
    #[serde(default, rename = "instance")]
    instance: Vec<ZapInstance>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
struct ZapInstance {
    #[serde(default)]
    uri: String,
    #[serde(default)]
    method: String,
    #[serde(default)]
    evidence: String,
}

fn zap_confidence(code: i64) -> Confidence {
    match code {
        3 => Confidence::High,
        2 => Confidence::Medium,
        1 => Confidence::Low,
        _ => Confidence::Medium,
    }
}

fn parse_zap(xml: &str) -> Result<Vec<DastFinding>, ParseError> {
    let report: ZapReport =
        quick_xml::de::from_str(xml).map_err(|e| ParseError::MalformedInput(e.to_string()))?;

    let mut findings = Vec::new();
    for site in &report.site {
        for item in &site.alerts.alertitem {
            let cwe_id = (!item.cweid.is_empty() && item.cweid != "0")
                .then(|| format!("CWE-{}", item.cweid));

            // Each alert expands into one finding per instance so the
            // per-URI method/evidence is preserved.
            for instance in &item.instances.instance {
                findings.push(DastFinding {
                    url: instance.uri.clone(),
                    endpoint: canonicalize(&instance.uri),
                    method: HttpMethod::from_str_or_get(&instance.method),
                    issue_type: item.alert.clone(),
                    risk_level: Severity::normalize(SeverityInput::Code(item.riskcode)),
                    confidence: zap_confidence(item.confidence),
                    cwe_id: cwe_id.clone(),
                    description: item.desc.clone(),
                    solution: item.solution.clone(),
                    evidence: instance.evidence.clone(),
                    metadata: {
                        let mut m = govscan_core::Metadata::new();
                        m.insert("pluginid".to_string(), Value::String(item.pluginid.clone()));
                        m
                    },
                });
            }
        }
    }

    Ok(findings)
}

fn infer_method_from_curl(curl_command: &str) -> HttpMethod {
    if curl_command.contains("-X POST") {
        HttpMethod::Post
    } else if curl_command.contains("-X PUT") {
        HttpMethod::Put
    } else if curl_command.contains("-X DELETE") {
        HttpMethod::Delete
    } else {
        HttpMethod::Get
    }
}

fn parse_nuclei(root: &Value) -> Vec<DastFinding> {
    let items = root.as_array().cloned().unwrap_or_default();
    items
        .iter()
        .map(|item| {
            let severity_text = item
                .pointer("/info/severity")
                .and_then(Value::as_str)
                .unwrap_or("");
            let cwe_id = item
                .pointer("/info/classification/cwe-id")
                .and_then(Value::as_array)
                .and_then(|a| a.first())
                .and_then(Value::as_str)
                .map(String::from);
            let url = item
                .get("matched-at")
                .and_then(Value::as_str)
                .or_else(|| item.get("host").and_then(Value::as_str))
                .unwrap_or("")
                .to_string();
            let curl_command = item.get("curl-command").and_then(Value::as_str).unwrap_or("");
            let issue_type = item
                .get("template-id")
                .and_then(Value::as_str)
                .or_else(|| item.pointer("/info/name").and_then(Value::as_str))
                .unwrap_or("")
                .to_string();
            let evidence = item
                .get("extracted-results")
                .map(|v| v.to_string())
                .unwrap_or_default();
            let description = item
                .pointer("/info/description")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();

            DastFinding {
                endpoint: canonicalize(&url),
                url,
                method: infer_method_from_curl(curl_command),
                issue_type,
                risk_level: Severity::normalize(SeverityInput::Text(severity_text)),
                confidence: Confidence::Medium,
                cwe_id,
                description,
                solution: String::new(),
                evidence,
                metadata: Default::default(),
            }
        })
        .collect()
}

fn parse_generic(root: &Value) -> Vec<DastFinding> {
    let items = root["vulnerabilities"].as_array().cloned().unwrap_or_default();
    items
        .iter()
        .map(|item| {
            let url = item.get("url").and_then(Value::as_str).unwrap_or("").to_string();
            DastFinding {
                endpoint: canonicalize(&url),
                url,
                method: HttpMethod::from_str_or_get(
                    item.get("method").and_then(Value::as_str).unwrap_or("GET"),
                ),
                issue_type: item
                    .get("issue_type")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                risk_level: Severity::normalize(SeverityInput::Text(
                    item.get("risk_level").and_then(Value::as_str).unwrap_or(""),
                )),
                confidence: Confidence::Medium,
                cwe_id: item.get("cwe_id").and_then(Value::as_str).map(String::from),
                description: item
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                solution: item.get("solution").and_then(Value::as_str).unwrap_or("").to_string(),
                evidence: item.get("evidence").and_then(Value::as_str).unwrap_or("").to_string(),
                metadata: Default::default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZAP_SAMPLE: &str = r#"<?xml version="1.0"?>
    <OWASPZAPReport>
        <site>
            <alerts>
                <alertitem>
                    <pluginid>40018</pluginid>
                    <alert>SQL Injection</alert>
                    <riskcode>3</riskcode>
                    <confidence>2</confidence>
                    <cweid>89</cweid>
                    <desc>SQL injection detected</desc>
                    <solution>Use parameterised queries</solution>
                    <instances>
                        <instance>
                            <uri>https://x/api/users/123/posts/abc-def-0123-4567-8901-2345-6789-abcd</uri>
                            <method>GET</method>
                            <evidence>ev1</evidence>
                        </instance>
                        <instance>
                            <uri>https://x/api/users/456</uri>
                            <method>GET</method>
                            <evidence>ev2</evidence>
                        </instance>
                        <instance>
                            <uri>https://x/search?q=t</uri>
                            <method>GET</method>
                            <evidence>ev3</evidence>
                        </instance>
                    </instances>
                </alertitem>
            </alerts>
        </site>
    </OWASPZAPReport>"#;

    #[test]
    fn zap_expands_one_finding_per_instance() {
        let findings = parse(ZAP_SAMPLE).unwrap();
        assert_eq!(findings.len(), 3);
        assert_eq!(findings[0].endpoint, "/api/users/{id}/posts/{uuid}");
        assert_eq!(findings[1].endpoint, "/api/users/{id}");
        assert_eq!(findings[2].endpoint, "/search");
        assert!(findings.iter().all(|f| f.issue_type == "SQL Injection"));
        assert!(findings.iter().all(|f| f.cwe_id.as_deref() == Some("CWE-89")));
        assert_eq!(findings[0].risk_level, Severity::High);
    }

    #[test]
    fn nuclei_infers_method_from_curl() {
        let blob = r#"[{
            "info": {"severity": "medium", "classification": {"cwe-id": ["CWE-352"]}},
            "matched-at": "https://x/api/submit",
            "curl-command": "curl -X POST https://x/api/submit",
            "template-id": "csrf-check"
        }]"#;
        let findings = parse(blob).unwrap();
        assert_eq!(findings[0].method, HttpMethod::Post);
        assert_eq!(findings[0].risk_level, Severity::Medium);
    }

    #[test]
    fn malformed_blob_is_malformed_input() {
        assert!(parse("{not valid").is_err());
    }
}
