//! Dependency-vulnerability report parsing: npm-audit, Trivy, pip-audit.

use govscan_core::{Exploitability, ScaFinding, Severity, SeverityInput};
use serde_json::Value;

use crate::error::ParseError;

const BOM: char = '\u{feff}';

/// Parse an SCA report blob. Strips a leading UTF-8 BOM before decoding.
pub fn parse(blob: &str) -> Result<Vec<ScaFinding>, ParseError> {
    let blob = blob.strip_prefix(BOM).unwrap_or(blob);
    let root: Value =
        serde_json::from_str(blob).map_err(|e| ParseError::MalformedInput(e.to_string()))?;

    if root.get("vulnerabilities").map(Value::is_object).unwrap_or(false) {
        Ok(parse_npm_audit(&root))
    } else if root.get("Results").map(Value::is_array).unwrap_or(false) {
        Ok(parse_trivy(&root))
    } else if root.get("vulnerabilities").map(Value::is_array).unwrap_or(false) {
        Ok(parse_pip_audit(&root))
    } else {
        Err(ParseError::MalformedInput(
            "unrecognised SCA report shape".to_string(),
        ))
    }
}

fn parse_npm_audit(root: &Value) -> Vec<ScaFinding> {
    let mut findings = Vec::new();
    let Some(packages) = root["vulnerabilities"].as_object() else {
        return findings;
    };

    for (package_name, entry) in packages {
        let via = entry.get("via").and_then(Value::as_array).cloned().unwrap_or_default();
        let effects: Vec<String> = entry
            .get("effects")
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(Value::as_str).map(String::from).collect())
            .unwrap_or_default();
        let direct_dependency = !effects.iter().any(|e| e == package_name);
        let range = entry.get("range").and_then(Value::as_str).unwrap_or("").to_string();

        let (fix_available, patched_version) = match entry.get("fixAvailable") {
            Some(Value::Bool(b)) => (*b, None),
            Some(Value::Object(obj)) => (
                true,
                obj.get("version").and_then(Value::as_str).map(String::from),
            ),
            _ => (false, None),
        };

        for item in &via {
            // Scalar via entries are cross-references to advisories already
            // present elsewhere in the report; skip them.
            let Some(advisory) = item.as_object() else {
                continue;
            };

            let severity_text = advisory.get("severity").and_then(Value::as_str).unwrap_or("");
            let cvss_score = advisory
                .get("cvss")
                .and_then(|v| v.pointer("/score"))
                .and_then(Value::as_f64);
            let advisory_id = advisory
                .get("url")
                .and_then(Value::as_str)
                .map(synthesize_advisory_id)
                .unwrap_or_default();
            let description = advisory
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            let advisory_range = advisory
                .get("range")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| range.clone());

            findings.push(ScaFinding {
                package_name: package_name.clone(),
                current_version: String::new(),
                vulnerable_range: advisory_range,
                patched_version: patched_version.clone(),
                advisory_id,
                severity: Severity::normalize(SeverityInput::Text(severity_text)),
                description,
                exploitability: Exploitability::from_score(cvss_score),
                fix_available,
                direct_dependency,
                dependency_chain: vec![package_name.clone()],
                metadata: Default::default(),
            });
        }
    }

    findings
}

/// Advisory ids are synthesised from the advisory URL's final path segment.
fn synthesize_advisory_id(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}

fn parse_trivy(root: &Value) -> Vec<ScaFinding> {
    let mut findings = Vec::new();
    let Some(results) = root["Results"].as_array() else {
        return findings;
    };

    for result in results {
        let Some(vulns) = result.get("Vulnerabilities").and_then(Value::as_array) else {
            continue;
        };
        for v in vulns {
            let fixed_version = v.get("FixedVersion").and_then(Value::as_str).map(String::from);
            let vulnerable_range = match &fixed_version {
                Some(fv) => format!("<{fv}"),
                None => "all".to_string(),
            };
            let cvss_score = v
                .pointer("/CVSS/nvd/V3Score")
                .or_else(|| v.pointer("/CVSS/nvd/V2Score"))
                .and_then(Value::as_f64);

            findings.push(ScaFinding {
                package_name: v.get("PkgName").and_then(Value::as_str).unwrap_or("").to_string(),
                current_version: v
                    .get("InstalledVersion")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                vulnerable_range,
                patched_version: fixed_version,
                advisory_id: v
                    .get("VulnerabilityID")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                severity: Severity::normalize(SeverityInput::Text(
                    v.get("Severity").and_then(Value::as_str).unwrap_or(""),
                )),
                description: v
                    .get("Description")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                exploitability: Exploitability::from_score(cvss_score),
                fix_available: v.get("FixedVersion").is_some(),
                // Trivy doesn't surface the dependency graph; direct/transitive
                // distinction is unavailable and set to direct per the dialect.
                direct_dependency: true,
                dependency_chain: vec![v
                    .get("PkgName")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string()],
                metadata: Default::default(),
            });
        }
    }

    findings
}

fn parse_pip_audit(root: &Value) -> Vec<ScaFinding> {
    let rows = root["vulnerabilities"].as_array().cloned().unwrap_or_default();
    rows.iter()
        .map(|v| {
            let fix_versions: Vec<String> = v
                .get("fix_versions")
                .and_then(Value::as_array)
                .map(|a| a.iter().filter_map(Value::as_str).map(String::from).collect())
                .unwrap_or_default();
            let patched_version = fix_versions.first().cloned();

            ScaFinding {
                package_name: v.get("name").and_then(Value::as_str).unwrap_or("").to_string(),
                current_version: v.get("version").and_then(Value::as_str).unwrap_or("").to_string(),
                vulnerable_range: String::new(),
                patched_version: patched_version.clone(),
                advisory_id: v.get("id").and_then(Value::as_str).unwrap_or("").to_string(),
                severity: Severity::Medium,
                description: v
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                exploitability: Exploitability::Unknown,
                fix_available: patched_version.is_some(),
                direct_dependency: true,
                dependency_chain: vec![v.get("name").and_then(Value::as_str).unwrap_or("").to_string()],
                metadata: Default::default(),
            }
        })
        .collect()
}
