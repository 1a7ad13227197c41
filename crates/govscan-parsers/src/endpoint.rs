//! Endpoint canonicalisation shared by every DAST dialect.

use regex::Regex;
use std::sync::OnceLock;

fn numeric_id() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/\d+").unwrap())
}

fn uuid_like() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 32+ hex-or-dash characters, the way UUIDs and similar opaque run ids show up in paths.
    RE.get_or_init(|| Regex::new(r"[0-9a-fA-F-]{32,}").unwrap())
}

/// Reduce a full URL to a canonical path: numeric path segments collapse to
/// `{id}`, long hex-or-dash runs collapse to `{uuid}`, and an empty path
/// collapses to `/`.
pub fn canonicalize(url: &str) -> String {
    let path = path_only(url);
    let path = numeric_id().replace_all(&path, "/{id}");
    let path = uuid_like().replace_all(&path, "{uuid}");
    if path.is_empty() {
        "/".to_string()
    } else {
        path.into_owned()
    }
}

fn path_only(url: &str) -> String {
    let without_scheme = url.splitn(2, "://").nth(1).unwrap_or(url);
    let after_host = without_scheme.splitn(2, '/').nth(1);
    let path_and_query = match after_host {
        Some(rest) => format!("/{rest}"),
        None => "/".to_string(),
    };
    path_and_query
        .splitn(2, '?')
        .next()
        .unwrap_or("/")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_numeric_ids_and_uuid_runs() {
        assert_eq!(
            canonicalize("https://x/api/users/123/posts/abc-def-0123-4567-8901-2345-6789-abcd"),
            "/api/users/{id}/posts/{uuid}"
        );
        assert_eq!(canonicalize("https://x/api/users/456"), "/api/users/{id}");
    }

    #[test]
    fn strips_query_string() {
        assert_eq!(canonicalize("https://x/search?q=t"), "/search");
    }

    #[test]
    fn empty_path_collapses_to_root() {
        assert_eq!(canonicalize("https://x"), "/");
        assert_eq!(canonicalize("https://x/"), "/");
    }
}
