//! Cookie header parsing and `Set-Cookie` construction for the session cookie.

use axum::http::{header, HeaderMap};
use std::collections::HashMap;

/// Name of the cookie carrying the session credential.
pub const SESSION_COOKIE: &str = "token";

/// Parse a `Cookie` header value into a name → value map.
///
/// Pairs are separated by `;`. Whitespace around names and values is
/// trimmed, values may contain `=`, and entries without `=` are ignored.
/// When a name repeats, the first occurrence wins.
pub fn parse_cookie_header(raw: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for pair in raw.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        cookies
            .entry(name.to_string())
            .or_insert_with(|| value.trim().to_string());
    }
    cookies
}

/// Collect cookies from every `Cookie` header on the request.
pub fn cookies_from_headers(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else {
            continue;
        };
        for (name, value) in parse_cookie_header(raw) {
            cookies.entry(name).or_insert(value);
        }
    }
    cookies
}

/// The session token presented by the client, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    cookies_from_headers(headers)
        .remove(SESSION_COOKIE)
        .filter(|token| !token.is_empty())
}

/// Attributes shared by the session cookie and its removal.
#[derive(Debug, Clone, Copy)]
pub struct CookieOptions {
    pub secure: bool,
}

/// `Set-Cookie` value that stores `token` for `max_age_secs` seconds.
pub fn build_session_cookie(token: &str, max_age_secs: i64, options: CookieOptions) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}"
    );
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn build_clear_cookie(options: CookieOptions) -> String {
    build_session_cookie("", 0, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn parses_semicolon_separated_pairs() {
        let cookies = parse_cookie_header("theme=dark; token=abc.def.ghi;lang=en");
        assert_eq!(cookies.get("token").map(String::as_str), Some("abc.def.ghi"));
        assert_eq!(cookies.get("theme").map(String::as_str), Some("dark"));
        assert_eq!(cookies.get("lang").map(String::as_str), Some("en"));
    }

    #[test]
    fn keeps_equals_signs_inside_values() {
        let cookies = parse_cookie_header("token=a=b==");
        assert_eq!(cookies.get("token").map(String::as_str), Some("a=b=="));
    }

    #[test]
    fn ignores_malformed_entries() {
        let cookies = parse_cookie_header("garbage; =orphan; ; token=t");
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies.get("token").map(String::as_str), Some("t"));
    }

    #[test]
    fn empty_header_yields_no_cookies() {
        assert!(parse_cookie_header("").is_empty());
    }

    #[test]
    fn first_occurrence_wins() {
        let cookies = parse_cookie_header("token=first; token=second");
        assert_eq!(cookies.get("token").map(String::as_str), Some("first"));
    }

    #[test]
    fn reads_token_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(header::COOKIE, HeaderValue::from_static("token=xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn empty_token_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token="));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn builds_session_and_clear_cookies() {
        let options = CookieOptions { secure: false };
        assert_eq!(
            build_session_cookie("abc", 86400, options),
            "token=abc; HttpOnly; SameSite=Lax; Path=/; Max-Age=86400"
        );
        assert_eq!(
            build_clear_cookie(options),
            "token=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0"
        );
        assert!(build_session_cookie("abc", 60, CookieOptions { secure: true }).ends_with("; Secure"));
    }
}
