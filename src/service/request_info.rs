//! Client details taken from request headers.

use axum::http::{
    header::{ACCEPT_LANGUAGE, USER_AGENT},
    HeaderMap,
};

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// What the login path records about the calling client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    pub ip: Option<String>,
    pub os: Option<String>,
    pub language: Option<String>,
}

impl RequestInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            ip: client_ip(headers),
            os: header_str(headers, USER_AGENT.as_str()).map(str::to_string),
            language: default_language(headers),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// First hop listed in `X-Forwarded-For`.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_str(headers, X_FORWARDED_FOR)?
        .split(',')
        .map(str::trim)
        .find(|ip| !ip.is_empty())
        .map(str::to_string)
}

/// Primary subtag of the first `Accept-Language` entry.
pub fn default_language(headers: &HeaderMap) -> Option<String> {
    let first = header_str(headers, ACCEPT_LANGUAGE.as_str())?
        .split(',')
        .next()?;
    let tag = first.split(';').next()?.trim();
    let primary = tag.split('-').next()?.trim();

    if primary.is_empty() || primary == "*" {
        return None;
    }
    Some(primary.to_ascii_lowercase())
}
