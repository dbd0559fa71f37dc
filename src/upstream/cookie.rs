// ABOUTME: Minimal Set-Cookie attribute parser used for the admin token fallback
// ABOUTME: Grammar is a `;`-separated list of `name=value` pairs with surrounding whitespace trimmed

//! `Set-Cookie` attribute parsing
//!
//! `token=abc123; Path=/; HttpOnly` parses to
//! `[("token", "abc123"), ("Path", "/"), ("HttpOnly", "")]`. Values are split
//! at the first `=` only, so base64 padding survives.

/// Split a header value into `(name, value)` attributes in order
#[must_use]
pub fn parse_attributes(header: &str) -> Vec<(&str, &str)> {
    header
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.split_once('=')
                .map_or((part, ""), |(name, value)| (name.trim(), value.trim()))
        })
        .collect()
}

/// Value of the first attribute named exactly `name`
#[must_use]
pub fn find_attribute<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    parse_attributes(header)
        .into_iter()
        .find(|(attr, _)| *attr == name)
        .map(|(_, value)| value)
}

/// Positive `Max-Age` in seconds, if the cookie declares one
#[must_use]
pub fn max_age(header: &str) -> Option<i64> {
    parse_attributes(header)
        .into_iter()
        .find(|(attr, _)| attr.eq_ignore_ascii_case("max-age"))
        .and_then(|(_, value)| value.parse::<i64>().ok())
        .filter(|secs| *secs > 0)
}
