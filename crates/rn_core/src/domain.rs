use url::Url;

/// Reduce a host, domain or URL to the lookup key used against the bias
/// dataset: lowercase, no scheme, no path or port, no `www.` prefix.
pub fn normalize_domain(input: &str) -> String {
    let mut domain = input.trim().to_ascii_lowercase();

    if let Some(idx) = domain.find("://") {
        domain.drain(..idx + 3);
    }
    if let Some(idx) = domain.find(|c| matches!(c, '/' | '?' | '#')) {
        domain.truncate(idx);
    }
    if let Some(idx) = domain.rfind('@') {
        domain.drain(..=idx);
    }
    if let Some(idx) = domain.find(':') {
        domain.truncate(idx);
    }

    let domain = domain.trim_end_matches('.');
    domain.strip_prefix("www.").unwrap_or(domain).to_string()
}

/// Host of a full article URL, normalized. Falls back to plain
/// normalization when the value does not parse as a URL.
pub fn domain_from_url(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(url) => url.host_str().map(normalize_domain).unwrap_or_default(),
        Err(_) => normalize_domain(raw),
    }
}
