use tabmark_logging::tabmark_warn;
use url::{Host, Url};

/// Label for urls that do not parse or carry no host.
pub const UNKNOWN_DOMAIN: &str = "Unknown";

/// Derive the grouping label for a url.
///
/// Domain hosts reduce to their registrable domain via the public suffix
/// list. Hosts the list cannot reduce (a bare suffix, `localhost`) keep their
/// literal name minus a leading `www.`. IP hosts are used as written.
/// Anything without a host maps to [`UNKNOWN_DOMAIN`].
pub fn classify_domain(raw_url: &str) -> String {
    let url = match Url::parse(raw_url.trim()) {
        Ok(url) => url,
        Err(err) => {
            tabmark_warn!("Cannot classify url {:?}: {}", raw_url, err);
            return UNKNOWN_DOMAIN.to_string();
        }
    };

    match url.host() {
        Some(Host::Domain(host)) if !host.is_empty() => registrable_domain(host),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        _ => {
            tabmark_warn!("Url {:?} has no host", raw_url);
            UNKNOWN_DOMAIN.to_string()
        }
    }
}

fn registrable_domain(host: &str) -> String {
    let host = host.to_ascii_lowercase();
    match psl::domain_str(&host) {
        Some(domain) => domain.to_string(),
        None => strip_www(&host).to_string(),
    }
}

fn strip_www(host: &str) -> &str {
    match host.strip_prefix("www.") {
        Some(rest) if !rest.is_empty() => rest,
        _ => host,
    }
}
