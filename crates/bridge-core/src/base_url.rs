//! Validated backend base URL.

use std::fmt;
use std::net::IpAddr;

use url::{Host, Url};

use crate::error::{BridgeError, Result};

/// Backend base URL that passed scheme and host allow-list checks.
///
/// Built once at startup; every outbound request and every document link
/// is derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    url: Url,
}

impl BaseUrl {
    /// Parse `raw` and accept it only if its host is in `allowed_hosts`.
    ///
    /// Allow-list entries are hostnames (compared case-insensitively) or IP
    /// literals; IPv6 entries may be written with or without brackets.
    pub fn parse(raw: &str, allowed_hosts: &[String]) -> Result<Self> {
        let mut url = Url::parse(raw.trim())
            .map_err(|e| BridgeError::config(format!("invalid base URL '{}': {}", raw, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(BridgeError::config(format!(
                "base URL scheme must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(BridgeError::config("base URL must not carry credentials"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(BridgeError::config(
                "base URL must not carry a query string or fragment",
            ));
        }

        let host = url
            .host()
            .ok_or_else(|| BridgeError::config("base URL has no host"))?;
        if !host_allowed(&host, allowed_hosts) {
            return Err(BridgeError::config(format!(
                "backend host '{}' is not in the allow-list [{}]",
                host,
                allowed_hosts.join(", ")
            )));
        }

        let path = url.path().trim_end_matches('/').to_string();
        url.set_path(&path);

        Ok(Self { url })
    }

    /// Base URL without a trailing slash.
    pub fn as_str(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }

    /// Absolute URL of a backend endpoint such as `/query`.
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.url.clone();
        let joined = format!("{}{}", self.url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url
    }

    /// Caller-facing link to a document: `<base>/doc?collection=..&id=..`.
    pub fn document_url(&self, collection: &str, id: &str) -> String {
        let mut url = self.endpoint("/doc");
        url.query_pairs_mut()
            .append_pair("collection", collection)
            .append_pair("id", id);
        url.to_string()
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn host_allowed(host: &Host<&str>, allowed_hosts: &[String]) -> bool {
    allowed_hosts.iter().any(|entry| {
        let entry = entry.trim();
        match host {
            Host::Domain(domain) => domain.eq_ignore_ascii_case(entry),
            Host::Ipv4(ip) => parse_ip(entry) == Some(IpAddr::V4(*ip)),
            Host::Ipv6(ip) => parse_ip(entry) == Some(IpAddr::V6(*ip)),
        }
    })
}

fn parse_ip(entry: &str) -> Option<IpAddr> {
    entry
        .trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .ok()
}
