//! Guard for server-side fetches of client-supplied image URLs
//!
//! Hosts that resolve to loopback, private, link-local or otherwise
//! non-routable addresses are refused so an image URL cannot reach services
//! inside the deployment (the MinIO endpoint included).

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use reqwest::Url;

use crate::core::error::{AppError, Result};

/// Resolve the host of `url` and fail if any address is not publicly routable
pub async fn ensure_public_host(url: &Url) -> Result<()> {
    let host = url
        .host_str()
        .ok_or_else(|| AppError::Storage(format!("Image URL '{}' has no host", url)))?;

    let addrs: Vec<IpAddr> = match literal_ip(host) {
        Some(ip) => vec![ip],
        None => {
            let port = url.port_or_known_default().unwrap_or(80);
            tokio::net::lookup_host((host, port))
                .await
                .map_err(|e| {
                    AppError::Storage(format!("Failed to resolve image host '{}': {}", host, e))
                })?
                .map(|addr| addr.ip())
                .collect()
        }
    };

    if addrs.is_empty() {
        return Err(AppError::Storage(format!("Image host '{}' did not resolve", host)));
    }

    match addrs.into_iter().find(|ip| !is_public(*ip)) {
        Some(ip) => Err(AppError::Storage(format!(
            "Image URL '{}' points at non-public address {}",
            url, ip
        ))),
        None => Ok(()),
    }
}

/// Check for redirect targets, which cannot be resolved synchronously
pub fn is_literal_non_public(url: &Url) -> bool {
    match url.host_str() {
        Some(host) if host.eq_ignore_ascii_case("localhost") => true,
        Some(host) => literal_ip(host).is_some_and(|ip| !is_public(ip)),
        None => true,
    }
}

/// IP address written directly in the URL (`[..]` around IPv6)
fn literal_ip(host: &str) -> Option<IpAddr> {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse()
        .ok()
}

pub fn is_public(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ip) => is_public_v4(ip),
        IpAddr::V6(ip) => match ip.to_ipv4_mapped() {
            Some(mapped) => is_public_v4(mapped),
            None => is_public_v6(ip),
        },
    }
}

fn is_public_v4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    let shared_address_space = a == 100 && (64..128).contains(&b);

    !(ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        || ip.is_documentation()
        || shared_address_space
        || a == 0)
}

fn is_public_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    let unique_local = first & 0xfe00 == 0xfc00;
    let link_local = first & 0xffc0 == 0xfe80;

    !(ip.is_loopback() || ip.is_unspecified() || unique_local || link_local)
}
