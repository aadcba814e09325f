//! Caller IP behind trusted proxies.
//!
//! The socket peer is the caller unless it is a trusted proxy; then the
//! `X-Forwarded-For` chain is walked from the right, skipping trusted hops.
use std::net::IpAddr;

use axum::http::HeaderMap;
use thiserror::Error;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

pub trait RemoteIpResolver: Send + Sync {
    fn resolve(&self, peer: Option<IpAddr>, headers: &HeaderMap) -> Option<IpAddr>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProxyListError {
    #[error("invalid proxy address '{0}'")]
    InvalidAddress(String),
    #[error("invalid prefix length in '{0}'")]
    InvalidPrefix(String),
}

/// An address block, `10.0.0.0/8` or a bare address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpBlock {
    addr: IpAddr,
    prefix: u8,
}

impl IpBlock {
    pub fn parse(s: &str) -> Result<Self, ProxyListError> {
        let (addr, prefix) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| ProxyListError::InvalidAddress(s.to_string()))?;
        let max = if addr.is_ipv4() { 32 } else { 128 };
        let prefix = match prefix {
            Some(p) => p
                .parse::<u8>()
                .ok()
                .filter(|p| *p <= max)
                .ok_or_else(|| ProxyListError::InvalidPrefix(s.to_string()))?,
            None => max,
        };
        Ok(Self { addr, prefix })
    }

    pub fn contains(&self, ip: IpAddr) -> bool {
        match (self.addr, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                masked(u32::from(net).into(), self.prefix, 32)
                    == masked(u32::from(ip).into(), self.prefix, 32)
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                masked(u128::from(net), self.prefix, 128) == masked(u128::from(ip), self.prefix, 128)
            }
            // IPv4-mapped peers (::ffff:a.b.c.d) are matched against v4 blocks
            (IpAddr::V4(_), IpAddr::V6(ip)) => ip
                .to_ipv4_mapped()
                .is_some_and(|v4| self.contains(IpAddr::V4(v4))),
            (IpAddr::V6(_), IpAddr::V4(_)) => false,
        }
    }
}

fn masked(bits: u128, prefix: u8, width: u32) -> u128 {
    let host_bits = width - u32::from(prefix);
    if host_bits >= 128 {
        0
    } else {
        bits >> host_bits
    }
}

/// Proxies whose `X-Forwarded-For` is honoured. Empty by default: with no
/// configured list the socket peer is always the caller.
#[derive(Debug, Clone, Default)]
pub struct TrustedProxies {
    blocks: Vec<IpBlock>,
}

impl TrustedProxies {
    pub fn new(blocks: Vec<IpBlock>) -> Self {
        Self { blocks }
    }

    /// Comma-separated list (`TRUSTED_PROXIES` format). Blank entries are ignored.
    pub fn parse_list(list: &str) -> Result<Self, ProxyListError> {
        let blocks = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(IpBlock::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { blocks })
    }

    pub fn is_trusted(&self, ip: IpAddr) -> bool {
        self.blocks.iter().any(|b| b.contains(ip))
    }
}

impl RemoteIpResolver for TrustedProxies {
    fn resolve(&self, peer: Option<IpAddr>, headers: &HeaderMap) -> Option<IpAddr> {
        if let Some(peer) = peer.filter(|ip| !self.is_trusted(*ip)) {
            return Some(peer);
        }

        let forwarded: Vec<IpAddr> = headers
            .get_all(X_FORWARDED_FOR)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .filter_map(|hop| hop.trim().parse().ok())
            .collect();

        forwarded
            .iter()
            .rev()
            .find(|ip| !self.is_trusted(**ip))
            .or_else(|| forwarded.first())
            .copied()
            .or(peer)
    }
}
