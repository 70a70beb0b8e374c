//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Client address normalisation
//!
//! Attempts are counted per subnet: a single IPv4 address (`/32`) or an IPv6
//! `/64`, since one IPv6 client usually controls a whole `/64`. IPv4-mapped
//! IPv6 addresses follow the IPv4 rule.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::constants::{DEFAULT_IPV4_PREFIX, DEFAULT_IPV6_PREFIX};
use crate::error::BfGuardError;

/// Parsed client address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpAddress {
    addr: IpAddr,
}

impl IpAddress {
    /// Parse an address, accepting `[v6]` brackets and `%zone` suffixes.
    pub fn parse(input: &str) -> Result<Self, BfGuardError> {
        let trimmed = input.trim();
        let unbracketed = trimmed
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(trimmed);
        let without_zone = match unbracketed.split_once('%') {
            Some((addr, _zone)) if addr.contains(':') => addr,
            _ => unbracketed,
        };

        let addr = without_zone
            .parse::<IpAddr>()
            .map_err(|_| BfGuardError::InvalidAddress(input.to_string()))?;
        Ok(Self { addr })
    }

    /// Underlying address with IPv4-mapped IPv6 unwrapped.
    pub fn addr(&self) -> IpAddr {
        match self.addr {
            IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
                Some(v4) => IpAddr::V4(v4),
                None => self.addr,
            },
            v4 => v4,
        }
    }

    /// Subnet with the default `/32` and `/64` prefixes.
    pub fn subnet(&self) -> String {
        self.subnet_with(DEFAULT_IPV4_PREFIX, DEFAULT_IPV6_PREFIX)
    }

    /// Subnet in CIDR notation with the network bits kept.
    ///
    /// Prefixes larger than the address width are clamped.
    pub fn subnet_with(&self, ipv4_prefix: u8, ipv6_prefix: u8) -> String {
        match self.addr() {
            IpAddr::V4(v4) => {
                let prefix = ipv4_prefix.min(32);
                format!("{}/{}", mask_ipv4(v4, prefix), prefix)
            }
            IpAddr::V6(v6) => {
                let prefix = ipv6_prefix.min(128);
                format!("{}/{}", mask_ipv6(v6, prefix), prefix)
            }
        }
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr())
    }
}

impl FromStr for IpAddress {
    type Err = BfGuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn mask_ipv4(addr: Ipv4Addr, prefix: u8) -> Ipv4Addr {
    let mask = if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix))
    };
    Ipv4Addr::from(u32::from(addr) & mask)
}

fn mask_ipv6(addr: Ipv6Addr, prefix: u8) -> Ipv6Addr {
    let mask = if prefix == 0 {
        0
    } else {
        u128::MAX << (128 - u32::from(prefix))
    };
    Ipv6Addr::from(u128::from(addr) & mask)
}

/// Allowlist entry: one address or a CIDR block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpRange {
    /// Single address
    Single(IpAddr),
    /// IPv4 CIDR
    Ipv4Cidr { addr: Ipv4Addr, prefix: u8 },
    /// IPv6 CIDR
    Ipv6Cidr { addr: Ipv6Addr, prefix: u8 },
}

impl IpRange {
    /// Whether `ip` falls inside the range.
    pub fn contains(&self, ip: &IpAddress) -> bool {
        match (self, ip.addr()) {
            (IpRange::Single(single), addr) => {
                IpAddress { addr: *single }.addr() == addr
            }
            (IpRange::Ipv4Cidr { addr: network, prefix }, IpAddr::V4(v4)) => {
                mask_ipv4(v4, *prefix) == mask_ipv4(*network, *prefix)
            }
            (IpRange::Ipv6Cidr { addr: network, prefix }, IpAddr::V6(v6)) => {
                mask_ipv6(v6, *prefix) == mask_ipv6(*network, *prefix)
            }
            _ => false,
        }
    }
}

impl FromStr for IpRange {
    type Err = BfGuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some((addr, prefix)) = s.split_once('/') else {
            return Ok(IpRange::Single(IpAddress::parse(s)?.addr()));
        };

        let prefix: u8 = prefix
            .parse()
            .map_err(|_| BfGuardError::InvalidAddress(format!("invalid prefix in {}", s)))?;

        match IpAddress::parse(addr)?.addr() {
            IpAddr::V4(addr) if prefix <= 32 => Ok(IpRange::Ipv4Cidr { addr, prefix }),
            IpAddr::V6(addr) if prefix <= 128 => Ok(IpRange::Ipv6Cidr { addr, prefix }),
            _ => Err(BfGuardError::InvalidAddress(format!(
                "prefix too long in {}",
                s
            ))),
        }
    }
}
