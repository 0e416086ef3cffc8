//! IPv4 CIDR to subnet mask conversion.
//!
//! Provides [`AddressMaskPair`], the `(address, mask)` form used by the PAC
//! `isInNet()` rule, along with the prefix length to mask calculation.

use crate::error::{PacError, Result};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use pac_file_util::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Option<u32> {
    if len > MAX_LENGTH {
        None
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Some(mask as u32)
    }
}

/// Dotted-decimal subnet mask for a prefix length, e.g. 24 -> "255.255.255.0".
pub fn mask_for_prefix(len: u8) -> Option<String> {
    get_cidr_mask(len).map(|mask| Ipv4Addr::from(mask).to_string())
}

/// An address and dotted-decimal subnet mask, as used by `isInNet()`.
///
/// The address is kept exactly as written in the CIDR, it is not cut down to
/// the network base address. Two pairs are equal when both strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressMaskPair {
    /// Literal address portion of the CIDR.
    pub address: String,
    /// Subnet mask derived from the prefix length.
    pub mask: String,
}

impl AddressMaskPair {
    /// Convert a CIDR string (e.g. "10.0.0.0/24") into an address and mask.
    pub fn new(addr_cidr: &str) -> Result<AddressMaskPair> {
        let addr_cidr = addr_cidr.trim();
        let parts: Vec<&str> = addr_cidr.split('/').collect();
        if parts.len() != 2 {
            return Err(PacError::parse(addr_cidr, "expected address/prefix"));
        }

        let address = parts[0].trim();
        Ipv4Addr::from_str(address)
            .map_err(|_| PacError::parse(addr_cidr, format!("invalid IPv4 address {address}")))?;

        let prefix = u8::from_str(parts[1].trim())
            .map_err(|_| PacError::parse(addr_cidr, format!("invalid prefix {}", parts[1])))?;
        let mask = mask_for_prefix(prefix).ok_or_else(|| {
            PacError::parse(addr_cidr, format!("prefix /{prefix} is longer than {MAX_LENGTH}"))
        })?;

        Ok(AddressMaskPair {
            address: address.to_string(),
            mask,
        })
    }
}

impl FromStr for AddressMaskPair {
    type Err = PacError;

    fn from_str(s: &str) -> Result<Self> {
        AddressMaskPair::new(s)
    }
}

impl std::fmt::Display for AddressMaskPair {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.address, self.mask)
    }
}

/// Convert a CIDR string into its `(address, mask)` pair.
pub fn convert(addr_cidr: &str) -> Result<AddressMaskPair> {
    AddressMaskPair::new(addr_cidr)
}
