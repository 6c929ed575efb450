//! Reverse-lookup names (`in-addr.arpa` / `ip6.arpa`)

use std::fmt::Write as _;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Build the reverse-lookup name of an address, without a trailing dot.
///
/// `1.2.3.4` becomes `4.3.2.1.in-addr.arpa`; IPv6 addresses are expanded to
/// 32 nibbles under `ip6.arpa`.
pub fn reverse_name(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let [a, b, c, d] = v4.octets();
            format!("{d}.{c}.{b}.{a}.in-addr.arpa")
        }
        IpAddr::V6(v6) => {
            let mut name = String::with_capacity(72);
            for byte in v6.octets().iter().rev() {
                let _ = write!(name, "{:x}.{:x}.", byte & 0xf, byte >> 4);
            }
            name.push_str("ip6.arpa");
            name
        }
    }
}

/// Inverse of [`reverse_name`]. Accepts an optional trailing dot.
pub fn parse_reverse_name(name: &str) -> Option<IpAddr> {
    let name = name.trim_end_matches('.').to_ascii_lowercase();

    if let Some(labels) = name.strip_suffix(".in-addr.arpa") {
        let octets: Vec<u8> = labels
            .split('.')
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;
        let [d, c, b, a] = <[u8; 4]>::try_from(octets).ok()?;
        return Some(IpAddr::V4(Ipv4Addr::new(a, b, c, d)));
    }

    if let Some(labels) = name.strip_suffix(".ip6.arpa") {
        let nibbles: Vec<u8> = labels
            .split('.')
            .map(|label| match label.len() {
                1 => u8::from_str_radix(label, 16).ok(),
                _ => None,
            })
            .collect::<Option<_>>()?;
        if nibbles.len() != 32 {
            return None;
        }
        let value = nibbles
            .iter()
            .rev()
            .fold(0u128, |acc, nibble| (acc << 4) | u128::from(*nibble));
        return Some(IpAddr::V6(Ipv6Addr::from(value)));
    }

    None
}
