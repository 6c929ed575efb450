//! Zone resolution
//!
//! Maps a record name to the most specific managed zone that owns it, and an
//! address to the smallest managed reverse zone that contains it.

use std::net::IpAddr;

use crate::codec::parse_reverse_name;
use crate::types::{NotInScope, Zone};

fn normalize(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Find the zone owning `name`.
///
/// A zone owns a name equal to its fqdn or ending in `.` + fqdn. The longest
/// fqdn wins; on a tie the zone listed first wins.
pub fn find_zone<'a>(zones: &'a [Zone], name: &str) -> Result<&'a Zone, NotInScope> {
    let name = normalize(name);
    let mut best: Option<(&Zone, usize)> = None;

    for zone in zones {
        let fqdn = normalize(&zone.fqdn);
        if fqdn.is_empty() {
            continue;
        }
        let owns = name == fqdn
            || name
                .strip_suffix(fqdn.as_str())
                .is_some_and(|head| head.ends_with('.'));
        if !owns {
            continue;
        }
        match best {
            Some((_, len)) if len >= fqdn.len() => {}
            _ => best = Some((zone, fqdn.len())),
        }
    }

    best.map(|(zone, _)| zone).ok_or(NotInScope { name })
}

/// Find the reverse zone containing an address.
///
/// `ip_or_name` is an IPv4/IPv6 literal or a reverse-lookup name. Only zones
/// whose fqdn is a CIDR block are candidates; the longest prefix wins, and on
/// a tie the zone listed first wins.
pub fn find_reverse_zone<'a>(zones: &'a [Zone], ip_or_name: &str) -> Result<&'a Zone, NotInScope> {
    let out_of_scope = || NotInScope::new(ip_or_name);
    let ip: IpAddr = match ip_or_name.trim().parse() {
        Ok(ip) => ip,
        Err(_) => parse_reverse_name(ip_or_name).ok_or_else(out_of_scope)?,
    };

    let mut best: Option<(&Zone, u8)> = None;
    for zone in zones {
        let Some(network) = zone.network() else {
            continue;
        };
        if !network.contains(ip) {
            continue;
        }
        match best {
            Some((_, len)) if len >= network.prefix_len() => {}
            _ => best = Some((zone, network.prefix_len())),
        }
    }

    best.map(|(zone, _)| zone).ok_or_else(out_of_scope)
}
