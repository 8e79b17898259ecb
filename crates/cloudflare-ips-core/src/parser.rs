//! Parser for the published plain-text lists
//!
//! The body is one network per line. Blank lines are skipped, any other line
//! that does not parse fails the whole list: a half-parsed list would be
//! cached as if it were complete.

use crate::error::{ParseError, snippet};
use crate::types::{Family, NetworkList};
use ipnet::IpNet;
use std::net::IpAddr;

/// Parse a newline-delimited body into a list of `family` networks
///
/// Lines may end in `\n` or `\r\n`. A bare address is taken as a host
/// network, and host bits below the prefix are cleared, so that
/// `103.21.244.7/22` becomes `103.21.244.0/22`. Order and duplicates are
/// kept as published.
pub fn parse(body: &str, family: Family) -> Result<NetworkList, ParseError> {
    let mut nets = Vec::new();

    for (idx, raw) in body.split('\n').enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let net = parse_entry(line).ok_or_else(|| ParseError::Malformed {
            line: idx + 1,
            content: snippet(line),
        })?;

        if Family::of(&net) != family {
            return Err(ParseError::FamilyMismatch {
                line: idx + 1,
                expected: family,
                content: snippet(line),
            });
        }

        nets.push(net);
    }

    Ok(NetworkList::new(family, nets))
}

fn parse_entry(entry: &str) -> Option<IpNet> {
    if entry.contains('/') {
        entry.parse::<IpNet>().ok().map(|net| net.trunc())
    } else {
        entry.parse::<IpAddr>().ok().map(IpNet::from)
    }
}
