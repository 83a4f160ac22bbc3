//! Canonical trie keys for hosts.
//!
//! Every key starts with a selector token naming its key space, followed by
//! edge tokens:
//!
//! - IP networks: exactly `prefix_len` bits of the network address, most
//!   significant bit first. A /0 network is just the selector.
//! - Domains: labels from the top level down, so `www.example.com` becomes
//!   `[DNS, "com", "example", "www"]`. An ancestor domain's key is therefore
//!   always a prefix of its descendants' keys.

use ipnet::IpNet;
use std::str::RSplit;

use crate::host::{Host, HostKind};

/// One step below a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge<'a> {
    /// Address bit (IPv4/IPv6 keys)
    Bit(bool),
    /// Domain label (DNS keys)
    Label(&'a str),
}

/// Canonical key of a host, borrowing the host's label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key<'a> {
    selector: HostKind,
    path: Path<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Path<'a> {
    Bits { value: u128, width: u8, len: u8 },
    Labels(&'a str),
}

impl<'a> Key<'a> {
    /// Encode a host.
    pub fn encode(host: &'a Host) -> Self {
        let path = match host {
            Host::Network(IpNet::V4(net)) => Path::Bits {
                value: u128::from(u32::from(net.network())),
                width: 32,
                len: net.prefix_len(),
            },
            Host::Network(IpNet::V6(net)) => Path::Bits {
                value: u128::from(net.network()),
                width: 128,
                len: net.prefix_len(),
            },
            Host::Domain(name) => Path::Labels(name.strip_suffix('.').unwrap_or(name)),
        };

        Self {
            selector: host.kind(),
            path,
        }
    }

    /// Get the key-space selector.
    pub fn selector(&self) -> HostKind {
        self.selector
    }

    /// Iterate the edge tokens following the selector.
    pub fn edges(&self) -> Edges<'a> {
        let inner = match self.path {
            Path::Bits { value, width, len } => EdgesInner::Bits {
                value,
                width,
                len,
                pos: 0,
            },
            Path::Labels(name) => EdgesInner::Labels(name.rsplit('.')),
        };
        Edges { inner }
    }
}

/// Iterator over the edge tokens of a [`Key`].
#[derive(Debug, Clone)]
pub struct Edges<'a> {
    inner: EdgesInner<'a>,
}

#[derive(Debug, Clone)]
enum EdgesInner<'a> {
    Bits { value: u128, width: u8, len: u8, pos: u8 },
    Labels(RSplit<'a, char>),
}

impl<'a> Iterator for Edges<'a> {
    type Item = Edge<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            EdgesInner::Bits {
                value,
                width,
                len,
                pos,
            } => {
                if *pos >= *len {
                    return None;
                }
                let bit = (*value >> (*width - 1 - *pos)) & 1 == 1;
                *pos += 1;
                Some(Edge::Bit(bit))
            }
            EdgesInner::Labels(labels) => labels.next().map(Edge::Label),
        }
    }
}
