//! targettree - Longest-match lookup over IP networks and DNS names.
//!
//! This crate answers one question fast: given a set of targets (IP
//! addresses, CIDR networks, and domain names) and a candidate host, which
//! stored target is the most specific one containing the candidate?
//!
//! # Features
//!
//! - **IP prefix matching**: IPv4 and IPv6 longest-prefix match
//! - **Domain matching**: most specific ancestor domain wins
//! - **Separate key spaces**: IPv4, IPv6, and DNS entries never collide
//! - **Normalization**: reduce target lists to their minimal covering set,
//!   optionally merging sibling networks
//! - **Bounded cost**: lookups take one step per address bit or label,
//!   independent of the number of stored targets
//!
//! # Quick Start
//!
//! ```
//! use targettree::TargetTree;
//!
//! let mut tree = TargetTree::new();
//! tree.insert("192.168.1.0/24").unwrap();
//! tree.insert("dead::/64").unwrap();
//! tree.insert("evilcorp.com").unwrap();
//!
//! assert_eq!(tree.search("192.168.1.10").unwrap().unwrap().to_string(), "192.168.1.0/24");
//! assert_eq!(tree.search("dead::beef").unwrap().unwrap().to_string(), "dead::/64");
//! assert_eq!(tree.search("www.evilcorp.com").unwrap().unwrap().to_string(), "evilcorp.com");
//! assert!(tree.search("example.com").unwrap().is_none());
//! ```
//!
//! # Bulk Loading
//!
//! ```
//! use targettree::{NormalizeOptions, TargetNormalizer};
//!
//! let normalizer = TargetNormalizer::new(NormalizeOptions::new().with_aggregation(true));
//! let result = normalizer.normalize(["10.0.0.0/8", "10.1.2.0/24", "www.evilcorp.com", "evilcorp.com"]);
//!
//! assert_eq!(result.hosts.len(), 2);
//! assert!(result.tree.search("api.evilcorp.com").unwrap().is_some());
//! ```
//!
//! # Matching Rules
//!
//! - Strings are parsed as IP networks or addresses first, then as domain
//!   names (IDNA-encoded, lowercased, trailing dot dropped)
//! - A bare address is a /32 or /128 network
//! - A network query only matches stored networks at least as broad as
//!   itself: with `192.168.128.0/24` stored, `192.168.128.0/28` matches and
//!   `192.168.128.0/23` does not
//! - A domain matches itself and its ancestors: with `net` stored,
//!   `evilcorp.net` matches

mod error;
mod host;
mod merge;
mod tree;

pub mod codec;
pub mod loader;
pub mod normalize;
pub mod trie;

// Re-export core types
pub use error::{Error, Result};
pub use host::{Host, HostKind, SizeKey, ToHost};
pub use tree::{Entry, TargetTree};

// Re-export subnet merging
pub use merge::merge_subnets;

// Re-export normalization
pub use normalize::{NormalizeOptions, Normalized, TargetNormalizer, DEFAULT_MAX_MERGE_PASSES};

// Re-export list loading
pub use loader::TargetListParser;

#[cfg(test)]
mod proptests;
