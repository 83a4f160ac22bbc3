//! Public lookup tree over IP networks and domain names.

use crate::codec::Key;
use crate::error::Result;
use crate::host::{Host, ToHost};
use crate::trie::Trie;

/// A stored target together with its caller data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<D> {
    /// The target as inserted, in canonical form
    pub host: Host,
    /// Caller data stored with the target
    pub data: D,
}

/// TargetTree answers "which stored target contains this host?".
///
/// IP queries return the longest stored prefix containing the query;
/// domain queries return the most specific stored ancestor (or the name
/// itself). IPv4, IPv6, and DNS entries live in separate key spaces and
/// never match each other.
///
/// The tree is built with `&mut self` and searched with `&self`, so a
/// finished tree can be shared across threads behind an `Arc`. Callers
/// that interleave writes with reads wrap the tree in their own lock.
///
/// # Examples
/// ```
/// use targettree::{Host, TargetTree};
///
/// let mut tree = TargetTree::new();
/// tree.insert("192.168.1.0/24").unwrap();
/// tree.insert("net").unwrap();
///
/// assert_eq!(
///     tree.search("192.168.1.10").unwrap(),
///     Some(&Host::parse("192.168.1.0/24").unwrap())
/// );
/// assert_eq!(tree.search("192.168.2.10").unwrap(), None);
/// assert_eq!(tree.search("evilcorp.net").unwrap().unwrap().to_string(), "net");
/// ```
pub struct TargetTree<D = ()> {
    trie: Trie<Entry<D>>,
}

impl TargetTree {
    /// Create an empty tree without caller data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a target.
    ///
    /// Inserting a target that is already present leaves the tree
    /// unchanged.
    pub fn insert<H: ToHost>(&mut self, host: H) -> Result<()> {
        self.insert_with(host, ()).map(|_| ())
    }
}

impl<D> Default for TargetTree<D> {
    fn default() -> Self {
        Self { trie: Trie::new() }
    }
}

impl<D> TargetTree<D> {
    /// Get the number of distinct targets stored.
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    /// Check if the tree holds no targets.
    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Insert a target with caller data.
    ///
    /// Returns the entry previously stored for the same target, if any.
    /// Fails with [`Error::InvalidHost`](crate::Error::InvalidHost) before
    /// touching the tree when `host` cannot be parsed.
    pub fn insert_with<H: ToHost>(&mut self, host: H, data: D) -> Result<Option<Entry<D>>> {
        let host = host.to_host()?.into_owned();
        Ok(self.insert_host(host, data))
    }

    /// Insert a canonical target with caller data.
    pub(crate) fn insert_host(&mut self, host: Host, data: D) -> Option<Entry<D>> {
        let slot = self.trie.slot(&Key::encode(&host));
        slot.replace(Entry { host, data })
    }

    /// Find the most specific stored target containing `host`.
    ///
    /// Returns `Ok(None)` when nothing contains it. Fails only when `host`
    /// cannot be parsed.
    pub fn search<H: ToHost>(&self, host: H) -> Result<Option<&Host>> {
        Ok(self.search_entry(host)?.map(|entry| &entry.host))
    }

    /// Like [`search`](Self::search), returning the stored caller data too.
    pub fn search_entry<H: ToHost>(&self, host: H) -> Result<Option<&Entry<D>>> {
        let host = host.to_host()?;
        Ok(self.search_host(&host))
    }

    /// Find the most specific stored entry containing a canonical host.
    pub(crate) fn search_host(&self, host: &Host) -> Option<&Entry<D>> {
        self.trie.longest_match(&Key::encode(host))
    }

    /// Get the entry stored for exactly `host`, ignoring broader targets.
    pub fn get<H: ToHost>(&self, host: H) -> Result<Option<&Entry<D>>> {
        let host = host.to_host()?;
        Ok(self.trie.get(&Key::encode(&host)))
    }

    /// Iterate stored entries, broader targets before the ones they contain.
    pub fn iter(&self) -> impl Iterator<Item = &Entry<D>> {
        self.trie.iter()
    }

    /// Iterate stored targets.
    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.iter().map(|entry| &entry.host)
    }
}
