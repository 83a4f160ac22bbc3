//! Token-keyed prefix tree with longest-match search.
//!
//! One sub-tree hangs off each key-space selector. Below a selector, IP keys
//! branch on a dense pair of bit children and DNS keys branch on a sparse
//! label map. Nodes are created on demand during insertion and never
//! removed.

use ahash::AHashMap;

use crate::codec::{Edge, Key};

struct Node<V> {
    bits: [Option<Box<Node<V>>>; 2],
    labels: Option<Box<AHashMap<Box<str>, Node<V>>>>,
    payload: Option<V>,
}

impl<V> Node<V> {
    fn new() -> Self {
        Self {
            bits: [None, None],
            labels: None,
            payload: None,
        }
    }

    fn child(&self, edge: Edge<'_>) -> Option<&Node<V>> {
        match edge {
            Edge::Bit(bit) => self.bits[usize::from(bit)].as_deref(),
            Edge::Label(label) => self.labels.as_ref()?.get(label),
        }
    }

    fn child_or_insert(&mut self, edge: Edge<'_>) -> &mut Node<V> {
        match edge {
            Edge::Bit(bit) => {
                &mut **self.bits[usize::from(bit)].get_or_insert_with(|| Box::new(Node::new()))
            }
            Edge::Label(label) => self
                .labels
                .get_or_insert_with(Default::default)
                .entry(Box::from(label))
                .or_insert_with(Node::new),
        }
    }
}

/// Prefix tree over canonical [`Key`]s.
///
/// Stores one payload per distinct key. Lookups cost one step per key
/// token regardless of how many keys are stored.
pub struct Trie<V> {
    roots: [Node<V>; 3],
    len: usize,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self {
            roots: [Node::new(), Node::new(), Node::new()],
            len: 0,
        }
    }

    /// Get the number of stored payloads.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no payload is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store `payload` at the node for `key`, creating the path as needed.
    ///
    /// Returns the payload previously stored for the same key, if any.
    pub fn insert(&mut self, key: &Key<'_>, payload: V) -> Option<V> {
        self.slot(key).replace(payload)
    }

    /// Create the path for `key` and return its payload slot.
    ///
    /// The slot does not borrow `key`, so the payload may own the data the
    /// key was encoded from.
    pub fn slot(&mut self, key: &Key<'_>) -> Slot<'_, V> {
        let mut node = &mut self.roots[key.selector().index()];
        for edge in key.edges() {
            node = node.child_or_insert(edge);
        }

        Slot {
            payload: &mut node.payload,
            len: &mut self.len,
        }
    }

    /// Get the payload stored for exactly `key`.
    pub fn get(&self, key: &Key<'_>) -> Option<&V> {
        let mut node = &self.roots[key.selector().index()];
        for edge in key.edges() {
            node = node.child(edge)?;
        }
        node.payload.as_ref()
    }

    /// Get the payload of the deepest stored key that is a prefix of `key`.
    ///
    /// The walk never consumes more tokens than `key` has, so entries more
    /// specific than the query are never returned.
    pub fn longest_match(&self, key: &Key<'_>) -> Option<&V> {
        let mut node = &self.roots[key.selector().index()];
        let mut best = node.payload.as_ref();

        for edge in key.edges() {
            match node.child(edge) {
                Some(child) => node = child,
                None => break,
            }
            if let Some(payload) = node.payload.as_ref() {
                best = Some(payload);
            }
        }

        best
    }

    /// Iterate stored payloads, parents before their descendants.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            stack: self.roots.iter().rev().collect(),
        }
    }
}

/// Payload position of one key, see [`Trie::slot`].
pub struct Slot<'a, V> {
    payload: &'a mut Option<V>,
    len: &'a mut usize,
}

impl<'a, V> Slot<'a, V> {
    /// Store `payload`, returning the one it replaces.
    pub fn replace(self, payload: V) -> Option<V> {
        let previous = self.payload.replace(payload);
        if previous.is_none() {
            *self.len += 1;
        }
        previous
    }
}

/// Iterator over the payloads of a [`Trie`].
pub struct Iter<'a, V> {
    stack: Vec<&'a Node<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let Some(labels) = node.labels.as_deref() {
                self.stack.extend(labels.values());
            }
            self.stack.extend(node.bits.iter().rev().filter_map(|child| child.as_deref()));

            if let Some(payload) = node.payload.as_ref() {
                return Some(payload);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Host;

    fn host(s: &str) -> Host {
        Host::parse(s).unwrap()
    }

    fn insert(trie: &mut Trie<String>, s: &str) -> Option<String> {
        let h = host(s);
        trie.insert(&Key::encode(&h), s.to_string())
    }

    fn longest(trie: &Trie<String>, s: &str) -> Option<String> {
        let h = host(s);
        trie.longest_match(&Key::encode(&h)).cloned()
    }

    #[test]
    fn test_empty_trie() {
        let trie: Trie<String> = Trie::new();
        assert!(trie.is_empty());
        assert_eq!(longest(&trie, "10.0.0.1"), None);
        assert_eq!(longest(&trie, "example.com"), None);
    }

    #[test]
    fn test_deepest_match_wins() {
        let mut trie = Trie::new();
        insert(&mut trie, "10.0.0.0/8");
        insert(&mut trie, "10.1.0.0/16");

        assert_eq!(longest(&trie, "10.1.2.3").as_deref(), Some("10.1.0.0/16"));
        assert_eq!(longest(&trie, "10.2.2.3").as_deref(), Some("10.0.0.0/8"));
        assert_eq!(longest(&trie, "11.0.0.1"), None);
    }

    #[test]
    fn test_superset_inserted_later_keeps_subset() {
        let mut trie = Trie::new();
        insert(&mut trie, "10.1.0.0/16");
        insert(&mut trie, "10.0.0.0/8");

        assert_eq!(trie.len(), 2);
        assert_eq!(longest(&trie, "10.1.2.3").as_deref(), Some("10.1.0.0/16"));
    }

    #[test]
    fn test_query_broader_than_entry_misses() {
        let mut trie = Trie::new();
        insert(&mut trie, "192.168.128.0/24");

        assert_eq!(longest(&trie, "192.168.128.0/28").as_deref(), Some("192.168.128.0/24"));
        assert_eq!(longest(&trie, "192.168.128.0/23"), None);
    }

    #[test]
    fn test_same_prefix_len_different_bits_misses() {
        let mut trie = Trie::new();
        insert(&mut trie, "192.168.1.0/24");
        assert_eq!(longest(&trie, "192.168.2.0/24"), None);
    }

    #[test]
    fn test_zero_prefix_matches_whole_family() {
        let mut trie = Trie::new();
        insert(&mut trie, "0.0.0.0/0");

        assert_eq!(longest(&trie, "203.0.113.9").as_deref(), Some("0.0.0.0/0"));
        assert_eq!(longest(&trie, "::1"), None);
        assert_eq!(longest(&trie, "example.com"), None);
    }

    #[test]
    fn test_reinsert_overwrites() {
        let mut trie = Trie::new();
        assert_eq!(insert(&mut trie, "example.com"), None);
        assert_eq!(insert(&mut trie, "EXAMPLE.com").as_deref(), Some("example.com"));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_exact_get() {
        let mut trie = Trie::new();
        insert(&mut trie, "example.com");

        let exact = host("example.com");
        let child = host("www.example.com");
        assert!(trie.get(&Key::encode(&exact)).is_some());
        assert!(trie.get(&Key::encode(&child)).is_none());
    }

    #[test]
    fn test_iter_visits_parents_first() {
        let mut trie = Trie::new();
        insert(&mut trie, "www.example.com");
        insert(&mut trie, "10.1.0.0/16");
        insert(&mut trie, "example.com");
        insert(&mut trie, "10.0.0.0/8");

        let all: Vec<&String> = trie.iter().collect();
        assert_eq!(all.len(), 4);

        let pos = |s: &str| all.iter().position(|p| p.as_str() == s).unwrap();
        assert!(pos("10.0.0.0/8") < pos("10.1.0.0/16"));
        assert!(pos("example.com") < pos("www.example.com"));
    }
}
