//! Bulk target normalization.
//!
//! Raw target lists often contain duplicates, entries nested inside other
//! entries, and runs of adjacent networks. [`TargetNormalizer`] reduces such
//! a list to its minimal covering set and loads it into a [`TargetTree`].

use ipnet::IpNet;

use crate::error::Error;
use crate::host::{Host, ToHost};
use crate::merge::merge_subnets;
use crate::tree::TargetTree;

/// Default limit on aggregation passes, enough to collapse any IPv6 run.
pub const DEFAULT_MAX_MERGE_PASSES: usize = 128;

/// Configuration for a [`TargetNormalizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Merge sibling networks into their parents
    pub aggregate: bool,
    /// Upper bound on aggregation passes
    pub max_merge_passes: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            aggregate: false,
            max_merge_passes: DEFAULT_MAX_MERGE_PASSES,
        }
    }
}

impl NormalizeOptions {
    /// Create options with aggregation disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable sibling network aggregation.
    pub fn with_aggregation(mut self, aggregate: bool) -> Self {
        self.aggregate = aggregate;
        self
    }

    /// Set the aggregation pass limit.
    pub fn with_max_merge_passes(mut self, passes: usize) -> Self {
        self.max_merge_passes = passes;
        self
    }
}

/// Output of [`TargetNormalizer::normalize`].
pub struct Normalized {
    /// Tree loaded with the kept targets
    pub tree: TargetTree,
    /// Kept targets, broader first
    pub hosts: Vec<Host>,
    /// Inputs that could not be parsed
    pub rejected: Vec<Error>,
}

/// TargetNormalizer reduces a target list to its minimal covering set.
///
/// Targets are processed broadest first, so any target already covered by
/// a kept one (a supernet, an ancestor domain, or a duplicate) is dropped.
/// With aggregation enabled, sibling networks are then merged into their
/// parents until nothing more merges.
///
/// # Examples
/// ```
/// use targettree::{NormalizeOptions, TargetNormalizer};
///
/// let normalizer = TargetNormalizer::new(NormalizeOptions::new().with_aggregation(true));
/// let result = normalizer.normalize(["192.168.0.0/25", "192.168.0.128/25", "10.1.2.0/24", "10.0.0.0/8"]);
///
/// let kept: Vec<String> = result.hosts.iter().map(|h| h.to_string()).collect();
/// assert_eq!(kept, vec!["10.0.0.0/8", "192.168.0.0/24"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TargetNormalizer {
    options: NormalizeOptions,
}

impl TargetNormalizer {
    /// Create a normalizer with the given options.
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Normalize targets into a tree.
    ///
    /// Unparseable inputs are logged, collected in
    /// [`Normalized::rejected`], and otherwise ignored.
    pub fn normalize<I>(&self, inputs: I) -> Normalized
    where
        I: IntoIterator,
        I::Item: ToHost,
    {
        let mut hosts = Vec::new();
        let mut rejected = Vec::new();

        for input in inputs {
            match input.to_host() {
                Ok(host) => hosts.push(host.into_owned()),
                Err(e) => {
                    log::warn!("Skipping target: {}", e);
                    rejected.push(e);
                }
            }
        }

        let total = hosts.len();
        let (mut tree, mut kept) = insert_uncovered(hosts);

        if self.options.aggregate {
            let (networks, domains): (Vec<Host>, Vec<Host>) =
                kept.into_iter().partition(Host::is_network);
            let before = networks.len();
            let networks = aggregate(
                networks.iter().filter_map(Host::as_network).collect(),
                self.options.max_merge_passes,
            );
            log::debug!("Aggregated {} networks into {}", before, networks.len());

            let merged = networks.into_iter().map(Host::from).chain(domains).collect();
            (tree, kept) = insert_uncovered(merged);
        }

        log::debug!(
            "Normalized {} targets to {} ({} rejected)",
            total,
            kept.len(),
            rejected.len()
        );

        Normalized {
            tree,
            hosts: kept,
            rejected,
        }
    }
}

/// Insert hosts broadest first, skipping any already covered.
fn insert_uncovered(mut hosts: Vec<Host>) -> (TargetTree, Vec<Host>) {
    hosts.sort_by_cached_key(Host::size_key);

    let mut tree = TargetTree::new();
    let mut kept = Vec::with_capacity(hosts.len());

    for host in hosts {
        if let Some(parent) = tree.search_host(&host) {
            log::trace!("{} is covered by {}", host, parent.host);
            continue;
        }
        tree.insert_host(host.clone(), ());
        kept.push(host);
    }

    (tree, kept)
}

/// Repeatedly merge sibling networks into their parents.
///
/// Expects a set where no network contains another, so that siblings sit
/// next to each other once sorted by address.
fn aggregate(mut networks: Vec<IpNet>, max_passes: usize) -> Vec<IpNet> {
    for pass in 0..max_passes {
        networks.sort_by(|a, b| {
            a.network()
                .cmp(&b.network())
                .then(a.prefix_len().cmp(&b.prefix_len()))
        });

        let mut merged = Vec::with_capacity(networks.len());
        let mut merges = 0;
        let mut iter = networks.into_iter().peekable();

        while let Some(net) = iter.next() {
            if let Some(&next) = iter.peek() {
                if let Ok(parent) = merge_subnets(net, next) {
                    log::trace!("Merged {} and {} into {}", net, next, parent);
                    iter.next();
                    merged.push(parent);
                    merges += 1;
                    continue;
                }
            }
            merged.push(net);
        }

        networks = merged;
        if merges == 0 {
            break;
        }
        log::debug!("Merge pass {}: {} merges", pass + 1, merges);
    }

    networks
}
