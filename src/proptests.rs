use super::*;

use ipnet::{Ipv4Net, Ipv6Net};
use proptest::prelude::*;
use std::net::{Ipv4Addr, Ipv6Addr};

fn v4_net(value: u32, prefix: u8) -> Ipv4Net {
    Ipv4Net::new(Ipv4Addr::from(value), prefix).unwrap().trunc()
}

fn v6_net(value: u128, prefix: u8) -> Ipv6Net {
    Ipv6Net::new(Ipv6Addr::from(value), prefix).unwrap().trunc()
}

/// Bits below `prefix` set, the rest clear.
fn v4_host_mask(prefix: u8) -> u32 {
    u32::MAX.checked_shr(u32::from(prefix)).unwrap_or(0)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_address_finds_most_specific_containing_network(
        base in any::<u32>(),
        prefix in 0u8..=32,
        inner in any::<u32>(),
        extra in 1u8..=32,
        query in any::<u32>(),
    ) {
        let outer = v4_net(base, prefix);
        let network = u32::from(outer.network());

        let mut tree = TargetTree::new();
        tree.insert(outer).unwrap();

        let nested = (prefix < 32).then(|| {
            v4_net(network | (inner & v4_host_mask(prefix)), (prefix + extra).min(32))
        });
        if let Some(net) = nested {
            tree.insert(net).unwrap();
        }

        let addr = Ipv4Addr::from(network | (query & v4_host_mask(prefix)));
        let expected = Host::from(match nested {
            Some(net) if net.contains(&addr) => net,
            _ => outer,
        });
        prop_assert_eq!(tree.search(addr).unwrap(), Some(&expected));
    }

    #[test]
    fn prop_ipv4_and_ipv6_with_same_bits_never_match(value in any::<u32>(), prefix in 0u8..=32) {
        let v4 = v4_net(value, prefix);
        let v6_high = v6_net(u128::from(value) << 96, prefix);
        let v6_low = Ipv6Addr::from(u128::from(value));

        let mut tree = TargetTree::new();
        tree.insert(v4).unwrap();
        prop_assert!(tree.search(Ipv4Addr::from(value)).unwrap().is_some());
        prop_assert!(tree.search(v6_high).unwrap().is_none());
        prop_assert!(tree.search(v6_low).unwrap().is_none());

        let mut tree = TargetTree::new();
        tree.insert(v6_high).unwrap();
        prop_assert!(tree.search(v4).unwrap().is_none());
        prop_assert!(tree.search(Ipv4Addr::from(value)).unwrap().is_none());
    }

    #[test]
    fn prop_broader_ipv4_query_finds_nothing(
        value in any::<u32>(),
        prefix in 1u8..=32,
        broader in any::<u8>(),
    ) {
        let stored = v4_net(value, prefix);
        let query = v4_net(value, broader % prefix);

        let mut tree = TargetTree::new();
        tree.insert(stored).unwrap();
        prop_assert!(tree.search(query).unwrap().is_none());
        prop_assert!(tree.search(stored).unwrap().is_some());
    }

    #[test]
    fn prop_broader_ipv6_query_finds_nothing(
        value in any::<u128>(),
        prefix in 1u8..=128,
        broader in any::<u8>(),
    ) {
        let stored = v6_net(value, prefix);
        let query = v6_net(value, broader % prefix);

        let mut tree = TargetTree::new();
        tree.insert(stored).unwrap();
        prop_assert!(tree.search(query).unwrap().is_none());
        prop_assert!(tree.search(stored).unwrap().is_some());
    }

    #[test]
    fn prop_ancestor_domain_query_finds_nothing(
        labels in prop::collection::vec("[a-z]{1,10}", 2..6),
    ) {
        let name = labels.join(".");
        let parent = labels[1..].join(".");
        let child = format!("www.{}", name);

        let mut tree = TargetTree::new();
        tree.insert(name.as_str()).unwrap();
        prop_assert!(tree.search(parent.as_str()).unwrap().is_none());
        prop_assert_eq!(tree.search(child.as_str()).unwrap().map(Host::to_string), Some(name));
    }
}
