//! Sibling subnet merging.

use ipnet::IpNet;

use crate::error::{Error, Result};

/// Merge two sibling networks into their common parent.
///
/// Both networks are taken in network form. They must share an address
/// family and a prefix length, otherwise [`Error::IncompatibleNetworks`] is
/// returned. Their immediate parent blocks must be the same, otherwise
/// [`Error::NotSiblings`] is returned. Two copies of one network merge into
/// its parent. A /0 network has no parent and never merges.
///
/// # Examples
/// ```
/// use targettree::merge_subnets;
///
/// let low = "192.168.0.0/25".parse().unwrap();
/// let high = "192.168.0.128/25".parse().unwrap();
/// assert_eq!(merge_subnets(high, low).unwrap().to_string(), "192.168.0.0/24");
/// ```
pub fn merge_subnets(first: IpNet, second: IpNet) -> Result<IpNet> {
    let (first, second) = (first.trunc(), second.trunc());

    let same_family = matches!(
        (first, second),
        (IpNet::V4(_), IpNet::V4(_)) | (IpNet::V6(_), IpNet::V6(_))
    );
    if !same_family || first.prefix_len() != second.prefix_len() {
        return Err(Error::IncompatibleNetworks { first, second });
    }

    let (low, high) = if first.network() <= second.network() {
        (first, second)
    } else {
        (second, first)
    };

    match (low.supernet(), high.supernet()) {
        (Some(low_parent), Some(high_parent)) if low_parent == high_parent => {
            Ok(low_parent)
        }
        _ => Err(Error::NotSiblings {
            first: low,
            second: high,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> IpNet {
        s.parse().unwrap()
    }

    #[test]
    fn test_merge_ipv4_halves() {
        let merged = merge_subnets(net("192.168.0.0/25"), net("192.168.0.128/25")).unwrap();
        assert_eq!(merged, net("192.168.0.0/24"));
    }

    #[test]
    fn test_merge_order_independent() {
        let merged = merge_subnets(net("192.168.0.128/25"), net("192.168.0.0/25")).unwrap();
        assert_eq!(merged, net("192.168.0.0/24"));
    }

    #[test]
    fn test_merge_ipv6_halves() {
        let merged = merge_subnets(net("dead::/65"), net("dead::8000:0:0:0/65")).unwrap();
        assert_eq!(merged, net("dead::/64"));
    }

    #[test]
    fn test_merge_masks_host_bits() {
        let merged = merge_subnets(net("10.0.0.3/31"), net("10.0.0.1/31")).unwrap();
        assert_eq!(merged, net("10.0.0.0/30"));
    }

    #[test]
    fn test_not_siblings() {
        let result = merge_subnets(net("192.168.0.0/25"), net("192.168.2.128/25"));
        assert!(matches!(result, Err(Error::NotSiblings { .. })));

        // Adjacent but straddling a /24 boundary
        let result = merge_subnets(net("192.168.0.128/25"), net("192.168.1.0/25"));
        assert!(matches!(result, Err(Error::NotSiblings { .. })));
    }

    #[test]
    fn test_identical_networks_merge_into_parent() {
        let merged = merge_subnets(net("10.0.0.0/25"), net("10.0.0.0/25")).unwrap();
        assert_eq!(merged, net("10.0.0.0/24"));

        let merged = merge_subnets(net("10.0.0.200/25"), net("10.0.0.128/25")).unwrap();
        assert_eq!(merged, net("10.0.0.0/24"));
    }

    #[test]
    fn test_zero_prefix_has_no_parent() {
        let result = merge_subnets(net("0.0.0.0/0"), net("0.0.0.0/0"));
        assert!(matches!(result, Err(Error::NotSiblings { .. })));
    }

    #[test]
    fn test_incompatible_networks() {
        let result = merge_subnets(net("10.0.0.0/24"), net("10.0.1.0/25"));
        assert!(matches!(result, Err(Error::IncompatibleNetworks { .. })));

        let result = merge_subnets(net("10.0.0.0/24"), net("::/24"));
        assert!(matches!(result, Err(Error::IncompatibleNetworks { .. })));
    }
}
