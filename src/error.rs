//! Error types for targettree.

use ipnet::IpNet;
use thiserror::Error;

/// Error type for targettree operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Input is neither an IP address/network nor an encodable domain name
    #[error("invalid host: {0:?}")]
    InvalidHost(String),

    /// Networks differ in address family or prefix length
    #[error("cannot merge networks of different family or prefix length: {first} and {second}")]
    IncompatibleNetworks { first: IpNet, second: IpNet },

    /// Networks are not the two halves of one parent block
    #[error("cannot merge {first} and {second}: they do not share a parent network")]
    NotSiblings { first: IpNet, second: IpNet },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for targettree operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_host_display() {
        let err = Error::InvalidHost("bad host".into());
        assert_eq!(err.to_string(), "invalid host: \"bad host\"");
    }

    #[test]
    fn test_not_siblings_display_names_both_networks() {
        let err = Error::NotSiblings {
            first: "192.168.0.0/25".parse().unwrap(),
            second: "192.168.2.128/25".parse().unwrap(),
        };
        let display = err.to_string();
        assert!(display.contains("192.168.0.0/25"), "got: {}", display);
        assert!(display.contains("192.168.2.128/25"), "got: {}", display);
    }
}
