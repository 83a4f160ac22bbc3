//! Host descriptors: IP networks and canonical domain names.

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::borrow::Cow;
use std::cmp::Reverse;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Longest encoded domain name accepted, in octets.
const MAX_NAME_LEN: usize = 253;

/// Longest single label accepted, in octets.
const MAX_LABEL_LEN: usize = 63;

/// Characters that never appear in a host name even though IDNA lets them through.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '@', ':', '#', '?', '%', '[', ']', '<', '>', '^', '|', '"'];

/// The key space a host belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HostKind {
    /// IPv4 network or address
    Ipv4,
    /// IPv6 network or address
    Ipv6,
    /// DNS name
    Domain,
}

impl HostKind {
    /// Position of this kind in per-kind tables.
    pub(crate) fn index(self) -> usize {
        match self {
            HostKind::Ipv4 => 0,
            HostKind::Ipv6 => 1,
            HostKind::Domain => 2,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            HostKind::Ipv4 => "IPV4",
            HostKind::Ipv6 => "IPV6",
            HostKind::Domain => "DNS",
        }
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A target or query: an IP network or a DNS name.
///
/// Networks are always held in network form (host bits zeroed) and bare
/// addresses become /32 or /128 networks. Domains are held in canonical
/// form: IDNA-encoded, lowercase, without a trailing dot.
///
/// [`Host::parse`] and the `From` conversions uphold these invariants.
/// Hosts assembled from the variants directly are brought into canonical
/// form whenever they are inserted or looked up.
///
/// # Examples
/// ```
/// use targettree::{Host, HostKind};
///
/// let net = Host::parse("192.168.1.77/24").unwrap();
/// assert_eq!(net.to_string(), "192.168.1.0/24");
///
/// let name = Host::parse("WWW.Example.COM.").unwrap();
/// assert_eq!(name.to_string(), "www.example.com");
/// assert_eq!(name.kind(), HostKind::Domain);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Host {
    /// IPv4 or IPv6 network
    Network(IpNet),
    /// Canonical DNS name
    Domain(String),
}

/// Sort key placing broader hosts before narrower ones.
///
/// Networks with more addresses come first; domains with fewer labels come
/// first. The canonical text breaks ties so the order is total.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SizeKey {
    Network { host_bits: Reverse<u8>, text: String },
    Domain { labels: usize, text: String },
}

impl Host {
    /// Parse a host from a string.
    ///
    /// The string is tried as an IP network (`10.0.0.0/8`, host bits are
    /// masked) and as an IP address first; only if both fail is it treated
    /// as a domain name. Strings that are neither yield
    /// [`Error::InvalidHost`].
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if let Some(net) = parse_network(input) {
            return Ok(Host::Network(net));
        }

        canonical_domain(input)
            .map(Host::Domain)
            .ok_or_else(|| Error::InvalidHost(input.to_string()))
    }

    /// Get the key space of this host.
    pub fn kind(&self) -> HostKind {
        match self {
            Host::Network(IpNet::V4(_)) => HostKind::Ipv4,
            Host::Network(IpNet::V6(_)) => HostKind::Ipv6,
            Host::Domain(_) => HostKind::Domain,
        }
    }

    /// Check if this host is an IP network.
    pub fn is_network(&self) -> bool {
        matches!(self, Host::Network(_))
    }

    /// Get the network, if this host is one.
    pub fn as_network(&self) -> Option<IpNet> {
        match self {
            Host::Network(net) => Some(*net),
            Host::Domain(_) => None,
        }
    }

    /// Bring a host into canonical form.
    ///
    /// Hosts built through [`Host::parse`] or the `From` conversions are
    /// already canonical and come back borrowed. A host assembled from its
    /// variants has its host bits masked and its name re-encoded; a name
    /// that is not a valid domain yields [`Error::InvalidHost`].
    pub fn canonicalize(&self) -> Result<Cow<'_, Host>> {
        match self {
            Host::Network(net) if *net != net.trunc() => {
                Ok(Cow::Owned(Host::Network(net.trunc())))
            }
            Host::Network(_) => Ok(Cow::Borrowed(self)),
            Host::Domain(name) => match canonical_domain(name.trim()) {
                Some(canonical) if canonical == *name => Ok(Cow::Borrowed(self)),
                Some(canonical) => Ok(Cow::Owned(Host::Domain(canonical))),
                None => Err(Error::InvalidHost(name.clone())),
            },
        }
    }

    /// Sort key ordering broader hosts before narrower ones.
    pub fn size_key(&self) -> SizeKey {
        match self {
            Host::Network(net) => SizeKey::Network {
                host_bits: Reverse(net.max_prefix_len() - net.prefix_len()),
                text: net.to_string(),
            },
            Host::Domain(name) => SizeKey::Domain {
                labels: name.split('.').count(),
                text: name.clone(),
            },
        }
    }
}

/// Parse a CIDR network or a bare address into network form.
fn parse_network(input: &str) -> Option<IpNet> {
    if let Ok(net) = input.parse::<IpNet>() {
        return Some(net.trunc());
    }
    input.parse::<IpAddr>().ok().map(IpNet::from)
}

/// IDNA-encode a name and check DNS length limits.
fn canonical_domain(input: &str) -> Option<String> {
    let name = input.strip_suffix('.').unwrap_or(input);
    if name.is_empty() {
        return None;
    }

    let ascii = idna::domain_to_ascii(&name.to_lowercase()).ok()?;
    if ascii.len() > MAX_NAME_LEN {
        return None;
    }
    if ascii.contains(|c: char| c.is_whitespace() || c.is_control() || FORBIDDEN_CHARS.contains(&c)) {
        return None;
    }
    if ascii
        .split('.')
        .any(|label| label.is_empty() || label.len() > MAX_LABEL_LEN)
    {
        return None;
    }

    Some(ascii)
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Network(net) => write!(f, "{}", net),
            Host::Domain(name) => f.write_str(name),
        }
    }
}

impl FromStr for Host {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Host::parse(s)
    }
}

impl From<IpNet> for Host {
    fn from(net: IpNet) -> Self {
        Host::Network(net.trunc())
    }
}

impl From<Ipv4Net> for Host {
    fn from(net: Ipv4Net) -> Self {
        Host::from(IpNet::V4(net))
    }
}

impl From<Ipv6Net> for Host {
    fn from(net: Ipv6Net) -> Self {
        Host::from(IpNet::V6(net))
    }
}

impl From<IpAddr> for Host {
    fn from(addr: IpAddr) -> Self {
        Host::Network(IpNet::from(addr))
    }
}

impl From<Ipv4Addr> for Host {
    fn from(addr: Ipv4Addr) -> Self {
        Host::from(IpAddr::V4(addr))
    }
}

impl From<Ipv6Addr> for Host {
    fn from(addr: Ipv6Addr) -> Self {
        Host::from(IpAddr::V6(addr))
    }
}

/// Conversion into a [`Host`] for insertion or lookup.
///
/// Implemented for strings (parsed, may fail), for [`Host`] itself
/// (canonicalized, may fail), and for the `std::net` and `ipnet` address
/// and network types.
pub trait ToHost {
    /// Convert to a host, borrowing when the value already is one.
    fn to_host(&self) -> Result<Cow<'_, Host>>;
}

impl ToHost for Host {
    fn to_host(&self) -> Result<Cow<'_, Host>> {
        self.canonicalize()
    }
}

impl ToHost for str {
    fn to_host(&self) -> Result<Cow<'_, Host>> {
        Host::parse(self).map(Cow::Owned)
    }
}

impl ToHost for String {
    fn to_host(&self) -> Result<Cow<'_, Host>> {
        self.as_str().to_host()
    }
}

impl<T: ToHost + ?Sized> ToHost for &T {
    fn to_host(&self) -> Result<Cow<'_, Host>> {
        (**self).to_host()
    }
}

macro_rules! impl_to_host_for_ip {
    ($($ty:ty),*) => {
        $(
            impl ToHost for $ty {
                fn to_host(&self) -> Result<Cow<'_, Host>> {
                    Ok(Cow::Owned(Host::from(*self)))
                }
            }
        )*
    };
}

impl_to_host_for_ip!(IpNet, Ipv4Net, Ipv6Net, IpAddr, Ipv4Addr, Ipv6Addr);
