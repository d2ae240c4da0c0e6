//! Runtime options for one relay instance.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use crate::dns::Error;

/// Port queries are forwarded to when the upstream spec names none.
pub const UPSTREAM_PORT: u16 = 53;

#[derive(Debug, Clone)]
pub struct Config {
    /// UDP port to listen on.
    pub port: u16,
    /// Address to bind the listening socket to.
    pub bind_addr: IpAddr,
    /// Resolver that takes every query this relay cannot answer itself.
    pub upstream: SocketAddr,
    /// Always forward upstream; never consult the name table for queries.
    pub redirect_only: bool,
    /// Hosts-style file backing the name table.
    pub table_path: PathBuf,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

/// All interfaces; the usual choice for a resolver serving a LAN.
pub fn default_bind_addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
}

/// Resolve an upstream spec of the form `host` or `host:port`; a bare
/// host gets the standard DNS port.
pub fn upstream_addr(spec: &str) -> Result<SocketAddr, Error> {
    let mut resolved = if spec.contains(':') {
        spec.to_socket_addrs()?
    } else {
        (spec, UPSTREAM_PORT).to_socket_addrs()?
    };
    resolved.next().ok_or_else(|| Error::Resolve(spec.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_port_53() {
        let addr = upstream_addr("8.8.8.8").unwrap();
        assert_eq!(addr, "8.8.8.8:53".parse().unwrap());
    }

    #[test]
    fn explicit_port_is_kept() {
        let addr = upstream_addr("127.0.0.1:5353").unwrap();
        assert_eq!(addr.port(), 5353);
    }

    #[test]
    fn unresolvable_spec_is_an_error() {
        assert!(upstream_addr("").is_err());
    }

    #[test]
    fn listen_addr_combines_bind_and_port() {
        let config = Config {
            port: 3053,
            bind_addr: default_bind_addr(),
            upstream: "8.8.8.8:53".parse().unwrap(),
            redirect_only: false,
            table_path: PathBuf::from("table"),
        };
        assert_eq!(config.listen_addr(), "0.0.0.0:3053".parse().unwrap());
    }
}
