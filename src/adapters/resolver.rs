use crate::domain::ports::HostResolver;
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr};

/// Resolves through the operating system resolver and keeps the first IPv4 answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl HostResolver for SystemResolver {
    async fn resolve_ipv4(&self, host: &str) -> Option<Ipv4Addr> {
        match tokio::net::lookup_host((host, 0)).await {
            Ok(addrs) => addrs.into_iter().find_map(|addr| match addr.ip() {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            }),
            Err(e) => {
                tracing::debug!("Resolution failed for {}: {}", host, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_ipv4_literal() {
        let resolver = SystemResolver;
        assert_eq!(
            resolver.resolve_ipv4("127.0.0.1").await,
            Some(Ipv4Addr::LOCALHOST)
        );
    }

    #[tokio::test]
    async fn test_ipv6_literal_has_no_ipv4() {
        assert_eq!(SystemResolver.resolve_ipv4("::1").await, None);
    }
}
