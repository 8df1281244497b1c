use std::net::IpAddr;
use tracing::debug;

/// How a sender's tag is derived from its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagResolver {
    /// Best-effort reverse DNS, falling back to the literal address.
    ReverseDns,
    /// Always the literal address.
    Literal,
}

impl TagResolver {
    pub fn from_config(resolve_hostnames: bool) -> Self {
        if resolve_hostnames {
            TagResolver::ReverseDns
        } else {
            TagResolver::Literal
        }
    }

    /// Resolve the tag for `addr`. Never fails and never returns an empty tag.
    ///
    /// Reverse lookups ask for a single name and use it when present.
    pub async fn resolve(self, addr: IpAddr) -> String {
        if self == TagResolver::Literal {
            return addr.to_string();
        }

        match tokio::task::spawn_blocking(move || dns_lookup::lookup_addr(&addr)).await {
            Ok(Ok(name)) if !name.trim().is_empty() => name,
            Ok(Ok(_)) => addr.to_string(),
            Ok(Err(e)) => {
                debug!(%addr, error = %e, "reverse lookup failed");
                addr.to_string()
            }
            Err(e) => {
                debug!(%addr, error = %e, "reverse lookup task failed");
                addr.to_string()
            }
        }
    }
}
