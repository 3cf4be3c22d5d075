//! Identity provider.
//!
//! Login itself lives elsewhere; by the time a request reaches this service
//! it carries an opaque bearer token, and the provider turns that token into
//! a [`Principal`].

use crate::types::Principal;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Resolves bearer tokens into principals
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The principal behind `token`, or `None` if the token is unknown
    async fn resolve(&self, token: &str) -> Option<Principal>;
}

/// Token registry held in memory, seeded at startup
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    tokens: RwLock<HashMap<String, Principal>>,
}

impl InMemoryIdentityProvider {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue `token` for `principal`, replacing any previous holder
    pub async fn register(&self, token: impl Into<String>, principal: Principal) {
        let token = token.into();
        tracing::debug!(email = principal.email(), "Registered access token");
        self.tokens.write().await.insert(token, principal);
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn resolve(&self, token: &str) -> Option<Principal> {
        self.tokens.read().await.get(token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GuestId, OwnerId};

    #[tokio::test]
    async fn resolves_registered_tokens_only() {
        let identity = InMemoryIdentityProvider::new();
        let andrew = Principal::Guest {
            id: GuestId::new(),
            email: "andrew@doe.com.br".to_string(),
        };

        identity.register("andrew-token", andrew.clone()).await;

        assert_eq!(identity.resolve("andrew-token").await, Some(andrew));
        assert_eq!(identity.resolve("someone-else").await, None);
    }

    #[tokio::test]
    async fn register_replaces_previous_holder() {
        let identity = InMemoryIdentityProvider::new();
        let john = Principal::Owner {
            id: OwnerId::new(),
            email: "john@doe.com.br".to_string(),
        };
        let jane = Principal::Owner {
            id: OwnerId::new(),
            email: "jane@doe.com.br".to_string(),
        };

        identity.register("shared-token", john).await;
        identity.register("shared-token", jane.clone()).await;

        assert_eq!(identity.resolve("shared-token").await, Some(jane));
    }
}
