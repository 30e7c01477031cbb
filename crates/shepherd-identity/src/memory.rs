//! In-memory resolver for local development and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use shepherd_core::{EndUserId, ProviderCustomerId};

use crate::error::Result;
use crate::CustomerResolver;

/// Resolver backed by a process-local map.
#[derive(Debug, Default)]
pub struct InMemoryResolver {
    customers: RwLock<HashMap<EndUserId, ProviderCustomerId>>,
}

impl InMemoryResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Link a user to a customer.
    #[must_use]
    pub fn with_customer(mut self, user_id: EndUserId, customer_id: ProviderCustomerId) -> Self {
        self.customers.get_mut().insert(user_id, customer_id);
        self
    }

    /// Link a user to a customer, replacing any previous link.
    pub async fn link(&self, user_id: EndUserId, customer_id: ProviderCustomerId) {
        self.customers.write().await.insert(user_id, customer_id);
    }

    /// Remove a user's link.
    pub async fn unlink(&self, user_id: &EndUserId) -> Option<ProviderCustomerId> {
        self.customers.write().await.remove(user_id)
    }
}

#[async_trait]
impl CustomerResolver for InMemoryResolver {
    async fn resolve(&self, user_id: &EndUserId) -> Result<Option<ProviderCustomerId>> {
        Ok(self.customers.read().await.get(user_id).cloned())
    }
}
