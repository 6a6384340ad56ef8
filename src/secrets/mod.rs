use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::GlobalTenantId;

/// Execution credentials for a tenant's remote script runner, as stored by
/// the secret backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretCredentials {
    pub url: String,
    pub token: String,
}

/// Source of tenant-scoped script-runner credentials. `Ok(None)` means no
/// credentials are configured for the tenant, which is a valid state and not
/// an error. Retry and backoff are the provider's responsibility.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn get_secret_credentials(
        &self,
        tenant: GlobalTenantId,
    ) -> Result<Option<SecretCredentials>>;
}
