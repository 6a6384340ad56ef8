use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::{
    Check, CheckInfo, GlobalTenantId, Processor, ProcessorError, Prober, RecordLogger, Registry,
    Runner, Script, SecretProvider, SecretStore, Settings,
};

const PROBER_NAME: &str = "scripted";

#[derive(Debug, Error)]
pub enum ScriptedError {
    /// The check configuration carries no scripted settings block.
    #[error("unsupported check")]
    UnsupportedCheck,
    /// The execution engine rejected the script/timeout combination.
    #[error(transparent)]
    Bind(#[from] ProcessorError),
}

/// Immutable execution descriptor: script body, run settings and check
/// metadata, copied out of the check configuration once at construction.
#[derive(Debug, Clone)]
pub struct ScriptModule {
    pub prober: String,
    pub script: Script,
}

/// Prober for checks whose behavior is a user-supplied script. Owns the
/// descriptor and the bound engine handle; resolves tenant credentials fresh
/// on every probe because they may rotate between cycles.
pub struct ScriptedProber {
    module: ScriptModule,
    processor: Processor,
    credentials: CredentialsRetriever,
}

impl fmt::Debug for ScriptedProber {
    // manual impl: the processor and retriever hold trait-object handles
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedProber")
            .field("module", &self.module)
            .finish_non_exhaustive()
    }
}

impl ScriptedProber {
    pub fn new(
        check: &Check,
        runner: Arc<dyn Runner>,
        secrets: Arc<dyn SecretProvider>,
    ) -> Result<Self, ScriptedError> {
        let scripted = check
            .settings
            .scripted
            .as_ref()
            .ok_or(ScriptedError::UnsupportedCheck)?;

        let module = ScriptModule {
            prober: PROBER_NAME.to_string(),
            script: Script {
                script: scripted.script.clone(),
                settings: Settings {
                    timeout: check.timeout,
                },
                check_info: CheckInfo::from_check(check),
            },
        };

        let processor = Processor::new(module.script.clone(), runner)?;

        Ok(Self {
            module,
            processor,
            credentials: CredentialsRetriever::new(secrets, check.global_tenant_id()),
        })
    }

    pub fn module(&self) -> &ScriptModule {
        &self.module
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    fn name(&self) -> &'static str {
        PROBER_NAME
    }

    async fn probe(
        &self,
        target: &str,
        registry: &Registry,
        logger: &dyn RecordLogger,
    ) -> (bool, f64) {
        let store = match self.credentials.resolve().await {
            Ok(store) => store,
            Err(err) => {
                log::error!(
                    "[{} / {}] tenant {}: running probe: {}",
                    self.name(),
                    target,
                    self.credentials.tenant,
                    err,
                );
                return (false, 0.0);
            }
        };

        match self.processor.run(target, registry, logger, store).await {
            // TODO(duration): extract the real run duration from the engine
            // once it reports one; until then every success reports zero.
            Ok(success) => (success, 0.0),
            Err(err) => {
                log::error!(
                    "[{} / {}] tenant {}: running probe: {}",
                    self.name(),
                    target,
                    self.credentials.tenant,
                    err,
                );
                (false, 0.0)
            }
        }
    }
}

/// Tenant-bound handle for fetching execution credentials. Kept as an
/// explicit value so tests can substitute the provider.
pub struct CredentialsRetriever {
    provider: Arc<dyn SecretProvider>,
    tenant: GlobalTenantId,
}

impl CredentialsRetriever {
    pub fn new(provider: Arc<dyn SecretProvider>, tenant: GlobalTenantId) -> Self {
        Self { provider, tenant }
    }

    /// Looks up the bound tenant's credentials. A provider answer of "none
    /// configured" yields the empty store so unauthenticated scripts still
    /// run; provider errors pass through unchanged, with no retries here.
    pub async fn resolve(&self) -> Result<SecretStore> {
        let credentials = self.provider.get_secret_credentials(self.tenant).await?;

        Ok(match credentials {
            Some(c) => SecretStore {
                url: c.url,
                token: c.token,
            },
            None => SecretStore::default(),
        })
    }
}
