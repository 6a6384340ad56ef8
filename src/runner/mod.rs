use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::time;

use crate::{Check, RecordLogger, Registry};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(with = "humantime_serde", default)]
    pub timeout: Duration,
}

/// Metadata used to tag one script execution. Derived from the check
/// configuration by a pure mapping; the engine treats it as opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInfo {
    pub check_type: String,
    pub metadata: HashMap<String, Value>,
}

impl CheckInfo {
    pub fn from_check(check: &Check) -> Self {
        let check_type = if check.is_scripted() {
            "scripted"
        } else {
            "unknown"
        };

        let mut metadata = HashMap::new();
        metadata.insert("id".to_string(), Value::from(check.id));
        metadata.insert("tenant_id".to_string(), Value::from(check.tenant_id));
        metadata.insert("region_id".to_string(), Value::from(check.region_id));
        metadata.insert("target".to_string(), Value::from(check.target.clone()));
        metadata.insert("job".to_string(), Value::from(check.job.clone()));

        Self {
            check_type: check_type.to_string(),
            metadata,
        }
    }
}

/// Script payload handed to the execution engine: body, run settings and
/// tagging metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub script: String,
    pub settings: Settings,
    pub check_info: CheckInfo,
}

/// Credentials in the form the engine consumes. Both fields empty when the
/// tenant runs unauthenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretStore {
    pub url: String,
    pub token: String,
}

/// The script execution engine. Implementations run the script against the
/// target and report whether it passed; infrastructure trouble is an `Err`,
/// a script that ran and failed its own assertions is `Ok(false)`.
#[async_trait]
pub trait Runner: Send + Sync {
    async fn run(
        &self,
        script: &Script,
        target: &str,
        registry: &Registry,
        logger: &dyn RecordLogger,
        secrets: SecretStore,
    ) -> Result<bool>;
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("script is empty")]
    EmptyScript,
    #[error("script timeout is zero")]
    ZeroTimeout,
}

/// Engine handle bound to one script. Binding validates the script/timeout
/// combination up front so a broken check fails at configuration time, not
/// on its first probe.
pub struct Processor {
    script: Script,
    runner: Arc<dyn Runner>,
}

impl fmt::Debug for Processor {
    // manual impl: the runner handle is a trait object
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
            .field("script", &self.script)
            .finish_non_exhaustive()
    }
}

impl Processor {
    pub fn new(script: Script, runner: Arc<dyn Runner>) -> Result<Self, ProcessorError> {
        if script.script.is_empty() {
            return Err(ProcessorError::EmptyScript);
        }
        if script.settings.timeout.is_zero() {
            return Err(ProcessorError::ZeroTimeout);
        }

        Ok(Self { script, runner })
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Runs the bound script once, enforcing the configured timeout.
    pub async fn run(
        &self,
        target: &str,
        registry: &Registry,
        logger: &dyn RecordLogger,
        secrets: SecretStore,
    ) -> Result<bool> {
        let timeout = self.script.settings.timeout;
        match time::timeout(
            timeout,
            self.runner.run(&self.script, target, registry, logger, secrets),
        )
        .await
        {
            Ok(res) => res,
            Err(_) => bail!("script timed out after {:?}", timeout),
        }
    }
}
