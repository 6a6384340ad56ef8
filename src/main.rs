use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use scriptprobe::{
    Check, CheckSettings, GlobalTenantId, MemoryLogger, Prober, RecordLogger, Registry, Runner,
    Script, ScriptedProber, ScriptedSettings, SecretCredentials, SecretProvider, SecretStore,
};

struct EchoRunner;

#[async_trait]
impl Runner for EchoRunner {
    async fn run(
        &self,
        script: &Script,
        target: &str,
        registry: &Registry,
        logger: &dyn RecordLogger,
        secrets: SecretStore,
    ) -> Result<bool> {
        logger.log(&format!(
            "running {} byte script against {}",
            script.script.len(),
            target
        ))?;
        if !secrets.url.is_empty() {
            logger.log(&format!("script runner endpoint: {}", secrets.url))?;
        }
        registry.inc("probe_script_runs_total");
        Ok(true)
    }
}

struct StaticSecrets;

#[async_trait]
impl SecretProvider for StaticSecrets {
    async fn get_secret_credentials(
        &self,
        _tenant: GlobalTenantId,
    ) -> Result<Option<SecretCredentials>> {
        Ok(None)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logforth::stdout().apply();

    let check = Check {
        id: 1,
        tenant_id: 1,
        region_id: 0,
        target: "https://example.org".to_string(),
        job: "demo".to_string(),
        timeout: Duration::from_secs(5),
        settings: CheckSettings {
            scripted: Some(ScriptedSettings {
                script: "export default function() {}".to_string(),
            }),
        },
    };

    let prober = ScriptedProber::new(&check, Arc::new(EchoRunner), Arc::new(StaticSecrets))?;

    let registry = Registry::new();
    let logger = MemoryLogger::new();
    let (success, duration) = prober.probe(&check.target, &registry, &logger).await;

    for line in logger.lines() {
        log::info!("[{} / {}] {}", prober.name(), check.target, line);
    }
    log::info!(
        "[{} / {}] success={} duration={}",
        prober.name(),
        check.target,
        success,
        duration,
    );

    Ok(())
}
