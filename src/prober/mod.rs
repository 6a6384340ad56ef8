mod scripted;
pub use scripted::*;

use async_trait::async_trait;

use crate::{RecordLogger, Registry};

/// Uniform probe surface the agent scheduler drives. Every prober kind yields
/// the same (success, duration-in-seconds) pair; infrastructure errors and
/// logical check failures are indistinguishable at this boundary.
#[async_trait]
pub trait Prober: Send + Sync {
    fn name(&self) -> &'static str;

    async fn probe(
        &self,
        target: &str,
        registry: &Registry,
        logger: &dyn RecordLogger,
    ) -> (bool, f64);
}
