use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const REGION_BITS: u32 = 10;
const REGION_MASK: i64 = (1 << REGION_BITS) - 1;

/// Tenant identity unique across all regions. Per-region tenant ids repeat
/// between regions; secret lookups must be scoped by this one instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalTenantId(i64);

impl GlobalTenantId {
    pub fn from_local(tenant_id: i64, region_id: i64) -> Self {
        Self(tenant_id << REGION_BITS | (region_id & REGION_MASK))
    }

    pub fn tenant_id(&self) -> i64 {
        self.0 >> REGION_BITS
    }

    pub fn region_id(&self) -> i64 {
        self.0 & REGION_MASK
    }
}

impl fmt::Display for GlobalTenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One check definition as handed down by the agent. Read-only here: the
/// prober copies what it needs at construction and never writes back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Check {
    pub id: i64,
    pub tenant_id: i64,
    #[serde(default)]
    pub region_id: i64,
    pub target: String,
    #[serde(default)]
    pub job: String,
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
    #[serde(default)]
    pub settings: CheckSettings,
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckSettings {
    #[serde(default)]
    pub scripted: Option<ScriptedSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedSettings {
    pub script: String,
}

impl Check {
    pub fn is_scripted(&self) -> bool {
        self.settings.scripted.is_some()
    }

    pub fn global_tenant_id(&self) -> GlobalTenantId {
        GlobalTenantId::from_local(self.tenant_id, self.region_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_tenant_id_round_trip() {
        let id = GlobalTenantId::from_local(42, 7);
        assert_eq!(id.tenant_id(), 42);
        assert_eq!(id.region_id(), 7);
    }

    #[test]
    fn test_global_tenant_id_display() {
        let id = GlobalTenantId::from_local(3, 1);
        assert_eq!(id.to_string(), "3073");
    }

    #[test]
    fn test_global_tenant_id_differs_across_regions() {
        let a = GlobalTenantId::from_local(42, 1);
        let b = GlobalTenantId::from_local(42, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_check_from_yaml() {
        let raw = r#"
id: 5
tenant_id: 3
region_id: 1
target: https://example.org
job: demo
timeout: 5s
settings:
  scripted:
    script: "export default function() {}"
"#;
        let check: Check = serde_yaml::from_str(raw).unwrap();
        assert_eq!(check.timeout, Duration::from_secs(5));
        assert!(check.is_scripted());
        assert_eq!(
            check.settings.scripted.unwrap().script,
            "export default function() {}"
        );
    }

    #[test]
    fn test_check_without_scripted_block() {
        let raw = r#"
id: 5
tenant_id: 3
target: https://example.org
"#;
        let check: Check = serde_yaml::from_str(raw).unwrap();
        assert!(!check.is_scripted());
        assert_eq!(check.timeout, Duration::from_secs(10));
    }
}
