use dashmap::DashMap;

/// Metrics handle supplied by the caller for a single probe run. Write-only
/// from this component's side; the caller scrapes it after the probe.
#[derive(Debug, Default)]
pub struct Registry {
    samples: DashMap<String, f64>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self, name: &str) {
        self.add(name, 1.0);
    }

    pub fn add(&self, name: &str, v: f64) {
        *self.samples.entry(name.to_string()).or_insert(0.0) += v;
    }

    pub fn set(&self, name: &str, v: f64) {
        self.samples.insert(name.to_string(), v);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.samples.get(name).map(|v| *v)
    }
}
