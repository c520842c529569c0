//! Harness provisioning spec
//!
//! Describes what the outer harness must provision before this benchmark can
//! run: the cloud, the API scopes, and the VM shape. Mostly opaque
//! passthrough for the provisioner; the adapter only forwards the scopes to
//! the host's auth step.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Provisioning requirements for the benchmark host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessSpec {
    /// Cloud the benchmark targets.
    #[serde(default = "default_cloud")]
    pub cloud: String,

    /// API scopes the host's credentials need.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// Shape of the VM to provision.
    #[serde(default)]
    pub vm: VmSpec,
}

/// VM shape passthrough.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmSpec {
    #[serde(default = "default_machine_type")]
    pub machine_type: String,

    #[serde(default = "default_zone")]
    pub zone: String,
}

fn default_cloud() -> String {
    "GCP".to_string()
}

fn default_scopes() -> Vec<String> {
    vec!["https://www.googleapis.com/auth/bigquery".to_string()]
}

fn default_machine_type() -> String {
    "n1-standard-16".to_string()
}

fn default_zone() -> String {
    "us-central1-f".to_string()
}

impl Default for HarnessSpec {
    fn default() -> Self {
        Self {
            cloud: default_cloud(),
            scopes: default_scopes(),
            vm: VmSpec::default(),
        }
    }
}

impl Default for VmSpec {
    fn default() -> Self {
        Self {
            machine_type: default_machine_type(),
            zone: default_zone(),
        }
    }
}

impl HarnessSpec {
    /// Load a spec from a TOML file.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_benchmark_requirements() {
        let spec = HarnessSpec::default();
        assert_eq!(spec.cloud, "GCP");
        assert_eq!(spec.scopes, ["https://www.googleapis.com/auth/bigquery"]);
        assert_eq!(spec.vm.machine_type, "n1-standard-16");
        assert_eq!(spec.vm.zone, "us-central1-f");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let spec: HarnessSpec = toml::from_str("[vm]\nzone = \"europe-west1-b\"\n").unwrap();
        assert_eq!(spec.vm.zone, "europe-west1-b");
        assert_eq!(spec.vm.machine_type, "n1-standard-16");
        assert_eq!(spec.cloud, "GCP");
    }
}
