use crate::verify::PANDA_VERIFY_SUCCESS_OUTPUT;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Search budget used when neither the config file nor the command line
/// sets one. Large enough to never trigger within a normal benchmark batch.
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 500_000;
pub const DEFAULT_VERIFIER_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    pub benchmark_root: PathBuf,
    pub results_root: PathBuf,
    pub plan_dir: PathBuf,
    pub search_timeout_secs: u64,
    pub planner: PlannerCommandConfig,
    pub verifier: VerifierConfig,
    pub suite: Option<Vec<SuiteDomainConfig>>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            benchmark_root: PathBuf::from("benchmarks"),
            results_root: PathBuf::from("."),
            plan_dir: PathBuf::from("output"),
            search_timeout_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
            planner: PlannerCommandConfig::default(),
            verifier: VerifierConfig::default(),
            suite: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerCommandConfig {
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierConfig {
    pub program: PathBuf,
    pub timeout_secs: u64,
    pub success_marker: String,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("./pandaPIparser"),
            timeout_secs: DEFAULT_VERIFIER_TIMEOUT_SECS,
            success_marker: PANDA_VERIFY_SUCCESS_OUTPUT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteDomainConfig {
    pub domain: String,
    #[serde(default)]
    pub domain_file: Option<PathBuf>,
    pub problems: Vec<PathBuf>,
}

impl HarnessConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read harness config {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("parse harness config {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: HarnessConfig = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.search_timeout_secs == 0 {
            return Err(anyhow!("search_timeout_secs must be > 0"));
        }
        if self.verifier.timeout_secs == 0 {
            return Err(anyhow!("verifier.timeout_secs must be > 0"));
        }
        if self.verifier.success_marker.trim().is_empty() {
            return Err(anyhow!("verifier.success_marker cannot be empty"));
        }
        if let Some(suite) = &self.suite {
            for entry in suite {
                if entry.domain.trim().is_empty() || entry.domain.contains('/') {
                    return Err(anyhow!(
                        "suite domain '{}' must be a non-empty name without '/'",
                        entry.domain
                    ));
                }
            }
        }
        Ok(())
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn verifier_timeout(&self) -> Duration {
        Duration::from_secs(self.verifier.timeout_secs)
    }
}
