use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::compliance::ComplianceConfig;
use crate::eligibility::EligibilityConfig;
use crate::pricing::PricingConfig;
use crate::rotation::RotationConfig;
use crate::scoring::{BoostConfig, CompletenessWeights, EngagementConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    pub package_id: String,
    pub name: String,
    pub duration_hours: i64,
    pub base_price: f64,
    pub features: Vec<String>,
}

fn default_packages() -> Vec<PackageConfig> {
    vec![
        PackageConfig {
            package_id: "spark".to_string(),
            name: "Spark (24h)".to_string(),
            duration_hours: 24,
            base_price: 50.0,
            features: vec!["priority placement".to_string()],
        },
        PackageConfig {
            package_id: "surge".to_string(),
            name: "Surge (72h)".to_string(),
            duration_hours: 72,
            base_price: 120.0,
            features: vec![
                "priority placement".to_string(),
                "highlighted card".to_string(),
            ],
        },
        PackageConfig {
            package_id: "beacon".to_string(),
            name: "Beacon (7d)".to_string(),
            duration_hours: 168,
            base_price: 250.0,
            features: vec![
                "priority placement".to_string(),
                "highlighted card".to_string(),
                "top-of-search pin".to_string(),
            ],
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub data_path: String,
    pub read_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_path: "data/listings.json".to_string(),
            read_timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub completeness: CompletenessWeights,
    pub engagement: EngagementConfig,
    pub boost: BoostConfig,
    pub pricing: PricingConfig,
    pub eligibility: EligibilityConfig,
    pub rotation: RotationConfig,
    pub compliance: ComplianceConfig,
    pub packages: Vec<PackageConfig>,
    pub store: StoreConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            completeness: CompletenessWeights::default(),
            engagement: EngagementConfig::default(),
            boost: BoostConfig::default(),
            pricing: PricingConfig::default(),
            eligibility: EligibilityConfig::default(),
            rotation: RotationConfig::default(),
            compliance: ComplianceConfig::default(),
            packages: default_packages(),
            store: StoreConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                EngineConfig::default()
            }
        } else {
            EngineConfig::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload).map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        let completeness_total = self.completeness.total();
        if (completeness_total - 100.0).abs() > 1e-9 {
            return Err(format!(
                "completeness weights must sum to 100, got {}",
                completeness_total
            ));
        }

        let boost_total = self.boost.weights.total();
        if (boost_total - 1.0).abs() > 1e-9 {
            return Err(format!("boost weights must sum to 1.0, got {}", boost_total));
        }

        let interaction_total = self.engagement.interaction_total();
        if (interaction_total - 1.0).abs() > 1e-9 {
            return Err(format!(
                "interaction weights must sum to 1.0, got {}",
                interaction_total
            ));
        }
        let content_total = self.engagement.content_total();
        if (content_total - 1.0).abs() > 1e-9 {
            return Err(format!(
                "content weights must sum to 1.0, got {}",
                content_total
            ));
        }

        if self.pricing.minimum_price < 0.0 {
            return Err(format!(
                "minimum price must not be negative: {}",
                self.pricing.minimum_price
            ));
        }

        if !(0.0..=100.0).contains(&self.rotation.target_synthetic_pct) {
            return Err(format!(
                "rotation target percentage out of range (0-100): {}",
                self.rotation.target_synthetic_pct
            ));
        }
        if !(0.0..=100.0).contains(&self.rotation.tolerance_pct) {
            return Err(format!(
                "rotation tolerance out of range (0-100): {}",
                self.rotation.tolerance_pct
            ));
        }

        if self.packages.is_empty() {
            return Err("at least one boost package must be configured".to_string());
        }
        for package in &self.packages {
            if package.duration_hours <= 0 {
                return Err(format!(
                    "package {} must have a positive duration",
                    package.package_id
                ));
            }
        }

        Ok(())
    }

    pub fn package(&self, package_id: &str) -> Option<&PackageConfig> {
        self.packages
            .iter()
            .find(|package| package.package_id == package_id)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("ENGINE_ENFORCE_RECOVERY_GATE") {
            if let Ok(parsed) = value.parse::<bool>() {
                self.compliance.enforce_recovery_gate = parsed;
            }
        }
        if let Ok(value) = env::var("ENGINE_POLL_INTERVAL_SECS") {
            if let Ok(parsed) = value.parse::<u64>() {
                self.compliance.poll_interval_secs = parsed;
            }
        }
        if let Ok(value) = env::var("ENGINE_MIN_PRICE") {
            if let Ok(parsed) = value.parse::<f64>() {
                self.pricing.minimum_price = parsed;
            }
        }
        if let Ok(value) = env::var("ENGINE_DATA_PATH") {
            if !value.trim().is_empty() {
                self.store.data_path = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("ENGINE_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/engine.toml")))
}
