//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/access-core/access-core.toml`
//! 3. Local config: `<dir>/.access-core.toml`
//! 4. Environment variables: `ACCESS_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{CodeValidator, EntityKind, NormalizationPolicy, DEFAULT_CODE_PATTERN};

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub normalization: Option<NormalizationPolicy>,
    pub policies: Option<BTreeMap<String, NormalizationPolicy>>,
    pub code_pattern: Option<String>,
    pub strict_codes: Option<bool>,
}

/// Unified configuration for access-core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Code comparison for kinds without an explicit policy (default: exact)
    pub normalization: NormalizationPolicy,
    /// Per-kind overrides, keyed by kind name (e.g. `role = "exact"`)
    pub policies: BTreeMap<String, NormalizationPolicy>,
    /// Regex every entity code must match
    pub code_pattern: String,
    /// Reject data with invalid codes instead of warning
    pub strict_codes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            normalization: NormalizationPolicy::Exact,
            policies: BTreeMap::new(),
            code_pattern: DEFAULT_CODE_PATTERN.to_string(),
            strict_codes: false,
        }
    }
}

/// Get the XDG config directory for access-core.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "access-core").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("access-core.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".access-core.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Policy for one entity kind: its override, else the default policy.
    pub fn policy_for(&self, kind: EntityKind) -> NormalizationPolicy {
        self.policies
            .get(kind.as_str())
            .copied()
            .unwrap_or(self.normalization)
    }

    /// Merge overlay onto self.
    ///
    /// - Scalars: overlay wins if Some, otherwise keep base
    /// - Policies: per-kind union, overlay entries win
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let mut policies = self.policies.clone();
        if let Some(extra) = &overlay.policies {
            for (kind, policy) in extra {
                policies.insert(kind.to_ascii_lowercase(), *policy);
            }
        }
        Self {
            normalization: overlay.normalization.unwrap_or(self.normalization),
            policies,
            code_pattern: overlay
                .code_pattern
                .clone()
                .unwrap_or_else(|| self.code_pattern.clone()),
            strict_codes: overlay.strict_codes.unwrap_or(self.strict_codes),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding `.access-core.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply ACCESS_* environment variables as explicit overrides.
    ///
    /// Per-kind policies use `ACCESS_POLICIES__<KIND>`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ACCESS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("normalization") {
            settings.normalization = val.parse()?;
        }
        if let Ok(val) = config.get_string("code_pattern") {
            settings.code_pattern = val;
        }
        if let Ok(val) = config.get_bool("strict_codes") {
            settings.strict_codes = val;
        }
        for kind in EntityKind::ALL {
            if let Ok(val) = config.get_string(&format!("policies.{}", kind.as_str())) {
                settings.policies.insert(kind.as_str().to_string(), val.parse()?);
            }
        }

        Ok(settings)
    }

    /// Check that the code pattern compiles and policy keys name real kinds.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        CodeValidator::new(&self.code_pattern).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })?;
        for kind in self.policies.keys() {
            kind.parse::<EntityKind>()
                .map_err(|e| ApplicationError::Config {
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// Render as TOML for display.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
