//! Code normalization and validation

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Default pattern for entity codes.
pub const DEFAULT_CODE_PATTERN: &str = r"^[A-Z0-9_]+$";

/// Maps a raw code to the key used for comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationPolicy {
    /// Codes compare byte for byte.
    #[default]
    Exact,
    /// Surrounding whitespace is ignored.
    Trim,
    /// Case is ignored.
    CaseInsensitive,
    /// Surrounding whitespace and case are ignored.
    TrimCaseInsensitive,
}

impl NormalizationPolicy {
    pub fn normalize(&self, code: &str) -> String {
        match self {
            NormalizationPolicy::Exact => code.to_string(),
            NormalizationPolicy::Trim => code.trim().to_string(),
            NormalizationPolicy::CaseInsensitive => code.to_lowercase(),
            NormalizationPolicy::TrimCaseInsensitive => code.trim().to_lowercase(),
        }
    }

    /// True if both codes map to the same key.
    pub fn same(&self, a: &str, b: &str) -> bool {
        self.normalize(a) == self.normalize(b)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationPolicy::Exact => "exact",
            NormalizationPolicy::Trim => "trim",
            NormalizationPolicy::CaseInsensitive => "case_insensitive",
            NormalizationPolicy::TrimCaseInsensitive => "trim_case_insensitive",
        }
    }
}

impl fmt::Display for NormalizationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalizationPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "exact" | "identity" => Ok(NormalizationPolicy::Exact),
            "trim" => Ok(NormalizationPolicy::Trim),
            "case_insensitive" | "lowercase" => Ok(NormalizationPolicy::CaseInsensitive),
            "trim_case_insensitive" => Ok(NormalizationPolicy::TrimCaseInsensitive),
            _ => Err(DomainError::InvalidPolicy(s.to_string())),
        }
    }
}

/// Checks codes against the configured pattern.
#[derive(Debug, Clone)]
pub struct CodeValidator {
    pattern: Regex,
}

impl Default for CodeValidator {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_CODE_PATTERN).expect("default code pattern is valid"),
        }
    }
}

impl CodeValidator {
    pub fn new(pattern: &str) -> DomainResult<Self> {
        let pattern = Regex::new(pattern).map_err(|e| DomainError::InvalidCode {
            code: String::new(),
            pattern: format!("{pattern} ({e})"),
        })?;
        Ok(Self { pattern })
    }

    pub fn is_valid(&self, code: &str) -> bool {
        self.pattern.is_match(code)
    }

    pub fn validate(&self, code: &str) -> DomainResult<()> {
        if self.is_valid(code) {
            Ok(())
        } else {
            Err(DomainError::InvalidCode {
                code: code.to_string(),
                pattern: self.pattern.as_str().to_string(),
            })
        }
    }
}
