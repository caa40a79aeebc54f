//! # Configuration
//!
//! Toolchain locations for the snarkjs backend and the admission threshold.
//!
//! Values come from built-in defaults, then an optional YAML file, then
//! `NIKZK_*` environment variables:
//!
//! ```yaml
//! toolchain:
//!   node: /usr/bin/node
//!   proving_key: /srv/nikzk/proof_circuit.zkey
//!   timeout_secs: 60
//! admission:
//!   min_age: 21
//! ```
//!
//! | Variable | Field |
//! |---|---|
//! | `NIKZK_NODE` | `toolchain.node` |
//! | `NIKZK_SNARKJS` | `toolchain.snarkjs` |
//! | `NIKZK_WITNESS_GENERATOR` | `toolchain.witness_generator` |
//! | `NIKZK_CIRCUIT_WASM` | `toolchain.circuit_wasm` |
//! | `NIKZK_PROVING_KEY` | `toolchain.proving_key` |
//! | `NIKZK_VERIFICATION_KEY` | `toolchain.verification_key` |
//! | `NIKZK_TOOL_TIMEOUT_SECS` | `toolchain.timeout_secs` |
//! | `NIKZK_MIN_AGE` | `admission.min_age` |
//! | `NIKZK_CURRENT_YEAR` | `admission.current_year` |

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use nikzk_core::{AdmissionPolicy, DEFAULT_MIN_AGE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default external tool budget.
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 120;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid YAML for this schema.
    #[error("failed to parse config file {}: {source}", .path.display())]
    YamlParse {
        /// File that was parsed.
        path: PathBuf,
        /// Parser error.
        source: serde_yaml::Error,
    },

    /// An environment override has an unusable value.
    #[error("invalid value for {var}: \"{value}\"")]
    InvalidEnv {
        /// Variable name.
        var: String,
        /// Offending value.
        value: String,
    },
}

/// Locations of the external proving toolchain and its artifacts.
///
/// Relative paths resolve against the process working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Node.js binary used to run the witness generator.
    pub node: PathBuf,
    /// snarkjs binary.
    pub snarkjs: PathBuf,
    /// Witness generator script emitted by the circuit compiler.
    pub witness_generator: PathBuf,
    /// Compiled circuit.
    pub circuit_wasm: PathBuf,
    /// Groth16 proving key.
    pub proving_key: PathBuf,
    /// Groth16 verification key.
    pub verification_key: PathBuf,
    /// Wall-clock budget for each tool invocation.
    pub timeout_secs: u64,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            node: PathBuf::from("node"),
            snarkjs: PathBuf::from("snarkjs"),
            witness_generator: PathBuf::from("build/proof_circuit_js/generate_witness.js"),
            circuit_wasm: PathBuf::from("build/proof_circuit_js/proof_circuit.wasm"),
            proving_key: PathBuf::from("build/proof_circuit.zkey"),
            verification_key: PathBuf::from("build/verification_key.json"),
            timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
        }
    }
}

impl ToolchainConfig {
    /// Per-invocation timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Circuit artifacts that do not exist on disk.
    pub fn missing_artifacts(&self) -> Vec<&Path> {
        [
            &self.witness_generator,
            &self.circuit_wasm,
            &self.proving_key,
            &self.verification_key,
        ]
        .into_iter()
        .map(PathBuf::as_path)
        .filter(|p| !p.exists())
        .collect()
    }
}

/// Admission threshold settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdmissionConfig {
    /// Minimum age in whole years.
    pub min_age: u32,
    /// Fixed reference year; the current UTC year when absent.
    pub current_year: Option<i32>,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            min_age: DEFAULT_MIN_AGE,
            current_year: None,
        }
    }
}

impl AdmissionConfig {
    /// The policy these settings describe.
    pub fn policy(&self) -> AdmissionPolicy {
        match self.current_year {
            Some(year) => AdmissionPolicy::new(self.min_age, year),
            None => AdmissionPolicy::for_current_year(self.min_age),
        }
    }
}

/// Complete nikzk configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NikzkConfig {
    /// External toolchain.
    pub toolchain: ToolchainConfig,
    /// Admission threshold.
    pub admission: AdmissionConfig,
}

impl NikzkConfig {
    /// Load defaults, an optional YAML file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Parse a YAML config file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `NIKZK_*` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tc = &mut self.toolchain;
        for (var, slot) in [
            ("NIKZK_NODE", &mut tc.node),
            ("NIKZK_SNARKJS", &mut tc.snarkjs),
            ("NIKZK_WITNESS_GENERATOR", &mut tc.witness_generator),
            ("NIKZK_CIRCUIT_WASM", &mut tc.circuit_wasm),
            ("NIKZK_PROVING_KEY", &mut tc.proving_key),
            ("NIKZK_VERIFICATION_KEY", &mut tc.verification_key),
        ] {
            if let Some(value) = lookup(var) {
                *slot = PathBuf::from(value);
            }
        }
        if let Some(secs) = parse_var(&lookup, "NIKZK_TOOL_TIMEOUT_SECS")? {
            tc.timeout_secs = secs;
        }
        if let Some(min_age) = parse_var(&lookup, "NIKZK_MIN_AGE")? {
            self.admission.min_age = min_age;
        }
        if let Some(year) = parse_var(&lookup, "NIKZK_CURRENT_YEAR")? {
            self.admission.current_year = Some(year);
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                var: var.to_string(),
                value,
            }),
    }
}
