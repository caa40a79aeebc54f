//! # snarkjs Process Backend
//!
//! Groth16 proving and verification by driving the circom witness
//! generator under Node.js and the `snarkjs` CLI.
//!
//! Every operation gets its own scratch directory (removed on drop), so
//! concurrent requests never share `input.json`, `witness.wtns`,
//! `proof.json`, or `public.json`.
//!
//! ```text
//! prove:   node <generate_witness.js> <circuit.wasm> input.json witness.wtns
//!          snarkjs groth16 prove <zkey> witness.wtns proof.json public.json
//! verify:  snarkjs groth16 verify <vkey> public.json proof.json
//! ```

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use nikzk_core::CircuitInputs;
use serde::de::DeserializeOwned;
use tempfile::TempDir;

use crate::config::ToolchainConfig;
use crate::policy::ProofBackend;
use crate::runner::{run_tool, tool_name, ToolError, ToolOutput};
use crate::traits::{GeneratedProof, ProofError, ProofSystem, VerifyError};

const INPUT_FILE: &str = "input.json";
const WITNESS_FILE: &str = "witness.wtns";
const PROOF_FILE: &str = "proof.json";
const PUBLIC_FILE: &str = "public.json";

/// Groth16 backend that shells out to the snarkjs toolchain.
#[derive(Debug, Clone)]
pub struct SnarkjsProofSystem {
    config: ToolchainConfig,
}

impl SnarkjsProofSystem {
    /// Create a backend for the given toolchain.
    pub fn new(config: ToolchainConfig) -> Self {
        Self { config }
    }

    /// The toolchain this backend drives.
    pub fn config(&self) -> &ToolchainConfig {
        &self.config
    }

    fn scratch(&self, prefix: &str) -> Result<TempDir, ToolError> {
        Ok(tempfile::Builder::new().prefix(prefix).tempdir()?)
    }

    fn run(&self, program: &Path, args: &[&OsStr], cwd: &Path) -> Result<ToolOutput, ToolError> {
        run_tool(program, args, cwd, self.config.timeout())
    }
}

impl ProofSystem for SnarkjsProofSystem {
    fn backend(&self) -> ProofBackend {
        ProofBackend::Groth16
    }

    fn prove(&self, inputs: &CircuitInputs) -> Result<GeneratedProof, ProofError> {
        let scratch = self.scratch("nikzk-prove-")?;
        let dir = scratch.path();
        let input = dir.join(INPUT_FILE);
        let witness = dir.join(WITNESS_FILE);
        let proof = dir.join(PROOF_FILE);
        let public = dir.join(PUBLIC_FILE);

        let bytes = inputs.to_json_bytes().map_err(std::io::Error::from).map_err(ToolError::from)?;
        fs::write(&input, bytes).map_err(ToolError::from)?;

        self.run(
            &self.config.node,
            &[
                self.config.witness_generator.as_os_str(),
                self.config.circuit_wasm.as_os_str(),
                input.as_os_str(),
                witness.as_os_str(),
            ],
            dir,
        )?
        .ensure_success()?;

        self.run(
            &self.config.snarkjs,
            &[
                OsStr::new("groth16"),
                OsStr::new("prove"),
                self.config.proving_key.as_os_str(),
                witness.as_os_str(),
                proof.as_os_str(),
                public.as_os_str(),
            ],
            dir,
        )?
        .ensure_success()?;

        let tool = tool_name(&self.config.snarkjs);
        let proof: serde_json::Value = read_json(&proof, &tool)?;
        let public_signals: Vec<String> = read_json(&public, &tool)?;
        Ok(GeneratedProof {
            proof,
            public_signals,
        })
    }

    fn verify(
        &self,
        proof: &serde_json::Value,
        public_signals: &[String],
    ) -> Result<bool, VerifyError> {
        if !proof.is_object() {
            return Err(VerifyError::MalformedProof(
                "proof must be a JSON object".to_string(),
            ));
        }

        let scratch = self.scratch("nikzk-verify-")?;
        let dir = scratch.path();
        let proof_path = dir.join(PROOF_FILE);
        let public_path = dir.join(PUBLIC_FILE);
        write_json(&proof_path, proof)?;
        write_json(&public_path, public_signals)?;

        let output = self.run(
            &self.config.snarkjs,
            &[
                OsStr::new("groth16"),
                OsStr::new("verify"),
                self.config.verification_key.as_os_str(),
                public_path.as_os_str(),
                proof_path.as_os_str(),
            ],
            dir,
        )?;
        Ok(interpret_verify_output(output)?)
    }
}

/// Map `snarkjs groth16 verify` output to a validity answer.
///
/// `OK` on stdout means valid and `Invalid proof` means invalid, whatever
/// the exit status. Anything else is a tool failure.
pub fn interpret_verify_output(output: ToolOutput) -> Result<bool, ToolError> {
    let reports_ok = output.stdout.lines().any(|line| {
        let line = line.trim();
        line == "OK" || line.ends_with("OK!")
    });
    if reports_ok {
        return Ok(true);
    }
    if output.stdout.contains("Invalid proof") || output.stderr.contains("Invalid proof") {
        tracing::info!("snarkjs reported an invalid proof");
        return Ok(false);
    }
    Err(ToolError::Failed {
        diagnostic: output.diagnostic(),
        tool: output.tool,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path, tool: &str) -> Result<T, ProofError> {
    let content = fs::read(path).map_err(ToolError::from)?;
    serde_json::from_slice(&content).map_err(|e| ProofError::MalformedOutput {
        tool: tool.to_string(),
        detail: format!("{}: {e}", path.file_name().unwrap_or_default().to_string_lossy()),
    })
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ToolError> {
    let bytes = serde_json::to_vec(value).map_err(std::io::Error::from)?;
    fs::write(path, bytes)?;
    Ok(())
}
