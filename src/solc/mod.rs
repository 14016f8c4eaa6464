//! Solidity compilation subsystem.
//!
//! # Data Flow
//! ```text
//! contract source text
//!     → artifacts.rs (standard-JSON input document)
//!     → solc --standard-json subprocess (bounded by timeout)
//!     → artifacts.rs (output parsing, severity filtering, selection)
//!     → Artifact (name + ABI + creation bytecode)
//! ```
//!
//! # Design Decisions
//! - The compiler runs as a child process, never on a runtime thread, so a
//!   slow compile cannot stall other requests
//! - `kill_on_drop` guarantees an expired deadline also reaps the child
//! - Error-severity diagnostics reject the source; warnings are logged only

pub mod artifacts;

use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::schema::CompilerConfig;

pub use artifacts::{Artifact, Diagnostic, Severity, StandardJsonInput, StandardJsonOutput};

/// Errors from compiling a source or selecting a deployable contract.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The compiler binary could not be started.
    #[error("failed to run solc at '{path}': {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The compiler exceeded its deadline and was killed.
    #[error("solc timed out after {0}s")]
    Timeout(u64),

    /// The compiler exited abnormally without usable output.
    #[error("solc exited with {status}: {stderr}")]
    Abnormal { status: String, stderr: String },

    /// Standard-JSON interchange with the compiler failed.
    #[error("malformed compiler JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The source has error-severity diagnostics.
    #[error("Compilation failed")]
    Rejected(Vec<Diagnostic>),

    /// The source defines no contract at all.
    #[error("no contract found in source")]
    NoContract,

    /// The source defines several contracts and no contractName was given.
    #[error("source defines multiple contracts ({0}); specify contractName")]
    Ambiguous(String),

    /// The requested contractName does not exist in the source.
    #[error("contract '{0}' not found in source")]
    UnknownContract(String),

    /// The selected contract has no creation bytecode (interface/abstract).
    #[error("contract '{0}' has no deployable bytecode")]
    NoBytecode(String),

    /// The compiler emitted bytecode that is not valid hex.
    #[error("contract '{0}' has malformed bytecode: {1}")]
    BadBytecode(String, String),
}

/// Bounded driver for `solc --standard-json`.
#[derive(Debug, Clone)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Compile one source file and reject it on error-severity diagnostics.
    ///
    /// Warnings do not block; they are logged and dropped from the result
    /// path. The returned output still carries them for callers that want to
    /// surface them.
    pub async fn compile(&self, contract_code: &str) -> Result<StandardJsonOutput, CompileError> {
        let input = StandardJsonInput::single_source(contract_code);
        let payload = serde_json::to_vec(&input)?;

        let mut child = Command::new(&self.config.solc_path)
            .arg("--standard-json")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CompileError::Spawn {
                path: self.config.solc_path.clone(),
                source: e,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload).await.map_err(|e| CompileError::Spawn {
                path: self.config.solc_path.clone(),
                source: e,
            })?;
        }

        let deadline = Duration::from_secs(self.config.timeout_secs);
        let output = timeout(deadline, child.wait_with_output())
            .await
            .map_err(|_| CompileError::Timeout(self.config.timeout_secs))?
            .map_err(|e| CompileError::Spawn {
                path: self.config.solc_path.clone(),
                source: e,
            })?;

        // solc reports source problems inside the JSON document with exit
        // code 0; a non-zero exit with empty stdout is an invocation problem.
        if output.stdout.is_empty() {
            return Err(CompileError::Abnormal {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let parsed: StandardJsonOutput = serde_json::from_slice(&output.stdout)?;

        let errors = parsed.error_diagnostics();
        if !errors.is_empty() {
            tracing::warn!(count = errors.len(), "Compilation rejected by solc");
            return Err(CompileError::Rejected(errors));
        }

        for warning in parsed.warning_diagnostics() {
            tracing::warn!(diagnostic = warning.message(), "Compiler warning");
        }

        Ok(parsed)
    }
}
