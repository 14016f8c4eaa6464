//! Compiler standard-JSON wire types and artifact selection.
//!
//! Shapes follow the solc `--standard-json` interface: one virtual source
//! file in, a `{source => {contract => output}}` map plus a diagnostics list
//! out. Only `abi` and `evm.bytecode` are requested.

use std::collections::BTreeMap;

use alloy::primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::solc::CompileError;

/// Name of the single virtual source file submitted to the compiler.
pub const VIRTUAL_SOURCE: &str = "Contract.sol";

/// `--standard-json` input document.
#[derive(Debug, Clone, Serialize)]
pub struct StandardJsonInput {
    language: &'static str,
    sources: BTreeMap<String, SourceContent>,
    settings: Settings,
}

#[derive(Debug, Clone, Serialize)]
struct SourceContent {
    content: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Settings {
    output_selection: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl StandardJsonInput {
    /// Input requesting ABI and creation bytecode for every contract in one
    /// virtual source file.
    pub fn single_source(contract_code: &str) -> Self {
        let mut sources = BTreeMap::new();
        sources.insert(
            VIRTUAL_SOURCE.to_string(),
            SourceContent {
                content: contract_code.to_string(),
            },
        );

        let mut per_contract = BTreeMap::new();
        per_contract.insert(
            "*".to_string(),
            vec!["abi".to_string(), "evm.bytecode".to_string()],
        );
        let mut output_selection = BTreeMap::new();
        output_selection.insert("*".to_string(), per_contract);

        Self {
            language: "Solidity",
            sources,
            settings: Settings { output_selection },
        }
    }
}

/// Diagnostic severity as reported by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// One compiler diagnostic.
///
/// Everything besides severity (message, formattedMessage, sourceLocation,
/// errorCode, ...) is kept opaque so it relays to the caller verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub detail: serde_json::Map<String, serde_json::Value>,
}

impl Diagnostic {
    /// The diagnostic message, best effort.
    pub fn message(&self) -> &str {
        self.detail
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown compiler diagnostic")
    }

    /// Serialize for the response envelope.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_else(|_| serde_json::Value::Null)
    }
}

/// `--standard-json` output document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StandardJsonOutput {
    #[serde(default)]
    pub errors: Vec<Diagnostic>,
    #[serde(default)]
    pub contracts: BTreeMap<String, BTreeMap<String, ContractOutput>>,
}

/// Per-contract compiler output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractOutput {
    #[serde(default)]
    pub abi: serde_json::Value,
    #[serde(default)]
    pub evm: EvmOutput,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvmOutput {
    #[serde(default)]
    pub bytecode: BytecodeOutput,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BytecodeOutput {
    /// Unprefixed hex of the creation code.
    #[serde(default)]
    pub object: String,
}

/// The ABI + creation-bytecode pair for one deployable contract.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub abi: serde_json::Value,
    pub bytecode: Bytes,
}

impl StandardJsonOutput {
    /// Diagnostics with error severity.
    pub fn error_diagnostics(&self) -> Vec<Diagnostic> {
        self.errors
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .cloned()
            .collect()
    }

    /// Diagnostics with warning severity.
    pub fn warning_diagnostics(&self) -> Vec<&Diagnostic> {
        self.errors
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect()
    }

    /// Names of every compiled contract, across all sources.
    pub fn contract_names(&self) -> Vec<&str> {
        self.contracts
            .values()
            .flat_map(|by_name| by_name.keys())
            .map(String::as_str)
            .collect()
    }

    /// Select the contract to deploy.
    ///
    /// Selection is explicit: a requested name must exist; with no name the
    /// source must define exactly one contract. An empty output map and a
    /// bytecode-less selection (interface, abstract contract) are both
    /// rejected rather than deployed as garbage.
    pub fn select_artifact(&self, requested: Option<&str>) -> Result<Artifact, CompileError> {
        let mut candidates: Vec<(&str, &ContractOutput)> = self
            .contracts
            .values()
            .flat_map(|by_name| by_name.iter())
            .map(|(name, output)| (name.as_str(), output))
            .collect();

        if candidates.is_empty() {
            return Err(CompileError::NoContract);
        }

        let (name, output) = match requested {
            Some(wanted) => candidates
                .iter()
                .find(|(name, _)| *name == wanted)
                .copied()
                .ok_or_else(|| CompileError::UnknownContract(wanted.to_string()))?,
            None => {
                if candidates.len() > 1 {
                    let mut names: Vec<String> =
                        candidates.iter().map(|(n, _)| n.to_string()).collect();
                    names.sort();
                    return Err(CompileError::Ambiguous(names.join(", ")));
                }
                candidates.remove(0)
            }
        };

        let raw = output.evm.bytecode.object.trim_start_matches("0x");
        let bytecode = alloy::primitives::hex::decode(raw)
            .map_err(|e| CompileError::BadBytecode(name.to_string(), e.to_string()))?;
        if bytecode.is_empty() {
            return Err(CompileError::NoBytecode(name.to_string()));
        }

        Ok(Artifact {
            name: name.to_string(),
            abi: output.abi.clone(),
            bytecode: Bytes::from(bytecode),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_with(contracts: serde_json::Value, errors: serde_json::Value) -> StandardJsonOutput {
        serde_json::from_value(serde_json::json!({
            "errors": errors,
            "contracts": { VIRTUAL_SOURCE: contracts },
        }))
        .unwrap()
    }

    fn contract(bytecode: &str) -> serde_json::Value {
        serde_json::json!({
            "abi": [],
            "evm": { "bytecode": { "object": bytecode } },
        })
    }

    #[test]
    fn test_input_shape() {
        let input = StandardJsonInput::single_source("contract A {}");
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["language"], "Solidity");
        assert_eq!(json["sources"][VIRTUAL_SOURCE]["content"], "contract A {}");
        assert_eq!(
            json["settings"]["outputSelection"]["*"]["*"],
            serde_json::json!(["abi", "evm.bytecode"])
        );
    }

    #[test]
    fn test_severity_filtering() {
        let output = output_with(
            serde_json::json!({}),
            serde_json::json!([
                { "severity": "warning", "message": "unused variable" },
                { "severity": "error", "message": "expected ';'" },
                { "severity": "info", "message": "note" },
            ]),
        );
        let errors = output.error_diagnostics();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "expected ';'");
        assert_eq!(output.warning_diagnostics().len(), 1);
    }

    #[test]
    fn test_single_contract_selected_without_name() {
        let output = output_with(
            serde_json::json!({ "Counter": contract("6080604052") }),
            serde_json::json!([]),
        );
        let artifact = output.select_artifact(None).unwrap();
        assert_eq!(artifact.name, "Counter");
        assert_eq!(artifact.bytecode.len(), 5);
    }

    #[test]
    fn test_zero_contracts_is_explicit_error() {
        let output = output_with(serde_json::json!({}), serde_json::json!([]));
        assert!(matches!(
            output.select_artifact(None),
            Err(CompileError::NoContract)
        ));
    }

    #[test]
    fn test_multiple_contracts_require_a_name() {
        let output = output_with(
            serde_json::json!({
                "Counter": contract("6080"),
                "Token": contract("6090"),
            }),
            serde_json::json!([]),
        );

        let err = output.select_artifact(None).unwrap_err();
        assert!(matches!(err, CompileError::Ambiguous(_)));
        assert!(err.to_string().contains("Counter, Token"));

        let artifact = output.select_artifact(Some("Token")).unwrap();
        assert_eq!(artifact.name, "Token");
    }

    #[test]
    fn test_unknown_name_rejected() {
        let output = output_with(
            serde_json::json!({ "Counter": contract("6080") }),
            serde_json::json!([]),
        );
        assert!(matches!(
            output.select_artifact(Some("Missing")),
            Err(CompileError::UnknownContract(_))
        ));
    }

    #[test]
    fn test_bytecode_less_selection_rejected() {
        let output = output_with(
            serde_json::json!({ "IERC20": contract("") }),
            serde_json::json!([]),
        );
        assert!(matches!(
            output.select_artifact(None),
            Err(CompileError::NoBytecode(_))
        ));
    }

    #[test]
    fn test_diagnostic_detail_relays_verbatim() {
        let output = output_with(
            serde_json::json!({}),
            serde_json::json!([{
                "severity": "error",
                "message": "expected ';'",
                "formattedMessage": "ParserError: expected ';'\n --> Contract.sol:1:1",
                "errorCode": "2314",
            }]),
        );
        let value = output.errors[0].to_value();
        assert!(value["formattedMessage"]
            .as_str()
            .unwrap()
            .contains("ParserError"));
        assert_eq!(value["errorCode"], "2314");
        assert_eq!(value["severity"], "error");
    }
}
