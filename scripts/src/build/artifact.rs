use std::path::{Path, PathBuf};

use alloy::{hex, primitives::Bytes};

use crate::{
    constants::CONTRACTS_PATH_SEGMENT,
    errors::ScriptError,
    utils::{read_json_file, required_str},
};

/// A compiled contract, as written by `hardhat compile`
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    /// Name of the contract
    pub contract_name: String,
    /// Source file of the contract, relative to the project root
    pub source_name: String,
    /// Creation bytecode, without constructor arguments
    pub bytecode: Bytes,
    /// Path of the artifact file
    path: PathBuf,
}

/// The compiler run that produced an artifact
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Full solc version, e.g. `0.8.24+commit.e11b9ed9`
    pub solc_version: String,
    /// Standard JSON compiler input, serialized
    pub input: String,
}

impl ContractArtifact {
    /// Load the artifact of `name` from `<artifacts_dir>/contracts/<name>.sol/<name>.json`
    pub fn load(artifacts_dir: &Path, name: &str) -> Result<Self, ScriptError> {
        let path = artifacts_dir
            .join(CONTRACTS_PATH_SEGMENT)
            .join(format!("{name}.sol"))
            .join(format!("{name}.json"));
        Self::from_file(path)
    }

    /// Load an artifact from its file
    pub fn from_file(path: PathBuf) -> Result<Self, ScriptError> {
        let parsed = read_json_file(&path)?;

        let contract_name = required_str(&parsed, "contractName", &path)?.to_string();
        let source_name = required_str(&parsed, "sourceName", &path)?.to_string();
        let bytecode = hex::decode(required_str(&parsed, "bytecode", &path)?)
            .map_err(|e| ScriptError::Artifact(format!("{}: {}", path.display(), e)))?;

        // Abstract contracts and interfaces have an empty bytecode
        if bytecode.is_empty() {
            return Err(ScriptError::Artifact(format!(
                "{}: {} has no bytecode, it can't be deployed",
                path.display(),
                contract_name
            )));
        }

        Ok(Self {
            contract_name,
            source_name,
            bytecode: bytecode.into(),
            path,
        })
    }

    /// `sourceName:contractName`, as expected by the explorers
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// Resolve the build info through the `.dbg.json` file next to the artifact
    pub fn build_info(&self) -> Result<BuildInfo, ScriptError> {
        let dbg_path = self.path.with_extension("dbg.json");
        let dbg = read_json_file(&dbg_path)?;
        let relative = required_str(&dbg, "buildInfo", &dbg_path)?;

        let build_info_path = dbg_path
            .parent()
            .map(|dir| dir.join(relative))
            .ok_or_else(|| {
                ScriptError::Artifact(format!("{}: no parent directory", dbg_path.display()))
            })?;
        let build_info = read_json_file(&build_info_path)?;

        let solc_version = required_str(&build_info, "solcLongVersion", &build_info_path)?;
        let input = &build_info["input"];
        if !input.is_object() {
            return Err(ScriptError::Artifact(format!(
                "{}: missing `input` object",
                build_info_path.display()
            )));
        }

        Ok(BuildInfo {
            solc_version: solc_version.to_string(),
            input: input.dump(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    /// Write a minimal hardhat layout for `Token`
    fn write_token_artifacts(root: &Path, bytecode: &str) {
        let contract_dir = root.join("contracts").join("Token.sol");
        fs::create_dir_all(&contract_dir).unwrap();
        fs::create_dir_all(root.join("build-info")).unwrap();

        fs::write(
            contract_dir.join("Token.json"),
            format!(
                r#"{{
                    "_format": "hh-sol-artifact-1",
                    "contractName": "Token",
                    "sourceName": "contracts/Token.sol",
                    "abi": [],
                    "bytecode": "{bytecode}"
                }}"#
            ),
        )
        .unwrap();
        fs::write(
            contract_dir.join("Token.dbg.json"),
            r#"{ "_format": "hh-sol-dbg-1", "buildInfo": "../../build-info/abc123.json" }"#,
        )
        .unwrap();
        fs::write(
            root.join("build-info").join("abc123.json"),
            r#"{
                "solcVersion": "0.8.24",
                "solcLongVersion": "0.8.24+commit.e11b9ed9",
                "input": { "language": "Solidity", "sources": {} },
                "output": {}
            }"#,
        )
        .unwrap();
    }

    #[test]
    fn loads_artifact_and_build_info() {
        let dir = tempfile::tempdir().unwrap();
        write_token_artifacts(dir.path(), "0x6080604052");

        let artifact = ContractArtifact::load(dir.path(), "Token").unwrap();
        assert_eq!(artifact.contract_name, "Token");
        assert_eq!(artifact.fully_qualified_name(), "contracts/Token.sol:Token");
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);

        let build_info = artifact.build_info().unwrap();
        assert_eq!(build_info.solc_version, "0.8.24+commit.e11b9ed9");
        let input = json::parse(&build_info.input).unwrap();
        assert_eq!(input["language"].as_str(), Some("Solidity"));
    }

    #[test]
    fn rejects_empty_bytecode() {
        let dir = tempfile::tempdir().unwrap();
        write_token_artifacts(dir.path(), "0x");

        let err = ContractArtifact::load(dir.path(), "Token").unwrap_err();
        assert!(matches!(err, ScriptError::Artifact(_)));
    }

    #[test]
    fn missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContractArtifact::load(dir.path(), "Tracking").unwrap_err();
        assert!(matches!(err, ScriptError::Artifact(_)));
    }
}
