use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What is needed to replay a draw written to disk.
#[derive(Debug, Serialize)]
pub struct Provenance {
    pub code_rev: String,
    pub engine_version: &'static str,
    pub algorithm: &'static str,
    pub seed: u64,
    pub params: Value,
    pub outputs: Vec<String>,
}

impl Provenance {
    pub fn new(algorithm: &'static str, seed: u64, params: Value) -> Self {
        Self {
            code_rev: current_git_rev(),
            engine_version: secretsanta::VERSION,
            algorithm,
            seed,
            params,
            outputs: Vec::new(),
        }
    }
}

/// Write `<artifact>.provenance.json` next to a draw result.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, mut record: Provenance) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    record.outputs = vec![artifact.to_string_lossy().into_owned()];
    fs::write(&provenance_path, serde_json::to_vec_pretty(&record)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    Ok(provenance_path)
}

/// `draw.json` → `draw.provenance.json`; extensionless names just gain the suffix.
fn provenance_path(artifact: &Path) -> PathBuf {
    artifact.with_extension("provenance.json")
}

/// Build-time `GIT_COMMIT` if set, else the checkout's HEAD, else "unknown".
pub fn current_git_rev() -> String {
    option_env!("GIT_COMMIT")
        .filter(|rev| !rev.is_empty())
        .map(str::to_string)
        .or_else(head_rev)
        .unwrap_or_else(|| "unknown".to_string())
}

fn head_rev() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let rev = String::from_utf8(output.stdout).ok()?;
    Some(rev.trim().to_string())
}
