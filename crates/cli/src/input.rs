//! JSON participant lists in, JSON reports out.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use secretsanta::draw::{Assignment, DrawStats, RetryOutcome, ValidationResult};
use secretsanta::Participant;
use serde::{Deserialize, Serialize};

/// One participant as written in the input file.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ParticipantRecord {
    pub name: String,
    #[serde(default)]
    pub notification_type: Option<String>,
    #[serde(default)]
    pub contact_info: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
}

impl From<ParticipantRecord> for Participant {
    fn from(r: ParticipantRecord) -> Self {
        Participant {
            name: r.name,
            notification_type: r.notification_type,
            contact_info: r.contact_info,
            exclusions: r.exclusions,
        }
    }
}

pub fn parse_participants(json: &str) -> Result<Vec<Participant>> {
    let records: Vec<ParticipantRecord> =
        serde_json::from_str(json).context("parsing participant list")?;
    Ok(records.into_iter().map(Participant::from).collect())
}

pub fn load_participants(path: &Path) -> Result<Vec<Participant>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_participants(&raw).with_context(|| format!("in {}", path.display()))
}

#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub participants_with_no_options: Vec<String>,
    pub min_compatibility: usize,
    pub avg_compatibility: f64,
    pub total_participants: usize,
}

impl From<&ValidationResult> for ValidationReport {
    fn from(r: &ValidationResult) -> Self {
        Self {
            is_valid: r.is_valid,
            errors: r.errors.clone(),
            warnings: r.warnings.clone(),
            participants_with_no_options: r.participants_with_no_options.clone(),
            min_compatibility: r.min_compatibility,
            avg_compatibility: r.avg_compatibility,
            total_participants: r.total_participants,
        }
    }
}

/// A giver and the recipient they drew; `None` when the baseline left them unmatched.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PairingRecord {
    pub giver: String,
    pub recipient: Option<String>,
}

pub fn pairings_from_assignment(ps: &[Participant], a: &Assignment) -> Vec<PairingRecord> {
    a.pairings(ps)
        .into_iter()
        .map(|p| PairingRecord {
            giver: p.giver.name.clone(),
            recipient: Some(p.recipient.name.clone()),
        })
        .collect()
}

pub fn pairings_from_retry(ps: &[Participant], out: &RetryOutcome) -> Vec<PairingRecord> {
    ps.iter()
        .zip(&out.recipients)
        .map(|(giver, r)| PairingRecord {
            giver: giver.name.clone(),
            recipient: r.map(|r| ps[r].name.clone()),
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub total_participants: usize,
    pub avg_compatibility: f64,
    pub min_compatibility: usize,
    pub has_impossible_constraints: bool,
    pub success: bool,
    pub steps: u64,
}

impl From<DrawStats> for StatsReport {
    fn from(s: DrawStats) -> Self {
        Self {
            total_participants: s.total_participants,
            avg_compatibility: s.avg_compatibility,
            min_compatibility: s.min_compatibility,
            has_impossible_constraints: s.has_impossible_constraints,
            success: s.success,
            steps: s.steps,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrawReport {
    pub algorithm: &'static str,
    pub seed: u64,
    pub complete: bool,
    pub pairings: Vec<PairingRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsReport>,
}
