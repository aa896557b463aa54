use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::models::{EmploymentStatus, HomeOwnership, LoanProfile, LoanPurpose};
use crate::risk;
use crate::validation::{self, ValidationError};

#[derive(Debug, Error)]
pub enum ProfileImportError {
    #[error("failed to read profile CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    label: String,
    loan_amount: f64,
    interest_rate: f64,
    credit_score: u16,
    dti_ratio: f64,
    employment_status: EmploymentStatus,
    loan_purpose: LoanPurpose,
    loan_term: Option<u32>,
    home_ownership: HomeOwnership,
    annual_income: Option<f64>,
    has_co_signer: bool,
    previous_default: bool,
    open_credit_lines: Option<u32>,
    recent_inquiries: Option<u32>,
}

impl CsvRow {
    fn into_profile(self) -> (String, LoanProfile) {
        (
            self.label,
            LoanProfile {
                loan_amount: self.loan_amount,
                interest_rate: self.interest_rate,
                credit_score: self.credit_score,
                dti_ratio: self.dti_ratio,
                employment_status: self.employment_status,
                loan_purpose: self.loan_purpose,
                loan_term: self.loan_term,
                home_ownership: self.home_ownership,
                annual_income: self.annual_income,
                has_co_signer: self.has_co_signer,
                previous_default: self.previous_default,
                open_credit_lines: self.open_credit_lines,
                recent_inquiries: self.recent_inquiries,
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledProfile {
    pub label: String,
    pub profile: LoanProfile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line: u64,
    pub label: String,
    pub reason: ValidationError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileImport {
    pub accepted: Vec<LabeledProfile>,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileScore {
    pub label: String,
    pub score: f64,
    pub level: &'static str,
    pub confidence: f64,
}

pub fn import_csv(path: &Path) -> Result<ProfileImport, ProfileImportError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    read_profiles(reader)
}

pub fn import_reader<R: Read>(input: R) -> Result<ProfileImport, ProfileImportError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    read_profiles(reader)
}

fn read_profiles<R: Read>(mut reader: csv::Reader<R>) -> Result<ProfileImport, ProfileImportError> {
    let mut import = ProfileImport::default();

    let headers = reader.headers()?.clone();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let row: CsvRow = record.deserialize(Some(&headers))?;
        let (label, profile) = row.into_profile();

        match validation::validate_profile(&profile) {
            Ok(()) => import.accepted.push(LabeledProfile { label, profile }),
            Err(reason) => {
                warn!(line, label = %label, error = %reason, "skipping out-of-range profile");
                import.skipped.push(SkippedRow {
                    line,
                    label,
                    reason,
                });
            }
        }
    }

    Ok(import)
}

/// Scores every profile, highest risk first.
pub fn score_profiles(profiles: &[LabeledProfile]) -> Vec<ProfileScore> {
    let mut values: Vec<ProfileScore> = profiles
        .iter()
        .map(|entry| {
            let assessment = risk::score_profile(&entry.profile);
            ProfileScore {
                label: entry.label.clone(),
                score: assessment.score,
                level: risk::classify(assessment.score).as_str(),
                confidence: assessment.confidence,
            }
        })
        .collect();
    values.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    values
}
