use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{LoanProfile, RiskAssessment, SavedScenario};
use crate::risk;

pub const EXPORT_SUFFIX: &str = "_scenario.json";

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario name must not be blank")]
    BlankName,
    #[error("no saved scenario with id {0}")]
    NotFound(i64),
    #[error("invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write scenario export to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioExport {
    pub file_name: String,
    pub contents: String,
}

/// Saved scenarios for the current session, in save order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioBook {
    scenarios: Vec<SavedScenario>,
}

impl ScenarioBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scenarios(&self) -> &[SavedScenario] {
        &self.scenarios
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&SavedScenario> {
        self.scenarios.iter().find(|scenario| scenario.id == id)
    }

    /// Snapshots `profile` under `name`. Ids are millisecond timestamps, bumped
    /// past the newest id when two saves land in the same millisecond.
    pub fn save(
        &mut self,
        name: &str,
        profile: &LoanProfile,
        assessment: &RiskAssessment,
        at: DateTime<Utc>,
    ) -> Result<&SavedScenario, ScenarioError> {
        if name.trim().is_empty() {
            return Err(ScenarioError::BlankName);
        }

        let mut id = at.timestamp_millis();
        if let Some(newest) = self.scenarios.iter().map(|scenario| scenario.id).max() {
            if id <= newest {
                id = newest + 1;
            }
        }

        self.scenarios.push(SavedScenario {
            id,
            name: name.to_string(),
            inputs: profile.clone(),
            risk_score: assessment.score,
            risk_level: risk::classify(assessment.score),
            timestamp: at,
        });

        self.scenarios
            .last()
            .ok_or(ScenarioError::NotFound(id))
    }

    pub fn load(&self, id: i64) -> Result<LoanProfile, ScenarioError> {
        self.get(id)
            .map(|scenario| scenario.inputs.clone())
            .ok_or(ScenarioError::NotFound(id))
    }

    /// Removes the scenario with `id`; returns whether one was removed.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.scenarios.len();
        self.scenarios.retain(|scenario| scenario.id != id);
        self.scenarios.len() != before
    }

    pub fn export(&self, id: i64) -> Result<ScenarioExport, ScenarioError> {
        let scenario = self.get(id).ok_or(ScenarioError::NotFound(id))?;
        export_scenario(scenario)
    }
}

pub fn export_scenario(scenario: &SavedScenario) -> Result<ScenarioExport, ScenarioError> {
    Ok(ScenarioExport {
        file_name: export_file_name(&scenario.name),
        contents: serde_json::to_string_pretty(scenario)?,
    })
}

pub fn parse_export(contents: &str) -> Result<SavedScenario, ScenarioError> {
    Ok(serde_json::from_str(contents)?)
}

/// Collapses each whitespace run in `name` to one underscore.
pub fn export_file_name(name: &str) -> String {
    let mut file_name = String::with_capacity(name.len() + EXPORT_SUFFIX.len());
    let mut in_whitespace = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                file_name.push('_');
            }
            in_whitespace = true;
        } else {
            file_name.push(ch);
            in_whitespace = false;
        }
    }
    file_name.push_str(EXPORT_SUFFIX);
    file_name
}

pub fn write_export(dir: &Path, export: &ScenarioExport) -> Result<PathBuf, ScenarioError> {
    let path = dir.join(&export.file_name);
    std::fs::create_dir_all(dir)
        .and_then(|_| std::fs::write(&path, &export.contents))
        .map_err(|source| ScenarioError::Write {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis)
            .single()
            .expect("valid timestamp")
    }

    fn save_default(book: &mut ScenarioBook, name: &str, millis: i64) -> i64 {
        let profile = LoanProfile::default();
        let assessment = risk::score_profile(&profile);
        book.save(name, &profile, &assessment, at(millis))
            .expect("save succeeds")
            .id
    }

    #[test]
    fn blank_names_are_refused() {
        let mut book = ScenarioBook::new();
        let profile = LoanProfile::default();
        let assessment = risk::score_profile(&profile);
        let err = book
            .save("   ", &profile, &assessment, at(1))
            .expect_err("blank name");
        assert!(matches!(err, ScenarioError::BlankName));
        assert!(book.is_empty());
    }

    #[test]
    fn saves_keep_order_and_unique_ids() {
        let mut book = ScenarioBook::new();
        let first = save_default(&mut book, "First", 1_700_000_000_000);
        let second = save_default(&mut book, "Second", 1_700_000_000_000);
        assert_eq!(first, 1_700_000_000_000);
        assert_eq!(second, first + 1);
        let names: Vec<&str> = book.scenarios().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn load_and_delete_by_id() {
        let mut book = ScenarioBook::new();
        let id = save_default(&mut book, "Keep", 10);
        assert_eq!(book.load(id).expect("present"), LoanProfile::default());
        assert!(book.delete(id));
        assert!(!book.delete(id));
        assert!(matches!(book.load(id), Err(ScenarioError::NotFound(_))));
    }

    #[test]
    fn file_name_collapses_whitespace_runs() {
        assert_eq!(export_file_name("My  Best\tCase"), "My_Best_Case_scenario.json");
        assert_eq!(export_file_name(" lead"), "_lead_scenario.json");
        assert_eq!(export_file_name("plain"), "plain_scenario.json");
    }

    #[test]
    fn export_parses_back_to_saved_snapshot() {
        let mut book = ScenarioBook::new();
        let profile = LoanProfile {
            credit_score: 640,
            dti_ratio: 44.5,
            annual_income: None,
            ..LoanProfile::default()
        };
        let assessment = risk::score_profile(&profile);
        let id = book
            .save("Stress test", &profile, &assessment, at(1_700_000_123_456))
            .expect("save succeeds")
            .id;

        let export = book.export(id).expect("export succeeds");
        assert_eq!(export.file_name, "Stress_test_scenario.json");
        assert!(export.contents.contains("\n  \"riskScore\""));

        let parsed = parse_export(&export.contents).expect("parse succeeds");
        assert_eq!(parsed.inputs, profile);
        assert_eq!(parsed.risk_score, assessment.score);
        assert_eq!(Some(&parsed), book.get(id));
    }

    #[test]
    fn write_export_creates_file() {
        let dir = std::env::temp_dir().join(format!(
            "loan-risk-export-{}-{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let mut book = ScenarioBook::new();
        let id = save_default(&mut book, "On disk", 42);
        let export = book.export(id).expect("export succeeds");

        let path = write_export(&dir, &export).expect("write succeeds");
        let written = std::fs::read_to_string(&path).expect("file readable");
        assert_eq!(written, export.contents);
        assert!(path.ends_with("On_disk_scenario.json"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
