use crate::models::{LoanProfile, ScenarioResult};
use crate::risk;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    Optimistic,
    Conservative,
    WorstCase,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::Optimistic,
        ScenarioKind::Conservative,
        ScenarioKind::WorstCase,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::Optimistic => "Optimistic Scenario",
            ScenarioKind::Conservative => "Conservative Scenario",
            ScenarioKind::WorstCase => "Worst Case Scenario",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScenarioKind::Optimistic => {
                "Best-case improvements (credit score +50, DTI -10%, rate -2%)"
            }
            ScenarioKind::Conservative => {
                "Moderate improvements (credit score +25, DTI -5%, rate -1%)"
            }
            ScenarioKind::WorstCase => {
                "Potential deterioration (credit score -30, DTI +15%, rate +3%)"
            }
        }
    }

    pub fn probability_pct(&self) -> u8 {
        match self {
            ScenarioKind::Optimistic => 15,
            ScenarioKind::Conservative => 45,
            ScenarioKind::WorstCase => 25,
        }
    }

    pub fn apply(&self, profile: &LoanProfile) -> LoanProfile {
        let mut adjusted = profile.clone();
        match self {
            ScenarioKind::Optimistic => {
                adjusted.credit_score = profile.credit_score.saturating_add(50).min(850);
                adjusted.dti_ratio = (profile.dti_ratio - 10.0).max(10.0);
                adjusted.interest_rate = (profile.interest_rate - 2.0).max(3.0);
                adjusted.has_co_signer = true;
            }
            ScenarioKind::Conservative => {
                adjusted.credit_score = profile.credit_score.saturating_add(25).min(850);
                adjusted.dti_ratio = (profile.dti_ratio - 5.0).max(15.0);
                adjusted.interest_rate = (profile.interest_rate - 1.0).max(3.0);
            }
            ScenarioKind::WorstCase => {
                adjusted.credit_score = profile.credit_score.saturating_sub(30).max(300);
                adjusted.dti_ratio = (profile.dti_ratio + 15.0).min(100.0);
                adjusted.interest_rate = (profile.interest_rate + 3.0).min(25.0);
                adjusted.previous_default = true;
            }
        }
        adjusted
    }
}

/// Re-scores each canned scenario against the baseline score.
pub fn analyze(profile: &LoanProfile, baseline_score: f64) -> Vec<ScenarioResult> {
    ScenarioKind::ALL
        .iter()
        .map(|kind| {
            let adjusted = kind.apply(profile);
            let assessment = risk::score_profile(&adjusted);
            ScenarioResult {
                name: kind.name().to_string(),
                description: kind.description().to_string(),
                probability_pct: kind.probability_pct(),
                profile: adjusted,
                risk_score: assessment.score,
                risk_level: risk::classify(assessment.score),
                change: assessment.score - baseline_score,
            }
        })
        .collect()
}
