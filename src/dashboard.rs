//! Dashboard state and its single update function.
//!
//! Every transition takes the current snapshot and an [`Action`] and returns
//! the next snapshot plus an [`Outcome`] describing what happened. Any change
//! to the profile re-derives the whole [`DashboardView`].

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::demo::{self, DemoCounters};
use crate::insights;
use crate::models::{
    HistoricalComparison, KeyInfluencer, LoanProfile, Recommendation, RiskAssessment, RiskLevel,
    ScenarioResult,
};
use crate::risk;
use crate::scenario;
use crate::store::ScenarioBook;
use crate::validation::{FieldEdit, ValidationError};

/// Everything derived from a profile; recomputed in full on each change.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub assessment: RiskAssessment,
    pub risk_level: RiskLevel,
    pub influencers: Vec<KeyInfluencer>,
    pub recommendations: Vec<Recommendation>,
    pub scenarios: Vec<ScenarioResult>,
    pub historical: HistoricalComparison,
}

impl DashboardView {
    pub fn derive(profile: &LoanProfile) -> Self {
        let assessment = risk::score_profile(profile);
        let score = assessment.score;
        Self {
            risk_level: risk::classify(score),
            influencers: insights::key_influencers(profile),
            recommendations: insights::recommendations(profile, score),
            scenarios: scenario::analyze(profile, score),
            historical: risk::historical_comparison(score),
            assessment,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoMode {
    pub active: bool,
    pub counters: DemoCounters,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub profile: LoanProfile,
    pub view: DashboardView,
    pub saved: ScenarioBook,
    pub pending_name: String,
    pub demo: DemoMode,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::with_profile(LoanProfile::default())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Edit {
        edit: FieldEdit,
    },
    SetScenarioName {
        name: String,
    },
    SaveScenario {
        #[serde(default = "Utc::now")]
        at: DateTime<Utc>,
    },
    LoadScenario {
        id: i64,
    },
    DeleteScenario {
        id: i64,
    },
    LoadDemo {
        index: usize,
    },
    ToggleDemo,
    DemoTick,
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rescored { score: f64, level: RiskLevel },
    /// The edit was out of range and the previous value kept.
    Rejected(ValidationError),
    Saved { id: i64 },
    NameRequired,
    Loaded { id: i64 },
    Deleted { id: i64 },
    NotFound { id: i64 },
    DemoToggled { active: bool },
    Ticked { predictions_today: u64 },
    Ignored,
}

impl Dashboard {
    pub fn with_profile(profile: LoanProfile) -> Self {
        Self {
            view: DashboardView::derive(&profile),
            profile,
            saved: ScenarioBook::new(),
            pending_name: String::new(),
            demo: DemoMode::default(),
        }
    }

    fn replace_profile(mut self, profile: LoanProfile) -> (Self, Outcome) {
        self.view = DashboardView::derive(&profile);
        self.profile = profile;
        let outcome = Outcome::Rescored {
            score: self.view.assessment.score,
            level: self.view.risk_level,
        };
        (self, outcome)
    }

    fn load_demo(self, index: usize) -> (Self, Outcome) {
        let Some(demo) = demo::demo_profiles().into_iter().nth(index) else {
            return (self, Outcome::Ignored);
        };
        let (mut next, outcome) = self.replace_profile(demo.profile);
        next.pending_name = demo.name.to_string();
        next.demo.counters.record_prediction();
        (next, outcome)
    }

    pub fn update(self, action: Action) -> (Self, Outcome) {
        debug!(?action, "dashboard action");
        match action {
            Action::Edit { edit } => match edit.apply(&self.profile) {
                Ok(profile) => self.replace_profile(profile),
                Err(err) => {
                    warn!(error = %err, "edit rejected, keeping previous value");
                    (self, Outcome::Rejected(err))
                }
            },
            Action::SetScenarioName { name } => {
                let mut next = self;
                next.pending_name = name;
                (next, Outcome::Ignored)
            }
            Action::SaveScenario { at } => {
                let mut next = self;
                if next.pending_name.trim().is_empty() {
                    return (next, Outcome::NameRequired);
                }
                let saved = next.saved.save(
                    &next.pending_name,
                    &next.profile,
                    &next.view.assessment,
                    at,
                );
                match saved {
                    Ok(scenario) => {
                        let id = scenario.id;
                        next.pending_name.clear();
                        (next, Outcome::Saved { id })
                    }
                    Err(err) => {
                        warn!(error = %err, "scenario not saved");
                        (next, Outcome::NameRequired)
                    }
                }
            }
            Action::LoadScenario { id } => match self.saved.load(id) {
                Ok(profile) => {
                    let (next, _) = self.replace_profile(profile);
                    (next, Outcome::Loaded { id })
                }
                Err(_) => (self, Outcome::NotFound { id }),
            },
            Action::DeleteScenario { id } => {
                let mut next = self;
                if next.saved.delete(id) {
                    (next, Outcome::Deleted { id })
                } else {
                    (next, Outcome::NotFound { id })
                }
            }
            Action::LoadDemo { index } => self.load_demo(index),
            Action::ToggleDemo => {
                let entering = !self.demo.active;
                let mut next = if entering { self.load_demo(0).0 } else { self };
                next.demo.active = entering;
                (next, Outcome::DemoToggled { active: entering })
            }
            Action::DemoTick => {
                if !self.demo.active {
                    return (self, Outcome::Ignored);
                }
                let mut next = self;
                next.demo.counters.tick();
                let predictions_today = next.demo.counters.predictions_today;
                (next, Outcome::Ticked { predictions_today })
            }
            Action::Reset => self.replace_profile(LoanProfile::default()),
        }
    }

    /// Applies actions in order, collecting each outcome.
    pub fn replay(self, actions: impl IntoIterator<Item = Action>) -> (Self, Vec<Outcome>) {
        let mut state = self;
        let mut outcomes = Vec::new();
        for action in actions {
            let (next, outcome) = state.update(action);
            state = next;
            outcomes.push(outcome);
        }
        (state, outcomes)
    }
}
