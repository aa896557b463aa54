use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Retired,
    #[serde(other)]
    Other,
}

impl EmploymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EmploymentStatus::Employed => "Employed",
            EmploymentStatus::SelfEmployed => "Self-Employed",
            EmploymentStatus::Unemployed => "Unemployed",
            EmploymentStatus::Retired => "Retired",
            EmploymentStatus::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanPurpose {
    DebtConsolidation,
    HomeImprovement,
    Business,
    Education,
    Medical,
    MajorPurchase,
    #[serde(other)]
    Other,
}

impl LoanPurpose {
    pub fn label(&self) -> &'static str {
        match self {
            LoanPurpose::DebtConsolidation => "Debt Consolidation",
            LoanPurpose::HomeImprovement => "Home Improvement",
            LoanPurpose::Business => "Business",
            LoanPurpose::Education => "Education",
            LoanPurpose::Medical => "Medical",
            LoanPurpose::MajorPurchase => "Major Purchase",
            LoanPurpose::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeOwnership {
    Rent,
    Own,
    Mortgage,
    #[serde(other)]
    Other,
}

impl HomeOwnership {
    pub fn label(&self) -> &'static str {
        match self {
            HomeOwnership::Rent => "Rent",
            HomeOwnership::Own => "Own",
            HomeOwnership::Mortgage => "Mortgage",
            HomeOwnership::Other => "Other",
        }
    }
}

/// Borrower and loan attributes fed into the scorer.
///
/// The optional fields are the ones a borrower may leave blank; each blank
/// one lowers the assessment confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanProfile {
    pub loan_amount: f64,
    pub interest_rate: f64,
    pub credit_score: u16,
    pub dti_ratio: f64,
    pub employment_status: EmploymentStatus,
    pub loan_purpose: LoanPurpose,
    pub loan_term: Option<u32>,
    pub home_ownership: HomeOwnership,
    pub annual_income: Option<f64>,
    pub has_co_signer: bool,
    pub previous_default: bool,
    pub open_credit_lines: Option<u32>,
    pub recent_inquiries: Option<u32>,
}

impl LoanProfile {
    pub fn missing_fields(&self) -> usize {
        [
            self.loan_term.is_none(),
            self.annual_income.is_none(),
            self.open_credit_lines.is_none(),
            self.recent_inquiries.is_none(),
        ]
        .into_iter()
        .filter(|missing| *missing)
        .count()
    }
}

impl Default for LoanProfile {
    fn default() -> Self {
        Self {
            loan_amount: 15000.0,
            interest_rate: 8.5,
            credit_score: 720,
            dti_ratio: 25.0,
            employment_status: EmploymentStatus::Employed,
            loan_purpose: LoanPurpose::DebtConsolidation,
            loan_term: Some(36),
            home_ownership: HomeOwnership::Mortgage,
            annual_income: Some(75000.0),
            has_co_signer: false,
            previous_default: false,
            open_credit_lines: Some(3),
            recent_inquiries: Some(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "very_low",
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInterval {
    pub lower: f64,
    pub upper: f64,
}

/// One factor group's contribution: `impact` is the raw bucket value before weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub name: String,
    pub weight: f64,
    pub impact: i32,
}

impl FeatureWeight {
    pub fn contribution(&self) -> f64 {
        self.impact as f64 * self.weight
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub score: f64,
    pub confidence: f64,
    pub prediction_interval: PredictionInterval,
    pub feature_weights: Vec<FeatureWeight>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfluenceDirection {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyInfluencer {
    pub factor: String,
    pub impact: InfluenceDirection,
    pub description: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    HighRisk,
    ModerateRisk,
    LowRisk,
    Improvement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub category: RecommendationCategory,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub name: String,
    pub description: String,
    pub probability_pct: u8,
    pub profile: LoanProfile,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    Excellent,
    Good,
    Average,
    BelowAverage,
    Poor,
}

impl MarketPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketPosition::Excellent => "excellent",
            MarketPosition::Good => "good",
            MarketPosition::Average => "average",
            MarketPosition::BelowAverage => "below_average",
            MarketPosition::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalComparison {
    pub average_risk: f64,
    pub median_risk: f64,
    pub percentile: u8,
    pub trend: String,
    pub market_position: MarketPosition,
}

/// Snapshot of a profile and its score, taken when the user saves a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedScenario {
    pub id: i64,
    pub name: String,
    pub inputs: LoanProfile,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub timestamp: DateTime<Utc>,
}
