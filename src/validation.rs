use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{EmploymentStatus, HomeOwnership, LoanProfile, LoanPurpose};

pub const LOAN_AMOUNT_RANGE: (f64, f64) = (1000.0, 50000.0);
pub const INTEREST_RATE_RANGE: (f64, f64) = (3.0, 25.0);
pub const CREDIT_SCORE_RANGE: (u16, u16) = (300, 850);
pub const DTI_RANGE: (f64, f64) = (0.0, 100.0);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Loan amount must be between $1,000 and $50,000 (got {value})")]
    LoanAmount { value: f64 },
    #[error("Interest rate must be between 3% and 25% (got {value})")]
    InterestRate { value: f64 },
    #[error("Credit score must be between 300 and 850 (got {value})")]
    CreditScore { value: u16 },
    #[error("DTI ratio must be between 0% and 100% (got {value})")]
    DtiRatio { value: f64 },
}

/// A single form edit. Only the four bounded numeric fields can be rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldEdit {
    LoanAmount(f64),
    InterestRate(f64),
    CreditScore(u16),
    DtiRatio(f64),
    EmploymentStatus(EmploymentStatus),
    LoanPurpose(LoanPurpose),
    LoanTerm(Option<u32>),
    HomeOwnership(HomeOwnership),
    AnnualIncome(Option<f64>),
    HasCoSigner(bool),
    PreviousDefault(bool),
    OpenCreditLines(Option<u32>),
    RecentInquiries(Option<u32>),
}

fn within(value: f64, (low, high): (f64, f64)) -> bool {
    // NaN fails both comparisons and is rejected.
    value >= low && value <= high
}

pub fn check_loan_amount(value: f64) -> Result<(), ValidationError> {
    if within(value, LOAN_AMOUNT_RANGE) {
        Ok(())
    } else {
        Err(ValidationError::LoanAmount { value })
    }
}

pub fn check_interest_rate(value: f64) -> Result<(), ValidationError> {
    if within(value, INTEREST_RATE_RANGE) {
        Ok(())
    } else {
        Err(ValidationError::InterestRate { value })
    }
}

pub fn check_credit_score(value: u16) -> Result<(), ValidationError> {
    let (low, high) = CREDIT_SCORE_RANGE;
    if (low..=high).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::CreditScore { value })
    }
}

pub fn check_dti_ratio(value: f64) -> Result<(), ValidationError> {
    if within(value, DTI_RANGE) {
        Ok(())
    } else {
        Err(ValidationError::DtiRatio { value })
    }
}

impl FieldEdit {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            FieldEdit::LoanAmount(value) => check_loan_amount(*value),
            FieldEdit::InterestRate(value) => check_interest_rate(*value),
            FieldEdit::CreditScore(value) => check_credit_score(*value),
            FieldEdit::DtiRatio(value) => check_dti_ratio(*value),
            _ => Ok(()),
        }
    }

    /// Returns the edited profile, or the rejection leaving `profile` untouched.
    pub fn apply(&self, profile: &LoanProfile) -> Result<LoanProfile, ValidationError> {
        self.validate()?;
        let mut next = profile.clone();
        match self.clone() {
            FieldEdit::LoanAmount(value) => next.loan_amount = value,
            FieldEdit::InterestRate(value) => next.interest_rate = value,
            FieldEdit::CreditScore(value) => next.credit_score = value,
            FieldEdit::DtiRatio(value) => next.dti_ratio = value,
            FieldEdit::EmploymentStatus(value) => next.employment_status = value,
            FieldEdit::LoanPurpose(value) => next.loan_purpose = value,
            FieldEdit::LoanTerm(value) => next.loan_term = value,
            FieldEdit::HomeOwnership(value) => next.home_ownership = value,
            FieldEdit::AnnualIncome(value) => next.annual_income = value,
            FieldEdit::HasCoSigner(value) => next.has_co_signer = value,
            FieldEdit::PreviousDefault(value) => next.previous_default = value,
            FieldEdit::OpenCreditLines(value) => next.open_credit_lines = value,
            FieldEdit::RecentInquiries(value) => next.recent_inquiries = value,
        }
        Ok(next)
    }
}

/// Checks every bounded field of a complete profile, reporting the first failure.
pub fn validate_profile(profile: &LoanProfile) -> Result<(), ValidationError> {
    check_loan_amount(profile.loan_amount)?;
    check_interest_rate(profile.interest_rate)?;
    check_credit_score(profile.credit_score)?;
    check_dti_ratio(profile.dti_ratio)?;
    Ok(())
}
