use crate::models::{EmploymentStatus, HomeOwnership, LoanProfile, LoanPurpose};

#[derive(Debug, Clone, PartialEq)]
pub struct DemoProfile {
    pub name: &'static str,
    pub profile: LoanProfile,
}

/// Presentation borrowers. These bypass edit validation when loaded; the
/// high-risk one carries a loan amount above the form's upper bound.
pub fn demo_profiles() -> Vec<DemoProfile> {
    vec![
        DemoProfile {
            name: "Low Risk Borrower",
            profile: LoanProfile {
                loan_amount: 25000.0,
                interest_rate: 6.5,
                credit_score: 780,
                dti_ratio: 18.0,
                employment_status: EmploymentStatus::Employed,
                loan_purpose: LoanPurpose::DebtConsolidation,
                loan_term: Some(36),
                home_ownership: HomeOwnership::Own,
                annual_income: Some(85000.0),
                has_co_signer: false,
                previous_default: false,
                open_credit_lines: Some(2),
                recent_inquiries: Some(0),
            },
        },
        DemoProfile {
            name: "High Risk Borrower",
            profile: LoanProfile {
                loan_amount: 75000.0,
                interest_rate: 15.5,
                credit_score: 620,
                dti_ratio: 45.0,
                employment_status: EmploymentStatus::SelfEmployed,
                loan_purpose: LoanPurpose::Business,
                loan_term: Some(60),
                home_ownership: HomeOwnership::Rent,
                annual_income: Some(45000.0),
                has_co_signer: false,
                previous_default: true,
                open_credit_lines: Some(8),
                recent_inquiries: Some(4),
            },
        },
        DemoProfile {
            name: "Moderate Risk Borrower",
            profile: LoanProfile {
                loan_amount: 50000.0,
                interest_rate: 10.5,
                credit_score: 720,
                dti_ratio: 32.0,
                employment_status: EmploymentStatus::Employed,
                loan_purpose: LoanPurpose::HomeImprovement,
                loan_term: Some(48),
                home_ownership: HomeOwnership::Mortgage,
                annual_income: Some(65000.0),
                has_co_signer: true,
                previous_default: false,
                open_credit_lines: Some(4),
                recent_inquiries: Some(2),
            },
        },
    ]
}

/// Case-insensitive lookup by full name or its first word ("low", "high", "moderate").
pub fn find_demo(name: &str) -> Option<(usize, DemoProfile)> {
    let wanted = name.trim().to_ascii_lowercase();
    demo_profiles().into_iter().enumerate().find(|(_, demo)| {
        let full = demo.name.to_ascii_lowercase();
        full == wanted || full.split_whitespace().next() == Some(wanted.as_str())
    })
}

pub const MODEL_UPTIME_PCT: f64 = 99.2;

/// Display-only performance counters shown while demo mode is on.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoCounters {
    pub predictions_today: u64,
    pub processing_secs: f64,
    pub last_prediction_secs: f64,
    seed: u64,
}

impl Default for DemoCounters {
    fn default() -> Self {
        Self::with_seed(0x9E37_79B9_7F4A_7C15)
    }
}

impl DemoCounters {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            predictions_today: 1247,
            processing_secs: 0.2,
            last_prediction_secs: 0.3,
            seed,
        }
    }

    // splitmix64; the counters are cosmetic so any well-mixed sequence will do.
    fn next_unit(&mut self) -> f64 {
        self.seed = self.seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.seed;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Bookkeeping for an explicit demo profile load.
    pub fn record_prediction(&mut self) {
        self.processing_secs = 0.2 + self.next_unit() * 0.3;
        self.last_prediction_secs = 0.3;
        self.predictions_today += 1;
    }

    /// Periodic refresh while demo mode is active.
    pub fn tick(&mut self) {
        self.predictions_today += (self.next_unit() * 3.0).floor() as u64;
        self.last_prediction_secs = (self.next_unit() * 5.0).floor() / 10.0;
        self.processing_secs = 0.2 + self.next_unit() * 0.3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk;
    use crate::validation;

    #[test]
    fn demo_profiles_span_risk_range() {
        let scores: Vec<f64> = demo_profiles()
            .iter()
            .map(|demo| risk::score_profile(&demo.profile).score)
            .collect();
        assert!(scores[0] < scores[2]);
        assert!(scores[2] < scores[1]);
    }

    #[test]
    fn high_risk_demo_exceeds_form_bounds() {
        let demos = demo_profiles();
        assert!(validation::validate_profile(&demos[0].profile).is_ok());
        assert!(validation::validate_profile(&demos[1].profile).is_err());
    }

    #[test]
    fn demos_resolve_by_short_name() {
        let (index, demo) = find_demo("HIGH").expect("known demo");
        assert_eq!(index, 1);
        assert_eq!(demo.name, "High Risk Borrower");
        assert!(find_demo("moderate risk borrower").is_some());
        assert!(find_demo("medium").is_none());
    }

    #[test]
    fn ticks_stay_within_display_ranges() {
        let mut counters = DemoCounters::default();
        for _ in 0..200 {
            let before = counters.predictions_today;
            counters.tick();
            let added = counters.predictions_today - before;
            assert!(added <= 2);
            assert!((0.0..0.5).contains(&counters.last_prediction_secs));
            assert!((0.2..0.5).contains(&counters.processing_secs));
        }
    }

    #[test]
    fn recorded_prediction_bumps_count() {
        let mut counters = DemoCounters::default();
        counters.record_prediction();
        assert_eq!(counters.predictions_today, 1248);
        assert_eq!(counters.last_prediction_secs, 0.3);
    }
}
