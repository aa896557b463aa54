use crate::models::{
    EmploymentStatus, FeatureWeight, HistoricalComparison, HomeOwnership, LoanProfile,
    LoanPurpose, MarketPosition, PredictionInterval, RiskAssessment, RiskLevel,
};

pub const BASE_SCORE: f64 = 50.0;
pub const BASE_CONFIDENCE: f64 = 0.85;
pub const MIN_CONFIDENCE: f64 = 0.6;
pub const MAX_CONFIDENCE: f64 = 0.95;
pub const CONFIDENCE_PENALTY_PER_MISSING: f64 = 0.05;

pub const AVERAGE_RISK: f64 = 45.2;
pub const MEDIAN_RISK: f64 = 42.8;

/// How a ladder's boundaries compare against the input value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Rung matches when `value >= bound`; rungs sorted high to low.
    AtLeast,
    /// Rung matches when `value <= bound`; rungs sorted low to high.
    AtMost,
}

/// Ordered boundary -> impact table; the first matching rung wins.
#[derive(Debug, Clone, Copy)]
pub struct Ladder {
    pub boundary: Boundary,
    pub rungs: &'static [(f64, i32)],
    pub otherwise: i32,
}

impl Ladder {
    pub fn impact(&self, value: f64) -> i32 {
        self.rungs
            .iter()
            .find(|(bound, _)| match self.boundary {
                Boundary::AtLeast => value >= *bound,
                Boundary::AtMost => value <= *bound,
            })
            .map(|(_, impact)| *impact)
            .unwrap_or(self.otherwise)
    }
}

pub const CREDIT_SCORE_LADDER: Ladder = Ladder {
    boundary: Boundary::AtLeast,
    rungs: &[(750.0, -20), (700.0, -10), (650.0, 5), (600.0, 15)],
    otherwise: 30,
};

pub const DTI_LADDER: Ladder = Ladder {
    boundary: Boundary::AtMost,
    rungs: &[(20.0, -15), (30.0, -5), (40.0, 10), (50.0, 20)],
    otherwise: 35,
};

pub const INTEREST_RATE_LADDER: Ladder = Ladder {
    boundary: Boundary::AtMost,
    rungs: &[(6.0, -10), (10.0, 5), (15.0, 15)],
    otherwise: 25,
};

pub const LOAN_AMOUNT_LADDER: Ladder = Ladder {
    boundary: Boundary::AtMost,
    rungs: &[(10000.0, -5), (25000.0, 0), (40000.0, 10)],
    otherwise: 20,
};

pub const EMPLOYMENT_IMPACTS: &[(EmploymentStatus, i32)] = &[
    (EmploymentStatus::Employed, -10),
    (EmploymentStatus::SelfEmployed, 5),
    (EmploymentStatus::Unemployed, 20),
    (EmploymentStatus::Retired, 10),
];

pub const PURPOSE_IMPACTS: &[(LoanPurpose, i32)] = &[
    (LoanPurpose::DebtConsolidation, 5),
    (LoanPurpose::HomeImprovement, -5),
    (LoanPurpose::Business, 15),
    (LoanPurpose::Education, -10),
    (LoanPurpose::Medical, 0),
    (LoanPurpose::MajorPurchase, 0),
];

pub const HOME_OWNERSHIP_IMPACTS: &[(HomeOwnership, i32)] = &[
    (HomeOwnership::Own, -10),
    (HomeOwnership::Mortgage, -5),
    (HomeOwnership::Rent, 5),
];

pub const CO_SIGNER_IMPACT: i32 = -15;
pub const PREVIOUS_DEFAULT_IMPACT: i32 = 25;
pub const MANY_CREDIT_LINES_IMPACT: i32 = 10;
pub const MANY_INQUIRIES_IMPACT: i32 = 10;
pub const CREDIT_LINES_THRESHOLD: u32 = 5;
pub const INQUIRIES_THRESHOLD: u32 = 3;

/// Looks up a categorical impact; values absent from the table score zero.
pub fn category_impact<T: PartialEq>(table: &[(T, i32)], value: &T) -> i32 {
    table
        .iter()
        .find(|(key, _)| key == value)
        .map(|(_, impact)| *impact)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    CreditScore,
    DtiRatio,
    InterestRate,
    LoanAmount,
    Employment,
    LoanPurpose,
    HomeOwnership,
    BinaryFactors,
}

impl Factor {
    pub const ALL: [Factor; 8] = [
        Factor::CreditScore,
        Factor::DtiRatio,
        Factor::InterestRate,
        Factor::LoanAmount,
        Factor::Employment,
        Factor::LoanPurpose,
        Factor::HomeOwnership,
        Factor::BinaryFactors,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Factor::CreditScore => "Credit Score",
            Factor::DtiRatio => "DTI Ratio",
            Factor::InterestRate => "Interest Rate",
            Factor::LoanAmount => "Loan Amount",
            Factor::Employment => "Employment",
            Factor::LoanPurpose => "Loan Purpose",
            Factor::HomeOwnership => "Home Ownership",
            Factor::BinaryFactors => "Binary Factors",
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Factor::CreditScore => 0.25,
            Factor::DtiRatio => 0.20,
            Factor::InterestRate => 0.15,
            Factor::LoanAmount => 0.12,
            Factor::Employment => 0.10,
            Factor::LoanPurpose => 0.08,
            Factor::HomeOwnership => 0.05,
            Factor::BinaryFactors => 0.05,
        }
    }

    pub fn impact(&self, profile: &LoanProfile) -> i32 {
        match self {
            Factor::CreditScore => CREDIT_SCORE_LADDER.impact(profile.credit_score as f64),
            Factor::DtiRatio => DTI_LADDER.impact(profile.dti_ratio),
            Factor::InterestRate => INTEREST_RATE_LADDER.impact(profile.interest_rate),
            Factor::LoanAmount => LOAN_AMOUNT_LADDER.impact(profile.loan_amount),
            Factor::Employment => category_impact(EMPLOYMENT_IMPACTS, &profile.employment_status),
            Factor::LoanPurpose => category_impact(PURPOSE_IMPACTS, &profile.loan_purpose),
            Factor::HomeOwnership => {
                category_impact(HOME_OWNERSHIP_IMPACTS, &profile.home_ownership)
            }
            Factor::BinaryFactors => binary_impact(profile),
        }
    }
}

pub fn binary_impact(profile: &LoanProfile) -> i32 {
    let mut impact = 0;
    if profile.has_co_signer {
        impact += CO_SIGNER_IMPACT;
    }
    if profile.previous_default {
        impact += PREVIOUS_DEFAULT_IMPACT;
    }
    if profile.open_credit_lines.unwrap_or(0) > CREDIT_LINES_THRESHOLD {
        impact += MANY_CREDIT_LINES_IMPACT;
    }
    if profile.recent_inquiries.unwrap_or(0) > INQUIRIES_THRESHOLD {
        impact += MANY_INQUIRIES_IMPACT;
    }
    impact
}

pub fn score_profile(profile: &LoanProfile) -> RiskAssessment {
    let mut score = BASE_SCORE;
    let mut feature_weights = Vec::with_capacity(Factor::ALL.len());

    for factor in Factor::ALL {
        let weight = factor.weight();
        let impact = factor.impact(profile);
        score += impact as f64 * weight;
        feature_weights.push(FeatureWeight {
            name: factor.name().to_string(),
            weight,
            impact,
        });
    }

    // Stable sort keeps declaration order between equal contributions.
    feature_weights.sort_by(|a, b| {
        b.contribution()
            .abs()
            .partial_cmp(&a.contribution().abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let confidence = confidence_for(profile);
    let score = score.clamp(0.0, 100.0);

    RiskAssessment {
        score,
        confidence,
        prediction_interval: prediction_interval(score, confidence),
        feature_weights,
    }
}

pub fn confidence_for(profile: &LoanProfile) -> f64 {
    let missing = profile.missing_fields() as f64;
    (BASE_CONFIDENCE - missing * CONFIDENCE_PENALTY_PER_MISSING).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

pub fn prediction_interval(score: f64, confidence: f64) -> PredictionInterval {
    let margin = 5.0 + (100.0 - confidence * 100.0) * 0.3;
    PredictionInterval {
        lower: (score - margin).max(0.0),
        upper: (score + margin).min(100.0),
    }
}

pub fn classify(score: f64) -> RiskLevel {
    if score <= 20.0 {
        RiskLevel::VeryLow
    } else if score <= 40.0 {
        RiskLevel::Low
    } else if score <= 60.0 {
        RiskLevel::Moderate
    } else if score <= 80.0 {
        RiskLevel::High
    } else {
        RiskLevel::VeryHigh
    }
}

pub fn historical_comparison(score: f64) -> HistoricalComparison {
    let percentile = match classify(score) {
        RiskLevel::VeryLow => 15,
        RiskLevel::Low => 35,
        RiskLevel::Moderate => 65,
        RiskLevel::High => 85,
        RiskLevel::VeryHigh => 95,
    };

    let market_position = if score < AVERAGE_RISK - 10.0 {
        MarketPosition::Excellent
    } else if score < AVERAGE_RISK {
        MarketPosition::Good
    } else if score < AVERAGE_RISK + 10.0 {
        MarketPosition::Average
    } else if score < AVERAGE_RISK + 20.0 {
        MarketPosition::BelowAverage
    } else {
        MarketPosition::Poor
    };

    HistoricalComparison {
        average_risk: AVERAGE_RISK,
        median_risk: MEDIAN_RISK,
        percentile,
        trend: "stable".to_string(),
        market_position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impact_of(assessment: &RiskAssessment, name: &str) -> i32 {
        assessment
            .feature_weights
            .iter()
            .find(|feature| feature.name == name)
            .map(|feature| feature.impact)
            .unwrap_or_else(|| panic!("missing factor {name}"))
    }

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = Factor::ALL.iter().map(Factor::weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn default_profile_matches_regression_fixture() {
        let assessment = score_profile(&LoanProfile::default());
        // 50 - 2.5 - 1.0 + 0.75 + 0 - 1.0 + 0.4 - 0.25 + 0
        assert!((assessment.score - 46.4).abs() < 1e-9);
        assert!(assessment.score < 50.0);
        assert!((assessment.confidence - 0.85).abs() < 1e-9);
        assert!((assessment.prediction_interval.lower - 36.9).abs() < 1e-9);
        assert!((assessment.prediction_interval.upper - 55.9).abs() < 1e-9);
        assert_eq!(classify(assessment.score), RiskLevel::Moderate);
    }

    #[test]
    fn scoring_is_deterministic() {
        let profile = LoanProfile {
            previous_default: true,
            recent_inquiries: Some(7),
            ..LoanProfile::default()
        };
        assert_eq!(score_profile(&profile), score_profile(&profile));
    }

    #[test]
    fn credit_score_boundaries_are_exact() {
        assert_eq!(CREDIT_SCORE_LADDER.impact(750.0), -20);
        assert_eq!(CREDIT_SCORE_LADDER.impact(749.0), -10);
        assert_eq!(CREDIT_SCORE_LADDER.impact(700.0), -10);
        assert_eq!(CREDIT_SCORE_LADDER.impact(699.0), 5);
        assert_eq!(CREDIT_SCORE_LADDER.impact(650.0), 5);
        assert_eq!(CREDIT_SCORE_LADDER.impact(649.0), 15);
        assert_eq!(CREDIT_SCORE_LADDER.impact(600.0), 15);
        assert_eq!(CREDIT_SCORE_LADDER.impact(599.0), 30);
    }

    #[test]
    fn ratio_and_amount_boundaries_are_inclusive() {
        assert_eq!(DTI_LADDER.impact(20.0), -15);
        assert_eq!(DTI_LADDER.impact(20.1), -5);
        assert_eq!(DTI_LADDER.impact(30.0), -5);
        assert_eq!(DTI_LADDER.impact(40.0), 10);
        assert_eq!(DTI_LADDER.impact(50.0), 20);
        assert_eq!(DTI_LADDER.impact(50.1), 35);

        assert_eq!(INTEREST_RATE_LADDER.impact(6.0), -10);
        assert_eq!(INTEREST_RATE_LADDER.impact(6.1), 5);
        assert_eq!(INTEREST_RATE_LADDER.impact(10.0), 5);
        assert_eq!(INTEREST_RATE_LADDER.impact(15.0), 15);
        assert_eq!(INTEREST_RATE_LADDER.impact(15.1), 25);

        assert_eq!(LOAN_AMOUNT_LADDER.impact(10000.0), -5);
        assert_eq!(LOAN_AMOUNT_LADDER.impact(10001.0), 0);
        assert_eq!(LOAN_AMOUNT_LADDER.impact(25000.0), 0);
        assert_eq!(LOAN_AMOUNT_LADDER.impact(40000.0), 10);
        assert_eq!(LOAN_AMOUNT_LADDER.impact(40001.0), 20);
    }

    #[test]
    fn binary_thresholds_are_strict() {
        let at_threshold = LoanProfile {
            open_credit_lines: Some(5),
            recent_inquiries: Some(3),
            ..LoanProfile::default()
        };
        assert_eq!(binary_impact(&at_threshold), 0);

        let over = LoanProfile {
            open_credit_lines: Some(6),
            recent_inquiries: Some(4),
            has_co_signer: true,
            previous_default: true,
            ..LoanProfile::default()
        };
        assert_eq!(binary_impact(&over), -15 + 25 + 10 + 10);
    }

    #[test]
    fn dti_contribution_never_decreases() {
        let mut previous = i32::MIN;
        for dti in 15..=55 {
            let profile = LoanProfile {
                dti_ratio: dti as f64,
                ..LoanProfile::default()
            };
            let impact = impact_of(&score_profile(&profile), "DTI Ratio");
            assert!(impact >= previous, "dti {dti} dropped to {impact}");
            previous = impact;
        }
    }

    #[test]
    fn out_of_domain_categories_score_zero() {
        let profile = LoanProfile {
            employment_status: EmploymentStatus::Other,
            loan_purpose: LoanPurpose::Other,
            home_ownership: HomeOwnership::Other,
            ..LoanProfile::default()
        };
        let assessment = score_profile(&profile);
        assert_eq!(impact_of(&assessment, "Employment"), 0);
        assert_eq!(impact_of(&assessment, "Loan Purpose"), 0);
        assert_eq!(impact_of(&assessment, "Home Ownership"), 0);

        let retired = LoanProfile {
            employment_status: EmploymentStatus::Retired,
            home_ownership: HomeOwnership::Rent,
            ..LoanProfile::default()
        };
        let assessment = score_profile(&retired);
        assert_eq!(impact_of(&assessment, "Employment"), 10);
        assert_eq!(impact_of(&assessment, "Home Ownership"), 5);
    }

    #[test]
    fn breakdown_is_sorted_by_absolute_contribution() {
        let assessment = score_profile(&LoanProfile::default());
        let contributions: Vec<f64> = assessment
            .feature_weights
            .iter()
            .map(|feature| feature.contribution().abs())
            .collect();
        assert!(contributions.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(assessment.feature_weights[0].name, "Credit Score");
        assert_eq!(assessment.feature_weights.len(), 8);
    }

    #[test]
    fn missing_fields_lower_confidence_and_widen_interval() {
        let profile = LoanProfile {
            loan_term: None,
            annual_income: None,
            open_credit_lines: None,
            recent_inquiries: None,
            ..LoanProfile::default()
        };
        let assessment = score_profile(&profile);
        assert!((assessment.confidence - 0.65).abs() < 1e-9);
        let width = assessment.prediction_interval.upper - assessment.prediction_interval.lower;
        assert!((width - 2.0 * (5.0 + 35.0 * 0.3)).abs() < 1e-9);
    }

    #[test]
    fn extreme_profiles_stay_in_bounds() {
        let worst = LoanProfile {
            loan_amount: 50000.0,
            interest_rate: 25.0,
            credit_score: 300,
            dti_ratio: 100.0,
            employment_status: EmploymentStatus::Unemployed,
            loan_purpose: LoanPurpose::Business,
            home_ownership: HomeOwnership::Rent,
            previous_default: true,
            open_credit_lines: Some(20),
            recent_inquiries: Some(20),
            ..LoanProfile::default()
        };
        let best = LoanProfile {
            loan_amount: 1000.0,
            interest_rate: 3.0,
            credit_score: 850,
            dti_ratio: 0.0,
            loan_purpose: LoanPurpose::Education,
            home_ownership: HomeOwnership::Own,
            has_co_signer: true,
            ..LoanProfile::default()
        };
        for profile in [worst, best] {
            let assessment = score_profile(&profile);
            assert!((0.0..=100.0).contains(&assessment.score));
            assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&assessment.confidence));
            assert!(assessment.prediction_interval.lower >= 0.0);
            assert!(assessment.prediction_interval.upper <= 100.0);
        }
    }

    #[test]
    fn classifier_uses_inclusive_upper_thresholds() {
        assert_eq!(classify(0.0), RiskLevel::VeryLow);
        assert_eq!(classify(20.0), RiskLevel::VeryLow);
        assert_eq!(classify(20.1), RiskLevel::Low);
        assert_eq!(classify(40.0), RiskLevel::Low);
        assert_eq!(classify(60.0), RiskLevel::Moderate);
        assert_eq!(classify(60.1), RiskLevel::High);
        assert_eq!(classify(80.0), RiskLevel::High);
        assert_eq!(classify(100.0), RiskLevel::VeryHigh);
    }

    #[test]
    fn historical_comparison_tracks_average() {
        let good = historical_comparison(40.0);
        assert_eq!(good.percentile, 35);
        assert_eq!(good.market_position, MarketPosition::Good);

        let excellent = historical_comparison(30.0);
        assert_eq!(excellent.market_position, MarketPosition::Excellent);

        let below = historical_comparison(60.0);
        assert_eq!(below.percentile, 65);
        assert_eq!(below.market_position, MarketPosition::BelowAverage);

        let poor = historical_comparison(65.2);
        assert_eq!(poor.market_position, MarketPosition::Poor);
    }
}
