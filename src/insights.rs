use crate::models::{
    EmploymentStatus, InfluenceDirection, KeyInfluencer, LoanProfile, Recommendation,
    RecommendationCategory,
};

pub const MAX_INFLUENCERS: usize = 5;

pub const LOW_CREDIT_SCORE: u16 = 650;
pub const EXCELLENT_CREDIT_SCORE: u16 = 750;
pub const HIGH_DTI: f64 = 40.0;
pub const LOW_DTI: f64 = 20.0;
pub const HIGH_INTEREST_RATE: f64 = 12.0;

fn influencer(
    factor: &str,
    impact: InfluenceDirection,
    description: &str,
    value: String,
) -> KeyInfluencer {
    KeyInfluencer {
        factor: factor.to_string(),
        impact,
        description: description.to_string(),
        value,
    }
}

/// Threshold rules evaluated in declaration order, truncated to the first
/// five that fire. Order is not a severity ranking.
pub fn key_influencers(profile: &LoanProfile) -> Vec<KeyInfluencer> {
    let mut influencers = Vec::new();

    if profile.credit_score < LOW_CREDIT_SCORE {
        influencers.push(influencer(
            "Credit Score",
            InfluenceDirection::Negative,
            "Your credit score is below the recommended threshold, significantly increasing default risk.",
            profile.credit_score.to_string(),
        ));
    } else if profile.credit_score >= EXCELLENT_CREDIT_SCORE {
        influencers.push(influencer(
            "Credit Score",
            InfluenceDirection::Positive,
            "Your excellent credit score significantly reduces default risk.",
            profile.credit_score.to_string(),
        ));
    }

    if profile.dti_ratio > HIGH_DTI {
        influencers.push(influencer(
            "Debt-to-Income Ratio",
            InfluenceDirection::Negative,
            "Your high DTI ratio suggests potential repayment challenges.",
            format!("{}%", profile.dti_ratio),
        ));
    } else if profile.dti_ratio <= LOW_DTI {
        influencers.push(influencer(
            "Debt-to-Income Ratio",
            InfluenceDirection::Positive,
            "Your low DTI ratio indicates strong repayment capacity.",
            format!("{}%", profile.dti_ratio),
        ));
    }

    if profile.interest_rate > HIGH_INTEREST_RATE {
        influencers.push(influencer(
            "Interest Rate",
            InfluenceDirection::Negative,
            "High interest rate increases monthly payment burden.",
            format!("{}%", profile.interest_rate),
        ));
    }

    if profile.employment_status == EmploymentStatus::Unemployed {
        influencers.push(influencer(
            "Employment Status",
            InfluenceDirection::Negative,
            "Unemployment status significantly increases default risk.",
            EmploymentStatus::Unemployed.label().to_string(),
        ));
    }

    if profile.previous_default {
        influencers.push(influencer(
            "Previous Default",
            InfluenceDirection::Negative,
            "Previous default history is a strong risk indicator.",
            "Yes".to_string(),
        ));
    }

    influencers.truncate(MAX_INFLUENCERS);
    influencers
}

fn recommendation(
    category: RecommendationCategory,
    title: &str,
    description: &str,
) -> Recommendation {
    Recommendation {
        category,
        title: title.to_string(),
        description: description.to_string(),
    }
}

pub fn recommendations(profile: &LoanProfile, score: f64) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    let tier = if score > 60.0 {
        recommendation(
            RecommendationCategory::HighRisk,
            "High Risk Profile",
            "Consider reducing loan amount or improving credit score before applying.",
        )
    } else if score > 30.0 {
        recommendation(
            RecommendationCategory::ModerateRisk,
            "Moderate Risk Profile",
            "Your profile shows moderate risk. Consider these improvements for better terms.",
        )
    } else {
        recommendation(
            RecommendationCategory::LowRisk,
            "Low Risk Profile",
            "Excellent profile! You may qualify for better interest rates.",
        )
    };
    recs.push(tier);

    if profile.credit_score < LOW_CREDIT_SCORE {
        recs.push(recommendation(
            RecommendationCategory::Improvement,
            "Improve Credit Score",
            "Consider paying down existing debt and avoiding new credit applications.",
        ));
    }

    if profile.dti_ratio > HIGH_DTI {
        recs.push(recommendation(
            RecommendationCategory::Improvement,
            "Reduce Debt Burden",
            "Consider paying down existing debt before taking on new loans.",
        ));
    }

    if profile.interest_rate > HIGH_INTEREST_RATE {
        recs.push(recommendation(
            RecommendationCategory::Improvement,
            "Seek Lower Interest Rate",
            "Improving your credit score could help secure a lower interest rate.",
        ));
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors(influencers: &[KeyInfluencer]) -> Vec<&str> {
        influencers.iter().map(|item| item.factor.as_str()).collect()
    }

    #[test]
    fn default_profile_has_no_influencers() {
        assert!(key_influencers(&LoanProfile::default()).is_empty());
    }

    #[test]
    fn positive_signals_are_reported() {
        let profile = LoanProfile {
            credit_score: 750,
            dti_ratio: 20.0,
            ..LoanProfile::default()
        };
        let influencers = key_influencers(&profile);
        assert_eq!(factors(&influencers), vec!["Credit Score", "Debt-to-Income Ratio"]);
        assert!(influencers
            .iter()
            .all(|item| item.impact == InfluenceDirection::Positive));
        assert_eq!(influencers[1].value, "20%");
    }

    #[test]
    fn all_negative_rules_fire_in_declaration_order() {
        let profile = LoanProfile {
            credit_score: 600,
            dti_ratio: 45.0,
            interest_rate: 15.5,
            employment_status: EmploymentStatus::Unemployed,
            previous_default: true,
            ..LoanProfile::default()
        };
        let influencers = key_influencers(&profile);
        assert_eq!(
            factors(&influencers),
            vec![
                "Credit Score",
                "Debt-to-Income Ratio",
                "Interest Rate",
                "Employment Status",
                "Previous Default",
            ]
        );
        assert_eq!(influencers[2].value, "15.5%");
        assert_eq!(influencers[4].value, "Yes");
    }

    #[test]
    fn thresholds_are_exclusive_where_declared() {
        let profile = LoanProfile {
            credit_score: 650,
            dti_ratio: 40.0,
            interest_rate: 12.0,
            ..LoanProfile::default()
        };
        assert!(key_influencers(&profile).is_empty());
        assert_eq!(recommendations(&profile, 50.0).len(), 1);
    }

    #[test]
    fn tier_recommendation_follows_score() {
        let profile = LoanProfile::default();
        assert_eq!(
            recommendations(&profile, 60.1)[0].category,
            RecommendationCategory::HighRisk
        );
        assert_eq!(
            recommendations(&profile, 60.0)[0].category,
            RecommendationCategory::ModerateRisk
        );
        assert_eq!(
            recommendations(&profile, 30.0)[0].category,
            RecommendationCategory::LowRisk
        );
    }

    #[test]
    fn improvements_follow_tier_in_declaration_order() {
        let profile = LoanProfile {
            credit_score: 600,
            dti_ratio: 45.0,
            interest_rate: 15.5,
            ..LoanProfile::default()
        };
        let titles: Vec<String> = recommendations(&profile, 70.0)
            .into_iter()
            .map(|rec| rec.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "High Risk Profile",
                "Improve Credit Score",
                "Reduce Debt Burden",
                "Seek Lower Interest Rate",
            ]
        );
    }
}
