use std::fmt::Write;

use crate::dashboard::Dashboard;
use crate::demo::MODEL_UPTIME_PCT;
use crate::models::{InfluenceDirection, LoanProfile, SavedScenario};

pub const MODEL_METRICS: [(&str, f64); 4] = [
    ("ROC-AUC", 0.72),
    ("Precision", 0.68),
    ("Recall", 0.71),
    ("F1 Score", 0.69),
];

pub const DATA_QUALITY: [(&str, u8); 4] = [
    ("Completeness", 95),
    ("Accuracy", 92),
    ("Consistency", 88),
    ("Timeliness", 96),
];

fn optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| "not provided".to_string())
}

fn signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.1}")
    } else {
        format!("{value:.1}")
    }
}

pub fn write_profile(output: &mut String, profile: &LoanProfile) {
    let _ = writeln!(output, "- Loan amount: ${:.0}", profile.loan_amount);
    let _ = writeln!(output, "- Interest rate: {}%", profile.interest_rate);
    let _ = writeln!(output, "- Credit score: {}", profile.credit_score);
    let _ = writeln!(output, "- DTI ratio: {}%", profile.dti_ratio);
    let _ = writeln!(output, "- Employment: {}", profile.employment_status.label());
    let _ = writeln!(output, "- Purpose: {}", profile.loan_purpose.label());
    let _ = writeln!(output, "- Term (months): {}", optional(profile.loan_term));
    let _ = writeln!(output, "- Home ownership: {}", profile.home_ownership.label());
    let _ = writeln!(output, "- Annual income: {}", optional(profile.annual_income));
    let _ = writeln!(output, "- Co-signer: {}", if profile.has_co_signer { "yes" } else { "no" });
    let _ = writeln!(
        output,
        "- Previous default: {}",
        if profile.previous_default { "yes" } else { "no" }
    );
    let _ = writeln!(output, "- Open credit lines: {}", optional(profile.open_credit_lines));
    let _ = writeln!(output, "- Recent inquiries: {}", optional(profile.recent_inquiries));
}

pub fn build_report(title: Option<&str>, dashboard: &Dashboard) -> String {
    let view = &dashboard.view;
    let assessment = &view.assessment;
    let mut output = String::new();

    let _ = writeln!(output, "# Loan Default Risk Assessment");
    let _ = writeln!(output, "Profile: {}", title.unwrap_or("current inputs"));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Inputs");
    write_profile(&mut output, &dashboard.profile);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Score");
    let _ = writeln!(
        output,
        "- Score {:.1} ({}) with {:.0}% confidence",
        assessment.score,
        view.risk_level.as_str(),
        assessment.confidence * 100.0
    );
    let _ = writeln!(
        output,
        "- Prediction interval {:.1} to {:.1}",
        assessment.prediction_interval.lower, assessment.prediction_interval.upper
    );
    let _ = writeln!(
        output,
        "- Percentile {} vs average {:.1} / median {:.1}: {} ({})",
        view.historical.percentile,
        view.historical.average_risk,
        view.historical.median_risk,
        view.historical.market_position.as_str(),
        view.historical.trend
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Feature Importance");
    for feature in assessment.feature_weights.iter() {
        let _ = writeln!(
            output,
            "- {}: impact {} x weight {:.2} = {}",
            feature.name,
            feature.impact,
            feature.weight,
            signed(feature.contribution())
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Key Influencers");
    if view.influencers.is_empty() {
        let _ = writeln!(output, "No factors stand out for this profile.");
    } else {
        for influencer in view.influencers.iter() {
            let marker = match influencer.impact {
                InfluenceDirection::Positive => "+",
                InfluenceDirection::Negative => "-",
            };
            let _ = writeln!(
                output,
                "- [{}] {} ({}): {}",
                marker, influencer.factor, influencer.value, influencer.description
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendations");
    for rec in view.recommendations.iter() {
        let _ = writeln!(output, "- {}: {}", rec.title, rec.description);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Scenario Analysis");
    for scenario in view.scenarios.iter() {
        let _ = writeln!(
            output,
            "- {} ({}% likely): score {:.1} ({}), change {}. {}",
            scenario.name,
            scenario.probability_pct,
            scenario.risk_score,
            scenario.risk_level.as_str(),
            signed(scenario.change),
            scenario.description
        );
    }

    if !dashboard.saved.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Saved Scenarios");
        for scenario in dashboard.saved.scenarios() {
            write_saved(&mut output, scenario);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Model");
    for (name, value) in MODEL_METRICS {
        let _ = writeln!(output, "- {}: {:.2}", name, value);
    }
    for (name, value) in DATA_QUALITY {
        let _ = writeln!(output, "- Data {}: {}%", name.to_ascii_lowercase(), value);
    }
    if dashboard.demo.active {
        let counters = &dashboard.demo.counters;
        let _ = writeln!(
            output,
            "- Demo: {} predictions today, processing {:.1}s, last prediction {:.1}s ago, uptime {}%",
            counters.predictions_today,
            counters.processing_secs,
            counters.last_prediction_secs,
            MODEL_UPTIME_PCT
        );
    }

    output
}

fn write_saved(output: &mut String, scenario: &SavedScenario) {
    let _ = writeln!(
        output,
        "- {} (id {}) score {:.1} ({}) saved {}",
        scenario.name,
        scenario.id,
        scenario.risk_score,
        scenario.risk_level.as_str(),
        scenario.timestamp.to_rfc3339()
    );
}
