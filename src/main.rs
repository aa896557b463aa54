use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

mod config;
mod dashboard;
mod demo;
mod insights;
mod models;
mod profiles;
mod report;
mod risk;
mod scenario;
mod store;
mod telemetry;
mod validation;

use dashboard::{Action, Dashboard, Outcome};
use models::{EmploymentStatus, HomeOwnership, LoanProfile, LoanPurpose};
use validation::FieldEdit;

#[derive(Parser)]
#[command(name = "loan-risk-dashboard")]
#[command(about = "Peer-to-peer loan default risk calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single loan profile
    Score {
        #[command(flatten)]
        profile: ProfileArgs,
        /// Print the full assessment as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a markdown risk report for a loan profile
    Report {
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long, default_value = "risk-report.md")]
        out: PathBuf,
    },
    /// Score every profile in a CSV file
    Batch {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Save a profile as a named scenario and write its JSON export
    Export {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        profile: ProfileArgs,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Apply a JSON list of dashboard actions and print the resulting report
    Replay {
        #[arg(long)]
        script: PathBuf,
        /// Write every saved scenario to the export directory
        #[arg(long)]
        export: bool,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Run demo mode, refreshing the display counters on a timer
    Demo {
        #[arg(long, default_value_t = 3)]
        ticks: u32,
        /// Rotate through the demo borrowers on every tick
        #[arg(long)]
        cycle: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BlankField {
    LoanTerm,
    AnnualIncome,
    OpenCreditLines,
    RecentInquiries,
}

fn parse_choice<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_string()))
        .map_err(|err| err.to_string())
}

/// Field overrides layered over the default profile, or over a demo borrower.
#[derive(Args, Debug, Default)]
struct ProfileArgs {
    /// Start from a demo borrower ("low", "high", "moderate")
    #[arg(long)]
    demo: Option<String>,
    #[arg(long)]
    loan_amount: Option<f64>,
    #[arg(long)]
    interest_rate: Option<f64>,
    #[arg(long)]
    credit_score: Option<u16>,
    #[arg(long)]
    dti_ratio: Option<f64>,
    #[arg(long, value_parser = parse_choice::<EmploymentStatus>)]
    employment_status: Option<EmploymentStatus>,
    #[arg(long, value_parser = parse_choice::<LoanPurpose>)]
    loan_purpose: Option<LoanPurpose>,
    #[arg(long)]
    loan_term: Option<u32>,
    #[arg(long, value_parser = parse_choice::<HomeOwnership>)]
    home_ownership: Option<HomeOwnership>,
    #[arg(long)]
    annual_income: Option<f64>,
    #[arg(long)]
    has_co_signer: Option<bool>,
    #[arg(long)]
    previous_default: Option<bool>,
    #[arg(long)]
    open_credit_lines: Option<u32>,
    #[arg(long)]
    recent_inquiries: Option<u32>,
    /// Leave an optional field empty (repeatable)
    #[arg(long, value_enum)]
    blank: Vec<BlankField>,
}

impl ProfileArgs {
    fn edits(&self) -> Vec<FieldEdit> {
        let mut edits = Vec::new();
        edits.extend(self.loan_amount.map(FieldEdit::LoanAmount));
        edits.extend(self.interest_rate.map(FieldEdit::InterestRate));
        edits.extend(self.credit_score.map(FieldEdit::CreditScore));
        edits.extend(self.dti_ratio.map(FieldEdit::DtiRatio));
        edits.extend(self.employment_status.map(FieldEdit::EmploymentStatus));
        edits.extend(self.loan_purpose.map(FieldEdit::LoanPurpose));
        edits.extend(self.loan_term.map(|value| FieldEdit::LoanTerm(Some(value))));
        edits.extend(self.home_ownership.map(FieldEdit::HomeOwnership));
        edits.extend(self.annual_income.map(|value| FieldEdit::AnnualIncome(Some(value))));
        edits.extend(self.has_co_signer.map(FieldEdit::HasCoSigner));
        edits.extend(self.previous_default.map(FieldEdit::PreviousDefault));
        edits.extend(self.open_credit_lines.map(|value| FieldEdit::OpenCreditLines(Some(value))));
        edits.extend(self.recent_inquiries.map(|value| FieldEdit::RecentInquiries(Some(value))));
        for field in &self.blank {
            edits.push(match field {
                BlankField::LoanTerm => FieldEdit::LoanTerm(None),
                BlankField::AnnualIncome => FieldEdit::AnnualIncome(None),
                BlankField::OpenCreditLines => FieldEdit::OpenCreditLines(None),
                BlankField::RecentInquiries => FieldEdit::RecentInquiries(None),
            });
        }
        edits
    }

    /// Builds the profile and a display title. Flag values are range-checked
    /// and rejected loudly; demo borrowers are taken as-is.
    fn resolve(&self) -> anyhow::Result<(String, LoanProfile)> {
        let (title, mut profile) = match self.demo.as_deref() {
            Some(name) => {
                let (_, demo) = demo::find_demo(name)
                    .with_context(|| format!("unknown demo borrower '{name}'"))?;
                (demo.name.to_string(), demo.profile)
            }
            None => ("Custom profile".to_string(), LoanProfile::default()),
        };

        for edit in self.edits() {
            profile = edit.apply(&profile).context("invalid loan profile")?;
        }

        Ok((title, profile))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreOutput<'a> {
    title: &'a str,
    profile: &'a LoanProfile,
    assessment: &'a models::RiskAssessment,
    risk_level: models::RiskLevel,
    key_influencers: &'a [models::KeyInfluencer],
    recommendations: &'a [models::Recommendation],
    scenarios: &'a [models::ScenarioResult],
    historical: &'a models::HistoricalComparison,
}

fn print_summary(title: &str, dashboard: &Dashboard) {
    let view = &dashboard.view;
    println!(
        "{}: score {:.1} ({}), confidence {:.0}%, interval {:.1}-{:.1}",
        title,
        view.assessment.score,
        view.risk_level.as_str(),
        view.assessment.confidence * 100.0,
        view.assessment.prediction_interval.lower,
        view.assessment.prediction_interval.upper
    );
    for feature in view.assessment.feature_weights.iter() {
        println!(
            "  {:<15} impact {:>4} x {:.2} = {:+.2}",
            feature.name,
            feature.impact,
            feature.weight,
            feature.contribution()
        );
    }
    for influencer in view.influencers.iter() {
        println!(
            "  * {} ({}): {}",
            influencer.factor, influencer.value, influencer.description
        );
    }
    for rec in view.recommendations.iter() {
        println!("  > {}: {}", rec.title, rec.description);
    }
    for scenario in view.scenarios.iter() {
        println!(
            "  ~ {} score {:.1} ({}) change {:+.1}",
            scenario.name,
            scenario.risk_score,
            scenario.risk_level.as_str(),
            scenario.change
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = config::Settings::load().context("failed to load configuration")?;
    telemetry::init(&settings.log_level).context("failed to initialise logging")?;

    match cli.command {
        Commands::Score { profile, json } => {
            let (title, profile) = profile.resolve()?;
            let dashboard = Dashboard::with_profile(profile);
            info!(score = dashboard.view.assessment.score, "profile scored");

            if json {
                let view = &dashboard.view;
                let output = ScoreOutput {
                    title: &title,
                    profile: &dashboard.profile,
                    assessment: &view.assessment,
                    risk_level: view.risk_level,
                    key_influencers: &view.influencers,
                    recommendations: &view.recommendations,
                    scenarios: &view.scenarios,
                    historical: &view.historical,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_summary(&title, &dashboard);
            }
        }
        Commands::Report { profile, out } => {
            let (title, profile) = profile.resolve()?;
            let dashboard = Dashboard::with_profile(profile);
            let report = report::build_report(Some(&title), &dashboard);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Batch { csv, limit } => {
            let import = profiles::import_csv(&csv)
                .with_context(|| format!("failed to import {}", csv.display()))?;
            info!(
                accepted = import.accepted.len(),
                skipped = import.skipped.len(),
                "profiles imported"
            );
            let scores = profiles::score_profiles(&import.accepted);

            if scores.is_empty() {
                println!("No valid profiles found in {}.", csv.display());
                return Ok(());
            }

            println!("Highest risk profiles:");
            for score in scores.iter().take(limit) {
                println!(
                    "- {} score {:.2} ({}, {:.0}% confidence)",
                    score.label,
                    score.score,
                    score.level,
                    score.confidence * 100.0
                );
            }
            for skipped in import.skipped.iter() {
                println!("Skipped {} (line {}): {}", skipped.label, skipped.line, skipped.reason);
            }
        }
        Commands::Export {
            name,
            profile,
            out_dir,
        } => {
            let (_, profile) = profile.resolve()?;
            let out_dir = out_dir.unwrap_or(settings.export_dir);
            let (state, _) = Dashboard::with_profile(profile).replay([
                Action::SetScenarioName { name },
                Action::SaveScenario {
                    at: chrono::Utc::now(),
                },
            ]);
            let saved = state
                .saved
                .scenarios()
                .last()
                .context("scenario name must not be blank")?;
            let export = state.saved.export(saved.id)?;
            let path = store::write_export(&out_dir, &export)?;

            let written = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read back {}", path.display()))?;
            let parsed = store::parse_export(&written)?;
            anyhow::ensure!(
                &parsed == saved,
                "export at {} does not match the saved scenario",
                path.display()
            );
            info!(id = saved.id, path = %path.display(), "scenario exported");
            println!("Scenario exported to {}.", path.display());
        }
        Commands::Replay {
            script,
            export,
            out_dir,
        } => {
            let raw = std::fs::read_to_string(&script)
                .with_context(|| format!("failed to read {}", script.display()))?;
            let actions: Vec<Action> = serde_json::from_str(&raw)
                .with_context(|| format!("invalid action script {}", script.display()))?;

            let (state, outcomes) = Dashboard::default().replay(actions);
            for (step, outcome) in outcomes.iter().enumerate() {
                match outcome {
                    Outcome::Rejected(err) => warn!(step, error = %err, "edit rejected"),
                    other => info!(step, outcome = ?other, "action applied"),
                }
            }

            print!("{}", report::build_report(Some(&script.display().to_string()), &state));

            if export {
                let out_dir = out_dir.unwrap_or(settings.export_dir);
                for saved in state.saved.scenarios() {
                    let export = store::export_scenario(saved)?;
                    let path = store::write_export(&out_dir, &export)?;
                    println!("Scenario exported to {}.", path.display());
                }
            }
        }
        Commands::Demo { ticks, cycle } => {
            let demo_count = demo::demo_profiles().len();
            let (mut state, _) = Dashboard::default().update(Action::ToggleDemo);
            print_summary(&state.pending_name, &state);

            let mut interval = tokio::time::interval(settings.demo_interval);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;

            for tick in 0..ticks {
                interval.tick().await;
                if cycle {
                    let index = (tick as usize + 1) % demo_count;
                    let (next, _) = state.update(Action::LoadDemo { index });
                    state = next;
                    print_summary(&state.pending_name, &state);
                }
                let (next, _) = state.update(Action::DemoTick);
                state = next;
                let counters = &state.demo.counters;
                println!(
                    "[demo] predictions today {} | processing {:.1}s | last prediction {:.1}s ago | uptime {}%",
                    counters.predictions_today,
                    counters.processing_secs,
                    counters.last_prediction_secs,
                    demo::MODEL_UPTIME_PCT
                );
            }

            let (_, outcome) = state.update(Action::ToggleDemo);
            info!(?outcome, "demo mode finished");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_layer_over_default_profile() {
        let args = ProfileArgs {
            credit_score: Some(610),
            blank: vec![BlankField::AnnualIncome],
            ..ProfileArgs::default()
        };
        let (title, profile) = args.resolve().expect("valid flags");
        assert_eq!(title, "Custom profile");
        assert_eq!(profile.credit_score, 610);
        assert_eq!(profile.annual_income, None);
        assert_eq!(profile.loan_amount, 15000.0);
    }

    #[test]
    fn out_of_range_flags_are_errors() {
        let args = ProfileArgs {
            interest_rate: Some(40.0),
            ..ProfileArgs::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn demo_base_keeps_its_values() {
        let args = ProfileArgs {
            demo: Some("high".to_string()),
            ..ProfileArgs::default()
        };
        let (title, profile) = args.resolve().expect("known demo");
        assert_eq!(title, "High Risk Borrower");
        assert_eq!(profile.loan_amount, 75000.0);
    }

    #[test]
    fn choices_parse_snake_case() {
        let status: EmploymentStatus = parse_choice("self_employed").expect("known status");
        assert_eq!(status, EmploymentStatus::SelfEmployed);
        let purpose: LoanPurpose = parse_choice("wedding").expect("falls back to other");
        assert_eq!(purpose, LoanPurpose::Other);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
