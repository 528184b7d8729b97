use api_shared::{AnalysisRes, AnalyzeReq};
use clap::{Parser, Subcommand};
use triage_core::causes::{CAUSE_RULES, FALLBACK_CAUSE};
use triage_core::red_flags::RED_FLAG_RULES;
use triage_core::{classify, SymptomReport};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Rule-based symptom triage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a symptom report and print the result as JSON
    Analyze {
        /// Body region, e.g. chest or headFront
        #[arg(long)]
        region: String,
        /// Pain type, e.g. sharp or throbbing
        #[arg(long)]
        pain_type: Option<String>,
        /// Pain intensity from 0 to 10
        #[arg(long)]
        intensity: Option<i64>,
        /// Duration unit, e.g. hours or weeks
        #[arg(long)]
        duration: Option<String>,
        /// Duration magnitude (positive integer)
        #[arg(long)]
        duration_value: Option<i64>,
        /// Onset, sudden or gradual
        #[arg(long)]
        onset: Option<String>,
        /// Trigger (repeatable)
        #[arg(long = "trigger")]
        triggers: Vec<String>,
        /// Associated symptom (repeatable)
        #[arg(long = "symptom")]
        symptoms: Vec<String>,
    },
    /// List the red-flag and cause catalogs
    Rules,
}

fn print_rules() {
    println!("Red flags (first match wins):");
    for rule in RED_FLAG_RULES {
        println!(
            "  {:<32} {} [{}]",
            rule.id,
            rule.cause.name,
            rule.red_flags.join(", ")
        );
    }

    println!("Causes:");
    for rule in CAUSE_RULES {
        let candidates: Vec<String> = rule
            .candidates
            .iter()
            .map(|c| format!("{} ({})", c.name, c.probability))
            .collect();
        println!("  {:<32} {}", rule.id, candidates.join(", "));
    }
    println!(
        "  {:<32} {} ({})",
        "fallback", FALLBACK_CAUSE.name, FALLBACK_CAUSE.probability
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Analyze {
            region,
            pain_type,
            intensity,
            duration,
            duration_value,
            onset,
            triggers,
            symptoms,
        }) => {
            let req = AnalyzeReq {
                body_region: region,
                pain_type,
                intensity,
                duration,
                duration_value,
                onset,
                triggers,
                associated_symptoms: symptoms,
                age_range: None,
                biological_sex: None,
                timestamp: chrono::Utc::now().to_rfc3339(),
            };
            let report = SymptomReport::try_from(req)?;
            let result = classify(&report)?;
            println!("{}", serde_json::to_string_pretty(&AnalysisRes::from(&result))?);
        }
        Some(Commands::Rules) => print_rules(),
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
