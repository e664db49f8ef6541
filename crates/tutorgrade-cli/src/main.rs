//! tutorgrade CLI: grade free-form answers from the command line.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "tutorgrade",
    version,
    about = "Grade free-form learner answers against reference answers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade one answer
    Evaluate {
        /// The question that was asked
        #[arg(long)]
        question: String,

        /// The reference answer to grade against
        #[arg(long)]
        reference: String,

        /// The learner's answer
        #[arg(long)]
        answer: String,

        /// Topic of the question (selects concept dictionaries)
        #[arg(long, default_value = "")]
        topic: String,

        /// Subject the topic belongs to
        #[arg(long, default_value = "")]
        subject: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Lexicon file extending the built-in vocabulary
        #[arg(long)]
        lexicon: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Grade every item of one or more answer sheets
    Grade {
        /// Path to a .toml answer sheet or directory
        #[arg(long)]
        sheet: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Model for missing references (e.g. "anthropic/claude-sonnet-4-20250514")
        #[arg(long)]
        model: Option<String>,

        /// Max items graded concurrently
        #[arg(long)]
        parallelism: Option<usize>,

        /// Never call a provider; use the local reference table
        #[arg(long)]
        offline: bool,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Only grade items with one of these tags (comma-separated)
        #[arg(long)]
        filter: Option<String>,
    },

    /// Compare two grading reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Score change that counts as a regression
        #[arg(long, default_value = "0.05")]
        threshold: f64,

        /// Exit code 1 if regressions found
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate answer sheet TOML files
    Validate {
        /// Path to answer sheet file or directory
        #[arg(long)]
        sheet: PathBuf,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example answer sheet
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tutorgrade=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            question,
            reference,
            answer,
            topic,
            subject,
            config,
            lexicon,
            format,
        } => commands::evaluate::execute(commands::evaluate::EvaluateArgs {
            question,
            reference,
            answer,
            topic,
            subject,
            config,
            lexicon,
            format,
        }),
        Commands::Grade {
            sheet,
            config,
            model,
            parallelism,
            offline,
            output,
            filter,
        } => {
            commands::grade::execute(commands::grade::GradeArgs {
                sheet,
                config,
                model,
                parallelism,
                offline,
                output,
                filter,
            })
            .await
        }
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Validate { sheet } => commands::validate::execute(sheet),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config).await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
