//! The `tutorgrade init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("tutorgrade.toml").exists() {
        println!("tutorgrade.toml already exists, skipping.");
    } else {
        std::fs::write("tutorgrade.toml", SAMPLE_CONFIG)?;
        println!("Created tutorgrade.toml");
    }

    std::fs::create_dir_all("sheets")?;
    let example_path = Path::new("sheets/example.toml");
    if example_path.exists() {
        println!("sheets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_SHEET)?;
        println!("Created sheets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit tutorgrade.toml with your API keys (optional)");
    println!("  2. Run: tutorgrade validate --sheet sheets/example.toml");
    println!("  3. Run: tutorgrade grade --sheet sheets/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# tutorgrade configuration

default_provider = "anthropic"
default_model = "claude-sonnet-4-20250514"
default_temperature = 0.0
parallelism = 4
output_dir = "./tutorgrade-results"
# lexicon = "lexicon.toml"

[providers.anthropic]
type = "anthropic"
api_key = "${ANTHROPIC_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"

[scoring.tiers]
correct = 0.80
partially_correct = 0.60
"#;

const EXAMPLE_SHEET: &str = r#"[sheet]
id = "example"
name = "Example Answer Sheet"
description = "A few spoken answers to get started"
subject = "Insurance"

[[items]]
id = "underwriting"
topic = "Underwriting"
question = "What is underwriting?"
reference = "Underwriting is the process insurers use to evaluate risk and decide whether to issue a policy."
answer = "it's how insurers decide if they should give you a policy by looking at risk"
tags = ["definitions"]
expected_tier = "partially_correct"

[[items]]
id = "deductible"
topic = "Deductibles"
question = "What is a deductible?"
answer = "the amount you pay out of pocket before the insurer pays"
tags = ["definitions"]

[[items]]
id = "risk-management"
topic = "Risk Management"
question = "What is Risk Management?"
answer = "you identify, assess, mitigate and transfer risk"
tags = ["concepts"]
"#;
