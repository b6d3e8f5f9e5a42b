//! Administrative testing CLI
//!
//! Validates a piece of chat content against a rule file (or the
//! built-in rules) and prints the full verdict, the way the admin
//! testing UI consumes it.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use zc_guardrails::{builtin, rule_file, InMemoryRuleStore, ValidationConfig, ValidationEngine};
use zc_moderation::HttpModerationClient;

#[derive(Parser)]
#[command(
    name = "zc-validate",
    about = "Validate chat content against zoo guardrail rules",
    version
)]
struct Args {
    /// Content to validate; reads stdin when omitted
    content: Option<String>,

    /// JSON rule file; built-in rules when omitted
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Moderation endpoint base URL (e.g. https://api.openai.com)
    #[arg(long)]
    moderation_url: Option<String>,

    /// Bearer token for the moderation endpoint
    #[arg(long)]
    moderation_api_key: Option<String>,

    /// Seconds to wait for the moderation call
    #[arg(long, default_value_t = 10)]
    moderation_timeout: u64,

    /// Risk score at which content is blocked
    #[arg(long, default_value_t = 85.0)]
    block_threshold: f32,

    /// Print the full response as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let rules = match &args.rules {
        Some(path) => {
            let data =
                std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            rule_file::parse_rules_json(&data)?
        }
        None => builtin::builtin_rules(),
    };

    let store = Arc::new(InMemoryRuleStore::with_rules(rules)?);
    let config = ValidationConfig {
        block_threshold: args.block_threshold,
        moderation_timeout_secs: args.moderation_timeout,
        ..ValidationConfig::default()
    };

    let mut engine = ValidationEngine::new(store, config);
    if let Some(url) = args.moderation_url {
        engine = engine.with_moderation(Arc::new(HttpModerationClient::new(
            url,
            args.moderation_api_key,
            Duration::from_secs(args.moderation_timeout),
        )));
    }

    let content = match args.content {
        Some(content) => content,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let response = engine.validate(content.trim()).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_summary(&response);
    }

    if !response.valid {
        std::process::exit(1);
    }
    Ok(())
}

fn print_summary(response: &zc_guardrails::ValidationResponse) {
    println!(
        "result: {}  (risk {:.1}, {} ms{})",
        response.result,
        response.risk_score,
        response.processing_time_ms,
        if response.degraded {
            ", moderation unavailable"
        } else {
            ""
        }
    );

    if let Some(ref msg) = response.user_message {
        println!("message: {}", msg);
    }
    if let Some(ref alt) = response.safe_alternative {
        println!("try instead: {}", alt);
    }
    if let Some(ref note) = response.conflict_note {
        println!("conflict: {}", note);
    }

    for trigger in &response.triggered_rules {
        println!(
            "  [{}] {} ({:.0}% confidence){}",
            trigger.severity,
            trigger.rule_id,
            trigger.confidence_score,
            trigger
                .trigger_context
                .as_deref()
                .map(|c| format!(": \"{}\"", c))
                .unwrap_or_default()
        );
    }
    for flag in &response.moderation_flags {
        println!(
            "  [{}] moderation: {} ({:.0}% confidence)",
            flag.severity, flag.category, flag.confidence_score
        );
    }
    for notice in &response.notices {
        println!("  notice: {}", notice);
    }
}
