//! botcreator: answer prompts from a rule file.
//!
//! `ask` answers a single prompt, `chat` answers one prompt per stdin line
//! (reloading the rule file on edit when configured), `check` reports how a
//! rule file parses.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use botcreator::{Bot, BotError, Config, SeededChooser};

/// Rule-file chatbot
#[derive(Parser)]
#[command(name = "botcreator")]
#[command(version = botcreator::PKG_VERSION)]
#[command(about = "Answer prompts from a botcreator rule file")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "BOTCREATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Rule file (overrides `rules.path` from the config).
    #[arg(short, long, env = "BOTCREATOR_RULES")]
    rules: Option<PathBuf>,

    /// Disable the response cache.
    #[arg(long)]
    no_cache: bool,

    /// Seed the response picker for reproducible answers.
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a single prompt
    Ask {
        /// Prompt text
        prompt: String,
    },

    /// Answer prompts read line by line from stdin
    Chat {
        /// Reload the rule file when it changes
        #[arg(long)]
        watch: bool,
    },

    /// Parse the rule file and report skipped lines
    Check,
}

const NO_RESPONSE: &str = "(no response)";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode, BotError> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(rules) = args.rules {
        config.rules.path = Some(rules);
    }
    if matches!(args.command, Command::Chat { watch: true }) {
        config.rules.reload_on_change = true;
    }
    config.validate()?;

    match args.command {
        Command::Check => check(&config).await,
        Command::Ask { prompt } => {
            let bot = build_bot(&config, args.no_cache, args.seed).await?;
            println!("{}", answer(&bot, &prompt));
            Ok(ExitCode::SUCCESS)
        }
        Command::Chat { .. } => {
            let bot = build_bot(&config, args.no_cache, args.seed).await?;
            chat(&bot).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn build_bot(config: &Config, no_cache: bool, seed: Option<u64>) -> Result<Bot, BotError> {
    let mut builder = Bot::builder().from_config(config);
    if no_cache {
        builder = builder.disable_cache();
    }
    if let Some(seed) = seed {
        builder = builder.chooser(Arc::new(SeededChooser::new(seed)));
    }
    builder.build().await
}

fn answer(bot: &Bot, prompt: &str) -> String {
    bot.lookup(prompt)
        .unwrap_or_else(|| NO_RESPONSE.to_string())
}

async fn chat(bot: &Bot) -> Result<(), BotError> {
    info!(version = botcreator::version_string(), "chat started");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| BotError::io("stdin", e))?
    {
        let reply = answer(bot, line.trim_end());
        stdout
            .write_all(format!("{reply}\n").as_bytes())
            .await
            .map_err(|e| BotError::io("stdout", e))?;
        stdout.flush().await.map_err(|e| BotError::io("stdout", e))?;
    }
    Ok(())
}

async fn check(config: &Config) -> Result<ExitCode, BotError> {
    let path = config.rules.path.as_ref().ok_or_else(|| {
        BotError::Configuration("no rule file given (use --rules or rules.path)".to_string())
    })?;
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| BotError::io(path.display().to_string(), e))?;
    let parsed = botcreator::parse(&raw);

    println!(
        "{}: {} exact, {} conditional, {} skipped",
        path.display(),
        parsed.rule_set.exact().len(),
        parsed.rule_set.conditional().len(),
        parsed.errors.len()
    );
    for error in &parsed.errors {
        println!("  {error}");
    }

    Ok(if parsed.errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
