//! Application entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse the command line.
//! 3. Load [`AppConfig`] (defaults on first run) and apply CLI overrides.
//! 4. Create the [`tokio`] runtime.
//! 5. Build the [`App`] and run the chosen subcommand.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use parley::app::App;
use parley::config::{AppConfig, AppPaths, Level, TutorMode, API_KEY_ENV};
use parley::judge::{ConflictForm, ConflictTheme};

#[derive(Parser)]
#[command(name = "parley", version, about = "Language tutor and conflict arbiter")]
struct Cli {
    /// Settings file to use instead of the platform default.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the tutor in your target language.
    Tutor(TutorArgs),
    /// Translate into your target language, with mistake checks.
    Translate(TutorArgs),
    /// Ask JudgeBot to settle a conflict between two people.
    Judge(JudgeArgs),
    /// Mistake counts per error type.
    Summary,
    /// Most recent mistakes.
    Mistakes {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Most recent verdicts.
    Verdicts {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the resolved configuration and paths.
    Config {
        /// Write the default settings file if none exists.
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args)]
struct TutorArgs {
    /// Language you already speak.
    #[arg(long)]
    known: Option<String>,
    /// Language you are learning.
    #[arg(long)]
    target: Option<String>,
    #[arg(long, value_enum)]
    level: Option<Level>,
    /// Speak replies aloud (saved as MP3 in the export directory).
    #[arg(long)]
    voice: bool,
    /// Send a single message instead of starting the interactive session.
    message: Vec<String>,
}

#[derive(Args)]
struct JudgeArgs {
    #[arg(long, value_enum)]
    theme: Option<ConflictTheme>,
    #[arg(long)]
    name1: Option<String>,
    #[arg(long)]
    statement1: Option<String>,
    #[arg(long)]
    name2: Option<String>,
    #[arg(long)]
    statement2: Option<String>,
    /// Also write the verdict as PDF.
    #[arg(long)]
    export: bool,
}

fn load_config(path: Option<&PathBuf>) -> AppConfig {
    let loaded = match path {
        Some(path) => AppConfig::load_from(path).map(|mut config| {
            config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
            config
        }),
        None => AppConfig::load(),
    };
    loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    })
}

fn apply_tutor_args(config: &mut AppConfig, args: &TutorArgs) {
    if let Some(known) = &args.known {
        config.tutor.known_language = known.clone();
    }
    if let Some(target) = &args.target {
        config.tutor.target_language = target.clone();
    }
    if let Some(level) = args.level {
        config.tutor.level = level;
    }
    if args.voice {
        config.speech.enabled = true;
    }
}

/// Print `label`, then read one line; end of input yields an empty string.
async fn ask<R, W>(lines: &mut Lines<R>, out: &mut W, label: &str) -> anyhow::Result<String>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{label}: ")?;
    out.flush()?;
    Ok(lines.next_line().await?.unwrap_or_default())
}

async fn run_tutor(config: AppConfig, args: TutorArgs, mode: TutorMode) -> anyhow::Result<()> {
    let app = App::from_config(config);
    let mut session = app.tutor_session(mode);
    let mut out = std::io::stdout();

    if args.message.is_empty() {
        let stdin = BufReader::new(tokio::io::stdin());
        app.tutor_repl(&mut session, stdin, &mut out).await?;
    } else {
        app.tutor_turn(&mut session, &args.message.join(" "), &mut out)
            .await?;
    }
    Ok(())
}

async fn run_judge(config: AppConfig, args: JudgeArgs) -> anyhow::Result<()> {
    let app = App::from_config(config);
    let mut out = std::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let prompts = [
        (args.name1, "First person's name"),
        (args.statement1, "Their side of the story"),
        (args.name2, "Second person's name"),
        (args.statement2, "Their side of the story"),
    ];
    let mut answers = Vec::with_capacity(prompts.len());
    for (value, label) in prompts {
        let answer = match value {
            Some(v) => v,
            None => ask(&mut lines, &mut out, label).await?,
        };
        answers.push(answer);
    }
    let [user1_name, user1_input, user2_name, user2_input]: [String; 4] = answers
        .try_into()
        .map_err(|_| anyhow::anyhow!("incomplete conflict form"))?;

    let form = ConflictForm {
        theme: args.theme.unwrap_or(ConflictTheme::Other),
        user1_name,
        user1_input,
        user2_name,
        user2_input,
    };
    app.judge(&form, args.export, &mut out).await?;
    Ok(())
}

fn show_config(config: &AppConfig, path: Option<&PathBuf>, init: bool) -> anyhow::Result<()> {
    let paths = AppPaths::new();
    let settings_file = path.cloned().unwrap_or_else(|| paths.settings_file.clone());

    if init && !settings_file.exists() {
        config
            .save_to(&settings_file)
            .with_context(|| format!("writing {}", settings_file.display()))?;
        println!("Wrote {}", settings_file.display());
    }

    let mut shown = config.clone();
    if shown.llm.api_key.is_some() {
        shown.llm.api_key = Some("********".into());
    }
    println!("# settings: {}", settings_file.display());
    println!("# database: {}", config.storage.resolved_path().display());
    println!("# exports:  {}", config.export.resolved_dir().display());
    println!();
    print!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Command line
    let cli = Cli::parse();

    // 3. Configuration
    let config = load_config(cli.config.as_ref());

    // 4. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 5. Subcommand
    rt.block_on(async move {
        match cli.command {
            Commands::Tutor(args) => {
                let mut config = config;
                apply_tutor_args(&mut config, &args);
                run_tutor(config, args, TutorMode::Conversation).await
            }
            Commands::Translate(args) => {
                let mut config = config;
                apply_tutor_args(&mut config, &args);
                run_tutor(config, args, TutorMode::Translation).await
            }
            Commands::Judge(args) => run_judge(config, args).await,
            Commands::Summary => {
                let app = App::from_config(config);
                app.summary(&mut std::io::stdout()).await?;
                Ok(())
            }
            Commands::Mistakes { limit } => {
                let app = App::from_config(config);
                app.mistakes(limit, &mut std::io::stdout()).await?;
                Ok(())
            }
            Commands::Verdicts { limit } => {
                let app = App::from_config(config);
                app.verdicts(limit, &mut std::io::stdout()).await?;
                Ok(())
            }
            Commands::Config { init } => show_config(&config, cli.config.as_ref(), init),
        }
    })
}
