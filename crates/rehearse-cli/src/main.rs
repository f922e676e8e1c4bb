//! rehearse - voice interview rehearsal CLI

mod commands;
mod config;
mod utils;

use anyhow::Context;
use clap::Parser;
use rehearse_ai::{
    Model, Provider, SamplingOptions,
    models::{DEFAULT_CHAT_MODEL, DEFAULT_STT_MODEL, resolve_model},
    providers::{OpenAIProvider, OpenAITranscriber},
};
use rehearse_session::{
    Rehearsal, RoundEvent, RoundOutcome, SessionConfig, extractor_for_path, pdf_supported,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// rehearse - practice interview answers grounded in your resume
#[derive(Parser, Debug)]
#[command(name = "rehearse")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Upload a document at startup, e.g. --doc "Resume 1=cv.pdf" (repeatable)
    #[arg(short, long = "doc", value_name = "LABEL=PATH", value_parser = commands::parse_doc_spec)]
    docs: Vec<(String, PathBuf)>,

    /// Answer one recorded question and exit
    #[arg(long, value_name = "PATH", conflicts_with = "ask")]
    audio: Option<PathBuf>,

    /// Answer one typed question and exit
    #[arg(long, value_name = "TEXT")]
    ask: Option<String>,

    /// Spoken language hint for transcription (e.g. en)
    #[arg(short, long)]
    language: Option<String>,

    /// Chat model (default: llama-3.3-70b-versatile)
    #[arg(long)]
    chat_model: Option<String>,

    /// Speech-to-text model (default: whisper-large-v3-turbo)
    #[arg(long)]
    stt_model: Option<String>,

    /// Override the provider's API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Replace the built-in candidate persona with a file's contents
    #[arg(long)]
    persona_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

fn init_tracing(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_env_filter("rehearse=debug")
            .with_writer(std::io::stderr)
            .init();
    } else if let Ok(filter) = tracing_subscriber::EnvFilter::try_from_default_env() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn build_model(provider: Provider, id: &str, base_url: Option<&str>) -> Model {
    let model = resolve_model(provider, id);
    match base_url {
        Some(url) => model.with_base_url(url),
        None => model,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                return Ok(ExitCode::FAILURE);
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cfg = config::Config::load();
    let provider = cfg.provider();

    // Merge config with CLI args (CLI takes precedence)
    let base_url = args.base_url.clone().or(cfg.base_url.clone());
    let chat_model = build_model(
        provider,
        args.chat_model
            .as_deref()
            .or(cfg.chat_model.as_deref())
            .unwrap_or(DEFAULT_CHAT_MODEL),
        base_url.as_deref(),
    );
    let stt_model = build_model(
        provider,
        args.stt_model
            .as_deref()
            .or(cfg.stt_model.as_deref())
            .unwrap_or(DEFAULT_STT_MODEL),
        base_url.as_deref(),
    );

    let api_key = cfg.resolve_api_key(provider);
    if api_key.is_none() {
        let missing = rehearse_session::Error::CredentialMissing {
            env_var: provider.api_key_env_var().to_string(),
        };
        eprintln!("Warning: {}", missing);
        eprintln!("Requests will fail until a key is configured.");
    }

    if !pdf_supported() {
        eprintln!("Warning: built without PDF support; PDF uploads will be ignored");
    }

    let persona_file = args
        .persona_file
        .clone()
        .or_else(|| cfg.persona_file.as_deref().map(utils::expand_home));
    let defaults = SessionConfig::default();
    let system_prompt = match persona_file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading persona file {}", path.display()))?,
        None => defaults.system_prompt,
    };

    let session_config = SessionConfig {
        chat_model,
        system_prompt,
        max_context_chars: cfg.max_context_chars.unwrap_or(defaults.max_context_chars),
        history_window: cfg.history_window.unwrap_or(defaults.history_window),
        sampling: SamplingOptions {
            temperature: cfg.temperature.unwrap_or(defaults.sampling.temperature),
            top_p: cfg.top_p.unwrap_or(defaults.sampling.top_p),
        },
        language: args.language.clone().or(cfg.language.clone()),
    };

    let timeout = cfg
        .request_timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(rehearse_ai::http::DEFAULT_REQUEST_TIMEOUT);
    let chat = Arc::new(OpenAIProvider::new(api_key.clone()).with_timeout(timeout));
    let transcriber = Arc::new(OpenAITranscriber::new(stt_model, api_key).with_timeout(timeout));

    let mut rehearsal = Rehearsal::new(session_config, transcriber, chat);

    for (label, path) in &args.docs {
        upload_document(&mut rehearsal, label, path);
    }

    // Non-interactive modes
    if let Some(path) = args.audio {
        let audio = std::fs::read(&path)
            .with_context(|| format!("reading recording {}", path.display()))?;
        let outcome = run_round(&mut rehearsal, Round::Recording(&audio)).await;
        return Ok(exit_code(&outcome));
    }
    if let Some(question) = args.ask {
        let outcome = run_round(&mut rehearsal, Round::Typed(&question)).await;
        return Ok(exit_code(&outcome));
    }

    run_interactive(&mut rehearsal).await?;
    Ok(ExitCode::SUCCESS)
}

/// A one-shot round fails the process when transcription or generation failed
fn exit_code(outcome: &RoundOutcome) -> ExitCode {
    if outcome.error().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Read a document from disk and ingest it into `label`
fn upload_document(rehearsal: &mut Rehearsal, label: &str, path: &Path) {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Could not read {}: {}", path.display(), e);
            return;
        }
    };

    let extractor = extractor_for_path(path);
    if extractor.is_none() {
        eprintln!(
            "No text extractor for {}; upload ignored",
            path.display()
        );
    }

    let text = rehearsal.document_uploaded(label, &bytes, extractor.as_deref());
    if text.is_empty() {
        if extractor.is_some() {
            eprintln!("No text found in {}; '{}' unchanged", path.display(), label);
        }
    } else {
        println!(
            "[{}: {} chars from {}]",
            label,
            text.chars().count(),
            path.display()
        );
    }
}

enum Round<'a> {
    Recording(&'a [u8]),
    Typed(&'a str),
}

/// Run one round while a task renders its events
async fn run_round(rehearsal: &mut Rehearsal, round: Round<'_>) -> RoundOutcome {
    let renderer = spawn_renderer(rehearsal.subscribe());

    let outcome = match round {
        Round::Recording(audio) => {
            rehearsal.recording_started();
            rehearsal.recording_stopped(audio).await
        }
        Round::Typed(question) => rehearsal.ask(question).await,
    };

    if let Err(e) = renderer.await {
        tracing::debug!("Renderer task failed: {}", e);
    }
    outcome
}

fn spawn_renderer(mut receiver: mpsc::UnboundedReceiver<RoundEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            let done = event.is_terminal();
            match event {
                RoundEvent::Transcript { text } => {
                    println!("Q: {}", text);
                    println!();
                }
                RoundEvent::AnswerDelta { delta } => {
                    print!("{}", delta);
                    let _ = std::io::stdout().flush();
                }
                RoundEvent::AnswerEnd { .. } => {
                    println!();
                }
                RoundEvent::WindowReset => {
                    println!("\n[History window full, next question starts fresh]");
                }
                RoundEvent::Error { message } => {
                    println!();
                    eprintln!("{}", message);
                }
                RoundEvent::RecordingStarted
                | RoundEvent::DisplayCleared
                | RoundEvent::RoundEnd => {}
            }
            if done {
                break;
            }
        }
    })
}

async fn run_interactive(rehearsal: &mut Rehearsal) -> anyhow::Result<()> {
    use std::io;

    // Show minimal startup info (only if TTY)
    if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        eprintln!(
            "rehearse ({}) - enter a recording path, or /help",
            rehearsal.config().chat_model.id
        );
        eprintln!();
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(result) = commands::execute_command(input, rehearsal.session()) {
            match result {
                commands::CommandResult::Clear => {
                    rehearsal.clear_history();
                    println!("Cleared conversation. Documents kept.");
                }
                commands::CommandResult::Exit => {
                    break;
                }
                commands::CommandResult::Message(msg) => {
                    println!("{}", msg);
                }
                commands::CommandResult::Upload { label, path } => {
                    upload_document(rehearsal, &label, &path);
                }
                commands::CommandResult::Ask(question) => {
                    run_round(rehearsal, Round::Typed(&question)).await;
                    println!();
                }
                commands::CommandResult::Unknown(cmd) => {
                    println!("Unknown command: /{}", cmd);
                    println!("Type /help for available commands.");
                }
            }
            continue;
        }

        // Anything else is a recording to answer
        let path = utils::expand_home(input);
        match std::fs::read(&path) {
            Ok(audio) => {
                run_round(rehearsal, Round::Recording(&audio)).await;
                println!();
            }
            Err(e) => {
                println!("Could not read recording {}: {}", path.display(), e);
                println!("Type /help for available commands.");
            }
        }
    }

    Ok(())
}
