//! TripPlanner - Multi-Agent Travel Itinerary Generator
//!
//! CLI entry point for planning trips from flags or an interactive form.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use tripplanner::agents::Roster;
use tripplanner::chat::{GroupChat, GroupChatManager};
use tripplanner::cli::{Cli, Command, generate_after_help, get_log_path};
use tripplanner::config::{Config, ModelConfig};
use tripplanner::domain::TripRequest;
use tripplanner::form::{TripForm, ask_api_key};
use tripplanner::llm::create_client;
use tripplanner::output;
use tripplanner::pipeline::{ItineraryPipeline, ItineraryResult, PipelineError};
use tripplanner::prompts::PromptLoader;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "TripPlanner loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Plan { trip, api_key } => cmd_plan(&config, trip.into_request(), api_key.as_deref()).await,
        Command::Form { api_key } => cmd_form(&config, api_key.as_deref()).await,
        Command::Prompt { trip } => cmd_prompt(trip.into_request()),
    }
}

/// Wire config, client, roster, and chat into a pipeline
fn build_pipeline(config: &Config, model: ModelConfig) -> Result<ItineraryPipeline> {
    debug!(?model, "build_pipeline: called");
    let llm = create_client(&config.llm, &model).context("Failed to create LLM client")?;

    let root = std::env::current_dir().context("Failed to get current directory")?;
    let prompts = Arc::new(PromptLoader::new(root));
    let chat = GroupChat::new(Roster::travel(model), config.chat.max_round);
    let session = Arc::new(GroupChatManager::new(chat, llm, prompts.clone()));

    Ok(ItineraryPipeline::from_config(session, prompts, &config.planner))
}

/// Submit one request and wait for it; Ctrl+C cancels it
async fn run_request(pipeline: &ItineraryPipeline, trip: TripRequest) -> Result<ItineraryResult> {
    let handle = pipeline.submit(trip)?;
    let abort = handle.abort_handle();
    eprintln!("{}", "Planning your trip...".dimmed());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling request");
            abort.abort();
            Err(PipelineError::Cancelled.into())
        }
        result = handle.wait() => Ok(result?),
    }
}

async fn cmd_plan(config: &Config, trip: TripRequest, api_key: Option<&str>) -> Result<()> {
    debug!(departure = %trip.departure, destination = %trip.destination, "cmd_plan: called");
    // No credential means nothing is submitted
    let model = config.model_config(api_key)?;
    let pipeline = build_pipeline(config, model)?;
    let result = run_request(&pipeline, trip.clone()).await?;
    output::print_result(&trip, &result);
    if !result.is_ready() {
        std::process::exit(1);
    }
    Ok(())
}

async fn cmd_form(config: &Config, api_key: Option<&str>) -> Result<()> {
    debug!("cmd_form: called");
    let model = config.model_config_or(api_key, || ask_api_key(&config.llm.api_key_env))?;
    let pipeline = build_pipeline(config, model)?;
    let mut form = TripForm::new()?;

    let Some(trip) = form.run()? else {
        println!("Goodbye!");
        return Ok(());
    };

    match run_request(&pipeline, trip.clone()).await {
        Ok(result) => {
            output::print_result(&trip, &result);
            Ok(())
        }
        Err(e) => match e.downcast_ref::<PipelineError>() {
            Some(PipelineError::Validation(err)) => {
                warn!(%err, "Form submission rejected");
                eprintln!("{} {}", "!".yellow(), err);
                Ok(())
            }
            _ => Err(e),
        },
    }
}

fn cmd_prompt(trip: TripRequest) -> Result<()> {
    debug!("cmd_prompt: called");
    trip.validate()?;
    let root = std::env::current_dir().context("Failed to get current directory")?;
    let prompt = PromptLoader::new(root).trip_prompt(&trip)?;
    println!("{}", prompt);
    Ok(())
}
