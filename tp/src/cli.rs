//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{Accommodation, Activity, MIN_BUDGET, Transport, TripRequest};

/// TripPlanner - multi-agent travel itinerary generator
#[derive(Parser)]
#[command(
    name = "tp",
    about = "Plan a trip with a group of cooperating LLM agents",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate an itinerary from command-line flags
    Plan {
        #[command(flatten)]
        trip: TripArgs,

        /// Provider API key (falls back to the configured environment variable)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Fill in the trip details interactively
    Form {
        /// Provider API key (falls back to the configured environment variable)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Print the task prompt a request would send, without calling the model
    Prompt {
        #[command(flatten)]
        trip: TripArgs,
    },
}

/// Trip details shared by `plan` and `prompt`
#[derive(Debug, Clone, Args)]
pub struct TripArgs {
    /// Departure city
    #[arg(long = "from", value_name = "CITY")]
    pub departure: String,

    /// Destination city
    #[arg(long = "to", value_name = "CITY")]
    pub destination: String,

    /// Travel dates, free text (e.g. "10-15 March 2025")
    #[arg(long)]
    pub dates: String,

    /// Budget in INR (at least 100, in steps of 50)
    #[arg(long, default_value_t = MIN_BUDGET)]
    pub budget: u32,

    /// Preferred activity; repeat for more than one
    #[arg(long = "activity", value_name = "ACTIVITY")]
    pub activities: Vec<Activity>,

    /// Accommodation type
    #[arg(long, default_value_t = Accommodation::default())]
    pub accommodation: Accommodation,

    /// Mode of transport
    #[arg(long, default_value_t = Transport::default())]
    pub transport: Transport,
}

impl TripArgs {
    pub fn into_request(self) -> TripRequest {
        debug!(?self, "TripArgs::into_request: called");
        TripRequest::new(self.departure, self.destination, self.dates)
            .with_budget(self.budget)
            .with_activities(self.activities)
            .with_accommodation(self.accommodation)
            .with_transport(self.transport)
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripplanner")
        .join("logs")
        .join("tripplanner.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text listing choices and the log location
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let activities: Vec<&str> = Activity::ALL.iter().map(Activity::name).collect();
    let accommodations: Vec<&str> = Accommodation::ALL.iter().map(Accommodation::name).collect();
    let transports: Vec<&str> = Transport::ALL.iter().map(Transport::name).collect();

    let mut help = String::new();
    help.push_str("Choices:\n");
    help.push_str(&format!("  {:<15} {}\n", "activity", activities.join(", ")));
    help.push_str(&format!("  {:<15} {}\n", "accommodation", accommodations.join(", ")));
    help.push_str(&format!("  {:<15} {}\n", "transport", transports.join(", ")));

    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", get_log_path().display()));
    help
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_plan_defaults() {
        let cli = Cli::parse_from(["tp", "plan", "--from", "Pune", "--to", "Goa", "--dates", "10-15 March 2025"]);
        match cli.command {
            Command::Plan { trip, api_key } => {
                assert!(api_key.is_none());
                let request = trip.into_request();
                assert_eq!(request.departure, "Pune");
                assert_eq!(request.destination, "Goa");
                assert_eq!(request.budget, MIN_BUDGET);
                assert!(request.activities.is_empty());
                assert_eq!(request.accommodation, Accommodation::Hotel);
                assert_eq!(request.transport, Transport::Flight);
            }
            other => panic!("Expected Plan, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_plan_full() {
        let cli = Cli::parse_from([
            "tp",
            "-l",
            "debug",
            "plan",
            "--from",
            "Pune",
            "--to",
            "Goa",
            "--dates",
            "next week",
            "--budget",
            "5000",
            "--activity",
            "food",
            "--activity",
            "Sightseeing",
            "--accommodation",
            "airbnb",
            "--transport",
            "rental-car",
            "--api-key",
            "gsk_test",
        ]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Command::Plan { trip, api_key } => {
                assert_eq!(api_key.as_deref(), Some("gsk_test"));
                let request = trip.into_request();
                assert_eq!(request.budget, 5000);
                assert_eq!(request.activities_list(), "Sightseeing, Food");
                assert_eq!(request.accommodation, Accommodation::Airbnb);
                assert_eq!(request.transport, Transport::RentalCar);
            }
            other => panic!("Expected Plan, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_activity() {
        let result = Cli::try_parse_from([
            "tp", "prompt", "--from", "Pune", "--to", "Goa", "--dates", "x", "--activity", "skydiving",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_trip_fields() {
        assert!(Cli::try_parse_from(["tp", "plan", "--to", "Goa", "--dates", "x"]).is_err());
    }

    #[test]
    fn test_cli_parse_form_and_config() {
        let cli = Cli::parse_from(["tp", "-c", "/tmp/tp.yml", "form"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/tp.yml")));
        assert!(matches!(cli.command, Command::Form { api_key: None }));
    }

    #[test]
    fn test_after_help_lists_choices() {
        let help = generate_after_help();
        assert!(help.contains("Nightlife"));
        assert!(help.contains("Rental Car"));
        assert!(help.contains("tripplanner.log"));
    }
}
