//! Interactive trip form

use std::fmt::Display;
use std::str::FromStr;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::domain::{Accommodation, Activity, BUDGET_STEP, MIN_BUDGET, Transport, TripRequest, is_valid_budget};

/// Terminal form collecting one [`TripRequest`]
pub struct TripForm {
    editor: DefaultEditor,
}

impl TripForm {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        Ok(Self { editor })
    }

    /// Ask for every field; `None` when the user quits with Ctrl+C or Ctrl+D
    pub fn run(&mut self) -> Result<Option<TripRequest>> {
        debug!("TripForm::run: called");
        self.print_welcome();
        match self.collect() {
            Ok(trip) => Ok(Some(trip)),
            Err(FormError::Quit) => {
                println!();
                Ok(None)
            }
            Err(FormError::Readline(e)) => Err(eyre::eyre!("Readline error: {}", e)),
        }
    }

    fn collect(&mut self) -> Result<TripRequest, FormError> {
        let departure = self.required("Departure city")?;
        let destination = self.required("Destination city")?;
        let dates = self.required("Travel dates")?;
        let budget = self.field(&format!("Budget in INR [{}]", MIN_BUDGET), parse_budget)?;
        let activities = self.field("Activities, comma separated [none]", parse_activities)?;
        let accommodation = self.field(&choice_label("Accommodation", &Accommodation::ALL, Accommodation::default()), |input| {
            parse_choice(input, Accommodation::default())
        })?;
        let transport = self.field(&choice_label("Transport", &Transport::ALL, Transport::default()), |input| {
            parse_choice(input, Transport::default())
        })?;

        Ok(TripRequest::new(departure, destination, dates)
            .with_budget(budget)
            .with_activities(activities)
            .with_accommodation(accommodation)
            .with_transport(transport))
    }

    /// Re-prompt until the field is non-blank
    fn required(&mut self, label: &str) -> Result<String, FormError> {
        self.field(label, |input| {
            if input.is_empty() {
                Err(format!("{} is required", label))
            } else {
                Ok(input.to_string())
            }
        })
    }

    /// Re-prompt until `parse` accepts the trimmed input
    fn field<T>(&mut self, label: &str, parse: impl Fn(&str) -> Result<T, String>) -> Result<T, FormError> {
        loop {
            let line = match self.editor.readline(&format!("{} {}: ", "?".bright_green(), label)) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    return Err(FormError::Quit);
                }
                Err(e) => return Err(FormError::Readline(e)),
            };

            let input = line.trim();
            match parse(input) {
                Ok(value) => {
                    if !input.is_empty() {
                        let _ = self.editor.add_history_entry(input);
                    }
                    return Ok(value);
                }
                Err(msg) => {
                    debug!(%label, %msg, "TripForm::field: rejected input");
                    println!("  {} {}", "!".yellow(), msg);
                }
            }
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Trip Planner".bright_cyan().bold());
        println!("Press {} or {} to quit", "Ctrl+C".yellow(), "Ctrl+D".yellow());
        println!();
    }
}

/// Ask for the API key without echoing it
///
/// Returns `None` on a blank answer or when there is no terminal to read from.
pub fn ask_api_key(env_var: &str) -> Option<String> {
    debug!(%env_var, "ask_api_key: called");
    match rpassword::prompt_password(api_key_label(env_var)) {
        Ok(key) => Some(key),
        Err(e) => {
            warn!(%e, "Could not read API key from terminal");
            None
        }
    }
}

fn api_key_label(env_var: &str) -> String {
    format!("{} API key ({} is not set): ", "?".bright_green(), env_var)
}

/// Why the form stopped before completion
enum FormError {
    Quit,
    Readline(ReadlineError),
}

fn choice_label<T: Display>(label: &str, choices: &[T], default: T) -> String {
    let names: Vec<String> = choices.iter().map(ToString::to_string).collect();
    format!("{} ({}) [{}]", label, names.join(", "), default)
}

/// Parse a budget; blank means the minimum
pub fn parse_budget(input: &str) -> Result<u32, String> {
    if input.is_empty() {
        return Ok(MIN_BUDGET);
    }
    let budget: u32 = input
        .replace(',', "")
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", input))?;
    if !is_valid_budget(budget) {
        return Err(format!(
            "Budget must be at least {} and a multiple of {} above it",
            MIN_BUDGET, BUDGET_STEP
        ));
    }
    Ok(budget)
}

/// Parse a comma-separated activity list; blank means none
pub fn parse_activities(input: &str) -> Result<Vec<Activity>, String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(Activity::from_str)
        .collect()
}

/// Parse one choice; blank means the default
pub fn parse_choice<T: FromStr<Err = String>>(input: &str, default: T) -> Result<T, String> {
    if input.is_empty() { Ok(default) } else { input.parse() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_budget() {
        assert_eq!(parse_budget(""), Ok(MIN_BUDGET));
        assert_eq!(parse_budget("5000"), Ok(5000));
        assert_eq!(parse_budget("10,000"), Ok(10_000));
        assert!(parse_budget("120").is_err());
        assert!(parse_budget("50").is_err());
        assert!(parse_budget("lots").is_err());
    }

    #[test]
    fn test_parse_activities() {
        assert_eq!(parse_activities(""), Ok(vec![]));
        assert_eq!(
            parse_activities("food, Night life ,"),
            Ok(vec![Activity::Food, Activity::Nightlife])
        );
        assert!(parse_activities("food, skydiving").is_err());
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("", Transport::default()), Ok(Transport::Flight));
        assert_eq!(parse_choice("rental car", Transport::default()), Ok(Transport::RentalCar));
        assert_eq!(parse_choice("hostel", Accommodation::default()), Ok(Accommodation::Hostel));
        assert!(parse_choice("boat", Transport::default()).is_err());
    }

    #[test]
    fn test_api_key_label_names_env_var() {
        let label = api_key_label("GROQ_API_KEY");
        assert!(label.contains("API key (GROQ_API_KEY is not set)"));
    }

    #[test]
    fn test_choice_label() {
        let label = choice_label("Transport", &Transport::ALL, Transport::default());
        assert_eq!(label, "Transport (Flight, Train, Bus, Rental Car, Bike) [Flight]");
    }
}
