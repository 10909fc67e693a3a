//! Terminal rendering of pipeline results

use colored::Colorize;

use crate::domain::TripRequest;
use crate::pipeline::ItineraryResult;

/// Shown whenever no itinerary could be produced
pub const UNAVAILABLE_NOTICE: &str = "There was an error generating the itinerary.";

/// Heading line for a trip
pub fn heading(trip: &TripRequest) -> String {
    format!("Itinerary: {} to {} ({})", trip.departure, trip.destination, trip.dates)
}

/// Render a result as plain text
pub fn render(trip: &TripRequest, result: &ItineraryResult) -> String {
    match result {
        ItineraryResult::Ready(summary) => format!("{}\n\n{}", heading(trip), summary),
        ItineraryResult::Unavailable => UNAVAILABLE_NOTICE.to_string(),
    }
}

/// Print a result, colored when stdout is a terminal
pub fn print_result(trip: &TripRequest, result: &ItineraryResult) {
    match result {
        ItineraryResult::Ready(summary) => {
            println!();
            println!("{}", heading(trip).bright_cyan().bold());
            println!();
            println!("{}", summary);
        }
        ItineraryResult::Unavailable => {
            eprintln!("{}", UNAVAILABLE_NOTICE.red());
        }
    }
}
