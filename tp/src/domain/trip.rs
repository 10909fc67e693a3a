//! Trip request and its option catalogs

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Lowest accepted budget, in INR
pub const MIN_BUDGET: u32 = 100;

/// Budgets move in steps of this many INR above the minimum
pub const BUDGET_STEP: u32 = 50;

/// Errors raised before a request is allowed near the pipeline
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields! Missing: {0}")]
    MissingField(&'static str),

    #[error("Budget must be at least {min} INR in steps of {step} INR, got {0}", min = MIN_BUDGET, step = BUDGET_STEP)]
    InvalidBudget(u32),
}

/// Normalize user input for option matching ("Rental Car" -> "rentalcar")
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Preferred activity, from a fixed catalog
///
/// Declaration order is catalog order; sets of activities render in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Activity {
    Sightseeing,
    Adventure,
    Relaxation,
    Food,
    Shopping,
    Nightlife,
}

impl Activity {
    pub const ALL: [Activity; 6] = [
        Activity::Sightseeing,
        Activity::Adventure,
        Activity::Relaxation,
        Activity::Food,
        Activity::Shopping,
        Activity::Nightlife,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sightseeing => "Sightseeing",
            Self::Adventure => "Adventure",
            Self::Relaxation => "Relaxation",
            Self::Food => "Food",
            Self::Shopping => "Shopping",
            Self::Nightlife => "Nightlife",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Activity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|a| normalize(a.name()) == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown activity: {}. Use one of: {}",
                    s,
                    join_names(Self::ALL.iter().map(|a| a.name()))
                )
            })
    }
}

/// Accommodation style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accommodation {
    #[default]
    Hotel,
    Hostel,
    Airbnb,
    Luxury,
    Budget,
}

impl Accommodation {
    pub const ALL: [Accommodation; 5] = [
        Accommodation::Hotel,
        Accommodation::Hostel,
        Accommodation::Airbnb,
        Accommodation::Luxury,
        Accommodation::Budget,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hotel => "Hotel",
            Self::Hostel => "Hostel",
            Self::Airbnb => "Airbnb",
            Self::Luxury => "Luxury",
            Self::Budget => "Budget",
        }
    }
}

impl fmt::Display for Accommodation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Accommodation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|a| normalize(a.name()) == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown accommodation: {}. Use one of: {}",
                    s,
                    join_names(Self::ALL.iter().map(|a| a.name()))
                )
            })
    }
}

/// Transportation mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transport {
    #[default]
    Flight,
    Train,
    Bus,
    RentalCar,
    Bike,
}

impl Transport {
    pub const ALL: [Transport; 5] = [
        Transport::Flight,
        Transport::Train,
        Transport::Bus,
        Transport::RentalCar,
        Transport::Bike,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Flight => "Flight",
            Self::Train => "Train",
            Self::Bus => "Bus",
            Self::RentalCar => "Rental Car",
            Self::Bike => "Bike",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|t| normalize(t.name()) == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown transport: {}. Use one of: {}",
                    s,
                    join_names(Self::ALL.iter().map(|t| t.name()))
                )
            })
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

/// One form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    pub departure: String,
    pub destination: String,
    /// Free text, e.g. "10-15 March 2025"
    pub dates: String,
    /// Budget in INR
    pub budget: u32,
    pub activities: BTreeSet<Activity>,
    pub accommodation: Accommodation,
    pub transport: Transport,
}

impl TripRequest {
    /// Create a request with the form's default selections
    pub fn new(departure: impl Into<String>, destination: impl Into<String>, dates: impl Into<String>) -> Self {
        Self {
            departure: departure.into(),
            destination: destination.into(),
            dates: dates.into(),
            budget: MIN_BUDGET,
            activities: BTreeSet::new(),
            accommodation: Accommodation::default(),
            transport: Transport::default(),
        }
    }

    pub fn with_budget(mut self, budget: u32) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_activities(mut self, activities: impl IntoIterator<Item = Activity>) -> Self {
        self.activities.extend(activities);
        self
    }

    pub fn with_accommodation(mut self, accommodation: Accommodation) -> Self {
        self.accommodation = accommodation;
        self
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Check required fields and the budget constraint
    pub fn validate(&self) -> Result<(), ValidationError> {
        debug!(departure = %self.departure, destination = %self.destination, budget = self.budget, "TripRequest::validate: called");
        let required = [
            ("departure", &self.departure),
            ("destination", &self.destination),
            ("dates", &self.dates),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            debug!(%field, "TripRequest::validate: missing field");
            return Err(ValidationError::MissingField(*field));
        }

        if !is_valid_budget(self.budget) {
            debug!(budget = self.budget, "TripRequest::validate: invalid budget");
            return Err(ValidationError::InvalidBudget(self.budget));
        }

        Ok(())
    }

    /// Activities as a comma-joined list in catalog order (empty when none)
    pub fn activities_list(&self) -> String {
        self.activities.iter().map(Activity::name).collect::<Vec<_>>().join(", ")
    }
}

pub fn is_valid_budget(budget: u32) -> bool {
    budget >= MIN_BUDGET && (budget - MIN_BUDGET) % BUDGET_STEP == 0
}
