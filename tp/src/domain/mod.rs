//! Domain types for trip requests

mod trip;

pub use trip::{
    Accommodation, Activity, BUDGET_STEP, MIN_BUDGET, Transport, TripRequest, ValidationError, is_valid_budget,
};
