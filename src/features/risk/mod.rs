//! Risk data: fetching, normalizing and presenting breach exposure.

pub mod client;
pub mod controller;
pub mod normalize;
pub mod score;
pub mod types;

pub use controller::{DashboardController, DashboardState, ViewOutcome};
pub use types::{Incident, RawRiskPayload, RiskSnapshot};
