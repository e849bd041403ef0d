//! Sign-in, registration and the session gate for protected views.

pub mod client;
pub mod flows;
pub mod gate;
pub mod types;

pub use flows::{FlowOutcome, LoginFlow, RegisterFlow};
pub use gate::{GateState, SessionGate};
pub use types::{Session, UserProfile};
