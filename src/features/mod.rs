pub mod auth;
pub mod risk;
