//! Plain-text rendering of the dashboard for the terminal.

use crate::features::risk::{DashboardState, Incident};
use std::fmt::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => RiskLevel::High,
            50..=79 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// One-line advice for a score. These bands are not the [`RiskLevel`] ones.
#[must_use]
pub fn insight(score: u8) -> &'static str {
    match score {
        0 => "No breaches detected for your account. You're currently safe.",
        1..=39 => "Low exposure detected. Your credentials look safe on the dark web.",
        40..=69 => "Medium exposure. Some credentials may have leaked; change old passwords.",
        _ => "High exposure! Rotate passwords and enable 2FA now.",
    }
}

const METER_WIDTH: usize = 20;

fn meter(score: u8) -> String {
    let filled = usize::from(score.min(100)) * METER_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(METER_WIDTH - filled))
}

fn incident_line(out: &mut String, incident: &Incident) {
    let _ = write!(out, "  - {}", incident.name);
    if let Some(domain) = &incident.domain {
        let _ = write!(out, " ({domain})");
    }
    if let Some(date) = &incident.date {
        let _ = write!(out, " {date}");
    }
    out.push('\n');
    if !incident.data_classes.is_empty() {
        let _ = writeln!(out, "      leaked: {}", incident.data_classes.join(", "));
    }
    if let Some(description) = &incident.description {
        let _ = writeln!(out, "      {description}");
    }
}

/// Renders the committed dashboard state.
#[must_use]
pub fn dashboard(state: &DashboardState) -> String {
    let mut out = String::new();

    if state.loading {
        out.push_str("Loading risk data...\n");
        return out;
    }

    if let Some(user) = &state.user {
        let _ = writeln!(out, "ShadowSentry :: {} <{}>", user.username, user.email);
    }

    let level = RiskLevel::from_score(state.score);
    let _ = writeln!(
        out,
        "Risk score: {:>3}/100 {} {}",
        state.score,
        meter(state.score),
        level.label()
    );
    let _ = writeln!(out, "{}", insight(state.score));

    if state.incidents.is_empty() {
        out.push_str("No incidents on record.\n");
    } else {
        let _ = writeln!(out, "Incidents ({}):", state.incidents.len());
        for incident in &state.incidents {
            incident_line(&mut out, incident);
        }
    }

    out
}
