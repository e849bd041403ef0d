use super::types::Incident;

/// Score used when the backend does not report one: 25 points per incident
/// (capped at 100) plus up to 10 points per incident for its data classes,
/// capped at 100 overall.
#[must_use]
pub fn compute_score(incidents: &[Incident]) -> u8 {
    if incidents.is_empty() {
        return 0;
    }

    let base = incidents.len().saturating_mul(25).min(100);
    let extra: usize = incidents
        .iter()
        .map(|incident| incident.data_classes.len().saturating_mul(3).min(10))
        .sum();

    u8::try_from(base.saturating_add(extra).min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::compute_score;
    use crate::features::risk::normalize::normalize;
    use serde_json::json;

    #[test]
    fn empty_list_scores_zero() {
        assert_eq!(compute_score(&[]), 0);
    }

    #[test]
    fn three_incidents_with_two_classes() {
        let raw = json!([
            {"name": "a", "dataClasses": ["Emails", "Passwords"]},
            {"name": "b", "dataClasses": ["Emails", "Passwords"]},
            {"name": "c", "dataClasses": ["Emails", "Passwords"]}
        ]);
        // 75 base + 3 * 6
        assert_eq!(compute_score(&normalize(Some(&raw))), 93);
    }

    #[test]
    fn data_class_bonus_is_capped_per_incident() {
        let raw = json!([{"name": "a", "dataClasses": ["1", "2", "3", "4", "5", "6"]}]);
        assert_eq!(compute_score(&normalize(Some(&raw))), 35);
    }

    #[test]
    fn total_is_capped() {
        let raw = json!(["a", "b", "c", "d", "e"]);
        assert_eq!(compute_score(&normalize(Some(&raw))), 100);

        let raw = json!([
            {"name": "a", "leaked": ["1", "2", "3", "4"]},
            {"name": "b", "leaked": ["1", "2", "3", "4"]},
            {"name": "c", "leaked": ["1", "2", "3", "4"]},
            {"name": "d", "leaked": ["1", "2", "3", "4"]}
        ]);
        assert_eq!(compute_score(&normalize(Some(&raw))), 100);
    }
}
