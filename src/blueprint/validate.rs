//! Structural validation of generated payloads
//!
//! Shape checks only, with no judgment about content quality. Any defect
//! anywhere rejects the whole payload: the generator either gets a fully
//! conformant result or retries.

use serde_json::Value;

/// The four rubric dimensions every idea must score.
pub const SCORE_DIMENSIONS: [&str; 4] = [
    "demand_urgency",
    "pricing_power",
    "distribution_ease",
    "speed_to_mvp",
];

/// Minimum and maximum number of ideas in an accepted payload.
pub const MIN_IDEAS: usize = 5;
pub const MAX_IDEAS: usize = 10;

/// Number of research themes an accepted payload carries.
pub const THEME_COUNT: usize = 3;

/// Structural validation of a parsed payload. Returns false on any defect;
/// never panics on malformed or missing fields.
pub fn is_valid(payload: &Value) -> bool {
    let themes = match payload.get("researchThemes").and_then(Value::as_array) {
        Some(themes) => themes,
        None => return false,
    };
    if themes.len() != THEME_COUNT || !themes.iter().all(Value::is_string) {
        return false;
    }

    let ideas = match payload.get("ideas").and_then(Value::as_array) {
        Some(ideas) => ideas,
        None => return false,
    };
    if !(MIN_IDEAS..=MAX_IDEAS).contains(&ideas.len()) {
        return false;
    }

    ideas.iter().all(is_valid_idea)
}

fn is_valid_idea(idea: &Value) -> bool {
    if !idea
        .get("startupName")
        .map(Value::is_string)
        .unwrap_or(false)
    {
        return false;
    }

    let scores = match idea.get("scores").and_then(Value::as_object) {
        Some(scores) => scores,
        None => return false,
    };

    SCORE_DIMENSIONS.iter().all(|key| {
        scores
            .get(*key)
            .and_then(Value::as_f64)
            .map(|v| (0.0..=10.0).contains(&v))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn idea(name: &str) -> Value {
        json!({
            "startupName": name,
            "scores": {
                "demand_urgency": 5,
                "pricing_power": 5,
                "distribution_ease": 5,
                "speed_to_mvp": 5
            }
        })
    }

    fn valid_payload(idea_count: usize) -> Value {
        let ideas: Vec<Value> = (0..idea_count).map(|i| idea(&format!("Idea{}", i))).collect();
        json!({
            "researchThemes": ["a", "b", "c"],
            "ideas": ideas
        })
    }

    #[test]
    fn accepts_valid_payload() {
        assert!(is_valid(&valid_payload(5)));
        assert!(is_valid(&valid_payload(10)));
    }

    #[test]
    fn rejects_wrong_theme_count() {
        let mut payload = valid_payload(5);
        payload["researchThemes"] = json!(["a", "b", "c", "d"]);
        assert!(!is_valid(&payload));

        payload["researchThemes"] = json!(["a", "b"]);
        assert!(!is_valid(&payload));
    }

    #[test]
    fn rejects_non_string_theme() {
        let mut payload = valid_payload(5);
        payload["researchThemes"] = json!(["a", "b", 3]);
        assert!(!is_valid(&payload));
    }

    #[test]
    fn rejects_idea_count_out_of_range() {
        assert!(!is_valid(&valid_payload(4)));
        assert!(!is_valid(&valid_payload(11)));
        assert!(!is_valid(&valid_payload(0)));
    }

    #[test]
    fn rejects_missing_startup_name() {
        let mut payload = valid_payload(5);
        payload["ideas"][2].as_object_mut().unwrap().remove("startupName");
        assert!(!is_valid(&payload));

        payload["ideas"][2]["startupName"] = json!(null);
        assert!(!is_valid(&payload));
    }

    #[test]
    fn rejects_missing_scores() {
        let mut payload = valid_payload(5);
        payload["ideas"][0].as_object_mut().unwrap().remove("scores");
        assert!(!is_valid(&payload));
    }

    #[test]
    fn rejects_missing_dimension() {
        let mut payload = valid_payload(5);
        payload["ideas"][0]["scores"]
            .as_object_mut()
            .unwrap()
            .remove("speed_to_mvp");
        assert!(!is_valid(&payload));
    }

    #[test]
    fn rejects_out_of_range_or_non_numeric_scores() {
        for bad in [json!(11), json!(-1), json!("seven"), json!(null)] {
            let mut payload = valid_payload(5);
            payload["ideas"][4]["scores"]["pricing_power"] = bad;
            assert!(!is_valid(&payload));
        }
    }

    #[test]
    fn accepts_boundary_and_fractional_scores() {
        let mut payload = valid_payload(5);
        payload["ideas"][0]["scores"]["demand_urgency"] = json!(0);
        payload["ideas"][0]["scores"]["pricing_power"] = json!(10);
        payload["ideas"][0]["scores"]["distribution_ease"] = json!(7.5);
        assert!(is_valid(&payload));
    }

    #[test]
    fn rejects_non_object_payloads() {
        assert!(!is_valid(&json!(null)));
        assert!(!is_valid(&json!([])));
        assert!(!is_valid(&json!("text")));
        assert!(!is_valid(&json!({})));
    }
}
