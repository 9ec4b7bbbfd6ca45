// ── Hazard grading enums shared by venue and RAW hazards ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Consequence grade of a hazard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Probability grade of a hazard occurring.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Likelihood {
    Low,
    Medium,
    High,
    VeryHigh,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn severity_wire_format_is_snake_case() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        let parsed: Severity = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(parsed, Severity::Critical);
    }

    #[test]
    fn likelihood_very_high_round_trips() {
        assert_eq!(
            serde_json::to_string(&Likelihood::VeryHigh).unwrap(),
            "\"very_high\""
        );
        let parsed: Likelihood = "very_high".parse().unwrap();
        assert_eq!(parsed, Likelihood::VeryHigh);
    }

    #[test]
    fn severity_orders_by_consequence() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Medium > Severity::Low);
    }
}
