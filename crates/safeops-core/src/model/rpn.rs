// ── Risk Priority Number ──
//
// RPN ranks hazards as the product of a severity weight and a likelihood
// weight. The numeric scale behind the grades is an organizational
// policy choice, so the table is configuration input: there is no
// default mapping, and every weight must be supplied explicitly.
// Services recompute RPN whenever severity or likelihood is written.

use serde::{Deserialize, Serialize};

use super::hazard::{Likelihood, Severity};

/// Explicit weight table backing [`rpn`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpnTable {
    severity_low: u32,
    severity_medium: u32,
    severity_high: u32,
    severity_critical: u32,
    likelihood_low: u32,
    likelihood_medium: u32,
    likelihood_high: u32,
    likelihood_very_high: u32,
}

impl RpnTable {
    /// Build a table from the two weight rows, ordered low→high.
    #[allow(clippy::similar_names)]
    pub fn new(severity: [u32; 4], likelihood: [u32; 4]) -> Self {
        let [severity_low, severity_medium, severity_high, severity_critical] = severity;
        let [likelihood_low, likelihood_medium, likelihood_high, likelihood_very_high] = likelihood;
        Self {
            severity_low,
            severity_medium,
            severity_high,
            severity_critical,
            likelihood_low,
            likelihood_medium,
            likelihood_high,
            likelihood_very_high,
        }
    }

    pub fn severity_weight(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Low => self.severity_low,
            Severity::Medium => self.severity_medium,
            Severity::High => self.severity_high,
            Severity::Critical => self.severity_critical,
        }
    }

    pub fn likelihood_weight(&self, likelihood: Likelihood) -> u32 {
        match likelihood {
            Likelihood::Low => self.likelihood_low,
            Likelihood::Medium => self.likelihood_medium,
            Likelihood::High => self.likelihood_high,
            Likelihood::VeryHigh => self.likelihood_very_high,
        }
    }
}

/// Pure RPN function: `severity weight × likelihood weight`.
pub fn rpn(severity: Severity, likelihood: Likelihood, table: &RpnTable) -> u32 {
    table.severity_weight(severity) * table.likelihood_weight(likelihood)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RpnTable {
        RpnTable::new([1, 3, 7, 10], [1, 2, 4, 8])
    }

    #[test]
    fn rpn_is_the_weight_product() {
        let t = table();
        assert_eq!(rpn(Severity::Low, Likelihood::Low, &t), 1);
        assert_eq!(rpn(Severity::High, Likelihood::Medium, &t), 14);
        assert_eq!(rpn(Severity::Critical, Likelihood::VeryHigh, &t), 80);
    }

    #[test]
    fn every_grade_has_its_own_weight() {
        let t = table();
        assert_eq!(t.severity_weight(Severity::Medium), 3);
        assert_eq!(t.likelihood_weight(Likelihood::VeryHigh), 8);
    }

    #[test]
    fn rpn_ranks_worse_hazards_higher() {
        let t = table();
        assert!(
            rpn(Severity::Critical, Likelihood::High, &t) > rpn(Severity::Medium, Likelihood::High, &t)
        );
    }
}
