use serde::Serialize;

use super::error::InputError;

pub const INITIAL_AMOUNT_FIELD: &str = "--initial-amount";
pub const ANNUAL_RATE_FIELD: &str = "--annual-rate";
pub const MONTHLY_CONTRIBUTION_FIELD: &str = "--monthly-contribution";

/// Validated parameters for one projection. The rate stays in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInputs {
    initial_amount: f64,
    annual_rate_percent: f64,
    years: u32,
    monthly_contribution: f64,
}

impl ProjectionInputs {
    pub fn new(
        initial_amount: f64,
        annual_rate_percent: f64,
        years: u32,
        monthly_contribution: f64,
    ) -> Result<Self, InputError> {
        for (field, value) in [
            (INITIAL_AMOUNT_FIELD, initial_amount),
            (ANNUAL_RATE_FIELD, annual_rate_percent),
            (MONTHLY_CONTRIBUTION_FIELD, monthly_contribution),
        ] {
            if !value.is_finite() {
                return Err(InputError::NonFinite { field });
            }
            if value < 0.0 {
                return Err(InputError::Negative { field, value });
            }
        }

        Ok(Self {
            initial_amount,
            annual_rate_percent,
            years,
            monthly_contribution,
        })
    }

    pub fn initial_amount(&self) -> f64 {
        self.initial_amount
    }

    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    pub fn years(&self) -> u32 {
        self.years
    }

    pub fn monthly_contribution(&self) -> f64 {
        self.monthly_contribution
    }

    pub fn annual_contribution(&self) -> f64 {
        self.monthly_contribution * 12.0
    }
}

impl Default for ProjectionInputs {
    fn default() -> Self {
        Self {
            initial_amount: 1_000.0,
            annual_rate_percent: 5.0,
            years: 10,
            monthly_contribution: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancePoint {
    pub year: u32,
    pub balance: f64,
}

/// Year-end balances, index 0 being the starting amount.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSeries {
    balances: Vec<f64>,
    annual_contribution: f64,
}

impl BalanceSeries {
    pub(crate) fn new(balances: Vec<f64>, annual_contribution: f64) -> Self {
        debug_assert!(!balances.is_empty());
        Self {
            balances,
            annual_contribution,
        }
    }

    pub fn balances(&self) -> &[f64] {
        &self.balances
    }

    pub fn years(&self) -> u32 {
        (self.balances.len() - 1) as u32
    }

    pub fn initial(&self) -> f64 {
        self.balances[0]
    }

    pub fn final_balance(&self) -> f64 {
        self.balances[self.balances.len() - 1]
    }

    pub fn points(&self) -> impl Iterator<Item = BalancePoint> + '_ {
        self.balances
            .iter()
            .enumerate()
            .map(|(year, &balance)| BalancePoint {
                year: year as u32,
                balance,
            })
    }

    /// Starting amount plus every contribution paid in, without growth.
    pub fn total_contributed(&self) -> f64 {
        self.initial() + self.annual_contribution * f64::from(self.years())
    }

    pub fn total_growth(&self) -> f64 {
        self.final_balance() - self.total_contributed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_inputs_match_the_form_defaults() {
        let inputs = ProjectionInputs::default();
        assert_eq!(inputs.initial_amount(), 1_000.0);
        assert_eq!(inputs.annual_rate_percent(), 5.0);
        assert_eq!(inputs.years(), 10);
        assert_eq!(inputs.monthly_contribution(), 100.0);
        assert_eq!(inputs.annual_contribution(), 1_200.0);
    }

    #[test]
    fn new_accepts_zero_everywhere() {
        let inputs = ProjectionInputs::new(0.0, 0.0, 0, 0.0).expect("zeros are valid");
        assert_eq!(inputs.annual_contribution(), 0.0);
    }

    #[test]
    fn new_rejects_negative_values() {
        let err = ProjectionInputs::new(-1.0, 5.0, 10, 100.0).expect_err("negative initial");
        assert_eq!(err.field(), INITIAL_AMOUNT_FIELD);

        let err = ProjectionInputs::new(1.0, -0.5, 10, 100.0).expect_err("negative rate");
        assert_eq!(
            err,
            InputError::Negative {
                field: ANNUAL_RATE_FIELD,
                value: -0.5
            }
        );

        let err = ProjectionInputs::new(1.0, 5.0, 10, -100.0).expect_err("negative contribution");
        assert_eq!(err.field(), MONTHLY_CONTRIBUTION_FIELD);
    }

    #[test]
    fn new_rejects_non_finite_values() {
        let err = ProjectionInputs::new(f64::NAN, 5.0, 10, 100.0).expect_err("nan initial");
        assert_eq!(
            err,
            InputError::NonFinite {
                field: INITIAL_AMOUNT_FIELD
            }
        );

        let err =
            ProjectionInputs::new(1.0, f64::INFINITY, 10, 100.0).expect_err("infinite rate");
        assert_eq!(err.field(), ANNUAL_RATE_FIELD);
    }

    #[test]
    fn series_summary_figures() {
        let series = BalanceSeries::new(vec![1_000.0, 2_250.0, 3_562.5], 1_200.0);
        assert_eq!(series.years(), 2);
        assert_eq!(series.initial(), 1_000.0);
        assert_eq!(series.final_balance(), 3_562.5);
        assert_eq!(series.total_contributed(), 3_400.0);
        assert_eq!(series.total_growth(), 162.5);

        let points: Vec<BalancePoint> = series.points().collect();
        assert_eq!(points.len(), 3);
        assert_eq!(
            points[2],
            BalancePoint {
                year: 2,
                balance: 3_562.5
            }
        );
    }
}
