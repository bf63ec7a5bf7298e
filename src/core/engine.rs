use super::types::{BalanceSeries, ProjectionInputs};

/// Year-end balances for `years` years of annual compounding.
///
/// Each step grows the previous balance by the annual rate, then adds twelve
/// monthly contributions as a single year-end lump. Index 0 is `initial`
/// untouched, so the result always holds `years + 1` values. Inputs are
/// assumed validated; nothing here clamps or rejects.
pub fn project(
    initial: f64,
    annual_rate_percent: f64,
    years: u32,
    monthly_contribution: f64,
) -> Vec<f64> {
    let mut balances = Vec::with_capacity(years as usize + 1);
    balances.push(initial);

    let mut balance = initial;
    for _ in 1..=years {
        balance = balance * (1.0 + annual_rate_percent / 100.0) + monthly_contribution * 12.0;
        balances.push(balance);
    }
    balances
}

pub fn project_inputs(inputs: &ProjectionInputs) -> BalanceSeries {
    let balances = project(
        inputs.initial_amount(),
        inputs.annual_rate_percent(),
        inputs.years(),
        inputs.monthly_contribution(),
    );
    BalanceSeries::new(balances, inputs.annual_contribution())
}
