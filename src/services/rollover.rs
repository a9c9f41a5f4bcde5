//! Rollover arithmetic
//!
//! A category's surplus or deficit for a period is carried into the next one.
//! Deficits are carried too; there is no floor at zero.

use serde::Serialize;

/// Inputs for one category in one period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolloverInput {
    pub budget: f64,
    pub carry_in: f64,
    pub actual_spend: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RolloverResult {
    /// Budget plus whatever was carried in
    pub available: f64,
    /// Budget minus spend for this period alone
    pub variance: f64,
    /// Amount carried into the next period
    pub carry_out: f64,
}

pub fn calculate_rollover(input: RolloverInput) -> RolloverResult {
    let available = input.budget + input.carry_in;
    let variance = input.budget - input.actual_spend;
    RolloverResult {
        available,
        variance,
        carry_out: input.carry_in + variance,
    }
}
