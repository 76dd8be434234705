// Business logic shared by the pages and the tests.

use chrono::{Datelike, NaiveDate};

use crate::models::ExpenseWithCar;

/// Highway efficiency assumed when no car is active and nothing was entered.
pub const DEFAULT_EFFICIENCY: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripEstimate {
    pub fuel_needed: f64,
    pub total_cost: f64,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parses a user-entered numeric field. Empty or non-numeric text yields None.
pub fn parse_amount(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Efficiency used by the calculator: an explicit entry wins when it is a
/// usable figure, then the active car's highway rating, then the default.
pub fn resolve_efficiency(entered: Option<f64>, active_highway: Option<f64>) -> f64 {
    entered
        .filter(|e| e.is_finite() && *e > 0.0)
        .or(active_highway)
        .unwrap_or(DEFAULT_EFFICIENCY)
}

/// Fuel and cost for a trip. Distance and price must be positive finite
/// numbers, as must the resolved efficiency; anything else yields no result.
/// Both figures are rounded to two decimals for display.
pub fn estimate_trip(distance: f64, price_per_unit: f64, efficiency: f64) -> Option<TripEstimate> {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    if !positive(distance) || !positive(price_per_unit) || !positive(efficiency) {
        return None;
    }

    let fuel_needed = distance / efficiency;
    let total_cost = fuel_needed * price_per_unit;

    Some(TripEstimate {
        fuel_needed: round2(fuel_needed),
        total_cost: round2(total_cost),
    })
}

/// The derived column stored on every expense row, computed once at write time.
pub fn expense_total_cost(fuel_amount: f64, price_per_unit: f64) -> f64 {
    fuel_amount * price_per_unit
}

/// Sum of the stored totals of expenses dated in the same calendar month and
/// year as `reference`. The stored total is used as-is, never recomputed.
pub fn monthly_total(records: &[ExpenseWithCar], reference: NaiveDate) -> f64 {
    records
        .iter()
        .filter(|e| {
            e.expense_date.month() == reference.month() && e.expense_date.year() == reference.year()
        })
        .map(|e| e.total_cost)
        .sum()
}

pub fn format_money(amount: f64) -> String {
    format!("${amount:.2}")
}
