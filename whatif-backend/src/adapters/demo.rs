//! Demo wiring: a simplified bond portfolio risk model.
//!
//! Duration/convexity approximation of mark-to-market P&L for a mixed
//! government / investment-grade / high-yield portfolio. Illustrative only.

use whatif_shared::errors::RunnerResult;
use whatif_shared::{
    FieldMap, InputField, ModelSchema, OutputField, OutputMap, ScenarioDefinition,
};

use super::in_memory::{FunctionalScenarioRunner, InMemoryModelRepository, require_input};

const BASE_YIELD_10Y: f64 = 4.25;
const BASE_YIELD_2Y: f64 = 4.80;
const BASE_SPREAD_IG: f64 = 1.20;
const BASE_SPREAD_HY: f64 = 3.50;

/// Market conditions and portfolio structure the model starts from
pub fn base_inputs() -> FieldMap {
    FieldMap::from([
        ("yield_10y".to_string(), BASE_YIELD_10Y),
        ("yield_2y".to_string(), BASE_YIELD_2Y),
        ("credit_spread_ig".to_string(), BASE_SPREAD_IG),
        ("credit_spread_hy".to_string(), BASE_SPREAD_HY),
        ("portfolio_duration".to_string(), 6.5),
        ("portfolio_convexity".to_string(), 0.45),
        ("ig_allocation".to_string(), 0.65),
        ("hy_allocation".to_string(), 0.15),
        ("gov_allocation".to_string(), 0.20),
        ("portfolio_value".to_string(), 100.0),
    ])
}

/// Evaluate the bond portfolio model. All P&L is relative to the base market levels.
pub fn bond_portfolio_model(inputs: &FieldMap) -> RunnerResult<OutputMap> {
    let pv = require_input(inputs, "portfolio_value")?;
    let dur = require_input(inputs, "portfolio_duration")?;
    let cvx = require_input(inputs, "portfolio_convexity")?;
    let ig_alloc = require_input(inputs, "ig_allocation")?;
    let hy_alloc = require_input(inputs, "hy_allocation")?;
    let gov_alloc = require_input(inputs, "gov_allocation")?;
    let yield_10y_pct = require_input(inputs, "yield_10y")?;
    let yield_2y_pct = require_input(inputs, "yield_2y")?;
    let cs_ig = require_input(inputs, "credit_spread_ig")? / 100.0;
    let cs_hy = require_input(inputs, "credit_spread_hy")? / 100.0;

    let yield_10y = yield_10y_pct / 100.0;
    let curve_slope_bps = (yield_10y_pct - yield_2y_pct) * 100.0;

    let blended_yield =
        gov_alloc * yield_10y + ig_alloc * (yield_10y + cs_ig) + hy_alloc * (yield_10y + cs_hy);

    let dv01 = pv * dur / 10_000.0;

    let delta_yield = yield_10y - BASE_YIELD_10Y / 100.0;
    let pnl_rates = (-dur * delta_yield + 0.5 * cvx * delta_yield.powi(2)) * pv;

    let pnl_credit = -(cs_ig - BASE_SPREAD_IG / 100.0) * dur * ig_alloc * pv
        - (cs_hy - BASE_SPREAD_HY / 100.0) * dur * hy_alloc * pv;

    let pnl_total = pnl_rates + pnl_credit;
    let credit_weight = ig_alloc + hy_alloc;
    let spread_duration = credit_weight * dur;
    let credit_dv01 = spread_duration * credit_weight * pv / 10_000.0;

    Ok(OutputMap::from([
        ("portfolio_nav".to_string(), round(pv + pnl_total, 4).into()),
        ("pnl_total".to_string(), round(pnl_total, 4).into()),
        ("pnl_rates".to_string(), round(pnl_rates, 4).into()),
        ("pnl_credit".to_string(), round(pnl_credit, 4).into()),
        ("dv01".to_string(), round(dv01, 4).into()),
        ("spread_duration".to_string(), round(spread_duration, 4).into()),
        ("credit_dv01".to_string(), round(credit_dv01, 6).into()),
        ("blended_yield_pct".to_string(), round(blended_yield * 100.0, 4).into()),
        ("curve_slope_bps".to_string(), round(curve_slope_bps, 1).into()),
        (
            "portfolio_return_pct".to_string(),
            round(pnl_total / pv * 100.0, 4).into(),
        ),
    ]))
}

fn round(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn scenarios() -> Vec<ScenarioDefinition> {
    vec![
        ScenarioDefinition::new(
            "base_case",
            "Current market conditions with no shocks applied.",
            "Reference point every stress scenario is measured against.",
        ),
        ScenarioDefinition::new(
            "rates_shock_up",
            "Parallel +100bps shift across the curve.",
            "Rapid central bank tightening, as in the 2004-2006 and 2022-2023 hiking cycles.",
        )
        .with_override("yield_10y", BASE_YIELD_10Y + 1.0)
        .with_override("yield_2y", BASE_YIELD_2Y + 1.0),
        ScenarioDefinition::new(
            "rates_shock_down",
            "Parallel -100bps shift, flight to safety.",
            "Risk-off move where government yields fall sharply during recession or crisis.",
        )
        .with_override("yield_10y", BASE_YIELD_10Y - 1.0)
        .with_override("yield_2y", BASE_YIELD_2Y - 1.0),
        ScenarioDefinition::new(
            "credit_stress",
            "IG spreads widen to 250bps and HY spreads to 700bps.",
            "Credit dislocation consistent with a moderate recession; levels seen in 2008-2009.",
        )
        .with_override("credit_spread_ig", 2.50)
        .with_override("credit_spread_hy", 7.00),
        ScenarioDefinition::new(
            "stagflation",
            "Rates up 150bps while credit spreads widen.",
            "Duration losses compounded by spread losses, a stylised 1970s environment.",
        )
        .with_override("yield_10y", BASE_YIELD_10Y + 1.5)
        .with_override("yield_2y", BASE_YIELD_2Y + 1.5)
        .with_override("credit_spread_ig", 2.00)
        .with_override("credit_spread_hy", 5.50),
    ]
}

pub fn schema() -> ModelSchema {
    let base = base_inputs();
    let current = |name: &str| base.get(name).copied().unwrap_or_default();

    ModelSchema {
        name: "Bond Portfolio Risk Model (Demo)".to_string(),
        description: "Simplified fixed-income risk model computing mark-to-market P&L, \
                      rate risk (DV01), spread risk (credit DV01) and blended yield for a \
                      government / IG / HY bond portfolio."
            .to_string(),
        inputs: vec![
            InputField::new("yield_10y", "rates", "10-year government benchmark yield.", "%", (0.5, 8.0))
                .with_current_value(current("yield_10y")),
            InputField::new(
                "yield_2y",
                "rates",
                "2-year government yield. An inverted curve (2y above 10y) is a classic recession signal.",
                "%",
                (0.0, 8.0),
            )
            .with_current_value(current("yield_2y")),
            InputField::new(
                "credit_spread_ig",
                "credit",
                "Investment-grade spread over the government benchmark; widens under stress.",
                "%",
                (0.5, 4.0),
            )
            .with_current_value(current("credit_spread_ig")),
            InputField::new(
                "credit_spread_hy",
                "credit",
                "High-yield spread over the government benchmark; sensitive to recession and liquidity.",
                "%",
                (2.0, 15.0),
            )
            .with_current_value(current("credit_spread_hy")),
            InputField::new(
                "portfolio_duration",
                "portfolio",
                "Modified duration; 6.5 means a 1% rate rise costs about 6.5% of value.",
                "years",
                (1.0, 15.0),
            )
            .with_current_value(current("portfolio_duration")),
            InputField::new(
                "ig_allocation",
                "portfolio",
                "Fraction of the portfolio held in IG corporate bonds.",
                "fraction",
                (0.0, 1.0),
            )
            .with_current_value(current("ig_allocation")),
            InputField::new(
                "hy_allocation",
                "portfolio",
                "Fraction of the portfolio held in HY corporate bonds.",
                "fraction",
                (0.0, 0.5),
            )
            .with_current_value(current("hy_allocation")),
        ],
        outputs: vec![
            OutputField::new(
                "portfolio_nav",
                "Net asset value after marking to market.",
                "£m",
                "Falls when rates rise or spreads widen.",
            ),
            OutputField::new(
                "pnl_total",
                "Total mark-to-market P&L relative to the base case.",
                "£m",
                "Sum of rate-driven and spread-driven components; negative is a loss.",
            )
            .with_thresholds(0.0, -5.0),
            OutputField::new(
                "dv01",
                "Value of one basis point of rate move.",
                "£k per bp",
                "A DV01 of 65 means a 100bp rate rise costs about £6.5m.",
            ),
            OutputField::new(
                "spread_duration",
                "Spread duration of the credit positions.",
                "years",
                "Higher values mean more sensitivity to spread widening.",
            ),
            OutputField::new(
                "blended_yield_pct",
                "Weighted average yield across holdings.",
                "%",
                "Hold-to-maturity return with no defaults.",
            ),
            OutputField::new(
                "portfolio_return_pct",
                "Total P&L as a percentage of starting value.",
                "%",
                "Size-independent measure of stress severity.",
            )
            .with_thresholds(0.0, -5.0),
        ],
        assumptions: vec![
            "Duration and convexity are fixed and do not reprice.".to_string(),
            "Credit P&L uses a duration-weighted spread approximation.".to_string(),
            "No default or migration modelling.".to_string(),
            "P&L is measured against fixed base market levels.".to_string(),
            "Allocations are expected to sum to 1.".to_string(),
        ],
        caveats: vec![
            "Demonstration model, not suitable for production risk management.".to_string(),
            "Real portfolios need position-level pricing.".to_string(),
        ],
    }
}

/// Repository and runner for the demo model
pub fn bond_portfolio_wiring() -> (InMemoryModelRepository, FunctionalScenarioRunner) {
    (
        InMemoryModelRepository::new(schema(), scenarios()),
        FunctionalScenarioRunner::new(bond_portfolio_model, base_inputs()),
    )
}
