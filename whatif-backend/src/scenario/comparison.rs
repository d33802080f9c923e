//! Comparison engine: per-metric deltas between two scenario results.
//!
//! Comparisons always complete. A metric missing from either side, or holding
//! a non-numeric value, yields `None` for `delta` and `percent_change` instead
//! of an error. A zero baseline yields `None` for `percent_change` only.

use std::collections::{BTreeMap, BTreeSet};

use whatif_shared::{FieldValue, MetricDifference, ScenarioComparison, ScenarioResult};

/// Decimal places kept for `delta`
const DELTA_DECIMALS: i32 = 6;
/// Decimal places kept for `percent_change`
const PERCENT_DECIMALS: i32 = 2;

/// Compare two results.
///
/// With `metrics` absent or empty, every output name found on either side is
/// compared, in sorted order.
pub fn compare_results(
    result_a: ScenarioResult,
    result_b: ScenarioResult,
    metrics: Option<Vec<String>>,
) -> ScenarioComparison {
    let metrics = match metrics {
        Some(metrics) if !metrics.is_empty() => metrics,
        _ => metric_union(&result_a, &result_b),
    };

    let differences: BTreeMap<String, MetricDifference> = metrics
        .iter()
        .map(|metric| {
            let difference =
                metric_difference(result_a.outputs.get(metric), result_b.outputs.get(metric));
            (metric.clone(), difference)
        })
        .collect();

    ScenarioComparison {
        scenario_a: result_a,
        scenario_b: result_b,
        metrics,
        differences,
    }
}

/// Sorted union of the output metric names of both results
pub fn metric_union(result_a: &ScenarioResult, result_b: &ScenarioResult) -> Vec<String> {
    result_a
        .outputs
        .keys()
        .chain(result_b.outputs.keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Difference for one metric, `b - a`
pub fn metric_difference(
    value_a: Option<&FieldValue>,
    value_b: Option<&FieldValue>,
) -> MetricDifference {
    let numbers = value_a
        .and_then(FieldValue::as_number)
        .zip(value_b.and_then(FieldValue::as_number));

    let (delta, percent_change) = match numbers {
        Some((a, b)) => {
            let delta = b - a;
            let percent_change = if a != 0.0 {
                Some(round_to(delta / a * 100.0, PERCENT_DECIMALS))
            } else {
                None
            };
            (Some(round_to(delta, DELTA_DECIMALS)), percent_change)
        }
        None => (None, None),
    };

    MetricDifference {
        value_a: value_a.cloned(),
        value_b: value_b.cloned(),
        delta,
        percent_change,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        // Too large to carry any fractional digits
        return value;
    }
    scaled.round() / factor
}
