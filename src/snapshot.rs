use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

// ─── Flush-cycle input ───────────────────────────────────────────

/// The full set of aggregated statistics handed over for one flush cycle.
/// This is the "read" side — the upstream aggregation engine builds these
/// and the renderer only walks them.
///
/// Every section is a `BTreeMap` so a cycle renders in one deterministic
/// order regardless of how the aggregator assembled it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsSnapshot {
    /// Cumulative count per counter metric.
    pub counters: BTreeMap<String, f64>,
    /// Count per configured interval, keyed identically to `counters`.
    pub counter_rates: BTreeMap<String, f64>,
    /// Instantaneous value per gauge metric.
    pub gauges: BTreeMap<String, f64>,
    /// Distinct elements per set metric; only the cardinality is exported.
    pub sets: BTreeMap<String, BTreeSet<String>>,
    /// Finished timer aggregates per timer metric.
    pub timer_data: BTreeMap<String, TimerAggregate>,
    /// Percentile thresholds the aggregates may carry suffixed fields for.
    #[serde(rename = "pctThreshold")]
    pub pct_threshold: Vec<f64>,
    /// Which timer metrics carry histogram sub-fields, and their bins.
    pub histogram: Vec<HistogramSpec>,
    /// Upstream self-instrumentation (e.g. `processing_time`), exported
    /// once per flush under the internal namespace.
    pub statsd_metrics: BTreeMap<String, f64>,
}

/// Everything the aggregator computed for one timer metric.  The fixed
/// statistics are plain fields, so a "missing required field" cannot be
/// represented, only a missing percentile subset can.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimerAggregate {
    pub count: f64,
    /// Count per second over the flush interval.
    pub count_ps: f64,
    pub sum: f64,
    pub sum_squares: f64,
    pub mean: f64,
    pub median: f64,
    pub upper: f64,
    pub lower: f64,
    pub std: f64,
    /// Statistics over the threshold subset of samples, keyed by the
    /// percentile suffix (`"90"`, `"99_9"`).
    pub percentiles: BTreeMap<String, PercentileAggregate>,
    /// Sample counts keyed by bin label (`"bin_1000"`).
    pub histogram: BTreeMap<String, f64>,
}

/// The five statistics computed over one percentile-threshold subset.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PercentileAggregate {
    pub count: f64,
    pub mean: f64,
    pub upper: f64,
    pub sum: f64,
    pub sum_squares: f64,
}

/// Configured histogram bins for every timer metric matching `metric`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistogramSpec {
    pub metric: String,
    /// Ordered bin upper bounds; +inf is a legal top bound.
    pub bins: Vec<f64>,
}

// ─── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_a_full_snapshot() {
        let snapshot: MetricsSnapshot = serde_json::from_str(
            r#"{
                "counters": { "statsd.bad_lines_seen": 1 },
                "counter_rates": { "statsd.bad_lines_seen": 5 },
                "gauges": { "statsd.timestamp_lag": -0.2 },
                "sets": { "uniques": ["a", "b"] },
                "timer_data": {
                    "a_test_value": {
                        "count": 1, "count_ps": 5, "sum": 100,
                        "sum_squares": 10000, "mean": 100, "median": 100,
                        "upper": 100, "lower": 100, "std": 0,
                        "percentiles": {
                            "90": { "count": 1, "mean": 100, "upper": 100,
                                    "sum": 100, "sum_squares": 10000 }
                        },
                        "histogram": { "bin_1000": 1 }
                    }
                },
                "pctThreshold": [90],
                "histogram": [ { "metric": "a_test_value", "bins": [1000] } ],
                "statsd_metrics": { "processing_time": 0 }
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.counters["statsd.bad_lines_seen"], 1.0);
        assert_eq!(snapshot.sets["uniques"].len(), 2);
        let timer = &snapshot.timer_data["a_test_value"];
        assert_eq!(timer.count_ps, 5.0);
        assert_eq!(timer.percentiles["90"].sum_squares, 10000.0);
        assert_eq!(timer.histogram["bin_1000"], 1.0);
        assert_eq!(snapshot.pct_threshold, vec![90.0]);
    }

    #[test]
    fn missing_sections_default_empty() {
        let snapshot: MetricsSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.counters.is_empty());
        assert!(snapshot.timer_data.is_empty());
        assert!(snapshot.pct_threshold.is_empty());
    }
}
