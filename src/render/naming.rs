use std::fmt::Write;

use crate::config::GraphiteConfig;
use crate::snapshot::HistogramSpec;

use super::numfmt;

// ─── Line encoding ───────────────────────────────────────────────

/// Appends one protocol line: `"<name> <value> <timestamp>\n"`.
pub fn encode_line(out: &mut String, name: &str, value: f64, timestamp: i64) {
    out.push_str(name);
    out.push(' ');
    numfmt::push_value(out, value);
    let _ = writeln!(out, " {timestamp}");
}

/// Suffix appended to percentile-subset timer fields: the threshold value
/// with dots flattened, so `90` → `"90"` and `99.9` → `"99_9"`.
pub fn pct_suffix(threshold: f64) -> String {
    numfmt::format_value(threshold).replace('.', "_")
}

// ─── Namespace table ─────────────────────────────────────────────

/// Every name-qualification rule, resolved once from configuration.
///
/// The modern layout nests each metric kind under its own segment
/// (`stats.counters.<name>.count`); the legacy layout keeps the flat
/// scheme old dashboards were built against (`stats.<name>` for rates,
/// `stats_counts.<name>` for counts, `statsd.numStats` for internals).
#[derive(Debug, Clone)]
pub struct NamespaceTable {
    counter_rate_ns: String,
    counter_count_ns: String,
    timer_ns: String,
    gauge_ns: String,
    set_ns: String,
    internal_ns: String,
    legacy: bool,
}

impl NamespaceTable {
    pub fn new(config: &GraphiteConfig) -> Self {
        let prefix = &config.global_prefix;
        if config.legacy_namespace {
            Self {
                counter_rate_ns: prefix.clone(),
                counter_count_ns: "stats_counts".to_string(),
                timer_ns: format!("{prefix}.timers"),
                gauge_ns: format!("{prefix}.gauges"),
                set_ns: format!("{prefix}.sets"),
                internal_ns: config.prefix_stats.clone(),
                legacy: true,
            }
        } else {
            Self {
                counter_rate_ns: format!("{prefix}.{}", config.prefix_counter),
                counter_count_ns: format!("{prefix}.{}", config.prefix_counter),
                timer_ns: format!("{prefix}.{}", config.prefix_timer),
                gauge_ns: format!("{prefix}.{}", config.prefix_gauge),
                set_ns: format!("{prefix}.{}", config.prefix_set),
                internal_ns: format!("{prefix}.{}", config.prefix_stats),
                legacy: false,
            }
        }
    }

    pub fn counter_count(&self, name: &str) -> String {
        if self.legacy {
            format!("{}.{name}", self.counter_count_ns)
        } else {
            format!("{}.{name}.count", self.counter_count_ns)
        }
    }

    pub fn counter_rate(&self, name: &str) -> String {
        if self.legacy {
            format!("{}.{name}", self.counter_rate_ns)
        } else {
            format!("{}.{name}.rate", self.counter_rate_ns)
        }
    }

    pub fn timer(&self, name: &str, field: &str) -> String {
        format!("{}.{name}.{field}", self.timer_ns)
    }

    pub fn gauge(&self, name: &str) -> String {
        format!("{}.{name}", self.gauge_ns)
    }

    pub fn set(&self, name: &str) -> String {
        format!("{}.{name}.count", self.set_ns)
    }

    pub fn internal(&self, key: &str) -> String {
        format!("{}.{key}", self.internal_ns)
    }
}

// ─── Per-cycle field tables ──────────────────────────────────────

/// Field names for one configured percentile threshold.
#[derive(Debug, Clone)]
pub struct PercentileEntry {
    /// Key into `TimerAggregate::percentiles` (`"90"`, `"99_9"`).
    pub suffix: String,
    /// `count`/`mean`/`upper`/`sum`/`sum_squares` with the suffix applied.
    pub fields: [String; 5],
}

/// Percentile-suffixed field names, built once per flush cycle from the
/// snapshot's threshold list so the naming scheme is testable on its own.
#[derive(Debug, Clone)]
pub struct PercentileTable {
    entries: Vec<PercentileEntry>,
}

impl PercentileTable {
    pub fn new(thresholds: &[f64]) -> Self {
        let entries = thresholds
            .iter()
            .map(|&pct| {
                let suffix = pct_suffix(pct);
                let fields = ["count", "mean", "upper", "sum", "sum_squares"]
                    .map(|field| format!("{field}_{suffix}"));
                PercentileEntry { suffix, fields }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[PercentileEntry] {
        &self.entries
    }
}

/// One histogram bin: the aggregate's map key and the emitted field name.
#[derive(Debug, Clone)]
pub struct BinEntry {
    /// Key into `TimerAggregate::histogram` (`"bin_1000"`).
    pub key: String,
    /// Field name on the wire (`"histogram.bin_1000"`).
    pub field: String,
}

/// Configured histogram bins per metric, built once per flush cycle.
#[derive(Debug, Clone)]
pub struct HistogramTable {
    specs: Vec<(String, Vec<BinEntry>)>,
}

impl HistogramTable {
    pub fn new(specs: &[HistogramSpec]) -> Self {
        let specs = specs
            .iter()
            .map(|spec| {
                let bins = spec
                    .bins
                    .iter()
                    .map(|&bound| {
                        let key = format!("bin_{}", numfmt::bin_label(bound));
                        let field = format!("histogram.{key}");
                        BinEntry { key, field }
                    })
                    .collect();
                (spec.metric.clone(), bins)
            })
            .collect();
        Self { specs }
    }

    /// First configured spec whose metric matches `name` wins; a spec that
    /// matches no timer in the snapshot is simply never consulted.
    pub fn bins_for(&self, name: &str) -> Option<&[BinEntry]> {
        self.specs
            .iter()
            .find(|(metric, _)| name.contains(metric.as_str()))
            .map(|(_, bins)| bins.as_slice())
    }
}

// ─── Tests ───────────────────────────────────────────────────────
