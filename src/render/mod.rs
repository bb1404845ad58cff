pub mod naming;
pub mod numfmt;

use crate::snapshot::{MetricsSnapshot, TimerAggregate};

use naming::{HistogramTable, NamespaceTable, PercentileTable};

// ─── Public types ────────────────────────────────────────────────

/// The rendered wire payload for one flush cycle.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Concatenated protocol lines, ready for a single socket write.
    pub payload: String,
    /// Distinct top-level metrics rendered — not sub-fields.
    pub num_stats: u64,
}

// ─── Snapshot walk ───────────────────────────────────────────────

/// Renders every metric section of one snapshot into an ordered batch.
/// Sections render as counters, gauges, timers, sets; within a section,
/// metrics render in name order.  The internal lines are appended
/// separately by [`render_internal`] once the caller has measured the
/// render duration.
pub fn render(snapshot: &MetricsSnapshot, timestamp: i64, ns: &NamespaceTable) -> Batch {
    let pct_table = PercentileTable::new(&snapshot.pct_threshold);
    let hist_table = HistogramTable::new(&snapshot.histogram);

    let mut batch = Batch {
        payload: String::with_capacity(4096),
        num_stats: 0,
    };

    // ── Counters: one .count and one .rate line each ────────────
    for (name, &count) in &snapshot.counters {
        let Some(&rate) = snapshot.counter_rates.get(name) else {
            tracing::warn!(metric = %name, "counter without a matching rate, skipping");
            continue;
        };
        if !count.is_finite() || !rate.is_finite() {
            tracing::warn!(metric = %name, "non-finite counter values, skipping");
            continue;
        }
        naming::encode_line(&mut batch.payload, &ns.counter_count(name), count, timestamp);
        naming::encode_line(&mut batch.payload, &ns.counter_rate(name), rate, timestamp);
        batch.num_stats += 1;
    }

    // ── Gauges ──────────────────────────────────────────────────
    for (name, &value) in &snapshot.gauges {
        if emit(&mut batch.payload, &ns.gauge(name), value, timestamp) {
            batch.num_stats += 1;
        }
    }

    // ── Timers: fixed fields, percentile subsets, histograms ────
    for (name, timer) in &snapshot.timer_data {
        render_timer(&mut batch.payload, name, timer, &pct_table, &hist_table, ns, timestamp);
        batch.num_stats += 1;
    }

    // ── Sets: cardinality only ──────────────────────────────────
    for (name, elements) in &snapshot.sets {
        naming::encode_line(&mut batch.payload, &ns.set(name), elements.len() as f64, timestamp);
        batch.num_stats += 1;
    }

    batch
}

/// Appends the exporter's own lines: the metric count, the render
/// duration, and the upstream self-instrumentation.  None of these count
/// toward `num_stats`.
pub fn render_internal(
    batch: &mut Batch,
    snapshot: &MetricsSnapshot,
    timestamp: i64,
    ns: &NamespaceTable,
    calculation_time_ms: f64,
) {
    naming::encode_line(
        &mut batch.payload,
        &ns.internal("numStats"),
        batch.num_stats as f64,
        timestamp,
    );
    emit(
        &mut batch.payload,
        &ns.internal("graphiteStats.calculation_time"),
        calculation_time_ms,
        timestamp,
    );
    for (key, &value) in &snapshot.statsd_metrics {
        emit(&mut batch.payload, &ns.internal(key), value, timestamp);
    }
}

// ─── Timer rendering ─────────────────────────────────────────────

fn render_timer(
    out: &mut String,
    name: &str,
    timer: &TimerAggregate,
    pct_table: &PercentileTable,
    hist_table: &HistogramTable,
    ns: &NamespaceTable,
    timestamp: i64,
) {
    let fixed = [
        ("count", timer.count),
        ("count_ps", timer.count_ps),
        ("sum", timer.sum),
        ("sum_squares", timer.sum_squares),
        ("mean", timer.mean),
        ("median", timer.median),
        ("upper", timer.upper),
        ("lower", timer.lower),
        ("std", timer.std),
    ];
    for (field, value) in fixed {
        emit(out, &ns.timer(name, field), value, timestamp);
    }

    for entry in pct_table.entries() {
        let Some(subset) = timer.percentiles.get(&entry.suffix) else {
            tracing::warn!(
                metric = %name,
                percentile = %entry.suffix,
                "timer aggregate missing a configured percentile subset, skipping",
            );
            continue;
        };
        let values = [
            subset.count,
            subset.mean,
            subset.upper,
            subset.sum,
            subset.sum_squares,
        ];
        for (field, value) in entry.fields.iter().zip(values) {
            emit(out, &ns.timer(name, field), value, timestamp);
        }
    }

    if let Some(bins) = hist_table.bins_for(name) {
        for bin in bins {
            // A bin the aggregate never filled still gets a line.
            let value = timer.histogram.get(&bin.key).copied().unwrap_or(0.0);
            emit(out, &ns.timer(name, &bin.field), value, timestamp);
        }
    }
}

/// Encodes one line unless the value is non-finite, which would corrupt
/// the wire format; such values are dropped with a warning.
fn emit(out: &mut String, name: &str, value: f64, timestamp: i64) -> bool {
    if !value.is_finite() {
        tracing::warn!(metric = %name, value, "non-finite value, skipping line");
        return false;
    }
    naming::encode_line(out, name, value, timestamp);
    true
}

// ─── Tests ───────────────────────────────────────────────────────
