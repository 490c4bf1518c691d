//! OEE factor computation and projections
//!
//! Each factor is a smoothed read of its rolling window rather than a
//! raw instantaneous value, so a single noisy sample never drives the
//! headline number.

use floorsight_store::StoreSnapshot;
use floorsight_types::{EntityId, OeeComponents, Sample};

use crate::config::OeeSourcesConfig;

/// Arithmetic mean of a sample window; `None` when empty.
pub fn moving_average(samples: &[Sample]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().map(|s| s.value).sum::<f64>() / samples.len() as f64)
}

/// Compute the OEE components of an entity from a store snapshot.
///
/// Availability prefers machine-state occupancy (fraction of logged
/// time in `Run`) and falls back to the configured availability
/// series. Quality falls back to good/(good+scrap) when no quality
/// series exists. A factor whose every source is empty reads 0.0 and
/// marks the result as insufficient.
pub fn compute_oee(
    snapshot: &StoreSnapshot,
    entity_id: &EntityId,
    config: &OeeSourcesConfig,
) -> OeeComponents {
    let window = config.smoothing_window;

    let availability = snapshot
        .run_occupancy(entity_id)
        .map(|fraction| fraction * 100.0)
        .or_else(|| {
            moving_average(snapshot.window(entity_id, &config.availability_metric, window))
        });

    let performance = moving_average(snapshot.window(entity_id, &config.performance_metric, window));

    let quality = moving_average(snapshot.window(entity_id, &config.quality_metric, window))
        .or_else(|| quality_from_counters(snapshot, entity_id, config));

    match (availability, performance, quality) {
        (Some(a), Some(p), Some(q)) => OeeComponents::from_factors(a, p, q),
        _ => {
            let mut components = OeeComponents::from_factors(
                availability.unwrap_or(0.0),
                performance.unwrap_or(0.0),
                quality.unwrap_or(0.0),
            );
            components.insufficient_data = true;
            components
        }
    }
}

fn quality_from_counters(
    snapshot: &StoreSnapshot,
    entity_id: &EntityId,
    config: &OeeSourcesConfig,
) -> Option<f64> {
    let good = snapshot.latest(entity_id, &config.good_count_metric)?.value;
    let scrap = snapshot.latest(entity_id, &config.scrap_count_metric)?.value;
    let total = good + scrap;
    if total <= 0.0 {
        return None;
    }
    Some(good / total * 100.0)
}

/// What-if OEE projection: each point of improvement effort recovers
/// 0.15 OEE points (the micro-stop elimination model), capped at 100.
pub fn project_oee(current_oee: f64, improvement_pct: f64) -> f64 {
    let gain = improvement_pct.clamp(0.0, 100.0) * 0.15;
    (current_oee + gain).min(100.0)
}

/// Extrapolate a progress series (percent) to the end of a horizon.
///
/// Velocity is taken across the whole window; `None` when fewer than
/// two samples exist or no time elapsed between them.
pub fn project_completion(samples: &[Sample], horizon_ms: u64) -> Option<f64> {
    let first = samples.first()?;
    let last = samples.last()?;
    let elapsed = last.timestamp_ms.saturating_sub(first.timestamp_ms);
    if elapsed == 0 {
        return None;
    }
    let velocity = (last.value - first.value) / elapsed as f64;
    Some(last.value + velocity * horizon_ms as f64)
}
