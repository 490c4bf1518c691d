//! End-to-end pipeline flow: ingest -> tick -> poll.

use std::time::Duration;

use floorsight_runtime::{FloorsightConfig, FloorsightRuntime};
use floorsight_types::{
    DowntimeReason, EntityFilter, EntityId, EventRecord, MachineState, MetricName, OperatorAction,
    SpcStatus, Unit,
};

fn entity() -> EntityId {
    EntityId::new("M-101")
}

fn ingest_reading(runtime: &FloorsightRuntime, metric: &str, value: f64, unit: Unit, ts: u64) {
    runtime
        .ingest(EventRecord::reading(
            entity(),
            MetricName::new(metric),
            value,
            unit,
            ts,
        ))
        .unwrap();
}

fn ingest_oee_factors(runtime: &FloorsightRuntime, ts: u64) {
    ingest_reading(runtime, "availability", 85.0, Unit::Percent, ts);
    ingest_reading(runtime, "performance", 90.0, Unit::Percent, ts);
    ingest_reading(runtime, "quality", 98.0, Unit::Percent, ts);
}

#[test]
fn snapshots_flow_from_ingest_to_poll() {
    let runtime = FloorsightRuntime::new(FloorsightConfig::default());
    let handle = runtime.subscribe(EntityFilter::All);

    ingest_oee_factors(&runtime, 1_000);
    ingest_reading(&runtime, "diameter", 10.01, Unit::Mm, 1_000);
    let summary = runtime.tick_once();
    assert_eq!(summary.tick, 1);
    assert_eq!(summary.entities, 1);

    let update = runtime.poll(handle).unwrap();
    assert_eq!(update.snapshots.len(), 1);
    let snapshot = &update.snapshots[0];
    assert_eq!(snapshot.entity_id, entity());
    assert!((snapshot.oee.oee - 74.97).abs() < 1e-9);
    assert_eq!(snapshot.spc_status, SpcStatus::Stable);

    // No intervening tick: the second poll is empty.
    assert!(runtime.poll(handle).unwrap().is_empty());
}

#[test]
fn spc_breach_raises_anomaly_and_insight() {
    let runtime = FloorsightRuntime::new(FloorsightConfig::default());
    let handle = runtime.subscribe(EntityFilter::All);

    ingest_oee_factors(&runtime, 1_000);
    for (ts, value) in [(1_000, 10.01), (2_000, 10.02), (3_000, 10.06)] {
        ingest_reading(&runtime, "diameter", value, Unit::Mm, ts);
    }
    runtime.tick_once();

    let update = runtime.poll(handle).unwrap();
    assert_eq!(update.snapshots[0].spc_status, SpcStatus::OutOfSpec);
    assert_eq!(update.anomalies.len(), 1);
    assert!(update.anomalies[0].active);
    assert!(!update.insights.is_empty());
    assert!(update.insights[0].headline.contains("SPC out of spec"));

    // Risk reflects the active anomaly: base 10 + 1 x 15.
    assert!((update.snapshots[0].risk_score - 25.0).abs() < 1e-9);
}

#[test]
fn anomaly_keeps_id_while_condition_persists() {
    let runtime = FloorsightRuntime::new(FloorsightConfig::default());
    let handle = runtime.subscribe(EntityFilter::All);

    ingest_reading(&runtime, "diameter", 10.08, Unit::Mm, 1_000);
    runtime.tick_once();
    let first = runtime.poll(handle).unwrap();
    let id = first.anomalies[0].id;

    for tick in 2..=6 {
        runtime.tick_once();
        let update = runtime.poll(handle).unwrap();
        assert_eq!(update.anomalies.len(), 1);
        assert_eq!(update.anomalies[0].id, id);
        assert!(update.anomalies[0].active);
        assert_eq!(update.anomalies[0].last_seen_tick, tick);
    }
}

#[test]
fn flapping_condition_yields_single_record() {
    let runtime = FloorsightRuntime::new(FloorsightConfig::default());
    let handle = runtime.subscribe(EntityFilter::All);

    // Out of spec at tick 1.
    ingest_reading(&runtime, "diameter", 10.08, Unit::Mm, 1_000);
    runtime.tick_once();
    let id = runtime.poll(handle).unwrap().anomalies[0].id;

    // Back in spec at tick 2, out again at tick 3 (within cool-down).
    ingest_reading(&runtime, "diameter", 10.01, Unit::Mm, 2_000);
    runtime.tick_once();
    ingest_reading(&runtime, "diameter", 10.07, Unit::Mm, 3_000);
    runtime.tick_once();

    let update = runtime.poll(handle).unwrap();
    let ids: Vec<_> = update.anomalies.iter().map(|a| a.id).collect();
    assert!(ids.iter().all(|i| *i == id));
    let active: Vec<_> = update.anomalies.iter().filter(|a| a.active).collect();
    assert_eq!(active.len(), 1);
}

#[test]
fn machine_alarm_surfaces_through_the_pipeline() {
    let runtime = FloorsightRuntime::new(FloorsightConfig::default());
    let handle = runtime.subscribe(EntityFilter::All);

    runtime
        .ingest(EventRecord::state_change(entity(), MachineState::Alarm, 1_000))
        .unwrap();
    runtime.tick_once();

    let update = runtime.poll(handle).unwrap();
    assert_eq!(update.anomalies.len(), 1);
    assert_eq!(update.anomalies[0].severity, 90.0);
    assert!(update.insights[0].advice.contains("maintenance"));
}

#[test]
fn acknowledgement_demotes_insight_ranking() {
    let runtime = FloorsightRuntime::new(FloorsightConfig::default());
    let handle = runtime.subscribe(EntityFilter::All);

    // Two anomalies: a severe alarm and a milder SPC breach.
    runtime
        .ingest(EventRecord::state_change(entity(), MachineState::Alarm, 500))
        .unwrap();
    ingest_reading(&runtime, "diameter", 10.06, Unit::Mm, 1_000);
    runtime.tick_once();

    let update = runtime.poll(handle).unwrap();
    let alarm = update
        .anomalies
        .iter()
        .find(|a| a.severity == 90.0)
        .unwrap();
    assert_eq!(update.insights[0].severity, 90.0);

    runtime
        .ingest(EventRecord::operator(
            entity(),
            OperatorAction::AcknowledgeAnomaly {
                anomaly_id: alarm.id,
            },
            2_000,
        ))
        .unwrap();
    runtime.tick_once();

    let update = runtime.poll(handle).unwrap();
    // The unacknowledged SPC record now leads the list.
    assert!(update.insights[0].severity < 90.0);
}

#[test]
fn downtime_logs_accumulate_into_pareto() {
    let runtime = FloorsightRuntime::new(FloorsightConfig::default());

    for reason in [
        DowntimeReason::Jam,
        DowntimeReason::Jam,
        DowntimeReason::Tool,
    ] {
        runtime
            .ingest(EventRecord::operator(
                entity(),
                OperatorAction::LogDowntime { reason },
                1_000,
            ))
            .unwrap();
    }
    runtime.tick_once();

    let pareto = runtime.downtime_pareto(&entity());
    assert_eq!(pareto[0].label, "Jam");
    assert_eq!(pareto[0].count, 2);
    assert_eq!(pareto[1].label, "Tool");
}

#[test]
fn filtered_subscriber_sees_only_its_entities() {
    let runtime = FloorsightRuntime::new(FloorsightConfig::default());
    let handle = runtime.subscribe(EntityFilter::single(EntityId::new("M-202")));

    ingest_oee_factors(&runtime, 1_000);
    runtime
        .ingest(EventRecord::reading(
            EntityId::new("M-202"),
            MetricName::new("vibration"),
            1.0,
            Unit::MmPerSec,
            1_000,
        ))
        .unwrap();
    runtime.tick_once();

    let update = runtime.poll(handle).unwrap();
    assert_eq!(update.snapshots.len(), 1);
    assert_eq!(update.snapshots[0].entity_id, EntityId::new("M-202"));
}

#[test]
fn unsubscribe_then_poll_is_an_explicit_error() {
    let runtime = FloorsightRuntime::new(FloorsightConfig::default());
    let handle = runtime.subscribe(EntityFilter::All);
    runtime.unsubscribe(handle).unwrap();
    assert!(runtime.poll(handle).is_err());
}

#[tokio::test]
async fn interval_scheduler_drives_ticks() {
    let config = FloorsightConfig {
        tick_interval: Duration::from_millis(10),
        ..Default::default()
    };
    let runtime = FloorsightRuntime::new(config);
    let handle = runtime.subscribe(EntityFilter::All);
    ingest_oee_factors(&runtime, 1_000);

    let scheduler = runtime.start().await.unwrap();
    assert!(runtime.start().await.is_err());

    scheduler.trigger_tick().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let update = runtime.poll(handle).unwrap();
    assert!(!update.snapshots.is_empty());

    runtime.shutdown().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!scheduler.is_running().await);
}
