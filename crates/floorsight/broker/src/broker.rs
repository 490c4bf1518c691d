//! The subscription broker
//!
//! Publication and poll paths share one short-lived lock; nothing
//! holds it across a tick, and poll never waits for new data. A
//! successful poll acknowledges everything up to the sequence counter
//! at the time of the call by advancing the subscriber's cursor.

use std::collections::HashMap;
use std::time::Instant;

use floorsight_types::{
    AnomalyId, AnomalyRecord, ConsumerId, DerivedSnapshot, EntityFilter, EntityId, InsightItem,
    PollUpdate, Sequencer, SubscriptionHandle,
};
use parking_lot::RwLock;

use crate::config::BrokerConfig;
use crate::error::{BrokerError, BrokerResult};

struct Subscription {
    filter: EntityFilter,
    cursor: u64,
    last_polled_at: Instant,
}

#[derive(Default)]
struct Published {
    /// Latest snapshot per entity; snapshots are full replacements so
    /// older ones coalesce away.
    snapshots: HashMap<EntityId, DerivedSnapshot>,

    /// Latest state per anomaly id, with its publication sequence.
    anomalies: HashMap<AnomalyId, (u64, AnomalyRecord)>,

    /// Latest insight list and its publication sequence.
    insights: (u64, Vec<InsightItem>),
}

/// Distributes updates to independent dashboard subscribers.
pub struct SubscriptionBroker {
    config: BrokerConfig,
    sequencer: Sequencer,
    subscriptions: RwLock<HashMap<ConsumerId, Subscription>>,
    published: RwLock<Published>,
}

impl SubscriptionBroker {
    pub fn new(config: BrokerConfig, sequencer: Sequencer) -> Self {
        Self {
            config,
            sequencer,
            subscriptions: RwLock::new(HashMap::new()),
            published: RwLock::new(Published::default()),
        }
    }

    /// Register a consumer. The cursor starts at zero so the first
    /// poll delivers the current state of every matching entity.
    pub fn subscribe(&self, filter: EntityFilter) -> SubscriptionHandle {
        let consumer_id = ConsumerId::generate();
        self.subscriptions.write().insert(
            consumer_id,
            Subscription {
                filter,
                cursor: 0,
                last_polled_at: Instant::now(),
            },
        );
        tracing::info!(consumer = %consumer_id, "subscriber registered");
        SubscriptionHandle::new(consumer_id)
    }

    /// Remove a subscription; unknown handles are an explicit error,
    /// not silently ignored.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> BrokerResult<()> {
        match self.subscriptions.write().remove(&handle.consumer_id()) {
            Some(_) => {
                tracing::info!(consumer = %handle, "subscriber removed");
                Ok(())
            }
            None => Err(BrokerError::UnknownSubscription(handle)),
        }
    }

    /// Everything published for the subscriber since its last poll.
    ///
    /// Non-blocking and restartable: returns immediately with what is
    /// available, and polling again without intervening publications
    /// yields an empty update.
    pub fn poll(&self, handle: SubscriptionHandle) -> BrokerResult<PollUpdate> {
        let mut subscriptions = self.subscriptions.write();
        let subscription = subscriptions
            .get_mut(&handle.consumer_id())
            .ok_or(BrokerError::UnknownSubscription(handle))?;

        let published = self.published.read();
        // Publication allocates its sequence under the published
        // lock, so reading the counter here cannot skip an in-flight
        // update.
        let ack = self.sequencer.current();
        let cursor = subscription.cursor;

        let mut snapshots: Vec<DerivedSnapshot> = published
            .snapshots
            .values()
            .filter(|snap| snap.seq > cursor && subscription.filter.matches(&snap.entity_id))
            .cloned()
            .collect();
        snapshots.sort_by(|a, b| a.seq.cmp(&b.seq));

        let mut anomalies: Vec<(u64, AnomalyRecord)> = published
            .anomalies
            .values()
            .filter(|(seq, record)| {
                *seq > cursor && subscription.filter.matches(&record.entity_id)
            })
            .cloned()
            .collect();
        anomalies.sort_by(|a, b| a.0.cmp(&b.0));
        let anomalies = anomalies.into_iter().map(|(_, record)| record).collect();

        let insights = if published.insights.0 > cursor {
            published
                .insights
                .1
                .iter()
                .filter(|item| subscription.filter.matches(&item.entity_id))
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        subscription.cursor = ack;
        subscription.last_polled_at = Instant::now();

        Ok(PollUpdate {
            snapshots,
            anomalies,
            insights,
        })
    }

    /// Publish a snapshot, replacing the entity's previous one.
    pub fn publish_snapshot(&self, mut snapshot: DerivedSnapshot) {
        let mut published = self.published.write();
        snapshot.seq = self.sequencer.next();
        published
            .snapshots
            .insert(snapshot.entity_id.clone(), snapshot);
    }

    /// Publish the new state of an anomaly record.
    pub fn publish_anomaly(&self, record: AnomalyRecord) {
        let mut published = self.published.write();
        let seq = self.sequencer.next();
        published.anomalies.insert(record.id, (seq, record));

        // Retention bound: drop the oldest-sequence entries.
        if published.anomalies.len() > self.config.anomaly_retention {
            let overflow = published.anomalies.len() - self.config.anomaly_retention;
            let mut seqs: Vec<(u64, AnomalyId)> = published
                .anomalies
                .iter()
                .map(|(id, (seq, _))| (*seq, *id))
                .collect();
            seqs.sort();
            for (_, id) in seqs.into_iter().take(overflow) {
                published.anomalies.remove(&id);
            }
        }
    }

    /// Publish the tick's insight list, replacing the previous one.
    pub fn publish_insights(&self, insights: Vec<InsightItem>) {
        let mut published = self.published.write();
        let seq = self.sequencer.next();
        published.insights = (seq, insights);
    }

    /// Drop subscriptions idle past the configured timeout; invoked
    /// at tick boundaries.
    pub fn reap_idle(&self) -> usize {
        let timeout = self.config.idle_timeout;
        let mut subscriptions = self.subscriptions.write();
        let before = subscriptions.len();
        subscriptions.retain(|consumer_id, sub| {
            let keep = sub.last_polled_at.elapsed() < timeout;
            if !keep {
                tracing::info!(consumer = %consumer_id, "idle subscriber reaped");
            }
            keep
        });
        before - subscriptions.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorsight_types::{OeeComponents, SpcStatus};
    use std::time::Duration;

    fn snapshot(entity: &str, tick: u64) -> DerivedSnapshot {
        DerivedSnapshot::new(
            EntityId::new(entity),
            OeeComponents::from_factors(85.0, 90.0, 98.0),
            SpcStatus::Stable,
            10.0,
            tick,
        )
    }

    fn broker() -> SubscriptionBroker {
        SubscriptionBroker::new(BrokerConfig::default(), Sequencer::new())
    }

    #[test]
    fn second_poll_without_publications_is_empty() {
        let broker = broker();
        let handle = broker.subscribe(EntityFilter::All);
        broker.publish_snapshot(snapshot("M-101", 1));

        let first = broker.poll(handle).unwrap();
        assert_eq!(first.snapshots.len(), 1);

        let second = broker.poll(handle).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn snapshots_coalesce_to_latest_per_entity() {
        let broker = broker();
        let handle = broker.subscribe(EntityFilter::All);
        broker.publish_snapshot(snapshot("M-101", 1));
        broker.publish_snapshot(snapshot("M-101", 2));
        broker.publish_snapshot(snapshot("M-101", 3));

        let update = broker.poll(handle).unwrap();
        assert_eq!(update.snapshots.len(), 1);
        assert_eq!(update.snapshots[0].computed_at_tick, 3);
    }

    #[test]
    fn filter_restricts_delivery() {
        let broker = broker();
        let handle = broker.subscribe(EntityFilter::single(EntityId::new("M-101")));
        broker.publish_snapshot(snapshot("M-101", 1));
        broker.publish_snapshot(snapshot("M-202", 1));

        let update = broker.poll(handle).unwrap();
        assert_eq!(update.snapshots.len(), 1);
        assert_eq!(update.snapshots[0].entity_id, EntityId::new("M-101"));
    }

    #[test]
    fn slow_consumer_resumes_from_cursor() {
        let broker = broker();
        let handle = broker.subscribe(EntityFilter::All);
        broker.publish_snapshot(snapshot("M-101", 1));
        let update = broker.poll(handle).unwrap();
        assert_eq!(update.snapshots[0].computed_at_tick, 1);

        broker.publish_snapshot(snapshot("M-101", 2));
        broker.publish_snapshot(snapshot("M-202", 2));
        let update = broker.poll(handle).unwrap();
        assert_eq!(update.snapshots.len(), 2);
    }

    #[test]
    fn consumers_are_independent() {
        let broker = broker();
        let fast = broker.subscribe(EntityFilter::All);
        let slow = broker.subscribe(EntityFilter::All);

        broker.publish_snapshot(snapshot("M-101", 1));
        broker.poll(fast).unwrap();
        broker.publish_snapshot(snapshot("M-101", 2));

        // The slow consumer still sees the latest state on first poll.
        let update = broker.poll(slow).unwrap();
        assert_eq!(update.snapshots.len(), 1);
        assert_eq!(update.snapshots[0].computed_at_tick, 2);

        let update = broker.poll(fast).unwrap();
        assert_eq!(update.snapshots.len(), 1);
    }

    #[test]
    fn unknown_handle_is_an_error() {
        let broker = broker();
        let handle = broker.subscribe(EntityFilter::All);
        broker.unsubscribe(handle).unwrap();

        assert_eq!(
            broker.poll(handle),
            Err(BrokerError::UnknownSubscription(handle))
        );
        assert_eq!(
            broker.unsubscribe(handle),
            Err(BrokerError::UnknownSubscription(handle))
        );
    }

    #[test]
    fn anomaly_updates_delivered_once() {
        let broker = broker();
        let handle = broker.subscribe(EntityFilter::All);
        let record = AnomalyRecord::new(
            EntityId::new("M-101"),
            floorsight_types::AnomalyCategory::MachineAlarm,
            90.0,
            1,
        );
        broker.publish_anomaly(record.clone());

        let update = broker.poll(handle).unwrap();
        assert_eq!(update.anomalies.len(), 1);
        assert_eq!(update.anomalies[0].id, record.id);
        assert!(broker.poll(handle).unwrap().is_empty());
    }

    #[test]
    fn insights_delivered_when_fresh() {
        let broker = broker();
        let handle = broker.subscribe(EntityFilter::All);
        broker.publish_insights(vec![InsightItem {
            entity_id: EntityId::new("M-101"),
            category: floorsight_types::AnomalyCategory::SpcViolation,
            severity: 80.0,
            headline: "SPC out of spec on entity:M-101".into(),
            advice: "Review the control chart and offset tooling.".into(),
        }]);

        let update = broker.poll(handle).unwrap();
        assert_eq!(update.insights.len(), 1);
        assert!(broker.poll(handle).unwrap().is_empty());
    }

    #[test]
    fn idle_subscribers_reaped() {
        let broker = SubscriptionBroker::new(
            BrokerConfig {
                idle_timeout: Duration::ZERO,
                ..Default::default()
            },
            Sequencer::new(),
        );
        let handle = broker.subscribe(EntityFilter::All);
        assert_eq!(broker.reap_idle(), 1);
        assert_eq!(broker.subscriber_count(), 0);
        assert!(broker.poll(handle).is_err());
    }

    #[test]
    fn active_subscribers_survive_reaping() {
        let broker = broker();
        broker.subscribe(EntityFilter::All);
        assert_eq!(broker.reap_idle(), 0);
        assert_eq!(broker.subscriber_count(), 1);
    }

    #[test]
    fn anomaly_retention_bounded() {
        let broker = SubscriptionBroker::new(
            BrokerConfig {
                anomaly_retention: 4,
                ..Default::default()
            },
            Sequencer::new(),
        );
        for i in 0..10 {
            broker.publish_anomaly(AnomalyRecord::new(
                EntityId::new(format!("M-{i}")),
                floorsight_types::AnomalyCategory::MachineAlarm,
                50.0,
                i,
            ));
        }
        let handle = broker.subscribe(EntityFilter::All);
        let update = broker.poll(handle).unwrap();
        assert_eq!(update.anomalies.len(), 4);
    }
}
