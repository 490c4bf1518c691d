//! The runtime facade
//!
//! Owns every pipeline component and exposes the transport-agnostic
//! surface the presentation layer consumes. All construction happens
//! here; components receive their collaborators explicitly and there
//! are no process-wide singletons beyond the injected sequence
//! counter.

use std::sync::Arc;

use floorsight_anomaly::AnomalyGenerator;
use floorsight_broker::SubscriptionBroker;
use floorsight_ingest::{EventIngestor, IngestResult, SchemaRegistry};
use floorsight_metrics::{DerivedMetricEngine, ParetoEntry};
use floorsight_store::MetricStore;
use floorsight_types::{
    EntityFilter, EntityId, EventRecord, PollUpdate, Sequencer, SubscriptionHandle,
};
use parking_lot::Mutex;

use crate::config::FloorsightConfig;
use crate::error::{RuntimeError, RuntimeResult};
use crate::pipeline::{TickPipeline, TickSummary};
use crate::scheduler::TickScheduler;

/// The assembled observability engine.
pub struct FloorsightRuntime {
    config: FloorsightConfig,
    store: Arc<MetricStore>,
    ingestor: Arc<EventIngestor>,
    broker: Arc<SubscriptionBroker>,
    pipeline: Arc<Mutex<TickPipeline>>,
    scheduler: Mutex<Option<Arc<TickScheduler>>>,
}

impl FloorsightRuntime {
    pub fn new(config: FloorsightConfig) -> Self {
        let sequencer = Sequencer::new();
        let store = Arc::new(MetricStore::new(config.store.clone()));
        let ingestor = Arc::new(EventIngestor::with_action_bound(
            store.clone(),
            SchemaRegistry::with_defaults(),
            sequencer.clone(),
            config.action_queue_bound,
        ));
        let broker = Arc::new(SubscriptionBroker::new(config.broker.clone(), sequencer));
        let engine = DerivedMetricEngine::new(config.metrics.clone());
        let generator = AnomalyGenerator::new(config.anomaly.clone());
        let pipeline = Arc::new(Mutex::new(TickPipeline::new(
            store.clone(),
            ingestor.clone(),
            engine,
            generator,
            broker.clone(),
        )));

        Self {
            config,
            store,
            ingestor,
            broker,
            pipeline,
            scheduler: Mutex::new(None),
        }
    }

    /// Validate and absorb one telemetry event. Never blocks on a
    /// tick; rejection is local and non-fatal.
    pub fn ingest(&self, event: EventRecord) -> IngestResult {
        self.ingestor.ingest(event)
    }

    /// Register a dashboard consumer.
    pub fn subscribe(&self, filter: EntityFilter) -> SubscriptionHandle {
        self.broker.subscribe(filter)
    }

    /// Updates since the subscriber's last poll; non-blocking.
    pub fn poll(&self, handle: SubscriptionHandle) -> RuntimeResult<PollUpdate> {
        Ok(self.broker.poll(handle)?)
    }

    /// Drop a subscription.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> RuntimeResult<()> {
        Ok(self.broker.unsubscribe(handle)?)
    }

    /// Run exactly one tick synchronously. The deterministic
    /// alternative to the interval scheduler, used by tests and
    /// replay tooling.
    pub fn tick_once(&self) -> TickSummary {
        self.pipeline.lock().run_tick()
    }

    /// Start the interval scheduler.
    pub async fn start(&self) -> RuntimeResult<Arc<TickScheduler>> {
        let mut slot = self.scheduler.lock();
        if slot.is_some() {
            return Err(RuntimeError::AlreadyRunning);
        }
        let (scheduler, trigger_rx) =
            TickScheduler::new(self.pipeline.clone(), self.config.tick_interval);
        // The join handle is owned by the spawned task itself; stop()
        // ends the loop.
        let starter = scheduler.clone();
        tokio::spawn(async move {
            let handle = starter.start(trigger_rx).await;
            let _ = handle.await;
        });
        *slot = Some(scheduler.clone());
        Ok(scheduler)
    }

    /// Stop the interval scheduler if it is running.
    pub async fn shutdown(&self) {
        let scheduler = self.scheduler.lock().take();
        if let Some(scheduler) = scheduler {
            scheduler.stop().await;
        }
    }

    /// Downtime Pareto rows for an entity, from operator logs.
    pub fn downtime_pareto(&self, entity_id: &EntityId) -> Vec<ParetoEntry> {
        self.pipeline.lock().downtime_pareto(entity_id)
    }

    /// Defect Pareto rows for an entity, from operator logs.
    pub fn defect_pareto(&self, entity_id: &EntityId) -> Vec<ParetoEntry> {
        self.pipeline.lock().defect_pareto(entity_id)
    }

    pub fn store(&self) -> &Arc<MetricStore> {
        &self.store
    }

    pub fn ingestor(&self) -> &Arc<EventIngestor> {
        &self.ingestor
    }

    pub fn config(&self) -> &FloorsightConfig {
        &self.config
    }
}
