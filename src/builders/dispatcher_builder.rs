//! Builders to construct a dispatcher from configuration.

use std::sync::Arc;

use crate::config::{DispatchConfig, QueueBackendConfig};
use crate::core::{
    CapacityQueue, CarDirectory, ClassQueues, DispatchError, Dispatcher, InMemoryAuditSink,
    PositionAllocator, StoreError,
};
use crate::infra::queue::{FileCapacityQueue, InMemoryCapacityQueue};
use crate::util::serde::CapacityClass;

/// Build a dispatcher from configuration, creating one queue per class with
/// the provided factory.
pub fn build_dispatcher<FQ>(
    cfg: &DispatchConfig,
    mut queue_factory: FQ,
    directory: Arc<dyn CarDirectory>,
) -> Result<Dispatcher, DispatchError>
where
    FQ: FnMut(CapacityClass, &DispatchConfig) -> Result<Arc<dyn CapacityQueue>, StoreError>,
{
    cfg.validate().map_err(DispatchError::InvalidConfig)?;

    let mut queues = Vec::new();
    for class in cfg.classes() {
        let queue = queue_factory(class, cfg)?;
        if queue.capacity_class() != class {
            return Err(DispatchError::InvalidConfig(format!(
                "factory returned a {} queue for class {class}",
                queue.capacity_class()
            )));
        }
        queues.push(queue);
    }

    let timeout = cfg.store_timeout();
    let dispatcher = Dispatcher::new(
        ClassQueues::new(queues)?,
        directory,
        cfg.directory,
        PositionAllocator::new(cfg.max_insert_attempts, timeout),
        timeout,
    );
    tracing::info!(
        classes = ?cfg.capacity_classes,
        backend = ?cfg.queue,
        "dispatcher built"
    );
    Ok(dispatcher)
}

/// Like [`build_dispatcher`], with an [`InMemoryAuditSink`] of
/// `cfg.audit_capacity` events attached. The sink is returned for inspection.
pub fn build_audited_dispatcher<FQ>(
    cfg: &DispatchConfig,
    queue_factory: FQ,
    directory: Arc<dyn CarDirectory>,
) -> Result<(Dispatcher, Arc<InMemoryAuditSink>), DispatchError>
where
    FQ: FnMut(CapacityClass, &DispatchConfig) -> Result<Arc<dyn CapacityQueue>, StoreError>,
{
    let sink = Arc::new(InMemoryAuditSink::new(cfg.audit_capacity));
    let dispatcher = build_dispatcher(cfg, queue_factory, directory)?.with_audit(sink.clone());
    Ok((dispatcher, sink))
}

/// Default queue factory honoring `cfg.queue`.
pub fn configured_queue(
    class: CapacityClass,
    cfg: &DispatchConfig,
) -> Result<Arc<dyn CapacityQueue>, StoreError> {
    match cfg.queue {
        QueueBackendConfig::InMemory => Ok(Arc::new(InMemoryCapacityQueue::new(class))),
        QueueBackendConfig::File => {
            let dir = cfg
                .data_dir
                .as_ref()
                .ok_or_else(|| StoreError::Backend("file queue backend requires data_dir".into()))?;
            Ok(Arc::new(FileCapacityQueue::open(dir, class)?))
        }
    }
}
