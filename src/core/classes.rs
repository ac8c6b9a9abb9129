//! The fixed set of capacity-class queues a dispatcher serves.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::{CapacityQueue, DispatchError};
use crate::util::serde::CapacityClass;

/// One [`CapacityQueue`] handle per supported class, ordered by seat count.
#[derive(Clone)]
pub struct ClassQueues {
    queues: BTreeMap<CapacityClass, Arc<dyn CapacityQueue>>,
}

impl ClassQueues {
    /// Index queues by the class each one serves.
    ///
    /// An empty set, a zero-seat class, or two queues for one class is an
    /// [`DispatchError::InvalidConfig`].
    pub fn new(
        queues: impl IntoIterator<Item = Arc<dyn CapacityQueue>>,
    ) -> Result<Self, DispatchError> {
        let mut indexed = BTreeMap::new();
        for queue in queues {
            let class = queue.capacity_class();
            if class.seats() == 0 {
                return Err(DispatchError::InvalidConfig(
                    "capacity classes must seat at least one passenger".into(),
                ));
            }
            if indexed.insert(class, queue).is_some() {
                return Err(DispatchError::InvalidConfig(format!(
                    "more than one queue for class {class}"
                )));
            }
        }
        if indexed.is_empty() {
            return Err(DispatchError::InvalidConfig(
                "at least one capacity class is required".into(),
            ));
        }
        Ok(Self { queues: indexed })
    }

    /// Supported classes in ascending order.
    pub fn classes(&self) -> impl Iterator<Item = CapacityClass> + '_ {
        self.queues.keys().copied()
    }

    /// Largest supported class.
    pub fn max_class(&self) -> Option<CapacityClass> {
        self.queues.keys().next_back().copied()
    }

    /// Queue serving `class`.
    pub fn get(&self, class: CapacityClass) -> Result<&Arc<dyn CapacityQueue>, DispatchError> {
        self.queues
            .get(&class)
            .ok_or(DispatchError::InvalidCapacity(class.seats()))
    }

    /// Smallest supported class that seats `passengers`.
    pub fn optimal_class(&self, passengers: u32) -> Result<CapacityClass, DispatchError> {
        if passengers == 0 {
            return Err(DispatchError::InvalidCapacity(passengers));
        }
        self.queues
            .keys()
            .copied()
            .find(|class| class.fits(passengers))
            .ok_or(DispatchError::InvalidCapacity(passengers))
    }

    /// Move-up sequence: `optimal` and every larger class, ascending.
    pub fn priority(
        &self,
        optimal: CapacityClass,
    ) -> impl Iterator<Item = (CapacityClass, &Arc<dyn CapacityQueue>)> + '_ {
        self.queues.range(optimal..).map(|(class, queue)| (*class, queue))
    }

    /// All `(class, queue)` pairs, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (CapacityClass, &Arc<dyn CapacityQueue>)> + '_ {
        self.queues.iter().map(|(class, queue)| (*class, queue))
    }
}
