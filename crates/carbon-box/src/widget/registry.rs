//! Outside-click dismissal.
//!
//! Hosts own a single document-level click handler and forward every click
//! to an [`OutsideClickRegistry`]. Each registered select box that does not
//! contain the click point is closed. Instances are held weakly, so dropping
//! a select box unregisters it implicitly.

use std::sync::{Arc, OnceLock, Weak};

use carbon_box_core::logging::targets;
use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::source::SourceControl;

use super::carbon_box::CarbonBox;
use super::geometry::Point;

new_key_type! {
    /// Handle to a registered instance.
    pub struct InstanceId;
}

/// Something a document click can dismiss.
pub trait Dismiss: Send {
    /// Whether the point lies within the instance.
    fn contains_point(&self, point: Point) -> bool;

    /// Close the instance. Returns `true` if it was open.
    fn dismiss(&mut self) -> bool;
}

impl<S: SourceControl + Send> Dismiss for CarbonBox<S> {
    fn contains_point(&self, point: Point) -> bool {
        CarbonBox::contains_point(self, point)
    }

    fn dismiss(&mut self) -> bool {
        self.close()
    }
}

type Instance = Weak<Mutex<dyn Dismiss>>;

/// Global registry shared by every select box in the process.
static GLOBAL_REGISTRY: OnceLock<OutsideClickRegistry> = OnceLock::new();

/// Registry of live instances listening for document clicks.
#[derive(Default)]
pub struct OutsideClickRegistry {
    instances: Mutex<SlotMap<InstanceId, Instance>>,
}

impl OutsideClickRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the process-wide registry, initializing it if necessary.
    pub fn global() -> &'static Self {
        GLOBAL_REGISTRY.get_or_init(Self::new)
    }

    /// Register an instance. The registry holds it weakly.
    pub fn register<T: Dismiss + 'static>(&self, instance: &Arc<Mutex<T>>) -> InstanceId {
        let weak: Instance = Arc::downgrade(instance) as Weak<Mutex<dyn Dismiss>>;
        let id = self.instances.lock().insert(weak);
        tracing::trace!(target: targets::REGISTRY, ?id, "instance registered");
        id
    }

    /// Remove an instance. Returns `true` if it was registered.
    pub fn unregister(&self, id: InstanceId) -> bool {
        self.instances.lock().remove(id).is_some()
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        let mut instances = self.instances.lock();
        instances.retain(|_, instance| instance.strong_count() > 0);
        instances.len()
    }

    /// Check if no live instance is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close every instance that does not contain `point`.
    ///
    /// Returns how many instances were closed. Instances locked by the
    /// caller (for example the one whose own input produced this click) are
    /// skipped.
    pub fn dispatch_click(&self, point: Point) -> usize {
        // Upgrade under the registry lock, dismiss outside it.
        let live: Vec<Arc<Mutex<dyn Dismiss>>> = {
            let mut instances = self.instances.lock();
            instances.retain(|_, instance| instance.strong_count() > 0);
            instances.values().filter_map(Weak::upgrade).collect()
        };

        let mut closed = 0;
        for instance in &live {
            let Some(mut instance) = instance.try_lock() else {
                tracing::trace!(target: targets::REGISTRY, "skipping busy instance");
                continue;
            };
            if !instance.contains_point(point) && instance.dismiss() {
                closed += 1;
            }
        }

        tracing::debug!(
            target: targets::REGISTRY,
            x = point.x,
            y = point.y,
            instances = live.len(),
            closed,
            "document click dispatched"
        );
        closed
    }
}
