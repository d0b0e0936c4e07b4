//! DOM Events
//!
//! Event objects, listener storage and propagation paths. Handlers are
//! generic so the embedding layer decides what a callback looks like.

use std::collections::HashMap;

use crate::{DomTree, NodeId};

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    /// Create an event as `document.createEvent` + `initEvent(type, bubbles, cancelable)` would
    pub fn new(event_type: &str, target: NodeId, bubbles: bool, cancelable: bool) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: None,
            bubbles,
            cancelable,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation after the current node
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation and skip remaining listeners on the current node
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }
}

#[derive(Debug, Clone)]
struct Listener<H> {
    event_type: String,
    handler: H,
    once: bool,
}

/// Per-node listener lists
#[derive(Debug)]
pub struct ListenerRegistry<H> {
    listeners: HashMap<NodeId, Vec<Listener<H>>>,
}

impl<H: Clone> ListenerRegistry<H> {
    pub fn new() -> Self {
        Self { listeners: HashMap::new() }
    }

    /// Register a listener; `once` listeners are dropped before their first call
    pub fn add(&mut self, target: NodeId, event_type: &str, handler: H, once: bool) {
        self.listeners.entry(target).or_default().push(Listener {
            event_type: event_type.to_string(),
            handler,
            once,
        });
    }

    /// Remove the first listener for `event_type` whose handler satisfies `is_same`
    pub fn remove_where(&mut self, target: NodeId, event_type: &str, is_same: impl Fn(&H) -> bool) -> bool {
        let Some(list) = self.listeners.get_mut(&target) else {
            return false;
        };
        let Some(pos) = list
            .iter()
            .position(|l| l.event_type == event_type && is_same(&l.handler))
        else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.listeners.remove(&target);
        }
        true
    }

    /// Snapshot the handlers to run for an event on `target`, dropping `once`
    /// listeners from the registry as they are taken.
    pub fn take_for_dispatch(&mut self, target: NodeId, event_type: &str) -> Vec<H> {
        let Some(list) = self.listeners.get_mut(&target) else {
            return Vec::new();
        };
        let handlers = list
            .iter()
            .filter(|l| l.event_type == event_type)
            .map(|l| l.handler.clone())
            .collect();
        list.retain(|l| !(l.once && l.event_type == event_type));
        handlers
    }

    /// Number of listeners registered on `target`
    pub fn count(&self, target: NodeId) -> usize {
        self.listeners.get(&target).map_or(0, Vec::len)
    }
}

impl<H: Clone> Default for ListenerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Propagation path of an event: target, its ancestors, then the window when
/// the target is connected to the document.
pub fn event_path(tree: &DomTree, target: NodeId) -> Vec<NodeId> {
    if target == NodeId::WINDOW {
        return vec![NodeId::WINDOW];
    }
    let mut path = vec![target];
    path.extend(tree.ancestors(target));
    if path.last() == Some(&NodeId::ROOT) {
        path.push(NodeId::WINDOW);
    }
    path
}
