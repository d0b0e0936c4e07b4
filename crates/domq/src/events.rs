//! Event listeners, dispatch and delegation

use std::fmt;
use std::rc::Rc;

use domq_dom::{Event, event_path};

use crate::{Collection, Dom};

/// A listener callback, compared by identity
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Dom, &mut Event)>);

impl Handler {
    pub fn new(callback: impl Fn(&Dom, &mut Event) + 'static) -> Self {
        Self(Rc::new(callback))
    }

    pub fn call(&self, dom: &Dom, event: &mut Event) {
        (self.0)(dom, event)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0))
    }
}

impl Dom {
    /// Dispatch `event` along its propagation path and return it afterwards.
    ///
    /// Listeners of each node are snapshotted before any of them runs, so a
    /// handler may add or remove listeners and mutate the tree.
    pub fn dispatch(&self, mut event: Event) -> Event {
        let path = event_path(&self.document().tree, event.target);
        tracing::trace!(event = %event.event_type, target = %event.target, path = path.len(), "dispatch");

        for (depth, &node) in path.iter().enumerate() {
            if depth > 0 && !event.bubbles {
                break;
            }
            event.current_target = Some(node);
            let handlers = self.listeners().take_for_dispatch(node, &event.event_type);
            for handler in handlers {
                handler.call(self, &mut event);
                if event.is_immediate_propagation_stopped() {
                    break;
                }
            }
            if event.is_propagation_stopped() {
                break;
            }
        }

        event.current_target = None;
        event
    }

    /// Wrap `handler` so it only runs for events whose target, or its
    /// closest ancestor below `<body>`, matches `selector`
    pub fn delegate(selector: &str, handler: Handler) -> Handler {
        let selector = selector.to_string();
        Handler::new(move |dom, event| {
            if !dom.select(event.target).closest(&selector).is_empty() {
                handler.call(dom, event);
            }
        })
    }
}

impl Collection {
    /// Listen for `event` on every member
    pub fn on(&self, event: &str, handler: &Handler) -> &Self {
        let mut listeners = self.dom().listeners();
        for node in self.iter() {
            listeners.add(node, event, handler.clone(), false);
        }
        self
    }

    /// Listen for the next `event` only
    pub fn once(&self, event: &str, handler: &Handler) -> &Self {
        let mut listeners = self.dom().listeners();
        for node in self.iter() {
            listeners.add(node, event, handler.clone(), true);
        }
        self
    }

    pub fn off(&self, event: &str, handler: &Handler) -> &Self {
        let mut listeners = self.dom().listeners();
        for node in self.iter() {
            listeners.remove_where(node, event, |h| h == handler);
        }
        self
    }

    /// Dispatch a bubbling, cancelable `event` on every member
    pub fn trigger(&self, event: &str) -> &Self {
        for node in self.iter() {
            self.dom().dispatch(Event::new(event, node, true, true));
        }
        self
    }
}
