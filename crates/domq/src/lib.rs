//! domq
//!
//! Chainable element collections over an arena DOM.
//!
//! # Features
//! - Collections built from selectors, markup, nodes or ready callbacks
//! - Fast paths for id, class and tag selectors
//! - Selector matching with a scratch-element fallback for bare hosts
//! - Structural mutation that clones content for all but the last target
//!
//! # Example
//! ```rust,ignore
//! use domq::{Dom, DomConfig};
//!
//! let dom = Dom::parse("<ul><li>one</li></ul>", DomConfig::default())?;
//! dom.select("ul").append("<li>two</li>");
//! dom.select("li").add_class("item");
//! assert_eq!(dom.select(".item").len(), 2);
//! ```

mod access;
mod collection;
mod config;
mod context;
mod events;
mod input;
mod mutation;
mod property;
pub mod resolve;
pub mod strategy;

pub use access::{Offset, Value};
pub use collection::Collection;
pub use config::DomConfig;
pub use context::{Dom, ScratchGuard};
pub use events::Handler;
pub use input::{Criterion, Input, ReadyCallback, is_markup};
pub use mutation::{Placement, Position, SpliceReport, placements};
pub use strategy::{ClassStrategy, MatchStrategy};

pub use domq_dom::{Event, NodeId, PropValue, ReadyState};

// Re-export sub-crates for advanced usage
pub use domq_css as css;
pub use domq_dom as dom;
pub use domq_html as html;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
