//! Context Configuration

use domq_dom::{HostFeatures, ReadyState};
use serde::{Deserialize, Serialize};

/// Options for building a `Dom` context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomConfig {
    /// Document URL
    pub url: String,

    /// Ready state the document starts in
    pub ready_state: ReadyState,

    /// Capabilities the host advertises
    pub features: HostFeatures,
}

impl DomConfig {
    /// A host without native `matches` or `classList` support
    pub fn bare() -> Self {
        Self { features: HostFeatures::bare(), ..Self::default() }
    }
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            ready_state: ReadyState::Loading,
            features: HostFeatures::default(),
        }
    }
}
