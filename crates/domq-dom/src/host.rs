//! Host capabilities and document lifecycle state

use serde::{Deserialize, Serialize};

/// Native "matches selector" entry points a host may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchesApi {
    WebkitMatchesSelector,
    MozMatchesSelector,
    MsMatchesSelector,
    OMatchesSelector,
    MatchesSelector,
    Matches,
}

impl MatchesApi {
    /// Probe order: vendor prefixes first, the standard name last
    pub const PRIORITY: [MatchesApi; 6] = [
        Self::WebkitMatchesSelector,
        Self::MozMatchesSelector,
        Self::MsMatchesSelector,
        Self::OMatchesSelector,
        Self::MatchesSelector,
        Self::Matches,
    ];

    /// The IDL method name
    pub fn name(self) -> &'static str {
        match self {
            Self::WebkitMatchesSelector => "webkitMatchesSelector",
            Self::MozMatchesSelector => "mozMatchesSelector",
            Self::MsMatchesSelector => "msMatchesSelector",
            Self::OMatchesSelector => "oMatchesSelector",
            Self::MatchesSelector => "matchesSelector",
            Self::Matches => "matches",
        }
    }
}

/// Capabilities advertised by the host document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostFeatures {
    /// Native matches entry points, in no particular order
    pub matches: Vec<MatchesApi>,
    /// Whether elements expose `classList`
    pub class_list: bool,
}

impl HostFeatures {
    /// A host with no optional capabilities at all
    pub fn bare() -> Self {
        Self { matches: Vec::new(), class_list: false }
    }

    /// First supported matches entry point in probe order
    pub fn preferred_matches(&self) -> Option<MatchesApi> {
        MatchesApi::PRIORITY.into_iter().find(|api| self.matches.contains(api))
    }
}

impl Default for HostFeatures {
    fn default() -> Self {
        Self { matches: vec![MatchesApi::Matches], class_list: true }
    }
}

/// `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    #[default]
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Interactive => "interactive",
            Self::Complete => "complete",
        }
    }
}
