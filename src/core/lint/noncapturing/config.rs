use serde::Serialize;

pub const DEFAULT_MARKER: &str = "NonCapturing";

/// How an attribute is compared against the configured marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Unqualified names only. An unrelated attribute that shares the
    /// marker's simple name in another namespace also matches.
    #[default]
    SimpleName,
    /// Qualified names when both sides have one, simple names otherwise.
    Qualified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleConfig {
    /// Marker attribute name, optionally dotted (`Perf.NonCapturing`).
    pub marker: String,
    pub match_mode: MatchMode,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            match_mode: MatchMode::default(),
        }
    }
}

impl RuleConfig {
    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            ..Self::default()
        }
    }

    pub fn match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }
}
