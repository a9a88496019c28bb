//! Marker detection on callee and parameter symbols.

use crate::core::host::SemanticHost;
use crate::core::resolve::{AttrRef, SymbolId};

use super::config::{MatchMode, RuleConfig};

/// The configured marker, split once into its simple and qualified forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatcher {
    simple_name: String,
    qualified_name: Option<String>,
    mode: MatchMode,
}

impl MarkerMatcher {
    pub fn new(config: &RuleConfig) -> Self {
        let path: Vec<String> = config
            .marker
            .split('.')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        let attr = AttrRef::from_path(&path, Default::default());
        Self {
            simple_name: attr.simple_name,
            qualified_name: attr.qualified_name,
            mode: config.match_mode,
        }
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn qualified_name(&self) -> Option<&str> {
        self.qualified_name.as_deref()
    }

    pub fn matches(&self, attr: &AttrRef) -> bool {
        match (self.mode, &self.qualified_name, &attr.qualified_name) {
            (MatchMode::Qualified, Some(marker), Some(written)) => marker == written,
            _ => !self.simple_name.is_empty() && self.simple_name == attr.simple_name,
        }
    }

    pub fn is_constrained(&self, host: &dyn SemanticHost, symbol: SymbolId) -> bool {
        host.attributes_of(symbol)
            .iter()
            .any(|attr| self.matches(attr))
    }
}
