//! Caller-supplied activity filters

use crate::models::activity::{ActivityEvent, ActivitySource, Provider};

/// Conjunctive filters applied per read. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    pub provider: Option<Provider>,
    pub source: Option<ActivitySource>,
    /// Case-insensitive substring over resource name, action and details
    pub query: Option<String>,
}

impl ActivityFilter {
    /// Build from raw query values; "all", empty or unknown values disable
    /// the corresponding filter.
    pub fn from_params(provider: Option<&str>, source: Option<&str>, query: Option<&str>) -> Self {
        Self {
            provider: provider.and_then(Provider::parse),
            source: source.and_then(ActivitySource::parse),
            query: query
                .map(|q| q.trim().to_lowercase())
                .filter(|q| !q.is_empty()),
        }
    }

    pub fn matches(&self, event: &ActivityEvent) -> bool {
        if self.provider.is_some_and(|p| p != event.provider) {
            return false;
        }
        if self.source.is_some_and(|s| s != event.source) {
            return false;
        }
        match &self.query {
            None => true,
            Some(query) => {
                event.resource_name.to_lowercase().contains(query)
                    || event.action.to_lowercase().contains(query)
                    || event
                        .details
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(query))
            }
        }
    }

    /// Matching events, in order. The input is left untouched.
    pub fn apply<'a>(&self, events: &'a [ActivityEvent]) -> Vec<&'a ActivityEvent> {
        events.iter().filter(|event| self.matches(event)).collect()
    }
}
