// Provider selection
//
// Resolution is total: a recognized request picks that adapter, anything
// else (absent, blank, unknown) picks the configured default.

use super::SectionProvider;
use crate::models::ProviderId;
use std::sync::Arc;

pub struct ProviderSelector {
    hosted: Arc<dyn SectionProvider>,
    local: Arc<dyn SectionProvider>,
    default: ProviderId,
}

impl ProviderSelector {
    pub fn new(
        hosted: Arc<dyn SectionProvider>,
        local: Arc<dyn SectionProvider>,
        default: ProviderId,
    ) -> Self {
        Self {
            hosted,
            local,
            default,
        }
    }

    pub fn default_provider(&self) -> ProviderId {
        self.default
    }

    /// Map a requested name to a provider id
    pub fn resolve_id(&self, requested: Option<&str>) -> ProviderId {
        match requested {
            None => self.default,
            Some(name) => ProviderId::parse(name).unwrap_or_else(|| {
                log::debug!(
                    "[selector] Unrecognized provider '{}', using default '{}'",
                    name,
                    self.default
                );
                self.default
            }),
        }
    }

    pub fn get(&self, id: ProviderId) -> Arc<dyn SectionProvider> {
        match id {
            ProviderId::Hosted => Arc::clone(&self.hosted),
            ProviderId::Local => Arc::clone(&self.local),
        }
    }

    /// Pick the adapter for a request
    pub fn resolve(&self, requested: Option<&str>) -> Arc<dyn SectionProvider> {
        self.get(self.resolve_id(requested))
    }
}
