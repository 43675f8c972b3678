use crate::catalog::SourceCatalog;
use crate::types::{PowerState, SwitchState, ZoneId, ZoneState};
use std::sync::{Arc, Mutex, PoisonError};

/// Handle to one output zone of a matrix
///
/// Handles are cheap to clone and share the zone's cached state. Only polls of
/// this zone write to it.
#[derive(Clone)]
pub struct Zone {
    id: ZoneId,
    name: String,
    unique_id: String,
    catalog: Arc<SourceCatalog>,
    state: Arc<Mutex<ZoneState>>,
}

impl Zone {
    pub(crate) fn new(host: &str, id: ZoneId, name: String, catalog: Arc<SourceCatalog>) -> Self {
        Self {
            id,
            name,
            unique_id: format!("{}-{}", host, id),
            catalog,
            state: Arc::new(Mutex::new(ZoneState::default())),
        }
    }

    /// Get the zone ID
    pub fn id(&self) -> ZoneId {
        self.id
    }

    /// Get the zone name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable identifier of the form `{host}-{zone}`
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Get a snapshot of the cached state
    pub fn state(&self) -> ZoneState {
        *self.lock()
    }

    /// Get the last observed power state
    pub fn power(&self) -> PowerState {
        self.lock().power
    }

    /// Name of the current source
    ///
    /// `None` when the zone has never reported a source or the reported index
    /// is not in the source catalog.
    pub fn source(&self) -> Option<String> {
        let index = self.lock().source_index?;
        self.catalog.name_of(index).map(str::to_string)
    }

    /// Same as [`Zone::source`], for media-player style front ends
    pub fn media_title(&self) -> Option<String> {
        self.source()
    }

    /// Get the selectable source names, ordered by source id
    pub fn source_list(&self) -> Vec<String> {
        self.catalog.names()
    }

    pub(crate) fn update(&self, result: SwitchState) {
        self.lock().apply(result);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ZoneState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceId;

    fn zone() -> Zone {
        let catalog = SourceCatalog::new([
            (SourceId::new(1).unwrap(), "Cable".to_string()),
            (SourceId::new(2).unwrap(), "Chromecast".to_string()),
        ])
        .unwrap();
        Zone::new("10.0.0.9", ZoneId::new(3).unwrap(), "Patio".to_string(), Arc::new(catalog))
    }

    #[test]
    fn starts_unavailable_without_source() {
        let zone = zone();
        assert_eq!(zone.unique_id(), "10.0.0.9-3");
        assert_eq!(zone.power(), PowerState::Unavailable);
        assert_eq!(zone.source(), None);
    }

    #[test]
    fn resolves_reported_source() {
        let zone = zone();
        zone.update(SwitchState::On(2));
        assert_eq!(zone.power(), PowerState::On);
        assert_eq!(zone.source().as_deref(), Some("Chromecast"));
        assert_eq!(zone.media_title().as_deref(), Some("Chromecast"));

        zone.update(SwitchState::On(7));
        assert_eq!(zone.power(), PowerState::On);
        assert_eq!(zone.source(), None);
        assert_eq!(zone.state().source_index, Some(7));
    }

    #[test]
    fn clones_share_state() {
        let zone = zone();
        let other = zone.clone();
        zone.update(SwitchState::On(1));
        assert_eq!(other.source().as_deref(), Some("Cable"));
    }
}
