use std::sync::Arc;

use crate::storage::LeaderboardStore;
use crate::sync::SyncOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LeaderboardStore>,
    pub orchestrator: Arc<SyncOrchestrator>,
    pub cors_origin: Arc<str>,
}

impl AppState {
    pub fn new(
        store: Arc<LeaderboardStore>,
        orchestrator: Arc<SyncOrchestrator>,
        cors_origin: &str,
    ) -> Self {
        Self {
            store,
            orchestrator,
            cors_origin: cors_origin.into(),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(api: crate::fetch::MockWarApi) -> Self {
        let clan = crate::models::ClanIdentity::new("#HOME", Some("Tranquility".to_string()));
        Self::new(
            Arc::new(LeaderboardStore::new()),
            Arc::new(SyncOrchestrator::new(Arc::new(api), clan, 2)),
            "*",
        )
    }
}
