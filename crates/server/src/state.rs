use std::sync::Arc;

use service::phone_address::PhoneAddressService;
use service::storage::{KvStore, StorePing};

/// Shared handler state. Both handles point at the same store instance,
/// created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub phone_addresses: PhoneAddressService,
    pub store_health: Arc<dyn StorePing>,
    pub project_name: String,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, project_name: impl Into<String>) -> Self
    where
        S: KvStore + StorePing + 'static,
    {
        let kv: Arc<dyn KvStore> = store.clone();
        let ping: Arc<dyn StorePing> = store;
        Self {
            phone_addresses: PhoneAddressService::new(kv),
            store_health: ping,
            project_name: project_name.into(),
        }
    }
}
