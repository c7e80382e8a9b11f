use std::sync::Arc;

use models::phone_address::PhoneAddress;
use tracing::{debug, instrument};

use crate::errors::StoreError;
use crate::storage::KvStore;

/// Namespace shared by every binding key.
pub const KEY_PREFIX: &str = "phone_address:";

/// Storage key for `phone`, used verbatim: no trimming, case folding or digit
/// extraction. `"1"` and `" 1"` are different bindings.
pub fn make_key(phone: &str) -> String {
    format!("{KEY_PREFIX}{phone}")
}

/// Application service for phone-address bindings.
///
/// Holds only the injected store handle. Absence and conflicts come back as
/// `None`/`false`; only store failures are errors, and they are passed through
/// untouched.
pub struct PhoneAddressService<S: KvStore + ?Sized = dyn KvStore> {
    store: Arc<S>,
}

impl<S: KvStore + ?Sized> Clone for PhoneAddressService<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}

impl<S: KvStore + ?Sized> PhoneAddressService<S> {
    pub fn new(store: Arc<S>) -> Self { Self { store } }

    #[instrument(skip(self))]
    pub async fn lookup(&self, phone: &str) -> Result<Option<PhoneAddress>, StoreError> {
        let address = self.store.get(&make_key(phone)).await?;
        debug!(found = address.is_some(), "lookup");
        Ok(address.map(|address| PhoneAddress::new(phone, address)))
    }

    /// Set-if-absent. `false` means the phone is already bound and its address
    /// was left as it was.
    #[instrument(skip(self, address))]
    pub async fn create(&self, phone: &str, address: &str) -> Result<bool, StoreError> {
        let created = self.store.set_nx(&make_key(phone), address).await?;
        debug!(created, "create");
        Ok(created)
    }

    /// Replace the address of an existing binding; `false` if the phone is unknown.
    ///
    /// Exists-then-set is two commands. A delete that lands between them is
    /// undone by the set, which recreates the binding. That race is accepted.
    #[instrument(skip(self, address))]
    pub async fn update(&self, phone: &str, address: &str) -> Result<bool, StoreError> {
        let key = make_key(phone);
        if !self.store.exists(&key).await? {
            debug!(updated = false, "update");
            return Ok(false);
        }
        self.store.set(&key, address).await?;
        debug!(updated = true, "update");
        Ok(true)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, phone: &str) -> Result<bool, StoreError> {
        let removed = self.store.delete(&make_key(phone)).await?;
        debug!(removed, "delete");
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKvStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn service() -> (PhoneAddressService<InMemoryKvStore>, InMemoryKvStore) {
        let store = InMemoryKvStore::new();
        (PhoneAddressService::new(Arc::new(store.clone())), store)
    }

    /// Records every command issued against the wrapped store.
    #[derive(Default)]
    struct RecordingStore {
        inner: InMemoryKvStore,
        calls: Mutex<Vec<(&'static str, String)>>,
    }

    impl RecordingStore {
        fn record(&self, cmd: &'static str, key: &str) {
            self.calls.lock().unwrap().push((cmd, key.to_string()));
        }

        fn take(&self) -> Vec<(&'static str, String)> {
            std::mem::take(&mut *self.calls.lock().unwrap())
        }
    }

    #[async_trait]
    impl KvStore for RecordingStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.record("get", key);
            self.inner.get(key).await
        }
        async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.record("set", key);
            self.inner.set(key, value).await
        }
        async fn set_nx(&self, key: &str, value: &str) -> Result<bool, StoreError> {
            self.record("set_nx", key);
            self.inner.set_nx(key, value).await
        }
        async fn exists(&self, key: &str) -> Result<bool, StoreError> {
            self.record("exists", key);
            self.inner.exists(key).await
        }
        async fn delete(&self, key: &str) -> Result<u64, StoreError> {
            self.record("delete", key);
            self.inner.delete(key).await
        }
    }

    struct DownStore;

    #[async_trait]
    impl KvStore for DownStore {
        async fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn set(&self, _: &str, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn set_nx(&self, _: &str, _: &str) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn exists(&self, _: &str) -> Result<bool, StoreError> {
            Err(StoreError::Backend("WRONGTYPE".into()))
        }
        async fn delete(&self, _: &str) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    #[test]
    fn key_is_prefix_plus_verbatim_phone() {
        assert_eq!(make_key("+7 999 123-45-67"), "phone_address:+7 999 123-45-67");
        assert_eq!(make_key(" 1"), "phone_address: 1");
        assert_ne!(make_key("1"), make_key(" 1"));
    }

    #[tokio::test]
    async fn create_then_lookup() -> Result<(), anyhow::Error> {
        let (svc, store) = service();
        assert!(svc.create("111", "Addr1").await?);
        assert_eq!(svc.lookup("111").await?, Some(PhoneAddress::new("111", "Addr1")));
        assert_eq!(store.get("phone_address:111").await?.as_deref(), Some("Addr1"));
        Ok(())
    }

    #[tokio::test]
    async fn second_create_keeps_original_address() -> Result<(), anyhow::Error> {
        let (svc, _) = service();
        assert!(svc.create("111", "Addr1").await?);
        assert!(!svc.create("111", "Addr2").await?);
        assert!(!svc.create("111", "Addr1").await?);
        assert_eq!(svc.lookup("111").await?.map(|b| b.address).as_deref(), Some("Addr1"));
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_does_not_write() -> Result<(), anyhow::Error> {
        let (svc, store) = service();
        assert!(!svc.update("unknown", "addr").await?);
        assert_eq!(svc.lookup("unknown").await?, None);
        assert!(store.is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn update_existing_replaces_address() -> Result<(), anyhow::Error> {
        let (svc, _) = service();
        svc.create("333", "Old").await?;
        assert!(svc.update("333", "New Address").await?);
        assert!(svc.update("333", "New Address").await?);
        assert_eq!(svc.lookup("333").await?, Some(PhoneAddress::new("333", "New Address")));
        Ok(())
    }

    #[tokio::test]
    async fn delete_is_idempotent_in_effect() -> Result<(), anyhow::Error> {
        let (svc, _) = service();
        svc.create("444", "Addr").await?;
        assert!(svc.delete("444").await?);
        assert_eq!(svc.lookup("444").await?, None);
        assert!(!svc.delete("444").await?);
        Ok(())
    }

    #[tokio::test]
    async fn phones_differing_in_formatting_are_independent() -> Result<(), anyhow::Error> {
        let (svc, _) = service();
        svc.create("1", "first").await?;
        assert_eq!(svc.lookup(" 1").await?, None);
        svc.create(" 1", "second").await?;
        assert_eq!(svc.lookup("1").await?.unwrap().address, "first");
        assert_eq!(svc.lookup(" 1").await?.unwrap().address, "second");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_have_one_winner() -> Result<(), anyhow::Error> {
        let (svc, _) = service();
        let mut handles = Vec::new();
        for i in 0..64 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                let address = format!("address {i}");
                let won = svc.create("+1 555 0100", &address).await?;
                Ok::<_, StoreError>((won, address))
            }));
        }

        let mut winners = Vec::new();
        for h in handles {
            let (won, address) = h.await??;
            if won {
                winners.push(address);
            }
        }
        assert_eq!(winners.len(), 1);
        let stored = svc.lookup("+1 555 0100").await?.unwrap();
        assert_eq!(stored.address, winners[0]);
        Ok(())
    }

    #[tokio::test]
    async fn each_operation_issues_expected_commands() -> Result<(), anyhow::Error> {
        let store = Arc::new(RecordingStore::default());
        let svc = PhoneAddressService::new(Arc::clone(&store));
        let key = "phone_address:222".to_string();

        svc.lookup("222").await?;
        assert_eq!(store.take(), vec![("get", key.clone())]);

        svc.create("222", "a").await?;
        assert_eq!(store.take(), vec![("set_nx", key.clone())]);

        svc.update("222", "b").await?;
        assert_eq!(store.take(), vec![("exists", key.clone()), ("set", key.clone())]);

        svc.update("999", "b").await?;
        assert_eq!(store.take(), vec![("exists", "phone_address:999".to_string())]);

        svc.delete("222").await?;
        assert_eq!(store.take(), vec![("delete", key)]);
        Ok(())
    }

    #[tokio::test]
    async fn store_failures_propagate_unchanged() {
        let store: Arc<dyn KvStore> = Arc::new(DownStore);
        let svc: PhoneAddressService = PhoneAddressService::new(store);
        let unavailable = StoreError::Unavailable("connection refused".into());
        assert_eq!(svc.lookup("1").await.unwrap_err(), unavailable);
        assert_eq!(svc.create("1", "a").await.unwrap_err(), unavailable);
        assert_eq!(svc.update("1", "a").await.unwrap_err(), StoreError::Backend("WRONGTYPE".into()));
        assert_eq!(svc.delete("1").await.unwrap_err(), unavailable);
    }

    #[tokio::test]
    async fn full_lifecycle() -> Result<(), anyhow::Error> {
        let (svc, _) = service();
        let phone = "+7 999 123-45-67";

        assert!(svc.create(phone, "Moscow, Tverskaya street, 1").await?);
        assert_eq!(
            svc.lookup(phone).await?,
            Some(PhoneAddress::new(phone, "Moscow, Tverskaya street, 1"))
        );
        assert!(svc.update(phone, "New Address").await?);
        assert_eq!(svc.lookup(phone).await?.unwrap().address, "New Address");
        assert!(svc.delete(phone).await?);
        assert_eq!(svc.lookup(phone).await?, None);
        assert!(!svc.delete(phone).await?);
        Ok(())
    }
}
