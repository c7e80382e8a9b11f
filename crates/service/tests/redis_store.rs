#![cfg(feature = "redis-store")]

use std::sync::Arc;
use std::time::Duration;

use service::phone_address::PhoneAddressService;
use service::storage::{KvStore, RedisKvStore, StorePing};
use uuid::Uuid;

/// Connect to `REDIS_TEST_URL`; `None` skips the test.
async fn store() -> Option<RedisKvStore> {
    let url = match std::env::var("REDIS_TEST_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("REDIS_TEST_URL missing; skip redis tests.");
            return None;
        }
    };
    match RedisKvStore::connect(&url, Duration::from_secs(2)).await {
        Ok(s) => Some(s),
        Err(e) => {
            eprintln!("skip: cannot connect to redis: {}", e);
            None
        }
    }
}

#[tokio::test]
async fn redis_store_commands() -> anyhow::Result<()> {
    let Some(store) = store().await else { return Ok(()) };
    store.ping().await?;

    let key = format!("test:{}", Uuid::new_v4());
    assert_eq!(store.get(&key).await?, None);
    assert!(store.set_nx(&key, "v1").await?);
    assert!(!store.set_nx(&key, "v2").await?);
    assert_eq!(store.get(&key).await?.as_deref(), Some("v1"));
    assert!(store.exists(&key).await?);
    store.set(&key, "v3").await?;
    assert_eq!(store.get(&key).await?.as_deref(), Some("v3"));
    assert_eq!(store.delete(&key).await?, 1);
    assert_eq!(store.delete(&key).await?, 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn redis_binding_lifecycle_and_race() -> anyhow::Result<()> {
    let Some(store) = store().await else { return Ok(()) };
    let svc = PhoneAddressService::new(Arc::new(store));
    let phone = format!("+7 999 {}", Uuid::new_v4());

    let mut handles = Vec::new();
    for i in 0..16 {
        let svc = svc.clone();
        let phone = phone.clone();
        handles.push(tokio::spawn(async move { svc.create(&phone, &format!("addr {i}")).await }));
    }
    let mut wins = 0;
    for h in handles {
        if h.await?? {
            wins += 1;
        }
    }
    assert_eq!(wins, 1);

    assert!(svc.update(&phone, "New Address").await?);
    assert_eq!(svc.lookup(&phone).await?.unwrap().address, "New Address");
    assert!(svc.delete(&phone).await?);
    assert!(!svc.delete(&phone).await?);
    assert_eq!(svc.lookup(&phone).await?, None);
    Ok(())
}
