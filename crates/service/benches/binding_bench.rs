use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::phone_address::PhoneAddressService;
use service::storage::InMemoryKvStore;

fn bench_bindings(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let svc = PhoneAddressService::new(Arc::new(InMemoryKvStore::new()));

    rt.block_on(svc.create("+7 999 000-00-00", "Moscow, Tverskaya street, 1")).unwrap();

    c.bench_function("binding_lookup_hit", |b| {
        b.iter(|| rt.block_on(svc.lookup("+7 999 000-00-00")).unwrap());
    });

    c.bench_function("binding_create_conflict", |b| {
        b.iter(|| rt.block_on(svc.create("+7 999 000-00-00", "elsewhere")).unwrap());
    });

    let mut n = 0u64;
    c.bench_function("binding_create_delete", |b| {
        b.iter(|| {
            n += 1;
            let phone = format!("+1 {n:010}");
            rt.block_on(async {
                svc.create(&phone, "addr").await.unwrap();
                svc.delete(&phone).await.unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_bindings);
criterion_main!(benches);
