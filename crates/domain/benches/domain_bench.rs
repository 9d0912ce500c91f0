use chrono::{Duration, TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use doc_store::{
    ArrayPush, CartEntry, CartStatus, DocumentStore, InMemoryDocumentStore, OrderEntry,
    ProductSnapshot, UserProfile,
};
use domain::{CartOp, CartService, locator, rules};

fn bench_rule_engine(c: &mut Criterion) {
    let entry = CartEntry::new(
        ProductSnapshot::new("SKU-BENCH", "Benchmark Widget", 1000),
        CartStatus::Pending,
    );

    c.bench_function("domain/apply_cart_increase", |b| {
        b.iter(|| rules::apply_cart(std::hint::black_box(&entry), CartOp::Increase));
    });
}

fn bench_order_locator(c: &mut Criterion) {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let orders: Vec<OrderEntry> = (0..100)
        .map(|i| {
            OrderEntry::placed(
                ProductSnapshot::new(format!("SKU-{}", i % 10), "Widget", 1000),
                1,
                base + Duration::minutes(i),
            )
        })
        .collect();
    let target_time = base + Duration::minutes(99);

    c.bench_function("domain/find_order_entry_100", |b| {
        b.iter(|| {
            locator::find_order_entry(
                std::hint::black_box(&orders),
                &"SKU-9".into(),
                target_time,
            )
        });
    });
}

fn bench_cart_batch(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let store = InMemoryDocumentStore::new();
    let service = CartService::new(store.clone());
    let key = common::UserKey::new("bench@example.com");

    rt.block_on(async {
        store
            .upsert_profile(UserProfile {
                email: key.clone(),
                name: None,
                role: None,
            })
            .await
            .unwrap();
        let entries = (0..10)
            .map(|i| {
                ArrayPush::Cart(CartEntry::new(
                    ProductSnapshot::new(format!("SKU-{i}"), "Widget", 1000),
                    CartStatus::Pending,
                ))
            })
            .collect();
        store.push_elements(&key, entries).await.unwrap();
    });

    c.bench_function("domain/cart_batch_wishlist_false_10", |b| {
        b.iter(|| {
            rt.block_on(async {
                let products = (0..10).map(|i| format!("SKU-{i}").into()).collect();
                service
                    .modify(&key, products, "wishlist_false")
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_rule_engine, bench_order_locator, bench_cart_batch);
criterion_main!(benches);
