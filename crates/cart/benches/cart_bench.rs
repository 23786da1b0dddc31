use cart::{Attributes, Money, NullDispatcher, ProductId, SessionKey, ShoppingCart, fingerprint};
use criterion::{Criterion, criterion_group, criterion_main};
use session_store::InMemorySessionStore;

fn variant(i: u32) -> Attributes {
    Attributes::new()
        .with("color", if i % 2 == 0 { "red" } else { "blue" })
        .with("size", i)
}

fn bench_fingerprint(c: &mut Criterion) {
    let id = ProductId::new("SKU-BENCH");
    let attrs = Attributes::new()
        .with("color", "red")
        .with("size", "XL")
        .with("engraving", "Happy birthday")
        .with("gift_wrap", true);

    c.bench_function("cart/fingerprint", |b| {
        b.iter(|| fingerprint(&id, &attrs));
    });
}

fn bench_add_new_rows(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("cart/add_20_rows", |b| {
        b.iter(|| {
            rt.block_on(async {
                let cart = ShoppingCart::new(
                    InMemorySessionStore::new(),
                    SessionKey::generate(),
                    NullDispatcher,
                );
                for i in 0..20 {
                    cart.add("SKU-BENCH", "Widget", 1, Money::from_cents(999), variant(i))
                        .await
                        .unwrap();
                }
            });
        });
    });
}

fn bench_merge_duplicate(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let cart = ShoppingCart::new(
        InMemorySessionStore::new(),
        SessionKey::generate(),
        NullDispatcher,
    );
    rt.block_on(async {
        cart.add("SKU-BENCH", "Widget", 1, Money::from_cents(999), variant(0))
            .await
            .unwrap()
    });

    c.bench_function("cart/merge_duplicate", |b| {
        b.iter(|| {
            rt.block_on(async {
                cart.add("SKU-BENCH", "Widget", 1, Money::from_cents(999), variant(0))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_total_price(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let cart = ShoppingCart::new(
        InMemorySessionStore::new(),
        SessionKey::generate(),
        NullDispatcher,
    );
    rt.block_on(async {
        for i in 0..50 {
            cart.add("SKU-BENCH", "Widget", 2, Money::from_cents(999), variant(i))
                .await
                .unwrap();
        }
    });

    c.bench_function("cart/total_price_50_rows", |b| {
        b.iter(|| rt.block_on(async { cart.total_price().await.unwrap() }));
    });
}

criterion_group!(
    benches,
    bench_fingerprint,
    bench_add_new_rows,
    bench_merge_duplicate,
    bench_total_price
);
criterion_main!(benches);
