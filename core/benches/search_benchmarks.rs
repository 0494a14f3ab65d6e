use chrono::Utc;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use estate::{model::Listing, GeoPoint, ListingStore, MemoryListingStore, SearchParams, SearchResolver};
use std::sync::Arc;
use tokio::runtime::Runtime; // To run async code within Criterion
use uuid::Uuid;

const CITIES: [&str; 5] = ["Pune", "Mumbai", "Bengaluru", "Chennai", "Hyderabad"];

// Deterministic spread of listings in a ~50 km square around central Bengaluru.
fn synthetic_listing(i: usize) -> Listing {
  let now = Utc::now();
  let lat = 12.75 + (i % 97) as f64 * 0.005;
  let lng = 77.40 + (i % 89) as f64 * 0.005;
  Listing {
    id: Uuid::new_v4(),
    title: format!("Listing {i}"),
    description: "Benchmark fixture".to_string(),
    price: 5_000.0 + (i % 50) as f64 * 1_000.0,
    city: CITIES[i % CITIES.len()].to_string(),
    bhk: Some((i % 4) as u32 + 1),
    area_name: Some(format!("Sector {}", i % 30)),
    location: GeoPoint::new(lng, lat).ok(),
    image: String::new(),
    images: Vec::new(),
    available: true,
    bookings: Vec::new(),
    owner_id: Uuid::new_v4(),
    created_at: now,
    updated_at: now,
  }
}

fn seeded(rt: &Runtime, count: usize) -> Arc<MemoryListingStore> {
  let store = Arc::new(MemoryListingStore::new());
  rt.block_on(async {
    for i in 0..count {
      store.insert(synthetic_listing(i)).await.unwrap();
    }
  });
  store
}

fn params(pairs: &[(&str, &str)]) -> SearchParams {
  let map = pairs
    .iter()
    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
    .collect::<serde_json::Map<_, _>>();
  serde_json::from_value(serde_json::Value::Object(map)).unwrap()
}

fn bench_literal_filter(c: &mut Criterion) {
  let mut group = c.benchmark_group("LiteralFilter");
  let rt = Runtime::new().unwrap();
  let query = params(&[("city", "mum"), ("minPrice", "10000"), ("maxPrice", "30000"), ("bhk", "2")]);

  for count in [1_000usize, 10_000, 50_000] {
    let resolver = SearchResolver::new(seeded(&rt, count));
    group.throughput(Throughput::Elements(count as u64));
    group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
      b.to_async(&rt).iter(|| async { resolver.resolve(&query).await.unwrap() });
    });
  }
  group.finish();
}

fn bench_nearby_fallback(c: &mut Criterion) {
  let mut group = c.benchmark_group("NearbyFallback");
  let rt = Runtime::new().unwrap();

  for radius in ["1", "5", "25"] {
    let query = params(&[
      ("city", "Atlantis"),
      ("suggestNearby", "true"),
      ("lat", "12.97"),
      ("lng", "77.59"),
      ("radiusKm", radius),
    ]);
    let resolver = SearchResolver::new(seeded(&rt, 20_000));
    group.bench_with_input(BenchmarkId::new("radius_km", radius), &radius, |b, _| {
      b.to_async(&rt).iter(|| async { resolver.resolve(&query).await.unwrap() });
    });
  }
  group.finish();
}

criterion_group!(benches, bench_literal_filter, bench_nearby_fallback);
criterion_main!(benches);
