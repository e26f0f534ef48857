use criterion::{black_box, criterion_group, criterion_main, Criterion};
use http::Method;
use radixroute::{RouteManifest, Router, RouterConfig};

fn example_manifest() -> &'static str {
    r#"routes:
  - { method: GET,    path: /,                             handler: root_handler }
  - { method: GET,    path: /zoo/animals,                  handler: get_animals }
  - { method: POST,   path: /zoo/animals,                  handler: create_animal }
  - { method: GET,    path: /zoo/animals/:id,              handler: get_animal }
  - { method: PUT,    path: /zoo/animals/:id,              handler: update_animal }
  - { method: PATCH,  path: /zoo/animals/:id,              handler: patch_animal }
  - { method: DELETE, path: /zoo/animals/:id,              handler: delete_animal }
  - { method: GET,    path: /zoo/animals/:id/toys/:toy_id, handler: animal_toy }
  - { method: GET,    path: "/zoo/:category/animals/:id/habitats/:habitat_id/sections/:section_id", handler: habitat_section }
  - { method: POST,   path: "/inventory/:warehouse_id/feeds/:feed_id/items/:item_id/batches/:batch_id", handler: post_item_batch }
  - { method: GET,    path: "/complex/:a/:b/:c/:d/:e/:f/:g/:h/:i", handler: complex_many_params }
  - { method: GET,    path: /files/*,                      handler: files }
  - { method: HEAD,   path: /zoo/health,                   handler: health_check }
"#
}

fn build_router() -> Router<usize> {
    let manifest = RouteManifest::from_yaml_str(example_manifest()).expect("valid manifest");
    let config = RouterConfig {
        log_matches: false,
        ..RouterConfig::default()
    };
    let mut next = 0;
    Router::from_manifest(&manifest, config, |_| {
        next += 1;
        Some(next)
    })
    .expect("router builds")
}

const TEST_PATHS: [(Method, &str); 7] = [
    (Method::GET, "/zoo/animals"),
    (Method::GET, "/zoo/animals/123"),
    (Method::GET, "/zoo/animals/123/toys/456"),
    (Method::GET, "/zoo/cats/animals/123/habitats/88/sections/5"),
    (Method::POST, "/inventory/1/feeds/2/items/3/batches/4"),
    (Method::GET, "/complex/1/2/3/4/5/6/7/8/9"),
    (Method::GET, "/files/css/site/main.css"),
];

fn bench_find(c: &mut Criterion) {
    let router = build_router();
    c.bench_function("find", |b| {
        let mut params = router.new_params();
        b.iter(|| {
            for (method, path) in TEST_PATHS.iter() {
                let lookup = router.find(method, path, &mut params);
                black_box(lookup.handler());
            }
        })
    });
}

fn bench_route_throughput(c: &mut Criterion) {
    let router = build_router();
    c.bench_function("route_match", |b| {
        b.iter(|| {
            for (method, path) in TEST_PATHS.iter() {
                let res = router.route(method, path);
                black_box(&res);
            }
        })
    });
}

fn bench_misses(c: &mut Criterion) {
    let router = build_router();
    c.bench_function("route_miss", |b| {
        let mut params = router.new_params();
        b.iter(|| {
            black_box(router.find(&Method::GET, "/zoo/animals/1/unknown", &mut params).kind());
            black_box(router.find(&Method::DELETE, "/zoo/animals", &mut params).kind());
        })
    });
}

criterion_group!(benches, bench_find, bench_route_throughput, bench_misses);
criterion_main!(benches);
