use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;

fn dashboard_fixture(panel_count: usize) -> serde_json::Value {
    let panels: Vec<_> = (0..panel_count)
        .map(|i| {
            json!({
                "id": i,
                "type": if i % 5 == 0 { "row" } else { "graph" },
                "title": format!("panel-{i}"),
            })
        })
        .collect();
    json!({"panels": panels})
}

fn bench_selector_replace(c: &mut Criterion) {
    let doc = dashboard_fixture(500);
    let patch: patchgraf_core::Patch = serde_json::from_value(json!([
        {"op": "replace", "path": "/panels/[?type=='row']/title", "value": "renamed"}
    ]))
    .unwrap();

    c.bench_function("selector_replace_500_panels", |b| {
        b.iter(|| patchgraf_core::apply(&doc, &patch).unwrap());
    });
}

fn bench_wildcard_resolve(c: &mut Criterion) {
    let doc = dashboard_fixture(500);

    c.bench_function("wildcard_resolve_500_panels", |b| {
        b.iter(|| patchgraf_core::resolve(&doc, "/panels/*/title").unwrap());
    });
}

criterion_group!(benches, bench_selector_replace, bench_wildcard_resolve);
criterion_main!(benches);
