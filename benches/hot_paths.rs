use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geojson::JsonObject;
use region_map::data::{Region, RegionCollection};
use region_map::map::{FeatureId, FeatureStateStore, MapRenderer, RegionPaint, Viewport};

/// 20x20 grid of jagged districts covering roughly the default view
fn grid() -> MapRenderer {
    let mut regions = Vec::new();
    for gy in 0..20 {
        for gx in 0..20 {
            let x0 = 51.0 + gx as f64 * 0.2;
            let y0 = 55.8 + gy as f64 * 0.14;
            let mut ring = Vec::new();
            for i in 0..10 {
                let t = i as f64 / 10.0;
                ring.push((x0 + 0.2 * t, y0 + 0.005 * (i % 2) as f64));
            }
            ring.push((x0 + 0.2, y0 + 0.14));
            ring.push((x0, y0 + 0.14));
            ring.push((x0, y0));
            regions.push(Region::new(FeatureId(0), format!("d{gx}-{gy}"), JsonObject::new(), vec![vec![ring]]));
        }
    }
    MapRenderer::new(RegionCollection::new(regions), RegionPaint::primary())
}

fn bench_feature_at(c: &mut Criterion) {
    let renderer = grid();
    c.bench_function("feature_at", |b| {
        b.iter(|| renderer.feature_at(black_box(53.05), black_box(57.03)))
    });
}

fn bench_render(c: &mut Criterion) {
    let renderer = grid();
    let viewport = Viewport::from_zoom_level(53.0, 57.2, 7.0, 396, 188);
    let states = FeatureStateStore::new();
    c.bench_function("render_layers", |b| {
        b.iter(|| renderer.render(black_box(198), black_box(47), &viewport, &states))
    });
}

criterion_group!(benches, bench_feature_at, bench_render);
criterion_main!(benches);
