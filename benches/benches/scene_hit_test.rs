// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_index::{Backend, FlatVec, QuadTree};
use canopy_scene::{Entity, EntityKey, HitTester, SceneStore};
use canopy_view2d::AffineTransform;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kurbo::Point;

fn scene<B: Backend<EntityKey>>(backend: B, n: usize) -> SceneStore<B> {
    let golden = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    let mut store = SceneStore::with_backend(backend);
    for i in 0..n {
        let r = (i as f64 / n as f64).sqrt() * 450.0;
        let theta = i as f64 * golden;
        store
            .add_entity(Entity::new(
                format!("n{i}"),
                (r * theta.cos(), r * theta.sin()),
                12.0,
            ))
            .expect("generated ids are unique");
    }
    store
}

/// One drag frame: move the dragged entity, then hit-test under the pointer.
fn bench_drag_frames(c: &mut Criterion) {
    fn bench<B: Backend<EntityKey>>(b: &mut criterion::Bencher, store: &mut SceneStore<B>) {
        let tester = HitTester::new();
        let view = AffineTransform::translate((400.0, 400.0));
        let key = store.key("n0").expect("scene is not empty");
        let mut step = 0_u32;
        b.iter(|| {
            step = (step + 1) % 900;
            let world = Point::new(-450.0 + f64::from(step), 3.0);
            store.move_by_key(key, world);
            tester.hit_test(view, store, view.apply(world))
        });
    }

    let mut group = c.benchmark_group("drag_frame");
    for n in [256usize, 1_024, 4_096] {
        group.throughput(Throughput::Elements(1));
        let mut flat = scene(FlatVec::new(), n);
        let mut tree = scene(QuadTree::new(), n);
        group.bench_function(BenchmarkId::new("FlatVec", n), |b| bench(b, &mut flat));
        group.bench_function(BenchmarkId::new("QuadTree", n), |b| bench(b, &mut tree));
    }
    group.finish();
}

criterion_group!(benches, bench_drag_frames);
criterion_main!(benches);
