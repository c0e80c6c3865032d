//! Benchmarks for resonant networks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use resonant::{
    link_clusters, Art, ArtConfig, Artmap, ArtmapConfig, Label, Pattern, Rule, Targets, TopoArt,
    TopoConfig,
};

// =============================================================================
// Data
// =============================================================================

fn blobs(samples: usize, dims: usize, seed: u64) -> (Vec<Pattern>, Vec<Label>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let centres: Vec<Vec<f64>> = (0..5)
        .map(|_| (0..dims).map(|_| rng.gen_range(0.1..0.9)).collect())
        .collect();
    let mut data = Vec::with_capacity(samples);
    let mut labels = Vec::with_capacity(samples);
    for i in 0..samples {
        let class = i % centres.len();
        let row: Vec<f64> = centres[class]
            .iter()
            .map(|c| (c + rng.gen_range(-0.05..0.05)).clamp(0.0, 1.0))
            .collect();
        data.push(Pattern::from_f64(&row));
        labels.push(class as Label);
    }
    (data, labels)
}

// =============================================================================
// Benchmarks
// =============================================================================

fn benchmark_art_train(c: &mut Criterion) {
    let (data, _) = blobs(1000, 8, 1);
    let mut group = c.benchmark_group("art_train");
    for rule in [Rule::fuzzy(), Rule::hypersphere()] {
        group.bench_function(BenchmarkId::from_parameter(rule.name()), |b| {
            b.iter(|| {
                let mut art =
                    Art::new(ArtConfig::new(8).with_vigilance(0.8), rule.clone()).unwrap();
                art.train(black_box(&data)).unwrap()
            })
        });
    }
    group.finish();
}

fn benchmark_art_predict(c: &mut Criterion) {
    let (data, _) = blobs(1000, 8, 2);
    let mut art = Art::new(ArtConfig::new(8).with_vigilance(0.8), Rule::fuzzy()).unwrap();
    art.train(&data).unwrap();

    c.bench_function("art_predict_1000", |b| {
        b.iter(|| art.predict(0, black_box(&data)).unwrap())
    });
}

fn benchmark_artmap_train(c: &mut Criterion) {
    let (data, labels) = blobs(1000, 8, 3);
    c.bench_function("artmap_simplified_train", |b| {
        b.iter(|| {
            let mut net = Artmap::new(ArtmapConfig::simplified(8), Rule::fuzzy()).unwrap();
            net.train(black_box(&data), Targets::Labels(&labels)).unwrap()
        })
    });
}

fn benchmark_topo_train(c: &mut Criterion) {
    let (data, _) = blobs(1000, 4, 4);
    c.bench_function("topoart_train", |b| {
        b.iter(|| {
            let mut topo = TopoArt::new(TopoConfig::new(4), Rule::fuzzy()).unwrap();
            topo.train(black_box(&data)).unwrap()
        })
    });
}

fn benchmark_link_clusters(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let nodes = 2000;
    let edges: Vec<(usize, usize)> = (0..3000)
        .map(|_| (rng.gen_range(0..nodes), rng.gen_range(0..nodes)))
        .collect();

    c.bench_function("link_clusters_2000", |b| {
        b.iter(|| link_clusters(black_box(&edges), nodes))
    });
}

criterion_group!(
    benches,
    benchmark_art_train,
    benchmark_art_predict,
    benchmark_artmap_train,
    benchmark_topo_train,
    benchmark_link_clusters,
);
criterion_main!(benches);
