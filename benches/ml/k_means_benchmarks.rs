use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kmeans_stepper::ml::classic::k_means::{iterate, initialize_centroids, InitMethod};
use kmeans_stepper::{KMeansConfig, KMeansEngine, Point};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn generate_points(n: usize) -> Vec<Point> {
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    (0..n)
        .map(|_| Point::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect()
}

fn bench_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("k_means_iteration");
    for size in [1_000, 10_000, 100_000] {
        let data = generate_points(size);
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let centroids = initialize_centroids(&data, 8, &InitMethod::Random, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| iterate(black_box(data), black_box(&centroids)))
        });
    }
    group.finish();
}

fn bench_initialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("k_means_init");
    let data = generate_points(10_000);
    for method in [
        InitMethod::Random,
        InitMethod::FarthestFirst,
        InitMethod::KMeansPlusPlus,
    ] {
        group.bench_function(method.name(), |b| {
            let mut rng = ChaCha20Rng::seed_from_u64(7);
            b.iter(|| initialize_centroids(black_box(&data), 8, &method, &mut rng))
        });
    }
    group.finish();
}

fn bench_run_to_convergence(c: &mut Criterion) {
    let data = generate_points(5_000);
    c.bench_function("k_means_run_to_convergence_5000", |b| {
        b.iter(|| {
            let mut engine = KMeansEngine::new(KMeansConfig::new(5).with_seed(1));
            engine.set_data(data.clone()).unwrap();
            engine.run_to_convergence("kmeans++").unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_iteration,
    bench_initialization,
    bench_run_to_convergence
);
criterion_main!(benches);
