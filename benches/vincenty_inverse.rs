use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use qibla::geo_point::{GeoPoint, KAABA};
use qibla::geodesic::{vincenty_inverse, Ellipsoid};

fn random_point(rng: &mut StdRng) -> GeoPoint {
    GeoPoint::from_decimal(rng.random_range(-89.0..89.0), rng.random_range(-180.0..180.0))
        .unwrap()
}

/// Random pairs over the whole globe (a few near-antipodal failures included).
fn bench_random_pairs(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let samples = 10_000usize;

    c.bench_function("vincenty_inverse/random_pairs", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| (random_point(&mut rng), random_point(&mut rng)))
                    .collect::<Vec<_>>()
            },
            |pairs| {
                for (p1, p2) in pairs {
                    let res = vincenty_inverse(black_box(&p1), black_box(&p2), &Ellipsoid::WGS84);
                    black_box(res.ok());
                }
            },
            BatchSize::LargeInput,
        )
    });
}

/// Typical qibla query: observer to the Kaaba.
fn bench_to_kaaba(c: &mut Criterion) {
    let jakarta = GeoPoint::from_decimal(-6.166666666666667, 106.81666666666666).unwrap();

    c.bench_function("vincenty_inverse/jakarta_kaaba", |b| {
        b.iter(|| {
            let res = vincenty_inverse(black_box(&jakarta), black_box(&KAABA), &Ellipsoid::WGS84);
            black_box(res.ok());
        })
    });
}

/// Slowly converging line, ~180 iterations.
fn bench_slow_convergence(c: &mut Criterion) {
    let p1 = GeoPoint::from_decimal(0.0, 0.0).unwrap();
    let p2 = GeoPoint::from_decimal(0.5, 179.5).unwrap();

    c.bench_function("vincenty_inverse/near_antipodal_converging", |b| {
        b.iter(|| {
            let res = vincenty_inverse(black_box(&p1), black_box(&p2), &Ellipsoid::WGS84);
            black_box(res.ok());
        })
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_random_pairs, bench_to_kaaba, bench_slow_convergence
);
criterion_main!(benches);
