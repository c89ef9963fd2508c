// Criterion benchmarks for Flock Algo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flock_algo::core::{extract_family_units, haversine_distance, Clusterer};
use flock_algo::models::{Family, GroupingOverrides, Person, Requirements};
use flock_algo::services::InMemoryRepository;

fn create_person(id: usize, lat: f64, lon: f64) -> Person {
    Person {
        person_id: id.to_string(),
        name: format!("Person {}", id),
        latitude: lat,
        longitude: lon,
        elder: id % 17 == 0,
        servant: id % 11 == 0,
        pioneer: id % 7 == 0,
        leader: id % 13 == 0,
        helper: id % 5 == 0,
        publisher: true,
        family_head: false,
        family_id: None,
        group_id: None,
    }
}

fn populated_repository(people: usize) -> InMemoryRepository {
    let mut repo = InMemoryRepository::with_requirements(Requirements {
        min_leaders: 0,
        min_helpers: 0,
        min_group_size: 1,
        ..Requirements::default()
    });

    // Spread people along a line of neighborhoods ~1km apart
    for i in 0..people {
        let lat = 40.7 + (i / 50) as f64 * 0.01;
        let lon = -74.0 + (i % 50) as f64 * 0.0002;
        repo.add_person(create_person(i, lat, lon)).unwrap();
    }
    repo
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(40.7128),
                black_box(-74.0060),
                black_box(40.72),
                black_box(-74.01),
            )
        })
    });
}

fn bench_family_extraction(c: &mut Criterion) {
    c.bench_function("extract_family_units_100_families", |b| {
        let families: Vec<Family> = (0..100)
            .map(|f| Family {
                family_id: format!("fam{}", f),
                member_person_ids: (0..4).map(|m| (f * 4 + m).to_string()).collect(),
            })
            .collect();

        b.iter(|| {
            let mut individuals: Vec<Person> = (0..400)
                .map(|i| create_person(i, 40.7 + (i as f64) * 0.0001, -74.0))
                .collect();
            extract_family_units(black_box(&mut individuals), black_box(&families))
        })
    });
}

fn bench_clustering_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering_run");
    for population in [100usize, 500, 1000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(population),
            &population,
            |b, &population| {
                b.iter_batched(
                    || populated_repository(population),
                    |mut repo| {
                        let mut clusterer = Clusterer::with_seed(42);
                        clusterer
                            .run(black_box(&mut repo), &GroupingOverrides::default())
                            .unwrap()
                    },
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_family_extraction,
    bench_clustering_run
);
criterion_main!(benches);
