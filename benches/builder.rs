//! Benchmarks for tree building and evaluation.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use word_guesser::{
    compute::{FragmentPool, GuessSelector, TreeBuilder, average_guesses},
    schema::{HeuristicParams, Vocabulary},
};

const LETTERS: &[char] = &[
    'a', 'e', 'i', 'o', 'u', 'n', 'r', 's', 't', 'l', 'h', 'm', 'b', 'ä', 'ü',
];

fn synthetic_vocabulary(size: usize) -> Arc<Vocabulary> {
    let mut rng = StdRng::seed_from_u64(size as u64);
    let words = (0..size).map(|_| {
        let len = rng.gen_range(3..=8);
        (0..len)
            .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())])
            .collect::<String>()
    });
    Arc::new(Vocabulary::from_entries(words.collect::<Vec<_>>()).expect("non-empty vocabulary"))
}

fn builder_for(vocabulary: &Arc<Vocabulary>) -> TreeBuilder {
    let pool = Arc::new(FragmentPool::new(vocabulary));
    TreeBuilder::new(Arc::clone(vocabulary), GuessSelector::new(pool))
}

fn bench_fragment_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("fragment_pool");
    group.sample_size(10);

    for size in [250, 1000] {
        let vocabulary = synthetic_vocabulary(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| FragmentPool::new(black_box(&vocabulary)));
        });
    }

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");
    group.sample_size(10);

    for size in [250, 1000] {
        let vocabulary = synthetic_vocabulary(size);
        let builder = builder_for(&vocabulary);
        let params = HeuristicParams::default();
        let mut rng = StdRng::seed_from_u64(1);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| builder.build_vocabulary(black_box(&params), &mut rng));
        });
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("average_guesses");

    for size in [250, 1000] {
        let vocabulary = synthetic_vocabulary(size);
        let builder = builder_for(&vocabulary);
        let mut rng = StdRng::seed_from_u64(1);
        let tree = builder
            .build_vocabulary(&HeuristicParams::default(), &mut rng)
            .expect("tree for non-empty vocabulary");

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| average_guesses(black_box(&tree), vocabulary.entries()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fragment_pool, bench_build, bench_evaluate);
criterion_main!(benches);
