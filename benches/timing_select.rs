use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use criterion::{
    criterion_group, criterion_main, measurement::WallTime, BenchmarkGroup, Criterion, SamplingMode,
};

use bitrank::{BitSequence, RankIndex, SelectIndex};

const SAMPLE_SIZE: usize = 30;
const WARM_UP_TIME: Duration = Duration::from_secs(5);
const MEASURE_TIME: Duration = Duration::from_secs(10);

const SEED_BITS: u64 = 334;
const SEED_QUERIES: u64 = 114514;
const NUM_QUERIES: usize = 1000;

fn gen_random_seq(len: usize, p: f64, seed: u64) -> BitSequence {
    let mut rng = ChaChaRng::seed_from_u64(seed);
    BitSequence::from_bits((0..len).map(|_| rng.gen_bool(p)))
}

fn gen_random_ints(len: usize, min: usize, max: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaChaRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(min..=max)).collect()
}

fn run_queries(select: &SelectIndex, queries: &[usize]) {
    let mut sum = 0;
    for &q in queries {
        sum += select.select1(q).unwrap();
    }
    if sum == 0 {
        panic!("Should not come.");
    }
}

fn perform_select(group: &mut BenchmarkGroup<WallTime>, seq: &BitSequence, queries: &[usize]) {
    group.bench_function("bitrank/SelectIndex", |b| {
        let rank = RankIndex::new(seq);
        let select = SelectIndex::new(&rank);
        b.iter(|| run_queries(&select, queries));
    });
}

macro_rules! criterion_common {
    ($name:ident, $dens:expr, $size:expr) => {
        fn $name(c: &mut Criterion) {
            let mut group = c.benchmark_group(format!("timing_select/p{}/n{}", $dens, $size));
            group.sample_size(SAMPLE_SIZE);
            group.warm_up_time(WARM_UP_TIME);
            group.measurement_time(MEASURE_TIME);
            group.sampling_mode(SamplingMode::Flat);

            let seq = gen_random_seq($size, $dens as f64 / 100.0, SEED_BITS);
            let rank = RankIndex::new(&seq);
            let queries = gen_random_ints(NUM_QUERIES, 1, rank.total_ones(), SEED_QUERIES);

            perform_select(&mut group, &seq, &queries);
        }
    };
}

criterion_common!(criterion_select_p50_n1000, 50, 1000);
criterion_common!(criterion_select_p10_n1000, 10, 1000);
criterion_common!(criterion_select_p50_n1000000, 50, 1000000);
criterion_common!(criterion_select_p10_n1000000, 10, 1000000);

criterion_group!(
    benches,
    criterion_select_p50_n1000,
    criterion_select_p10_n1000,
    criterion_select_p50_n1000000,
    criterion_select_p10_n1000000,
);

criterion_main!(benches);
