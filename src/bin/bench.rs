//! Microbenchmark driver timing rank, select, and sparse-array operations,
//! emitting one CSV row per run on standard output.

use std::collections::BTreeMap;
use std::hint::black_box;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use bitrank::{BitSequence, RankIndex, SelectIndex, SparseArray};

/// Results are averaged over this number of freshly built structures.
const NUM_TEST_ITER: u32 = 50;

#[derive(Debug, Parser)]
#[command(name = "bitrank-bench")]
#[command(about = "Microbenchmarks for bitrank data structures", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Random seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Time random rank queries over a random bit sequence
    Rank {
        /// Number of bits in the sequence
        size: usize,
        /// Number of rank queries to time
        num_calls: usize,
    },
    /// Time random select queries over a random bit sequence
    Select {
        /// Number of bits in the sequence
        size: usize,
        /// Number of select queries to time
        num_calls: usize,
    },
    /// Time append, get-at-index, and get-at-rank over a random sparse array
    #[command(name = "sparsearray")]
    SparseArray {
        /// Number of logical positions
        size: usize,
        /// Fraction of positions to occupy, in (0, 1]
        sparsity: f64,
        /// Number of queries to time per operation
        num_calls: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => ChaChaRng::seed_from_u64(seed),
        None => ChaChaRng::from_entropy(),
    };
    match cli.command {
        Command::Rank { size, num_calls } => bench_rank(size, num_calls, &mut rng),
        Command::Select { size, num_calls } => bench_select(size, num_calls, &mut rng),
        Command::SparseArray {
            size,
            sparsity,
            num_calls,
        } => {
            if !(sparsity > 0.0 && sparsity <= 1.0) {
                bail!("sparsity must be in (0, 1].");
            }
            bench_sparse_array(size, sparsity, num_calls, &mut rng)
        }
    }
}

fn gen_random_seq(len: usize, rng: &mut ChaChaRng) -> BitSequence {
    BitSequence::from_bits((0..len).map(|_| rng.gen::<bool>()))
}

fn bench_rank(size: usize, num_calls: usize, rng: &mut ChaChaRng) -> Result<()> {
    if size == 0 {
        bail!("size must be positive.");
    }

    let mut overhead = 0;
    let mut avg_duration = 0.0;

    for iter in 0..NUM_TEST_ITER {
        let seq = gen_random_seq(size, rng);
        let rank = RankIndex::new(&seq);
        if iter == 0 {
            overhead = rank.overhead();
        }

        let queries: Vec<usize> = (0..num_calls).map(|_| rng.gen_range(0..size)).collect();

        let begin = Instant::now();
        let mut sum = 0;
        for &q in &queries {
            sum += rank.rank1(q)?;
        }
        avg_duration += begin.elapsed().as_secs_f64();
        black_box(sum);
    }

    avg_duration /= f64::from(NUM_TEST_ITER);
    println!("rank,{size},{num_calls},{NUM_TEST_ITER},{overhead},{avg_duration}");
    Ok(())
}

fn bench_select(size: usize, num_calls: usize, rng: &mut ChaChaRng) -> Result<()> {
    if size == 0 {
        bail!("size must be positive.");
    }

    let mut overhead = 0;
    let mut avg_duration = 0.0;

    for iter in 0..NUM_TEST_ITER {
        let seq = gen_random_seq(size, rng);
        let rank = RankIndex::new(&seq);
        let select = SelectIndex::new(&rank);
        if iter == 0 {
            overhead = select.overhead();
        }
        if rank.total_ones() == 0 {
            bail!("the random sequence has no set bits to select.");
        }

        let queries: Vec<usize> = (0..num_calls)
            .map(|_| rng.gen_range(1..=rank.total_ones()))
            .collect();

        let begin = Instant::now();
        let mut sum = 0;
        for &q in &queries {
            sum += select.select1(q)?;
        }
        avg_duration += begin.elapsed().as_secs_f64();
        black_box(sum);
    }

    avg_duration /= f64::from(NUM_TEST_ITER);
    println!("select,{size},{num_calls},{NUM_TEST_ITER},{overhead},{avg_duration}");
    Ok(())
}

fn bench_sparse_array(size: usize, sparsity: f64, num_calls: usize, rng: &mut ChaChaRng) -> Result<()> {
    let num_to_insert = (size as f64 * sparsity) as usize;
    if num_to_insert == 0 {
        bail!("size and sparsity must yield at least one entry.");
    }

    // What the occupied values would cost in a plain dense array, in bits.
    let dense_overhead = 8 * std::mem::size_of::<u64>() * num_to_insert;
    let mut sparse_overhead = 0;
    let mut avg_append = 0.0;
    let mut avg_get_at_index = 0.0;
    let mut avg_get_at_rank = 0.0;

    for iter in 0..NUM_TEST_ITER {
        // Duplicate positions collapse, so the entry count may fall slightly
        // short of the target.
        let mut entries = BTreeMap::new();
        for _ in 0..num_to_insert {
            entries.insert(rng.gen_range(0..size), rng.gen::<u64>());
        }

        let mut array = SparseArray::new();
        array.create(size);

        let begin = Instant::now();
        for (&pos, &value) in &entries {
            array.append(value, pos)?;
        }
        avg_append += begin.elapsed().as_secs_f64();

        if iter == 0 {
            sparse_overhead = array.overhead();
        }

        let indices: Vec<usize> = (0..num_calls).map(|_| rng.gen_range(0..size)).collect();
        let begin = Instant::now();
        for &pos in &indices {
            black_box(array.get_at_index(pos)?);
        }
        avg_get_at_index += begin.elapsed().as_secs_f64();

        let ranks: Vec<usize> = (0..num_calls)
            .map(|_| rng.gen_range(0..entries.len()))
            .collect();
        let begin = Instant::now();
        for &k in &ranks {
            black_box(array.get_at_rank(k));
        }
        avg_get_at_rank += begin.elapsed().as_secs_f64();
    }

    avg_append /= f64::from(NUM_TEST_ITER);
    avg_get_at_index /= f64::from(NUM_TEST_ITER);
    avg_get_at_rank /= f64::from(NUM_TEST_ITER);

    println!(
        "sparsearray,{size},{sparsity},{num_calls},{dense_overhead},{sparse_overhead},\
         {avg_append},{avg_get_at_index},{avg_get_at_rank}"
    );
    Ok(())
}
