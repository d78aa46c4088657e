// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use duplex_astar::{
    astar::AStarSolver,
    context::{HeuristicModel, SearchConfig, prepare},
    distance::DistanceTables,
    monitor::no_op::NoOperationMonitor,
};
use duplex_model::{
    index::NodeIndex,
    network::{Network, NetworkBuilder},
};
use duplex_search::objective::Weights;
use rand::{SeedableRng, rngs::StdRng};
use std::hint::black_box;

const GRID_SIZES: [usize; 4] = [3, 4, 5, 6];

/// A `side x side` grid with uniform capacities and seeded random loads.
fn build_grid(side: usize, seed: u64) -> Network {
    let id = |r: usize, c: usize| format!("n{}_{}", r, c);
    let mut builder = NetworkBuilder::new();
    for r in 0..side {
        for c in 0..side {
            builder.add_node(id(r, c));
        }
    }
    for r in 0..side {
        for c in 0..side {
            if c + 1 < side {
                builder.add_link(format!("h{}_{}", r, c), id(r, c), id(r, c + 1), 10.0, 1.0);
            }
            if r + 1 < side {
                builder.add_link(format!("v{}_{}", r, c), id(r, c), id(r + 1, c), 10.0, 1.0);
            }
        }
    }

    let mut network = builder
        .build()
        .unwrap_or_else(|e| panic!("Failed to build {}x{} grid: {}", side, side, e));
    let mut rng = StdRng::seed_from_u64(seed);
    network
        .randomize_loads(&mut rng, 0.0, 0.8)
        .expect("valid load range");
    network
}

fn bench_distance_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_tables");

    for side in GRID_SIZES {
        let network = build_grid(side, 42);
        group.throughput(Throughput::Elements((side * side) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", side, side)),
            &network,
            |b, network| b.iter(|| DistanceTables::compute(black_box(network))),
        );
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for side in GRID_SIZES {
        let network = build_grid(side, 42);
        let tables = DistanceTables::compute(&network);
        let start = NodeIndex::new(0);
        let end = NodeIndex::new(side * side - 1);
        let label = format!("{}x{}", side, side);

        for (name, heuristic) in [
            ("admissible", HeuristicModel::Admissible),
            ("scaled", HeuristicModel::Scaled),
        ] {
            let config = SearchConfig::default().with_heuristic(heuristic);
            let context = prepare(&network, start, end, &tables, Weights::default(), config)
                .expect("valid request");
            let mut solver = AStarSolver::preallocated(1 << 12);

            group.bench_with_input(BenchmarkId::new(name, &label), &context, |b, context| {
                b.iter(|| {
                    let outcome = solver
                        .run(black_box(context), NoOperationMonitor::new())
                        .expect("Benchmark configuration error: grid corners are always connected");
                    black_box(outcome.solution().goal)
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_distance_tables, bench_search);
criterion_main!(benches);
