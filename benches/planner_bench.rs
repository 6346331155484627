use criterion::{black_box, criterion_group, criterion_main, Criterion};

use raid_planner::board::{Board, StructureSpec};
use raid_planner::placement::PlacementSearch;
use raid_planner::plan_markers;

/// Rows of cannons and bombs packed with one-cell gaps, so every structure
/// has several neighbors.
fn dense_base() -> Vec<StructureSpec> {
    let mut specs = Vec::new();
    for row in (2..40).step_by(4) {
        for col in (2..40).step_by(4) {
            specs.push(StructureSpec::new("Cannon", row, col));
            specs.push(StructureSpec::new("Bomb", row + 3, col + 3));
        }
    }
    specs
}

fn bench_populate(c: &mut Criterion) {
    let specs = dense_base();
    c.bench_function("populate_dense_base", |b| {
        b.iter(|| Board::populate(black_box(&specs)))
    });
}

fn bench_chains(c: &mut Criterion) {
    let board = Board::populate(&dense_base()).unwrap();
    c.bench_function("group_chains_dense_base", |b| b.iter(|| black_box(&board).chains()));
}

fn bench_place_markers(c: &mut Criterion) {
    let board = Board::populate(&dense_base()).unwrap();
    let search = PlacementSearch::default();
    c.bench_function("place_6_markers_dense_base", |b| {
        b.iter(|| {
            let mut board = board.clone();
            board.place_markers(black_box(&search), 6)
        })
    });
}

fn bench_plan(c: &mut Criterion) {
    let specs = dense_base();
    c.bench_function("plan_dense_base", |b| b.iter(|| plan_markers(black_box(&specs))));
}

criterion_group!(
    benches,
    bench_populate,
    bench_chains,
    bench_place_markers,
    bench_plan
);
criterion_main!(benches);
