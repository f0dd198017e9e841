use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use merge_board::game::replay::{replay, ReplayLog};
use merge_board::{Board, BoardConfig, Direction, RankTable};

fn random_log(seed: u64, moves: usize) -> ReplayLog {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut log = ReplayLog::new(BoardConfig::with_seed(seed));
    for _ in 0..moves {
        log.record(Direction::ALL[rng.gen_range(0..4)]);
    }
    log
}

fn bench_replay(c: &mut Criterion) {
    let log = random_log(2048, 1000);
    c.bench_function("replay_1000_moves", |b| {
        b.iter(|| replay(black_box(&log)).map(|r| r.hash))
    });
}

fn bench_game_over_scan(c: &mut Criterion) {
    // Full 8x8 checkerboard: worst case, every tile checked in every direction
    let mut board = Board::new(8, 8, RankTable::standard(), 1).unwrap();
    for y in 0..8 {
        for x in 0..8 {
            board
                .place_tile(merge_board::CellPos::new(x, y), (x + y) % 2)
                .unwrap();
        }
    }
    c.bench_function("game_over_scan_8x8", |b| b.iter(|| black_box(&board).is_game_over()));
}

criterion_group!(benches, bench_replay, bench_game_over_scan);
criterion_main!(benches);
