use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pa_core::{OCEAN, ProvinceId};
use pa_edge::build_edge_set;
use pa_grid::ProvinceGrid;

/// A map-like grid: a sea margin around a landmass tiled into 32x32-pixel
/// provinces, with a ragged diagonal coast so edges bend and join.
fn synthetic_grid(width: usize, height: usize) -> ProvinceGrid {
    let mut cells = Vec::with_capacity(width * height);

    for y in 0..height {
        for x in 0..width {
            let margin = 24 + (x + y) % 7;
            let land = x >= margin && x + margin < width && y >= margin && y + margin < height;
            let id: ProvinceId = if land {
                (1 + x / 32 + (y / 32) * ((width + 31) / 32)) as ProvinceId
            } else {
                OCEAN
            };
            cells.push(id);
        }
    }

    ProvinceGrid::from_vec(width, height, cells).expect("valid bench grid")
}

fn bench_build_edge_set(c: &mut Criterion) {
    let grid = synthetic_grid(1024, 1024);

    c.bench_function("pa_edge_build_edge_set_1024", |b| {
        b.iter(|| {
            let set = build_edge_set(black_box(&grid));
            black_box((set.len(), set.stats()));
        });
    });
}

criterion_group!(benches, bench_build_edge_set);
criterion_main!(benches);
