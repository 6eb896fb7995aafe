use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geo_types::Coord;
use snapoly::{assemble_rings, Constraint, PolygonBuilder};

fn square(out: &mut Vec<Constraint>, x0: f64, y0: f64, size: f64, id: &str) {
    let pts = [(x0, y0), (x0 + size, y0), (x0 + size, y0 + size), (x0, y0 + size)];
    for i in 0..4 {
        out.push(Constraint::new(Coord::from(pts[i]), Coord::from(pts[(i + 1) % 4]), id));
    }
}

// n x n grid of buildings, each with a courtyard hole.
fn generate_blocks(n: usize) -> Vec<Constraint> {
    let mut constraints = Vec::with_capacity(n * n * 8);
    for i in 0..n {
        for j in 0..n {
            let id = format!("{}-{}", i, j);
            let (x, y) = (i as f64 * 12.0, j as f64 * 12.0);
            square(&mut constraints, x, y, 10.0, &id);
            square(&mut constraints, x + 3.0, y + 3.0, 4.0, &id);
        }
    }
    constraints
}

fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct");
    group.sample_size(10); // Reduce sample size for speed

    for size in [5, 10, 20, 100].iter() {
        group.bench_with_input(BenchmarkId::new("blocks", size), size, |b, &size| {
            let constraints = generate_blocks(size);
            b.iter(|| {
                let rings = assemble_rings(constraints.clone()).unwrap();
                PolygonBuilder::new().build(rings).unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reconstruct);
criterion_main!(benches);
