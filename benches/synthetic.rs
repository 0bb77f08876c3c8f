use criterion::{black_box, criterion_group, criterion_main, Criterion};

use clipsweeper::{
    generators::{checkerboard, circles, slanted_checkerboard, slanties},
    offset::{ClipperOffset, EndType, JoinType},
    BinaryOp, Clipper, FillRule, PathType, ReusableData,
};

fn xor(c: &mut Criterion) {
    let (even, odd) = checkerboard(10);
    c.bench_function("xor checkerboard", |b| {
        b.iter(|| {
            let mut clipper = Clipper::new();
            clipper.add_subject(&even);
            clipper.add_clip(&odd);
            black_box(clipper.execute(BinaryOp::Xor, FillRule::EvenOdd))
        });
    });

    let (even, odd) = slanted_checkerboard(10);
    c.bench_function("xor slanted checkerboard", |b| {
        b.iter(|| {
            let mut clipper = Clipper::new();
            clipper.add_subject(&even);
            clipper.add_clip(&odd);
            black_box(clipper.execute(BinaryOp::Xor, FillRule::EvenOdd))
        });
    });
}

fn intersections(c: &mut Criterion) {
    let (even, odd) = slanties(30);
    c.bench_function("union slanties", |b| {
        b.iter(|| {
            let mut clipper = Clipper::new();
            clipper.add_subject(&even);
            clipper.add_clip(&odd);
            black_box(clipper.execute(BinaryOp::Union, FillRule::NonZero))
        });
    });
}

fn reusable(c: &mut Criterion) {
    let (even, odd) = checkerboard(10);
    let mut data = ReusableData::new();
    data.add_paths(&even, PathType::Subject, false);
    data.add_paths(&odd, PathType::Clip, false);

    // The same clipper can run repeatedly on the same input.
    let mut clipper = Clipper::new();
    clipper.add_reusable_data(&data);
    c.bench_function("tree intersection checkerboard", |b| {
        b.iter(|| black_box(clipper.execute_tree(BinaryOp::Intersection, FillRule::NonZero)));
    });
}

fn offset(c: &mut Criterion) {
    let input = circles(20, 100, 64);
    for join in [JoinType::Miter, JoinType::Round] {
        c.bench_function(&format!("offset circles {join:?}"), |b| {
            b.iter(|| {
                let mut offset = ClipperOffset::new();
                offset.add_paths(&input, join, EndType::Polygon);
                black_box(offset.execute(10.0))
            });
        });
    }
}

criterion_group!(benches, xor, intersections, reusable, offset);
criterion_main!(benches);
