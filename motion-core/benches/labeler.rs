use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use motion_core::image::ImageView;
use motion_core::labeler::Labeler;

/// A binary mask with isolated `255` pixels spaced `spacing` apart in both
/// axes — worst case for the labeler's allocation rate (every lit pixel
/// starts a new component).
fn scattered_blobs(width: u32, height: u32, spacing: u32) -> Vec<u8> {
    let mut data = vec![0u8; (width * height) as usize];
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            data[(y * width + x) as usize] = 255;
            x += spacing;
        }
        y += spacing;
    }
    data
}

fn bench_labeler(c: &mut Criterion) {
    let mut group = c.benchmark_group("labeler");

    for &(w, h, spacing) in &[(64u32, 64u32, 4u32), (128, 128, 4), (256, 256, 8)] {
        let data = scattered_blobs(w, h, spacing);
        group.bench_with_input(BenchmarkId::new("scattered_blobs", format!("{w}x{h}")), &data, |b, data| {
            let view = ImageView::new(data, w, h);
            let mut labeler = Labeler::<5>::new(w, h);
            b.iter(|| {
                black_box(labeler.label(&view, 2));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_labeler);
criterion_main!(benches);
