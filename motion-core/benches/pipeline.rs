use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use motion_core::image::ImageView;
use motion_core::{MotionDetector, ReferencePolicy};

fn frame_with_block(width: u32, height: u32, on: bool) -> Vec<u8> {
    let mut data = vec![0u8; (width * height) as usize];
    if on {
        let (bw, bh) = (width / 8, height / 8);
        for y in (height / 4)..(height / 4 + bh) {
            for x in (width / 4)..(width / 4 + bw) {
                data[(y * width + x) as usize] = 255;
            }
        }
    }
    data
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");

    for &(w, h, downscale) in &[(320u32, 240u32, 1u32), (1024, 768, 1), (1024, 768, 4)] {
        let background = frame_with_block(w, h, false);
        let moving = frame_with_block(w, h, true);

        group.bench_with_input(
            BenchmarkId::new("full_pipeline", format!("{w}x{h}/f{downscale}")),
            &(background, moving),
            |b, (background, moving)| {
                let mut detector =
                    MotionDetector::<5>::new(w, h, downscale, 30, None, None, ReferencePolicy::Manual);
                detector.set_reference(&ImageView::new(background, w, h));
                b.iter(|| {
                    black_box(detector.detect(&ImageView::new(moving, w, h)));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_detect);
criterion_main!(benches);
