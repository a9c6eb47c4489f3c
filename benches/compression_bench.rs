use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, Rgb, RgbImage};
use img_compress::processing::{resize_to_fit, soften};
use img_compress::{
    encode_image, fit_within, BatchConfig, BatchDispatcher, Bounds, MethodRegistry, NoProgress,
    OutputFormat,
};
use tempfile::TempDir;

fn create_test_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    }))
}

fn bench_fit_within(c: &mut Criterion) {
    let bounds = Bounds::default();
    c.bench_function("fit_within", |b| {
        b.iter(|| fit_within(black_box(4032), black_box(3024), black_box(bounds)))
    });
}

fn bench_image_resizing(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_resizing");

    for size in [Small, Medium, Large].iter() {
        let (width, height) = match size {
            Small => (800, 600),
            Medium => (1920, 1080),
            Large => (3840, 2160),
        };
        let img = create_test_image(width, height);
        let bounds = Bounds::new(width / 2, height / 2).unwrap();

        group.bench_with_input(
            BenchmarkId::new("resize", format!("{}x{}", width, height)),
            &img,
            |b, img| b.iter(|| resize_to_fit(black_box(img.clone()), bounds)),
        );
    }

    group.finish();
}

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding");
    group.sample_size(10);
    let img = create_test_image(640, 480);

    for format in [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP] {
        group.bench_with_input(BenchmarkId::new("encode", format), &img, |b, img| {
            b.iter(|| encode_image(black_box(img), format, 80))
        });
    }

    group.bench_function("soften", |b| b.iter(|| soften(black_box(&img), 30)));
    group.finish();
}

fn bench_batch_processing(c: &mut Criterion) {
    let input_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    for i in 0..10 {
        create_test_image(800, 600)
            .save(input_dir.path().join(format!("test_{}.png", i)))
            .unwrap();
    }

    let registry = MethodRegistry::standard();
    let dispatcher = BatchDispatcher::new(&registry);
    let config = BatchConfig {
        input: input_dir.path().to_path_buf(),
        output_dir: output_dir.path().join("out"),
        ..BatchConfig::default()
    };

    let mut group = c.benchmark_group("batch");
    group.sample_size(10);
    group.bench_function("jpeg_quality_10_files", |b| {
        b.iter(|| dispatcher.execute(black_box(&config), &NoProgress))
    });
    group.finish();
}

enum ImageSize {
    Small,
    Medium,
    Large,
}

use ImageSize::*;

criterion_group!(
    benches,
    bench_fit_within,
    bench_image_resizing,
    bench_encoding,
    bench_batch_processing
);
criterion_main!(benches);
