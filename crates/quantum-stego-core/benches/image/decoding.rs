use criterion::{criterion_group, criterion_main, Criterion};
use image::{DynamicImage, ImageBuffer};
use quantum_stego_core::{generate_pq_hash, SteganoMode};

pub fn image_decoding(c: &mut Criterion) {
    let tag = generate_pq_hash("text/plain");

    for mode in SteganoMode::ALL {
        let mut image = DynamicImage::ImageRgb8(ImageBuffer::from_fn(256, 256, |x, y| {
            image::Rgb([x as u8, y as u8, (x ^ y) as u8])
        }));
        assert!(mode.encode(&mut image, &tag, None), "Cannot hide the tag");

        c.bench_function(&format!("Image Decoding {}", mode.name()), |b| {
            b.iter(|| {
                assert_eq!(mode.decode(&image), tag);
            })
        });
    }
}

criterion_group!(benches, image_decoding);
criterion_main!(benches);
