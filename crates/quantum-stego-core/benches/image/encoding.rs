use criterion::{criterion_group, criterion_main, Criterion};
use image::{DynamicImage, ImageBuffer};
use quantum_stego_core::{generate_pq_hash, SteganoMode};

pub fn image_encoding(c: &mut Criterion) {
    let tag = generate_pq_hash("image/png");
    let plain_image = DynamicImage::ImageRgb8(ImageBuffer::from_fn(256, 256, |x, y| {
        image::Rgb([x as u8, y as u8, (x ^ y) as u8])
    }));

    for mode in SteganoMode::ALL {
        c.bench_function(&format!("Image Encoding {}", mode.name()), |b| {
            b.iter(|| {
                let mut image = plain_image.clone();
                assert!(mode.encode(&mut image, &tag, None), "Cannot hide the tag");
            })
        });
    }
}

criterion_group!(benches, image_encoding);
criterion_main!(benches);
