use byteorder::{ByteOrder, LittleEndian};
use image::{DynamicImage, RgbImage};

use crate::error::QuantumStegoError;
use crate::result::Result;

/// n-dimensional array of floats the quantum-inspired transforms operate on
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl Field {
    pub fn new(shape: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(QuantumStegoError::StateError(format!(
                "shape {shape:?} needs {expected} values, got {}",
                values.len()
            )));
        }

        Ok(Self { shape, values })
    }

    /// one dimensional field
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            shape: vec![values.len()],
            values,
        }
    }

    /// height x width x 3
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            shape: vec![height as usize, width as usize, 3],
            values: image.as_raw().iter().map(|c| *c as f64).collect(),
        }
    }

    pub fn from_image(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageRgb8(buf) => Self::from_rgb(buf),
            other => Self::from_rgb(&other.to_rgb8()),
        }
    }

    pub fn zeros(shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            values: vec![0.0; len],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// element wise map keeping the shape
    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self {
            shape: self.shape.clone(),
            values: self.values.iter().map(|v| f(*v)).collect(),
        }
    }

    pub fn negated(&self) -> Self {
        self.map(|v| -v)
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.sum() / self.values.len() as f64
    }

    /// raw little endian bytes of all values, used for hashing
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.values.len() * 8];
        LittleEndian::write_f64_into(&self.values, &mut bytes);
        bytes
    }
}

/// population standard deviation, 0 for empty input
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

/// Pearson correlation of two equally long series, 0 when it is undefined
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return 0.0;
    }

    let r = cov / (var_a * var_b).sqrt();
    if r.is_finite() {
        r
    } else {
        0.0
    }
}
