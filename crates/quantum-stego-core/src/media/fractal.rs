//! Decorative escape-time header pattern.
//!
//! Pure function of the requested size and the coordinate window. Numerical trouble
//! never surfaces as an error, [`FractalHeaderGenerator::generate`] falls back to a black image.

use image::{Rgb, RgbImage};
use log::warn;

use crate::error::QuantumStegoError;
use crate::result::Result;
use crate::PHI;

const ESCAPE_RADIUS: f64 = 2.0;

/// `floor(100 * φ) mod 256`
pub fn max_iterations() -> u32 {
    (100.0 * PHI) as u32 % 256
}

/// the complex plane section the header is sampled from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            x_min: -2.0,
            x_max: 1.0,
            y_min: -1.5,
            y_max: 1.5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FractalHeaderGenerator {
    window: Window,
}

impl FractalHeaderGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(window: Window) -> Self {
        Self { window }
    }

    /// renders the header, a uniformly black image if the computation breaks down
    pub fn generate(&self, width: u32, height: u32) -> RgbImage {
        self.try_generate(width, height).unwrap_or_else(|e| {
            warn!("fractal header fell back to black: {e}");
            RgbImage::new(width, height)
        })
    }

    pub fn try_generate(&self, width: u32, height: u32) -> Result<RgbImage> {
        let Window {
            x_min,
            x_max,
            y_min,
            y_max,
        } = self.window;
        if ![x_min, x_max, y_min, y_max].iter().all(|v| v.is_finite()) {
            return Err(QuantumStegoError::ModulationError(format!(
                "non-finite window {:?}",
                self.window
            )));
        }

        let xs = linspace(x_min, x_max, width as usize);
        let ys = linspace(y_min, y_max, height as usize);
        let max_iter = max_iterations();

        let mut values = Vec::with_capacity(xs.len() * ys.len());
        for ci in &ys {
            for cr in &xs {
                let escape_time = escape_time(*cr, *ci, max_iter)?;
                let norm = (escape_time as f64 / max_iter as f64 * PHI).rem_euclid(1.0) * 255.0;
                values.push(norm as u8);
            }
        }

        Ok(RgbImage::from_fn(width, height, |x, y| {
            let v = values[(y * width + x) as usize];
            Rgb([v, v, v])
        }))
    }
}

/// shorthand for a header with the default window
pub fn create_fractal_header(width: u32, height: u32) -> RgbImage {
    FractalHeaderGenerator::new().generate(width, height)
}

/// First iteration at which |z| exceeds the escape radius, 0 if it never does.
///
/// An escaped orbit restarts from 2. A point escaping at iteration 0 has recorded 0,
/// so it records the next iteration it escapes at instead.
fn escape_time(cr: f64, ci: f64, max_iter: u32) -> Result<u32> {
    let (mut zr, mut zi) = (0.0f64, 0.0f64);
    for i in 0..max_iter {
        let next_r = zr * zr - zi * zi + cr;
        zi = 2.0 * zr * zi + ci;
        zr = next_r;

        if !zr.is_finite() || !zi.is_finite() {
            return Err(QuantumStegoError::StateError(format!(
                "orbit of ({cr}, {ci}) became non-finite at iteration {i}"
            )));
        }
        if (zr * zr + zi * zi).sqrt() > ESCAPE_RADIUS {
            if i > 0 {
                return Ok(i);
            }
            (zr, zi) = (ESCAPE_RADIUS, 0.0);
        }
    }

    Ok(0)
}

/// evenly spaced samples including both ends
fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut v: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            v[n - 1] = stop;
            v
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_cap_iterations_by_phi() {
        assert_eq!(max_iterations(), 161);
    }

    #[test]
    fn should_sample_both_ends() {
        assert_eq!(linspace(-2.0, 1.0, 4), vec![-2.0, -1.0, 0.0, 1.0]);
        assert_eq!(linspace(-2.0, 1.0, 1), vec![-2.0]);
        assert!(linspace(-2.0, 1.0, 0).is_empty());
    }

    #[test]
    fn should_be_deterministic() {
        let a = create_fractal_header(50, 50);
        let b = create_fractal_header(50, 50);
        assert_eq!(a, b);
        assert_eq!(a.dimensions(), (50, 50));
    }

    #[test]
    fn should_be_gray() {
        let header = create_fractal_header(40, 30);
        assert!(header.pixels().all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2]));
        // points inside the set stay black, points close to the boundary do not
        assert!(header.pixels().any(|p| p.0[0] > 0));
    }

    #[test]
    fn should_record_escape_times() {
        // c = 1 escapes at the 3rd iteration: 1, 2, 5
        assert_eq!(escape_time(1.0, 0.0, 161).unwrap(), 2);
        // c = 0 is inside the set
        assert_eq!(escape_time(0.0, 0.0, 161).unwrap(), 0);
    }

    #[test]
    fn should_fall_back_to_black_on_nan() {
        let generator = FractalHeaderGenerator::with_window(Window {
            x_min: f64::NAN,
            ..Window::default()
        });
        assert!(generator.try_generate(20, 10).is_err());

        let header = generator.generate(20, 10);
        assert_eq!(header.dimensions(), (20, 10));
        assert!(header.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn should_record_the_second_escape_of_points_outside_the_radius() {
        // |c| > 2 escapes at iteration 0, restarts from 2 and escapes again at 1
        assert_eq!(escape_time(-2.0, -1.5, 161).unwrap(), 1);
        assert_eq!(escape_time(10.0, 10.0, 161).unwrap(), 1);
        // c = -2 settles on |z| = 2 and never leaves the radius
        assert_eq!(escape_time(-2.0, 0.0, 161).unwrap(), 0);
    }

    #[test]
    fn should_render_the_window_corners() {
        // floor((1 / 161 * φ mod 1) * 255)
        let header = create_fractal_header(100, 100);
        assert_eq!(header.get_pixel(0, 0).0, [2, 2, 2]);
        assert_eq!(header.get_pixel(99, 99).0, [2, 2, 2]);
    }
}
