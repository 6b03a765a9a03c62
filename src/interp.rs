//! Monotone piecewise-linear interpolation.

use crate::error::{Error, Result};

/// Piecewise-linear map built from sample points, clamped at the
/// boundaries.
///
/// Points are sorted by `x` on construction; queries outside the sampled
/// range return the boundary `y` value.
///
/// # Example
/// ```
/// use scoralign::interp::LinearInterpolator;
///
/// let interp = LinearInterpolator::new(&[0.0, 2.0], &[0.0, 1.0]).unwrap();
/// assert_eq!(interp.at(1.0), 0.5);
/// assert_eq!(interp.at(-5.0), 0.0); // clamped
/// assert_eq!(interp.at(9.0), 1.0);  // clamped
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f32>,
    ys: Vec<f32>,
}

impl LinearInterpolator {
    /// Build an interpolator from parallel sample arrays.
    ///
    /// # Errors
    /// `LengthMismatch` when `x` and `y` differ in length, `EmptyInput`
    /// when no points are given.
    pub fn new(x: &[f32], y: &[f32]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::LengthMismatch {
                name: "interpolation points",
                left: x.len(),
                right: y.len(),
            });
        }
        if x.is_empty() {
            return Err(Error::EmptyInput {
                name: "interpolation points",
            });
        }

        let mut order: Vec<usize> = (0..x.len()).collect();
        order.sort_by(|&i, &j| x[i].total_cmp(&x[j]));
        let xs = order.iter().map(|&i| x[i]).collect();
        let ys = order.iter().map(|&i| y[i]).collect();
        Ok(Self { xs, ys })
    }

    /// Evaluate the map at `x`.
    pub fn at(&self, x: f32) -> f32 {
        if self.xs.len() == 1 || x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= *self.xs.last().unwrap_or(&self.xs[0]) {
            return *self.ys.last().unwrap_or(&self.ys[0]);
        }

        // First index with xs[idx] >= x; idx >= 1 here since x > xs[0].
        let idx = self.xs.partition_point(|&v| v < x);
        let (x0, x1) = (self.xs[idx - 1], self.xs[idx]);
        let (y0, y1) = (self.ys[idx - 1], self.ys[idx]);
        y0 + (x - x0) / (x1 - x0) * (y1 - y0)
    }

    /// Evaluate the map at each point.
    pub fn map(&self, points: &[f32]) -> Vec<f32> {
        points.iter().map(|&x| self.at(x)).collect()
    }
}
