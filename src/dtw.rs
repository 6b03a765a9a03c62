//! Dynamic time warping over feature sequences.
//!
//! Two engines are provided: [`Dtw`] with the standard three-direction step
//! set, and [`WeightedDtw`] with arbitrary step directions and per-direction
//! cost multipliers. Both compare feature vectors through a pluggable
//! [`DistanceFn`] (Euclidean by default) and return a warping path together
//! with the total distance.

use ndarray::{s, Array2, ArrayView1};

use crate::error::{Error, Result};

/// Distance between two equal-length feature vectors.
pub type DistanceFn = fn(ArrayView1<f32>, ArrayView1<f32>) -> f64;

/// Euclidean (L2) distance.
///
/// Returns +∞ when the vectors have different lengths.
pub fn euclidean(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Cosine distance, `1 - cos(a, b)`.
///
/// Returns +∞ when the vectors have different lengths and 1.0 when either
/// vector has zero norm.
pub fn cosine(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Result of a DTW computation.
#[derive(Debug, Clone)]
pub struct DtwResult {
    /// Accumulated cost of the optimal path.
    pub distance: f64,
    /// Warping path as (row, column) cell coordinates, empty unless
    /// requested.
    pub path: Vec<(usize, usize)>,
    /// Trimmed M×N accumulated-cost grid, present only when requested.
    pub cost_matrix: Option<Array2<f64>>,
}

/// Standard dynamic time warping with steps {(1,0), (0,1), (1,1)}.
///
/// # Example
/// ```
/// use ndarray::array;
/// use scoralign::dtw::Dtw;
///
/// let x = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
/// let result = Dtw::default().compute(&x, &x, true, false);
/// assert_eq!(result.distance, 0.0);
/// assert_eq!(result.path, vec![(0, 0), (1, 1), (2, 2)]);
/// ```
pub struct Dtw {
    distance: DistanceFn,
}

impl Dtw {
    /// Create a DTW engine with a custom distance function.
    pub fn new(distance: DistanceFn) -> Self {
        Self { distance }
    }

    /// Align two feature sequences.
    ///
    /// Rows of `x` and `y` are the feature vectors of consecutive time
    /// steps. The path starts at `(0, 0)` and ends at `(M-1, N-1)`; ties in
    /// backtracking prefer the diagonal, then the vertical, then the
    /// horizontal predecessor. Empty input yields distance 0 and an empty
    /// path.
    pub fn compute(
        &self,
        x: &Array2<f32>,
        y: &Array2<f32>,
        return_path: bool,
        return_cost_matrix: bool,
    ) -> DtwResult {
        let (m, n) = (x.nrows(), y.nrows());
        if m == 0 || n == 0 {
            return DtwResult {
                distance: 0.0,
                path: Vec::new(),
                cost_matrix: None,
            };
        }

        // Padded (M+1)×(N+1) grid; only (0,0) is a valid entry point.
        let mut cost = Array2::from_elem((m + 1, n + 1), f64::INFINITY);
        cost[[0, 0]] = 0.0;
        for i in 1..=m {
            for j in 1..=n {
                let d = (self.distance)(x.row(i - 1), y.row(j - 1));
                let best = cost[[i - 1, j]].min(cost[[i, j - 1]]).min(cost[[i - 1, j - 1]]);
                cost[[i, j]] = d + best;
            }
        }

        let distance = cost[[m, n]];
        let trimmed = cost.slice(s![1.., 1..]).to_owned();

        let path = if return_path {
            backtrack(&trimmed)
        } else {
            Vec::new()
        };

        DtwResult {
            distance,
            path,
            cost_matrix: return_cost_matrix.then_some(trimmed),
        }
    }
}

impl Default for Dtw {
    fn default() -> Self {
        Self::new(euclidean)
    }
}

fn backtrack(cost: &Array2<f64>) -> Vec<(usize, usize)> {
    let (mut i, mut j) = (cost.nrows() - 1, cost.ncols() - 1);
    let mut path = vec![(i, j)];

    while i > 0 || j > 0 {
        if i == 0 {
            j -= 1;
        } else if j == 0 {
            i -= 1;
        } else {
            let diagonal = cost[[i - 1, j - 1]];
            let up = cost[[i - 1, j]];
            let left = cost[[i, j - 1]];
            if diagonal <= up && diagonal <= left {
                i -= 1;
                j -= 1;
            } else if up <= left {
                i -= 1;
            } else {
                j -= 1;
            }
        }
        path.push((i, j));
    }

    path.reverse();
    path
}

/// Dynamic time warping with configurable step directions and weights.
///
/// Each direction `(Δrow, Δcol)` has a cost multiplier; a cell's cost is the
/// minimum over directions of the predecessor cost plus the weighted local
/// distance. The default configuration reproduces standard DTW.
pub struct WeightedDtw {
    directions: Vec<(usize, usize)>,
    weights: Vec<f64>,
    distance: DistanceFn,
}

impl WeightedDtw {
    /// Create a weighted DTW engine.
    ///
    /// # Errors
    /// `LengthMismatch` when `directions` and `weights` differ in length,
    /// `EmptyInput` when they are empty.
    pub fn new(
        directions: Vec<(usize, usize)>,
        weights: Vec<f64>,
        distance: DistanceFn,
    ) -> Result<Self> {
        if directions.len() != weights.len() {
            return Err(Error::LengthMismatch {
                name: "step directions and weights",
                left: directions.len(),
                right: weights.len(),
            });
        }
        if directions.is_empty() {
            return Err(Error::EmptyInput {
                name: "step directions",
            });
        }
        Ok(Self {
            directions,
            weights,
            distance,
        })
    }

    /// Align two feature sequences under the configured step pattern.
    ///
    /// Semantics match [`Dtw::compute`], except each step direction applies
    /// its own weight to the local distance and backtracking replays the
    /// direction chosen per cell.
    pub fn compute(
        &self,
        x: &Array2<f32>,
        y: &Array2<f32>,
        return_path: bool,
        return_cost_matrix: bool,
    ) -> DtwResult {
        let (m, n) = (x.nrows(), y.nrows());
        if m == 0 || n == 0 {
            return DtwResult {
                distance: 0.0,
                path: Vec::new(),
                cost_matrix: None,
            };
        }

        let mut cost = Array2::from_elem((m + 1, n + 1), f64::INFINITY);
        cost[[0, 0]] = 0.0;
        let mut chosen: Array2<Option<usize>> = Array2::from_elem((m, n), None);

        for i in 1..=m {
            for j in 1..=n {
                let d = (self.distance)(x.row(i - 1), y.row(j - 1));
                let mut best = f64::INFINITY;
                let mut best_dir = None;
                for (dir, (&(di, dj), &w)) in
                    self.directions.iter().zip(self.weights.iter()).enumerate()
                {
                    if di > i || dj > j {
                        continue;
                    }
                    let candidate = cost[[i - di, j - dj]] + d * w;
                    if candidate < best {
                        best = candidate;
                        best_dir = Some(dir);
                    }
                }
                cost[[i, j]] = best;
                chosen[[i - 1, j - 1]] = best_dir;
            }
        }

        let distance = cost[[m, n]];
        let trimmed = cost.slice(s![1.., 1..]).to_owned();

        let path = if return_path {
            let (mut i, mut j) = (m - 1, n - 1);
            let mut path = vec![(i, j)];
            while i > 0 || j > 0 {
                match chosen[[i, j]] {
                    Some(dir) => {
                        let (di, dj) = self.directions[dir];
                        i -= di;
                        j -= dj;
                        path.push((i, j));
                    }
                    None => break,
                }
            }
            path.reverse();
            path
        } else {
            Vec::new()
        };

        DtwResult {
            distance,
            path,
            cost_matrix: return_cost_matrix.then_some(trimmed),
        }
    }
}

impl Default for WeightedDtw {
    fn default() -> Self {
        Self {
            directions: vec![(1, 0), (1, 1), (0, 1)],
            weights: vec![1.0, 1.0, 1.0],
            distance: euclidean,
        }
    }
}
