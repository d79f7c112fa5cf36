//! Dense count tables and the smoothing functions that turn them into
//! log-probabilities.

/// Row-major `rows × cols` table of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// A table filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] += value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }
}

/// Turns a table of `(state, outcome)` counts into `log P(outcome | state)`.
///
/// Any `Fn(f64, &Matrix) -> Matrix` can be used as a smoother.
pub trait Smoother {
    fn smooth(&self, k: f64, counts: &Matrix) -> Matrix;
}

impl<F> Smoother for F
where
    F: Fn(f64, &Matrix) -> Matrix,
{
    fn smooth(&self, k: f64, counts: &Matrix) -> Matrix {
        self(k, counts)
    }
}

/// Add-k smoothing: `log((c(r, o) + k) / (Σ_o c(r, o) + k·|O|))`.
///
/// A row with zero mass (no observations and `k == 0`) is `-inf` throughout.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddK;

impl Smoother for AddK {
    fn smooth(&self, k: f64, counts: &Matrix) -> Matrix {
        let mut out = Matrix::filled(counts.rows(), counts.cols(), f64::NEG_INFINITY);
        for r in 0..counts.rows() {
            let row = counts.row(r);
            let denom = row.iter().sum::<f64>() + k * counts.cols() as f64;
            if denom <= 0.0 {
                continue;
            }
            for (c, &count) in row.iter().enumerate() {
                out.set(r, c, ((count + k) / denom).ln());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_add_k_rows_normalize() {
        let mut counts = Matrix::zeros(2, 3);
        counts.set(0, 0, 3.0);
        counts.set(0, 2, 1.0);
        counts.set(1, 1, 5.0);

        let logp = AddK.smooth(1.0, &counts);
        for r in 0..2 {
            let total: f64 = logp.row(r).iter().map(|v| v.exp()).sum();
            assert!(approx(total, 1.0));
        }
        // (3 + 1) / (4 + 3)
        assert!(approx(logp.get(0, 0), (4.0f64 / 7.0).ln()));
        // (0 + 1) / (4 + 3)
        assert!(approx(logp.get(0, 1), (1.0f64 / 7.0).ln()));
    }

    #[test]
    fn test_add_zero_keeps_unseen_impossible() {
        let mut counts = Matrix::zeros(2, 2);
        counts.set(0, 0, 2.0);

        let logp = AddK.smooth(0.0, &counts);
        assert_eq!(logp.get(0, 0), 0.0);
        assert_eq!(logp.get(0, 1), f64::NEG_INFINITY);
        // empty row has no mass at all
        assert!(logp.row(1).iter().all(|v| *v == f64::NEG_INFINITY));
    }

    #[test]
    fn test_closure_smoother() {
        let uniform = |_k: f64, counts: &Matrix| {
            let p = -(counts.cols() as f64).ln();
            Matrix::filled(counts.rows(), counts.cols(), p)
        };
        let logp = uniform.smooth(1.0, &Matrix::zeros(1, 4));
        assert!(approx(logp.get(0, 3), 0.25f64.ln()));
    }
}
