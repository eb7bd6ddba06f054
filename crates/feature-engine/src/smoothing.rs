//! Savitzky-Golay smoothing with explicit fallback
//!
//! Local polynomial least-squares fitting over a sliding window. Interior
//! points use fixed convolution weights; the first and last half-window are
//! filled by evaluating a polynomial fitted to the edge window, so the
//! output always has the same length as the input.

use tracing::debug;

/// Result of a smoothing attempt.
///
/// Smoothing is a best-effort noise filter, never a required precondition:
/// when the least-squares fit degenerates the unmodified input is returned
/// and `used_fallback` is set, visible to the caller instead of being hidden
/// in error-handling control flow.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedSignal {
    /// Smoothed (or, on fallback, original) values
    pub values: Vec<f64>,
    /// Whether the unsmoothed input was substituted
    pub used_fallback: bool,
}

/// Window length and polynomial order for a segment of `len` samples.
///
/// Window is `min(25, len)`, forced odd by decrementing, floored at 3;
/// polynomial order is 2 for windows of 5 or more, otherwise 1.
pub fn window_params(len: usize) -> (usize, usize) {
    let mut window = len.min(25);
    if window < 3 {
        window = 3;
    }
    if window % 2 == 0 {
        window -= 1;
    }
    let order = if window >= 5 { 2 } else { 1 };
    (window, order)
}

/// Repair non-finite values by carrying the last valid value forward, then
/// carrying backward over any still-missing leading values.
///
/// Always runs, even when nothing is missing (no-op). An all-missing input
/// comes back unchanged; callers discard such segments.
pub fn repair_missing(values: &[f64]) -> Vec<f64> {
    let mut repaired = values.to_vec();

    let mut last_valid = None;
    for v in repaired.iter_mut() {
        if v.is_finite() {
            last_valid = Some(*v);
        } else if let Some(fill) = last_valid {
            *v = fill;
        }
    }

    let mut next_valid = None;
    for v in repaired.iter_mut().rev() {
        if v.is_finite() {
            next_valid = Some(*v);
        } else if let Some(fill) = next_valid {
            *v = fill;
        }
    }

    repaired
}

/// Smooth a segment's current values.
///
/// Window sizing follows [`window_params`]. Falls back to the unmodified
/// input when the signal is shorter than the window or the fit degenerates.
pub fn smooth(values: &[f64]) -> SmoothedSignal {
    let (window, order) = window_params(values.len());

    match savgol(values, window, order) {
        Ok(smoothed) => SmoothedSignal {
            values: smoothed,
            used_fallback: false,
        },
        Err(reason) => {
            debug!("smoothing fallback: {}", reason);
            SmoothedSignal {
                values: values.to_vec(),
                used_fallback: true,
            }
        }
    }
}

fn savgol(values: &[f64], window: usize, order: usize) -> Result<Vec<f64>, &'static str> {
    let n = values.len();
    if n < window {
        return Err("signal shorter than window");
    }
    let half = window / 2;

    // Convolution weights for the window center: first row of the
    // least-squares smoothing matrix over x = -half..=half.
    let xs: Vec<f64> = (0..window).map(|j| j as f64 - half as f64).collect();
    let weights = center_weights(&xs, order)?;

    let mut out = vec![0.0; n];
    for i in half..n - half {
        let mut acc = 0.0;
        for (j, w) in weights.iter().enumerate() {
            acc += w * values[i - half + j];
        }
        out[i] = acc;
    }

    // Edges: fit a polynomial to the first/last full window and evaluate it
    // at the uncovered positions (output length equals input length).
    let edge_xs: Vec<f64> = (0..window).map(|j| j as f64).collect();

    let head = polyfit(&edge_xs, &values[..window], order)?;
    for (i, slot) in out.iter_mut().take(half).enumerate() {
        *slot = polyval(&head, i as f64);
    }

    let tail = polyfit(&edge_xs, &values[n - window..], order)?;
    for i in 0..half {
        out[n - half + i] = polyval(&tail, (window - half + i) as f64);
    }

    Ok(out)
}

/// Weights `w` such that the fitted polynomial's value at the window center
/// equals `sum(w[j] * y[j])`.
fn center_weights(xs: &[f64], order: usize) -> Result<Vec<f64>, &'static str> {
    let m = order + 1;

    // Normal matrix S[a][b] = sum(x^(a+b))
    let mut s = vec![vec![0.0; m]; m];
    for a in 0..m {
        for b in 0..m {
            s[a][b] = xs.iter().map(|&x| x.powi((a + b) as i32)).sum();
        }
    }
    let inv = invert(&s)?;

    // w[j] = sum_k inv[0][k] * x_j^k
    Ok(xs
        .iter()
        .map(|&x| (0..m).map(|k| inv[0][k] * x.powi(k as i32)).sum())
        .collect())
}

/// Least-squares polynomial fit, coefficients in ascending power order.
fn polyfit(xs: &[f64], ys: &[f64], order: usize) -> Result<Vec<f64>, &'static str> {
    let m = order + 1;

    let mut s = vec![vec![0.0; m]; m];
    let mut rhs = vec![0.0; m];
    for a in 0..m {
        for b in 0..m {
            s[a][b] = xs.iter().map(|&x| x.powi((a + b) as i32)).sum();
        }
        rhs[a] = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| y * x.powi(a as i32))
            .sum();
    }

    solve(s, rhs)
}

fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Invert a small symmetric matrix by Gauss-Jordan elimination.
fn invert(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, &'static str> {
    let m = matrix.len();
    let mut aug: Vec<Vec<f64>> = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut r = row.clone();
            r.extend((0..m).map(|j| if i == j { 1.0 } else { 0.0 }));
            r
        })
        .collect();

    for col in 0..m {
        let pivot_row = (col..m)
            .max_by(|&a, &b| aug[a][col].abs().total_cmp(&aug[b][col].abs()))
            .ok_or("empty matrix")?;
        if aug[pivot_row][col].abs() < 1e-12 {
            return Err("singular normal matrix");
        }
        aug.swap(col, pivot_row);

        let pivot = aug[col][col];
        for v in aug[col].iter_mut() {
            *v /= pivot;
        }
        for row in 0..m {
            if row != col {
                let factor = aug[row][col];
                for k in 0..2 * m {
                    aug[row][k] -= factor * aug[col][k];
                }
            }
        }
    }

    Ok(aug.into_iter().map(|row| row[m..].to_vec()).collect())
}

/// Solve a small linear system by Gaussian elimination with partial pivoting.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, &'static str> {
    let m = a.len();

    for col in 0..m {
        let pivot_row = (col..m)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .ok_or("empty system")?;
        if a[pivot_row][col].abs() < 1e-12 {
            return Err("singular normal matrix");
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..m {
            let factor = a[row][col] / a[col][col];
            for k in col..m {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; m];
    for row in (0..m).rev() {
        let mut acc = b[row];
        for k in row + 1..m {
            acc -= a[row][k] * x[k];
        }
        x[row] = acc / a[row][row];
    }
    Ok(x)
}
