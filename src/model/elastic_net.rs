//! Elastic-net linear regression by cyclic coordinate descent.
//!
//! Minimizes `1/(2n) |y - Xw - b|^2 + alpha * l1_ratio * |w|_1 + alpha * (1 - l1_ratio) / 2 * |w|^2`.
//! The intercept is fit by centering `X` and `y`.

use super::Regressor;
use crate::error::{PredictError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticNet {
    pub alpha: f64,
    pub l1_ratio: f64,
    pub max_iter: usize,
    pub tol: f64,
    coef: Array1<f64>,
    intercept: f64,
    n_iter: usize,
}

fn soft_threshold(x: f64, lambda: f64) -> f64 {
    if x > lambda {
        x - lambda
    } else if x < -lambda {
        x + lambda
    } else {
        0.0
    }
}

impl ElasticNet {
    pub fn new(alpha: f64, l1_ratio: f64) -> Self {
        Self {
            alpha,
            l1_ratio,
            max_iter: 1000,
            tol: 1e-4,
            coef: Array1::zeros(0),
            intercept: 0.0,
            n_iter: 0,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn coef(&self) -> &Array1<f64> {
        &self.coef
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Coordinate-descent sweeps run by the last `fit`.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }
}

impl Regressor for ElasticNet {
    type Input = Array2<f64>;
    type Target = Array1<f64>;
    type Output = Array1<f64>;

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let (n, p) = x.dim();
        if n == 0 {
            return Err(PredictError::Shape("no training rows".into()));
        }
        if y.len() != n {
            return Err(PredictError::LabelMismatch {
                rows: n,
                labels: y.len(),
            });
        }
        let nf = n as f64;

        let x_mean = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(p));
        let y_mean = y.mean().unwrap_or(0.0);
        let xc = x - &x_mean;
        let yc = y - y_mean;
        let col_sq: Vec<f64> = xc.axis_iter(Axis(1)).map(|c| c.dot(&c) / nf).collect();

        let l1 = self.alpha * self.l1_ratio;
        let l2 = self.alpha * (1.0 - self.l1_ratio);
        let mut w = Array1::<f64>::zeros(p);
        let mut residual = yc;
        let mut converged = false;

        self.n_iter = 0;
        for iter in 0..self.max_iter {
            let mut max_dw = 0.0_f64;
            let mut max_w = 0.0_f64;
            for j in 0..p {
                if col_sq[j] == 0.0 {
                    continue;
                }
                let col = xc.column(j);
                let w_old = w[j];
                let rho = col.dot(&residual) / nf + col_sq[j] * w_old;
                let w_new = soft_threshold(rho, l1) / (col_sq[j] + l2);
                if w_new != w_old {
                    residual.scaled_add(w_old - w_new, &col);
                }
                w[j] = w_new;
                max_dw = max_dw.max((w_new - w_old).abs());
                max_w = max_w.max(w_new.abs());
            }
            self.n_iter = iter + 1;
            if max_w == 0.0 || max_dw <= self.tol * max_w {
                converged = true;
                break;
            }
        }
        if !converged {
            warn!(max_iter = self.max_iter, "elastic net did not converge");
        }

        self.intercept = y_mean - x_mean.dot(&w);
        self.coef = w;
        debug!(
            n_iter = self.n_iter,
            nonzero = self.coef.iter().filter(|c| **c != 0.0).count(),
            "elastic net fit"
        );
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.coef.len() {
            return Err(PredictError::Shape(format!(
                "{} columns, model has {} coefficients",
                x.ncols(),
                self.coef.len()
            )));
        }
        Ok(x.dot(&self.coef) + self.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn single_feature_matches_closed_form() {
        let x = array![[0.0], [0.0], [1.0], [1.0]];
        let y = array![0.0, 0.0, 100.0, 100.0];
        let mut m = ElasticNet::new(1.0, 0.7).with_max_iter(10000);
        m.fit(&x, &y).unwrap();

        // var = 0.25, cov = 25: w = (25 - 0.7) / (0.25 + 0.3)
        let w = 24.3 / 0.55;
        assert!((m.coef()[0] - w).abs() < 1e-9);
        assert!((m.intercept() - (50.0 - 0.5 * w)).abs() < 1e-9);

        let p = m.predict(&x).unwrap();
        assert!(p[2] > p[0]);
    }

    #[test]
    fn strong_penalty_predicts_mean() {
        let x = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let y = array![3.0, 6.0, 9.0];
        let mut m = ElasticNet::new(1e6, 0.7);
        m.fit(&x, &y).unwrap();
        assert!(m.coef().iter().all(|c| *c == 0.0));
        let p = m.predict(&x).unwrap();
        assert!(p.iter().all(|v| (*v - 6.0).abs() < 1e-12));
    }

    #[test]
    fn recovers_sparse_signal_with_small_penalty() {
        let x = array![
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 1.0],
            [1.0, 0.0, 1.0]
        ];
        let y = x.column(0).mapv(|v| 10.0 * v) + 5.0;
        let mut m = ElasticNet::new(1e-4, 0.7).with_max_iter(10000).with_tol(1e-10);
        m.fit(&x, &y).unwrap();
        assert!((m.coef()[0] - 10.0).abs() < 0.01);
        assert!(m.coef()[1].abs() < 0.01);
        assert!((m.intercept() - 5.0).abs() < 0.02);
    }

    #[test]
    fn constant_column_gets_zero_weight() {
        let x = array![[1.0, 0.0], [1.0, 1.0], [1.0, 2.0]];
        let y = array![1.0, 2.0, 3.0];
        let mut m = ElasticNet::new(0.01, 0.7);
        m.fit(&x, &y).unwrap();
        assert_eq!(m.coef()[0], 0.0);
    }

    #[test]
    fn shape_errors() {
        let mut m = ElasticNet::new(1.0, 0.7);
        assert!(m.fit(&Array2::zeros((0, 2)), &Array1::zeros(0)).is_err());
        assert!(matches!(
            m.fit(&Array2::zeros((3, 2)), &Array1::zeros(2)),
            Err(PredictError::LabelMismatch { rows: 3, labels: 2 })
        ));
        m.fit(&array![[1.0, 2.0], [2.0, 1.0]], &array![1.0, 2.0]).unwrap();
        assert!(m.predict(&Array2::zeros((1, 3))).is_err());
    }
}
