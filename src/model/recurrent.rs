//! Single-layer LSTM regressor: the sequence is read step by step and a dense
//! head maps the final hidden state to the output vector.
//!
//! Trained with full backpropagation through time on mean-squared error and
//! RMSprop updates. Samples are `(timesteps, features)` slices of an `Array3`.

use super::Regressor;
use crate::error::{PredictError, Result};
use ndarray::{s, Array, Array1, Array2, Array3, ArrayView1, ArrayView2, Axis, Dimension, Zip};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrentConfig {
    /// LSTM units
    pub hidden: usize,
    /// Width of the dense head
    pub outputs: usize,
    pub epochs: usize,
    pub batch_size: usize,
    /// Fraction of samples, taken from the end, held out for validation loss
    pub validation_split: f64,
    pub learning_rate: f64,
    pub seed: u64,
}

impl Default for RecurrentConfig {
    fn default() -> Self {
        Self {
            hidden: 16,
            outputs: 1,
            epochs: 50,
            batch_size: 32,
            validation_split: 0.2,
            learning_rate: 1e-3,
            seed: 42,
        }
    }
}

const RMS_RHO: f64 = 0.9;
const RMS_EPS: f64 = 1e-7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Params {
    /// Input weights, gates stacked i, f, g, o: `(4H, D)`
    w: Array2<f64>,
    /// Recurrent weights `(4H, H)`
    u: Array2<f64>,
    b: Array1<f64>,
    /// Dense head `(O, H)`
    v: Array2<f64>,
    c: Array1<f64>,
}

impl Params {
    fn zeros_like(&self) -> Self {
        Self {
            w: Array2::zeros(self.w.raw_dim()),
            u: Array2::zeros(self.u.raw_dim()),
            b: Array1::zeros(self.b.raw_dim()),
            v: Array2::zeros(self.v.raw_dim()),
            c: Array1::zeros(self.c.raw_dim()),
        }
    }
}

/// Cached activations of one timestep, needed by the backward pass.
struct Step {
    h_prev: Array1<f64>,
    c_prev: Array1<f64>,
    i: Array1<f64>,
    f: Array1<f64>,
    g: Array1<f64>,
    o: Array1<f64>,
    tanh_c: Array1<f64>,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn glorot(rows: usize, cols: usize, rng: &mut StdRng) -> Array2<f64> {
    let limit = (6.0 / (rows + cols) as f64).sqrt();
    let dist = Uniform::new_inclusive(-limit, limit);
    Array2::from_shape_fn((rows, cols), |_| dist.sample(&mut *rng))
}

/// `target += a ⊗ b`
fn add_outer(target: &mut Array2<f64>, a: &Array1<f64>, b: ArrayView1<'_, f64>) {
    for (mut row, &ai) in target.outer_iter_mut().zip(a.iter()) {
        if ai != 0.0 {
            row.scaled_add(ai, &b);
        }
    }
}

fn rms_update<D: Dimension>(p: &mut Array<f64, D>, g: &Array<f64, D>, cache: &mut Array<f64, D>, lr: f64) {
    Zip::from(p).and(g).and(cache).for_each(|p, &g, s| {
        *s = RMS_RHO * *s + (1.0 - RMS_RHO) * g * g;
        *p -= lr * g / (s.sqrt() + RMS_EPS);
    });
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrentRegressor {
    config: RecurrentConfig,
    input_dim: usize,
    params: Params,
}

impl RecurrentRegressor {
    /// Fresh, randomly initialized network for `input_dim` features per step.
    pub fn new(input_dim: usize, config: RecurrentConfig) -> Result<Self> {
        if input_dim == 0 || config.hidden == 0 || config.outputs == 0 {
            return Err(PredictError::Shape(format!(
                "recurrent layer needs non-zero sizes (input {}, hidden {}, outputs {})",
                input_dim, config.hidden, config.outputs
            )));
        }
        let h = config.hidden;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut b = Array1::<f64>::zeros(4 * h);
        // unit forget bias
        b.slice_mut(s![h..2 * h]).fill(1.0);
        let params = Params {
            w: glorot(4 * h, input_dim, &mut rng),
            u: glorot(4 * h, h, &mut rng),
            b,
            v: glorot(config.outputs, h, &mut rng),
            c: Array1::zeros(config.outputs),
        };
        Ok(Self {
            config,
            input_dim,
            params,
        })
    }

    pub fn config(&self) -> &RecurrentConfig {
        &self.config
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn forward(&self, x: ArrayView2<'_, f64>) -> (Array1<f64>, Array1<f64>, Vec<Step>) {
        let hd = self.config.hidden;
        let p = &self.params;
        let mut h = Array1::<f64>::zeros(hd);
        let mut c = Array1::<f64>::zeros(hd);
        let mut steps = Vec::with_capacity(x.nrows());

        for xt in x.outer_iter() {
            let z = p.w.dot(&xt) + p.u.dot(&h) + &p.b;
            let i = z.slice(s![0..hd]).mapv(sigmoid);
            let f = z.slice(s![hd..2 * hd]).mapv(sigmoid);
            let g = z.slice(s![2 * hd..3 * hd]).mapv(f64::tanh);
            let o = z.slice(s![3 * hd..4 * hd]).mapv(sigmoid);
            let c_new = &f * &c + &i * &g;
            let tanh_c = c_new.mapv(f64::tanh);
            let h_new = &o * &tanh_c;
            steps.push(Step {
                h_prev: std::mem::replace(&mut h, h_new),
                c_prev: std::mem::replace(&mut c, c_new),
                i,
                f,
                g,
                o,
                tanh_c,
            });
        }
        let y = p.v.dot(&h) + &p.c;
        (y, h, steps)
    }

    fn backward(&self, x: ArrayView2<'_, f64>, h_last: &Array1<f64>, steps: &[Step], dy: &Array1<f64>, grads: &mut Params) {
        let hd = self.config.hidden;
        let p = &self.params;
        add_outer(&mut grads.v, dy, h_last.view());
        grads.c += dy;

        let mut dh = p.v.t().dot(dy);
        let mut dc = Array1::<f64>::zeros(hd);
        let mut dz = Array1::<f64>::zeros(4 * hd);
        for (t, st) in steps.iter().enumerate().rev() {
            let d_o = &dh * &st.tanh_c;
            let dct = &dh * &st.o * &st.tanh_c.mapv(|v| 1.0 - v * v) + &dc;
            let di = &dct * &st.g;
            let dg = &dct * &st.i;
            let df = &dct * &st.c_prev;
            dc = &dct * &st.f;

            dz.slice_mut(s![0..hd])
                .assign(&(&di * &st.i.mapv(|v| v * (1.0 - v))));
            dz.slice_mut(s![hd..2 * hd])
                .assign(&(&df * &st.f.mapv(|v| v * (1.0 - v))));
            dz.slice_mut(s![2 * hd..3 * hd])
                .assign(&(&dg * &st.g.mapv(|v| 1.0 - v * v)));
            dz.slice_mut(s![3 * hd..4 * hd])
                .assign(&(&d_o * &st.o.mapv(|v| v * (1.0 - v))));

            add_outer(&mut grads.w, &dz, x.row(t));
            add_outer(&mut grads.u, &dz, st.h_prev.view());
            grads.b += &dz;
            dh = p.u.t().dot(&dz);
        }
    }

    fn apply(&mut self, grads: &Params, cache: &mut Params) {
        let lr = self.config.learning_rate;
        let p = &mut self.params;
        rms_update(&mut p.w, &grads.w, &mut cache.w, lr);
        rms_update(&mut p.u, &grads.u, &mut cache.u, lr);
        rms_update(&mut p.b, &grads.b, &mut cache.b, lr);
        rms_update(&mut p.v, &grads.v, &mut cache.v, lr);
        rms_update(&mut p.c, &grads.c, &mut cache.c, lr);
    }

    fn sample_loss(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
        let (out, _, _) = self.forward(x);
        (&out - &y).mapv(|d| d * d).mean().unwrap_or(0.0)
    }

    fn check_input(&self, x: &Array3<f64>) -> Result<()> {
        if x.shape()[2] != self.input_dim {
            return Err(PredictError::Shape(format!(
                "{} features per step, network expects {}",
                x.shape()[2],
                self.input_dim
            )));
        }
        Ok(())
    }
}

impl Regressor for RecurrentRegressor {
    type Input = Array3<f64>;
    type Target = Array2<f64>;
    type Output = Array2<f64>;

    fn fit(&mut self, x: &Array3<f64>, y: &Array2<f64>) -> Result<()> {
        self.check_input(x)?;
        let n = x.shape()[0];
        if n == 0 {
            return Err(PredictError::Shape("no training sequences".into()));
        }
        if y.nrows() != n {
            return Err(PredictError::LabelMismatch {
                rows: n,
                labels: y.nrows(),
            });
        }
        if y.ncols() != self.config.outputs {
            return Err(PredictError::Shape(format!(
                "targets have {} columns, network outputs {}",
                y.ncols(),
                self.config.outputs
            )));
        }

        let n_train = ((n as f64 * (1.0 - self.config.validation_split)) as usize).clamp(1, n);
        let batch_size = self.config.batch_size.max(1);
        let scale = 2.0 / self.config.outputs as f64;
        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(1));
        let mut order: Vec<usize> = (0..n_train).collect();
        let mut cache = self.params.zeros_like();

        info!(
            samples = n_train,
            validation = n - n_train,
            timesteps = x.shape()[1],
            features = self.input_dim,
            hidden = self.config.hidden,
            epochs = self.config.epochs,
            "training recurrent regressor"
        );

        let mut last_loss = f64::NAN;
        for epoch in 0..self.config.epochs {
            order.shuffle(&mut rng);
            let mut epoch_loss = 0.0;
            for batch in order.chunks(batch_size) {
                let mut grads = self.params.zeros_like();
                let norm = scale / batch.len() as f64;
                for &idx in batch {
                    let xs = x.index_axis(Axis(0), idx);
                    let (out, h_last, steps) = self.forward(xs);
                    let diff = &out - &y.row(idx);
                    epoch_loss += diff.mapv(|d| d * d).mean().unwrap_or(0.0);
                    let dy = diff * norm;
                    self.backward(xs, &h_last, &steps, &dy, &mut grads);
                }
                self.apply(&grads, &mut cache);
            }
            last_loss = epoch_loss / n_train as f64;
            let val_loss = if n_train < n {
                let total: f64 = (n_train..n)
                    .map(|idx| self.sample_loss(x.index_axis(Axis(0), idx), y.row(idx)))
                    .sum();
                Some(total / (n - n_train) as f64)
            } else {
                None
            };
            debug!(epoch = epoch + 1, loss = last_loss, val_loss = ?val_loss, "epoch");
        }
        info!(loss = last_loss, "recurrent regressor trained");
        Ok(())
    }

    fn predict(&self, x: &Array3<f64>) -> Result<Array2<f64>> {
        self.check_input(x)?;
        let n = x.shape()[0];
        let mut out = Array2::<f64>::zeros((n, self.config.outputs));
        for (mut row, xs) in out.outer_iter_mut().zip(x.outer_iter()) {
            let (y, _, _) = self.forward(xs);
            row.assign(&y);
        }
        Ok(out)
    }
}
