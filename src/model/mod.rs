//! Regressors and the trained-model bundle.
//!
//! - [`ElasticNet`]: linear model with L1+L2 penalty, coordinate descent
//! - [`RecurrentRegressor`]: single LSTM layer with a dense head, BPTT + RMSprop
//! - [`ModelBundle`]: everything `test` needs, tagged by variant
//! - [`persist`]: JSON model files with a SHA-256 digest

mod bundle;
mod elastic_net;
pub mod persist;
mod recurrent;

pub use bundle::{ModelBundle, TrainedModel};
pub use elastic_net::ElasticNet;
pub use recurrent::{RecurrentConfig, RecurrentRegressor};

use crate::error::Result;

/// Fit/predict capability shared by both regressors.
pub trait Regressor {
    type Input;
    type Target;
    type Output;

    fn fit(&mut self, x: &Self::Input, y: &Self::Target) -> Result<()>;

    fn predict(&self, x: &Self::Input) -> Result<Self::Output>;
}
