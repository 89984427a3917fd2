mod activation;
mod batch;
mod classifier;
mod dataset;
mod early_stopping;
mod error;
mod hyperparameters;
mod loss;
mod optimizer;
mod trainer;
mod utils;

pub use activation::{argmax_rows, softmax};
pub use batch::{batch, num_batches, Minibatches};
pub use classifier::Classifier;
pub use dataset::{labels_from_float, Dataset, Split};
pub use early_stopping::{EarlyStopping, Observation, Status};
pub use error::{Error, Result};
pub use hyperparameters::TrainingConfig;
pub use loss::{zero_one_loss, Loss};
pub use optimizer::Optimizer;
pub use trainer::{mean_batch_error, Trainer, TrainingReport, ValidationEvent};
