use std::time::Instant;

use log::{debug, info, trace};

use crate::batch::{num_batches, Minibatches};
use crate::classifier::Classifier;
use crate::dataset::{Dataset, Split};
use crate::early_stopping::{EarlyStopping, Status};
use crate::error::{Error, Result};
use crate::hyperparameters::TrainingConfig;
use crate::optimizer::Optimizer;

/// One validation check of a training run
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationEvent {
    pub epoch: usize,
    /// 1-based position of the minibatch within its epoch
    pub minibatch: usize,
    pub num_minibatches: usize,
    pub iteration: usize,
    pub validation_error: f32,
    /// Present when `validation_error` was a new best
    pub test_error: Option<f32>,
    /// Patience budget after the check
    pub patience: usize,
}

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub best_validation_error: f32,
    /// Test error measured with the parameters of the best validation check
    pub best_test_error: f32,
    pub best_iteration: Option<usize>,
    pub epochs_run: usize,
    pub iterations: usize,
    pub elapsed_seconds: f64,
    pub stopped_early: bool,
    pub final_patience: usize,
    /// Cost of the last minibatch, measured before its update
    pub last_minibatch_cost: f32,
    pub history: Vec<ValidationEvent>,
    /// Snapshot of the parameters at the best validation check
    pub best_classifier: Classifier,
}

impl TrainingReport {
    pub fn epochs_per_second(&self) -> f64 {
        if self.elapsed_seconds > 0.0 {
            self.epochs_run as f64 / self.elapsed_seconds
        } else {
            0.0
        }
    }
}

/// Minibatch SGD driven by patience-based early stopping
#[derive(Debug, Clone)]
pub struct Trainer {
    pub config: TrainingConfig,
    optimizer: Optimizer,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        let optimizer = Optimizer::new(config.learning_rate)?;
        Ok(Trainer { config, optimizer })
    }

    /// Trains a zero-initialized classifier sized from `dataset`.
    pub fn train(&self, dataset: &Dataset) -> Result<(Classifier, TrainingReport)> {
        let mut classifier = Classifier::new(dataset.n_features(), dataset.n_classes());
        let report = self.fit(&mut classifier, dataset)?;
        Ok((classifier, report))
    }

    /// Runs epochs of minibatch updates on `classifier` until early stopping
    /// triggers or `max_epochs` is reached.
    ///
    /// `classifier` is left with the parameters of the last update; the best
    /// ones are in [`TrainingReport::best_classifier`].
    pub fn fit(&self, classifier: &mut Classifier, dataset: &Dataset) -> Result<TrainingReport> {
        self.check_inputs(classifier, dataset)?;

        let config = &self.config;
        let batch_size = config.batch_size;
        let n_train_batches = num_batches(dataset.train.len(), batch_size);
        let validation_frequency = config.validation_frequency(n_train_batches);

        let mut early_stopping = EarlyStopping::from_config(config);
        let mut best_classifier = classifier.clone();
        let mut history = Vec::new();
        let mut epoch = 0;
        let mut iteration = 0;
        let mut last_minibatch_cost = f32::NAN;

        info!(
            "training {} parameters: {} minibatches of {} per epoch, validating every {}",
            classifier.parameter_count(),
            n_train_batches,
            batch_size,
            validation_frequency
        );
        let start = Instant::now();

        'epochs: while epoch < config.max_epochs {
            epoch += 1;

            for (minibatch_index, input, labels) in Minibatches::new(&dataset.train, batch_size) {
                last_minibatch_cost = self.optimizer.step(classifier, input, labels)?;
                iteration += 1;
                trace!("iteration {iteration}, minibatch cost {last_minibatch_cost}");

                if iteration % validation_frequency == 0 {
                    let validation_error = mean_batch_error(classifier, &dataset.valid, batch_size)?;
                    let observation = early_stopping.observe(iteration, validation_error, || {
                        mean_batch_error(&*classifier, &dataset.test, batch_size)
                    })?;

                    info!(
                        "epoch {}, minibatch {}/{}, validation error {:.6} %",
                        epoch,
                        minibatch_index + 1,
                        n_train_batches,
                        validation_error * 100.0
                    );
                    if observation.patience_extended {
                        debug!("patience extended to {}", early_stopping.patience);
                    }
                    if let Some(test_error) = observation.test_score {
                        best_classifier = classifier.clone();
                        info!(
                            "     epoch {}, minibatch {}/{}, test error of best model {:.6} %",
                            epoch,
                            minibatch_index + 1,
                            n_train_batches,
                            test_error * 100.0
                        );
                    }

                    history.push(ValidationEvent {
                        epoch,
                        minibatch: minibatch_index + 1,
                        num_minibatches: n_train_batches,
                        iteration,
                        validation_error,
                        test_error: observation.test_score,
                        patience: early_stopping.patience,
                    });
                }

                if early_stopping.check_patience(iteration) == Status::Stopped {
                    break 'epochs;
                }
            }
        }

        let elapsed_seconds = start.elapsed().as_secs_f64();
        let report = TrainingReport {
            best_validation_error: early_stopping.best_validation_loss,
            best_test_error: early_stopping.best_test_score,
            best_iteration: early_stopping.best_iteration,
            epochs_run: epoch,
            iterations: iteration,
            elapsed_seconds,
            stopped_early: early_stopping.is_stopped(),
            final_patience: early_stopping.patience,
            last_minibatch_cost,
            history,
            best_classifier,
        };

        info!(
            "optimization complete with best validation score of {:.6} %, with test performance {:.6} %",
            report.best_validation_error * 100.0,
            report.best_test_error * 100.0
        );
        info!(
            "ran for {} epochs ({} iterations) in {:.1}s, {:.3} epochs/sec",
            report.epochs_run,
            report.iterations,
            report.elapsed_seconds,
            report.epochs_per_second()
        );

        Ok(report)
    }

    fn check_inputs(&self, classifier: &Classifier, dataset: &Dataset) -> Result<()> {
        if dataset.n_features() != classifier.n_features {
            return Err(Error::ShapeMismatch {
                what: "dataset features",
                expected: classifier.n_features,
                got: dataset.n_features(),
            });
        }

        let batch_size = self.config.batch_size;
        for (name, split) in [
            ("train", &dataset.train),
            ("valid", &dataset.valid),
            ("test", &dataset.test),
        ] {
            split.check_labels(classifier.n_classes)?;
            if num_batches(split.len(), batch_size) == 0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} split has {} rows, fewer than one batch of {batch_size}",
                    split.len()
                )));
            }
        }
        Ok(())
    }
}

/// Mean of the per-batch error rates over the full batches of `split`.
pub fn mean_batch_error(classifier: &Classifier, split: &Split, batch_size: usize) -> Result<f32> {
    let batches = Minibatches::new(split, batch_size);
    let count = batches.len();
    if count == 0 {
        return Err(Error::InvalidConfig(format!(
            "split has {} rows, fewer than one batch of {batch_size}",
            split.len()
        )));
    }

    let mut total = 0.0f32;
    for (_, input, labels) in batches {
        total += classifier.error_rate(input, labels)?;
    }
    Ok(total / count as f32)
}
