use crate::error::Result;
use crate::hyperparameters::TrainingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Stopped,
}

/// What a validation check changed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// The validation loss beat the best one so far
    pub new_best: bool,
    /// Patience grew because the improvement was significant
    pub patience_extended: bool,
    /// Test score of the new best, if any
    pub test_score: Option<f32>,
}

/// Patience-based early stopping.
///
/// Training may stop once the global iteration count reaches `patience`.
/// A validation loss below `best_validation_loss * improvement_threshold`
/// pushes patience out to `iteration * patience_increase`; smaller gains are
/// recorded as the new best without buying more iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct EarlyStopping {
    pub patience: usize,
    pub patience_increase: f32,
    pub improvement_threshold: f32,
    pub best_validation_loss: f32,
    pub best_test_score: f32,
    pub best_iteration: Option<usize>,
    status: Status,
}

impl EarlyStopping {
    pub fn new(initial_patience: usize, patience_increase: f32, improvement_threshold: f32) -> Self {
        EarlyStopping {
            patience: initial_patience,
            patience_increase,
            improvement_threshold,
            best_validation_loss: f32::INFINITY,
            best_test_score: 0.0,
            best_iteration: None,
            status: Status::Running,
        }
    }

    pub fn from_config(config: &TrainingConfig) -> Self {
        Self::new(
            config.initial_patience,
            config.patience_increase,
            config.improvement_threshold,
        )
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_stopped(&self) -> bool {
        self.status == Status::Stopped
    }

    /// Feeds one validation result taken at `iteration` (1-based).
    ///
    /// `test_score` runs only when `validation_loss` is a new best. An error
    /// from it leaves the controller untouched.
    pub fn observe<F>(
        &mut self,
        iteration: usize,
        validation_loss: f32,
        test_score: F,
    ) -> Result<Observation>
    where
        F: FnOnce() -> Result<f32>,
    {
        let mut observation = Observation {
            new_best: false,
            patience_extended: false,
            test_score: None,
        };

        if validation_loss < self.best_validation_loss {
            let score = test_score()?;

            if validation_loss < self.best_validation_loss * self.improvement_threshold {
                let extended = (iteration as f32 * self.patience_increase) as usize;
                if extended > self.patience {
                    self.patience = extended;
                    observation.patience_extended = true;
                }
            }

            self.best_validation_loss = validation_loss;
            self.best_test_score = score;
            self.best_iteration = Some(iteration);
            observation.new_best = true;
            observation.test_score = Some(score);
        }

        self.check_patience(iteration);
        Ok(observation)
    }

    /// Stops once `iteration` has used up the patience budget. Once stopped, stays stopped.
    pub fn check_patience(&mut self, iteration: usize) -> Status {
        if iteration >= self.patience {
            self.status = Status::Stopped;
        }
        self.status
    }
}
