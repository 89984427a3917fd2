use logreg::{mean_batch_error, Classifier, Dataset, Error, Split, Trainer, TrainingConfig};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Points in [-1, 1]² labelled by the sign of `x1 + x2`, keeping a margin around the boundary.
fn separable_split(rng: &mut StdRng, rows: usize) -> Split {
    let mut features = Array2::zeros((rows, 2));
    let mut labels = Array1::zeros(rows);
    let mut i = 0;
    while i < rows {
        let x1: f32 = rng.random_range(-1.0..1.0);
        let x2: f32 = rng.random_range(-1.0..1.0);
        if (x1 + x2).abs() < 0.1 {
            continue;
        }
        features[[i, 0]] = x1;
        features[[i, 1]] = x2;
        labels[i] = usize::from(x1 + x2 > 0.0);
        i += 1;
    }
    Split::new(features, labels).unwrap()
}

fn separable_dataset(seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let train = separable_split(&mut rng, 400);
    let valid = separable_split(&mut rng, 100);
    let test = separable_split(&mut rng, 100);
    Dataset::new(train, valid, test).unwrap()
}

/// Three overlapping Gaussian blobs, so the validation error never reaches zero.
fn blob_dataset(seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0f32, 0.8).unwrap();
    let centers = [[1.0f32, 0.0], [-0.5, 0.9], [-0.5, -0.9]];

    let mut split = |rows: usize| {
        let mut features = Array2::zeros((rows, 2));
        let labels = Array1::from_shape_fn(rows, |i| i % 3);
        for i in 0..rows {
            let center = centers[labels[i]];
            features[[i, 0]] = center[0] + noise.sample(&mut rng);
            features[[i, 1]] = center[1] + noise.sample(&mut rng);
        }
        Split::new(features, labels).unwrap()
    };

    let train = split(600);
    let valid = split(150);
    let test = split(150);
    Dataset::new(train, valid, test).unwrap()
}

fn small_config() -> TrainingConfig {
    TrainingConfig {
        learning_rate: 0.1,
        max_epochs: 50,
        batch_size: 10,
        ..Default::default()
    }
}

#[test]
fn test_converges_on_separable_data() {
    init_logger();
    let dataset = separable_dataset(7);
    let trainer = Trainer::new(small_config()).unwrap();

    let (classifier, report) = trainer.train(&dataset).unwrap();

    // 50 epochs of 40 minibatches never exhaust the default patience
    assert_eq!(report.epochs_run, 50);
    assert_eq!(report.iterations, 2000);
    assert!(!report.stopped_early);

    let test_error = classifier
        .error_rate(dataset.test.features(), dataset.test.labels())
        .unwrap();
    assert!(test_error < 0.05, "test error {test_error}");
    assert!(report.best_validation_error < 0.05);
    assert!(report.best_test_error < 0.05);
    assert!(report.last_minibatch_cost.is_finite());
}

#[test]
fn test_validation_cadence_and_history() {
    let dataset = separable_dataset(11);
    let config = TrainingConfig {
        max_epochs: 3,
        ..small_config()
    };
    let trainer = Trainer::new(config).unwrap();

    let (_, report) = trainer.train(&dataset).unwrap();

    // min(40 batches, 5000 / 2) = one check per epoch, at its last minibatch
    assert_eq!(report.history.len(), 3);
    for (i, event) in report.history.iter().enumerate() {
        assert_eq!(event.epoch, i + 1);
        assert_eq!(event.minibatch, 40);
        assert_eq!(event.num_minibatches, 40);
        assert_eq!(event.iteration, 40 * (i + 1));
    }
    // the first check always beats an infinite best
    assert!(report.history[0].test_error.is_some());
}

#[test]
fn test_early_stopping_halts_at_patience() {
    init_logger();
    let dataset = blob_dataset(3);
    let config = TrainingConfig {
        learning_rate: 0.05,
        max_epochs: 1000,
        batch_size: 30,
        initial_patience: 40,
        ..Default::default()
    };
    let trainer = Trainer::new(config).unwrap();

    let (_, report) = trainer.train(&dataset).unwrap();

    assert!(report.stopped_early);
    assert!(report.epochs_run < 1000);
    assert!(report.iterations >= 40);
    // patience only grows to a multiple of a past iteration, so the loop
    // halts exactly when it is reached
    assert_eq!(report.iterations, report.final_patience);

    // validation every min(20, 40 / 2) = 20 minibatches
    assert!(report.history.iter().all(|e| e.iteration % 20 == 0));
    let best = report.best_iteration.unwrap();
    let best_event = report.history.iter().find(|e| e.iteration == best).unwrap();
    assert_eq!(best_event.validation_error, report.best_validation_error);
    assert_eq!(best_event.test_error, Some(report.best_test_error));
}

#[test]
fn test_best_classifier_reproduces_best_scores() {
    let dataset = blob_dataset(5);
    let config = TrainingConfig {
        learning_rate: 0.05,
        max_epochs: 20,
        batch_size: 30,
        ..Default::default()
    };
    let trainer = Trainer::new(config).unwrap();

    let (_, report) = trainer.train(&dataset).unwrap();

    let valid = mean_batch_error(&report.best_classifier, &dataset.valid, 30).unwrap();
    let test = mean_batch_error(&report.best_classifier, &dataset.test, 30).unwrap();
    assert_eq!(valid, report.best_validation_error);
    assert_eq!(test, report.best_test_error);
}

#[test]
fn test_training_is_deterministic() {
    let dataset = blob_dataset(9);
    let config = TrainingConfig {
        max_epochs: 10,
        batch_size: 25,
        ..small_config()
    };

    let (first, first_report) = Trainer::new(config.clone()).unwrap().train(&dataset).unwrap();
    let (second, second_report) = Trainer::new(config).unwrap().train(&dataset).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_report.best_classifier, second_report.best_classifier);
    assert_eq!(
        first_report.best_validation_error.to_bits(),
        second_report.best_validation_error.to_bits()
    );
    assert_eq!(
        first_report.best_test_error.to_bits(),
        second_report.best_test_error.to_bits()
    );
    assert_eq!(
        first_report.last_minibatch_cost.to_bits(),
        second_report.last_minibatch_cost.to_bits()
    );
    assert_eq!(first_report.history, second_report.history);
}

#[test]
fn test_rejects_bad_config_before_training() {
    let cases = vec![
        TrainingConfig { batch_size: 0, ..small_config() },
        TrainingConfig { learning_rate: -1.0, ..small_config() },
        TrainingConfig { max_epochs: 0, ..small_config() },
    ];

    for config in cases {
        assert!(matches!(Trainer::new(config), Err(Error::InvalidConfig(_))));
    }
}

#[test]
fn test_rejects_split_smaller_than_a_batch() {
    let dataset = separable_dataset(1);
    let trainer = Trainer::new(TrainingConfig {
        batch_size: 200,
        ..small_config()
    })
    .unwrap();
    let mut classifier = Classifier::new(2, 2);

    let result = trainer.fit(&mut classifier, &dataset);

    assert!(matches!(result, Err(Error::InvalidConfig(_))));
    assert_eq!(classifier, Classifier::new(2, 2));
}

#[test]
fn test_rejects_mismatched_classifier() {
    let dataset = separable_dataset(1);
    let trainer = Trainer::new(small_config()).unwrap();

    let mut too_wide = Classifier::new(3, 2);
    assert!(matches!(
        trainer.fit(&mut too_wide, &dataset),
        Err(Error::ShapeMismatch { .. })
    ));

    let mut too_few_classes = Classifier::new(2, 1);
    assert!(matches!(
        trainer.fit(&mut too_few_classes, &dataset),
        Err(Error::LabelOutOfRange { label: 1, n_classes: 1 })
    ));
}

#[test]
fn test_diverging_learning_rate_is_reported() {
    let features = Array2::from_elem((30, 1), 100.0);
    let labels = Array1::from_shape_fn(30, |i| usize::from(i % 3 == 2));
    let split = Split::new(features, labels).unwrap();
    let dataset = Dataset::new(split.clone(), split.clone(), split).unwrap();
    let trainer = Trainer::new(TrainingConfig {
        learning_rate: 10.0,
        max_epochs: 5,
        batch_size: 3,
        ..Default::default()
    })
    .unwrap();

    // the first update is large enough that the next minibatch assigns its
    // minority label a probability of exactly zero
    let result = trainer.train(&dataset);

    assert!(matches!(result, Err(Error::Numeric(_))));
}
