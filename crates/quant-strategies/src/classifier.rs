//! Trained price-direction classifier.
//!
//! Fitting and predicting are separate steps. [`DirectionModel::train`] fits
//! a logistic regression on windows of scaled bar features and returns an
//! immutable model; [`ClassifierStrategy`] wraps a trained model and only
//! predicts, so generating signals never mutates anything.
//!
//! Features per bar: close, volume, one-bar return, 20-bar volatility of
//! returns and 14-bar RSI. A sample is `sequence_length` consecutive feature
//! rows, labelled up when the close right after the window is above the
//! window's last close.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use quant_core::{
    error::StrategyError,
    traits::{Indicator, SignalProvider, StrategyConfig},
    types::{BarSeries, Signal, SignalSeries},
};
use quant_indicators::{pct_change, Rsi, StdDev};

use crate::into_signal_series;

/// Number of features per bar.
pub const FEATURE_COUNT: usize = 5;

const VOLATILITY_WINDOW: usize = 20;
const RSI_PERIOD: usize = 14;

/// Upper bound on `sequence_length`.
pub const MAX_SEQUENCE_LENGTH: usize = 10_000;
/// Upper bound on `epochs`.
pub const MAX_EPOCHS: usize = 100_000;

/// Configuration for the direction classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Feature rows per sample
    pub sequence_length: usize,
    /// Gradient descent passes over the training set
    pub epochs: usize,
    pub learning_rate: f64,
    /// Probability above which the model signals a buy; below `1 - threshold` it signals a sell
    pub prediction_threshold: f64,
    /// Leading share of the bars used for fitting
    pub train_fraction: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            sequence_length: 60,
            epochs: 50,
            learning_rate: 0.1,
            prediction_threshold: 0.55,
            train_fraction: 1.0,
        }
    }
}

impl StrategyConfig for ClassifierConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if !(1..=MAX_SEQUENCE_LENGTH).contains(&self.sequence_length) {
            return Err(StrategyError::InvalidParameter(format!(
                "sequence_length must be in [1, {MAX_SEQUENCE_LENGTH}], got {}",
                self.sequence_length
            )));
        }
        if !(1..=MAX_EPOCHS).contains(&self.epochs) {
            return Err(StrategyError::InvalidParameter(format!(
                "epochs must be in [1, {MAX_EPOCHS}], got {}",
                self.epochs
            )));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(StrategyError::InvalidParameter(
                "learning_rate must be a positive number".into(),
            ));
        }
        if !(self.prediction_threshold > 0.5 && self.prediction_threshold < 1.0) {
            return Err(StrategyError::InvalidParameter(format!(
                "prediction_threshold must be in (0.5, 1), got {}",
                self.prediction_threshold
            )));
        }
        if !(self.train_fraction > 0.0 && self.train_fraction <= 1.0) {
            return Err(StrategyError::InvalidParameter(format!(
                "train_fraction must be in (0, 1], got {}",
                self.train_fraction
            )));
        }
        Ok(())
    }
}

type FeatureRow = [f64; FEATURE_COUNT];

/// Raw feature rows aligned with `bars`; `None` until every feature is defined.
fn feature_rows(bars: &BarSeries) -> Result<Vec<Option<FeatureRow>>, StrategyError> {
    let closes = bars.closes();
    let volumes = bars.volumes();
    let returns = pct_change(&closes);

    let to_param = |e: quant_core::error::IndicatorError| StrategyError::InvalidParameter(e.to_string());
    let volatility = StdDev::new(VOLATILITY_WINDOW)
        .map_err(to_param)?
        .calculate_sparse(&returns);
    let rsi = Rsi::new(RSI_PERIOD).map_err(to_param)?.calculate(&closes);

    Ok((0..bars.len())
        .map(|i| match (returns[i], volatility[i], rsi[i]) {
            (Some(r), Some(v), Some(s)) => Some([closes[i], volumes[i], r, v, s]),
            _ => None,
        })
        .collect())
}

/// Per-feature min-max scaler fitted on training rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct MinMaxScaler {
    min: FeatureRow,
    max: FeatureRow,
}

impl MinMaxScaler {
    fn fit<'a>(rows: impl Iterator<Item = &'a FeatureRow>) -> Self {
        let mut min = [f64::INFINITY; FEATURE_COUNT];
        let mut max = [f64::NEG_INFINITY; FEATURE_COUNT];
        for row in rows {
            for k in 0..FEATURE_COUNT {
                min[k] = min[k].min(row[k]);
                max[k] = max[k].max(row[k]);
            }
        }
        Self { min, max }
    }

    fn transform(&self, row: &FeatureRow) -> FeatureRow {
        let mut scaled = [0.0; FEATURE_COUNT];
        for k in 0..FEATURE_COUNT {
            let range = self.max[k] - self.min[k];
            // Constant features scale to zero
            scaled[k] = if range > 0.0 {
                (row[k] - self.min[k]) / range
            } else {
                0.0
            };
        }
        scaled
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let exp_z = z.exp();
        exp_z / (1.0 + exp_z)
    }
}

/// Binary cross-entropy.
fn log_loss(labels: &[f64], predictions: &[f64]) -> f64 {
    let eps = 1e-15;
    let n = labels.len() as f64;
    -labels
        .iter()
        .zip(predictions)
        .map(|(&y, &p)| {
            let p = p.clamp(eps, 1.0 - eps);
            y * p.ln() + (1.0 - y) * (1.0 - p).ln()
        })
        .sum::<f64>()
        / n
}

/// Flatten the scaled window ending just before `end`, if every row is defined.
fn window_input(
    rows: &[Option<FeatureRow>],
    scaler: &MinMaxScaler,
    end: usize,
    len: usize,
) -> Option<Vec<f64>> {
    let mut input = Vec::with_capacity(len * FEATURE_COUNT);
    for row in &rows[end - len..end] {
        input.extend_from_slice(&scaler.transform(row.as_ref()?));
    }
    Some(input)
}

/// A fitted direction model. Immutable once trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionModel {
    sequence_length: usize,
    scaler: MinMaxScaler,
    weights: Vec<f64>,
    bias: f64,
    /// Number of training samples
    pub samples: usize,
    /// Log loss after the last epoch
    pub final_loss: f64,
}

impl DirectionModel {
    /// Bars needed before the first prediction can be made.
    pub fn warmup_period(sequence_length: usize) -> usize {
        VOLATILITY_WINDOW.saturating_add(sequence_length)
    }

    /// Fit on the leading `train_fraction` of `bars`.
    pub fn train(config: &ClassifierConfig, bars: &BarSeries) -> Result<Self, StrategyError> {
        config.validate()?;

        let train_len = ((bars.len() as f64) * config.train_fraction).ceil() as usize;
        let train_len = train_len.min(bars.len());
        let train_bars = bars.head(train_len);
        let rows = feature_rows(&train_bars)?;
        let closes = train_bars.closes();
        let len = config.sequence_length;

        // Windows [s, s + len) with a known next close at s + len
        let mut inputs = Vec::new();
        let mut labels = Vec::new();
        let scaler = MinMaxScaler::fit(rows.iter().flatten());
        for end in len..train_len {
            if let Some(input) = window_input(&rows, &scaler, end, len) {
                inputs.push(input);
                labels.push(if closes[end] > closes[end - 1] { 1.0 } else { 0.0 });
            }
        }

        if inputs.is_empty() {
            return Err(StrategyError::InsufficientData {
                required: Self::warmup_period(len).saturating_add(1),
                available: train_len,
            });
        }

        let n_samples = inputs.len() as f64;
        let n_features = len * FEATURE_COUNT;
        let mut weights = vec![0.0; n_features];
        let mut bias = 0.0;
        let mut final_loss = f64::NAN;

        for epoch in 0..config.epochs {
            let predictions: Vec<f64> = inputs
                .iter()
                .map(|x| sigmoid(dot(&weights, x) + bias))
                .collect();

            let mut dw = vec![0.0; n_features];
            let mut db = 0.0;
            for ((x, &p), &y) in inputs.iter().zip(&predictions).zip(&labels) {
                let error = p - y;
                for (g, &xi) in dw.iter_mut().zip(x) {
                    *g += error * xi;
                }
                db += error;
            }

            for (w, g) in weights.iter_mut().zip(&dw) {
                *w -= config.learning_rate * g / n_samples;
            }
            bias -= config.learning_rate * db / n_samples;

            final_loss = log_loss(&labels, &predictions);
            debug!(epoch, loss = final_loss, "classifier epoch");
        }

        if !final_loss.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(StrategyError::TrainingFailed(
                "gradient descent diverged".into(),
            ));
        }

        info!(
            samples = inputs.len(),
            train_bars = train_len,
            loss = final_loss,
            "Trained direction classifier"
        );

        Ok(Self {
            sequence_length: len,
            scaler,
            weights,
            bias,
            samples: inputs.len(),
            final_loss,
        })
    }

    /// Up-move probability for the bar at `end`, from the window just before it.
    fn probability(&self, rows: &[Option<FeatureRow>], end: usize) -> Option<f64> {
        if end < self.sequence_length {
            return None;
        }
        let input = window_input(rows, &self.scaler, end, self.sequence_length)?;
        Some(sigmoid(dot(&self.weights, &input) + self.bias))
    }

    /// Up-move probability for every bar; `None` where no full window precedes it.
    pub fn predict(&self, bars: &BarSeries) -> Result<Vec<Option<f64>>, StrategyError> {
        let rows = feature_rows(bars)?;
        Ok((0..bars.len()).map(|i| self.probability(&rows, i)).collect())
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Signal provider backed by a trained [`DirectionModel`].
#[derive(Debug, Clone)]
pub struct ClassifierStrategy {
    config: ClassifierConfig,
    model: DirectionModel,
}

impl ClassifierStrategy {
    /// Train a model on `bars` and wrap it.
    pub fn train(config: ClassifierConfig, bars: &BarSeries) -> Result<Self, StrategyError> {
        let model = DirectionModel::train(&config, bars)?;
        Ok(Self { config, model })
    }

    /// Wrap an already trained model.
    pub fn from_model(config: ClassifierConfig, model: DirectionModel) -> Result<Self, StrategyError> {
        config.validate()?;
        if model.sequence_length != config.sequence_length {
            return Err(StrategyError::InvalidParameter(format!(
                "model was trained with sequence_length {}, config has {}",
                model.sequence_length, config.sequence_length
            )));
        }
        Ok(Self { config, model })
    }

    pub fn model(&self) -> &DirectionModel {
        &self.model
    }
}

impl SignalProvider for ClassifierStrategy {
    fn name(&self) -> &str {
        "ml_classifier"
    }

    fn description(&self) -> &str {
        "Logistic direction classifier over windows of price, volume, return, volatility and RSI"
    }

    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalSeries, StrategyError> {
        let threshold = self.config.prediction_threshold;
        let signals = self
            .model
            .predict(bars)?
            .into_iter()
            .map(|p| match p {
                Some(p) if p > threshold => Signal::Buy,
                Some(p) if p < 1.0 - threshold => Signal::Sell,
                _ => Signal::Hold,
            })
            .collect();
        into_signal_series(bars, signals)
    }

    fn warmup_period(&self) -> usize {
        DirectionModel::warmup_period(self.config.sequence_length)
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }
}
