//! Strategy registry for creating signal providers by name.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::debug;
use quant_core::{
    error::StrategyError,
    traits::{SentimentSource, SignalProvider, StrategyConfig},
    types::BarSeries,
};

use crate::{
    ClassifierConfig, ClassifierStrategy, MACrossoverConfig, MACrossoverStrategy,
    SentimentConfig, SentimentStrategy,
};

/// Information about a registered strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Registry key
    pub key: String,
    /// Alternative name accepted by [`StrategyRegistry::resolve`]
    pub alias: String,
    /// Strategy description
    pub description: String,
    /// Default configuration as JSON
    pub default_config: serde_json::Value,
}

/// Collaborators some strategies need at construction time.
#[derive(Clone, Default)]
pub struct StrategyContext<'a> {
    /// Bars available for fitting trained strategies
    pub training_bars: Option<&'a BarSeries>,
    /// Headline source for the sentiment strategy
    pub sentiment: Option<Arc<dyn SentimentSource>>,
}

impl<'a> StrategyContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_training_bars(mut self, bars: &'a BarSeries) -> Self {
        self.training_bars = Some(bars);
        self
    }

    pub fn with_sentiment(mut self, source: Arc<dyn SentimentSource>) -> Self {
        self.sentiment = Some(source);
        self
    }
}

/// Registry for available strategies.
pub struct StrategyRegistry {
    strategies: Vec<StrategyInfo>,
}

fn default_value<C: Serialize + Default>() -> serde_json::Value {
    serde_json::to_value(C::default()).unwrap_or_default()
}

/// Deserialize `params` into a strategy configuration and validate it.
///
/// `null` means all defaults.
fn parse_config<C>(params: serde_json::Value) -> Result<C, StrategyError>
where
    C: DeserializeOwned + StrategyConfig,
{
    let params = match params {
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => other,
    };
    let config: C =
        serde_json::from_value(params).map_err(|e| StrategyError::InvalidConfig(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

impl StrategyRegistry {
    /// Create a new strategy registry with all built-in strategies.
    pub fn new() -> Self {
        let strategies = vec![
            StrategyInfo {
                key: "ma_crossover".to_string(),
                alias: "MovingAverageCrossover".to_string(),
                description: "Long while the short moving average is above the long one"
                    .to_string(),
                default_config: default_value::<MACrossoverConfig>(),
            },
            StrategyInfo {
                key: "ml_classifier".to_string(),
                alias: "DirectionClassifier".to_string(),
                description: "Logistic classifier trained on windows of bar features"
                    .to_string(),
                default_config: default_value::<ClassifierConfig>(),
            },
            StrategyInfo {
                key: "sentiment".to_string(),
                alias: "Sentiment".to_string(),
                description: "Trades on the mean sentiment of recent news headlines".to_string(),
                default_config: default_value::<SentimentConfig>(),
            },
        ];

        Self { strategies }
    }

    /// List all available strategies.
    pub fn list(&self) -> &[StrategyInfo] {
        &self.strategies
    }

    /// Look up a strategy by key or alias (case-insensitive).
    pub fn resolve(&self, name: &str) -> Option<&StrategyInfo> {
        self.strategies
            .iter()
            .find(|s| s.key.eq_ignore_ascii_case(name) || s.alias.eq_ignore_ascii_case(name))
    }

    /// Check if a strategy exists.
    pub fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Get all strategy keys.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.key.as_str()).collect()
    }

    /// Create a strategy instance from JSON parameters.
    pub fn create(
        &self,
        name: &str,
        params: serde_json::Value,
        context: &StrategyContext<'_>,
    ) -> Result<Box<dyn SignalProvider>, StrategyError> {
        let info = self
            .resolve(name)
            .ok_or_else(|| StrategyError::NotFound(name.to_string()))?;
        debug!(strategy = %info.key, %params, "Creating strategy");

        match info.key.as_str() {
            "ma_crossover" => {
                let config: MACrossoverConfig = parse_config(params)?;
                Ok(Box::new(MACrossoverStrategy::new(config)?))
            }
            "ml_classifier" => {
                let config: ClassifierConfig = parse_config(params)?;
                let bars = context.training_bars.ok_or_else(|| {
                    StrategyError::InvalidConfig("ml_classifier needs bars to train on".into())
                })?;
                Ok(Box::new(ClassifierStrategy::train(config, bars)?))
            }
            "sentiment" => {
                let config: SentimentConfig = parse_config(params)?;
                let source = context.sentiment.clone().ok_or_else(|| {
                    StrategyError::InvalidConfig("sentiment needs a headline source".into())
                })?;
                Ok(Box::new(SentimentStrategy::new(config, source)?))
            }
            other => Err(StrategyError::NotFound(other.to_string())),
        }
    }

    /// Create a strategy with default configuration.
    pub fn create_default(
        &self,
        name: &str,
        context: &StrategyContext<'_>,
    ) -> Result<Box<dyn SignalProvider>, StrategyError> {
        self.create(name, serde_json::Value::Null, context)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
