//! Signal provider trait definitions.

use crate::error::StrategyError;
use crate::types::{BarSeries, SignalSeries};
use serde::{Deserialize, Serialize};

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// Descriptive summary of a provider, for listings and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSummary {
    /// Provider name
    pub name: String,
    /// Bars needed before the provider emits anything but holds
    pub warmup_period: usize,
    /// Effective parameters
    pub parameters: serde_json::Value,
}

/// Core signal provider trait.
///
/// A provider maps a bar series to one signal per bar. Implementations are
/// stateless: the same bars always yield the same signals, so a provider can
/// be shared between runs.
pub trait SignalProvider: Send + Sync {
    /// Get the unique name of this provider.
    fn name(&self) -> &str;

    /// Produce a signal for every bar.
    ///
    /// The result has the same length and timestamps as `bars`. Bars inside
    /// the warmup window, or where an input is undefined, are coded as hold.
    fn generate_signals(&self, bars: &BarSeries) -> Result<SignalSeries, StrategyError>;

    /// Get the warmup period (number of bars needed before non-hold signals).
    fn warmup_period(&self) -> usize;

    /// Effective parameters as JSON.
    fn parameters(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    /// Get a description of the provider.
    fn description(&self) -> &str {
        ""
    }

    /// Summary for monitoring.
    fn summary(&self) -> ProviderSummary {
        ProviderSummary {
            name: self.name().to_string(),
            warmup_period: self.warmup_period(),
            parameters: self.parameters(),
        }
    }
}
