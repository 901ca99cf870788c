//! Discrete trading signals aligned to bars.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::BarSeries;
use crate::error::TradingError;

/// Trading intent for one bar: sell (-1), hold (0) or buy (+1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Signal {
    Sell,
    #[default]
    Hold,
    Buy,
}

impl Signal {
    /// Integer encoding used at the provider boundary.
    pub fn value(self) -> i8 {
        match self {
            Signal::Sell => -1,
            Signal::Hold => 0,
            Signal::Buy => 1,
        }
    }
}

impl TryFrom<i8> for Signal {
    type Error = TradingError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Signal::Sell),
            0 => Ok(Signal::Hold),
            1 => Ok(Signal::Buy),
            other => Err(TradingError::InvalidInput(format!(
                "signal must be -1, 0 or 1, got {}",
                other
            ))),
        }
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.value()
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
            Signal::Buy => write!(f, "BUY"),
        }
    }
}

/// A signal stamped with the timestamp of the bar it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalPoint {
    pub timestamp: i64,
    pub signal: Signal,
}

/// Signals for every bar of a series, in bar order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalSeries {
    points: Vec<SignalPoint>,
}

impl SignalSeries {
    pub fn new(points: Vec<SignalPoint>) -> Self {
        Self { points }
    }

    /// Stamp `signals` with the timestamps of `bars`, index for index.
    pub fn for_bars(bars: &BarSeries, signals: Vec<Signal>) -> Result<Self, TradingError> {
        if signals.len() != bars.len() {
            return Err(TradingError::InvalidInput(format!(
                "{} signals for {} bars",
                signals.len(),
                bars.len()
            )));
        }
        let points = bars
            .iter()
            .zip(signals)
            .map(|(bar, signal)| SignalPoint {
                timestamp: bar.timestamp,
                signal,
            })
            .collect();
        Ok(Self { points })
    }

    /// Build from the raw integer encoding.
    pub fn from_values(bars: &BarSeries, values: &[i8]) -> Result<Self, TradingError> {
        let signals = values
            .iter()
            .map(|&v| Signal::try_from(v))
            .collect::<Result<Vec<_>, _>>()?;
        Self::for_bars(bars, signals)
    }

    /// A series that holds on every bar.
    pub fn hold(bars: &BarSeries) -> Self {
        Self {
            points: bars
                .iter()
                .map(|bar| SignalPoint {
                    timestamp: bar.timestamp,
                    signal: Signal::Hold,
                })
                .collect(),
        }
    }

    /// Check that this series lines up with `bars`: same length, same timestamps.
    pub fn ensure_aligned(&self, bars: &BarSeries) -> Result<(), TradingError> {
        if self.points.len() != bars.len() {
            return Err(TradingError::InvalidInput(format!(
                "{} signals for {} bars",
                self.points.len(),
                bars.len()
            )));
        }
        if let Some((i, (point, bar))) = self
            .points
            .iter()
            .zip(bars.iter())
            .enumerate()
            .find(|(_, (p, b))| p.timestamp != b.timestamp)
        {
            return Err(TradingError::InvalidInput(format!(
                "signal {} timestamp {} does not match bar timestamp {}",
                i, point.timestamp, bar.timestamp
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Signal> {
        self.points.get(index).map(|p| p.signal)
    }

    pub fn points(&self) -> &[SignalPoint] {
        &self.points
    }

    pub fn signals(&self) -> impl Iterator<Item = Signal> + '_ {
        self.points.iter().map(|p| p.signal)
    }

    /// Number of non-hold signals.
    pub fn active_count(&self) -> usize {
        self.signals().filter(|s| *s != Signal::Hold).count()
    }
}
