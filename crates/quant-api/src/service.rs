//! Request handling: data, strategy, engine, metrics.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use quant_backtest::{BacktestConfig, BacktestEngine, BacktestReport};
use quant_core::error::{StrategyError, TradingError, TradingResult};
use quant_core::traits::{DataSource, SentimentSource};
use quant_strategies::{StrategyContext, StrategyRegistry};

use crate::error::ApiError;
use crate::request::{BacktestRequest, BacktestResponse};

/// Runs backtest requests against a data source.
pub struct BacktestService<D: DataSource> {
    data: D,
    registry: StrategyRegistry,
    sentiment: Option<Arc<dyn SentimentSource>>,
}

impl<D: DataSource> BacktestService<D> {
    pub fn new(data: D) -> Self {
        Self {
            data,
            registry: StrategyRegistry::new(),
            sentiment: None,
        }
    }

    /// Headline source handed to the sentiment strategy.
    pub fn with_sentiment(mut self, source: Arc<dyn SentimentSource>) -> Self {
        self.sentiment = Some(source);
        self
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Run a request and keep the full report.
    ///
    /// Parameters are checked before any data is fetched.
    #[instrument(skip(self, request), fields(symbol = %request.symbol, strategy = %request.strategy))]
    pub async fn backtest(&self, request: &BacktestRequest) -> TradingResult<BacktestReport> {
        request.validate()?;
        let key = self
            .registry
            .resolve(&request.strategy)
            .map(|info| info.key.clone())
            .ok_or_else(|| StrategyError::NotFound(request.strategy.clone()))?;
        let config = BacktestConfig::new(request.initial_capital, request.commission);
        let engine = BacktestEngine::new(config)?;

        let bars = self
            .data
            .get_historical_bars(&request.symbol, request.start_date, request.end_date)
            .await?;
        info!(bars = bars.len(), source = self.data.name(), "Fetched bars");

        let mut context = StrategyContext::new().with_training_bars(&bars);
        if let Some(source) = &self.sentiment {
            context = context.with_sentiment(Arc::clone(source));
        }
        let provider = self.registry.create(
            &key,
            serde_json::Value::Object(request.params.clone()),
            &context,
        )?;

        let result = engine.run_strategy(&bars, provider.as_ref())?;
        Ok(BacktestReport::new(&request.symbol, key, config, result))
    }

    /// Run a request, mapping failures to stable error records.
    pub async fn handle(&self, request: &BacktestRequest) -> Result<BacktestResponse, ApiError> {
        match self.backtest(request).await {
            Ok(report) => Ok(BacktestResponse::from_result(
                &report.symbol,
                &report.strategy,
                &report.result,
            )),
            Err(err) => {
                let api = ApiError::from(err);
                if api.is_client_error() {
                    warn!(code = %api.code, message = %api.message, "Backtest request rejected");
                } else {
                    error!(code = %api.code, message = %api.message, "Backtest request failed");
                }
                Err(api)
            }
        }
    }

    /// JSON in, status and JSON out.
    pub async fn handle_json(&self, body: &str) -> (u16, String) {
        let outcome = match serde_json::from_str::<BacktestRequest>(body) {
            Ok(request) => self
                .handle(&request)
                .await
                .and_then(|response| serde_json::to_string(&response).map_err(internal)),
            Err(e) => Err(ApiError::from(TradingError::InvalidInput(e.to_string()))),
        };

        match outcome {
            Ok(json) => (200, json),
            Err(api) => {
                let body = serde_json::to_string(&api).unwrap_or_else(|_| api.message.clone());
                (api.status, body)
            }
        }
    }
}

fn internal(err: serde_json::Error) -> ApiError {
    ApiError::from(TradingError::Internal(err.to_string()))
}
