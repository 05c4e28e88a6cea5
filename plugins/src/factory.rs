use std::sync::Arc;
use std::time::Duration;

use agentflow_core::config::{AppConfig, OutputConfig, RetryConfig};
use agentflow_core::executor::traits::{FixedBackoff, OutputRendererPlugin, RetryStrategyPlugin};
use agentflow_core::executor::types::ExecutionOptions;
use agentflow_core::executor::ExecutionEngine;
use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::executor::{
    ExponentialBackoffPlugin, JsonlRendererPlugin, LinearRetryPlugin, TextRendererPlugin,
};

pub fn build_retry_strategy(cfg: &RetryConfig) -> Arc<dyn RetryStrategyPlugin> {
    match cfg.strategy.as_str() {
        "linear" => Arc::new(LinearRetryPlugin::new(cfg.clone())),
        "exponential-backoff" => Arc::new(ExponentialBackoffPlugin::new(cfg.clone())),
        // Anything else (validated configs only carry "fixed") waits a constant base delay.
        _ => Arc::new(FixedBackoff::new(Duration::from_millis(cfg.base_delay_ms))),
    }
}

/// `None` means events go to `tracing`.
pub fn build_renderer(cfg: &OutputConfig) -> Option<Arc<dyn OutputRendererPlugin>> {
    match cfg.format.as_str() {
        "jsonl" => Some(Arc::new(JsonlRendererPlugin::new(cfg.pretty_print))),
        "text" => Some(Arc::new(TextRendererPlugin::new(cfg.ascii_only))),
        _ => None,
    }
}

/// Assemble an engine from validated configuration.
pub fn build_engine(cfg: &AppConfig, cancel: CancellationToken) -> Result<ExecutionEngine> {
    cfg.validate()?;

    let mut builder = ExecutionEngine::builder(ExecutionOptions::from_config(cfg))
        .retry_strategy(build_retry_strategy(&cfg.retry))
        .cancellation_token(cancel);
    if let Some(renderer) = build_renderer(&cfg.output) {
        builder = builder.renderer(renderer);
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentflow_core::error::TaskError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_retry_strategy_by_name() {
        let mut cfg = RetryConfig::default();
        assert_eq!(build_retry_strategy(&cfg).name(), "fixed");

        cfg.strategy = "linear".to_string();
        assert_eq!(build_retry_strategy(&cfg).name(), "linear");

        cfg.strategy = "exponential-backoff".to_string();
        let strategy = build_retry_strategy(&cfg);
        assert_eq!(strategy.name(), "exponential-backoff");
        assert_eq!(
            strategy.next_delay(2, &TaskError::Failed("x".into())),
            Some(Duration::from_millis(2000))
        );
    }

    #[test]
    fn test_build_renderer_by_format() {
        let mut cfg = OutputConfig::default();
        assert!(build_renderer(&cfg).is_none());

        cfg.format = "jsonl".to_string();
        assert_eq!(build_renderer(&cfg).unwrap().format(), "jsonl");

        cfg.format = "text".to_string();
        assert_eq!(build_renderer(&cfg).unwrap().name(), "text-renderer");
    }

    #[test]
    fn test_build_engine_uses_config() {
        let cfg = AppConfig::from_toml_str(
            "[scheduler]\nconcurrency_limit = 3\ntask_timeout_ms = 750\n",
        )
        .unwrap();
        let token = CancellationToken::new();
        let engine = build_engine(&cfg, token.clone()).unwrap();

        assert_eq!(engine.options().concurrency_limit, 3);
        assert_eq!(engine.options().task_timeout, Duration::from_millis(750));
        token.cancel();
        assert!(engine.cancellation_token().is_cancelled());
    }

    #[test]
    fn test_build_engine_rejects_invalid_config() {
        let mut cfg = AppConfig::default();
        cfg.scheduler.task_timeout_ms = 0;
        assert!(build_engine(&cfg, CancellationToken::new()).is_err());
    }
}
