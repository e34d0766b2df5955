// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded exponential-backoff retries that respect connectivity.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::classify::{AppError, Category, ErrorOptions, ErrorReporter, Failure, Severity};
use crate::config::RetryPolicy;
use crate::monitor::NetworkMonitor;
use crate::network::NetworkStatus;

type RetryCondition<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&AppError) + Send + Sync>;

/// Per-call retry settings.
pub struct RetryOptions<E> {
    pub policy: RetryPolicy,
    /// Overrides the error's own category.
    pub category: Option<Category>,
    pub context: BTreeMap<String, Value>,
    retry_condition: Option<RetryCondition<E>>,
    on_error: Option<ErrorCallback>,
}

impl<E> RetryOptions<E> {
    pub fn new(policy: RetryPolicy) -> Self {
        RetryOptions {
            policy,
            category: None,
            context: BTreeMap::new(),
            retry_condition: None,
            on_error: None,
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Extra predicate that must hold for a retry to be scheduled.
    pub fn retry_if<F>(mut self, condition: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.retry_condition = Some(Box::new(condition));
        self
    }

    /// Called once with the terminal classified error.
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&AppError) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }
}

impl<E> Default for RetryOptions<E> {
    fn default() -> Self {
        RetryOptions::new(RetryPolicy::default())
    }
}

/// Runs fallible async operations with retries.
pub struct RetryExecutor {
    monitor: Arc<NetworkMonitor>,
    reporter: Arc<ErrorReporter>,
}

impl RetryExecutor {
    pub fn new(monitor: Arc<NetworkMonitor>, reporter: Arc<ErrorReporter>) -> Self {
        RetryExecutor { monitor, reporter }
    }

    pub fn reporter(&self) -> &Arc<ErrorReporter> {
        &self.reporter
    }

    /// Run `operation`, retrying per `options`.
    ///
    /// Returns the last error from `operation` once no further retry is
    /// allowed. The wait before retry `n` is `initial_delay * 2^(n-1)`.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F, options: RetryOptions<E>) -> Result<T, E>
    where
        E: Failure,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut retries: u32 = 0;

        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let classified = self
                .reporter
                .classify(&error, self.error_options(&error, &options, retries));

            if self.should_retry(&error, &classified, retries, &options) {
                retries += 1;
                let delay = options.policy.delay_for(retries);
                let scheduled = format!(
                    "{} (retry {} of {} in {}ms)",
                    classified.message,
                    retries,
                    options.policy.max_retries,
                    delay.as_millis()
                );
                self.reporter.log(
                    &error,
                    self.error_options(&error, &options, retries)
                        .severity(Severity::Warning)
                        .message(scheduled),
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            let confirmed_offline = classified.category == Category::Network
                && self.monitor.status() == NetworkStatus::Offline;
            let severity = if confirmed_offline {
                Severity::Warning
            } else {
                Severity::Error
            };

            let mut terminal = classified;
            terminal.severity = severity;
            terminal.handled = true;
            let terminal = self.reporter.report(terminal);
            if let Some(callback) = &options.on_error {
                callback(&terminal);
            }
            return Err(error);
        }
    }

    fn error_options<E: Failure>(
        &self,
        error: &E,
        options: &RetryOptions<E>,
        retries: u32,
    ) -> ErrorOptions {
        ErrorOptions::new()
            .maybe_category(options.category.or_else(|| error.category()))
            .with_context(&options.context)
            .retryable(error.is_retryable())
            .retry_attempts(retries)
    }

    fn should_retry<E>(
        &self,
        error: &E,
        classified: &AppError,
        retries: u32,
        options: &RetryOptions<E>,
    ) -> bool {
        if retries >= options.policy.max_retries || !classified.retryable {
            return false;
        }
        if classified.category == Category::Network && !self.monitor.is_online() {
            tracing::debug!("not retrying network error while not online");
            return false;
        }
        options
            .retry_condition
            .as_ref()
            .is_none_or(|condition| condition(error))
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
