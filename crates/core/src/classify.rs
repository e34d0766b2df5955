// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error classification and de-duplicated reporting.
//!
//! Every failure surfaced anywhere in the layer is turned into an
//! [`AppError`]: a categorized, severity-ranked record with free-form
//! context. The [`ErrorReporter`] logs those records through `tracing`,
//! suppressing identical repeats inside a time window, and fans them out to
//! registered observers.
//!
//! Category inference from message keywords is a fallback. Callers that know
//! the failure mode should pass it explicitly via [`ErrorOptions::category`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;

/// Broad failure category used for retry decisions and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Network,
    Authentication,
    Authorization,
    DataValidation,
    Api,
    Database,
    Rendering,
    Unknown,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Network => "network",
            Category::Authentication => "authentication",
            Category::Authorization => "authorization",
            Category::DataValidation => "data_validation",
            Category::Api => "api",
            Category::Database => "database",
            Category::Rendering => "rendering",
            Category::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How serious a classified error is. Maps onto a tracing level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The application cannot continue.
    Fatal,
    /// Functionality is impacted.
    Error,
    /// May lead to problems; current operation unaffected.
    Warning,
    /// Handled gracefully, recorded for information.
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Fatal => "fatal",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured, classified error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("[{category}] {message}")]
pub struct AppError {
    /// Human-readable message (defaults to the originating error's text).
    pub message: String,
    pub category: Category,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    /// Free-form context, sorted by key so fingerprints are stable.
    pub context: BTreeMap<String, Value>,
    pub retryable: bool,
    pub retry_attempts: u32,
    /// Set once a retry loop has given up and reported the failure.
    pub handled: bool,
    pub code: Option<String>,
    /// Display text of the originating failure.
    pub origin: String,
}

impl AppError {
    /// De-duplication key: `category:message:JSON(context)`.
    pub fn fingerprint(&self) -> String {
        let context = serde_json::to_string(&self.context).unwrap_or_default();
        format!("{}:{}:{}", self.category, self.message, context)
    }
}

/// Overrides applied when classifying an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorOptions {
    pub category: Option<Category>,
    pub severity: Option<Severity>,
    pub message: Option<String>,
    pub context: BTreeMap<String, Value>,
    pub retryable: Option<bool>,
    pub retry_attempts: u32,
    pub code: Option<String>,
}

impl ErrorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn maybe_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_context(mut self, context: &BTreeMap<String, Value>) -> Self {
        self.context
            .extend(context.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = Some(retryable);
        self
    }

    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Keyword sets checked in order; the first match wins.
const KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Network, &["network", "offline", "connection"]),
    (Category::Authorization, &["permission", "access", "not allowed"]),
    (Category::Authentication, &["auth", "login", "token"]),
    (Category::DataValidation, &["validation", "invalid"]),
    (Category::Api, &["api", "endpoint"]),
    (Category::Database, &["database", "firestore", "query"]),
    (Category::Rendering, &["render", "component"]),
];

/// Best-effort category inference from an error message.
pub fn infer_category(message: &str) -> Category {
    let lower = message.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Unknown)
}

/// Build an [`AppError`] from any displayable failure.
pub fn classify(error: &dyn fmt::Display, options: ErrorOptions) -> AppError {
    let origin = error.to_string();
    let category = options
        .category
        .unwrap_or_else(|| infer_category(&origin));

    AppError {
        message: options.message.unwrap_or_else(|| origin.clone()),
        category,
        severity: options.severity.unwrap_or(Severity::Error),
        timestamp: Utc::now(),
        context: options.context,
        retryable: options.retryable.unwrap_or(true),
        retry_attempts: options.retry_attempts,
        handled: false,
        code: options.code,
        origin,
    }
}

/// A failure that may know its own category and retryability.
///
/// Errors without an explicit category fall back to keyword inference.
pub trait Failure: fmt::Display {
    fn category(&self) -> Option<Category> {
        None
    }

    fn is_retryable(&self) -> bool {
        true
    }
}

impl Failure for crate::error::Error {
    fn category(&self) -> Option<Category> {
        Some(crate::error::Error::category(self))
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            crate::error::Error::Database(_) | crate::error::Error::Io(_)
        )
    }
}

impl Failure for String {}

impl Failure for std::io::Error {}

type Observer = Arc<dyn Fn(&AppError) + Send + Sync>;
type ObserverList = Mutex<Vec<(u64, Observer)>>;

/// Handle returned by [`ErrorReporter::register_observer`].
pub struct ObserverHandle {
    id: u64,
    observers: Weak<ObserverList>,
}

impl ObserverHandle {
    /// Stop receiving classified errors.
    pub fn unregister(self) {
        if let Some(observers) = self.observers.upgrade() {
            if let Ok(mut list) = observers.lock() {
                list.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

/// Logs classified errors, de-duplicating identical repeats.
pub struct ErrorReporter {
    dedup_window: Duration,
    recent: Mutex<HashMap<String, Instant>>,
    observers: Arc<ObserverList>,
    next_id: AtomicU64,
}

impl ErrorReporter {
    /// Default window during which identical errors are logged only once.
    pub const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_secs(60);

    pub fn new() -> Self {
        Self::with_dedup_window(Self::DEFAULT_DEDUP_WINDOW)
    }

    pub fn with_dedup_window(dedup_window: Duration) -> Self {
        ErrorReporter {
            dedup_window,
            recent: Mutex::new(HashMap::new()),
            observers: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Classify without logging.
    pub fn classify(&self, error: &dyn fmt::Display, options: ErrorOptions) -> AppError {
        classify(error, options)
    }

    /// Classify and log. The classified error is returned even when the
    /// log line is suppressed as a duplicate.
    pub fn log(&self, error: &dyn fmt::Display, options: ErrorOptions) -> AppError {
        self.report(classify(error, options))
    }

    /// Log an already classified error.
    pub fn report(&self, error: AppError) -> AppError {
        if self.is_duplicate(&error.fingerprint()) {
            tracing::trace!(category = %error.category, "suppressed duplicate error");
            return error;
        }

        emit(&error);

        // Snapshot so observers may register or unregister re-entrantly.
        let observers: Vec<Observer> = match self.observers.lock() {
            Ok(list) => list.iter().map(|(_, o)| Arc::clone(o)).collect(),
            Err(_) => Vec::new(),
        };
        for observer in observers {
            observer(&error);
        }

        error
    }

    /// Receive every non-suppressed classified error.
    pub fn register_observer<F>(&self, observer: F) -> ObserverHandle
    where
        F: Fn(&AppError) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut list) = self.observers.lock() {
            list.push((id, Arc::new(observer)));
        }
        ObserverHandle {
            id,
            observers: Arc::downgrade(&self.observers),
        }
    }

    /// Run `f`, logging a warning and returning `fallback` if it fails.
    pub fn safe_execute<T, E, F>(&self, f: F, fallback: T) -> T
    where
        E: fmt::Display,
        F: FnOnce() -> Result<T, E>,
    {
        match f() {
            Ok(value) => value,
            Err(e) => {
                self.log(
                    &e,
                    ErrorOptions::new()
                        .message("error in safe_execute")
                        .severity(Severity::Warning),
                );
                fallback
            }
        }
    }

    fn is_duplicate(&self, fingerprint: &str) -> bool {
        let now = Instant::now();
        let Ok(mut recent) = self.recent.lock() else {
            return false;
        };
        recent.retain(|_, seen| now.duration_since(*seen) < self.dedup_window);
        if recent.contains_key(fingerprint) {
            return true;
        }
        recent.insert(fingerprint.to_string(), now);
        false
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn emit(error: &AppError) {
    let context = serde_json::to_string(&error.context).unwrap_or_default();
    match error.severity {
        Severity::Fatal => tracing::error!(
            category = %error.category,
            retry_attempts = error.retry_attempts,
            context = %context,
            fatal = true,
            "{}",
            error.message
        ),
        Severity::Error => tracing::error!(
            category = %error.category,
            retry_attempts = error.retry_attempts,
            context = %context,
            "{}",
            error.message
        ),
        Severity::Warning => tracing::warn!(
            category = %error.category,
            retry_attempts = error.retry_attempts,
            context = %context,
            "{}",
            error.message
        ),
        Severity::Info => tracing::info!(
            category = %error.category,
            retry_attempts = error.retry_attempts,
            context = %context,
            "{}",
            error.message
        ),
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
