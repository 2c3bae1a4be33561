//! debounce.rs - Delayed, cancellable field validation for as-you-type checks.
//!
//! A [`DebouncedValidator`] owns at most one pending tokio task. Each call to
//! [`DebouncedValidator::validate`] aborts the pending task and schedules a
//! new one, so only the last value inside the delay window is evaluated. The
//! result reaches the caller through the callback only.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use std::sync::Arc;

use log::trace;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Duration, Instant};

use crate::rules::{evaluate_field, FieldError, Rule};

pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

pub type ValidationCallback = Arc<dyn Fn(Option<FieldError>) + Send + Sync>;

pub struct DebouncedValidator {
    rules: Arc<[Rule]>,
    delay: Duration,
    callback: ValidationCallback,
    pending: Option<JoinHandle<()>>,
}

impl DebouncedValidator {
    pub fn new<F>(rules: Vec<Rule>, callback: F) -> Self
    where
        F: Fn(Option<FieldError>) + Send + Sync + 'static,
    {
        Self {
            rules: rules.into(),
            delay: DEFAULT_DEBOUNCE_DELAY,
            callback: Arc::new(callback),
            pending: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules evaluation of `value` after the delay, replacing any pending
    /// evaluation. Must be called from within a tokio runtime.
    pub fn validate(&mut self, value: Option<&str>) {
        self.cancel();

        let deadline = Instant::now() + self.delay;
        let rules = Arc::clone(&self.rules);
        let callback = Arc::clone(&self.callback);
        let value = value.map(str::to_owned);

        self.pending = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            let result = evaluate_field(value.as_deref(), &rules);
            trace!("Debounced validation fired (failed: {}).", result.is_some());
            callback(result);
        }));
    }

    /// Drops the pending evaluation, if any, without invoking the callback.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for DebouncedValidator {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for DebouncedValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebouncedValidator")
            .field("rules", &self.rules)
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::messages;
    use crate::rules::NamedRule;
    use std::sync::Mutex;
    use tokio::time::sleep;

    type Calls = Arc<Mutex<Vec<Option<String>>>>;

    fn recorder() -> (Calls, impl Fn(Option<FieldError>) + Send + Sync + 'static) {
        let calls: Calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let callback = move |result: Option<FieldError>| {
            sink.lock().unwrap().push(result.map(|e| e.message().to_string()));
        };
        (calls, callback)
    }

    fn rules() -> Vec<Rule> {
        vec![NamedRule::Required.into(), NamedRule::Min(3).into()]
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_calls_collapse_to_last_value() {
        let (calls, callback) = recorder();
        let mut validator = DebouncedValidator::new(rules(), callback);

        validator.validate(Some("abcdef"));
        sleep(Duration::from_millis(100)).await;
        validator.validate(Some("abcd"));
        sleep(Duration::from_millis(100)).await;
        validator.validate(Some("ab"));
        assert!(validator.is_pending());

        sleep(Duration::from_millis(600)).await;

        assert_eq!(*calls.lock().unwrap(), vec![Some(messages::min_length(3))]);
        assert!(!validator.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_delay() {
        let (calls, callback) = recorder();
        let mut validator = DebouncedValidator::new(rules(), callback).with_delay(Duration::from_millis(200));

        validator.validate(None);
        sleep(Duration::from_millis(199)).await;
        assert!(calls.lock().unwrap().is_empty());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(*calls.lock().unwrap(), vec![Some(messages::REQUIRED.to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_suppress_callback() {
        let (calls, callback) = recorder();
        let mut validator = DebouncedValidator::new(rules(), callback);
        validator.validate(Some("x"));
        validator.cancel();
        assert!(!validator.is_pending());

        validator.validate(Some("y"));
        drop(validator);

        sleep(Duration::from_secs(2)).await;
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_calls_each_fire() {
        let (calls, callback) = recorder();
        let mut validator = DebouncedValidator::new(rules(), callback);

        validator.validate(Some("long enough"));
        sleep(Duration::from_millis(600)).await;
        validator.validate(Some(""));
        sleep(Duration::from_millis(600)).await;

        assert_eq!(
            *calls.lock().unwrap(),
            vec![None, Some(messages::REQUIRED.to_string())]
        );
    }
}
