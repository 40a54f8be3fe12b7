//! Page-cache invalidation hook called after every successful mutation.

use std::sync::Mutex;

use async_trait::async_trait;

#[async_trait]
pub trait Revalidator {
    async fn revalidate(&self, path: &str);
}

/// Logs each revalidated path.
#[derive(Debug, Default)]
pub struct TracingRevalidator;

#[async_trait]
impl Revalidator for TracingRevalidator {
    async fn revalidate(&self, path: &str) {
        tracing::info!(path, "revalidate");
    }
}

/// Keeps every revalidated path in call order.
#[derive(Debug, Default)]
pub struct RecordingRevalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingRevalidator {
    pub fn new() -> Self { Self::default() }

    pub fn paths(&self) -> Vec<String> {
        match self.paths.lock() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl Revalidator for RecordingRevalidator {
    async fn revalidate(&self, path: &str) {
        let mut g = match self.paths.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };

        g.push(path.to_string());
    }
}
