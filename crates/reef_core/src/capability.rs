//! One-shot asynchronous capability acquisition.

use std::future::Future;

use tokio::sync::OnceCell;

/// A once-per-process acquisition cell for an external capability.
///
/// The first caller runs the loader; concurrent callers coalesce onto that
/// single in-flight load and observe its outcome. The outcome is sticky in
/// both directions: a failed load is never retried, matching the
/// "placeholder until restart" recovery model.
pub struct CapabilityCell<T: Clone> {
    cell: OnceCell<Result<T, String>>,
}

impl<T: Clone> Default for CapabilityCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> CapabilityCell<T> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    pub async fn get_or_load<F, Fut>(&self, load: F) -> Result<T, String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        self.cell
            .get_or_init(|| async move { load().await.map_err(|err| format!("{err:#}")) })
            .await
            .clone()
    }

    /// The recorded outcome, if a load has completed.
    pub fn outcome(&self) -> Option<Result<T, String>> {
        self.cell.get().cloned()
    }
}
