//! Executor abstraction: how scaled circuits are turned into numbers.

use std::future::Future;

use async_trait::async_trait;
use draper_ir::Circuit;

use crate::error::ZneResult;

/// Runs a circuit and returns an expectation value.
///
/// The mitigation driver is backend-agnostic: anything that can evaluate
/// a circuit to a single number can serve as an executor, whether that is
/// a local simulator, a remote device, or a lookup table in a test.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute the circuit and estimate the expectation value.
    async fn execute(&self, circuit: &Circuit) -> ZneResult<f64>;
}

/// Adapter turning an async closure into an [`Executor`].
pub struct FnExecutor<F>(F);

impl<F> FnExecutor<F> {
    /// Wrap a closure. The closure receives an owned clone of the circuit.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> Executor for FnExecutor<F>
where
    F: Fn(Circuit) -> Fut + Send + Sync,
    Fut: Future<Output = ZneResult<f64>> + Send,
{
    async fn execute(&self, circuit: &Circuit) -> ZneResult<f64> {
        (self.0)(circuit.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_executor() {
        let executor = FnExecutor::new(|circuit: Circuit| async move {
            Ok::<_, crate::error::ZneError>(circuit.gate_count() as f64)
        });

        let bell = Circuit::bell().unwrap();
        let value = executor.execute(&bell).await.unwrap();
        assert_eq!(value, 2.0);
    }
}
