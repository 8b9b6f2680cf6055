//! Chained transforms: each successful output becomes the input of the next call.

use std::sync::Arc;
use tracing::{debug, instrument, warn};
use transform_client::TextTransformer;

#[derive(Clone)]
pub struct TransformationChain {
    transformer: Arc<dyn TextTransformer>,
}

impl TransformationChain {
    pub fn new(transformer: Arc<dyn TextTransformer>) -> Self {
        Self { transformer }
    }

    /// Runs one initial call plus up to `depth` chained calls and returns the successful outputs
    /// in call order.
    ///
    /// A failed initial call yields nothing. A chained call that comes back empty is skipped and
    /// the next call reuses the last successful output; a timeout or transport failure ends the
    /// chain, since the service is then unavailable. The result holds between 1 and `depth + 1`
    /// entries.
    #[instrument(skip_all, fields(model = %model, depth = depth))]
    pub async fn run(&self, initial: &str, model: &str, depth: u32) -> Vec<String> {
        let mut outputs = Vec::with_capacity(depth as usize + 1);
        let mut working = match self.transformer.transform(initial, model).await {
            Ok(text) => text,
            Err(e) if e.is_connectivity() => {
                warn!(error = %e, "initial transform failed");
                return outputs;
            }
            Err(e) => {
                debug!(error = %e, "initial transform returned nothing");
                return outputs;
            }
        };
        outputs.push(working.clone());

        for step in 1..=depth {
            match self.transformer.transform(&working, model).await {
                Ok(text) => {
                    outputs.push(text.clone());
                    working = text;
                }
                Err(e) if e.is_connectivity() => {
                    warn!(step, error = %e, "chained transform failed, chain stopped");
                    break;
                }
                Err(e) => debug!(step, error = %e, "chained transform returned nothing, skipping"),
            }
        }
        outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use transform_client::RpcError;

    /// Appends "!"; listed call numbers (0-based) time out or come back empty.
    struct Scripted {
        calls: AtomicUsize,
        fail_on: Vec<usize>,
        empty_on: Vec<usize>,
    }

    #[async_trait]
    impl TextTransformer for Scripted {
        async fn transform(&self, text: &str, _model: &str) -> Result<String, RpcError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.contains(&n) {
                Err(RpcError::Timeout(std::time::Duration::from_millis(1)))
            } else if self.empty_on.contains(&n) {
                Err(RpcError::Absent)
            } else {
                Ok(format!("{}!", text))
            }
        }
    }

    fn chain(fail_on: Vec<usize>) -> TransformationChain {
        scripted(fail_on, vec![])
    }

    fn scripted(fail_on: Vec<usize>, empty_on: Vec<usize>) -> TransformationChain {
        TransformationChain::new(Arc::new(Scripted {
            calls: AtomicUsize::new(0),
            fail_on,
            empty_on,
        }))
    }

    #[tokio::test]
    async fn test_all_steps_succeed() {
        let out = chain(vec![]).run("HI", "m", 2).await;
        assert_eq!(out, vec!["HI!", "HI!!", "HI!!!"]);
    }

    #[tokio::test]
    async fn test_depth_zero_single_call() {
        assert_eq!(chain(vec![]).run("x", "m", 0).await, vec!["x!"]);
    }

    #[tokio::test]
    async fn test_initial_failure_yields_nothing() {
        assert!(chain(vec![0]).run("x", "m", 3).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_step_is_skipped_and_chain_continues() {
        let out = scripted(vec![], vec![1]).run("HI", "m", 2).await;
        assert_eq!(out, vec!["HI!", "HI!!"]);
    }

    #[tokio::test]
    async fn test_timeout_mid_chain_stops_chain() {
        let out = chain(vec![1]).run("HI", "m", 2).await;
        assert_eq!(out, vec!["HI!"]);
    }
}
