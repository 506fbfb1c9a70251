use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::ExponentialBackoffBuilder;
use tracing::Instrument;
use travel_agent_model::{
    ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};

type SendRequestResult = Result<ModelResponse, Box<dyn ModelProviderError>>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(&ModelRequest) -> BoxedSendRequestFuture + Send + Sync>;

/// How model requests are retried after transient failures, such as rate
/// limiting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub initial_interval: Duration,
    /// Upper bound of the delay between two attempts.
    pub max_interval: Duration,
    /// Gives up once this much time has passed since the first attempt.
    pub max_elapsed_time: Duration,
}

impl RetryPolicy {
    /// A policy that never retries.
    #[inline]
    pub fn never() -> Self {
        Self {
            initial_interval: Duration::ZERO,
            max_interval: Duration::ZERO,
            max_elapsed_time: Duration::ZERO,
        }
    }

    fn to_backoff(self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_interval(self.max_interval)
            .with_max_elapsed_time(Some(self.max_elapsed_time))
            .build()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(10),
            max_elapsed_time: Duration::from_secs(60),
        }
    }
}

/// A wrapper around a model provider that provides a type-erased interface
/// for the other modules, and retries transient failures.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
    retry_policy: RetryPolicy,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.send_request(req);
            Box::pin(async move {
                fut.await.map_err(|err| {
                    Box::new(err) as Box<dyn ModelProviderError>
                })
            })
        });
        Self {
            handler_fn,
            retry_policy: RetryPolicy::default(),
        }
    }

    #[inline]
    pub fn set_retry_policy(&mut self, retry_policy: RetryPolicy) {
        self.retry_policy = retry_policy;
    }

    /// Sends a request and returns the response.
    ///
    /// Errors whose kind is transient are retried according to the retry
    /// policy; the last error is returned once the policy gives up.
    pub async fn send_request(&self, req: &ModelRequest) -> SendRequestResult {
        let operation = || {
            let fut = (self.handler_fn)(req);
            async move {
                fut.await.map_err(|err| {
                    if err.kind().is_transient() {
                        backoff::Error::transient(err)
                    } else {
                        backoff::Error::permanent(err)
                    }
                })
            }
        };
        let notify = |err: Box<dyn ModelProviderError>, after: Duration| {
            warn!("model request failed ({err}), retrying in {after:?}");
        };

        async move {
            trace!("got a request: {req:?}");
            let resp = backoff::future::retry_notify(
                self.retry_policy.to_backoff(),
                operation,
                notify,
            )
            .await;
            match &resp {
                Ok(_) => trace!("finished a request"),
                Err(err) => error!("got an error: {err:?}"),
            }
            resp
        }
        .instrument(trace_span!("model client req"))
        .await
    }
}
