use std::fmt;

use reqwest::header;
use serde::Serialize;
use tokio::time::sleep;

use crate::{
    retry::{backoff_delay, is_retryable_status},
    PntaError, PutRequest, Result, SendOptions,
};

#[derive(Clone, Debug, Default)]
/// Delivers JSON payloads via HTTP PUT with bounded exponential-backoff retry.
///
/// Each call is independent: attempts run sequentially and the outcome is
/// returned to that caller only.
pub struct Sender {
    http: reqwest::Client,
    options: SendOptions,
}

impl Sender {
    /// Creates a sender with default [`SendOptions`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies timeout and retry options to subsequent requests.
    pub fn with_options(mut self, opts: SendOptions) -> Self {
        self.options = opts;
        self
    }

    /// Reuses an existing `reqwest` client (and its connection pool).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }

    /// Prepares a [`PutRequest`] using this sender's options.
    pub fn request<B>(&self, url: &str, payload: &B) -> Result<PutRequest>
    where
        B: Serialize + fmt::Debug + ?Sized,
    {
        PutRequest::new(url, payload, &self.options)
    }

    /// Serializes `payload`, PUTs it to `url` and returns `success_value` on
    /// any 2xx response.
    ///
    /// Serialization and URL errors are returned before any network attempt.
    pub async fn send<B, T>(&self, url: &str, payload: &B, success_value: T) -> Result<T>
    where
        B: Serialize + fmt::Debug + ?Sized,
    {
        let request = self.request(url, payload)?;
        self.execute(&request, success_value).await
    }

    /// Runs the attempt loop for an already prepared request.
    ///
    /// Statuses 408, 429 and 5xx and transport failures are retried until
    /// the request's attempt cap is reached; any other non-2xx status ends
    /// the call immediately.
    pub async fn execute<T>(&self, request: &PutRequest, success_value: T) -> Result<T> {
        let max_attempts = request.max_attempts();
        let mut attempt = 1u32;
        loop {
            if attempt > 1 {
                self.wait_before_retry(request, attempt).await;
            }
            let is_last = attempt >= max_attempts;

            let response = self
                .http
                .put(request.url().clone())
                .header(header::CONTENT_TYPE, "application/json")
                .timeout(request.timeout())
                .body(request.body().to_vec())
                .send()
                .await;

            match response {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(success_value);
                    }

                    let status = status.as_u16();
                    if is_retryable_status(status) && !is_last {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(
                            url = %request.url(),
                            status,
                            attempt,
                            max_attempts,
                            retry_in_ms = next_delay_ms(request, attempt),
                            "server error, will retry"
                        );
                        attempt += 1;
                        continue;
                    }

                    // Only the terminal response's body is read. It is
                    // informational; an unreadable one is reported as empty.
                    let body = response.text().await.unwrap_or_default();

                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        url = %request.url(),
                        status,
                        attempt,
                        body = %body,
                        "server returned error status"
                    );
                    return Err(PntaError::Http { status, body });
                }
                Err(err) => {
                    if is_last {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            url = %request.url(),
                            attempts = attempt,
                            error = %err,
                            "network error, giving up"
                        );
                        return Err(PntaError::Network(err));
                    }

                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        url = %request.url(),
                        attempt,
                        max_attempts,
                        retry_in_ms = next_delay_ms(request, attempt),
                        error = %err,
                        "network error, will retry"
                    );
                    attempt += 1;
                }
            }
        }
    }

    /// Sleeps for the exponential backoff preceding `attempt`.
    async fn wait_before_retry(&self, request: &PutRequest, attempt: u32) {
        sleep(backoff_delay(request.backoff_base(), attempt)).await;
    }
}

#[cfg(feature = "tracing")]
fn next_delay_ms(request: &PutRequest, attempt: u32) -> u64 {
    backoff_delay(request.backoff_base(), attempt + 1).as_millis() as u64
}

#[cfg(test)]
mod tests {
    use crate::{Payload, PntaError, SendOptions, Sender, Value};

    #[test]
    fn with_options_replaces_defaults() {
        let opts = SendOptions {
            timeout_ms: 15_000,
            max_attempts: 1,
            retry_backoff_ms: 10,
        };
        let sender = Sender::new().with_options(opts.clone());
        assert_eq!(sender.options(), &opts);
    }

    #[tokio::test]
    async fn serialization_failure_skips_network() {
        // Port 9 (discard) is never contacted: encoding fails first.
        let payload = Payload::from([("ratio".to_owned(), Value::float(f64::NAN))]);
        let err = Sender::new()
            .send("http://127.0.0.1:9/", &payload, ())
            .await
            .expect_err("must fail");
        assert!(matches!(err, PntaError::Serialization { .. }));
    }
}
