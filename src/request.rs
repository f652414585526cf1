use std::fmt;
use std::time::Duration;

use reqwest::Url;
use serde::Serialize;

use crate::{encode::encode_body, PntaError, Result, SendOptions};

/// A fully prepared PUT: validated URL, encoded JSON body and retry limits.
///
/// Immutable once built. Encoding happens here so that a payload which
/// cannot be serialized never reaches the network.
#[derive(Clone, Debug)]
pub struct PutRequest {
    url: Url,
    body: Vec<u8>,
    timeout: Duration,
    max_attempts: u32,
    backoff_base: Duration,
}

impl PutRequest {
    /// Serializes `payload` and validates `url`, in that order.
    pub fn new<B>(url: &str, payload: &B, options: &SendOptions) -> Result<Self>
    where
        B: Serialize + fmt::Debug + ?Sized,
    {
        let body = encode_body(payload)?;
        let url = parse_url(url)?;
        Ok(Self {
            url,
            body,
            timeout: options.timeout(),
            max_attempts: options.attempt_cap(),
            backoff_base: options.backoff_base(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Encoded JSON object body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    let invalid = |message: String| PntaError::InvalidUrl {
        url: raw.to_owned(),
        message,
    };

    let url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}
