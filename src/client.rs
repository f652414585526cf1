use crate::{
    wire::{DeviceIdentifiers, IdentificationBody, MetadataBody, Platform},
    Payload, PntaError, PutRequest, Result, SendOptions, Sender,
};

/// Production PNTA backend.
pub const DEFAULT_BASE_URL: &str = "https://app.pnta.io";

const IDENTIFICATION_PATH: &str = "/api/v1/identification";
const METADATA_PATH: &str = "/api/v1/metadata";

/// Joins a base URL and an API path.
///
/// Example: `("https://app.pnta.io/", "/api/v1/metadata")` →
/// `"https://app.pnta.io/api/v1/metadata"`
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim().trim_end_matches('/'), path)
}

#[derive(Clone, Debug)]
/// Project-scoped client for the PNTA identification and metadata endpoints.
pub struct PntaClient {
    sender: Sender,
    base_url: String,
    project_id: String,
    platform: Platform,
}

impl PntaClient {
    /// Creates a client for `project_id` against [`DEFAULT_BASE_URL`].
    pub fn new(project_id: impl Into<String>, platform: Platform) -> Self {
        Self {
            sender: Sender::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            project_id: project_id.into(),
            platform,
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `PNTA_PROJECT_ID` — project identifier (required)
    /// - `PNTA_PLATFORM` — `android` or `ios` (required)
    /// - `PNTA_BASE_URL` — backend base URL (optional, defaults to
    ///   [`DEFAULT_BASE_URL`])
    ///
    /// Returns an error if a required variable is missing or empty.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pnta_http::PntaClient;
    ///
    /// let client = PntaClient::from_env().expect("missing PNTA_* env vars");
    /// ```
    pub fn from_env() -> std::result::Result<Self, String> {
        let project_id = std::env::var("PNTA_PROJECT_ID")
            .map_err(|_| "missing PNTA_PROJECT_ID environment variable".to_owned())?;
        let platform = std::env::var("PNTA_PLATFORM")
            .map_err(|_| "missing PNTA_PLATFORM environment variable".to_owned())?;
        if project_id.trim().is_empty() {
            return Err("PNTA_PROJECT_ID is set but empty".to_owned());
        }
        let platform = platform.parse::<Platform>()?;

        let client = Self::new(project_id.trim(), platform);
        match std::env::var("PNTA_BASE_URL") {
            Ok(base_url) if !base_url.trim().is_empty() => Ok(client.with_base_url(base_url)),
            _ => Ok(client),
        }
    }

    /// Points the client at a different backend.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Applies timeout and retry options.
    pub fn with_options(mut self, opts: SendOptions) -> Self {
        self.sender = self.sender.with_options(opts);
        self
    }

    /// Replaces the underlying sender.
    pub fn with_sender(mut self, sender: Sender) -> Self {
        self.sender = sender;
        self
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn identification_url(&self) -> String {
        endpoint_url(&self.base_url, IDENTIFICATION_PATH)
    }

    pub fn metadata_url(&self) -> String {
        endpoint_url(&self.base_url, METADATA_PATH)
    }

    /// Builds the identification PUT without sending it.
    pub fn identification_request(
        &self,
        device_token: &str,
        identifiers: &DeviceIdentifiers,
        metadata: &Payload,
    ) -> Result<PutRequest> {
        let device_token = self.validate(device_token)?;
        let body = IdentificationBody {
            project_id: self.project_id.trim(),
            identifier: device_token,
            identifiers,
            metadata,
            platform: self.platform,
        };
        self.sender.request(&self.identification_url(), &body)
    }

    /// Builds the metadata PUT without sending it.
    pub fn metadata_request(&self, device_token: &str, metadata: &Payload) -> Result<PutRequest> {
        let device_token = self.validate(device_token)?;
        let body = MetadataBody {
            project_id: self.project_id.trim(),
            identifier: device_token,
            metadata,
        };
        self.sender.request(&self.metadata_url(), &body)
    }

    /// Registers the device with the backend and returns its token.
    pub async fn identify(
        &self,
        device_token: &str,
        identifiers: &DeviceIdentifiers,
        metadata: &Payload,
    ) -> Result<String> {
        let request = self.identification_request(device_token, identifiers, metadata)?;
        self.sender
            .execute(&request, device_token.trim().to_owned())
            .await
    }

    /// Replaces the metadata stored for the device.
    pub async fn update_metadata(&self, device_token: &str, metadata: &Payload) -> Result<()> {
        let request = self.metadata_request(device_token, metadata)?;
        self.sender.execute(&request, ()).await
    }

    fn validate<'a>(&self, device_token: &'a str) -> Result<&'a str> {
        if self.project_id.trim().is_empty() {
            return Err(PntaError::InvalidArguments("project_id is empty".to_owned()));
        }
        let device_token = device_token.trim();
        if device_token.is_empty() {
            return Err(PntaError::InvalidArguments(
                "device token is empty".to_owned(),
            ));
        }
        Ok(device_token)
    }
}

#[cfg(test)]
mod tests {
    use super::{endpoint_url, PntaClient};
    use crate::{DeviceIdentifiers, Payload, Platform, PntaError, SendOptions};

    #[test]
    fn endpoint_url_trims_trailing_slash() {
        assert_eq!(
            endpoint_url("https://app.pnta.io/", "/api/v1/metadata"),
            "https://app.pnta.io/api/v1/metadata"
        );
    }

    #[test]
    fn default_urls_target_production() {
        let client = PntaClient::new("prj_1", Platform::Ios);
        assert_eq!(
            client.identification_url(),
            "https://app.pnta.io/api/v1/identification"
        );
        assert_eq!(client.metadata_url(), "https://app.pnta.io/api/v1/metadata");
    }

    #[test]
    fn options_flow_into_requests() {
        let client = PntaClient::new("prj_1", Platform::Android).with_options(SendOptions {
            timeout_ms: 15_000,
            max_attempts: 2,
            retry_backoff_ms: 5,
        });
        let request = client
            .metadata_request("tok", &Payload::new())
            .expect("must build");
        assert_eq!(request.max_attempts(), 2);
        assert_eq!(request.timeout().as_millis(), 15_000);
    }

    #[test]
    fn empty_project_id_is_invalid() {
        let client = PntaClient::new("  ", Platform::Android);
        let err = client
            .metadata_request("tok", &Payload::new())
            .expect_err("must fail");
        assert!(matches!(err, PntaError::InvalidArguments(_)));
    }

    #[test]
    fn empty_device_token_is_invalid() {
        let client = PntaClient::new("prj_1", Platform::Android);
        let err = client
            .identification_request(" ", &DeviceIdentifiers::default(), &Payload::new())
            .expect_err("must fail");
        assert_eq!(err.code(), "INVALID_ARGUMENTS");
    }
}
