use crate::prelude::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::OnceCell;
use url::Url;

/// Media type the hypervisor expects on `GET`/`PUT`/`POST` requests.
///
pub const VMREST_CONTENT_TYPE: &str = "application/vnd.vmware.vmw.rest-v1+json";

/// Error envelope the API attaches to non-2xx responses. The same shape is
/// reused by the API for some success payloads with `code == 0`, but the
/// transport only decodes it on failure statuses.
///
#[derive(Debug, Default, Deserialize)]
pub(crate) struct VmErrorPayload {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Single-request HTTP layer for the hypervisor REST API.
///
/// Attaches basic auth, sets the vendor media type, and classifies responses
/// by status code. The inner `reqwest::Client` is built lazily on first use,
/// with TLS verification disabled when `insecure` is set (the product ships
/// with a self-signed certificate on localhost).
///
pub struct HttpTransport {
    client: OnceCell<Client>,
    base_url: Url,
    user: String,
    password: SecretString,
    insecure: bool,
}

impl HttpTransport {
    /// Creates a new transport. The only failure mode is an unparsable base
    /// URL.
    ///
    /// # Arguments
    ///
    /// * `base_url`: Root of the REST API, e.g. `http://localhost:8697/api`.
    /// * `user`: Basic-auth user configured with `vmrest --config`.
    /// * `password`: Basic-auth password.
    /// * `insecure`: Accept self-signed TLS certificates.
    ///
    pub fn new(base_url: &str, user: &str, password: SecretString, insecure: bool) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())?;
        Ok(Self {
            client: OnceCell::new(),
            base_url,
            user: user.to_owned(),
            password,
            insecure,
        })
    }

    /// Lazily initializes and returns a reference to the `reqwest::Client`.
    ///
    async fn get_client(&self) -> Result<&Client> {
        self.client
            .get_or_try_init(|| async {
                Client::builder()
                    .use_rustls_tls()
                    .danger_accept_invalid_certs(self.insecure)
                    .build()
                    .map_err(Error::from)
            })
            .await
    }

    /// Joins the base URL with an endpoint path.
    ///
    fn request_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Performs one API call and classifies the response.
    ///
    /// # Arguments
    ///
    /// * `method`: HTTP method to use for the request.
    /// * `path`: Endpoint path relative to the base URL.
    /// * `body`: Optional request body; already serialized by the caller
    ///   because some endpoints take a bare string instead of JSON.
    ///
    /// # Returns
    ///
    /// The raw response body on `200`/`201`/`204` for the caller to decode.
    /// `409` and `500` decode the `{code, message}` envelope into a domain
    /// error, `404` synthesizes a "not found" error without touching the
    /// body, and any other status attempts the envelope decode, surfacing
    /// the decode failure itself if the body is not the expected shape.
    ///
    pub async fn call(&self, method: Method, path: &str, body: Option<String>) -> Result<String> {
        let client = self.get_client().await?;
        let url = self.request_url(path);

        let mut request = client
            .request(method.clone(), &url)
            .basic_auth(&self.user, Some(self.password.expose_secret()));
        request = if method == Method::GET || method == Method::PUT || method == Method::POST {
            request.header(CONTENT_TYPE, VMREST_CONTENT_TYPE)
        } else if method == Method::DELETE {
            request
        } else {
            request.header(CONTENT_TYPE, "application/json")
        };
        if let Some(body) = body {
            request = request.body(body);
        }

        tracing::debug!(target: "transport", %url, "Sending API request");
        let response = request.send().await?;
        let status = response.status();

        match status.as_u16() {
            200 | 201 | 204 => {
                tracing::debug!(target: "transport", %status, "API call completed");
                Ok(response.text().await?)
            }
            409 | 500 => {
                let envelope: VmErrorPayload = serde_json::from_str(&response.text().await?)?;
                tracing::debug!(
                    target: "transport",
                    %status,
                    code = envelope.code,
                    message = %envelope.message,
                    "API returned a domain error"
                );
                Err(Error::from_envelope(envelope.code, envelope.message))
            }
            404 => {
                // The body is typically empty here, so no decode attempt.
                tracing::debug!(target: "transport", %url, "Resource not found");
                Err(Error::NotFound(format!("resource at {path}")))
            }
            _ => {
                let envelope: VmErrorPayload = serde_json::from_str(&response.text().await?)?;
                tracing::debug!(
                    target: "transport",
                    %status,
                    code = envelope.code,
                    "Unexpected status with an error envelope"
                );
                Err(Error::from_envelope(envelope.code, envelope.message))
            }
        }
    }
}
