use crate::config::{ConfigVar, ConfigVarFinder};
use crate::constants::{API_VERSION, DEFAULT_ENDPOINT};
use crate::error::CloudError;
use crate::integrations::ManagementTransport;
use crate::utils::expand_tilde;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Identity, Method, StatusCode, header};
use tracing::{debug, error, warn};

use super::xml::parse_error_body;

/// reqwest-backed transport for the Service Management API, authenticated
/// with the subscription's management certificate.
pub struct AzureMethod {
    client: HttpClient,
    endpoint: String,
}

impl AzureMethod {
    pub fn from_config_vars(config_vars: &[ConfigVar]) -> Result<Self, CloudError> {
        let endpoint = config_vars
            .get_value("ENDPOINT")
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
            .to_string();

        let mut headers = header::HeaderMap::new();
        headers.insert("x-ms-version", header::HeaderValue::from_static(API_VERSION));

        let mut builder = HttpClient::builder().default_headers(headers);
        match (
            config_vars.get_value("CERTIFICATE_PATH"),
            config_vars.get_value("PRIVATE_KEY_PATH"),
        ) {
            (Some(certificate_path), Some(private_key_path)) => {
                let certificate = read_pem(certificate_path)?;
                let private_key = read_pem(private_key_path)?;
                let identity = match Identity::from_pkcs8_pem(&certificate, &private_key) {
                    Ok(identity) => identity,
                    Err(e) => {
                        error!("{:?}", e);
                        return Err(CloudError::Config(
                            "Failed to load the Azure management certificate".to_string(),
                        ));
                    }
                };
                builder = builder.identity(identity);
            }
            (None, None) => {
                warn!("No management certificate configured, requests will not be authenticated");
            }
            _ => {
                return Err(CloudError::Config(
                    "CERTIFICATE_PATH and PRIVATE_KEY_PATH must be set together".to_string(),
                ));
            }
        }

        let client = match builder.build() {
            Ok(client) => client,
            Err(e) => {
                error!("{:?}", e);
                return Err(CloudError::Config(
                    "Failed building Azure HTTP client".to_string(),
                ));
            }
        };

        Ok(Self { client, endpoint })
    }

    fn url(&self, account: &str, resource: &str) -> String {
        format!("{}/{}{}", self.endpoint, account, resource)
    }

    async fn error_from_response(status: StatusCode, response: reqwest::Response) -> CloudError {
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!("{:?}", e);
                String::new()
            }
        };
        let (code, message) = match parse_error_body(&body) {
            Some(parsed) => parsed,
            None => (
                status.canonical_reason().unwrap_or("Unknown").to_string(),
                body,
            ),
        };
        error!("Azure API returned error status {}: {} {}", status, code, message);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CloudError::Authentication {
                status: status.as_u16(),
                code,
                message,
            },
            _ => CloudError::Remote {
                status: status.as_u16(),
                code,
                message,
            },
        }
    }
}

fn read_pem(path: &str) -> Result<Vec<u8>, CloudError> {
    let path = expand_tilde(path);
    match std::fs::read(&path) {
        Ok(contents) => Ok(contents),
        Err(e) => {
            error!("{:?}", e);
            Err(CloudError::Config(format!("Unable to read '{}'", path)))
        }
    }
}

#[async_trait]
impl ManagementTransport for AzureMethod {
    async fn get_as_xml(&self, account: &str, resource: &str) -> Result<Option<String>, CloudError> {
        let url = self.url(account, resource);
        debug!("GET {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("{:?}", e);
                return Err(CloudError::Http(format!("Failed fetching {}", resource)));
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Self::error_from_response(status, response).await);
        }

        match response.text().await {
            Ok(body) if body.trim().is_empty() => Ok(None),
            Ok(body) => Ok(Some(body)),
            Err(e) => {
                error!("{:?}", e);
                Err(CloudError::Http("Unable to read HTTP response body".to_string()))
            }
        }
    }

    async fn invoke(
        &self,
        method: Method,
        account: &str,
        resource: &str,
        body: Option<&str>,
    ) -> Result<Option<String>, CloudError> {
        let url = self.url(account, resource);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/xml;charset=UTF-8")
                .body(body.to_string());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                error!("{:?}", e);
                return Err(CloudError::Http(format!("Failed calling {}", resource)));
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error_from_response(status, response).await);
        }

        let request_id = response
            .headers()
            .get("x-ms-request-id")
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        debug!("Azure accepted request {:?}", request_id);

        Ok(request_id)
    }
}

#[test]
fn test_partial_certificate_configuration_is_rejected() {
    let vars = vec![ConfigVar::new("CERTIFICATE_PATH", "/tmp/cert.pem")];
    assert!(matches!(
        AzureMethod::from_config_vars(&vars),
        Err(CloudError::Config(_))
    ));
}

#[test]
fn test_url_joins_endpoint_account_and_resource() {
    let vars = vec![ConfigVar::new("ENDPOINT", "https://management.example.test/")];
    let method = AzureMethod::from_config_vars(&vars).unwrap();
    assert_eq!(
        method.url("sub-1", "/services/images"),
        "https://management.example.test/sub-1/services/images"
    );
}
