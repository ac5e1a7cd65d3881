use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;
use wimp_core::redact::redact_secrets;
use wimp_core::{ApiError, ApiResult, AuthFailure};

/// Blocking HTTP access to the API root. Knows nothing about sessions; the
/// client passes credentials in as query parameters.
#[derive(Debug, Clone)]
pub(crate) struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| ApiError::Other {
            message: format!("invalid api base url {normalized:?}: {e}"),
        })?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Other {
                message: e.to_string(),
            })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Segments are percent-encoded individually, so ids can never escape
    /// their path position.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Other {
                message: format!("api base url {} cannot take a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = self.endpoint(segments)?;
        let request = self.client.get(url).query(query);
        self.execute(&segments.join("/"), request)
    }

    pub fn post_form<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        form: &[(&str, &str)],
    ) -> ApiResult<T> {
        let url = self.endpoint(segments)?;
        let request = self.client.post(url).query(query).form(form);
        self.execute(&segments.join("/"), request)
    }

    fn execute<T: DeserializeOwned>(&self, path: &str, request: RequestBuilder) -> ApiResult<T> {
        let request = request.build().map_err(|e| ApiError::Other {
            message: e.to_string(),
        })?;
        tracing::debug!(
            method = %request.method(),
            url = %redact_secrets(request.url().as_str()),
            "api request"
        );

        let response = self
            .client
            .execute(request)
            .map_err(|e| ApiError::Network {
                message: redact_secrets(&e.to_string()).into_owned(),
            })?;
        decode(path, response)
    }
}

fn decode<T: DeserializeOwned>(path: &str, response: Response) -> ApiResult<T> {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            tracing::warn!(endpoint = path, status = status.as_u16(), "api refused session");
            Err(ApiError::Unauthenticated(AuthFailure::Rejected {
                status: status.as_u16(),
            }))
        }
        s if !s.is_success() => {
            let body = response.text().unwrap_or_default();
            tracing::warn!(endpoint = path, status = s.as_u16(), body = %body, "api error");
            Err(ApiError::Http {
                status: s.as_u16(),
                endpoint: path.to_string(),
            })
        }
        _ => {
            let body = response.text().map_err(|e| ApiError::Network {
                message: e.to_string(),
            })?;
            serde_json::from_str(&body).map_err(|e| ApiError::Decode {
                endpoint: path.to_string(),
                message: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let transport =
            HttpTransport::new("http://localhost:1/v1", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.base_url().as_str(), "http://localhost:1/v1/");
        assert_eq!(
            transport.endpoint(&["albums", "5", "tracks"]).unwrap().as_str(),
            "http://localhost:1/v1/albums/5/tracks"
        );
    }

    #[test]
    fn path_ids_are_escaped() {
        let transport =
            HttpTransport::new("http://localhost:1/v1/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            transport.endpoint(&["albums", "5/../x?y"]).unwrap().as_str(),
            "http://localhost:1/v1/albums/5%2F..%2Fx%3Fy"
        );
    }

    #[test]
    fn garbage_base_url_is_rejected() {
        assert!(matches!(
            HttpTransport::new("not a url", Duration::from_secs(1)),
            Err(ApiError::Other { .. })
        ));
    }
}
