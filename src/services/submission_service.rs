use crate::dto::submission_dto::SubmissionPayload;
use crate::error::{Error, Result};
use crate::utils::validation::endpoint_url;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

pub type GatewayFuture = Pin<Box<dyn Future<Output = Result<()>> + Send + 'static>>;

/// Persists a finished attempt. Calling `submit` starts the request; the
/// returned future resolves once the server has answered.
#[cfg_attr(test, mockall::automock)]
pub trait SubmissionGateway: Send + Sync {
    fn submit(&self, quiz_id: &str, token: &str, payload: &SubmissionPayload) -> GatewayFuture;
}

#[derive(Clone)]
pub struct HttpSubmissionGateway {
    client: Client,
    base_url: Url,
}

impl HttpSubmissionGateway {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn submit_url(&self, quiz_id: &str) -> Result<Url> {
        endpoint_url(&self.base_url, &["quizzes", quiz_id, "submit"])
    }
}

impl SubmissionGateway for HttpSubmissionGateway {
    fn submit(&self, quiz_id: &str, token: &str, payload: &SubmissionPayload) -> GatewayFuture {
        let client = self.client.clone();
        let url = self.submit_url(quiz_id);
        let token = token.to_string();
        let payload = payload.clone();

        Box::pin(async move {
            let url = url?;
            info!(attempt_id = %payload.attempt_id, %url, "sending submission");

            let response = client
                .post(url)
                .bearer_auth(token)
                .json(&payload)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                warn!(attempt_id = %payload.attempt_id, %status, "submission rejected");
                return Err(Error::Gateway {
                    status: status.as_u16(),
                    body,
                });
            }

            info!(attempt_id = %payload.attempt_id, %status, "submission saved");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_url_is_relative_to_the_base() {
        let gateway = HttpSubmissionGateway::new(
            Url::parse("https://api.example.com/v1/").unwrap(),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(
            gateway.submit_url("abc").unwrap().as_str(),
            "https://api.example.com/v1/quizzes/abc/submit"
        );
    }

    #[test]
    fn submit_url_stays_on_the_submit_path_for_odd_ids() {
        let gateway = HttpSubmissionGateway::new(
            Url::parse("https://api.example.com/v1/").unwrap(),
            Duration::from_secs(10),
        )
        .unwrap();
        for (quiz_id, path) in [
            ("a?b", "/v1/quizzes/a%3Fb/submit"),
            ("a#b", "/v1/quizzes/a%23b/submit"),
            ("../admin", "/v1/quizzes/..%2Fadmin/submit"),
        ] {
            let url = gateway.submit_url(quiz_id).unwrap();
            assert_eq!(url.path(), path);
            assert_eq!(url.query(), None);
            assert_eq!(url.fragment(), None);
        }
    }
}
