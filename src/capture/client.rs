use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::{SubscriptionApi, FALLBACK_ERROR};
use crate::{configuration::UrlWrapper, domain::NewSubscriber};

const DEFAULT_CONFIRMATION: &str = "You're subscribed!";

#[derive(Debug, thiserror::Error)]
pub enum GatewayClientError {
    #[error("{0}")]
    Rejected(String),
    #[error("Failed to reach the signup gateway")]
    Transport(#[from] reqwest::Error),
}

/// Calls `POST /api/subscribe` on a running signup gateway.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    http_client: reqwest::Client,
    endpoint: Url,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Result<Self, String> {
        let base_url: Url = UrlWrapper::try_from(base_url)?.into();
        let endpoint = base_url
            .join("api/subscribe")
            .map_err(|e| format!("Failed to build the signup endpoint: {e}"))?;
        Ok(Self {
            http_client: reqwest::Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[tracing::instrument(
        name = "Posting a signup to the gateway",
        skip(self, subscriber),
        fields(subscriber_email = %subscriber.email)
    )]
    pub async fn post_subscription(
        &self,
        subscriber: &NewSubscriber,
    ) -> Result<String, GatewayClientError> {
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&SubscribeRequest {
                email: subscriber.email.as_ref(),
                name: subscriber.name.as_ref(),
            })
            .send()
            .await?;
        let success = response.status().is_success();
        let reply = response.json::<Reply>().await.unwrap_or_default();
        if success {
            Ok(reply
                .message
                .unwrap_or_else(|| DEFAULT_CONFIRMATION.to_string()))
        } else {
            Err(GatewayClientError::Rejected(
                reply
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| FALLBACK_ERROR.to_string()),
            ))
        }
    }
}

#[async_trait]
impl SubscriptionApi for GatewayClient {
    async fn subscribe(&self, subscriber: &NewSubscriber) -> Result<String, String> {
        self.post_subscription(subscriber)
            .await
            .map_err(|e| match e {
                GatewayClientError::Rejected(message) => message,
                GatewayClientError::Transport(e) => {
                    tracing::warn!(
                        error.cause_chain = ?e,
                        error.message = %e,
                        "Signup gateway is unreachable"
                    );
                    FALLBACK_ERROR.to_string()
                }
            })
    }
}

#[derive(Serialize)]
struct SubscribeRequest<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Default, Deserialize)]
struct Reply {
    message: Option<String>,
    error: Option<String>,
}
