use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    configuration::ProviderConfig,
    domain::{NewSubscriber, SubscriberEmail},
};

/// Code the provider answers with when creating a contact that already exists.
const DUPLICATE_CONTACT: &str = "duplicate_parameter";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContactAttributes {
    #[serde(rename = "FIRSTNAME")]
    pub first_name: String,
}

impl From<&NewSubscriber> for ContactAttributes {
    fn from(subscriber: &NewSubscriber) -> Self {
        Self {
            first_name: subscriber.name.as_ref().to_owned(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error(
        "Contact provider answered {status}: {}",
        .message.as_deref().unwrap_or("no message")
    )]
    Rejected {
        status: StatusCode,
        code: Option<String>,
        message: Option<String>,
    },
    #[error("Failed to reach the contact provider")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to build a contact provider endpoint")]
    Endpoint(#[from] url::ParseError),
}

impl ProviderError {
    /// The human-readable message sent back by the provider, if any.
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref().filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }

    fn is_duplicate_contact(&self) -> bool {
        matches!(self, Self::Rejected { code: Some(code), .. } if code == DUPLICATE_CONTACT)
    }
}

/// What the subscription gateway needs from a contact-management provider.
///
/// `upsert_contact` must succeed whether or not a contact with that email
/// already exists.
#[async_trait]
pub trait ContactProvider: Send + Sync {
    async fn upsert_contact(
        &self,
        email: &SubscriberEmail,
        attributes: &ContactAttributes,
        list_id: u64,
    ) -> Result<(), ProviderError>;

    async fn send_template(
        &self,
        template_id: u64,
        recipient: &NewSubscriber,
    ) -> Result<(), ProviderError>;
}

/// HTTP client for a Brevo-compatible (v3) contacts and transactional email
/// API.
#[derive(Clone)]
pub struct ContactClient {
    http_client: reqwest::Client,
    base_url: Url,
    api_key: Secret<String>,
}

impl ContactClient {
    pub fn new(
        base_url: Url,
        api_key: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }

    /// `Ok(None)` when no API key is configured.
    pub fn from_config(config: &ProviderConfig) -> Result<Option<Self>, reqwest::Error> {
        config
            .api_key()
            .map(|api_key| Self::new(config.base_url.clone().into(), api_key, config.timeout))
            .transpose()
    }

    async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<(), ProviderError> {
        let url = self.base_url.join(endpoint)?;
        let response = self
            .http_client
            .post(url)
            .header("api-key", self.api_key.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        Err(ProviderError::Rejected {
            status,
            code: body.code,
            message: body.message,
        })
    }
}

#[async_trait]
impl ContactProvider for ContactClient {
    #[tracing::instrument(
        name = "Upserting a contact with the provider",
        skip(self, attributes),
        fields(subscriber_email = %email)
    )]
    async fn upsert_contact(
        &self,
        email: &SubscriberEmail,
        attributes: &ContactAttributes,
        list_id: u64,
    ) -> Result<(), ProviderError> {
        let request_body = UpsertContactRequest {
            email: email.as_ref(),
            attributes,
            list_ids: [list_id],
            update_enabled: true,
        };
        match self.post("contacts", &request_body).await {
            Err(e) if e.is_duplicate_contact() => {
                tracing::info!("Contact already exists, keeping it subscribed");
                Ok(())
            }
            result => result,
        }
    }

    #[tracing::instrument(
        name = "Sending a templated message through the provider",
        skip(self, recipient),
        fields(subscriber_email = %recipient.email)
    )]
    async fn send_template(
        &self,
        template_id: u64,
        recipient: &NewSubscriber,
    ) -> Result<(), ProviderError> {
        let request_body = SendTemplateRequest {
            template_id,
            to: [Recipient {
                email: recipient.email.as_ref(),
                name: recipient.name.as_ref(),
            }],
            params: ContactAttributes::from(recipient),
        };
        self.post("smtp/email", &request_body).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpsertContactRequest<'a> {
    email: &'a str,
    attributes: &'a ContactAttributes,
    list_ids: [u64; 1],
    update_enabled: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendTemplateRequest<'a> {
    template_id: u64,
    to: [Recipient<'a>; 1],
    params: ContactAttributes,
}

#[derive(Serialize)]
struct Recipient<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Default, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}
