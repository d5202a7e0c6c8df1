use std::sync::Arc;

use serde::Deserialize;

use crate::{
    configuration::ProviderConfig,
    contact_client::{ContactAttributes, ContactProvider, ProviderError},
    domain::{NewSubscriber, SubscriberEmail, SubscriberName},
};

pub const SUBSCRIBED: &str = "Thanks for subscribing! Keep an eye on your inbox.";
const UNAVAILABLE: &str = "Newsletter signup is temporarily unavailable. Please try again later.";
const UPSTREAM_FALLBACK: &str = "Failed to subscribe to the newsletter. Please try again later.";

/// Raw signup payload. Both fields are optional here so that a missing field
/// is reported with the same error body as an empty one.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SubscribeBody {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error("Email and name are required")]
    MissingFields,
    #[error("{0}")]
    Validation(String),
    #[error("The contact provider API key is not configured")]
    NotConfigured,
    #[error("Failed to upsert the contact with the provider")]
    Provider(#[source] ProviderError),
}

impl SubscribeError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingFields | Self::Validation(_))
    }

    /// The message shown to the visitor. Configuration problems are not
    /// spelled out.
    pub fn public_message(&self) -> String {
        match self {
            Self::MissingFields | Self::Validation(_) => self.to_string(),
            Self::NotConfigured => UNAVAILABLE.to_string(),
            Self::Provider(e) => e.provider_message().unwrap_or(UPSTREAM_FALLBACK).to_string(),
        }
    }
}

impl TryFrom<SubscribeBody> for NewSubscriber {
    type Error = SubscribeError;

    fn try_from(body: SubscribeBody) -> Result<Self, Self::Error> {
        let non_blank = |field: Option<String>| field.filter(|v| !v.trim().is_empty());
        let (email, name) = match (non_blank(body.email), non_blank(body.name)) {
            (Some(email), Some(name)) => (email, name),
            _ => return Err(SubscribeError::MissingFields),
        };
        let email = SubscriberEmail::try_from(email).map_err(SubscribeError::Validation)?;
        let name = SubscriberName::try_from(name).map_err(SubscribeError::Validation)?;
        Ok(NewSubscriber { email, name })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GatewaySettings {
    pub list_id: u64,
    pub template_id: Option<u64>,
}

impl From<&ProviderConfig> for GatewaySettings {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            list_id: config.list_id,
            template_id: config.template_id,
        }
    }
}

/// Brokers signups between the site and the contact provider. It holds no
/// state of its own: the provider is the system of record.
pub struct SubscriptionGateway {
    provider: Option<Arc<dyn ContactProvider>>,
    settings: GatewaySettings,
}

impl SubscriptionGateway {
    /// `provider` is `None` when no credential is configured; every signup is
    /// then rejected with a server error.
    pub fn new(provider: Option<Arc<dyn ContactProvider>>, settings: GatewaySettings) -> Self {
        Self { provider, settings }
    }

    #[tracing::instrument(
        name = "Subscribing a contact",
        skip_all,
        fields(
            subscriber_email = %subscriber.email,
            subscriber_name = %subscriber.name,
        )
    )]
    pub async fn subscribe(
        &self,
        subscriber: &NewSubscriber,
    ) -> Result<&'static str, SubscribeError> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            tracing::error!("Rejecting signup: the contact provider API key is not configured");
            SubscribeError::NotConfigured
        })?;
        provider
            .upsert_contact(
                &subscriber.email,
                &ContactAttributes::from(subscriber),
                self.settings.list_id,
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Failed to upsert the contact"
                );
                SubscribeError::Provider(e)
            })?;
        if let Some(template_id) = self.settings.template_id {
            if let Err(e) = provider.send_template(template_id, subscriber).await {
                tracing::warn!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    template_id,
                    "Failed to send the welcome message. The contact stays subscribed"
                );
            }
        }
        Ok(SUBSCRIBED)
    }
}
