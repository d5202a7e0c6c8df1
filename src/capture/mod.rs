//! Two-step signup widget: the visitor first enters an email address, then a
//! display name, and only then is the signup gateway called.
//!
//! `CaptureFlow` is a plain state machine. It never performs I/O by itself:
//! `submit_name` hands out the request to send and `resolve` applies the
//! gateway's answer. `submit` glues both together around a `SubscriptionApi`.

mod client;

pub use client::{GatewayClient, GatewayClientError};

use async_trait::async_trait;

use crate::domain::{NewSubscriber, SubscriberEmail, SubscriberName};

pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
pub const FALLBACK_ERROR: &str = "Something went wrong. Please try again.";

/// Sends a completed capture to the signup gateway. `Ok` carries the
/// confirmation to display, `Err` the error message to display.
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    async fn subscribe(&self, subscriber: &NewSubscriber) -> Result<String, String>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    CollectingEmail,
    CollectingName,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum CaptureState {
    CollectingEmail {
        input: String,
        error: Option<String>,
    },
    CollectingName {
        email: SubscriberEmail,
        input: String,
        error: Option<String>,
    },
    Submitting {
        subscriber: NewSubscriber,
    },
    Succeeded {
        message: String,
    },
    /// The name prompt stays open: `input` is pre-filled with the submitted
    /// name so the visitor can retry as is.
    Failed {
        subscriber: NewSubscriber,
        input: String,
        error: String,
    },
}

impl Default for CaptureState {
    fn default() -> Self {
        Self::CollectingEmail {
            input: String::new(),
            error: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureFlow {
    state: CaptureState,
}

impl CaptureFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        match self.state {
            CaptureState::CollectingEmail { .. } => Stage::CollectingEmail,
            CaptureState::CollectingName { .. } => Stage::CollectingName,
            CaptureState::Submitting { .. } => Stage::Submitting,
            CaptureState::Succeeded { .. } => Stage::Succeeded,
            CaptureState::Failed { .. } => Stage::Failed,
        }
    }

    /// Ignored outside of the email step.
    pub fn set_email_input(&mut self, value: impl Into<String>) {
        if let CaptureState::CollectingEmail { input, error } = &mut self.state {
            *input = value.into();
            *error = None;
        }
    }

    /// Ignored unless the name prompt accepts input.
    pub fn set_name_input(&mut self, value: impl Into<String>) {
        match &mut self.state {
            CaptureState::CollectingName { input, error, .. } => {
                *input = value.into();
                *error = None;
            }
            CaptureState::Failed { input, .. } => *input = value.into(),
            _ => {}
        }
    }

    pub fn submit_email(&mut self) {
        let parsed = match &self.state {
            CaptureState::CollectingEmail { input, .. } => SubscriberEmail::try_from(input.clone()),
            _ => return,
        };
        self.state = match parsed {
            Ok(email) => CaptureState::CollectingName {
                email,
                input: String::new(),
                error: None,
            },
            Err(_) => CaptureState::CollectingEmail {
                input: self.email_input().to_owned(),
                error: Some(INVALID_EMAIL.to_string()),
            },
        };
    }

    /// Returns the request to send when the flow enters `Submitting`, and
    /// `None` otherwise. In particular a submit while a request is already in
    /// flight yields nothing.
    pub fn submit_name(&mut self) -> Option<NewSubscriber> {
        let (email, input) = match &self.state {
            CaptureState::CollectingName { email, input, .. } => (email.clone(), input.clone()),
            CaptureState::Failed {
                subscriber, input, ..
            } => (subscriber.email.clone(), input.clone()),
            _ => return None,
        };
        match SubscriberName::try_from(input.clone()) {
            Ok(name) => {
                let subscriber = NewSubscriber { email, name };
                self.state = CaptureState::Submitting {
                    subscriber: subscriber.clone(),
                };
                Some(subscriber)
            }
            Err(e) => {
                self.state = CaptureState::CollectingName {
                    email,
                    input,
                    error: Some(e),
                };
                None
            }
        }
    }

    /// Applies the gateway's answer. Ignored unless a request is in flight.
    pub fn resolve(&mut self, outcome: Result<String, String>) {
        let subscriber = match &self.state {
            CaptureState::Submitting { subscriber } => subscriber.clone(),
            _ => return,
        };
        self.state = match outcome {
            Ok(message) => CaptureState::Succeeded { message },
            Err(error) => {
                let error = if error.trim().is_empty() {
                    FALLBACK_ERROR.to_string()
                } else {
                    error
                };
                CaptureState::Failed {
                    input: subscriber.name.to_string(),
                    subscriber,
                    error,
                }
            }
        };
    }

    /// Submits the name step and, if that produced a request, sends it and
    /// applies the answer.
    pub async fn submit<A>(&mut self, api: &A) -> Stage
    where
        A: SubscriptionApi + ?Sized,
    {
        if let Some(subscriber) = self.submit_name() {
            let outcome = api.subscribe(&subscriber).await;
            self.resolve(outcome);
        }
        self.stage()
    }

    /// Closing the widget discards everything captured so far.
    pub fn close(&mut self) {
        self.state = CaptureState::default();
    }

    pub fn email_input(&self) -> &str {
        match &self.state {
            CaptureState::CollectingEmail { input, .. } => input.as_str(),
            _ => "",
        }
    }

    pub fn name_input(&self) -> &str {
        match &self.state {
            CaptureState::CollectingName { input, .. } | CaptureState::Failed { input, .. } => {
                input.as_str()
            }
            CaptureState::Submitting { subscriber } => subscriber.name.as_ref(),
            _ => "",
        }
    }

    pub fn email(&self) -> Option<&SubscriberEmail> {
        match &self.state {
            CaptureState::CollectingName { email, .. } => Some(email),
            CaptureState::Submitting { subscriber } | CaptureState::Failed { subscriber, .. } => {
                Some(&subscriber.email)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&SubscriberName> {
        match &self.state {
            CaptureState::Submitting { subscriber } | CaptureState::Failed { subscriber, .. } => {
                Some(&subscriber.name)
            }
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            CaptureState::CollectingEmail { error, .. }
            | CaptureState::CollectingName { error, .. } => error.as_deref(),
            CaptureState::Failed { error, .. } => Some(error.as_str()),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.state {
            CaptureState::Succeeded { message } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn is_name_prompt_open(&self) -> bool {
        matches!(
            self.stage(),
            Stage::CollectingName | Stage::Submitting | Stage::Failed
        )
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.stage() != Stage::Submitting
    }
}
