use std::time::Duration;

use reqwest::Url;
use secrecy::{ExposeSecret, Secret};
use serde::{de, Deserialize};
use serde_aux::field_attributes::{
    deserialize_number_from_string, deserialize_option_number_from_string,
};

/// Settings of the contact-management provider.
///
/// `api_key` and `template_id` are optional: without a key the signup
/// endpoint answers with a server error, without a template no welcome
/// message is sent.
#[derive(Clone, Debug, Deserialize)]
pub struct ProviderConfig {
    pub base_url: UrlWrapper,
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub list_id: u64,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub template_id: Option<u64>,
    #[serde(
        rename = "timeout_milliseconds",
        deserialize_with = "deserialize_timeout"
    )]
    pub timeout: Duration,
}

impl ProviderConfig {
    /// The credential, unless it is missing or blank.
    pub fn api_key(&self) -> Option<Secret<String>> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .cloned()
    }
}

/// A base URL that always ends with a `/`, so that relative endpoints
/// (`contacts`, `smtp/email`) are joined below it instead of replacing its
/// last path segment.
#[derive(Clone, Debug)]
pub struct UrlWrapper(Url);

impl TryFrom<&str> for UrlWrapper {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut url = Url::parse(value).map_err(|e| format!("{value} is not a valid URL: {e}"))?;
        if url.cannot_be_a_base() {
            return Err(format!("{value} cannot be used as a base URL"));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self(url))
    }
}

impl<'de> Deserialize<'de> for UrlWrapper {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Self::try_from(String::deserialize(deserializer)?.as_str()).map_err(de::Error::custom)
    }
}

impl From<UrlWrapper> for Url {
    fn from(value: UrlWrapper) -> Self {
        value.0
    }
}

fn deserialize_timeout<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let milliseconds: u64 = deserialize_number_from_string(deserializer)?;
    Ok(Duration::from_millis(milliseconds))
}
