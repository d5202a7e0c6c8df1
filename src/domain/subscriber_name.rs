use unicode_segmentation::UnicodeSegmentation;

/// A display name, trimmed, non-empty and at most 256 graphemes long.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriberName(String);

impl std::fmt::Display for SubscriberName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for SubscriberName {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err("Name must not be empty".to_string())
        } else if trimmed.graphemes(true).count() > 256 {
            Err("Name must be at most 256 characters long".to_string())
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for SubscriberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
