use super::{SubscriberEmail, SubscriberName};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub name: SubscriberName,
}
