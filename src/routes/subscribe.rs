use actix_web::{
    error::InternalError,
    http::StatusCode,
    web::{Data, Json, JsonConfig},
    HttpResponse, ResponseError,
};
use serde::Serialize;

use crate::{
    domain::NewSubscriber,
    gateway::{SubscribeBody, SubscribeError, SubscriptionGateway},
};

#[derive(Serialize)]
struct SubscribeResponse<'a> {
    success: bool,
    message: &'a str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.public_message(),
        })
    }
}

/// Answers unparsable bodies with the same `{ "error": ... }` shape as the
/// handler does.
pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("Invalid request body: {err}"),
        });
        InternalError::from_response(err, response).into()
    })
}

#[tracing::instrument(
    name = "Handling a newsletter signup",
    skip(body, gateway),
    fields(
        subscriber_email = ?body.email,
        subscriber_name = ?body.name,
    )
)]
pub async fn subscribe(
    Json(body): Json<SubscribeBody>,
    gateway: Data<SubscriptionGateway>,
) -> Result<HttpResponse, SubscribeError> {
    let subscriber: NewSubscriber = body.try_into().map_err(|e: SubscribeError| {
        tracing::warn!(error.message = %e, "Rejecting an invalid signup");
        e
    })?;
    let message = gateway.subscribe(&subscriber).await?;
    Ok(HttpResponse::Ok().json(SubscribeResponse {
        success: true,
        message,
    }))
}
