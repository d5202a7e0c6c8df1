mod capture;
mod health_check;

use async_trait::async_trait;
use helpers::TestServer;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

static FAILED_TO_EXECUTE: &str = "Failed to execute request";

static APPLICATION_JSON: &str = "application/json";

#[async_trait]
trait Api {
    async fn get_health_check(&self) -> Response;

    async fn post_subscribe(&self, body: serde_json::Value) -> Response;
    async fn post_subscribe_raw(&self, body: &'static str, content_type: &'static str)
        -> Response;
}

#[async_trait]
impl Api for TestServer {
    async fn get_health_check(&self) -> Response {
        Client::new()
            .get(health_check(&self.addr()))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE)
    }

    async fn post_subscribe(&self, body: serde_json::Value) -> Response {
        Client::new()
            .post(subscribe(&self.addr()))
            .json(&body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE)
    }

    async fn post_subscribe_raw(
        &self,
        body: &'static str,
        content_type: &'static str,
    ) -> Response {
        Client::new()
            .post(subscribe(&self.addr()))
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE)
    }
}

#[async_trait]
trait Provider {
    async fn mock_upsert(&self, response: ResponseTemplate, expect: Option<u64>);
    async fn mock_send_template(&self, response: ResponseTemplate, expect: Option<u64>);
    async fn received_bodies(&self, endpoint: &str) -> Vec<serde_json::Value>;
}

#[async_trait]
impl Provider for TestServer {
    async fn mock_upsert(&self, response: ResponseTemplate, expect: Option<u64>) {
        mock_provider("/contacts", response, expect)
            .mount(&self.provider_server)
            .await
    }

    async fn mock_send_template(&self, response: ResponseTemplate, expect: Option<u64>) {
        mock_provider("/smtp/email", response, expect)
            .mount(&self.provider_server)
            .await
    }

    async fn received_bodies(&self, endpoint: &str) -> Vec<serde_json::Value> {
        self.provider_server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.url.path() == endpoint)
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}

fn mock_provider(endpoint: &str, response: ResponseTemplate, expect: Option<u64>) -> Mock {
    let builder = Mock::given(path(endpoint))
        .and(method("POST"))
        .respond_with(response);
    if let Some(requests) = expect {
        builder.expect(requests)
    } else {
        builder
    }
}

fn health_check(base: &str) -> String {
    format!("{}/health_check", base)
}

fn subscribe(base: &str) -> String {
    format!("{}/api/subscribe", base)
}
