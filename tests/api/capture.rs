use newsletter_signup::capture::{
    CaptureFlow, GatewayClient, Stage, FALLBACK_ERROR, INVALID_EMAIL,
};
use serde_json::json;
use wiremock::ResponseTemplate;

use crate::{helpers::TestServer, Provider};

#[tokio::test]
async fn capture_flow_subscribes_through_a_running_gateway() {
    let server = TestServer::run().await;
    server
        .mock_upsert(ResponseTemplate::new(201), Some(1))
        .await;
    let client = GatewayClient::new(&server.addr()).unwrap();
    let mut flow = CaptureFlow::new();

    flow.set_email_input("not-an-email");
    flow.submit_email();
    assert_eq!(Stage::CollectingEmail, flow.stage());
    assert_eq!(Some(INVALID_EMAIL), flow.error());

    flow.set_email_input("Ursula@Example.com");
    flow.submit_email();
    assert_eq!(Stage::CollectingName, flow.stage());
    flow.set_name_input("Ursula");

    assert_eq!(Stage::Succeeded, flow.submit(&client).await);
    assert!(!flow.message().unwrap().is_empty());
    let bodies = server.received_bodies("/contacts").await;
    assert_eq!("ursula@example.com", bodies[0]["email"]);
}

#[tokio::test]
async fn capture_flow_surfaces_gateway_errors_and_retries() {
    let server = TestServer::run().await;
    server
        .mock_upsert(
            ResponseTemplate::new(400).set_body_json(json!({
                "code": "invalid_parameter",
                "message": "Invalid list id",
            })),
            None,
        )
        .await;
    let client = GatewayClient::new(&server.addr()).unwrap();
    let mut flow = CaptureFlow::new();
    flow.set_email_input("ursula@example.com");
    flow.submit_email();
    flow.set_name_input("Ursula");

    assert_eq!(Stage::Failed, flow.submit(&client).await);
    assert_eq!(Some("Invalid list id"), flow.error());
    assert_eq!("Ursula", flow.name_input());
    assert!(flow.is_submit_enabled());

    server.provider_server.reset().await;
    server.mock_upsert(ResponseTemplate::new(201), None).await;

    assert_eq!(Stage::Succeeded, flow.submit(&client).await);
}

#[tokio::test]
async fn capture_flow_fails_with_a_fallback_when_the_gateway_is_down() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = GatewayClient::new(&format!("http://127.0.0.1:{port}")).unwrap();
    let mut flow = CaptureFlow::new();
    flow.set_email_input("ursula@example.com");
    flow.submit_email();
    flow.set_name_input("Ursula");

    assert_eq!(Stage::Failed, flow.submit(&client).await);
    assert_eq!(Some(FALLBACK_ERROR), flow.error());
    assert_eq!("Ursula", flow.name_input());
}
