use std::{net::TcpListener, sync::Arc};

use actix_web::{
    dev::Server as ActixServer,
    web::{get, post, Data},
    App, HttpServer,
};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use crate::{
    contact_client::ContactProvider,
    gateway::{GatewaySettings, SubscriptionGateway},
    routes::*,
    Config, ContactClient,
};

pub struct Server {
    port: u16,
    server: ActixServer,
}

impl Server {
    pub fn build(config: Config) -> anyhow::Result<Self> {
        let provider = ContactClient::from_config(&config.provider)
            .context("Failed to build the contact provider client")?
            .map(|client| Arc::new(client) as Arc<dyn ContactProvider>);
        if provider.is_none() {
            tracing::warn!("No contact provider API key configured, signups will be rejected");
        }
        let gateway = SubscriptionGateway::new(provider, GatewaySettings::from(&config.provider));
        let listener = TcpListener::bind(config.application.addr())
            .with_context(|| format!("Failed to bind {}", config.application.addr()))?;
        let port = listener.local_addr()?.port();
        tracing::info!(
            base_url = %config.application.base_url,
            port,
            "Serving newsletter signups"
        );
        let server = Self::http_server(listener, gateway)?;
        Ok(Self { port, server })
    }

    pub async fn run(self) -> std::io::Result<()> {
        self.server.await
    }

    fn http_server(
        listener: TcpListener,
        gateway: SubscriptionGateway,
    ) -> std::io::Result<ActixServer> {
        let gateway = Data::new(gateway);
        HttpServer::new(move || {
            App::new()
                .wrap(TracingLogger::default())
                .route("/health_check", get().to(health_check))
                .route("/api/subscribe", post().to(subscribe))
                .app_data(json_config())
                .app_data(gateway.clone())
        })
        .listen(listener)
        .map(|s| s.run())
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}
