pub mod capture;
pub mod configuration;
pub mod contact_client;
pub mod domain;
pub mod gateway;
mod routes;
mod server;
pub mod telemetry;

pub use configuration::Config;
pub use contact_client::ContactClient;
pub use gateway::SubscriptionGateway;
pub use server::Server;
