pub mod handler;
pub mod response_builder;
pub mod server;

pub use handler::QueryHandler;
pub use response_builder::ResponseBuilder;
pub use server::DnsQueryServer;
