//! End-to-end resolution over UDP.
//!
//! Query → registry match → credential context → inventory search → answer

#[path = "../common/mod.rs"]
mod common;
use common::{write_domains, write_knife_file, StubInventory, TestServer};

use hickory_proto::op::{MessageType, OpCode, ResponseCode};
use hickory_proto::rr::RecordType;
use knife_dns_domain::{ConfigSource, DomainSettings, DomainsConfig, NodeRecord};
use std::net::Ipv4Addr;
use std::sync::Arc;

fn single_domain() -> ConfigSource {
    DomainsConfig::new()
        .with_domain("test", DomainSettings::new("/knife/test.rb"))
        .into()
}

fn two_domains() -> ConfigSource {
    DomainsConfig::new()
        .with_domain("test", DomainSettings::new("/knife/test.rb"))
        .with_domain("test2", DomainSettings::new("/knife/test2.rb"))
        .into()
}

/// Credential files are not read by these flows.
fn inventory() -> StubInventory {
    StubInventory::new()
        .with_nodes("role:test_role", &["1.1.1.1", "2.2.2.2", "3.3.3.3", "4.4.4.4"])
        .with_nodes("role:single", &["1.1.1.1"])
}

async fn start(source: ConfigSource, inventory: StubInventory) -> TestServer {
    TestServer::start(source, Arc::new(inventory), false).await
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_role_resolves_under_domain_and_bare_zone() {
    let dir = tempfile::tempdir().unwrap();
    let knife = dir.path().join("knife.rb");
    write_knife_file(&knife, &["node_name \"deploy\""]);
    let config = DomainsConfig::new().with_domain("test", DomainSettings::new(&knife));

    let server = start(config.into(), inventory()).await;
    let client = server.client();

    assert_eq!(client.resolve("single.test.chef.").await, Some(Ipv4Addr::new(1, 1, 1, 1)));
    assert_eq!(client.resolve("single.chef.").await, Some(Ipv4Addr::new(1, 1, 1, 1)));

    server.shutdown().await;
}

#[tokio::test]
async fn test_ordinal_suffix_selects_nth_node() {
    let dir = tempfile::tempdir().unwrap();
    let knife = dir.path().join("knife.rb");
    write_knife_file(&knife, &[]);
    let config = DomainsConfig::new().with_domain("test", DomainSettings::new(&knife));

    let server = start(config.into(), inventory()).await;
    let client = server.client();

    assert_eq!(client.resolve("test_role-3.test.chef.").await, Some(Ipv4Addr::new(3, 3, 3, 3)));
    assert_eq!(client.resolve("test_role-1.test.chef.").await, Some(Ipv4Addr::new(1, 1, 1, 1)));
    assert_eq!(client.resolve("test_role-5.test.chef.").await, None);

    server.shutdown().await;
}

#[tokio::test]
async fn test_response_header_and_answer_shape() {
    let dir = tempfile::tempdir().unwrap();
    let knife = dir.path().join("knife.rb");
    write_knife_file(&knife, &[]);
    let config = DomainsConfig::new().with_domain("test", DomainSettings::new(&knife));

    let server = start(config.into(), inventory()).await;
    let response = server
        .client()
        .exchange("test_role.test.chef.", RecordType::A)
        .await;

    assert_eq!(response.message_type(), MessageType::Response);
    assert_eq!(response.op_code(), OpCode::Query);
    assert!(response.authoritative());
    assert!(response.recursion_desired());
    assert_eq!(response.response_code(), ResponseCode::NoError);
    assert_eq!(response.answers().len(), 1);
    assert_eq!(response.answers()[0].ttl(), 60);
    assert_eq!(response.answers()[0].name().to_utf8(), "test_role.test.chef.");

    server.shutdown().await;
}

#[tokio::test]
async fn test_cloud_public_address_wins() {
    let dir = tempfile::tempdir().unwrap();
    let knife = dir.path().join("knife.rb");
    write_knife_file(&knife, &[]);
    let config = DomainsConfig::new().with_domain("test", DomainSettings::new(&knife));
    let inventory = StubInventory::new().with_records(
        "role:web",
        vec![NodeRecord::new("10.0.0.5").with_public_ipv4("54.1.2.3")],
    );

    let server = start(config.into(), inventory).await;

    assert_eq!(
        server.client().resolve("web.test.chef.").await,
        Some(Ipv4Addr::new(54, 1, 2, 3))
    );

    server.shutdown().await;
}

#[tokio::test]
async fn test_search_extra_is_combined_with_role() {
    let dir = tempfile::tempdir().unwrap();
    let knife = dir.path().join("knife.rb");
    write_knife_file(&knife, &[]);
    let config = DomainsConfig::new().with_domain(
        "test",
        DomainSettings::new(&knife).with_search_extra("chef_environment:staging"),
    );
    let inventory = Arc::new(
        StubInventory::new().with_nodes("(chef_environment:staging) AND role:web", &["7.7.7.7"]),
    );

    let server = TestServer::start(config.into(), inventory.clone(), false).await;

    assert_eq!(server.client().resolve("web.test.chef.").await, Some(Ipv4Addr::new(7, 7, 7, 7)));
    assert_eq!(
        inventory.expressions(),
        vec!["(chef_environment:staging) AND role:web".to_string()]
    );

    server.shutdown().await;
}

// ============================================================================
// Not found
// ============================================================================

#[tokio::test]
async fn test_bare_zone_is_not_found_with_two_domains() {
    let server = start(two_domains(), inventory()).await;

    assert_eq!(server.client().resolve("test_role.chef.").await, None);

    server.shutdown().await;
}

#[tokio::test]
async fn test_unknown_domain_and_deep_names_are_not_found() {
    let server = start(single_domain(), inventory()).await;
    let client = server.client();

    assert_eq!(client.resolve("test_role.other.chef.").await, None);
    assert_eq!(client.resolve("a.test_role.test.chef.").await, None);
    assert_eq!(client.resolve("test_role.example.com.").await, None);

    server.shutdown().await;
}

#[tokio::test]
async fn test_unreadable_credential_file_is_not_found() {
    let server = start(single_domain(), inventory()).await;

    assert_eq!(server.client().resolve("test_role.test.chef.").await, None);

    server.shutdown().await;
}

#[tokio::test]
async fn test_non_address_question_is_nxdomain() {
    let dir = tempfile::tempdir().unwrap();
    let knife = dir.path().join("knife.rb");
    write_knife_file(&knife, &[]);
    let config = DomainsConfig::new().with_domain("test", DomainSettings::new(&knife));

    let server = start(config.into(), inventory()).await;
    let response = server
        .client()
        .exchange("test_role.test.chef.", RecordType::AAAA)
        .await;

    assert_eq!(response.response_code(), ResponseCode::NXDomain);
    assert!(response.answers().is_empty());

    server.shutdown().await;
}

// ============================================================================
// Credential contexts
// ============================================================================

#[tokio::test]
async fn test_domain_env_reaches_credential_file_only() {
    const VAR: &str = "KNIFE_DNS_FLOW_NODE_ADDRESS";

    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("domains.yml");
    write_knife_file(
        &dir.path().join("a.rb"),
        &[format!("node_address ENV['{}']", VAR).as_str()],
    );
    write_knife_file(
        &dir.path().join("b.rb"),
        &[format!("node_address ENV['{}']", VAR).as_str()],
    );
    write_domains(
        &config_path,
        &[
            ("a", "a.rb", vec![(VAR, "9.9.9.9")]),
            ("b", "b.rb", vec![]),
        ],
    );

    let server = start(ConfigSource::File(config_path), inventory()).await;
    let client = server.client();

    assert_eq!(client.resolve("web.a.chef.").await, Some(Ipv4Addr::new(9, 9, 9, 9)));
    assert!(std::env::var(VAR).is_err());

    // b sees no override, so node_address is unset and the stub falls
    // back to its canned results.
    assert_eq!(client.resolve("test_role-2.b.chef.").await, Some(Ipv4Addr::new(2, 2, 2, 2)));
    assert!(std::env::var(VAR).is_err());

    server.shutdown().await;
}

#[tokio::test]
async fn test_stop_releases_the_port() {
    let server = start(single_domain(), inventory()).await;
    let addr = server.addr();

    server.shutdown().await;

    assert!(tokio::net::UdpSocket::bind(addr).await.is_ok());
}
