use knife_dns_domain::{ConfigSource, ServerConfig};
use tracing::info;

pub fn load_config(
    port: u16,
    base_zone: &str,
    watch: bool,
    source: &ConfigSource,
) -> anyhow::Result<ServerConfig> {
    let config = ServerConfig::new(port)
        .with_base_zone(base_zone)
        .with_watch(watch);
    config.validate()?;

    info!(
        config_file = source
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "inline".to_string()),
        port = config.port,
        base_zone = %config.base_zone,
        watch = config.watch,
        "Configuration loaded"
    );

    Ok(config)
}
