use knife_dns_application::ports::{CredentialLoader, EnvironmentStore, InventorySearch};
use knife_dns_application::services::{ContextCache, DomainDirectory};
use knife_dns_application::use_cases::{ReloadConfigUseCase, ResolveHostnameUseCase};
use knife_dns_domain::{ConfigSource, DomainError, DomainRegistry, ServerConfig};
use knife_dns_infrastructure::dns::{DnsQueryServer, QueryHandler};
use knife_dns_infrastructure::inventory::ChefServerInventory;
use knife_dns_infrastructure::system::{KnifeFileLoader, ProcessEnvironment};
use knife_dns_jobs::{ConfigWatchJob, JobRunner};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

struct Running {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

/// Owns the query server and, when watching, the config watch job.
///
/// ```rust,ignore
/// let mut server = ResolverServer::new(ServerConfig::new(5300), path.into())?;
/// server.start().await?;
/// // ...
/// server.stop().await;
/// ```
pub struct ResolverServer {
    config: ServerConfig,
    source: ConfigSource,
    registry: DomainRegistry,
    /// Built on the first `start` and kept, so reloads survive a restart.
    directory: Option<Arc<DomainDirectory>>,
    loader: Arc<dyn CredentialLoader>,
    environment: Arc<dyn EnvironmentStore>,
    inventory: Arc<dyn InventorySearch>,
    running: Option<Running>,
}

impl ResolverServer {
    /// Loads and validates the domains; a missing or malformed configuration
    /// is returned here rather than at `start`.
    pub fn new(config: ServerConfig, source: ConfigSource) -> Result<Self, DomainError> {
        config.validate()?;
        let zone = config.base_zone_name()?;
        let domains = source.load()?;
        let registry = DomainRegistry::build(&domains, &zone)?;

        Ok(Self {
            config,
            source,
            registry,
            directory: None,
            loader: Arc::new(KnifeFileLoader::new()),
            environment: Arc::new(ProcessEnvironment::new()),
            inventory: Arc::new(ChefServerInventory::new()?),
            running: None,
        })
    }

    pub fn with_inventory(mut self, inventory: Arc<dyn InventorySearch>) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn with_credential_loader(mut self, loader: Arc<dyn CredentialLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_environment(mut self, environment: Arc<dyn EnvironmentStore>) -> Self {
        self.environment = environment;
        self
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Address of the bound endpoint while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|running| running.local_addr)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Bind the loopback endpoint and start serving. Starting a running
    /// server returns the existing address.
    pub async fn start(&mut self) -> Result<SocketAddr, DomainError> {
        if let Some(running) = &self.running {
            warn!(addr = %running.local_addr, "Resolver already running");
            return Ok(running.local_addr);
        }

        let directory = Arc::clone(self.directory.get_or_insert_with(|| {
            let contexts = Arc::new(ContextCache::new(
                Arc::clone(&self.loader),
                Arc::clone(&self.environment),
            ));
            Arc::new(DomainDirectory::new(self.registry.clone(), contexts))
        }));
        let resolver = Arc::new(ResolveHostnameUseCase::new(
            Arc::clone(&directory),
            Arc::clone(&self.inventory),
        ));
        let handler = Arc::new(QueryHandler::new(resolver));

        let shutdown = CancellationToken::new();
        let server = DnsQueryServer::bind(self.config.bind_address(), handler)
            .await?
            .with_cancellation(shutdown.clone());
        let local_addr = server.local_addr()?;

        let mut handles = vec![tokio::spawn(server.run())];

        match (self.config.watch, self.source.path()) {
            (true, Some(path)) => {
                let reload = Arc::new(ReloadConfigUseCase::new(
                    path,
                    self.config.base_zone_name()?,
                    Arc::clone(&directory),
                ));
                let job = ConfigWatchJob::new(reload)
                    .with_interval(self.config.poll_interval())
                    .with_cancellation(shutdown.clone());
                handles.extend(JobRunner::new().with_config_watch(job).start());
            }
            (true, None) => warn!("Watch requested for an inline configuration; ignoring"),
            (false, _) => {}
        }

        info!(
            addr = %local_addr,
            entries = directory.registry().len(),
            "Resolver started"
        );
        self.running = Some(Running {
            local_addr,
            shutdown,
            handles,
        });
        Ok(local_addr)
    }

    /// Stop serving and watching. Returns once both loops have ended and the
    /// endpoint is closed.
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        running.shutdown.cancel();
        for handle in running.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Background task ended abnormally");
            }
        }
        info!(addr = %running.local_addr, "Resolver stopped");
    }
}
