use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use gateway_common::config::{default_working_dir, peer_url, read_discovery_file, read_discovery_list};
use gateway_common::AppError;

use crate::backend::BackendDirectory;

/// CLI flags layered over `manager_ip.txt`/`workers_ip.txt`. The comma-
/// separated `--replica-addrs` override mirrors the teacher's
/// `BackendConfigArgs::Backend { backend_addr }` "testing purposes" escape
/// hatch for supplying backends without discovery files on disk.
#[derive(Parser, Debug, Clone)]
#[clap(name = "proxy", version, about = "Classifies, routes, and dispatches SQL requests to MySQL executors.")]
pub struct ProxyArgs {
    #[clap(long, value_name = "PORT", default_value_t = 5000)]
    pub port: u16,
    #[clap(long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,
    #[clap(long, value_name = "HOST_OR_URL")]
    pub primary_addr: Option<String>,
    #[clap(long, value_name = "HOST_OR_URL,HOST_OR_URL,...")]
    pub replica_addrs: Option<String>,
    #[clap(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
    #[clap(long, value_name = "SECS", default_value_t = 10)]
    pub upstream_timeout_secs: u64,
    #[clap(long, value_name = "MILLIS", default_value_t = 2000)]
    pub ping_timeout_millis: u64,
}

impl ProxyArgs {
    pub fn working_dir(&self) -> PathBuf {
        self.working_dir.clone().unwrap_or_else(default_working_dir)
    }

    pub fn log_level(&self) -> String {
        self.log_level.clone().unwrap_or_else(|| "info".to_string())
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_millis)
    }

    pub fn resolve_directory(&self) -> Result<BackendDirectory, AppError> {
        let primary = match &self.primary_addr {
            Some(addr) => peer_url(addr),
            None => peer_url(&read_discovery_file(&self.working_dir(), "manager_ip.txt")?),
        };
        let replicas: Vec<String> = match &self.replica_addrs {
            Some(csv) => csv.split(',').map(|s| peer_url(s.trim())).collect(),
            None => read_discovery_list(&self.working_dir(), "workers_ip.txt")?
                .into_iter()
                .map(|host| peer_url(&host))
                .collect(),
        };
        BackendDirectory::new(primary, replicas)
    }
}
