use std::path::PathBuf;

use clap::Parser;
use gateway_common::config::{default_working_dir, peer_url, read_discovery_file};
use gateway_common::AppError;

/// CLI flags layered over the `trusted_host_ip.txt` discovery file, the
/// same "flag first, file fallback" shape as the teacher's
/// `ProxyServerArgs` (`--router`/`--balance` overriding defaults).
#[derive(Parser, Debug, Clone)]
#[clap(name = "gatekeeper", version, about = "Public ingress for the SQL routing gateway.")]
pub struct GatekeeperArgs {
    #[clap(long, value_name = "PORT", default_value_t = 5000)]
    pub port: u16,
    #[clap(long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,
    #[clap(long, value_name = "HOST_OR_URL")]
    pub trusted_host_addr: Option<String>,
    #[clap(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
    #[clap(long, value_name = "SECS", default_value_t = 10)]
    pub upstream_timeout_secs: u64,
}

impl GatekeeperArgs {
    pub fn working_dir(&self) -> PathBuf {
        self.working_dir.clone().unwrap_or_else(default_working_dir)
    }

    pub fn log_level(&self) -> String {
        self.log_level.clone().unwrap_or_else(|| "info".to_string())
    }

    pub fn resolve_trusted_host(&self) -> Result<String, AppError> {
        if let Some(addr) = &self.trusted_host_addr {
            return Ok(peer_url(addr));
        }
        let host = read_discovery_file(&self.working_dir(), "trusted_host_ip.txt")?;
        Ok(peer_url(&host))
    }
}
