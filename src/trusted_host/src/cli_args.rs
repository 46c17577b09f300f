use std::path::PathBuf;

use clap::Parser;
use gateway_common::config::{default_working_dir, peer_url, read_discovery_file};
use gateway_common::AppError;

#[derive(Parser, Debug, Clone)]
#[clap(name = "trusted_host", version, about = "SQL-surface validation tier of the routing gateway.")]
pub struct TrustedHostArgs {
    #[clap(long, value_name = "PORT", default_value_t = 5000)]
    pub port: u16,
    #[clap(long, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,
    #[clap(long, value_name = "HOST_OR_URL")]
    pub proxy_addr: Option<String>,
    #[clap(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
    #[clap(long, value_name = "SECS", default_value_t = 10)]
    pub upstream_timeout_secs: u64,
}

impl TrustedHostArgs {
    pub fn working_dir(&self) -> PathBuf {
        self.working_dir.clone().unwrap_or_else(default_working_dir)
    }

    pub fn log_level(&self) -> String {
        self.log_level.clone().unwrap_or_else(|| "info".to_string())
    }

    pub fn resolve_proxy(&self) -> Result<String, AppError> {
        if let Some(addr) = &self.proxy_addr {
            return Ok(peer_url(addr));
        }
        let host = read_discovery_file(&self.working_dir(), "proxy_ip.txt")?;
        Ok(peer_url(&host))
    }
}
