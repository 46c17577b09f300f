use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Every peer in this system is assumed to serve on this port (spec §6).
pub const DEFAULT_PORT: u16 = 5000;

/// Reads a discovery file, trims trailing whitespace, and fails loudly if
/// it's missing — unlike the original Python services (which silently
/// logged "No files found." and kept running with an undefined peer), a
/// missing discovery file here is a startup error: a service cannot do
/// anything useful without knowing who it forwards to.
pub fn read_discovery_file(working_dir: &Path, file_name: &str) -> Result<String, AppError> {
    let path = working_dir.join(file_name);
    std::fs::read_to_string(&path)
        .map(|s| s.trim_end().to_string())
        .map_err(|e| AppError::Config(format!("reading {}: {e}", path.display())))
}

/// `workers_ip.txt` holds one or more replica hosts, whitespace-separated
/// on a single line.
pub fn read_discovery_list(working_dir: &Path, file_name: &str) -> Result<Vec<String>, AppError> {
    let contents = read_discovery_file(working_dir, file_name)?;
    let hosts: Vec<String> = contents.split_whitespace().map(str::to_string).collect();
    if hosts.is_empty() {
        return Err(AppError::Config(format!("{file_name} is empty")));
    }
    Ok(hosts)
}

/// Builds `http://<host>:5000` from a bare host/IP read out of a discovery
/// file, or from a CLI override that may already carry a scheme and port.
pub fn peer_url(host_or_url: &str) -> String {
    if host_or_url.starts_with("http://") || host_or_url.starts_with("https://") {
        host_or_url.to_string()
    } else {
        format!("http://{host_or_url}:{DEFAULT_PORT}")
    }
}

/// Default working directory for discovery files: the process's current
/// directory, matching the Python services' `open('some_ip.txt')` relative
/// reads.
pub fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}
