use clap::Parser;

/// Credentials are baked in per spec (`replica`/`replica_password`
/// against `sakila`), but are still exposed as overridable flags — the
/// same "fixed default, escape hatch for local runs/tests" shape as the
/// teacher's `TEST_BACKEND_ADDRS`.
#[derive(Parser, Debug, Clone)]
#[clap(name = "executor", version, about = "Runs validated queries against the local MySQL node.")]
pub struct ExecutorArgs {
    #[clap(long, value_name = "PORT", default_value_t = 5000)]
    pub port: u16,
    #[clap(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
    #[clap(long, value_name = "HOST", default_value = "localhost")]
    pub db_host: String,
    #[clap(long, value_name = "USER", default_value = "replica")]
    pub db_user: String,
    #[clap(long, value_name = "PASSWORD", default_value = "replica_password")]
    pub db_password: String,
    #[clap(long, value_name = "DATABASE", default_value = "sakila")]
    pub db_name: String,
}

impl ExecutorArgs {
    pub fn log_level(&self) -> String {
        self.log_level.clone().unwrap_or_else(|| "info".to_string())
    }

    pub fn db_opts(&self) -> mysql_async::Opts {
        mysql_async::OptsBuilder::default()
            .ip_or_hostname(self.db_host.clone())
            .user(Some(self.db_user.clone()))
            .pass(Some(self.db_password.clone()))
            .db_name(Some(self.db_name.clone()))
            .into()
    }
}
