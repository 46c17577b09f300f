use std::time::Duration;

use futures::future::join_all;
use rand::Rng;
use strum_macros::Display;
use tokio::time::Instant;

use super::{host_of, BackendDirectory};

/// Client-selected read-routing policy (spec §3). Generalises the
/// teacher's `BackendRouterType`/`BackendLoadBalancerType`
/// (`strum_macros::EnumString`, error-on-unknown) to the "unknown always
/// normalises" rule this system needs — see `normalize` below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RoutingStrategy {
    #[strum(serialize = "round-robin")]
    RoundRobin,
    #[strum(serialize = "direct")]
    Direct,
    #[strum(serialize = "random")]
    Random,
    #[strum(serialize = "customized")]
    Customized,
}

impl RoutingStrategy {
    pub fn normalize(raw: &str) -> Self {
        match raw {
            "direct" => RoutingStrategy::Direct,
            "random" => RoutingStrategy::Random,
            "customized" => RoutingStrategy::Customized,
            _ => RoutingStrategy::RoundRobin,
        }
    }
}

/// The backend chosen for one request, plus the provenance string the
/// Proxy attaches to its response.
pub struct Selected {
    pub url: String,
    pub source: String,
}

pub fn select_write(dir: &BackendDirectory) -> Selected {
    Selected {
        url: dir.primary.clone(),
        source: "manager".to_string(),
    }
}

pub async fn select_read(
    dir: &BackendDirectory,
    client: &reqwest::Client,
    strategy: RoutingStrategy,
    ping_timeout: Duration,
) -> Selected {
    match strategy {
        RoutingStrategy::Direct => Selected {
            url: dir.primary.clone(),
            source: format!("{strategy} worker IP: {}", host_of(&dir.primary)),
        },
        RoutingStrategy::Random => {
            let idx = rand::thread_rng().gen_range(0..dir.replicas.len());
            let url = dir.replicas[idx].clone();
            Selected {
                source: format!("{strategy} worker IP: {}", host_of(&url)),
                url,
            }
        }
        RoutingStrategy::RoundRobin => {
            let url = dir.next_round_robin().to_string();
            Selected {
                source: format!("{strategy} worker IP: {}", host_of(&url)),
                url,
            }
        }
        RoutingStrategy::Customized => {
            let measurements = probe_replicas(client, &dir.replicas, ping_timeout).await;
            let best = pick_fastest(&measurements);
            let url = dir.replicas[best].clone();
            let rendered: Vec<String> = measurements
                .iter()
                .map(|ms| {
                    if ms.is_finite() {
                        format!("{ms:.1}ms")
                    } else {
                        "inf".to_string()
                    }
                })
                .collect();
            Selected {
                source: format!(
                    "{strategy} worker IP: {}, ping times: [{}]",
                    host_of(&url),
                    rendered.join(", ")
                ),
                url,
            }
        }
    }
}

/// Probes every replica's `/ping` concurrently under a shared per-probe
/// deadline; unreachable or non-200 replicas measure `+∞` (spec §4.3 /
/// §5). Grounded in the teacher's already-present `reqwest` dependency
/// (used there for control-plane calls, here for the health probe fleet).
async fn probe_replicas(client: &reqwest::Client, replicas: &[String], timeout: Duration) -> Vec<f64> {
    let probes = replicas.iter().map(|replica| {
        let client = client.clone();
        let url = format!("{replica}/ping");
        async move {
            let start = Instant::now();
            match tokio::time::timeout(timeout, client.get(&url).send()).await {
                Ok(Ok(resp)) if resp.status().is_success() => {
                    start.elapsed().as_secs_f64() * 1000.0
                }
                _ => f64::INFINITY,
            }
        }
    });
    join_all(probes).await
}

/// Smallest measurement wins; ties (including the all-unreachable case)
/// broken by list order, matching Python's `min()` first-occurrence
/// tie-break in the original `proxy.py`.
fn pick_fastest(measurements: &[f64]) -> usize {
    let mut best_idx = 0;
    let mut best_val = measurements[0];
    for (idx, &value) in measurements.iter().enumerate().skip(1) {
        if value < best_val {
            best_idx = idx;
            best_val = value;
        }
    }
    best_idx
}
