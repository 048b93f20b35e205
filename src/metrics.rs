use std::net::SocketAddr;
use tracing::{info, warn};

pub const DEADLINES_TOTAL: &str = "cfp_deadlines_total";
pub const FETCH_DURATION_SECONDS: &str = "cfp_fetch_duration_seconds";
pub const RUN_DURATION_SECONDS: &str = "cfp_run_duration_seconds";

/// Installs the Prometheus exporter when `CFP_METRICS_PORT` is set.
/// Without it the `metrics` macros are no-ops.
pub fn init_metrics() {
    let Some(port) = std::env::var("CFP_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
    else {
        return;
    };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => info!("Prometheus exporter listening on http://{}/metrics", addr),
        Err(e) => warn!("Prometheus exporter install failed: {}", e),
    }
}
