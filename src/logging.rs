use log::{error, info, warn};

/// Loads `.env`, defaults `RUST_LOG` to `info` and starts `env_logger`.
pub fn init() {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    let _ = env_logger::builder().format_target(false).try_init();
}

pub fn log_rejection(reason: &str) {
    error!("❌ Rejected: {}", reason);
}

pub fn log_step_failure(step: &str, reason: &dyn std::fmt::Display) {
    warn!("⚠️ {} failed, continuing: {}", step, reason);
}

pub fn log_success(msg: &str) {
    info!("✅ {}", msg);
}
