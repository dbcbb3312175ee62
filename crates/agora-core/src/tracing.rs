use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize stdout tracing. Call once at service startup.
///
/// Filtering follows `RUST_LOG` and falls back to `info`. Output is JSON unless
/// `LOG_FORMAT=pretty` is set. Subsequent calls are silently ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let pretty = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("pretty"));

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if pretty {
        registry.with(fmt::layer()).try_init()
    } else {
        registry.with(fmt::layer().json()).try_init()
    };
}
