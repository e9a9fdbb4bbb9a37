//! Tracing initialisation for harnesses embedding traincheck.
//!
//! Oracles emit structured `tracing` events (`oracle.weights`,
//! `oracle.generated_accuracy`, ...). A harness that wants to see them
//! calls [`init_tracing`] once at startup; libraries never install a
//! subscriber themselves.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `level` is the default verbosity; the `RUST_LOG` environment variable
/// overrides it for fine-grained filtering. With `json = true`, log lines
/// are emitted as newline-delimited JSON for aggregation pipelines.
///
/// The global subscriber can only be set once per process; repeated calls
/// are silently ignored, so test binaries may call this freely.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json()).try_init().ok();
    } else {
        registry.with(fmt::layer().compact()).try_init().ok();
    }
}
