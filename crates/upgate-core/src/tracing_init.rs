//! Log output for the server and the CLI.
//!
//! Both formats write to stderr. The CLI prints verification results on
//! stdout, and the server's stdout carries nothing, so logs never mix with
//! program output whichever format is chosen.

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Build the subscriber without installing it.
///
/// `RUST_LOG` wins over `default_filter` when set. With `log_json` each event
/// is one JSON object per line, otherwise the human-readable format.
pub fn subscriber(
    default_filter: &str,
    log_json: bool,
) -> impl Subscriber + Send + Sync + use<> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let json = log_json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let human = (!log_json).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json)
        .with(human)
}

/// Install [`subscriber`] as the global default.
pub fn init_tracing(default_filter: &str, log_json: bool) {
    subscriber(default_filter, log_json).init();
}
