use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DIRECTIVE: &str = "wakedock_views=warn";
const VERBOSE_DIRECTIVE: &str = "wakedock_views=debug";

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// Output goes to stderr so JSON on stdout stays parseable.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        VERBOSE_DIRECTIVE
    } else {
        DEFAULT_DIRECTIVE
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
