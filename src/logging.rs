use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber. `debug` comes from the settings file
/// and selects the base level.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    // `RUST_LOG` may only raise verbosity when debug logging was asked for;
    // otherwise a stray variable in the environment would make every
    // injected keystroke chatty.
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
