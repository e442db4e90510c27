//! Logging setup on top of `tracing-subscriber`.
//!
//! Logs go to stderr so that JSON on stdout stays machine readable.
//!
//! ```rust,no_run
//! use md2blocks_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("converting");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "md2blocks=debug,md2blocks_cli=debug";
const QUIET_FILTER: &str = "md2blocks=error,md2blocks_cli=error";
const DEFAULT_FILTER: &str = "md2blocks=warn,md2blocks_cli=info";

/// Initialize the global tracing subscriber.
///
/// Level selection, first match wins:
/// 1. `--verbose`: debug for md2blocks crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. warnings from the renderer, info from the CLI
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(select_filter(verbose, quiet), no_color);
}

/// Initialize the subscriber with an explicit filter
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn select_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Whether stderr output should be colored.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
