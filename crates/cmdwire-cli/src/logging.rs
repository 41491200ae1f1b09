// Logging setup for the cmdwire binary

use tracing::Level;

/// Level used for a given verbosity flag
pub fn level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Install the global subscriber writing to stderr
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level(verbose))
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}
