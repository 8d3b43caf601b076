//! Tracing setup for the browser console.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;

/// Installs the panic hook and a console-backed subscriber.
///
/// `directives` uses `EnvFilter` syntax, e.g. `"info,roulette_core=debug"`.
/// Calling this twice keeps the first subscriber.
pub fn init_logging(directives: &str) {
    console_error_panic_hook::set_once();

    let filter = EnvFilter::new(directives);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(filter);

    if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
        tracing::debug!("[logging] Subscriber already installed");
    }
}
