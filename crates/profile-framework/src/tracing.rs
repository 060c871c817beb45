/// Initializes the tracing/logging infrastructure for the application.
///
/// Sets up structured logging using the `tracing` crate with
/// environment-based filtering: set `RUST_LOG` to control verbosity
/// (`RUST_LOG=debug`, `RUST_LOG=profile_framework=debug`, ...).
///
/// # Example
///
/// ```ignore
/// setup_tracing();
/// tracing::info!("Host started");
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
