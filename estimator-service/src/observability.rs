use tracing_subscriber::{filter::Directive, EnvFilter};

/// Install the global fmt subscriber on stderr. This crate logs at `info`;
/// other targets follow `RUST_LOG`.
pub fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "estimator_service=info".parse::<Directive>() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
