use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        "gestao_forms=debug,info"
    } else {
        "gestao_forms=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
