use tracing_subscriber::{
    filter::Directive, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_DIRECTIVES: &str = "toggl_report_util=info";
const VERBOSE_DIRECTIVE: &str = "toggl_report_util=debug";

/// Compact logs on stderr so stdout stays free for CSV and summaries.
pub fn init_cli_logger(verbose: bool) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(cli_filter(env.as_deref(), verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// `RUST_LOG` directives (or the crate default), with `verbose` raising this
/// crate to debug on top of either.
pub fn cli_filter(env: Option<&str>, verbose: bool) -> EnvFilter {
    let filter = env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES));

    if !verbose {
        return filter;
    }

    match VERBOSE_DIRECTIVE.parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}
