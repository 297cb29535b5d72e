use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

/// Log to stderr, stdout belongs to the terminal robot's face.
///
/// `RUST_LOG` wins over the `-v`/`-q` flags when it is set.
pub fn setup<Level>(verbosity: clap_verbosity_flag::Verbosity<Level>)
where
    Level: clap_verbosity_flag::LogLevel,
{
    let directive = tracing_subscriber::filter::Directive::from(verbosity.tracing_level_filter());
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry::Registry::default().with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(env_filter),
    );

    tracing::subscriber::set_global_default(subscriber).expect("Setting up logger works");
}
