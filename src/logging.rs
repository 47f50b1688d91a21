//! Log setup. The subscriber goes in before the config is read so config
//! warnings are kept; the filter is raised afterwards if debug is on.

use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

pub fn filter_directive(debug: bool) -> &'static str {
    if debug { "tourai=debug" } else { "tourai=warn" }
}

pub fn subscriber<W>(filter: EnvFilter, writer: W) -> (impl tracing::Subscriber + Send + Sync + 'static, FilterHandle)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer));
    (subscriber, handle)
}

/// Installs the global subscriber writing to stderr. `RUST_LOG` wins over
/// the built-in default.
pub fn init() -> FilterHandle {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_directive(false).into());
    let (subscriber, handle) = subscriber(filter, std::io::stderr);
    subscriber.init();
    handle
}

pub fn set_debug(handle: &FilterHandle) -> Result<(), reload::Error> {
    handle.reload(EnvFilter::new(filter_directive(true)))
}
