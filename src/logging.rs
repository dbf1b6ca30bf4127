use std::sync::Once;

///Logger configuration. `env_filter` follows the `env_logger` filter syntax
///(e.g. "warn", "wavepath=debug") and takes precedence over `RUST_LOG`.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
}

impl LoggingConfig {
    pub fn verbose(verbose: bool) -> Self {
	LoggingConfig {
	    env_filter: if verbose { Some(String::from("info,wavepath=debug")) } else { None },
	}
    }
}

static INIT: Once = Once::new();

///Initializes the global logger once; later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
	let filter = config.env_filter.or_else(|| std::env::var("RUST_LOG").ok());

	let mut builder = env_logger::Builder::new();
	match filter {
	    Some(filter) => builder.parse_filters(&filter),
	    // Enclosure fallbacks are reported at warn.
	    None => builder.filter_level(log::LevelFilter::Warn),
	};
	builder.init();
    });
}
