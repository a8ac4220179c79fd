//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber filtered by `RUST_LOG`, falling back to a level
/// chosen by `verbosity` (0 = warn, 1 = info, 2 = debug, 3+ = trace).
///
/// Does nothing if a global subscriber is already set.
pub fn init_logging(verbosity: u8) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init();
}

fn default_directive(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn verbosity_maps_to_levels() {
		assert_eq!(default_directive(0), "warn");
		assert_eq!(default_directive(1), "info");
		assert_eq!(default_directive(2), "debug");
		assert_eq!(default_directive(7), "trace");
	}

	#[test]
	fn repeated_init_is_harmless() {
		init_logging(1);
		init_logging(2);
	}
}
