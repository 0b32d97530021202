// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

use std::io;

use tracing_subscriber::EnvFilter;

/// Log to stderr; stdout belongs to the entry point.
///
/// `RUST_LOG` wins unless `verbose` is set.
pub fn init(verbose: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).try_init();
}
