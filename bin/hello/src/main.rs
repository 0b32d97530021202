// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

use std::process::ExitCode;

use clap::Parser;
use leaf_bridge::{BridgeConfig, DynamicEntry, StringBoundaryBridge, TextValue, ThreadSafety};
use tracing::info;

use crate::{args::Args, failure::Failure};

mod args;
mod failure;
mod logging;

fn main() -> ExitCode {
	let args = Args::parse();
	logging::init(args.verbose);

	match run(args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(failure) => {
			eprintln!("error: {} stage failed: {}", failure.stage(), failure);
			ExitCode::from(failure.exit_status())
		}
	}
}

fn run(args: Args) -> Result<(), Failure> {
	let mut builder = BridgeConfig::builder().with_env()?;
	if let Some(library) = args.library {
		builder = builder.with_library(library);
	}
	if let Some(symbol) = args.symbol {
		builder = builder.with_symbol(symbol);
	}
	if args.concurrent {
		builder = builder.with_thread_safety(ThreadSafety::Concurrent);
	}
	if let Some(message) = args.message {
		builder = builder.with_message(message);
	}
	let config = builder.build()?;
	let message = TextValue::from_os_str(&config.message)?;

	// SAFETY: the configured library is trusted to export `void hello(const char*)`
	// that neither keeps nor frees its argument.
	let entry = unsafe { DynamicEntry::open(&config.library, &config.symbol, config.thread_safety)? };
	info!(library = %config.library.display(), symbol = %config.symbol, "entry point loaded");

	let bridge = StringBoundaryBridge::new(entry);
	bridge.invoke(message)?;
	Ok(())
}
