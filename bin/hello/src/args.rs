// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

use std::{ffi::OsString, path::PathBuf};

use clap::Parser;

/// Send a greeting through the native leaf `hello` entry point
#[derive(Debug, Parser)]
#[command(name = "leaf-hello", version)]
pub struct Args {
	/// Text handed to the entry point [env: LEAF_MESSAGE] [default: "Hello from Rust"]
	pub message: Option<OsString>,

	/// Shared library exporting the entry point [env: LEAF_LIBRARY]
	#[arg(short, long, value_name = "PATH")]
	pub library: Option<PathBuf>,

	/// Exported symbol to call [env: LEAF_SYMBOL] [default: hello]
	#[arg(short, long)]
	pub symbol: Option<String>,

	/// The entry point is safe for concurrent calls [env: LEAF_CONCURRENT]
	#[arg(long)]
	pub concurrent: bool,

	/// Log bridge stages to stderr
	#[arg(short, long)]
	pub verbose: bool,
}
