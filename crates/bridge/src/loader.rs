// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

//! Entry point resolved from a shared library at run time

use std::{
	ffi::CStr,
	fmt,
	path::{Path, PathBuf},
};

use leaf_abi::{HelloFn, ThreadSafety};
use libloading::Library;
use parking_lot::Mutex;
use tracing::{debug, instrument};

use crate::{entry::ForeignEntry, serial};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	#[error("cannot open library {}: {source}", path.display())]
	Open {
		path: PathBuf,
		#[source]
		source: libloading::Error,
	},

	#[error("library {} does not export `{symbol}`: {source}", path.display())]
	Symbol {
		path: PathBuf,
		symbol: String,
		#[source]
		source: libloading::Error,
	},

	#[error("symbol name `{symbol}` contains a NUL byte")]
	InvalidSymbol {
		symbol: String,
	},
}

/// `hello`-shaped symbol from a shared library
///
/// The library stays loaded for as long as the entry lives, so the resolved
/// function pointer never dangles. Opening the same library twice yields the
/// same function, and both entries then share one serialization lock.
pub struct DynamicEntry {
	function: HelloFn,
	thread_safety: ThreadSafety,
	serial: &'static Mutex<()>,
	symbol: String,
	path: PathBuf,
	// Dropped last; unloading invalidates `function`.
	_library: Library,
}

impl DynamicEntry {
	/// Load the library at `path` and resolve `symbol` from it
	///
	/// # Safety
	/// - Loading runs the library's initialisation routines
	/// - `symbol` must have the signature `void (const char*)` and honour the
	///   message contract: no retaining, no freeing
	/// - The library must honour `thread_safety`
	#[instrument(name = "loader::open", level = "debug", skip_all, fields(path = %path.as_ref().display(), symbol = %symbol))]
	pub unsafe fn open(
		path: impl AsRef<Path>,
		symbol: &str,
		thread_safety: ThreadSafety,
	) -> Result<Self, LoadError> {
		let path = path.as_ref();
		if symbol.as_bytes().contains(&0) {
			return Err(LoadError::InvalidSymbol {
				symbol: symbol.to_string(),
			});
		}

		let library = unsafe { Library::new(path) }.map_err(|source| LoadError::Open {
			path: path.to_path_buf(),
			source,
		})?;

		let function = unsafe { library.get::<HelloFn>(symbol.as_bytes()) }.map(|resolved| *resolved).map_err(
			|source| LoadError::Symbol {
				path: path.to_path_buf(),
				symbol: symbol.to_string(),
				source,
			},
		)?;

		debug!(%thread_safety, "entry point resolved");
		Ok(Self {
			function,
			thread_safety,
			serial: serial::function_lock(function),
			symbol: symbol.to_string(),
			path: path.to_path_buf(),
			_library: library,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn symbol(&self) -> &str {
		&self.symbol
	}
}

impl ForeignEntry for DynamicEntry {
	fn call(&self, message: &CStr) {
		// SAFETY: guaranteed by the contract of `open`, library kept alive by `self`
		unsafe { (self.function)(message.as_ptr()) }
	}

	fn thread_safety(&self) -> ThreadSafety {
		self.thread_safety
	}

	fn serial_lock(&self) -> &Mutex<()> {
		self.serial
	}
}

impl fmt::Debug for DynamicEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DynamicEntry")
			.field("path", &self.path)
			.field("symbol", &self.symbol)
			.field("thread_safety", &self.thread_safety)
			.finish()
	}
}
