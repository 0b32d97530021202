// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

//! String boundary bridge for the native leaf `hello` entry point
//!
//! One invocation encodes a [`TextValue`], copies it into a NUL-terminated
//! [`ForeignBuffer`] allocated on the C heap, lends the buffer to the foreign
//! entry point and releases it exactly once on every exit path.

// #![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod alloc;
pub mod bridge;
pub mod buffer;
pub mod config;
pub mod entry;
pub mod error;
pub mod loader;
pub mod serial;
pub mod stage;
pub mod text;

pub use alloc::{LibcAllocator, NativeAllocator};
pub use bridge::StringBoundaryBridge;
pub use buffer::ForeignBuffer;
pub use config::{BridgeConfig, BridgeConfigBuilder, ConfigError};
pub use entry::{FnEntry, ForeignEntry, LinkedEntry};
pub use error::{BridgeError, EncodingIssue, FailedStage};
pub use leaf_abi::{HELLO_SYMBOL, HelloFn, ThreadSafety};
pub use loader::{DynamicEntry, LoadError};
pub use stage::{Stage, StageObserver};
pub use text::TextValue;
