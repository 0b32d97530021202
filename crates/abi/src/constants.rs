// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Leaf Project

/// Name of the exported greeting function
pub const HELLO_SYMBOL: &str = "hello";

/// C string terminator appended to every message
pub const NUL: u8 = 0;

/// Entry point may be entered by several threads at once
pub const THREAD_SAFETY_CONCURRENT: u32 = 0;

/// Entry point must not be entered concurrently
pub const THREAD_SAFETY_SERIALIZED: u32 = 1;
