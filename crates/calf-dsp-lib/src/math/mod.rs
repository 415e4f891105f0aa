// SPDX-License-Identifier: LGPL-3.0-or-later

//! Mathematical operations on float buffers.
//!
//! - [`packed`]: buffer-to-buffer element-wise operations
//! - [`horizontal`]: reductions over whole buffers

pub mod horizontal;
pub mod packed;
