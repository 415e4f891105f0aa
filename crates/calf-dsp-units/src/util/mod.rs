// SPDX-License-Identifier: LGPL-3.0-or-later

//! Utility processing modules.
//!
//! - Fixed-length sliding frames for hop-based spectral processing

pub mod shift_buffer;
