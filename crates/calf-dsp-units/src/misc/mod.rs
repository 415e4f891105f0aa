// SPDX-License-Identifier: LGPL-3.0-or-later

//! Miscellaneous DSP utilities.
//!
//! - **Windows**: periodic FFT windows and their reciprocals

pub mod windows;
