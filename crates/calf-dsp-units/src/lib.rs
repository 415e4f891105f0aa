// SPDX-License-Identifier: LGPL-3.0-or-later

//! # calf-dsp-units
//!
//! High-level DSP processing components built on top of [`calf_dsp_lib`].
//!
//! - **Dynamics**: the psychoacoustic shaping clipper, its margin curve
//!   and spreading table, and a streaming adapter for arbitrary block sizes
//! - **Misc**: window functions
//! - **Utilities**: frame shift buffers
//!
//! Parameters can be persisted through [`config::ShapingClipperConfig`].

// Foundational modules
pub mod consts;
pub mod error;
pub mod units;

pub mod config;
pub mod dynamics;
pub mod misc;
pub mod util;

pub use config::ShapingClipperConfig;
pub use dynamics::clip_stream::ClipStream;
pub use dynamics::shaping_clipper::{OutputMode, ShapingClipper};
pub use error::{ClipperError, ClipperResult};
