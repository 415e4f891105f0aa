// SPDX-License-Identifier: LGPL-3.0-or-later

//! Dynamics processors: the psychoacoustic shaping clipper.
//!
//! The clipper itself lives in [`shaping_clipper`]; [`margin_curve`] and
//! [`spread_table`] hold the frequency-domain tables it is built from,
//! and [`clip_stream`] adapts it to arbitrary block sizes.

pub mod clip_stream;
pub mod margin_curve;
pub mod shaping_clipper;
pub mod spread_table;
