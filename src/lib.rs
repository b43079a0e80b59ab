// lib.rs      gifrec crate.
//
// Copyright (c) 2026  gifrec authors
//
//! Gifrec encodes animated GIF (89a) images from raw RGBA frames.
//!
//! Each frame is reduced to a palette of at most 256 colors with
//! median-cut quantization, remapped to palette indices, compressed
//! with GIF-variant LZW and written with its own local color table, so
//! frames are fully independent.  The output loops forever by default.
//!
//! ## Example: encode a two frame animation
//! ```
//! use gifrec::Encoder;
//! use pix::Raster;
//!
//! # fn main() -> Result<(), gifrec::Error> {
//! let mut enc = Encoder::new(2, 2)?.with_delay_ms(100);
//! enc.add_frame(Raster::with_clear(2, 2))?;
//! enc.add_frame(Raster::with_clear(2, 2))?;
//! let gif = enc.encode_to_vec()?;
//! assert!(gif.starts_with(b"GIF89a"));
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
#[macro_use]
extern crate log;

pub mod block;
mod encode;
mod error;
mod lzw;
mod private;
mod quant;

pub use crate::encode::BlockEnc;
pub use crate::error::{Error, Result};
pub use crate::private::Encoder;
