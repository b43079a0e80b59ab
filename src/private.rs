// private.rs
//
// Copyright (c) 2026  gifrec authors
//
//! Private module for top-level items
use crate::block::{
    Application, ColorTableConfig, GraphicControl, Header, ImageData,
    ImageDesc, LocalColorTable, LogicalScreenDesc, Trailer,
};
use crate::encode::BlockEnc;
use crate::error::{Error, Result};
use crate::quant;
use pix::gray::Gray8;
use pix::rgb::{Rgb, SRgba8};
use pix::{Palette, Raster};
use std::convert::TryInto;
use std::io::Write;

/// Animated GIF encoder session.
///
/// Frames are added one at a time, then the whole animation is encoded
/// at once.  Every frame must match the screen dimensions given at
/// construction.
///
/// ## Example
/// ```
/// use gifrec::Encoder;
/// use pix::rgb::SRgba8;
/// use pix::Raster;
///
/// # fn main() -> Result<(), gifrec::Error> {
/// let mut enc = Encoder::new(4, 4)?.with_delay_ms(250);
/// let mut raster = Raster::with_clear(4, 4);
/// *raster.pixel_mut(1, 1) = SRgba8::new(0xFF, 0x20, 0x20, 0xFF);
/// enc.add_frame(raster)?;
/// let gif = enc.encode_to_vec()?;
/// assert_eq!(&gif[..6], b"GIF89a");
/// # Ok(())
/// # }
/// ```
pub struct Encoder {
    /// Screen width in pixels
    width: u16,
    /// Screen height in pixels
    height: u16,
    /// Delay between frames, in milliseconds
    delay_ms: u32,
    /// Animation loop count (zero loops forever)
    loop_count: u16,
    /// Frames added so far
    frames: Vec<Raster<SRgba8>>,
}

impl Encoder {
    /// Create a new encoder session.
    ///
    /// Returns an error if either dimension does not fit in 16 bits.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Encoder {
            width: width.try_into()?,
            height: height.try_into()?,
            delay_ms: 100,
            loop_count: 0,
            frames: vec![],
        })
    }

    /// Adjust the delay between frames, in milliseconds (default 100).
    ///
    /// The delay is rounded to the nearest hundredth of a second when
    /// encoding, and saturates at the format maximum.
    pub fn with_delay_ms(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Adjust the animation loop count (default 0, looping forever).
    pub fn with_loop_count(mut self, loop_count: u16) -> Self {
        self.loop_count = loop_count;
        self
    }

    /// Add one frame to the animation.
    ///
    /// Returns an error if the raster does not match the screen
    /// dimensions.
    pub fn add_frame(&mut self, raster: Raster<SRgba8>) -> Result<()> {
        if raster.width() != u32::from(self.width)
            || raster.height() != u32::from(self.height)
        {
            return Err(Error::InvalidFrameDimensions);
        }
        self.frames.push(raster);
        Ok(())
    }

    /// Get the frame delay in centiseconds, rounded to nearest
    fn delay_time_cs(&self) -> u16 {
        ((u64::from(self.delay_ms) + 5) / 10).min(0xFFFF) as u16
    }

    /// Encode the animation, consuming the session.
    ///
    /// Returns [EmptyAnimation](enum.Error.html#variant.EmptyAnimation)
    /// if no frames were added.
    pub fn encode<W: Write>(self, writer: W) -> Result<()> {
        if self.frames.is_empty() {
            return Err(Error::EmptyAnimation);
        }
        let mut enc = BlockEnc::new(writer);
        enc.encode(Header::default())?;
        enc.encode(
            LogicalScreenDesc::default()
                .with_screen_width(self.width)
                .with_screen_height(self.height),
        )?;
        enc.encode(Application::with_loop_count(self.loop_count))?;
        let delay = self.delay_time_cs();
        for (n, raster) in self.frames.iter().enumerate() {
            let palette = quant::quantize(raster);
            let indexed = quant::remap(raster, &palette);
            debug!("frame {}: {} palette entries", n, palette.len());
            encode_frame(&mut enc, raster, &palette, &indexed, delay)?;
        }
        enc.encode(Trailer::default())?;
        enc.flush()
    }

    /// Encode the animation into a new byte vector.
    pub fn encode_to_vec(self) -> Result<Vec<u8>> {
        let mut buffer = vec![];
        self.encode(&mut buffer)?;
        Ok(buffer)
    }
}

/// Encode the blocks for one frame
fn encode_frame<W: Write>(
    enc: &mut BlockEnc<W>,
    raster: &Raster<SRgba8>,
    palette: &Palette,
    indexed: &Raster<Gray8>,
    delay: u16,
) -> Result<()> {
    let tbl = ColorTableConfig::new(palette.len() as u16);
    enc.encode(GraphicControl::default().with_delay_time_cs(delay))?;
    enc.encode(
        ImageDesc::default()
            .with_width(raster.width() as u16)
            .with_height(raster.height() as u16)
            .with_color_table_config(&tbl),
    )?;
    let mut colors = Vec::with_capacity(tbl.size_bytes());
    for clr in palette.colors() {
        colors.push(u8::from(Rgb::red(*clr)));
        colors.push(u8::from(Rgb::green(*clr)));
        colors.push(u8::from(Rgb::blue(*clr)));
    }
    enc.encode(LocalColorTable::with_colors(&colors, &tbl))?;
    let indices = indexed.as_u8_slice();
    let mut image = ImageData::new(indices.len(), tbl.min_code_size());
    image.add_data(indices);
    enc.encode(image)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn oversized_screen() {
        assert!(Encoder::new(0x1_0000, 1).is_err());
        assert!(Encoder::new(1, 0x1_0000).is_err());
        assert!(Encoder::new(0xFFFF, 0xFFFF).is_ok());
    }

    #[test]
    fn empty_animation() {
        let enc = Encoder::new(2, 2).unwrap();
        assert!(matches!(
            enc.encode_to_vec(),
            Err(Error::EmptyAnimation)
        ));
    }

    #[test]
    fn mismatched_frame() {
        let mut enc = Encoder::new(2, 2).unwrap();
        let raster = Raster::with_clear(3, 2);
        assert!(matches!(
            enc.add_frame(raster),
            Err(Error::InvalidFrameDimensions)
        ));
    }

    #[test]
    fn delay_rounding() {
        let enc = |ms| Encoder::new(1, 1).unwrap().with_delay_ms(ms);
        assert_eq!(enc(0).delay_time_cs(), 0);
        assert_eq!(enc(4).delay_time_cs(), 0);
        assert_eq!(enc(5).delay_time_cs(), 1);
        assert_eq!(enc(55).delay_time_cs(), 6);
        assert_eq!(enc(100).delay_time_cs(), 10);
        assert_eq!(enc(u32::MAX).delay_time_cs(), 0xFFFF);
    }

    #[test]
    fn deterministic_output() {
        let make = || {
            let mut enc = Encoder::new(8, 8).unwrap();
            let mut raster = Raster::with_clear(8, 8);
            for y in 0..8 {
                for x in 0..8 {
                    *raster.pixel_mut(x, y) = SRgba8::new(
                        (x * 32) as u8,
                        (y * 32) as u8,
                        0x80,
                        0xFF,
                    );
                }
            }
            enc.add_frame(raster).unwrap();
            enc.encode_to_vec().unwrap()
        };
        assert_eq!(make(), make());
    }
}
