// quant.rs
//
// Copyright (c) 2026  gifrec authors
//
//! Median-cut color quantization and palette remapping
use pix::gray::Gray8;
use pix::rgb::{Rgb, SRgb8, SRgba8};
use pix::{Palette, Raster};
use std::collections::HashMap;

/// Channel mask reducing colors to 5 bits per channel
const CHAN_MASK: u8 = 0xF8;

/// Maximum number of palette entries
const MAX_COLORS: usize = 256;

/// RGB channel selector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Channel {
    Red,
    Green,
    Blue,
}

/// One distinct quantized color with its pixel tally.
///
/// The masked channels drive box splitting and sorting; the full
/// precision channel totals drive palette averaging.
#[derive(Clone, Copy, Debug)]
struct ColorCount {
    /// Quantized channels
    red: u8,
    green: u8,
    blue: u8,
    /// Number of pixels
    count: u64,
    /// Full precision channel totals
    red_total: u64,
    green_total: u64,
    blue_total: u64,
}

impl ColorCount {
    fn new(red: u8, green: u8, blue: u8) -> Self {
        ColorCount {
            red: red & CHAN_MASK,
            green: green & CHAN_MASK,
            blue: blue & CHAN_MASK,
            count: 0,
            red_total: 0,
            green_total: 0,
            blue_total: 0,
        }
    }

    /// Tally one pixel with full precision channels
    fn tally(&mut self, red: u8, green: u8, blue: u8) {
        self.count += 1;
        self.red_total += u64::from(red);
        self.green_total += u64::from(green);
        self.blue_total += u64::from(blue);
    }

    fn channel(&self, chan: Channel) -> u8 {
        match chan {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }
}

/// A box of colors for median cut: a range into the sortable color
/// array, kept as indices rather than owned sub-lists.
#[derive(Clone, Copy, Debug)]
struct ColorBox {
    start: usize,
    end: usize,
}

impl ColorBox {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Tally the distinct quantized colors of a frame, in first-seen order.
///
/// First-seen ordering keeps the box worklist deterministic; the map is
/// only a key to slot lookup.
fn tally_colors(raster: &Raster<SRgba8>) -> Vec<ColorCount> {
    let mut colors = Vec::new();
    let mut slots: HashMap<u32, usize> = HashMap::new();
    for px in raster.as_u8_slice().chunks_exact(4) {
        let (red, green, blue) = (px[0], px[1], px[2]);
        let key = u32::from(red & CHAN_MASK) << 16
            | u32::from(green & CHAN_MASK) << 8
            | u32::from(blue & CHAN_MASK);
        let slot = *slots.entry(key).or_insert_with(|| {
            colors.push(ColorCount::new(red, green, blue));
            colors.len() - 1
        });
        colors[slot].tally(red, green, blue);
    }
    colors
}

/// Find the channel with the widest range over a box, with its range
fn widest_channel(colors: &[ColorCount]) -> (Channel, u8) {
    let mut min = [255u8; 3];
    let mut max = [0u8; 3];
    for c in colors {
        min[0] = min[0].min(c.red);
        max[0] = max[0].max(c.red);
        min[1] = min[1].min(c.green);
        max[1] = max[1].max(c.green);
        min[2] = min[2].min(c.blue);
        max[2] = max[2].max(c.blue);
    }
    let red = max[0].saturating_sub(min[0]);
    let green = max[1].saturating_sub(min[1]);
    let blue = max[2].saturating_sub(min[2]);
    if red >= green && red >= blue {
        (Channel::Red, red)
    } else if green >= blue {
        (Channel::Green, green)
    } else {
        (Channel::Blue, blue)
    }
}

/// Split boxes until 256 exist or none can be split further.
///
/// Each round picks the box with the widest single channel range (first
/// one wins ties), sorts its slice by that channel and splits it at the
/// median index, replacing it in place with the two halves.
fn median_cut(colors: &mut [ColorCount]) -> Vec<ColorBox> {
    let mut boxes = vec![ColorBox {
        start: 0,
        end: colors.len(),
    }];
    while boxes.len() < MAX_COLORS {
        let mut widest = 0u8;
        let mut found = None;
        for (i, b) in boxes.iter().enumerate() {
            if b.len() <= 1 {
                continue;
            }
            let (chan, range) = widest_channel(&colors[b.start..b.end]);
            if range > widest {
                widest = range;
                found = Some((i, chan));
            }
        }
        let (i, chan) = match found {
            Some(f) => f,
            None => break,
        };
        let b = boxes[i];
        colors[b.start..b.end].sort_unstable_by_key(|c| c.channel(chan));
        let mid = b.start + b.len() / 2;
        boxes[i] = ColorBox {
            start: b.start,
            end: mid,
        };
        boxes.insert(
            i + 1,
            ColorBox {
                start: mid,
                end: b.end,
            },
        );
    }
    boxes
}

/// Average each box into one palette entry
fn build_palette(colors: &mut [ColorCount]) -> Palette {
    let mut palette = Palette::new(MAX_COLORS);
    if colors.is_empty() {
        // a frame with no pixels still gets one black entry
        palette.set_entry(SRgb8::default());
        return palette;
    }
    for b in median_cut(colors) {
        let mut count = 0u64;
        let (mut red, mut green, mut blue) = (0u64, 0u64, 0u64);
        for c in &colors[b.start..b.end] {
            count += c.count;
            red += c.red_total;
            green += c.green_total;
            blue += c.blue_total;
        }
        // count weighted average, rounded to nearest
        let red = ((red + count / 2) / count) as u8;
        let green = ((green + count / 2) / count) as u8;
        let blue = ((blue + count / 2) / count) as u8;
        palette.set_entry(SRgb8::new(red, green, blue));
    }
    palette
}

/// Build a palette of at most 256 colors representative of a frame
pub fn quantize(raster: &Raster<SRgba8>) -> Palette {
    let mut colors = tally_colors(raster);
    debug!("quantize: {} distinct colors", colors.len());
    build_palette(&mut colors)
}

/// Remap a frame to palette indices, producing an indexed raster.
///
/// The cache keyed by quantized color is memoization only; results do
/// not depend on it and it is dropped with the frame.
pub fn remap(raster: &Raster<SRgba8>, palette: &Palette) -> Raster<Gray8> {
    let colors = palette.colors();
    let mut cache: HashMap<u32, u8> = HashMap::new();
    let mut indices =
        Vec::with_capacity(raster.width() as usize * raster.height() as usize);
    for px in raster.as_u8_slice().chunks_exact(4) {
        let red = px[0] & CHAN_MASK;
        let green = px[1] & CHAN_MASK;
        let blue = px[2] & CHAN_MASK;
        let key =
            u32::from(red) << 16 | u32::from(green) << 8 | u32::from(blue);
        let idx = match cache.get(&key) {
            Some(idx) => *idx,
            None => {
                let idx = nearest_color(colors, red, green, blue);
                cache.insert(key, idx);
                idx
            }
        };
        indices.push(idx);
    }
    Raster::with_u8_buffer(raster.width(), raster.height(), indices)
}

/// Find the palette index with the smallest squared RGB distance; the
/// lowest index wins ties and an exact match ends the search.
fn nearest_color(colors: &[SRgb8], red: u8, green: u8, blue: u8) -> u8 {
    let mut best = 0;
    let mut best_dist = i32::MAX;
    for (i, clr) in colors.iter().enumerate() {
        let dr = i32::from(red) - i32::from(u8::from(Rgb::red(*clr)));
        let dg = i32::from(green) - i32::from(u8::from(Rgb::green(*clr)));
        let db = i32::from(blue) - i32::from(u8::from(Rgb::blue(*clr)));
        let dist = dr * dr + dg * dg + db * db;
        if dist < best_dist {
            best_dist = dist;
            best = i;
            if dist == 0 {
                break;
            }
        }
    }
    best as u8
}
