// encode.rs
//
// Copyright (c) 2026  gifrec authors
//
//! GIF block encoding
use crate::block::*;
use crate::error::Result;
use crate::lzw::Compressor;
use std::io::{self, BufWriter, Write};

/// Low-level GIF block encoder.
///
/// Formats [Block](block/enum.Block.html)s into the output byte stream;
/// callers are responsible for writing blocks in a valid order.
pub struct BlockEnc<W: Write> {
    /// Writer for output data
    writer: BufWriter<W>,
}

impl<W: Write> BlockEnc<W> {
    /// Create a new block encoder.
    pub fn new(writer: W) -> Self {
        BlockEnc {
            writer: BufWriter::new(writer),
        }
    }

    /// Encode one block.
    pub fn encode<B: Into<Block>>(&mut self, block: B) -> Result<()> {
        use crate::block::Block::*;
        let w = &mut self.writer;
        match block.into() {
            Header(b) => b.format(w),
            LogicalScreenDesc(b) => b.format(w),
            Application(b) => b.format(w),
            GraphicControl(b) => b.format(w),
            ImageDesc(b) => b.format(w),
            LocalColorTable(b) => b.format(w),
            ImageData(b) => b.format(w),
            Trailer(b) => b.format(w),
        }?;
        Ok(())
    }

    /// Flush buffered output.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Push a `u16` in little-endian order
fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.push(value as u8);
    buf.push((value >> 8) as u8);
}

impl Header {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(b"GIF")?;
        w.write_all(&self.version())
    }
}

impl LogicalScreenDesc {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = Vec::with_capacity(7);
        push_u16(&mut buf, self.screen_width());
        push_u16(&mut buf, self.screen_height());
        buf.push(self.flags());
        buf.push(self.background_color_idx());
        buf.push(self.pixel_aspect_ratio());
        w.write_all(&buf)
    }
}

impl Application {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(BlockCode::Extension_.signature())?;
        w.write_all(&[ExtensionCode::Application_.into()])?;
        w.write_all(&[11])?; // block size
        w.write_all(b"NETSCAPE2.0")?;
        let mut buf = Vec::with_capacity(5);
        buf.push(3); // block size
        buf.push(1); // sub-block ID
        push_u16(&mut buf, self.loop_count());
        buf.push(0); // block terminator
        w.write_all(&buf)
    }
}

impl GraphicControl {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(BlockCode::Extension_.signature())?;
        let mut buf = Vec::with_capacity(7);
        buf.push(ExtensionCode::GraphicControl_.into());
        buf.push(4); // block size
        buf.push(self.flags());
        push_u16(&mut buf, self.delay_time_cs());
        buf.push(self.transparent_color_idx());
        buf.push(0); // block terminator
        w.write_all(&buf)
    }
}

impl ImageDesc {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(BlockCode::ImageDesc_.signature())?;
        let mut buf = Vec::with_capacity(9);
        push_u16(&mut buf, self.left());
        push_u16(&mut buf, self.top());
        push_u16(&mut buf, self.width());
        push_u16(&mut buf, self.height());
        buf.push(self.flags());
        w.write_all(&buf)
    }
}

impl LocalColorTable {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(self.colors())
    }
}

impl ImageData {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&[self.min_code_size()])?;
        let mut compressed = Vec::with_capacity(self.data().len() / 2 + 16);
        Compressor::new(self.min_code_size())
            .compress(self.data(), &mut compressed);
        // sub-blocks hold at most 255 data bytes each
        for chunk in compressed.chunks(0xFF) {
            w.write_all(&[chunk.len() as u8])?;
            w.write_all(chunk)?;
        }
        w.write_all(&[0]) // block terminator
    }
}

impl Trailer {
    fn format<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(BlockCode::Trailer_.signature())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn encode_block<B: Into<Block>>(block: B) -> Vec<u8> {
        let mut buffer = vec![];
        let mut enc = BlockEnc::new(&mut buffer);
        enc.encode(block).unwrap();
        enc.flush().unwrap();
        drop(enc);
        buffer
    }

    #[test]
    fn header() {
        assert_eq!(encode_block(Header::default()), b"GIF89a");
    }

    #[test]
    fn screen_desc() {
        let desc = LogicalScreenDesc::default()
            .with_screen_width(0x123)
            .with_screen_height(2);
        assert_eq!(
            encode_block(desc),
            [0x23, 0x01, 0x02, 0x00, 0x70, 0x00, 0x00]
        );
    }

    #[test]
    fn loop_block() {
        assert_eq!(
            encode_block(Application::with_loop_count(0)),
            [
                0x21, 0xFF, 0x0B, b'N', b'E', b'T', b'S', b'C', b'A', b'P',
                b'E', b'2', b'.', b'0', 0x03, 0x01, 0x00, 0x00, 0x00,
            ]
        );
        // loop count is little-endian
        let bytes = encode_block(Application::with_loop_count(0x0102));
        assert_eq!(&bytes[16..18], [0x02, 0x01]);
    }

    #[test]
    fn graphic_control() {
        let gce = GraphicControl::default().with_delay_time_cs(10);
        assert_eq!(
            encode_block(gce),
            [0x21, 0xF9, 0x04, 0x00, 0x0A, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn image_desc() {
        let tbl = ColorTableConfig::new(2);
        let desc = ImageDesc::default()
            .with_width(2)
            .with_height(2)
            .with_color_table_config(&tbl);
        assert_eq!(
            encode_block(desc),
            [0x2C, 0, 0, 0, 0, 0x02, 0x00, 0x02, 0x00, 0x80]
        );
    }

    #[test]
    fn image_data() {
        let mut image = ImageData::new(4, 2);
        image.add_data(&[0, 0, 0, 0]);
        assert_eq!(encode_block(image), [0x02, 0x02, 0x84, 0x51, 0x00]);
    }

    #[test]
    fn sub_block_bounds() {
        // enough noise to compress past one sub-block
        let mut seed = 0x9e37_79b9_7f4a_7c15u64;
        let indices: Vec<u8> = (0..4096)
            .map(|_| {
                seed = seed
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (seed >> 56) as u8
            })
            .collect();
        let mut image = ImageData::new(indices.len(), 8);
        image.add_data(&indices);
        let bytes = encode_block(image);
        assert_eq!(bytes[0], 8);
        // walk the sub-blocks: each holds at most 255 bytes and the
        // section ends with a zero length block
        let mut pos = 1;
        let mut blocks = 0;
        loop {
            let len = bytes[pos] as usize;
            pos += 1;
            if len == 0 {
                break;
            }
            blocks += 1;
            pos += len;
        }
        assert_eq!(pos, bytes.len());
        assert!(blocks > 1);
    }

    #[test]
    fn trailer() {
        assert_eq!(encode_block(Trailer::default()), [0x3B]);
    }
}
