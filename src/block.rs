// block.rs
//
// Copyright (c) 2026  gifrec authors
//
//! GIF block types emitted by the encoder

const CHANNELS: usize = 3;

/// Local color table configuration.
///
/// Every encoded frame carries a present, unsorted local color table
/// with a power-of-two entry count between 2 and 256.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTableConfig {
    table_len: usize, // must be between 2...256
}

impl Default for ColorTableConfig {
    fn default() -> Self {
        ColorTableConfig { table_len: 2 }
    }
}

impl ColorTableConfig {
    /// Create a configuration for a palette with the given entry count.
    pub fn new(palette_len: u16) -> Self {
        let table_len =
            (palette_len as usize).max(2).next_power_of_two().min(256);
        ColorTableConfig { table_len }
    }
    /// Get the number of table entries
    pub fn len(&self) -> usize {
        self.table_len
    }
    /// Get the size field for packed flag bytes (entry count is 2^(n+1))
    pub(crate) fn len_bits(&self) -> u8 {
        let sz = self.table_len;
        for b in 0..7 {
            if (sz >> (b + 1)) == 1 {
                return b;
            }
        }
        7
    }
    /// Get the size of the table, in bytes
    pub fn size_bytes(&self) -> usize {
        self.len() * CHANNELS
    }
    /// Get the minimum LZW code size for indices into this table
    pub fn min_code_size(&self) -> u8 {
        (self.len_bits() + 1).max(2)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BlockCode {
    Extension_,
    ImageDesc_,
    Trailer_,
}

impl BlockCode {
    pub fn signature(&self) -> &'static [u8] {
        use self::BlockCode::*;
        match self {
            ImageDesc_ => b",", // (0x2C) Image separator
            Extension_ => b"!", // (0x21) Extension introducer
            Trailer_ => b";",   // (0x3B) GIF trailer
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ExtensionCode {
    GraphicControl_,
    Application_,
}

impl From<ExtensionCode> for u8 {
    fn from(t: ExtensionCode) -> Self {
        use self::ExtensionCode::*;
        match t {
            GraphicControl_ => 0xF9,
            Application_ => 0xFF,
        }
    }
}

/// GIF header; only version 89a is written (needed for animation
/// extensions).
#[derive(Debug)]
pub struct Header {
    version: [u8; 3],
}

impl Default for Header {
    fn default() -> Self {
        Header { version: *b"89a" }
    }
}

impl Header {
    pub fn version(&self) -> [u8; 3] {
        self.version
    }
}

/// Logical screen descriptor.
///
/// No global color table is written; the flags byte is fixed to 8-bit
/// color resolution with the table flag clear.
#[derive(Debug, Default)]
pub struct LogicalScreenDesc {
    screen_width: u16,
    screen_height: u16,
    background_color_idx: u8,
    pixel_aspect_ratio: u8,
}

impl LogicalScreenDesc {
    const COLOR_RESOLUTION_8BIT: u8 = 0b0111_0000;

    pub fn with_screen_width(mut self, screen_width: u16) -> Self {
        self.screen_width = screen_width;
        self
    }
    pub fn screen_width(&self) -> u16 {
        self.screen_width
    }
    pub fn with_screen_height(mut self, screen_height: u16) -> Self {
        self.screen_height = screen_height;
        self
    }
    pub fn screen_height(&self) -> u16 {
        self.screen_height
    }
    pub fn flags(&self) -> u8 {
        Self::COLOR_RESOLUTION_8BIT
    }
    pub fn background_color_idx(&self) -> u8 {
        self.background_color_idx
    }
    pub fn pixel_aspect_ratio(&self) -> u8 {
        self.pixel_aspect_ratio
    }
}

/// Graphic control extension: no disposal, no user input, no
/// transparency; only the frame delay is variable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GraphicControl {
    delay_time_cs: u16, // delay in centiseconds (hundredths of a second)
    transparent_color_idx: u8,
}

impl GraphicControl {
    pub fn with_delay_time_cs(mut self, delay_time_cs: u16) -> Self {
        self.delay_time_cs = delay_time_cs;
        self
    }
    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time_cs
    }
    pub fn flags(&self) -> u8 {
        0
    }
    pub fn transparent_color_idx(&self) -> u8 {
        self.transparent_color_idx
    }
}

/// NETSCAPE2.0 application extension signalling animation looping.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Application {
    loop_count: u16,
}

impl Application {
    /// Create a loop block; zero means loop forever.
    pub fn with_loop_count(loop_count: u16) -> Self {
        Application { loop_count }
    }
    pub fn loop_count(&self) -> u16 {
        self.loop_count
    }
}

/// Image descriptor for one frame.
///
/// Frames always cover the full screen with a local color table and no
/// interlacing.
#[derive(Debug, Default)]
pub struct ImageDesc {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    color_table: ColorTableConfig,
}

impl ImageDesc {
    const COLOR_TABLE_PRESENT: u8 = 0b1000_0000;
    const COLOR_TABLE_SIZE: u8 = 0b0000_0111;

    pub fn left(&self) -> u16 {
        self.left
    }
    pub fn top(&self) -> u16 {
        self.top
    }
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }
    pub fn width(&self) -> u16 {
        self.width
    }
    pub fn with_height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }
    pub fn height(&self) -> u16 {
        self.height
    }
    pub fn with_color_table_config(mut self, tbl: &ColorTableConfig) -> Self {
        self.color_table = *tbl;
        self
    }
    pub fn color_table_config(&self) -> ColorTableConfig {
        self.color_table
    }
    pub fn flags(&self) -> u8 {
        Self::COLOR_TABLE_PRESENT
            | (self.color_table.len_bits() & Self::COLOR_TABLE_SIZE)
    }
    pub fn image_sz(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Local color table: RGB triples, zero-padded to the configured
/// power-of-two entry count.
#[derive(Debug, Default)]
pub struct LocalColorTable {
    colors: Vec<u8>,
}

impl LocalColorTable {
    /// Create a table from palette RGB triples padded to the table size.
    pub fn with_colors(colors: &[u8], tbl: &ColorTableConfig) -> Self {
        assert_eq!(colors.len() / CHANNELS * CHANNELS, colors.len());
        assert!(colors.len() <= tbl.size_bytes());
        let mut colors = colors.to_vec();
        colors.resize(tbl.size_bytes(), 0);
        LocalColorTable { colors }
    }
    pub fn len(&self) -> usize {
        self.colors.len()
    }
    pub fn colors(&self) -> &[u8] {
        &self.colors
    }
}

/// Image data: uncompressed palette indices plus the minimum LZW code
/// size; compression happens when the block is formatted.
#[derive(Debug)]
pub struct ImageData {
    min_code_size: u8,
    data: Vec<u8>,
}

impl ImageData {
    pub fn new(image_sz: usize, min_code_size: u8) -> Self {
        let data = Vec::with_capacity(image_sz);
        ImageData {
            min_code_size: min_code_size.max(2), // must be >= 2
            data,
        }
    }
    pub fn add_data(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data);
    }
    pub fn min_code_size(&self) -> u8 {
        self.min_code_size
    }
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[derive(Debug, Default)]
pub struct Trailer {}

/// A block of a GIF file, in encode order.
#[derive(Debug)]
pub enum Block {
    Header(Header),
    LogicalScreenDesc(LogicalScreenDesc),
    Application(Application),
    GraphicControl(GraphicControl),
    ImageDesc(ImageDesc),
    LocalColorTable(LocalColorTable),
    ImageData(ImageData),
    Trailer(Trailer),
}

impl From<Header> for Block {
    fn from(b: Header) -> Self {
        Block::Header(b)
    }
}

impl From<LogicalScreenDesc> for Block {
    fn from(b: LogicalScreenDesc) -> Self {
        Block::LogicalScreenDesc(b)
    }
}

impl From<Application> for Block {
    fn from(b: Application) -> Self {
        Block::Application(b)
    }
}

impl From<GraphicControl> for Block {
    fn from(b: GraphicControl) -> Self {
        Block::GraphicControl(b)
    }
}

impl From<ImageDesc> for Block {
    fn from(b: ImageDesc) -> Self {
        Block::ImageDesc(b)
    }
}

impl From<LocalColorTable> for Block {
    fn from(b: LocalColorTable) -> Self {
        Block::LocalColorTable(b)
    }
}

impl From<ImageData> for Block {
    fn from(b: ImageData) -> Self {
        Block::ImageData(b)
    }
}

impl From<Trailer> for Block {
    fn from(b: Trailer) -> Self {
        Block::Trailer(b)
    }
}
