// lzw.rs
//
// Copyright (c) 2026  gifrec authors
//
//! Lempel-Ziv-Welch compression for GIF image data
use std::cmp::Ordering;

/// Code type
type Code = u16;

/// Maximum code bits allowed for GIF
const MAX_CODE_BITS: u8 = 12;

/// Get the number of codes available at a bit width
fn entries(bits: u8) -> u16 {
    1 << u16::from(bits)
}

/// Dictionary entry: one known sequence, stored as its final byte plus
/// links into the flat code table.
#[derive(Clone, Copy, Debug)]
struct Entry {
    /// First known extension of this sequence
    down: Option<Code>,
    /// Sibling extension with a smaller byte
    left: Option<Code>,
    /// Sibling extension with a larger byte
    right: Option<Code>,
    /// Final byte of the sequence
    byte: u8,
}

impl Entry {
    fn new(byte: u8) -> Self {
        Entry {
            down: None,
            left: None,
            right: None,
            byte,
        }
    }

    fn link(&self, ordering: Ordering) -> Option<Code> {
        match ordering {
            Ordering::Less => self.left,
            Ordering::Equal => self.down,
            Ordering::Greater => self.right,
        }
    }

    fn set_link(&mut self, ordering: Ordering, code: Code) {
        match ordering {
            Ordering::Less => self.left = Some(code),
            Ordering::Equal => self.down = Some(code),
            Ordering::Greater => self.right = Some(code),
        }
    }
}

/// Bounded code dictionary
#[derive(Debug)]
struct Dict {
    /// Table of entries, indexed by code
    table: Vec<Entry>,
    /// Minimum code size
    min_code_size: u8,
}

impl Dict {
    fn new(min_code_size: u8) -> Self {
        let mut dict = Dict {
            table: Vec::with_capacity(entries(MAX_CODE_BITS).into()),
            min_code_size,
        };
        dict.reset();
        dict
    }

    /// Get the clear code
    fn clear_code(&self) -> Code {
        1 << self.min_code_size
    }

    /// Get the end of information code
    fn end_code(&self) -> Code {
        self.clear_code() + 1
    }

    /// Get the next available code
    fn next_code(&self) -> Code {
        self.table.len() as Code
    }

    /// Reset to literal codes only
    fn reset(&mut self) {
        self.table.clear();
        for byte in 0..self.clear_code() {
            self.table.push(Entry::new(byte as u8));
        }
        self.table.push(Entry::new(0)); // clear code
        self.table.push(Entry::new(0)); // end code
    }

    /// Find the code for a sequence extended by one byte, inserting a
    /// new entry when the extension is not yet in the dictionary.
    fn extend(&mut self, code: Code, byte: u8) -> Option<Code> {
        let next_code = self.next_code();
        let mut idx = code as usize;
        let mut ordering = Ordering::Equal;
        while let Some(c) = self.table[idx].link(ordering) {
            idx = c as usize;
            ordering = byte.cmp(&self.table[idx].byte);
            if ordering == Ordering::Equal {
                return Some(c);
            }
        }
        self.table[idx].set_link(ordering, next_code);
        self.table.push(Entry::new(byte));
        None
    }
}

/// LZW data compressor
pub struct Compressor {
    /// Code dictionary
    dict: Dict,
    /// Minimum code size
    min_code_size: u8,
    /// Current code bits
    code_bits: u8,
    /// Bit accumulator, packed LSB first
    bits: u32,
    /// Number of bits in the accumulator
    n_bits: u8,
}

impl Compressor {
    /// Create a new compressor.
    ///
    /// `min_code_size` must be in the range `2..=8` (GIF color table
    /// indices are at most 8 bits wide).
    pub fn new(min_code_size: u8) -> Self {
        debug_assert!((2..=8).contains(&min_code_size));
        Compressor {
            dict: Dict::new(min_code_size),
            min_code_size,
            code_bits: min_code_size + 1,
            bits: 0,
            n_bits: 0,
        }
    }

    /// Pack one code into a buffer
    fn pack(&mut self, code: Code, buffer: &mut Vec<u8>) {
        self.bits |= u32::from(code) << self.n_bits;
        self.n_bits += self.code_bits;
        while self.n_bits >= 8 {
            buffer.push(self.bits as u8);
            self.bits >>= 8;
            self.n_bits -= 8;
        }
    }

    /// Compress an index buffer, consuming the compressor.
    ///
    /// Output starts with a clear code and ends with the end of
    /// information code; the final partial byte is flushed.  An empty
    /// input produces just the clear and end codes.
    pub fn compress(mut self, indices: &[u8], buffer: &mut Vec<u8>) {
        let clear_code = self.dict.clear_code();
        self.pack(clear_code, buffer);
        let mut code: Option<Code> = None;
        for &index in indices {
            code = match code {
                None => Some(Code::from(index)),
                Some(c) => match self.dict.extend(c, index) {
                    Some(seq) => Some(seq),
                    None => {
                        self.pack(c, buffer);
                        Some(Code::from(index))
                    }
                },
            };
            let next_code = self.dict.next_code();
            if next_code > entries(self.code_bits) {
                if next_code > entries(MAX_CODE_BITS) {
                    self.pack(clear_code, buffer);
                    self.dict.reset();
                    self.code_bits = self.min_code_size + 1;
                } else {
                    self.code_bits += 1;
                }
            }
        }
        if let Some(c) = code {
            self.pack(c, buffer);
        }
        let end_code = self.dict.end_code();
        self.pack(end_code, buffer);
        if self.n_bits > 0 {
            buffer.push(self.bits as u8);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use weezl::{decode::Decoder, BitOrder};

    fn decompress(data: &[u8], min_code_size: u8) -> Vec<u8> {
        Decoder::new(BitOrder::Lsb, min_code_size)
            .decode(data)
            .unwrap()
    }

    #[test]
    fn empty_input() {
        let mut buffer = vec![];
        Compressor::new(2).compress(&[], &mut buffer);
        // clear (100) then end (101) at 3 bits, LSB first
        assert_eq!(buffer, [0x2C]);
        assert!(decompress(&buffer, 2).is_empty());
    }

    #[test]
    fn single_color() {
        let mut buffer = vec![];
        Compressor::new(2).compress(&[0, 0, 0, 0], &mut buffer);
        assert_eq!(buffer, [0x84, 0x51]);
        assert_eq!(decompress(&buffer, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn two_colors() {
        let indices = [0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1, 0];
        let mut buffer = vec![];
        Compressor::new(2).compress(&indices, &mut buffer);
        assert_eq!(decompress(&buffer, 2), indices);
    }

    #[test]
    fn code_width_growth() {
        // long runs force codes past the initial width
        let mut indices = vec![];
        for i in 0..64u8 {
            for _ in 0..=i {
                indices.push(i % 4);
            }
        }
        let mut buffer = vec![];
        Compressor::new(2).compress(&indices, &mut buffer);
        assert_eq!(decompress(&buffer, 2), indices);
    }

    #[test]
    fn dictionary_reset() {
        // pseudo-random bytes keep sequences short, so the 4096 entry
        // code space runs out well before the input does
        let mut seed = 0x2545_f491_4f6c_dd1du64;
        let indices: Vec<u8> = (0..30_000)
            .map(|_| {
                seed = seed
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (seed >> 56) as u8
            })
            .collect();
        let mut buffer = vec![];
        Compressor::new(8).compress(&indices, &mut buffer);
        assert_eq!(decompress(&buffer, 8), indices);
    }
}
