//! Ethtool bitset parsing and building.
//!
//! Ethtool carries sets of flags in three shapes:
//!
//! 1. **Compact format**: `SIZE`, a `VALUE` bitmap and a `MASK` bitmap
//!    (or `NOMASK` when the value is the whole set)
//! 2. **Fixed format**: a 12-byte value/selector pair (`NLA_BITFIELD32` plus
//!    four reserved bytes), used for wake-on-LAN modes
//! 3. **Bit-by-bit format**: nested list of (index, name, value) tuples
//!
//! The first two sit behind [`BitsetCodec`]; the third is handled by
//! [`parse_bits`] and [`write_bits`] since it is keyed by name.
//!
//! Compact bitmaps are built byte by byte (bit `i` lives in byte `i / 8`)
//! and read back as native-endian 32-bit words. The two views agree on
//! little-endian hosts only.

use crate::netlink::attr::{get, walk};
use crate::netlink::builder::AttrBuilder;
use crate::netlink::error::{Error, Result};
use crate::netlink::parse::parse_u32_words;

use super::{EthtoolBitsetAttr, EthtoolBitsetBitAttr, EthtoolBitsetBitsAttr};

/// A set of bit indices stored as 32-bit words.
///
/// Bit `i` of word `w` is element `32 * w + i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    words: Vec<u32>,
}

impl Bitmap {
    /// Create an empty bitmap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing words.
    pub fn from_words(words: Vec<u32>) -> Self {
        Self { words }
    }

    /// The underlying words.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Set bit `index`, growing the bitmap as needed.
    pub fn set(&mut self, index: u32) {
        let word = (index / 32) as usize;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1u32 << (index % 32);
    }

    /// Check whether bit `index` is set.
    pub fn is_set(&self, index: u32) -> bool {
        self.words
            .get((index / 32) as usize)
            .is_some_and(|&w| w & (1u32 << (index % 32)) != 0)
    }

    /// Check if no bit is set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate set bits in ascending order. Zero words are skipped whole.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.words
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w != 0)
            .flat_map(|(i, &w)| {
                (0..32u32)
                    .filter(move |&bit| w & (1u32 << bit) != 0)
                    .map(move |bit| i as u32 * 32 + bit)
            })
    }
}

impl FromIterator<u32> for Bitmap {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut bitmap = Self::new();
        for index in iter {
            bitmap.set(index);
        }
        bitmap
    }
}

/// A wire encoding for value/mask bitsets.
pub trait BitsetCodec {
    /// Write `value` and `mask` under the attribute `attr_type`.
    fn encode(
        &self,
        builder: &mut AttrBuilder,
        attr_type: u16,
        value: &Bitmap,
        mask: &Bitmap,
    ) -> Result<()>;

    /// Decode an attribute payload into the masked value.
    fn decode(&self, payload: &[u8]) -> Result<Bitmap>;
}

/// The compact `SIZE`/`VALUE`/`MASK` nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactBitset {
    size: u32,
}

impl CompactBitset {
    /// A codec for sets of `size` bits.
    pub const fn new(size: u32) -> Self {
        Self { size }
    }

    /// Number of bits written as `SIZE`.
    pub const fn size(&self) -> u32 {
        self.size
    }

    fn to_bytes(&self, bits: &Bitmap) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; self.size.div_ceil(32) as usize * 4];
        for index in bits.iter() {
            if index >= self.size {
                return Err(Error::InvalidAttribute(format!(
                    "bit {} out of range for bitset of size {}",
                    index, self.size
                )));
            }
            bytes[(index / 8) as usize] |= 1 << (index % 8);
        }
        Ok(bytes)
    }
}

impl BitsetCodec for CompactBitset {
    fn encode(
        &self,
        builder: &mut AttrBuilder,
        attr_type: u16,
        value: &Bitmap,
        mask: &Bitmap,
    ) -> Result<()> {
        let value = self.to_bytes(value)?;
        let mask = self.to_bytes(mask)?;

        let token = builder.nest_start(attr_type);
        builder.append_attr_u32(EthtoolBitsetAttr::Size as u16, self.size);
        builder.append_attr(EthtoolBitsetAttr::Value as u16, &value);
        builder.append_attr(EthtoolBitsetAttr::Mask as u16, &mask);
        builder.nest_end(token);
        Ok(())
    }

    fn decode(&self, payload: &[u8]) -> Result<Bitmap> {
        let mut nomask = false;
        let mut size: Option<u32> = None;
        let mut value: Option<&[u8]> = None;
        let mut mask: Option<&[u8]> = None;

        walk(payload, |attr_type, data| {
            match attr_type {
                t if t == EthtoolBitsetAttr::Nomask as u16 => nomask = true,
                t if t == EthtoolBitsetAttr::Size as u16 => size = Some(get::u32_ne(data)?),
                t if t == EthtoolBitsetAttr::Value as u16 => value = Some(data),
                t if t == EthtoolBitsetAttr::Mask as u16 => mask = Some(data),
                _ => {}
            }
            Ok(())
        })?;

        let size =
            size.ok_or_else(|| Error::InvalidAttribute("compact bitset without size".into()))?;
        let expected = size.div_ceil(32) as usize;

        let mut words = parse_u32_words(value.unwrap_or_default())?;
        if words.len() != expected {
            return Err(Error::InvalidAttribute(format!(
                "bitset value has {} words, size {} needs {}",
                words.len(),
                size,
                expected
            )));
        }

        if !nomask {
            let mask = mask
                .ok_or_else(|| Error::InvalidAttribute("bitset mask missing".into()))?;
            let mask = parse_u32_words(mask)?;
            if mask.len() != expected {
                return Err(Error::InvalidAttribute(format!(
                    "bitset mask has {} words, size {} needs {}",
                    mask.len(),
                    size,
                    expected
                )));
            }
            for (word, m) in words.iter_mut().zip(mask) {
                *word &= m;
            }
        }

        Ok(Bitmap::from_words(words))
    }
}

/// Length of a fixed value/selector bitfield payload.
pub const FIXED_BITFIELD_LEN: usize = 12;

/// The fixed 12-byte value/selector form.
///
/// Holds at most 32 flags; anything wider breaks the wire contract and
/// panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedBitfield;

impl BitsetCodec for FixedBitfield {
    fn encode(
        &self,
        builder: &mut AttrBuilder,
        attr_type: u16,
        value: &Bitmap,
        mask: &Bitmap,
    ) -> Result<()> {
        assert!(
            value.words().len() <= 1 && mask.words().len() <= 1,
            "fixed bitfield holds at most 32 flags: value has {} words, mask has {}",
            value.words().len(),
            mask.words().len()
        );
        let value = value.words().first().copied().unwrap_or(0);
        let selector = mask.words().first().copied().unwrap_or(0);

        let mut payload = [0u8; FIXED_BITFIELD_LEN];
        payload[0..4].copy_from_slice(&value.to_ne_bytes());
        payload[4..8].copy_from_slice(&selector.to_ne_bytes());
        builder.append_attr(attr_type, &payload);
        Ok(())
    }

    fn decode(&self, payload: &[u8]) -> Result<Bitmap> {
        if payload.len() < FIXED_BITFIELD_LEN {
            return Err(Error::Truncated {
                expected: FIXED_BITFIELD_LEN,
                actual: payload.len(),
            });
        }
        assert!(
            payload.len() == FIXED_BITFIELD_LEN,
            "fixed bitfield payload is {} bytes; more than 32 flags are not supported",
            payload.len()
        );
        let words = parse_u32_words(&payload[..8])?;
        Ok(Bitmap::from_words(vec![words[0] & words[1]]))
    }
}

/// One entry of a bit-by-bit bitset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerboseBit {
    /// Bit index, if the kernel sent one.
    pub index: Option<u32>,
    /// Bit name, if the kernel sent one.
    pub name: Option<String>,
    /// Whether the bit is set.
    pub value: bool,
}

/// Parse the bit-by-bit form from a bitset nest payload.
///
/// With `NOMASK` the list holds only set bits, so every entry is `true`.
pub fn parse_bits(payload: &[u8]) -> Result<Vec<VerboseBit>> {
    let mut nomask = false;
    let mut bits = Vec::new();

    walk(payload, |attr_type, data| {
        match attr_type {
            t if t == EthtoolBitsetAttr::Nomask as u16 => nomask = true,
            t if t == EthtoolBitsetAttr::Bits as u16 => {
                walk(data, |bit_type, bit_data| {
                    if bit_type == EthtoolBitsetBitsAttr::Bit as u16 {
                        bits.push(parse_bit(bit_data)?);
                    }
                    Ok(())
                })?;
            }
            _ => {}
        }
        Ok(())
    })?;

    if nomask {
        for bit in &mut bits {
            bit.value = true;
        }
    }
    Ok(bits)
}

fn parse_bit(data: &[u8]) -> Result<VerboseBit> {
    let mut bit = VerboseBit {
        index: None,
        name: None,
        value: false,
    };
    walk(data, |attr_type, payload| {
        match attr_type {
            t if t == EthtoolBitsetBitAttr::Index as u16 => {
                bit.index = Some(get::u32_ne(payload)?);
            }
            t if t == EthtoolBitsetBitAttr::Name as u16 => {
                bit.name = Some(get::string(payload)?.to_string());
            }
            // Flag attribute - presence means true
            t if t == EthtoolBitsetBitAttr::Value as u16 => bit.value = true,
            _ => {}
        }
        Ok(())
    })?;
    Ok(bit)
}

/// Write a bit-by-bit bitset under `attr_type`, addressing bits by name.
///
/// Every listed bit is in the mask; set bits carry the `VALUE` flag.
pub fn write_bits<'a>(
    builder: &mut AttrBuilder,
    attr_type: u16,
    bits: impl IntoIterator<Item = (&'a str, bool)>,
) {
    let outer = builder.nest_start(attr_type);
    let list = builder.nest_start(EthtoolBitsetAttr::Bits as u16);
    for (name, value) in bits {
        let bit = builder.nest_start(EthtoolBitsetBitsAttr::Bit as u16);
        builder.append_attr_str(EthtoolBitsetBitAttr::Name as u16, name);
        if value {
            builder.append_attr_empty(EthtoolBitsetBitAttr::Value as u16);
        }
        builder.nest_end(bit);
    }
    builder.nest_end(list);
    builder.nest_end(outer);
}
