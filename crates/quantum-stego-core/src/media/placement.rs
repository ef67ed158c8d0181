//! Placement strategies decide which (pixel, channel, bit) receives which payload bit.
//!
//! A strategy is a pure function of the image dimensions, the payload bit length and
//! optionally an explicit position list. Its output, the [`PlacementMap`], is the only
//! source of truth for the bit order: slot `i` carries payload bit `i`.
//!
//! Capacity is never an error here. Too few slots truncate the payload silently,
//! surplus pixels are left untouched.

use std::collections::HashSet;

use enum_dispatch::enum_dispatch;

use crate::error::QuantumStegoError;
use crate::result::Result;

/// color channel of a pixel, the discriminant is the index inside the pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
    Alpha = 3,
}

impl Channel {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// one bit position inside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub x: u32,
    pub y: u32,
    pub channel: Channel,
    pub bit: u8,
}

impl Target {
    /// clears the target bit of `value` and ORs `bit` in, all other bits stay
    pub fn hide_bit(&self, value: u8, bit: bool) -> u8 {
        (value & !(1 << self.bit)) | (u8::from(bit) << self.bit)
    }

    pub fn unveil_bit(&self, value: u8) -> bool {
        (value >> self.bit) & 1 == 1
    }
}

/// receives exactly one payload bit, optionally mirrored into a second target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub primary: Target,
    pub mirror: Option<Target>,
}

impl Slot {
    pub fn single(target: Target) -> Self {
        Self {
            primary: target,
            mirror: None,
        }
    }

    pub fn mirrored(primary: Target, mirror: Target) -> Self {
        Self {
            primary,
            mirror: Some(mirror),
        }
    }

    pub fn targets(&self) -> impl Iterator<Item = Target> {
        std::iter::once(self.primary).chain(self.mirror)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementMap {
    slots: Vec<Slot>,
}

impl PlacementMap {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    /// ensures every target is addressable and no target is used twice
    pub fn validate(&self, width: u32, height: u32, channel_count: u8) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.slots.len() * 2);
        for target in self.slots.iter().flat_map(Slot::targets) {
            if target.x >= width || target.y >= height {
                return Err(QuantumStegoError::PositionOutOfBounds(
                    target.x, target.y, width, height,
                ));
            }
            if target.channel.index() >= channel_count as usize {
                return Err(QuantumStegoError::UnsupportedPixelFormat(format!(
                    "{:?} channel on a {channel_count} channel pixel",
                    target.channel
                )));
            }
            if !seen.insert(target) {
                return Err(QuantumStegoError::DuplicatePosition(target.x, target.y));
            }
        }

        Ok(())
    }
}

impl FromIterator<Slot> for PlacementMap {
    fn from_iter<T: IntoIterator<Item = Slot>>(iter: T) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PlacementMap {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

/// row-major pixel coordinates, rows in increasing y, x inner
pub(crate) struct Raster {
    i: u64,
    i_max: u64,
    width: u32,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            i: 0,
            i_max: width as u64 * height as u64,
            width,
        }
    }
}

impl Iterator for Raster {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.i == self.i_max {
            return None;
        }
        let w = self.width as u64;
        let position = ((self.i % w) as u32, (self.i / w) as u32);
        self.i += 1;

        Some(position)
    }
}

#[enum_dispatch]
pub trait Placement {
    /// builds at most `bit_len` slots for an image of the given dimensions
    fn placement_map(&self, width: u32, height: u32, bit_len: usize) -> PlacementMap;
}

#[enum_dispatch(Placement)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementStrategy {
    SequentialRaster,
    PositionList,
    MultiChannelSplit,
}

/// one bit per pixel, all pixels in raster order, fixed channel and bit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialRaster {
    pub channel: Channel,
    pub bit: u8,
}

impl Placement for SequentialRaster {
    fn placement_map(&self, width: u32, height: u32, bit_len: usize) -> PlacementMap {
        Raster::new(width, height)
            .take(bit_len)
            .map(|(x, y)| {
                Slot::single(Target {
                    x,
                    y,
                    channel: self.channel,
                    bit: self.bit,
                })
            })
            .collect()
    }
}

/// one bit per listed coordinate in list order, bit 0 of a fixed channel.
/// An empty list falls back to the raster order over the whole image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionList {
    pub positions: Vec<(u32, u32)>,
    pub channel: Channel,
}

impl Placement for PositionList {
    fn placement_map(&self, width: u32, height: u32, bit_len: usize) -> PlacementMap {
        if self.positions.is_empty() {
            return SequentialRaster {
                channel: self.channel,
                bit: 0,
            }
            .placement_map(width, height, bit_len);
        }

        self.positions
            .iter()
            .take(bit_len)
            .map(|&(x, y)| {
                Slot::single(Target {
                    x,
                    y,
                    channel: self.channel,
                    bit: 0,
                })
            })
            .collect()
    }
}

/// raster order, every bit is written twice: into `primary` and into `mirror`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiChannelSplit {
    pub primary: (Channel, u8),
    pub mirror: (Channel, u8),
}

impl Default for MultiChannelSplit {
    fn default() -> Self {
        Self {
            primary: (Channel::Red, 1),
            mirror: (Channel::Green, 0),
        }
    }
}

impl Placement for MultiChannelSplit {
    fn placement_map(&self, width: u32, height: u32, bit_len: usize) -> PlacementMap {
        let (primary_channel, primary_bit) = self.primary;
        let (mirror_channel, mirror_bit) = self.mirror;

        Raster::new(width, height)
            .take(bit_len)
            .map(|(x, y)| {
                Slot::mirrored(
                    Target {
                        x,
                        y,
                        channel: primary_channel,
                        bit: primary_bit,
                    },
                    Target {
                        x,
                        y,
                        channel: mirror_channel,
                        bit: mirror_bit,
                    },
                )
            })
            .collect()
    }
}
