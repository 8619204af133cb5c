use std::{fmt::Display, str::FromStr};
use serde::{Deserialize, Serialize};
use super::{IsrError, MAX_CHANNEL_COUNT};

/// Channel selection bitmask of a host request, bit `c` selects channel `c`.
///
/// Rendered as a `0x` prefixed lowercase hexadecimal literal. In config
/// files it may be given either as that literal or as a plain integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MaskRepr", into = "String")]
pub struct ChannelMask(u32);

#[derive(Deserialize)]
#[serde(untagged)]
enum MaskRepr {
    Bits(u32),
    Text(String),
}

impl ChannelMask {
    /// Every channel at once
    pub const ALL: Self = Self(u32::MAX);

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub fn single(channel: usize) -> Result<Self, IsrError> {
        if channel >= MAX_CHANNEL_COUNT {
            return Err(IsrError::ChannelOutOfRange(channel, MAX_CHANNEL_COUNT));
        }
        Ok(Self(1 << channel))
    }

    /// Mask selecting channels `0..channel_count`
    pub fn broadcast(channel_count: usize) -> Result<Self, IsrError> {
        match channel_count {
            0 => Err(IsrError::ChannelCountOutOfRange(channel_count, MAX_CHANNEL_COUNT)),
            MAX_CHANNEL_COUNT => Ok(Self::ALL),
            c if c < MAX_CHANNEL_COUNT => Ok(Self((1 << c) - 1)),
            _ => Err(IsrError::ChannelCountOutOfRange(channel_count, MAX_CHANNEL_COUNT)),
        }
    }

    #[inline]
    pub fn bits(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn channel_count(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn contains(&self, channel: usize) -> bool {
        channel < MAX_CHANNEL_COUNT && self.0 & (1 << channel) != 0
    }

    /// Selected channel indices, ascending
    pub fn channels(&self) -> impl Iterator<Item = usize> {
        let mask = *self;
        (0..MAX_CHANNEL_COUNT).filter(move |&c| mask.contains(c))
    }
}

impl Default for ChannelMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl Display for ChannelMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl FromStr for ChannelMask {
    type Err = IsrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let bits = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => text.parse::<u32>(),
        };
        bits.map(Self).map_err(|_| IsrError::InvalidChannelMask(s.to_string()))
    }
}

impl TryFrom<MaskRepr> for ChannelMask {
    type Error = IsrError;

    fn try_from(repr: MaskRepr) -> Result<Self, Self::Error> {
        match repr {
            MaskRepr::Bits(bits) => Ok(Self(bits)),
            MaskRepr::Text(text) => text.parse(),
        }
    }
}

impl From<ChannelMask> for String {
    fn from(mask: ChannelMask) -> Self {
        mask.to_string()
    }
}
