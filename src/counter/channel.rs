//! The six pulse-input channels and a fixed-order count set over them.

use core::ops::{Index, IndexMut};

/// Number of pulse-input channels on the board.
pub const CHANNEL_COUNT: usize = 6;

/// One of the six pulse-input lines.
///
/// Discriminants give the position in the `!D` response, which the host
/// relies on: A, B, C, AB, AC, ABC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    A = 0,
    B = 1,
    C = 2,
    AB = 3,
    AC = 4,
    ABC = 5,
}

impl Channel {
    /// Every channel, in wire order.
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::A,
        Channel::B,
        Channel::C,
        Channel::AB,
        Channel::AC,
        Channel::ABC,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::AB => "AB",
            Self::AC => "AC",
            Self::ABC => "ABC",
        }
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// One count per channel.  Used both for the live bank and for the
/// backup set reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelCounts([u32; CHANNEL_COUNT]);

impl ChannelCounts {
    pub const ZERO: Self = Self([0; CHANNEL_COUNT]);

    pub const fn from_array(counts: [u32; CHANNEL_COUNT]) -> Self {
        Self(counts)
    }

    pub const fn as_array(&self) -> &[u32; CHANNEL_COUNT] {
        &self.0
    }

    /// `(channel, count)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, u32)> + '_ {
        Channel::ALL.iter().map(move |&ch| (ch, self.0[ch.index()]))
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }
}

impl Index<Channel> for ChannelCounts {
    type Output = u32;

    fn index(&self, channel: Channel) -> &u32 {
        &self.0[channel.index()]
    }
}

impl IndexMut<Channel> for ChannelCounts {
    fn index_mut(&mut self, channel: Channel) -> &mut u32 {
        &mut self.0[channel.index()]
    }
}
