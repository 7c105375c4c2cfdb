//! Closed architecture-variant identity and its per-variant static facts.
//!
//! Every fact a variant carries (word width, byte order, designated
//! program-counter and stack-pointer names, engine mode row) is a total
//! `const fn` over the closed enum, so an unsupported configuration cannot
//! be expressed and none of these lookups can fail at runtime.

use std::fmt;

use crate::engine::{EngineFamily, EngineMode, EngineSpec};

/// One supported word-width configuration of the Intel processor family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ArchVariant {
    /// 16-bit real-mode processor.
    A8086,
    /// 32-bit protected-mode processor.
    X86,
    /// 64-bit long-mode processor.
    X86_64,
}

impl ArchVariant {
    /// Every supported variant, in ascending word width.
    pub const ALL: [Self; 3] = [Self::A8086, Self::X86, Self::X86_64];

    /// Native word width in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::A8086 => 16,
            Self::X86 => 32,
            Self::X86_64 => 64,
        }
    }

    /// Byte order of the family.
    #[must_use]
    pub const fn endian(self) -> Endianness {
        match self {
            Self::A8086 | Self::X86 | Self::X86_64 => Endianness::Little,
        }
    }

    /// Designated program-counter register name for this variant.
    #[must_use]
    pub const fn pc_name(self) -> &'static str {
        match self {
            Self::A8086 => "ip",
            Self::X86 => "eip",
            Self::X86_64 => "rip",
        }
    }

    /// Designated stack-pointer register name for this variant.
    #[must_use]
    pub const fn sp_name(self) -> &'static str {
        match self {
            Self::A8086 => "sp",
            Self::X86 => "esp",
            Self::X86_64 => "rsp",
        }
    }

    /// Family/mode row handed to every engine constructor of a session.
    #[must_use]
    pub const fn engine_spec(self) -> EngineSpec {
        let mode = match self {
            Self::A8086 => EngineMode::Mode16,
            Self::X86 => EngineMode::Mode32,
            Self::X86_64 => EngineMode::Mode64,
        };

        EngineSpec {
            family: EngineFamily::X86,
            mode,
        }
    }
}

impl fmt::Display for ArchVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::A8086 => "a8086",
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
        };

        f.write_str(label)
    }
}

/// Byte order reported by a session's descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Endianness {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl Endianness {
    /// Returns `true` for little-endian byte order.
    #[must_use]
    pub const fn is_little(self) -> bool {
        matches!(self, Self::Little)
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Little => "little",
            Self::Big => "big",
        };

        f.write_str(label)
    }
}
