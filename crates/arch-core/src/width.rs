//! Register bit-width resolution under the 64-bit variant's convention.
//!
//! Control and segment-base registers are narrower on the 16- and 32-bit
//! variants, so the declared-width scan is defined for the 64-bit variant
//! only; [`crate::ArchCore::register_bits`] reports the unknown sentinel
//! for every other variant instead of a wrong answer.

use crate::engine::RegisterId;
use crate::tables::{ids, RegisterBank, CONTROL, GP16, GP32, GP64, GP8, MISC, SEGBASE, X87};

/// Sentinel width reported for identifiers outside every scanned bank.
pub const UNKNOWN_WIDTH_BITS: u32 = 0;

/// Width of the flags view; the one exception to its bank's 16-bit class.
pub const EFLAGS_WIDTH_BITS: u32 = 32;

/// Declared width per bank under the 64-bit convention, in resolution
/// order. The first bank containing an identifier wins. REX alias banks
/// are deliberately absent, so their identifiers report the sentinel.
const X64_DECLARED_WIDTHS: &[(&RegisterBank, u32)] = &[
    (&GP8, 8),
    (&GP16, 16),
    (&GP32, 32),
    (&GP64, 64),
    (&MISC, 16),
    (&CONTROL, 64),
    (&X87, 32),
    (&SEGBASE, 64),
];

/// Declared width in bits of `id` under the 64-bit variant's convention.
///
/// The query is advisory and total: identifiers outside every scanned bank
/// report [`UNKNOWN_WIDTH_BITS`] rather than an error.
#[must_use]
pub fn x64_register_bits(id: RegisterId) -> u32 {
    if id == ids::EF {
        return EFLAGS_WIDTH_BITS;
    }

    scan_declared(X64_DECLARED_WIDTHS, id)
}

/// First-match scan over an ordered bank/width list.
pub(crate) fn scan_declared(order: &[(&RegisterBank, u32)], id: RegisterId) -> u32 {
    order
        .iter()
        .find_map(|&(bank, bits)| bank.contains_id(id).then_some(bits))
        .unwrap_or(UNKNOWN_WIDTH_BITS)
}
