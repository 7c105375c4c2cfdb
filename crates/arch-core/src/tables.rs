//! Register bank data and the per-variant table builder.
//!
//! Banks are the immutable source of truth: each groups registers of one
//! width class and assigns contract-stable identifiers from its own hex
//! block. A variant's table is the ordered union of its bank recipe, and
//! that order is contractual because debug bridges number registers by
//! table position.

use indexmap::IndexMap;

use crate::engine::RegisterId;
use crate::error::ConfigurationError;
use crate::variant::ArchVariant;

/// Native identifier assignments, one hex block per bank.
///
/// The block layout leaves renumbering headroom inside each bank; anchors
/// are pinned by tests because backends and wire consumers depend on the
/// exact values.
#[allow(missing_docs)]
pub mod ids {
    use crate::engine::RegisterId;

    // 8-bit general purpose, block 0x01..
    pub const AH: RegisterId = RegisterId::new(0x01);
    pub const AL: RegisterId = RegisterId::new(0x02);
    pub const CH: RegisterId = RegisterId::new(0x03);
    pub const CL: RegisterId = RegisterId::new(0x04);
    pub const DH: RegisterId = RegisterId::new(0x05);
    pub const DL: RegisterId = RegisterId::new(0x06);
    pub const BH: RegisterId = RegisterId::new(0x07);
    pub const BL: RegisterId = RegisterId::new(0x08);

    // 16-bit general purpose, block 0x10..
    pub const AX: RegisterId = RegisterId::new(0x10);
    pub const BX: RegisterId = RegisterId::new(0x11);
    pub const CX: RegisterId = RegisterId::new(0x12);
    pub const DX: RegisterId = RegisterId::new(0x13);
    pub const SP: RegisterId = RegisterId::new(0x14);
    pub const BP: RegisterId = RegisterId::new(0x15);
    pub const SI: RegisterId = RegisterId::new(0x16);
    pub const DI: RegisterId = RegisterId::new(0x17);
    pub const IP: RegisterId = RegisterId::new(0x18);

    // 32-bit general purpose, block 0x20..
    pub const EAX: RegisterId = RegisterId::new(0x20);
    pub const EBX: RegisterId = RegisterId::new(0x21);
    pub const ECX: RegisterId = RegisterId::new(0x22);
    pub const EDX: RegisterId = RegisterId::new(0x23);
    pub const ESP: RegisterId = RegisterId::new(0x24);
    pub const EBP: RegisterId = RegisterId::new(0x25);
    pub const ESI: RegisterId = RegisterId::new(0x26);
    pub const EDI: RegisterId = RegisterId::new(0x27);
    pub const EIP: RegisterId = RegisterId::new(0x28);

    // 64-bit general purpose, block 0x30..
    pub const RAX: RegisterId = RegisterId::new(0x30);
    pub const RBX: RegisterId = RegisterId::new(0x31);
    pub const RCX: RegisterId = RegisterId::new(0x32);
    pub const RDX: RegisterId = RegisterId::new(0x33);
    pub const RSI: RegisterId = RegisterId::new(0x34);
    pub const RDI: RegisterId = RegisterId::new(0x35);
    pub const RBP: RegisterId = RegisterId::new(0x36);
    pub const RSP: RegisterId = RegisterId::new(0x37);
    pub const R8: RegisterId = RegisterId::new(0x38);
    pub const R9: RegisterId = RegisterId::new(0x39);
    pub const R10: RegisterId = RegisterId::new(0x3A);
    pub const R11: RegisterId = RegisterId::new(0x3B);
    pub const R12: RegisterId = RegisterId::new(0x3C);
    pub const R13: RegisterId = RegisterId::new(0x3D);
    pub const R14: RegisterId = RegisterId::new(0x3E);
    pub const R15: RegisterId = RegisterId::new(0x3F);
    pub const RIP: RegisterId = RegisterId::new(0x40);

    // Control registers, block 0x50..
    pub const CR0: RegisterId = RegisterId::new(0x50);
    pub const CR1: RegisterId = RegisterId::new(0x51);
    pub const CR2: RegisterId = RegisterId::new(0x52);
    pub const CR3: RegisterId = RegisterId::new(0x53);
    pub const CR4: RegisterId = RegisterId::new(0x54);

    // x87 stack registers, block 0x60..
    pub const ST0: RegisterId = RegisterId::new(0x60);
    pub const ST1: RegisterId = RegisterId::new(0x61);
    pub const ST2: RegisterId = RegisterId::new(0x62);
    pub const ST3: RegisterId = RegisterId::new(0x63);
    pub const ST4: RegisterId = RegisterId::new(0x64);
    pub const ST5: RegisterId = RegisterId::new(0x65);
    pub const ST6: RegisterId = RegisterId::new(0x66);
    pub const ST7: RegisterId = RegisterId::new(0x67);

    // Flags and segment selectors, block 0x70..
    pub const EF: RegisterId = RegisterId::new(0x70);
    pub const CS: RegisterId = RegisterId::new(0x71);
    pub const SS: RegisterId = RegisterId::new(0x72);
    pub const DS: RegisterId = RegisterId::new(0x73);
    pub const ES: RegisterId = RegisterId::new(0x74);
    pub const FS: RegisterId = RegisterId::new(0x75);
    pub const GS: RegisterId = RegisterId::new(0x76);

    // REX 8-bit aliases, block 0x80..
    pub const SPL: RegisterId = RegisterId::new(0x80);
    pub const BPL: RegisterId = RegisterId::new(0x81);
    pub const SIL: RegisterId = RegisterId::new(0x82);
    pub const DIL: RegisterId = RegisterId::new(0x83);
    pub const R8B: RegisterId = RegisterId::new(0x84);
    pub const R9B: RegisterId = RegisterId::new(0x85);
    pub const R10B: RegisterId = RegisterId::new(0x86);
    pub const R11B: RegisterId = RegisterId::new(0x87);
    pub const R12B: RegisterId = RegisterId::new(0x88);
    pub const R13B: RegisterId = RegisterId::new(0x89);
    pub const R14B: RegisterId = RegisterId::new(0x8A);
    pub const R15B: RegisterId = RegisterId::new(0x8B);

    // REX 16-bit aliases, block 0x90..
    pub const R8W: RegisterId = RegisterId::new(0x90);
    pub const R9W: RegisterId = RegisterId::new(0x91);
    pub const R10W: RegisterId = RegisterId::new(0x92);
    pub const R11W: RegisterId = RegisterId::new(0x93);
    pub const R12W: RegisterId = RegisterId::new(0x94);
    pub const R13W: RegisterId = RegisterId::new(0x95);
    pub const R14W: RegisterId = RegisterId::new(0x96);
    pub const R15W: RegisterId = RegisterId::new(0x97);

    // REX 32-bit aliases, block 0xA0..
    pub const R8D: RegisterId = RegisterId::new(0xA0);
    pub const R9D: RegisterId = RegisterId::new(0xA1);
    pub const R10D: RegisterId = RegisterId::new(0xA2);
    pub const R11D: RegisterId = RegisterId::new(0xA3);
    pub const R12D: RegisterId = RegisterId::new(0xA4);
    pub const R13D: RegisterId = RegisterId::new(0xA5);
    pub const R14D: RegisterId = RegisterId::new(0xA6);
    pub const R15D: RegisterId = RegisterId::new(0xA7);

    // Segment base pseudo-registers, block 0xB0..
    pub const FSBASE: RegisterId = RegisterId::new(0xB0);
    pub const GSBASE: RegisterId = RegisterId::new(0xB1);
}

/// A named, immutable group of register entries sharing a width class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterBank {
    /// Short bank label used in diagnostics.
    pub name: &'static str,
    /// Entries in declaration order, symbolic name to native identifier.
    pub entries: &'static [(&'static str, RegisterId)],
}

impl RegisterBank {
    /// Returns `true` when the bank declares `id`.
    #[must_use]
    pub fn contains_id(&self, id: RegisterId) -> bool {
        self.entries.iter().any(|&(_, entry)| entry == id)
    }

    /// Returns `true` when the bank declares `name`.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.iter().any(|&(entry, _)| entry == name)
    }

    /// Number of entries declared by the bank.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` for a bank with no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 8-bit general-purpose registers.
pub const GP8: RegisterBank = RegisterBank {
    name: "gp8",
    entries: &[
        ("ah", ids::AH),
        ("al", ids::AL),
        ("ch", ids::CH),
        ("cl", ids::CL),
        ("dh", ids::DH),
        ("dl", ids::DL),
        ("bh", ids::BH),
        ("bl", ids::BL),
    ],
};

/// 16-bit general-purpose registers, including the 16-bit instruction
/// pointer.
pub const GP16: RegisterBank = RegisterBank {
    name: "gp16",
    entries: &[
        ("ax", ids::AX),
        ("bx", ids::BX),
        ("cx", ids::CX),
        ("dx", ids::DX),
        ("sp", ids::SP),
        ("bp", ids::BP),
        ("si", ids::SI),
        ("di", ids::DI),
        ("ip", ids::IP),
    ],
};

/// 32-bit general-purpose registers, including the 32-bit instruction
/// pointer.
pub const GP32: RegisterBank = RegisterBank {
    name: "gp32",
    entries: &[
        ("eax", ids::EAX),
        ("ebx", ids::EBX),
        ("ecx", ids::ECX),
        ("edx", ids::EDX),
        ("esp", ids::ESP),
        ("ebp", ids::EBP),
        ("esi", ids::ESI),
        ("edi", ids::EDI),
        ("eip", ids::EIP),
    ],
};

/// 64-bit general-purpose registers, including the 64-bit instruction
/// pointer.
pub const GP64: RegisterBank = RegisterBank {
    name: "gp64",
    entries: &[
        ("rax", ids::RAX),
        ("rbx", ids::RBX),
        ("rcx", ids::RCX),
        ("rdx", ids::RDX),
        ("rsi", ids::RSI),
        ("rdi", ids::RDI),
        ("rbp", ids::RBP),
        ("rsp", ids::RSP),
        ("r8", ids::R8),
        ("r9", ids::R9),
        ("r10", ids::R10),
        ("r11", ids::R11),
        ("r12", ids::R12),
        ("r13", ids::R13),
        ("r14", ids::R14),
        ("r15", ids::R15),
        ("rip", ids::RIP),
    ],
};

/// Control registers.
pub const CONTROL: RegisterBank = RegisterBank {
    name: "control",
    entries: &[
        ("cr0", ids::CR0),
        ("cr1", ids::CR1),
        ("cr2", ids::CR2),
        ("cr3", ids::CR3),
        ("cr4", ids::CR4),
    ],
};

/// x87 floating-point stack registers.
pub const X87: RegisterBank = RegisterBank {
    name: "x87",
    entries: &[
        ("st0", ids::ST0),
        ("st1", ids::ST1),
        ("st2", ids::ST2),
        ("st3", ids::ST3),
        ("st4", ids::ST4),
        ("st5", ids::ST5),
        ("st6", ids::ST6),
        ("st7", ids::ST7),
    ],
};

/// Flags register and segment selectors.
///
/// Every entry is 16 bits wide except the flags view; see
/// [`crate::width::EFLAGS_WIDTH_BITS`].
pub const MISC: RegisterBank = RegisterBank {
    name: "misc",
    entries: &[
        ("ef", ids::EF),
        ("cs", ids::CS),
        ("ss", ids::SS),
        ("ds", ids::DS),
        ("es", ids::ES),
        ("fs", ids::FS),
        ("gs", ids::GS),
    ],
};

/// REX-prefix 8-bit register aliases, 64-bit variant only.
pub const REX8: RegisterBank = RegisterBank {
    name: "rex8",
    entries: &[
        ("spl", ids::SPL),
        ("bpl", ids::BPL),
        ("sil", ids::SIL),
        ("dil", ids::DIL),
        ("r8b", ids::R8B),
        ("r9b", ids::R9B),
        ("r10b", ids::R10B),
        ("r11b", ids::R11B),
        ("r12b", ids::R12B),
        ("r13b", ids::R13B),
        ("r14b", ids::R14B),
        ("r15b", ids::R15B),
    ],
};

/// REX-prefix 16-bit register aliases, 64-bit variant only.
pub const REX16: RegisterBank = RegisterBank {
    name: "rex16",
    entries: &[
        ("r8w", ids::R8W),
        ("r9w", ids::R9W),
        ("r10w", ids::R10W),
        ("r11w", ids::R11W),
        ("r12w", ids::R12W),
        ("r13w", ids::R13W),
        ("r14w", ids::R14W),
        ("r15w", ids::R15W),
    ],
};

/// REX-prefix 32-bit register aliases, 64-bit variant only.
pub const REX32: RegisterBank = RegisterBank {
    name: "rex32",
    entries: &[
        ("r8d", ids::R8D),
        ("r9d", ids::R9D),
        ("r10d", ids::R10D),
        ("r11d", ids::R11D),
        ("r12d", ids::R12D),
        ("r13d", ids::R13D),
        ("r14d", ids::R14D),
        ("r15d", ids::R15D),
    ],
};

/// Segment base pseudo-registers, 64-bit variant only.
pub const SEGBASE: RegisterBank = RegisterBank {
    name: "seg_base",
    entries: &[("fsbase", ids::FSBASE), ("gsbase", ids::GSBASE)],
};

/// Every bank, in contract declaration order.
pub const ALL_BANKS: [&RegisterBank; 11] = [
    &GP8, &GP16, &GP32, &GP64, &CONTROL, &X87, &MISC, &REX8, &REX16, &REX32, &SEGBASE,
];

// Bank data is validated when the crate compiles, not when a session is
// built.
const _: () = assert_banks_well_formed();

const fn assert_banks_well_formed() {
    let mut bank = 0;
    while bank < ALL_BANKS.len() {
        let entries = ALL_BANKS[bank].entries;
        let mut i = 0;
        while i < entries.len() {
            let mut j = i + 1;
            while j < entries.len() {
                assert!(
                    entries[i].1.raw() != entries[j].1.raw(),
                    "bank declares a duplicate identifier"
                );
                assert!(
                    !const_str_eq(entries[i].0, entries[j].0),
                    "bank declares a duplicate name"
                );
                j += 1;
            }
            i += 1;
        }
        bank += 1;
    }
}

const fn const_str_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }

    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }

    true
}

/// Per-variant register layout row: the bank recipe plus the designated
/// program-counter and stack-pointer names.
///
/// Canonical rows come from [`RegisterLayout::for_variant`]; an explicit
/// row can be supplied to [`crate::ArchCore::with_layout`] to model
/// restricted or experimental register sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterLayout {
    /// Banks unioned into the table, in declaration order.
    pub banks: &'static [&'static RegisterBank],
    /// Designated program-counter name; must resolve in the union.
    pub pc_name: &'static str,
    /// Designated stack-pointer name; must resolve in the union.
    pub sp_name: &'static str,
}

impl RegisterLayout {
    /// The canonical row for `variant`.
    #[must_use]
    pub const fn for_variant(variant: ArchVariant) -> Self {
        let banks: &'static [&'static RegisterBank] = match variant {
            ArchVariant::A8086 => &[&GP8, &GP16, &MISC],
            ArchVariant::X86 => &[&GP8, &GP16, &GP32, &CONTROL, &X87, &MISC],
            ArchVariant::X86_64 => &[
                &GP8, &GP16, &GP32, &GP64, &CONTROL, &X87, &MISC, &REX8, &REX16, &REX32, &SEGBASE,
            ],
        };

        Self {
            banks,
            pc_name: variant.pc_name(),
            sp_name: variant.sp_name(),
        }
    }
}

/// Insertion-ordered union of one variant's banks, with a reverse
/// identifier view.
///
/// Two builds of the same recipe produce identical ordered entries; the
/// reverse view keeps the first name declared for an identifier.
#[derive(Debug, Clone)]
pub struct RegisterTable {
    variant: ArchVariant,
    names: IndexMap<&'static str, RegisterId>,
    ids: IndexMap<RegisterId, &'static str>,
}

impl RegisterTable {
    /// Builds the canonical table for `variant`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateName`] when two banks in the
    /// recipe declare the same name; the union never silently overwrites.
    pub fn for_variant(variant: ArchVariant) -> Result<Self, ConfigurationError> {
        Self::from_banks(variant, RegisterLayout::for_variant(variant).banks)
    }

    /// Builds a table from an explicit bank list in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateName`] when two banks in the
    /// list declare the same name.
    pub fn from_banks(
        variant: ArchVariant,
        banks: &[&'static RegisterBank],
    ) -> Result<Self, ConfigurationError> {
        let capacity: usize = banks.iter().map(|bank| bank.len()).sum();
        let mut origins: IndexMap<&'static str, &'static str> = IndexMap::with_capacity(capacity);
        let mut names = IndexMap::with_capacity(capacity);
        let mut ids = IndexMap::with_capacity(capacity);

        for bank in banks {
            for &(name, id) in bank.entries {
                if let Some(&first) = origins.get(name) {
                    return Err(ConfigurationError::DuplicateName {
                        name,
                        first,
                        second: bank.name,
                    });
                }

                origins.insert(name, bank.name);
                names.insert(name, id);
                ids.entry(id).or_insert(name);
            }
        }

        Ok(Self {
            variant,
            names,
            ids,
        })
    }

    /// Variant whose recipe produced this table.
    #[must_use]
    pub const fn variant(&self) -> ArchVariant {
        self.variant
    }

    /// Native identifier for `name`, if declared.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<RegisterId> {
        self.names.get(name).copied()
    }

    /// First declared name for `id`, if any bank of the union declares it.
    #[must_use]
    pub fn name_of(&self, id: RegisterId) -> Option<&'static str> {
        self.ids.get(&id).copied()
    }

    /// Returns `true` when `name` is declared.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Returns `true` when `id` is declared by any bank of the union.
    #[must_use]
    pub fn contains_id(&self, id: RegisterId) -> bool {
        self.ids.contains_key(&id)
    }

    /// Number of symbolic names in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` for a table with no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entries as `(name, id)` pairs, in contract order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, RegisterId)> + '_ {
        self.names.iter().map(|(&name, &id)| (name, id))
    }

    /// Entry at `index` in contract order.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&'static str, RegisterId)> {
        self.names.get_index(index).map(|(&name, &id)| (name, id))
    }
}
