//! Self-contained reference engine backend with in-memory register
//! storage.
//!
//! Stands in for native engine bindings in unit tests, examples and the
//! fuzz harness. Writes truncate to each slot's width the way the real
//! engines do; aliasing between width classes (`al` inside `ax` inside
//! `eax`) is not modeled, every identifier owns an independent slot.

use indexmap::IndexMap;

use crate::engine::{
    EmuContext, EngineMode, EngineProvider, EngineSpec, MsrId, RegisterId,
};
use crate::error::{EngineInitError, UnknownRegisterError};
use crate::tables::{
    ids, RegisterBank, RegisterTable, CONTROL, GP16, GP32, GP64, GP8, MISC, REX16, REX32, REX8,
    SEGBASE, X87,
};
use crate::variant::ArchVariant;
use crate::width::{scan_declared, EFLAGS_WIDTH_BITS};

/// Engine provider backed by [`SoftContext`] and spec-recording handles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftEngineProvider;

/// Disassembler stand-in recording the spec it was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftDisassembler {
    spec: EngineSpec,
}

impl SoftDisassembler {
    /// Family/mode pair this handle was created for.
    #[must_use]
    pub const fn spec(&self) -> EngineSpec {
        self.spec
    }
}

/// Assembler stand-in recording the spec it was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftAssembler {
    spec: EngineSpec,
}

impl SoftAssembler {
    /// Family/mode pair this handle was created for.
    #[must_use]
    pub const fn spec(&self) -> EngineSpec {
        self.spec
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    bits: u32,
    value: u64,
}

/// In-memory emulation context with one slot per table identifier.
#[derive(Debug, Clone)]
pub struct SoftContext {
    spec: EngineSpec,
    slots: IndexMap<RegisterId, Slot>,
    msrs: IndexMap<MsrId, u64>,
}

impl SoftContext {
    /// Creates a context for `spec`, seeding zeroed slots from the matching
    /// variant's canonical table.
    ///
    /// # Errors
    ///
    /// Returns [`EngineInitError`] when the canonical table for the
    /// requested mode cannot be built.
    pub fn for_spec(spec: EngineSpec) -> Result<Self, EngineInitError> {
        let variant = variant_for(spec.mode);
        let table = RegisterTable::for_variant(variant)
            .map_err(|error| EngineInitError::new(spec, error.to_string()))?;

        let mut slots = IndexMap::with_capacity(table.len());
        for (_, id) in table.iter() {
            let bits = storage_bits(spec.mode, id);
            slots.entry(id).or_insert(Slot { bits, value: 0 });
        }

        Ok(Self {
            spec,
            slots,
            msrs: IndexMap::new(),
        })
    }

    /// Family/mode pair this context was created for.
    #[must_use]
    pub const fn spec(&self) -> EngineSpec {
        self.spec
    }

    /// Number of independent register slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

impl EmuContext for SoftContext {
    fn read_register(&self, id: RegisterId) -> Result<u64, UnknownRegisterError> {
        self.slots
            .get(&id)
            .map(|slot| slot.value)
            .ok_or(UnknownRegisterError::Id(id))
    }

    fn write_register(&mut self, id: RegisterId, value: u64) -> Result<(), UnknownRegisterError> {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                slot.value = mask_to_bits(value, slot.bits);
                Ok(())
            }
            None => Err(UnknownRegisterError::Id(id)),
        }
    }

    fn read_msr(&self, msr: MsrId) -> Result<u64, UnknownRegisterError> {
        Ok(self.msrs.get(&msr).copied().unwrap_or(0))
    }

    fn write_msr(&mut self, msr: MsrId, value: u64) -> Result<(), UnknownRegisterError> {
        self.msrs.insert(msr, value);

        Ok(())
    }
}

impl EngineProvider for SoftEngineProvider {
    type Context = SoftContext;
    type Disassembler = SoftDisassembler;
    type Assembler = SoftAssembler;

    fn create_context(&self, spec: EngineSpec) -> Result<Self::Context, EngineInitError> {
        SoftContext::for_spec(spec)
    }

    fn create_disassembler(&self, spec: EngineSpec) -> Result<Self::Disassembler, EngineInitError> {
        Ok(SoftDisassembler { spec })
    }

    fn create_assembler(&self, spec: EngineSpec) -> Result<Self::Assembler, EngineInitError> {
        Ok(SoftAssembler { spec })
    }
}

const fn variant_for(mode: EngineMode) -> ArchVariant {
    match mode {
        EngineMode::Mode16 => ArchVariant::A8086,
        EngineMode::Mode32 => ArchVariant::X86,
        EngineMode::Mode64 => ArchVariant::X86_64,
    }
}

const fn mask_to_bits(value: u64, bits: u32) -> u64 {
    if bits >= u64::BITS {
        value
    } else {
        value & ((1_u64 << bits) - 1)
    }
}

// Storage widths: the flags view is held at 32 bits in every mode, control
// and segment-base slots follow the mode's word width, x87 slots follow
// the declared 32-bit convention.
fn storage_bits(mode: EngineMode, id: RegisterId) -> u32 {
    if id == ids::EF {
        return EFLAGS_WIDTH_BITS;
    }

    let word = match mode {
        EngineMode::Mode16 => 16,
        EngineMode::Mode32 => 32,
        EngineMode::Mode64 => 64,
    };

    let natural: &[(&RegisterBank, u32)] = &[
        (&GP8, 8),
        (&GP16, 16),
        (&GP32, 32),
        (&GP64, 64),
        (&REX8, 8),
        (&REX16, 16),
        (&REX32, 32),
        (&X87, 32),
        (&MISC, 16),
        (&CONTROL, word),
        (&SEGBASE, word),
    ];

    scan_declared(natural, id)
}
