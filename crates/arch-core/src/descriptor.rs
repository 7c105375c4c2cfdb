//! The architecture descriptor: one session's engine wiring and register
//! access, built from a variant selector and an engine backend.

use std::cell::RefCell;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::engine::{EngineProvider, EngineSpec, RegisterId, SharedContext};
use crate::error::{ConfigurationError, EngineInitError};
use crate::msr::MsrAccess;
use crate::registers::{RegisterManager, RegisterRef};
use crate::tables::{RegisterLayout, RegisterTable};
use crate::variant::{ArchVariant, Endianness};
use crate::width::{x64_register_bits, UNKNOWN_WIDTH_BITS};

/// Configured architecture layer for one emulation session.
///
/// Construction validates the register layout eagerly, before any engine
/// exists. The three engine handles and the register and MSR managers are
/// created lazily on first access, at most once each, and stay
/// identity-stable for the session's lifetime. A failed engine constructor
/// leaves its holder empty; the error is propagated and the session is
/// expected to be dropped.
pub struct ArchCore<P: EngineProvider> {
    variant: ArchVariant,
    provider: P,
    table: Rc<RegisterTable>,
    pc_id: RegisterId,
    sp_id: RegisterId,
    context: OnceCell<SharedContext<P::Context>>,
    disassembler: OnceCell<P::Disassembler>,
    assembler: OnceCell<P::Assembler>,
    registers: OnceCell<RegisterManager<P::Context>>,
    msr: OnceCell<MsrAccess<P::Context>>,
}

impl<P: EngineProvider> ArchCore<P> {
    /// Creates the descriptor for `variant` with its canonical register
    /// layout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the layout is malformed; no
    /// partial descriptor is handed out and no engine is constructed.
    pub fn new(variant: ArchVariant, provider: P) -> Result<Self, ConfigurationError> {
        Self::with_layout(variant, provider, RegisterLayout::for_variant(variant))
    }

    /// Creates the descriptor with an explicit layout row.
    ///
    /// The table is built and the designated program-counter and
    /// stack-pointer names are resolved here, so a layout that omits either
    /// anchor fails before any engine exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for a duplicate register name in the
    /// recipe or a designated name missing from the union.
    pub fn with_layout(
        variant: ArchVariant,
        provider: P,
        layout: RegisterLayout,
    ) -> Result<Self, ConfigurationError> {
        let table = RegisterTable::from_banks(variant, layout.banks)?;
        let pc_id = table
            .id_of(layout.pc_name)
            .ok_or(ConfigurationError::MissingProgramCounter {
                variant,
                name: layout.pc_name,
            })?;
        let sp_id = table
            .id_of(layout.sp_name)
            .ok_or(ConfigurationError::MissingStackPointer {
                variant,
                name: layout.sp_name,
            })?;

        Ok(Self {
            variant,
            provider,
            table: Rc::new(table),
            pc_id,
            sp_id,
            context: OnceCell::new(),
            disassembler: OnceCell::new(),
            assembler: OnceCell::new(),
            registers: OnceCell::new(),
            msr: OnceCell::new(),
        })
    }

    /// Variant identity selected for this session.
    #[must_use]
    pub const fn variant(&self) -> ArchVariant {
        self.variant
    }

    /// Native word width in bits.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.variant.bits()
    }

    /// Byte order of the family.
    #[must_use]
    pub const fn endian(&self) -> Endianness {
        self.variant.endian()
    }

    /// Family/mode row handed to this session's engine constructors.
    #[must_use]
    pub const fn engine_spec(&self) -> EngineSpec {
        self.variant.engine_spec()
    }

    /// Register table built for this session, available before any engine.
    #[must_use]
    pub fn register_table(&self) -> &RegisterTable {
        &self.table
    }

    /// The live emulation context, created on first access.
    ///
    /// # Errors
    ///
    /// Returns [`EngineInitError`] when the backend rejects the session's
    /// family/mode pair.
    pub fn engine(&self) -> Result<&SharedContext<P::Context>, EngineInitError> {
        self.context.get_or_try_init(|| {
            self.provider
                .create_context(self.variant.engine_spec())
                .map(|context| Rc::new(RefCell::new(context)))
        })
    }

    /// The disassembler handle, created on first access.
    ///
    /// # Errors
    ///
    /// Returns [`EngineInitError`] when the backend rejects the session's
    /// family/mode pair.
    pub fn disassembler(&self) -> Result<&P::Disassembler, EngineInitError> {
        self.disassembler
            .get_or_try_init(|| self.provider.create_disassembler(self.variant.engine_spec()))
    }

    /// The assembler handle, created on first access.
    ///
    /// # Errors
    ///
    /// Returns [`EngineInitError`] when the backend rejects the session's
    /// family/mode pair.
    pub fn assembler(&self) -> Result<&P::Assembler, EngineInitError> {
        self.assembler
            .get_or_try_init(|| self.provider.create_assembler(self.variant.engine_spec()))
    }

    /// Register manager bound to the live context, created on first access.
    ///
    /// Shares the context created by [`Self::engine`], creating it first if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineInitError`] when the backend rejects the session's
    /// family/mode pair while creating the context.
    pub fn registers(&self) -> Result<&RegisterManager<P::Context>, EngineInitError> {
        self.registers.get_or_try_init(|| {
            let context = Rc::clone(self.engine()?);

            Ok(RegisterManager::with_ids(
                context,
                Rc::clone(&self.table),
                self.pc_id,
                self.sp_id,
            ))
        })
    }

    /// Model-specific register access, created on first access.
    ///
    /// Shares the context created by [`Self::engine`], creating it first if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineInitError`] when the backend rejects the session's
    /// family/mode pair while creating the context.
    pub fn msr(&self) -> Result<&MsrAccess<P::Context>, EngineInitError> {
        self.msr.get_or_try_init(|| {
            let context = Rc::clone(self.engine()?);

            Ok(MsrAccess::bind(context))
        })
    }

    /// Declared bit width of a register by name or identifier.
    ///
    /// Defined for the 64-bit variant only: control and segment-base widths
    /// differ on smaller variants, so those sessions report
    /// [`UNKNOWN_WIDTH_BITS`] instead of a wrong answer. Unknown names and
    /// identifiers report the sentinel too; the query never fails and needs
    /// no engine.
    #[must_use]
    pub fn register_bits<'a>(&self, reg: impl Into<RegisterRef<'a>>) -> u32 {
        if self.variant != ArchVariant::X86_64 {
            return UNKNOWN_WIDTH_BITS;
        }

        match reg.into() {
            RegisterRef::Name(name) => self
                .table
                .id_of(name)
                .map_or(UNKNOWN_WIDTH_BITS, x64_register_bits),
            RegisterRef::Id(id) => x64_register_bits(id),
        }
    }
}
