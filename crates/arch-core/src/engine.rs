//! Engine capability contract consumed by the architecture layer.
//!
//! One session reconciles three independent native engines (emulation,
//! disassembly, assembly) behind a single vocabulary: [`EngineSpec`] names
//! the family/mode pair and each backend translates it to its own mode
//! constants. The layer never speaks a backend's constants directly.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{EngineInitError, UnknownRegisterError};

/// Shared handle to the live emulation context of one session.
///
/// Sessions are single-threaded: the descriptor, the register manager and
/// the MSR accessor share one context through `Rc<RefCell<_>>`. Borrow
/// rules are enforced at runtime, so hosts must keep direct context borrows
/// short. A multi-threaded host would swap this alias for a lock.
pub type SharedContext<C> = Rc<RefCell<C>>;

/// Native register identifier in the contract's stable numbering.
///
/// Values are grouped in per-bank blocks (see [`crate::tables::ids`]) and
/// are part of the backend contract: renumbering breaks backends and any
/// debug bridge that reports identifiers on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterId(u16);

impl RegisterId {
    /// Wraps a raw identifier value.
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Model-specific register selector, meaningful for this family only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MsrId(u32);

impl MsrId {
    /// Wraps a raw MSR selector.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw MSR selector value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MsrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Processor family tag shared by all three engine capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum EngineFamily {
    /// Intel x86 family, every word width.
    X86,
}

impl fmt::Display for EngineFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X86 => f.write_str("x86"),
        }
    }
}

/// Word-width mode tag shared by all three engine capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum EngineMode {
    /// 16-bit register and addressing mode.
    Mode16,
    /// 32-bit register and addressing mode.
    Mode32,
    /// 64-bit register and addressing mode.
    Mode64,
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Mode16 => "mode16",
            Self::Mode32 => "mode32",
            Self::Mode64 => "mode64",
        };

        f.write_str(label)
    }
}

/// Family/mode pair handed to every engine constructor.
///
/// All three engines of one session receive the same pair, keeping their
/// modes consistent by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct EngineSpec {
    /// Processor family.
    pub family: EngineFamily,
    /// Word-width mode within the family.
    pub mode: EngineMode,
}

impl fmt::Display for EngineSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family, self.mode)
    }
}

/// Live emulation context capability.
///
/// Writes wider than the destination register truncate to the register's
/// width inside the engine, matching native hardware behavior; truncation
/// is never an error.
pub trait EmuContext {
    /// Reads the current value of a native register.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRegisterError::Id`] when the context does not model
    /// the identifier.
    fn read_register(&self, id: RegisterId) -> Result<u64, UnknownRegisterError>;

    /// Writes a native register, truncating the value to its width.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRegisterError::Id`] when the context does not model
    /// the identifier.
    fn write_register(&mut self, id: RegisterId, value: u64) -> Result<(), UnknownRegisterError>;

    /// Reads a model-specific register.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRegisterError::Msr`] when the context does not
    /// recognize the selector.
    fn read_msr(&self, msr: MsrId) -> Result<u64, UnknownRegisterError>;

    /// Writes a model-specific register.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRegisterError::Msr`] when the context does not
    /// recognize the selector.
    fn write_msr(&mut self, msr: MsrId, value: u64) -> Result<(), UnknownRegisterError>;
}

/// Factory capability bundling the three engines of one backend.
///
/// The descriptor calls each constructor lazily and at most once per
/// session. A rejection is fatal for the session; the descriptor performs
/// no retries on its own.
pub trait EngineProvider {
    /// Live emulation context produced by this backend.
    type Context: EmuContext;
    /// Opaque disassembler handle produced by this backend.
    type Disassembler;
    /// Opaque assembler handle produced by this backend.
    type Assembler;

    /// Creates the emulation context for `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineInitError`] when the backend cannot honor `spec`.
    fn create_context(&self, spec: EngineSpec) -> Result<Self::Context, EngineInitError>;

    /// Creates the disassembler handle for `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineInitError`] when the backend cannot honor `spec`.
    fn create_disassembler(&self, spec: EngineSpec) -> Result<Self::Disassembler, EngineInitError>;

    /// Creates the assembler handle for `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineInitError`] when the backend cannot honor `spec`.
    fn create_assembler(&self, spec: EngineSpec) -> Result<Self::Assembler, EngineInitError>;
}
