//! Architecture abstraction and register management for Intel-family
//! emulation sessions.
//!
//! Given an [`ArchVariant`] selector and an [`EngineProvider`] backend, the
//! crate wires up one session: a live emulation context, a disassembler
//! and an assembler, plus a bidirectional symbolic-name/native-identifier
//! register mapping with designated program-counter and stack-pointer
//! aliases. The register layout is validated eagerly at construction;
//! every engine handle is created lazily on first access, cached for the
//! session and identity-stable afterwards.
//!
//! Sessions are single-threaded. Accessors share the live context through
//! [`SharedContext`]; see its documentation for the borrowing rules.
//!
//! ```
//! use arch_core::{ArchCore, ArchVariant, SoftEngineProvider};
//!
//! # fn main() -> Result<(), arch_core::ArchError> {
//! let core = ArchCore::new(ArchVariant::X86_64, SoftEngineProvider)?;
//! let regs = core.registers()?;
//!
//! regs.set_pc(0x40_1000)?;
//! assert_eq!(regs.read("rip")?, 0x40_1000);
//! assert_eq!(core.register_bits("rip"), 64);
//! # Ok(())
//! # }
//! ```

/// Typed error taxonomy for session construction and register access.
pub mod error;
pub use error::{ArchError, ConfigurationError, EngineInitError, UnknownRegisterError};

/// Closed architecture-variant identity and its per-variant static facts.
pub mod variant;
pub use variant::{ArchVariant, Endianness};

/// Engine capability contract consumed by the architecture layer.
pub mod engine;
pub use engine::{
    EmuContext, EngineFamily, EngineMode, EngineProvider, EngineSpec, MsrId, RegisterId,
    SharedContext,
};

/// Register bank data and the per-variant table builder.
pub mod tables;
pub use tables::{
    ids, RegisterBank, RegisterLayout, RegisterTable, ALL_BANKS, CONTROL, GP16, GP32, GP64, GP8,
    MISC, REX16, REX32, REX8, SEGBASE, X87,
};

/// Runtime register access bound to one live emulation context.
pub mod registers;
pub use registers::{RegisterManager, RegisterRef};

/// Register bit-width resolution under the 64-bit variant's convention.
pub mod width;
pub use width::{x64_register_bits, EFLAGS_WIDTH_BITS, UNKNOWN_WIDTH_BITS};

/// Model-specific register access.
pub mod msr;
pub use msr::{
    MsrAccess, IA32_CSTAR, IA32_EFER, IA32_FMASK, IA32_FS_BASE, IA32_GS_BASE,
    IA32_KERNEL_GS_BASE, IA32_LSTAR, IA32_STAR,
};

/// The architecture descriptor for one session.
pub mod descriptor;
pub use descriptor::ArchCore;

/// Self-contained reference engine backend.
pub mod soft;
pub use soft::{SoftAssembler, SoftContext, SoftDisassembler, SoftEngineProvider};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
