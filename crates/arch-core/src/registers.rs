//! Runtime register access bound to one live emulation context.

use std::rc::Rc;

use crate::engine::{EmuContext, RegisterId, SharedContext};
use crate::error::UnknownRegisterError;
use crate::tables::RegisterTable;

/// Register selector, by symbolic name or by native identifier.
///
/// The two resolution paths are explicit rather than guessed from the
/// argument; `From` keeps call sites terse (`regs.read("rax")`,
/// `regs.read(ids::RAX)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterRef<'a> {
    /// Resolve through the session table's name mapping.
    Name(&'a str),
    /// Use a native identifier directly, still validated against the table.
    Id(RegisterId),
}

impl<'a> From<&'a str> for RegisterRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<RegisterId> for RegisterRef<'a> {
    fn from(id: RegisterId) -> Self {
        Self::Id(id)
    }
}

/// Binds one variant's register table to the session's live context.
///
/// The table is shared read-only with the descriptor; the context handle is
/// the same one [`crate::ArchCore::engine`] returns, so reads and writes
/// made here are visible to every other holder of the session context.
pub struct RegisterManager<C: EmuContext> {
    context: SharedContext<C>,
    table: Rc<RegisterTable>,
    pc_id: RegisterId,
    sp_id: RegisterId,
}

impl<C: EmuContext> RegisterManager<C> {
    /// Binds a context to a table whose designated identifiers were already
    /// resolved during session construction.
    pub(crate) fn with_ids(
        context: SharedContext<C>,
        table: Rc<RegisterTable>,
        pc_id: RegisterId,
        sp_id: RegisterId,
    ) -> Self {
        Self {
            context,
            table,
            pc_id,
            sp_id,
        }
    }

    fn resolve(&self, reg: RegisterRef<'_>) -> Result<RegisterId, UnknownRegisterError> {
        match reg {
            RegisterRef::Name(name) => self
                .table
                .id_of(name)
                .ok_or_else(|| UnknownRegisterError::Name(name.to_owned())),
            RegisterRef::Id(id) => {
                if self.table.contains_id(id) {
                    Ok(id)
                } else {
                    Err(UnknownRegisterError::Id(id))
                }
            }
        }
    }

    /// Reads the current value of a register by name or identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRegisterError`] when the selector is absent from
    /// the session's table or rejected by the bound context.
    pub fn read<'a>(&self, reg: impl Into<RegisterRef<'a>>) -> Result<u64, UnknownRegisterError> {
        let id = self.resolve(reg.into())?;
        self.context.borrow().read_register(id)
    }

    /// Writes a register by name or identifier.
    ///
    /// Values wider than the register truncate to its width inside the
    /// engine; truncation is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRegisterError`] when the selector is absent from
    /// the session's table or rejected by the bound context.
    pub fn write<'a>(
        &self,
        reg: impl Into<RegisterRef<'a>>,
        value: u64,
    ) -> Result<(), UnknownRegisterError> {
        let id = self.resolve(reg.into())?;
        self.context.borrow_mut().write_register(id, value)
    }

    /// Reads the designated program counter.
    ///
    /// The designated name was validated at session construction, so only
    /// the bound context can reject the access.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRegisterError`] when the bound context rejects the
    /// pre-resolved identifier.
    pub fn pc(&self) -> Result<u64, UnknownRegisterError> {
        self.context.borrow().read_register(self.pc_id)
    }

    /// Writes the designated program counter.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRegisterError`] when the bound context rejects the
    /// pre-resolved identifier.
    pub fn set_pc(&self, value: u64) -> Result<(), UnknownRegisterError> {
        self.context.borrow_mut().write_register(self.pc_id, value)
    }

    /// Reads the designated stack pointer.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRegisterError`] when the bound context rejects the
    /// pre-resolved identifier.
    pub fn sp(&self) -> Result<u64, UnknownRegisterError> {
        self.context.borrow().read_register(self.sp_id)
    }

    /// Writes the designated stack pointer.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRegisterError`] when the bound context rejects the
    /// pre-resolved identifier.
    pub fn set_sp(&self, value: u64) -> Result<(), UnknownRegisterError> {
        self.context.borrow_mut().write_register(self.sp_id, value)
    }

    /// Read-only ordered name/identifier mapping for auxiliary consumers.
    #[must_use]
    pub fn mapping(&self) -> &RegisterTable {
        &self.table
    }

    /// Native identifier behind the program-counter alias.
    #[must_use]
    pub const fn pc_id(&self) -> RegisterId {
        self.pc_id
    }

    /// Native identifier behind the stack-pointer alias.
    #[must_use]
    pub const fn sp_id(&self) -> RegisterId {
        self.sp_id
    }
}
