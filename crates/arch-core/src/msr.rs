//! Model-specific register access, an Intel-family-only capability.

use crate::engine::{EmuContext, MsrId, SharedContext};
use crate::error::UnknownRegisterError;

/// Extended feature enable register (long mode and syscall control).
pub const IA32_EFER: MsrId = MsrId::new(0xC000_0080);
/// Legacy-mode syscall target selectors.
pub const IA32_STAR: MsrId = MsrId::new(0xC000_0081);
/// Long-mode syscall entry point.
pub const IA32_LSTAR: MsrId = MsrId::new(0xC000_0082);
/// Compatibility-mode syscall entry point.
pub const IA32_CSTAR: MsrId = MsrId::new(0xC000_0083);
/// Syscall flag mask.
pub const IA32_FMASK: MsrId = MsrId::new(0xC000_0084);
/// FS segment base address.
pub const IA32_FS_BASE: MsrId = MsrId::new(0xC000_0100);
/// GS segment base address.
pub const IA32_GS_BASE: MsrId = MsrId::new(0xC000_0101);
/// Kernel GS base swapped in by `swapgs`.
pub const IA32_KERNEL_GS_BASE: MsrId = MsrId::new(0xC000_0102);

/// Model-specific register access bound to the session's live context.
///
/// Shares the context with [`crate::RegisterManager`]; base-address MSR
/// writes are therefore visible to subsequent segment-base register reads
/// on backends that model the aliasing.
pub struct MsrAccess<C: EmuContext> {
    context: SharedContext<C>,
}

impl<C: EmuContext> MsrAccess<C> {
    pub(crate) fn bind(context: SharedContext<C>) -> Self {
        Self { context }
    }

    /// Reads `msr` from the live context.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRegisterError::Msr`] when the context does not
    /// recognize the selector.
    pub fn read(&self, msr: MsrId) -> Result<u64, UnknownRegisterError> {
        self.context.borrow().read_msr(msr)
    }

    /// Writes `msr` in the live context.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRegisterError::Msr`] when the context does not
    /// recognize the selector.
    pub fn write(&self, msr: MsrId, value: u64) -> Result<(), UnknownRegisterError> {
        self.context.borrow_mut().write_msr(msr, value)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{MsrAccess, IA32_EFER, IA32_LSTAR};
    use crate::soft::SoftContext;
    use crate::variant::ArchVariant;

    fn access() -> MsrAccess<SoftContext> {
        let spec = ArchVariant::X86_64.engine_spec();
        let context = Rc::new(RefCell::new(SoftContext::for_spec(spec).expect("soft backend")));

        MsrAccess::bind(context)
    }

    #[test]
    fn unwritten_selectors_read_as_zero() {
        let msr = access();

        assert_eq!(msr.read(IA32_EFER).expect("efer read"), 0);
    }

    #[test]
    fn written_selectors_read_back() {
        let msr = access();

        msr.write(IA32_LSTAR, 0xFFFF_8000_0010_0000).expect("lstar write");

        assert_eq!(msr.read(IA32_LSTAR).expect("lstar read"), 0xFFFF_8000_0010_0000);
        assert_eq!(msr.read(IA32_EFER).expect("efer read"), 0);
    }

    #[test]
    fn selector_values_are_pinned() {
        assert_eq!(IA32_EFER.raw(), 0xC000_0080);
        assert_eq!(IA32_LSTAR.raw(), 0xC000_0082);
        assert_eq!(super::IA32_KERNEL_GS_BASE.raw(), 0xC000_0102);
    }
}
