//! Walks every supported variant through one soft-backend session.

use arch_core::{ArchCore, ArchError, ArchVariant, SoftEngineProvider};
use indexmap as _;
use once_cell as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn main() -> Result<(), ArchError> {
    for variant in ArchVariant::ALL {
        let core = ArchCore::new(variant, SoftEngineProvider)?;
        let regs = core.registers()?;

        regs.set_pc(0x7C00)?;
        regs.set_sp(0xFFFE)?;

        println!(
            "{variant}: {} bits, {} endian, {} registers",
            core.bits(),
            core.endian(),
            core.register_table().len(),
        );
        println!(
            "  pc `{}` ({}) = {:#06x}",
            core.variant().pc_name(),
            regs.pc_id(),
            regs.pc()?,
        );
        println!(
            "  sp `{}` ({}) = {:#06x}",
            core.variant().sp_name(),
            regs.sp_id(),
            regs.sp()?,
        );
    }

    Ok(())
}
