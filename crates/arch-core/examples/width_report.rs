//! Prints the per-register width report a debug bridge would serve,
//! without constructing any engine.

use arch_core::{ArchCore, ArchError, ArchVariant, SoftEngineProvider, UNKNOWN_WIDTH_BITS};
use indexmap as _;
use once_cell as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn main() -> Result<(), ArchError> {
    let core = ArchCore::new(ArchVariant::X86_64, SoftEngineProvider)?;
    let mut undeclared = 0_usize;

    for (name, id) in core.register_table().iter() {
        let bits = core.register_bits(id);
        if bits == UNKNOWN_WIDTH_BITS {
            undeclared += 1;
            println!("{name:>8}  {id}  --");
        } else {
            println!("{name:>8}  {id}  {bits:>2} bits");
        }
    }

    println!(
        "{} registers, {undeclared} without a declared width",
        core.register_table().len(),
    );

    Ok(())
}
