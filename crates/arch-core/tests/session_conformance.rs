//! End-to-end session coverage: eager layout validation, lazy engine
//! construction, memoization identity and the designated register aliases.

use std::cell::Cell;
use std::rc::Rc;

use arch_core::{
    ids, ArchCore, ArchError, ArchVariant, ConfigurationError, EmuContext, EngineFamily,
    EngineInitError, EngineMode, EngineProvider, EngineSpec, RegisterBank, RegisterLayout,
    SoftAssembler, SoftContext, SoftDisassembler, SoftEngineProvider, UnknownRegisterError,
    IA32_GS_BASE,
};
use indexmap as _;
use once_cell as _;
use proptest as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

#[derive(Default)]
struct Counters {
    contexts: Cell<u32>,
    disassemblers: Cell<u32>,
    assemblers: Cell<u32>,
}

struct CountingProvider {
    counters: Rc<Counters>,
    inner: SoftEngineProvider,
}

impl CountingProvider {
    fn new() -> (Self, Rc<Counters>) {
        let counters = Rc::new(Counters::default());
        let provider = Self {
            counters: Rc::clone(&counters),
            inner: SoftEngineProvider,
        };

        (provider, counters)
    }
}

impl EngineProvider for CountingProvider {
    type Context = SoftContext;
    type Disassembler = SoftDisassembler;
    type Assembler = SoftAssembler;

    fn create_context(&self, spec: EngineSpec) -> Result<Self::Context, EngineInitError> {
        self.counters.contexts.set(self.counters.contexts.get() + 1);
        self.inner.create_context(spec)
    }

    fn create_disassembler(&self, spec: EngineSpec) -> Result<Self::Disassembler, EngineInitError> {
        self.counters.disassemblers.set(self.counters.disassemblers.get() + 1);
        self.inner.create_disassembler(spec)
    }

    fn create_assembler(&self, spec: EngineSpec) -> Result<Self::Assembler, EngineInitError> {
        self.counters.assemblers.set(self.counters.assemblers.get() + 1);
        self.inner.create_assembler(spec)
    }
}

struct FailingProvider;

impl EngineProvider for FailingProvider {
    type Context = SoftContext;
    type Disassembler = SoftDisassembler;
    type Assembler = SoftAssembler;

    fn create_context(&self, spec: EngineSpec) -> Result<Self::Context, EngineInitError> {
        Err(EngineInitError::new(spec, "context backend unavailable"))
    }

    fn create_disassembler(&self, spec: EngineSpec) -> Result<Self::Disassembler, EngineInitError> {
        Err(EngineInitError::new(spec, "disassembler backend unavailable"))
    }

    fn create_assembler(&self, spec: EngineSpec) -> Result<Self::Assembler, EngineInitError> {
        Err(EngineInitError::new(spec, "assembler backend unavailable"))
    }
}

#[test]
fn pc_alias_matches_the_16_bit_instruction_pointer() {
    let core = ArchCore::new(ArchVariant::A8086, SoftEngineProvider).expect("canonical layout");
    let regs = core.registers().expect("soft engines");

    regs.write("ip", 0x7C00).expect("ip write");
    assert_eq!(regs.pc(), Ok(0x7C00));

    regs.set_pc(0x0100).expect("pc write");
    assert_eq!(regs.read("ip"), Ok(0x0100));
}

#[test]
fn pc_alias_matches_the_64_bit_instruction_pointer() {
    let core = ArchCore::new(ArchVariant::X86_64, SoftEngineProvider).expect("canonical layout");
    let regs = core.registers().expect("soft engines");

    regs.write("rip", 0xFFFF_FFFF_8000_0000).expect("rip write");
    assert_eq!(regs.pc(), Ok(0xFFFF_FFFF_8000_0000));

    regs.set_pc(0x40_1000).expect("pc write");
    assert_eq!(regs.read("rip"), Ok(0x40_1000));
}

#[rstest]
#[case(ArchVariant::A8086, "ip", "sp")]
#[case(ArchVariant::X86, "eip", "esp")]
#[case(ArchVariant::X86_64, "rip", "rsp")]
fn designated_aliases_resolve_per_variant(
    #[case] variant: ArchVariant,
    #[case] pc: &str,
    #[case] sp: &str,
) {
    let core = ArchCore::new(variant, SoftEngineProvider).expect("canonical layout");
    let regs = core.registers().expect("soft engines");

    regs.set_pc(0x1000).expect("pc write");
    regs.set_sp(0x2000).expect("sp write");

    assert_eq!(regs.read(pc), Ok(0x1000));
    assert_eq!(regs.read(sp), Ok(0x2000));
    assert_eq!(regs.mapping().id_of(pc), Some(regs.pc_id()));
    assert_eq!(regs.mapping().id_of(sp), Some(regs.sp_id()));
}

#[rstest]
#[case(ArchVariant::A8086, EngineMode::Mode16)]
#[case(ArchVariant::X86, EngineMode::Mode32)]
#[case(ArchVariant::X86_64, EngineMode::Mode64)]
fn one_mode_row_flows_into_every_engine_handle(
    #[case] variant: ArchVariant,
    #[case] mode: EngineMode,
) {
    let core = ArchCore::new(variant, SoftEngineProvider).expect("canonical layout");

    assert_eq!(core.engine_spec().family, EngineFamily::X86);
    assert_eq!(core.engine_spec().mode, mode);
    assert_eq!(core.disassembler().expect("disassembler").spec().mode, mode);
    assert_eq!(core.assembler().expect("assembler").spec().mode, mode);
    assert_eq!(core.engine().expect("context").borrow().spec().mode, mode);
}

#[test]
fn each_engine_is_created_once_and_stays_identity_stable() {
    let (provider, counters) = CountingProvider::new();
    let core = ArchCore::new(ArchVariant::X86, provider).expect("canonical layout");

    let first = Rc::clone(core.engine().expect("context"));
    let second = Rc::clone(core.engine().expect("context"));
    assert!(Rc::ptr_eq(&first, &second));

    let disasm_a: *const SoftDisassembler = core.disassembler().expect("disassembler");
    let disasm_b: *const SoftDisassembler = core.disassembler().expect("disassembler");
    assert!(std::ptr::eq(disasm_a, disasm_b));

    core.assembler().expect("assembler");
    core.assembler().expect("assembler");

    assert_eq!(counters.contexts.get(), 1);
    assert_eq!(counters.disassemblers.get(), 1);
    assert_eq!(counters.assemblers.get(), 1);
}

#[test]
fn register_and_msr_managers_share_the_single_context() {
    let (provider, counters) = CountingProvider::new();
    let core = ArchCore::new(ArchVariant::X86_64, provider).expect("canonical layout");

    core.registers()
        .expect("manager")
        .write("gsbase", 0x10_0000)
        .expect("gsbase write");
    core.msr()
        .expect("msr access")
        .write(IA32_GS_BASE, 0xFFFF_8880_0000_0000)
        .expect("msr write");

    let direct = core
        .engine()
        .expect("context")
        .borrow()
        .read_register(ids::GSBASE)
        .expect("gsbase read");

    assert_eq!(direct, 0x10_0000);
    assert_eq!(
        core.msr().expect("msr access").read(IA32_GS_BASE),
        Ok(0xFFFF_8880_0000_0000)
    );
    assert_eq!(counters.contexts.get(), 1);
}

#[test]
fn layout_without_a_stack_pointer_fails_before_any_engine_is_built() {
    const PC_ONLY: RegisterBank = RegisterBank {
        name: "pc_only",
        entries: &[("rip", ids::RIP)],
    };

    let (provider, counters) = CountingProvider::new();
    let layout = RegisterLayout {
        banks: &[&PC_ONLY],
        pc_name: "rip",
        sp_name: "rsp",
    };

    let result = ArchCore::with_layout(ArchVariant::X86_64, provider, layout);

    assert_eq!(
        result.err(),
        Some(ConfigurationError::MissingStackPointer {
            variant: ArchVariant::X86_64,
            name: "rsp",
        })
    );
    assert_eq!(counters.contexts.get(), 0);
    assert_eq!(counters.disassemblers.get(), 0);
    assert_eq!(counters.assemblers.get(), 0);
}

#[test]
fn engine_rejection_is_propagated_by_every_dependent_accessor() {
    let core = ArchCore::new(ArchVariant::X86, FailingProvider).expect("layout is valid");

    let error = core.engine().err().expect("context rejection");
    assert_eq!(error.spec, ArchVariant::X86.engine_spec());
    assert_eq!(
        error.to_string(),
        "engine rejected x86/mode32: context backend unavailable"
    );

    assert!(core.registers().is_err());
    assert!(core.msr().is_err());
    assert!(core.disassembler().is_err());
    assert!(core.assembler().is_err());
}

#[test]
fn write_values_truncate_to_register_width_end_to_end() {
    let core = ArchCore::new(ArchVariant::X86_64, SoftEngineProvider).expect("canonical layout");
    let regs = core.registers().expect("soft engines");

    regs.write("al", u64::MAX).expect("al write");
    regs.write("ax", 0x0001_FFFF).expect("ax write");
    regs.write("eax", u64::MAX).expect("eax write");
    regs.write("rax", u64::MAX).expect("rax write");

    assert_eq!(regs.read("al"), Ok(0xFF));
    assert_eq!(regs.read("ax"), Ok(0xFFFF));
    assert_eq!(regs.read("eax"), Ok(0xFFFF_FFFF));
    assert_eq!(regs.read("rax"), Ok(u64::MAX));
}

#[test]
fn mapping_view_serves_ordered_debug_bridge_enumeration() {
    let core = ArchCore::new(ArchVariant::X86_64, SoftEngineProvider).expect("canonical layout");
    let regs = core.registers().expect("soft engines");
    let mapping = regs.mapping();

    assert_eq!(mapping.len(), 93);
    assert_eq!(mapping.name_of(ids::RAX), Some("rax"));

    let names: Vec<&str> = mapping.iter().map(|(name, _)| name).collect();
    let position = |needle: &str| {
        names
            .iter()
            .position(|&name| name == needle)
            .unwrap_or_else(|| panic!("`{needle}` missing from the mapping"))
    };

    assert_eq!(names[0], "ah");
    assert!(position("ax") < position("eax"));
    assert!(position("eax") < position("rax"));
    assert!(position("rax") < position("cr0"));
    assert!(position("cr0") < position("st0"));
    assert!(position("st0") < position("ef"));
    assert!(position("ef") < position("spl"));
    assert!(position("spl") < position("r8w"));
    assert!(position("r8w") < position("r8d"));
    assert!(position("r8d") < position("fsbase"));
}

fn host_read(core: &ArchCore<SoftEngineProvider>, name: &str) -> Result<u64, ArchError> {
    Ok(core.registers()?.read(name)?)
}

#[test]
fn unknown_selectors_surface_recoverable_errors() {
    let core = ArchCore::new(ArchVariant::A8086, SoftEngineProvider).expect("canonical layout");

    assert_eq!(host_read(&core, "ax").expect("in-table read"), 0);
    assert!(matches!(
        host_read(&core, "rax"),
        Err(ArchError::UnknownRegister(UnknownRegisterError::Name(name))) if name == "rax"
    ));

    // The session stays usable after a failed lookup.
    core.registers()
        .expect("soft engines")
        .write("ax", 7)
        .expect("ax write");
    assert_eq!(host_read(&core, "ax").expect("in-table read"), 7);
}
