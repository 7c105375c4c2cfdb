#![no_main]

use arch_core::{ArchCore, ArchVariant, RegisterId, SoftEngineProvider};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 12 {
        return;
    }

    let variant = ArchVariant::ALL[usize::from(data[0]) % ArchVariant::ALL.len()];
    let Ok(core) = ArchCore::new(variant, SoftEngineProvider) else {
        return;
    };
    let Ok(regs) = core.registers() else {
        return;
    };
    let table_len = core.register_table().len();

    for chunk in data[1..].chunks_exact(11) {
        let op = chunk[0] % 5;
        let raw = u16::from_le_bytes([chunk[1], chunk[2]]);
        let index = usize::from(raw) % table_len;
        let value = u64::from_le_bytes([
            chunk[3], chunk[4], chunk[5], chunk[6], chunk[7], chunk[8], chunk[9], chunk[10],
        ]);
        let (name, id) = core
            .register_table()
            .get_index(index)
            .expect("index bounded by table length");

        match op {
            0 => {
                regs.write(name, value).expect("in-table write by name");
            }
            1 => {
                regs.write(id, value).expect("in-table write by id");
            }
            2 => {
                let read = regs.read(name).expect("in-table read");
                let bits = core.register_bits(id);
                if bits > 0 && bits < 64 {
                    assert!(read < (1_u64 << bits));
                }
            }
            3 => {
                regs.set_pc(value).expect("pc write");
                regs.pc().expect("pc read");
                regs.set_sp(value).expect("sp write");
                regs.sp().expect("sp read");
            }
            _ => {
                // Arbitrary ids must resolve to a typed error or a value,
                // never a panic.
                let _ = regs.read(RegisterId::new(raw));
                let _ = core.register_bits(RegisterId::new(raw));
            }
        }
    }
});
