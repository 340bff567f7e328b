//! Forward-then-backward identity, instruction class by instruction class.
//!
//! A forward step followed by a backward step must restore the whole
//! context bit for bit: counter, registers, memory and both garbage
//! stacks. Branches are checked through their come-from marker, which is
//! what actually unwinds the program counter in reverse.

use metronome_runtime::{Context, Vm};
use metronome_spec::{Instruction, Reg, Word};

fn r(index: u8) -> Reg {
    Reg::new(index)
}

/// Step forward once, then backward until the counter returns to its
/// starting point, and require the context to be restored exactly.
fn assert_reverses(program: &[Instruction], seed: impl FnOnce(&mut Context)) {
    let words: Vec<Word> = program.iter().map(Instruction::encode).collect();
    let mut vm = Vm::new(&words, 0, 0);

    let mut context = vm.get_context().clone();
    seed(&mut context);
    vm.set_context(context);
    let initial = vm.get_context().clone();

    assert!(vm.step(), "forward step failed on {}", program[0]);
    vm.reverse();
    for _ in 0..4 {
        if vm.get_context().counter == initial.counter {
            break;
        }
        assert!(vm.step(), "backward step failed on {}", program[0]);
    }
    vm.set_reversing(false);

    assert_eq!(
        vm.get_context(),
        &initial,
        "context not restored after reversing {}",
        program[0]
    );
}

#[test]
fn test_add_reverses() {
    assert_reverses(&[Instruction::Add { rsd: r(1), rs: r(2) }], |ctx| {
        ctx.set_reg(r(1), 7);
        ctx.set_reg(r(2), 0xFFFF_FFF0);
    });
}

#[test]
fn test_add_same_register_reverses_by_halving() {
    assert_reverses(&[Instruction::Add { rsd: r(1), rs: r(1) }], |ctx| {
        ctx.set_reg(r(1), 0x0123_4567);
    });
}

#[test]
fn test_sub_reverses() {
    assert_reverses(&[Instruction::Sub { rsd: r(1), rs: r(2) }], |ctx| {
        ctx.set_reg(r(1), 3);
        ctx.set_reg(r(2), 10);
    });
}

#[test]
fn test_neg_reverses() {
    assert_reverses(&[Instruction::Neg { rsd: r(1), rs: r(2) }], |ctx| {
        ctx.set_reg(r(1), 0x8000_0001);
    });
}

#[test]
fn test_xor_xori_reverse() {
    assert_reverses(&[Instruction::Xor { rsd: r(1), rs: r(2) }], |ctx| {
        ctx.set_reg(r(1), 0xAAAA_5555);
        ctx.set_reg(r(2), 0x0F0F_0F0F);
    });
    assert_reverses(&[Instruction::Xori { rsd: r(1), imm: -1 }], |ctx| {
        ctx.set_reg(r(1), 0x1234_5678);
    });
}

#[test]
fn test_addi_reverses() {
    assert_reverses(&[Instruction::Addi { rsd: r(1), imm: -300 }], |ctx| {
        ctx.set_reg(r(1), 5);
    });
}

#[test]
fn test_dp_saving_ops_reverse() {
    let cases = [
        Instruction::And { rsd: r(1), rs: r(2) },
        Instruction::Or { rsd: r(1), rs: r(2) },
        Instruction::Nor { rsd: r(1), rs: r(2) },
        Instruction::Slt { rsd: r(1), rs: r(2) },
        Instruction::Sllv { rsd: r(1), rs: r(2) },
        Instruction::Srlv { rsd: r(1), rs: r(2) },
        Instruction::Srav { rsd: r(1), rs: r(2) },
    ];
    for instruction in cases {
        assert_reverses(&[instruction], |ctx| {
            ctx.set_reg(r(1), 0xDEAD_BEEF);
            ctx.set_reg(r(2), 35);
        });
    }

    let immediate_cases = [
        Instruction::Andi { rsd: r(1), imm: 0x0F0F },
        Instruction::Ori { rsd: r(1), imm: -16 },
        Instruction::Slti { rsd: r(1), imm: 12 },
    ];
    for instruction in immediate_cases {
        assert_reverses(&[instruction], |ctx| {
            ctx.set_reg(r(1), 0x8000_0000);
        });
    }
}

#[test]
fn test_immediate_shifts_reverse() {
    for amt in [0, 1, 13, 31] {
        assert_reverses(&[Instruction::Sll { rsd: r(1), amt }], |ctx| {
            ctx.set_reg(r(1), 0x9234_5678);
        });
        assert_reverses(&[Instruction::Srl { rsd: r(1), amt }], |ctx| {
            ctx.set_reg(r(1), 0x9234_5678);
        });
        assert_reverses(&[Instruction::Sra { rsd: r(1), amt }], |ctx| {
            ctx.set_reg(r(1), 0x9234_5678);
        });
    }
}

#[test]
fn test_rotates_reverse() {
    for amt in [0, 1, 16, 31] {
        assert_reverses(&[Instruction::Rl { rsd: r(1), amt }], |ctx| {
            ctx.set_reg(r(1), 0x8000_0001);
        });
        assert_reverses(&[Instruction::Rr { rsd: r(1), amt }], |ctx| {
            ctx.set_reg(r(1), 0x8000_0001);
        });
    }
    assert_reverses(&[Instruction::Rlv { rsd: r(1), rs: r(2) }], |ctx| {
        ctx.set_reg(r(1), 0x8000_0001);
        ctx.set_reg(r(2), 33);
    });
    assert_reverses(&[Instruction::Rrv { rsd: r(1), rs: r(2) }], |ctx| {
        ctx.set_reg(r(1), 0x8000_0001);
        ctx.set_reg(r(2), 7);
    });
}

#[test]
fn test_exchange_reverses() {
    assert_reverses(&[Instruction::Exchange { reg: r(1), addr: r(2) }], |ctx| {
        ctx.set_reg(r(1), 77);
        ctx.set_reg(r(2), 0x1000);
        ctx.memory.write(0x1000, 88);
    });
}

#[test]
fn test_exchange_with_unmapped_address_reverses() {
    // The swap pulls the memory default into the register and files the
    // old register value; undoing it must leave memory observably absent
    // again.
    assert_reverses(&[Instruction::Exchange { reg: r(1), addr: r(2) }], |ctx| {
        ctx.set_reg(r(1), 77);
        ctx.set_reg(r(2), 0x2000);
    });
}

#[test]
fn test_cf_reverses() {
    assert_reverses(&[Instruction::Cf], |_| {});
}

#[test]
fn test_untaken_branch_reverses() {
    assert_reverses(&[Instruction::Beq { ra: r(1), rb: r(2), offset: 4 }], |ctx| {
        ctx.set_reg(r(1), 1);
        ctx.set_reg(r(2), 2);
    });
}

#[test]
fn test_taken_branch_reverses_through_cf() {
    // beq at 0 jumps to the cf at 2; the backward step lands on the cf
    // and pops the branch point back.
    let program = [
        Instruction::Beq { ra: r(1), rb: r(2), offset: 2 },
        Instruction::Cf,
        Instruction::Cf,
    ];
    assert_reverses(&program, |ctx| {
        ctx.set_reg(r(1), 5);
        ctx.set_reg(r(2), 5);
    });
}

#[test]
fn test_taken_conditional_branches_reverse() {
    let by_sign: [(Instruction, Word); 4] = [
        (Instruction::Bgez { rb: r(2), offset: 2 }, 0),
        (Instruction::Bgtz { rb: r(2), offset: 2 }, 1),
        (Instruction::Blez { rb: r(2), offset: 2 }, 0),
        (Instruction::Bltz { rb: r(2), offset: 2 }, 0xFFFF_FFFF),
    ];
    for (branch, seed_value) in by_sign {
        let program = [branch, Instruction::Cf, Instruction::Cf];
        assert_reverses(&program, |ctx| {
            ctx.set_reg(r(2), seed_value);
        });
    }
}

#[test]
fn test_not_taken_linking_branch_reverses() {
    // Not taken (rb negative), link clear: the backward step re-clears the
    // link register and retreats, which is the identity here.
    let program = [Instruction::Bgezal { link: r(5), rb: r(2), offset: 2 }];
    assert_reverses(&program, |ctx| {
        ctx.set_reg(r(2), 0xFFFF_FFFF);
    });
}

#[test]
fn test_taken_linking_branch_unwinds_counter_through_cf() {
    // A taken linking branch records its own address on the PC stack; the
    // backward cf at the target pops the counter back to the branch. The
    // return address stays in the link register, to be consumed by the
    // unwinding of the matching return jump.
    let program = [
        Instruction::Bgezal { link: r(5), rb: r(2), offset: 2 },
        Instruction::Cf,
        Instruction::Cf,
    ];
    let words: Vec<Word> = program.iter().map(Instruction::encode).collect();
    let mut vm = Vm::new(&words, 0, 0);
    let mut context = vm.get_context().clone();
    context.set_reg(r(2), 9);
    vm.set_context(context);

    assert!(vm.step());
    assert_eq!(vm.get_context().counter, 3);
    assert_eq!(vm.get_context().reg(r(5)), 1);
    assert_eq!(vm.get_context().pc_stack, vec![0]);

    vm.reverse();
    assert!(vm.step());
    assert_eq!(vm.get_context().counter, 0);
    assert!(vm.get_context().pc_stack.is_empty());
    assert_eq!(vm.get_context().reg(r(5)), 1);
}

#[test]
fn test_jal_reverses() {
    let program = [
        Instruction::Jal { link: r(31), offset: 2 },
        Instruction::Cf,
        Instruction::Cf,
    ];
    assert_reverses(&program, |_| {});
}

#[test]
fn test_jr_reverses() {
    let program = [
        Instruction::Jr { jreg: r(31) },
        Instruction::Cf,
        Instruction::Cf,
    ];
    assert_reverses(&program, |ctx| {
        ctx.set_reg(r(31), 2);
    });
}

#[test]
fn test_j_reverses() {
    let program = [
        Instruction::J { target: 2 },
        Instruction::Cf,
        Instruction::Cf,
    ];
    assert_reverses(&program, |_| {});
}

#[test]
fn test_multi_step_sequence_reverses() {
    // A straight-line mix of garbage-saving and self-inverting
    // instructions, run to the end and unwound completely.
    let program = [
        Instruction::Addi { rsd: r(1), imm: 0x1234 },
        Instruction::Sll { rsd: r(1), amt: 4 },
        Instruction::Ori { rsd: r(2), imm: 0xFF },
        Instruction::And { rsd: r(2), rs: r(1) },
        Instruction::Rl { rsd: r(1), amt: 9 },
        Instruction::Xor { rsd: r(1), rs: r(2) },
        Instruction::Slt { rsd: r(2), rs: r(1) },
    ];
    let words: Vec<Word> = program.iter().map(Instruction::encode).collect();
    let mut vm = Vm::new(&words, 0, 0);
    let initial = vm.get_context().clone();

    assert!(vm.step_n(program.len()));
    assert_eq!(vm.get_context().counter, program.len() as Word);
    assert_eq!(vm.get_context().dp_stack.len(), 4);

    vm.reverse();
    assert!(vm.step_n(program.len()));
    vm.set_reversing(false);

    assert_eq!(vm.get_context(), &initial);
}
