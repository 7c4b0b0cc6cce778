//! Instruction Execution.
//!
//! This module maps each decoded instruction to its effect on the architectural state.
//! It performs the following:
//! 1. **Predication:** Conditional layouts check their condition first; a false
//!    condition makes the instruction a no-op.
//! 2. **Operand Selection:** Register or immediate second operands, scaled memory offsets.
//! 3. **Dispatch:** One `match` over the opcode, delegating arithmetic to the ALU and
//!    memory accesses to the memory path.
//! 4. **Control Flow:** Branches stage `next_pc`; `swi` and `ib` enter and leave
//!    interrupt context.
//!
//! Faults raised by memory accesses are left pending for the writeback step; an
//! instruction that faults performs no register writeback.

use tracing::{debug, trace};

use super::Cpu;
use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::reg::RETURN_REG;
use crate::common::{AccessWidth, SimError};
use crate::core::arch::flags::Flags;
use crate::core::arch::psr::Psr;
use crate::core::units::alu::{Alu, AluOp};
use crate::isa::instruction::{Decoded, Operands};
use crate::isa::opcodes::Opcode;

/// Vector bits of the `swi` payload.
const SWI_VECTOR_MASK: u32 = 0x7F;

impl Cpu {
    /// Runs an ALU operation, writing `rd` and replacing the flags if the operation
    /// defines them.
    fn alu_op(&mut self, op: AluOp, rd: usize, a: u32, b: u32) {
        let out = Alu::execute(op, a, b, self.flags.carry);
        self.regs.write(rd, out.value);
        if let Some(flags) = out.flags {
            self.flags = flags;
        }
    }

    /// Executes one decoded instruction.
    ///
    /// # Arguments
    ///
    /// * `inst` - The decoded instruction at the current PC.
    ///
    /// # Returns
    ///
    /// `Ok(())` when the instruction completed or left a fault pending; a fatal error
    /// for host-level problems such as an out-of-memory access.
    pub fn execute(&mut self, inst: &Decoded) -> Result<(), SimError> {
        if !self.flags.check(inst.operands.condition()) {
            return Ok(());
        }

        match inst.operands {
            Operands::Imm5Cond {
                is_imm, rd, rs, src, ..
            } => self.execute_imm5(inst.opcode, is_imm, rd, rs, src),
            Operands::Imm11Cond {
                is_imm, rd, rs, imm, ..
            } => {
                self.execute_imm11(inst.opcode, is_imm, rd, rs, imm);
                Ok(())
            }
            Operands::Imm16 { rd, imm } => {
                self.execute_imm16(inst.opcode, rd, imm);
                Ok(())
            }
            Operands::TwoOperand { rd, rs } => {
                self.execute_two_operand(inst.opcode, rd, rs);
                Ok(())
            }
            Operands::OneOperand { rd } => self.execute_one_operand(inst.opcode, rd),
            Operands::NoOperand => self.execute_no_operand(inst.opcode),
            Operands::Payload21 { payload } => {
                // `swi` is the only Payload21 instruction.
                let vector = payload & SWI_VECTOR_MASK;
                debug!(vector, pc = self.sys.pc, "software interrupt");
                self.pending_nmi = Some(vector);
                Ok(())
            }
        }
    }

    /// Imm5Cond: arithmetic, shifts, logic, bit operations, loads and stores.
    fn execute_imm5(
        &mut self,
        op: Opcode,
        is_imm: bool,
        rd: usize,
        rs: usize,
        src: u32,
    ) -> Result<(), SimError> {
        let a = self.regs.read(rs);
        let b = if is_imm {
            src
        } else {
            self.regs.read(src as usize)
        };

        let alu = match op {
            Opcode::Add => Some(AluOp::Add),
            Opcode::Sub => Some(AluOp::Sub),
            Opcode::Mull => Some(AluOp::Mull),
            Opcode::Mulh => Some(AluOp::Mulh),
            Opcode::Udiv => Some(AluOp::Udiv),
            Opcode::Umod => Some(AluOp::Umod),
            Opcode::Div => Some(AluOp::Div),
            Opcode::Mod => Some(AluOp::Mod),
            Opcode::Addc => Some(AluOp::AddCarry),
            Opcode::Shl => Some(AluOp::Shl),
            Opcode::Shr => Some(AluOp::Shr),
            Opcode::Sar => Some(AluOp::Sar),
            Opcode::Rol => Some(AluOp::Rol),
            Opcode::Ror => Some(AluOp::Ror),
            Opcode::And => Some(AluOp::And),
            Opcode::Or => Some(AluOp::Or),
            Opcode::Xor => Some(AluOp::Xor),
            Opcode::Nand => Some(AluOp::Nand),
            Opcode::Nor => Some(AluOp::Nor),
            Opcode::Xnor => Some(AluOp::Xnor),
            Opcode::Clrb => Some(AluOp::ClearBit),
            Opcode::Setb => Some(AluOp::SetBit),
            Opcode::Getb => Some(AluOp::GetBit),
            Opcode::Get8 => Some(AluOp::GetByte),
            _ => None,
        };
        if let Some(alu) = alu {
            self.alu_op(alu, rd, a, b);
            return Ok(());
        }

        let width = match op {
            Opcode::Ld8 | Opcode::St8 => AccessWidth::Byte,
            Opcode::Ld16 | Opcode::St16 => AccessWidth::Half,
            _ => AccessWidth::Word,
        };
        let offset = if is_imm { src << width.shift() } else { b };
        let addr = a.wrapping_add(offset);

        match op {
            Opcode::Ld8 | Opcode::Ld16 | Opcode::Ld32 => {
                if let Some(val) = self.load(addr, width)? {
                    self.regs.write(rd, val);
                }
            }
            Opcode::St8 | Opcode::St16 | Opcode::St32 => {
                let _ = self.store(addr, width, self.regs.read(rd))?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Imm11Cond: compare, test, and the relative/absolute conditional branches.
    fn execute_imm11(&mut self, op: Opcode, is_imm: bool, rd: usize, rs: usize, imm: i32) {
        let operand = if is_imm {
            imm as u32
        } else {
            self.regs.read(rs)
        };
        let dest = self.regs.read(rd);

        match op {
            Opcode::Cmp => {
                self.flags = Flags::from_sub(dest.wrapping_sub(operand), dest, operand);
            }
            Opcode::Test => self.flags = Flags::from_logical(dest & operand),
            Opcode::Br => {
                let offset = if is_imm {
                    (imm as u32).wrapping_mul(INSTRUCTION_SIZE)
                } else {
                    dest
                };
                self.sys.next_pc = Some(self.sys.pc.wrapping_add(offset));
            }
            Opcode::B => {
                let target = if is_imm {
                    (imm as u32).wrapping_mul(INSTRUCTION_SIZE)
                } else {
                    dest
                };
                self.sys.next_pc = Some(target);
            }
            _ => {}
        }
    }

    /// Imm16: half-word writes, immediate loads, and `bur`.
    fn execute_imm16(&mut self, op: Opcode, rd: usize, imm: u32) {
        let sext = imm as u16 as i16 as i32 as u32;
        let cur = self.regs.read(rd);
        match op {
            Opcode::Wl16 => self.regs.write(rd, (cur & 0xFFFF_0000) | imm),
            Opcode::Wh16 => self.regs.write(rd, (cur & 0x0000_FFFF) | (imm << 16)),
            Opcode::Lil => self.regs.write(rd, sext),
            Opcode::Lih => self.regs.write(rd, imm << 16),
            Opcode::Ulil => self.regs.write(rd, imm),
            Opcode::Bur => {
                let target = self
                    .sys
                    .pc
                    .wrapping_add(sext.wrapping_mul(INSTRUCTION_SIZE));
                self.sys.next_pc = Some(target);
            }
            _ => {}
        }
    }

    /// TwoOperand: unary arithmetic, sign extension, bit reversal, and `move`.
    fn execute_two_operand(&mut self, op: Opcode, rd: usize, rs: usize) {
        let a = self.regs.read(rs);
        match op {
            Opcode::Neg => self.alu_op(AluOp::Sub, rd, 0, a),
            Opcode::Inc => self.alu_op(AluOp::Add, rd, a, 1),
            Opcode::Dec => self.alu_op(AluOp::Sub, rd, a, 1),
            Opcode::Sext8 => self.alu_op(AluOp::Sext8, rd, a, 0),
            Opcode::Sext16 => self.alu_op(AluOp::Sext16, rd, a, 0),
            Opcode::Not => self.alu_op(AluOp::Not, rd, a, 0),
            Opcode::Revb => self.alu_op(AluOp::BitReverse, rd, a, 0),
            Opcode::Rev8 => self.alu_op(AluOp::ByteSwap, rd, a, 0),
            Opcode::Move => self.regs.write(rd, a),
            _ => {}
        }
    }

    /// OneOperand: clear/set, push/pop, system register access, and `movepc`.
    fn execute_one_operand(&mut self, op: Opcode, rd: usize) -> Result<(), SimError> {
        let val = self.regs.read(rd);
        match op {
            Opcode::Clr => self.regs.write(rd, 0),
            Opcode::Set => self.regs.write(rd, u32::MAX),
            Opcode::Push => self.push(val)?,
            Opcode::Pop => {
                if let Some(word) = self.load(self.sys.sp, AccessWidth::Word)? {
                    self.regs.write(rd, word);
                    self.sys.sp = self.sys.sp.wrapping_add(4);
                }
            }
            Opcode::Movepc => self.regs.write(rd, self.sys.pc),

            Opcode::Srspr => self.regs.write(rd, self.sys.sp),
            Opcode::Srpsr => self.regs.write(rd, self.sys.psr.bits()),
            Opcode::Srppsr => self.regs.write(rd, self.sys.ppsr.bits()),
            Opcode::Srppcr => self.regs.write(rd, self.sys.ppcr),
            Opcode::Srfi0r => self.regs.write(rd, self.sys.fi0r),
            Opcode::Srfi1r => self.regs.write(rd, self.sys.fi1r),
            Opcode::Srpdtr => self.regs.write(rd, self.sys.pdtr),
            Opcode::Srkpdtr => self.regs.write(rd, self.sys.kpdtr),
            Opcode::Sridtr => self.regs.write(rd, self.sys.idtr),
            Opcode::Srpflagr => self.regs.write(rd, self.sys.pflags.bits()),
            Opcode::Sriosr => self.regs.write(rd, self.sys.iosr),

            Opcode::Srspw => self.sys.sp = val,
            Opcode::Srpsw => self.sys.psr = Psr(val),
            Opcode::Srppsw => self.sys.ppsr = Psr(val),
            Opcode::Srppcw => self.sys.ppcr = val,
            Opcode::Srpdtw => {
                self.sys.pdtr = val;
                self.mmu.flush();
            }
            Opcode::Srkpdtw => {
                self.sys.kpdtr = val;
                self.mmu.flush();
            }
            Opcode::Sridtw => self.sys.idtr = val,
            Opcode::Srpflagw => self.sys.pflags = Flags::from_bits(val),
            Opcode::Sriosw => self.sys.iosr = val,
            _ => {}
        }
        Ok(())
    }

    /// NoOperand: `pushpc`, `ib`, `nop`, `halt`.
    fn execute_no_operand(&mut self, op: Opcode) -> Result<(), SimError> {
        match op {
            Opcode::Pushpc => self.push(self.sys.pc.wrapping_add(INSTRUCTION_SIZE))?,
            Opcode::Ib => {
                trace!(ppcr = self.sys.ppcr, "return from interrupt");
                self.sys.next_pc = Some(self.sys.ppcr);
                self.sys.psr = self.sys.ppsr;
                self.flags = self.sys.pflags;
            }
            Opcode::Halt => {
                debug!(pc = self.sys.pc, r31 = self.regs.read(RETURN_REG), "halt");
                self.halted = true;
            }
            _ => {}
        }
        Ok(())
    }

    /// Pushes a word; SP moves only if the store did not fault.
    fn push(&mut self, val: u32) -> Result<(), SimError> {
        let sp = self.sys.sp.wrapping_sub(4);
        if self.store(sp, AccessWidth::Word, val)? {
            self.sys.sp = sp;
        }
        Ok(())
    }
}
