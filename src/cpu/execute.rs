//! CPU execution engine.
//!
//! Implements the fetch-decode-execute cycle and all instruction behaviors.
//! There is no halt instruction: a program runs until it hits an illegal
//! opcode, the caller's stop flag is raised, or a cycle budget runs out.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::nibble::{Addr12, Nibble};
use crate::cpu::Registers;
use crate::cpu::decode::{self, DecodeError, Instruction};
use crate::memory::AddressSpace;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// CPU is running normally.
    Running,
    /// CPU faulted on an illegal instruction.
    Halted,
}

/// How a call to [`Cpu::run`] ended without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The stop flag was observed; `cycles` instructions ran in this call.
    Stopped { cycles: u64 },
}

/// The CPU, bound to the address space it executes against.
pub struct Cpu {
    /// CPU registers.
    pub regs: Registers,
    /// The address space all fetches, loads and stores go through.
    pub space: AddressSpace,
    /// Current execution state.
    pub state: CpuState,
    /// Instructions executed since construction or reset.
    pub cycles: u64,
    last_instr: Option<Instruction>,
}

impl Cpu {
    /// Create a CPU with zeroed registers over `space`.
    pub fn new(space: AddressSpace) -> Self {
        Self {
            regs: Registers::new(),
            space,
            state: CpuState::Running,
            cycles: 0,
            last_instr: None,
        }
    }

    /// Reset registers and execution state. Memory contents are kept.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.state = CpuState::Running;
        self.cycles = 0;
        self.last_instr = None;
    }

    /// Read the nibble at IAR and advance IAR by one, wrapping at 0xFFF.
    pub fn fetch(&mut self) -> Nibble {
        let at = self.regs.advance_iar();
        self.space.read(at)
    }

    /// Execute a single instruction.
    ///
    /// Returns the instruction that was executed. An illegal opcode halts
    /// the CPU; further calls return [`CpuError::NotRunning`].
    pub fn step(&mut self) -> Result<Instruction, CpuError> {
        if self.state != CpuState::Running {
            return Err(CpuError::NotRunning(self.state));
        }

        let at = self.regs.iar;
        let opcode = self.fetch();

        let instr = match decode::decode(opcode, || self.fetch()) {
            Ok(instr) => instr,
            Err(DecodeError::IllegalOpcode(opcode)) => {
                self.state = CpuState::Halted;
                tracing::error!("illegal instruction {:X} at {:03X}", opcode, at.to_u16());
                return Err(CpuError::IllegalInstruction { opcode, address: at });
            }
        };

        tracing::trace!(iar = %at, regs = ?self.regs, "{:?}", instr);

        self.execute(instr);
        self.cycles += 1;
        self.last_instr = Some(instr);

        Ok(instr)
    }

    /// Run until a fault or until `stop` is raised.
    ///
    /// The flag is checked once before every cycle.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<RunOutcome, CpuError> {
        let start_cycles = self.cycles;

        while !stop.load(Ordering::Relaxed) {
            self.step()?;
        }

        tracing::debug!("stop requested after {} cycles", self.cycles - start_cycles);
        Ok(RunOutcome::Stopped { cycles: self.cycles - start_cycles })
    }

    /// Run for at most `max_cycles` instructions.
    ///
    /// Returns the number of instructions executed.
    pub fn run_limited(&mut self, max_cycles: u64) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;
        let limit = self.cycles.saturating_add(max_cycles);

        while self.cycles < limit {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Execute a decoded instruction. Operands have already been fetched.
    fn execute(&mut self, instr: Instruction) {
        let regs = &mut self.regs;
        match instr {
            Instruction::Ldi { value } => regs.a = value,

            Instruction::Lod => regs.a = self.space.read(regs.addr),

            Instruction::Str => self.space.write(regs.addr, regs.a),

            Instruction::Sar => {
                regs.addr.set_mid(regs.a);
                regs.addr.set_low(regs.b);
            }

            Instruction::Sap => regs.addr.set_high(regs.a),

            Instruction::Mov { src, dst } => {
                let value = regs.get(src);
                regs.set(dst, value);
            }

            Instruction::Jmp { target } => regs.jump(target),

            Instruction::Rjp => {
                let target = Addr12::from_limbs(regs.b, regs.a, regs.d);
                regs.jump(target);
            }

            Instruction::Jz { target } => {
                if regs.a.is_zero() {
                    regs.jump(target);
                }
            }

            Instruction::Nand { a, b } => {
                let result = regs.get(a).nand(regs.get(b));
                regs.set(a, result);
            }
        }
    }

    /// Get the last executed instruction.
    pub fn last_instruction(&self) -> Option<Instruction> {
        self.last_instr
    }

    /// Check if the CPU is halted.
    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    /// Check if the CPU is running.
    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .field("regs", &self.regs)
            .finish()
    }
}

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("illegal instruction {opcode:X} at {address}")]
    IllegalInstruction { opcode: Nibble, address: Addr12 },

    #[error("CPU not running: {0:?}")]
    NotRunning(CpuState),
}
