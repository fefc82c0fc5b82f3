use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;

use itertools::Itertools;

use super::errors::{Error, Result};
use super::rt;
use super::tac::{self, BinOp, Instr, Operand, Proc, UnOp, Unit};

pub const PRINT_INT: &str = "@__bx_print_int";
pub const PRINT_BOOL: &str = "@__bx_print_bool";

/// Limits applied to a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecConfig {
    /// Maximum number of executed instructions, unlimited when `None`.
    pub max_steps: Option<u64>,
    /// Maximum number of live procedure frames, `@main` included.
    pub max_depth: usize,
}

impl Default for ExecConfig {
    fn default() -> Self {
        ExecConfig {
            max_steps: None,
            max_depth: 10_000,
        }
    }
}

#[derive(Debug)]
struct Frame<'p> {
    proc: &'p Proc,
    pc: usize,
    temps: HashMap<&'p str, i64>,
    staged: BTreeMap<usize, i64>,
    // set only while the previous instruction was a `sub`: its result and operands
    last_sub: Option<(&'p Operand, i64, i64)>,
    // where the caller wants the return value
    ret_dest: Option<&'p Operand>,
}

impl<'p> Frame<'p> {
    fn new(proc: &'p Proc, args: Vec<i64>, ret_dest: Option<&'p Operand>) -> Result<Frame<'p>> {
        if args.len() != proc.params.len() {
            return Err(Error::ProgramError(format!(
                "{} takes {} argument(s) but was called with {}",
                proc.name,
                proc.params.len(),
                args.len()
            )));
        }
        Ok(Frame {
            proc,
            pc: 0,
            temps: proc
                .params
                .iter()
                .map(String::as_str)
                .zip(args)
                .collect(),
            staged: BTreeMap::new(),
            last_sub: None,
            ret_dest,
        })
    }
}

enum Flow<'p> {
    Next,
    Jump(usize),
    Call(Frame<'p>),
    Return(Option<i64>),
}

#[derive(Debug, Clone)]
struct Memory<'p> {
    globals: HashMap<&'p str, i64>,
}

impl<'p> Memory<'p> {
    fn new(unit: &'p Unit) -> Memory<'p> {
        Memory {
            globals: unit
                .globals
                .iter()
                .map(|g| (g.name.as_str(), g.init))
                .collect(),
        }
    }

    fn read(&self, frame: &Frame<'p>, operand: &Operand) -> Result<i64> {
        match operand {
            Operand::Imm(v) => Ok(*v),
            Operand::Temp(name) => frame.temps.get(name.as_str()).copied().ok_or_else(|| {
                Error::ProgramError(format!(
                    "temporary {} read before assignment in {}",
                    name, frame.proc.name
                ))
            }),
            Operand::Global(name) => self
                .globals
                .get(name.as_str())
                .copied()
                .ok_or_else(|| Error::ProgramError(format!("undefined global {}", name))),
        }
    }

    fn write(&mut self, frame: &mut Frame<'p>, operand: &'p Operand, val: i64) -> Result<()> {
        match operand {
            Operand::Temp(name) => {
                frame.temps.insert(name.as_str(), val);
                Ok(())
            }
            Operand::Global(name) => match self.globals.get_mut(name.as_str()) {
                Some(cell) => {
                    *cell = val;
                    Ok(())
                }
                None => Err(Error::ProgramError(format!("undefined global {}", name))),
            },
            Operand::Imm(v) => Err(Error::ProgramError(format!(
                "cannot assign to the constant {}",
                v
            ))),
        }
    }
}

fn binary(op: BinOp, a: i64, b: i64) -> Result<i64> {
    let val = match op {
        BinOp::Add => a.wrapping_add(b),
        BinOp::Sub => a.wrapping_sub(b),
        BinOp::Mul => a.wrapping_mul(b),
        BinOp::Div | BinOp::Mod if b == 0 => {
            return Err(Error::ProgramError("division by zero".to_string()))
        }
        BinOp::Div => a
            .checked_div(b)
            .ok_or_else(|| Error::ProgramError(format!("overflow in {} / {}", a, b)))?,
        BinOp::Mod => a
            .checked_rem(b)
            .ok_or_else(|| Error::ProgramError(format!("overflow in {} % {}", a, b)))?,
        BinOp::And => a & b,
        BinOp::Or => a | b,
        BinOp::Xor => a ^ b,
        // the shift count is taken modulo 64, as x64 does
        BinOp::Shl => a.wrapping_shl(b as u32),
        BinOp::Shr => a.wrapping_shr(b as u32),
    };
    Ok(val)
}

pub struct Program {
    pub unit: Unit,
    pub config: ExecConfig,
}

impl Program {
    /// Builds a program from TAC JSON text.
    pub fn create(source: &str) -> Result<Program> {
        Ok(Program::from_unit(tac::parse(source)?))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Program> {
        Ok(Program::from_unit(tac::load(path)?))
    }

    pub fn from_unit(unit: Unit) -> Program {
        Program {
            unit,
            config: ExecConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExecConfig) -> Program {
        self.config = config;
        self
    }

    /// Runs `@main` and returns everything it printed.
    pub fn execute(&self) -> Result<String> {
        let mut output = Vec::new();
        self.execute_to(&mut output)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    /// Runs `@main`, streaming output to `out`. Returns the value `@main`
    /// returned, or 0.
    pub fn execute_to<W: Write>(&self, out: &mut W) -> Result<i64> {
        let main = self
            .unit
            .proc("@main")
            .ok_or_else(|| Error::ProgramError("no @main procedure".to_string()))?;

        let mut mem = Memory::new(&self.unit);
        let mut stack = vec![Frame::new(main, vec![], None)?];
        let mut steps: u64 = 0;

        log::debug!("entering @main");
        log::trace!("{: <40} | {: <12} | {: <6}", "instruction", "proc", "depth");
        log::trace!("{:-<40} | {:-<12} | {:-<6}", "", "", "");

        let ret = loop {
            let depth = stack.len();
            let frame = match stack.last_mut() {
                Some(frame) => frame,
                None => break 0,
            };

            let proc = frame.proc;
            let flow = match proc.body.get(frame.pc) {
                Some(instr) => {
                    steps += 1;
                    if let Some(max) = self.config.max_steps {
                        if steps > max {
                            return Err(Error::ProgramError(format!(
                                "step limit of {} exceeded",
                                max
                            )));
                        }
                    }
                    log::trace!(
                        "{: <40} | {: <12} | {: <6}",
                        instr.to_string(),
                        proc.name,
                        depth
                    );
                    self.step(instr, frame, &mut mem, out)?
                }
                // falling off the end of a body is an implicit `ret`
                None => Flow::Return(None),
            };

            match flow {
                Flow::Next => frame.pc += 1,
                Flow::Jump(target) => frame.pc = target,
                Flow::Call(callee) => {
                    frame.pc += 1;
                    if depth >= self.config.max_depth {
                        return Err(Error::ProgramError(format!(
                            "call depth limit of {} exceeded calling {}",
                            self.config.max_depth, callee.proc.name
                        )));
                    }
                    log::debug!("entering {}", callee.proc.name);
                    stack.push(callee);
                }
                Flow::Return(val) => {
                    let done = stack.pop();
                    let (name, dest) = match &done {
                        Some(f) => (f.proc.name.as_str(), f.ret_dest),
                        None => break 0,
                    };
                    log::debug!("leaving {} with {:?}", name, val);
                    let caller = match stack.last_mut() {
                        Some(caller) => caller,
                        None => break val.unwrap_or(0),
                    };
                    if let Some(dest) = dest {
                        let val = val.ok_or_else(|| {
                            Error::ProgramError(format!("{} returned no value", name))
                        })?;
                        mem.write(caller, dest, val)?;
                    }
                }
            }
        };

        out.flush()?;
        log::debug!("@main finished after {} steps with {}", steps, ret);
        Ok(ret)
    }

    fn step<'p, W: Write>(
        &'p self,
        instr: &'p Instr,
        frame: &mut Frame<'p>,
        mem: &mut Memory<'p>,
        out: &mut W,
    ) -> Result<Flow<'p>> {
        let last_sub = frame.last_sub.take();
        match instr {
            Instr::Nop | Instr::Label(_) => {}
            Instr::Copy { dest, src } => {
                let val = mem.read(frame, src)?;
                mem.write(frame, dest, val)?;
            }
            Instr::Binary { op, dest, lhs, rhs } => {
                let (a, b) = (mem.read(frame, lhs)?, mem.read(frame, rhs)?);
                mem.write(frame, dest, binary(*op, a, b)?)?;
                if *op == BinOp::Sub {
                    frame.last_sub = Some((dest, a, b));
                }
            }
            Instr::Unary { op, dest, arg } => {
                let arg = mem.read(frame, arg)?;
                let val = match op {
                    UnOp::Neg => arg.wrapping_neg(),
                    UnOp::Not => !arg,
                };
                mem.write(frame, dest, val)?;
            }
            Instr::Print(arg) => rt::write_int(out, mem.read(frame, arg)?)?,
            Instr::Jmp(target) => return self.jump(frame.proc, target),
            Instr::Branch { cond, arg, target } => {
                let taken = match last_sub {
                    Some((dest, a, b)) if dest == arg => cond.compare(a, b),
                    _ => cond.holds(mem.read(frame, arg)?),
                };
                if taken {
                    return self.jump(frame.proc, target);
                }
            }
            Instr::Param { index, arg } => {
                let val = mem.read(frame, arg)?;
                frame.staged.insert(*index, val);
            }
            Instr::Call { callee, argc, dest } => {
                let args = Self::take_args(frame, callee, *argc)?;
                return self.call(callee, args, dest.as_ref(), out);
            }
            Instr::Ret(arg) => {
                let val = match arg {
                    Some(arg) => Some(mem.read(frame, arg)?),
                    None => None,
                };
                return Ok(Flow::Return(val));
            }
        }
        Ok(Flow::Next)
    }

    fn jump<'p>(&self, proc: &Proc, target: &str) -> Result<Flow<'p>> {
        proc.label_target(target)
            .map(Flow::Jump)
            .ok_or_else(|| Error::ProgramError(format!("undefined label {} in {}", target, proc.name)))
    }

    fn take_args(frame: &mut Frame, callee: &str, argc: usize) -> Result<Vec<i64>> {
        let staged = std::mem::take(&mut frame.staged);
        let args = (1..=argc)
            .map(|i| {
                staged.get(&i).copied().ok_or_else(|| {
                    Error::ProgramError(format!("argument {} of {} was never passed", i, callee))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        log::trace!("{} <- [{}]", callee, args.iter().join(", "));
        Ok(args)
    }

    fn call<'p, W: Write>(
        &'p self,
        callee: &str,
        args: Vec<i64>,
        dest: Option<&'p Operand>,
        out: &mut W,
    ) -> Result<Flow<'p>> {
        if callee == PRINT_INT || callee == PRINT_BOOL {
            if args.len() != 1 {
                return Err(Error::ProgramError(format!(
                    "{} takes 1 argument but was called with {}",
                    callee,
                    args.len()
                )));
            }
            if dest.is_some() {
                return Err(Error::ProgramError(format!("{} returned no value", callee)));
            }
            if callee == PRINT_INT {
                rt::write_int(out, args[0])?;
            } else {
                rt::write_bool(out, args[0])?;
            }
            return Ok(Flow::Next);
        }

        let proc = self
            .unit
            .proc(callee)
            .ok_or_else(|| Error::ProgramError(format!("call to undefined procedure {}", callee)))?;
        Ok(Flow::Call(Frame::new(proc, args, dest)?))
    }
}
