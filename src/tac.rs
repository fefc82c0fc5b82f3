//! The TAC interchange format: a JSON array of global variables and
//! procedures, as written by the BX front end (`*.tac.json`).
//!
//! Decoding happens in two steps. Serde reads each declaration, then each
//! instruction, into the loose `Raw*` structs, so a malformed entry is
//! reported with its position. [`Unit::from_raw`] then checks every
//! instruction and lowers it into a typed [`Instr`].

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{Error, Result};

lazy_static! {
    static ref LABEL_RE: Regex = Regex::new(r"^%\.L[0-9]+$").unwrap();
    static ref TEMP_RE: Regex = Regex::new(r"^%[A-Za-z0-9_.]+$").unwrap();
    static ref GLOBAL_RE: Regex = Regex::new(r"^@[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum RawArg {
    Int(i64),
    Bool(bool),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct RawInstr {
    opcode: String,
    #[serde(default)]
    args: Vec<RawArg>,
    #[serde(default)]
    result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct RawGlobal {
    var: String,
    init: RawArg,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct RawProc {
    proc: String,
    #[serde(default)]
    args: Vec<String>,
    body: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
enum RawDecl {
    Global(RawGlobal),
    Proc(RawProc),
}

impl RawDecl {
    fn from_value(index: usize, value: Value) -> Result<RawDecl> {
        let kind = if value.get("proc").is_some() {
            "procedure"
        } else if value.get("var").is_some() {
            "global"
        } else {
            return Err(Error::InputError(format!(
                "declaration {} is neither a global nor a procedure",
                index
            )));
        };
        let name = value
            .get("proc")
            .or_else(|| value.get("var"))
            .and_then(Value::as_str)
            .unwrap_or("?")
            .to_string();
        let decl = if kind == "procedure" {
            serde_json::from_value(value).map(RawDecl::Proc)
        } else {
            serde_json::from_value(value).map(RawDecl::Global)
        };
        decl.map_err(|e| {
            Error::InputError(format!("malformed {} {} (declaration {}): {}", kind, name, index, e))
        })
    }
}

/// A readable or writable value location, or an immediate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Imm(i64),
    Temp(String),
    Global(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::Imm(v) => write!(f, "{}", v),
            Operand::Temp(name) | Operand::Global(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Xor,
    Shl,
    Shr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

/// Condition of a conditional jump. It is tested against zero, or, right
/// after the `sub` that produced its operand, against the ordering of the
/// `sub`'s operands, the way x64 flags would be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Cond {
    pub fn holds(self, v: i64) -> bool {
        match self {
            Cond::Eq => v == 0,
            Cond::Ne => v != 0,
            Cond::Lt => v < 0,
            Cond::Le => v <= 0,
            Cond::Gt => v > 0,
            Cond::Ge => v >= 0,
        }
    }

    /// `holds(a - b)` without wrapping.
    pub fn compare(self, a: i64, b: i64) -> bool {
        self.holds(a.cmp(&b) as i64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    Nop,
    Label(String),
    Copy {
        dest: Operand,
        src: Operand,
    },
    Binary {
        op: BinOp,
        dest: Operand,
        lhs: Operand,
        rhs: Operand,
    },
    Unary {
        op: UnOp,
        dest: Operand,
        arg: Operand,
    },
    Print(Operand),
    Jmp(String),
    Branch {
        cond: Cond,
        arg: Operand,
        target: String,
    },
    Param {
        index: usize,
        arg: Operand,
    },
    Call {
        callee: String,
        argc: usize,
        dest: Option<Operand>,
    },
    Ret(Option<Operand>),
}

impl BinOp {
    fn opcode(self) -> &'static str {
        match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::Div => "div",
            BinOp::Mod => "mod",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Xor => "xor",
            BinOp::Shl => "shl",
            BinOp::Shr => "shr",
        }
    }
}

impl Cond {
    fn opcode(self) -> &'static str {
        match self {
            Cond::Eq => "jz",
            Cond::Ne => "jnz",
            Cond::Lt => "jl",
            Cond::Le => "jle",
            Cond::Gt => "jg",
            Cond::Ge => "jge",
        }
    }
}

// TAC text form, used in execution traces.
impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instr::Nop => write!(f, "nop"),
            Instr::Label(label) => write!(f, "{}:", label),
            Instr::Copy {
                dest,
                src: src @ Operand::Imm(_),
            } => write!(f, "{} = const {}", dest, src),
            Instr::Copy { dest, src } => write!(f, "{} = copy {}", dest, src),
            Instr::Binary { op, dest, lhs, rhs } => {
                write!(f, "{} = {} {}, {}", dest, op.opcode(), lhs, rhs)
            }
            Instr::Unary { op, dest, arg } => {
                let opcode = match op {
                    UnOp::Neg => "neg",
                    UnOp::Not => "not",
                };
                write!(f, "{} = {} {}", dest, opcode, arg)
            }
            Instr::Print(arg) => write!(f, "print {}", arg),
            Instr::Jmp(target) => write!(f, "jmp {}", target),
            Instr::Branch { cond, arg, target } => {
                write!(f, "{} {}, {}", cond.opcode(), arg, target)
            }
            Instr::Param { index, arg } => write!(f, "param {}, {}", index, arg),
            Instr::Call {
                callee,
                argc,
                dest: Some(dest),
            } => write!(f, "{} = call {}, {}", dest, callee, argc),
            Instr::Call { callee, argc, .. } => write!(f, "call {}, {}", callee, argc),
            Instr::Ret(Some(arg)) => write!(f, "ret {}", arg),
            Instr::Ret(None) => write!(f, "ret"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub name: String,
    pub init: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Proc {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Instr>,
    labels: HashMap<String, usize>,
}

impl Proc {
    /// Position of the `label` instruction that defines `label`.
    pub fn label_target(&self, label: &str) -> Option<usize> {
        self.labels.get(label).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Unit {
    pub globals: Vec<Global>,
    pub procs: Vec<Proc>,
}

impl Unit {
    pub fn proc(&self, name: &str) -> Option<&Proc> {
        self.procs.iter().find(|p| p.name == name)
    }

    fn from_raw(decls: Vec<RawDecl>) -> Result<Unit> {
        let mut unit = Unit::default();
        for decl in decls {
            match decl {
                RawDecl::Global(RawGlobal { var, init }) => {
                    if !GLOBAL_RE.is_match(&var) {
                        return Err(Error::InputError(format!("invalid global name '{}'", var)));
                    }
                    let init = match init {
                        RawArg::Int(v) => v,
                        RawArg::Bool(b) => b as i64,
                        RawArg::Name(n) => {
                            return Err(Error::InputError(format!(
                                "global {} has non-constant initialiser '{}'",
                                var, n
                            )))
                        }
                    };
                    if unit.globals.iter().any(|g| g.name == var) {
                        return Err(Error::InputError(format!("global {} declared twice", var)));
                    }
                    unit.globals.push(Global { name: var, init });
                }
                RawDecl::Proc(raw) => {
                    if unit.proc(&raw.proc).is_some() {
                        return Err(Error::InputError(format!(
                            "procedure {} declared twice",
                            raw.proc
                        )));
                    }
                    unit.procs.push(lower_proc(raw)?);
                }
            }
        }
        Ok(unit)
    }
}

pub fn parse(json: &str) -> Result<Unit> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    let decls = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| RawDecl::from_value(index, value))
        .collect::<Result<Vec<_>>>()?;
    Unit::from_raw(decls)
}

/// Reads a `.tac.json` (or plain `.json`) file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Unit> {
    let path = path.as_ref();
    let name = path.to_string_lossy();
    if !name.ends_with(".json") {
        return Err(Error::InputError(
            "not of the correct format .tac.json or .json".to_string(),
        ));
    }
    log::debug!("loading tac from {}", name);
    let contents = fs::read_to_string(path)?;
    parse(&contents)
}

struct Lowering<'a> {
    proc: &'a str,
    index: usize,
    raw: &'a RawInstr,
}

impl<'a> Lowering<'a> {
    fn fail<T>(&self, reason: impl Into<String>) -> Result<T> {
        Err(Error::InvalidInstr {
            proc: self.proc.to_string(),
            index: self.index,
            reason: reason.into(),
        })
    }

    fn arity(&self, n: usize) -> Result<()> {
        if self.raw.args.len() != n {
            return self.fail(format!(
                "{} expects {} argument(s), got {}",
                self.raw.opcode,
                n,
                self.raw.args.len()
            ));
        }
        Ok(())
    }

    fn no_result(&self) -> Result<()> {
        match &self.raw.result {
            Some(r) => self.fail(format!("{} must not have a result, got {}", self.raw.opcode, r)),
            None => Ok(()),
        }
    }

    fn location(&self, name: &str) -> Result<Operand> {
        if LABEL_RE.is_match(name) {
            self.fail(format!("label {} used as a value", name))
        } else if TEMP_RE.is_match(name) {
            Ok(Operand::Temp(name.to_string()))
        } else if GLOBAL_RE.is_match(name) {
            Ok(Operand::Global(name.to_string()))
        } else {
            self.fail(format!("invalid temporary '{}'", name))
        }
    }

    fn dest(&self) -> Result<Operand> {
        match &self.raw.result {
            Some(name) => self.location(name),
            None => self.fail(format!("{} requires a result", self.raw.opcode)),
        }
    }

    fn value(&self, i: usize) -> Result<Operand> {
        match &self.raw.args[i] {
            RawArg::Int(v) => Ok(Operand::Imm(*v)),
            RawArg::Bool(b) => Ok(Operand::Imm(*b as i64)),
            RawArg::Name(name) => self.location(name),
        }
    }

    fn label(&self, i: usize) -> Result<String> {
        match &self.raw.args[i] {
            RawArg::Name(name) if LABEL_RE.is_match(name) => Ok(name.clone()),
            other => self.fail(format!("invalid label {:?}", other)),
        }
    }

    fn count(&self, i: usize) -> Result<usize> {
        match &self.raw.args[i] {
            RawArg::Int(v) if *v >= 0 => Ok(*v as usize),
            other => self.fail(format!("expected a non-negative count, got {:?}", other)),
        }
    }

    fn callee(&self, i: usize) -> Result<String> {
        match &self.raw.args[i] {
            RawArg::Name(name) if GLOBAL_RE.is_match(name) => Ok(name.clone()),
            other => self.fail(format!("invalid procedure name {:?}", other)),
        }
    }

    fn lower(&self) -> Result<Instr> {
        let opcode = self.raw.opcode.as_str();
        let binop = match opcode {
            "add" => Some(BinOp::Add),
            "sub" => Some(BinOp::Sub),
            "mul" => Some(BinOp::Mul),
            "div" => Some(BinOp::Div),
            "mod" => Some(BinOp::Mod),
            "and" => Some(BinOp::And),
            "or" => Some(BinOp::Or),
            "xor" => Some(BinOp::Xor),
            "shl" => Some(BinOp::Shl),
            "shr" => Some(BinOp::Shr),
            _ => None,
        };
        if let Some(op) = binop {
            self.arity(2)?;
            return Ok(Instr::Binary {
                op,
                dest: self.dest()?,
                lhs: self.value(0)?,
                rhs: self.value(1)?,
            });
        }
        let cond = match opcode {
            "jz" | "je" => Some(Cond::Eq),
            "jnz" | "jne" => Some(Cond::Ne),
            "jl" | "jnge" => Some(Cond::Lt),
            "jle" | "jng" => Some(Cond::Le),
            "jg" | "jnle" => Some(Cond::Gt),
            "jge" | "jnl" => Some(Cond::Ge),
            _ => None,
        };
        if let Some(cond) = cond {
            self.arity(2)?;
            self.no_result()?;
            return Ok(Instr::Branch {
                cond,
                arg: self.value(0)?,
                target: self.label(1)?,
            });
        }

        match opcode {
            "nop" => Ok(Instr::Nop),
            "label" => {
                self.arity(1)?;
                self.no_result()?;
                Ok(Instr::Label(self.label(0)?))
            }
            "const" => {
                self.arity(1)?;
                match self.value(0)? {
                    imm @ Operand::Imm(_) => Ok(Instr::Copy {
                        dest: self.dest()?,
                        src: imm,
                    }),
                    other => self.fail(format!("const expects an integer, got {}", other)),
                }
            }
            "copy" => {
                self.arity(1)?;
                Ok(Instr::Copy {
                    dest: self.dest()?,
                    src: self.value(0)?,
                })
            }
            "neg" | "not" => {
                self.arity(1)?;
                let op = if opcode == "neg" { UnOp::Neg } else { UnOp::Not };
                Ok(Instr::Unary {
                    op,
                    dest: self.dest()?,
                    arg: self.value(0)?,
                })
            }
            "print" => {
                self.arity(1)?;
                self.no_result()?;
                Ok(Instr::Print(self.value(0)?))
            }
            "jmp" => {
                self.arity(1)?;
                self.no_result()?;
                Ok(Instr::Jmp(self.label(0)?))
            }
            "param" => {
                self.arity(2)?;
                self.no_result()?;
                let index = self.count(0)?;
                if index == 0 {
                    return self.fail("param indices start at 1");
                }
                Ok(Instr::Param {
                    index,
                    arg: self.value(1)?,
                })
            }
            "call" => {
                self.arity(2)?;
                let dest = match &self.raw.result {
                    Some(name) => Some(self.location(name)?),
                    None => None,
                };
                Ok(Instr::Call {
                    callee: self.callee(0)?,
                    argc: self.count(1)?,
                    dest,
                })
            }
            "ret" => {
                self.no_result()?;
                match self.raw.args.len() {
                    0 => Ok(Instr::Ret(None)),
                    1 => Ok(Instr::Ret(Some(self.value(0)?))),
                    n => self.fail(format!("ret expects at most 1 argument, got {}", n)),
                }
            }
            other => self.fail(format!("undefined opcode '{}'", other)),
        }
    }
}

fn lower_proc(raw: RawProc) -> Result<Proc> {
    let RawProc { proc, args, body: raw_body } = raw;
    if !GLOBAL_RE.is_match(&proc) {
        return Err(Error::InputError(format!("invalid procedure name '{}'", proc)));
    }
    if let Some(bad) = args.iter().find(|a| !TEMP_RE.is_match(a) || LABEL_RE.is_match(a)) {
        return Err(Error::InputError(format!(
            "invalid parameter '{}' in {}",
            bad, proc
        )));
    }

    let instrs = raw_body
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<RawInstr>(value).map_err(|e| Error::InvalidInstr {
                proc: proc.clone(),
                index,
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut body = Vec::with_capacity(instrs.len());
    let mut labels = HashMap::new();
    for (index, instr) in instrs.iter().enumerate() {
        let lowering = Lowering {
            proc: &proc,
            index,
            raw: instr,
        };
        let lowered = lowering.lower()?;
        if let Instr::Label(name) = &lowered {
            if labels.insert(name.clone(), index).is_some() {
                return lowering.fail(format!("label {} defined twice", name));
            }
        }
        body.push(lowered);
    }

    for (index, instr) in body.iter().enumerate() {
        let target = match instr {
            Instr::Jmp(target) | Instr::Branch { target, .. } => target,
            _ => continue,
        };
        if !labels.contains_key(target) {
            return Err(Error::InvalidInstr {
                proc: proc.clone(),
                index,
                reason: format!("jump to undefined label {}", target),
            });
        }
    }

    Ok(Proc {
        name: proc,
        params: args,
        body,
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn invalid_reason(json: &str) -> String {
        match parse(json) {
            Err(Error::InvalidInstr { reason, .. }) => reason,
            other => panic!("expected an invalid instruction, got {:?}", other),
        }
    }

    #[test]
    fn globals_and_procs() {
        let unit = parse(
            r#"[
                {"var": "@x", "init": 5},
                {"var": "@flag", "init": true},
                {"proc": "@main", "args": [], "body": [
                    {"opcode": "const", "args": [3], "result": "%0"},
                    {"opcode": "add", "args": ["%0", "@x"], "result": "%1"},
                    {"opcode": "ret", "args": [], "result": null}
                ], "temps": ["%0", "%1"], "labels": []}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            unit.globals,
            vec![
                Global {
                    name: "@x".to_string(),
                    init: 5
                },
                Global {
                    name: "@flag".to_string(),
                    init: 1
                },
            ]
        );
        let main = unit.proc("@main").unwrap();
        assert_eq!(
            main.body,
            vec![
                Instr::Copy {
                    dest: Operand::Temp("%0".to_string()),
                    src: Operand::Imm(3),
                },
                Instr::Binary {
                    op: BinOp::Add,
                    dest: Operand::Temp("%1".to_string()),
                    lhs: Operand::Temp("%0".to_string()),
                    rhs: Operand::Global("@x".to_string()),
                },
                Instr::Ret(None),
            ]
        );
    }

    #[test]
    fn jump_aliases() {
        let unit = parse(
            r#"[{"proc": "@main", "body": [
                {"opcode": "label", "args": ["%.L0"], "result": null},
                {"opcode": "jnle", "args": ["%0", "%.L0"], "result": null},
                {"opcode": "je", "args": ["%0", "%.L0"], "result": null}
            ]}]"#,
        )
        .unwrap();
        let main = unit.proc("@main").unwrap();
        assert_eq!(main.label_target("%.L0"), Some(0));
        assert!(matches!(main.body[1], Instr::Branch { cond: Cond::Gt, .. }));
        assert!(matches!(main.body[2], Instr::Branch { cond: Cond::Eq, .. }));
    }

    #[test]
    fn text_form() {
        let unit = parse(
            r#"[{"proc": "@main", "body": [
                {"opcode": "const", "args": [-4], "result": "%0"},
                {"opcode": "shl", "args": ["%0", "%0"], "result": "%1"},
                {"opcode": "param", "args": [1, "%1"], "result": null},
                {"opcode": "call", "args": ["@__bx_print_int", 1], "result": null},
                {"opcode": "ret", "args": ["%1"], "result": null}
            ]}]"#,
        )
        .unwrap();
        let text: Vec<String> = unit.procs[0].body.iter().map(|i| i.to_string()).collect();
        assert_eq!(
            text,
            vec![
                "%0 = const -4",
                "%1 = shl %0, %0",
                "param 1, %1",
                "call @__bx_print_int, 1",
                "ret %1",
            ]
        );
    }

    #[test]
    fn conditions() {
        assert!(Cond::Eq.holds(0));
        assert!(!Cond::Ne.holds(0));
        assert!(Cond::Lt.holds(-1));
        assert!(Cond::Le.holds(0));
        assert!(!Cond::Gt.holds(0));
        assert!(Cond::Ge.holds(0));
        assert!(Cond::Lt.compare(i64::MIN, 1));
        assert!(!Cond::Lt.holds(i64::MIN.wrapping_sub(1)));
        assert!(Cond::Gt.compare(i64::MAX, -1));
        assert!(Cond::Eq.compare(7, 7));
    }

    #[test]
    fn rejects_bad_instructions() {
        assert_eq!(
            invalid_reason(r#"[{"proc": "@main", "body": [{"opcode": "frob", "args": []}]}]"#),
            "undefined opcode 'frob'"
        );
        assert_eq!(
            invalid_reason(
                r#"[{"proc": "@main", "body": [{"opcode": "add", "args": ["%0"], "result": "%1"}]}]"#
            ),
            "add expects 2 argument(s), got 1"
        );
        assert_eq!(
            invalid_reason(
                r#"[{"proc": "@main", "body": [{"opcode": "jmp", "args": ["%.L7"], "result": null}]}]"#
            ),
            "jump to undefined label %.L7"
        );
        assert_eq!(
            invalid_reason(
                r#"[{"proc": "@main", "body": [{"opcode": "jmp", "args": ["%3"], "result": null}]}]"#
            ),
            "invalid label Name(\"%3\")"
        );
        assert_eq!(
            invalid_reason(
                r#"[{"proc": "@main", "body": [{"opcode": "neg", "args": ["%0"], "result": null}]}]"#
            ),
            "neg requires a result"
        );
        assert_eq!(
            invalid_reason(
                r#"[{"proc": "@main", "body": [
                    {"opcode": "label", "args": ["%.L0"], "result": null},
                    {"opcode": "label", "args": ["%.L0"], "result": null}
                ]}]"#
            ),
            "label %.L0 defined twice"
        );
    }

    #[test]
    fn reports_location() {
        let err = parse(
            r#"[{"proc": "@fib", "body": [
                {"opcode": "nop", "args": []},
                {"opcode": "copy", "args": ["x"], "result": "%0"}
            ]}]"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid instruction 1 in @fib: invalid temporary 'x'"
        );
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(parse("{\"proc\": 1"), Err(Error::Json(_))));
        assert!(matches!(
            parse(r#"[{"proc": "@main", "body": []}, {"proc": "@main", "body": []}]"#),
            Err(Error::InputError(_))
        ));
    }

    #[test]
    fn locates_malformed_entries() {
        let err = parse(
            r#"[{"proc": "@main", "body": [
                {"opcode": "nop", "args": []},
                {"args": ["%0"], "result": null}
            ]}]"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid instruction 1 in @main: missing field `opcode`"
        );

        let err = parse(r#"[{"var": "@x", "init": 1}, {"proc": "@main"}]"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed procedure @main (declaration 1): missing field `body`"
        );

        let err = parse(r#"[{"name": "@main"}]"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "declaration 0 is neither a global nor a procedure"
        );
    }

    #[test]
    fn load_checks_extension() {
        let err = load("program.bx").unwrap_err();
        assert!(matches!(err, Error::InputError(_)));
        // the caller already knows the path and prefixes it
        assert_eq!(err.to_string(), "not of the correct format .tac.json or .json");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".tac.json")
            .tempfile()
            .unwrap();
        write!(
            file,
            r#"[{{"proc": "@main", "args": [], "body": [{{"opcode": "nop", "args": [], "result": null}}]}}]"#
        )
        .unwrap();

        let unit = load(file.path()).unwrap();
        assert_eq!(unit.proc("@main").unwrap().body, vec![Instr::Nop]);
    }
}
