//! Runtime support for programs compiled from BX through TAC.
//!
//! Native code produced by the BX toolchain links against this crate's
//! static library and calls [`rt::__bx_print_int`] and
//! [`rt::__bx_print_bool`]. The same routines back the TAC interpreter in
//! [`program`], so a `.tac.json` file can be run without going through an
//! assembler:
//!
//! ```
//! use bx_runtime::Program;
//!
//! let source = r#"[{"proc": "@main", "args": [], "body": [
//!     {"opcode": "const", "args": [42], "result": "%0"},
//!     {"opcode": "param", "args": [1, "%0"], "result": null},
//!     {"opcode": "call", "args": ["@__bx_print_int", 1], "result": null},
//!     {"opcode": "ret", "args": [], "result": null}
//! ]}]"#;
//! let program = Program::create(source).unwrap();
//! assert_eq!(program.execute().unwrap(), "42\n");
//! ```

pub mod errors;
pub mod program;
pub mod rt;
pub mod tac;

pub use errors::{Error, Result};
pub use program::{ExecConfig, Program};
