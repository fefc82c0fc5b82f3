//! Primitive output routines called by compiled BX programs.
//!
//! A TAC `int` is a C `int64_t`, and booleans travel as the same 64-bit
//! integer: zero is `false`, anything else is `true`.

use std::io::{self, Write};

pub fn is_true(b: i64) -> bool {
    b != 0
}

pub fn write_int<W: Write + ?Sized>(out: &mut W, x: i64) -> io::Result<()> {
    writeln!(out, "{}", x)
}

pub fn write_bool<W: Write + ?Sized>(out: &mut W, b: i64) -> io::Result<()> {
    writeln!(out, "{}", if is_true(b) { "true" } else { "false" })
}

/// Prints `x` on stdout. Write errors are dropped, never raised: this is
/// entered from generated code that has no way to observe them.
pub fn print_int(x: i64) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = write_int(&mut handle, x).and_then(|_| handle.flush());
}

/// Prints `b` on stdout as `true` or `false`, same failure posture as
/// [`print_int`].
pub fn print_bool(b: i64) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = write_bool(&mut handle, b).and_then(|_| handle.flush());
}

#[no_mangle]
pub extern "C" fn __bx_print_int(x: i64) {
    print_int(x);
}

#[no_mangle]
pub extern "C" fn __bx_print_bool(b: i64) {
    print_bool(b);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    fn int_text(x: i64) -> String {
        let mut buf = Vec::new();
        write_int(&mut buf, x).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn bool_text(b: i64) -> String {
        let mut buf = Vec::new();
        write_bool(&mut buf, b).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn ints() {
        assert_eq!(int_text(42), "42\n");
        assert_eq!(int_text(-7), "-7\n");
        assert_eq!(int_text(0), "0\n");
        assert_eq!(int_text(i64::MAX), "9223372036854775807\n");
        assert_eq!(int_text(i64::MIN), "-9223372036854775808\n");
    }

    #[test]
    fn bools() {
        assert_eq!(bool_text(0), "false\n");
        assert_eq!(bool_text(1), "true\n");
        assert_eq!(bool_text(-1), "true\n");
        assert_eq!(bool_text(255), "true\n");
        assert_eq!(bool_text(i64::MIN), "true\n");
    }

    #[test]
    fn repeated_writes_are_identical() {
        let mut buf = Vec::new();
        for _ in 0..3 {
            write_int(&mut buf, -12).unwrap();
            write_bool(&mut buf, 9).unwrap();
        }
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "-12\ntrue\n-12\ntrue\n-12\ntrue\n"
        );
    }

    #[test]
    fn exports_do_not_panic() {
        __bx_print_int(-3);
        __bx_print_bool(0);
        __bx_print_bool(7);
    }

    #[quickcheck]
    fn int_matches_decimal(x: i64) -> bool {
        int_text(x) == format!("{}\n", x)
    }

    #[quickcheck]
    fn nonzero_is_true(b: i64) -> bool {
        bool_text(b) == if b == 0 { "false\n" } else { "true\n" }
    }

    #[quickcheck]
    fn int_has_no_leading_zeros(x: i64) -> bool {
        let text = int_text(x);
        let digits = text.trim_start_matches('-').trim_end();
        digits == "0" || !digits.starts_with('0')
    }
}
