//! Syn runtime library.
//!
//! Provides the three functions a compiled Syn program may call without
//! ever declaring them itself: `print`,
//! `get_num`, `alloc_dyn_arr`. Compiled as a static library and linked
//! with the emitted object code to produce a final executable.
//!
//! `print`'s C-variadic signature is implemented in `src/shim.c`
//! (compiled by `build.rs`) since a stable Rust function cannot itself
//! receive a C `...` argument list.
//!
//! # ABI
//!
//! All exported functions use the C calling convention (`extern "C"`)
//! to ensure compatibility with LLVM-generated code.

use std::io::{self, BufRead, Write};

/// Reads a whitespace-trimmed line from stdin and parses it as an `i32`.
/// A blank line, EOF, or unparseable input yields `0`.
#[unsafe(no_mangle)]
pub extern "C" fn get_num() -> i32 {
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => 0,
        Ok(_) => line.trim().parse().unwrap_or(0),
    }
}

/// Allocates `n` zeroed `i32`s on the heap and returns a pointer to the
/// first element. The allocation is
/// intentionally never freed: Syn has no `free`/`dealloc` operation, so
/// every array returned by this function lives for the process lifetime.
#[unsafe(no_mangle)]
pub extern "C" fn alloc_dyn_arr(n: i32) -> *mut i32 {
    let len = n.max(0) as usize;
    vec![0i32; len].leak().as_mut_ptr()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_dyn_arr_returns_zeroed_buffer() {
        let ptr = alloc_dyn_arr(4);
        assert!(!ptr.is_null());
        let slice = unsafe { std::slice::from_raw_parts(ptr, 4) };
        assert_eq!(slice, &[0, 0, 0, 0]);
    }

    #[test]
    fn alloc_dyn_arr_clamps_negative_length() {
        let ptr = alloc_dyn_arr(-3);
        assert!(!ptr.is_null());
    }

    #[test]
    fn get_num_defaults_to_zero_on_empty_input() {
        // No interactive stdin in test harnesses; documents the
        // fallback behavior rather than exercising real input.
        assert_eq!("".trim().parse::<i32>().unwrap_or(0), 0);
    }
}
