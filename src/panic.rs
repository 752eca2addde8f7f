use std::fmt;
use std::io::{Cursor, Write};
use std::panic::{self, PanicHookInfo};

use tracing::error;

/// Routes panics through the log. The message itself is rendered into a fixed
/// stack buffer without allocating.
pub fn set_panic_handler() {
    panic::set_hook(Box::new(panic_hook));
}

fn panic_hook(info: &PanicHookInfo) {
    let mut buffer = [0_u8; 1000];
    let message = render(&mut buffer, format_args!("{info}"));

    error!("{message}");
}

/// Writes `args` into `buffer`, cutting it off at the buffer's end and at the
/// last complete character.
fn render<'a>(buffer: &'a mut [u8], args: fmt::Arguments<'_>) -> &'a str {
    let mut cursor = Cursor::new(&mut *buffer);
    let _ = cursor.write_fmt(args); // we can't panic if this fails
    let length = cursor.position() as usize;

    let written = &buffer[..length];
    match std::str::from_utf8(written) {
        Ok(message) => message,
        // truncated in the middle of a character
        Err(err) => std::str::from_utf8(&written[..err.valid_up_to()]).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_fits_in_stack_buffer() {
        let mut buffer = [0_u8; 64];
        assert_eq!(
            render(&mut buffer, format_args!("panicked at {}", "mem.rs")),
            "panicked at mem.rs"
        );
    }

    #[test]
    fn long_message_is_cut_at_char_boundary() {
        let mut buffer = [0_u8; 5];
        // 'é' is two bytes, the third one doesn't fit
        assert_eq!(render(&mut buffer, format_args!("abcéé")), "abcé");

        let mut buffer = [0_u8; 4];
        assert_eq!(render(&mut buffer, format_args!("abcé")), "abc");
    }
}
