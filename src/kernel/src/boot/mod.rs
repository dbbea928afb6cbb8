//! Boot logging with colored status indicators.
//!
//! Provides Linux-style boot messages with colored status brackets. Every
//! line is mirrored to the `log` facade.

pub mod banner;

use minios_hal::{Color, ColorCode, DisplaySink};

const TEXT_COLOR: ColorCode = ColorCode::new(Color::White, Color::Black);

/// Boot status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Success - `[ OK ]` in green
    Ok,
    /// Failure - `[FAIL]` in red
    Fail,
    /// Warning - `[WARN]` in yellow
    Warn,
    /// Informational - `[INFO]` in cyan
    Info,
}

/// Log a boot stage with status.
///
/// Format: `[ OK ] Message text`
pub fn log(display: &mut impl DisplaySink, status: Status, message: &str) {
    print_status(display, status);
    display.put(b' ');
    display.write_line(message);
    match status {
        Status::Fail => log::error!("{}", message),
        Status::Warn => log::warn!("{}", message),
        Status::Ok | Status::Info => log::info!("{}", message),
    }
}

/// Log an indented detail line (for sub-items).
///
/// Format: `       Detail text` (aligned with message after status)
pub fn log_detail(display: &mut impl DisplaySink, message: &str) {
    display.write_text("       ");
    display.write_line(message);
    log::debug!("{}", message);
}

/// Log an indented detail line ending in a `0x`-prefixed value.
///
/// Format: `       Label 0x00010000`
pub fn log_address(display: &mut impl DisplaySink, label: &str, value: u32) {
    display.write_text("       ");
    display.write_text(label);
    display.put(b' ');
    display.write_hex(value);
    display.newline();
    log::debug!("{} {:#010x}", label, value);
}

fn print_status(display: &mut impl DisplaySink, status: Status) {
    let (text, color) = match status {
        Status::Ok => ("[ OK ]", Color::LightGreen),
        Status::Fail => ("[FAIL]", Color::LightRed),
        Status::Warn => ("[WARN]", Color::Yellow),
        Status::Info => ("[INFO]", Color::LightCyan),
    };
    display.write_colored(text, ColorCode::new(color, Color::Black));
    display.set_color(TEXT_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{CellBuffer, MemoryBuffer, TextScreen};

    #[test]
    fn status_line_layout() {
        let mut screen = TextScreen::new(MemoryBuffer::new());
        screen.clear();
        log(&mut screen, Status::Ok, "PIC remapped");
        log_detail(&mut screen, "IRQ 0-15 -> 32-47");
        assert_eq!(screen.cells().find_row("[ OK ] PIC remapped"), Some(0));
        log_address(&mut screen, "Multiboot info at", 0x0001_0000);
        assert_eq!(screen.cells().find_row("       IRQ 0-15"), Some(1));
        assert_eq!(
            screen.cells().find_row("       Multiboot info at 0x00010000"),
            Some(2)
        );
        assert_eq!(screen.cursor(), (0, 3));
        assert_eq!(
            screen.cells().read(0, 0).color_code,
            ColorCode::new(Color::LightGreen, Color::Black)
        );
    }
}
