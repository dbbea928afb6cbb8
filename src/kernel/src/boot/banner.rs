//! Boot banner and branding.

use crate::terminal::commands::VERSION;
use minios_hal::{Color, ColorCode, DisplaySink};

/// Print the MiniOS boot banner.
pub fn print_banner(display: &mut impl DisplaySink) {
    display.set_color(ColorCode::new(Color::Cyan, Color::Black));
    display.write_line("  __  __ _       _  ___  ____  ");
    display.write_line(" |  \\/  (_)_ __ (_)/ _ \\/ ___| ");
    display.write_line(" | |\\/| | | '_ \\| | | | \\___ \\ ");
    display.write_line(" | |  | | | | | | | |_| |___) |");
    display.write_line(" |_|  |_|_|_| |_|_|\\___/|____/ ");
    display.newline();
    display.set_color(ColorCode::new(Color::White, Color::Black));
    display.put(b' ');
    display.write_line(VERSION);
    display.newline();
}
