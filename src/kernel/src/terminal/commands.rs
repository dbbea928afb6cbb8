//! Built-in shell commands.
//!
//! The catalog is fixed: exact, case-sensitive names plus the `echo <text>`
//! prefix form.

use super::shell::{LINE_CAPACITY, HISTORY_CAPACITY};
use super::History;
use crate::trap::TrapStats;
use minios_common::Modifiers;
use minios_hal::{Color, ColorCode, Cpu, DisplaySink, KeyboardController};

/// Kernel name and version shown by `version` and the banner.
pub const VERSION: &str = concat!("MiniOS v", env!("CARGO_PKG_VERSION"));

const ERROR_COLOR: ColorCode = ColorCode::new(Color::LightRed, Color::Black);

/// Shell command types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Display help information.
    Help,
    /// Clear the screen.
    Clear,
    /// Echo text.
    Echo(&'a str),
    /// Reset the machine.
    Reboot,
    /// Show version information.
    Version,
    /// Show keyboard, history and trap state.
    Status,
    /// List submitted lines.
    History,
    /// Anything else.
    Unknown(&'a str),
}

/// One line of `help` output per command.
const CATALOG: [(&str, &str); 7] = [
    ("help", "Show this help"),
    ("clear", "Clear screen"),
    ("echo", "Echo text"),
    ("reboot", "Reboot system"),
    ("version", "Show version"),
    ("status", "Show system status"),
    ("history", "Show command history"),
];

/// What a command may touch while it runs.
pub struct Session<'a, D, H> {
    /// Screen receiving output.
    pub display: &'a mut D,
    /// Machine access for `reboot`.
    pub hardware: &'a mut H,
    /// Submitted lines, including the one being executed.
    pub history: &'a History<LINE_CAPACITY, HISTORY_CAPACITY>,
    /// Keyboard modifier and lock state.
    pub modifiers: Modifiers,
    /// Trap counters.
    pub stats: TrapStats,
}

impl<'a> Command<'a> {
    /// Parse a submitted line.
    pub fn parse(line: &'a str) -> Command<'a> {
        match line {
            "help" => Command::Help,
            "clear" => Command::Clear,
            "echo" => Command::Echo(""),
            "reboot" => Command::Reboot,
            "version" => Command::Version,
            "status" => Command::Status,
            "history" => Command::History,
            _ => match line.strip_prefix("echo ") {
                Some(text) => Command::Echo(text),
                None => Command::Unknown(line),
            },
        }
    }

    /// Execute a command.
    pub fn execute<D, H>(self, session: &mut Session<'_, D, H>)
    where
        D: DisplaySink,
        H: KeyboardController + Cpu,
    {
        let display = &mut *session.display;
        match self {
            Command::Help => cmd_help(display),
            Command::Clear => display.clear(),
            Command::Echo(text) => display.write_line(text),
            Command::Reboot => {
                display.write_line("Rebooting...");
                log::info!("reboot requested");
                session.hardware.reset_system();
                // Still running: the controller ignored the reset pulse.
                session.hardware.halt();
            }
            Command::Version => cmd_version(display),
            Command::Status => cmd_status(display, session.modifiers, session.history.len(), &session.stats),
            Command::History => {
                for (number, entry) in session.history.iter().enumerate() {
                    display.write_text("  ");
                    display.write_dec(number as u32 + 1);
                    display.write_text("  ");
                    display.write_line(entry);
                }
            }
            Command::Unknown(text) => {
                display.write_colored("Unknown command: ", ERROR_COLOR);
                display.write_colored(text, ERROR_COLOR);
                display.newline();
                display.write_line("Type 'help' for available commands.");
            }
        }
    }
}

fn cmd_help(display: &mut impl DisplaySink) {
    display.write_line("Available commands:");
    for (name, summary) in CATALOG {
        display.write_text("  ");
        display.write_text(name);
        for _ in name.len()..9 {
            display.put(b' ');
        }
        display.write_text("- ");
        display.write_line(summary);
    }
}

fn cmd_version(display: &mut impl DisplaySink) {
    display.write_line(VERSION);
    display.write_line("Interrupt-driven keyboard input and command line");
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

fn cmd_status(display: &mut impl DisplaySink, modifiers: Modifiers, history: usize, stats: &TrapStats) {
    display.write_line("System Status:");

    display.write_text("  Keyboard: ");
    if modifiers.intersects(Modifiers::HELD) {
        for (flag, name) in [
            (Modifiers::SHIFT, "SHIFT "),
            (Modifiers::CTRL, "CTRL "),
            (Modifiers::ALT, "ALT "),
        ] {
            if modifiers.contains(flag) {
                display.write_text(name);
            }
        }
        display.newline();
    } else {
        display.write_line("Normal");
    }

    display.write_text("  Caps Lock: ");
    display.write_line(on_off(modifiers.contains(Modifiers::CAPS_LOCK)));
    display.write_text("  Num Lock: ");
    display.write_line(on_off(modifiers.contains(Modifiers::NUM_LOCK)));
    display.write_text("  Scroll Lock: ");
    display.write_line(on_off(modifiers.contains(Modifiers::SCROLL_LOCK)));

    display.write_text("  Command History: ");
    display.write_dec(history as u32);
    display.write_line(" entries");

    display.write_text("  Device traps: ");
    display.write_dec(stats.device_traps);
    display.write_text(" (keyboard ");
    display.write_dec(stats.keyboard);
    display.write_text(", ignored ");
    display.write_dec(stats.ignored);
    display.write_line(")");
}
