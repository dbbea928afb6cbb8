//! Text-mode screen with cursor and color tracking.
//!
//! [`TextScreen`] implements the [`DisplaySink`] contract on top of any
//! [`CellBuffer`]: the VGA text buffer on hardware, or [`MemoryBuffer`] when
//! running against mocks.

use core::fmt;
use minios_hal::{ColorCode, DisplaySink};

/// Number of rows in VGA text mode.
pub const BUFFER_HEIGHT: usize = 25;

/// Number of columns in VGA text mode.
pub const BUFFER_WIDTH: usize = 80;

/// A single character cell: glyph byte plus attribute byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ScreenChar {
    /// Code page 437 glyph.
    pub ascii_character: u8,
    /// Foreground/background attribute.
    pub color_code: ColorCode,
}

impl ScreenChar {
    /// A space in the given color.
    pub const fn blank(color_code: ColorCode) -> Self {
        ScreenChar {
            ascii_character: b' ',
            color_code,
        }
    }
}

/// Backing storage for a [`BUFFER_WIDTH`] x [`BUFFER_HEIGHT`] cell grid.
///
/// Callers guarantee `x < BUFFER_WIDTH` and `y < BUFFER_HEIGHT`.
pub trait CellBuffer {
    /// Reads one cell.
    fn read(&self, x: usize, y: usize) -> ScreenChar;
    /// Writes one cell.
    fn write(&mut self, x: usize, y: usize, cell: ScreenChar);
    /// Moves the visible cursor, if the device has one.
    fn move_cursor(&mut self, _x: usize, _y: usize) {}
}

/// A cell grid held in ordinary memory.
#[derive(Clone)]
pub struct MemoryBuffer {
    chars: [[ScreenChar; BUFFER_WIDTH]; BUFFER_HEIGHT],
}

impl MemoryBuffer {
    /// Creates a blank grid.
    pub fn new() -> Self {
        MemoryBuffer {
            chars: [[ScreenChar::blank(ColorCode::default()); BUFFER_WIDTH]; BUFFER_HEIGHT],
        }
    }

    /// Returns the glyph bytes of one row, or `None` past the bottom.
    pub fn row(&self, y: usize) -> Option<[u8; BUFFER_WIDTH]> {
        let cells = self.chars.get(y)?;
        let mut glyphs = [b' '; BUFFER_WIDTH];
        for (glyph, cell) in glyphs.iter_mut().zip(cells.iter()) {
            *glyph = cell.ascii_character;
        }
        Some(glyphs)
    }

    /// Number of rows whose text contains `needle`.
    pub fn count_rows_containing(&self, needle: &str) -> usize {
        (0..BUFFER_HEIGHT)
            .filter_map(|y| self.row(y))
            .filter(|row| {
                needle.is_empty()
                    || row
                        .windows(needle.len())
                        .any(|window| window == needle.as_bytes())
            })
            .count()
    }

    /// First row whose text contains `needle`.
    pub fn find_row(&self, needle: &str) -> Option<usize> {
        (0..BUFFER_HEIGHT).find(|&y| {
            self.row(y).is_some_and(|row| {
                row.windows(needle.len().max(1))
                    .any(|window| window == needle.as_bytes())
            })
        })
    }
}

impl Default for MemoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CellBuffer for MemoryBuffer {
    fn read(&self, x: usize, y: usize) -> ScreenChar {
        self.chars[y][x]
    }

    fn write(&mut self, x: usize, y: usize, cell: ScreenChar) {
        self.chars[y][x] = cell;
    }
}

/// Text screen: a cell grid plus the cursor position and current color.
pub struct TextScreen<B> {
    cells: B,
    column: usize,
    row: usize,
    color: ColorCode,
}

impl<B: CellBuffer> TextScreen<B> {
    /// Wraps a cell buffer. The cursor starts at the top-left corner.
    ///
    /// The existing cell contents are left untouched; call
    /// [`DisplaySink::clear`] to blank them.
    pub fn new(cells: B) -> Self {
        TextScreen {
            cells,
            column: 0,
            row: 0,
            color: ColorCode::default(),
        }
    }

    /// The underlying cell buffer.
    pub fn cells(&self) -> &B {
        &self.cells
    }

    fn clear_row(&mut self, row: usize) {
        let blank = ScreenChar::blank(self.color);
        for col in 0..BUFFER_WIDTH {
            self.cells.write(col, row, blank);
        }
    }
}

impl<B: CellBuffer> DisplaySink for TextScreen<B> {
    fn width(&self) -> usize {
        BUFFER_WIDTH
    }

    fn height(&self) -> usize {
        BUFFER_HEIGHT
    }

    fn put_at(&mut self, glyph: u8, x: usize, y: usize, color: ColorCode) {
        if x < BUFFER_WIDTH && y < BUFFER_HEIGHT {
            self.cells.write(
                x,
                y,
                ScreenChar {
                    ascii_character: glyph,
                    color_code: color,
                },
            );
        }
    }

    fn cursor(&self) -> (usize, usize) {
        (self.column, self.row)
    }

    fn set_cursor(&mut self, x: usize, y: usize) {
        if x < BUFFER_WIDTH && y < BUFFER_HEIGHT {
            self.column = x;
            self.row = y;
            self.cells.move_cursor(x, y);
        }
    }

    fn color(&self) -> ColorCode {
        self.color
    }

    fn set_color(&mut self, color: ColorCode) {
        self.color = color;
    }

    fn scroll_up(&mut self) {
        for row in 1..BUFFER_HEIGHT {
            for col in 0..BUFFER_WIDTH {
                let character = self.cells.read(col, row);
                self.cells.write(col, row - 1, character);
            }
        }
        self.clear_row(BUFFER_HEIGHT - 1);
    }

    fn clear(&mut self) {
        for row in 0..BUFFER_HEIGHT {
            self.clear_row(row);
        }
        self.set_cursor(0, 0);
    }
}

impl<B: CellBuffer> fmt::Write for TextScreen<B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_text(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minios_hal::Color;

    fn screen() -> TextScreen<MemoryBuffer> {
        let mut screen = TextScreen::new(MemoryBuffer::new());
        screen.clear();
        screen
    }

    fn row_text(screen: &TextScreen<MemoryBuffer>, y: usize) -> [u8; BUFFER_WIDTH] {
        screen.cells().row(y).unwrap_or([0; BUFFER_WIDTH])
    }

    #[test]
    fn put_advances_and_wraps() {
        let mut screen = screen();
        for _ in 0..BUFFER_WIDTH {
            screen.put(b'x');
        }
        assert_eq!(screen.cursor(), (0, 1));
        assert!(row_text(&screen, 0).iter().all(|&c| c == b'x'));
    }

    #[test]
    fn newline_on_bottom_row_scrolls() {
        let mut screen = screen();
        screen.write_text("top");
        screen.set_cursor(0, BUFFER_HEIGHT - 1);
        screen.write_text("bottom\n");
        assert_eq!(screen.cursor(), (0, BUFFER_HEIGHT - 1));
        assert_eq!(&row_text(&screen, BUFFER_HEIGHT - 2)[..6], b"bottom");
        assert_eq!(screen.cells().find_row("top"), None);
    }

    #[test]
    fn out_of_range_coordinates_are_ignored() {
        let mut screen = screen();
        screen.set_cursor(3, 4);
        screen.set_cursor(BUFFER_WIDTH, 0);
        screen.put_at(b'!', 0, BUFFER_HEIGHT, screen.color());
        assert_eq!(screen.cursor(), (3, 4));
        assert_eq!(screen.cells().find_row("!"), None);
    }

    #[test]
    fn erase_left_wraps_to_previous_row() {
        let mut screen = screen();
        screen.set_cursor(BUFFER_WIDTH - 1, 0);
        screen.put(b'z');
        assert_eq!(screen.cursor(), (0, 1));
        screen.erase_left();
        assert_eq!(screen.cursor(), (BUFFER_WIDTH - 1, 0));
        assert_eq!(row_text(&screen, 0)[BUFFER_WIDTH - 1], b' ');
    }

    #[test]
    fn erase_left_at_origin_is_noop() {
        let mut screen = screen();
        screen.erase_left();
        assert_eq!(screen.cursor(), (0, 0));
    }

    #[test]
    fn numeric_writers() {
        let mut screen = screen();
        screen.write_dec(0);
        screen.put(b' ');
        screen.write_dec(4_294_967_295);
        screen.put(b' ');
        screen.write_hex(0xB8000);
        screen.put(b' ');
        screen.write_bin(5);
        let row = row_text(&screen, 0);
        assert_eq!(&row[..34], b"0 4294967295 0x000B8000 0b101     ");
    }

    #[test]
    fn tab_moves_to_next_stop() {
        let mut screen = screen();
        screen.write_text("ab\tc");
        assert_eq!(screen.cursor(), (9, 0));
    }

    #[test]
    fn colored_write_restores_color() {
        let mut screen = screen();
        let before = screen.color();
        screen.write_colored("err", ColorCode::new(Color::LightRed, Color::Black));
        assert_eq!(screen.color(), before);
        assert_eq!(
            screen.cells().read(0, 0).color_code,
            ColorCode::new(Color::LightRed, Color::Black)
        );
    }
}
