//! Text display sink contract.

/// VGA color codes.
///
/// Standard 16-color VGA palette for text mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    /// Black color.
    Black = 0,
    /// Blue color.
    Blue = 1,
    /// Green color.
    Green = 2,
    /// Cyan color.
    Cyan = 3,
    /// Red color.
    Red = 4,
    /// Magenta color.
    Magenta = 5,
    /// Brown color.
    Brown = 6,
    /// Light gray color.
    LightGray = 7,
    /// Dark gray color.
    DarkGray = 8,
    /// Light blue color.
    LightBlue = 9,
    /// Light green color.
    LightGreen = 10,
    /// Light cyan color.
    LightCyan = 11,
    /// Light red color.
    LightRed = 12,
    /// Pink color.
    Pink = 13,
    /// Yellow color.
    Yellow = 14,
    /// White color.
    White = 15,
}

/// Combined foreground and background color, as stored in a VGA attribute byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ColorCode(u8);

impl ColorCode {
    /// Creates a new color code from foreground and background colors.
    pub const fn new(foreground: Color, background: Color) -> ColorCode {
        ColorCode((background as u8) << 4 | (foreground as u8))
    }

    /// Returns the raw attribute byte.
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Wraps a raw attribute byte.
    pub const fn from_u8(raw: u8) -> ColorCode {
        ColorCode(raw)
    }
}

impl Default for ColorCode {
    fn default() -> Self {
        ColorCode::new(Color::LightGray, Color::Black)
    }
}

/// Width of a tab stop in cells.
const TAB_WIDTH: usize = 8;

/// A fixed grid of character cells with a cursor and a current color.
///
/// Implementors supply the primitive cell and cursor operations; the
/// character-stream behavior (wrapping, scrolling, control characters, numeric
/// writers) is provided on top of them.
pub trait DisplaySink {
    /// Number of columns.
    fn width(&self) -> usize;
    /// Number of rows.
    fn height(&self) -> usize;

    /// Writes one glyph at `(x, y)` without touching the cursor.
    ///
    /// Out-of-range coordinates are ignored.
    fn put_at(&mut self, glyph: u8, x: usize, y: usize, color: ColorCode);

    /// Returns the cursor position as `(column, row)`.
    fn cursor(&self) -> (usize, usize);

    /// Moves the cursor. Out-of-range coordinates are ignored.
    fn set_cursor(&mut self, x: usize, y: usize);

    /// Returns the color used for subsequent writes.
    fn color(&self) -> ColorCode;

    /// Sets the color used for subsequent writes.
    fn set_color(&mut self, color: ColorCode);

    /// Moves every row up by one and blanks the bottom row.
    ///
    /// The cursor is left where it is.
    fn scroll_up(&mut self);

    /// Blanks the whole grid and homes the cursor.
    fn clear(&mut self);

    /// Writes one byte at the cursor and advances it.
    ///
    /// Handles `\n`, `\r`, `\t` and backspace (`0x08`), wraps at the right edge
    /// and scrolls when the cursor runs off the bottom row.
    fn put(&mut self, byte: u8) {
        let (x, y) = self.cursor();
        match byte {
            b'\n' => self.advance_line(y),
            b'\r' => self.set_cursor(0, y),
            b'\t' => {
                let next = (x + TAB_WIDTH) & !(TAB_WIDTH - 1);
                if next >= self.width() {
                    self.advance_line(y);
                } else {
                    self.set_cursor(next, y);
                }
            }
            0x08 => self.erase_left(),
            glyph => {
                let color = self.color();
                self.put_at(glyph, x, y, color);
                if x + 1 >= self.width() {
                    self.advance_line(y);
                } else {
                    self.set_cursor(x + 1, y);
                }
            }
        }
    }

    /// Moves the cursor to the start of the row below `row`, scrolling at the bottom.
    fn advance_line(&mut self, row: usize) {
        let last = self.height().saturating_sub(1);
        if row >= last {
            self.scroll_up();
            self.set_cursor(0, last);
        } else {
            self.set_cursor(0, row + 1);
        }
    }

    /// Moves the cursor one cell back, wrapping to the end of the previous row.
    ///
    /// Returns `false` when the cursor is already at the top-left corner.
    fn step_back(&mut self) -> bool {
        match self.cursor() {
            (0, 0) => false,
            (0, y) => {
                let last_column = self.width().saturating_sub(1);
                self.set_cursor(last_column, y - 1);
                true
            }
            (x, y) => {
                self.set_cursor(x - 1, y);
                true
            }
        }
    }

    /// Visually erases the cell left of the cursor: back, blank, back.
    fn erase_left(&mut self) {
        if self.step_back() {
            let (x, y) = self.cursor();
            let color = self.color();
            self.put_at(b' ', x, y, color);
        }
    }

    /// Starts a new line.
    fn newline(&mut self) {
        self.put(b'\n');
    }

    /// Writes a string byte by byte.
    ///
    /// Bytes outside printable ASCII (other than the control characters
    /// [`DisplaySink::put`] understands) are shown as a placeholder block.
    fn write_text(&mut self, s: &str) {
        for byte in s.bytes() {
            match byte {
                0x20..=0x7e | b'\n' | b'\r' | b'\t' | 0x08 => self.put(byte),
                _ => self.put(0xfe),
            }
        }
    }

    /// Writes a string followed by a newline.
    fn write_line(&mut self, s: &str) {
        self.write_text(s);
        self.newline();
    }

    /// Writes a string in `color`, restoring the previous color afterwards.
    fn write_colored(&mut self, s: &str, color: ColorCode) {
        let saved = self.color();
        self.set_color(color);
        self.write_text(s);
        self.set_color(saved);
    }

    /// Writes an unsigned decimal number.
    fn write_dec(&mut self, value: u32) {
        let mut digits = [0u8; 10];
        let mut len = 0;
        let mut rest = value;
        loop {
            digits[len] = b'0' + (rest % 10) as u8;
            len += 1;
            rest /= 10;
            if rest == 0 {
                break;
            }
        }
        for &digit in digits[..len].iter().rev() {
            self.put(digit);
        }
    }

    /// Writes a number as `0x` followed by eight upper-case hex digits.
    fn write_hex(&mut self, value: u32) {
        const HEX: &[u8; 16] = b"0123456789ABCDEF";
        self.write_text("0x");
        for shift in (0..8).rev() {
            self.put(HEX[((value >> (shift * 4)) & 0xF) as usize]);
        }
    }

    /// Writes a number as `0b` followed by its binary digits without leading zeros.
    fn write_bin(&mut self, value: u32) {
        self.write_text("0b");
        if value == 0 {
            self.put(b'0');
            return;
        }
        let top = 31 - value.leading_zeros();
        for bit in (0..=top).rev() {
            self.put(if value & (1 << bit) != 0 { b'1' } else { b'0' });
        }
    }
}
