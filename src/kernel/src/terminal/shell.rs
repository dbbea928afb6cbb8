//! Command-line editor: the input line, prompt and history browsing.

use super::history::{History, Recall};
use crate::keyboard::KeyEvent;
use minios_hal::{Color, ColorCode, DisplaySink};

/// Capacity of the input line, including the reserved terminator slot.
pub const LINE_CAPACITY: usize = 256;

/// Number of submitted lines remembered.
pub const HISTORY_CAPACITY: usize = 10;

/// Text shown before every input line.
pub const PROMPT: &str = "mini-os> ";

const PROMPT_COLOR: ColorCode = ColorCode::new(Color::LightGreen, Color::Black);
const INPUT_COLOR: ColorCode = ColorCode::new(Color::White, Color::Black);

/// Fixed-capacity text buffer holding at most `N - 1` bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LineBuffer<const N: usize> {
    chars: [u8; N],
    len: usize,
    cursor: usize,
}

impl<const N: usize> LineBuffer<N> {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        LineBuffer {
            chars: [0; N],
            len: 0,
            cursor: 0,
        }
    }

    /// Appends `c` at the cursor. Returns `false` if the buffer is full.
    pub fn insert(&mut self, c: u8) -> bool {
        if self.len + 1 >= N {
            return false;
        }
        self.chars[self.len] = c;
        self.len += 1;
        self.cursor = self.len;
        true
    }

    /// Removes the byte left of the cursor. Returns `false` if empty.
    pub fn delete_left(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.len -= 1;
        self.chars[self.len] = 0;
        self.cursor = self.len;
        true
    }

    /// Empties the buffer and zeroes every slot.
    pub fn clear(&mut self) {
        self.chars = [0; N];
        self.len = 0;
        self.cursor = 0;
    }

    /// Replaces the contents with `text`, truncated to the capacity.
    pub fn replace(&mut self, text: &str) {
        self.clear();
        for &byte in text.as_bytes() {
            if !self.insert(byte) {
                break;
            }
        }
    }

    /// The buffered text.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.chars[..self.len]).unwrap_or("")
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cursor position; edits happen at the end so this equals [`len`](Self::len).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total slots, one more than the longest line accepted.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> core::fmt::Debug for LineBuffer<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("LineBuffer").field(&self.as_str()).finish()
    }
}

/// A submitted input line.
pub type Line = LineBuffer<LINE_CAPACITY>;

/// Line editor with history.
pub struct Shell {
    line: Line,
    /// Input saved while browsing history.
    draft: Line,
    history: History<LINE_CAPACITY, HISTORY_CAPACITY>,
}

impl Shell {
    /// Creates an editor with an empty line and history.
    pub const fn new() -> Self {
        Shell {
            line: LineBuffer::new(),
            draft: LineBuffer::new(),
            history: History::new(),
        }
    }

    /// Display the prompt and switch to the input color.
    pub fn prompt(&self, display: &mut impl DisplaySink) {
        display.set_color(PROMPT_COLOR);
        display.write_text(PROMPT);
        display.set_color(INPUT_COLOR);
    }

    /// Handle a decoded key.
    ///
    /// Returns the line when Enter submits non-empty input. The caller runs
    /// the command and then shows the prompt again; an empty submission is
    /// re-prompted here.
    pub fn handle_key(&mut self, event: KeyEvent, display: &mut impl DisplaySink) -> Option<Line> {
        match event {
            KeyEvent::Char(c) => {
                self.insert(c, display);
                None
            }
            KeyEvent::Backspace => {
                self.delete_left(display);
                None
            }
            KeyEvent::Enter => self.submit(display),
            KeyEvent::HistoryOlder => {
                self.recall_older(display);
                None
            }
            KeyEvent::HistoryNewer => {
                self.recall_newer(display);
                None
            }
        }
    }

    /// Append a character and echo it. Dropped silently when the line is full.
    pub fn insert(&mut self, c: u8, display: &mut impl DisplaySink) {
        if self.line.insert(c) {
            display.put(c);
        }
    }

    /// Delete the character left of the cursor, on screen too.
    pub fn delete_left(&mut self, display: &mut impl DisplaySink) {
        if self.line.delete_left() {
            display.erase_left();
        }
    }

    /// Finish the current line.
    pub fn submit(&mut self, display: &mut impl DisplaySink) -> Option<Line> {
        display.newline();
        self.history.reset_browse();
        self.draft.clear();

        if self.line.is_empty() {
            self.prompt(display);
            return None;
        }

        let submitted = self.line;
        self.history.push(&submitted);
        self.line.clear();
        log::debug!("submitted {:?}", submitted.as_str());
        Some(submitted)
    }

    fn recall_older(&mut self, display: &mut impl DisplaySink) {
        if !self.history.is_browsing() {
            self.draft = self.line;
        }
        let shown = self.line.len();
        if let Recall::Entry(entry) = self.history.browse_older() {
            self.line.replace(entry);
            Self::redraw(&self.line, shown, display);
        }
    }

    fn recall_newer(&mut self, display: &mut impl DisplaySink) {
        let shown = self.line.len();
        match self.history.browse_newer() {
            Recall::Entry(entry) => self.line.replace(entry),
            Recall::Draft => self.line = self.draft,
            Recall::Unchanged => return,
        }
        Self::redraw(&self.line, shown, display);
    }

    /// Erases `shown` echoed characters and echoes `line` in their place.
    fn redraw(line: &Line, shown: usize, display: &mut impl DisplaySink) {
        for _ in 0..shown {
            display.erase_left();
        }
        display.write_text(line.as_str());
    }

    /// The line being edited.
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Submitted lines.
    pub fn history(&self) -> &History<LINE_CAPACITY, HISTORY_CAPACITY> {
        &self.history
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{MemoryBuffer, TextScreen};

    fn screen() -> TextScreen<MemoryBuffer> {
        let mut screen = TextScreen::new(MemoryBuffer::new());
        screen.clear();
        screen
    }

    fn type_str(shell: &mut Shell, screen: &mut TextScreen<MemoryBuffer>, text: &str) {
        for &c in text.as_bytes() {
            shell.handle_key(KeyEvent::Char(c), screen);
        }
    }

    #[test]
    fn line_buffer_holds_capacity_minus_one() {
        let mut line: LineBuffer<4> = LineBuffer::new();
        assert!(line.insert(b'a'));
        assert!(line.insert(b'b'));
        assert!(line.insert(b'c'));
        assert!(!line.insert(b'd'));
        assert_eq!(line.as_str(), "abc");
        assert_eq!(line.cursor(), 3);
    }

    #[test]
    fn inserts_past_capacity_are_dropped() {
        let mut shell = Shell::new();
        let mut screen = screen();
        for _ in 0..LINE_CAPACITY + 10 {
            shell.handle_key(KeyEvent::Char(b'x'), &mut screen);
        }
        assert_eq!(shell.line().len(), LINE_CAPACITY - 1);
        // Echoed once per accepted character.
        let (x, y) = screen.cursor();
        assert_eq!(y * screen.width() + x, LINE_CAPACITY - 1);
    }

    #[test]
    fn delete_left_on_empty_is_noop() {
        let mut shell = Shell::new();
        let mut screen = screen();
        screen.set_cursor(5, 0);
        shell.handle_key(KeyEvent::Backspace, &mut screen);
        assert_eq!(screen.cursor(), (5, 0));
    }

    #[test]
    fn delete_left_erases_echo() {
        let mut shell = Shell::new();
        let mut screen = screen();
        type_str(&mut shell, &mut screen, "ab");
        shell.handle_key(KeyEvent::Backspace, &mut screen);
        assert_eq!(shell.line().as_str(), "a");
        assert_eq!(screen.cursor(), (1, 0));
        assert_eq!(screen.cells().find_row("ab"), None);
    }

    #[test]
    fn empty_submit_reprompts_without_history() {
        let mut shell = Shell::new();
        let mut screen = screen();
        assert_eq!(shell.handle_key(KeyEvent::Enter, &mut screen), None);
        assert!(shell.history().is_empty());
        assert_eq!(screen.cells().find_row(PROMPT), Some(1));
    }

    #[test]
    fn submit_returns_line_and_records_history() {
        let mut shell = Shell::new();
        let mut screen = screen();
        type_str(&mut shell, &mut screen, "status");
        let line = shell.handle_key(KeyEvent::Enter, &mut screen);
        assert_eq!(line.as_ref().map(LineBuffer::as_str), Some("status"));
        assert_eq!(shell.history().len(), 1);
        assert_eq!(shell.history().get(0), Some("status"));
        assert!(shell.line().is_empty());
    }

    #[test]
    fn arrows_recall_history_and_draft() {
        let mut shell = Shell::new();
        let mut screen = screen();
        type_str(&mut shell, &mut screen, "first");
        shell.handle_key(KeyEvent::Enter, &mut screen);
        shell.prompt(&mut screen);
        type_str(&mut shell, &mut screen, "dr");

        shell.handle_key(KeyEvent::HistoryOlder, &mut screen);
        assert_eq!(shell.line().as_str(), "first");
        assert_eq!(screen.cursor(), (PROMPT.len() + 5, 1));

        shell.handle_key(KeyEvent::HistoryNewer, &mut screen);
        assert_eq!(shell.line().as_str(), "dr");
        assert_eq!(screen.cursor(), (PROMPT.len() + 2, 1));
        assert_eq!(screen.cells().find_row("first"), Some(0));
    }
}
