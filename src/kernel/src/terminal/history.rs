//! Bounded command history with a browse cursor.

use super::shell::LineBuffer;

/// What browsing the history asks the editor to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recall<'a> {
    /// Show this history entry.
    Entry(&'a str),
    /// Browsing ran past the newest entry; restore the line being typed.
    Draft,
    /// Nothing to do.
    Unchanged,
}

/// The last `M` submitted lines, oldest first.
///
/// When full, pushing evicts index 0 and shifts the rest down.
#[derive(Clone)]
pub struct History<const N: usize, const M: usize> {
    entries: [LineBuffer<N>; M],
    count: usize,
    /// Index of the entry being shown, or `None` while editing a fresh line.
    browse: Option<usize>,
}

impl<const N: usize, const M: usize> History<N, M> {
    /// Creates an empty history.
    pub const fn new() -> Self {
        History {
            entries: [LineBuffer::new(); M],
            count: 0,
            browse: None,
        }
    }

    /// Appends a submitted line, evicting the oldest entry when full.
    pub fn push(&mut self, line: &LineBuffer<N>) {
        if M == 0 {
            return;
        }
        if self.count < M {
            self.entries[self.count] = *line;
            self.count += 1;
        } else {
            self.entries.rotate_left(1);
            self.entries[M - 1] = *line;
        }
        self.browse = None;
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether nothing has been submitted yet.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Maximum number of entries kept.
    pub const fn capacity(&self) -> usize {
        M
    }

    /// Entry at `index`, oldest first.
    pub fn get(&self, index: usize) -> Option<&str> {
        if index < self.count {
            Some(self.entries[index].as_str())
        } else {
            None
        }
    }

    /// Iterates entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries[..self.count].iter().map(LineBuffer::as_str)
    }

    /// Whether an entry is currently being shown instead of the draft.
    pub fn is_browsing(&self) -> bool {
        self.browse.is_some()
    }

    /// Stops browsing; the next [`browse_older`](Self::browse_older) starts at
    /// the newest entry.
    pub fn reset_browse(&mut self) {
        self.browse = None;
    }

    /// Steps one entry back in time.
    pub fn browse_older(&mut self) -> Recall<'_> {
        let index = match self.browse {
            _ if self.count == 0 => return Recall::Unchanged,
            None => self.count - 1,
            Some(0) => return Recall::Unchanged,
            Some(index) => index - 1,
        };
        self.browse = Some(index);
        Recall::Entry(self.entries[index].as_str())
    }

    /// Steps one entry forward in time, ending at the draft.
    pub fn browse_newer(&mut self) -> Recall<'_> {
        match self.browse {
            None => Recall::Unchanged,
            Some(index) if index + 1 >= self.count => {
                self.browse = None;
                Recall::Draft
            }
            Some(index) => {
                self.browse = Some(index + 1);
                Recall::Entry(self.entries[index + 1].as_str())
            }
        }
    }
}

impl<const N: usize, const M: usize> Default for History<N, M> {
    fn default() -> Self {
        Self::new()
    }
}
