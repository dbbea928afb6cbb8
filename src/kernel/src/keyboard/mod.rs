//! PS/2 keyboard decoding.
//!
//! Raw set-1 scancodes arrive one byte per keyboard interrupt. The
//! [`KeyboardDecoder`] folds modifier and lock keys into its
//! [`ModifierState`] and turns everything else into [`KeyEvent`]s for the
//! command line.

mod decoder;
pub mod scancode;

pub use decoder::{KeyEvent, KeyboardDecoder, ModifierState};
