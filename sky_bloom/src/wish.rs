//! The wish typed into the panel after the bloom.  Held in memory only.

use crate::constants::WISH_MAX_CHARS;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WishText {
    text: String,
}

impl WishText {
    pub fn new() -> Self { Self::default() }

    pub fn as_str(&self) -> &str { &self.text }

    pub fn len(&self) -> usize { self.text.chars().count() }

    pub fn is_empty(&self) -> bool { self.text.is_empty() }

    pub fn is_full(&self) -> bool { self.len() >= WISH_MAX_CHARS }

    /// Append one character.  Returns false when the wish is full or `c` is
    /// a control character.
    pub fn push(&mut self, c: char) -> bool {
        if c.is_control() || self.is_full() {
            return false;
        }
        self.text.push(c);
        true
    }

    /// Append as much of `s` as fits; returns how many characters were taken.
    pub fn push_str(&mut self, s: &str) -> usize {
        s.chars().take_while(|&c| self.push(c)).count()
    }

    pub fn backspace(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}
