//! Streaming matcher for a fixed key sequence.

use std::collections::VecDeque;

use thiserror::Error;

/// Raw virtual-key code as delivered by the keyboard hook.
pub type KeyCode = u32;

/// Page Up.
pub const VK_PRIOR: KeyCode = 0x21;

/// Page Down.
pub const VK_NEXT: KeyCode = 0x22;

/// Hotkey construction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HotkeyError {
    #[error("Hotkey sequence must contain at least one key")]
    Empty,
}

/// An ordered, non-empty key sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    keys: Vec<KeyCode>,
}

impl Hotkey {
    pub fn new(keys: Vec<KeyCode>) -> Result<Self, HotkeyError> {
        if keys.is_empty() {
            return Err(HotkeyError::Empty);
        }
        Ok(Self { keys })
    }

    /// A hotkey made of a single key.
    pub fn single(key: KeyCode) -> Self {
        Self { keys: vec![key] }
    }

    pub fn keys(&self) -> &[KeyCode] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Sliding window over the most recent key codes.
///
/// The window holds at most `hotkey.len()` codes and evicts the oldest on
/// every push once full. It is never cleared.
#[derive(Debug, Clone)]
pub struct KeystrokeMatcher {
    hotkey: Hotkey,
    window: VecDeque<KeyCode>,
}

impl KeystrokeMatcher {
    pub fn new(hotkey: Hotkey) -> Self {
        let window = VecDeque::with_capacity(hotkey.len());
        Self { hotkey, window }
    }

    pub fn hotkey(&self) -> &Hotkey {
        &self.hotkey
    }

    /// Record a key press. Returns true when the last `hotkey.len()` codes
    /// equal the hotkey, in order.
    pub fn push(&mut self, code: KeyCode) -> bool {
        if self.window.len() == self.hotkey.len() {
            self.window.pop_front();
        }
        self.window.push_back(code);

        self.window.iter().eq(self.hotkey.keys.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(matcher: &mut KeystrokeMatcher, codes: &[KeyCode]) -> Vec<bool> {
        codes.iter().map(|&code| matcher.push(code)).collect()
    }

    #[test]
    fn test_single_key_hotkey() {
        let mut matcher = KeystrokeMatcher::new(Hotkey::single(33));
        assert_eq!(feed(&mut matcher, &[10, 33]), vec![false, true]);
    }

    #[test]
    fn test_auto_repeat_matches_every_time() {
        let mut matcher = KeystrokeMatcher::new(Hotkey::single(VK_PRIOR));
        assert_eq!(
            feed(&mut matcher, &[VK_PRIOR, VK_PRIOR, VK_PRIOR]),
            vec![true, true, true]
        );
    }

    #[test]
    fn test_two_key_sequence_ignores_stale_window() {
        let hotkey = Hotkey::new(vec![0x41, 0x42]).unwrap();
        let mut matcher = KeystrokeMatcher::new(hotkey);
        assert_eq!(
            feed(&mut matcher, &[0x41, 0x41, 0x42]),
            vec![false, false, true]
        );
    }

    #[test]
    fn test_two_key_sequence_is_order_sensitive() {
        let hotkey = Hotkey::new(vec![0x41, 0x42]).unwrap();
        let mut matcher = KeystrokeMatcher::new(hotkey);
        assert_eq!(feed(&mut matcher, &[0x42, 0x41]), vec![false, false]);
    }

    #[test]
    fn test_no_match_before_window_fills() {
        let mut matcher = KeystrokeMatcher::new(Hotkey::new(vec![0x41, 0x42]).unwrap());
        // A single code equal to the tail of the hotkey must not match.
        assert!(!matcher.push(0x42));
    }

    #[test]
    fn test_match_repeats_after_further_keys() {
        let hotkey = Hotkey::new(vec![1, 2]).unwrap();
        let mut matcher = KeystrokeMatcher::new(hotkey);
        assert_eq!(
            feed(&mut matcher, &[1, 2, 3, 1, 2, 2]),
            vec![false, true, false, false, true, false]
        );
    }

    #[test]
    fn test_matches_iff_trailing_window_equals_hotkey() {
        let hotkey = vec![7, 8, 9];
        let mut matcher = KeystrokeMatcher::new(Hotkey::new(hotkey.clone()).unwrap());
        let stream: Vec<KeyCode> = vec![7, 8, 7, 8, 9, 9, 7, 8, 9, 8, 9, 7, 8, 9];

        for (i, &code) in stream.iter().enumerate() {
            let expected = i + 1 >= hotkey.len() && stream[i + 1 - hotkey.len()..=i] == hotkey[..];
            assert_eq!(matcher.push(code), expected, "mismatch at index {i}");
        }
    }

    #[test]
    fn test_window_never_exceeds_hotkey_length() {
        let mut matcher = KeystrokeMatcher::new(Hotkey::new(vec![1, 2]).unwrap());
        for code in 0..50 {
            matcher.push(code);
            assert!(matcher.window.len() <= 2);
        }
    }

    #[test]
    fn test_empty_hotkey_rejected() {
        assert_eq!(Hotkey::new(Vec::new()), Err(HotkeyError::Empty));
    }
}
