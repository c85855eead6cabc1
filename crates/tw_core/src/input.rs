//! Input state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key is
//!   physically down. [`InputState::snapshot`] folds the movement and control
//!   keys into a [`KeySnapshot`], the one value the simulation reads per frame.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only until
//!   `end_frame()`. The loop calls `end_frame()` only after a processed
//!   (non-skipped) frame, so a press landing on a throttled iteration is not
//!   lost.
//!
//! Pointer events and text edits are queued in arrival order and drained by
//! the frame that consumes them.

use std::collections::HashSet;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Pause,
    Exit,
    Enter,
    F3,
}

/// Per-frame view of the logical keys the simulation cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeySnapshot {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub pause: bool,
    pub exit: bool,
}

impl KeySnapshot {
    pub fn any_direction(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Motion { x: i32, y: i32 },
    ButtonDown { x: i32, y: i32 },
    ButtonUp { x: i32, y: i32 },
}

impl PointerEvent {
    pub fn position(&self) -> (i32, i32) {
        match *self {
            Self::Motion { x, y } | Self::ButtonDown { x, y } | Self::ButtonUp { x, y } => (x, y),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEdit {
    Insert(String),
    Backspace,
    /// Swap the whole line, as a paste does.
    Replace(String),
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,

    pointer_events: Vec<PointerEvent>,
    text_edits: Vec<TextEdit>,

    pub pointer_position: (i32, i32),
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
            pointer_events: Vec::new(),
            text_edits: Vec::new(),
            pointer_position: (0, 0),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn pointer_moved(&mut self, x: i32, y: i32) {
        self.pointer_position = (x, y);
        self.pointer_events.push(PointerEvent::Motion { x, y });
    }

    pub fn pointer_button(&mut self, pressed: bool) {
        let (x, y) = self.pointer_position;
        self.pointer_events.push(if pressed {
            PointerEvent::ButtonDown { x, y }
        } else {
            PointerEvent::ButtonUp { x, y }
        });
    }

    pub fn text_edit(&mut self, edit: TextEdit) {
        self.text_edits.push(edit);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn snapshot(&self) -> KeySnapshot {
        KeySnapshot {
            up: self.is_held(Key::Up),
            down: self.is_held(Key::Down),
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
            pause: self.is_held(Key::Pause),
            exit: self.is_held(Key::Exit),
        }
    }

    pub fn take_pointer_events(&mut self) -> Vec<PointerEvent> {
        std::mem::take(&mut self.pointer_events)
    }

    pub fn take_text_edits(&mut self) -> Vec<TextEdit> {
        std::mem::take(&mut self.text_edits)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        assert!(input.is_held(Key::Left));
        assert!(input.is_just_pressed(Key::Left));
    }

    #[test]
    fn test_key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_up(Key::Left);
        assert!(!input.is_held(Key::Left));
        assert!(input.is_just_released(Key::Left));
    }

    #[test]
    fn test_key_repeat_does_not_double_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Pause);
        input.end_frame();
        // OS key repeat delivers another press while held.
        input.key_down(Key::Pause);
        assert!(input.is_held(Key::Pause));
        assert!(!input.is_just_pressed(Key::Pause));
    }

    #[test]
    fn test_key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::Exit);
        assert!(!input.is_just_released(Key::Exit));
        assert!(!input.is_held(Key::Exit));
    }

    #[test]
    fn test_end_frame_clears_transient_state_only() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.key_down(Key::Enter);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::Up));
        assert!(!input.is_just_pressed(Key::Enter));
        assert!(input.is_held(Key::Up));
        assert!(input.is_held(Key::Enter));
    }

    #[test]
    fn test_snapshot_reflects_held_keys() {
        let mut input = InputState::new();
        input.key_down(Key::Right);
        input.key_down(Key::Down);
        input.key_down(Key::F3);
        let snap = input.snapshot();
        assert_eq!(
            snap,
            KeySnapshot {
                right: true,
                down: true,
                ..KeySnapshot::default()
            }
        );
        assert!(snap.any_direction());
        assert!(!KeySnapshot::default().any_direction());
    }

    #[test]
    fn test_pointer_events_use_last_known_position() {
        let mut input = InputState::new();
        input.pointer_moved(5, 7);
        input.pointer_button(true);
        input.pointer_button(false);
        let events = input.take_pointer_events();
        assert_eq!(
            events,
            vec![
                PointerEvent::Motion { x: 5, y: 7 },
                PointerEvent::ButtonDown { x: 5, y: 7 },
                PointerEvent::ButtonUp { x: 5, y: 7 },
            ]
        );
        assert!(input.take_pointer_events().is_empty());
        assert_eq!(events[1].position(), (5, 7));
    }

    #[test]
    fn test_text_edits_are_queued_in_order() {
        let mut input = InputState::new();
        input.text_edit(TextEdit::Insert("a".to_string()));
        input.text_edit(TextEdit::Backspace);
        assert_eq!(
            input.take_text_edits(),
            vec![TextEdit::Insert("a".to_string()), TextEdit::Backspace]
        );
        assert!(input.take_text_edits().is_empty());
    }

    #[test]
    fn test_default_state_is_empty() {
        let input = InputState::new();
        assert_eq!(input.snapshot(), KeySnapshot::default());
        assert_eq!(input.pointer_position, (0, 0));
    }
}
