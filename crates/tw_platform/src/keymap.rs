use tw_core::{Key, TextEdit};
use winit::keyboard::KeyCode;

/// Physical key to logical game key. Unmapped keys are ignored by the game.
pub fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::KeyP => Some(Key::Pause),
        KeyCode::Escape => Some(Key::Exit),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

/// What a key press means to the text line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextAction {
    Edit(TextEdit),
    /// Put the current line on the clipboard.
    Copy,
    /// Replace the line with the clipboard contents.
    Paste,
}

/// Translate a pressed key and the text it produced into a text-line action.
/// With Ctrl held, C and V are clipboard shortcuts and their characters are
/// not typed.
pub fn text_action(key_code: KeyCode, ctrl: bool, text: Option<&str>) -> Option<TextAction> {
    match key_code {
        KeyCode::Backspace => return Some(TextAction::Edit(TextEdit::Backspace)),
        KeyCode::KeyC if ctrl => return Some(TextAction::Copy),
        KeyCode::KeyV if ctrl => return Some(TextAction::Paste),
        _ => {}
    }
    let printable: String = text?
        .chars()
        .filter(|c| !c.is_control())
        .filter(|c| !(ctrl && matches!(c, 'c' | 'C' | 'v' | 'V')))
        .collect();
    if printable.is_empty() {
        None
    } else {
        Some(TextAction::Edit(TextEdit::Insert(printable)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_controls_are_mapped() {
        assert_eq!(map_key(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(map_key(KeyCode::KeyP), Some(Key::Pause));
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Exit));
        assert_eq!(map_key(KeyCode::NumpadEnter), Some(Key::Enter));
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(map_key(KeyCode::KeyW), None);
        assert_eq!(map_key(KeyCode::Space), None);
    }

    #[test]
    fn plain_typing_inserts_printable_text() {
        assert_eq!(
            text_action(KeyCode::KeyA, false, Some("a")),
            Some(TextAction::Edit(TextEdit::Insert("a".to_string())))
        );
        assert_eq!(
            text_action(KeyCode::KeyC, false, Some("c")),
            Some(TextAction::Edit(TextEdit::Insert("c".to_string())))
        );
        assert_eq!(text_action(KeyCode::Enter, false, Some("\r")), None);
        assert_eq!(text_action(KeyCode::ShiftLeft, false, None), None);
    }

    #[test]
    fn backspace_edits_regardless_of_text() {
        assert_eq!(
            text_action(KeyCode::Backspace, false, Some("\u{8}")),
            Some(TextAction::Edit(TextEdit::Backspace))
        );
        assert_eq!(
            text_action(KeyCode::Backspace, true, None),
            Some(TextAction::Edit(TextEdit::Backspace))
        );
    }

    #[test]
    fn ctrl_c_and_ctrl_v_are_clipboard_shortcuts() {
        assert_eq!(text_action(KeyCode::KeyC, true, Some("c")), Some(TextAction::Copy));
        assert_eq!(text_action(KeyCode::KeyV, true, Some("v")), Some(TextAction::Paste));
    }

    #[test]
    fn ctrl_suppresses_clipboard_letters_only() {
        // Layouts where another physical key produces c or v.
        assert_eq!(text_action(KeyCode::KeyJ, true, Some("c")), None);
        assert_eq!(text_action(KeyCode::KeyK, true, Some("V")), None);
        assert_eq!(
            text_action(KeyCode::KeyA, true, Some("a")),
            Some(TextAction::Edit(TextEdit::Insert("a".to_string())))
        );
    }
}
