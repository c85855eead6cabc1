pub mod keymap;
pub mod window;

pub use keymap::{map_key, text_action, TextAction};
pub use window::{create_window, PlatformConfig};
