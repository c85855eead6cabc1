use tw_core::{PointerEvent, Rect};
use tw_render::{RenderSurface, TextureId};

use crate::context::GameContext;

pub const BUTTON_SIZE: i32 = 89;

/// Hover, idle and pressed faces, top to bottom in the sheet.
pub static BUTTON_CLIPS: [Rect; 3] = [
    Rect::new(0, 0, 8, 8),
    Rect::new(0, 8, 8, 8),
    Rect::new(0, 16, 8, 8),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Hover,
    Idle,
    Pressed,
}

impl ButtonState {
    pub fn clip(self) -> Rect {
        match self {
            Self::Hover => BUTTON_CLIPS[0],
            Self::Idle => BUTTON_CLIPS[1],
            Self::Pressed => BUTTON_CLIPS[2],
        }
    }
}

pub struct ToggleButton {
    x: i32,
    y: i32,
    state: ButtonState,
    texture: TextureId,
}

impl ToggleButton {
    pub fn new(texture: TextureId, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            state: ButtonState::Idle,
            texture,
        }
    }

    /// Centred in a `width` x `height` screen.
    pub fn centered(texture: TextureId, width: i32, height: i32) -> Self {
        Self::new(texture, width / 2 - BUTTON_SIZE / 2, height / 2 - BUTTON_SIZE / 2)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, BUTTON_SIZE, BUTTON_SIZE)
    }

    pub fn handle_event(&mut self, event: &PointerEvent) {
        let (px, py) = event.position();
        if !self.rect().contains_inclusive(px, py) {
            self.state = ButtonState::Idle;
            return;
        }
        self.state = match event {
            PointerEvent::ButtonDown { .. } => ButtonState::Pressed,
            PointerEvent::ButtonUp { .. } => ButtonState::Idle,
            PointerEvent::Motion { .. } if self.state == ButtonState::Pressed => {
                ButtonState::Pressed
            }
            PointerEvent::Motion { .. } => ButtonState::Hover,
        };
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn render<S: RenderSurface>(&self, ctx: &mut GameContext<S>) {
        ctx.draw_ignoring_scale(self.texture, self.rect(), Some(self.state.clip()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_render::{RecordingSurface, TextureRegistry};

    fn button_at(x: i32, y: i32) -> ToggleButton {
        let mut registry: TextureRegistry<()> = TextureRegistry::new();
        ToggleButton::new(registry.register("button"), x, y)
    }

    #[test]
    fn press_inside_then_outside() {
        let mut button = button_at(0, 0);
        assert_eq!(button.state(), ButtonState::Idle);
        button.handle_event(&PointerEvent::ButtonDown { x: 5, y: 5 });
        assert_eq!(button.state(), ButtonState::Pressed);
        button.handle_event(&PointerEvent::ButtonDown { x: 1000, y: 1000 });
        assert_eq!(button.state(), ButtonState::Idle);
    }

    #[test]
    fn outside_forces_idle_from_every_state() {
        for setup in [
            PointerEvent::Motion { x: 1, y: 1 },
            PointerEvent::ButtonDown { x: 1, y: 1 },
            PointerEvent::ButtonUp { x: 1, y: 1 },
        ] {
            for outside in [
                PointerEvent::Motion { x: 1000, y: 1000 },
                PointerEvent::ButtonDown { x: -1, y: 5 },
                PointerEvent::ButtonUp { x: 5, y: 90 },
            ] {
                let mut button = button_at(0, 0);
                button.handle_event(&setup);
                button.handle_event(&outside);
                assert_eq!(button.state(), ButtonState::Idle);
            }
        }
    }

    #[test]
    fn bounds_are_inclusive_on_both_edges() {
        let mut button = button_at(10, 10);
        button.handle_event(&PointerEvent::ButtonDown { x: 99, y: 99 });
        assert_eq!(button.state(), ButtonState::Pressed);
        button.handle_event(&PointerEvent::ButtonDown { x: 100, y: 99 });
        assert_eq!(button.state(), ButtonState::Idle);
        button.handle_event(&PointerEvent::Motion { x: 10, y: 10 });
        assert_eq!(button.state(), ButtonState::Hover);
    }

    #[test]
    fn motion_keeps_pressed_and_release_returns_to_idle() {
        let mut button = button_at(0, 0);
        button.handle_event(&PointerEvent::Motion { x: 3, y: 3 });
        assert_eq!(button.state(), ButtonState::Hover);
        button.handle_event(&PointerEvent::ButtonDown { x: 3, y: 3 });
        button.handle_event(&PointerEvent::Motion { x: 4, y: 4 });
        assert_eq!(button.state(), ButtonState::Pressed);
        button.handle_event(&PointerEvent::ButtonUp { x: 4, y: 4 });
        assert_eq!(button.state(), ButtonState::Idle);
    }

    #[test]
    fn render_uses_state_clip_at_fixed_size() {
        let mut ctx = GameContext::new(RecordingSurface::new(900, 900));
        let id = ctx.textures.register("button");
        ctx.textures
            .get_mut(id)
            .expect("registered")
            .load_from_image(&mut ctx.surface, &image::RgbaImage::new(8, 24), "button")
            .expect("upload");
        ctx.set_texture_scale(id, 8);

        let mut button = ToggleButton::centered(id, 900, 900);
        button.render(&mut ctx);
        button.handle_event(&PointerEvent::Motion { x: 450, y: 450 });
        button.render(&mut ctx);

        let copies = ctx.surface.copies();
        assert_eq!(copies[0], (Some(BUTTON_CLIPS[1]), Rect::new(406, 406, 89, 89)));
        assert_eq!(copies[1], (Some(BUTTON_CLIPS[0]), Rect::new(406, 406, 89, 89)));
    }
}
