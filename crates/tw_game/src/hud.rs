//! Status bar along the bottom of the screen with an editable text line.

use tw_core::{Rect, TextEdit};
use tw_render::{Color, RenderSurface, TextRasterizer, TextureId};

use crate::context::GameContext;

pub const TEXT_COLOR: Color = Color::WHITE;
pub const BAR_COLOR: Color = Color::BLACK;
const BAR_PADDING: i32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
}

impl TextField {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    /// Returns whether the text changed.
    pub fn apply(&mut self, edit: &TextEdit) -> bool {
        match edit {
            TextEdit::Insert(s) if !s.is_empty() => {
                self.text.push_str(s);
                true
            }
            TextEdit::Insert(_) => false,
            TextEdit::Backspace => self.text.pop().is_some(),
            TextEdit::Replace(s) if *s != self.text => {
                self.text.clone_from(s);
                true
            }
            TextEdit::Replace(_) => false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Empty text is shown as a single space so there is always a texture.
    pub fn display_text(&self) -> &str {
        if self.text.is_empty() {
            " "
        } else {
            &self.text
        }
    }
}

pub struct StatusBar {
    font: Box<dyn TextRasterizer>,
    bar: Rect,
    line_height: i32,
    input_texture: TextureId,
    field: TextField,
    rerenders: u32,
}

impl StatusBar {
    /// The bar is sized from `prompt` rendered in `font`: prompt height plus
    /// padding, full screen width, flush with the bottom edge.
    pub fn new<S: RenderSurface>(
        ctx: &mut GameContext<S>,
        font: Box<dyn TextRasterizer>,
        prompt: &str,
        initial_text: &str,
    ) -> Result<Self, String> {
        let prompt_id = ctx.textures.register("hud.prompt");
        let input_id = ctx.textures.register("hud.input");

        let prompt_texture = ctx
            .textures
            .get_mut(prompt_id)
            .ok_or_else(|| "Status bar prompt texture missing".to_string())?;
        prompt_texture.load_from_text(&mut ctx.surface, font.as_ref(), prompt, TEXT_COLOR)?;
        let line_height = prompt_texture.height();

        let (screen_w, screen_h) = ctx.surface.screen_size();
        let bar = Rect::new(
            0,
            screen_h - line_height - BAR_PADDING,
            screen_w,
            line_height + BAR_PADDING,
        );

        let mut status = Self {
            font,
            bar,
            line_height,
            input_texture: input_id,
            field: TextField::new(initial_text),
            rerenders: 0,
        };
        status.rasterize_input(ctx)?;
        Ok(status)
    }

    fn rasterize_input<S: RenderSurface>(&mut self, ctx: &mut GameContext<S>) -> Result<(), String> {
        let texture = ctx
            .textures
            .get_mut(self.input_texture)
            .ok_or_else(|| "Status bar input texture missing".to_string())?;
        texture.load_from_text(
            &mut ctx.surface,
            self.font.as_ref(),
            self.field.display_text(),
            TEXT_COLOR,
        )?;
        self.rerenders += 1;
        Ok(())
    }

    /// Apply this frame's edits; the text texture is rebuilt at most once and
    /// only if the text changed.
    pub fn apply_edits<S: RenderSurface>(&mut self, ctx: &mut GameContext<S>, edits: &[TextEdit]) {
        let mut changed = false;
        for edit in edits {
            changed |= self.field.apply(edit);
        }
        if changed {
            if let Err(err) = self.rasterize_input(ctx) {
                log::error!("Unable to update input text texture: {err}");
            }
        }
    }

    pub fn render<S: RenderSurface>(&self, ctx: &mut GameContext<S>) {
        ctx.surface.fill_rect(self.bar, BAR_COLOR);
        let text_y = self.bar.y + (self.bar.h - self.line_height) / 2;
        ctx.draw(self.input_texture, 0, text_y, None);
    }

    pub fn bar(&self) -> Rect {
        self.bar
    }

    pub fn text(&self) -> &str {
        self.field.text()
    }

    /// How many times the input line has been rasterized.
    pub fn rerenders(&self) -> u32 {
        self.rerenders
    }
}
