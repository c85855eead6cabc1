//! Headless surface that records draw commands instead of rasterizing them.
//!
//! Used by tests and by replay runs that need the full frame pipeline
//! without a window or GPU.

use std::cell::Cell;
use std::rc::Rc;

use image::RgbaImage;
use tw_core::Rect;

use crate::surface::{Color, RenderSurface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Clear(Color),
    Copy {
        texture: u64,
        src: Option<Rect>,
        dst: Rect,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
    Present,
}

#[derive(Default)]
struct LiveCounter {
    live: Cell<usize>,
    peak: Cell<usize>,
}

/// Texture handle minted by [`RecordingSurface`]. Dropping it marks the
/// texture as released.
pub struct RecordedTexture {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    counter: Rc<LiveCounter>,
}

impl Drop for RecordedTexture {
    fn drop(&mut self) {
        self.counter.live.set(self.counter.live.get().saturating_sub(1));
    }
}

pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
    /// When set, every `create_texture` call fails.
    pub fail_uploads: bool,
    width: i32,
    height: i32,
    next_id: u64,
    uploads: Vec<RgbaImage>,
    counter: Rc<LiveCounter>,
}

impl RecordingSurface {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            commands: Vec::new(),
            fail_uploads: false,
            width,
            height,
            next_id: 1,
            uploads: Vec::new(),
            counter: Rc::new(LiveCounter::default()),
        }
    }

    pub fn live_textures(&self) -> usize {
        self.counter.live.get()
    }

    pub fn peak_live_textures(&self) -> usize {
        self.counter.peak.get()
    }

    pub fn uploaded_images(&self) -> &[RgbaImage] {
        &self.uploads
    }

    /// `(src, dst)` of every texture copy, in draw order.
    pub fn copies(&self) -> Vec<(Option<Rect>, Rect)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Copy { src, dst, .. } => Some((*src, *dst)),
                _ => None,
            })
            .collect()
    }

    /// Commands issued since the most recent clear.
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear(_)))
            .unwrap_or(0);
        &self.commands[start..]
    }

    pub fn reset_commands(&mut self) {
        self.commands.clear();
    }
}

impl RenderSurface for RecordingSurface {
    type Texture = RecordedTexture;

    fn create_texture(&mut self, image: &RgbaImage, label: &str) -> Result<RecordedTexture, String> {
        if self.fail_uploads {
            return Err(format!("upload of '{label}' rejected by recording surface"));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.uploads.push(image.clone());

        let live = self.counter.live.get() + 1;
        self.counter.live.set(live);
        self.counter.peak.set(self.counter.peak.get().max(live));

        Ok(RecordedTexture {
            id,
            width: image.width(),
            height: image.height(),
            counter: Rc::clone(&self.counter),
        })
    }

    fn copy(&mut self, texture: &RecordedTexture, src: Option<Rect>, dst: Rect) {
        self.commands.push(DrawCommand::Copy {
            texture: texture.id,
            src,
            dst,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn present(&mut self) {
        self.commands.push(DrawCommand::Present);
    }

    fn screen_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}
