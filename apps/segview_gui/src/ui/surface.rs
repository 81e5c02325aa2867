//! egui texture backing the composite frame.

use client_core::{CompositeFrame, PaintSurface, ScreenRect};
use eframe::egui;

const TEXTURE_NAME: &str = "segview-composite";

pub struct TextureSurface {
    ctx: egui::Context,
    texture: Option<egui::TextureHandle>,
    size: [usize; 2],
    on_screen: egui::Rect,
}

impl TextureSurface {
    pub fn new(ctx: &egui::Context) -> Self {
        Self {
            ctx: ctx.clone(),
            texture: None,
            size: [0, 0],
            on_screen: egui::Rect::NOTHING,
        }
    }

    pub fn texture(&self) -> Option<&egui::TextureHandle> {
        self.texture.as_ref()
    }

    pub fn pixel_size(&self) -> egui::Vec2 {
        egui::vec2(self.size[0] as f32, self.size[1] as f32)
    }

    /// Records where the texture was laid out this frame. Returns whether
    /// the placement changed.
    pub fn place(&mut self, rect: egui::Rect) -> bool {
        if self.on_screen == rect {
            return false;
        }
        self.on_screen = rect;
        true
    }
}

impl PaintSurface for TextureSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.size = [width as usize, height as usize];
    }

    fn paint(&mut self, frame: &CompositeFrame) {
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [frame.total_width() as usize, frame.total_height() as usize],
            frame.rgba(),
        );
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(self.ctx.load_texture(TEXTURE_NAME, image, egui::TextureOptions::LINEAR));
            }
        }
    }

    fn screen_rect(&self) -> ScreenRect {
        if !self.on_screen.is_positive() {
            return ScreenRect::default();
        }
        ScreenRect::new(
            self.on_screen.min.x,
            self.on_screen.min.y,
            self.on_screen.width(),
            self.on_screen.height(),
        )
    }
}
