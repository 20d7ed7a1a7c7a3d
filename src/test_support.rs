//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
use crate::*;

/// Headless renderer: 8px wide glyphs, 16px lines, records every primitive.
#[derive(Default, Debug)]
pub(crate) struct TestRenderer {
    pub(crate) log: Vec<Primitive>,
}

pub(crate) const CHAR_WIDTH: i32 = 8;
pub(crate) const LINE_HEIGHT: i32 = 16;

impl TestRenderer {
    pub(crate) fn rects(&self) -> Vec<Recti> {
        self.log
            .iter()
            .filter_map(|p| match p {
                Primitive::Rect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn clips(&self) -> Vec<Recti> {
        self.log
            .iter()
            .filter_map(|p| match p {
                Primitive::SetClip(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn texts(&self) -> Vec<(String, Vec2i)> {
        self.log
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { text, pos, .. } => Some((text.clone(), *pos)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn clear(&mut self) { self.log.clear(); }
}

impl PrimitiveSink for TestRenderer {
    fn draw_rect(&mut self, rect: Recti, color: Color, filled: bool, thickness: i32) { self.log.push(Primitive::Rect { rect, color, filled, thickness }); }

    fn draw_circle(&mut self, center: Vec2i, radius: i32, color: Color, filled: bool) { self.log.push(Primitive::Circle { center, radius, color, filled }); }

    fn draw_triangle(&mut self, points: [Vec2i; 3], color: Color, filled: bool) { self.log.push(Primitive::Triangle { points, color, filled }); }

    fn draw_line(&mut self, from: Vec2i, to: Vec2i, color: Color, thickness: i32) { self.log.push(Primitive::Line { from, to, color, thickness }); }

    fn draw_polyline(&mut self, points: &[Vec2i], color: Color, thickness: i32) {
        self.log.push(Primitive::Polyline { points: points.to_vec(), color, thickness });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2i, color: Color, wrap_width: Option<i32>) {
        self.log.push(Primitive::Text { text: text.to_string(), pos, color, wrap_width });
    }

    fn set_clip_rect(&mut self, rect: Recti) { self.log.push(Primitive::SetClip(rect)); }

    fn reset_clip_rect(&mut self) { self.log.push(Primitive::ResetClip); }

    fn set_current_font(&mut self, font: FontHandle, size: u16) { self.log.push(Primitive::SetFont { font, size }); }

    fn reset_font(&mut self) { self.log.push(Primitive::ResetFont); }
}

impl Renderer for TestRenderer {
    fn get_text_size(&self, text: &str, _font: FontHandle, _size: u16, wrap_width: Option<i32>) -> Vec2i {
        let width = text.chars().count() as i32 * CHAR_WIDTH;
        match wrap_width {
            Some(w) if w > 0 && width > w => vec2(w, ((width + w - 1) / w) * LINE_HEIGHT),
            _ => vec2(width, LINE_HEIGHT),
        }
    }
}

/// Font provider serving a fixed set of families and sizes.
pub(crate) struct TestFonts {
    families: Vec<String>,
    sizes: Vec<u16>,
}

impl TestFonts {
    pub(crate) fn new(families: &[&str], sizes: &[u16]) -> Self {
        Self { families: families.iter().map(|f| f.to_string()).collect(), sizes: sizes.to_vec() }
    }
}

impl FontProvider for TestFonts {
    fn get_font(&mut self, family: &str, size: u16, weight: FontWeight) -> Option<FontHandle> {
        let family_index = self.families.iter().position(|f| f == family)?;
        if !self.sizes.contains(&size) {
            return None;
        }
        Some(FontHandle::new(family_index as u32 * 100_000 + u32::from(size) * 10 + weight as u32))
    }

    fn available_sizes(&self, family: &str, _weight: FontWeight) -> Vec<u16> {
        if self.families.iter().any(|f| f == family) {
            self.sizes.clone()
        } else {
            Vec::new()
        }
    }
}

/// Runtime over a [`TestRenderer`] with a 640x480 window and a "default" font at 16px.
pub(crate) fn test_runtime() -> Runtime<TestRenderer> { test_runtime_with(Config { window_size: vec2(640, 480), ..Config::default() }) }

pub(crate) fn test_runtime_with(config: Config) -> Runtime<TestRenderer> {
    let fonts = Box::new(TestFonts::new(&["default"], &[12, 16, 24]));
    match Runtime::init(config, RendererHandle::new(TestRenderer::default()), fonts, None) {
        Ok(rt) => rt,
        Err(err) => panic!("test runtime failed to initialize: {err}"),
    }
}
