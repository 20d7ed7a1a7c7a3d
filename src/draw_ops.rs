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
// -----------------------------------------------------------------------------
// Ported to rust from https://github.com/rxi/microui/ and the original license
//
// Copyright (c) 2020 rxi
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.
//
use crate::{draw_context::DrawCtx, Color, Recti, Renderer, Runtime, StyleDescriptor, Vec2i};

pub(crate) trait DrawCtxAccess {
    fn with_draw_ctx<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut DrawCtx<'_>) -> R;
}

pub(crate) trait DrawOps: DrawCtxAccess {
    fn push_clip_rect(&mut self, rect: Recti) { self.with_draw_ctx(|draw| draw.push_clip_rect(rect)); }

    fn pop_clip_rect(&mut self) { self.with_draw_ctx(|draw| draw.pop_clip_rect()); }

    fn restore_clip(&mut self) { self.with_draw_ctx(|draw| draw.restore_clip()); }

    fn current_clip_rect(&mut self) -> Option<Recti> { self.with_draw_ctx(|draw| draw.current_clip_rect()) }

    fn draw_rect(&mut self, rect: Recti, color: Color) { self.with_draw_ctx(|draw| draw.draw_rect(rect, color)); }

    fn draw_box(&mut self, r: Recti, color: Color, thickness: i32) { self.with_draw_ctx(|draw| draw.draw_box(r, color, thickness)); }

    fn draw_triangle(&mut self, points: [Vec2i; 3], color: Color) { self.with_draw_ctx(|draw| draw.draw_triangle(points, color)); }

    fn draw_line(&mut self, from: Vec2i, to: Vec2i, color: Color, thickness: i32) {
        self.with_draw_ctx(|draw| draw.draw_line(from, to, color, thickness));
    }

    fn draw_polyline(&mut self, points: &[Vec2i], color: Color, thickness: i32) {
        self.with_draw_ctx(|draw| draw.draw_polyline(points, color, thickness));
    }

    fn draw_text(&mut self, style: &StyleDescriptor, text: &str, pos: Vec2i, color: Color) {
        self.with_draw_ctx(|draw| draw.draw_text(style, text, pos, color));
    }

    fn draw_frame(&mut self, rect: Recti, style: &StyleDescriptor) { self.with_draw_ctx(|draw| draw.draw_frame(rect, style)); }

    fn draw_control_text(&mut self, text: &str, rect: Recti, style: &StyleDescriptor, text_size: Vec2i) {
        self.with_draw_ctx(|draw| draw.draw_control_text(text, rect, style, text_size));
    }
}

impl<T: DrawCtxAccess> DrawOps for T {}

/// Host drawing. Primitives go to the renderer, or to the deferred log while the current
/// context records, and respect the clip stack.
impl<R: Renderer> Runtime<R> {
    /// Filled rectangle.
    pub fn fill_rect(&mut self, rect: Recti, color: Color) { self.draw_rect(rect, color); }

    /// Rectangle outline, `thickness` pixels wide.
    pub fn stroke_rect(&mut self, rect: Recti, color: Color, thickness: i32) { self.draw_box(rect, color, thickness); }

    /// Line segment.
    pub fn line(&mut self, from: Vec2i, to: Vec2i, color: Color, thickness: i32) { self.draw_line(from, to, color, thickness); }

    /// Restricts drawing to `rect`, intersected with the current clip, until [`Runtime::pop_clip`].
    pub fn push_clip(&mut self, rect: Recti) { self.push_clip_rect(rect); }

    /// Undoes the last [`Runtime::push_clip`].
    pub fn pop_clip(&mut self) { self.pop_clip_rect(); }
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use crate::*;

    #[test]
    fn host_rects_are_culled_by_the_clip() {
        let mut rt = test_runtime();
        rt.frame(|ui| {
            ui.push_clip(rect(0, 0, 50, 50));
            ui.fill_rect(rect(10, 10, 10, 10), Color::rgb_hex(0xFFFFFF));
            ui.fill_rect(rect(60, 60, 10, 10), Color::rgb_hex(0xFFFFFF));
            ui.pop_clip();
        });
        let (rects, clips) = rt.renderer_handle().scope(|r| (r.rects(), r.clips()));
        assert_eq!(rects.iter().map(|r| rect_tuple(*r)).collect::<Vec<_>>(), vec![(10, 10, 10, 10)]);
        assert_eq!(rect_tuple(clips[0]), (0, 0, 50, 50));
    }
}
