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
use crate::*;

/// Draws into whichever target is active, tracking the clip stack of the current session.
pub(crate) struct DrawCtx<'a> {
    sink: &'a mut dyn PrimitiveSink,
    clip_stack: &'a mut Vec<Recti>,
}

impl<'a> DrawCtx<'a> {
    pub(crate) fn new(sink: &'a mut dyn PrimitiveSink, clip_stack: &'a mut Vec<Recti>) -> Self { Self { sink, clip_stack } }

    pub(crate) fn current_clip_rect(&self) -> Option<Recti> { self.clip_stack.last().copied() }

    pub(crate) fn push_clip_rect(&mut self, rect: Recti) {
        let clipped = clip_to(rect, self.current_clip_rect());
        self.clip_stack.push(clipped);
        self.sink.set_clip_rect(clipped);
    }

    pub(crate) fn pop_clip_rect(&mut self) {
        self.clip_stack.pop();
        self.restore_clip();
    }

    /// Re-emits the clip on top of the stack, e.g. after a replay changed the target's clip.
    pub(crate) fn restore_clip(&mut self) {
        match self.current_clip_rect() {
            Some(r) => self.sink.set_clip_rect(r),
            None => self.sink.reset_clip_rect(),
        }
    }

    fn clipped_out(&self, r: Recti) -> bool {
        match self.current_clip_rect() {
            Some(c) => intersect_rects(r, c).is_none(),
            None => false,
        }
    }

    pub(crate) fn draw_rect(&mut self, rect: Recti, color: Color) {
        if color.a == 0 || rect.width <= 0 || rect.height <= 0 || self.clipped_out(rect) {
            return;
        }
        self.sink.draw_rect(rect, color, true, 0);
    }

    pub(crate) fn draw_box(&mut self, rect: Recti, color: Color, thickness: i32) {
        if color.a == 0 || thickness <= 0 || self.clipped_out(expand_rect(rect, thickness)) {
            return;
        }
        self.sink.draw_rect(rect, color, false, thickness);
    }

    pub(crate) fn draw_triangle(&mut self, points: [Vec2i; 3], color: Color) { self.sink.draw_triangle(points, color, true); }

    pub(crate) fn draw_line(&mut self, from: Vec2i, to: Vec2i, color: Color, thickness: i32) { self.sink.draw_line(from, to, color, thickness); }

    pub(crate) fn draw_polyline(&mut self, points: &[Vec2i], color: Color, thickness: i32) { self.sink.draw_polyline(points, color, thickness); }

    pub(crate) fn draw_text(&mut self, style: &StyleDescriptor, text: &str, pos: Vec2i, color: Color) {
        if text.is_empty() {
            return;
        }
        if let Some(font) = style.font {
            self.sink.set_current_font(font, style.font_size);
        }
        self.sink.draw_text(text, pos, color, None);
    }

    /// Background plus border of a widget.
    pub(crate) fn draw_frame(&mut self, rect: Recti, style: &StyleDescriptor) {
        self.draw_rect(rect, style.bg_color);
        if style.border_width > 0 {
            self.draw_box(rect, style.border_color, style.border_width);
        }
    }

    /// Text aligned inside `rect` according to the style, clipped to `rect`.
    pub(crate) fn draw_control_text(&mut self, text: &str, rect: Recti, style: &StyleDescriptor, text_size: Vec2i) {
        if text.is_empty() {
            return;
        }
        let padding = style.padding;
        let x = match style.alignment {
            TextAlign::Center => rect.x + (rect.width - text_size.x) / 2,
            TextAlign::Right => rect.x + rect.width - text_size.x - padding,
            TextAlign::Left => rect.x + padding,
        };
        let y = rect.y + (rect.height - text_size.y) / 2;
        self.push_clip_rect(rect);
        self.draw_text(style, text, vec2(x, y), style.fg_color);
        self.pop_clip_rect();
    }
}
