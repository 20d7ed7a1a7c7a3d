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
use crate::{rect, vec2, Recti, Vec2i};

#[derive(Clone, Default, Debug)]
struct Layout {
    body: Recti,
    position: Vec2i,
    max: Option<Vec2i>,
    next_row: i32,
    row_y: i32,
    indent: i32,
    same_line: bool,
}

/// Ad-hoc cursor layout: widgets stack vertically unless [`LayoutManager::same_line`] asks
/// for the next one to sit to the right of the previous one.
#[derive(Clone, Debug)]
pub(crate) struct LayoutManager {
    pub spacing: i32,
    pub default_height: i32,
    pub last_rect: Recti,
    stack: Vec<Layout>,
}

impl LayoutManager {
    pub fn new(spacing: i32, default_height: i32) -> Self { Self { spacing, default_height, last_rect: Recti::default(), stack: Vec::new() } }

    pub fn reset(&mut self, body: Recti) {
        self.stack.clear();
        self.last_rect = Recti::default();
        self.push_scope(body, vec2(0, 0));
    }

    /// Opens a nested scope whose origin is `body` moved by `-scroll`.
    pub fn push_scope(&mut self, body: Recti, scroll: Vec2i) {
        self.stack.push(Layout { body: rect(body.x - scroll.x, body.y - scroll.y, body.width, body.height), ..Layout::default() });
    }

    /// Closes the innermost scope and returns the size of what was laid out in it.
    pub fn pop_scope(&mut self) -> Vec2i {
        let finished = self.stack.pop().expect("layout scope popped without a matching push");
        match finished.max {
            None => vec2(0, 0),
            Some(m) => vec2(m.x - finished.body.x, m.y - finished.body.y),
        }
    }

    fn top(&self) -> &Layout { self.stack.last().expect("Layout stack should never be empty when accessed") }

    fn top_mut(&mut self) -> &mut Layout { self.stack.last_mut().expect("Layout stack should never be empty when accessed") }

    pub fn current_body(&self) -> Recti { self.top().body }

    pub fn current_max(&self) -> Option<Vec2i> { self.top().max }

    pub fn adjust_indent(&mut self, delta: i32) { self.top_mut().indent += delta; }

    pub fn same_line(&mut self) { self.top_mut().same_line = true; }

    /// Where the next widget on a new row would start, in absolute coordinates.
    pub fn cursor(&self) -> Vec2i {
        let l = self.top();
        vec2(l.body.x + l.indent, l.body.y + l.next_row)
    }

    /// Width left on the current row after the cursor.
    pub fn remaining_width(&self) -> i32 {
        let l = self.top();
        let x = if l.same_line { l.position.x } else { l.indent };
        (l.body.width - x).max(0)
    }

    /// Reserves a cell. A non-positive width fills the rest of the row; a non-positive height
    /// uses the default widget height.
    pub fn next(&mut self, size: Vec2i) -> Recti {
        let spacing = self.spacing;
        let default_height = self.default_height;
        let remaining = self.remaining_width();
        let layout = self.top_mut();

        let (x, y) = if layout.same_line && layout.max.is_some() {
            (layout.position.x, layout.row_y)
        } else {
            (layout.indent, layout.next_row)
        };
        let width = if size.x > 0 { size.x } else { remaining };
        let height = if size.y > 0 { size.y } else { default_height };

        layout.row_y = y;
        layout.same_line = false;
        layout.position.x = x.saturating_add(width).saturating_add(spacing);
        layout.next_row = layout.next_row.max(y + height + spacing);

        let res = rect(layout.body.x + x, layout.body.y + y, width, height);

        // track the maximum extent reached so scrolling/auto-sizing can use it later
        let (right, bottom) = (res.x + res.width, res.y + res.height);
        layout.max = Some(match layout.max {
            None => vec2(right, bottom),
            Some(m) => vec2(m.x.max(right), m.y.max(bottom)),
        });

        self.last_rect = res;
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect_tuple;

    fn manager() -> LayoutManager {
        let mut m = LayoutManager::new(4, 20);
        m.reset(rect(10, 10, 200, 300));
        m
    }

    #[test]
    fn rows_stack_vertically() {
        let mut m = manager();
        assert_eq!(rect_tuple(m.next(vec2(50, 0))), (10, 10, 50, 20));
        assert_eq!(rect_tuple(m.next(vec2(0, 30))), (10, 34, 200, 30));
        assert_eq!((m.cursor().x, m.cursor().y), (10, 68));
    }

    #[test]
    fn same_line_places_to_the_right() {
        let mut m = manager();
        m.next(vec2(50, 20));
        m.same_line();
        assert_eq!(m.remaining_width(), 146);
        assert_eq!(rect_tuple(m.next(vec2(30, 40))), (64, 10, 30, 40));
        assert_eq!(rect_tuple(m.next(vec2(10, 10))), (10, 54, 10, 10));
    }

    #[test]
    fn scope_reports_content_size() {
        let mut m = manager();
        m.push_scope(rect(0, 0, 100, 100), vec2(0, 15));
        m.next(vec2(80, 120));
        m.next(vec2(20, 20));
        let size = m.pop_scope();
        assert_eq!((size.x, size.y), (80, 144));
        assert_eq!(rect_tuple(m.current_body()), (10, 10, 200, 300));
    }

    #[test]
    fn indent_shifts_new_rows() {
        let mut m = manager();
        m.adjust_indent(12);
        assert_eq!(m.next(vec2(5, 5)).x, 22);
    }
}
