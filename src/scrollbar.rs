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
use crate::{Recti, Vec2i};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Axis of a scrollbar.
pub enum ScrollAxis {
    /// Scrolls content up and down; drawn on the right edge.
    Vertical,
    /// Scrolls content left and right; drawn on the bottom edge.
    Horizontal,
}

impl ScrollAxis {
    /// Component of `v` along the axis.
    pub fn along(self, v: Vec2i) -> i32 {
        match self {
            ScrollAxis::Vertical => v.y,
            ScrollAxis::Horizontal => v.x,
        }
    }

    /// Length of `r` along the axis.
    pub fn length(self, r: Recti) -> i32 {
        match self {
            ScrollAxis::Vertical => r.height,
            ScrollAxis::Horizontal => r.width,
        }
    }
}

pub(crate) fn scrollbar_base(axis: ScrollAxis, body: Recti, scrollbar_size: i32) -> Recti {
    let mut base = body;
    match axis {
        ScrollAxis::Vertical => {
            base.x = body.x + body.width;
            base.width = scrollbar_size;
        }
        ScrollAxis::Horizontal => {
            base.y = body.y + body.height;
            base.height = scrollbar_size;
        }
    }
    base
}

pub(crate) fn scrollbar_max_scroll(content_len: i32, view_len: i32) -> i32 { (content_len - view_len).max(0) }

/// Scroll change produced by moving the pointer `mouse_delta` pixels along a track of `base`.
pub(crate) fn scrollbar_drag_delta(axis: ScrollAxis, mouse_delta: i32, content_len: i32, base: Recti) -> i32 {
    let base_len = axis.length(base);
    if base_len <= 0 {
        return 0;
    }
    mouse_delta.saturating_mul(content_len) / base_len
}

pub(crate) fn scrollbar_thumb(axis: ScrollAxis, base: Recti, view_len: i32, content_len: i32, scroll: i32, thumb_size: i32) -> Recti {
    let mut thumb = base;
    let base_len = axis.length(base);
    if base_len <= 0 || content_len <= 0 || view_len <= 0 {
        return thumb;
    }

    let thumb_len = (base_len.saturating_mul(view_len) / content_len).max(thumb_size).min(base_len);
    match axis {
        ScrollAxis::Vertical => thumb.height = thumb_len,
        ScrollAxis::Horizontal => thumb.width = thumb_len,
    }

    let max_scroll = scrollbar_max_scroll(content_len, view_len);
    let track_len = base_len - thumb_len;
    if max_scroll > 0 && track_len > 0 {
        let offset = scroll.clamp(0, max_scroll) * track_len / max_scroll;
        match axis {
            ScrollAxis::Vertical => thumb.y += offset,
            ScrollAxis::Horizontal => thumb.x += offset,
        }
    }

    thumb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rect, rect_tuple};

    #[test]
    fn base_sits_outside_body() {
        let body = rect(10, 20, 100, 50);
        assert_eq!(rect_tuple(scrollbar_base(ScrollAxis::Vertical, body, 12)), (110, 20, 12, 50));
        assert_eq!(rect_tuple(scrollbar_base(ScrollAxis::Horizontal, body, 12)), (10, 70, 100, 12));
    }

    #[test]
    fn thumb_is_proportional_and_follows_scroll() {
        let base = rect(0, 0, 10, 100);
        let top = scrollbar_thumb(ScrollAxis::Vertical, base, 100, 400, 0, 8);
        assert_eq!(rect_tuple(top), (0, 0, 10, 25));
        let bottom = scrollbar_thumb(ScrollAxis::Vertical, base, 100, 400, 300, 8);
        assert_eq!(rect_tuple(bottom), (0, 75, 10, 25));
    }

    #[test]
    fn thumb_respects_minimum_size() {
        let base = rect(0, 0, 100, 10);
        let thumb = scrollbar_thumb(ScrollAxis::Horizontal, base, 10, 10_000, 0, 8);
        assert_eq!(thumb.width, 8);
    }

    #[test]
    fn drag_delta_scales_to_content() {
        let base = rect(0, 0, 10, 100);
        assert_eq!(scrollbar_drag_delta(ScrollAxis::Vertical, 10, 400, base), 40);
        assert_eq!(scrollbar_max_scroll(50, 100), 0);
    }
}
