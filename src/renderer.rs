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
use crate::{clip_to, translate_point, translate_rect, Color, IndexRange, Recti, Vec2i};
use std::sync::{Arc, RwLock};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
/// Opaque handle to a font loaded by a [`crate::FontProvider`].
pub struct FontHandle(u32);

impl FontHandle {
    /// Wraps a provider specific number.
    pub fn new(raw: u32) -> Self { Self(raw) }

    /// Returns the raw numeric value wrapped by this handle.
    pub fn raw(self) -> u32 { self.0 }
}

/// Anything that accepts draw primitives: a real backend or the deferred log.
pub trait PrimitiveSink {
    /// Draws a rectangle, filled or outlined with `thickness`.
    fn draw_rect(&mut self, rect: Recti, color: Color, filled: bool, thickness: i32);
    /// Draws a circle.
    fn draw_circle(&mut self, center: Vec2i, radius: i32, color: Color, filled: bool);
    /// Draws a triangle.
    fn draw_triangle(&mut self, points: [Vec2i; 3], color: Color, filled: bool);
    /// Draws a line segment.
    fn draw_line(&mut self, from: Vec2i, to: Vec2i, color: Color, thickness: i32);
    /// Draws connected line segments.
    fn draw_polyline(&mut self, points: &[Vec2i], color: Color, thickness: i32);
    /// Draws text with its top-left corner at `pos` using the current font.
    fn draw_text(&mut self, text: &str, pos: Vec2i, color: Color, wrap_width: Option<i32>);
    /// Restricts drawing to `rect`.
    fn set_clip_rect(&mut self, rect: Recti);
    /// Removes the clip rectangle.
    fn reset_clip_rect(&mut self);
    /// Selects the font used by subsequent text.
    fn set_current_font(&mut self, font: FontHandle, size: u16);
    /// Restores the backend's default font.
    fn reset_font(&mut self);
}

/// Backend the runtime paints to.
pub trait Renderer: PrimitiveSink {
    /// Size of `text` in `font` at `size`, wrapped at `wrap_width` when given.
    fn get_text_size(&self, text: &str, font: FontHandle, size: u16, wrap_width: Option<i32>) -> Vec2i;
    /// Called when a frame begins.
    fn begin(&mut self, _window: Vec2i) {}
    /// Called after the last primitive of a frame.
    fn end(&mut self) {}
}

/// Thread-safe handle that shares ownership of a [`Renderer`].
pub struct RendererHandle<R: Renderer> {
    handle: Arc<RwLock<R>>,
}

impl<R: Renderer> Clone for RendererHandle<R> {
    fn clone(&self) -> Self { Self { handle: self.handle.clone() } }
}

impl<R: Renderer> RendererHandle<R> {
    /// Wraps a renderer inside an [`Arc<RwLock<...>>`] so it can be shared.
    pub fn new(renderer: R) -> Self { Self { handle: Arc::new(RwLock::new(renderer)) } }

    /// Executes the provided closure with a shared reference to the renderer.
    pub fn scope<Res, F: FnOnce(&R) -> Res>(&self, f: F) -> Res {
        match self.handle.read() {
            Ok(guard) => f(&*guard),
            // reading through a poisoned lock is fine, the renderer holds no invariants we rely on
            Err(poisoned) => f(&*poisoned.into_inner()),
        }
    }

    /// Executes the provided closure with a mutable reference to the renderer.
    pub fn scope_mut<Res, F: FnOnce(&mut R) -> Res>(&self, f: F) -> Res {
        match self.handle.write() {
            Ok(mut guard) => f(&mut *guard),
            Err(poisoned) => f(&mut *poisoned.into_inner()),
        }
    }
}

#[derive(Clone, Debug)]
/// One recorded draw call.
pub enum Primitive {
    /// See [`PrimitiveSink::draw_rect`].
    Rect {
        /// Rectangle.
        rect: Recti,
        /// Color.
        color: Color,
        /// Filled or outlined.
        filled: bool,
        /// Outline thickness.
        thickness: i32,
    },
    /// See [`PrimitiveSink::draw_circle`].
    Circle {
        /// Center.
        center: Vec2i,
        /// Radius.
        radius: i32,
        /// Color.
        color: Color,
        /// Filled or outlined.
        filled: bool,
    },
    /// See [`PrimitiveSink::draw_triangle`].
    Triangle {
        /// Corners.
        points: [Vec2i; 3],
        /// Color.
        color: Color,
        /// Filled or outlined.
        filled: bool,
    },
    /// See [`PrimitiveSink::draw_line`].
    Line {
        /// Start point.
        from: Vec2i,
        /// End point.
        to: Vec2i,
        /// Color.
        color: Color,
        /// Thickness.
        thickness: i32,
    },
    /// See [`PrimitiveSink::draw_polyline`].
    Polyline {
        /// Points.
        points: Vec<Vec2i>,
        /// Color.
        color: Color,
        /// Thickness.
        thickness: i32,
    },
    /// See [`PrimitiveSink::draw_text`].
    Text {
        /// Text.
        text: String,
        /// Top-left corner.
        pos: Vec2i,
        /// Color.
        color: Color,
        /// Wrap width.
        wrap_width: Option<i32>,
    },
    /// See [`PrimitiveSink::set_clip_rect`].
    SetClip(Recti),
    /// See [`PrimitiveSink::reset_clip_rect`].
    ResetClip,
    /// See [`PrimitiveSink::set_current_font`].
    SetFont {
        /// Font.
        font: FontHandle,
        /// Size.
        size: u16,
    },
    /// See [`PrimitiveSink::reset_font`].
    ResetFont,
}

impl Primitive {
    /// Copy of the primitive moved by `offset` and, for clip primitives, restricted to `clip`.
    pub fn translated(&self, offset: Vec2i, clip: Option<Recti>) -> Primitive {
        match self {
            Self::Rect { rect, color, filled, thickness } => Self::Rect {
                rect: translate_rect(*rect, offset),
                color: *color,
                filled: *filled,
                thickness: *thickness,
            },
            Self::Circle { center, radius, color, filled } => Self::Circle {
                center: translate_point(*center, offset),
                radius: *radius,
                color: *color,
                filled: *filled,
            },
            Self::Triangle { points, color, filled } => Self::Triangle {
                points: points.map(|p| translate_point(p, offset)),
                color: *color,
                filled: *filled,
            },
            Self::Line { from, to, color, thickness } => Self::Line {
                from: translate_point(*from, offset),
                to: translate_point(*to, offset),
                color: *color,
                thickness: *thickness,
            },
            Self::Polyline { points, color, thickness } => Self::Polyline {
                points: points.iter().map(|p| translate_point(*p, offset)).collect(),
                color: *color,
                thickness: *thickness,
            },
            Self::Text { text, pos, color, wrap_width } => Self::Text {
                text: text.clone(),
                pos: translate_point(*pos, offset),
                color: *color,
                wrap_width: *wrap_width,
            },
            Self::SetClip(r) => Self::SetClip(clip_to(translate_rect(*r, offset), clip)),
            Self::ResetClip => match clip {
                Some(c) => Self::SetClip(c),
                None => Self::ResetClip,
            },
            Self::SetFont { font, size } => Self::SetFont { font: *font, size: *size },
            Self::ResetFont => Self::ResetFont,
        }
    }

    /// Issues the primitive to `sink`.
    pub fn replay(&self, sink: &mut dyn PrimitiveSink) {
        match self {
            Self::Rect { rect, color, filled, thickness } => sink.draw_rect(*rect, *color, *filled, *thickness),
            Self::Circle { center, radius, color, filled } => sink.draw_circle(*center, *radius, *color, *filled),
            Self::Triangle { points, color, filled } => sink.draw_triangle(*points, *color, *filled),
            Self::Line { from, to, color, thickness } => sink.draw_line(*from, *to, *color, *thickness),
            Self::Polyline { points, color, thickness } => sink.draw_polyline(points, *color, *thickness),
            Self::Text { text, pos, color, wrap_width } => sink.draw_text(text, *pos, *color, *wrap_width),
            Self::SetClip(r) => sink.set_clip_rect(*r),
            Self::ResetClip => sink.reset_clip_rect(),
            Self::SetFont { font, size } => sink.set_current_font(*font, *size),
            Self::ResetFont => sink.reset_font(),
        }
    }
}

/// Append-only log of primitives recorded while deferred rendering is active.
#[derive(Default, Debug)]
pub struct DeferredRenderer {
    log: Vec<Primitive>,
}

impl DeferredRenderer {
    /// Creates an empty log.
    pub fn new() -> Self { Self::default() }

    /// Number of primitives recorded since the last [`DeferredRenderer::reset`].
    pub fn total_enqueued(&self) -> usize { self.log.len() }

    /// Drops every recorded primitive.
    pub fn reset(&mut self) { self.log.clear(); }

    /// Recorded primitives in `range`.
    pub fn primitives(&self, range: IndexRange) -> &[Primitive] { &self.log[range.start..range.end] }

    /// Replays `range` into `target`, translating every primitive by `offset`.
    pub fn render(&self, target: &mut dyn PrimitiveSink, offset: Vec2i, range: IndexRange) { self.render_clipped(target, offset, range, None); }

    /// Like [`DeferredRenderer::render`], additionally restricting every replayed clip to `clip`.
    pub fn render_clipped(&self, target: &mut dyn PrimitiveSink, offset: Vec2i, range: IndexRange, clip: Option<Recti>) {
        assert!(range.end <= self.log.len(), "replaying primitives {range:?} past the end of the log");
        if let Some(c) = clip {
            target.set_clip_rect(c);
        }
        for p in &self.log[range.start..range.end] {
            p.translated(offset, clip).replay(target);
        }
        if clip.is_some() {
            target.reset_clip_rect();
        }
    }

    /// Appends translated copies of `range` to the end of the log and returns their range.
    pub fn replay_into_self(&mut self, offset: Vec2i, range: IndexRange, clip: Option<Recti>) -> IndexRange {
        assert!(range.end <= self.log.len(), "forwarding primitives {range:?} past the end of the log");
        let start = self.log.len();
        if let Some(c) = clip {
            self.log.push(Primitive::SetClip(c));
        }
        for i in range.start..range.end {
            let p = self.log[i].translated(offset, clip);
            self.log.push(p);
        }
        if clip.is_some() {
            self.log.push(Primitive::ResetClip);
        }
        IndexRange::new(start, self.log.len())
    }
}

impl PrimitiveSink for DeferredRenderer {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestRenderer;
    use crate::{rect, rect_tuple, vec2};

    #[test]
    fn rect_is_translated_by_offset() {
        let mut log = DeferredRenderer::new();
        log.draw_rect(rect(0, 0, 10, 10), Color::rgb_hex(0xFFFFFF), true, 0);
        let mut target = TestRenderer::default();
        log.render(&mut target, vec2(5, 5), IndexRange::new(0, 1));
        let r = target.rects()[0];
        assert_eq!(rect_tuple(r), (5, 5, 10, 10));
        assert_eq!((r.x + r.width, r.y + r.height), (15, 15));
    }

    #[test]
    fn replay_at_origin_is_identical() {
        let mut log = DeferredRenderer::new();
        let mut direct = TestRenderer::default();
        for sink in [&mut log as &mut dyn PrimitiveSink, &mut direct] {
            sink.set_clip_rect(rect(0, 0, 50, 50));
            sink.draw_text("hi", vec2(3, 4), Color::rgb_hex(0x102030), None);
            sink.draw_polyline(&[vec2(0, 0), vec2(4, 4), vec2(8, 0)], Color::rgb_hex(0x0), 2);
            sink.reset_clip_rect();
        }
        let mut replayed = TestRenderer::default();
        log.render(&mut replayed, vec2(0, 0), IndexRange::new(0, log.total_enqueued()));
        assert_eq!(format!("{:?}", replayed.log), format!("{:?}", direct.log));
    }

    #[test]
    fn clip_is_intersected_and_reset_restores_viewport() {
        let mut log = DeferredRenderer::new();
        log.set_clip_rect(rect(0, 0, 100, 100));
        log.reset_clip_rect();
        let mut target = TestRenderer::default();
        let viewport = rect(10, 10, 20, 20);
        log.render_clipped(&mut target, vec2(0, 0), IndexRange::new(0, 2), Some(viewport));
        let clips: Vec<_> = target.clips().into_iter().map(rect_tuple).collect();
        assert_eq!(clips, vec![(10, 10, 20, 20), (10, 10, 20, 20), (10, 10, 20, 20)]);
    }

    #[test]
    fn replay_into_self_appends_translated_copies() {
        let mut log = DeferredRenderer::new();
        log.draw_circle(vec2(1, 1), 3, Color::rgb_hex(0x1), true);
        let copied = log.replay_into_self(vec2(10, 0), IndexRange::new(0, 1), None);
        assert_eq!((copied.start, copied.end), (1, 2));
        match &log.primitives(copied)[0] {
            Primitive::Circle { center, .. } => assert_eq!((center.x, center.y), (11, 1)),
            other => panic!("unexpected primitive {other:?}"),
        }
    }

    #[test]
    fn reset_empties_log() {
        let mut log = DeferredRenderer::new();
        log.reset_font();
        assert_eq!(log.total_enqueued(), 1);
        log.reset();
        assert_eq!(log.total_enqueued(), 0);
    }

    #[test]
    fn handle_scopes_share_renderer() {
        let handle = RendererHandle::new(TestRenderer::default());
        let other = handle.clone();
        handle.scope_mut(|r| r.draw_line(vec2(0, 0), vec2(1, 1), Color::rgb_hex(0), 1));
        assert_eq!(other.scope(|r| r.log.len()), 1);
    }
}
