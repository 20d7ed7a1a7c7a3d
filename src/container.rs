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
use crate::draw_ops::DrawOps;
use crate::scrollbar::*;
use crate::*;

#[derive(Copy, Clone, Debug)]
pub(crate) enum ContainerKind {
    ScrollRegion { viewport: Recti, bars: (bool, bool) },
    Accordion { width: i32, progress: f32 },
    ItemGrid { parent: ContextIndex, width: i32, rows: usize },
    GridRow { row: usize, cell: Option<usize>, height: i32 },
    Popup { padding: i32 },
}

/// A composite widget opened in a context and not closed yet.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ContainerFrame {
    pub id: WidgetId,
    pub range: RendererEventIndexRange,
    pub kind: ContainerKind,
}

#[derive(Clone, Debug, Default)]
/// Outcome of a scroll region.
pub struct ScrollRegionResult {
    /// Scroll region id in the context it was declared in.
    pub id: Option<WidgetId>,
    /// Visible area, in the coordinates of the enclosing target.
    pub viewport: Recti,
    /// Size of the laid out content.
    pub content: Vec2i,
    /// Scroll offset the content was placed with.
    pub scroll: Vec2i,
    /// Wheel or scrollbar outcome.
    pub event: WidgetEvent,
    /// Outcomes of the replayed content, empty when the region was forwarded to an enclosing session.
    pub results: Vec<(WidgetId, WidgetDrawResult)>,
}

fn set_along(axis: ScrollAxis, v: &mut Vec2i, value: i32) {
    match axis {
        ScrollAxis::Vertical => v.y = value,
        ScrollAxis::Horizontal => v.x = value,
    }
}

fn clamp_scroll(scroll: Vec2i, content: Vec2i, viewport: Vec2i) -> Vec2i {
    vec2(
        scroll.x.clamp(0, scrollbar_max_scroll(content.x, viewport.x)),
        scroll.y.clamp(0, scrollbar_max_scroll(content.y, viewport.y)),
    )
}

impl<R: Renderer> Runtime<R> {
    pub(crate) fn push_container(&mut self, frame: ContainerFrame) { self.tree.current_ctx_mut().containers.push(frame); }

    pub(crate) fn pop_container(&mut self, what: &str) -> ContainerFrame {
        match self.tree.current_ctx_mut().containers.pop() {
            Some(frame) => frame,
            None => panic!("{what} without a matching begin"),
        }
    }

    /// Opens a deferred session recording into a fresh range, with a layout scope of `body`.
    pub(crate) fn open_block(&mut self, body: Recti) -> RendererEventIndexRange {
        self.toggle_deferred_rendering(true);
        let mut range = RendererEventIndexRange::default();
        self.record_range(&mut range, true);
        self.tree.current_ctx_mut().layout.push_scope(body, vec2(0, 0));
        range
    }

    /// Closes what [`Runtime::open_block`] opened and returns the finished range with the
    /// size of its content.
    pub(crate) fn close_block(&mut self, mut range: RendererEventIndexRange) -> (RendererEventIndexRange, Vec2i) {
        let content = self.tree.current_ctx_mut().layout.pop_scope();
        self.record_range(&mut range, false);
        self.toggle_deferred_rendering(false);
        (range, content)
    }

    /// Opens a scrollable area of `size` (non-positive components fill or use the default height).
    ///
    /// Content is laid out from `(0, 0)` and placed once [`Runtime::end_scroll_region`] knows its
    /// extent. Scrollbars appear the frame after the content first overflows.
    pub fn begin_scroll_region(&mut self, label: &str, size: Vec2i) {
        let (id, _) = self.get_or_create_id(WidgetKey::Label(label), WidgetType::ScrollRegion);
        let style = self.resolve_style(id, InteractionState::Default);
        let frame = self.next_rect(size);
        self.draw_frame(frame, &style);
        let inner = expand_rect(frame, -style.border_width);
        let sb = self.config.scrollbar_size;

        let (content, scroll) = self.state_of(id).as_scroll_region().map_or((vec2(0, 0), vec2(0, 0)), |s| (s.content, s.scroll));
        let mut viewport = inner;
        let mut need_v = content.y > viewport.height;
        if need_v {
            viewport.width -= sb;
        }
        let need_h = content.x > viewport.width;
        if need_h {
            viewport.height -= sb;
            if !need_v && content.y > viewport.height {
                need_v = true;
                viewport.width -= sb;
            }
        }
        viewport.width = viewport.width.max(0);
        viewport.height = viewport.height.max(0);
        if let Some(s) = self.state_of(id).as_scroll_region_mut() {
            s.viewport = vec2(viewport.width, viewport.height);
            s.scroll = clamp_scroll(scroll, content, s.viewport);
        }

        let range = self.open_block(rect(0, 0, viewport.width, viewport.height));
        self.push_container(ContainerFrame { id, range, kind: ContainerKind::ScrollRegion { viewport, bars: (need_v, need_h) } });
    }

    /// Closes the innermost scroll region: places its content, then handles the wheel and the scrollbars.
    pub fn end_scroll_region(&mut self) -> ScrollRegionResult {
        let frame = self.pop_container("end_scroll_region");
        let ContainerKind::ScrollRegion { viewport, bars } = frame.kind else {
            panic!("end_scroll_region closes a {:?}", frame.kind);
        };
        let id = frame.id;
        let (range, content) = self.close_block(frame.range);

        let scroll = match self.state_of(id).as_scroll_region_mut() {
            Some(s) => {
                s.content = content;
                s.scroll = clamp_scroll(s.scroll, content, s.viewport);
                s.scroll
            }
            None => vec2(0, 0),
        };
        let offset = vec2(viewport.x - scroll.x, viewport.y - scroll.y);
        let results = self.place_range(&range, offset, viewport, Vec::new());

        let context = self.tree.current();
        let mut event = self.emit(context, id, EventGeometry::Viewport { rect: viewport }).event;

        let track_style = self.resolve_style(id, InteractionState::Hovered);
        let thumb_style = self.resolve_style(id, InteractionState::Pressed);
        let sb = self.config.scrollbar_size;
        let thumb_size = self.config.thumb_size;
        let view = vec2(viewport.width, viewport.height);
        for (axis, shown) in [(ScrollAxis::Vertical, bars.0), (ScrollAxis::Horizontal, bars.1)] {
            if !shown {
                continue;
            }
            let track = scrollbar_base(axis, viewport, sb);
            let thumb = scrollbar_thumb(axis, track, axis.along(view), axis.along(content), axis.along(scroll), thumb_size);
            self.draw_rect(track, track_style.bg_color);
            self.draw_rect(thumb, thumb_style.bg_color);
            let bar = self.emit(context, id, EventGeometry::ScrollBar { axis, track, thumb }).event;
            if bar != WidgetEvent::None && !matches!(event, WidgetEvent::Scrolled) {
                event = bar;
            }
        }

        ScrollRegionResult { id: Some(id), viewport, content, scroll, event, results }
    }

    pub(crate) fn viewport_event(&mut self, key: (ContextIndex, WidgetId), hovered: bool) -> WidgetEvent {
        let wheel = self.io.wheel();
        let step = self.config.scroll_step;
        let Some(s) = self.tree.get_mut(key.0).arena_mut().state_mut(key.1).as_scroll_region_mut() else { return WidgetEvent::None };
        s.hovered = hovered;
        if !hovered {
            return WidgetEvent::None;
        }
        if self.wheel_consumed || (wheel.x == 0 && wheel.y == 0) {
            return WidgetEvent::Hovered;
        }
        let max = vec2(scrollbar_max_scroll(s.content.x, s.viewport.x), scrollbar_max_scroll(s.content.y, s.viewport.y));
        if max.x == 0 && max.y == 0 {
            // nothing to scroll, leave the wheel to an enclosing region
            return WidgetEvent::Hovered;
        }
        self.wheel_consumed = true;
        let next = vec2((s.scroll.x + wheel.x * step).clamp(0, max.x), (s.scroll.y + wheel.y * step).clamp(0, max.y));
        if next.x == s.scroll.x && next.y == s.scroll.y {
            return WidgetEvent::Hovered;
        }
        s.scroll = next;
        WidgetEvent::Scrolled
    }

    pub(crate) fn scrollbar_event(&mut self, key: (ContextIndex, WidgetId), axis: ScrollAxis, track: Recti, thumb: Recti, hovered: bool) -> WidgetEvent {
        let io = &self.io;
        let Some(s) = self.tree.get_mut(key.0).arena_mut().state_mut(key.1).as_scroll_region_mut() else { return WidgetEvent::None };
        let mouse = io.mouse_pos();
        let content_len = axis.along(s.content);
        let max = scrollbar_max_scroll(content_len, axis.along(s.viewport));

        if hovered && io.clicked() {
            if !rect_contains(thumb, mouse) {
                // jump so the thumb centers on the pointer
                let thumb_len = axis.length(thumb);
                let free = axis.length(track) - thumb_len;
                if free > 0 {
                    let pos = axis.along(mouse) - axis.along(vec2(track.x, track.y)) - thumb_len / 2;
                    set_along(axis, &mut s.scroll, (pos * max / free).clamp(0, max));
                }
            }
            s.drag = Some(axis);
            s.drag_scroll = axis.along(s.scroll);
            s.drag_mouse = axis.along(mouse);
            self.active = Some(key);
            return WidgetEvent::DragStarted;
        }
        if s.drag != Some(axis) {
            return if hovered { WidgetEvent::Hovered } else { WidgetEvent::None };
        }
        if !io.is_left_mouse_down() {
            s.drag = None;
            if self.active == Some(key) {
                self.active = None;
            }
            return WidgetEvent::DragEnded;
        }
        let delta = scrollbar_drag_delta(axis, axis.along(mouse) - s.drag_mouse, content_len, track);
        let next = (s.drag_scroll + delta).clamp(0, max);
        if next == axis.along(s.scroll) {
            return WidgetEvent::Dragged;
        }
        set_along(axis, &mut s.scroll, next);
        WidgetEvent::Scrolled
    }

    /// Row of tabs; returns the index of the selected one.
    ///
    /// The header scrolls horizontally with the wheel when the tabs are wider than the bar.
    pub fn tab_bar(&mut self, label: &str, tabs: &[&str]) -> usize {
        let (id, _) = self.get_or_create_id(WidgetKey::Label(label), WidgetType::TabBar);
        let style = self.resolve_style(id, InteractionState::Default);
        let bar = self.next_rect(vec2(0, 0));
        self.draw_frame(bar, &style);
        if tabs.is_empty() {
            return 0;
        }
        let (current, hovered) = match self.state_of(id).as_tab_bar_mut() {
            Some(s) => {
                s.current = s.current.min(tabs.len() - 1);
                (s.current, s.hovered)
            }
            None => (0, None),
        };

        let context = self.tree.current();
        let range = self.open_block(rect(0, 0, bar.width, bar.height));
        let mut x = 0;
        for (index, tab) in tabs.iter().enumerate() {
            let state = if index == current {
                InteractionState::Selected
            } else if hovered == Some(index) {
                InteractionState::Hovered
            } else {
                InteractionState::Default
            };
            let tab_style = self.resolve_style(id, state);
            let size = self.text_size(&tab_style, tab);
            let r = rect(x, 0, size.x + 2 * (tab_style.padding + tab_style.border_width), bar.height);
            self.draw_frame(r, &tab_style);
            self.draw_control_text(tab, r, &tab_style, size);
            self.emit(context, id, EventGeometry::TabItem { index, rect: r });
            x += r.width;
        }
        let (range, _) = self.close_block(range);

        let scroll = match self.state_of(id).as_tab_bar_mut() {
            Some(s) => {
                s.tab_count = tabs.len();
                s.max_scroll = (x - bar.width).max(0);
                s.scroll = s.scroll.clamp(0, s.max_scroll);
                s.scroll
            }
            None => 0,
        };
        self.place_range(&range, vec2(bar.x - scroll, bar.y), bar, Vec::new());
        self.state_of(id).as_tab_bar().map_or(0, |s| s.current)
    }

    pub(crate) fn tab_event(&mut self, key: (ContextIndex, WidgetId), index: usize, hovered: bool) -> WidgetEvent {
        let io = &self.io;
        let step = self.config.scroll_step;
        let Some(s) = self.tree.get_mut(key.0).arena_mut().state_mut(key.1).as_tab_bar_mut() else { return WidgetEvent::None };
        if hovered {
            s.hovered = Some(index);
        } else if s.hovered == Some(index) {
            s.hovered = None;
        }
        if !hovered {
            return WidgetEvent::None;
        }
        let wheel = io.wheel();
        if !self.wheel_consumed && s.max_scroll > 0 && (wheel.x != 0 || wheel.y != 0) {
            s.scroll = (s.scroll + (wheel.x + wheel.y) * step).clamp(0, s.max_scroll);
            self.wheel_consumed = true;
        }
        if io.clicked() {
            if s.current != index {
                s.current = index;
                return WidgetEvent::Selected;
            }
            return WidgetEvent::Clicked;
        }
        WidgetEvent::Hovered
    }

    /// Collapsible section. Returns `true` while any part of the body is visible, in which
    /// case the body must be closed with [`Runtime::end_accordion`]. Opening and closing animate
    /// over [`Io::delta_time`].
    pub fn begin_accordion(&mut self, label: &str) -> bool {
        let (id, _) = self.get_or_create_id(WidgetKey::Label(label), WidgetType::Accordion);
        let display = LabelDecoration::parse(label).display;
        let (open, hovered) = self.state_of(id).as_accordion().map_or((false, false), |s| (s.open, s.hovered));
        let style = self.resolve_style(id, if hovered { InteractionState::Hovered } else { InteractionState::Default });
        let header = self.next_rect(vec2(0, 0));
        self.draw_frame(header, &style);
        let size = self.text_size(&style, display);
        let marker = header.height / 3;
        let mx = header.x + header.width - style.padding - marker;
        let my = header.y + header.height / 2;
        let points = if open {
            [vec2(mx - marker, my - marker / 2), vec2(mx + marker, my - marker / 2), vec2(mx, my + marker / 2)]
        } else {
            [vec2(mx - marker / 2, my - marker), vec2(mx + marker / 2, my), vec2(mx - marker / 2, my + marker)]
        };
        self.draw_triangle(points, style.fg_color);
        self.draw_control_text(display, header, &style, size);
        let context = self.tree.current();
        self.emit(context, id, EventGeometry::AccordionHeader { rect: header });

        let step = self.config.animation_speed * self.io.delta_time();
        let progress = match self.state_of(id).as_accordion_mut() {
            Some(s) => {
                s.progress = if s.open { (s.progress + step).min(1.0) } else { (s.progress - step).max(0.0) };
                s.progress
            }
            None => 0.0,
        };
        if progress <= 0.0 {
            return false;
        }
        let range = self.open_block(rect(0, 0, header.width, 0));
        self.push_container(ContainerFrame { id, range, kind: ContainerKind::Accordion { width: header.width, progress } });
        true
    }

    /// Closes the body opened by a `true` [`Runtime::begin_accordion`], revealing the share of
    /// it the animation reached.
    pub fn end_accordion(&mut self) -> Vec<(WidgetId, WidgetDrawResult)> {
        let frame = self.pop_container("end_accordion");
        let ContainerKind::Accordion { width, progress } = frame.kind else {
            panic!("end_accordion closes a {:?}", frame.kind);
        };
        let (range, content) = self.close_block(frame.range);
        if let Some(s) = self.state_of(frame.id).as_accordion_mut() {
            s.content_height = content.y;
        }
        let visible = ((content.y as f32 * progress).round() as i32).max(1);
        let cell = self.next_rect(vec2(width, visible));
        self.place_range(&range, vec2(cell.x, cell.y), cell, Vec::new())
    }

    pub(crate) fn accordion_event(&mut self, key: (ContextIndex, WidgetId), hovered: bool) -> WidgetEvent {
        let io = &self.io;
        let Some(s) = self.tree.get_mut(key.0).arena_mut().state_mut(key.1).as_accordion_mut() else { return WidgetEvent::None };
        s.hovered = hovered;
        if hovered && io.clicked() {
            s.open = !s.open;
            return WidgetEvent::Toggled;
        }
        if hovered { WidgetEvent::Hovered } else { WidgetEvent::None }
    }
}
