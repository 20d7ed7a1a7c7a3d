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
use crate::{
    clip_to, translate_point, translate_rect, ContextIndex, DeferredRenderer, PrimitiveSink, Recti, ScrollAxis, Vec2i, WidgetId,
};
use tracing::trace;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// Half-open `[start, end)` range of log indices.
pub struct IndexRange {
    /// First index.
    pub start: usize,
    /// One past the last index.
    pub end: usize,
}

impl IndexRange {
    /// Creates a range.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted range {start}..{end}");
        Self { start, end }
    }

    /// Number of indices covered.
    pub fn len(&self) -> usize { self.end - self.start }

    /// Returns `true` when the range covers nothing.
    pub fn is_empty(&self) -> bool { self.start == self.end }

    /// Returns `true` when `other` lies inside `self`.
    pub fn encloses(&self, other: IndexRange) -> bool { other.start >= self.start && other.end <= self.end }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// Primitive and event slices recorded for one logical block.
pub struct RendererEventIndexRange {
    /// Slice of the primitive log.
    pub primitives: IndexRange,
    /// Slice of the event log.
    pub events: IndexRange,
}

impl RendererEventIndexRange {
    /// Returns `true` when `other` is inside `self` without being `self`.
    pub fn strictly_encloses(&self, other: &RendererEventIndexRange) -> bool {
        self != other && self.primitives.encloses(other.primitives) && self.events.encloses(other.events)
    }
}

#[derive(Copy, Clone, Debug)]
/// Geometry a widget needs to hit-test and react at replay time, per widget kind.
pub enum EventGeometry {
    /// Label box model.
    Label {
        /// Outer rectangle including the margin.
        margin: Recti,
        /// Border rectangle.
        border: Recti,
        /// Padding rectangle.
        padding: Recti,
        /// Content rectangle.
        content: Recti,
    },
    /// Button frame.
    Button {
        /// Frame rectangle.
        rect: Recti,
    },
    /// Checkbox box plus its caption.
    Checkbox {
        /// The square.
        box_rect: Recti,
        /// The caption.
        label: Recti,
    },
    /// Slider track and thumb.
    Slider {
        /// Whole track.
        extent: Recti,
        /// Thumb at capture time.
        thumb: Recti,
    },
    /// Text input frame.
    TextInput {
        /// Frame rectangle.
        rect: Recti,
        /// Position of the first glyph, scroll included.
        text_origin: Vec2i,
    },
    /// Visible area of a scroll region; receives the wheel.
    Viewport {
        /// Viewport rectangle.
        rect: Recti,
    },
    /// Scroll region scrollbar.
    ScrollBar {
        /// Axis of the bar.
        axis: ScrollAxis,
        /// Track rectangle.
        track: Recti,
        /// Thumb rectangle.
        thumb: Recti,
    },
    /// One tab header.
    TabItem {
        /// Tab index.
        index: usize,
        /// Header rectangle.
        rect: Recti,
    },
    /// Accordion header.
    AccordionHeader {
        /// Header rectangle.
        rect: Recti,
    },
    /// Resize handle on the right edge of a grid column.
    GridColumnHandle {
        /// Column index.
        column: usize,
        /// Handle rectangle.
        rect: Recti,
    },
    /// A grid row.
    GridRow {
        /// Row index.
        row: usize,
        /// Row rectangle.
        rect: Recti,
    },
}

impl EventGeometry {
    /// Geometry moved by `offset`.
    pub fn translated(&self, offset: Vec2i) -> EventGeometry {
        let t = |r: Recti| translate_rect(r, offset);
        match *self {
            Self::Label { margin, border, padding, content } => Self::Label {
                margin: t(margin),
                border: t(border),
                padding: t(padding),
                content: t(content),
            },
            Self::Button { rect } => Self::Button { rect: t(rect) },
            Self::Checkbox { box_rect, label } => Self::Checkbox { box_rect: t(box_rect), label: t(label) },
            Self::Slider { extent, thumb } => Self::Slider { extent: t(extent), thumb: t(thumb) },
            Self::TextInput { rect, text_origin } => Self::TextInput { rect: t(rect), text_origin: translate_point(text_origin, offset) },
            Self::Viewport { rect } => Self::Viewport { rect: t(rect) },
            Self::ScrollBar { axis, track, thumb } => Self::ScrollBar { axis, track: t(track), thumb: t(thumb) },
            Self::TabItem { index, rect } => Self::TabItem { index, rect: t(rect) },
            Self::AccordionHeader { rect } => Self::AccordionHeader { rect: t(rect) },
            Self::GridColumnHandle { column, rect } => Self::GridColumnHandle { column, rect: t(rect) },
            Self::GridRow { row, rect } => Self::GridRow { row, rect: t(rect) },
        }
    }

    /// Rectangle the pointer must be in for the widget to be hovered.
    pub fn hit_rect(&self) -> Recti {
        match *self {
            Self::Label { border, .. } => border,
            Self::Checkbox { box_rect, label } => {
                let x0 = box_rect.x.min(label.x);
                let y0 = box_rect.y.min(label.y);
                let x1 = (box_rect.x + box_rect.width).max(label.x + label.width);
                let y1 = (box_rect.y + box_rect.height).max(label.y + label.height);
                Recti { x: x0, y: y0, width: x1 - x0, height: y1 - y0 }
            }
            Self::Slider { extent, .. } => extent,
            Self::ScrollBar { track, .. } => track,
            Self::Button { rect }
            | Self::TextInput { rect, .. }
            | Self::Viewport { rect }
            | Self::TabItem { rect, .. }
            | Self::AccordionHeader { rect }
            | Self::GridColumnHandle { rect, .. }
            | Self::GridRow { rect, .. } => rect,
        }
    }

    /// Passive geometry is hit-tested but never takes the pointer from the widgets drawn over it.
    pub fn is_passive(&self) -> bool { matches!(self, Self::Viewport { .. }) }
}

#[derive(Copy, Clone, Debug)]
/// Interaction recorded during deferred rendering and evaluated at replay.
pub struct DeferredEvent {
    /// Context whose arena holds the widget.
    pub context: ContextIndex,
    /// Widget the event belongs to.
    pub id: WidgetId,
    /// Clip active when the widget was drawn; the pointer must be inside it too.
    pub clip: Option<Recti>,
    /// Geometry captured at record time.
    pub geometry: EventGeometry,
}

impl DeferredEvent {
    /// Event moved by `offset` whose clip is further restricted to `clip`.
    pub fn translated(&self, offset: Vec2i, clip: Option<Recti>) -> DeferredEvent {
        let own = self.clip.map(|c| translate_rect(c, offset));
        let clip = match (own, clip) {
            (Some(a), b @ Some(_)) => Some(clip_to(a, b)),
            (a, None) => a,
            (None, b) => b,
        };
        DeferredEvent { context: self.context, id: self.id, clip, geometry: self.geometry.translated(offset) }
    }
}

/// Capture/replay engine shared by every deferred session of a frame.
///
/// Primitives go to an append-only [`DeferredRenderer`] and events to a parallel log. Blocks are
/// delimited with [`DeferredPipeline::record_range`] and replayed at any offset, any number of
/// times, until [`DeferredPipeline::clear`] runs at the end of the frame.
#[derive(Default, Debug)]
pub struct DeferredPipeline {
    log: DeferredRenderer,
    events: Vec<DeferredEvent>,
    open: Vec<RendererEventIndexRange>,
    sessions: usize,
    excluded: Vec<RendererEventIndexRange>,
}

impl DeferredPipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self { Self::default() }

    /// Enters a deferred recording session.
    pub fn begin_session(&mut self) { self.sessions += 1; }

    /// Leaves the innermost deferred recording session.
    pub fn end_session(&mut self) {
        assert!(self.sessions > 0, "end_session without begin_session");
        self.sessions -= 1;
    }

    /// Number of sessions currently open.
    pub fn session_depth(&self) -> usize { self.sessions }

    /// Number of ranges currently being recorded.
    pub fn open_ranges(&self) -> usize { self.open.len() }

    /// Marks the start (`start == true`) or the end of a block.
    ///
    /// Ranges must be closed in the reverse order they were opened.
    pub fn record_range(&mut self, range: &mut RendererEventIndexRange, start: bool) {
        let prim = self.log.total_enqueued();
        let ev = self.events.len();
        if start {
            *range = RendererEventIndexRange { primitives: IndexRange::new(prim, prim), events: IndexRange::new(ev, ev) };
            self.open.push(*range);
        } else {
            let opened = self.open.pop();
            assert!(opened.is_some(), "record_range(end) without a matching start");
            debug_assert!(
                opened.is_some_and(|o| o.primitives.start == range.primitives.start && o.events.start == range.events.start),
                "deferred ranges closed out of order"
            );
            range.primitives.end = prim;
            range.events.end = ev;
        }
    }

    /// Primitive sink of the log.
    pub fn sink(&mut self) -> &mut dyn PrimitiveSink { &mut self.log }

    /// Number of recorded primitives.
    pub fn total_enqueued(&self) -> usize { self.log.total_enqueued() }

    /// Number of recorded events.
    pub fn event_count(&self) -> usize { self.events.len() }

    /// Appends an event. Must happen inside a recorded range.
    pub fn push_event(&mut self, event: DeferredEvent) {
        debug_assert!(!self.open.is_empty(), "deferred event recorded outside of a range; it would never be replayed");
        self.events.push(event);
    }

    /// Excludes `range` from replays of every range strictly enclosing it.
    pub fn detach(&mut self, range: RendererEventIndexRange) { self.excluded.push(range); }

    fn gaps(&self, outer: IndexRange, pick: impl Fn(&RendererEventIndexRange) -> IndexRange, whole: &RendererEventIndexRange) -> Vec<IndexRange> {
        let mut holes: Vec<IndexRange> = self
            .excluded
            .iter()
            .filter(|e| whole.strictly_encloses(e))
            .map(&pick)
            .filter(|r| !r.is_empty())
            .collect();
        holes.sort_by_key(|r| r.start);
        let mut out = Vec::with_capacity(holes.len() + 1);
        let mut cursor = outer.start;
        for h in holes {
            if h.start > cursor {
                out.push(IndexRange::new(cursor, h.start));
            }
            cursor = cursor.max(h.end);
        }
        if cursor < outer.end {
            out.push(IndexRange::new(cursor, outer.end));
        }
        out
    }

    /// Replays the primitives of `range` into `target` at `offset`, clipped to `clip`.
    pub fn render(&self, target: &mut dyn PrimitiveSink, offset: Vec2i, range: &RendererEventIndexRange, clip: Option<Recti>) {
        trace!(?range, x = offset.x, y = offset.y, "replaying primitives");
        for part in self.gaps(range.primitives, |r| r.primitives, range) {
            self.log.render_clipped(target, offset, part, clip);
        }
    }

    /// Events of `range` translated by `offset`, in capture order.
    pub fn events(&self, range: &RendererEventIndexRange, offset: Vec2i, clip: Option<Recti>) -> Vec<DeferredEvent> {
        assert!(range.events.end <= self.events.len(), "replaying events {:?} past the end of the log", range.events);
        self.gaps(range.events, |r| r.events, range)
            .into_iter()
            .flat_map(|part| self.events[part.start..part.end].iter())
            .map(|e| e.translated(offset, clip))
            .collect()
    }

    /// Copies `range` to the end of the logs at `offset`, for replay by an enclosing session,
    /// and excludes the original from enclosing replays. Returns the range of the copy.
    pub fn forward(&mut self, range: &RendererEventIndexRange, offset: Vec2i, clip: Option<Recti>) -> RendererEventIndexRange {
        trace!(?range, x = offset.x, y = offset.y, "forwarding range to the enclosing session");
        let prim_start = self.log.total_enqueued();
        for part in self.gaps(range.primitives, |r| r.primitives, range) {
            self.log.replay_into_self(offset, part, clip);
        }
        let ev_start = self.events.len();
        let copied = self.events(range, offset, clip);
        self.events.extend(copied);
        self.excluded.push(*range);
        RendererEventIndexRange {
            primitives: IndexRange::new(prim_start, self.log.total_enqueued()),
            events: IndexRange::new(ev_start, self.events.len()),
        }
    }

    /// Drops everything recorded this frame. No range may still be open.
    pub fn clear(&mut self) {
        assert!(self.open.is_empty(), "clearing the deferred logs while {} range(s) are still recording", self.open.len());
        self.log.reset();
        self.events.clear();
        self.excluded.clear();
    }
}
