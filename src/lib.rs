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
#![deny(missing_docs)]
//! `deferui` is the context runtime of an immediate-mode widget toolkit.
//!
//! Callers issue per-frame calls (`button`, `begin_item_grid`, ...) that both describe layout and
//! return interaction results, while the runtime keeps per-widget state alive across frames under
//! a stable identity scheme. Composite widgets whose placement is only known once their content
//! has been laid out (scroll regions, popups, grid rows, accordions) are built on a two-phase
//! pipeline: primitives and interaction events are recorded first, then replayed at the final
//! offset and dispatched against the current input.

pub use rs_math3d::*;

mod arena;
mod config;
mod container;
mod context;
mod deferred;
mod draw_context;
mod draw_ops;
mod error;
mod grid;
mod id;
mod io;
mod layout;
mod popup;
mod renderer;
mod runtime;
mod scrollbar;
mod state;
mod style;
mod widgets;

#[cfg(test)]
pub(crate) mod test_support;

pub use arena::{ArenaSlot, StateArena};
pub use config::Config;
pub use container::ScrollRegionResult;
pub use context::{Context, ContextIndex, ContextTree, RenderTarget};
pub use deferred::{DeferredEvent, DeferredPipeline, EventGeometry, IndexRange, RendererEventIndexRange};
pub use error::{Error, Result};
pub use grid::ColumnSpec;
pub use id::{IdentityRegistry, LabelArena, LabelDecoration, LabelRef, WidgetId, WidgetKey, WidgetType, WidgetTypes};
pub use io::{Clipboard, Io, Key, KeyMode, MemoryClipboard, MouseButton};
pub use renderer::{DeferredRenderer, FontHandle, Primitive, PrimitiveSink, Renderer, RendererHandle};
pub use runtime::Runtime;
pub use scrollbar::ScrollAxis;
pub use state::*;
pub use style::{
    FontCache, FontProvider, FontWeight, InteractionState, StyleCascade, StyleDescriptor, StyleFields, StyleOverride, StyleSource,
    TextAlign, ThemeProvider, WidgetStates,
};

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Simple RGBA color stored with 8-bit components.
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    /// Builds an opaque color from a `0xRRGGBB` value.
    pub const fn rgb_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
            a: 0xFF,
        }
    }

    /// Packs the color back into `0xRRGGBB`, dropping alpha.
    pub const fn to_rgb_hex(self) -> u32 { ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32 }
}

/// Convenience constructor for [`Color`].
pub fn color(r: u8, g: u8, b: u8, a: u8) -> Color { Color { r, g, b, a } }

/// Convenience constructor for [`Vec2i`].
pub fn vec2(x: i32, y: i32) -> Vec2i { Vec2i { x, y } }

/// Convenience constructor for [`Recti`].
pub fn rect(x: i32, y: i32, w: i32, h: i32) -> Recti { Recti { x, y, width: w, height: h } }

/// Expands (or shrinks) a rectangle uniformly on all sides.
pub fn expand_rect(r: Recti, n: i32) -> Recti { rect(r.x - n, r.y - n, r.width + n * 2, r.height + n * 2) }

/// Moves a rectangle by `offset`, keeping its size.
pub fn translate_rect(r: Recti, offset: Vec2i) -> Recti { rect(r.x + offset.x, r.y + offset.y, r.width, r.height) }

/// Moves a point by `offset`.
pub fn translate_point(p: Vec2i, offset: Vec2i) -> Vec2i { vec2(p.x + offset.x, p.y + offset.y) }

/// Half-open containment test: the right and bottom edges are outside the rectangle.
pub fn rect_contains(r: Recti, p: Vec2i) -> bool { p.x >= r.x && p.y >= r.y && p.x < r.x + r.width && p.y < r.y + r.height }

/// Intersection of two rectangles, or `None` when they do not overlap.
pub fn intersect_rects(a: Recti, b: Recti) -> Option<Recti> {
    let x0 = a.x.max(b.x);
    let y0 = a.y.max(b.y);
    let x1 = a.x.saturating_add(a.width).min(b.x.saturating_add(b.width));
    let y1 = a.y.saturating_add(a.height).min(b.y.saturating_add(b.height));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(rect(x0, y0, x1 - x0, y1 - y0))
}

/// Intersects `r` with an optional clip, returning an empty rect at `r`'s origin on no overlap.
pub fn clip_to(r: Recti, clip: Option<Recti>) -> Recti {
    match clip {
        None => r,
        Some(c) => intersect_rects(r, c).unwrap_or(rect(r.x, r.y, 0, 0)),
    }
}

/// Returns the `(x, y, width, height)` tuple of a rectangle, handy for comparisons.
pub fn rect_tuple(r: Recti) -> (i32, i32, i32, i32) { (r.x, r.y, r.width, r.height) }

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// Interaction outcome reported by a widget call or a deferred replay.
pub enum WidgetEvent {
    /// Nothing happened.
    #[default]
    None,
    /// The event was queued for replay; the outcome arrives on the next call.
    Deferred,
    /// The pointer is over the widget.
    Hovered,
    /// The left button was pressed on the widget this frame.
    Clicked,
    /// The right button was pressed on the widget this frame.
    RightClicked,
    /// The left button was double clicked on the widget.
    DoubleClicked,
    /// The left button is held on the widget.
    Pressed,
    /// A drag started on the widget.
    DragStarted,
    /// The widget is being dragged.
    Dragged,
    /// A drag on the widget ended.
    DragEnded,
    /// A two-state widget flipped.
    Toggled,
    /// The bound value changed.
    Edited,
    /// Editing was committed (e.g. Enter in a text input).
    Submitted,
    /// An item (tab, grid row) became selected.
    Selected,
    /// A scroll offset changed.
    Scrolled,
}

#[derive(Copy, Clone, Debug)]
/// Result of a widget call: the event plus the geometry the widget occupied.
pub struct WidgetDrawResult {
    /// What happened.
    pub event: WidgetEvent,
    /// Rectangle the widget occupied, in the coordinates of the target it drew into.
    pub geometry: Recti,
}

impl Default for WidgetDrawResult {
    fn default() -> Self { Self { event: WidgetEvent::None, geometry: rect(0, 0, 0, 0) } }
}

impl WidgetDrawResult {
    /// Creates a result.
    pub fn new(event: WidgetEvent, geometry: Recti) -> Self { Self { event, geometry } }

    /// Returns `true` when the widget was clicked with the left button.
    pub fn clicked(&self) -> bool { matches!(self.event, WidgetEvent::Clicked | WidgetEvent::DoubleClicked) }

    /// Returns `true` when the bound value changed.
    pub fn changed(&self) -> bool { matches!(self.event, WidgetEvent::Toggled | WidgetEvent::Edited | WidgetEvent::Selected) }

    /// Returns `true` when the outcome is pending a replay.
    pub fn is_deferred(&self) -> bool { self.event == WidgetEvent::Deferred }

    /// Returns `true` when nothing happened.
    pub fn is_none(&self) -> bool { self.event == WidgetEvent::None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_hex_round_trips_channels() {
        let c = Color::rgb_hex(0xFF8001);
        assert_eq!((c.r, c.g, c.b, c.a), (0xFF, 0x80, 0x01, 0xFF));
        assert_eq!(c.to_rgb_hex(), 0xFF8001);
    }

    #[test]
    fn intersect_disjoint_is_none() {
        assert!(intersect_rects(rect(0, 0, 10, 10), rect(10, 0, 5, 5)).is_none());
        assert_eq!(rect_tuple(intersect_rects(rect(0, 0, 10, 10), rect(5, 5, 10, 10)).unwrap()), (5, 5, 5, 5));
    }

    #[test]
    fn contains_is_half_open() {
        let r = rect(0, 0, 10, 10);
        assert!(rect_contains(r, vec2(0, 0)));
        assert!(rect_contains(r, vec2(9, 9)));
        assert!(!rect_contains(r, vec2(10, 5)));
    }
}
