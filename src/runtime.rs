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
use crate::draw_context::DrawCtx;
use crate::draw_ops::{DrawCtxAccess, DrawOps};
use crate::popup::PopupTracker;
use crate::*;
use tracing::{debug, trace, warn};

#[derive(Copy, Clone, Debug)]
struct SessionFlags {
    context: ContextIndex,
    target: RenderTarget,
    defer_events: bool,
}

/// Owner of every piece of UI state: contexts, styles, fonts, input and the deferred pipeline.
///
/// The host creates one runtime, feeds input through [`Runtime::io_mut`] between frames and
/// issues widget calls between [`Runtime::begin_frame`] and [`Runtime::end_frame`].
pub struct Runtime<R: Renderer> {
    pub(crate) config: Config,
    pub(crate) renderer: RendererHandle<R>,
    pub(crate) io: Io,
    pub(crate) tree: ContextTree,
    cascade: StyleCascade,
    fonts: FontCache,
    style_source: Option<Box<dyn StyleSource>>,
    pub(crate) pipeline: DeferredPipeline,
    clip_stacks: Vec<Vec<Recti>>,
    sessions: Vec<SessionFlags>,
    pub(crate) focus: Option<(ContextIndex, WidgetId)>,
    pub(crate) active: Option<(ContextIndex, WidgetId)>,
    pub(crate) popups: PopupTracker,
    pub(crate) wheel_consumed: bool,
    inside_frame: bool,
    frame: u64,
}

impl<R: Renderer> Runtime<R> {
    /// Validates `config`, runs the style source's theme hook and checks the default font loads.
    pub fn init(config: Config, renderer: RendererHandle<R>, fonts: Box<dyn FontProvider>, mut style_source: Option<Box<dyn StyleSource>>) -> Result<Self> {
        config.validate()?;
        let mut cascade = StyleCascade::new();
        if let Some(source) = style_source.as_mut() {
            source.global_theme(&mut cascade);
        }
        let mut fonts = FontCache::new(fonts, &config.default_font_family, config.default_font_size);
        fonts.resolve(&config.default_font_family, config.default_font_size, FontWeight::Regular)?;
        debug!(
            width = config.window_size.x,
            height = config.window_size.y,
            font = config.default_font_family.as_str(),
            "runtime initialized"
        );
        Ok(Self {
            io: Io::new(config.double_click_interval),
            tree: ContextTree::new(&config),
            config,
            renderer,
            cascade,
            fonts,
            style_source,
            pipeline: DeferredPipeline::new(),
            clip_stacks: vec![Vec::new()],
            sessions: Vec::new(),
            focus: None,
            active: None,
            popups: PopupTracker::default(),
            wheel_consumed: false,
            inside_frame: false,
            frame: 0,
        })
    }

    /// Tears the runtime down. Every context, arena and interned label is released here.
    pub fn shutdown(self) {
        assert!(!self.inside_frame, "shutdown called inside a frame");
        debug!(contexts = self.tree.len(), frames = self.frame, "runtime shut down");
    }

    /// Configuration the runtime was created with.
    pub fn config(&self) -> &Config { &self.config }

    /// Handle of the active renderer.
    pub fn renderer_handle(&self) -> RendererHandle<R> { self.renderer.clone() }

    /// Swaps the active renderer. Only allowed between frames.
    pub fn set_renderer(&mut self, renderer: RendererHandle<R>) {
        assert!(!self.inside_frame, "the renderer cannot change while a frame is being built");
        self.renderer = renderer;
    }

    /// Input snapshot.
    pub fn io(&self) -> &Io { &self.io }

    /// Input snapshot, for feeding events between frames.
    pub fn io_mut(&mut self) -> &mut Io { &mut self.io }

    /// Number of frames begun so far.
    pub fn frame_count(&self) -> u64 { self.frame }

    /// Returns `true` between [`Runtime::begin_frame`] and [`Runtime::end_frame`].
    pub fn inside_frame(&self) -> bool { self.inside_frame }

    /// Context hierarchy.
    pub fn contexts(&self) -> &ContextTree { &self.tree }

    /// Index of the current context.
    pub fn current_context(&self) -> ContextIndex { self.tree.current() }

    /// Style cascade, for installing a theme or editing the type defaults.
    pub fn cascade_mut(&mut self) -> &mut StyleCascade { &mut self.cascade }

    /// Font cache.
    pub fn fonts_mut(&mut self) -> &mut FontCache { &mut self.fonts }

    /// Registers a `.class` style in the current context.
    pub fn register_class(&mut self, class: &str, style: StyleOverride) { self.tree.current_ctx_mut().register_class(class, style); }

    /// Registers an `#id` style in the current context.
    pub fn register_id(&mut self, id: &str, style: StyleOverride) { self.tree.current_ctx_mut().register_id(id, style); }

    /// Pushes an ambient style for every state.
    pub fn push_style(&mut self, style: StyleDescriptor) { self.cascade.push_style(style); }

    /// Pushes an ambient style for the given states.
    pub fn push_style_for(&mut self, style: StyleDescriptor, states: WidgetStates) { self.cascade.push_style_for(style, states); }

    /// Pops the innermost ambient style.
    pub fn pop_style(&mut self) { self.cascade.pop_style(); }

    /// Hides the ambient style stack from `types` until [`Runtime::pop_ignore_style_stack`].
    pub fn push_ignore_style_stack(&mut self, types: WidgetTypes) { self.cascade.push_ignore(types); }

    /// Restores the previous ignore set.
    pub fn pop_ignore_style_stack(&mut self) { self.cascade.pop_ignore(); }

    /// Id of `key` in the current context, registered on first use.
    pub fn get_or_create_id(&mut self, key: WidgetKey<'_>, ty: WidgetType) -> (WidgetId, bool) {
        self.tree.get_or_create_id(key, ty, self.style_source.as_deref())
    }

    /// Id for an unkeyed widget of type `ty` in the current context. The n-th such call of a
    /// frame gets the same id every frame.
    pub fn ephemeral_id(&mut self, ty: WidgetType) -> (WidgetId, bool) { self.tree.ephemeral_id(ty) }

    /// Persistent state of `id` in the current context, if its slot exists.
    pub fn widget_state(&self, id: WidgetId) -> Option<&WidgetState> { self.tree.current_ctx().arena().get(id).map(|slot| &slot.state) }

    /// Effective style of `id` in `state`, with its font bound.
    pub fn resolve_style(&mut self, id: WidgetId, state: InteractionState) -> StyleDescriptor { self.resolve_style_in(self.tree.current(), id, state) }

    /// [`Runtime::resolve_style`] for a widget owned by `context`.
    pub(crate) fn resolve_style_in(&mut self, context: ContextIndex, id: WidgetId, state: InteractionState) -> StyleDescriptor {
        let instance = self.tree.get(context).arena().get(id).and_then(|slot| slot.style.as_ref());
        let mut style = self.cascade.resolve(id.ty(), instance, state);
        if !style.specified.contains(StyleFields::FONT_SIZE) {
            style.font_size = self.config.default_font_size;
        }
        if let Err(err) = self.fonts.bind(&mut style) {
            trace!(%err, "style left without a font");
        }
        style
    }

    /// Like [`Runtime::resolve_style`] for a raw state mask, which must have exactly one bit set.
    pub fn resolve_style_bits(&mut self, id: WidgetId, states: WidgetStates) -> Result<StyleDescriptor> {
        let state = InteractionState::try_from(states)?;
        Ok(self.resolve_style(id, state))
    }

    pub(crate) fn text_size(&self, style: &StyleDescriptor, text: &str) -> Vec2i {
        let font = style.font.unwrap_or_default();
        self.renderer.scope(|r| r.get_text_size(text, font, style.font_size, None))
    }

    pub(crate) fn measure(&self, font: Option<FontHandle>, size: u16, text: &str) -> i32 {
        self.renderer.scope(|r| r.get_text_size(text, font.unwrap_or_default(), size, None).x)
    }

    /// Enters the child context owned by `owner`.
    pub fn push_context(&mut self, owner: WidgetId) -> ContextIndex { self.tree.push_context(owner) }

    /// Returns to the parent context.
    pub fn pop_context(&mut self) -> ContextIndex { self.tree.pop_context() }

    /// Clears hover and press flags of every widget in every context.
    pub fn soft_reset_states(&mut self) { self.tree.soft_reset(ContextIndex::ROOT); }

    /// Ad-hoc layout: places the next widget to the right of the previous one.
    pub fn same_line(&mut self) { self.tree.current_ctx_mut().layout.same_line(); }

    /// Ad-hoc layout: shifts subsequent rows by `delta` pixels.
    pub fn indent(&mut self, delta: i32) { self.tree.current_ctx_mut().layout.adjust_indent(delta); }

    /// Reserves the next layout cell of `size` in the current context.
    pub fn next_rect(&mut self, size: Vec2i) -> Recti { self.tree.current_ctx_mut().layout.next(size) }

    /// Switches the current context to the deferred log (`true`) or back to what it used before.
    ///
    /// Every `true` must be matched by a `false` in the same context.
    pub fn toggle_deferred_rendering(&mut self, on: bool) {
        let context = self.tree.current();
        if on {
            let ctx = self.tree.current_ctx_mut();
            self.sessions.push(SessionFlags { context, target: ctx.target, defer_events: ctx.defer_events });
            ctx.target = RenderTarget::Deferred;
            ctx.defer_events = true;
            self.pipeline.begin_session();
            self.clip_stacks.push(Vec::new());
            trace!(context = context.index(), depth = self.sessions.len(), "deferred rendering on");
        } else {
            let saved = self.sessions.pop().expect("deferred rendering turned off without being turned on");
            debug_assert_eq!(saved.context, context, "deferred rendering turned off in another context");
            let ctx = self.tree.get_mut(saved.context);
            ctx.target = saved.target;
            ctx.defer_events = saved.defer_events;
            self.pipeline.end_session();
            self.clip_stacks.pop();
            trace!(context = context.index(), depth = self.sessions.len(), "deferred rendering off");
        }
    }

    /// Marks the start or the end of a recorded block.
    pub fn record_range(&mut self, range: &mut RendererEventIndexRange, start: bool) { self.pipeline.record_range(range, start); }

    /// Draws the primitives of `range` to the renderer at `offset`, restricted to `clip`.
    pub fn render_range(&mut self, offset: Vec2i, range: &RendererEventIndexRange, clip: Option<Recti>) {
        let pipeline = &self.pipeline;
        let stack = &mut self.clip_stacks[0];
        self.renderer.scope_mut(|r| {
            pipeline.render(&mut *r, offset, range, clip);
            DrawCtx::new(r, stack).restore_clip();
        });
    }

    /// Replays the events of `range` at `offset` against the current input.
    pub fn handle_events(&mut self, offset: Vec2i, range: &RendererEventIndexRange, clip: Option<Recti>) -> Vec<(WidgetId, WidgetDrawResult)> {
        let events = self.pipeline.events(range, offset, clip);
        self.dispatch_events(events)
    }

    /// Puts a finished block in place: forwarded into the enclosing session when the current
    /// context records, drawn and dispatched otherwise. `leading` events go before the block's.
    pub(crate) fn place_range(
        &mut self,
        range: &RendererEventIndexRange,
        offset: Vec2i,
        clip: Recti,
        leading: Vec<DeferredEvent>,
    ) -> Vec<(WidgetId, WidgetDrawResult)> {
        if self.tree.current_ctx().target == RenderTarget::Deferred {
            for event in leading {
                self.pipeline.push_event(event);
            }
            let clip = clip_to(clip, self.current_clip_rect());
            self.pipeline.forward(range, offset, Some(clip));
            self.restore_clip();
            return Vec::new();
        }
        let clip = clip_to(clip, self.clip_stacks[0].last().copied());
        self.render_range(offset, range, Some(clip));
        let mut events = leading;
        events.extend(self.pipeline.events(range, offset, Some(clip)));
        self.dispatch_events(events)
    }

    pub(crate) fn blocked_by_popup(&self, context: ContextIndex, mouse: Vec2i) -> bool {
        match self.popups.block {
            Some((popup_ctx, r)) => rect_contains(r, mouse) && !self.tree.is_descendant(context, popup_ctx),
            None => false,
        }
    }

    pub(crate) fn hit(&self, event: &DeferredEvent) -> bool {
        let mouse = self.io.mouse_pos();
        rect_contains(event.geometry.hit_rect(), mouse)
            && event.clip.is_none_or(|c| rect_contains(c, mouse))
            && !self.blocked_by_popup(event.context, mouse)
    }

    /// Dispatches replayed events in capture order. Only the last captured, non-passive event
    /// under the pointer is hovered.
    pub(crate) fn dispatch_events(&mut self, events: Vec<DeferredEvent>) -> Vec<(WidgetId, WidgetDrawResult)> {
        let mut hovered = vec![false; events.len()];
        let mut claimed = false;
        for (i, event) in events.iter().enumerate().rev() {
            if event.geometry.is_passive() {
                hovered[i] = self.hit(event);
            } else if !claimed && self.hit(event) {
                hovered[i] = true;
                claimed = true;
            }
        }
        let mut results = Vec::with_capacity(events.len());
        for (event, hovered) in events.iter().zip(hovered) {
            let result = self.dispatch_event(event, hovered);
            self.tree.get_mut(event.context).arena_mut().get_mut(event.id).pending = Some(result);
            results.push((event.id, result));
        }
        results
    }

    /// Runs the handler of the event's widget type against the current input.
    pub(crate) fn dispatch_event(&mut self, event: &DeferredEvent, hovered: bool) -> WidgetDrawResult {
        let key = (event.context, event.id);
        trace!(id = ?event.id, context = event.context.index(), hovered, "dispatching event");
        let outcome = match event.geometry {
            EventGeometry::Label { .. } => self.label_event(key, hovered),
            EventGeometry::Button { .. } => self.button_event(key, hovered),
            EventGeometry::Checkbox { .. } => self.checkbox_event(key, hovered),
            EventGeometry::Slider { extent, thumb } => self.slider_event(key, extent, thumb, hovered),
            EventGeometry::TextInput { rect, text_origin } => self.text_input_event(key, rect, text_origin, hovered),
            EventGeometry::Viewport { .. } => self.viewport_event(key, hovered),
            EventGeometry::ScrollBar { axis, track, thumb } => self.scrollbar_event(key, axis, track, thumb, hovered),
            EventGeometry::TabItem { index, .. } => self.tab_event(key, index, hovered),
            EventGeometry::AccordionHeader { .. } => self.accordion_event(key, hovered),
            EventGeometry::GridColumnHandle { column, .. } => self.column_handle_event(key, column, hovered),
            EventGeometry::GridRow { row, .. } => self.grid_row_event(key, row, hovered),
        };
        WidgetDrawResult::new(outcome, event.geometry.hit_rect())
    }

    /// Records the interaction of `id` (owned by `context`) for replay when the current context
    /// defers events, or evaluates it now. A deferred call hands back the result of the previous
    /// replay, or [`WidgetEvent::Deferred`] when there is none yet.
    pub(crate) fn emit(&mut self, context: ContextIndex, id: WidgetId, geometry: EventGeometry) -> WidgetDrawResult {
        let clip = self.current_clip_rect();
        let event = DeferredEvent { context, id, clip, geometry };
        if self.tree.current_ctx().defer_events {
            self.pipeline.push_event(event);
            let slot = self.tree.get_mut(context).arena_mut().get_mut(id);
            return slot.pending.take().unwrap_or(WidgetDrawResult::new(WidgetEvent::Deferred, geometry.hit_rect()));
        }
        let hovered = self.hit(&event);
        self.dispatch_event(&event, hovered)
    }

    /// Runs `f` between [`Runtime::begin_frame`] and [`Runtime::end_frame`].
    pub fn frame<F: FnOnce(&mut Self)>(&mut self, f: F) {
        self.begin_frame();
        f(self);
        self.end_frame();
    }

    /// Starts a frame: freezes the input, resets ephemeral ids and the root layout.
    pub fn begin_frame(&mut self) {
        assert!(!self.inside_frame, "begin_frame called twice without end_frame");
        self.frame += 1;
        self.io.prelude();
        let window = self.config.window_size;
        self.renderer.scope_mut(|r| r.begin(window));
        self.tree.begin_frame(window);
        self.clip_stacks.clear();
        self.clip_stacks.push(Vec::new());
        self.wheel_consumed = false;
        self.popups.begin_frame();
        self.inside_frame = true;
        trace!(frame = self.frame, "frame begun");
    }

    /// Ends a frame: renders popup overlays, applies deferred dismissals and clears the logs.
    pub fn end_frame(&mut self) {
        assert!(self.inside_frame, "end_frame called without begin_frame");
        assert!(self.sessions.is_empty(), "{} deferred session(s) still open at end_frame", self.sessions.len());
        assert_eq!(self.tree.current(), ContextIndex::ROOT, "a context was pushed and never popped");
        let excess = self.cascade.frame_end();
        if excess > 0 {
            warn!(excess, "style stack left unbalanced, force-popped at frame end");
        }
        self.flush_popups();
        self.pipeline.clear();
        self.io.epilogue();
        self.renderer.scope_mut(|r| r.end());
        self.inside_frame = false;
    }
}

impl<R: Renderer> DrawCtxAccess for Runtime<R> {
    fn with_draw_ctx<F, T>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut DrawCtx<'_>) -> T,
    {
        if self.tree.current_ctx().target == RenderTarget::Deferred && self.clip_stacks.len() > 1 {
            let top = self.clip_stacks.len() - 1;
            let stack = &mut self.clip_stacks[top];
            let mut draw = DrawCtx::new(self.pipeline.sink(), stack);
            return f(&mut draw);
        }
        let stack = &mut self.clip_stacks[0];
        self.renderer.scope_mut(|r| f(&mut DrawCtx::new(r, stack)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw_ops::DrawOps;
    use crate::test_support::*;

    #[test]
    fn init_rejects_invalid_config() {
        let config = Config { scrollbar_size: 0, ..Config::default() };
        let fonts = Box::new(TestFonts::new(&["default"], &[16]));
        let res = Runtime::init(config, RendererHandle::new(TestRenderer::default()), fonts, None);
        assert!(matches!(res, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn init_requires_default_font() {
        let fonts = Box::new(TestFonts::new(&["serif"], &[16]));
        let res = Runtime::init(Config::default(), RendererHandle::new(TestRenderer::default()), fonts, None);
        assert!(matches!(res, Err(Error::FontUnavailable { .. })));
    }

    #[test]
    fn ok_button_scenario() {
        let mut rt = test_runtime();
        let (id0, first) = rt.get_or_create_id(WidgetKey::Label("OK"), WidgetType::Button);
        assert!(first);
        assert_eq!(rt.get_or_create_id(WidgetKey::Label("OK"), WidgetType::Button), (id0, false));

        let default_bg = rt.resolve_style(id0, InteractionState::Default).bg_color;
        rt.push_style(StyleDescriptor::new().with_bg_color(Color::rgb_hex(0xFF0000)));
        assert_eq!(rt.resolve_style(id0, InteractionState::Default).bg_color.to_rgb_hex(), 0xFF0000);
        rt.pop_style();
        assert_eq!(rt.resolve_style(id0, InteractionState::Default).bg_color, default_bg);
    }

    #[test]
    fn two_state_bits_are_rejected() {
        let mut rt = test_runtime();
        let (id, _) = rt.get_or_create_id(WidgetKey::Label("x"), WidgetType::Button);
        let res = rt.resolve_style_bits(id, WidgetStates::HOVERED | WidgetStates::PRESSED);
        assert!(matches!(res, Err(Error::AmbiguousInteractionState(_))));
        assert!(rt.resolve_style_bits(id, WidgetStates::HOVERED).is_ok());
    }

    #[test]
    fn unkeyed_ids_follow_call_order() {
        let mut rt = test_runtime();
        let mut first = Vec::new();
        rt.frame(|ui| {
            first.push(ui.ephemeral_id(WidgetType::Label));
            ui.get_or_create_id(WidgetKey::Label("title"), WidgetType::Label);
            first.push(ui.ephemeral_id(WidgetType::Label));
        });
        assert!(first.iter().all(|(_, fresh)| *fresh));
        assert_ne!(first[0].0, first[1].0);

        let mut second = Vec::new();
        rt.frame(|ui| {
            second.push(ui.ephemeral_id(WidgetType::Label));
            second.push(ui.ephemeral_id(WidgetType::Label));
        });
        assert_eq!(second, vec![(first[0].0, false), (first[1].0, false)]);
    }

    #[test]
    fn resolving_binds_font_lazily() {
        let mut rt = test_runtime();
        let (id, _) = rt.get_or_create_id(WidgetKey::Label("x"), WidgetType::Label);
        let style = rt.resolve_style(id, InteractionState::Default);
        assert!(style.font.is_some());
    }

    #[test]
    fn deferred_rect_replays_at_offset() {
        let mut rt = test_runtime();
        rt.begin_frame();
        let mut range = RendererEventIndexRange::default();
        rt.toggle_deferred_rendering(true);
        rt.record_range(&mut range, true);
        rt.draw_rect(rect(0, 0, 10, 10), Color::rgb_hex(0xFFFFFF));
        rt.record_range(&mut range, false);
        rt.toggle_deferred_rendering(false);
        assert_eq!(range.primitives, IndexRange::new(0, 1));
        rt.render_range(vec2(5, 5), &range, None);
        rt.end_frame();
        let rects = rt.renderer_handle().scope(|r| r.rects());
        assert_eq!(rects.iter().map(|r| rect_tuple(*r)).collect::<Vec<_>>(), vec![(5, 5, 10, 10)]);
    }

    #[test]
    fn toggling_restores_flags() {
        let mut rt = test_runtime();
        rt.begin_frame();
        rt.toggle_deferred_rendering(true);
        assert_eq!(rt.contexts().current_ctx().target(), RenderTarget::Deferred);
        rt.toggle_deferred_rendering(true);
        rt.toggle_deferred_rendering(false);
        assert_eq!(rt.contexts().current_ctx().target(), RenderTarget::Deferred);
        rt.toggle_deferred_rendering(false);
        assert_eq!(rt.contexts().current_ctx().target(), RenderTarget::Immediate);
        assert!(!rt.contexts().current_ctx().defers_events());
        rt.end_frame();
    }

    #[test]
    #[should_panic]
    fn end_frame_with_open_session_panics() {
        let mut rt = test_runtime();
        rt.begin_frame();
        rt.toggle_deferred_rendering(true);
        rt.end_frame();
    }

    #[test]
    fn unbalanced_style_stack_is_corrected() {
        let mut rt = test_runtime();
        rt.frame(|ui| ui.push_style(StyleDescriptor::new().with_padding(1)));
        assert_eq!(rt.cascade_mut().depth(), 0);
    }

    #[test]
    fn last_drawn_event_wins() {
        let mut rt = test_runtime();
        rt.io_mut().mousemove(5, 5);
        rt.begin_frame();
        let (a, _) = rt.get_or_create_id(WidgetKey::Label("a"), WidgetType::Button);
        let (b, _) = rt.get_or_create_id(WidgetKey::Label("b"), WidgetType::Button);
        let events = [a, b]
            .into_iter()
            .map(|id| DeferredEvent { context: ContextIndex::ROOT, id, clip: None, geometry: EventGeometry::Button { rect: rect(0, 0, 10, 10) } })
            .collect();
        let results = rt.dispatch_events(events);
        assert_eq!(results[0].1.event, WidgetEvent::None);
        assert_eq!(results[1].1.event, WidgetEvent::Hovered);
        rt.end_frame();
    }
}
