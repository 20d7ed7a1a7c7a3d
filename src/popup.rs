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
use crate::container::{ContainerFrame, ContainerKind};
use crate::draw_ops::DrawOps;
use crate::*;
use tracing::{debug, warn};

/// A finished popup waiting to be drawn over the rest of the frame.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Overlay {
    pub context: ContextIndex,
    pub range: RendererEventIndexRange,
    pub rect: Recti,
}

/// Frame and cross-frame bookkeeping of the single active popup.
#[derive(Default, Debug)]
pub(crate) struct PopupTracker {
    /// Open popup as (declaring context, popup id).
    pub active: Option<(ContextIndex, WidgetId)>,
    /// Frame the active popup was opened in.
    pub opened_at: u64,
    /// Context of the popup between `begin_popup` and `end_popup`.
    pub building: Option<ContextIndex>,
    pub overlays: Vec<Overlay>,
    /// Popup context and rectangle of the previous frame; the pointer over it belongs to the popup.
    pub block: Option<(ContextIndex, Recti)>,
    /// Context menu options added this frame.
    pub menu_options: Vec<String>,
}

impl PopupTracker {
    pub fn begin_frame(&mut self) {
        self.menu_options.clear();
        self.overlays.clear();
        self.building = None;
    }
}

impl<R: Renderer> Runtime<R> {
    fn popup_state(&mut self, key: (ContextIndex, WidgetId)) -> Option<&mut PopupState> { self.tree.get_mut(key.0).arena_mut().state_mut(key.1).as_popup_mut() }

    /// Opens the popup `label` at `position` (the pointer when `None`).
    ///
    /// Only one popup may be open; opening another one while it is fails and returns `false`.
    pub fn open_popup(&mut self, label: &str, position: Option<Vec2i>) -> bool {
        let (id, _) = self.get_or_create_id(WidgetKey::Label(label), WidgetType::Popup);
        let key = (self.tree.current(), id);
        if let Some(active) = self.popups.active {
            if active != key {
                warn!(label, "popup rejected, another popup is open");
                return false;
            }
        }
        let position = position.unwrap_or(self.io.mouse_pos());
        if let Some(s) = self.popup_state(key) {
            s.open = true;
            s.position = position;
            s.remove_at_frame_exit = false;
        }
        self.popups.active = Some(key);
        self.popups.opened_at = self.frame_count();
        debug!(label, x = position.x, y = position.y, "popup opened");
        true
    }

    /// Returns `true` when the popup `label` of the current context is open.
    pub fn is_popup_open(&self, label: &str) -> bool {
        let ctx = self.tree.current_ctx();
        let Some(id) = ctx.registry().lookup(WidgetKey::Label(label), WidgetType::Popup) else { return false };
        ctx.arena().get(id).and_then(|slot| slot.state.as_popup()).is_some_and(|s| s.open)
    }

    /// Closes the open popup when the frame ends.
    pub fn remove_popup(&mut self) {
        if let Some(key) = self.popups.active {
            if let Some(s) = self.popup_state(key) {
                s.remove_at_frame_exit = true;
            }
        }
    }

    /// Starts the content of the popup `label`, `width` pixels wide. Returns `false` when it is
    /// not open, in which case [`Runtime::end_popup`] must not be called.
    ///
    /// Content widgets live in the popup's own context and report on their next call.
    pub fn begin_popup(&mut self, label: &str, width: i32) -> bool {
        let Some(id) = self.tree.current_ctx().registry().lookup(WidgetKey::Label(label), WidgetType::Popup) else { return false };
        let key = (self.tree.current(), id);
        if self.popups.active != Some(key) {
            return false;
        }
        if self.popups.building.is_some() {
            warn!(label, "begin_popup rejected, another popup is being built");
            return false;
        }
        let escape = self.io.is_key_pressed(Key::Escape);
        let Some(s) = self.popup_state(key) else { return false };
        if !s.open {
            return false;
        }
        if escape {
            s.remove_at_frame_exit = true;
            return false;
        }

        let child = self.push_context(id);
        self.popups.building = Some(child);
        let padding = self.config.popup_padding;
        let range = self.open_block(rect(0, 0, (width - 2 * padding).max(0), 0));
        self.push_container(ContainerFrame { id, range, kind: ContainerKind::Popup { padding } });
        true
    }

    /// Finishes the popup content: sizes the popup, keeps it inside the window and queues it
    /// for drawing at the end of the frame.
    pub fn end_popup(&mut self) {
        let frame = self.pop_container("end_popup");
        let ContainerKind::Popup { padding } = frame.kind else {
            panic!("end_popup closes a {:?}", frame.kind);
        };
        let width = self.tree.current_ctx().layout.current_body().width + 2 * padding;
        let (range, content) = self.close_block(frame.range);
        let child = self.tree.current();
        let owner = self.tree.get(child).parent().unwrap_or(ContextIndex::ROOT);
        let key = (owner, frame.id);

        let window = self.config.window_size;
        let size = vec2(width, content.y + 2 * padding);
        let position = self.popup_state(key).map_or(vec2(0, 0), |s| s.position);
        let x = position.x.min(window.x - size.x).max(0);
        let y = position.y.min(window.y - size.y).max(0);
        let popup_rect = rect(x, y, size.x, size.y);
        if let Some(s) = self.popup_state(key) {
            s.size = size;
        }

        // the overlay is recorded in screen coordinates and kept out of every enclosing replay
        let style = self.resolve_style_in(owner, frame.id, InteractionState::Default);
        self.toggle_deferred_rendering(true);
        let mut overlay = RendererEventIndexRange::default();
        self.record_range(&mut overlay, true);
        self.draw_frame(popup_rect, &style);
        self.pipeline.forward(&range, vec2(x + padding, y + padding), Some(popup_rect));
        self.restore_clip();
        self.record_range(&mut overlay, false);
        self.toggle_deferred_rendering(false);
        self.pipeline.detach(overlay);

        self.popups.overlays.push(Overlay { context: child, range: overlay, rect: popup_rect });
        self.popups.building = None;
        self.pop_context();
    }

    /// Draws the queued popups over the frame, replays their events and applies dismissals.
    pub(crate) fn flush_popups(&mut self) {
        let overlays = std::mem::take(&mut self.popups.overlays);
        let mut block = None;
        for overlay in overlays {
            self.render_range(vec2(0, 0), &overlay.range, None);
            self.handle_events(vec2(0, 0), &overlay.range, None);
            block = Some((overlay.context, overlay.rect));

            let mouse = self.io.mouse_pos();
            let pressed = self.io.clicked() || self.io.is_right_clicked();
            let fresh = self.popups.opened_at == self.frame_count();
            if pressed && !fresh && !rect_contains(overlay.rect, mouse) {
                self.remove_popup();
            }
        }

        if let Some(key) = self.popups.active {
            let closing = self.popup_state(key).is_none_or(|s| s.remove_at_frame_exit || !s.open);
            if closing {
                if let Some(s) = self.popup_state(key) {
                    s.open = false;
                    s.remove_at_frame_exit = false;
                }
                if let Some(child) = self.tree.child(key.0, key.1) {
                    self.tree.soft_reset(child);
                }
                self.popups.active = None;
                block = None;
                debug!(id = ?key.1, "popup closed");
            }
        }
        self.popups.block = block;
    }

    /// Adds an option to the context menu shown by the next [`Runtime::context_menu`] call.
    pub fn add_context_menu_option(&mut self, label: &str) { self.popups.menu_options.push(label.to_string()); }

    /// Context menu over `area` (the last laid out widget when `None`), opened by a right click.
    /// Returns the option picked, which also closes the menu.
    pub fn context_menu(&mut self, label: &str, area: Option<Recti>, width: i32) -> Option<usize> {
        let area = area.unwrap_or(self.tree.current_ctx().layout.last_rect);
        let mouse = self.io.mouse_pos();
        let context = self.tree.current();
        if self.io.is_right_clicked() && rect_contains(area, mouse) && !self.blocked_by_popup(context, mouse) {
            self.open_popup(label, Some(mouse));
        }
        let options = std::mem::take(&mut self.popups.menu_options);
        let mut picked = None;
        if self.begin_popup(label, width) {
            for (index, option) in options.iter().enumerate() {
                if self.button(option).clicked() {
                    picked = Some(index);
                }
            }
            self.end_popup();
        }
        if picked.is_some() {
            self.remove_popup();
        }
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    fn menu(ui: &mut Runtime<TestRenderer>) {
        if ui.begin_popup("menu", 120) {
            ui.label("inside");
            ui.end_popup();
        }
    }

    #[test]
    fn popup_is_drawn_over_the_frame() {
        let mut rt = test_runtime();
        rt.frame(|ui| {
            assert!(ui.open_popup("menu", Some(vec2(50, 50))));
            menu(ui);
            ui.label("under");
        });
        let texts = rt.renderer_handle().scope(|r| r.texts());
        let names: Vec<&str> = texts.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(names, ["under", "inside"]);
        // popup at (50, 50), padding 4, label padding 5
        assert_eq!((texts[1].1.x, texts[1].1.y), (59, 59));
    }

    #[test]
    fn second_popup_is_rejected() {
        let mut rt = test_runtime();
        rt.frame(|ui| {
            assert!(ui.open_popup("menu", None));
            assert!(!ui.open_popup("other", None));
            assert!(ui.open_popup("menu", None));
        });
    }

    #[test]
    fn popup_is_clamped_to_the_window() {
        let mut rt = test_runtime();
        let mut size = Vec2i::default();
        rt.frame(|ui| {
            ui.open_popup("menu", Some(vec2(630, 470)));
            menu(ui);
        });
        rt.frame(|ui| {
            menu(ui);
            let id = ui.contexts().current_ctx().registry().lookup(WidgetKey::Label("menu"), WidgetType::Popup).unwrap();
            size = ui.widget_state(id).and_then(|s| s.as_popup()).map(|s| s.size).unwrap();
        });
        assert_eq!((size.x, size.y), (120, 26 + 8));
        let block = rt.popups.block.map(|(_, r)| rect_tuple(r));
        assert_eq!(block, Some((640 - 120, 480 - 34, 120, 34)));
    }

    #[test]
    fn outside_click_closes_at_frame_exit() {
        let mut rt = test_runtime();
        rt.frame(|ui| {
            ui.open_popup("menu", Some(vec2(50, 50)));
            menu(ui);
        });
        rt.io_mut().mousemove(400, 400);
        rt.io_mut().mousedown(400, 400, MouseButton::LEFT);
        let mut open_during = false;
        rt.frame(|ui| {
            menu(ui);
            open_during = ui.is_popup_open("menu");
        });
        assert!(open_during);
        rt.frame(|ui| assert!(!ui.is_popup_open("menu")));
        assert!(rt.popups.active.is_none());
    }

    #[test]
    fn escape_dismisses() {
        let mut rt = test_runtime();
        rt.frame(|ui| {
            ui.open_popup("menu", None);
            menu(ui);
        });
        rt.io_mut().keydown(Key::Escape);
        rt.frame(menu);
        rt.frame(|ui| assert!(!ui.is_popup_open("menu")));
    }

    #[test]
    fn popup_hides_pointer_from_widgets_beneath() {
        let mut rt = test_runtime();
        rt.frame(|ui| {
            ui.open_popup("menu", Some(vec2(0, 0)));
            menu(ui);
        });
        rt.io_mut().mousemove(5, 5);
        rt.io_mut().mousedown(5, 5, MouseButton::LEFT);
        let mut under = WidgetDrawResult::default();
        rt.frame(|ui| {
            under = ui.button("below");
            menu(ui);
        });
        assert!(under.is_none());
    }

    #[test]
    fn context_menu_reports_the_picked_option() {
        let mut rt = test_runtime();
        let run = |rt: &mut Runtime<TestRenderer>| {
            let mut picked = None;
            rt.frame(|ui| {
                ui.label("target");
                ui.add_context_menu_option("Copy");
                ui.add_context_menu_option("Paste");
                picked = ui.context_menu("ctx", None, 100);
            });
            picked
        };
        rt.io_mut().mousemove(10, 10);
        rt.io_mut().mousedown(10, 10, MouseButton::RIGHT);
        assert_eq!(run(&mut rt), None);
        rt.io_mut().mouseup(10, 10, MouseButton::RIGHT);
        // menu at (10, 10): "Copy" at (14, 14, 44, 24), "Paste" below at y 42
        rt.io_mut().mousemove(20, 45);
        rt.io_mut().mousedown(20, 45, MouseButton::LEFT);
        assert_eq!(run(&mut rt), None);
        rt.io_mut().mouseup(20, 45, MouseButton::LEFT);
        assert_eq!(run(&mut rt), Some(1));
        assert_eq!(run(&mut rt), None);
        assert!(rt.popups.active.is_none());
    }
}
