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
use crate::*;

type Key2 = (ContextIndex, WidgetId);

fn shrink(r: Recti, n: i32) -> Recti { expand_rect(r, -n) }

fn insert_text(buf: &mut String, cursor: &mut usize, text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let insert_at = (*cursor).min(buf.len());
    buf.insert_str(insert_at, text);
    *cursor = insert_at + text.len();
    true
}

fn delete_prev(buf: &mut String, cursor: &mut usize) -> bool {
    if buf.is_empty() || *cursor == 0 {
        return false;
    }
    let start = move_left(buf, *cursor);
    buf.replace_range(start..*cursor, "");
    *cursor = start;
    true
}

fn delete_next(buf: &mut String, cursor: usize) -> bool {
    if cursor >= buf.len() {
        return false;
    }
    let end = move_right(buf, cursor);
    buf.replace_range(cursor..end, "");
    true
}

fn move_left(buf: &str, cursor: usize) -> usize {
    if cursor == 0 {
        return 0;
    }
    let mut new_cursor = cursor - 1;
    while new_cursor > 0 && !buf.is_char_boundary(new_cursor) {
        new_cursor -= 1;
    }
    new_cursor
}

fn move_right(buf: &str, cursor: usize) -> usize {
    if cursor >= buf.len() {
        return buf.len();
    }
    let mut new_cursor = cursor + 1;
    while new_cursor < buf.len() && !buf.is_char_boundary(new_cursor) {
        new_cursor += 1;
    }
    new_cursor
}

/// Byte offset of the char boundary closest to `target_x` pixels into `buf`.
pub(crate) fn caret_from_x(buf: &str, target_x: i32, measure: impl Fn(&str) -> i32) -> usize {
    if target_x <= 0 {
        return 0;
    }
    let mut last_width = 0;
    for (idx, ch) in buf.char_indices() {
        let next = idx + ch.len_utf8();
        let width = measure(&buf[..next]);
        if target_x < width {
            if target_x < (last_width + width) / 2 {
                return idx;
            }
            return next;
        }
        last_width = width;
    }
    buf.len()
}

fn delete_selection(s: &mut TextInputState) -> bool {
    match s.selection() {
        Some((a, b)) => {
            s.text.replace_range(a..b, "");
            s.caret = a;
            s.anchor = None;
            true
        }
        None => {
            s.anchor = None;
            false
        }
    }
}

fn replace_selection(s: &mut TextInputState, text: &str) -> bool {
    let removed = delete_selection(s);
    insert_text(&mut s.text, &mut s.caret, text) || removed
}

fn move_caret(s: &mut TextInputState, to: usize, extend: bool) {
    if extend {
        if s.anchor.is_none() {
            s.anchor = Some(s.caret);
        }
    } else {
        s.anchor = None;
    }
    s.caret = to;
}

fn clamp_caret(text: &str, caret: usize) -> usize {
    if caret >= text.len() || !text.is_char_boundary(caret) { text.len() } else { caret }
}

fn hover_event(hovered: bool) -> WidgetEvent { if hovered { WidgetEvent::Hovered } else { WidgetEvent::None } }

impl<R: Renderer> Runtime<R> {
    pub(crate) fn state_of(&mut self, id: WidgetId) -> &mut WidgetState { self.tree.current_ctx_mut().arena_mut().state_mut(id) }

    /// Static text. `text` may carry `#id .class` selectors, which are not displayed.
    pub fn label(&mut self, text: &str) -> WidgetDrawResult {
        let (id, _) = self.get_or_create_id(WidgetKey::Label(text), WidgetType::Label);
        self.label_with_id(id, LabelDecoration::parse(text).display)
    }

    /// Unkeyed static text, shown verbatim. Its id is assigned by call order within the frame.
    pub fn text(&mut self, text: &str) -> WidgetDrawResult {
        let (id, _) = self.ephemeral_id(WidgetType::Label);
        self.label_with_id(id, text)
    }

    fn label_with_id(&mut self, id: WidgetId, display: &str) -> WidgetDrawResult {
        let hovered = self.state_of(id).as_label().is_some_and(|s| s.hovered);
        let style = self.resolve_style(id, if hovered { InteractionState::Hovered } else { InteractionState::Default });
        let size = self.text_size(&style, display);
        let inset = style.margin + style.border_width + style.padding;
        let height = (size.y + 2 * inset).max(self.config.default_widget_height);
        let margin = self.next_rect(vec2(size.x + 2 * inset, height));
        let border = shrink(margin, style.margin);
        let padding = shrink(border, style.border_width);
        let content = shrink(padding, style.padding);
        self.draw_frame(border, &style);
        self.draw_control_text(display, padding, &style, size);
        let context = self.tree.current();
        self.emit(context, id, EventGeometry::Label { margin, border, padding, content })
    }

    /// Push button sized to its caption.
    pub fn button(&mut self, label: &str) -> WidgetDrawResult {
        let (id, _) = self.get_or_create_id(WidgetKey::Label(label), WidgetType::Button);
        let display = LabelDecoration::parse(label).display;
        let state = match self.state_of(id).as_button() {
            Some(s) if s.pressed => InteractionState::Pressed,
            Some(s) if s.hovered => InteractionState::Hovered,
            _ => InteractionState::Default,
        };
        let style = self.resolve_style(id, state);
        let size = self.text_size(&style, display);
        let inset = style.padding + style.border_width;
        let r = self.next_rect(vec2(size.x + 2 * inset, 0));
        self.draw_frame(r, &style);
        self.draw_control_text(display, r, &style, size);
        let context = self.tree.current();
        self.emit(context, id, EventGeometry::Button { rect: r })
    }

    fn sync_checkbox(&mut self, id: WidgetId, value: &mut bool) {
        if let Some(s) = self.state_of(id).as_checkbox_mut() {
            if s.pending_toggle {
                *value = s.checked;
                s.pending_toggle = false;
            } else {
                s.checked = *value;
            }
        }
    }

    /// Checkbox bound to `value`; its identity is the address of `value`.
    pub fn checkbox(&mut self, label: &str, value: &mut bool) -> WidgetDrawResult {
        let (id, _) = self.get_or_create_id(WidgetKey::from_ptr(&*value), WidgetType::Checkbox);
        self.sync_checkbox(id, value);
        let (hovered, checked) = self.state_of(id).as_checkbox().map_or((false, false), |s| (s.hovered, s.checked));
        let state = if hovered { InteractionState::Hovered } else { InteractionState::Default };
        let style = self.resolve_style(id, state);
        let size = self.text_size(&style, label);
        let side = self.config.default_widget_height;
        let r = self.next_rect(vec2(side + style.padding + size.x, side));
        let box_rect = rect(r.x, r.y, side, side);
        let label_rect = rect(r.x + side + style.padding, r.y, size.x, side);
        self.draw_frame(box_rect, &style);
        if checked {
            let mark = self.resolve_style(id, InteractionState::Checked);
            let b = shrink(box_rect, side / 4);
            let tick = [vec2(b.x, b.y + b.height / 2), vec2(b.x + b.width / 3, b.y + b.height), vec2(b.x + b.width, b.y)];
            self.draw_polyline(&tick, mark.fg_color, 2);
        }
        let mut text_style = style.clone();
        text_style.alignment = TextAlign::Left;
        text_style.padding = 0;
        self.draw_control_text(label, label_rect, &text_style, size);
        let context = self.tree.current();
        let result = self.emit(context, id, EventGeometry::Checkbox { box_rect, label: label_rect });
        self.sync_checkbox(id, value);
        result
    }

    fn sync_slider(&mut self, id: WidgetId, value: &mut f32, min: f32, max: f32) {
        if let Some(s) = self.state_of(id).as_slider_mut() {
            s.min = min;
            s.max = max;
            match s.pending_value.take() {
                Some(v) => *value = v,
                None => s.value = value.clamp(min.min(max), max.max(min)),
            }
        }
    }

    /// Horizontal slider bound to `value` in `[min, max]`; its identity is the address of `value`.
    pub fn slider(&mut self, value: &mut f32, min: f32, max: f32) -> WidgetDrawResult {
        let (id, _) = self.get_or_create_id(WidgetKey::from_ptr(&*value), WidgetType::Slider);
        self.sync_slider(id, value, min, max);
        let (hovered, dragging, v) = self.state_of(id).as_slider().map_or((false, false, min), |s| (s.hovered, s.dragging, s.value));
        let state = if dragging {
            InteractionState::Pressed
        } else if hovered {
            InteractionState::Hovered
        } else {
            InteractionState::Default
        };
        let style = self.resolve_style(id, state);
        let r = self.next_rect(vec2(0, 0));
        let thumb_w = self.config.thumb_size.min(r.width);
        let available = (r.width - thumb_w).max(0);
        let x = if max > min { ((v - min) / (max - min) * available as f32) as i32 } else { 0 };
        let thumb = rect(r.x + x, r.y, thumb_w, r.height);
        self.draw_frame(r, &style);
        let thumb_style = self.resolve_style(id, InteractionState::Pressed);
        self.draw_rect(thumb, thumb_style.bg_color);
        let text = format!("{v:.2}");
        let size = self.text_size(&style, &text);
        self.draw_control_text(&text, r, &style, size);
        let context = self.tree.current();
        let result = self.emit(context, id, EventGeometry::Slider { extent: r, thumb });
        self.sync_slider(id, value, min, max);
        result
    }

    fn sync_text_input(&mut self, id: WidgetId, value: &mut String) -> bool {
        let Some(s) = self.state_of(id).as_text_input_mut() else { return false };
        if s.dirty {
            s.dirty = false;
            if *value != s.text {
                value.clone_from(&s.text);
                return true;
            }
        } else if !s.focused && *value != s.text {
            s.text.clone_from(value);
            s.anchor = None;
        }
        s.caret = clamp_caret(&s.text, s.caret);
        false
    }

    /// Single line text editor bound to `value`; its identity is the address of `value`.
    ///
    /// Edits made during a deferred replay reach `value` on the next call.
    pub fn text_input(&mut self, value: &mut String) -> WidgetDrawResult {
        let (id, _) = self.get_or_create_id(WidgetKey::from_ptr(&*value), WidgetType::TextInput);
        let applied = self.sync_text_input(id, value);
        let focused = self.focus == Some((self.tree.current(), id));
        let state = if focused { InteractionState::Focused } else { InteractionState::Default };
        let style = self.resolve_style(id, state);
        let r = self.next_rect(vec2(0, 0));
        let inner = shrink(r, style.padding);
        let (text, caret, selection, scroll_x) = {
            let s = self.state_of(id).as_text_input_mut();
            match s {
                Some(s) => {
                    s.font = style.font;
                    s.font_size = style.font_size;
                    (s.text.clone(), s.caret, s.selection(), s.scroll_x)
                }
                None => (String::new(), 0, None, 0),
            }
        };
        let caret_px = self.measure(style.font, style.font_size, &text[..caret]);
        let mut scroll_x = scroll_x;
        if caret_px - scroll_x > inner.width {
            scroll_x = caret_px - inner.width;
        }
        if caret_px < scroll_x {
            scroll_x = caret_px;
        }
        if let Some(s) = self.state_of(id).as_text_input_mut() {
            s.scroll_x = scroll_x;
        }
        let text_h = self.text_size(&style, "").y.max(self.text_size(&style, &text).y);
        let origin = vec2(inner.x - scroll_x, r.y + (r.height - text_h) / 2);

        self.draw_frame(r, &style);
        self.push_clip_rect(inner);
        if let Some((a, b)) = selection.filter(|_| focused) {
            let x0 = self.measure(style.font, style.font_size, &text[..a]);
            let x1 = self.measure(style.font, style.font_size, &text[..b]);
            let sel = self.resolve_style(id, InteractionState::Selected);
            self.draw_rect(rect(origin.x + x0, origin.y, x1 - x0, text_h), sel.bg_color);
        }
        self.draw_text(&style, &text, origin, style.fg_color);
        if focused {
            let x = origin.x + caret_px;
            self.draw_line(vec2(x, origin.y), vec2(x, origin.y + text_h), style.fg_color, 1);
        }
        self.pop_clip_rect();

        let context = self.tree.current();
        let mut result = self.emit(context, id, EventGeometry::TextInput { rect: r, text_origin: origin });
        let submitted = self.state_of(id).as_text_input_mut().is_some_and(|s| std::mem::take(&mut s.submitted));
        if self.sync_text_input(id, value) || (applied && result.is_deferred()) {
            result.event = WidgetEvent::Edited;
        }
        if submitted {
            result.event = WidgetEvent::Submitted;
        }
        result
    }

    pub(crate) fn label_event(&mut self, key: Key2, hovered: bool) -> WidgetEvent {
        let io = &self.io;
        let Some(s) = self.tree.get_mut(key.0).arena_mut().state_mut(key.1).as_label_mut() else { return WidgetEvent::None };
        s.hovered = hovered;
        if hovered && io.clicked() { WidgetEvent::Clicked } else { hover_event(hovered) }
    }

    pub(crate) fn button_event(&mut self, key: Key2, hovered: bool) -> WidgetEvent {
        let io = &self.io;
        let Some(s) = self.tree.get_mut(key.0).arena_mut().state_mut(key.1).as_button_mut() else { return WidgetEvent::None };
        s.hovered = hovered;
        if hovered && io.clicked() {
            s.pressed = true;
            self.active = Some(key);
        } else if s.pressed && !io.is_left_mouse_down() {
            s.pressed = false;
            if self.active == Some(key) {
                self.active = None;
            }
        }
        if !hovered {
            return if s.pressed { WidgetEvent::Pressed } else { WidgetEvent::None };
        }
        if io.is_left_mouse_double_clicked() {
            WidgetEvent::DoubleClicked
        } else if io.clicked() {
            WidgetEvent::Clicked
        } else if io.is_right_clicked() {
            WidgetEvent::RightClicked
        } else if s.pressed {
            WidgetEvent::Pressed
        } else {
            WidgetEvent::Hovered
        }
    }

    pub(crate) fn checkbox_event(&mut self, key: Key2, hovered: bool) -> WidgetEvent {
        let io = &self.io;
        let Some(s) = self.tree.get_mut(key.0).arena_mut().state_mut(key.1).as_checkbox_mut() else { return WidgetEvent::None };
        s.hovered = hovered;
        if hovered && io.clicked() {
            s.checked = !s.checked;
            s.pending_toggle = true;
            return WidgetEvent::Toggled;
        }
        hover_event(hovered)
    }

    pub(crate) fn slider_event(&mut self, key: Key2, extent: Recti, thumb: Recti, hovered: bool) -> WidgetEvent {
        let io = &self.io;
        let Some(s) = self.tree.get_mut(key.0).arena_mut().state_mut(key.1).as_slider_mut() else { return WidgetEvent::None };
        s.hovered = hovered;
        let mouse = io.mouse_pos();
        let mut event = hover_event(hovered);
        if hovered && io.clicked() {
            s.dragging = true;
            s.drag_offset = if rect_contains(thumb, mouse) { mouse.x - thumb.x } else { thumb.width / 2 };
            self.active = Some(key);
            event = WidgetEvent::DragStarted;
        }
        if !s.dragging {
            return event;
        }
        if io.is_left_mouse_down() {
            let usable = (extent.width - thumb.width).max(1);
            let t = ((mouse.x - s.drag_offset - extent.x) as f32 / usable as f32).clamp(0.0, 1.0);
            let v = if s.max > s.min { s.min + t * (s.max - s.min) } else { s.min };
            if v != s.value {
                s.value = v;
                s.pending_value = Some(v);
                event = WidgetEvent::Edited;
            } else if event != WidgetEvent::DragStarted {
                event = WidgetEvent::Dragged;
            }
        } else {
            s.dragging = false;
            if self.active == Some(key) {
                self.active = None;
            }
            event = WidgetEvent::DragEnded;
        }
        event
    }

    pub(crate) fn text_input_event(&mut self, key: Key2, _rect: Recti, text_origin: Vec2i, hovered: bool) -> WidgetEvent {
        let io = &mut self.io;
        let renderer = &self.renderer;
        let Some(s) = self.tree.get_mut(key.0).arena_mut().state_mut(key.1).as_text_input_mut() else { return WidgetEvent::None };
        let (font, size) = (s.font.unwrap_or_default(), s.font_size);
        let measure = |t: &str| renderer.scope(|r| r.get_text_size(t, font, size, None).x);
        let mouse = io.mouse_pos();
        let mods = io.modifiers();

        if s.focused && self.focus != Some(key) {
            s.focused = false;
            s.anchor = None;
        }
        if io.clicked() {
            if hovered {
                let caret = caret_from_x(&s.text, mouse.x - text_origin.x, &measure);
                move_caret(s, caret, mods.is_shift() && s.focused);
                s.focused = true;
                self.focus = Some(key);
            } else if s.focused {
                s.focused = false;
                s.anchor = None;
                self.focus = None;
            }
        } else if s.focused && hovered && io.is_left_mouse_down() {
            let caret = caret_from_x(&s.text, mouse.x - text_origin.x, &measure);
            if caret != s.caret {
                move_caret(s, caret, true);
            }
        }
        if !s.focused {
            return hover_event(hovered);
        }

        let mut changed = false;
        let mut submitted = false;
        let typed: String = io.text().chars().filter(|c| !c.is_control()).collect();
        if !mods.is_ctrl() && !typed.is_empty() {
            changed |= replace_selection(s, &typed);
        }
        for k in io.keys().to_vec() {
            let shift = mods.is_shift();
            match k {
                Key::Backspace => changed |= delete_selection(s) || delete_prev(&mut s.text, &mut s.caret),
                Key::Delete => changed |= delete_selection(s) || delete_next(&mut s.text, s.caret),
                Key::Left => move_caret(s, move_left(&s.text, s.caret), shift),
                Key::Right => move_caret(s, move_right(&s.text, s.caret), shift),
                Key::Home => move_caret(s, 0, shift),
                Key::End => move_caret(s, s.text.len(), shift),
                Key::Enter => {
                    s.submitted = true;
                    submitted = true;
                }
                Key::Escape => {
                    s.focused = false;
                    s.anchor = None;
                    self.focus = None;
                    break;
                }
                Key::Char(c) if mods.is_ctrl() => match c.to_ascii_lowercase() {
                    'a' => {
                        s.anchor = Some(0);
                        s.caret = s.text.len();
                    }
                    'c' => {
                        if let Some((a, b)) = s.selection() {
                            io.clipboard_set(&s.text[a..b]);
                        }
                    }
                    'x' => {
                        if let Some((a, b)) = s.selection() {
                            io.clipboard_set(&s.text[a..b]);
                            changed |= delete_selection(s);
                        }
                    }
                    'v' => {
                        if let Some(pasted) = io.clipboard_get() {
                            let line: String = pasted.chars().filter(|c| !c.is_control()).collect();
                            changed |= replace_selection(s, &line);
                        }
                    }
                    _ => (),
                },
                _ => (),
            }
        }
        if changed {
            s.dirty = true;
        }
        if submitted {
            WidgetEvent::Submitted
        } else if changed {
            WidgetEvent::Edited
        } else if hovered && io.is_left_mouse_down() {
            WidgetEvent::Pressed
        } else {
            hover_event(hovered)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    fn click_at(rt: &mut Runtime<TestRenderer>, x: i32, y: i32) {
        rt.io_mut().mousemove(x, y);
        rt.io_mut().mousedown(x, y, MouseButton::LEFT);
    }

    fn release(rt: &mut Runtime<TestRenderer>) {
        let p = rt.io().mouse_pos();
        rt.io_mut().mouseup(p.x, p.y, MouseButton::LEFT);
    }

    #[test]
    fn button_reports_click_immediately() {
        let mut rt = test_runtime();
        click_at(&mut rt, 5, 5);
        let mut res = WidgetDrawResult::default();
        rt.frame(|ui| res = ui.button("OK"));
        assert!(res.clicked());
        assert_eq!(rect_tuple(res.geometry), (0, 0, 28, 24));

        release(&mut rt);
        rt.frame(|ui| res = ui.button("OK"));
        assert_eq!(res.event, WidgetEvent::Hovered);
    }

    #[test]
    fn button_outside_pointer_is_idle() {
        let mut rt = test_runtime();
        click_at(&mut rt, 300, 300);
        let mut res = WidgetDrawResult::default();
        rt.frame(|ui| res = ui.button("OK"));
        assert!(res.is_none());
    }

    #[test]
    fn decorated_label_hides_selectors() {
        let mut rt = test_runtime();
        rt.frame(|ui| {
            ui.label("Name #name .muted");
        });
        let texts = rt.renderer_handle().scope(|r| r.texts());
        assert_eq!(texts[0].0, "Name");
    }

    #[test]
    fn repeated_text_keeps_separate_state() {
        let mut rt = test_runtime();
        rt.io_mut().mousemove(5, 35);
        let mut results = (WidgetDrawResult::default(), WidgetDrawResult::default());
        for _ in 0..2 {
            rt.frame(|ui| results = (ui.text("same"), ui.text("same")));
        }
        assert_eq!(results.0.event, WidgetEvent::None);
        assert_eq!(results.1.event, WidgetEvent::Hovered);
        assert_eq!(rect_tuple(results.1.geometry).1, 30);
    }

    #[test]
    fn checkbox_flips_bound_value() {
        let mut rt = test_runtime();
        let mut value = false;
        click_at(&mut rt, 5, 5);
        let mut res = WidgetDrawResult::default();
        rt.frame(|ui| res = ui.checkbox("enabled", &mut value));
        assert_eq!(res.event, WidgetEvent::Toggled);
        assert!(value);

        release(&mut rt);
        rt.frame(|ui| res = ui.checkbox("enabled", &mut value));
        assert!(value);
        assert_eq!(res.event, WidgetEvent::Hovered);
    }

    #[test]
    fn checkbox_follows_external_changes() {
        let mut rt = test_runtime();
        let mut value = true;
        rt.frame(|ui| {
            ui.checkbox("x", &mut value);
        });
        value = false;
        rt.frame(|ui| {
            ui.checkbox("x", &mut value);
        });
        assert!(!value);
    }

    #[test]
    fn slider_jumps_to_pointer() {
        let mut rt = test_runtime();
        let mut value = 0.0f32;
        click_at(&mut rt, 320, 10);
        let mut res = WidgetDrawResult::default();
        rt.frame(|ui| res = ui.slider(&mut value, 0.0, 1.0));
        assert_eq!(res.event, WidgetEvent::Edited);
        assert!((value - 0.5).abs() < 1e-4, "value {value}");

        rt.io_mut().mousemove(640, 10);
        rt.frame(|ui| res = ui.slider(&mut value, 0.0, 1.0));
        assert_eq!(value, 1.0);

        release(&mut rt);
        rt.frame(|ui| res = ui.slider(&mut value, 0.0, 1.0));
        assert_eq!(res.event, WidgetEvent::DragEnded);
    }

    #[test]
    fn degenerate_slider_range_pins_value() {
        let mut rt = test_runtime();
        let mut value = 3.0f32;
        click_at(&mut rt, 100, 10);
        rt.frame(|ui| {
            ui.slider(&mut value, 2.0, 2.0);
        });
        assert_eq!(value, 2.0);
    }

    #[test]
    fn text_input_edits_after_focus() {
        let mut rt = test_runtime();
        let mut value = String::new();
        click_at(&mut rt, 10, 10);
        rt.frame(|ui| {
            ui.text_input(&mut value);
        });
        release(&mut rt);
        rt.io_mut().text_input("hi");
        let mut res = WidgetDrawResult::default();
        rt.frame(|ui| res = ui.text_input(&mut value));
        assert_eq!(value, "hi");
        assert_eq!(res.event, WidgetEvent::Edited);

        rt.io_mut().keydown(Key::Backspace);
        rt.frame(|ui| res = ui.text_input(&mut value));
        assert_eq!(value, "h");

        rt.io_mut().keydown(Key::Enter);
        rt.frame(|ui| res = ui.text_input(&mut value));
        assert_eq!(res.event, WidgetEvent::Submitted);
    }

    #[test]
    fn text_input_copy_and_paste() {
        let mut rt = test_runtime();
        let mut value = String::from("abc");
        click_at(&mut rt, 10, 10);
        rt.frame(|ui| {
            ui.text_input(&mut value);
        });
        release(&mut rt);
        rt.io_mut().set_modifiers(KeyMode::CTRL);
        rt.io_mut().keydown(Key::Char('a'));
        rt.io_mut().keydown(Key::Char('c'));
        rt.frame(|ui| {
            ui.text_input(&mut value);
        });
        assert_eq!(rt.io().clipboard_get().as_deref(), Some("abc"));

        rt.io_mut().keydown(Key::Char('v'));
        rt.io_mut().keydown(Key::Char('v'));
        rt.frame(|ui| {
            ui.text_input(&mut value);
        });
        assert_eq!(value, "abcabc");
    }

    #[test]
    fn clicking_elsewhere_drops_focus() {
        let mut rt = test_runtime();
        let mut value = String::new();
        click_at(&mut rt, 10, 10);
        rt.frame(|ui| {
            ui.text_input(&mut value);
        });
        release(&mut rt);
        click_at(&mut rt, 600, 400);
        rt.frame(|ui| {
            ui.text_input(&mut value);
        });
        release(&mut rt);
        rt.io_mut().text_input("x");
        rt.frame(|ui| {
            ui.text_input(&mut value);
        });
        assert!(value.is_empty());
    }

    #[test]
    fn caret_lands_on_nearest_boundary() {
        let measure = |t: &str| t.chars().count() as i32 * 8;
        assert_eq!(caret_from_x("hello", -3, measure), 0);
        assert_eq!(caret_from_x("hello", 3, measure), 0);
        assert_eq!(caret_from_x("hello", 5, measure), 1);
        assert_eq!(caret_from_x("hello", 100, measure), 5);
        assert_eq!(caret_from_x("héllo", 13, measure), 3);
    }

    #[test]
    fn edits_respect_char_boundaries() {
        let mut s = String::from("aé");
        let mut caret = s.len();
        assert!(delete_prev(&mut s, &mut caret));
        assert_eq!((s.as_str(), caret), ("a", 1));
        assert_eq!(move_left("aé", 3), 1);
        assert_eq!(move_right("aé", 1), 3);
    }
}
