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
use deferui::*;

#[derive(Default)]
struct Recorder {
    log: Vec<Primitive>,
}

impl Recorder {
    fn rects(&self) -> Vec<(i32, i32, i32, i32)> {
        self.log
            .iter()
            .filter_map(|p| match p {
                Primitive::Rect { rect, .. } => Some(rect_tuple(*rect)),
                _ => None,
            })
            .collect()
    }
}

impl PrimitiveSink for Recorder {
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

impl Renderer for Recorder {
    fn get_text_size(&self, text: &str, _font: FontHandle, _size: u16, _wrap_width: Option<i32>) -> Vec2i { vec2(text.chars().count() as i32 * 8, 16) }

    fn begin(&mut self, _window: Vec2i) { self.log.clear(); }
}

struct OneFont;

impl FontProvider for OneFont {
    fn get_font(&mut self, family: &str, size: u16, _weight: FontWeight) -> Option<FontHandle> { (family == "default").then(|| FontHandle::new(u32::from(size))) }
}

fn runtime() -> Runtime<Recorder> {
    let config = Config { window_size: vec2(640, 480), ..Config::default() };
    match Runtime::init(config, RendererHandle::new(Recorder::default()), Box::new(OneFont), None) {
        Ok(rt) => rt,
        Err(err) => panic!("init failed: {err}"),
    }
}

#[test]
fn label_identity_and_ambient_style() {
    let mut rt = runtime();
    let default_bg = rt.cascade_mut().default_style(WidgetType::Button, InteractionState::Default).bg_color;
    rt.frame(|ui| {
        let (id0, first) = ui.get_or_create_id(WidgetKey::Label("OK"), WidgetType::Button);
        assert!(first);
        assert_eq!(ui.get_or_create_id(WidgetKey::Label("OK"), WidgetType::Button), (id0, false));
        assert_ne!(ui.get_or_create_id(WidgetKey::Label("Cancel"), WidgetType::Button).0, id0);

        ui.push_style(StyleDescriptor::new().with_bg_color(Color::rgb_hex(0xFF0000)));
        assert_eq!(ui.resolve_style(id0, InteractionState::Default).bg_color.to_rgb_hex(), 0xFF0000);
        ui.pop_style();
        assert_eq!(ui.resolve_style(id0, InteractionState::Default).bg_color, default_bg);
    });
}

#[test]
fn two_interaction_states_are_rejected() {
    let mut rt = runtime();
    rt.frame(|ui| {
        let (id, _) = ui.get_or_create_id(WidgetKey::Label("OK"), WidgetType::Button);
        let res = ui.resolve_style_bits(id, WidgetStates::HOVERED | WidgetStates::PRESSED);
        assert!(matches!(res, Err(Error::AmbiguousInteractionState(_))));
    });
}

#[test]
fn recorded_block_replays_at_offset() {
    let mut rt = runtime();
    rt.frame(|ui| {
        ui.toggle_deferred_rendering(true);
        let mut range = RendererEventIndexRange::default();
        ui.record_range(&mut range, true);
        ui.button("OK");
        ui.record_range(&mut range, false);
        ui.toggle_deferred_rendering(false);
        ui.render_range(vec2(5, 5), &range, None);
    });
    let rects = rt.renderer_handle().scope(|r| r.rects());
    assert_eq!(rects[0], (5, 5, 28, 24));
}

#[test]
fn host_rect_replays_at_offset() {
    let mut rt = runtime();
    rt.frame(|ui| {
        ui.toggle_deferred_rendering(true);
        let mut range = RendererEventIndexRange::default();
        ui.record_range(&mut range, true);
        ui.fill_rect(rect(0, 0, 10, 10), Color::rgb_hex(0x00FF00));
        ui.record_range(&mut range, false);
        ui.toggle_deferred_rendering(false);
        ui.render_range(vec2(5, 5), &range, None);
    });
    assert_eq!(rt.renderer_handle().scope(|r| r.rects()), vec![(5, 5, 10, 10)]);
}

#[test]
fn scroll_region_click_reaches_the_widget_next_frame() {
    let mut rt = runtime();
    rt.io_mut().mousemove(10, 10);
    rt.io_mut().mousedown(10, 10, MouseButton::LEFT);
    let mut first = WidgetDrawResult::default();
    rt.frame(|ui| {
        ui.begin_scroll_region("list", vec2(200, 120));
        first = ui.button("Open");
        ui.end_scroll_region();
    });
    assert!(first.is_deferred());

    rt.frame(|ui| {
        ui.begin_scroll_region("list", vec2(200, 120));
        first = ui.button("Open");
        ui.end_scroll_region();
    });
    assert!(first.clicked());
}

#[test]
fn grid_inside_popup_nests_contexts() {
    let mut rt = runtime();
    let columns = [ColumnSpec::new("Key", 80), ColumnSpec::new("Value", 80)];
    let mut popup_ctx = None;
    let mut grid_ctx = None;
    rt.frame(|ui| {
        ui.open_popup("details", Some(vec2(100, 100)));
        if ui.begin_popup("details", 200) {
            popup_ctx = Some(ui.current_context());
            ui.begin_item_grid("props", &columns);
            grid_ctx = Some(ui.current_context());
            ui.begin_row();
            ui.grid_cell(0);
            ui.label("name");
            ui.grid_cell(1);
            ui.label("deferui");
            ui.end_row();
            ui.end_item_grid();
            ui.end_popup();
        }
    });
    let (popup_ctx, grid_ctx) = (popup_ctx.unwrap(), grid_ctx.unwrap());
    assert_eq!(rt.contexts().len(), 3);
    assert_eq!(rt.contexts().get(grid_ctx).parent(), Some(popup_ctx));
    assert!(rt.contexts().is_descendant(grid_ctx, ContextIndex::ROOT));

    // the popup is drawn last, over everything else
    let last_text = rt.renderer_handle().scope(|r| {
        r.log.iter().rev().find_map(|p| match p {
            Primitive::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
    });
    assert_eq!(last_text.as_deref(), Some("deferui"));
}

#[test]
fn text_input_round_trip_through_io() {
    let mut rt = runtime();
    let mut name = String::from("ab");
    rt.io_mut().mousemove(10, 10);
    rt.io_mut().mousedown(10, 10, MouseButton::LEFT);
    rt.frame(|ui| {
        ui.text_input(&mut name);
    });
    rt.io_mut().mouseup(10, 10, MouseButton::LEFT);
    rt.io_mut().keydown(Key::Home);
    rt.frame(|ui| {
        ui.text_input(&mut name);
    });
    rt.io_mut().text_input("x");
    rt.frame(|ui| {
        ui.text_input(&mut name);
    });
    assert_eq!(name, "xab");
}
