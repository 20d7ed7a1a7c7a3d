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
use crate::container::{ContainerFrame, ContainerKind};
use crate::draw_ops::DrawOps;
use crate::*;

/// Width of the drag handle on the right edge of each column header.
const HANDLE_WIDTH: i32 = 4;

/// Far bottom of a cell clip; cells grow downward without a known height.
const CELL_EXTENT: i32 = 1 << 20;

#[derive(Clone, Debug)]
/// Header and initial width of an item grid column.
pub struct ColumnSpec {
    /// Header caption.
    pub title: String,
    /// Width used until the user resizes the column.
    pub width: i32,
}

impl ColumnSpec {
    /// Column titled `title`, `width` pixels wide.
    pub fn new(title: &str, width: i32) -> Self { Self { title: title.to_string(), width } }
}

impl<R: Renderer> Runtime<R> {
    fn grid_frame(&self) -> (WidgetId, ContextIndex, i32, usize) {
        match self.tree.current_ctx().containers.last() {
            Some(ContainerFrame { id, kind: ContainerKind::ItemGrid { parent, width, rows }, .. }) => (*id, *parent, *width, *rows),
            other => panic!("item grid call outside of an item grid (innermost container: {other:?})"),
        }
    }

    fn column_widths(&self, parent: ContextIndex, id: WidgetId) -> Vec<i32> {
        self.tree.get(parent).arena().get(id).and_then(|slot| slot.state.as_item_grid()).map(|s| s.column_widths.clone()).unwrap_or_default()
    }

    /// Opens a grid with resizable `columns`. Cell widgets live in a context of their own,
    /// so their labels only need to be unique within the grid.
    pub fn begin_item_grid(&mut self, label: &str, columns: &[ColumnSpec]) {
        let (id, _) = self.get_or_create_id(WidgetKey::Label(label), WidgetType::ItemGrid);
        let min_width = self.config.min_column_width;
        if let Some(s) = self.state_of(id).as_item_grid_mut() {
            if s.column_widths.len() != columns.len() {
                s.column_widths = columns.iter().map(|c| c.width.max(min_width)).collect();
            }
        }
        let parent = self.tree.current();
        let widths = self.column_widths(parent, id);
        let style = self.resolve_style(id, InteractionState::Default);
        let header = self.next_rect(vec2(0, 0));

        self.push_context(id);
        let mut x = header.x;
        for (column, (spec, width)) in columns.iter().zip(&widths).enumerate() {
            let cell = rect(x, header.y, *width, header.height);
            self.draw_frame(cell, &style);
            let size = self.text_size(&style, &spec.title);
            self.draw_control_text(&spec.title, cell, &style, size);
            let handle = rect(cell.x + cell.width - HANDLE_WIDTH, cell.y, HANDLE_WIDTH, cell.height);
            self.emit(parent, id, EventGeometry::GridColumnHandle { column, rect: handle });
            x += width;
        }
        let width = widths.iter().sum();
        self.push_container(ContainerFrame {
            id,
            range: RendererEventIndexRange::default(),
            kind: ContainerKind::ItemGrid { parent, width, rows: 0 },
        });
    }

    /// Starts the next row. Its cells are recorded and placed by [`Runtime::end_row`] once
    /// the tallest cell is known.
    pub fn begin_row(&mut self) {
        let (id, _, width, rows) = self.grid_frame();
        let range = self.open_block(rect(0, 0, width, 0));
        self.push_container(ContainerFrame { id, range, kind: ContainerKind::GridRow { row: rows, cell: None, height: 0 } });
    }

    fn close_cell(&mut self) {
        let open = match self.tree.current_ctx().containers.last() {
            Some(ContainerFrame { kind: ContainerKind::GridRow { cell, .. }, .. }) => cell.is_some(),
            other => panic!("grid cell call outside of a row (innermost container: {other:?})"),
        };
        if !open {
            return;
        }
        self.pop_clip_rect();
        let size = self.tree.current_ctx_mut().layout.pop_scope();
        if let Some(ContainerFrame { kind: ContainerKind::GridRow { cell, height, .. }, .. }) = self.tree.current_ctx_mut().containers.last_mut() {
            *cell = None;
            *height = (*height).max(size.y);
        }
    }

    /// Directs the following widgets to `column` of the current row.
    pub fn grid_cell(&mut self, column: usize) {
        self.close_cell();
        let frame = self.tree.current_ctx().containers.len().checked_sub(2).map(|i| self.tree.current_ctx().containers[i]);
        let (id, parent) = match frame {
            Some(ContainerFrame { id, kind: ContainerKind::ItemGrid { parent, .. }, .. }) => (id, parent),
            other => panic!("grid_cell outside of an item grid row (enclosing container: {other:?})"),
        };
        let widths = self.column_widths(parent, id);
        assert!(column < widths.len(), "column {column} out of range, the grid has {}", widths.len());
        let x: i32 = widths[..column].iter().sum();
        let cell = rect(x, 0, widths[column], CELL_EXTENT);
        self.push_clip_rect(cell);
        self.tree.current_ctx_mut().layout.push_scope(rect(cell.x, 0, cell.width, 0), vec2(0, 0));
        if let Some(ContainerFrame { kind: ContainerKind::GridRow { cell, .. }, .. }) = self.tree.current_ctx_mut().containers.last_mut() {
            *cell = Some(column);
        }
    }

    /// Places the current row, as tall as its tallest cell, and reports what its content did.
    pub fn end_row(&mut self) -> Vec<(WidgetId, WidgetDrawResult)> {
        self.close_cell();
        let frame = self.pop_container("end_row");
        let ContainerKind::GridRow { row, height, .. } = frame.kind else {
            panic!("end_row closes a {:?}", frame.kind);
        };
        let (range, _) = self.close_block(frame.range);
        let (id, parent, width, _) = self.grid_frame();

        let height = height.max(self.config.default_widget_height);
        let row_rect = self.next_rect(vec2(width, height));
        let (selected, hovered) = self
            .tree
            .get(parent)
            .arena()
            .get(id)
            .and_then(|slot| slot.state.as_item_grid())
            .map_or((false, false), |s| (s.selected_row == Some(row), s.hovered_row == Some(row)));
        if selected || hovered {
            let state = if selected { InteractionState::Selected } else { InteractionState::Hovered };
            let style = self.resolve_style_in(parent, id, state);
            self.draw_rect(row_rect, style.bg_color);
        }

        let clip = self.current_clip_rect();
        let leading = vec![DeferredEvent { context: parent, id, clip, geometry: EventGeometry::GridRow { row, rect: row_rect } }];
        let results = self.place_range(&range, vec2(row_rect.x, row_rect.y), row_rect, leading);
        if let Some(ContainerFrame { kind: ContainerKind::ItemGrid { rows, .. }, .. }) = self.tree.current_ctx_mut().containers.last_mut() {
            *rows += 1;
        }
        results
    }

    /// Closes the grid and returns the selected row.
    pub fn end_item_grid(&mut self) -> Option<usize> {
        let frame = self.pop_container("end_item_grid");
        let ContainerKind::ItemGrid { parent, width, .. } = frame.kind else {
            panic!("end_item_grid closes a {:?}", frame.kind);
        };
        let layout = &self.tree.current_ctx().layout;
        let body = layout.current_body();
        let height = layout.current_max().map_or(0, |m| m.y - body.y);
        self.pop_context();
        debug_assert_eq!(self.tree.current(), parent);
        if height > 0 {
            self.next_rect(vec2(width, height));
        }
        self.tree.get(parent).arena().get(frame.id).and_then(|slot| slot.state.as_item_grid()).and_then(|s| s.selected_row)
    }

    pub(crate) fn column_handle_event(&mut self, key: (ContextIndex, WidgetId), column: usize, hovered: bool) -> WidgetEvent {
        let io = &self.io;
        let min_width = self.config.min_column_width;
        let Some(s) = self.tree.get_mut(key.0).arena_mut().state_mut(key.1).as_item_grid_mut() else { return WidgetEvent::None };
        if hovered && io.clicked() {
            s.resizing = Some(column);
            self.active = Some(key);
            return WidgetEvent::DragStarted;
        }
        if s.resizing != Some(column) {
            return if hovered { WidgetEvent::Hovered } else { WidgetEvent::None };
        }
        if !io.is_left_mouse_down() {
            s.resizing = None;
            if self.active == Some(key) {
                self.active = None;
            }
            return WidgetEvent::DragEnded;
        }
        if let Some(w) = s.column_widths.get_mut(column) {
            *w = (*w + io.mouse_delta().x).max(min_width);
        }
        WidgetEvent::Dragged
    }

    pub(crate) fn grid_row_event(&mut self, key: (ContextIndex, WidgetId), row: usize, hovered: bool) -> WidgetEvent {
        let io = &self.io;
        let Some(s) = self.tree.get_mut(key.0).arena_mut().state_mut(key.1).as_item_grid_mut() else { return WidgetEvent::None };
        if hovered {
            s.hovered_row = Some(row);
        } else if s.hovered_row == Some(row) {
            s.hovered_row = None;
        }
        if !hovered {
            return WidgetEvent::None;
        }
        if io.clicked() {
            if s.selected_row == Some(row) {
                return WidgetEvent::Clicked;
            }
            s.selected_row = Some(row);
            return WidgetEvent::Selected;
        }
        WidgetEvent::Hovered
    }
}
