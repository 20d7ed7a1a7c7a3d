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
use crate::{FontHandle, ScrollAxis, Vec2i, WidgetType};

#[derive(Clone, Debug, Default)]
/// Persistent state of a label.
pub struct LabelState {
    /// Pointer was over the label during the last evaluation.
    pub hovered: bool,
}

#[derive(Clone, Debug, Default)]
/// Persistent state of a button.
pub struct ButtonState {
    /// Pointer was over the button during the last evaluation.
    pub hovered: bool,
    /// Left button is held on the button.
    pub pressed: bool,
}

#[derive(Clone, Debug, Default)]
/// Persistent state of a checkbox.
pub struct CheckboxState {
    /// Last value observed from, or written to, the bound variable.
    pub checked: bool,
    /// Pointer was over the checkbox during the last evaluation.
    pub hovered: bool,
    /// A deferred click flipped the value; applied to the bound variable on the next call.
    pub pending_toggle: bool,
}

#[derive(Clone, Debug, Default)]
/// Persistent state of a slider.
pub struct SliderState {
    /// Last value observed from, or written to, the bound variable.
    pub value: f32,
    /// Lower bound of the value.
    pub min: f32,
    /// Upper bound of the value.
    pub max: f32,
    /// Value computed during a deferred replay, applied on the next call.
    pub pending_value: Option<f32>,
    /// The thumb is being dragged.
    pub dragging: bool,
    /// Distance between the pointer and the thumb origin when the drag started.
    pub drag_offset: i32,
    /// Pointer was over the slider during the last evaluation.
    pub hovered: bool,
}

#[derive(Clone, Debug, Default)]
/// Persistent state of a single line text input.
pub struct TextInputState {
    /// Working copy of the text while focused.
    pub text: String,
    /// Caret position as a byte offset on a char boundary.
    pub caret: usize,
    /// Other end of the selection, when one exists.
    pub anchor: Option<usize>,
    /// Horizontal scroll keeping the caret visible.
    pub scroll_x: i32,
    /// The input owns keyboard focus.
    pub focused: bool,
    /// `text` differs from the bound variable.
    pub dirty: bool,
    /// Enter was pressed; reported on the next call.
    pub submitted: bool,
    /// Font the text was last drawn with, used to place the caret under the pointer.
    pub font: Option<FontHandle>,
    /// Size of `font`.
    pub font_size: u16,
}

impl TextInputState {
    /// Selected byte range, ordered.
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.anchor.filter(|a| *a != self.caret).map(|a| (a.min(self.caret), a.max(self.caret)))
    }
}

#[derive(Clone, Debug, Default)]
/// Persistent state of a scroll region.
pub struct ScrollRegionState {
    /// Current scroll offset.
    pub scroll: Vec2i,
    /// Size of the content measured during the last frame.
    pub content: Vec2i,
    /// Size of the visible viewport.
    pub viewport: Vec2i,
    /// Scrollbar being dragged.
    pub drag: Option<ScrollAxis>,
    /// Scroll offset when the drag started.
    pub drag_scroll: i32,
    /// Pointer coordinate along the drag axis when the drag started.
    pub drag_mouse: i32,
    /// Pointer was over the viewport during the last evaluation.
    pub hovered: bool,
}

#[derive(Clone, Debug, Default)]
/// Persistent state of a tab bar.
pub struct TabBarState {
    /// Index of the selected tab.
    pub current: usize,
    /// Tab under the pointer.
    pub hovered: Option<usize>,
    /// Horizontal scroll of the tab header.
    pub scroll: i32,
    /// Number of tabs submitted last frame.
    pub tab_count: usize,
    /// Largest header scroll, zero when every tab fits.
    pub max_scroll: i32,
}

#[derive(Clone, Debug, Default)]
/// Persistent state of an accordion section.
pub struct AccordionState {
    /// Requested state of the section.
    pub open: bool,
    /// Animation progress from closed (0) to open (1).
    pub progress: f32,
    /// Height of the content measured during the last frame it was laid out.
    pub content_height: i32,
    /// Pointer was over the header during the last evaluation.
    pub hovered: bool,
}

#[derive(Clone, Debug, Default)]
/// Persistent state of an item grid.
pub struct ItemGridState {
    /// Current column widths.
    pub column_widths: Vec<i32>,
    /// Column whose right edge is being dragged.
    pub resizing: Option<usize>,
    /// Selected row.
    pub selected_row: Option<usize>,
    /// Row under the pointer.
    pub hovered_row: Option<usize>,
}

#[derive(Clone, Debug, Default)]
/// Persistent state of a popup.
pub struct PopupState {
    /// Popup is shown.
    pub open: bool,
    /// Requested top-left corner in screen coordinates.
    pub position: Vec2i,
    /// Size measured during the last frame it was shown.
    pub size: Vec2i,
    /// Close the popup when the frame ends.
    pub remove_at_frame_exit: bool,
}

#[derive(Clone, Debug)]
/// Persistent state of one widget instance, discriminated by widget type.
pub enum WidgetState {
    /// See [`LabelState`].
    Label(LabelState),
    /// See [`ButtonState`].
    Button(ButtonState),
    /// See [`CheckboxState`].
    Checkbox(CheckboxState),
    /// See [`SliderState`].
    Slider(SliderState),
    /// See [`TextInputState`].
    TextInput(TextInputState),
    /// See [`ScrollRegionState`].
    ScrollRegion(ScrollRegionState),
    /// See [`TabBarState`].
    TabBar(TabBarState),
    /// See [`AccordionState`].
    Accordion(AccordionState),
    /// See [`ItemGridState`].
    ItemGrid(ItemGridState),
    /// See [`PopupState`].
    Popup(PopupState),
}

macro_rules! state_accessors {
    ($($variant:ident => $ty:ty, $get:ident, $get_mut:ident;)*) => {
        impl WidgetState {
            $(
                #[doc = concat!("Returns the payload when the state is a `", stringify!($variant), "`.")]
                pub fn $get(&self) -> Option<&$ty> {
                    match self {
                        Self::$variant(s) => Some(s),
                        _ => None,
                    }
                }

                #[doc = concat!("Returns the mutable payload when the state is a `", stringify!($variant), "`.")]
                pub fn $get_mut(&mut self) -> Option<&mut $ty> {
                    match self {
                        Self::$variant(s) => Some(s),
                        _ => None,
                    }
                }
            )*
        }
    };
}

state_accessors! {
    Label => LabelState, as_label, as_label_mut;
    Button => ButtonState, as_button, as_button_mut;
    Checkbox => CheckboxState, as_checkbox, as_checkbox_mut;
    Slider => SliderState, as_slider, as_slider_mut;
    TextInput => TextInputState, as_text_input, as_text_input_mut;
    ScrollRegion => ScrollRegionState, as_scroll_region, as_scroll_region_mut;
    TabBar => TabBarState, as_tab_bar, as_tab_bar_mut;
    Accordion => AccordionState, as_accordion, as_accordion_mut;
    ItemGrid => ItemGridState, as_item_grid, as_item_grid_mut;
    Popup => PopupState, as_popup, as_popup_mut;
}

impl WidgetState {
    /// Default state for a widget of type `ty`.
    pub fn new(ty: WidgetType) -> Self {
        match ty {
            WidgetType::Label => Self::Label(LabelState::default()),
            WidgetType::Button => Self::Button(ButtonState::default()),
            WidgetType::Checkbox => Self::Checkbox(CheckboxState::default()),
            WidgetType::Slider => Self::Slider(SliderState { max: 1.0, ..SliderState::default() }),
            WidgetType::TextInput => Self::TextInput(TextInputState::default()),
            WidgetType::ScrollRegion => Self::ScrollRegion(ScrollRegionState::default()),
            WidgetType::TabBar => Self::TabBar(TabBarState::default()),
            WidgetType::Accordion => Self::Accordion(AccordionState::default()),
            WidgetType::ItemGrid => Self::ItemGrid(ItemGridState::default()),
            WidgetType::Popup => Self::Popup(PopupState::default()),
        }
    }

    /// Widget type of the payload.
    pub fn ty(&self) -> WidgetType {
        match self {
            Self::Label(_) => WidgetType::Label,
            Self::Button(_) => WidgetType::Button,
            Self::Checkbox(_) => WidgetType::Checkbox,
            Self::Slider(_) => WidgetType::Slider,
            Self::TextInput(_) => WidgetType::TextInput,
            Self::ScrollRegion(_) => WidgetType::ScrollRegion,
            Self::TabBar(_) => WidgetType::TabBar,
            Self::Accordion(_) => WidgetType::Accordion,
            Self::ItemGrid(_) => WidgetType::ItemGrid,
            Self::Popup(_) => WidgetType::Popup,
        }
    }

    /// Clears fields that only describe the previous frame (hover, press) and keeps persisted ones
    /// (scroll, caret, values, pending replay results).
    pub fn soft_reset(&mut self) {
        match self {
            Self::Label(s) => s.hovered = false,
            Self::Button(s) => {
                s.hovered = false;
                s.pressed = false;
            }
            Self::Checkbox(s) => s.hovered = false,
            Self::Slider(s) => s.hovered = false,
            Self::TextInput(_) => (),
            Self::ScrollRegion(s) => s.hovered = false,
            Self::TabBar(s) => s.hovered = None,
            Self::Accordion(s) => s.hovered = false,
            Self::ItemGrid(s) => s.hovered_row = None,
            Self::Popup(_) => (),
        }
    }
}
