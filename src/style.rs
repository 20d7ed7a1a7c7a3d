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
use crate::{color, Color, Error, FontHandle, Result, WidgetType, WidgetTypes};
use bitflags::bitflags;
use rustc_hash::FxHashMap;
use tracing::warn;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Fields of a [`StyleDescriptor`] that a layer actually sets.
    pub struct StyleFields : u32 {
        /// Background color.
        const BG_COLOR = 1 << 0;
        /// Foreground (text) color.
        const FG_COLOR = 1 << 1;
        /// Border color.
        const BORDER_COLOR = 1 << 2;
        /// Border width.
        const BORDER_WIDTH = 1 << 3;
        /// Inner padding.
        const PADDING = 1 << 4;
        /// Outer margin.
        const MARGIN = 1 << 5;
        /// Font family.
        const FONT_FAMILY = 1 << 6;
        /// Font size.
        const FONT_SIZE = 1 << 7;
        /// Font weight.
        const FONT_WEIGHT = 1 << 8;
        /// Text alignment.
        const ALIGNMENT = 1 << 9;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
/// Weight of a font face.
pub enum FontWeight {
    /// Thin strokes.
    Light,
    #[default]
    /// Regular strokes.
    Regular,
    /// Heavy strokes.
    Bold,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// Horizontal placement of text inside its rectangle.
pub enum TextAlign {
    /// Flush left, after the padding.
    Left,
    #[default]
    /// Centered.
    Center,
    /// Flush right, before the padding.
    Right,
}

#[derive(Clone, Debug, PartialEq, Default)]
/// Visual style of a widget, merged field by field across cascade layers.
///
/// Only fields flagged in `specified` carry meaning; the others hold whatever the type default
/// left there and are never copied by [`StyleDescriptor::merge_from`].
pub struct StyleDescriptor {
    /// Fields set by this descriptor.
    pub specified: StyleFields,
    /// Background color.
    pub bg_color: Color,
    /// Foreground (text) color.
    pub fg_color: Color,
    /// Border color.
    pub border_color: Color,
    /// Border width in pixels.
    pub border_width: i32,
    /// Inner padding in pixels.
    pub padding: i32,
    /// Outer margin in pixels.
    pub margin: i32,
    /// Font family name.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: u16,
    /// Font weight.
    pub font_weight: FontWeight,
    /// Text alignment.
    pub alignment: TextAlign,
    /// Font bound to the family/size/weight triple, filled when the style is resolved for a paint.
    pub font: Option<FontHandle>,
}

impl StyleDescriptor {
    /// Descriptor that specifies nothing.
    pub fn new() -> Self { Self::default() }

    /// Sets the background color.
    pub fn with_bg_color(mut self, c: Color) -> Self {
        self.bg_color = c;
        self.specified |= StyleFields::BG_COLOR;
        self
    }

    /// Sets the foreground color.
    pub fn with_fg_color(mut self, c: Color) -> Self {
        self.fg_color = c;
        self.specified |= StyleFields::FG_COLOR;
        self
    }

    /// Sets the border color.
    pub fn with_border_color(mut self, c: Color) -> Self {
        self.border_color = c;
        self.specified |= StyleFields::BORDER_COLOR;
        self
    }

    /// Sets the border width.
    pub fn with_border_width(mut self, w: i32) -> Self {
        self.border_width = w;
        self.specified |= StyleFields::BORDER_WIDTH;
        self
    }

    /// Sets the padding.
    pub fn with_padding(mut self, p: i32) -> Self {
        self.padding = p;
        self.specified |= StyleFields::PADDING;
        self
    }

    /// Sets the margin.
    pub fn with_margin(mut self, m: i32) -> Self {
        self.margin = m;
        self.specified |= StyleFields::MARGIN;
        self
    }

    /// Sets the font family.
    pub fn with_font_family(mut self, family: &str) -> Self {
        self.font_family = family.to_string();
        self.specified |= StyleFields::FONT_FAMILY;
        self.font = None;
        self
    }

    /// Sets the font size.
    pub fn with_font_size(mut self, size: u16) -> Self {
        self.font_size = size;
        self.specified |= StyleFields::FONT_SIZE;
        self.font = None;
        self
    }

    /// Sets the font weight.
    pub fn with_font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = weight;
        self.specified |= StyleFields::FONT_WEIGHT;
        self.font = None;
        self
    }

    /// Sets the text alignment.
    pub fn with_alignment(mut self, align: TextAlign) -> Self {
        self.alignment = align;
        self.specified |= StyleFields::ALIGNMENT;
        self
    }

    /// Returns `true` when no field is specified.
    pub fn is_empty(&self) -> bool { self.specified.is_empty() }

    /// Copies every field `other` specifies into `self`.
    pub fn merge_from(&mut self, other: &StyleDescriptor) {
        let f = other.specified;
        if f.contains(StyleFields::BG_COLOR) {
            self.bg_color = other.bg_color;
        }
        if f.contains(StyleFields::FG_COLOR) {
            self.fg_color = other.fg_color;
        }
        if f.contains(StyleFields::BORDER_COLOR) {
            self.border_color = other.border_color;
        }
        if f.contains(StyleFields::BORDER_WIDTH) {
            self.border_width = other.border_width;
        }
        if f.contains(StyleFields::PADDING) {
            self.padding = other.padding;
        }
        if f.contains(StyleFields::MARGIN) {
            self.margin = other.margin;
        }
        if f.contains(StyleFields::FONT_FAMILY) {
            self.font_family.clone_from(&other.font_family);
        }
        if f.contains(StyleFields::FONT_SIZE) {
            self.font_size = other.font_size;
        }
        if f.contains(StyleFields::FONT_WEIGHT) {
            self.font_weight = other.font_weight;
        }
        if f.contains(StyleFields::ALIGNMENT) {
            self.alignment = other.alignment;
        }
        if f.intersects(StyleFields::FONT_FAMILY | StyleFields::FONT_SIZE | StyleFields::FONT_WEIGHT) {
            self.font = None;
        }
        self.specified |= f;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
/// The single interaction state a widget is painted in.
pub enum InteractionState {
    #[default]
    /// Idle.
    Default = 0,
    /// Pointer over the widget.
    Hovered = 1,
    /// Left button held on the widget.
    Pressed = 2,
    /// Widget owns keyboard focus.
    Focused = 3,
    /// Two-state widget is on.
    Checked = 4,
    /// Item is selected.
    Selected = 5,
    /// Widget ignores input.
    Disabled = 6,
}

impl InteractionState {
    /// Number of states.
    pub const COUNT: usize = 7;

    /// Every state in discriminant order.
    pub const ALL: [InteractionState; Self::COUNT] =
        [Self::Default, Self::Hovered, Self::Pressed, Self::Focused, Self::Checked, Self::Selected, Self::Disabled];

    /// Index into per-state tables.
    pub fn index(self) -> usize { self as usize }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Interaction states as bits; exactly one bit must be set to resolve a style.
    pub struct WidgetStates : u32 {
        /// [`InteractionState::Default`].
        const DEFAULT = 1 << 0;
        /// [`InteractionState::Hovered`].
        const HOVERED = 1 << 1;
        /// [`InteractionState::Pressed`].
        const PRESSED = 1 << 2;
        /// [`InteractionState::Focused`].
        const FOCUSED = 1 << 3;
        /// [`InteractionState::Checked`].
        const CHECKED = 1 << 4;
        /// [`InteractionState::Selected`].
        const SELECTED = 1 << 5;
        /// [`InteractionState::Disabled`].
        const DISABLED = 1 << 6;
    }
}

impl From<InteractionState> for WidgetStates {
    fn from(state: InteractionState) -> Self { Self::from_bits_truncate(1 << state.index()) }
}

impl TryFrom<WidgetStates> for InteractionState {
    type Error = Error;

    fn try_from(states: WidgetStates) -> Result<Self> {
        let bits = states.bits();
        if bits.count_ones() != 1 {
            return Err(Error::AmbiguousInteractionState(bits));
        }
        InteractionState::ALL
            .get(bits.trailing_zeros() as usize)
            .copied()
            .ok_or(Error::AmbiguousInteractionState(bits))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Per-state style layer attached to a widget instance, a class or an id selector.
///
/// The entry of [`InteractionState::Default`] applies in every state; the entry of the active
/// state is merged on top of it.
pub struct StyleOverride {
    states: [StyleDescriptor; InteractionState::COUNT],
}

impl StyleOverride {
    /// Override applying `style` in every state.
    pub fn uniform(style: StyleDescriptor) -> Self {
        let mut o = Self::default();
        o.states[InteractionState::Default.index()] = style;
        o
    }

    /// Adds `style` for `state`.
    pub fn with_state(mut self, state: InteractionState, style: StyleDescriptor) -> Self {
        self.states[state.index()].merge_from(&style);
        self
    }

    /// Entry for `state`.
    pub fn get(&self, state: InteractionState) -> &StyleDescriptor { &self.states[state.index()] }

    /// Merges every entry of `other` into `self`.
    pub fn merge_from(&mut self, other: &StyleOverride) {
        for (dst, src) in self.states.iter_mut().zip(other.states.iter()) {
            dst.merge_from(src);
        }
    }

    /// Returns `true` when no entry specifies anything.
    pub fn is_empty(&self) -> bool { self.states.iter().all(StyleDescriptor::is_empty) }

    fn apply(&self, state: InteractionState, out: &mut StyleDescriptor) {
        out.merge_from(self.get(InteractionState::Default));
        if state != InteractionState::Default {
            out.merge_from(self.get(state));
        }
    }
}

/// Late-bound process-wide theme, applied after every other cascade layer.
pub trait ThemeProvider {
    /// Theme entry for a widget type in a state, if the theme has one.
    fn style(&self, ty: WidgetType, state: InteractionState) -> Option<&StyleDescriptor>;
}

/// Host supplied source of class and id styles.
pub trait StyleSource {
    /// Called once when the runtime is initialized; may rewrite the type-wide defaults or install
    /// a theme.
    fn global_theme(&mut self, _cascade: &mut StyleCascade) {}

    /// Style registered for a `.class` selector.
    fn class_style(&self, _class: &str) -> Option<StyleOverride> { None }

    /// Style registered for an `#id` selector.
    fn id_style(&self, _id: &str) -> Option<StyleOverride> { None }
}

#[derive(Clone, Debug)]
struct AmbientStyle {
    style: StyleDescriptor,
    states: WidgetStates,
}

/// Resolves the effective style of a widget from its layers.
///
/// Lowest to highest precedence: the type-wide default for the state, the instance override, the
/// ambient style stack (skipped for types in the current ignore set), then the theme.
pub struct StyleCascade {
    defaults: Vec<[StyleDescriptor; InteractionState::COUNT]>,
    stack: Vec<AmbientStyle>,
    ignore: Vec<WidgetTypes>,
    theme: Option<Box<dyn ThemeProvider>>,
}

impl Default for StyleCascade {
    fn default() -> Self { Self::new() }
}

impl StyleCascade {
    /// Cascade seeded with the built-in dark palette.
    pub fn new() -> Self {
        let defaults = WidgetType::ALL.iter().map(|ty| std::array::from_fn(|s| builtin_style(*ty, InteractionState::ALL[s]))).collect();
        Self { defaults, stack: Vec::new(), ignore: Vec::new(), theme: None }
    }

    /// Type-wide default for `ty` in `state`.
    pub fn default_style(&self, ty: WidgetType, state: InteractionState) -> &StyleDescriptor { &self.defaults[ty.index()][state.index()] }

    /// Mutable type-wide default for `ty` in `state`.
    pub fn default_style_mut(&mut self, ty: WidgetType, state: InteractionState) -> &mut StyleDescriptor {
        &mut self.defaults[ty.index()][state.index()]
    }

    /// Installs or removes the theme.
    pub fn set_theme(&mut self, theme: Option<Box<dyn ThemeProvider>>) { self.theme = theme; }

    /// Pushes an ambient style applying in every state.
    pub fn push_style(&mut self, style: StyleDescriptor) { self.push_style_for(style, WidgetStates::all()); }

    /// Pushes an ambient style applying only in `states`.
    pub fn push_style_for(&mut self, style: StyleDescriptor, states: WidgetStates) { self.stack.push(AmbientStyle { style, states }); }

    /// Pops the innermost ambient style.
    pub fn pop_style(&mut self) {
        assert!(self.stack.pop().is_some(), "pop_style without a matching push_style");
    }

    /// Number of ambient styles currently pushed.
    pub fn depth(&self) -> usize { self.stack.len() }

    /// Makes the ambient stack invisible to `types` until the matching [`StyleCascade::pop_ignore`].
    pub fn push_ignore(&mut self, types: WidgetTypes) { self.ignore.push(types); }

    /// Restores the previous ignore set.
    pub fn pop_ignore(&mut self) {
        assert!(self.ignore.pop().is_some(), "pop_ignore without a matching push_ignore");
    }

    fn ignores(&self, ty: WidgetType) -> bool { self.ignore.last().is_some_and(|set| set.has(ty)) }

    /// Drops every ambient entry left over at the end of a frame and returns how many there were.
    pub fn frame_end(&mut self) -> usize {
        let excess = self.stack.len() + self.ignore.len();
        self.stack.clear();
        self.ignore.clear();
        excess
    }

    /// Resolves the style of a widget of type `ty` with the given instance override.
    pub fn resolve(&self, ty: WidgetType, instance: Option<&StyleOverride>, state: InteractionState) -> StyleDescriptor {
        let mut out = self.default_style(ty, state).clone();
        if let Some(o) = instance {
            o.apply(state, &mut out);
        }
        if !self.ignores(ty) {
            let bit = WidgetStates::from(state);
            for ambient in self.stack.iter().filter(|a| a.states.contains(bit)) {
                out.merge_from(&ambient.style);
            }
        }
        if let Some(theme) = self.theme.as_ref().and_then(|t| t.style(ty, state)) {
            out.merge_from(theme);
        }
        out
    }
}

fn builtin_style(ty: WidgetType, state: InteractionState) -> StyleDescriptor {
    let (bg, hover, active) = match ty {
        WidgetType::Label => (Color::TRANSPARENT, Color::TRANSPARENT, Color::TRANSPARENT),
        WidgetType::Button | WidgetType::TabBar | WidgetType::Accordion => {
            (color(75, 75, 75, 255), color(95, 95, 95, 255), color(115, 115, 115, 255))
        }
        WidgetType::ScrollRegion | WidgetType::Popup | WidgetType::ItemGrid => {
            (color(50, 50, 50, 255), color(50, 50, 50, 255), color(50, 50, 50, 255))
        }
        _ => (color(30, 30, 30, 255), color(35, 35, 35, 255), color(40, 40, 40, 255)),
    };
    let base = StyleDescriptor::new()
        .with_bg_color(bg)
        .with_fg_color(color(230, 230, 230, 255))
        .with_border_color(color(25, 25, 25, 255))
        .with_border_width(if ty == WidgetType::Label { 0 } else { 1 })
        .with_padding(5)
        .with_margin(0)
        .with_font_weight(FontWeight::Regular)
        .with_alignment(match ty {
            WidgetType::Label | WidgetType::TextInput | WidgetType::Accordion | WidgetType::ItemGrid => TextAlign::Left,
            _ => TextAlign::Center,
        });
    match state {
        InteractionState::Default => base,
        InteractionState::Hovered => base.with_bg_color(hover),
        InteractionState::Pressed | InteractionState::Focused | InteractionState::Checked => base.with_bg_color(active),
        InteractionState::Selected => base.with_bg_color(color(43, 43, 43, 255)).with_fg_color(color(255, 255, 255, 255)),
        InteractionState::Disabled => base.with_fg_color(color(128, 128, 128, 255)),
    }
}

/// Loads concrete fonts for the cascade.
pub trait FontProvider {
    /// Font for the exact family/size/weight combination, if it can be loaded.
    fn get_font(&mut self, family: &str, size: u16, weight: FontWeight) -> Option<FontHandle>;

    /// Sizes of `family` that can be loaded, used for nearest-size substitution.
    fn available_sizes(&self, _family: &str, _weight: FontWeight) -> Vec<u16> { Vec::new() }
}

/// Lazily binds styles to font handles and caches the result.
pub struct FontCache {
    provider: Box<dyn FontProvider>,
    cache: FxHashMap<(String, u16, FontWeight), FontHandle>,
    default_family: String,
    default_size: u16,
}

impl FontCache {
    /// Creates a cache falling back to `default_family` at `default_size`.
    pub fn new(provider: Box<dyn FontProvider>, default_family: &str, default_size: u16) -> Self {
        Self { provider, cache: FxHashMap::default(), default_family: default_family.to_string(), default_size }
    }

    /// Number of cached bindings.
    pub fn len(&self) -> usize { self.cache.len() }

    /// Returns `true` when nothing was bound yet.
    pub fn is_empty(&self) -> bool { self.cache.is_empty() }

    fn load(&mut self, family: &str, size: u16, weight: FontWeight) -> Option<FontHandle> {
        if let Some(f) = self.provider.get_font(family, size, weight) {
            return Some(f);
        }
        let nearest = self.provider.available_sizes(family, weight).into_iter().min_by_key(|s| (i32::from(*s) - i32::from(size)).abs())?;
        let f = self.provider.get_font(family, nearest, weight)?;
        warn!(family, requested = size, substituted = nearest, "font size substituted");
        Some(f)
    }

    /// Font for a family/size/weight triple, with nearest-size then default-family fallback.
    pub fn resolve(&mut self, family: &str, size: u16, weight: FontWeight) -> Result<FontHandle> {
        let key = (family.to_string(), size, weight);
        if let Some(f) = self.cache.get(&key) {
            return Ok(*f);
        }
        let font = match self.load(family, size, weight) {
            Some(f) => f,
            None if family != self.default_family => {
                let fallback = self.default_family.clone();
                warn!(family, fallback = fallback.as_str(), "font family unavailable, using the default family");
                self.load(&fallback, size, weight)
                    .or_else(|| self.provider.get_font(&fallback, self.default_size, FontWeight::Regular))
                    .ok_or_else(|| Error::FontUnavailable { family: family.to_string() })?
            }
            None => return Err(Error::FontUnavailable { family: family.to_string() }),
        };
        self.cache.insert(key, font);
        Ok(font)
    }

    /// Fills `style.font` from its family/size/weight, using the defaults for unspecified fields.
    pub fn bind(&mut self, style: &mut StyleDescriptor) -> Result<FontHandle> {
        if let Some(f) = style.font {
            return Ok(f);
        }
        let family = if style.specified.contains(StyleFields::FONT_FAMILY) && !style.font_family.is_empty() {
            style.font_family.clone()
        } else {
            self.default_family.clone()
        };
        let size = if style.specified.contains(StyleFields::FONT_SIZE) { style.font_size } else { self.default_size };
        let font = self.resolve(&family, size, style.font_weight)?;
        style.font = Some(font);
        Ok(font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestFonts;

    #[test]
    fn ambient_beats_default_when_instance_is_silent() {
        let mut cascade = StyleCascade::new();
        *cascade.default_style_mut(WidgetType::Button, InteractionState::Default) =
            StyleDescriptor::new().with_bg_color(Color::rgb_hex(0xFF0000));
        let instance = StyleOverride::uniform(StyleDescriptor::new().with_padding(9));
        cascade.push_style(StyleDescriptor::new().with_bg_color(Color::rgb_hex(0x0000FF)));
        let out = cascade.resolve(WidgetType::Button, Some(&instance), InteractionState::Default);
        assert_eq!(out.bg_color.to_rgb_hex(), 0x0000FF);
        assert_eq!(out.padding, 9);
    }

    #[test]
    fn instance_beats_default() {
        let cascade = StyleCascade::new();
        let instance = StyleOverride::uniform(StyleDescriptor::new().with_fg_color(Color::rgb_hex(0x00FF00)));
        let out = cascade.resolve(WidgetType::Label, Some(&instance), InteractionState::Hovered);
        assert_eq!(out.fg_color.to_rgb_hex(), 0x00FF00);
    }

    #[test]
    fn state_entry_merges_over_uniform_entry() {
        let cascade = StyleCascade::new();
        let instance = StyleOverride::uniform(StyleDescriptor::new().with_bg_color(Color::rgb_hex(0x111111)))
            .with_state(InteractionState::Hovered, StyleDescriptor::new().with_bg_color(Color::rgb_hex(0x222222)));
        let idle = cascade.resolve(WidgetType::Button, Some(&instance), InteractionState::Default);
        let hover = cascade.resolve(WidgetType::Button, Some(&instance), InteractionState::Hovered);
        assert_eq!(idle.bg_color.to_rgb_hex(), 0x111111);
        assert_eq!(hover.bg_color.to_rgb_hex(), 0x222222);
    }

    #[test]
    fn ignore_set_skips_ambient_stack() {
        let mut cascade = StyleCascade::new();
        let before = cascade.resolve(WidgetType::Slider, None, InteractionState::Default).bg_color;
        cascade.push_style(StyleDescriptor::new().with_bg_color(Color::rgb_hex(0xABCDEF)));
        cascade.push_ignore(WidgetTypes::SLIDER);
        assert_eq!(cascade.resolve(WidgetType::Slider, None, InteractionState::Default).bg_color, before);
        assert_eq!(cascade.resolve(WidgetType::Button, None, InteractionState::Default).bg_color.to_rgb_hex(), 0xABCDEF);
        cascade.pop_ignore();
        assert_eq!(cascade.resolve(WidgetType::Slider, None, InteractionState::Default).bg_color.to_rgb_hex(), 0xABCDEF);
    }

    #[test]
    fn ambient_style_limited_to_states() {
        let mut cascade = StyleCascade::new();
        cascade.push_style_for(StyleDescriptor::new().with_fg_color(Color::rgb_hex(0x123456)), WidgetStates::HOVERED);
        assert_ne!(cascade.resolve(WidgetType::Button, None, InteractionState::Default).fg_color.to_rgb_hex(), 0x123456);
        assert_eq!(cascade.resolve(WidgetType::Button, None, InteractionState::Hovered).fg_color.to_rgb_hex(), 0x123456);
    }

    struct RedTheme(StyleDescriptor);

    impl ThemeProvider for RedTheme {
        fn style(&self, _ty: WidgetType, _state: InteractionState) -> Option<&StyleDescriptor> { Some(&self.0) }
    }

    #[test]
    fn theme_is_applied_last() {
        let mut cascade = StyleCascade::new();
        cascade.set_theme(Some(Box::new(RedTheme(StyleDescriptor::new().with_bg_color(Color::rgb_hex(0xFF0000))))));
        cascade.push_style(StyleDescriptor::new().with_bg_color(Color::rgb_hex(0x0000FF)));
        assert_eq!(cascade.resolve(WidgetType::Button, None, InteractionState::Default).bg_color.to_rgb_hex(), 0xFF0000);
    }

    #[test]
    fn exactly_one_state_bit() {
        assert_eq!(InteractionState::try_from(WidgetStates::PRESSED), Ok(InteractionState::Pressed));
        let both = WidgetStates::HOVERED | WidgetStates::PRESSED;
        assert_eq!(InteractionState::try_from(both), Err(Error::AmbiguousInteractionState(0b110)));
        assert!(InteractionState::try_from(WidgetStates::empty()).is_err());
    }

    #[test]
    #[should_panic]
    fn popping_empty_stack_panics() { StyleCascade::new().pop_style(); }

    #[test]
    fn frame_end_force_pops() {
        let mut cascade = StyleCascade::new();
        cascade.push_style(StyleDescriptor::new());
        cascade.push_style(StyleDescriptor::new());
        assert_eq!(cascade.frame_end(), 2);
        assert_eq!(cascade.depth(), 0);
    }

    #[test]
    fn merge_keeps_unspecified_fields() {
        let mut a = StyleDescriptor::new().with_padding(3).with_margin(2);
        a.merge_from(&StyleDescriptor::new().with_margin(7));
        assert_eq!((a.padding, a.margin), (3, 7));
        assert!(a.specified.contains(StyleFields::PADDING | StyleFields::MARGIN));
    }

    #[test]
    fn font_cache_substitutes_nearest_size() {
        let mut fonts = FontCache::new(Box::new(TestFonts::new(&["default"], &[12, 16, 24])), "default", 16);
        let exact = fonts.resolve("default", 16, FontWeight::Regular).unwrap();
        let near = fonts.resolve("default", 22, FontWeight::Regular).unwrap();
        assert_eq!(near, fonts.resolve("default", 24, FontWeight::Regular).unwrap());
        assert_ne!(exact, near);
        assert_eq!(fonts.len(), 3);
    }

    #[test]
    fn font_cache_falls_back_to_default_family() {
        let mut fonts = FontCache::new(Box::new(TestFonts::new(&["default"], &[16])), "default", 16);
        let fallback = fonts.resolve("missing", 16, FontWeight::Regular).unwrap();
        assert_eq!(fallback, fonts.resolve("default", 16, FontWeight::Regular).unwrap());
    }

    #[test]
    fn font_cache_reports_unavailable() {
        let mut fonts = FontCache::new(Box::new(TestFonts::new(&[], &[])), "default", 16);
        assert_eq!(
            fonts.resolve("serif", 16, FontWeight::Bold),
            Err(Error::FontUnavailable { family: "serif".to_string() })
        );
    }

    #[test]
    fn bind_uses_defaults_and_caches() {
        let mut fonts = FontCache::new(Box::new(TestFonts::new(&["default"], &[16])), "default", 16);
        let mut style = StyleCascade::new().resolve(WidgetType::Button, None, InteractionState::Default);
        let f = fonts.bind(&mut style).unwrap();
        assert_eq!(style.font, Some(f));
        style.merge_from(&StyleDescriptor::new().with_font_size(16));
        assert!(style.font.is_none());
    }
}
