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
use crate::{vec2, Error, Result, Vec2i, WidgetType};

/// Process-wide settings consumed by the runtime.
///
/// The runtime validates the config once in [`crate::Runtime::init`] and treats it as read-only
/// afterwards.
#[derive(Clone, Debug)]
pub struct Config {
    /// Size of the host window; popups are clamped to it.
    pub window_size: Vec2i,
    /// Upper bound, in bytes, of the permanent label store of each context.
    pub label_arena_ceiling: usize,
    /// Optional hook returning how many widgets of a type the host expects.
    /// The answer becomes the arena batch size for that type.
    pub expected_count: Option<fn(WidgetType) -> Option<usize>>,
    /// Font family used when a style leaves the family unspecified or the family cannot be loaded.
    pub default_font_family: String,
    /// Font size used when a style leaves the size unspecified.
    pub default_font_size: u16,
    /// Maximum delay between two left presses for them to count as a double click, in seconds.
    pub double_click_interval: f32,
    /// Pixels scrolled per wheel notch.
    pub scroll_step: i32,
    /// Thickness of scroll region scrollbars.
    pub scrollbar_size: i32,
    /// Slider thumb width and minimum thumb length of scrollbars.
    pub thumb_size: i32,
    /// Smallest width an item grid column can be resized to.
    pub min_column_width: i32,
    /// Accordion open/close progress gained per second.
    pub animation_speed: f32,
    /// Spacing between consecutive widgets of the ad-hoc layout.
    pub spacing: i32,
    /// Default widget height when the caller does not provide one.
    pub default_widget_height: i32,
    /// Inner padding of popups.
    pub popup_padding: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_size: vec2(1280, 720),
            label_arena_ceiling: 1 << 20,
            expected_count: None,
            default_font_family: String::from("default"),
            default_font_size: 16,
            double_click_interval: 0.3,
            scroll_step: 20,
            scrollbar_size: 12,
            thumb_size: 8,
            min_column_width: 16,
            animation_speed: 6.0,
            spacing: 4,
            default_widget_height: 24,
            popup_padding: 4,
        }
    }
}

impl Config {
    /// Checks the fields the runtime divides by or sizes buffers with.
    pub fn validate(&self) -> Result<()> {
        if self.window_size.x <= 0 || self.window_size.y <= 0 {
            return Err(Error::InvalidConfig("window_size must be positive"));
        }
        if self.label_arena_ceiling == 0 {
            return Err(Error::InvalidConfig("label_arena_ceiling must be non-zero"));
        }
        if u32::try_from(self.label_arena_ceiling).is_err() {
            return Err(Error::InvalidConfig("label_arena_ceiling must fit in 32 bits"));
        }
        if self.default_font_family.is_empty() {
            return Err(Error::InvalidConfig("default_font_family must not be empty"));
        }
        if self.default_font_size == 0 {
            return Err(Error::InvalidConfig("default_font_size must be non-zero"));
        }
        if self.scrollbar_size <= 0 || self.thumb_size <= 0 {
            return Err(Error::InvalidConfig("scrollbar and thumb sizes must be positive"));
        }
        if self.min_column_width <= 0 {
            return Err(Error::InvalidConfig("min_column_width must be positive"));
        }
        if !(self.animation_speed > 0.0) {
            return Err(Error::InvalidConfig("animation_speed must be positive"));
        }
        if self.default_widget_height <= 0 {
            return Err(Error::InvalidConfig("default_widget_height must be positive"));
        }
        Ok(())
    }

    /// Arena batch size for `ty`, honoring the expected-count hook.
    pub fn batch_size(&self, ty: WidgetType) -> usize {
        self.expected_count.and_then(|hook| hook(ty)).filter(|n| *n > 0).unwrap_or_else(|| ty.default_batch_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() { assert!(Config::default().validate().is_ok()); }

    #[test]
    fn zero_ceiling_is_rejected() {
        let config = Config { label_arena_ceiling: 0, ..Config::default() };
        assert_eq!(config.validate(), Err(Error::InvalidConfig("label_arena_ceiling must be non-zero")));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn ceiling_past_label_offsets_is_rejected() {
        let config = Config { label_arena_ceiling: u32::MAX as usize + 1, ..Config::default() };
        assert_eq!(config.validate(), Err(Error::InvalidConfig("label_arena_ceiling must fit in 32 bits")));
        let config = Config { label_arena_ceiling: u32::MAX as usize, ..Config::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn expected_count_hook_overrides_batch() {
        fn hook(ty: WidgetType) -> Option<usize> {
            match ty {
                WidgetType::Button => Some(3),
                _ => None,
            }
        }
        let config = Config { expected_count: Some(hook), ..Config::default() };
        assert_eq!(config.batch_size(WidgetType::Button), 3);
        assert_eq!(config.batch_size(WidgetType::Label), WidgetType::Label.default_batch_size());
    }
}
