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
use crate::{vec2, Vec2i};
use bitflags::bitflags;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Mouse button state as reported by the input system.
    pub struct MouseButton : u32 {
        /// Middle mouse button.
        const MIDDLE = 4;
        /// Right mouse button.
        const RIGHT = 2;
        /// Left mouse button.
        const LEFT = 1;
        /// No buttons pressed.
        const NONE = 0;
    }
}

impl MouseButton {
    /// Returns `true` if the middle mouse button is pressed.
    pub fn is_middle(&self) -> bool { self.intersects(Self::MIDDLE) }
    /// Returns `true` if the right mouse button is pressed.
    pub fn is_right(&self) -> bool { self.intersects(Self::RIGHT) }
    /// Returns `true` if the left mouse button is pressed.
    pub fn is_left(&self) -> bool { self.intersects(Self::LEFT) }
    /// Returns `true` if no mouse buttons are pressed.
    pub fn is_none(&self) -> bool { self.bits() == 0 }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Modifier key state tracked by the input system.
    pub struct KeyMode : u32 {
        /// Super/command key held.
        const SUPER = 8;
        /// Alt key held.
        const ALT = 4;
        /// Control key held.
        const CTRL = 2;
        /// Shift key held.
        const SHIFT = 1;
        /// No modifiers active.
        const NONE = 0;
    }
}

impl KeyMode {
    /// Returns `true` if shift is held.
    pub fn is_shift(&self) -> bool { self.intersects(Self::SHIFT) }
    /// Returns `true` if control is held.
    pub fn is_ctrl(&self) -> bool { self.intersects(Self::CTRL) }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// A key press delivered to the UI.
pub enum Key {
    /// Escape.
    Escape,
    /// Return/Enter.
    Enter,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// A printable key, reported in lower case; used for shortcuts such as Ctrl+C.
    Char(char),
}

/// System clipboard collaborator.
pub trait Clipboard {
    /// Current clipboard text.
    fn get(&self) -> Option<String>;
    /// Replaces the clipboard text.
    fn set(&mut self, text: &str);
}

/// Clipboard kept in process memory.
#[derive(Default, Debug)]
pub struct MemoryClipboard(Option<String>);

impl Clipboard for MemoryClipboard {
    fn get(&self) -> Option<String> { self.0.clone() }

    fn set(&mut self, text: &str) { self.0 = Some(text.to_string()); }
}

const UNCLOCKED_FRAME_TIME: f32 = 1.0 / 60.0;

/// Input snapshot of the current frame.
///
/// The host feeds events between frames; the runtime freezes the snapshot while a frame runs and
/// clears the per-frame parts when it ends.
pub struct Io {
    mouse_pos: Vec2i,
    last_mouse_pos: Vec2i,
    mouse_delta: Vec2i,
    wheel: Vec2i,
    mouse_down: MouseButton,
    mouse_pressed: MouseButton,
    mouse_released: MouseButton,
    key_mods: KeyMode,
    keys_pressed: Vec<Key>,
    text: String,
    clipboard: Box<dyn Clipboard>,
    time: f64,
    clock_fed: bool,
    last_frame_time: f64,
    delta_time: f32,
    last_click: Option<(f64, Vec2i)>,
    double_clicked: bool,
    double_click_interval: f32,
}

impl Default for Io {
    fn default() -> Self { Self::new(0.3) }
}

impl Io {
    /// Creates an empty snapshot using an in-memory clipboard.
    pub fn new(double_click_interval: f32) -> Self {
        Self {
            mouse_pos: Vec2i::default(),
            last_mouse_pos: Vec2i::default(),
            mouse_delta: Vec2i::default(),
            wheel: Vec2i::default(),
            mouse_down: MouseButton::NONE,
            mouse_pressed: MouseButton::NONE,
            mouse_released: MouseButton::NONE,
            key_mods: KeyMode::NONE,
            keys_pressed: Vec::new(),
            text: String::new(),
            clipboard: Box::new(MemoryClipboard::default()),
            time: 0.0,
            clock_fed: false,
            last_frame_time: 0.0,
            delta_time: 0.0,
            last_click: None,
            double_clicked: false,
            double_click_interval,
        }
    }

    /// Replaces the clipboard collaborator.
    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) { self.clipboard = clipboard; }

    /// Updates the current mouse pointer position.
    pub fn mousemove(&mut self, x: i32, y: i32) { self.mouse_pos = vec2(x, y); }

    /// Records that the specified mouse button was pressed.
    pub fn mousedown(&mut self, x: i32, y: i32, btn: MouseButton) {
        self.mousemove(x, y);
        self.mouse_down |= btn;
        self.mouse_pressed |= btn;
        if btn.is_left() {
            let pos = self.mouse_pos;
            match self.last_click {
                Some((t, p)) if self.time - t <= f64::from(self.double_click_interval) && (p.x - pos.x).abs() <= 4 && (p.y - pos.y).abs() <= 4 => {
                    self.double_clicked = true;
                    self.last_click = None;
                }
                _ => self.last_click = Some((self.time, pos)),
            }
        }
    }

    /// Records that the specified mouse button was released.
    pub fn mouseup(&mut self, x: i32, y: i32, btn: MouseButton) {
        self.mousemove(x, y);
        self.mouse_down &= !btn;
        self.mouse_released |= btn;
    }

    /// Accumulates scroll wheel movement, in notches.
    pub fn scroll(&mut self, x: i32, y: i32) {
        self.wheel.x += x;
        self.wheel.y += y;
    }

    /// Sets the held modifier keys.
    pub fn set_modifiers(&mut self, mods: KeyMode) { self.key_mods = mods; }

    /// Records a key press.
    pub fn keydown(&mut self, key: Key) { self.keys_pressed.push(key); }

    /// Appends UTF-8 text typed this frame.
    pub fn text_input(&mut self, text: &str) { self.text.push_str(text); }

    /// Sets the host clock, in seconds.
    pub fn set_time(&mut self, seconds: f64) {
        self.time = seconds;
        self.clock_fed = true;
    }

    /// Advances the host clock by `dt` seconds.
    pub fn advance_time(&mut self, dt: f64) {
        self.time += dt;
        self.clock_fed = true;
    }

    /// Mouse position in screen coordinates.
    pub fn mouse_pos(&self) -> Vec2i { self.mouse_pos }

    /// Mouse movement since the previous frame.
    pub fn mouse_delta(&self) -> Vec2i { self.mouse_delta }

    /// Wheel movement of this frame, in notches.
    pub fn wheel(&self) -> Vec2i { self.wheel }

    /// Buttons held.
    pub fn mouse_down(&self) -> MouseButton { self.mouse_down }

    /// Buttons pressed this frame.
    pub fn mouse_pressed(&self) -> MouseButton { self.mouse_pressed }

    /// Buttons released this frame.
    pub fn mouse_released(&self) -> MouseButton { self.mouse_released }

    /// Held modifiers.
    pub fn modifiers(&self) -> KeyMode { self.key_mods }

    /// Keys pressed this frame, in order.
    pub fn keys(&self) -> &[Key] { &self.keys_pressed }

    /// Returns `true` if `key` was pressed this frame.
    pub fn is_key_pressed(&self, key: Key) -> bool { self.keys_pressed.contains(&key) }

    /// Text typed this frame.
    pub fn text(&self) -> &str { &self.text }

    /// Seconds elapsed between the previous frame and this one. Until the host feeds a clock
    /// through [`Io::set_time`] or [`Io::advance_time`], every frame counts as 1/60 s.
    pub fn delta_time(&self) -> f32 { self.delta_time }

    /// Current clipboard text.
    pub fn clipboard_get(&self) -> Option<String> { self.clipboard.get() }

    /// Replaces the clipboard text.
    pub fn clipboard_set(&mut self, text: &str) { self.clipboard.set(text) }

    /// Left button pressed this frame.
    pub fn clicked(&self) -> bool { self.mouse_pressed.is_left() }

    /// Left button held.
    pub fn is_left_mouse_down(&self) -> bool { self.mouse_down.is_left() }

    /// Left button released this frame.
    pub fn is_left_mouse_released(&self) -> bool { self.mouse_released.is_left() }

    /// Right button pressed this frame.
    pub fn is_right_clicked(&self) -> bool { self.mouse_pressed.is_right() }

    /// Second left press within the double click interval.
    pub fn is_left_mouse_double_clicked(&self) -> bool { self.double_clicked }

    pub(crate) fn prelude(&mut self) {
        self.mouse_delta.x = self.mouse_pos.x - self.last_mouse_pos.x;
        self.mouse_delta.y = self.mouse_pos.y - self.last_mouse_pos.y;
        self.delta_time = if self.clock_fed { (self.time - self.last_frame_time).max(0.0) as f32 } else { UNCLOCKED_FRAME_TIME };
        self.last_frame_time = self.time;
    }

    pub(crate) fn epilogue(&mut self) {
        self.keys_pressed.clear();
        self.text.clear();
        self.mouse_pressed = MouseButton::NONE;
        self.mouse_released = MouseButton::NONE;
        self.double_clicked = false;
        self.wheel = vec2(0, 0);
        self.last_mouse_pos = self.mouse_pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_time_without_a_clock_is_fixed() {
        let mut io = Io::default();
        io.prelude();
        assert_eq!(io.delta_time(), UNCLOCKED_FRAME_TIME);
        io.set_time(2.0);
        io.prelude();
        assert_eq!(io.delta_time(), 2.0);
        io.prelude();
        assert_eq!(io.delta_time(), 0.0);
    }

    #[test]
    fn press_is_per_frame_and_hold_persists() {
        let mut io = Io::default();
        io.mousedown(3, 4, MouseButton::LEFT);
        io.prelude();
        assert!(io.clicked());
        assert!(io.is_left_mouse_down());
        io.epilogue();
        io.prelude();
        assert!(!io.clicked());
        assert!(io.is_left_mouse_down());
    }

    #[test]
    fn double_click_within_interval() {
        let mut io = Io::new(0.3);
        io.mousedown(10, 10, MouseButton::LEFT);
        io.mouseup(10, 10, MouseButton::LEFT);
        io.epilogue();
        io.advance_time(0.1);
        io.mousedown(11, 10, MouseButton::LEFT);
        assert!(io.is_left_mouse_double_clicked());
        io.epilogue();
        io.advance_time(1.0);
        io.mousedown(11, 10, MouseButton::LEFT);
        assert!(!io.is_left_mouse_double_clicked());
    }

    #[test]
    fn mouse_delta_spans_frames() {
        let mut io = Io::default();
        io.mousemove(5, 5);
        io.prelude();
        io.epilogue();
        io.mousemove(8, 1);
        io.prelude();
        assert_eq!((io.mouse_delta().x, io.mouse_delta().y), (3, -4));
    }

    #[test]
    fn keys_and_text_are_cleared() {
        let mut io = Io::default();
        io.keydown(Key::Enter);
        io.text_input("ab");
        assert!(io.is_key_pressed(Key::Enter));
        assert_eq!(io.text(), "ab");
        io.epilogue();
        assert!(io.keys().is_empty());
        assert!(io.text().is_empty());
    }

    #[test]
    fn memory_clipboard_round_trip() {
        let mut io = Io::default();
        assert_eq!(io.clipboard_get(), None);
        io.clipboard_set("copied");
        assert_eq!(io.clipboard_get().as_deref(), Some("copied"));
    }

    #[test]
    fn right_click_predicate() {
        let mut io = Io::default();
        io.mousedown(0, 0, MouseButton::RIGHT);
        assert!(io.is_right_clicked());
        assert!(!io.clicked());
    }
}
