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
use crate::{Error, Result};
use bitflags::bitflags;
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use tracing::warn;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
/// Kind of widget; selects which arena an id indexes.
pub enum WidgetType {
    /// Static text.
    Label = 0,
    /// Push button.
    Button = 1,
    /// Two-state box bound to a `bool`.
    Checkbox = 2,
    /// Horizontal value slider.
    Slider = 3,
    /// Single line text editor.
    TextInput = 4,
    /// Clipped, scrollable content area.
    ScrollRegion = 5,
    /// Row of selectable tabs.
    TabBar = 6,
    /// Collapsible section.
    Accordion = 7,
    /// Table with resizable columns.
    ItemGrid = 8,
    /// Floating overlay with its own context.
    Popup = 9,
}

impl WidgetType {
    /// Number of widget types.
    pub const COUNT: usize = 10;

    /// Every widget type in discriminant order.
    pub const ALL: [WidgetType; Self::COUNT] = [
        Self::Label,
        Self::Button,
        Self::Checkbox,
        Self::Slider,
        Self::TextInput,
        Self::ScrollRegion,
        Self::TabBar,
        Self::Accordion,
        Self::ItemGrid,
        Self::Popup,
    ];

    /// Position of the type in [`WidgetType::ALL`].
    pub fn index(self) -> usize { self as usize }

    /// Inverse of [`WidgetType::index`].
    pub fn from_index(index: usize) -> Option<Self> { Self::ALL.get(index).copied() }

    /// Number of arena slots allocated at once when the host gives no hint.
    pub fn default_batch_size(self) -> usize {
        match self {
            Self::Label => 64,
            Self::Button => 32,
            Self::Checkbox | Self::Accordion => 16,
            Self::Slider | Self::TextInput => 8,
            Self::ScrollRegion | Self::TabBar => 4,
            Self::ItemGrid | Self::Popup => 2,
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Set of widget types, e.g. the types that ignore the ambient style stack.
    pub struct WidgetTypes : u32 {
        /// [`WidgetType::Label`].
        const LABEL = 1 << 0;
        /// [`WidgetType::Button`].
        const BUTTON = 1 << 1;
        /// [`WidgetType::Checkbox`].
        const CHECKBOX = 1 << 2;
        /// [`WidgetType::Slider`].
        const SLIDER = 1 << 3;
        /// [`WidgetType::TextInput`].
        const TEXT_INPUT = 1 << 4;
        /// [`WidgetType::ScrollRegion`].
        const SCROLL_REGION = 1 << 5;
        /// [`WidgetType::TabBar`].
        const TAB_BAR = 1 << 6;
        /// [`WidgetType::Accordion`].
        const ACCORDION = 1 << 7;
        /// [`WidgetType::ItemGrid`].
        const ITEM_GRID = 1 << 8;
        /// [`WidgetType::Popup`].
        const POPUP = 1 << 9;
    }
}

impl From<WidgetType> for WidgetTypes {
    fn from(ty: WidgetType) -> Self { Self::from_bits_truncate(1 << ty.index()) }
}

impl WidgetTypes {
    /// Returns `true` if `ty` is in the set.
    pub fn has(self, ty: WidgetType) -> bool { self.contains(WidgetTypes::from(ty)) }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
/// Packed widget identifier: `(type << TYPE_SHIFT) | index`.
///
/// An id is only meaningful against the arena of the context that minted it.
pub struct WidgetId(u32);

impl WidgetId {
    /// Bit position of the type tag.
    pub const TYPE_SHIFT: u32 = 24;
    /// Mask selecting the arena index.
    pub const INDEX_MASK: u32 = (1 << Self::TYPE_SHIFT) - 1;
    /// Owner id of the root context.
    pub const NONE: WidgetId = WidgetId(u32::MAX);

    /// Packs a type and an arena index.
    pub fn new(ty: WidgetType, index: u32) -> Self {
        assert!(index <= Self::INDEX_MASK, "widget index {index} does not fit in {} bits", Self::TYPE_SHIFT);
        Self(((ty as u32) << Self::TYPE_SHIFT) | index)
    }

    /// Type tag of the id.
    pub fn ty(self) -> WidgetType {
        WidgetType::from_index((self.0 >> Self::TYPE_SHIFT) as usize).expect("widget id carries an unknown type tag")
    }

    /// Arena index of the id.
    pub fn index(self) -> usize { (self.0 & Self::INDEX_MASK) as usize }

    /// Raw packed value.
    pub fn raw(self) -> u32 { self.0 }
}

#[derive(Copy, Clone, Debug)]
/// External key a caller identifies a widget with.
pub enum WidgetKey<'a> {
    /// A label, optionally decorated with `#id .class` selectors.
    Label(&'a str),
    /// Address of the output variable bound to the widget.
    Pointer(usize),
    /// Caller supplied number.
    Explicit(u32),
}

impl<'a> WidgetKey<'a> {
    /// Keys a widget by the address of the value it writes to.
    pub fn from_ptr<T: ?Sized>(value: &T) -> Self { Self::Pointer(value as *const T as *const () as usize) }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Location of an interned label inside a [`LabelArena`].
pub struct LabelRef {
    start: u32,
    len: u32,
}

/// Append-only store of label strings.
///
/// Labels are never freed; they are addressed through [`LabelRef`] so growth of the backing
/// buffer never invalidates a reference. The store refuses to grow past its ceiling.
#[derive(Debug)]
pub struct LabelArena {
    buf: String,
    ceiling: usize,
}

impl LabelArena {
    /// Creates an empty arena bounded by `ceiling` bytes. Offsets are 32-bit, so the ceiling
    /// never exceeds `u32::MAX`.
    pub fn new(ceiling: usize) -> Self { Self { buf: String::new(), ceiling: ceiling.min(u32::MAX as usize) } }

    /// Copies `label` into the arena.
    pub fn intern(&mut self, label: &str) -> Result<LabelRef> {
        let requested = self.buf.len() + label.len();
        if requested > self.ceiling {
            return Err(Error::LabelArenaExhausted { requested, ceiling: self.ceiling });
        }
        let start = self.buf.len() as u32;
        self.buf.push_str(label);
        Ok(LabelRef { start, len: label.len() as u32 })
    }

    /// Resolves an interned label.
    pub fn get(&self, r: LabelRef) -> &str { &self.buf[r.start as usize..(r.start + r.len) as usize] }

    /// Bytes currently held.
    pub fn len(&self) -> usize { self.buf.len() }

    /// Returns `true` when nothing was interned yet.
    pub fn is_empty(&self) -> bool { self.buf.is_empty() }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A label split into its display text and its `#id .class` selectors.
///
/// `"Save#save-btn .primary .wide"` displays `Save`, has id `save-btn` and classes
/// `primary` and `wide`. Everything after the first `#` is decoration.
pub struct LabelDecoration<'a> {
    /// Text shown to the user.
    pub display: &'a str,
    /// Optional id selector.
    pub id: Option<&'a str>,
    /// Class selectors in declaration order.
    pub classes: Vec<&'a str>,
}

impl<'a> LabelDecoration<'a> {
    /// Splits a label.
    pub fn parse(label: &'a str) -> Self {
        let (display, decoration) = match label.split_once('#') {
            Some((display, decoration)) => (display.trim_end(), decoration),
            None => return Self { display: label, id: None, classes: Vec::new() },
        };
        let mut id = None;
        let mut classes = Vec::new();
        for (i, token) in decoration.split_whitespace().enumerate() {
            if let Some(class) = token.strip_prefix('.') {
                if !class.is_empty() {
                    classes.push(class);
                }
            } else if i == 0 {
                id = Some(token);
            }
        }
        Self { display, id, classes }
    }

    /// Returns `true` when the label carries selectors.
    pub fn has_selectors(&self) -> bool { self.id.is_some() || !self.classes.is_empty() }
}

#[derive(Debug)]
struct LabelEntry {
    label: LabelRef,
    id: WidgetId,
}

/// Maps external widget keys to packed ids for one context.
///
/// Keyed ids are stable for the lifetime of the registry. Unkeyed calls get ephemeral ids that
/// are handed out again, in call order, every frame.
#[derive(Debug)]
pub struct IdentityRegistry {
    labels: FxHashMap<u64, Vec<LabelEntry>>,
    pointers: FxHashMap<(WidgetType, usize), WidgetId>,
    explicit: FxHashMap<(WidgetType, u32), WidgetId>,
    displays: FxHashMap<WidgetId, LabelRef>,
    store: LabelArena,
    next_index: [u32; WidgetType::COUNT],
    ephemeral: [Vec<u32>; WidgetType::COUNT],
    ephemeral_cursor: [usize; WidgetType::COUNT],
}

impl IdentityRegistry {
    /// Creates an empty registry whose label store is bounded by `label_ceiling` bytes.
    pub fn new(label_ceiling: usize) -> Self {
        Self {
            labels: FxHashMap::default(),
            pointers: FxHashMap::default(),
            explicit: FxHashMap::default(),
            displays: FxHashMap::default(),
            store: LabelArena::new(label_ceiling),
            next_index: [0; WidgetType::COUNT],
            ephemeral: Default::default(),
            ephemeral_cursor: [0; WidgetType::COUNT],
        }
    }

    fn label_hash(ty: WidgetType, label: &str) -> u64 {
        let mut hasher = FxHasher::default();
        ty.hash(&mut hasher);
        label.hash(&mut hasher);
        hasher.finish()
    }

    fn allocate(&mut self, ty: WidgetType) -> WidgetId {
        let index = self.next_index[ty.index()];
        self.next_index[ty.index()] += 1;
        WidgetId::new(ty, index)
    }

    /// Finds the id previously registered for `key`.
    pub fn lookup(&self, key: WidgetKey<'_>, ty: WidgetType) -> Option<WidgetId> {
        match key {
            WidgetKey::Label(label) => self
                .labels
                .get(&Self::label_hash(ty, label))?
                .iter()
                .find(|e| e.id.ty() == ty && self.store.get(e.label) == label)
                .map(|e| e.id),
            WidgetKey::Pointer(ptr) => self.pointers.get(&(ty, ptr)).copied(),
            WidgetKey::Explicit(n) => self.explicit.get(&(ty, n)).copied(),
        }
    }

    /// Returns the id for `key`, registering it on first use.
    ///
    /// The boolean is `true` when the id was created by this call. A label that no longer fits
    /// the label store degrades to an ephemeral id.
    pub fn get_or_create(&mut self, key: WidgetKey<'_>, ty: WidgetType) -> (WidgetId, bool) {
        if let Some(id) = self.lookup(key, ty) {
            return (id, false);
        }
        match key {
            WidgetKey::Label(label) => {
                let interned = match self.store.intern(label) {
                    Ok(r) => r,
                    Err(err) => {
                        warn!(%err, label, "label not interned, using an ephemeral id");
                        return self.ephemeral(ty);
                    }
                };
                let id = self.allocate(ty);
                self.labels
                    .entry(Self::label_hash(ty, label))
                    .or_default()
                    .push(LabelEntry { label: interned, id });
                self.displays.insert(id, interned);
                (id, true)
            }
            WidgetKey::Pointer(ptr) => {
                let id = self.allocate(ty);
                self.pointers.insert((ty, ptr), id);
                (id, true)
            }
            WidgetKey::Explicit(n) => {
                let id = self.allocate(ty);
                self.explicit.insert((ty, n), id);
                (id, true)
            }
        }
    }

    /// Returns the id of the next unkeyed widget of `ty` this frame.
    ///
    /// The n-th unkeyed call of a frame receives the same id every frame; the boolean is `true`
    /// when the slot did not exist before.
    pub fn ephemeral(&mut self, ty: WidgetType) -> (WidgetId, bool) {
        let t = ty.index();
        let cursor = self.ephemeral_cursor[t];
        self.ephemeral_cursor[t] += 1;
        if let Some(index) = self.ephemeral[t].get(cursor) {
            return (WidgetId::new(ty, *index), false);
        }
        let id = self.allocate(ty);
        self.ephemeral[t].push(id.index() as u32);
        (id, true)
    }

    /// Full label (selectors included) registered for `id`.
    pub fn label(&self, id: WidgetId) -> Option<&str> { self.displays.get(&id).map(|r| self.store.get(*r)) }

    /// Number of indices handed out for `ty`.
    pub fn allocated(&self, ty: WidgetType) -> usize { self.next_index[ty.index()] as usize }

    /// Bytes held by the label store.
    pub fn label_bytes(&self) -> usize { self.store.len() }

    /// Restarts ephemeral id assignment for a new frame.
    pub fn begin_frame(&mut self) { self.ephemeral_cursor = [0; WidgetType::COUNT]; }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_id_round_trips() {
        let id = WidgetId::new(WidgetType::Slider, 77);
        assert_eq!(id.ty(), WidgetType::Slider);
        assert_eq!(id.index(), 77);
        assert_eq!(id.raw(), (3 << WidgetId::TYPE_SHIFT) | 77);
    }

    #[test]
    #[should_panic]
    fn index_overflow_is_fatal() { let _ = WidgetId::new(WidgetType::Label, WidgetId::INDEX_MASK + 1); }

    #[test]
    fn same_label_same_id() {
        let mut reg = IdentityRegistry::new(1024);
        let (a, first) = reg.get_or_create(WidgetKey::Label("submit"), WidgetType::Button);
        assert!(first);
        reg.begin_frame();
        let (b, again) = reg.get_or_create(WidgetKey::Label("submit"), WidgetType::Button);
        assert_eq!(a, b);
        assert!(!again);
    }

    #[test]
    fn distinct_labels_distinct_ids() {
        let mut reg = IdentityRegistry::new(1024);
        let (a, _) = reg.get_or_create(WidgetKey::Label("ok"), WidgetType::Button);
        let (b, _) = reg.get_or_create(WidgetKey::Label("cancel"), WidgetType::Button);
        assert_ne!(a, b);
    }

    #[test]
    fn same_label_different_type_is_distinct() {
        let mut reg = IdentityRegistry::new(1024);
        let (a, _) = reg.get_or_create(WidgetKey::Label("name"), WidgetType::Label);
        let (b, _) = reg.get_or_create(WidgetKey::Label("name"), WidgetType::TextInput);
        assert_ne!(a, b);
        assert_eq!(b.ty(), WidgetType::TextInput);
    }

    #[test]
    fn pointer_keys_are_stable() {
        let mut reg = IdentityRegistry::new(1024);
        let value = true;
        let (a, _) = reg.get_or_create(WidgetKey::from_ptr(&value), WidgetType::Checkbox);
        let (b, first) = reg.get_or_create(WidgetKey::from_ptr(&value), WidgetType::Checkbox);
        assert_eq!(a, b);
        assert!(!first);
    }

    #[test]
    fn ephemeral_ids_repeat_per_frame_and_skip_keyed_indices() {
        let mut reg = IdentityRegistry::new(1024);
        let (e0, fresh) = reg.ephemeral(WidgetType::Label);
        assert!(fresh);
        let (keyed, _) = reg.get_or_create(WidgetKey::Label("title"), WidgetType::Label);
        let (e1, _) = reg.ephemeral(WidgetType::Label);
        assert_ne!(e1, keyed);

        reg.begin_frame();
        assert_eq!(reg.ephemeral(WidgetType::Label), (e0, false));
        assert_eq!(reg.ephemeral(WidgetType::Label), (e1, false));
    }

    #[test]
    fn exhausted_store_degrades_to_ephemeral() {
        let mut reg = IdentityRegistry::new(4);
        let (a, _) = reg.get_or_create(WidgetKey::Label("long label"), WidgetType::Button);
        assert!(reg.label(a).is_none());
        assert_eq!(reg.label_bytes(), 0);
    }

    #[test]
    fn label_arena_enforces_ceiling() {
        let mut arena = LabelArena::new(6);
        let r = arena.intern("abc").unwrap();
        assert_eq!(arena.get(r), "abc");
        assert_eq!(arena.intern("defg"), Err(Error::LabelArenaExhausted { requested: 7, ceiling: 6 }));
    }

    #[test]
    fn decoration_parses_id_and_classes() {
        let d = LabelDecoration::parse("Save #save-btn .primary .wide");
        assert_eq!(d.display, "Save");
        assert_eq!(d.id, Some("save-btn"));
        assert_eq!(d.classes, vec!["primary", "wide"]);
    }

    #[test]
    fn decoration_without_hash_is_plain() {
        let d = LabelDecoration::parse("Plain text");
        assert_eq!(d.display, "Plain text");
        assert!(!d.has_selectors());
    }

    #[test]
    fn decoration_class_only() {
        assert_eq!(LabelDecoration::parse("Go#.accent").classes, vec!["accent"]);
        let d = LabelDecoration::parse("Go# .accent");
        assert_eq!(d.id, None);
        assert_eq!(d.classes, vec!["accent"]);
    }
}
