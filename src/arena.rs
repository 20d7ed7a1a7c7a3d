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
use crate::{Config, StyleOverride, WidgetDrawResult, WidgetId, WidgetState, WidgetType};
use tracing::debug;

#[derive(Clone, Debug)]
/// One widget instance in a [`StateArena`].
pub struct ArenaSlot {
    /// Persistent state, discriminated by the widget type of the arena.
    pub state: WidgetState,
    /// Per-state style override registered through `#id .class` selectors.
    pub style: Option<StyleOverride>,
    /// Result produced by a deferred replay, handed back on the widget's next call.
    pub pending: Option<WidgetDrawResult>,
}

impl ArenaSlot {
    fn new(ty: WidgetType) -> Self { Self { state: WidgetState::new(ty), style: None, pending: None } }
}

/// Per-type growable store of widget state, addressed by [`WidgetId`].
///
/// Storage grows in fixed-size blocks that are never moved or freed, so an index keeps addressing
/// the same slot for the lifetime of the arena. The block length of a type is fixed when its
/// first block is allocated.
#[derive(Debug)]
pub struct StateArena {
    blocks: [Vec<Box<[ArenaSlot]>>; WidgetType::COUNT],
    block_len: [usize; WidgetType::COUNT],
}

impl StateArena {
    /// Creates an empty arena whose block lengths follow [`Config::batch_size`].
    pub fn new(config: &Config) -> Self {
        let mut block_len = [0; WidgetType::COUNT];
        for ty in WidgetType::ALL {
            block_len[ty.index()] = config.batch_size(ty);
        }
        Self::with_block_lengths(block_len)
    }

    /// Creates an empty arena with explicit block lengths.
    pub fn with_block_lengths(block_len: [usize; WidgetType::COUNT]) -> Self {
        assert!(block_len.iter().all(|n| *n > 0), "arena block length must be non-zero");
        Self { blocks: Default::default(), block_len }
    }

    /// Number of slots currently allocated for `ty`.
    pub fn capacity(&self, ty: WidgetType) -> usize { self.blocks[ty.index()].len() * self.block_len[ty.index()] }

    /// Grows the arena of `ty` until it holds at least `len` slots.
    pub fn reserve(&mut self, ty: WidgetType, len: usize) {
        let t = ty.index();
        let before = self.capacity(ty);
        while self.capacity(ty) < len {
            let block: Box<[ArenaSlot]> = (0..self.block_len[t]).map(|_| ArenaSlot::new(ty)).collect();
            self.blocks[t].push(block);
        }
        if self.capacity(ty) != before {
            debug!(?ty, from = before, to = self.capacity(ty), "state arena grown");
        }
    }

    /// Slot of `id` if it was allocated.
    pub fn get(&self, id: WidgetId) -> Option<&ArenaSlot> {
        let t = id.ty().index();
        let len = self.block_len[t];
        self.blocks[t].get(id.index() / len).map(|b| &b[id.index() % len])
    }

    /// Slot of `id`, growing the arena when the index is past its capacity.
    pub fn get_mut(&mut self, id: WidgetId) -> &mut ArenaSlot {
        let ty = id.ty();
        self.reserve(ty, id.index() + 1);
        let t = ty.index();
        let len = self.block_len[t];
        assert!(id.index() < self.capacity(ty), "arena index {} out of range after growth", id.index());
        let slot = &mut self.blocks[t][id.index() / len][id.index() % len];
        debug_assert_eq!(slot.state.ty(), ty);
        slot
    }

    /// Persistent state of `id`.
    pub fn state_mut(&mut self, id: WidgetId) -> &mut WidgetState { &mut self.get_mut(id).state }

    /// Installs the style override of `id`, replacing any earlier one.
    pub fn set_style_override(&mut self, id: WidgetId, style: StyleOverride) { self.get_mut(id).style = Some(style); }

    /// Clears the transient fields of every allocated slot.
    pub fn soft_reset_all(&mut self) {
        for blocks in self.blocks.iter_mut() {
            for slot in blocks.iter_mut().flat_map(|b| b.iter_mut()) {
                slot.state.soft_reset();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec2;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};

    fn small_arena() -> StateArena { StateArena::with_block_lengths([4; WidgetType::COUNT]) }

    #[test]
    fn grows_in_blocks() {
        let mut arena = small_arena();
        assert_eq!(arena.capacity(WidgetType::Button), 0);
        arena.get_mut(WidgetId::new(WidgetType::Button, 0));
        assert_eq!(arena.capacity(WidgetType::Button), 4);
        arena.get_mut(WidgetId::new(WidgetType::Button, 9));
        assert_eq!(arena.capacity(WidgetType::Button), 12);
        assert_eq!(arena.capacity(WidgetType::Label), 0);
    }

    #[test]
    fn growth_preserves_existing_state() {
        let mut arena = small_arena();
        let id = WidgetId::new(WidgetType::ScrollRegion, 1);
        arena.state_mut(id).as_scroll_region_mut().unwrap().scroll = vec2(3, 70);
        arena.get_mut(WidgetId::new(WidgetType::ScrollRegion, 100));
        assert_eq!(arena.get(id).unwrap().state.as_scroll_region().unwrap().scroll.y, 70);
    }

    #[test]
    fn new_slots_are_default_constructed_per_type() {
        let mut arena = small_arena();
        let slot = arena.get_mut(WidgetId::new(WidgetType::Slider, 2));
        assert_eq!(slot.state.ty(), WidgetType::Slider);
        assert!(slot.style.is_none());
        assert!(slot.pending.is_none());
    }

    #[test]
    fn batch_size_comes_from_config() {
        let mut arena = StateArena::new(&Config::default());
        arena.reserve(WidgetType::Label, 1);
        assert_eq!(arena.capacity(WidgetType::Label), WidgetType::Label.default_batch_size());
    }

    #[test]
    fn soft_reset_all_clears_hover() {
        let mut arena = small_arena();
        let id = WidgetId::new(WidgetType::Button, 0);
        arena.state_mut(id).as_button_mut().unwrap().hovered = true;
        arena.soft_reset_all();
        assert!(!arena.get(id).unwrap().state.as_button().unwrap().hovered);
    }

    #[test]
    fn random_growth_keeps_values() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
        let mut arena = small_arena();
        let mut expected = Vec::new();
        for _ in 0..500 {
            let index = rng.random_range(0..2000u32);
            let value = rng.random_range(0.0..1.0f32);
            let id = WidgetId::new(WidgetType::Slider, index);
            arena.state_mut(id).as_slider_mut().unwrap().value = value;
            expected.retain(|(i, _)| *i != index);
            expected.push((index, value));
        }
        for (index, value) in expected {
            let slot = arena.get(WidgetId::new(WidgetType::Slider, index)).unwrap();
            assert_eq!(slot.state.as_slider().unwrap().value, value);
        }
    }

    proptest! {
        #[test]
        fn growth_never_loses_earlier_indices(old in 0u32..64, grow_to in 64u32..4096) {
            let mut arena = small_arena();
            let id = WidgetId::new(WidgetType::Accordion, old);
            arena.state_mut(id).as_accordion_mut().unwrap().content_height = old as i32 + 1;
            arena.get_mut(WidgetId::new(WidgetType::Accordion, grow_to));
            prop_assert!(arena.capacity(WidgetType::Accordion) > grow_to as usize);
            prop_assert_eq!(arena.get(id).unwrap().state.as_accordion().unwrap().content_height, old as i32 + 1);
        }
    }
}
