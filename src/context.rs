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
use crate::container::ContainerFrame;
use crate::layout::LayoutManager;
use crate::*;
use rustc_hash::FxHashMap;
use tracing::debug;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Stable index of a [`Context`] inside a [`ContextTree`].
pub struct ContextIndex(usize);

impl ContextIndex {
    /// The root context, created with the tree.
    pub const ROOT: ContextIndex = ContextIndex(0);

    /// Position in the tree's storage.
    pub fn index(self) -> usize { self.0 }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// Where a context's widgets paint.
pub enum RenderTarget {
    #[default]
    /// Straight to the renderer.
    Immediate,
    /// Into the deferred log, replayed later at an offset.
    Deferred,
}

/// An isolated identity, state and style scope.
///
/// Popups and nested item grids get their own context so their widgets never alias the
/// identity counters of the enclosing scope.
pub struct Context {
    owner: WidgetId,
    parent: Option<ContextIndex>,
    registry: IdentityRegistry,
    arena: StateArena,
    classes: FxHashMap<String, StyleOverride>,
    ids: FxHashMap<String, StyleOverride>,
    children: FxHashMap<WidgetId, ContextIndex>,
    pub(crate) layout: LayoutManager,
    pub(crate) containers: Vec<ContainerFrame>,
    pub(crate) target: RenderTarget,
    pub(crate) defer_events: bool,
}

impl Context {
    fn new(owner: WidgetId, parent: Option<ContextIndex>, config: &Config) -> Self {
        Self {
            owner,
            parent,
            registry: IdentityRegistry::new(config.label_arena_ceiling),
            arena: StateArena::new(config),
            classes: FxHashMap::default(),
            ids: FxHashMap::default(),
            children: FxHashMap::default(),
            layout: LayoutManager::new(config.spacing, config.default_widget_height),
            containers: Vec::new(),
            target: RenderTarget::Immediate,
            defer_events: false,
        }
    }

    /// Widget owning the context; [`WidgetId::NONE`] for the root.
    pub fn owner(&self) -> WidgetId { self.owner }

    /// Enclosing context.
    pub fn parent(&self) -> Option<ContextIndex> { self.parent }

    /// Identity registry of the context.
    pub fn registry(&self) -> &IdentityRegistry { &self.registry }

    /// State arena of the context.
    pub fn arena(&self) -> &StateArena { &self.arena }

    /// Mutable state arena of the context.
    pub fn arena_mut(&mut self) -> &mut StateArena { &mut self.arena }

    /// Registers the style of a `.class` selector for this context and its descendants.
    pub fn register_class(&mut self, class: &str, style: StyleOverride) { self.classes.insert(class.to_string(), style); }

    /// Registers the style of an `#id` selector for this context and its descendants.
    pub fn register_id(&mut self, id: &str, style: StyleOverride) { self.ids.insert(id.to_string(), style); }

    /// Active render target.
    pub fn target(&self) -> RenderTarget { self.target }

    /// Returns `true` when interactions are queued for replay instead of evaluated.
    pub fn defers_events(&self) -> bool { self.defer_events }
}

/// Arena of contexts addressed by [`ContextIndex`]; contexts are never removed.
pub struct ContextTree {
    nodes: Vec<Context>,
    current: ContextIndex,
    config: Config,
}

impl ContextTree {
    /// Creates the tree with its root context.
    pub fn new(config: &Config) -> Self {
        let mut root = Context::new(WidgetId::NONE, None, config);
        root.layout.reset(rect(0, 0, config.window_size.x, config.window_size.y));
        Self { nodes: vec![root], current: ContextIndex::ROOT, config: config.clone() }
    }

    /// Number of contexts created so far.
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Always `false`: the root exists for the lifetime of the tree.
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Index of the current context.
    pub fn current(&self) -> ContextIndex { self.current }

    /// Context at `index`.
    pub fn get(&self, index: ContextIndex) -> &Context { &self.nodes[index.0] }

    /// Mutable context at `index`.
    pub fn get_mut(&mut self, index: ContextIndex) -> &mut Context { &mut self.nodes[index.0] }

    /// Current context.
    pub fn current_ctx(&self) -> &Context { self.get(self.current) }

    /// Mutable current context.
    pub fn current_ctx_mut(&mut self) -> &mut Context {
        let c = self.current;
        self.get_mut(c)
    }

    /// Child of `parent` owned by `owner`, if it was created.
    pub fn child(&self, parent: ContextIndex, owner: WidgetId) -> Option<ContextIndex> { self.get(parent).children.get(&owner).copied() }

    /// Enters the child context owned by `owner`, creating it on first use.
    ///
    /// The child's layout cursor starts at the parent's cursor and it inherits the parent's
    /// render target and event deferral.
    pub fn push_context(&mut self, owner: WidgetId) -> ContextIndex {
        let parent = self.current;
        let index = match self.child(parent, owner) {
            Some(index) => index,
            None => {
                let index = ContextIndex(self.nodes.len());
                self.nodes.push(Context::new(owner, Some(parent), &self.config));
                self.nodes[parent.0].children.insert(owner, index);
                debug!(?owner, parent = parent.0, index = index.0, "context created");
                index
            }
        };
        let (cursor, width, height, target, defer) = {
            let p = self.get(parent);
            let body = p.layout.current_body();
            let cursor = p.layout.cursor();
            (cursor, p.layout.remaining_width(), body.y + body.height - cursor.y, p.target, p.defer_events)
        };
        let child = self.get_mut(index);
        child.layout.reset(rect(cursor.x, cursor.y, width, height.max(0)));
        child.containers.clear();
        child.target = target;
        child.defer_events = defer;
        self.current = index;
        index
    }

    /// Returns to the parent of the current context. The root is never popped.
    pub fn pop_context(&mut self) -> ContextIndex {
        let parent = self.current_ctx().parent;
        assert!(parent.is_some(), "pop_context called on the root context");
        if let Some(p) = parent {
            self.current = p;
        }
        self.current
    }

    /// Returns `true` when `index` is `ancestor` or lies below it.
    pub fn is_descendant(&self, index: ContextIndex, ancestor: ContextIndex) -> bool {
        let mut cursor = Some(index);
        while let Some(c) = cursor {
            if c == ancestor {
                return true;
            }
            cursor = self.get(c).parent;
        }
        false
    }

    /// Style of `class` registered in `index` or its nearest ancestor.
    pub fn find_class(&self, index: ContextIndex, class: &str) -> Option<&StyleOverride> {
        let mut cursor = Some(index);
        while let Some(c) = cursor {
            let ctx = self.get(c);
            if let Some(s) = ctx.classes.get(class) {
                return Some(s);
            }
            cursor = ctx.parent;
        }
        None
    }

    /// Style of `id` registered in `index` or its nearest ancestor.
    pub fn find_id(&self, index: ContextIndex, id: &str) -> Option<&StyleOverride> {
        let mut cursor = Some(index);
        while let Some(c) = cursor {
            let ctx = self.get(c);
            if let Some(s) = ctx.ids.get(id) {
                return Some(s);
            }
            cursor = ctx.parent;
        }
        None
    }

    fn selector_style(&self, index: ContextIndex, label: &str, source: Option<&dyn StyleSource>) -> StyleOverride {
        let decoration = LabelDecoration::parse(label);
        let mut merged = StyleOverride::default();
        for class in &decoration.classes {
            match self.find_class(index, class) {
                Some(s) => merged.merge_from(s),
                None => {
                    if let Some(s) = source.and_then(|src| src.class_style(class)) {
                        merged.merge_from(&s);
                    }
                }
            }
        }
        if let Some(id) = decoration.id {
            match self.find_id(index, id) {
                Some(s) => merged.merge_from(s),
                None => {
                    if let Some(s) = source.and_then(|src| src.id_style(id)) {
                        merged.merge_from(&s);
                    }
                }
            }
        }
        merged
    }

    /// Id of `key` in the current context, registering it on first use.
    ///
    /// A label seen for the first time has its `#id .class` selectors resolved against the
    /// context chain, then `source`, and the result installed as the instance style override.
    pub fn get_or_create_id(&mut self, key: WidgetKey<'_>, ty: WidgetType, source: Option<&dyn StyleSource>) -> (WidgetId, bool) {
        let index = self.current;
        let (id, first) = self.get_mut(index).registry.get_or_create(key, ty);
        if first && self.get(index).registry.label(id).is_some() {
            if let WidgetKey::Label(label) = key {
                let style = self.selector_style(index, label, source);
                if !style.is_empty() {
                    self.get_mut(index).arena.set_style_override(id, style);
                }
            }
        }
        (id, first)
    }

    /// Ephemeral id for an unkeyed widget in the current context.
    pub fn ephemeral_id(&mut self, ty: WidgetType) -> (WidgetId, bool) { self.current_ctx_mut().registry.ephemeral(ty) }

    /// Prepares every context for a new frame and makes the root current.
    pub(crate) fn begin_frame(&mut self, window: Vec2i) {
        for ctx in self.nodes.iter_mut() {
            ctx.registry.begin_frame();
            ctx.containers.clear();
            ctx.target = RenderTarget::Immediate;
            ctx.defer_events = false;
        }
        self.current = ContextIndex::ROOT;
        self.nodes[0].layout.reset(rect(0, 0, window.x, window.y));
    }

    /// Soft-resets the state of every widget in `index` and its descendants.
    pub fn soft_reset(&mut self, index: ContextIndex) {
        let mut pending = vec![index];
        while let Some(i) = pending.pop() {
            let ctx = self.get_mut(i);
            ctx.arena.soft_reset_all();
            pending.extend(ctx.children.values().copied());
        }
    }
}
