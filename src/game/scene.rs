use std::collections::BTreeMap;

use hashbrown::HashMap;
use verdure_ambient::DropId;
use verdure_world::{Column, Tag, Tree, TreeData, TreeKey};

use crate::host::{IdAllocator, Layer, ObjectId, SceneObject, SpatialRegistry};

/// What a registered object stands for on the simulation side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handle {
    Avatar,
    Block { column: i32 },
    Trunk(TreeKey),
    Leaf { tree: TreeKey, index: usize },
    Fruit { tree: TreeKey, index: usize },
    Drop(DropId),
    Scenery(Tag),
}

struct TreeObjects {
    trunk: ObjectId,
    leaves: Vec<ObjectId>,
    fruits: Vec<Option<ObjectId>>,
}

/// Registry plus the bookkeeping that maps simulation objects to registry ids.
pub(crate) struct Scene<R> {
    pub(crate) registry: R,
    ids: IdAllocator,
    handles: HashMap<ObjectId, (Handle, Layer)>,
    columns: BTreeMap<i32, Vec<ObjectId>>,
    trees: BTreeMap<TreeKey, TreeObjects>,
    drops: HashMap<DropId, ObjectId>,
}

impl<R: SpatialRegistry> Scene<R> {
    pub(crate) fn new(registry: R) -> Self {
        Self {
            registry,
            ids: IdAllocator::default(),
            handles: HashMap::new(),
            columns: BTreeMap::new(),
            trees: BTreeMap::new(),
            drops: HashMap::new(),
        }
    }

    pub(crate) fn add(&mut self, object: SceneObject, layer: Layer, handle: Handle) -> ObjectId {
        let id = self.ids.alloc();
        self.registry.add(id, object, layer);
        self.handles.insert(id, (handle, layer));
        id
    }

    pub(crate) fn remove(&mut self, id: ObjectId) -> bool {
        match self.handles.remove(&id) {
            Some((_, layer)) => self.registry.remove(id, layer),
            None => false,
        }
    }

    #[inline]
    pub(crate) fn handle(&self, id: ObjectId) -> Option<Handle> {
        self.handles.get(&id).map(|(h, _)| *h)
    }

    pub(crate) fn object_count(&self) -> usize {
        self.handles.len()
    }

    pub(crate) fn add_column(&mut self, column: &Column) {
        let ids = column
            .blocks
            .iter()
            .map(|b| {
                self.add(
                    SceneObject::world(Tag::Ground, b.bounds()),
                    Layer::StaticObjects,
                    Handle::Block { column: column.x },
                )
            })
            .collect();
        if let Some(stale) = self.columns.insert(column.x, ids) {
            for id in stale {
                self.remove(id);
            }
        }
    }

    pub(crate) fn remove_column(&mut self, x: i32) {
        for id in self.columns.remove(&x).unwrap_or_default() {
            self.remove(id);
        }
    }

    pub(crate) fn add_tree(&mut self, tree: &Tree, data: &TreeData) {
        let key = tree.key();
        self.remove_tree(key);
        let trunk = self.add(
            SceneObject::world(Tag::Tree, tree.bounds()),
            Layer::StaticObjects,
            Handle::Trunk(key),
        );
        let leaves = data
            .leaves
            .iter()
            .enumerate()
            .map(|(index, leaf)| {
                self.add(
                    SceneObject::world(Tag::Leaf, leaf.bounds()),
                    Layer::StaticObjects,
                    Handle::Leaf { tree: key, index },
                )
            })
            .collect();
        let fruits = data
            .fruits
            .iter()
            .enumerate()
            .map(|(index, fruit)| {
                fruit.is_visible().then(|| {
                    self.add(
                        SceneObject::world(Tag::Fruit, fruit.bounds()),
                        Layer::StaticObjects,
                        Handle::Fruit { tree: key, index },
                    )
                })
            })
            .collect();
        self.trees.insert(
            key,
            TreeObjects {
                trunk,
                leaves,
                fruits,
            },
        );
    }

    pub(crate) fn remove_tree(&mut self, key: TreeKey) {
        let Some(objs) = self.trees.remove(&key) else {
            return;
        };
        self.remove(objs.trunk);
        for id in objs.leaves {
            self.remove(id);
        }
        for id in objs.fruits.into_iter().flatten() {
            self.remove(id);
        }
    }

    /// Pushes leaf bounds and fruit visibility for one live tree.
    pub(crate) fn sync_tree(&mut self, key: TreeKey, data: &TreeData) {
        let Some(mut objs) = self.trees.remove(&key) else {
            return;
        };
        for (id, leaf) in objs.leaves.iter().zip(&data.leaves) {
            self.registry.set_bounds(*id, leaf.bounds());
        }
        for (index, (slot, fruit)) in objs.fruits.iter_mut().zip(&data.fruits).enumerate() {
            match (*slot, fruit.is_visible()) {
                (Some(id), false) => {
                    self.remove(id);
                    *slot = None;
                }
                (None, true) => {
                    *slot = Some(self.add(
                        SceneObject::world(Tag::Fruit, fruit.bounds()),
                        Layer::StaticObjects,
                        Handle::Fruit { tree: key, index },
                    ));
                }
                _ => {}
            }
        }
        self.trees.insert(key, objs);
    }

    pub(crate) fn add_drop(&mut self, drop: DropId, object: SceneObject) {
        let id = self.add(object, Layer::StaticObjects, Handle::Drop(drop));
        self.drops.insert(drop, id);
    }

    pub(crate) fn drop_object(&self, drop: DropId) -> Option<ObjectId> {
        self.drops.get(&drop).copied()
    }

    pub(crate) fn remove_drop(&mut self, drop: DropId) {
        if let Some(id) = self.drops.remove(&drop) {
            self.remove(id);
        }
    }

    pub(crate) fn column_keys(&self) -> impl Iterator<Item = i32> + '_ {
        self.columns.keys().copied()
    }

    pub(crate) fn tree_keys(&self) -> impl Iterator<Item = TreeKey> + '_ {
        self.trees.keys().copied()
    }
}
