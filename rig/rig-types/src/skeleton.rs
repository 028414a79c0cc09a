//! Bone arena with stable indices and a synchronized name lookup.

use hashbrown::HashMap;

use crate::bone::{Bone, BoneIndex};
use crate::error::{RigError, RigResult};
use crate::transform::ObjectTransform;

/// An armature: bones stored in an arena with parent links by index.
///
/// Removed bones leave tombstone slots behind so that surviving indices
/// stay valid; iteration skips tombstones and follows declaration order.
/// Bone names are unique and the skeleton keeps a name→index map in sync
/// through [`add_bone`](Self::add_bone), [`rename`](Self::rename), and
/// [`remove`](Self::remove).
///
/// # Example
///
/// ```
/// use rig_types::{Bone, Skeleton};
///
/// let mut skeleton = Skeleton::new("Armature");
/// let hips = skeleton.add_bone(Bone::new("Hips"))?;
/// let mut spine = Bone::new("Spine");
/// spine.parent = Some(hips);
/// let spine = skeleton.add_bone(spine)?;
///
/// skeleton.remove(spine);
/// assert!(skeleton.index_of("Spine").is_none());
/// assert_eq!(skeleton.len(), 1);
/// # Ok::<(), rig_types::RigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Skeleton {
    /// Object name of the armature.
    pub name: String,
    /// Object-level transform of the armature.
    pub transform: ObjectTransform,
    bones: Vec<Option<Bone>>,
    index: HashMap<String, BoneIndex>,
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new("Armature")
    }
}

impl Skeleton {
    /// Creates an empty skeleton with an identity transform.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: ObjectTransform::identity(),
            bones: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Number of live bones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the skeleton has no live bones.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns `true` if a live bone with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Arena index of the bone with this name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<BoneIndex> {
        self.index.get(name).copied()
    }

    /// The bone at this index, if the slot is live.
    #[must_use]
    pub fn bone(&self, index: BoneIndex) -> Option<&Bone> {
        self.bones.get(index as usize).and_then(Option::as_ref)
    }

    /// Mutable access to the bone at this index.
    ///
    /// Changing `name` or `parent` through this reference desynchronizes
    /// the skeleton's bookkeeping; use [`rename`](Self::rename) and
    /// [`set_parent`](Self::set_parent) for those. Positions and roll are
    /// free to edit.
    #[must_use]
    pub fn bone_mut(&mut self, index: BoneIndex) -> Option<&mut Bone> {
        self.bones.get_mut(index as usize).and_then(Option::as_mut)
    }

    /// The bone with this name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Bone> {
        self.index_of(name).and_then(|i| self.bone(i))
    }

    /// Mutable access to the bone with this name.
    ///
    /// The same caveats as [`bone_mut`](Self::bone_mut) apply.
    #[must_use]
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Bone> {
        let index = self.index_of(name)?;
        self.bone_mut(index)
    }

    /// Adds a bone to the arena and returns its index.
    ///
    /// Fails if the name is already taken or the parent index does not
    /// point at a live bone.
    pub fn add_bone(&mut self, bone: Bone) -> RigResult<BoneIndex> {
        if self.index.contains_key(&bone.name) {
            return Err(RigError::duplicate_bone(&bone.name));
        }
        if let Some(parent) = bone.parent {
            if self.bone(parent).is_none() {
                return Err(RigError::InvalidBoneIndex { index: parent });
            }
        }
        let index = u32::try_from(self.bones.len())
            .map_err(|_| RigError::InvalidBoneIndex { index: u32::MAX })?;
        self.index.insert(bone.name.clone(), index);
        self.bones.push(Some(bone));
        Ok(index)
    }

    /// Renames the bone at `index`, keeping the name lookup in sync.
    ///
    /// Renaming a bone to its current name is a no-op. Fails if another
    /// live bone already holds the new name.
    pub fn rename(&mut self, index: BoneIndex, new_name: impl Into<String>) -> RigResult<()> {
        let new_name = new_name.into();
        let Some(bone) = self.bones.get(index as usize).and_then(Option::as_ref) else {
            return Err(RigError::InvalidBoneIndex { index });
        };
        if bone.name == new_name {
            return Ok(());
        }
        if self.index.contains_key(&new_name) {
            return Err(RigError::duplicate_bone(new_name));
        }
        let old_name = bone.name.clone();
        self.index.remove(&old_name);
        self.index.insert(new_name.clone(), index);
        if let Some(bone) = self.bones.get_mut(index as usize).and_then(Option::as_mut) {
            bone.name = new_name;
        }
        Ok(())
    }

    /// Sets (or clears) a bone's parent, rejecting cycles.
    pub fn set_parent(&mut self, child: BoneIndex, parent: Option<BoneIndex>) -> RigResult<()> {
        if self.bone(child).is_none() {
            return Err(RigError::InvalidBoneIndex { index: child });
        }
        if let Some(parent) = parent {
            if self.bone(parent).is_none() {
                return Err(RigError::InvalidBoneIndex { index: parent });
            }
            if parent == child || self.is_ancestor(child, parent) {
                let name = self
                    .bone(child)
                    .map(|b| b.name.clone())
                    .unwrap_or_default();
                return Err(RigError::ParentCycle { name });
            }
        }
        if let Some(bone) = self.bone_mut(child) {
            bone.parent = parent;
        }
        Ok(())
    }

    /// Removes a bone, reparenting its children to the removed bone's
    /// parent, and returns the removed data.
    ///
    /// This matches edit-mode bone deletion in DCC tools: the chain stays
    /// attached above the hole. Returns `None` if the slot is already
    /// dead.
    pub fn remove(&mut self, index: BoneIndex) -> Option<Bone> {
        let removed = self.bones.get_mut(index as usize)?.take()?;
        self.index.remove(&removed.name);
        for slot in self.bones.iter_mut().flatten() {
            if slot.parent == Some(index) {
                slot.parent = removed.parent;
            }
        }
        Some(removed)
    }

    /// Iterates live bones in declaration order with their indices.
    pub fn bones(&self) -> impl Iterator<Item = (BoneIndex, &Bone)> {
        self.bones
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|bone| (i as BoneIndex, bone)))
    }

    /// Snapshot of all live bone names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.bones().map(|(_, bone)| bone.name.clone()).collect()
    }

    /// Snapshot of the direct children of `index`, in declaration order.
    ///
    /// Taking a snapshot (rather than borrowing) lets callers mutate the
    /// skeleton while walking the list.
    #[must_use]
    pub fn children_of(&self, index: BoneIndex) -> Vec<BoneIndex> {
        self.bones()
            .filter(|(_, bone)| bone.parent == Some(index))
            .map(|(i, _)| i)
            .collect()
    }

    /// Snapshot of all live bones without a parent, in declaration order.
    #[must_use]
    pub fn roots(&self) -> Vec<BoneIndex> {
        self.bones()
            .filter(|(_, bone)| bone.parent.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns `true` if `ancestor` appears on `bone`'s parent chain.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: BoneIndex, bone: BoneIndex) -> bool {
        let mut current = self.bone(bone).and_then(|b| b.parent);
        while let Some(i) = current {
            if i == ancestor {
                return true;
            }
            current = self.bone(i).and_then(|b| b.parent);
        }
        false
    }

    /// Appends every live bone of `other` to this arena, remapping parent
    /// links to the new indices.
    ///
    /// `other`'s object transform is discarded; callers bake transforms
    /// before joining. Fails without mutating `self` if any incoming name
    /// collides with a live bone here.
    pub fn absorb(&mut self, other: &Skeleton) -> RigResult<()> {
        for (_, bone) in other.bones() {
            if self.index.contains_key(&bone.name) {
                return Err(RigError::duplicate_bone(&bone.name));
            }
        }
        // Two passes: parent indices may point forward in declaration
        // order (a graft root is created after the bones it adopts), so
        // links are rewired only once every bone has a new index.
        let mut remap: HashMap<BoneIndex, BoneIndex> = HashMap::new();
        for (old_index, bone) in other.bones() {
            let mut copy = bone.clone();
            copy.parent = None;
            let new_index = self.add_bone(copy)?;
            remap.insert(old_index, new_index);
        }
        for (old_index, bone) in other.bones() {
            let Some(old_parent) = bone.parent else {
                continue;
            };
            if let (Some(&child), Some(&parent)) =
                (remap.get(&old_index), remap.get(&old_parent))
            {
                if let Some(slot) = self.bone_mut(child) {
                    slot.parent = Some(parent);
                }
            }
        }
        Ok(())
    }
}
