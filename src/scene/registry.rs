use std::collections::HashMap;

use super::object::{Mesh, SceneObject, Shape, Sphere};
use crate::error::SceneError;

/// Authoritative name -> object store of the editable scene.
///
/// Objects are kept in insertion order, which is the enumeration order used
/// by picking and packing. Every mutation bumps `revision`, which the GPU
/// synchronization layer compares against the revision it last uploaded.
#[derive(Debug, Default, Clone)]
pub struct SceneRegistry {
    objects: Vec<SceneObject>,
    index: HashMap<String, usize>,
    revision: u64,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: SceneObject) -> Result<(), SceneError> {
        if self.exists(object.name()) {
            return Err(SceneError::DuplicateName(object.name().to_string()));
        }

        self.index.insert(object.name().to_string(), self.objects.len());
        self.objects.push(object);
        self.revision += 1;
        Ok(())
    }

    /// Removes and returns the object so callers can drop references to its name
    pub fn remove(&mut self, name: &str) -> Result<SceneObject, SceneError> {
        let slot = self
            .index
            .remove(name)
            .ok_or_else(|| SceneError::NotFound(name.to_string()))?;

        let removed = self.objects.remove(slot);
        for object in &self.objects[slot..] {
            if let Some(i) = self.index.get_mut(object.name()) {
                *i -= 1;
            }
        }

        self.revision += 1;
        Ok(removed)
    }

    pub fn get(&self, name: &str) -> Result<&SceneObject, SceneError> {
        self.index
            .get(name)
            .map(|&i| &self.objects[i])
            .ok_or_else(|| SceneError::NotFound(name.to_string()))
    }

    /// Mutable access; counts as a mutation whether or not the caller writes
    pub fn get_mut(&mut self, name: &str) -> Result<&mut SceneObject, SceneError> {
        let slot = *self
            .index
            .get(name)
            .ok_or_else(|| SceneError::NotFound(name.to_string()))?;

        self.revision += 1;
        Ok(&mut self.objects[slot])
    }

    pub fn exists(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All objects in insertion order; call again to re-enumerate
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> + Clone + '_ {
        self.objects.iter()
    }

    pub fn spheres(&self) -> impl Iterator<Item = (&str, &Sphere)> + Clone + '_ {
        self.objects.iter().filter_map(|object| match &object.shape {
            Shape::Sphere(sphere) => Some((object.name(), sphere)),
            Shape::Mesh(_) => None,
        })
    }

    pub fn meshes(&self) -> impl Iterator<Item = (&str, &Mesh)> + Clone + '_ {
        self.objects.iter().filter_map(|object| match &object.shape {
            Shape::Mesh(mesh) => Some((object.name(), mesh)),
            Shape::Sphere(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Deep-copies `name` under the lowest free numeric suffix of its base name
    pub fn duplicate(&mut self, name: &str) -> Result<&SceneObject, SceneError> {
        let original = self.get(name)?;
        let copy = original.renamed(self.unique_name(name));
        self.insert(copy)?;

        let last = self.objects.len() - 1;
        Ok(&self.objects[last])
    }

    /// Returns `base` if free, otherwise `base` followed by the lowest unused
    /// positive integer. Trailing digits of `base` are ignored, so `Sphere2`
    /// derives from `Sphere`.
    pub fn unique_name(&self, base: &str) -> String {
        let stem = base.trim_end_matches(|c: char| c.is_ascii_digit());
        let stem = if stem.is_empty() { base } else { stem };

        if !self.exists(stem) {
            return stem.to_string();
        }

        let mut suffix = 1u64;
        loop {
            let candidate = format!("{}{}", stem, suffix);
            if !self.exists(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Removes every object matching `predicate`, returning them in order
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&SceneObject) -> bool) -> Vec<SceneObject> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.objects)
            .into_iter()
            .partition(|object| predicate(object));

        self.objects = kept;
        self.reindex();
        if !removed.is_empty() {
            self.revision += 1;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.index.clear();
        self.revision += 1;
    }

    fn reindex(&mut self) {
        self.index = self
            .objects
            .iter()
            .enumerate()
            .map(|(i, object)| (object.name().to_string(), i))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn sphere(name: &str) -> SceneObject {
        SceneObject::sphere(name, Sphere::default())
    }

    #[test]
    fn test_insert_rejects_duplicate_name() {
        let mut scene = SceneRegistry::new();
        scene.insert(sphere("Ball")).unwrap();

        let mut other = sphere("Ball");
        other.move_to(Vec3::ONE);
        assert_eq!(scene.insert(other), Err(SceneError::DuplicateName("Ball".into())));

        // The original is untouched
        assert_eq!(scene.get("Ball").unwrap().position(), Vec3::ZERO);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order_and_lookup_consistent() {
        let mut scene = SceneRegistry::new();
        for name in ["A", "B", "C", "D"] {
            scene.insert(sphere(name)).unwrap();
        }

        let removed = scene.remove("B").unwrap();
        assert_eq!(removed.name(), "B");
        assert!(!scene.exists("B"));

        let names: Vec<_> = scene.iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["A", "C", "D"]);
        assert_eq!(scene.get("D").unwrap().name(), "D");
        assert_eq!(scene.get("C").unwrap().name(), "C");

        assert_eq!(scene.remove("B"), Err(SceneError::NotFound("B".into())));
    }

    #[test]
    fn test_unique_name_picks_lowest_free_suffix() {
        let mut scene = SceneRegistry::new();
        assert_eq!(scene.unique_name("Sphere"), "Sphere");

        scene.insert(sphere("Sphere")).unwrap();
        scene.insert(sphere("Sphere2")).unwrap();
        assert_eq!(scene.unique_name("Sphere"), "Sphere1");
        assert_eq!(scene.unique_name("Sphere2"), "Sphere1");

        scene.insert(sphere("Sphere1")).unwrap();
        assert_eq!(scene.unique_name("Sphere"), "Sphere3");
    }

    #[test]
    fn test_unique_name_for_numeric_names() {
        let mut scene = SceneRegistry::new();
        scene.insert(sphere("42")).unwrap();
        assert_eq!(scene.unique_name("42"), "421");
    }

    #[test]
    fn test_revision_tracks_every_mutation() {
        let mut scene = SceneRegistry::new();
        let r0 = scene.revision();

        scene.insert(sphere("A")).unwrap();
        let r1 = scene.revision();
        assert!(r1 > r0);

        scene.get_mut("A").unwrap().move_to(Vec3::ONE);
        let r2 = scene.revision();
        assert!(r2 > r1);

        // Failed operations leave the revision alone
        assert!(scene.insert(sphere("A")).is_err());
        assert!(scene.get_mut("missing").is_err());
        assert_eq!(scene.revision(), r2);

        let _ = scene.get("A");
        assert_eq!(scene.revision(), r2);
    }

    #[test]
    fn test_remove_where_reindexes() {
        let mut scene = SceneRegistry::new();
        for name in ["A", "B", "C"] {
            scene.insert(sphere(name)).unwrap();
        }

        let removed = scene.remove_where(|o| o.name() != "C");
        assert_eq!(removed.len(), 2);
        assert_eq!(scene.get("C").unwrap().name(), "C");
        assert!(!scene.exists("A"));
    }
}
