//! Ordered collection of floating elements.

use super::{ElementId, ElementKind, ElementPatch, FloatingElement};
use crate::table::TableEdit;
use crate::view::Geometry;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Floating elements in insertion order.
///
/// Sequence order is the serialization order and the base paint order.
/// `z_index` only lifts an element (and its selection chrome) above its peers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementStore {
    elements: Vec<FloatingElement>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an element of `kind` at `geometry` and append it.
    /// It gets `z_index = count + 1`. Returns the new id.
    pub fn create(&mut self, kind: ElementKind, geometry: Geometry) -> ElementId {
        self.push(FloatingElement::new(kind, geometry))
    }

    /// Append a prepared element, assigning the next z-index and a fresh id
    /// if its id is already taken.
    pub fn insert(&mut self, mut element: FloatingElement) -> ElementId {
        element.z_index = self.next_z_index();
        self.push(element)
    }

    /// Append an element keeping its z-index.
    pub fn push(&mut self, mut element: FloatingElement) -> ElementId {
        if element.z_index == 0 {
            element.z_index = self.next_z_index();
        }
        if self.contains(element.id) {
            log::debug!("Duplicate element id {}, regenerating", element.id);
            element.regenerate_id();
        }
        let id = element.id;
        self.elements.push(element);
        id
    }

    fn next_z_index(&self) -> u32 {
        self.elements.len() as u32 + 1
    }

    /// Shallow-merge `patch` into the element with `id`.
    /// Returns false (leaving everything untouched) if no element matches.
    pub fn update_by_id(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                element.apply_patch(patch);
                true
            }
            None => {
                log::debug!("update_by_id: no element {}", id);
                false
            }
        }
    }

    /// Remove the element with `id`.
    pub fn delete_by_id(&mut self, id: ElementId) -> Option<FloatingElement> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(index))
    }

    /// Shift an element's z-index by `delta`, clamping at 0.
    pub fn reorder_z(&mut self, id: ElementId, delta: i32) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                let z = i64::from(element.z_index) + i64::from(delta);
                element.z_index = z.clamp(0, i64::from(u32::MAX)) as u32;
                true
            }
            None => false,
        }
    }

    /// Apply a grid edit to a table element.
    pub fn edit_table(&mut self, id: ElementId, edit: TableEdit) -> bool {
        self.get_mut(id).is_some_and(|element| element.edit_table(edit))
    }

    pub fn get(&self, id: ElementId) -> Option<&FloatingElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: ElementId) -> Option<&mut FloatingElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Elements in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = &FloatingElement> {
        self.elements.iter()
    }

    /// Elements back to front: by z-index, ties broken by sequence order.
    pub fn layered(&self) -> Vec<&FloatingElement> {
        let mut layered: Vec<_> = self.elements.iter().collect();
        layered.sort_by_key(|e| e.z_index);
        layered
    }

    /// Topmost element under a document-space point.
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        self.layered()
            .into_iter()
            .rev()
            .find(|e| e.hit_test(point))
            .map(|e| e.id)
    }

    /// Restore element invariants and id uniqueness after deserialization.
    pub(crate) fn normalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        for element in &mut self.elements {
            element.normalize();
            while !seen.insert(element.id) {
                log::warn!("Duplicate element id {} in loaded document", element.id);
                element.regenerate_id();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<'a> IntoIterator for &'a ElementStore {
    type Item = &'a FloatingElement;
    type IntoIter = std::slice::Iter<'a, FloatingElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
