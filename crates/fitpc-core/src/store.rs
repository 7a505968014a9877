//! Editable anchor list for one part during authoring.

use crate::anchor::{
    Anchor, AnchorId, AnchorRecord, AnchorType, CompatibleType, ConnectionAxis, Direction, Vector3,
    anchors_from_records, anchors_to_records,
};
use crate::catalog;
use std::collections::BTreeSet;

/// Offset applied to a duplicated anchor so it never overlaps its source.
pub const DUPLICATE_OFFSET: Vector3 = Vector3::new(1.0, 0.0, 0.0);

/// Partial update for [`AnchorStore::update_anchor`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorPatch {
    pub position: Option<Vector3>,
    pub rotation: Option<Vector3>,
    pub direction: Option<Direction>,
    pub label: Option<String>,
    pub connection_axis: Option<ConnectionAxis>,
    pub compatible_with: Option<BTreeSet<CompatibleType>>,
}

impl AnchorPatch {
    pub fn position(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Some(Vector3::new(x, y, z)),
            ..Self::default()
        }
    }

    pub fn rotation(x: f64, y: f64, z: f64) -> Self {
        Self {
            rotation: Some(Vector3::new(x, y, z)),
            ..Self::default()
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    fn apply(self, anchor: &mut Anchor) {
        if let Some(position) = self.position {
            anchor.position = position;
        }
        if let Some(rotation) = self.rotation {
            anchor.rotation = rotation;
        }
        if let Some(direction) = self.direction {
            anchor.direction = direction;
        }
        if let Some(label) = self.label {
            anchor.label = label;
        }
        if let Some(axis) = self.connection_axis {
            anchor.connection_axis = axis;
        }
        if let Some(compatible) = self.compatible_with {
            anchor.compatible_with = compatible;
        }
    }
}

/// Anchor list of the part currently open in the editor.
///
/// One store exists per authoring session and is passed by reference to the
/// editing UI and the save pipeline. Every operation is total: unknown ids
/// leave the store unchanged.
#[derive(Debug, Clone, Default)]
pub struct AnchorStore {
    anchors: Vec<Anchor>,
    selected: Option<AnchorId>,
    dirty: bool,
}

impl AnchorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a part's saved anchors.
    pub fn from_records(records: &[AnchorRecord]) -> Self {
        let mut store = Self::new();
        store.load_records(records);
        store
    }

    /// All anchors in authoring order.
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Get an anchor by ID.
    pub fn get(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// ID of the selected anchor.
    pub fn selected(&self) -> Option<AnchorId> {
        self.selected
    }

    /// The selected anchor, if it still exists.
    pub fn selected_anchor(&self) -> Option<&Anchor> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Whether the list changed since it was loaded or last saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the current list has been persisted.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Label generated for the next anchor of `kind`: catalog label plus a counter.
    pub fn next_label(&self, kind: AnchorType) -> String {
        let count = self.anchors.iter().filter(|a| a.kind == kind).count();
        format!("{} {}", catalog::descriptor(kind).display_label, count + 1)
    }

    /// Add a new anchor at the origin. Clears the selection.
    pub fn add_anchor(&mut self, kind: AnchorType, label: Option<&str>) -> AnchorId {
        let label = match label {
            Some(label) => label.to_string(),
            None => self.next_label(kind),
        };
        let anchor = Anchor::new(kind, label);
        let id = anchor.id;
        log::debug!("Adding anchor {} ({}) as {}", anchor.label, kind, id);

        self.anchors.push(anchor);
        self.selected = None;
        self.dirty = true;
        id
    }

    /// Clone an anchor next to its source and select the clone.
    /// Returns None (and changes nothing) if `id` is unknown.
    pub fn duplicate_anchor(&mut self, id: AnchorId) -> Option<AnchorId> {
        let source = self.get(id)?;
        let mut copy = source.with_new_id();
        // Counted before the copy is inserted.
        copy.label = self.next_label(source.kind);
        copy.position = Vector3::new(
            source.position.x + DUPLICATE_OFFSET.x,
            source.position.y + DUPLICATE_OFFSET.y,
            source.position.z + DUPLICATE_OFFSET.z,
        );
        let new_id = copy.id;
        log::debug!("Duplicated anchor {} as {} ({})", id, new_id, copy.label);

        self.anchors.push(copy);
        self.selected = Some(new_id);
        self.dirty = true;
        Some(new_id)
    }

    /// Merge the set fields of `patch` into an anchor.
    pub fn update_anchor(&mut self, id: AnchorId, patch: AnchorPatch) {
        let Some(anchor) = self.anchors.iter_mut().find(|a| a.id == id) else {
            log::debug!("Ignoring update for unknown anchor {}", id);
            return;
        };
        patch.apply(anchor);
        self.dirty = true;
    }

    /// Remove an anchor, clearing the selection if it was selected.
    pub fn remove_anchor(&mut self, id: AnchorId) {
        let before = self.anchors.len();
        self.anchors.retain(|a| a.id != id);
        if self.anchors.len() == before {
            return;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.dirty = true;
    }

    /// Select an anchor, or clear the selection with `None`.
    ///
    /// An id not in the list leaves the selection unchanged.
    pub fn select_anchor(&mut self, id: Option<AnchorId>) {
        if let Some(id) = id {
            if self.get(id).is_none() {
                log::debug!("Ignoring selection of unknown anchor {}", id);
                return;
            }
        }
        self.selected = id;
    }

    /// Replace the whole list (loading a part or switching parts).
    pub fn set_anchors(&mut self, anchors: Vec<Anchor>) {
        log::debug!("Loading {} anchors into the editor", anchors.len());
        self.anchors = anchors;
        self.selected = None;
        self.dirty = false;
    }

    /// Replace the whole list from persisted records.
    pub fn load_records(&mut self, records: &[AnchorRecord]) {
        self.set_anchors(anchors_from_records(records));
    }

    /// Remove every anchor.
    pub fn clear_anchors(&mut self) {
        if !self.anchors.is_empty() {
            self.dirty = true;
        }
        self.anchors.clear();
        self.selected = None;
    }

    /// Persisted form of the current list, for the save pipeline.
    pub fn to_records(&self) -> Vec<AnchorRecord> {
        anchors_to_records(&self.anchors)
    }

    /// Serialize the current list to the persisted JSON array.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_records())
    }

    /// Build a store from a persisted JSON array.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<AnchorRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(&records))
    }
}
