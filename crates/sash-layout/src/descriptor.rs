use serde::{Deserialize, Serialize};

use sash_core::{Orientation, ReopenDescriptor};

use crate::LayoutError;

// ──────────────────────────────────────────────
// LayoutDescriptor: persisted form of the split tree
// ──────────────────────────────────────────────

/// Recursive layout record. A split node carries both children, a leaf
/// carries its document states; never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDescriptor {
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub sizes: (u32, u32),
    #[serde(default)]
    pub left_child: Option<Box<LayoutDescriptor>>,
    #[serde(default)]
    pub right_child: Option<Box<LayoutDescriptor>>,
    #[serde(default)]
    pub document_states: Option<Vec<ReopenDescriptor>>,
    #[serde(default)]
    pub current_index: Option<usize>,
    /// Marks the leaf holding the active container.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub active: bool,
}

impl LayoutDescriptor {
    pub fn leaf(document_states: Vec<ReopenDescriptor>, current_index: Option<usize>) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            sizes: (0, 0),
            left_child: None,
            right_child: None,
            document_states: Some(document_states),
            current_index,
            active: false,
        }
    }

    pub fn split(
        orientation: Orientation,
        sizes: (u32, u32),
        left: LayoutDescriptor,
        right: LayoutDescriptor,
    ) -> Self {
        Self {
            orientation,
            sizes,
            left_child: Some(Box::new(left)),
            right_child: Some(Box::new(right)),
            document_states: None,
            current_index: None,
            active: false,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn is_split(&self) -> bool {
        self.left_child.is_some() && self.right_child.is_some()
    }

    /// Number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match (&self.left_child, &self.right_child) {
            (Some(l), Some(r)) => l.leaf_count() + r.leaf_count(),
            _ => 1,
        }
    }

    /// Check the shape of the whole subtree without touching any tree.
    pub fn validate(&self) -> Result<(), LayoutError> {
        match (&self.left_child, &self.right_child, &self.document_states) {
            (Some(_), Some(_), Some(_)) => Err(LayoutError::AmbiguousNode),
            (Some(left), Some(right), None) => {
                left.validate()?;
                right.validate()
            }
            (Some(_), None, _) | (None, Some(_), _) => Err(LayoutError::MissingChild),
            (None, None, None) => Err(LayoutError::EmptyNode),
            (None, None, Some(states)) => match self.current_index {
                Some(index) if index >= states.len() => Err(LayoutError::CurrentIndexOutOfRange {
                    index,
                    len: states.len(),
                }),
                _ => Ok(()),
            },
        }
    }
}

impl Default for LayoutDescriptor {
    /// A single empty leaf.
    fn default() -> Self {
        Self::leaf(Vec::new(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(path: &str) -> ReopenDescriptor {
        ReopenDescriptor::new(path)
    }

    #[test]
    fn leaf_json_shape() {
        let leaf = LayoutDescriptor::leaf(vec![doc("a.py")], Some(0));
        let json = serde_json::to_value(&leaf).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "orientation": "h",
                "sizes": [0, 0],
                "leftChild": null,
                "rightChild": null,
                "documentStates": [["a.py", {}]],
                "currentIndex": 0
            })
        );
    }

    #[test]
    fn split_parses_from_json() {
        let json = r#"{
            "orientation": "v",
            "sizes": [120, 80],
            "leftChild": {"documentStates": [], "currentIndex": null},
            "rightChild": {"documentStates": [["b.py", {"line": 2}]], "currentIndex": 0, "active": true},
            "documentStates": null,
            "currentIndex": null
        }"#;
        let layout: LayoutDescriptor = serde_json::from_str(json).unwrap();
        assert!(layout.is_split());
        assert_eq!(layout.orientation, Orientation::Vertical);
        assert_eq!(layout.sizes, (120, 80));
        assert_eq!(layout.leaf_count(), 2);
        assert!(layout.right_child.as_ref().unwrap().active);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn validate_rejects_inconsistent_nodes() {
        let mut one_child = LayoutDescriptor::split(
            Orientation::Horizontal,
            (1, 1),
            LayoutDescriptor::default(),
            LayoutDescriptor::default(),
        );
        one_child.right_child = None;
        assert!(matches!(one_child.validate(), Err(LayoutError::MissingChild)));

        let mut both = LayoutDescriptor::split(
            Orientation::Horizontal,
            (1, 1),
            LayoutDescriptor::default(),
            LayoutDescriptor::default(),
        );
        both.document_states = Some(Vec::new());
        assert!(matches!(both.validate(), Err(LayoutError::AmbiguousNode)));

        let mut neither = LayoutDescriptor::default();
        neither.document_states = None;
        assert!(matches!(neither.validate(), Err(LayoutError::EmptyNode)));
    }

    #[test]
    fn validate_checks_nested_current_index() {
        let bad_leaf = LayoutDescriptor::leaf(vec![doc("a")], Some(3));
        let layout = LayoutDescriptor::split(
            Orientation::Vertical,
            (1, 1),
            LayoutDescriptor::default(),
            bad_leaf,
        );
        assert!(matches!(
            layout.validate(),
            Err(LayoutError::CurrentIndexOutOfRange { index: 3, len: 1 })
        ));
    }
}
