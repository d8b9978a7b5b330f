#![forbid(unsafe_code)]

//! The serialized form of a deck's tree shape.
//!
//! Page contents are not inlined: each card node references its page stack
//! by identity, and the stacks themselves are persisted separately through
//! [`PageStackRepository`](crate::PageStackRepository). This keeps the deck
//! record tiny and lets it reuse already-serialized pages.

use serde::{Deserialize, Serialize};

use crate::{StorageError, StorageResult};
use pagedeck_core::PageStackId;

/// Recursive tree-shape record: a node kind tag plus either children or a
/// card's stack reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeckShape {
    /// A leaf referencing a persisted page stack.
    Card {
        /// Identity of the card's page stack.
        stack: PageStackId,
    },
    /// Horizontal grouping.
    Row {
        /// Child shapes in order.
        children: Vec<DeckShape>,
    },
    /// Vertical grouping.
    Column {
        /// Child shapes in order.
        children: Vec<DeckShape>,
    },
}

impl DeckShape {
    /// Number of card leaves in this shape.
    pub fn card_count(&self) -> usize {
        match self {
            DeckShape::Card { .. } => 1,
            DeckShape::Row { children } | DeckShape::Column { children } => {
                children.iter().map(DeckShape::card_count).sum()
            }
        }
    }

    /// Every referenced stack id, in flattened card order.
    pub fn stack_ids(&self) -> Vec<PageStackId> {
        let mut out = Vec::with_capacity(self.card_count());
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids(&self, out: &mut Vec<PageStackId>) {
        match self {
            DeckShape::Card { stack } => out.push(*stack),
            DeckShape::Row { children } | DeckShape::Column { children } => {
                for child in children {
                    child.collect_ids(out);
                }
            }
        }
    }

    /// Encode to the JSON wire form.
    pub fn to_json(&self) -> StorageResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from the JSON wire form. The decoded root must be a row.
    pub fn from_json(raw: &str) -> StorageResult<Self> {
        let shape: DeckShape = serde_json::from_str(raw)?;
        if !matches!(shape, DeckShape::Row { .. }) {
            return Err(StorageError::Corruption(
                "deck shape root is not a row".into(),
            ));
        }
        Ok(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DeckShape {
        DeckShape::Row {
            children: vec![
                DeckShape::Column {
                    children: vec![
                        DeckShape::Card {
                            stack: PageStackId::from_raw(1),
                        },
                        DeckShape::Card {
                            stack: PageStackId::from_raw(2),
                        },
                    ],
                },
                DeckShape::Card {
                    stack: PageStackId::from_raw(3),
                },
            ],
        }
    }

    #[test]
    fn card_count_and_ids_follow_flattened_order() {
        let shape = sample();
        assert_eq!(shape.card_count(), 3);
        let ids: Vec<u64> = shape.stack_ids().iter().map(|id| id.raw()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn json_round_trips() {
        let shape = sample();
        let json = shape.to_json().unwrap();
        assert_eq!(DeckShape::from_json(&json).unwrap(), shape);
    }

    #[test]
    fn json_carries_a_kind_tag() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"kind\":\"row\""), "got: {json}");
        assert!(json.contains("\"kind\":\"card\""), "got: {json}");
    }

    #[test]
    fn garbage_json_is_a_serialization_error() {
        let err = DeckShape::from_json("{not json").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn non_row_root_is_corruption() {
        let json = serde_json::to_string(&DeckShape::Card {
            stack: PageStackId::from_raw(9),
        })
        .unwrap();
        let err = DeckShape::from_json(&json).unwrap_err();
        assert!(matches!(err, StorageError::Corruption(_)));
    }
}
