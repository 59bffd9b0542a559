//! Same-container reorder arithmetic

/// Which half of the target row the pointer was released over
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropPosition {
    Above,
    Below,
}

impl DropPosition {
    /// Upper half inserts above; the exact midpoint counts as below
    pub fn from_pointer(pointer_y: f64, row_top: f64, row_height: f64) -> Self {
        if pointer_y < row_top + row_height / 2.0 {
            DropPosition::Above
        } else {
            DropPosition::Below
        }
    }
}

/// Move `source` next to `target` in an ordered id list
///
/// Returns `None` when either id is missing or both are the same.
pub fn reorder<K: PartialEq + Clone>(
    ids: &[K],
    source: &K,
    target: &K,
    position: DropPosition,
) -> Option<Vec<K>> {
    if source == target {
        return None;
    }
    let from = ids.iter().position(|id| id == source)?;
    let to = ids.iter().position(|id| id == target)?;

    let mut order = ids.to_vec();
    let moved = order.remove(from);

    // Removing an earlier element shifts the target one slot left
    let target_index = if from < to { to - 1 } else { to };
    let insert_at = match position {
        DropPosition::Above => target_index,
        DropPosition::Below => target_index + 1,
    };
    order.insert(insert_at, moved);
    Some(order)
}
