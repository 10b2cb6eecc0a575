//! Contiguous ordinal positions for ordered lists.

use tracing::debug;

use crate::domain::entities::Positioned;
use crate::domain::error::{DomainError, DomainResult};

/// Copy of `items` with positions `0..n` in list order.
pub fn reindex<T>(items: &[T]) -> Vec<T>
where
    T: Positioned + Clone,
{
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mut item = item.clone();
            item.set_position(i);
            item
        })
        .collect()
}

/// True if positions already read `0..n` in list order.
pub fn is_contiguous<T: Positioned>(items: &[T]) -> bool {
    items.iter().enumerate().all(|(i, item)| item.position() == i)
}

/// Move the item at `from` to `to`, then reindex.
///
/// `to` is the index in the resulting list.
pub fn reorder<T>(items: &[T], from: usize, to: usize) -> DomainResult<Vec<T>>
where
    T: Positioned + Clone,
{
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(DomainError::PositionOutOfRange { index, len });
        }
    }
    debug!("reorder: {} -> {} of {}", from, to, len);

    let mut moved = items.to_vec();
    let item = moved.remove(from);
    moved.insert(to, item);
    Ok(reindex(&moved))
}

/// Sort by persisted position, keeping input order among equal positions.
pub fn sorted_by_position<T>(items: &[T]) -> Vec<T>
where
    T: Positioned + Clone,
{
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| item.position());
    sorted
}
