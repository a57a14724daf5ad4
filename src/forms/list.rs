//! Index-based editing shared by every nested list in a draft.
//! Items stay in append order; nothing here reorders.

use crate::error::{CrmError, Result};

fn out_of_range(index: usize, len: usize) -> CrmError {
    CrmError::invalid(format!("index {index} out of range for list of {len}"))
}

/// Push `item` and return its index
pub fn append<T>(items: &mut Vec<T>, item: T) -> usize {
    items.push(item);
    items.len() - 1
}

/// Replace the element at `index`
pub fn update_at<T>(items: &mut [T], index: usize, item: T) -> Result<()> {
    let len = items.len();
    let slot = items.get_mut(index).ok_or_else(|| out_of_range(index, len))?;
    *slot = item;
    Ok(())
}

/// Remove and return the element at `index`
pub fn remove_at<T>(items: &mut Vec<T>, index: usize) -> Result<T> {
    if index >= items.len() {
        return Err(out_of_range(index, items.len()));
    }
    Ok(items.remove(index))
}
