use crate::error::{Result, SyncError};

/// Zero-based `(row, col)` of an A1-style reference such as `"B2"` or `"AA10"`.
pub fn parse_cell_ref(cell: &str) -> Result<(usize, usize)> {
    let cell = cell.trim();
    let split = cell
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| SyncError::InvalidCellRef(cell.to_string()))?;
    let (letters, digits) = cell.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(SyncError::InvalidCellRef(cell.to_string()));
    }

    let col = letters
        .to_ascii_uppercase()
        .bytes()
        .try_fold(0usize, |acc, b| {
            acc.checked_mul(26)?.checked_add((b - b'A' + 1) as usize)
        })
        .ok_or_else(|| SyncError::InvalidCellRef(cell.to_string()))?;
    let row: usize = digits
        .parse()
        .map_err(|_| SyncError::InvalidCellRef(cell.to_string()))?;
    if row == 0 {
        return Err(SyncError::InvalidCellRef(cell.to_string()));
    }
    Ok((row - 1, col - 1))
}
