//! Domain guards shared by services.
//!
//! Each guard loads a row and turns "missing" into 404 and "soft-deleted"
//! into 410 so services never operate on invisible rows.
pub mod content;
pub mod member;

use crate::error::{AppError, Result};
use crate::models::{Comment, Feed, Member, Post, ProfileRow};

/// Rows that carry a `deleted_at` tombstone
pub trait SoftDelete {
    fn is_deleted(&self) -> bool;
}

impl SoftDelete for Member {
    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl SoftDelete for Feed {
    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl SoftDelete for Post {
    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl SoftDelete for Comment {
    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl SoftDelete for ProfileRow {
    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// 404 when `row` is absent, 410 when it is soft-deleted
pub fn ensure_live<T: SoftDelete>(row: Option<T>, label: &str) -> Result<T> {
    match row {
        None => Err(AppError::NotFound(format!("{label} not found"))),
        Some(row) if row.is_deleted() => Err(AppError::Gone(format!("{label} has been deleted"))),
        Some(row) => Ok(row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(bool);

    impl SoftDelete for Row {
        fn is_deleted(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_ensure_live() {
        assert!(matches!(
            ensure_live::<Row>(None, "Feed"),
            Err(AppError::NotFound(msg)) if msg == "Feed not found"
        ));
        assert!(matches!(
            ensure_live(Some(Row(true)), "Post"),
            Err(AppError::Gone(msg)) if msg == "Post has been deleted"
        ));
        assert!(ensure_live(Some(Row(false)), "Post").is_ok());
    }
}
