use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::errors::PipelineResult;

/// Hash whatever `f` feeds into a fixed-key hasher.
pub fn stable_hash_with(f: impl FnOnce(&mut DefaultHasher)) -> u64 {
    let mut hasher = DefaultHasher::new();
    f(&mut hasher);
    hasher.finish()
}

/// Order-sensitive fingerprint of a table, hashed over each row's JSON form.
///
/// Two runs over the same inputs produce the same value; any change in row
/// content or order changes it.
pub fn table_fingerprint<T: Serialize>(rows: &[T]) -> PipelineResult<u64> {
    let mut encoded = Vec::with_capacity(rows.len());
    for row in rows {
        encoded.push(serde_json::to_string(row)?);
    }
    Ok(stable_hash_with(|hasher| {
        encoded.len().hash(hasher);
        for line in &encoded {
            line.hash(hasher);
        }
    }))
}
