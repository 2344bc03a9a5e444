//! Row identifiers and the record → row conversion shared by the
//! relational and flat emitters.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::IdStrategy;
use crate::models::{Commentary, CommentaryRow};

/// Hands out row ids according to the configured strategy.
///
/// Random ids are opaque and change on every run. Content ids are derived
/// from the root-relative document path and the entry position, and stay
/// put between runs as long as the input tree does.
#[derive(Debug, Clone, Copy)]
pub struct IdGenerator {
    strategy: IdStrategy,
}

impl IdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self { strategy }
    }

    pub fn id_for(&self, commentary: &Commentary) -> String {
        match self.strategy {
            IdStrategy::Random => Uuid::new_v4().to_string(),
            IdStrategy::Content => content_id(commentary),
        }
    }
}

fn content_id(commentary: &Commentary) -> String {
    let mut hasher = Sha256::new();
    hasher.update(commentary.document.as_bytes());
    hasher.update([0u8]);
    hasher.update((commentary.entry_index as u64).to_le_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Uuid::from_bytes(bytes).to_string()
}

pub fn to_rows(records: &[Commentary], ids: &IdGenerator) -> Vec<CommentaryRow> {
    records
        .iter()
        .map(|c| CommentaryRow::from_commentary(c, ids.id_for(c)))
        .collect()
}
