//! Per-character history of submitted queries.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tracing::info;

use crate::catalog::{Catalog, CharacterId};

/// Errors from ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Unknown character id {0}")]
    UnknownCharacter(CharacterId),
}

/// One submitted query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryEntry {
    pub character: CharacterId,
    pub text: String,
    /// Position in this character's ledger, starting at 1.
    pub sequence: u32,
}

/// Result of a submission that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Appended with this sequence number.
    Recorded(u32),
    /// The text was blank after trimming; nothing was appended.
    Ignored,
}

/// Append-only query log, one ordered list per character.
#[derive(Debug, Clone, Default)]
pub struct QueryLedger {
    entries: HashMap<CharacterId, Vec<QueryEntry>>,
}

impl QueryLedger {
    /// Create an empty ledger accepting every character in `catalog`.
    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self {
            entries: catalog
                .characters()
                .iter()
                .map(|c| (c.id, Vec::new()))
                .collect(),
        }
    }

    /// Record a query for a character.
    ///
    /// The text is trimmed; blank text is ignored without error.
    pub fn submit(
        &mut self,
        character: CharacterId,
        raw_text: &str,
    ) -> Result<QueryOutcome, LedgerError> {
        let log = self
            .entries
            .get_mut(&character)
            .ok_or(LedgerError::UnknownCharacter(character))?;

        let text = raw_text.trim();
        if text.is_empty() {
            return Ok(QueryOutcome::Ignored);
        }

        let sequence = log.len() as u32 + 1;
        log.push(QueryEntry {
            character,
            text: text.to_string(),
            sequence,
        });
        info!(%character, sequence, "query recorded");
        Ok(QueryOutcome::Recorded(sequence))
    }

    /// Entries for a character in submission order. Empty if none.
    pub fn entries_for(&self, character: CharacterId) -> &[QueryEntry] {
        self.entries
            .get(&character)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Submitted texts for a character in submission order.
    pub fn texts_for(&self, character: CharacterId) -> Vec<String> {
        self.entries_for(character)
            .iter()
            .map(|e| e.text.clone())
            .collect()
    }

    /// Total number of queries across all characters.
    pub fn total(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
