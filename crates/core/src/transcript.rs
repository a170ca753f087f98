//! The transcript and the store that keeps it durable.

use chat_widget_protocol::{MessageEntry, Sender};
use rand::seq::SliceRandom;

use crate::config::{DEFAULT_GREETINGS, WidgetConfig};
use crate::storage::{Storage, StorageError};

/// The ordered log of exchanged messages, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<MessageEntry>,
}

impl Transcript {
    /// Returns all entries, oldest first.
    #[inline]
    pub fn entries(&self) -> &[MessageEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there are no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the last `count` entries (or fewer), oldest first.
    #[inline]
    pub fn recent(&self, count: usize) -> &[MessageEntry] {
        let start = self.entries.len().saturating_sub(count);
        &self.entries[start..]
    }

    /// Iterates over the entries, oldest first.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, MessageEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a MessageEntry;
    type IntoIter = std::slice::Iter<'a, MessageEntry>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Owns the transcript and mirrors it into a [`Storage`].
///
/// Entries are only ever appended; the only other mutation is a full
/// reset through [`TranscriptStore::clear`]. Storage failures never reach
/// the caller, they are logged and the in-memory transcript stays
/// authoritative.
pub struct TranscriptStore {
    storage: Box<dyn Storage>,
    key: String,
    max_entries: usize,
    greetings: Vec<String>,
    transcript: Transcript,
}

impl TranscriptStore {
    /// Creates a store over `storage` and rehydrates it.
    pub fn open(storage: Box<dyn Storage>, config: &WidgetConfig) -> Self {
        let mut store = Self {
            storage,
            key: config.storage_key.clone(),
            max_entries: config.max_entries,
            greetings: config.greetings.clone(),
            transcript: Transcript::default(),
        };
        store.load();
        store
    }

    /// Reloads the transcript from the storage.
    ///
    /// An unreadable value is replaced with an empty transcript. A
    /// transcript over the size cap loses its oldest entries, and the
    /// trimmed result is written back.
    pub fn load(&mut self) -> Transcript {
        let (entries, needs_save) = match self.storage.get(&self.key) {
            Ok(Some(raw)) => {
                match serde_json::from_str::<Vec<MessageEntry>>(&raw) {
                    Ok(entries) => (entries, false),
                    Err(err) => {
                        warn!("discarding unreadable transcript: {err}");
                        (vec![], true)
                    }
                }
            }
            Ok(None) => (vec![], false),
            Err(err) => {
                warn!("failed to read transcript: {err}");
                (vec![], false)
            }
        };

        self.transcript = Transcript { entries };
        let truncated = self.truncate();
        if needs_save || truncated {
            self.save();
        }
        debug!("loaded {} transcript entries", self.transcript.len());
        self.transcript.clone()
    }

    /// Appends a new entry stamped with the current time.
    pub fn append<S: Into<String>>(
        &mut self,
        text: S,
        sender: Sender,
    ) -> MessageEntry {
        let entry = MessageEntry::new(text, sender);
        self.transcript.entries.push(entry.clone());
        self.truncate();
        self.save();
        entry
    }

    /// Drops every entry and seeds the transcript with a random welcome
    /// message, which is returned.
    pub fn clear(&mut self) -> MessageEntry {
        self.transcript.entries.clear();
        self.save();
        let greeting = self.pick_greeting().to_owned();
        self.append(greeting, Sender::Bot)
    }

    /// Returns a snapshot of the transcript.
    #[inline]
    pub fn export(&self) -> Transcript {
        self.transcript.clone()
    }

    /// Returns the transcript without copying it.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    fn pick_greeting(&self) -> &str {
        self.greetings
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(DEFAULT_GREETINGS[0])
    }

    fn truncate(&mut self) -> bool {
        let len = self.transcript.entries.len();
        if len <= self.max_entries {
            return false;
        }
        self.transcript.entries.drain(..len - self.max_entries);
        true
    }

    fn save(&self) {
        let result = serde_json::to_string(self.transcript.entries())
            .map_err(StorageError::from)
            .and_then(|raw| self.storage.set(&self.key, &raw));
        if let Err(err) = result {
            warn!("failed to save transcript: {err}");
        }
    }
}
