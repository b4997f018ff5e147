use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::{Location, MessageId, Translation};

pub const DEFAULT_DOMAIN: &str = "messages";

/// One catalog message with its translation and every place it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: MessageId,
    pub id_plural: Option<String>,
    pub translation: Translation,
    pub fuzzy: bool,
    /// Flags other than `fuzzy` (e.g. `python-format`).
    pub flags: BTreeSet<String>,
    pub locations: Vec<Location>,
    pub auto_comments: Vec<String>,
    pub user_comments: Vec<String>,
    /// Line of the `msgid` keyword in the catalog file this entry was read from.
    #[serde(skip)]
    pub po_line: Option<usize>,
}

impl Entry {
    pub fn new(id: MessageId) -> Self {
        Self {
            id,
            id_plural: None,
            translation: Translation::default(),
            fuzzy: false,
            flags: BTreeSet::new(),
            locations: Vec::new(),
            auto_comments: Vec::new(),
            user_comments: Vec::new(),
            po_line: None,
        }
    }

    /// An entry no extraction produces any more.
    pub fn is_obsolete(&self) -> bool {
        self.locations.is_empty()
    }

    /// Locations ordered by file then line.
    pub fn sorted_locations(&self) -> Vec<Location> {
        let mut locs = self.locations.clone();
        locs.sort();
        locs
    }
}

/// In-memory message catalog. Entries keep first-insertion order; lookups go
/// through an identity index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub locale: Option<String>,
    pub domain: String,
    /// Comment block written above the header entry, '#'-prefixed lines.
    pub header_comment: String,
    /// Ordered `Key: Value` pairs of the header entry.
    pub metadata: Vec<(String, String)>,
    pub fuzzy_header: bool,
    /// `#~` entries read from disk; never counted, never regenerated.
    pub obsolete: Vec<Entry>,
    entries: Vec<Entry>,
    index: HashMap<MessageId, usize>,
}

impl Catalog {
    pub fn new(locale: Option<String>, domain: impl Into<String>) -> Self {
        Self {
            locale,
            domain: domain.into(),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn get(&self, id: &MessageId) -> Option<&Entry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn get_mut(&mut self, id: &MessageId) -> Option<&mut Entry> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.entries[i]),
            None => None,
        }
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.index.contains_key(id)
    }

    /// Record one occurrence of `id` at `location`.
    ///
    /// An identity seen before gets the location appended to its existing
    /// entry (an exact repeat of a location is ignored); otherwise a new
    /// untranslated entry is created.
    pub fn add(&mut self, id: MessageId, location: Location) -> &mut Entry {
        let idx = match self.index.get(&id) {
            Some(&i) => i,
            None => {
                self.entries.push(Entry::new(id.clone()));
                let i = self.entries.len() - 1;
                self.index.insert(id, i);
                i
            }
        };
        let entry = &mut self.entries[idx];
        if !entry.locations.contains(&location) {
            entry.locations.push(location);
        }
        entry
    }

    /// Insert a fully built entry, replacing any entry with the same identity
    /// in place.
    pub fn insert(&mut self, entry: Entry) {
        match self.index.get(&entry.id) {
            Some(&i) => self.entries[i] = entry,
            None => {
                self.index.insert(entry.id.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Header value by key (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Replace a header value, or append it when absent.
    pub fn set_header(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .metadata
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            Some(slot) => slot.1 = value,
            None => self.metadata.push((key.to_string(), value)),
        }
    }

    /// `nplurals` from the `Plural-Forms` header, 2 when absent or unparsable.
    pub fn num_plurals(&self) -> usize {
        self.header("Plural-Forms")
            .and_then(|v| {
                let rest = &v[v.find("nplurals=")? + "nplurals=".len()..];
                let digits: String = rest
                    .trim_start()
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse().ok()
            })
            .filter(|n: &usize| *n > 0)
            .unwrap_or(2)
    }

    /// Entries ordered by their sorted location lists, for stable diffs.
    pub fn sorted_by_location(&self) -> Vec<&Entry> {
        let mut out: Vec<(Vec<Location>, &Entry)> = self
            .entries
            .iter()
            .map(|e| (e.sorted_locations(), e))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out.into_iter().map(|(_, e)| e).collect()
    }
}
