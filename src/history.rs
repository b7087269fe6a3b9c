#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: u32,
    pub name: String,
}

/// Visited players plus a cursor, with browser-style back/forward.
///
/// The cursor is `None` only while the list is empty; otherwise it always
/// points at a valid entry.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a visit. A different player than the one at the cursor drops
    /// everything after the cursor and becomes the new last entry; the same
    /// player is a no-op.
    pub fn visit(&mut self, id: u32, name: impl Into<String>) {
        if self.current().is_some_and(|entry| entry.id == id) {
            return;
        }
        let keep = self.cursor.map(|idx| idx + 1).unwrap_or(0);
        self.entries.truncate(keep);
        self.entries.push(HistoryEntry {
            id,
            name: name.into(),
        });
        self.cursor = Some(self.entries.len() - 1);
    }

    pub fn back(&mut self) -> Option<&HistoryEntry> {
        let idx = self.cursor.filter(|idx| *idx > 0)?;
        self.cursor = Some(idx - 1);
        self.entries.get(idx - 1)
    }

    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        let idx = self.cursor.filter(|idx| idx + 1 < self.entries.len())?;
        self.cursor = Some(idx + 1);
        self.entries.get(idx + 1)
    }

    /// Moves the cursor to an arbitrary entry without discarding the ones
    /// after it; they stay reachable through `forward` until a new visit.
    pub fn jump_to(&mut self, index: usize) -> Option<&HistoryEntry> {
        if index >= self.entries.len() {
            return None;
        }
        self.cursor = Some(index);
        self.entries.get(index)
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|idx| self.entries.get(idx))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn all_entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor.is_some_and(|idx| idx > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor.is_some_and(|idx| idx + 1 < self.entries.len())
    }
}
