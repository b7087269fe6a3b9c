use crate::provider::PlayerRef;

/// Trimmed query, or `None` when there is nothing worth looking up.
pub fn normalize_query(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Case-insensitive substring match on the display name, input order kept.
pub fn find_matches<'a, I>(players: I, query: &str) -> Vec<PlayerRef>
where
    I: IntoIterator<Item = &'a PlayerRef>,
{
    let Some(query) = normalize_query(query) else {
        return Vec::new();
    };
    let needle = query.to_lowercase();
    players
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// The transient list shown under the search box.
#[derive(Debug, Clone, Default)]
pub struct SuggestionList {
    items: Vec<PlayerRef>,
    highlighted: Option<usize>,
    visible: bool,
}

impl SuggestionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the rows. An empty set hides the list instead of showing it empty.
    pub fn show(&mut self, items: Vec<PlayerRef>) {
        self.highlighted = None;
        self.visible = !items.is_empty();
        self.items = items;
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
        self.highlighted = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn items(&self) -> &[PlayerRef] {
        &self.items
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted_item(&self) -> Option<&PlayerRef> {
        self.highlighted.and_then(|idx| self.items.get(idx))
    }

    pub fn get(&self, index: usize) -> Option<&PlayerRef> {
        self.items.get(index)
    }

    pub fn move_down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        self.highlighted = Some(match self.highlighted {
            None => 0,
            Some(idx) => (idx + 1).min(last),
        });
    }

    pub fn move_up(&mut self) {
        if let Some(idx) = self.highlighted {
            self.highlighted = Some(idx.saturating_sub(1));
        }
    }
}
