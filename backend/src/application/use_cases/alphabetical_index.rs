use crate::domain::aggregates::Page;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Items shown per letter before pagination kicks in
pub const ITEMS_PER_PAGE: usize = 5;

/// Order page names case-insensitively, falling back to the raw name so the
/// ordering stays total (`ab` < `AC`, and `Apple` < `apple`).
pub fn compare_page_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Pages grouped by the upper-cased first character of their page name.
///
/// Groups iterate in ascending key order; each group is sorted with
/// [`compare_page_names`]. Every group keeps its own pagination cursor.
#[derive(Debug, Clone, Default)]
pub struct AlphabeticalIndex {
    groups: BTreeMap<char, Vec<Page>>,
    cursors: BTreeMap<char, usize>,
    per_page: usize,
}

impl AlphabeticalIndex {
    pub fn build(pages: &[Page]) -> Self {
        Self::with_page_size(pages, ITEMS_PER_PAGE)
    }

    pub fn with_page_size(pages: &[Page], per_page: usize) -> Self {
        let mut groups: BTreeMap<char, Vec<Page>> = BTreeMap::new();
        for page in pages {
            groups
                .entry(page.page_name().index_key())
                .or_default()
                .push(page.clone());
        }
        for group in groups.values_mut() {
            group.sort_by(|a, b| compare_page_names(a.page_name().as_str(), b.page_name().as_str()));
        }
        let cursors = groups.keys().map(|&key| (key, 0)).collect();

        AlphabeticalIndex {
            groups,
            cursors,
            per_page: per_page.max(1),
        }
    }

    /// Group keys in display order
    pub fn keys(&self) -> Vec<char> {
        self.groups.keys().copied().collect()
    }

    pub fn group(&self, key: char) -> Option<&[Page]> {
        self.groups.get(&key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The `A`-`Z` navigation bar, each letter flagged with whether it has pages
    pub fn letter_bar(&self) -> Vec<(char, bool)> {
        ('A'..='Z')
            .map(|letter| (letter, self.groups.contains_key(&letter)))
            .collect()
    }

    /// Zero-based page number currently shown for a group
    pub fn current_page(&self, key: char) -> usize {
        self.cursors.get(&key).copied().unwrap_or(0)
    }

    /// The slice of a group visible at its current cursor
    pub fn visible(&self, key: char) -> &[Page] {
        let Some(group) = self.groups.get(&key) else {
            return &[];
        };
        let start = (self.current_page(key) * self.per_page).min(group.len());
        let end = (start + self.per_page).min(group.len());
        &group[start..end]
    }

    /// Whether the group is large enough to need prev/next controls
    pub fn needs_pagination(&self, key: char) -> bool {
        self.groups
            .get(&key)
            .map_or(false, |group| group.len() > self.per_page)
    }

    pub fn has_next(&self, key: char) -> bool {
        self.groups.get(&key).map_or(false, |group| {
            (self.current_page(key) + 1) * self.per_page < group.len()
        })
    }

    pub fn has_previous(&self, key: char) -> bool {
        self.current_page(key) > 0
    }

    /// Advance a group's cursor; a no-op on the last page
    pub fn next_page(&mut self, key: char) {
        if self.has_next(key) {
            if let Some(cursor) = self.cursors.get_mut(&key) {
                *cursor += 1;
            }
        }
    }

    /// Step a group's cursor back, clamped at the first page
    pub fn previous_page(&mut self, key: char) {
        if let Some(cursor) = self.cursors.get_mut(&key) {
            *cursor = cursor.saturating_sub(1);
        }
    }
}

/// Pages grouped by exact page name, names in [`compare_page_names`] order.
/// Pages sharing a name keep their input order.
pub fn group_by_page_name(pages: &[Page]) -> Vec<(String, Vec<Page>)> {
    let mut groups: Vec<(String, Vec<Page>)> = Vec::new();
    for page in pages {
        let name = page.page_name().as_str();
        match groups.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, group)) => group.push(page.clone()),
            None => groups.push((name.to_string(), vec![page.clone()])),
        }
    }
    groups.sort_by(|(a, _), (b, _)| compare_page_names(a, b));
    groups
}
