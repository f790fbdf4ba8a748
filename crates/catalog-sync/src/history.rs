//! Navigation history of catalog query strings.

/// Browser-style history stack.
///
/// `push` drops any forward entries, like navigating after going back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    /// Start with a single entry.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    /// Push a new entry and make it current.
    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry.into());
        self.index = self.entries.len() - 1;
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    /// Step back. Returns the new current entry.
    pub fn back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    /// Step forward. Returns the new current entry.
    pub fn forward(&mut self) -> Option<&str> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_navigate() {
        let mut history = History::new("");
        history.push("q=öl");
        history.push("q=öl&page=2");

        assert_eq!(history.len(), 3);
        assert_eq!(history.back(), Some("q=öl"));
        assert_eq!(history.back(), Some(""));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), Some("q=öl"));
    }

    #[test]
    fn test_push_after_back_drops_forward_entries() {
        let mut history = History::new("a");
        history.push("b");
        history.push("c");
        history.back();
        history.push("d");

        assert_eq!(history.entries(), &["a", "b", "d"]);
        assert!(!history.can_go_forward());
    }
}
