/// Recipient addresses parsed from a comma-separated configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientList(Vec<String>);

impl RecipientList {
    /// Split on commas, trim, and drop empty pieces. Order is preserved.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}
