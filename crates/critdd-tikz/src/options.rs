//! Key-value options of TikZ environments and render settings.

/// An ordered list of `key={value}` options.
///
/// Setting an existing key replaces its value but keeps its position, so user
/// overrides appear where the default was.
///
/// # Examples
///
/// ```
/// use critdd_tikz::options::Options;
///
/// let mut options = Options::from_iter([("xmin", "1"), ("clip", "false")]);
/// options.set("xmin", "0");
/// options.set("title", "critdd");
/// let keys = options.iter().map(|(k, _)| k).collect::<Vec<_>>();
/// assert_eq!(keys, vec!["xmin", "clip", "title"]);
/// assert_eq!(options.get("xmin"), Some("0"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Options {
    entries: Vec<(String, String)>,
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, in place if the key exists and appended otherwise.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns these options with every entry of `overrides` applied.
    #[must_use]
    pub fn merged(&self, overrides: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in overrides.iter() {
            merged.set(key, value);
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Options
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (key, value) in iter {
            options.set(key, value);
        }
        options
    }
}

impl<K, V> Extend<(K, V)> for Options
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

/// Settings shared by the single and the stacked renderer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Draw rank 1 on the right.
    pub reverse_x: bool,
    /// Wrap the picture in a standalone document.
    pub as_document: bool,
    /// Overrides of the `tikzpicture` options.
    pub tikzpicture_options: Options,
    /// Overrides of the `axis` options, for example a `title`.
    pub axis_options: Options,
    /// Extra preamble lines of the document.
    pub preamble: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_default_positions() {
        let defaults = Options::from_iter([("a", "1"), ("b", "2"), ("c", "3")]);
        let overrides = Options::from_iter([("d", "4"), ("b", "x")]);
        let merged = defaults.merged(&overrides);
        assert_eq!(
            merged.iter().collect::<Vec<_>>(),
            vec![("a", "1"), ("b", "x"), ("c", "3"), ("d", "4")]
        );
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn test_duplicate_keys_collapse() {
        let options = Options::from_iter([("k", "1"), ("k", "2")]);
        assert_eq!(options.len(), 1);
        assert_eq!(options.get("k"), Some("2"));
        assert_eq!(options.get("missing"), None);
    }

    #[test]
    fn test_extend() {
        let mut options = Options::new();
        assert!(options.is_empty());
        options.extend([("title".to_owned(), "critdd".to_owned())]);
        assert_eq!(options.get("title"), Some("critdd"));
    }
}
