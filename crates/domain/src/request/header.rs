//! Request and response header lists.

use serde::{Deserialize, Serialize};

/// Carries the bearer credential.
pub const AUTHORIZATION: &str = "Authorization";

/// One `name: value` pair. Names keep the casing they were given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Field name.
    pub name: String,
    /// Field value, unparsed.
    pub value: String,
}

impl Header {
    /// Pairs `name` with `value`.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Header list in insertion order. Field names compare without regard to
/// ASCII case, and a name may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(Vec<Header>);

impl Headers {
    /// Empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends `header`, keeping any existing field of the same name.
    pub fn add(&mut self, header: Header) {
        self.0.push(header);
    }

    /// Makes `value` the only value of `name`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.remove(name);
        self.add(Header::new(name, value));
    }

    /// Drops all fields called `name`.
    pub fn remove(&mut self, name: &str) {
        self.0.retain(|header| !header.is(name));
    }

    /// Value of the earliest field called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find_map(|header| header.is(name).then_some(header.value.as_str()))
    }

    /// Whether any field is called `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|header| header.is(name))
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Header> {
        self.0.iter()
    }

    /// Field count, repeats included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<I: IntoIterator<Item = Header>>(fields: I) -> Self {
        Self(fields.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_names_match_any_case() {
        let headers: Headers = [Header::new("Content-Type", "application/json")].into_iter().collect();
        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert!(headers.contains("CONTENT-TYPE"));
        assert!(!headers.contains("Accept"));
    }

    #[test]
    fn test_set_collapses_repeats() {
        let mut headers = Headers::new();
        headers.add(Header::new("authorization", "Bearer old"));
        headers.add(Header::new("Accept", "application/json"));
        headers.add(Header::new("AUTHORIZATION", "Bearer older"));

        headers.set(AUTHORIZATION, "Bearer new");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get(AUTHORIZATION), Some("Bearer new"));
    }

    #[test]
    fn test_remove_drops_credential() {
        let mut headers: Headers = [Header::new("Authorization", "Bearer x")].into_iter().collect();
        headers.remove("authorization");
        assert!(headers.is_empty());
        assert_eq!(headers.get(AUTHORIZATION), None);
    }
}
