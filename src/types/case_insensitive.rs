use std::collections::HashMap;
use unicase::UniCase;

/// A header-name-keyed map with case-insensitive lookup, per RFC 7230 section
/// 3.2 ("Each header field consists of a case-insensitive field name").
///
/// The teacher's newest validator generation stored headers in a plain
/// `HashMap<String, String>`, which made lookups case-sensitive. This
/// revives the `unicase`-backed map an older generation used.
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveMap(HashMap<UniCase<String>, String>);

impl CaseInsensitiveMap {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(UniCase::new(key.into()), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&UniCase::new(key.to_string())).map(|v| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(&UniCase::new(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_ref().as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for CaseInsensitiveMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = CaseInsensitiveMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut map = CaseInsensitiveMap::new();
        map.insert("Content-Type", "application/json");
        assert_eq!(map.get("content-type"), Some("application/json"));
        assert_eq!(map.get("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn missing_key_returns_none() {
        let map = CaseInsensitiveMap::new();
        assert_eq!(map.get("x-request-id"), None);
    }
}
