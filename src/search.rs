//! Client-side search over an in-memory collection.
//!
//! A [`ListFilter`] holds the current query and the names of the fields it
//! searches. The view is recomputed on every read, so it always reflects the
//! latest query and the latest collection.

/// Records that expose string fields by name for searching.
pub trait Searchable {
    /// Value of field `name`, or `None` when the record has no such field.
    fn field(&self, name: &str) -> Option<&str>;
}

#[derive(Clone, Debug)]
pub struct ListFilter {
    query: String,
    fields: Vec<&'static str>,
}

impl ListFilter {
    pub fn new(fields: &[&'static str]) -> Self {
        Self { query: String::new(), fields: fields.to_vec() }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
    }

    pub fn clear(&mut self) {
        self.query.clear();
    }

    /// True when the query would not narrow anything.
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// Whether `item` matches the current query. Absent fields never match.
    pub fn matches<T: Searchable>(&self, item: &T) -> bool {
        if self.is_blank() {
            return true;
        }
        let q = self.query.to_lowercase();
        self.fields
            .iter()
            .any(|f| item.field(f).is_some_and(|v| v.to_lowercase().contains(&q)))
    }

    /// Filtered view of `items`, preserving order.
    pub fn apply<'a, T: Searchable>(&self, items: &'a [T]) -> Vec<&'a T> {
        if self.is_blank() {
            return items.iter().collect();
        }
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}
