//! Open Graph preview metadata attached to a page.

use serde::Serialize;

/// Social-preview metadata for a page. At most one per page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ogp {
    pub id: i64,
    pub page_id: i64,
    pub title: String,
    pub image: String,
    pub description: String,
}

impl Ogp {
    /// Creates a new Ogp instance.
    pub fn new(id: i64, page_id: i64, title: String, image: String, description: String) -> Self {
        Self {
            id,
            page_id,
            title,
            image,
            description,
        }
    }
}

/// Editable OGP fields, used for both create and in-place update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OgpFields {
    pub title: String,
    pub image: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ogp_creation() {
        let ogp = Ogp::new(
            1,
            42,
            "Launch".to_string(),
            "https://cdn.example.com/a.png".to_string(),
            "We launched".to_string(),
        );

        assert_eq!(ogp.id, 1);
        assert_eq!(ogp.page_id, 42);
        assert_eq!(ogp.title, "Launch");
    }

    #[test]
    fn test_ogp_fields_default_is_empty() {
        let fields = OgpFields::default();
        assert!(fields.title.is_empty());
        assert!(fields.image.is_empty());
        assert!(fields.description.is_empty());
    }
}
