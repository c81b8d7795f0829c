use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag entity - a label shared by many posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Trim tag names, drop blanks and case-insensitive duplicates (the first
/// spelling wins), then sort by name.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let name = tag.trim();
        if !name.is_empty() && !seen.iter().any(|s| s.eq_ignore_ascii_case(name)) {
            seen.push(name.to_string());
        }
    }
    seen.sort();
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tags_trims_and_dedupes() {
        let tags = vec![
            " rust ".to_string(),
            "web".to_string(),
            "rust".to_string(),
            "   ".to_string(),
        ];

        assert_eq!(normalize_tags(&tags), vec!["rust", "web"]);
    }

    #[test]
    fn test_normalize_tags_ignores_case_and_sorts() {
        let tags = vec![
            "web".to_string(),
            "Rust".to_string(),
            "rust".to_string(),
            "WEB ".to_string(),
            "api".to_string(),
        ];

        assert_eq!(normalize_tags(&tags), vec!["Rust", "api", "web"]);
    }
}
