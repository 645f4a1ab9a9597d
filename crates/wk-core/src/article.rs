use serde::{Deserialize, Serialize};

use crate::title::titles_eq;

/// A fetched encyclopedia article.
///
/// Articles are immutable once fetched. `links` keeps the order the source
/// returned so listings stay stable; lookups ignore case and whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Canonical title as reported by the source.
    pub title: String,
    /// Lead section of the article.
    #[serde(default)]
    pub summary: String,
    /// Full article text, if the source provides it.
    #[serde(default)]
    pub content: String,
    /// Address of the article, if the source provides one.
    #[serde(default)]
    pub url: Option<String>,
    /// Outbound link titles, unique, in source order.
    #[serde(default)]
    pub links: Vec<String>,
}

impl Article {
    /// Create an article with a title and no text or links.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: String::new(),
            content: String::new(),
            url: None,
            links: Vec::new(),
        }
    }

    /// Set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Set the full content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Add outbound links, skipping titles already present.
    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for link in links {
            let link = link.into();
            if self.find_link(&link).is_none() {
                self.links.push(link);
            }
        }
        self
    }

    /// Find the link matching `title`, returning the link's own spelling.
    pub fn find_link(&self, title: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|link| titles_eq(link, title))
            .map(String::as_str)
    }

    /// The full text if present, otherwise the summary.
    pub fn body(&self) -> &str {
        if self.content.trim().is_empty() {
            &self.summary
        } else {
            &self.content
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canada() -> Article {
        Article::new("Canada")
            .with_summary("Canada is a country in North America.")
            .with_links(["Politics of Canada", "Ottawa", "United States"])
    }

    #[test]
    fn find_link_ignores_case_and_spacing() {
        let article = canada();
        assert_eq!(article.find_link("politics  of canada"), Some("Politics of Canada"));
        assert!(article.find_link("Toronto").is_none());
    }

    #[test]
    fn duplicate_links_are_skipped() {
        let article = canada().with_links(["ottawa", "Toronto"]);
        assert_eq!(
            article.links,
            vec!["Politics of Canada", "Ottawa", "United States", "Toronto"]
        );
    }

    #[test]
    fn body_falls_back_to_summary() {
        let article = canada();
        assert_eq!(article.body(), "Canada is a country in North America.");
        let article = article.with_content("Full text.");
        assert_eq!(article.body(), "Full text.");
    }

    #[test]
    fn deserializes_with_defaults() {
        let article: Article = serde_json::from_str(r#"{"title": "Ottawa"}"#).unwrap();
        assert_eq!(article.title, "Ottawa");
        assert!(article.links.is_empty());
        assert!(article.url.is_none());
    }
}
