use std::collections::HashMap;
use std::path::Path;

use rand::Rng;
use rand::rngs::StdRng;
use serde::Deserialize;
use tracing::debug;

use crate::article::Article;
use crate::error::{CoreError, CoreResult};
use crate::title::normalize_title;

/// Redirect chains longer than this are treated as broken.
const MAX_REDIRECTS: usize = 8;

/// Something that can fetch articles by title.
///
/// Implementations canonicalize redirects before returning, so the
/// returned article's title may differ from the requested one.
pub trait ArticleSource {
    /// Fetch the article for `title`.
    fn fetch(&self, title: &str) -> CoreResult<Article>;
}

impl<S: ArticleSource + ?Sized> ArticleSource for &S {
    fn fetch(&self, title: &str) -> CoreResult<Article> {
        (**self).fetch(title)
    }
}

impl<S: ArticleSource + ?Sized> ArticleSource for Box<S> {
    fn fetch(&self, title: &str) -> CoreResult<Article> {
        (**self).fetch(title)
    }
}

#[derive(Deserialize)]
struct GraphDocument {
    #[serde(default)]
    articles: Vec<Article>,
    #[serde(default)]
    redirects: HashMap<String, String>,
}

/// An offline article source: a fixed set of articles and redirects.
///
/// The JSON form is
/// `{ "articles": [{ "title": ..., "summary": ..., "links": [...] }], "redirects": { "from": "to" } }`.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    articles: Vec<Article>,
    index: HashMap<String, usize>,
    redirects: HashMap<String, String>,
}

impl LinkGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a graph from its JSON form.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let doc: GraphDocument = serde_json::from_str(json)?;
        let mut graph = Self::new();
        for article in doc.articles {
            graph.insert(article);
        }
        for (from, to) in doc.redirects {
            graph.add_redirect(from, to);
        }
        Ok(graph)
    }

    /// Read and parse a graph file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Add an article, replacing any article with the same title.
    ///
    /// Repeated links are dropped, keeping the first spelling.
    pub fn insert(&mut self, mut article: Article) {
        let links = std::mem::take(&mut article.links);
        let article = article.with_links(links);
        let key = normalize_title(&article.title);
        match self.index.get(&key) {
            Some(&i) => self.articles[i] = article,
            None => {
                self.index.insert(key, self.articles.len());
                self.articles.push(article);
            }
        }
    }

    /// Builder form of [`LinkGraph::insert`].
    pub fn with_article(mut self, article: Article) -> Self {
        self.insert(article);
        self
    }

    /// Make `from` resolve to the article titled `to`.
    pub fn add_redirect(&mut self, from: impl AsRef<str>, to: impl Into<String>) {
        self.redirects.insert(normalize_title(from.as_ref()), to.into());
    }

    /// Builder form of [`LinkGraph::add_redirect`].
    pub fn with_redirect(mut self, from: impl AsRef<str>, to: impl Into<String>) -> Self {
        self.add_redirect(from, to);
        self
    }

    /// Number of articles.
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Whether the graph has no articles.
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Titles of all articles, in insertion order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.articles.iter().map(|a| a.title.as_str())
    }

    /// Pick two distinct article titles for a start and end point.
    pub fn random_pair(&self, rng: &mut StdRng) -> CoreResult<(String, String)> {
        let n = self.articles.len();
        if n < 2 {
            return Err(CoreError::TooFewArticles {
                found: n,
                needed: 2,
            });
        }
        let start = rng.random_range(0..n);
        let mut end = rng.random_range(0..n - 1);
        if end >= start {
            end += 1;
        }
        Ok((
            self.articles[start].title.clone(),
            self.articles[end].title.clone(),
        ))
    }

    fn resolve(&self, title: &str) -> CoreResult<usize> {
        let mut key = normalize_title(title);
        for _ in 0..MAX_REDIRECTS {
            if let Some(&i) = self.index.get(&key) {
                return Ok(i);
            }
            match self.redirects.get(&key) {
                Some(target) => {
                    debug!(from = %key, to = %target, "following redirect");
                    key = normalize_title(target);
                }
                None => break,
            }
        }
        Err(CoreError::NotFound(title.to_string()))
    }
}

impl ArticleSource for LinkGraph {
    fn fetch(&self, title: &str) -> CoreResult<Article> {
        let i = self.resolve(title)?;
        Ok(self.articles[i].clone())
    }
}
