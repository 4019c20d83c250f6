/// One item of the syndication feed, as seen during a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub link: String,
    pub title: String,
    /// Title is HTML markup (Atom `type="html"`/`"xhtml"`) rather than plain text
    pub title_is_html: bool,
    /// RFC 3339, normalized to UTC by the feed parser
    pub published: Option<String>,
    /// RFC 3339, normalized to UTC by the feed parser
    pub updated: Option<String>,
    pub content: Option<String>,
}

impl FeedEntry {
    pub fn new(link: String, title: String) -> Self {
        Self {
            link,
            title,
            title_is_html: false,
            published: None,
            updated: None,
            content: None,
        }
    }

    pub fn with_html_title(mut self, title_is_html: bool) -> Self {
        self.title_is_html = title_is_html;
        self
    }

    pub fn with_published(mut self, published: Option<String>) -> Self {
        self.published = published;
        self
    }

    pub fn with_updated(mut self, updated: Option<String>) -> Self {
        self.updated = updated;
        self
    }

    pub fn with_content(mut self, content: Option<String>) -> Self {
        self.content = content;
        self
    }

    /// The identifier used for novelty checks: the link without surrounding whitespace.
    pub fn identifier(&self) -> &str {
        self.link.trim()
    }

    /// `updated` if present, otherwise `published`.
    pub fn timestamp(&self) -> Option<&str> {
        self.updated.as_deref().or(self.published.as_deref())
    }
}
