// src/sitemap.rs
// =============================================================================
// This module turns crawl results into a sitemap.xml document.
//
// - Sitemap::collect() drains the result channel until every sender is gone
// - Sitemap::render() serializes the whole document into one String
// - Sitemap::write_to() hands that String to the writer in a single write,
//   so a half-built document is never printed
//
// Output shape (two-space indentation):
//
//   <?xml version="1.0" encoding="UTF-8"?>
//   <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//     <url>
//       <loc>https://example.com/</loc>
//     </url>
//   </urlset>
// =============================================================================

use std::io::{self, Write};

use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("failed to encode sitemap: {0}")]
    Encode(String),
    #[error("failed to write sitemap: {0}")]
    Write(#[from] io::Error),
}

/// One `<url>` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapUrl {
    pub loc: String,
}

/// The `<urlset>` root element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "urlset")]
pub struct Sitemap {
    #[serde(rename = "@xmlns")]
    xmlns: String,
    #[serde(rename = "url", default)]
    urls: Vec<SitemapUrl>,
}

impl Sitemap {
    pub fn new<I, S>(locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            xmlns: SITEMAP_NAMESPACE.to_string(),
            urls: locations
                .into_iter()
                .map(|loc| SitemapUrl { loc: loc.into() })
                .collect(),
        }
    }

    // Receives URLs in arrival order until the channel is closed.
    //
    // Closure is the only stop signal: this returns once the last sender has
    // been dropped, however long the crawl takes.
    pub async fn collect(mut results: mpsc::UnboundedReceiver<String>) -> Self {
        let mut locations = Vec::new();
        while let Some(url) = results.recv().await {
            tracing::trace!(url = %url, "sitemap entry");
            locations.push(url);
        }
        Self::new(locations)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(|u| u.loc.as_str())
    }

    // Renders the complete document, declaration included
    pub fn render(&self) -> Result<String, SitemapError> {
        let mut xml = String::from(XML_DECLARATION);
        let mut serializer = Serializer::new(&mut xml);
        serializer.indent(' ', 2);
        self.serialize(serializer)
            .map_err(|e| SitemapError::Encode(e.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> Result<(), SitemapError> {
        let xml = self.render()?;
        out.write_all(xml.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_layout() {
        let sitemap = Sitemap::new(["https://ex.test/", "https://ex.test/a"]);
        let expected = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">
  <url>
    <loc>https://ex.test/</loc>
  </url>
  <url>
    <loc>https://ex.test/a</loc>
  </url>
</urlset>
";
        assert_eq!(sitemap.render().unwrap(), expected);
    }

    #[test]
    fn test_render_round_trip() {
        let input: Vec<String> = (0..25)
            .map(|i| format!("https://ex.test/page/{i}?sort=asc&limit=10"))
            .collect();
        let xml = Sitemap::new(input.clone()).render().unwrap();

        assert_eq!(xml.matches("<loc>").count(), input.len());

        let parsed: Sitemap = quick_xml::de::from_str(&xml).unwrap();
        assert_eq!(parsed.xmlns, SITEMAP_NAMESPACE);
        assert_eq!(parsed.locations().collect::<Vec<_>>(), input);
    }

    #[test]
    fn test_ampersand_is_escaped() {
        let xml = Sitemap::new(["https://ex.test/?a=1&b=2"]).render().unwrap();
        assert!(xml.contains("<loc>https://ex.test/?a=1&amp;b=2</loc>"));
    }

    #[test]
    fn test_empty_sitemap_is_well_formed() {
        let sitemap = Sitemap::new(Vec::<String>::new());
        let xml = sitemap.render().unwrap();
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(SITEMAP_NAMESPACE));

        let parsed: Sitemap = quick_xml::de::from_str(&xml).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_write_to_buffer() {
        let sitemap = Sitemap::new(["https://ex.test/"]);
        let mut out = Vec::new();
        sitemap.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), sitemap.render().unwrap());
    }

    #[tokio::test]
    async fn test_collect_until_all_senders_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();

        for worker in 0..4 {
            let tx = tx.clone();
            tokio::spawn(async move {
                for page in 0..5 {
                    tx.send(format!("https://ex.test/{worker}/{page}")).unwrap();
                    tokio::task::yield_now().await;
                }
            });
        }
        drop(tx);

        let sitemap = Sitemap::collect(rx).await;
        assert_eq!(sitemap.len(), 20);
    }
}
