//! Sitemap document assembly and XML serialization.
//!
//! Entries live in an ordered sequence keyed by location with a
//! first-write-wins dedup policy, so two runs over the same inputs produce
//! byte-identical output.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use sitemapgen_shared::{Result, SitemapError, UrlEntry};

/// Sitemap protocol namespace.
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// XHTML namespace for alternate-language links.
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

// ---------------------------------------------------------------------------
// SitemapDocument
// ---------------------------------------------------------------------------

/// An ordered, location-deduplicated collection of URL entries.
#[derive(Debug, Default)]
pub struct SitemapDocument {
    entries: Vec<UrlEntry>,
    seen_locations: HashSet<String>,
}

impl SitemapDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, keeping insertion order.
    ///
    /// Dedup is by location, first-write-wins: a second entry for the same
    /// location is rejected even when its metadata differs. Returns whether
    /// the entry was accepted.
    pub fn push(&mut self, entry: UrlEntry) -> bool {
        if !self.seen_locations.insert(entry.loc.clone()) {
            debug!(loc = %entry.loc, "dropping duplicate location");
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Add a batch of entries, returning how many were accepted.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = UrlEntry>) -> usize {
        entries.into_iter().map(|e| self.push(e) as usize).sum()
    }

    /// Number of entries in the document.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[UrlEntry] {
        &self.entries
    }

    /// Serialize the full document: declarations, one `<url>` line per
    /// entry in insertion order, closing tag.
    pub fn to_xml(&self, stylesheet: Option<&str>) -> String {
        let mut lines = Vec::with_capacity(self.entries.len() + 4);

        lines.push(r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string());
        if let Some(href) = stylesheet {
            lines.push(format!(
                r#"<?xml-stylesheet type="text/xsl" href="{}"?>"#,
                xml_escape(href)
            ));
        }
        lines.push(format!(r#"<urlset xmlns="{SITEMAP_NS}""#));
        lines.push(format!(r#"        xmlns:xhtml="{XHTML_NS}">"#));

        for entry in &self.entries {
            lines.push(render_entry(entry));
        }

        let mut xml = lines.join("\n");
        xml.push_str("\n</urlset>\n");
        xml
    }

    /// Write the serialized document to `path`, overwriting prior content.
    /// Parent directories are created as needed.
    pub fn write(&self, path: &Path, stylesheet: Option<&str>) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| SitemapError::io(parent, e))?;
            }
        }

        std::fs::write(path, self.to_xml(stylesheet)).map_err(|e| SitemapError::io(path, e))?;

        info!(path = %path.display(), entries = self.entries.len(), "wrote sitemap");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rendering helpers
// ---------------------------------------------------------------------------

/// Render one `<url>` element on a single line.
fn render_entry(entry: &UrlEntry) -> String {
    let mut out = String::with_capacity(128);

    out.push_str("  <url><loc>");
    out.push_str(&xml_escape(&entry.loc));
    out.push_str("</loc>");

    if let Some(lastmod) = &entry.lastmod {
        out.push_str("<lastmod>");
        out.push_str(lastmod);
        out.push_str("</lastmod>");
    }
    if let Some(freq) = entry.changefreq {
        out.push_str("<changefreq>");
        out.push_str(freq.as_str());
        out.push_str("</changefreq>");
    }
    if let Some(priority) = entry.priority {
        out.push_str("<priority>");
        out.push_str(&format_priority(priority));
        out.push_str("</priority>");
    }
    for alt in &entry.alternates {
        out.push_str(&format!(
            r#"<xhtml:link rel="alternate" hreflang="{}" href="{}" />"#,
            xml_escape(&alt.hreflang),
            xml_escape(&alt.href)
        ));
    }

    out.push_str("</url>");
    out
}

/// Format a priority with one or two decimals: `1.0`, `0.9`, `0.85`.
fn format_priority(priority: f32) -> String {
    let mut s = format!("{priority:.2}");
    if s.ends_with('0') {
        s.truncate(s.len() - 1);
    }
    s
}

/// Escape the five XML special characters.
fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitemapgen_shared::{AlternateLink, ChangeFreq};

    fn entry(loc: &str) -> UrlEntry {
        UrlEntry::new(loc)
    }

    #[test]
    fn push_deduplicates_by_location_first_write_wins() {
        let mut doc = SitemapDocument::new();
        let mut first = entry("https://example.com/a");
        first.priority = Some(0.9);
        let mut second = entry("https://example.com/a");
        second.priority = Some(0.1);

        assert!(doc.push(first));
        assert!(!doc.push(second));

        assert_eq!(doc.len(), 1);
        assert_eq!(doc.entries()[0].priority, Some(0.9));
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut doc = SitemapDocument::new();
        doc.push(entry("https://example.com/b"));
        doc.push(entry("https://example.com/a"));
        doc.push(entry("https://example.com/c"));

        let locs: Vec<_> = doc.entries().iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(
            locs,
            [
                "https://example.com/b",
                "https://example.com/a",
                "https://example.com/c"
            ]
        );
    }

    #[test]
    fn full_entry_renders_all_fields() {
        let rendered = render_entry(&UrlEntry {
            loc: "https://example.com/".into(),
            lastmod: Some("2024-06-01".into()),
            changefreq: Some(ChangeFreq::Daily),
            priority: Some(1.0),
            alternates: vec![AlternateLink {
                hreflang: "es-AR".into(),
                href: "https://example.com/".into(),
            }],
        });
        assert_eq!(
            rendered,
            "  <url><loc>https://example.com/</loc>\
             <lastmod>2024-06-01</lastmod>\
             <changefreq>daily</changefreq>\
             <priority>1.0</priority>\
             <xhtml:link rel=\"alternate\" hreflang=\"es-AR\" href=\"https://example.com/\" />\
             </url>"
        );
    }

    #[test]
    fn optional_fields_are_omitted() {
        let rendered = render_entry(&entry("https://example.com/x"));
        assert_eq!(rendered, "  <url><loc>https://example.com/x</loc></url>");
    }

    #[test]
    fn priority_formatting() {
        assert_eq!(format_priority(1.0), "1.0");
        assert_eq!(format_priority(0.9), "0.9");
        assert_eq!(format_priority(0.85), "0.85");
        assert_eq!(format_priority(0.6), "0.6");
        assert_eq!(format_priority(0.75), "0.75");
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(
            xml_escape("a&b<c>\"d'"),
            "a&amp;b&lt;c&gt;&quot;d&apos;"
        );
    }

    #[test]
    fn document_is_well_formed() {
        let mut doc = SitemapDocument::new();
        doc.push(entry("https://example.com/a"));
        doc.push(entry("https://example.com/b"));

        let xml = doc.to_xml(Some("/sitemap.xsl"));

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<?xml-stylesheet type="text/xsl" href="/sitemap.xsl"?>"#));
        assert!(xml.contains(SITEMAP_NS));
        assert!(xml.contains(XHTML_NS));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert_eq!(xml.matches("</url>").count(), 2);
        assert_eq!(xml.matches("</urlset>").count(), 1);
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn stylesheet_is_optional() {
        let doc = SitemapDocument::new();
        let xml = doc.to_xml(None);
        assert!(!xml.contains("xml-stylesheet"));
    }

    #[test]
    fn write_creates_parent_dirs_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("public/sitemap.xml");

        let mut doc = SitemapDocument::new();
        doc.push(entry("https://example.com/a"));
        doc.write(&path, None).unwrap();

        let first = std::fs::read_to_string(&path).unwrap();
        assert!(first.contains("https://example.com/a"));

        let mut doc2 = SitemapDocument::new();
        doc2.push(entry("https://example.com/b"));
        doc2.write(&path, None).unwrap();

        let second = std::fs::read_to_string(&path).unwrap();
        assert!(second.contains("https://example.com/b"));
        assert!(!second.contains("https://example.com/a"));
    }
}
