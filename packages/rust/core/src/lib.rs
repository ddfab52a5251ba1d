//! Sitemap construction core: slug normalization, URL entry building,
//! document assembly, and the end-to-end generate pipeline.

pub mod document;
pub mod entries;
pub mod pipeline;
pub mod slug;

pub use document::SitemapDocument;
pub use pipeline::{GenerateConfig, GenerateReport, build_document, generate};
pub use slug::slugify;
