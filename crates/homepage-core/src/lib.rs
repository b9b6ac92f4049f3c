//! Homepage Core Library
//!
//! Core types, configuration, and error handling for the homepage deployer.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod markup;
pub mod timespan;

pub use config::{Config, Hook, MenuEntry, PageEntry};
pub use content::{ContentType, Page, ParsedContent, SourceKind, SourcePath};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
pub use markup::{Html, Latex, Markup};
pub use timespan::Timespan;
