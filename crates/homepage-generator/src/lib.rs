//! Homepage Generator Library
//!
//! Deploy engine for the homepage: turns the source tree into the output
//! tree.
//!
//! # Modules
//!
//! - [`scanner`] - Source tree walking and classification
//! - [`template`] - Page template with variable interpolation
//! - [`menu`] - Navigation menu rendering
//! - [`html`] - Full HTML pages from rendered page bodies
//! - [`talks`] - Conference presentations for the `talks` hook
//! - [`publications`] - ORCID publication list for the `publications` hook
//! - [`data`] - Data include loading
//! - [`assets`] - Verbatim asset copying
//! - [`build`] - Build orchestration

pub mod assets;
pub mod build;
pub mod data;
pub mod html;
pub mod menu;
pub mod publications;
pub mod scanner;
pub mod talks;
pub mod template;

pub use assets::{AssetProcessor, AssetReport};
pub use build::{BuildError, BuildStats, Builder, CheckReport};
pub use html::{HtmlGenerator, SiteContext};
pub use menu::Menu;
pub use publications::{Publication, PublicationList};
pub use scanner::SourceTree;
pub use talks::{ConferenceList, TalksFormat};
pub use template::{Template, TemplateContext};
