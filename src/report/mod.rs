//! HTML report rendering.
//!
//! A shared page shell plus one report per platform module.

pub mod analyst;
pub mod template;
pub mod trader;

use crate::config::Config;
use std::path::PathBuf;

/// Where pages are written and which modules the navigation lists.
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub root: PathBuf,
    pub nav_modules: Vec<String>,
}

impl From<&Config> for SiteContext {
    fn from(config: &Config) -> Self {
        Self {
            root: config.site.root.clone(),
            nav_modules: config.site.nav_modules.clone(),
        }
    }
}
