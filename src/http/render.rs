//! Home page rendering.
//!
//! The template is a Jinja template seeing `image_url`, `style_url` and
//! `mode`. It is registered under an `.html` name, so minijinja escapes
//! every substituted value for HTML. Values are output once and are never
//! parsed as template syntax.

use std::fs;
use std::io;
use std::path::Path;

use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

use crate::config::ResourcesConfig;
use crate::health::FailoverMode;

/// Template compiled into the binary, used when no template file is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("home.html");

const TEMPLATE_NAME: &str = "home.html";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("cannot read template: {0}")]
    Io(#[from] io::Error),

    #[error("invalid template: {0}")]
    Syntax(#[from] minijinja::Error),
}

/// Resource URLs for one rendered page. Built fresh per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderContext<'a> {
    pub image_url: &'a str,
    pub style_url: &'a str,
    pub mode: FailoverMode,
}

impl<'a> RenderContext<'a> {
    /// Pick the pair matching the current mode.
    pub fn select(resources: &'a ResourcesConfig, mode: FailoverMode) -> Self {
        let pair = match mode {
            FailoverMode::Primary => &resources.primary,
            FailoverMode::Fallback => &resources.fallback,
        };
        Self {
            image_url: &pair.image_url,
            style_url: &pair.style_url,
            mode,
        }
    }
}

/// Home page template, parsed once at startup.
#[derive(Debug)]
pub struct HomeTemplate {
    env: Environment<'static>,
}

impl HomeTemplate {
    pub fn embedded() -> Result<Self, TemplateError> {
        Self::from_source(DEFAULT_TEMPLATE)
    }

    /// Parse `source`; syntax errors are reported here rather than per request.
    pub fn from_source(source: impl Into<String>) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME, source.into())?;
        Ok(Self { env })
    }

    /// Read the template at `path`, or use the embedded one when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, TemplateError> {
        match path {
            Some(path) => Self::from_source(fs::read_to_string(path)?),
            None => Self::embedded(),
        }
    }

    pub fn render(&self, context: &RenderContext<'_>) -> Result<String, minijinja::Error> {
        self.env.get_template(TEMPLATE_NAME)?.render(context)
    }
}
