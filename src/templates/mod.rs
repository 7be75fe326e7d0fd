use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::models::{Trip, User};

const WELCOME: &str = "welcome";
const HELP: &str = "help";
const TRIP: &str = "trip";

const SOURCES: [(&str, &str); 3] = [
    (WELCOME, include_str!("welcome.tera")),
    (HELP, include_str!("help.tera")),
    (TRIP, include_str!("trip.tera")),
];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to parse templates: {}", .0.join("; "))]
    Parse(Vec<String>),
    #[error("failed to render {name:?} template: {source}")]
    Render {
        name: &'static str,
        #[source]
        source: tera::Error,
    },
}

#[derive(Debug, Serialize)]
pub struct WelcomeParams<'a> {
    pub first_name: &'a str,
    pub bot_username: &'a str,
    pub help_cmd: &'a str,
}

#[derive(Debug, Serialize)]
pub struct HelpParams<'a> {
    pub bot_username: &'a str,
    pub commands: &'a str,
    pub help_cmd: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TripParams {
    pub title: String,
    pub date: String,
    pub description: String,
    pub created_by: String,
}

impl TripParams {
    pub fn new(trip: &Trip, creator: &User) -> Self {
        Self {
            title: trip.name.clone(),
            date: trip.date.clone(),
            description: trip.description.clone(),
            created_by: creator.mention(),
        }
    }
}

/// Message texts rendered from the embedded templates.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        let errors: Vec<String> = SOURCES
            .iter()
            .filter_map(|(name, source)| {
                tera.add_raw_template(name, source)
                    .err()
                    .map(|e| format!("{name}: {e}"))
            })
            .collect();

        if !errors.is_empty() {
            return Err(RenderError::Parse(errors));
        }

        Ok(Self { tera })
    }

    pub fn welcome(&self, params: &WelcomeParams<'_>) -> Result<String, RenderError> {
        self.render(WELCOME, params)
    }

    pub fn help(&self, params: &HelpParams<'_>) -> Result<String, RenderError> {
        self.render(HELP, params)
    }

    pub fn trip(&self, params: &TripParams) -> Result<String, RenderError> {
        self.render(TRIP, params)
    }

    fn render<T: Serialize>(&self, name: &'static str, params: &T) -> Result<String, RenderError> {
        let context = Context::from_serialize(params)
            .map_err(|source| RenderError::Render { name, source })?;
        self.tera
            .render(name, &context)
            .map(|text| text.trim_end().to_string())
            .map_err(|source| RenderError::Render { name, source })
    }
}
