//! Presets, the preset catalog, and the top-level generation entry points.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LutError, Result};
use crate::lut::{CubeArtifact, DEFAULT_LUT_SIZE, build_table};
use crate::pipeline::{Pipeline, StepDescriptor};

/// A named look: title, comment lines for the file header, and the ordered
/// step list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub title: String,
    #[serde(default)]
    pub comments: Vec<String>,
    #[serde(default)]
    pub pipeline: Vec<StepDescriptor>,
}

impl Preset {
    /// Check the title and parse every step.
    ///
    /// The title must fit on one quoted `TITLE` line, so line breaks and
    /// double quotes are rejected.
    pub fn validate(&self) -> Result<Pipeline> {
        if self.title.trim().is_empty() {
            return Err(LutError::EmptyTitle);
        }
        if self.title.contains(['\n', '\r', '"']) {
            return Err(LutError::InvalidTitle(self.title.clone()));
        }
        Pipeline::from_descriptors(&self.pipeline)
    }
}

/// All presets from one catalog document, keyed and sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetCatalog {
    pub presets: BTreeMap<String, Preset>,
}

impl PresetCatalog {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), presets = catalog.presets.len(), "loaded preset catalog");
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Result<&Preset> {
        self.presets
            .get(name)
            .ok_or_else(|| LutError::UnknownPreset(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }
}

/// Grid size and strength for one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Grid points per axis, between 2 and [`crate::lut::MAX_LUT_SIZE`].
    pub size: u32,
    /// Global strength. 1.0 applies every step as written, 0.0 is neutral.
    /// Values outside [0, 1] extrapolate.
    pub strength: f64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_LUT_SIZE,
            strength: 1.0,
        }
    }
}

/// Validate `preset` and sample it into a `.cube` artifact.
pub fn generate(preset: &Preset, options: &GenerateOptions) -> Result<CubeArtifact> {
    let pipeline = preset.validate()?;
    let table = build_table(&pipeline, options.strength, options.size)?;
    tracing::info!(
        title = %preset.title,
        size = options.size,
        strength = options.strength,
        "generated LUT"
    );
    Ok(CubeArtifact {
        title: preset.title.clone(),
        comments: preset.comments.clone(),
        table,
    })
}

/// Generate and write a `.cube` file.
///
/// The whole table is built before `path` is created, so configuration
/// errors never leave a file behind.
pub fn generate_to_file(
    preset: &Preset,
    options: &GenerateOptions,
    path: &Path,
) -> Result<CubeArtifact> {
    let artifact = generate(preset, options)?;
    artifact.save(path)?;
    Ok(artifact)
}
