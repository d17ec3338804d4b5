//! Replay script format
//!
//! ```toml
//! [layer]
//! name = "roads"
//! kind = "vector"
//! color = "#ff0000"
//!
//! [[step]]
//! at_ms = 0
//! color = "#0000ff"
//!
//! [[step]]
//! at_ms = 900
//! action = "undo"
//! ```

use std::path::Path;

use anyhow::Context;
use mapstyle_edit::{Color, LayerKind, RendererKind};
use serde::Deserialize;

/// Latest step offset accepted in a script, one day
pub const MAX_AT_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Deserialize)]
pub struct Script {
    pub layer: ScriptLayer,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
pub struct ScriptLayer {
    pub name: String,
    pub kind: LayerKind,
    #[serde(default)]
    pub color: Option<Color>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Undo,
    Redo,
}

/// One edit or history action, `at_ms` after the start of the replay
#[derive(Debug, Default, Deserialize)]
pub struct Step {
    pub at_ms: i64,
    pub action: Option<Action>,
    pub color: Option<Color>,
    pub opacity: Option<f32>,
    pub renderer: Option<RendererKind>,
    pub label_field: Option<String>,
}

impl Step {
    pub fn is_symbology_edit(&self) -> bool {
        self.color.is_some() || self.opacity.is_some() || self.renderer.is_some()
    }
}

impl Script {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Failed to parse script {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let script: Script = toml::from_str(text)?;
        for (i, step) in script.steps.iter().enumerate() {
            if !(0..=MAX_AT_MS).contains(&step.at_ms) {
                anyhow::bail!("step {}: at_ms {} is outside 0..={}", i + 1, step.at_ms, MAX_AT_MS);
            }
            if step.action.is_some() && (step.is_symbology_edit() || step.label_field.is_some()) {
                anyhow::bail!("step {} mixes an action with edits", i + 1);
            }
        }
        Ok(script)
    }
}
