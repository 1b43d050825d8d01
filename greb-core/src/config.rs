//! Settings
//!
//! Options that shape the engine's output: the indentation of the forest
//! text, which branches are processed and how highlighted branches look.
//! The caller reads them from wherever it keeps them (git config, a file)
//! and hands them over as JSON; every field has a default.
//!
//! ```json
//! {
//!   "indent": "  ",
//!   "scope": "local-only",
//!   "color": {
//!     "enabled": true,
//!     "current": { "name": "green", "code": "\u001b[32m" },
//!     "remote": { "name": "red", "code": "\u001b[31m" },
//!     "reset": "\u001b[m"
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::Scope;
use crate::render::{DotRenderer, TextPalette, TextRenderer};

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Indentation unit of the forest text.
    pub indent: String,
    /// Which branches take part in processing.
    pub scope: Scope,
    pub color: ColorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            scope: Scope::All,
            color: ColorSettings::default(),
        }
    }
}

/// Highlighting of the current branch and of branches in other
/// repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    pub enabled: bool,
    pub current: ColorSlot,
    pub remote: ColorSlot,
    /// Escape code ending a colored label.
    pub reset: String,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            current: ColorSlot::named("green"),
            remote: ColorSlot::named("red"),
            reset: String::new(),
        }
    }
}

/// One color, by name for dot and as an escape code for text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSlot {
    pub name: String,
    pub code: String,
}

impl ColorSlot {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            code: String::new(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Forest text renderer highlighting `current`.
    pub fn text_renderer(&self, current: Option<&str>) -> TextRenderer {
        let palette = if self.color.enabled {
            TextPalette {
                current: self.color.current.code.clone(),
                remote: self.color.remote.code.clone(),
                reset: self.color.reset.clone(),
            }
        } else {
            TextPalette::default()
        };
        TextRenderer {
            indent: self.indent.clone(),
            prefix: String::new(),
            current: current.map(str::to_string),
            palette,
        }
    }

    /// Dot renderer highlighting `current`.
    pub fn dot_renderer(&self, current: Option<&str>) -> DotRenderer {
        let enabled = self.color.enabled;
        DotRenderer {
            current: current.map(str::to_string),
            current_color: enabled.then(|| self.color.current.name.clone()),
            remote_color: enabled.then(|| self.color.remote.name.clone()),
        }
    }
}
