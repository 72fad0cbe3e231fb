//! Presentation and accessibility preferences
//!
//! Settings affect drawing only. The simulation never reads them, so a
//! replay stays identical whatever the viewer has toggled.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub screen_shake: bool,
    pub particles: bool,
    pub show_hud: bool,
    /// Suppresses shake and other large motion regardless of other toggles
    pub reduced_motion: bool,
    /// Upper bound on drawn particles per frame
    pub max_particles: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            particles: true,
            show_hud: true,
            reduced_motion: false,
            max_particles: 600,
        }
    }
}

impl Settings {
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    pub fn effective_particle_cap(&self) -> usize {
        if self.particles { self.max_particles } else { 0 }
    }

    /// Load from a JSON file, falling back to defaults on any failure.
    /// A missing or corrupt file is not worth failing startup over.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!("settings file {path:?} unreadable ({err}), using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let text = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, text)
    }
}
