use crate::aggregate::Attractor;
use crate::config::{AggregateConfig, ConfigError};
use crate::settings::{Dimension, GrowthSettings, Lattice};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// A named aggregate configuration with a suggested particle count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub config: AggregateConfig,
    pub particles: usize,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        config: AggregateConfig,
        particles: usize,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            config,
            particles,
        }
    }
}

/// Manager for built-in and user-saved presets
pub struct PresetManager {
    /// Presets that ship with the crate
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetManager {
    pub fn new() -> Self {
        let mut manager = Self {
            builtin: Vec::new(),
            user: Vec::new(),
        };
        manager.load_builtin_presets();
        manager.load_user_presets();
        manager
    }

    /// Load the built-in presets
    fn load_builtin_presets(&mut self) {
        let base = AggregateConfig::default();
        self.builtin = vec![
            Preset::new(
                "Classic",
                "Point-seeded growth on a 2D square lattice",
                base.clone(),
                5000,
            ),
            Preset::new(
                "Web",
                "Six-way branching on a 2D triangular lattice",
                AggregateConfig {
                    lattice: Lattice::Triangle,
                    ..base.clone()
                },
                5000,
            ),
            Preset::new(
                "Lichen",
                "Sparse tendrils from a reluctant point seed",
                AggregateConfig {
                    stickiness: 0.3,
                    ..base.clone()
                },
                3000,
            ),
            Preset::new(
                "Seabed",
                "Sedimentation onto a long line seed",
                AggregateConfig {
                    attractor: Attractor::Line,
                    stickiness: 0.9,
                    settings: GrowthSettings {
                        attractor_size: 40,
                        ..GrowthSettings::default()
                    },
                    ..base.clone()
                },
                4000,
            ),
            Preset::new(
                "Ring",
                "Growth on the surface of a circular seed",
                AggregateConfig {
                    attractor: Attractor::Circle,
                    settings: GrowthSettings {
                        attractor_size: 12,
                        ..GrowthSettings::default()
                    },
                    ..base.clone()
                },
                3000,
            ),
            Preset::new(
                "Coral",
                "Point-seeded growth on a cubic lattice",
                AggregateConfig {
                    dim: Dimension::Three,
                    ..base.clone()
                },
                8000,
            ),
            Preset::new(
                "Bloom",
                "Eight-way 3D branching on the layered triangular lattice",
                AggregateConfig {
                    dim: Dimension::Three,
                    lattice: Lattice::Triangle,
                    stickiness: 0.8,
                    ..base.clone()
                },
                6000,
            ),
            Preset::new(
                "Membrane",
                "Deposition onto a square plane seed",
                AggregateConfig {
                    dim: Dimension::Three,
                    attractor: Attractor::Plane,
                    settings: GrowthSettings {
                        attractor_size: 10,
                        ..GrowthSettings::default()
                    },
                    ..base.clone()
                },
                6000,
            ),
            Preset::new(
                "Geode",
                "Accretion around a spherical shell seed",
                AggregateConfig {
                    dim: Dimension::Three,
                    attractor: Attractor::Sphere,
                    settings: GrowthSettings {
                        attractor_size: 8,
                        ..GrowthSettings::default()
                    },
                    ..base
                },
                8000,
            ),
        ];
    }

    /// Get the presets directory path
    fn presets_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dla-aggregate").join("presets"))
    }

    /// Load user presets from disk
    fn load_user_presets(&mut self) {
        if let Some(dir) = Self::presets_dir() {
            if dir.exists() {
                if let Ok(entries) = fs::read_dir(&dir) {
                    for entry in entries.flatten() {
                        if entry.path().extension().is_some_and(|e| e == "json") {
                            if let Ok(content) = fs::read_to_string(entry.path()) {
                                if let Ok(preset) = serde_json::from_str::<Preset>(&content) {
                                    self.user.push(preset);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Save a preset to disk
    pub fn save_preset(&mut self, preset: Preset) -> Result<(), ConfigError> {
        let dir = Self::presets_dir().ok_or(ConfigError::NoConfigDir)?;
        fs::create_dir_all(&dir).map_err(ConfigError::Write)?;

        let path = dir.join(format!("{}.json", sanitize_name(&preset.name)));
        let json = serde_json::to_string_pretty(&preset).map_err(ConfigError::Serialize)?;
        fs::write(&path, json).map_err(ConfigError::Write)?;

        if !self.user.iter().any(|p| p.name == preset.name) {
            self.user.push(preset);
        }
        Ok(())
    }

    /// Delete a user preset
    pub fn delete_preset(&mut self, name: &str) -> Result<(), ConfigError> {
        let dir = Self::presets_dir().ok_or(ConfigError::NoConfigDir)?;

        if let Some(pos) = self.user.iter().position(|p| p.name == name) {
            self.user.remove(pos);
        }

        let path = dir.join(format!("{}.json", sanitize_name(name)));
        if path.exists() {
            fs::remove_file(&path).map_err(ConfigError::Write)?;
        }
        Ok(())
    }

    /// Get all presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name
    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.all_presets().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Get preset names for display
    pub fn preset_names(&self) -> Vec<&str> {
        self.all_presets().map(|p| p.name.as_str()).collect()
    }
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
