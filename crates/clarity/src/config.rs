//! Engine configuration.
//!
//! Everything is optional in the JSON file; missing fields take the values
//! the engine has always used (a 1280x720 "Clarity++" window, a 70° camera
//! three units back from the origin, the default key bindings).
//!
//! ```json
//! {
//!   "window": { "title": "Demo", "width": 800, "height": 600 },
//!   "backend": "Headless",
//!   "max_frames": 600
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::{Mat4, Vec3};

/// Environment variable naming a config file for [`EngineConfig::from_env`].
pub const CONFIG_ENV: &str = "CLARITY_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Clarity++".to_owned(),
            width: 1280,
            height: 720,
        }
    }
}

/// A fixed perspective camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    /// Width over height. Kept independent of the window size.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Translation applied to the world to get view space.
    pub view_translation: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 70.0,
            aspect: 1200.0 / 720.0,
            near: 0.1,
            far: 100.0,
            view_translation: Vec3::new(0.0, 0.0, -3.0),
        }
    }
}

impl CameraConfig {
    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(self.view_translation)
    }

    /// Right-handed perspective with a [0, 1] depth range.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

/// Which render backend the graphics system drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackendKind {
    /// A winit window rendered with wgpu.
    #[default]
    Window,
    /// No window, no GPU. Frames and draw calls are only recorded.
    Headless,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub clear_color: [f64; 4],
    pub backend: BackendKind,
    /// Texture for the entity seeded at startup.
    pub seed_texture: PathBuf,
    /// Keybind table to load instead of the default bindings.
    pub keybinds: Option<PathBuf>,
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            clear_color: [0.2, 0.3, 0.3, 1.0],
            backend: BackendKind::default(),
            seed_texture: PathBuf::from("assets/textures/3D_TEST.png"),
            keybinds: None,
            max_frames: None,
        }
    }
}

impl EngineConfig {
    /// A config for tests and tools: headless backend, everything else default.
    pub fn headless() -> Self {
        Self {
            backend: BackendKind::Headless,
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_owned(),
            source,
        })
    }

    /// Load the file named by `CLARITY_CONFIG`, or use defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                log::info!("loading config from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.window.title, "Clarity++");
        assert_eq!((config.window.width, config.window.height), (1280, 720));
        assert_eq!(config.camera.fov_y_degrees, 70.0);
        assert_eq!(config.camera.view_translation, Vec3::new(0.0, 0.0, -3.0));
        assert_eq!(config.backend, BackendKind::Window);
        assert!(config.keybinds.is_none());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(
            &path,
            r#"{ "window": { "width": 640 }, "backend": "Headless", "max_frames": 3 }"#,
        )
        .unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.window.title, "Clarity++");
        assert_eq!(config.backend, BackendKind::Headless);
        assert_eq!(config.max_frames, Some(3));
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn load_errors_carry_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(EngineConfig::load(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        match EngineConfig::load(&broken) {
            Err(ConfigError::Json { path, .. }) => assert_eq!(path, broken),
            other => panic!("expected a JSON error, got {other:?}"),
        }
    }

    #[test]
    fn camera_matrices() {
        let camera = CameraConfig::default();
        let origin = camera.view().transform_point3(Vec3::ZERO);
        assert_eq!(origin, Vec3::new(0.0, 0.0, -3.0));

        // A point on the near plane maps to depth 0, far plane to depth 1.
        let near = camera.projection().project_point3(Vec3::new(0.0, 0.0, -camera.near));
        let far = camera.projection().project_point3(Vec3::new(0.0, 0.0, -camera.far));
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-4);
    }
}
