//! Capture settings: where parts, the importer add-on and outputs live.

use std::path::{Path, PathBuf};

use brickcam_core::Result;
use serde::{Deserialize, Serialize};

/// Module name of the LDraw importer add-on inside the host.
pub const LDRAW_ADDON_NAME: &str = "io_scene_importldraw";

/// File name the importer reads its preferences from.
pub const PREFERENCES_FILE_NAME: &str = "ImportLDrawPreferences.ini";

/// Part captured when none is given (the classic 2x4 brick).
pub const DEFAULT_PART: &str = "3001";

/// Settings shared by every capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Root of the LDraw parts library.
    pub ldraw_path: PathBuf,
    /// Archive the importer add-on is installed from.
    pub plugin_installer: PathBuf,
    /// Width and height of square renders, in pixels.
    pub render_resolution: u32,
    /// Output image for still captures.
    pub output_path: PathBuf,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            ldraw_path: PathBuf::from("./ldraw/"),
            plugin_installer: PathBuf::from("./importldraw1.2.1.zip"),
            render_resolution: 128,
            output_path: PathBuf::from("./render.png"),
        }
    }
}

impl CaptureSettings {
    /// Path of a part's `.dat` file in the library.
    pub fn part_path(&self, part_id: &str) -> PathBuf {
        self.ldraw_path.join("parts").join(format!("{part_id}.dat"))
    }

    /// Install directory of the importer add-on under the host's scripts directory.
    pub fn plugin_dir(scripts_dir: &Path) -> PathBuf {
        scripts_dir.join("addons").join(LDRAW_ADDON_NAME)
    }

    /// Preferences file the importer reads on start-up.
    pub fn importer_preferences_path(scripts_dir: &Path) -> PathBuf {
        Self::plugin_dir(scripts_dir).join(PREFERENCES_FILE_NAME)
    }

    /// Loads settings from a JSON file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&text)?;
        log::debug!("loaded capture settings from {}", path.display());
        Ok(settings)
    }

    /// Writes settings to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = CaptureSettings::default();
        assert_eq!(settings.render_resolution, 128);
        assert_eq!(settings.output_path, PathBuf::from("./render.png"));
    }

    #[test]
    fn test_part_path() {
        let settings = CaptureSettings::default();
        assert_eq!(
            settings.part_path(DEFAULT_PART),
            PathBuf::from("./ldraw/parts/3001.dat")
        );
    }

    #[test]
    fn test_importer_preferences_path() {
        let scripts = Path::new("/scripts");
        assert_eq!(
            CaptureSettings::plugin_dir(scripts),
            PathBuf::from("/scripts/addons/io_scene_importldraw")
        );
        let path = CaptureSettings::importer_preferences_path(scripts);
        assert_eq!(
            path,
            PathBuf::from("/scripts/addons/io_scene_importldraw/ImportLDrawPreferences.ini")
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: CaptureSettings =
            serde_json::from_str(r#"{"render_resolution": 512}"#).unwrap();
        assert_eq!(settings.render_resolution, 512);
        assert_eq!(settings.ldraw_path, PathBuf::from("./ldraw/"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("brickcam-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");

        let settings = CaptureSettings {
            render_resolution: 256,
            ..CaptureSettings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(CaptureSettings::load(&path).unwrap(), settings);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
