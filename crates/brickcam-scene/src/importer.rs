//! Preferences file for the LDraw importer add-on.
//!
//! The importer reads a single `[importldraw]` INI section at start-up. Values
//! are written the way the add-on writes them itself: booleans as `True` /
//! `False`, floats always with a decimal point.

use std::fmt;
use std::path::{Path, PathBuf};

use brickcam_core::Result;
use serde::{Deserialize, Serialize};

/// Mesh resolution of imported primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PartResolution {
    /// Low-resolution primitives.
    Low,
    /// Standard primitives.
    #[default]
    Standard,
    /// High-resolution primitives.
    High,
}

impl PartResolution {
    fn as_str(self) -> &'static str {
        match self {
            PartResolution::Low => "Low",
            PartResolution::Standard => "Standard",
            PartResolution::High => "High",
        }
    }
}

/// Colour scheme used for part materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColourScheme {
    /// Official LDraw colours.
    Ldraw,
    /// Alternate LDraw colours.
    Alt,
    /// LGEO colours, closest to real bricks.
    #[default]
    Lgeo,
}

impl ColourScheme {
    fn as_str(self) -> &'static str {
        match self {
            ColourScheme::Ldraw => "ldraw",
            ColourScheme::Alt => "alt",
            ColourScheme::Lgeo => "lgeo",
        }
    }
}

/// Overall look of imported parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Look {
    /// Realistic materials.
    #[default]
    Normal,
    /// Flat, instruction-booklet style.
    Instructions,
}

impl Look {
    fn as_str(self) -> &'static str {
        match self {
            Look::Normal => "normal",
            Look::Instructions => "instructions",
        }
    }
}

/// How the importer fixes inconsistent normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResolveNormals {
    /// Guess outward normals.
    #[default]
    Guess,
    /// Duplicate faces so both sides render.
    Double,
}

impl ResolveNormals {
    fn as_str(self) -> &'static str {
        match self {
            ResolveNormals::Guess => "guess",
            ResolveNormals::Double => "double",
        }
    }
}

/// Options written to the importer's preferences file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImporterPreferences {
    pub ldraw_directory: PathBuf,
    pub use_unofficial_parts: bool,
    pub use_logo_studs: bool,
    /// Whether the importer adds its own ground plane and environment.
    pub add_environment: bool,
    /// Scale applied to imported parts.
    pub real_scale: f64,
    pub resolution: PartResolution,
    pub smooth_shading: bool,
    pub bevel_edges: bool,
    pub bevel_width: f64,
    pub look: Look,
    pub colour_scheme: ColourScheme,
    pub gaps: bool,
    /// Stored single-precision by the add-on.
    pub real_gap_width: f32,
    pub curved_walls: bool,
    pub import_cameras: bool,
    pub link_parts: bool,
    pub number_nodes: bool,
    pub position_object_on_ground_at_origin: bool,
    pub flatten_hierarchy: bool,
    pub minifig_hierarchy: bool,
    pub instance_studs: bool,
    pub resolve_normals: ResolveNormals,
    pub position_camera: bool,
    pub camera_border_percentage: f64,
}

impl ImporterPreferences {
    /// Preferences for a single still render: the importer's environment
    /// (ground plane included) and a large real scale.
    pub fn still_render(ldraw_directory: impl Into<PathBuf>) -> Self {
        Self {
            ldraw_directory: ldraw_directory.into(),
            use_unofficial_parts: false,
            use_logo_studs: true,
            add_environment: true,
            real_scale: 200.0,
            resolution: PartResolution::Standard,
            smooth_shading: true,
            bevel_edges: true,
            bevel_width: 0.5,
            look: Look::Normal,
            colour_scheme: ColourScheme::Lgeo,
            gaps: false,
            real_gap_width: 0.0002,
            curved_walls: true,
            import_cameras: true,
            link_parts: true,
            number_nodes: true,
            position_object_on_ground_at_origin: true,
            flatten_hierarchy: false,
            minifig_hierarchy: true,
            instance_studs: false,
            resolve_normals: ResolveNormals::Guess,
            position_camera: true,
            camera_border_percentage: 5.0,
        }
    }

    /// Preferences for dataset captures: no importer environment, since the
    /// ground plane is created separately, and a physically sized brick.
    pub fn dataset(ldraw_directory: impl Into<PathBuf>) -> Self {
        Self {
            add_environment: false,
            real_scale: 10.0,
            ..Self::still_render(ldraw_directory)
        }
    }

    /// Renders the preferences file contents.
    pub fn to_ini(&self) -> String {
        self.to_string()
    }

    /// Writes the preferences file, creating parent directories as needed.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ini())?;
        log::info!("placed importer preferences at {}", path.display());
        Ok(())
    }
}

/// Name the importer gives the first object of an imported part.
pub fn imported_object_name(part_id: &str) -> String {
    format!("00000_{part_id}.dat")
}

fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

impl fmt::Display for ImporterPreferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[importldraw]")?;
        writeln!(f, "ldrawdirectory = {}", self.ldraw_directory.display())?;
        writeln!(f, "useunofficialparts = {}", py_bool(self.use_unofficial_parts))?;
        writeln!(f, "uselogostuds = {}", py_bool(self.use_logo_studs))?;
        writeln!(f, "addenvironment = {}", py_bool(self.add_environment))?;
        // Debug formatting keeps the trailing ".0" the add-on expects.
        writeln!(f, "realscale = {:?}", self.real_scale)?;
        writeln!(f, "resolution = {}", self.resolution.as_str())?;
        writeln!(f, "smoothshading = {}", py_bool(self.smooth_shading))?;
        writeln!(f, "beveledges = {}", py_bool(self.bevel_edges))?;
        writeln!(f, "bevelwidth = {:?}", self.bevel_width)?;
        writeln!(f, "uselook = {}", self.look.as_str())?;
        writeln!(f, "usecolourscheme = {}", self.colour_scheme.as_str())?;
        writeln!(f, "gaps = {}", py_bool(self.gaps))?;
        writeln!(f, "realgapwidth = {:?}", f64::from(self.real_gap_width))?;
        writeln!(f, "curvedwalls = {}", py_bool(self.curved_walls))?;
        writeln!(f, "importcameras = {}", py_bool(self.import_cameras))?;
        writeln!(f, "linkparts = {}", py_bool(self.link_parts))?;
        writeln!(f, "numbernodes = {}", py_bool(self.number_nodes))?;
        writeln!(
            f,
            "positionobjectongroundatorigin = {}",
            py_bool(self.position_object_on_ground_at_origin)
        )?;
        writeln!(f, "flattenhierarchy = {}", py_bool(self.flatten_hierarchy))?;
        writeln!(f, "minifighierarchy = {}", py_bool(self.minifig_hierarchy))?;
        writeln!(f, "instancestuds = {}", py_bool(self.instance_studs))?;
        writeln!(f, "resolvenormals = {}", self.resolve_normals.as_str())?;
        writeln!(f, "positioncamera = {}", py_bool(self.position_camera))?;
        writeln!(
            f,
            "cameraborderpercentage = {:?}",
            self.camera_border_percentage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_still_render_ini() {
        let ini = ImporterPreferences::still_render("/opt/ldraw").to_ini();
        let lines: Vec<&str> = ini.lines().collect();
        assert_eq!(lines[0], "[importldraw]");
        assert_eq!(lines[1], "ldrawdirectory = /opt/ldraw");
        assert!(lines.contains(&"addenvironment = True"));
        assert!(lines.contains(&"realscale = 200.0"));
        assert!(lines.contains(&"usecolourscheme = lgeo"));
        assert!(lines.contains(&"cameraborderpercentage = 5.0"));
        assert!(lines.iter().any(|l| l.starts_with("realgapwidth = 0.0002")));
        assert_eq!(lines.len(), 25);
    }

    #[test]
    fn test_dataset_preset() {
        let prefs = ImporterPreferences::dataset("/opt/ldraw");
        assert!(!prefs.add_environment);
        assert_eq!(prefs.real_scale, 10.0);
        let ini = prefs.to_ini();
        assert!(ini.contains("addenvironment = False\n"));
        assert!(ini.contains("realscale = 10.0\n"));
    }

    #[test]
    fn test_imported_object_name() {
        assert_eq!(imported_object_name("3001"), "00000_3001.dat");
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = std::env::temp_dir().join(format!("brickcam-importer-{}", std::process::id()));
        let path = dir.join("addons").join("ImportLDrawPreferences.ini");

        let prefs = ImporterPreferences::dataset("/opt/ldraw");
        prefs.write_to(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), prefs.to_ini());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
