// Toolkit installation context
//
// Resolves the on-disk layout of the external tracking toolkit once, at
// startup. Every asset the pipeline needs (detector geometry bundle, material
// map, digitization config, seeding selection) is checked here; a missing
// asset means the environment is wrong, so resolution fails fatally and is
// never retried.

use std::fs;
use std::path::{Path, PathBuf};
use trackbench_core::{Error, Result};

const GEOMETRY_DIR: &str = "geometry";
const MATERIAL_MAP: &str = "data/odd-material-maps.root";
const DIGI_CONFIG: &str = "config/odd-digi-smearing-config.json";
const SEEDING_CONFIG: &str = "config/odd-seeding-config.json";
const SEQUENCER_BIN: &str = "bin/sequencer";
const VERSION_FILE: &str = "VERSION";

/// Resolved toolkit installation: asset paths plus the build identifier.
///
/// Constructed once and passed by reference into pipeline construction; the
/// harness owns it for the duration of the benchmark.
#[derive(Debug, Clone)]
pub struct ToolkitContext {
    root: PathBuf,
    geometry_dir: PathBuf,
    material_map: PathBuf,
    digi_config: PathBuf,
    seeding_config: PathBuf,
    sequencer_bin: PathBuf,
    build_id: String,
}

impl ToolkitContext {
    /// Resolve a toolkit installation rooted at `root`
    pub fn resolve(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::config(format!(
                "toolkit directory {} does not exist",
                root.display()
            )));
        }

        let geometry_dir = require_dir(&root, GEOMETRY_DIR)?;
        let material_map = require_file(&root, MATERIAL_MAP)?;
        let digi_config = require_file(&root, DIGI_CONFIG)?;
        let seeding_config = require_file(&root, SEEDING_CONFIG)?;
        let sequencer_bin = require_file(&root, SEQUENCER_BIN)?;
        let build_id = read_build_id(&root)?;

        Ok(Self {
            root,
            geometry_dir,
            material_map,
            digi_config,
            seeding_config,
            sequencer_bin,
            build_id,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Detector geometry bundle directory
    pub fn geometry_dir(&self) -> &Path {
        &self.geometry_dir
    }

    /// Material map file
    pub fn material_map(&self) -> &Path {
        &self.material_map
    }

    /// Digitization smearing configuration
    pub fn digi_config(&self) -> &Path {
        &self.digi_config
    }

    /// Seed-finder geometry selection file
    pub fn seeding_config(&self) -> &Path {
        &self.seeding_config
    }

    /// The toolkit's sequencer executable
    pub fn sequencer_bin(&self) -> &Path {
        &self.sequencer_bin
    }

    /// Short build identifier of the installation, used to name the summary
    pub fn build_id(&self) -> &str {
        &self.build_id
    }
}

fn require_dir(root: &Path, relative: &str) -> Result<PathBuf> {
    let path = root.join(relative);
    if !path.is_dir() {
        return Err(Error::config(format!(
            "missing toolkit directory {}",
            path.display()
        )));
    }
    Ok(path)
}

fn require_file(root: &Path, relative: &str) -> Result<PathBuf> {
    let path = root.join(relative);
    if !path.is_file() {
        return Err(Error::config(format!(
            "missing toolkit file {}",
            path.display()
        )));
    }
    Ok(path)
}

/// The VERSION file's first line carries the short commit hash of the build
fn read_build_id(root: &Path) -> Result<String> {
    let path = root.join(VERSION_FILE);
    let text = fs::read_to_string(&path).map_err(|e| {
        Error::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    let build_id = text.lines().next().unwrap_or("").trim();
    if build_id.is_empty() {
        return Err(Error::config(format!(
            "{} carries no build identifier",
            path.display()
        )));
    }
    Ok(build_id.to_string())
}
