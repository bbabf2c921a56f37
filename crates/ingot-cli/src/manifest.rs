//! TOML manifest describing a batch of amalgamation jobs
//!
//! ```toml
//! [[job]]
//! name = "embeddb"
//! roots = ["src/embedDB", "src/query-interface", "src/spline"]
//! out-dir = "dist"
//! dialect = "c"
//! layout = "split"
//! preset = "arduino"
//! extra-system-headers = ["<RTClib.h>"]
//! banner-file = "etc/banner.txt"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use ingot_core::{AmalgamationJob, Dialect, OutputLayout, SystemHeaders};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(rename = "job", default)]
    pub jobs: Vec<JobSpec>,
}

/// One `[[job]]` table. Optional fields fall back to the same defaults the
/// `merge` subcommand uses.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct JobSpec {
    /// Base name of the output artifacts.
    pub name: String,
    /// Directories to scan, relative to the working directory.
    pub roots: Vec<PathBuf>,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default)]
    pub dialect: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub extra_system_headers: Vec<String>,
    #[serde(default)]
    pub banner_file: Option<PathBuf>,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Manifest {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

impl JobSpec {
    /// Resolve this spec into a runnable job.
    pub fn to_job(&self) -> Result<AmalgamationJob> {
        let mut system_headers = parse_preset(self.preset.as_deref().unwrap_or("c"))?;
        for entry in &self.extra_system_headers {
            system_headers.insert(entry);
        }

        let mut job = AmalgamationJob::new(self.roots.clone(), &self.name, &self.out_dir)
            .with_dialect(parse_dialect(self.dialect.as_deref().unwrap_or("c"))?)
            .with_layout(parse_layout(self.layout.as_deref().unwrap_or("split"))?)
            .with_system_headers(system_headers);

        if let Some(banner_file) = &self.banner_file {
            let banner = fs::read_to_string(banner_file)
                .with_context(|| format!("Failed to read banner {}", banner_file.display()))?;
            job = job.with_banner(banner);
        }
        Ok(job)
    }
}

pub fn parse_dialect(value: &str) -> Result<Dialect> {
    match value {
        "c" => Ok(Dialect::C),
        "cpp" => Ok(Dialect::Cpp),
        other => bail!("Unknown dialect {other:?} (expected \"c\" or \"cpp\")"),
    }
}

pub fn parse_layout(value: &str) -> Result<OutputLayout> {
    match value {
        "split" => Ok(OutputLayout::Split),
        "combined" => Ok(OutputLayout::Combined),
        other => bail!("Unknown layout {other:?} (expected \"split\" or \"combined\")"),
    }
}

pub fn parse_preset(value: &str) -> Result<SystemHeaders> {
    match value {
        "c" => Ok(SystemHeaders::c_standard()),
        "arduino" => Ok(SystemHeaders::arduino()),
        other => bail!("Unknown preset {other:?} (expected \"c\" or \"arduino\")"),
    }
}
