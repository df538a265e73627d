use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use tracing::{debug, info};
use wiremap_core::{Artifact, GeneratorOptions, Side};
use wiremap_ir::Service;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// IR document (JSON, or YAML for .yaml/.yml files)
    #[arg(long = "ir", value_name = "IR_PATH")]
    pub ir: PathBuf,
    /// Generator options (TOML, or JSON for .json files)
    #[arg(long = "config", value_name = "CONFIG_PATH")]
    pub config: Option<PathBuf>,
    /// Overrides the role from the config file
    #[arg(long = "role", value_enum)]
    pub role: Option<Role>,
    /// Directory the artifacts are written below
    #[arg(long = "out", value_name = "OUT_DIR", default_value = ".")]
    pub out: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// fetch client
    Client,
    /// express routes
    Server,
}

impl From<Role> for Side {
    fn from(role: Role) -> Self {
        match role {
            Role::Client => Side::Client,
            Role::Server => Side::Server,
        }
    }
}

pub fn run(args: GenerateArgs) -> i32 {
    match generate(&args) {
        Ok(written) => {
            for path in &written {
                println!("{}", path.display());
            }
            0
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

fn generate(args: &GenerateArgs) -> Result<Vec<PathBuf>, String> {
    let service = Service::load(&args.ir).map_err(|err| err.to_string())?;

    let mut options = match &args.config {
        Some(path) => GeneratorOptions::load(path).map_err(|err| err.to_string())?,
        None => GeneratorOptions::default(),
    };
    if let Some(role) = args.role {
        options.role = role.into();
    }
    debug!(
        ir = %args.ir.display(),
        role = ?options.role,
        "Resolved generator options."
    );

    let artifacts = wiremap_core::generate(&service, &options)
        .map_err(|err| format!("Failed to generate {}: {err}", service.title))?;
    write_artifacts(&args.out, &artifacts)
}

fn write_artifacts(out: &Path, artifacts: &[Artifact]) -> Result<Vec<PathBuf>, String> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = out.join(artifact.relative_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                format!("Failed to create {}: {err}", parent.display())
            })?;
        }
        fs::write(&path, &artifact.contents)
            .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
        debug!(
            path = %path.display(),
            len = artifact.contents.len(),
            "Wrote artifact."
        );
        written.push(path);
    }
    info!(out = %out.display(), files = written.len(), "Artifacts written.");
    Ok(written)
}
