//! Declarative input for the application packager.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use solvpack_platform::TargetPlatform;

use crate::config::PackagingConfig;
use crate::error::{Error, Result};

/// A file shipped with the packaged app and the bundle subdirectory it lands in.
///
/// `dest_dir` of `"."` means the bundle root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePair {
    pub source:   PathBuf,
    pub dest_dir: String,
}

impl FilePair {
    pub fn new(source: impl Into<PathBuf>, dest_dir: impl Into<String>) -> Self {
        Self {
            source:   source.into(),
            dest_dir: dest_dir.into(),
        }
    }

    fn render(&self, platform: &TargetPlatform) -> String {
        format!(
            "{}{}{}",
            self.source.display(),
            platform.os.pair_separator(),
            self.dest_dir
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagingSpec {
    pub name:           String,
    pub entry_script:   PathBuf,
    pub onefile:        bool,
    pub hidden_imports: Vec<String>,
    pub binaries:       Vec<FilePair>,
    pub datas:          Vec<FilePair>,
}

impl PackagingSpec {
    pub fn new(name: impl Into<String>, entry_script: impl Into<PathBuf>) -> Self {
        Self {
            name:           name.into(),
            entry_script:   entry_script.into(),
            onefile:        false,
            hidden_imports: Vec::new(),
            binaries:       Vec::new(),
            datas:          Vec::new(),
        }
    }

    /// Build from the `[packaging]` section, shipping `solver` into every configured subdirectory.
    pub fn from_config(config: &PackagingConfig, solver: &Path) -> Self {
        let mut spec = Self::new(&config.name, &config.entry_script)
            .onefile(config.onefile)
            .with_solver(solver, config.solver_subdirs.as_slice());
        for module in &config.hidden_imports {
            spec = spec.hidden_import(module);
        }
        for pair in &config.datas {
            spec = spec.with_data(&pair.source, &pair.dest_dir);
        }
        spec
    }

    pub fn onefile(mut self, yes: bool) -> Self {
        self.onefile = yes;
        self
    }

    pub fn hidden_import(mut self, module: impl Into<String>) -> Self {
        let module = module.into();
        if !self.hidden_imports.contains(&module) {
            self.hidden_imports.push(module);
        }
        self
    }

    /// Ship the solver binary at `source` into each of `subdirs`.
    pub fn with_solver<S: AsRef<str>>(mut self, source: &Path, subdirs: &[S]) -> Self {
        for subdir in subdirs {
            push_unique(&mut self.binaries, FilePair::new(source, subdir.as_ref()));
        }
        self
    }

    pub fn with_data(mut self, source: impl Into<PathBuf>, dest_dir: impl Into<String>) -> Self {
        push_unique(&mut self.datas, FilePair::new(source, dest_dir));
        self
    }

    /// Render as packager command-line arguments; the entry script comes last.
    pub fn to_args(&self, platform: &TargetPlatform) -> Vec<String> {
        let mut args = vec!["--noconfirm".to_string(), "--name".to_string(), self.name.clone()];
        if self.onefile {
            args.push("--onefile".to_string());
        }
        for module in &self.hidden_imports {
            args.push("--hidden-import".to_string());
            args.push(module.clone());
        }
        for pair in &self.binaries {
            args.push("--add-binary".to_string());
            args.push(pair.render(platform));
        }
        for pair in &self.datas {
            args.push("--add-data".to_string());
            args.push(pair.render(platform));
        }
        args.push(self.entry_script.display().to_string());
        args
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self).map_err(|e| Error::Json {
            path:   path.to_path_buf(),
            source: e,
        })?;
        solvpack_fs::atomic_write(path, &json)?;
        Ok(())
    }
}

fn push_unique(pairs: &mut Vec<FilePair>, pair: FilePair) {
    if !pairs.contains(&pair) {
        pairs.push(pair);
    }
}
