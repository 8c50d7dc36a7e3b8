//! In-memory stand-ins for the installer seams.

use crate::arch::ArchProvider;
use crate::download::ReleaseSource;
use crate::install::executable::Installer;
use crate::install::probe::{InstalledTool, VersionProbe};
use crate::install::process::ProcessControl;
use crate::models::{RepoId, ToolDefinition, ToolSpec};
use crate::version::Version;
use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

#[derive(Default)]
struct State {
    latest: HashMap<String, String>,
    artifacts: HashMap<String, Vec<u8>>,
    installed: HashMap<String, (PathBuf, Option<String>)>,
    arch: String,
    downloads: Vec<String>,
    latest_lookups: Vec<String>,
    terminated: Vec<String>,
}

/// Temp directory layout: `bin/` install path, `opt/` pre-existing installs,
/// `work/` scratch workspaces.
pub struct Harness {
    root: TempDir,
    state: Rc<RefCell<State>>,
}

impl Harness {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        for dir in ["bin", "opt", "work"] {
            fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        let state = State {
            arch: "x86_64".to_string(),
            ..Default::default()
        };
        Self {
            root,
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn latest(self, repo: &str, tag: &str) -> Self {
        self.state
            .borrow_mut()
            .latest
            .insert(repo.to_string(), tag.to_string());
        self
    }

    pub fn artifact(self, url: &str, body: Vec<u8>) -> Self {
        self.state
            .borrow_mut()
            .artifacts
            .insert(url.to_string(), body);
        self
    }

    /// Put a copy of `app` under `opt/` reporting `version`
    pub fn installed(self, app: &str, version: Option<&str>) -> Self {
        let path = self.installed_path(app);
        fs::write(&path, "old binary").unwrap();
        self.state.borrow_mut().installed.insert(
            app.to_string(),
            (path, version.map(str::to_string)),
        );
        self
    }

    pub fn arch(self, arch: &str) -> Self {
        self.state.borrow_mut().arch = arch.to_string();
        self
    }

    pub fn installed_path(&self, app: &str) -> PathBuf {
        self.root.path().join("opt").join(app)
    }

    pub fn install_dir(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    /// Tool `name` from repository `acme/{name}`
    pub fn tool(
        &self,
        name: &str,
        archive_pattern: &str,
        binary_path_pattern: &str,
    ) -> ToolDefinition {
        ToolDefinition::from_spec(
            name,
            ToolSpec {
                description: format!("{name} test tool"),
                application_name: name.to_string(),
                repository: format!("acme/{name}"),
                archive_pattern: archive_pattern.to_string(),
                binary_path_pattern: binary_path_pattern.to_string(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    pub fn installer(&self) -> Installer {
        Installer::new(
            Box::new(FakeReleases(Rc::clone(&self.state))),
            Box::new(FakeProbe(Rc::clone(&self.state))),
            Box::new(FakeProcesses(Rc::clone(&self.state))),
            Box::new(FakeArch(Rc::clone(&self.state))),
            self.install_dir(),
        )
        .with_workspace_base(self.root.path().join("work"))
    }

    pub fn downloads(&self) -> Vec<String> {
        self.state.borrow().downloads.clone()
    }

    pub fn latest_lookups(&self) -> Vec<String> {
        self.state.borrow().latest_lookups.clone()
    }

    pub fn terminated(&self) -> Vec<String> {
        self.state.borrow().terminated.clone()
    }

    pub fn leftover_workspaces(&self) -> usize {
        fs::read_dir(self.root.path().join("work")).unwrap().count()
    }
}

struct FakeReleases(Rc<RefCell<State>>);

impl ReleaseSource for FakeReleases {
    fn latest_version(&self, repo: &RepoId) -> Result<Version> {
        let mut state = self.0.borrow_mut();
        state.latest_lookups.push(repo.to_string());
        state
            .latest
            .get(&repo.to_string())
            .map(|tag| Version::new(tag))
            .ok_or_else(|| anyhow::anyhow!("GitHub API request failed with status: 404"))
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let mut state = self.0.borrow_mut();
        state.downloads.push(url.to_string());
        let body = state
            .artifacts
            .get(url)
            .ok_or_else(|| anyhow::anyhow!("Download failed with status: 404"))?;
        fs::write(dest, body)?;
        Ok(())
    }
}

struct FakeProbe(Rc<RefCell<State>>);

impl VersionProbe for FakeProbe {
    fn probe(&self, def: &ToolDefinition) -> Option<InstalledTool> {
        let state = self.0.borrow();
        let (path, version) = state.installed.get(&def.application_name)?;
        path.exists().then(|| InstalledTool {
            path: path.clone(),
            version: version.as_deref().map(Version::new),
        })
    }
}

struct FakeProcesses(Rc<RefCell<State>>);

impl ProcessControl for FakeProcesses {
    fn terminate(&self, application_name: &str) {
        self.0
            .borrow_mut()
            .terminated
            .push(application_name.to_string());
    }
}

struct FakeArch(Rc<RefCell<State>>);

impl ArchProvider for FakeArch {
    fn host_arch(&self) -> Result<String> {
        Ok(self.0.borrow().arch.clone())
    }
}

/// Build a `.tar.gz` holding executable files
pub fn tar_gz(files: &[(&str, &str)]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, body) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, name, body.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Build a `.zip` holding executable files
pub fn zip_archive(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, body) in files {
        writer
            .start_file(
                *name,
                zip::write::FileOptions::default().unix_permissions(0o755),
            )
            .unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
