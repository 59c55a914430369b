//! Artifact Writing and Drift Detection
//!
//! All artifacts are rendered in memory before any file is touched, so a
//! failed emission leaves the previous artifacts in place. Writing is
//! two-phase: every changed artifact is staged into a temporary file next to
//! its target, and targets are replaced only once all of them are staged.
//! Files whose checksum already matches are left alone.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use similar::TextDiff;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::checksum::Checksum;
use crate::config::OutputConfig;
use crate::emit::{emit, ArtifactKind, EmitOptions};
use crate::error::{Result, SchemaError};
use crate::schema::Schema;

/// One rendered artifact and its destination
#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub content: String,
}

impl Artifact {
    pub fn checksum(&self) -> Checksum {
        Checksum::from_content(&self.content)
    }
}

/// What happened to one artifact during a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// Result of writing an artifact set
#[derive(Debug, Clone, Default, Serialize)]
pub struct WriteReport {
    pub entries: Vec<(PathBuf, WriteOutcome)>,
}

impl WriteReport {
    pub fn written(&self) -> usize {
        self.count(WriteOutcome::Written)
    }

    pub fn unchanged(&self) -> usize {
        self.count(WriteOutcome::Unchanged)
    }

    fn count(&self, outcome: WriteOutcome) -> usize {
        self.entries.iter().filter(|(_, o)| *o == outcome).count()
    }
}

/// Difference between a rendered artifact and the file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    Missing { path: PathBuf },
    Changed { path: PathBuf, diff: String },
}

impl Drift {
    pub fn path(&self) -> &Path {
        match self {
            Drift::Missing { path } | Drift::Changed { path, .. } => path,
        }
    }
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Drift::Missing { path } => write!(f, "missing: {}", path.display()),
            Drift::Changed { path, diff } => write!(f, "changed: {}\n{}", path.display(), diff),
        }
    }
}

/// Rendered artifacts, ready to be written or compared
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    /// Render every configured artifact. Nothing is written here.
    pub fn render(schema: &Schema, output: &OutputConfig, options: &EmitOptions) -> Result<Self> {
        let artifacts = output
            .targets()
            .into_iter()
            .map(|(kind, path)| -> Result<Artifact> {
                Ok(Artifact {
                    kind,
                    path: path.to_path_buf(),
                    content: emit(kind, schema, options)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { artifacts })
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    /// Write every artifact, skipping files whose content is already current.
    ///
    /// A failure while staging leaves every target untouched.
    pub fn write(&self) -> Result<WriteReport> {
        let mut report = WriteReport::default();
        let mut staged = Vec::new();

        for artifact in &self.artifacts {
            if is_current(&artifact.path, &artifact.checksum()) {
                debug!(path = %artifact.path.display(), "artifact unchanged");
                report.entries.push((artifact.path.clone(), WriteOutcome::Unchanged));
            } else {
                staged.push((artifact, stage(&artifact.path, &artifact.content)?));
                report.entries.push((artifact.path.clone(), WriteOutcome::Written));
            }
        }

        for (artifact, file) in staged {
            file.persist(&artifact.path).map_err(|e| SchemaError::Io(e.error))?;
            info!(kind = %artifact.kind, path = %artifact.path.display(), "wrote artifact");
        }

        Ok(report)
    }

    /// Compare rendered artifacts against the files on disk
    pub fn check(&self) -> Result<Vec<Drift>> {
        let mut drifts = Vec::new();

        for artifact in &self.artifacts {
            if !artifact.path.exists() {
                drifts.push(Drift::Missing {
                    path: artifact.path.clone(),
                });
                continue;
            }

            let existing = fs::read_to_string(&artifact.path)?;
            if existing != artifact.content {
                let diff = TextDiff::from_lines(&existing, &artifact.content)
                    .unified_diff()
                    .context_radius(3)
                    .header("on disk", "rendered")
                    .to_string();
                drifts.push(Drift::Changed {
                    path: artifact.path.clone(),
                    diff,
                });
            }
        }

        Ok(drifts)
    }
}

fn is_current(path: &Path, checksum: &Checksum) -> bool {
    fs::read(path)
        .map(|existing| checksum.verify(&existing))
        .unwrap_or(false)
}

/// Write `content` to a temporary file in the target's directory
fn stage(path: &Path, content: &str) -> Result<NamedTempFile> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::SchemaAssembler;
    use crate::declaration::{FieldDeclaration, FieldType, TypeDeclaration};
    use crate::registry::TypeRegistry;
    use tempfile::tempdir;

    fn schema(extra_field: bool) -> Schema {
        let mut query = TypeDeclaration::object("Query")
            .field(FieldDeclaration::new("version", FieldType::named("String").required()));
        if extra_field {
            query = query.field(FieldDeclaration::new("uptime", FieldType::named("Int")));
        }
        let mut registry = TypeRegistry::new();
        registry.register(query.build()).unwrap();
        SchemaAssembler::new(&registry).assemble().unwrap()
    }

    fn output(dir: &Path) -> OutputConfig {
        OutputConfig {
            sdl_path: dir.join("out/schema.graphql"),
            descriptor_path: dir.join("out/schema.types.json"),
            typescript_path: Some(dir.join("out/ts/schema.d.ts")),
            ..OutputConfig::default()
        }
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempdir().unwrap();
        let set = ArtifactSet::render(&schema(false), &output(dir.path()), &EmitOptions::default()).unwrap();

        let report = set.write().unwrap();
        assert_eq!(report.written(), 3);

        let sdl = fs::read_to_string(dir.path().join("out/schema.graphql")).unwrap();
        assert_eq!(sdl, set.get(ArtifactKind::Sdl).unwrap().content);
        assert!(dir.path().join("out/ts/schema.d.ts").exists());
    }

    #[test]
    fn test_second_write_is_unchanged() {
        let dir = tempdir().unwrap();
        let set = ArtifactSet::render(&schema(false), &output(dir.path()), &EmitOptions::default()).unwrap();

        set.write().unwrap();
        let report = set.write().unwrap();
        assert_eq!(report.written(), 0);
        assert_eq!(report.unchanged(), 3);
    }

    #[test]
    fn test_check_reports_missing_and_changed() {
        let dir = tempdir().unwrap();
        let out = output(dir.path());
        let options = EmitOptions::default();

        let stale = ArtifactSet::render(&schema(false), &out, &options).unwrap();
        assert_eq!(stale.check().unwrap().len(), 3);
        stale.write().unwrap();
        assert!(stale.check().unwrap().is_empty());

        let fresh = ArtifactSet::render(&schema(true), &out, &options).unwrap();
        let drifts = fresh.check().unwrap();
        let sdl_drift = drifts
            .iter()
            .find(|d| d.path() == out.sdl_path)
            .unwrap();
        match sdl_drift {
            Drift::Changed { diff, .. } => assert!(diff.contains("+  uptime: Int")),
            other => panic!("Expected Changed, got {:?}", other),
        }
    }

    #[test]
    fn test_staging_failure_writes_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("blocker"), "not a directory").unwrap();
        let out = OutputConfig {
            sdl_path: dir.path().join("schema.graphql"),
            descriptor_path: dir.path().join("blocker/schema.types.json"),
            ..OutputConfig::default()
        };
        let set = ArtifactSet::render(&schema(false), &out, &EmitOptions::default()).unwrap();

        assert!(set.write().is_err());
        assert!(!out.sdl_path.exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }
}
