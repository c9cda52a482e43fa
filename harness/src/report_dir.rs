//! Report directory persistence.
//!
//! ```text
//! <dir>/
//!   report_manifest.json       canonical JSON, every artifact
//!   report_digest_basis.json   canonical JSON, normative artifacts only
//!   report_digest.txt          "sha256:<hex>"
//!   search_policy.json         artifact files, one per manifest entry
//!   result.json
//!   search_graph.json
//! ```
//!
//! The manifest is the source of truth for which files belong. Reading fails
//! closed: a missing metadata or artifact file, an undeclared extra entry, a
//! name that is not UTF-8, a content hash that disagrees with the manifest,
//! or a stored digest that disagrees with the digest basis is an error. The
//! only tolerated leftovers are `.tmp_<name>` files from an interrupted write
//! of a declared file.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use thiserror::Error;
use tracing::debug;
use waymark_kernel::proof::hash::{canonical_hash, ContentHash};

use crate::report::{
    verify_report_bundle, ReportArtifact, ReportBundle, ReportVerifyError, DOMAIN_REPORT_ARTIFACT,
    DOMAIN_REPORT_DIGEST, MANIFEST_SCHEMA,
};

const MANIFEST_FILENAME: &str = "report_manifest.json";
const DIGEST_BASIS_FILENAME: &str = "report_digest_basis.json";
const DIGEST_FILENAME: &str = "report_digest.txt";

const METADATA_FILENAMES: &[&str] = &[MANIFEST_FILENAME, DIGEST_BASIS_FILENAME, DIGEST_FILENAME];

/// Prefix of in-flight files written by [`write_report_dir`].
const TEMP_PREFIX: &str = ".tmp_";

#[derive(Debug, Error)]
pub enum ReportDirError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("missing metadata file: {filename}")]
    MissingMetadata { filename: String },
    #[error("missing artifact: {name}")]
    MissingArtifact { name: String },
    #[error("undeclared extra file: {name}")]
    ExtraFile { name: String },
    #[error("file name is not UTF-8: {name}")]
    NonUtf8FileName { name: String },
    #[error("artifact name is not a plain filename: {name}")]
    InvalidArtifactName { name: String },
    #[error("manifest parse error: {detail}")]
    ManifestParse { detail: String },
    #[error("manifest schema mismatch: {found}")]
    ManifestVersionMismatch { found: String },
    #[error("manifest entry invalid: {detail}")]
    ManifestEntryInvalid { detail: String },
    #[error("content hash mismatch for {name}: manifest {declared}, file {recomputed}")]
    ContentHashMismatch {
        name: String,
        declared: String,
        recomputed: String,
    },
    #[error("digest mismatch: stored {stored}, recomputed {recomputed}")]
    DigestMismatch { stored: String, recomputed: String },
    #[error("bundle verification failed: {0}")]
    Verify(#[from] ReportVerifyError),
}

/// Write `bundle` into `dir`, creating it if needed.
///
/// # Errors
///
/// - [`ReportDirError::InvalidArtifactName`] if an artifact name would escape
///   `dir` or collide with a metadata file
/// - [`ReportDirError::Io`] on any write failure
pub fn write_report_dir(bundle: &ReportBundle, dir: &Path) -> Result<(), ReportDirError> {
    std::fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;

    for artifact in bundle.artifacts.values() {
        check_artifact_name(&artifact.name)?;
        write_atomic(&dir.join(&artifact.name), &artifact.content)?;
    }
    write_atomic(&dir.join(MANIFEST_FILENAME), &bundle.manifest)?;
    write_atomic(&dir.join(DIGEST_BASIS_FILENAME), &bundle.digest_basis)?;
    write_atomic(&dir.join(DIGEST_FILENAME), bundle.digest.as_str().as_bytes())?;

    debug!(dir = %dir.display(), artifacts = bundle.artifacts.len(), "report directory written");
    Ok(())
}

/// Load a report directory written by [`write_report_dir`].
///
/// # Errors
///
/// Any [`ReportDirError`] except `Verify`; see the module docs.
pub fn read_report_dir(dir: &Path) -> Result<ReportBundle, ReportDirError> {
    let manifest = read_required(dir, MANIFEST_FILENAME)?;
    let digest_basis = read_required(dir, DIGEST_BASIS_FILENAME)?;
    let stored_digest = read_required(dir, DIGEST_FILENAME)?;

    let manifest_value: serde_json::Value =
        serde_json::from_slice(&manifest).map_err(|e| ReportDirError::ManifestParse {
            detail: e.to_string(),
        })?;
    let schema = manifest_value["schema_version"].as_str().unwrap_or_default();
    if schema != MANIFEST_SCHEMA {
        return Err(ReportDirError::ManifestVersionMismatch {
            found: schema.to_string(),
        });
    }
    let entries = manifest_value["artifacts"]
        .as_array()
        .ok_or_else(|| ReportDirError::ManifestParse {
            detail: "\"artifacts\" is not an array".into(),
        })?;

    let mut artifacts = BTreeMap::new();
    for entry in entries {
        let artifact = read_artifact(dir, entry)?;
        artifacts.insert(artifact.name.clone(), artifact);
    }

    let declared =
        |name: &str| artifacts.contains_key(name) || METADATA_FILENAMES.contains(&name);
    for name in list_entries(dir)? {
        let interrupted_write = name.strip_prefix(TEMP_PREFIX).is_some_and(declared);
        if !declared(&name) && !interrupted_write {
            return Err(ReportDirError::ExtraFile { name });
        }
    }

    let digest = canonical_hash(DOMAIN_REPORT_DIGEST, &digest_basis);
    let stored = String::from_utf8_lossy(&stored_digest).trim().to_string();
    if digest.as_str() != stored {
        return Err(ReportDirError::DigestMismatch {
            stored,
            recomputed: digest.as_str().to_string(),
        });
    }

    Ok(ReportBundle {
        artifacts,
        manifest,
        digest_basis,
        digest,
    })
}

/// [`read_report_dir`], then the full in-memory integrity check.
///
/// # Errors
///
/// Any [`ReportDirError`]; integrity failures surface as
/// [`ReportDirError::Verify`].
pub fn verify_report_dir(dir: &Path) -> Result<ReportBundle, ReportDirError> {
    let bundle = read_report_dir(dir)?;
    verify_report_bundle(&bundle)?;
    Ok(bundle)
}

fn read_artifact(dir: &Path, entry: &serde_json::Value) -> Result<ReportArtifact, ReportDirError> {
    let name = entry["name"]
        .as_str()
        .ok_or_else(|| ReportDirError::ManifestEntryInvalid {
            detail: "missing \"name\"".into(),
        })?
        .to_string();
    check_artifact_name(&name)?;

    let declared = entry["content_hash"]
        .as_str()
        .and_then(ContentHash::parse)
        .ok_or_else(|| ReportDirError::ManifestEntryInvalid {
            detail: format!("missing or malformed \"content_hash\" for {name}"),
        })?;
    let normative =
        entry["normative"]
            .as_bool()
            .ok_or_else(|| ReportDirError::ManifestEntryInvalid {
                detail: format!("missing \"normative\" for {name}"),
            })?;

    let content = std::fs::read(dir.join(&name))
        .map_err(|_| ReportDirError::MissingArtifact { name: name.clone() })?;
    let recomputed = canonical_hash(DOMAIN_REPORT_ARTIFACT, &content);
    if recomputed != declared {
        return Err(ReportDirError::ContentHashMismatch {
            name,
            declared: declared.as_str().to_string(),
            recomputed: recomputed.as_str().to_string(),
        });
    }

    Ok(ReportArtifact {
        name,
        content,
        content_hash: recomputed,
        normative,
    })
}

/// Artifact names must be plain filenames that cannot shadow metadata.
fn check_artifact_name(name: &str) -> Result<(), ReportDirError> {
    let plain = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !METADATA_FILENAMES.contains(&name);
    if plain {
        Ok(())
    } else {
        Err(ReportDirError::InvalidArtifactName {
            name: name.to_string(),
        })
    }
}

/// Write via a sibling temp file and rename.
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ReportDirError> {
    let (Some(dir), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Err(io_error(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent or file name"),
        ));
    };
    let temp = dir.join(format!("{TEMP_PREFIX}{}", file_name.to_string_lossy()));
    std::fs::write(&temp, content).map_err(|source| io_error(&temp, source))?;
    std::fs::rename(&temp, path).map_err(|source| io_error(path, source))
}

fn read_required(dir: &Path, filename: &str) -> Result<Vec<u8>, ReportDirError> {
    std::fs::read(dir.join(filename)).map_err(|_| ReportDirError::MissingMetadata {
        filename: filename.to_string(),
    })
}

/// Names of every entry in `dir`, subdirectories included.
fn list_entries(dir: &Path) -> Result<BTreeSet<String>, ReportDirError> {
    let mut names = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(|source| io_error(dir, source))? {
        let entry = entry.map_err(|source| io_error(dir, source))?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            return Err(ReportDirError::NonUtf8FileName {
                name: file_name.to_string_lossy().into_owned(),
            });
        };
        names.insert(name.to_string());
    }
    Ok(names)
}

fn io_error(path: &Path, source: std::io::Error) -> ReportDirError {
    ReportDirError::Io {
        path: path.display().to_string(),
        source,
    }
}
