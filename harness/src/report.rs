//! In-memory run report bundle.
//!
//! A bundle is a set of named artifacts plus two derived documents:
//!
//! - the **manifest**, listing every artifact with its content hash and
//!   normative flag;
//! - the **digest basis**, listing normative artifacts only.
//!
//! The bundle digest is the domain-separated hash of the digest basis, so
//! observational artifacts can change without changing the digest. All JSON
//! here goes through the kernel's canonical encoder. No file I/O in this
//! module; see [`crate::report_dir`] for persistence.

use std::collections::BTreeMap;

use thiserror::Error;
use waymark_kernel::proof::canon::{canonical_json_bytes, CanonError};
use waymark_kernel::proof::hash::{canonical_hash, ContentHash};
use waymark_kernel::proof::hash_domain::HashDomain;

pub const DOMAIN_REPORT_ARTIFACT: HashDomain = HashDomain::ReportArtifact;
pub const DOMAIN_REPORT_DIGEST: HashDomain = HashDomain::ReportDigest;

pub const MANIFEST_SCHEMA: &str = "report_manifest.v1";
pub const DIGEST_BASIS_SCHEMA: &str = "report_digest_basis.v1";

pub const SEARCH_GRAPH_ARTIFACT: &str = "search_graph.json";
pub const RESULT_ARTIFACT: &str = "result.json";
pub const SEARCH_POLICY_ARTIFACT: &str = "search_policy.json";

/// A single artifact in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    /// Logical filename, e.g. `"result.json"`.
    pub name: String,
    pub content: Vec<u8>,
    /// `canonical_hash(DOMAIN_REPORT_ARTIFACT, content)`.
    pub content_hash: ContentHash,
    /// Whether this artifact participates in the bundle digest.
    pub normative: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBundle {
    /// Artifacts by name, sorted.
    pub artifacts: BTreeMap<String, ReportArtifact>,
    pub manifest: Vec<u8>,
    pub digest_basis: Vec<u8>,
    /// `canonical_hash(DOMAIN_REPORT_DIGEST, digest_basis)`.
    pub digest: ContentHash,
}

impl ReportBundle {
    #[must_use]
    pub fn artifact(&self, name: &str) -> Option<&ReportArtifact> {
        self.artifacts.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportBuildError {
    #[error("canonical JSON error: {0}")]
    Canon(#[from] CanonError),
    #[error("duplicate artifact name: {name}")]
    DuplicateArtifact { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportVerifyError {
    #[error("content hash mismatch for {artifact}: stored {expected}, recomputed {actual}")]
    ContentHashMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },
    #[error("manifest does not match artifacts")]
    ManifestMismatch,
    #[error("digest basis does not match normative artifacts")]
    DigestBasisMismatch,
    #[error("digest mismatch: stored {expected}, recomputed {actual}")]
    DigestMismatch { expected: String, actual: String },
    #[error("normative artifact {artifact} is not canonical JSON")]
    ArtifactNotCanonical { artifact: String },
    #[error("{artifact} is not valid JSON: {detail}")]
    ArtifactParse { artifact: String, detail: String },
    #[error("{artifact} is missing field {field}")]
    FieldMissing { artifact: String, field: String },
    #[error("result.json declares {field} but {artifact} is missing")]
    MissingArtifact { artifact: String, field: String },
    #[error("result.json sets {field} to null but {artifact} is present")]
    UndeclaredArtifact { artifact: String, field: String },
    #[error("{field} in result.json is {declared}, artifact hashes to {recomputed}")]
    BindingMismatch {
        field: String,
        declared: String,
        recomputed: String,
    },
    #[error("canonical JSON error: {0}")]
    Canon(#[from] CanonError),
}

/// Assemble a bundle from `(name, content, normative)` triples.
///
/// # Errors
///
/// - [`ReportBuildError::DuplicateArtifact`] if two inputs share a name
/// - [`ReportBuildError::Canon`] if manifest serialization fails
pub fn build_report_bundle(
    inputs: Vec<(String, Vec<u8>, bool)>,
) -> Result<ReportBundle, ReportBuildError> {
    let mut artifacts = BTreeMap::new();
    for (name, content, normative) in inputs {
        if artifacts.contains_key(&name) {
            return Err(ReportBuildError::DuplicateArtifact { name });
        }
        let content_hash = canonical_hash(DOMAIN_REPORT_ARTIFACT, &content);
        artifacts.insert(
            name.clone(),
            ReportArtifact {
                name,
                content,
                content_hash,
                normative,
            },
        );
    }

    let manifest = manifest_bytes(&artifacts)?;
    let digest_basis = digest_basis_bytes(&artifacts)?;
    let digest = canonical_hash(DOMAIN_REPORT_DIGEST, &digest_basis);

    Ok(ReportBundle {
        artifacts,
        manifest,
        digest_basis,
        digest,
    })
}

/// Recompute every derived field of `bundle` and check the cross-artifact
/// bindings declared in `result.json`.
///
/// # Errors
///
/// The first [`ReportVerifyError`] found.
pub fn verify_report_bundle(bundle: &ReportBundle) -> Result<(), ReportVerifyError> {
    for artifact in bundle.artifacts.values() {
        let recomputed = canonical_hash(DOMAIN_REPORT_ARTIFACT, &artifact.content);
        if recomputed != artifact.content_hash {
            return Err(ReportVerifyError::ContentHashMismatch {
                artifact: artifact.name.clone(),
                expected: artifact.content_hash.as_str().to_string(),
                actual: recomputed.as_str().to_string(),
            });
        }
    }

    if manifest_bytes(&bundle.artifacts)? != bundle.manifest {
        return Err(ReportVerifyError::ManifestMismatch);
    }
    if digest_basis_bytes(&bundle.artifacts)? != bundle.digest_basis {
        return Err(ReportVerifyError::DigestBasisMismatch);
    }
    let recomputed = canonical_hash(DOMAIN_REPORT_DIGEST, &bundle.digest_basis);
    if recomputed != bundle.digest {
        return Err(ReportVerifyError::DigestMismatch {
            expected: bundle.digest.as_str().to_string(),
            actual: recomputed.as_str().to_string(),
        });
    }

    for artifact in bundle.artifacts.values() {
        let is_json = std::path::Path::new(&artifact.name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if artifact.normative && is_json && !is_canonical_json(&artifact.content) {
            return Err(ReportVerifyError::ArtifactNotCanonical {
                artifact: artifact.name.clone(),
            });
        }
    }

    let Some(result) = bundle.artifacts.get(RESULT_ARTIFACT) else {
        return Ok(());
    };
    let result: serde_json::Value =
        serde_json::from_slice(&result.content).map_err(|e| ReportVerifyError::ArtifactParse {
            artifact: RESULT_ARTIFACT.to_string(),
            detail: e.to_string(),
        })?;

    verify_binding(
        bundle,
        &result,
        SEARCH_POLICY_ARTIFACT,
        "search_policy_digest",
        HashDomain::SearchPolicy,
        false,
    )?;
    verify_binding(
        bundle,
        &result,
        SEARCH_GRAPH_ARTIFACT,
        "search_graph_digest",
        HashDomain::SearchGraph,
        true,
    )?;
    Ok(())
}

/// `result[field]` must equal the `domain` hash of `artifact`'s bytes.
///
/// When `nullable`, a `null` field means the artifact was not produced and
/// must be absent. Otherwise the field is a digest string and the artifact
/// must be present.
fn verify_binding(
    bundle: &ReportBundle,
    result: &serde_json::Value,
    artifact: &str,
    field: &str,
    domain: HashDomain,
    nullable: bool,
) -> Result<(), ReportVerifyError> {
    let declared = match result.get(field) {
        Some(serde_json::Value::String(declared)) => declared,
        Some(serde_json::Value::Null) if nullable => {
            if bundle.artifacts.contains_key(artifact) {
                return Err(ReportVerifyError::UndeclaredArtifact {
                    artifact: artifact.to_string(),
                    field: field.to_string(),
                });
            }
            return Ok(());
        }
        _ => {
            return Err(ReportVerifyError::FieldMissing {
                artifact: RESULT_ARTIFACT.to_string(),
                field: field.to_string(),
            })
        }
    };

    let target = bundle
        .artifacts
        .get(artifact)
        .ok_or_else(|| ReportVerifyError::MissingArtifact {
            artifact: artifact.to_string(),
            field: field.to_string(),
        })?;

    let recomputed = canonical_hash(domain, &target.content);
    if recomputed.as_str() != declared {
        return Err(ReportVerifyError::BindingMismatch {
            field: field.to_string(),
            declared: declared.clone(),
            recomputed: recomputed.as_str().to_string(),
        });
    }
    Ok(())
}

fn manifest_bytes(artifacts: &BTreeMap<String, ReportArtifact>) -> Result<Vec<u8>, CanonError> {
    let entries: Vec<serde_json::Value> = artifacts
        .values()
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
                "normative": a.normative,
            })
        })
        .collect();
    canonical_json_bytes(&serde_json::json!({
        "artifacts": entries,
        "schema_version": MANIFEST_SCHEMA,
    }))
}

fn digest_basis_bytes(artifacts: &BTreeMap<String, ReportArtifact>) -> Result<Vec<u8>, CanonError> {
    let entries: Vec<serde_json::Value> = artifacts
        .values()
        .filter(|a| a.normative)
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
            })
        })
        .collect();
    canonical_json_bytes(&serde_json::json!({
        "artifacts": entries,
        "schema_version": DIGEST_BASIS_SCHEMA,
    }))
}

/// Whether `bytes` parse as JSON and re-encode to exactly themselves.
pub(crate) fn is_canonical_json(bytes: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|value| canonical_json_bytes(&value).ok())
        .is_some_and(|canonical| canonical == bytes)
}
