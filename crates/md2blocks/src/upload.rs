//! Upload walk over rendered block descriptors
//!
//! [`Uploader`] replays a descriptor tree against a [`BlockSink`], the client
//! of a block-based document store. The walk is depth-first and keeps
//! document order. Failures are collected per item in an [`UploadReport`];
//! one failed block never stops its siblings.
//!
//! Local image sources are read from disk relative to the Markdown document
//! (or through a custom resolver) and uploaded as file bytes. Sources with a
//! URL scheme stay remote references and are never fetched.

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::block::{Block, BlockKind, Schema};

/// Client side of a block store
///
/// Implementations perform the remote calls; errors are reported with
/// `anyhow` and recorded by the walk.
pub trait BlockSink {
    /// Reference to a created block, used as the parent of its children
    type Handle;

    /// Create a block of `kind` under `parent` with the given creation fields
    fn create_block(
        &mut self,
        parent: &Self::Handle,
        kind: BlockKind,
        fields: &Map<String, Value>,
    ) -> anyhow::Result<Self::Handle>;

    /// Attach file bytes to an image block
    fn upload_file(
        &mut self,
        block: &Self::Handle,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<()>;

    /// Back a table block with a collection of the given schema
    fn create_collection(&mut self, block: &Self::Handle, schema: &Schema) -> anyhow::Result<()>;

    /// Add one row, keyed by schema column key
    fn add_row(
        &mut self,
        block: &Self::Handle,
        values: &IndexMap<String, String>,
    ) -> anyhow::Result<()>;
}

/// Where an image descriptor's `source` points
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// External URL, left as a reference
    Remote(String),
    /// Path relative to the Markdown document
    Local(PathBuf),
}

impl ImageSource {
    pub fn classify(source: &str) -> Self {
        if source.contains("://") {
            ImageSource::Remote(source.to_string())
        } else {
            ImageSource::Local(PathBuf::from(source))
        }
    }
}

/// Maps an image source and the document path to a file on disk
pub type ImagePathResolver = dyn Fn(&Path, &Path) -> PathBuf + Send + Sync;

/// Errors of a single upload step
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to create {kind} block")]
    Create {
        kind: BlockKind,
        #[source]
        source: anyhow::Error,
    },

    #[error("local image '{}' not found", path.display())]
    ImageNotFound { path: PathBuf },

    #[error("failed to read image '{}'", path.display())]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to upload image '{}'", path.display())]
    UploadImage {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to create table collection")]
    Collection(#[source] anyhow::Error),

    #[error("failed to add table row {row}")]
    Row {
        row: usize,
        #[source]
        source: anyhow::Error,
    },
}

/// Position of a descriptor in the rendered tree (child indices from the top)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockPath(pub Vec<usize>);

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

/// One failed step of the walk
#[derive(Debug)]
pub struct UploadFailure {
    pub path: BlockPath,
    pub kind: BlockKind,
    pub error: UploadError,
}

impl fmt::Display for UploadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (block {}, {})", self.error, self.path, self.kind)
    }
}

/// Outcome of an upload walk
#[derive(Debug, Default)]
pub struct UploadReport {
    /// Blocks created in the store
    pub created: usize,
    /// Local images whose bytes were uploaded
    pub files_uploaded: usize,
    /// Images left as remote references
    pub remote_images: usize,
    /// Table rows added
    pub rows_added: usize,
    pub failures: Vec<UploadFailure>,
}

impl UploadReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, path: &[usize], kind: BlockKind, error: UploadError) {
        let failure = UploadFailure {
            path: BlockPath(path.to_vec()),
            kind,
            error,
        };
        tracing::warn!(block = %failure.path, kind = %kind, "{}", error_chain(&failure.error));
        self.failures.push(failure);
    }
}

/// An error and its sources, joined with `: `
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Replays block descriptors against a [`BlockSink`]
pub struct Uploader {
    document: PathBuf,
    resolver: Option<Box<ImagePathResolver>>,
}

impl fmt::Debug for Uploader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uploader")
            .field("document", &self.document)
            .field("resolver", &self.resolver.is_some())
            .finish()
    }
}

impl Uploader {
    /// Uploader for blocks rendered from the Markdown file at `document`
    pub fn new(document: impl Into<PathBuf>) -> Self {
        Self {
            document: document.into(),
            resolver: None,
        }
    }

    /// Resolve local image sources with `resolver` instead of relative to
    /// the document's directory
    pub fn with_resolver(
        mut self,
        resolver: impl Fn(&Path, &Path) -> PathBuf + Send + Sync + 'static,
    ) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    pub fn document(&self) -> &Path {
        &self.document
    }

    /// File on disk for a local image source
    pub fn local_image_path(&self, relative: &Path) -> PathBuf {
        match &self.resolver {
            Some(resolver) => resolver(relative, &self.document),
            None => self
                .document
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(relative),
        }
    }

    /// Create `blocks` under `parent`, depth-first and in order
    pub fn upload<S: BlockSink>(
        &self,
        sink: &mut S,
        parent: &S::Handle,
        blocks: &[Block],
    ) -> UploadReport {
        let mut report = UploadReport::default();
        let mut path = Vec::new();
        let total = blocks.len();

        for (index, block) in blocks.iter().enumerate() {
            tracing::info!(
                "Uploading {}, {}/{} ({:.1}%)",
                block.kind(),
                index + 1,
                total,
                (index + 1) as f64 / total as f64 * 100.0
            );
            path.push(index);
            self.upload_block(sink, parent, block, &mut path, &mut report);
            path.pop();
        }

        tracing::info!(
            created = report.created,
            files = report.files_uploaded,
            failures = report.failures.len(),
            "Upload finished"
        );
        report
    }

    fn upload_block<S: BlockSink>(
        &self,
        sink: &mut S,
        parent: &S::Handle,
        block: &Block,
        path: &mut Vec<usize>,
        report: &mut UploadReport,
    ) {
        let kind = block.kind();
        let handle = match sink.create_block(parent, kind, &block.fields()) {
            Ok(handle) => handle,
            Err(source) => {
                // Nothing to attach the subtree to
                report.fail(path, kind, UploadError::Create { kind, source });
                return;
            }
        };
        report.created += 1;

        match block {
            Block::Image { source, .. } => self.upload_image(sink, &handle, source, path, report),
            Block::Table { schema, rows } => fill_table(sink, &handle, schema, rows, path, report),
            _ => {}
        }

        for (index, child) in block.children().iter().enumerate() {
            path.push(index);
            self.upload_block(sink, &handle, child, path, report);
            path.pop();
        }
    }

    fn upload_image<S: BlockSink>(
        &self,
        sink: &mut S,
        handle: &S::Handle,
        source: &str,
        path: &[usize],
        report: &mut UploadReport,
    ) {
        let file = match ImageSource::classify(source) {
            ImageSource::Remote(url) => {
                tracing::debug!(url = %url, "Keeping remote image reference");
                report.remote_images += 1;
                return;
            }
            ImageSource::Local(relative) => self.local_image_path(&relative),
        };
        if !file.exists() {
            report.fail(path, BlockKind::Image, UploadError::ImageNotFound { path: file });
            return;
        }

        let bytes = match std::fs::read(&file) {
            Ok(bytes) => bytes,
            Err(source) => {
                report.fail(
                    path,
                    BlockKind::Image,
                    UploadError::ReadImage { path: file, source },
                );
                return;
            }
        };

        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.to_string());
        tracing::info!(file = %file.display(), "Uploading file");

        match sink.upload_file(handle, &file_name, bytes) {
            Ok(()) => report.files_uploaded += 1,
            Err(source) => report.fail(
                path,
                BlockKind::Image,
                UploadError::UploadImage { path: file, source },
            ),
        }
    }
}

/// Create the table's collection and add every row, zipped positionally
/// against the schema keys
fn fill_table<S: BlockSink>(
    sink: &mut S,
    handle: &S::Handle,
    schema: &Schema,
    rows: &[Vec<String>],
    path: &[usize],
    report: &mut UploadReport,
) {
    if let Err(source) = sink.create_collection(handle, schema) {
        report.fail(path, BlockKind::Table, UploadError::Collection(source));
        return;
    }

    for (row_index, row) in rows.iter().enumerate() {
        let values: IndexMap<String, String> = schema
            .keys()
            .zip(row.iter())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        match sink.add_row(handle, &values) {
            Ok(()) => report.rows_added += 1,
            Err(source) => report.fail(
                path,
                BlockKind::Table,
                UploadError::Row {
                    row: row_index,
                    source,
                },
            ),
        }
    }
}
