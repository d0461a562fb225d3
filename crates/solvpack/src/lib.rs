//! Solver binary discovery and bundling for packaged application builds.
//!
//! # Architecture
//!
//! - [`Locator`] - probe candidates in order, fall back to a recursive search
//! - [`bundle`] / [`verify`] - copy the artifact to every destination and check sizes
//! - [`normalize_timestamp`] - reset the mtime of auxiliary files
//! - [`PackagingSpec`] - declarative packager input
//! - [`ReleaseManifest`] - asset list handed to the CI release step
//! - [`Pipeline`] - the whole run, driven by [`Config`]
//!
//! Nothing is cached between runs. The located [`BinaryArtifact`] is passed by
//! value from step to step.

mod artifact;
mod bundle;
mod config;
mod error;
mod locate;
mod packaging;
mod pipeline;
mod release;
mod timestamp;

pub use artifact::{ArtifactSummary, BinaryArtifact, FsProbe, Probe};
pub use bundle::{BundleReport, BundledCopy, Destination, DestinationSet, bundle, verify};
pub use config::{
    AuxiliaryConfig, BundleConfig, Config, DEFAULT_CONFIG_FILE, DownloadConfig, ENV_PREFIX,
    PackagingConfig, ReleaseConfig, SolverConfig,
};
pub use error::{Error, Result};
pub use locate::{Locator, locate};
pub use packaging::{FilePair, PackagingSpec};
pub use pipeline::{DownloadSummary, Pipeline, PipelineReport, locate_from_config};
pub use release::{ReleaseAsset, ReleaseManifest, content_type_for, package_zip};
pub use timestamp::{TimestampOutcome, normalize_timestamp, normalize_timestamp_at};
