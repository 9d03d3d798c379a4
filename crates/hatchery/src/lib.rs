// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Hatchery - a catalog of synthetic datasets and the jobs that produce them.
//!
//! A single storage directory holds one Parquet file per dataset. The
//! [`Catalog`] decides file identity and enforces the overwrite policy, the
//! generator fills tables with standard-normal samples, and the
//! [`JobRunner`] can delegate generation to a disposable container that
//! writes into the same directory through a bind mount. The filesystem is
//! the only source of truth: nothing is cached between operations.

pub mod catalog;
pub mod config;
mod error;
pub mod generate;
pub mod jobs;
pub mod names;
pub mod parquet;
pub mod request;
mod service;

pub use catalog::{Catalog, DatasetEntry};
pub use config::Config;
pub use error::{Error, Result};
pub use jobs::{
    ContainerRuntime, DockerRuntime, ExecutionReport, JobFailure, JobOutcome, JobRunner,
    JobStatus, LaunchSpec,
};
pub use request::GenerationRequest;
pub use service::{Hatchery, IsolatedRun};
