// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The front door: one façade tying catalog, generator, and job runner
//! together so callers never sequence those pieces by hand.

use std::sync::Arc;

use arrow_array::RecordBatch;

use crate::catalog::{Catalog, DatasetEntry};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::generate;
use crate::jobs::{ContainerRuntime, JobRunner};
use crate::names;
use crate::parquet;
use crate::request::GenerationRequest;

/// A confirmed isolated run: the catalog entry for the new dataset plus
/// whatever the container printed.
#[derive(Debug, Clone)]
pub struct IsolatedRun {
    pub entry: DatasetEntry,
    pub logs: String,
}

/// Facade over one storage root.
pub struct Hatchery {
    config: Config,
    catalog: Catalog,
    runner: JobRunner,
}

impl Hatchery {
    /// Open the storage root described by `config`, using the Docker
    /// runtime for isolated runs. The root is created lazily on first use.
    pub fn open(config: Config) -> Self {
        let catalog = Catalog::new(&config.storage_root);
        let runner = JobRunner::new(config.clone());
        Hatchery {
            config,
            catalog,
            runner,
        }
    }

    /// Like [`Hatchery::open`] but with a caller-supplied runtime.
    pub fn with_runtime(config: Config, runtime: Arc<dyn ContainerRuntime>) -> Self {
        let catalog = Catalog::new(&config.storage_root);
        let runner = JobRunner::with_runtime(config.clone(), runtime);
        Hatchery {
            config,
            catalog,
            runner,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generate a dataset in-process and register it in the storage root.
    ///
    /// The name is fixed before any data is produced; the availability
    /// check is advisory and a concurrent writer of the same name wins by
    /// being last.
    pub fn generate(&self, request: &GenerationRequest) -> Result<DatasetEntry> {
        request.validate()?;

        let qualified = names::resolve_name(request.requested_name())?;
        self.catalog.check_available(&qualified, request.overwrite)?;
        self.catalog.ensure_root()?;

        let batch = generate::generate_table(request)?;
        let path = self.catalog.path_of(&qualified);
        parquet::write_table(&path, &batch)?;

        diagnostics::log_info!(
            "generated {name}: {rows} rows x {cols} cols",
            name: qualified.as_str(),
            rows: request.rows,
            cols: request.cols
        );

        self.catalog.stat(&qualified)
    }

    /// Generate a dataset in a disposable container and confirm the file
    /// landed in the storage root.
    ///
    /// The output name is resolved here, before the container starts, and
    /// passed down explicitly. Container logs surface in the result either
    /// way: inside [`Error::Execution`] on failure, in [`IsolatedRun`] on
    /// success.
    pub async fn generate_isolated(&self, request: &GenerationRequest) -> Result<IsolatedRun> {
        request.validate()?;

        let qualified = names::resolve_name(request.requested_name())?;
        self.catalog.check_available(&qualified, request.overwrite)?;
        self.catalog.ensure_root()?;

        let base = names::base_name(&qualified).to_string();
        let outcome = self.runner.run(request, Some(&base)).await?;

        if !outcome.succeeded() {
            let exit_code = outcome.failure.as_ref().map(|f| f.exit_code).unwrap_or(-1);
            return Err(Error::Execution {
                exit_code,
                logs: outcome.logs,
            });
        }

        let logs = outcome.logs;
        let entry = match self.catalog.stat(&qualified) {
            Ok(entry) => entry,
            Err(Error::NotFound(_)) => {
                return Err(Error::Execution {
                    exit_code: 0,
                    logs: format!(
                        "job reported success but {} is missing from storage; output: {}",
                        qualified, logs
                    ),
                });
            }
            Err(err) => return Err(err),
        };

        diagnostics::log_info!("confirmed {name} from isolated run", name: entry.name.as_str());

        Ok(IsolatedRun { entry, logs })
    }

    /// All datasets in the storage root, newest first.
    pub fn list(&self) -> Result<Vec<DatasetEntry>> {
        self.catalog.list()
    }

    /// Remove a dataset by name (extension optional). Returns the
    /// qualified name that was unlinked.
    pub fn delete(&self, name: &str) -> Result<String> {
        self.catalog.delete(name)
    }

    /// Read a dataset back as a single record batch.
    pub fn load(&self, name: &str) -> Result<RecordBatch> {
        self.catalog.load(name)
    }
}
