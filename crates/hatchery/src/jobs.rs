// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! One-shot generation jobs in disposable containers.
//!
//! The runner validates the request, hands a [`LaunchSpec`] to a
//! [`ContainerRuntime`], waits for the container to exit, and maps the
//! exit into a [`JobOutcome`]. A non-zero exit is a normal Failed outcome
//! carrying the captured stderr; trouble with the platform itself (daemon
//! unreachable, API failures) is [`crate::Error::Platform`] and is never
//! folded into execution logs.

use std::sync::Arc;

use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{
    Config as ContainerConfig, CreateContainerOptions, LogOutput, LogsOptions,
    RemoveContainerOptions, StartContainerOptions, WaitContainerOptions,
};
use bollard::models::HostConfig;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::request::GenerationRequest;

/// Binary invoked inside the generation container.
const CONTAINER_ENTRYPOINT: &str = "hatch";

/// Everything the platform needs to run one generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub image: String,
    pub argv: Vec<String>,
    /// Volume name or host path bound at `mount_point`.
    pub volume: String,
    pub mount_point: String,
}

/// What happened inside one container, as observed by the platform.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub exit_code: i64,
    pub stdout: String,
    pub stderr: String,
}

/// Terminal state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Succeeded,
    Failed,
}

/// Exit detail for a failed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFailure {
    pub exit_code: i64,
}

/// Result of one isolated generation run. Not persisted anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    pub status: JobStatus,
    /// Captured stdout on success, stderr on failure.
    pub logs: String,
    pub failure: Option<JobFailure>,
}

impl JobOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == JobStatus::Succeeded
    }
}

/// Message-passing boundary to the container platform.
///
/// A structured [`LaunchSpec`] goes in, a structured [`ExecutionReport`]
/// comes back. Tests substitute a scripted implementation; production uses
/// [`DockerRuntime`].
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    async fn execute(&self, spec: &LaunchSpec) -> Result<ExecutionReport>;
}

/// Container runtime talking to the local Docker daemon.
pub struct DockerRuntime;

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn execute(&self, spec: &LaunchSpec) -> Result<ExecutionReport> {
        let docker = Docker::connect_with_local_defaults().map_err(platform)?;

        let host_config = HostConfig {
            binds: Some(vec![format!("{}:{}:rw", spec.volume, spec.mount_point)]),
            ..Default::default()
        };
        let container_config = ContainerConfig {
            image: Some(spec.image.clone()),
            cmd: Some(spec.argv.clone()),
            host_config: Some(host_config),
            ..Default::default()
        };

        let created = docker
            .create_container(None::<CreateContainerOptions<String>>, container_config)
            .await
            .map_err(platform)?;
        let id = created.id;

        diagnostics::log_debug!("created container {id}", id: id.as_str());

        // The container must be removed on every path from here on.
        let result = run_to_completion(&docker, &id).await;

        let removal = docker
            .remove_container(
                &id,
                Some(RemoveContainerOptions {
                    force: true,
                    ..Default::default()
                }),
            )
            .await;
        if let Err(err) = removal {
            diagnostics::log_warn!(
                "failed to remove container {id}: {error}",
                id: id.as_str(),
                error: err.to_string()
            );
        }

        result
    }
}

async fn run_to_completion(docker: &Docker, id: &str) -> Result<ExecutionReport> {
    docker
        .start_container(id, None::<StartContainerOptions<String>>)
        .await
        .map_err(platform)?;

    // The wait stream reports a non-zero exit as a dedicated error value;
    // that is still a completed execution, not a platform failure.
    let mut wait = docker.wait_container(id, None::<WaitContainerOptions<String>>);
    let exit_code = match wait.next().await {
        Some(Ok(response)) => response.status_code,
        Some(Err(bollard::errors::Error::DockerContainerWaitError { code, .. })) => code,
        Some(Err(err)) => return Err(platform(err)),
        None => return Err(Error::Platform("wait stream ended without a status".to_string())),
    };

    let mut stdout = String::new();
    let mut stderr = String::new();
    let mut logs = docker.logs(
        id,
        Some(LogsOptions::<String> {
            stdout: true,
            stderr: true,
            ..Default::default()
        }),
    );
    while let Some(chunk) = logs.next().await {
        match chunk.map_err(platform)? {
            LogOutput::StdOut { message } | LogOutput::Console { message } => {
                stdout.push_str(&String::from_utf8_lossy(&message));
            }
            LogOutput::StdErr { message } => {
                stderr.push_str(&String::from_utf8_lossy(&message));
            }
            LogOutput::StdIn { .. } => {}
        }
    }

    Ok(ExecutionReport {
        exit_code,
        stdout,
        stderr,
    })
}

fn platform(err: bollard::errors::Error) -> Error {
    Error::Platform(err.to_string())
}

/// Runs generation requests through the container platform, one container
/// per request, synchronously.
pub struct JobRunner {
    config: Config,
    runtime: Arc<dyn ContainerRuntime>,
}

impl JobRunner {
    pub fn new(config: Config) -> Self {
        JobRunner {
            config,
            runtime: Arc::new(DockerRuntime),
        }
    }

    pub fn with_runtime(config: Config, runtime: Arc<dyn ContainerRuntime>) -> Self {
        JobRunner { config, runtime }
    }

    /// Argv for the in-container generation command, equivalent to running
    /// `hatch generate` against the mount point. `base_name` is the
    /// already-resolved name, so the container and the caller agree on the
    /// output file even across a second boundary.
    pub fn launch_spec(&self, request: &GenerationRequest, base_name: Option<&str>) -> LaunchSpec {
        let mut argv = vec![
            CONTAINER_ENTRYPOINT.to_string(),
            "generate".to_string(),
            "--rows".to_string(),
            request.rows.to_string(),
            "--cols".to_string(),
            request.cols.to_string(),
            "--storage".to_string(),
            self.config.mount_point.clone(),
        ];
        if let Some(base) = base_name {
            argv.push("--name".to_string());
            argv.push(base.to_string());
        }
        if let Some(seed) = request.seed {
            argv.push("--seed".to_string());
            argv.push(seed.to_string());
        }
        if request.overwrite {
            argv.push("--overwrite".to_string());
        }

        LaunchSpec {
            image: self.config.image.clone(),
            argv,
            volume: self.config.volume.clone(),
            mount_point: self.config.mount_point.clone(),
        }
    }

    /// Validate, launch, wait, and map the exit into a [`JobOutcome`].
    ///
    /// Blocks the calling task for the container's full lifetime. No
    /// retries at this layer.
    pub async fn run(
        &self,
        request: &GenerationRequest,
        base_name: Option<&str>,
    ) -> Result<JobOutcome> {
        request.validate()?;

        let spec = self.launch_spec(request, base_name);
        diagnostics::log_info!(
            "launching generation job: {rows}x{cols} via {image}",
            rows: request.rows,
            cols: request.cols,
            image: spec.image.as_str()
        );

        let report = self.runtime.execute(&spec).await?;

        if report.exit_code == 0 {
            Ok(JobOutcome {
                status: JobStatus::Succeeded,
                logs: report.stdout,
                failure: None,
            })
        } else {
            diagnostics::log_warn!(
                "generation job exited with {code}",
                code: report.exit_code
            );
            Ok(JobOutcome {
                status: JobStatus::Failed,
                logs: if report.stderr.is_empty() {
                    report.stdout
                } else {
                    report.stderr
                },
                failure: Some(JobFailure {
                    exit_code: report.exit_code,
                }),
            })
        }
    }
}
