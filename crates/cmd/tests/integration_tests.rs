//! Command flows against a temporary storage root, with output captured
//! instead of printed.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tempfile::tempdir;

use cmd::commands::{cat_command, delete_command, generate_command, list_command, run_command};
use hatchery::{
    Config, ContainerRuntime, ExecutionReport, GenerationRequest, Hatchery, LaunchSpec,
};

fn request_named(name: &str, rows: u64, cols: u64) -> GenerationRequest {
    let mut request = GenerationRequest::new(rows, cols);
    request.name = Some(name.to_string());
    request
}

fn arg_value(argv: &[String], flag: &str) -> Option<String> {
    argv.iter()
        .position(|arg| arg == flag)
        .and_then(|idx| argv.get(idx + 1))
        .cloned()
}

/// Stands in for the generation container by running the same service
/// against the bound volume path.
struct LocalRuntime;

#[async_trait]
impl ContainerRuntime for LocalRuntime {
    async fn execute(&self, spec: &LaunchSpec) -> hatchery::Result<ExecutionReport> {
        let rows = arg_value(&spec.argv, "--rows")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let cols = arg_value(&spec.argv, "--cols")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let mut request = GenerationRequest::new(rows, cols);
        request.name = arg_value(&spec.argv, "--name");
        request.seed = arg_value(&spec.argv, "--seed").and_then(|v| v.parse().ok());

        let inner = Hatchery::open(Config::new(&spec.volume));
        let entry = inner.generate(&request)?;

        Ok(ExecutionReport {
            exit_code: 0,
            stdout: format!("hatched {}\n", entry.name),
            stderr: String::new(),
        })
    }
}

#[test]
fn test_generate_then_list_then_cat() -> Result<()> {
    let dir = tempdir()?;
    let service = Hatchery::open(Config::new(dir.path()));

    let mut generate_output = String::new();
    generate_command(
        &service,
        &request_named("demo", 100, 3),
        &mut Some(&mut generate_output),
    )?;
    assert!(
        generate_output.contains("demo.parquet"),
        "unexpected generate output: {}",
        generate_output
    );

    let mut list_output = String::new();
    list_command(&service, &mut Some(&mut list_output))?;
    assert!(
        list_output.contains("demo.parquet"),
        "unexpected list output: {}",
        list_output
    );
    assert!(list_output.contains("1 dataset(s)"), "{}", list_output);

    let mut cat_output = String::new();
    cat_command(&service, "demo", 5, &mut Some(&mut cat_output))?;
    assert!(cat_output.contains("col_0"), "{}", cat_output);
    assert!(cat_output.contains("col_2"), "{}", cat_output);
    assert!(cat_output.contains("Showing 5 of 100 rows"), "{}", cat_output);
    Ok(())
}

#[test]
fn test_list_reports_empty_root() -> Result<()> {
    let dir = tempdir()?;
    let service = Hatchery::open(Config::new(dir.path().join("nested")));

    let mut output = String::new();
    list_command(&service, &mut Some(&mut output))?;
    assert!(output.contains("No datasets in"), "{}", output);
    Ok(())
}

#[test]
fn test_generate_conflict_reports_the_name() -> Result<()> {
    let dir = tempdir()?;
    let service = Hatchery::open(Config::new(dir.path()));

    let mut first_output = String::new();
    generate_command(
        &service,
        &request_named("demo", 100, 2),
        &mut Some(&mut first_output),
    )?;

    let mut second_output = String::new();
    let result = generate_command(
        &service,
        &request_named("demo", 100, 2),
        &mut Some(&mut second_output),
    );
    match result {
        Err(err) => assert!(
            err.to_string().contains("already exists"),
            "unexpected error: {}",
            err
        ),
        Ok(()) => panic!("expected a conflict for the existing name"),
    }
    Ok(())
}

#[test]
fn test_delete_then_missing() -> Result<()> {
    let dir = tempdir()?;
    let service = Hatchery::open(Config::new(dir.path()));

    let mut output = String::new();
    generate_command(
        &service,
        &request_named("old", 100, 1),
        &mut Some(&mut output),
    )?;

    let mut delete_output = String::new();
    delete_command(&service, "old", &mut Some(&mut delete_output))?;
    assert!(delete_output.contains("Deleted old.parquet"), "{}", delete_output);

    let result = delete_command(&service, "old", &mut Some(&mut String::new()));
    match result {
        Err(err) => assert!(err.to_string().contains("not found"), "{}", err),
        Ok(()) => panic!("expected a missing dataset error"),
    }
    Ok(())
}

#[tokio::test]
async fn test_run_confirms_and_reports() -> Result<()> {
    let dir = tempdir()?;
    let service = Hatchery::with_runtime(Config::new(dir.path()), Arc::new(LocalRuntime));

    let mut output = String::new();
    run_command(
        &service,
        &request_named("hatched", 200, 4),
        &mut Some(&mut output),
    )
    .await?;

    assert!(output.contains("Dispatching"), "{}", output);
    assert!(output.contains("hatched hatched.parquet"), "{}", output);
    assert!(output.contains("✅ Confirmed hatched.parquet"), "{}", output);

    let mut list_output = String::new();
    list_command(&service, &mut Some(&mut list_output))?;
    assert!(list_output.contains("hatched.parquet"), "{}", list_output);
    Ok(())
}

#[tokio::test]
async fn test_run_failure_carries_container_logs() -> Result<()> {
    struct FailingRuntime;

    #[async_trait]
    impl ContainerRuntime for FailingRuntime {
        async fn execute(&self, _spec: &LaunchSpec) -> hatchery::Result<ExecutionReport> {
            Ok(ExecutionReport {
                exit_code: 7,
                stdout: String::new(),
                stderr: "generator panicked\n".to_string(),
            })
        }
    }

    let dir = tempdir()?;
    let service = Hatchery::with_runtime(Config::new(dir.path()), Arc::new(FailingRuntime));

    let mut output = String::new();
    let result = run_command(
        &service,
        &GenerationRequest::default(),
        &mut Some(&mut output),
    )
    .await;

    match result {
        Err(err) => {
            let message = err.to_string();
            assert!(message.contains("exit 7"), "{}", message);
            assert!(message.contains("generator panicked"), "{}", message);
        }
        Ok(()) => panic!("expected the failed run to surface an error"),
    }
    Ok(())
}
