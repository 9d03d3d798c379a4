//! Parquet encode/decode for catalog files.

use std::fs::File;
use std::path::Path;

use arrow_array::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Encode a batch to `path` with Snappy compression.
///
/// The bytes land in a temporary file in the same directory first and are
/// renamed into place, so a concurrent reader never sees a partial file
/// and an overwrite replaces the previous content in a single step.
pub fn write_table(path: &Path, batch: &RecordBatch) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        Error::InvalidRequest(format!("no parent directory for {}", path.display()))
    })?;

    let tmp = NamedTempFile::new_in(dir)?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(tmp.reopen()?, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;

    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Decode a Parquet file into a single batch.
pub fn read_table(path: &Path) -> Result<RecordBatch> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }

    match batches.len() {
        0 => Ok(RecordBatch::new_empty(schema)),
        1 => Ok(batches.remove(0)),
        _ => Ok(arrow::compute::concat_batches(&schema, &batches)?),
    }
}
