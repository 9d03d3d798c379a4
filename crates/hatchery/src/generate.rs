//! In-memory table generation.

use std::sync::Arc;

use arrow_array::{ArrayRef, Float64Array, RecordBatch};
use arrow_schema::{DataType, Field, Schema};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::Result;
use crate::request::GenerationRequest;

/// Fill a rows x cols table with standard-normal samples.
///
/// Columns are Float64 named `col_0 .. col_{n-1}`. A seed pins the output;
/// without one every call draws fresh entropy.
pub fn generate_table(request: &GenerationRequest) -> Result<RecordBatch> {
    request.validate()?;

    let mut rng = match request.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let rows = request.rows as usize;
    let cols = request.cols as usize;

    let mut fields = Vec::with_capacity(cols);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(cols);
    for i in 0..cols {
        let values = Float64Array::from_iter_values(
            (0..rows).map(|_| rng.sample::<f64, _>(StandardNormal)),
        );
        fields.push(Field::new(format!("col_{}", i), DataType::Float64, false));
        columns.push(Arc::new(values) as ArrayRef);
    }

    let schema = Arc::new(Schema::new(fields));
    Ok(RecordBatch::try_new(schema, columns)?)
}
