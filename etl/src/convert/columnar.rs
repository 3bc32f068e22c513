use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use crate::bail;
use crate::error::{ErrorKind, EtlResult};
use crate::storage::ObjectStorage;

/// Result of converting one object.
///
/// Rejected and missing inputs are values rather than errors so that callers can skip them.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    /// The encoded Parquet file.
    Parquet(Bytes),
    /// The key does not name a `.csv` file. No storage read happened.
    NotCsv { name: String },
    /// No object exists under the key.
    NotFound { key: String },
}

impl fmt::Display for ConversionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionOutcome::Parquet(bytes) => write!(f, "parquet file of {} bytes", bytes.len()),
            ConversionOutcome::NotCsv { name } => write!(f, "{name} is not a .csv file."),
            ConversionOutcome::NotFound { .. } => f.write_str("csv file not found"),
        }
    }
}

/// Reads the CSV object under `key` from `bucket` and encodes it as Parquet.
pub async fn convert_csv_to_parquet<S: ObjectStorage>(
    storage: &S,
    bucket: &str,
    key: &str,
) -> EtlResult<ConversionOutcome> {
    if !key.ends_with(".csv") {
        return Ok(ConversionOutcome::NotCsv {
            name: key.to_string(),
        });
    }

    let Some(csv) = storage.get_object(bucket, key).await? else {
        return Ok(ConversionOutcome::NotFound {
            key: key.to_string(),
        });
    };

    let parquet = csv_to_parquet(&csv)?;
    debug!(
        bucket,
        key,
        csv_bytes = csv.len(),
        parquet_bytes = parquet.len(),
        "converted csv to parquet"
    );

    Ok(ConversionOutcome::Parquet(parquet))
}

/// Encodes a CSV document with a header row as a single in-memory Parquet file.
///
/// Column types are inferred from the values, so numeric columns become integer or floating
/// point columns. Empty values become nulls.
pub fn csv_to_parquet(csv: &[u8]) -> EtlResult<Bytes> {
    if csv.iter().all(u8::is_ascii_whitespace) {
        bail!(ErrorKind::InvalidData, "CSV file has no header row");
    }

    let format = Format::default().with_header(true);
    let (schema, _) = format.infer_schema(Cursor::new(csv), None)?;
    let schema = Arc::new(schema);

    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .build(Cursor::new(csv))?;

    let mut buffer = Vec::new();
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema, Some(props))?;
    for batch in reader {
        writer.write(&batch?)?;
    }
    writer.close()?;

    Ok(Bytes::from(buffer))
}

#[cfg(test)]
mod tests {
    use arrow::array::{Array, AsArray};
    use arrow::datatypes::{DataType, Int64Type};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::*;
    use crate::storage::memory::MemoryObjectStorage;

    #[test]
    fn numeric_columns_round_trip_as_integers() {
        let parquet = csv_to_parquet(b"test,test2,test3\n1,2,3\n5,6,7\n8,9,10").unwrap();

        let reader = ParquetRecordBatchReaderBuilder::try_new(parquet)
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
        let batch = &batches[0];

        let names: Vec<_> = batch
            .schema()
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect();
        assert_eq!(names, vec!["test", "test2", "test3"]);
        assert_eq!(batch.schema().field(2).data_type(), &DataType::Int64);

        let last = batch.column(2).as_primitive::<Int64Type>();
        assert_eq!(last.values().to_vec(), vec![3, 7, 10]);
    }

    #[test]
    fn empty_values_become_nulls() {
        let parquet = csv_to_parquet(b"id,amount\n1,\n2,7\n").unwrap();

        let batch = ParquetRecordBatchReaderBuilder::try_new(parquet)
            .unwrap()
            .build()
            .unwrap()
            .next()
            .unwrap()
            .unwrap();

        assert_eq!(batch.num_rows(), 2);
        assert!(batch.column(1).is_null(0));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = csv_to_parquet(b"").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn non_csv_key_is_rejected_without_reading() {
        let storage = MemoryObjectStorage::new();

        let outcome = convert_csv_to_parquet(&storage, "totesys-raw-data-1", "design.txt")
            .await
            .unwrap();

        assert_eq!(outcome.to_string(), "design.txt is not a .csv file.");
        assert_eq!(storage.object_reads().await, 0);
    }

    #[tokio::test]
    async fn absent_key_is_reported_as_not_found() {
        let storage = MemoryObjectStorage::new();
        storage.create_bucket("totesys-raw-data-1").await;

        let outcome = convert_csv_to_parquet(&storage, "totesys-raw-data-1", "design.csv")
            .await
            .unwrap();

        assert_eq!(outcome.to_string(), "csv file not found");
    }
}
