use bytes::Bytes;

use crate::error::EtlResult;

/// Full point-in-time export of one table.
///
/// The header holds the column names in source order. Every cell is the Postgres text rendering of
/// the value, with `NULL` encoded as the empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSnapshot {
    table: String,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableSnapshot {
    pub fn new(table: impl Into<String>, header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            table: table.into(),
            header,
            rows,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Serializes the header followed by every row as CSV.
    pub fn to_csv(&self) -> EtlResult<Bytes> {
        encode_csv(&self.header, &self.rows)
    }
}

/// Writes `header` and `rows` as CSV, quoting fields only where needed.
///
/// Rows may have a different field count than the header.
pub fn encode_csv(header: &[String], rows: &[Vec<String>]) -> EtlResult<Bytes> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }

    Ok(Bytes::from(writer.into_inner()?))
}

/// Parses CSV text into records without treating the first line as special.
///
/// Records with no fields, or with a single empty field, carry no data and are skipped.
pub fn decode_csv_records(data: &[u8]) -> EtlResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.is_empty() || (record.len() == 1 && record[0].is_empty()) {
            continue;
        }

        records.push(record.iter().map(str::to_string).collect());
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn csv_output_quotes_embedded_separators() {
        let snapshot = TableSnapshot::new(
            "design",
            strings(&["design_id", "design_name", "file_location"]),
            vec![
                strings(&["1", "Wooden", "/usr"]),
                strings(&["2", "Granite, polished", ""]),
            ],
        );

        let csv = snapshot.to_csv().unwrap();

        assert_snapshot!(String::from_utf8(csv.to_vec()).unwrap(), @r#"
        design_id,design_name,file_location
        1,Wooden,/usr
        2,"Granite, polished",
        "#);
    }

    #[test]
    fn decoding_skips_artifact_records() {
        let records = decode_csv_records(b"a,b\n\n1,2\n\"\"\n3,4\n").unwrap();

        assert_eq!(
            records,
            vec![strings(&["a", "b"]), strings(&["1", "2"]), strings(&["3", "4"])]
        );
    }

    #[test]
    fn decoding_keeps_quoted_commas_in_one_field() {
        let records = decode_csv_records(b"id,name\n1,\"Smith, Jane\"\n").unwrap();

        assert_eq!(records[1], strings(&["1", "Smith, Jane"]));
    }
}
