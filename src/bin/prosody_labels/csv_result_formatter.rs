use std::path::Path;

use prosody_labels::ResultTable;

/// Written for every row of a category that produced no labels.
const UNAVAILABLE: &str = "NA";

pub fn write_results(path: &Path, table: &ResultTable) -> Result<(), String> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|err| format!("Failed to create CSV file '{}': {err}", path.display()))?;
    writer
        .write_record(table.column_names())
        .map_err(|err| format!("Failed to write CSV header '{}': {err}", path.display()))?;

    for row in table.rows() {
        let word = row.word();
        let mut record = vec![
            word.word.clone(),
            word.start_time.to_string(),
            word.end_time.to_string(),
        ];
        record.extend(row.labels().map(|(_, label)| match label {
            Some(label) => label.to_string(),
            None => UNAVAILABLE.to_string(),
        }));
        writer
            .write_record(&record)
            .map_err(|err| format!("Failed to write CSV row '{}': {err}", path.display()))?;
    }

    writer
        .flush()
        .map_err(|err| format!("Failed to finalize CSV file '{}': {err}", path.display()))
}
