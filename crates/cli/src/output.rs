use std::io::{self, Write};

use dblink_core::{Outcome, ResultSet};

/// Tab-separated header and rows followed by a row count; write statements
/// print the affected row count and, when set, the generated id.
pub(crate) fn write_outcome<W: Write>(
    out: &mut W,
    outcome: &Outcome,
    affected_rows: u64,
    last_insert_id: u64,
) -> io::Result<()> {
    match outcome {
        Outcome::Rows(result) => write_result_set(out, result),
        Outcome::Done => {
            writeln!(out, "Query OK, {affected_rows} {} affected", plural_rows(affected_rows))?;
            if last_insert_id > 0 {
                writeln!(out, "Last insert id: {last_insert_id}")?;
            }
            Ok(())
        }
    }
}

fn write_result_set<W: Write>(out: &mut W, result: &ResultSet) -> io::Result<()> {
    if !result.row.is_empty() {
        writeln!(out, "{}", result.row.columns().collect::<Vec<_>>().join("\t"))?;
    }
    for row in &result.rows {
        let values = row
            .iter()
            .map(|(_, value)| value.to_string())
            .collect::<Vec<_>>();
        writeln!(out, "{}", values.join("\t"))?;
    }
    writeln!(out, "{} {} in set", result.num_rows, plural_rows(result.num_rows))
}

fn plural_rows(count: u64) -> &'static str {
    if count == 1 { "row" } else { "rows" }
}
