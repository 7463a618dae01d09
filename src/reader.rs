use crate::error::Error;
use crate::schema;
use crate::table::{Dtype, Table, Value};

/// Parses one archive entry as delimited text with a header row.
///
/// Column dtypes are inferred from content, except where a fixed schema is
/// pinned for the logical file (see [crate::schema]).
pub(crate) fn parse_table(bytes: &[u8], file_name: &str) -> Result<Table, Error> {
    let bytes = strip_bom(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(bytes);

    let csv_err = |e| Error::Csv {
        file_name: file_name.to_owned(),
        source: e,
    };

    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    // Pre-allocate a StringRecord and read one record at a time
    let mut rec = csv::StringRecord::new();
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    while reader.read_record(&mut rec).map_err(csv_err)? {
        let mut row: Vec<String> = rec.iter().map(str::to_owned).collect();
        // Flexible records are padded or truncated to the header width
        row.resize(columns.len(), String::new());
        raw_rows.push(row);
    }

    let logical_name = logical_name(file_name);
    let dtypes: Vec<Dtype> = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let cells = raw_rows.iter().map(|r| r[idx].as_str());
            resolve_dtype(schema::fixed_dtype(logical_name, column), cells)
        })
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|raw| {
            raw.into_iter()
                .zip(&dtypes)
                .map(|(cell, dtype)| convert(cell, *dtype))
                .collect()
        })
        .collect();

    Ok(Table::new(columns, dtypes, rows))
}

/// The extension-stripped identifier of a GTFS file name.
pub(crate) fn logical_name(entry_name: &str) -> &str {
    let name = std::path::Path::new(entry_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(entry_name);
    name.strip_suffix(".txt")
        .or_else(|| name.strip_suffix(".geojson"))
        .unwrap_or(name)
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&[0xef, 0xbb, 0xbf]).unwrap_or(bytes)
}

/// Picks a column dtype: a pinned dtype wins when every non-empty cell
/// parses under it, otherwise the content decides.
fn resolve_dtype<'a, I>(pinned: Option<Dtype>, cells: I) -> Dtype
where
    I: Iterator<Item = &'a str> + Clone,
{
    if let Some(dtype) = pinned {
        let fits = cells
            .clone()
            .filter(|c| !c.is_empty())
            .all(|c| parses_as(c, dtype));
        if fits {
            return dtype;
        }
    }
    infer_dtype(cells)
}

fn infer_dtype<'a, I>(cells: I) -> Dtype
where
    I: Iterator<Item = &'a str>,
{
    let mut seen = false;
    let mut all_int = true;
    let mut all_float = true;
    for cell in cells {
        if cell.is_empty() {
            continue;
        }
        seen = true;
        all_int = all_int && parses_as(cell, Dtype::Int);
        all_float = all_float && parses_as(cell, Dtype::Float);
        if !all_float {
            break;
        }
    }
    match (seen, all_int, all_float) {
        (false, _, _) => Dtype::Text,
        (true, true, _) => Dtype::Int,
        (true, false, true) => Dtype::Float,
        _ => Dtype::Text,
    }
}

fn parses_as(cell: &str, dtype: Dtype) -> bool {
    match dtype {
        Dtype::Int => cell.trim().parse::<i64>().is_ok(),
        Dtype::Float => cell.trim().parse::<f64>().is_ok(),
        Dtype::Text => true,
    }
}

fn convert(cell: String, dtype: Dtype) -> Value {
    if cell.is_empty() {
        return Value::Empty;
    }
    match dtype {
        Dtype::Int => cell
            .trim()
            .parse()
            .map(Value::Int)
            .unwrap_or(Value::Text(cell)),
        Dtype::Float => cell
            .trim()
            .parse()
            .map(Value::Float)
            .unwrap_or(Value::Text(cell)),
        Dtype::Text => Value::Text(cell),
    }
}
