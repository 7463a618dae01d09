use geo_types::Geometry;
use serde::Serialize;

/// A single table cell.
///
/// GTFS files declare no types, so cells are either text or numbers inferred
/// from content, with empty fields kept distinct from empty strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// An empty field
    Empty,
    /// An integer field
    Int(i64),
    /// A floating point field
    Float(f64),
    /// A text field
    Text(String),
}

impl Value {
    /// Numeric view of the cell, if it holds a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether the cell is empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

/// The inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dtype {
    /// Every non-empty cell parses as an integer
    Int,
    /// Every non-empty cell parses as a number
    Float,
    /// Anything else
    Text,
}

/// One non-spatial GTFS file: named columns over homogeneous-width rows.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    columns: Vec<String>,
    dtypes: Vec<Dtype>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Assembles a table. Rows must already match the column count.
    pub(crate) fn new(columns: Vec<String>, dtypes: Vec<Dtype>, rows: Vec<Vec<Value>>) -> Table {
        debug_assert_eq!(columns.len(), dtypes.len());
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Table {
            columns,
            dtypes,
            rows,
        }
    }

    /// The column names, in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The rows, each as wide as `columns()`.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Index of a named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether a named column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// The inferred dtype of a named column.
    pub fn dtype(&self, name: &str) -> Option<Dtype> {
        self.column_index(name).map(|i| self.dtypes[i])
    }

    /// Iterates over the cells of a named column.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    /// The cell at (row, column name).
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }
}

/// A coordinate reference system tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crs(pub String);

impl Crs {
    /// WGS84 geographic coordinates, the GTFS norm.
    pub fn wgs84() -> Crs {
        Crs("EPSG:4326".to_owned())
    }

    /// The CRS code, e.g. `"EPSG:4326"`.
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Crs {
    fn default() -> Crs {
        Crs::wgs84()
    }
}

/// A [Table] carrying one geometry per row, tagged with a CRS.
#[derive(Debug, Clone, Serialize)]
pub struct SpatialTable {
    /// The attribute columns
    pub table: Table,
    /// One geometry per row; `None` marks a missing geometry
    pub geometry: Vec<Option<Geometry<f64>>>,
    /// The coordinate reference system of the geometry column
    pub crs: Crs,
}

impl SpatialTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// One loaded GTFS file, spatial or not.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Dataset {
    /// A plain tabular file
    Table(Table),
    /// A file with a geometry column
    Spatial(SpatialTable),
}

impl Dataset {
    /// The attribute table, whichever variant this is.
    pub fn table(&self) -> &Table {
        match self {
            Dataset::Table(t) => t,
            Dataset::Spatial(s) => &s.table,
        }
    }

    /// The spatial view, if this dataset carries geometry.
    pub fn spatial(&self) -> Option<&SpatialTable> {
        match self {
            Dataset::Table(_) => None,
            Dataset::Spatial(s) => Some(s),
        }
    }

    /// Whether this dataset carries geometry.
    pub fn is_spatial(&self) -> bool {
        matches!(self, Dataset::Spatial(_))
    }
}
