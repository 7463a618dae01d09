use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An error that can occur when loading GTFS data from an archive.
#[derive(Error, Debug)]
pub enum Error {
    /// A remote archive could not be fetched (network failure or non-2xx status)
    #[error("could not fetch remote archive '{url}'")]
    Fetch {
        /// The URL that was requested
        url: String,
        /// The underlying HTTP error
        #[source]
        source: reqwest::Error,
    },
    /// A local archive is missing or unreadable
    #[error("could not open archive '{path}'")]
    FileAccess {
        /// The path that could not be opened
        path: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// A requested entry is not present in the archive
    #[error("{0} not found inside the GTFS archive")]
    MissingFile(String),
    /// A parsed table lacks columns a loader requires
    #[error("{file_name} missing columns: {}", .columns.join(", "))]
    MissingColumns {
        /// The file whose columns were checked
        file_name: String,
        /// Every required column that was absent
        columns: Vec<String>,
    },
    /// A geometry in `locations.geojson` falls outside the allowed type set
    #[error(
        "geometry type mismatch in '{file_name}': expected {{Polygon, MultiPolygon}}, found {{{}}}",
        .found.join(", ")
    )]
    GeometryType {
        /// The file holding the offending geometry
        file_name: String,
        /// The distinct geometry types actually found
        found: Vec<String>,
    },
    /// A shape has too few points to form a linestring
    #[error("shape '{shape_id}' has {points} point(s); a linestring needs at least two")]
    DegenerateShape {
        /// The shape identifier
        shape_id: String,
        /// How many points the shape actually has
        points: usize,
    },
    /// A coordinate or sequence cell could not be read as a number
    #[error("{file_name}: column '{column}' holds non-numeric value '{value}'")]
    InvalidCoordinate {
        /// The file holding the bad cell
        file_name: String,
        /// The column the cell belongs to
        column: String,
        /// The cell content
        value: String,
    },
    /// One or more mandatory feed files are absent from the archive
    #[error("required GTFS file(s) missing: {}", .0.join(", "))]
    MissingRequiredFiles(Vec<String>),
    /// Neither calendar.txt nor calendar_dates.txt is present
    #[error("GTFS feed must include at least one of: calendar.txt or calendar_dates.txt")]
    MissingCalendar,
    /// Impossible to read a CSV entry
    #[error("impossible to read csv file '{file_name}'")]
    Csv {
        /// File name that could not be parsed as CSV
        file_name: String,
        /// The initial error by the csv library
        #[source]
        source: csv::Error,
    },
    /// Impossible to interpret a GeoJSON entry
    #[error("impossible to read geojson file '{file_name}'")]
    GeoJson {
        /// File name that could not be parsed as GeoJSON
        file_name: String,
        /// The initial error by the geojson library
        #[source]
        source: geojson::Error,
    },
    /// Error when deserializing a JSON document
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    /// Error when trying to unzip the GTFS archive
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    /// Generic Input/Output error while reading a file
    #[error("impossible to read file")]
    IO(#[from] std::io::Error),
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Error {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Err(serde::de::Error::custom(format!(
            "cannot deserialize Error: {}",
            s
        )))
    }
}
