use std::collections::BTreeSet;

use geo_types::{Coord, Geometry, LineString, Point};

use crate::error::Error;
use crate::source::FeedArchive;
use crate::table::{Crs, Dtype, SpatialTable, Table, Value};

/// Loads `stops.txt` and attaches one point per row.
///
/// Points are built as (stop_lon, stop_lat); longitude is the x axis.
/// Empty coordinate cells become NaN ordinates, which the geometry validator
/// later flags; non-numeric cells fail the load.
pub fn read_stops(archive: &mut FeedArchive) -> Result<SpatialTable, Error> {
    const FILE: &str = "stops.txt";
    let table = archive.table(FILE)?;
    require_columns(&table, FILE, &["stop_lat", "stop_lon"])?;

    let lat = table.column_index("stop_lat").unwrap_or_default();
    let lon = table.column_index("stop_lon").unwrap_or_default();
    let mut geometry = Vec::with_capacity(table.len());
    for row in table.rows() {
        let x = ordinate(&row[lon], FILE, "stop_lon")?;
        let y = ordinate(&row[lat], FILE, "stop_lat")?;
        geometry.push(Some(Geometry::Point(Point::new(x, y))));
    }

    Ok(SpatialTable {
        table,
        geometry,
        crs: Crs::wgs84(),
    })
}

/// Loads `shapes.txt` and folds its point rows into one linestring per shape.
///
/// Rows are sorted by (shape_id, shape_pt_sequence) ascending before
/// grouping, so input order does not matter. A shape with fewer than two
/// points cannot form a linestring and fails the load.
pub fn read_shapes(archive: &mut FeedArchive) -> Result<SpatialTable, Error> {
    const FILE: &str = "shapes.txt";
    let table = archive.table(FILE)?;
    require_columns(
        &table,
        FILE,
        &["shape_id", "shape_pt_lat", "shape_pt_lon", "shape_pt_sequence"],
    )?;

    let id = table.column_index("shape_id").unwrap_or_default();
    let lat = table.column_index("shape_pt_lat").unwrap_or_default();
    let lon = table.column_index("shape_pt_lon").unwrap_or_default();
    let seq = table.column_index("shape_pt_sequence").unwrap_or_default();

    struct ShapePoint {
        id: Value,
        key: String,
        seq: f64,
        coord: Coord<f64>,
    }

    let mut points = Vec::with_capacity(table.len());
    for row in table.rows() {
        points.push(ShapePoint {
            id: row[id].clone(),
            key: row[id].to_string(),
            seq: row[seq].as_f64().ok_or_else(|| Error::InvalidCoordinate {
                file_name: FILE.to_owned(),
                column: "shape_pt_sequence".to_owned(),
                value: row[seq].to_string(),
            })?,
            coord: Coord {
                x: ordinate(&row[lon], FILE, "shape_pt_lon")?,
                y: ordinate(&row[lat], FILE, "shape_pt_lat")?,
            },
        });
    }
    points.sort_by(|a, b| {
        a.key.cmp(&b.key).then(
            a.seq
                .partial_cmp(&b.seq)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });

    let mut rows: Vec<Vec<Value>> = Vec::new();
    let mut geometry: Vec<Option<Geometry<f64>>> = Vec::new();
    let mut start = 0;
    while start < points.len() {
        let mut end = start;
        while end < points.len() && points[end].key == points[start].key {
            end += 1;
        }
        if end - start < 2 {
            return Err(Error::DegenerateShape {
                shape_id: points[start].key.clone(),
                points: end - start,
            });
        }
        let coords: Vec<Coord<f64>> = points[start..end].iter().map(|p| p.coord).collect();
        rows.push(vec![points[start].id.clone()]);
        geometry.push(Some(Geometry::LineString(LineString::new(coords))));
        start = end;
    }

    let id_dtype = table.dtype("shape_id").unwrap_or(Dtype::Text);
    Ok(SpatialTable {
        table: Table::new(vec!["shape_id".to_owned()], vec![id_dtype], rows),
        geometry,
        crs: Crs::wgs84(),
    })
}

/// Loads `locations.geojson` as a feature collection of flexible areas.
///
/// Only Polygon and MultiPolygon geometries are allowed. When the collection
/// carries no CRS, EPSG:4326 is assumed.
pub fn read_locations(archive: &mut FeedArchive) -> Result<SpatialTable, Error> {
    const FILE: &str = "locations.geojson";
    let bytes = archive.read_entry(FILE)?;
    let document: geojson::GeoJson = serde_json::from_slice(&bytes)?;
    let collection = geojson::FeatureCollection::try_from(document).map_err(|e| Error::GeoJson {
        file_name: FILE.to_owned(),
        source: e,
    })?;

    let crs = collection
        .foreign_members
        .as_ref()
        .and_then(crs_name)
        .map(Crs)
        .unwrap_or_default();

    let found: BTreeSet<&'static str> = collection
        .features
        .iter()
        .filter_map(|f| f.geometry.as_ref())
        .map(|g| geometry_type_name(&g.value))
        .collect();
    if found.iter().any(|t| !matches!(*t, "Polygon" | "MultiPolygon")) {
        return Err(Error::GeometryType {
            file_name: FILE.to_owned(),
            found: found.into_iter().map(str::to_owned).collect(),
        });
    }

    let mut columns: Vec<String> = Vec::new();
    for feature in &collection.features {
        if let Some(props) = &feature.properties {
            for key in props.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(collection.features.len());
    let mut geometry: Vec<Option<Geometry<f64>>> = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        rows.push(
            columns
                .iter()
                .map(|column| {
                    feature
                        .properties
                        .as_ref()
                        .and_then(|p| p.get(column))
                        .map(json_value)
                        .unwrap_or(Value::Empty)
                })
                .collect(),
        );
        geometry.push(match feature.geometry {
            Some(geom) => Some(Geometry::try_from(geom.value).map_err(|e| Error::GeoJson {
                file_name: FILE.to_owned(),
                source: e,
            })?),
            None => None,
        });
    }

    let dtypes = (0..columns.len())
        .map(|idx| dtype_of(rows.iter().map(|r| &r[idx])))
        .collect();
    Ok(SpatialTable {
        table: Table::new(columns, dtypes, rows),
        geometry,
        crs,
    })
}

fn require_columns(table: &Table, file_name: &str, required: &[&str]) -> Result<(), Error> {
    let missing: Vec<String> = required
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| (*c).to_owned())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingColumns {
            file_name: file_name.to_owned(),
            columns: missing,
        })
    }
}

fn ordinate(value: &Value, file_name: &str, column: &str) -> Result<f64, Error> {
    match value {
        Value::Empty => Ok(f64::NAN),
        other => other.as_f64().ok_or_else(|| Error::InvalidCoordinate {
            file_name: file_name.to_owned(),
            column: column.to_owned(),
            value: other.to_string(),
        }),
    }
}

fn geometry_type_name(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn crs_name(foreign: &geojson::JsonObject) -> Option<String> {
    foreign
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()
        .map(str::to_owned)
}

fn json_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Empty,
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::Int(i),
            (None, Some(f)) => Value::Float(f),
            _ => Value::Text(n.to_string()),
        },
        serde_json::Value::String(s) => Value::Text(s.clone()),
        other => Value::Text(other.to_string()),
    }
}

fn dtype_of<'a, I>(values: I) -> Dtype
where
    I: Iterator<Item = &'a Value>,
{
    let mut seen = false;
    let mut all_int = true;
    let mut all_float = true;
    for value in values {
        match value {
            Value::Empty => continue,
            Value::Int(_) => seen = true,
            Value::Float(_) => {
                seen = true;
                all_int = false;
            }
            Value::Text(_) => {
                seen = true;
                all_int = false;
                all_float = false;
            }
        }
    }
    match (seen, all_int, all_float) {
        (false, _, _) => Dtype::Text,
        (true, true, _) => Dtype::Int,
        (true, false, true) => Dtype::Float,
        _ => Dtype::Text,
    }
}
