use std::fmt;

use geo::Validation;
use geo_types::Geometry;
use serde::Serialize;

use crate::table::SpatialTable;

/// A non-fatal finding about the geometry column of a spatial table.
///
/// The validator never fails a load; the feed aggregator logs these and
/// keeps the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GeometryWarning {
    /// The table carries no geometry column at all
    MissingGeometryColumn {
        /// The logical file the finding applies to
        file: String,
    },
    /// Some rows have no geometry value
    MissingGeometries {
        /// The logical file the finding applies to
        file: String,
        /// How many rows are affected
        count: usize,
    },
    /// Some geometries are not recognizable geometry objects
    /// (non-finite ordinates, too few points for their type)
    MalformedGeometries {
        /// The logical file the finding applies to
        file: String,
        /// How many rows are affected
        count: usize,
    },
    /// Some geometries are well-formed but topologically invalid
    InvalidGeometries {
        /// The logical file the finding applies to
        file: String,
        /// How many rows are affected
        count: usize,
    },
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryWarning::MissingGeometryColumn { file } => {
                write!(f, "[{}] has no 'geometry' column.", file)
            }
            GeometryWarning::MissingGeometries { file, count } => {
                write!(f, "[{}] has {} missing geometries.", file, count)
            }
            GeometryWarning::MalformedGeometries { file, count } => {
                write!(
                    f,
                    "[{}] has {} malformed geometries (not recognizable as geometry objects).",
                    file, count
                )
            }
            GeometryWarning::InvalidGeometries { file, count } => {
                write!(
                    f,
                    "[{}] has {} invalid geometries (self-intersecting or degenerate).",
                    file, count
                )
            }
        }
    }
}

/// Sanity-checks the geometry column of a spatial table.
///
/// Returns diagnostics only; nothing here ever escalates to an error.
pub fn validate_geometry(table: &SpatialTable, name: &str) -> Vec<GeometryWarning> {
    let mut warnings = Vec::new();

    if table.geometry.is_empty() && !table.table.is_empty() {
        warnings.push(GeometryWarning::MissingGeometryColumn {
            file: name.to_owned(),
        });
        return warnings;
    }

    let missing = table.geometry.iter().filter(|g| g.is_none()).count();
    if missing > 0 {
        warnings.push(GeometryWarning::MissingGeometries {
            file: name.to_owned(),
            count: missing,
        });
    }

    let mut malformed = 0;
    let mut invalid = 0;
    for geometry in table.geometry.iter().flatten() {
        if !is_well_formed(geometry) {
            malformed += 1;
        } else if !is_topologically_valid(geometry) {
            invalid += 1;
        }
    }
    if malformed > 0 {
        warnings.push(GeometryWarning::MalformedGeometries {
            file: name.to_owned(),
            count: malformed,
        });
    }
    if invalid > 0 {
        warnings.push(GeometryWarning::InvalidGeometries {
            file: name.to_owned(),
            count: invalid,
        });
    }

    warnings
}

/// Structural well-formedness: finite ordinates and enough points for the
/// geometry's type. Checked before topological validity so each geometry
/// lands in exactly one bucket.
fn is_well_formed(geometry: &Geometry<f64>) -> bool {
    fn finite(c: &geo_types::Coord<f64>) -> bool {
        c.x.is_finite() && c.y.is_finite()
    }
    fn ring_ok(ring: &geo_types::LineString<f64>) -> bool {
        ring.0.len() >= 4 && ring.0.iter().all(finite)
    }
    match geometry {
        Geometry::Point(p) => finite(&p.0),
        Geometry::Line(l) => finite(&l.start) && finite(&l.end),
        Geometry::LineString(l) => l.0.len() >= 2 && l.0.iter().all(finite),
        Geometry::Polygon(p) => ring_ok(p.exterior()) && p.interiors().iter().all(ring_ok),
        Geometry::MultiPoint(m) => m.0.iter().all(|p| finite(&p.0)),
        Geometry::MultiLineString(m) => m
            .0
            .iter()
            .all(|l| l.0.len() >= 2 && l.0.iter().all(finite)),
        Geometry::MultiPolygon(m) => m
            .0
            .iter()
            .all(|p| ring_ok(p.exterior()) && p.interiors().iter().all(ring_ok)),
        Geometry::GeometryCollection(c) => c.0.iter().all(is_well_formed),
        Geometry::Rect(r) => finite(&r.min()) && finite(&r.max()),
        Geometry::Triangle(t) => finite(&t.0) && finite(&t.1) && finite(&t.2),
    }
}

fn is_topologically_valid(geometry: &Geometry<f64>) -> bool {
    match geometry {
        Geometry::Point(g) => g.is_valid(),
        Geometry::Line(g) => g.is_valid(),
        Geometry::LineString(g) => g.is_valid(),
        Geometry::Polygon(g) => g.is_valid(),
        Geometry::MultiPoint(g) => g.is_valid(),
        Geometry::MultiLineString(g) => g.is_valid(),
        Geometry::MultiPolygon(g) => g.is_valid(),
        Geometry::GeometryCollection(g) => g.is_valid(),
        Geometry::Rect(g) => g.is_valid(),
        Geometry::Triangle(g) => g.is_valid(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Crs, Dtype, Table, Value};
    use geo_types::{LineString, Point, Polygon};

    fn spatial(geometry: Vec<Option<Geometry<f64>>>) -> SpatialTable {
        let rows = geometry
            .iter()
            .enumerate()
            .map(|(i, _)| vec![Value::Int(i as i64)])
            .collect();
        SpatialTable {
            table: Table::new(vec!["id".to_owned()], vec![Dtype::Int], rows),
            geometry,
            crs: Crs::wgs84(),
        }
    }

    #[test]
    fn clean_geometries_yield_no_warnings() {
        let table = spatial(vec![
            Some(Geometry::Point(Point::new(2.35, 48.85))),
            Some(Geometry::Point(Point::new(2.36, 48.86))),
        ]);
        assert!(validate_geometry(&table, "stops").is_empty());
    }

    #[test]
    fn missing_geometries_are_counted() {
        let table = spatial(vec![
            Some(Geometry::Point(Point::new(0.0, 0.0))),
            None,
            None,
        ]);
        let warnings = validate_geometry(&table, "stops");
        assert_eq!(
            vec![GeometryWarning::MissingGeometries {
                file: "stops".to_owned(),
                count: 2
            }],
            warnings
        );
    }

    #[test]
    fn nan_points_and_short_lines_are_malformed() {
        let table = spatial(vec![
            Some(Geometry::Point(Point::new(f64::NAN, f64::NAN))),
            Some(Geometry::LineString(LineString::from(vec![(0.0, 0.0)]))),
            Some(Geometry::Point(Point::new(1.0, 1.0))),
        ]);
        let warnings = validate_geometry(&table, "shapes");
        assert_eq!(
            vec![GeometryWarning::MalformedGeometries {
                file: "shapes".to_owned(),
                count: 2
            }],
            warnings
        );
    }

    #[test]
    fn self_intersecting_polygon_is_invalid() {
        let bowtie = Polygon::new(
            LineString::from(vec![
                (0.0, 0.0),
                (2.0, 2.0),
                (2.0, 0.0),
                (0.0, 2.0),
                (0.0, 0.0),
            ]),
            vec![],
        );
        let table = spatial(vec![Some(Geometry::Polygon(bowtie))]);
        let warnings = validate_geometry(&table, "locations");
        assert_eq!(
            vec![GeometryWarning::InvalidGeometries {
                file: "locations".to_owned(),
                count: 1
            }],
            warnings
        );
    }

    #[test]
    fn empty_geometry_column_is_reported() {
        let table = SpatialTable {
            table: Table::new(
                vec!["id".to_owned()],
                vec![Dtype::Int],
                vec![vec![Value::Int(1)]],
            ),
            geometry: vec![],
            crs: Crs::wgs84(),
        };
        let warnings = validate_geometry(&table, "stops");
        assert_eq!(
            vec![GeometryWarning::MissingGeometryColumn {
                file: "stops".to_owned()
            }],
            warnings
        );
    }

    #[test]
    fn warnings_display_in_bracketed_form() {
        let warning = GeometryWarning::MissingGeometries {
            file: "stops".to_owned(),
            count: 3,
        };
        assert_eq!("[stops] has 3 missing geometries.", warning.to_string());
    }
}
