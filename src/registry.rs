//! The static mapping from logical GTFS file names to loading behavior.
//!
//! Built once at compile time; the feed aggregator dispatches through it
//! and nothing else mutates it. File names follow the published GTFS and
//! Fares-v2 reference spellings.

use crate::error::Error;
use crate::geometry;
use crate::source::FeedArchive;
use crate::table::Dataset;

/// How a logical file is turned into a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoaderKind {
    /// Plain delimited text, no geometry
    Tabular,
    /// stops.txt with one point per row
    Stops,
    /// shapes.txt folded into one linestring per shape
    Shapes,
    /// locations.geojson parsed as a feature collection
    Locations,
}

/// One registry entry: a logical file name and its loading behavior.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Loader {
    pub name: &'static str,
    pub kind: LoaderKind,
}

impl Loader {
    /// The archive entry name this loader targets.
    pub fn entry_name(&self) -> String {
        match self.kind {
            LoaderKind::Locations => format!("{}.geojson", self.name),
            _ => format!("{}.txt", self.name),
        }
    }

    /// Runs the loader against an opened archive.
    pub fn load(&self, archive: &mut FeedArchive) -> Result<Dataset, Error> {
        match self.kind {
            LoaderKind::Tabular => archive.table(&self.entry_name()).map(Dataset::Table),
            LoaderKind::Stops => geometry::read_stops(archive).map(Dataset::Spatial),
            LoaderKind::Shapes => geometry::read_shapes(archive).map(Dataset::Spatial),
            LoaderKind::Locations => geometry::read_locations(archive).map(Dataset::Spatial),
        }
    }
}

macro_rules! tabular {
    ($name:literal) => {
        Loader {
            name: $name,
            kind: LoaderKind::Tabular,
        }
    };
}

/// Every GTFS file the crate knows how to load.
pub(crate) const LOADERS: &[Loader] = &[
    tabular!("agency"),
    tabular!("areas"),
    tabular!("attributions"),
    tabular!("booking_rules"),
    tabular!("calendar"),
    tabular!("calendar_dates"),
    tabular!("fare_attributes"),
    tabular!("fare_leg_join_rules"),
    tabular!("fare_leg_rules"),
    tabular!("fare_media"),
    tabular!("fare_products"),
    tabular!("fare_rules"),
    tabular!("fare_transfer_rules"),
    tabular!("feed_info"),
    tabular!("frequencies"),
    tabular!("levels"),
    tabular!("location_group_stops"),
    tabular!("location_groups"),
    Loader {
        name: "locations",
        kind: LoaderKind::Locations,
    },
    tabular!("networks"),
    tabular!("pathways"),
    tabular!("rider_categories"),
    tabular!("route_networks"),
    tabular!("routes"),
    Loader {
        name: "shapes",
        kind: LoaderKind::Shapes,
    },
    tabular!("stop_areas"),
    tabular!("stop_times"),
    Loader {
        name: "stops",
        kind: LoaderKind::Stops,
    },
    tabular!("timeframes"),
    tabular!("transfers"),
    tabular!("translations"),
    tabular!("trips"),
];

/// Looks up the loader for a logical file name.
#[allow(dead_code)]
pub(crate) fn find(name: &str) -> Option<&'static Loader> {
    LOADERS.iter().find(|l| l.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_files_have_dedicated_loaders() {
        assert_eq!(LoaderKind::Stops, find("stops").unwrap().kind);
        assert_eq!(LoaderKind::Shapes, find("shapes").unwrap().kind);
        assert_eq!(LoaderKind::Locations, find("locations").unwrap().kind);
        assert_eq!(LoaderKind::Tabular, find("agency").unwrap().kind);
        assert!(find("nonsense").is_none());
    }

    #[test]
    fn entry_names_carry_the_right_extension() {
        assert_eq!("stops.txt", find("stops").unwrap().entry_name());
        assert_eq!("locations.geojson", find("locations").unwrap().entry_name());
    }

    #[test]
    fn canonical_fares_v2_names_are_used() {
        // The spellings match the published spec, e.g. no "fare_transfer_fules"
        for name in [
            "booking_rules",
            "fare_transfer_rules",
            "areas",
            "location_group_stops",
        ] {
            assert!(find(name).is_some(), "missing loader for {}", name);
        }
    }

    #[test]
    fn names_are_unique_and_sorted() {
        let names: Vec<_> = LOADERS.iter().map(|l| l.name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names, sorted);
    }
}
