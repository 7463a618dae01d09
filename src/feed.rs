use std::collections::{HashMap, HashSet};
use std::io::Read;

use log::{debug, warn};

use crate::error::Error;
use crate::reader::logical_name;
use crate::registry::{self, LoaderKind};
use crate::source::FeedArchive;
use crate::table::Dataset;
use crate::validate::{validate_geometry, GeometryWarning};

/// Files every feed must carry, before the stops/locations alternative is
/// resolved.
const REQUIRED: &[&str] = &["agency", "routes", "trips", "stop_times"];

/// One loaded GTFS feed: every file found in the archive that loaded
/// successfully, keyed by logical file name.
#[derive(Debug, Default)]
pub struct Feed {
    /// Loaded files, keyed by logical name (`"stops"`, `"routes"`, ...)
    pub datasets: HashMap<String, Dataset>,
    /// Optional files that were present but failed to load, with the error
    pub skipped: Vec<(String, Error)>,
    /// Geometry validator findings across all spatial files
    pub warnings: Vec<GeometryWarning>,
}

impl Feed {
    /// A loaded file by logical name.
    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// Number of loaded files.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Whether nothing loaded.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Prints on stdout basic statistics about the feed, mostly to be sure
    /// that everything was read.
    pub fn print_stats(&self) {
        println!("GTFS feed:");
        let mut names: Vec<_> = self.datasets.keys().collect();
        names.sort_unstable();
        for name in names {
            let dataset = &self.datasets[name];
            let tag = if dataset.is_spatial() { " (spatial)" } else { "" };
            println!("  {}: {} rows{}", name, dataset.table().len(), tag);
        }
        for (name, error) in &self.skipped {
            println!("  {}: skipped ({})", name, error);
        }
        for warning in &self.warnings {
            println!("  {}", warning);
        }
    }
}

/// Loads a whole GTFS feed from a local path or an HTTP(S) URL.
///
/// Structural requirements are checked up front and in full: every missing
/// mandatory file is reported in one error before any per-file loading
/// starts. Per-file loader failures after that point never abort the load;
/// the file is logged, recorded in [Feed::skipped] and omitted.
pub fn load_feed(source: &str) -> Result<Feed, Error> {
    load(FeedArchive::open(source)?)
}

/// Loads a whole GTFS feed from an already-buffered archive reader.
pub fn load_feed_from_reader<R: Read>(reader: R) -> Result<Feed, Error> {
    load(FeedArchive::from_reader(reader)?)
}

fn load(mut archive: FeedArchive) -> Result<Feed, Error> {
    let mut txt_names: HashSet<String> = HashSet::new();
    let mut geojson_names: HashSet<String> = HashSet::new();
    for entry in archive.entry_names() {
        if entry.ends_with(".txt") {
            txt_names.insert(logical_name(&entry).to_owned());
        } else if entry.ends_with(".geojson") {
            geojson_names.insert(logical_name(&entry).to_owned());
        }
    }

    // stops.txt is mandatory unless locations.geojson stands in for it
    let has_stops = txt_names.contains("stops");
    if !has_stops && !geojson_names.contains("locations") {
        return Err(Error::MissingRequiredFiles(vec![
            "stops.txt".to_owned(),
            "locations.geojson".to_owned(),
        ]));
    }

    let mut required: Vec<&str> = REQUIRED.to_vec();
    if has_stops {
        required.push("stops");
    }
    let mut missing: Vec<String> = required
        .iter()
        .filter(|name| !txt_names.contains(**name))
        .map(|name| format!("{}.txt", name))
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(Error::MissingRequiredFiles(missing));
    }

    if !txt_names.contains("calendar") && !txt_names.contains("calendar_dates") {
        return Err(Error::MissingCalendar);
    }

    let mut feed = Feed::default();
    for loader in registry::LOADERS {
        let available = match loader.kind {
            LoaderKind::Locations => &geojson_names,
            _ => &txt_names,
        };
        if !available.contains(loader.name) {
            continue;
        }
        match loader.load(&mut archive) {
            Ok(dataset) => {
                debug!("loaded {}: {} rows", loader.name, dataset.table().len());
                if let Dataset::Spatial(spatial) = &dataset {
                    for warning in validate_geometry(spatial, loader.name) {
                        warn!("{}", warning);
                        feed.warnings.push(warning);
                    }
                }
                feed.datasets.insert(loader.name.to_owned(), dataset);
            }
            Err(error) => {
                warn!("skipping {}: {}", loader.name, error);
                feed.skipped.push((loader.name.to_owned(), error));
            }
        }
    }
    Ok(feed)
}
