/*! Load and validate [GTFS](https://gtfs.org/) feeds distributed as ZIP archives.

A GTFS feed is a collection of CSV files (plus the optional
`locations.geojson`) bundled as a zip file, locally or behind an HTTP(S)
URL. This crate reads such an archive into tables of inferred-dtype
columns, turns the geometry-bearing files (stops, shapes, locations) into
spatial tables in EPSG:4326, and aggregates everything into one [Feed]
while enforcing the structural requirements of the spec:

- `agency.txt`, `routes.txt`, `trips.txt` and `stop_times.txt` are always
  mandatory;
- `stops.txt` is mandatory unless `locations.geojson` stands in for it;
- at least one of `calendar.txt` / `calendar_dates.txt` must be present.

Structural violations are collected in full and fail the load before any
file is parsed. After that, a malformed optional file is logged, recorded
in [Feed::skipped] and omitted without aborting the rest of the feed.

```no_run
let feed = gtfs_feed::load_feed("fixtures/gtfs.zip")?;
let stops = feed.get("stops").and_then(|d| d.spatial()).unwrap();
assert_eq!("EPSG:4326", stops.crs.code());
# Ok::<(), gtfs_feed::Error>(())
```

Single files can be read without aggregating:

```no_run
use gtfs_feed::FeedArchive;

let mut archive = FeedArchive::open("https://example.com/gtfs.zip")?;
let routes = archive.table("routes.txt")?;
# Ok::<(), gtfs_feed::Error>(())
```
*/
#![warn(missing_docs)]

mod error;
mod feed;
mod geometry;
mod reader;
mod registry;
mod schema;
mod source;
mod table;
mod validate;


pub use error::Error;
pub use feed::{load_feed, load_feed_from_reader, Feed};
pub use geometry::{read_locations, read_shapes, read_stops};
pub use source::FeedArchive;
pub use table::{Crs, Dataset, Dtype, SpatialTable, Table, Value};
pub use validate::{validate_geometry, GeometryWarning};
