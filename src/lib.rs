/*! Parses a [General Transit Feed Specification](https://gtfs.org/) (GTFS) feed into typed Rust structures.

The feed is read from a directory or a zip archive. Files are read in the order of
their dependencies so that every reference (the route of a trip, the stop of a stop
time…) is resolved as soon as the record is read.

How invalid data is handled is set with [ParseOptions]:
- by default, the first invalid record stops the parse with a [ParseError] giving
  its file and line;
- `use_default_on_error` replaces invalid values by a default when there is one;
- `drop_erroneous` skips the records that are still invalid;
- `dry_run` only validates the bulky objects (shapes, routes, services and trips).

The logs are emitted with the [log](https://docs.rs/log) crate: skipped records are
reported as warnings.

```
let feed = gtfs_feed_parser::ParseOptions::default()
    .use_default_on_error(true)
    .parse("fixtures/basic")?;
println!("there are {} stops in the feed", feed.stops.len());
# Ok::<(), gtfs_feed_parser::Error>(())
```
*/
#![warn(missing_docs)]

#[macro_use]
extern crate derivative;
#[macro_use]
extern crate serde_derive;

mod consistency;
pub mod error;
mod feed;
mod feed_reader;
mod fields;
mod id;
mod materialize;
pub mod objects;
mod record;
mod serde_helpers;
pub mod source;

#[cfg(test)]
mod tests;

pub use error::{Error, FieldError, FieldErrorKind, ParseError};
pub use feed::Feed;
pub use feed_reader::ParseOptions;
pub use id::{Collection, Id};
pub use objects::*;
pub use source::FeedSource;
