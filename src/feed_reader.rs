use crate::consistency::{self, Violation};
use crate::fields::Fields;
use crate::materialize::*;
use crate::objects::*;
use crate::record::RecordReader;
use crate::{Error, Feed, FeedSource, ParseError};
use chrono::Utc;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;

const AGENCY_FILE: &str = "agency.txt";
const FEED_INFO_FILE: &str = "feed_info.txt";
const STOPS_FILE: &str = "stops.txt";
const SHAPES_FILE: &str = "shapes.txt";
const ROUTES_FILE: &str = "routes.txt";
const CALENDAR_FILE: &str = "calendar.txt";
const CALENDAR_DATES_FILE: &str = "calendar_dates.txt";
const TRIPS_FILE: &str = "trips.txt";
const STOP_TIMES_FILE: &str = "stop_times.txt";
const FARE_ATTRIBUTES_FILE: &str = "fare_attributes.txt";
const FARE_RULES_FILE: &str = "fare_rules.txt";
const FREQUENCIES_FILE: &str = "frequencies.txt";
const TRANSFERS_FILE: &str = "transfers.txt";

/// Allows to parameterize how the parsing library behaves with invalid data
///
/// By default, the first invalid record stops the parse with a [ParseError].
///
/// ```
///let feed = gtfs_feed_parser::ParseOptions::default()
///    .drop_erroneous(true)
///    .dry_run(true)
///    .parse("fixtures/basic")?;
///assert_eq!(1, feed.agencies.len());
///assert!(feed.trips.get_by_str("trip1").is_none());
/// # Ok::<(), gtfs_feed_parser::Error>(())
///```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Replaces an invalid value by its default (or removes an invalid optional value)
    /// instead of rejecting the whole record
    pub use_default_on_error: bool,
    /// Skips the records (or the shape points and stop times) that are still invalid
    pub drop_erroneous: bool,
    /// Only validates the shapes, routes, services and trips, without keeping them in memory
    pub dry_run: bool,
}

impl ParseOptions {
    /// Returns Self and can be chained
    pub fn use_default_on_error(mut self, value: bool) -> Self {
        self.use_default_on_error = value;
        self
    }

    /// Returns Self and can be chained
    pub fn drop_erroneous(mut self, value: bool) -> Self {
        self.drop_erroneous = value;
        self
    }

    /// Returns Self and can be chained
    pub fn dry_run(mut self, value: bool) -> Self {
        self.dry_run = value;
        self
    }

    /// Reads the feed from a local zip archive or local directory
    pub fn parse<P: AsRef<Path>>(&self, path: P) -> Result<Feed, Error> {
        let source = FeedSource::new(path)?;
        FeedReader {
            options: self,
            source,
            state: ParseState::default(),
        }
        .read()
    }

    /// Skips the erroneous record when allowed, otherwise builds the fatal error
    pub(crate) fn reject(&self, file_name: &str, line: u64, message: String) -> Result<(), Error> {
        if self.drop_erroneous {
            warn!("{}:{}: {}, dropping it", file_name, line, message);
            Ok(())
        } else {
            Err(ParseError {
                file_name: file_name.to_owned(),
                line,
                message,
            }
            .into())
        }
    }
}

struct FeedReader<'o> {
    options: &'o ParseOptions,
    source: FeedSource,
    state: ParseState,
}

impl<'o> FeedReader<'o> {
    fn read(mut self) -> Result<Feed, Error> {
        let now = Utc::now();
        let dry_run = self.options.dry_run;

        self.read_stage::<Agency>(AGENCY_FILE, true)?;
        self.read_stage::<FeedInfo>(FEED_INFO_FILE, false)?;
        self.read_stage::<StopRow>(STOPS_FILE, true)?;
        self.link_parent_stations()?;

        self.read_stage::<ShapePointRow>(SHAPES_FILE, false)?;
        self.check_shapes()?;
        if dry_run {
            self.state.feed.shapes.clear_data();
        }

        self.read_stage::<Route>(ROUTES_FILE, true)?;
        if dry_run {
            self.state.feed.routes.clear_data();
        }

        let has_calendar = self.read_stage::<CalendarRow>(CALENDAR_FILE, false)?;
        let has_calendar_dates = self.read_stage::<CalendarDateRow>(CALENDAR_DATES_FILE, false)?;
        if !has_calendar && !has_calendar_dates {
            return Err(Error::MissingFile(CALENDAR_FILE.to_owned()));
        }
        if dry_run {
            self.state.feed.services.clear_data();
        }

        self.read_stage::<Trip>(TRIPS_FILE, true)?;
        self.read_stage::<StopTimeRow>(STOP_TIMES_FILE, true)?;
        self.check_stop_times()?;
        if dry_run {
            self.state.feed.trips.clear_data();
        }

        self.read_stage::<FareAttribute>(FARE_ATTRIBUTES_FILE, false)?;
        self.read_stage::<FareRuleRow>(FARE_RULES_FILE, false)?;
        self.read_stage::<FrequencyRow>(FREQUENCIES_FILE, false)?;
        self.read_stage::<Transfer>(TRANSFERS_FILE, false)?;

        info!(
            "feed read in {} ms",
            Utc::now().signed_duration_since(now).num_milliseconds()
        );
        Ok(self.state.feed)
    }

    /// Reads all the records of a file, returns `false` if the optional file is absent
    fn read_stage<T: Materialize>(
        &mut self,
        file_name: &'static str,
        required: bool,
    ) -> Result<bool, Error> {
        let reader = match self.source.open(file_name)? {
            Some(reader) => reader,
            None if required => return Err(Error::MissingFile(file_name.to_owned())),
            None => {
                debug!("no {}, skipping it", file_name);
                return Ok(false);
            }
        };
        let mut records = RecordReader::new(reader, file_name)?;
        let (mut read, mut dropped) = (0, 0);
        while let Some(record) = records.next_record()? {
            let fields = Fields::new(&record, self.options.use_default_on_error);
            let result = T::build(&fields, &self.state.feed)
                .and_then(|row| row.insert(&mut self.state, record.line()));
            match result {
                Ok(()) => read += 1,
                Err(e) => {
                    self.options
                        .reject(file_name, record.line(), e.to_string())?;
                    dropped += 1;
                }
            }
        }
        info!("{}: {} objects read, {} dropped", file_name, read, dropped);
        Ok(true)
    }

    /// Resolves the parent stations once every stop is known
    ///
    /// A stop whose parent station is dropped is dropped too.
    fn link_parent_stations(&mut self) -> Result<(), Error> {
        let pending = std::mem::take(&mut self.state.pending_parents);
        let stops = &mut self.state.feed.stops;
        let mut dropped = Vec::new();
        for PendingParent { stop, parent, line } in pending {
            let parent_id = stops.get_id(&parent).filter(|p| *p != stop);
            if let Some(parent_id) = parent_id {
                if let Some(s) = stops.get_mut(&stop) {
                    s.parent_station = Some(parent_id);
                }
                continue;
            }
            let message = if parent == stop.as_str() {
                format!("(for stop id {}) a stop cannot be its own parent station", stop)
            } else {
                format!(
                    "(for stop id {}) no station with id {} found, cannot use as parent station",
                    stop, parent
                )
            };
            if self.options.use_default_on_error {
                warn!("{}:{}: {}, ignoring it", STOPS_FILE, line, message);
            } else {
                self.options.reject(STOPS_FILE, line, message)?;
                dropped.push(stop);
            }
        }

        while !dropped.is_empty() {
            for id in &dropped {
                stops.remove(id);
            }
            dropped = stops
                .iter()
                .filter(|(_, s)| {
                    s.parent_station
                        .as_ref()
                        .map_or(false, |p| !stops.contains(p))
                })
                .map(|(id, _)| id.clone())
                .collect();
            for id in &dropped {
                warn!("stop {} dropped along with its parent station", id);
            }
        }
        Ok(())
    }

    fn check_shapes(&mut self) -> Result<(), Error> {
        let mut ids: Vec<Id<Shape>> = self.state.feed.shapes.ids().cloned().collect();
        ids.sort();
        for id in ids {
            if let Some(shape) = self.state.feed.shapes.get_mut(&id) {
                if let Err(violation) = consistency::check_shape(shape, self.options) {
                    return Err(fatal(SHAPES_FILE, &self.state.shape_lines, id, violation));
                }
            }
        }
        Ok(())
    }

    fn check_stop_times(&mut self) -> Result<(), Error> {
        let mut ids: Vec<Id<Trip>> = self.state.feed.trips.ids().cloned().collect();
        ids.sort();
        for id in ids {
            if let Some(trip) = self.state.feed.trips.get_mut(&id) {
                if let Err(violation) = consistency::check_stop_times(trip, self.options) {
                    return Err(fatal(
                        STOP_TIMES_FILE,
                        &self.state.stop_time_lines,
                        id,
                        violation,
                    ));
                }
            }
        }
        Ok(())
    }
}

/// The error of a consistency check, located at the line of the faulty element
fn fatal<T>(
    file_name: &str,
    lines: &HashMap<(Id<T>, u32), u64>,
    parent: Id<T>,
    violation: Violation,
) -> Error {
    let line = lines
        .get(&(parent, violation.sequence))
        .copied()
        .unwrap_or_default();
    ParseError {
        file_name: file_name.to_owned(),
        line,
        message: violation.message,
    }
    .into()
}
