use crate::{objects::*, Collection, Error, ParseOptions};
use chrono::prelude::NaiveDate;
use chrono::Duration;

/// Data structure with all the GTFS objects of a feed
///
/// References between objects are [Id]s into the collections of the feed.
/// When the feed was read in dry-run mode, some collections only hold placeholders:
/// their ids are known but [Collection::get] returns `None`.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct Feed {
    /// All the [Agency], by `agency_id`
    pub agencies: Collection<Agency>,
    /// All the [Stop], by `stop_id`
    pub stops: Collection<Stop>,
    /// All the [Route], by `route_id`
    pub routes: Collection<Route>,
    /// All the [Trip] with their stop times and frequencies, by `trip_id`
    pub trips: Collection<Trip>,
    /// All the [Service] from `calendar.txt` and `calendar_dates.txt`, by `service_id`
    pub services: Collection<Service>,
    /// All the [Shape] with their points sorted by sequence, by `shape_id`
    pub shapes: Collection<Shape>,
    /// All the [FareAttribute] with their rules, by `fare_id`
    pub fare_attributes: Collection<FareAttribute>,
    /// Transfers between stops
    pub transfers: Vec<Transfer>,
    /// Information about the feed itself
    pub feed_infos: Vec<FeedInfo>,
}

impl Feed {
    /// Reads the feed from a local zip archive or local directory, failing on the first invalid record
    ///
    /// See [ParseOptions] to be more lenient
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Feed, Error> {
        ParseOptions::default().parse(path)
    }

    /// Prints the number of objects of each kind on the standard output
    pub fn print_stats(&self) {
        println!("GTFS data:");
        println!("  Agencies: {}", self.agencies.len());
        println!("  Stops: {}", self.stops.len());
        println!("  Routes: {}", self.routes.len());
        println!("  Services: {}", self.services.len());
        println!("  Trips: {}", self.trips.len());
        println!(
            "  Stop times: {}",
            self.trips
                .iter()
                .map(|(_, t)| t.stop_times.len())
                .sum::<usize>()
        );
        println!("  Shapes: {}", self.shapes.len());
        println!("  Fare attributes: {}", self.fare_attributes.len());
        println!("  Transfers: {}", self.transfers.len());
        println!("  Feed info: {}", self.feed_infos.len());
    }

    /// Days (as offsets from `start_date`) on which the service runs
    pub fn trip_days(&self, service_id: &str, start_date: NaiveDate) -> Vec<u16> {
        let service = match self.services.get_by_str(service_id) {
            Some(service) => service,
            None => return Vec::new(),
        };
        let last_date = service
            .exceptions
            .keys()
            .next_back()
            .copied()
            .into_iter()
            .chain(service.end_date)
            .max();
        let total_days = match last_date {
            Some(last_date) => last_date.signed_duration_since(start_date).num_days(),
            None => return Vec::new(),
        };
        (0..=total_days)
            .filter(|offset| service.is_active_on(start_date + Duration::days(*offset)))
            .map(|offset| offset as u16)
            .collect()
    }

    /// Gets a [Stop] by its `stop_id`
    pub fn get_stop<'a>(&'a self, id: &str) -> Result<&'a Stop, Error> {
        self.stops.try_get(id)
    }

    /// The parent station of a [Stop], if any
    pub fn parent_station<'a>(&'a self, stop: &Stop) -> Option<&'a Stop> {
        stop.parent_station
            .as_ref()
            .and_then(|id| self.stops.get(id))
    }

    /// Gets an [Agency] by its `agency_id`
    pub fn get_agency<'a>(&'a self, id: &str) -> Result<&'a Agency, Error> {
        self.agencies.try_get(id)
    }

    /// Gets a [Route] by its `route_id`
    pub fn get_route<'a>(&'a self, id: &str) -> Result<&'a Route, Error> {
        self.routes.try_get(id)
    }

    /// Gets a [Trip] by its `trip_id`
    pub fn get_trip<'a>(&'a self, id: &str) -> Result<&'a Trip, Error> {
        self.trips.try_get(id)
    }

    /// Gets a [Service] by its `service_id`
    pub fn get_service<'a>(&'a self, id: &str) -> Result<&'a Service, Error> {
        self.services.try_get(id)
    }

    /// Gets a [Shape] by its `shape_id`
    pub fn get_shape<'a>(&'a self, id: &str) -> Result<&'a Shape, Error> {
        self.shapes.try_get(id)
    }

    /// Gets a [FareAttribute] by its `fare_id`
    pub fn get_fare_attribute<'a>(&'a self, id: &str) -> Result<&'a FareAttribute, Error> {
        self.fare_attributes.try_get(id)
    }
}
