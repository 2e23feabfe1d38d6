//! Builds the objects of the [Feed] from the records of each file
//!
//! Every kind of row implements [Materialize]: `build` declares how the columns are
//! read and which already loaded objects are referenced, `insert` adds the result to
//! the feed. Errors returned here are handled by the parse policy of the reader.
use crate::fields::Fields;
use crate::objects::*;
use crate::serde_helpers::{default_route_color, default_route_text_color};
use crate::{Feed, FieldError};
use std::collections::HashMap;

/// A `parent_station` to resolve once all the stops are read
pub(crate) struct PendingParent {
    pub(crate) stop: Id<Stop>,
    pub(crate) parent: String,
    pub(crate) line: u64,
}

/// The feed being built and what is needed to check it afterwards
#[derive(Default)]
pub(crate) struct ParseState {
    pub(crate) feed: Feed,
    pub(crate) pending_parents: Vec<PendingParent>,
    // Source line of each shape point and stop time, to report consistency errors
    pub(crate) shape_lines: HashMap<(Id<Shape>, u32), u64>,
    pub(crate) stop_time_lines: HashMap<(Id<Trip>, u32), u64>,
}

pub(crate) trait Materialize: Sized {
    /// Reads a record, only consulting objects of the files read before
    fn build(fields: &Fields, feed: &Feed) -> Result<Self, FieldError>;
    /// Adds the built row to the feed
    fn insert(self, state: &mut ParseState, line: u64) -> Result<(), FieldError>;
}

impl Materialize for Agency {
    fn build(fields: &Fields, _feed: &Feed) -> Result<Self, FieldError> {
        Ok(Agency {
            id: fields.or("agency_id", String::new())?,
            name: fields.required("agency_name")?,
            url: fields.required("agency_url")?,
            timezone: fields.required("agency_timezone")?,
            lang: fields.optional("agency_lang")?,
            phone: fields.optional("agency_phone")?,
            fare_url: fields.optional("agency_fare_url")?,
            email: fields.optional("agency_email")?,
        })
    }

    fn insert(self, state: &mut ParseState, _line: u64) -> Result<(), FieldError> {
        state.feed.agencies.insert(self).map(|_| ())
    }
}

impl Materialize for FeedInfo {
    fn build(fields: &Fields, _feed: &Feed) -> Result<Self, FieldError> {
        Ok(FeedInfo {
            publisher_name: fields.required("feed_publisher_name")?,
            publisher_url: fields.required("feed_publisher_url")?,
            lang: fields.required("feed_lang")?,
            start_date: fields.optional_date("feed_start_date")?,
            end_date: fields.optional_date("feed_end_date")?,
            version: fields.optional("feed_version")?,
            contact_email: fields.optional("feed_contact_email")?,
            contact_url: fields.optional("feed_contact_url")?,
        })
    }

    fn insert(self, state: &mut ParseState, _line: u64) -> Result<(), FieldError> {
        state.feed.feed_infos.push(self);
        Ok(())
    }
}

/// A stop with its yet unresolved parent station
pub(crate) struct StopRow {
    stop: Stop,
    parent_station: Option<String>,
}

impl Materialize for StopRow {
    fn build(fields: &Fields, _feed: &Feed) -> Result<Self, FieldError> {
        let location_type: LocationType = fields.or("location_type", LocationType::default())?;
        // Generic nodes and boarding areas do not need coordinates
        let (latitude, longitude) = match location_type {
            LocationType::GenericNode | LocationType::BoardingArea => {
                (fields.or("stop_lat", 0.)?, fields.or("stop_lon", 0.)?)
            }
            _ => (fields.required("stop_lat")?, fields.required("stop_lon")?),
        };
        let stop = Stop {
            id: fields.id("stop_id")?,
            code: fields.optional("stop_code")?,
            name: fields.or("stop_name", String::new())?,
            description: fields.or("stop_desc", String::new())?,
            location_type,
            parent_station: None,
            zone_id: fields.optional("zone_id")?,
            url: fields.optional("stop_url")?,
            longitude,
            latitude,
            timezone: fields.optional("stop_timezone")?,
            wheelchair_boarding: fields.or("wheelchair_boarding", Availability::default())?,
            platform_code: fields.optional("platform_code")?,
        };
        Ok(StopRow {
            stop,
            parent_station: fields.raw("parent_station").map(str::to_owned),
        })
    }

    fn insert(self, state: &mut ParseState, line: u64) -> Result<(), FieldError> {
        let id = state.feed.stops.insert(self.stop)?;
        if let Some(parent) = self.parent_station {
            state.pending_parents.push(PendingParent {
                stop: id,
                parent,
                line,
            });
        }
        Ok(())
    }
}

/// One point of a shape
pub(crate) struct ShapePointRow {
    shape_id: String,
    point: ShapePoint,
}

impl Materialize for ShapePointRow {
    fn build(fields: &Fields, _feed: &Feed) -> Result<Self, FieldError> {
        Ok(ShapePointRow {
            shape_id: fields.id("shape_id")?,
            point: ShapePoint {
                latitude: fields.required("shape_pt_lat")?,
                longitude: fields.required("shape_pt_lon")?,
                sequence: fields.strict("shape_pt_sequence")?,
                dist_traveled: fields.optional("shape_dist_traveled")?,
            },
        })
    }

    fn insert(self, state: &mut ParseState, line: u64) -> Result<(), FieldError> {
        let shape_id = self.shape_id;
        let shapes = &mut state.feed.shapes;
        shapes.entry_or_insert_with(&shape_id, || Shape {
            id: shape_id.clone(),
            points: Vec::new(),
        });
        let key = match shapes.get_id(&shape_id) {
            Some(id) => (id, self.point.sequence),
            None => return Err(FieldError::missing("shape_id")),
        };
        if state.shape_lines.contains_key(&key) {
            return Err(FieldError::duplicate(
                "shape_pt_sequence",
                format!("{} (shape {})", key.1, shape_id),
            ));
        }
        if let Some(shape) = shapes.get_mut(&key.0) {
            shape.points.push(self.point);
        }
        state.shape_lines.insert(key, line);
        Ok(())
    }
}

impl Materialize for Route {
    fn build(fields: &Fields, feed: &Feed) -> Result<Self, FieldError> {
        // The agency can be omitted when there is only one
        let agency = match fields.raw("agency_id") {
            None if feed.agencies.len() == 1 => feed.agencies.ids().next().cloned(),
            _ => fields.reference("agency_id", "agency", &feed.agencies)?,
        };
        Ok(Route {
            id: fields.id("route_id")?,
            agency,
            short_name: fields.or("route_short_name", String::new())?,
            long_name: fields.or("route_long_name", String::new())?,
            desc: fields.optional("route_desc")?,
            route_type: fields.required("route_type")?,
            url: fields.optional("route_url")?,
            color: fields.color("route_color", default_route_color())?,
            text_color: fields.color("route_text_color", default_route_text_color())?,
            sort_order: fields.optional("route_sort_order")?,
        })
    }

    fn insert(self, state: &mut ParseState, _line: u64) -> Result<(), FieldError> {
        state.feed.routes.insert(self).map(|_| ())
    }
}

/// A weekly pattern from `calendar.txt`
pub(crate) struct CalendarRow(Service);

impl Materialize for CalendarRow {
    fn build(fields: &Fields, _feed: &Feed) -> Result<Self, FieldError> {
        Ok(CalendarRow(Service {
            id: fields.id("service_id")?,
            monday: fields.required("monday")?,
            tuesday: fields.required("tuesday")?,
            wednesday: fields.required("wednesday")?,
            thursday: fields.required("thursday")?,
            friday: fields.required("friday")?,
            saturday: fields.required("saturday")?,
            sunday: fields.required("sunday")?,
            start_date: Some(fields.date("start_date")?),
            end_date: Some(fields.date("end_date")?),
            exceptions: Default::default(),
        }))
    }

    fn insert(self, state: &mut ParseState, _line: u64) -> Result<(), FieldError> {
        let CalendarRow(service) = self;
        state.feed.services.insert(service).map(|_| ())
    }
}

/// An exception date from `calendar_dates.txt`
pub(crate) struct CalendarDateRow {
    service_id: String,
    date: chrono::NaiveDate,
    exception_type: Exception,
}

impl Materialize for CalendarDateRow {
    fn build(fields: &Fields, _feed: &Feed) -> Result<Self, FieldError> {
        Ok(CalendarDateRow {
            service_id: fields.id("service_id")?,
            date: fields.date("date")?,
            exception_type: fields.strict("exception_type")?,
        })
    }

    fn insert(self, state: &mut ParseState, _line: u64) -> Result<(), FieldError> {
        let service_id = self.service_id;
        let service = state
            .feed
            .services
            .entry_or_insert_with(&service_id, || Service::new(&service_id))
            .ok_or_else(|| FieldError::duplicate("service_id", service_id.as_str()))?;
        if service.exceptions.contains_key(&self.date) {
            return Err(FieldError::duplicate(
                "date",
                format!("{} (service {})", self.date.format("%Y%m%d"), service_id),
            ));
        }
        service.exceptions.insert(self.date, self.exception_type);
        Ok(())
    }
}

impl Materialize for Trip {
    fn build(fields: &Fields, feed: &Feed) -> Result<Self, FieldError> {
        Ok(Trip {
            id: fields.id("trip_id")?,
            route: fields.anchor("route_id", "route", &feed.routes)?,
            service: fields.anchor("service_id", "service", &feed.services)?,
            stop_times: Vec::new(),
            headsign: fields.optional("trip_headsign")?,
            short_name: fields.optional("trip_short_name")?,
            direction_id: fields.optional("direction_id")?,
            block_id: fields.optional("block_id")?,
            shape: fields.reference("shape_id", "shape", &feed.shapes)?,
            wheelchair_accessible: fields.or("wheelchair_accessible", Availability::default())?,
            bikes_allowed: fields.or("bikes_allowed", BikesAllowedType::default())?,
            frequencies: Vec::new(),
        })
    }

    fn insert(self, state: &mut ParseState, _line: u64) -> Result<(), FieldError> {
        state.feed.trips.insert(self).map(|_| ())
    }
}

/// A stop time with the trip it belongs to
pub(crate) struct StopTimeRow {
    trip: Id<Trip>,
    stop_time: StopTime,
}

impl Materialize for StopTimeRow {
    fn build(fields: &Fields, feed: &Feed) -> Result<Self, FieldError> {
        Ok(StopTimeRow {
            trip: fields.anchor("trip_id", "trip", &feed.trips)?,
            stop_time: StopTime {
                arrival_time: fields.optional_time("arrival_time")?,
                stop: fields.anchor("stop_id", "stop", &feed.stops)?,
                departure_time: fields.optional_time("departure_time")?,
                pickup_type: fields.or("pickup_type", PickupDropOffType::default())?,
                drop_off_type: fields.or("drop_off_type", PickupDropOffType::default())?,
                stop_sequence: fields.strict("stop_sequence")?,
                stop_headsign: fields.optional("stop_headsign")?,
                shape_dist_traveled: fields.optional("shape_dist_traveled")?,
                timepoint: fields.or("timepoint", TimepointType::default())?,
            },
        })
    }

    fn insert(self, state: &mut ParseState, line: u64) -> Result<(), FieldError> {
        let key = (self.trip, self.stop_time.stop_sequence);
        if state.stop_time_lines.contains_key(&key) {
            return Err(FieldError::duplicate(
                "stop_sequence",
                format!("{} (trip {})", key.1, key.0),
            ));
        }
        if let Some(trip) = state.feed.trips.get_mut(&key.0) {
            trip.stop_times.push(self.stop_time);
        }
        state.stop_time_lines.insert(key, line);
        Ok(())
    }
}

impl Materialize for FareAttribute {
    fn build(fields: &Fields, feed: &Feed) -> Result<Self, FieldError> {
        Ok(FareAttribute {
            id: fields.id("fare_id")?,
            price: fields.required("price")?,
            currency: fields.required("currency_type")?,
            payment_method: fields.required("payment_method")?,
            transfers: fields.or("transfers", Transfers::default())?,
            agency: fields.reference("agency_id", "agency", &feed.agencies)?,
            transfer_duration: fields.optional("transfer_duration")?,
            rules: Vec::new(),
        })
    }

    fn insert(self, state: &mut ParseState, _line: u64) -> Result<(), FieldError> {
        state.feed.fare_attributes.insert(self).map(|_| ())
    }
}

/// A fare rule with the fare it applies
pub(crate) struct FareRuleRow {
    fare: Id<FareAttribute>,
    rule: FareRule,
}

impl Materialize for FareRuleRow {
    fn build(fields: &Fields, feed: &Feed) -> Result<Self, FieldError> {
        Ok(FareRuleRow {
            fare: fields.anchor("fare_id", "fare", &feed.fare_attributes)?,
            rule: FareRule {
                route: fields.reference("route_id", "route", &feed.routes)?,
                origin_id: fields.optional("origin_id")?,
                destination_id: fields.optional("destination_id")?,
                contains_id: fields.optional("contains_id")?,
            },
        })
    }

    fn insert(self, state: &mut ParseState, _line: u64) -> Result<(), FieldError> {
        if let Some(fare) = state.feed.fare_attributes.get_mut(&self.fare) {
            fare.rules.push(self.rule);
        }
        Ok(())
    }
}

/// A frequency with the trip it applies
pub(crate) struct FrequencyRow {
    trip: Id<Trip>,
    frequency: Frequency,
}

impl Materialize for FrequencyRow {
    fn build(fields: &Fields, feed: &Feed) -> Result<Self, FieldError> {
        Ok(FrequencyRow {
            trip: fields.anchor("trip_id", "trip", &feed.trips)?,
            frequency: Frequency {
                start_time: fields.time("start_time")?,
                end_time: fields.time("end_time")?,
                headway_secs: fields.required("headway_secs")?,
                exact_times: fields.or("exact_times", false)?,
            },
        })
    }

    fn insert(self, state: &mut ParseState, _line: u64) -> Result<(), FieldError> {
        // Nothing to attach to when the trips were not retained
        if let Some(trip) = state.feed.trips.get_mut(&self.trip) {
            trip.frequencies.push(self.frequency);
        }
        Ok(())
    }
}

impl Materialize for Transfer {
    fn build(fields: &Fields, feed: &Feed) -> Result<Self, FieldError> {
        Ok(Transfer {
            from_stop: fields.anchor("from_stop_id", "stop", &feed.stops)?,
            to_stop: fields.anchor("to_stop_id", "stop", &feed.stops)?,
            transfer_type: fields.or("transfer_type", TransferType::default())?,
            min_transfer_time: fields.optional("min_transfer_time")?,
        })
    }

    fn insert(self, state: &mut ParseState, _line: u64) -> Result<(), FieldError> {
        state.feed.transfers.push(self);
        Ok(())
    }
}
