pub use crate::id::Id;
use crate::serde_helpers::*;
use chrono::{Datelike, NaiveDate, Weekday};
use rgb::RGB8;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Objects stored in a [crate::Collection], identified by a single column
pub trait WithId {
    /// Column holding the id in the GTFS file
    const ID_FIELD: &'static str;
    /// The unique id of the object
    fn id(&self) -> &str;
}

/// Describes the kind of [Stop]. See <https://gtfs.org/reference/static/#stopstxt> `location_type`
#[derive(Derivative, Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
#[derivative(Default)]
pub enum LocationType {
    /// Stop (or Platform). A location where passengers board or disembark from a transit vehicle
    #[derivative(Default)]
    #[serde(rename = "0")]
    StopPoint,
    /// Station. A physical structure or area that contains one or more platform
    #[serde(rename = "1")]
    StopArea,
    /// A location where passengers can enter or exit a station from the street
    #[serde(rename = "2")]
    StationEntrance,
    /// A location within a station, not matching any other [LocationType]
    #[serde(rename = "3")]
    GenericNode,
    /// A specific location on a platform, where passengers can board and/or alight vehicles
    #[serde(rename = "4")]
    BoardingArea,
}

/// Describes the kind of [Route]. See <https://gtfs.org/reference/static/#routestxt> `route_type`
#[derive(Derivative, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derivative(Default)]
pub enum RouteType {
    /// Tram, Streetcar, Light rail
    Tramway,
    /// Subway, Metro
    Subway,
    /// Used for intercity or long-distance travel
    Rail,
    /// Used for short- and long-distance bus routes
    #[derivative(Default)]
    Bus,
    /// Used for short- and long-distance boat service
    Ferry,
    /// Used for street-level rail cars where the cable runs beneath the vehicle
    CableCar,
    /// Aerial lift, suspended cable car
    Gondola,
    /// Any rail system designed for steep inclines
    Funicular,
    /// Trolleybus. Electric buses that draw power from overhead wires using poles
    Trolleybus,
    /// Monorail. Railway in which the track consists of a single rail or a beam
    Monorail,
    /// Extended route types (100 to 1799), see
    /// <https://developers.google.com/transit/gtfs/reference/extended-route-types>
    Other(u16),
}

impl RouteType {
    /// The GTFS code of the route type
    pub fn code(&self) -> u16 {
        match self {
            RouteType::Tramway => 0,
            RouteType::Subway => 1,
            RouteType::Rail => 2,
            RouteType::Bus => 3,
            RouteType::Ferry => 4,
            RouteType::CableCar => 5,
            RouteType::Gondola => 6,
            RouteType::Funicular => 7,
            RouteType::Trolleybus => 11,
            RouteType::Monorail => 12,
            RouteType::Other(i) => *i,
        }
    }
}

impl<'de> Deserialize<'de> for RouteType {
    fn deserialize<D>(deserializer: D) -> Result<RouteType, D::Error>
    where
        D: Deserializer<'de>,
    {
        let i = u16::deserialize(deserializer)?;
        Ok(match i {
            0 => RouteType::Tramway,
            1 => RouteType::Subway,
            2 => RouteType::Rail,
            3 => RouteType::Bus,
            4 => RouteType::Ferry,
            5 => RouteType::CableCar,
            6 => RouteType::Gondola,
            7 => RouteType::Funicular,
            11 => RouteType::Trolleybus,
            12 => RouteType::Monorail,
            100..=1799 => RouteType::Other(i),
            _ => return Err(de::Error::custom(format!("{} is out of range", i))),
        })
    }
}

impl Serialize for RouteType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(self.code())
    }
}

/// Describes if and how a traveller can board or alight the vehicle. See <https://gtfs.org/reference/static/#stop_timestxt> `pickup_type` and `dropoff_type`
#[derive(Derivative, Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
#[derivative(Default)]
pub enum PickupDropOffType {
    /// Regularly scheduled pickup or drop off (default when empty).
    #[derivative(Default)]
    #[serde(rename = "0")]
    Regular,
    /// No pickup or drop off available.
    #[serde(rename = "1")]
    NotAvailable,
    /// Must phone agency to arrange pickup or drop off.
    #[serde(rename = "2")]
    ArrangeByPhone,
    /// Must coordinate with driver to arrange pickup or drop off.
    #[serde(rename = "3")]
    CoordinateWithDriver,
}

/// Generic enum to define if a service (like wheelchair boarding) is available
#[derive(Derivative, Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
#[derivative(Default)]
pub enum Availability {
    /// No information if the service is available
    #[derivative(Default)]
    #[serde(rename = "0")]
    InformationNotAvailable,
    /// The service is available
    #[serde(rename = "1")]
    Available,
    /// The service is not available
    #[serde(rename = "2")]
    NotAvailable,
}

/// Are bikes allowed on a [Trip]
#[derive(Derivative, Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
#[derivative(Default)]
pub enum BikesAllowedType {
    /// No bike information for the trip
    #[derivative(Default)]
    #[serde(rename = "0")]
    NoBikeInfo,
    /// Vehicle being used on this particular trip can accommodate at least one bicycle
    #[serde(rename = "1")]
    AtLeastOneBike,
    /// No bicycles are allowed on this trip
    #[serde(rename = "2")]
    NoBikesAllowed,
}

/// Indicates the direction of travel for a [Trip]
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DirectionType {
    /// Travel in one direction (e.g. outbound travel).
    #[serde(rename = "0")]
    Outbound,
    /// Travel in the opposite direction (e.g. inbound travel).
    #[serde(rename = "1")]
    Inbound,
}

/// Indicates whether the times of a [StopTime] are strictly adhered to
#[derive(Derivative, Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
#[derivative(Default)]
pub enum TimepointType {
    /// Times are considered approximate
    #[serde(rename = "0")]
    Approximate,
    /// Times are considered exact
    #[derivative(Default)]
    #[serde(rename = "1")]
    Exact,
}

/// Defines if a date of `calendar_dates.txt` is added to or removed from a [Service]
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Exception {
    /// There will be a service on that day
    #[serde(rename = "1")]
    Added,
    /// There won’t be a service on that day
    #[serde(rename = "2")]
    Deleted,
}

/// Defines where a [FareAttribute] can be paid
#[derive(Derivative, Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
#[derivative(Default)]
pub enum PaymentMethod {
    /// Fare is paid on board
    #[derivative(Default)]
    #[serde(rename = "0")]
    Aboard,
    /// Fare must be paid before boarding
    #[serde(rename = "1")]
    PreBoarding,
}

/// Defines how many transfers can be done with on [FareAttribute]
#[derive(Derivative, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derivative(Default)]
pub enum Transfers {
    /// Unlimited transfers are permitted (empty field)
    #[derivative(Default)]
    Unlimited,
    /// No transfers permitted on this fare
    NoTransfer,
    /// Riders may transfer once
    UniqueTransfer,
    /// Riders may transfer twice
    TwoTransfers,
}

impl<'de> Deserialize<'de> for Transfers {
    fn deserialize<D>(deserializer: D) -> Result<Transfers, D::Error>
    where
        D: Deserializer<'de>,
    {
        // An empty field is unlimited, it never reaches this point
        let i = u16::deserialize(deserializer)?;
        Ok(match i {
            0 => Transfers::NoTransfer,
            1 => Transfers::UniqueTransfer,
            2 => Transfers::TwoTransfers,
            _ => return Err(de::Error::custom(format!("{} is out of range", i))),
        })
    }
}

impl Serialize for Transfers {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Transfers::Unlimited => serializer.serialize_none(),
            Transfers::NoTransfer => serializer.serialize_u16(0),
            Transfers::UniqueTransfer => serializer.serialize_u16(1),
            Transfers::TwoTransfers => serializer.serialize_u16(2),
        }
    }
}

/// Defines the type of a [Transfer]
#[derive(Derivative, Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
#[derivative(Default)]
pub enum TransferType {
    /// Recommended transfer point between routes
    #[derivative(Default)]
    #[serde(rename = "0")]
    Recommended,
    /// Departing vehicle waits for arriving one
    #[serde(rename = "1")]
    Timed,
    /// Transfer requires a minimum amount of time between arrival and departure to ensure a connection.
    #[serde(rename = "2")]
    MinTime,
    /// Transfer is not possible at this location
    #[serde(rename = "3")]
    Impossible,
}

/// A public transport operator. See <https://gtfs.org/reference/static/#agencytxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct Agency {
    /// Unique id, empty when the feed has a single agency without id
    pub id: String,
    /// Full name of the transit agency
    pub name: String,
    /// Full url of the transit agency.
    pub url: String,
    /// Timezone where the transit agency is located
    pub timezone: String,
    /// Primary language used by this transit agency
    pub lang: Option<String>,
    /// A voice telephone number for the specified agency
    pub phone: Option<String>,
    /// URL of a web page that allows a rider to purchase tickets or other fare instruments for that agency online
    pub fare_url: Option<String>,
    /// Email address actively monitored by the agency’s customer service department
    pub email: Option<String>,
}

impl WithId for Agency {
    const ID_FIELD: &'static str = "agency_id";
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A physical stop, station or area. See <https://gtfs.org/reference/static/#stopstxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct Stop {
    /// Unique technical identifier (not for the traveller) of the stop
    pub id: String,
    /// Short text or a number that identifies the location for riders
    pub code: Option<String>,
    /// Name of the location. Use a name that people will understand in the local and tourist vernacular
    pub name: String,
    /// Description of the location that provides useful, quality information
    pub description: String,
    /// Type of the location
    pub location_type: LocationType,
    /// Defines hierarchy between the different locations, linked after all the stops were read
    pub parent_station: Option<Id<Stop>>,
    /// Identifies the fare zone for a stop
    pub zone_id: Option<String>,
    /// URL of a web page about the location
    pub url: Option<String>,
    /// Longitude of the stop
    pub longitude: f64,
    /// Latitude of the stop
    pub latitude: f64,
    /// Timezone of the location
    pub timezone: Option<String>,
    /// Indicates whether wheelchair boardings are possible from the location
    pub wheelchair_boarding: Availability,
    /// Platform identifier for a platform stop (a stop belonging to a station)
    pub platform_code: Option<String>,
}

impl WithId for Stop {
    const ID_FIELD: &'static str = "stop_id";
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A group of trips that are displayed to riders as a single service. See <https://gtfs.org/reference/static/#routestxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct Route {
    /// Unique technical (not for the traveller) identifier for the route
    pub id: String,
    /// Agency operating the route
    pub agency: Option<Id<Agency>>,
    /// Short name of a route. This will often be a short, abstract identifier like "32", "100X", or "Green"
    pub short_name: String,
    /// Full name of a route. This name is generally more descriptive than the [Route::short_name]
    pub long_name: String,
    /// Description of a route that provides useful, quality information
    pub desc: Option<String>,
    /// Indicates the type of transportation used on a route
    pub route_type: RouteType,
    /// URL of a web page about the particular route
    pub url: Option<String>,
    /// Route color designation that matches public facing material
    #[serde(serialize_with = "serialize_color")]
    pub color: RGB8,
    /// Legible color to use for text drawn against a background of [Route::color]
    #[serde(serialize_with = "serialize_color")]
    pub text_color: RGB8,
    /// Orders the routes in a way which is ideal for presentation to customers
    pub sort_order: Option<u32>,
}

impl WithId for Route {
    const ID_FIELD: &'static str = "route_id";
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.long_name.is_empty() {
            write!(f, "{}", self.long_name)
        } else {
            write!(f, "{}", self.short_name)
        }
    }
}

/// The days a vehicle runs, built from `calendar.txt` and `calendar_dates.txt`
///
/// A service may come from a weekly pattern over a date range, from a list of
/// exception dates, or both.
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct Service {
    /// Unique technical identifier (not for the traveller) of this calendar
    pub id: String,
    /// Does the service run on mondays
    pub monday: bool,
    /// Does the service run on tuesdays
    pub tuesday: bool,
    /// Does the service run on wednesdays
    pub wednesday: bool,
    /// Does the service run on thursdays
    pub thursday: bool,
    /// Does the service run on fridays
    pub friday: bool,
    /// Does the service run on saturdays
    pub saturday: bool,
    /// Does the service run on sundays
    pub sunday: bool,
    /// Start service day, `None` if the service has no `calendar.txt` entry
    #[serde(serialize_with = "serialize_option_date")]
    pub start_date: Option<NaiveDate>,
    /// End service day, `None` if the service has no `calendar.txt` entry
    #[serde(serialize_with = "serialize_option_date")]
    pub end_date: Option<NaiveDate>,
    /// Days explicitly added or removed
    #[serde(serialize_with = "serialize_exceptions")]
    pub exceptions: BTreeMap<NaiveDate, Exception>,
}

impl WithId for Service {
    const ID_FIELD: &'static str = "service_id";
    fn id(&self) -> &str {
        &self.id
    }
}

impl Service {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            ..Default::default()
        }
    }

    /// Does the weekly pattern include this day of the week
    pub fn valid_weekday(&self, date: NaiveDate) -> bool {
        match date.weekday() {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Does the service run on this day, exceptions included
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        match self.exceptions.get(&date) {
            Some(Exception::Added) => true,
            Some(Exception::Deleted) => false,
            None => match (self.start_date, self.end_date) {
                (Some(start), Some(end)) => {
                    start <= date && date <= end && self.valid_weekday(date)
                }
                _ => false,
            },
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => write!(f, "{} - {}", start, end),
            _ => write!(f, "{} exception dates", self.exceptions.len()),
        }
    }
}

/// A point of a [Shape]
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct ShapePoint {
    /// Latitude of a shape point
    pub latitude: f64,
    /// Longitude of a shape point
    pub longitude: f64,
    /// Sequence in which the shape points connect to form the shape
    pub sequence: u32,
    /// Actual distance traveled along the shape from the first shape point to this one
    pub dist_traveled: Option<f32>,
}

impl ShapePoint {
    /// Is the distance along the shape given
    pub fn has_dist_traveled(&self) -> bool {
        self.dist_traveled.is_some()
    }
}

/// The path a vehicle travels along a route alignment. See <https://gtfs.org/reference/static/#shapestxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct Shape {
    /// Unique technical identifier (not for the traveller) for the shape
    pub id: String,
    /// Points ordered by sequence
    pub points: Vec<ShapePoint>,
}

impl WithId for Shape {
    const ID_FIELD: &'static str = "shape_id";
    fn id(&self) -> &str {
        &self.id
    }
}

/// The moment where a vehicle, running on [Trip] stops at a [Stop]. See <https://gtfs.org/reference/static/#stop_timestxt>
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StopTime {
    /// Arrival time of the stop time, in seconds since midnight of the service day
    #[serde(serialize_with = "serialize_optional_time")]
    pub arrival_time: Option<u32>,
    /// Stop where the vehicle stops
    pub stop: Id<Stop>,
    /// Departure time of the stop time, in seconds since midnight of the service day
    #[serde(serialize_with = "serialize_optional_time")]
    pub departure_time: Option<u32>,
    /// Indicates pickup method
    pub pickup_type: PickupDropOffType,
    /// Indicates drop off method
    pub drop_off_type: PickupDropOffType,
    /// Order of stops for a particular trip
    pub stop_sequence: u32,
    /// Text that appears on signage identifying the trip's destination to riders
    pub stop_headsign: Option<String>,
    /// Actual distance traveled along the associated shape, from the first stop to the stop specified in this record
    pub shape_dist_traveled: Option<f32>,
    /// Indicates if arrival and departure times for a stop are strictly adhered to by the vehicle or if they are instead approximate
    pub timepoint: TimepointType,
}

impl StopTime {
    /// Is the distance along the shape given
    pub fn has_dist_traveled(&self) -> bool {
        self.shape_dist_traveled.is_some()
    }
}

/// Timetables can be defined by the frequency of their vehicles. See <https://gtfs.org/reference/static/#frequenciestxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct Frequency {
    /// Time at which the first vehicle departs from the first stop of the trip
    #[serde(serialize_with = "serialize_time")]
    pub start_time: u32,
    /// Time at which service changes to a different headway (or ceases) at the first stop in the trip
    #[serde(serialize_with = "serialize_time")]
    pub end_time: u32,
    /// Time, in seconds, between departures from the same stop (headway) for the trip
    pub headway_secs: u32,
    /// Indicates the type of service for a trip
    pub exact_times: bool,
}

/// A Trip is a vehicle that follows a sequence of [StopTime] on certain days. See <https://gtfs.org/reference/static/#tripstxt>
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Trip {
    /// Unique technical identifier (not for the traveller) for the Trip
    pub id: String,
    /// The days when the trip will be have this [Trip::stop_times]
    pub service: Id<Service>,
    /// Route of the trip
    pub route: Id<Route>,
    /// All the [StopTime] that define the trip, ordered by sequence
    pub stop_times: Vec<StopTime>,
    /// Text that appears on signage identifying the trip's destination to riders
    pub headsign: Option<String>,
    /// Public facing text used to identify the trip to riders
    pub short_name: Option<String>,
    /// Indicates the direction of travel for a trip
    pub direction_id: Option<DirectionType>,
    /// Identifies the block to which the trip belongs
    pub block_id: Option<String>,
    /// Shape of the trip
    pub shape: Option<Id<Shape>>,
    /// Indicates wheelchair accessibility
    pub wheelchair_accessible: Availability,
    /// Indicates whether bikes are allowed
    pub bikes_allowed: BikesAllowedType,
    /// During which periods the trip runs by frequency and not by fixed timetable
    pub frequencies: Vec<Frequency>,
}

impl WithId for Trip {
    const ID_FIELD: &'static str = "trip_id";
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "route id: {}, service id: {}",
            self.route.as_str(),
            self.service.as_str()
        )
    }
}

/// Defines one possible fare. See <https://gtfs.org/reference/static/#fare_attributestxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct FareAttribute {
    /// Unique technical identifier (not for the traveller) for the FareAttribute
    pub id: String,
    /// Fare price, in the unit specified by [FareAttribute::currency]
    pub price: f64,
    /// Currency used to pay the fare.
    pub currency: String,
    /// Indicates when the fare must be paid
    pub payment_method: PaymentMethod,
    /// Indicates the number of transfers permitted on this fare
    pub transfers: Transfers,
    /// Agency for the specified fare
    pub agency: Option<Id<Agency>>,
    /// Length of time in seconds before a transfer expires
    pub transfer_duration: Option<u32>,
    /// Rules applying the fare to itineraries
    pub rules: Vec<FareRule>,
}

impl WithId for FareAttribute {
    const ID_FIELD: &'static str = "fare_id";
    fn id(&self) -> &str {
        &self.id
    }
}

/// Applies a [FareAttribute] to itineraries. See <https://gtfs.org/reference/static/#fare_rulestxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct FareRule {
    /// The fare applies to this route
    pub route: Option<Id<Route>>,
    /// The fare applies to trips starting in this fare zone
    pub origin_id: Option<String>,
    /// The fare applies to trips ending in this fare zone
    pub destination_id: Option<String>,
    /// The fare applies to trips passing through this fare zone
    pub contains_id: Option<String>,
}

/// Links two stops for a connection. See <https://gtfs.org/reference/static/#transferstxt>
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Transfer {
    /// Stop from which a connection between routes begins
    pub from_stop: Id<Stop>,
    /// Stop at which a connection between routes ends
    pub to_stop: Id<Stop>,
    /// Type of the transfer
    pub transfer_type: TransferType,
    /// Minimum time needed to make a transfer in seconds
    pub min_transfer_time: Option<u32>,
}

/// Meta-data about the feed. See <https://gtfs.org/reference/static/#feed_infotxt>
#[derive(Debug, Serialize, Default, Clone, PartialEq)]
pub struct FeedInfo {
    /// Full name of the organization that publishes the dataset.
    pub publisher_name: String,
    /// URL of the dataset publishing organization's website
    pub publisher_url: String,
    /// Default language used for the text in this dataset
    pub lang: String,
    /// The dataset provides complete and reliable schedule information for service in the period from this date
    #[serde(serialize_with = "serialize_option_date")]
    pub start_date: Option<NaiveDate>,
    /// The dataset provides complete and reliable schedule information for service in the period until this date
    #[serde(serialize_with = "serialize_option_date")]
    pub end_date: Option<NaiveDate>,
    /// String that indicates the current version of their GTFS dataset
    pub version: Option<String>,
    /// Email address for communication regarding the GTFS dataset and data publishing practices
    pub contact_email: Option<String>,
    /// URL for contact information, a web-form, support desk, or other tools for communication regarding the GTFS dataset and data publishing practices
    pub contact_url: Option<String>,
}

impl fmt::Display for FeedInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.publisher_name)
    }
}
