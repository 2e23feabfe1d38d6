use crate::objects::*;
use crate::{Error, Feed, ParseOptions};
use chrono::NaiveDate;
use rgb::RGB8;
use std::collections::BTreeMap;
use std::io::Write;

fn basic() -> Feed {
    Feed::from_path("fixtures/basic").expect("impossible to read gtfs")
}

/// The smallest feed with every file, one object of each kind
fn minimal_feed() -> BTreeMap<&'static str, String> {
    let files = [
        (
            "agency.txt",
            "agency_id,agency_name,agency_url,agency_timezone\n\
             agency,Agency,http://example.com,Europe/Paris\n",
        ),
        (
            "feed_info.txt",
            "feed_publisher_name,feed_publisher_url,feed_lang\n\
             Publisher,http://example.com,en\n",
        ),
        (
            "stops.txt",
            "stop_id,stop_name,stop_lat,stop_lon,location_type,parent_station\n\
             stop,Stop,48.0,2.0,0,\n",
        ),
        (
            "shapes.txt",
            "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence,shape_dist_traveled\n\
             shape,48.0,2.0,1,0\n\
             shape,48.1,2.1,2,10\n",
        ),
        (
            "routes.txt",
            "route_id,agency_id,route_short_name,route_long_name,route_type\n\
             route,agency,R,Route,3\n",
        ),
        (
            "calendar.txt",
            "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\n\
             service,1,1,1,1,1,0,0,20200101,20201231\n",
        ),
        (
            "trips.txt",
            "route_id,service_id,trip_id,shape_id\n\
             route,service,trip,shape\n",
        ),
        (
            "stop_times.txt",
            "trip_id,arrival_time,departure_time,stop_id,stop_sequence,shape_dist_traveled\n\
             trip,10:00:00,10:00:00,stop,1,0\n\
             trip,10:10:00,10:10:00,stop,2,10\n",
        ),
        (
            "fare_attributes.txt",
            "fare_id,price,currency_type,payment_method,transfers\n\
             fare,2.0,EUR,0,0\n",
        ),
        ("fare_rules.txt", "fare_id,route_id\nfare,route\n"),
        (
            "frequencies.txt",
            "trip_id,start_time,end_time,headway_secs\n\
             trip,06:00:00,09:00:00,600\n",
        ),
        (
            "transfers.txt",
            "from_stop_id,to_stop_id,transfer_type\n\
             stop,stop,0\n",
        ),
    ];
    files
        .iter()
        .map(|(name, content)| (*name, content.to_string()))
        .collect()
}

fn write_dir(files: &BTreeMap<&'static str, String>) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("impossible to create a temporary directory");
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).expect("impossible to write the file");
    }
    dir
}

fn write_zip(files: &BTreeMap<&'static str, String>, folder: &str, path: &std::path::Path) {
    let file = std::fs::File::create(path).expect("impossible to create the archive");
    let mut zip = zip::ZipWriter::new(file);
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in files {
        zip.start_file(format!("{}{}", folder, name), options)
            .unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn parse(files: &BTreeMap<&'static str, String>, options: ParseOptions) -> Result<Feed, Error> {
    let dir = write_dir(files);
    options.parse(dir.path())
}

fn strict() -> ParseOptions {
    ParseOptions::default()
}

fn parse_error(result: Result<Feed, Error>) -> crate::ParseError {
    match result {
        Err(Error::Parse(e)) => e,
        Err(e) => panic!("unexpected error {:?}", e),
        Ok(_) => panic!("the feed should not be valid"),
    }
}

#[test]
fn read_agencies() {
    let feed = basic();
    let agency = feed.get_agency("1").unwrap();
    assert_eq!("BIBUS", agency.name);
    assert_eq!("http://www.bibus.fr", agency.url);
    assert_eq!("Europe/Paris", agency.timezone);
    assert_eq!(Some("fr".to_owned()), agency.lang);
}

#[test]
fn read_feed_info() {
    let feed = basic();
    assert_eq!(1, feed.feed_infos.len());
    assert_eq!("SNCF", feed.feed_infos[0].publisher_name);
    assert_eq!(
        Some(NaiveDate::from_ymd_opt(2018, 7, 9).unwrap()),
        feed.feed_infos[0].start_date
    );
    assert_eq!(Some("0.3".to_owned()), feed.feed_infos[0].version);
}

#[test]
fn read_stop() {
    let feed = basic();
    assert_eq!(4, feed.stops.len());
    assert_eq!(
        LocationType::StopArea,
        feed.get_stop("stop1").unwrap().location_type
    );
    // the parent station is declared after its child
    let stop2 = feed.get_stop("stop2").unwrap();
    assert_eq!(Some("stop1"), stop2.parent_station.as_deref());
    assert_eq!("Stop Area", feed.parent_station(stop2).unwrap().name);
    assert_eq!(Availability::Available, stop2.wheelchair_boarding);
    assert_eq!(
        Availability::NotAvailable,
        feed.get_stop("stop3").unwrap().wheelchair_boarding
    );
    assert_eq!("", feed.get_stop("stop3").unwrap().description);
    assert!(feed.get_stop("Utopia").is_err());
}

#[test]
fn read_routes() {
    let feed = basic();
    assert_eq!(2, feed.routes.len());
    let route = feed.get_route("1").unwrap();
    assert_eq!(RouteType::Bus, route.route_type);
    assert_eq!(RGB8::new(255, 0, 0), route.color);
    assert_eq!(RGB8::new(255, 255, 255), route.text_color);
    assert_eq!("100 Southbound", format!("{}", route));

    let route = feed.get_route("2").unwrap();
    assert_eq!(RouteType::Other(700), route.route_type);
    assert_eq!(RGB8::new(255, 255, 255), route.color);
    assert_eq!(RGB8::new(0, 0, 0), route.text_color);
    // the only agency of the feed
    assert_eq!(Some("1"), route.agency.as_deref());
}

#[test]
fn read_services() {
    let feed = basic();
    assert_eq!(2, feed.services.len());
    let service1 = feed.get_service("service1").unwrap();
    assert!(!service1.monday);
    assert!(service1.saturday);
    assert_eq!(
        Some(&Exception::Deleted),
        service1
            .exceptions
            .get(&NaiveDate::from_ymd_opt(2017, 1, 1).unwrap())
    );
    // only defined in calendar_dates.txt
    let service2 = feed.get_service("service2").unwrap();
    assert_eq!(None, service2.start_date);
    assert!(service2.is_active_on(NaiveDate::from_ymd_opt(2017, 1, 1).unwrap()));
    assert!(!service2.is_active_on(NaiveDate::from_ymd_opt(2017, 1, 2).unwrap()));
}

#[test]
fn trip_days() {
    let feed = basic();
    let start = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
    assert_eq!(vec![6, 7, 13, 14], feed.trip_days("service1", start));
    assert_eq!(vec![0], feed.trip_days("service2", start));
    assert!(feed.trip_days("unknown", start).is_empty());
}

#[test]
fn read_shapes() {
    let feed = basic();
    let shape = feed.get_shape("A_shp").unwrap();
    let sequences: Vec<u32> = shape.points.iter().map(|p| p.sequence).collect();
    assert_eq!(vec![0, 6, 7], sequences);
    assert_eq!(Some(3.2), shape.points[1].dist_traveled);
}

#[test]
fn read_trips() {
    let feed = basic();
    assert_eq!(2, feed.trips.len());
    let trip = feed.get_trip("trip1").unwrap();
    assert_eq!("1", trip.route.as_str());
    assert_eq!("service1", trip.service.as_str());
    assert_eq!(Some("A_shp"), trip.shape.as_deref());
    assert_eq!(Some(DirectionType::Outbound), trip.direction_id);
    assert_eq!(Availability::Available, trip.wheelchair_accessible);
    assert_eq!(BikesAllowedType::NoBikeInfo, trip.bikes_allowed);
    assert_eq!(
        BikesAllowedType::NoBikesAllowed,
        feed.get_trip("trip2").unwrap().bikes_allowed
    );
}

#[test]
fn read_stop_times() {
    let feed = basic();
    let stop_times = &feed.get_trip("trip1").unwrap().stop_times;
    assert_eq!(2, stop_times.len());
    assert_eq!("stop2", stop_times[0].stop.as_str());
    assert_eq!(Some(14 * 3600), stop_times[0].arrival_time);
    assert_eq!(PickupDropOffType::Regular, stop_times[0].pickup_type);
    assert_eq!(PickupDropOffType::NotAvailable, stop_times[0].drop_off_type);
    assert_eq!(PickupDropOffType::ArrangeByPhone, stop_times[1].pickup_type);
    assert_eq!(PickupDropOffType::Regular, stop_times[1].drop_off_type);
    assert_eq!(TimepointType::Exact, stop_times[1].timepoint);

    let stop_times = &feed.get_trip("trip2").unwrap().stop_times;
    assert_eq!(Some(8 * 3600), stop_times[0].arrival_time);
    assert_eq!(Some(8 * 3600 + 60), stop_times[0].departure_time);
}

#[test]
fn read_frequencies() {
    let feed = basic();
    let trip = feed.get_trip("trip1").unwrap();
    assert_eq!(1, trip.frequencies.len());
    assert_eq!(9 * 3600, trip.frequencies[0].start_time);
    assert_eq!(1800, trip.frequencies[0].headway_secs);
    assert!(!trip.frequencies[0].exact_times);
}

#[test]
fn read_fare_attributes() {
    let feed = basic();
    let fare = feed.get_fare_attribute("50").unwrap();
    assert_eq!(1.5, fare.price);
    assert_eq!("EUR", fare.currency);
    assert_eq!(PaymentMethod::PreBoarding, fare.payment_method);
    assert_eq!(Transfers::Unlimited, fare.transfers);
    assert_eq!(Some(3600), fare.transfer_duration);
    assert_eq!(1, fare.rules.len());
    assert_eq!(Some("1"), fare.rules[0].route.as_deref());
}

#[test]
fn read_transfers() {
    let feed = basic();
    assert_eq!(1, feed.transfers.len());
    assert_eq!("stop2", feed.transfers[0].from_stop.as_str());
    assert_eq!("stop4", feed.transfers[0].to_stop.as_str());
    assert_eq!(TransferType::MinTime, feed.transfers[0].transfer_type);
    assert_eq!(Some(60), feed.transfers[0].min_transfer_time);
}

#[test]
fn serialization() {
    let feed = basic();
    let json = serde_json::to_value(&feed).unwrap();
    assert_eq!("FF0000", json["routes"]["1"]["color"]);
    assert_eq!(3, json["routes"]["1"]["route_type"]);
    assert_eq!("stop1", json["stops"]["stop2"]["parent_station"]);
    assert_eq!(
        "14:00:00",
        json["trips"]["trip1"]["stop_times"][0]["arrival_time"]
    );
    assert_eq!("2", json["services"]["service1"]["exceptions"]["20170101"]);
}

#[test]
fn minimal_feed_is_read() {
    let feed = parse(&minimal_feed(), strict()).unwrap();
    assert_eq!(1, feed.agencies.len());
    assert_eq!(1, feed.feed_infos.len());
    assert_eq!(1, feed.stops.len());
    assert_eq!(1, feed.shapes.len());
    assert_eq!(1, feed.routes.len());
    assert_eq!(1, feed.services.len());
    assert_eq!(1, feed.trips.len());
    assert_eq!(1, feed.fare_attributes.len());
    assert_eq!(1, feed.transfers.len());

    let trip = feed.get_trip("trip").unwrap();
    let sequences: Vec<u32> = trip.stop_times.iter().map(|st| st.stop_sequence).collect();
    assert_eq!(vec![1, 2], sequences);
    assert_eq!(1, trip.frequencies.len());
}

#[test]
fn invalid_record_is_fatal_by_default() {
    let mut files = minimal_feed();
    files.insert(
        "stops.txt",
        "stop_id,stop_name,stop_lat,stop_lon\n\
         stop,Stop,48.0,2.0\n\
         bad,Bad,north,2.0\n"
            .to_owned(),
    );
    let err = parse_error(parse(&files, strict()));
    assert_eq!("stops.txt", err.file_name);
    assert_eq!(3, err.line);
    assert_eq!(
        "stops.txt:3: field 'stop_lat': 'north' is not valid: invalid float literal",
        err.to_string()
    );

    let feed = parse(&files, strict().use_default_on_error(true)).unwrap();
    assert_eq!(0., feed.get_stop("bad").unwrap().latitude);

    let feed = parse(&files, strict().drop_erroneous(true)).unwrap();
    assert!(feed.get_stop("bad").is_err());
    assert!(feed.get_stop("stop").is_ok());
}

#[test]
fn dangling_reference() {
    let mut files = minimal_feed();
    files.insert(
        "trips.txt",
        "route_id,service_id,trip_id,shape_id\n\
         route,service,trip,shape\n\
         unknown_route,service,trip2,\n"
            .to_owned(),
    );
    let err = parse_error(parse(&files, strict()));
    assert_eq!(
        "trips.txt:3: field 'route_id': no route with id 'unknown_route'",
        err.to_string()
    );

    // there is no default for the route of a trip
    let err = parse_error(parse(&files, strict().use_default_on_error(true)));
    assert_eq!(("trips.txt".to_owned(), 3), (err.file_name, err.line));

    let feed = parse(&files, strict().drop_erroneous(true)).unwrap();
    assert_eq!(1, feed.trips.len());
    assert!(feed.get_trip("trip2").is_err());
}

#[test]
fn optional_reference_default() {
    let mut files = minimal_feed();
    files.insert(
        "trips.txt",
        "route_id,service_id,trip_id,shape_id\n\
         route,service,trip,unknown_shape\n"
            .to_owned(),
    );
    files.insert(
        "routes.txt",
        "route_id,agency_id,route_short_name,route_long_name,route_type,route_color\n\
         route,agency,R,Route,3,red\n"
            .to_owned(),
    );
    let err = parse_error(parse(&files, strict()));
    assert_eq!(("routes.txt".to_owned(), 2), (err.file_name, err.line));

    let feed = parse(&files, strict().use_default_on_error(true)).unwrap();
    assert_eq!(None, feed.get_trip("trip").unwrap().shape);
    assert_eq!(RGB8::new(255, 255, 255), feed.get_route("route").unwrap().color);
}

#[test]
fn non_increasing_shape_distance() {
    let mut files = minimal_feed();
    files.insert(
        "shapes.txt",
        "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence,shape_dist_traveled\n\
         shape,48.0,2.0,1,0\n\
         shape,48.1,2.1,2,10\n\
         shape,48.2,2.2,3,5\n\
         shape,48.3,2.3,4,20\n"
            .to_owned(),
    );
    let err = parse_error(parse(&files, strict()));
    assert_eq!(("shapes.txt".to_owned(), 4), (err.file_name.clone(), err.line));
    assert_eq!(
        "In shape 'shape' for point with seq=3 shape_dist_traveled does not increase along with the sequence (10 > 5)",
        err.message
    );

    let feed = parse(&files, strict().use_default_on_error(true)).unwrap();
    let points = &feed.get_shape("shape").unwrap().points;
    assert_eq!(4, points.len());
    assert_eq!(None, points[2].dist_traveled);
    assert_eq!(Some(20.), points[3].dist_traveled);

    let feed = parse(&files, strict().drop_erroneous(true)).unwrap();
    let sequences: Vec<u32> = feed
        .get_shape("shape")
        .unwrap()
        .points
        .iter()
        .map(|p| p.sequence)
        .collect();
    assert_eq!(vec![1, 2, 4], sequences);
}

#[test]
fn non_increasing_stop_time_distance() {
    let mut files = minimal_feed();
    files.insert(
        "stop_times.txt",
        "trip_id,arrival_time,departure_time,stop_id,stop_sequence,shape_dist_traveled\n\
         trip,10:00:00,10:00:00,stop,1,10\n\
         trip,10:10:00,10:10:00,stop,2,5\n\
         trip,10:20:00,10:20:00,stop,3,20\n"
            .to_owned(),
    );
    let err = parse_error(parse(&files, strict()));
    assert_eq!(("stop_times.txt".to_owned(), 3), (err.file_name.clone(), err.line));
    assert!(err.message.ends_with("(10 > 5)"), "{}", err.message);

    let feed = parse(&files, strict().use_default_on_error(true)).unwrap();
    let distances: Vec<Option<f32>> = feed
        .get_trip("trip")
        .unwrap()
        .stop_times
        .iter()
        .map(|st| st.shape_dist_traveled)
        .collect();
    assert_eq!(vec![Some(10.), None, Some(20.)], distances);

    let feed = parse(&files, strict().drop_erroneous(true)).unwrap();
    let sequences: Vec<u32> = feed
        .get_trip("trip")
        .unwrap()
        .stop_times
        .iter()
        .map(|st| st.stop_sequence)
        .collect();
    assert_eq!(vec![1, 3], sequences);
}

#[test]
fn oversized_time_is_an_invalid_field() {
    let mut files = minimal_feed();
    files.insert(
        "stop_times.txt",
        "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
         trip,10:00:00,10:00:00,stop,1\n\
         trip,5000000:00:00,5000000:00:00,stop,2\n"
            .to_owned(),
    );
    let err = parse_error(parse(&files, strict()));
    assert_eq!(("stop_times.txt".to_owned(), 3), (err.file_name.clone(), err.line));

    let feed = parse(&files, strict().drop_erroneous(true)).unwrap();
    assert_eq!(1, feed.get_trip("trip").unwrap().stop_times.len());
}

#[test]
fn stop_time_before_previous_departure() {
    let mut files = minimal_feed();
    files.insert(
        "stop_times.txt",
        "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
         trip,10:00:00,10:05:00,stop,1\n\
         trip,10:02:00,10:03:00,stop,2\n\
         trip,10:10:00,10:10:00,stop,3\n"
            .to_owned(),
    );
    let err = parse_error(parse(&files, strict()));
    assert_eq!(("stop_times.txt".to_owned(), 3), (err.file_name, err.line));

    // a time cannot be guessed
    assert!(parse(&files, strict().use_default_on_error(true)).is_err());

    let feed = parse(&files, strict().drop_erroneous(true)).unwrap();
    let sequences: Vec<u32> = feed
        .get_trip("trip")
        .unwrap()
        .stop_times
        .iter()
        .map(|st| st.stop_sequence)
        .collect();
    assert_eq!(vec![1, 3], sequences);
}

#[test]
fn duplicates() {
    let mut files = minimal_feed();
    files.insert(
        "stop_times.txt",
        "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
         trip,10:00:00,10:00:00,stop,1\n\
         trip,11:00:00,11:00:00,stop,1\n"
            .to_owned(),
    );
    files.insert(
        "stops.txt",
        "stop_id,stop_name,stop_lat,stop_lon\n\
         stop,Stop,48.0,2.0\n\
         stop,Other stop,49.0,3.0\n"
            .to_owned(),
    );
    let err = parse_error(parse(&files, strict()));
    assert_eq!(
        "stops.txt:3: field 'stop_id': 'stop' is already defined",
        err.to_string()
    );

    let feed = parse(&files, strict().drop_erroneous(true)).unwrap();
    assert_eq!("Stop", feed.get_stop("stop").unwrap().name);
    let stop_times = &feed.get_trip("trip").unwrap().stop_times;
    assert_eq!(1, stop_times.len());
    assert_eq!(Some(10 * 3600), stop_times[0].arrival_time);
}

#[test]
fn unknown_parent_station() {
    let mut files = minimal_feed();
    files.insert(
        "stops.txt",
        "stop_id,stop_name,stop_lat,stop_lon,location_type,parent_station\n\
         stop,Stop,48.0,2.0,0,\n\
         child,Child,48.0,2.0,1,missing\n\
         grandchild,Grandchild,48.0,2.0,0,child\n"
            .to_owned(),
    );
    let err = parse_error(parse(&files, strict()));
    assert_eq!(
        "stops.txt:3: (for stop id child) no station with id missing found, cannot use as parent station",
        err.to_string()
    );

    let feed = parse(&files, strict().use_default_on_error(true)).unwrap();
    assert_eq!(None, feed.get_stop("child").unwrap().parent_station);
    assert_eq!(
        Some("child"),
        feed.get_stop("grandchild").unwrap().parent_station.as_deref()
    );

    // the stops depending on a dropped stop are dropped too
    let feed = parse(&files, strict().drop_erroneous(true)).unwrap();
    assert_eq!(1, feed.stops.len());
    assert!(feed.get_stop("stop").is_ok());
}

#[test]
fn stop_cannot_be_its_own_parent() {
    let mut files = minimal_feed();
    files.insert(
        "stops.txt",
        "stop_id,stop_name,stop_lat,stop_lon,parent_station\n\
         stop,Stop,48.0,2.0,stop\n"
            .to_owned(),
    );
    let err = parse_error(parse(&files, strict()));
    assert_eq!(("stops.txt".to_owned(), 2), (err.file_name, err.line));
}

#[test]
fn dry_run() {
    let feed = parse(&minimal_feed(), strict().dry_run(true)).unwrap();

    for (kind, placeholder) in [
        ("shape", feed.shapes.is_placeholder("shape")),
        ("route", feed.routes.is_placeholder("route")),
        ("service", feed.services.is_placeholder("service")),
        ("trip", feed.trips.is_placeholder("trip")),
    ] {
        assert!(placeholder, "the {} should not be kept", kind);
    }
    assert!(feed.get_trip("trip").is_err());

    assert!(feed.get_agency("agency").is_ok());
    assert!(feed.get_stop("stop").is_ok());
    assert_eq!(1, feed.transfers.len());
    assert_eq!(1, feed.feed_infos.len());
    // the route of the rule is still a valid reference
    let fare = feed.get_fare_attribute("fare").unwrap();
    assert_eq!(Some("route"), fare.rules[0].route.as_deref());
}

#[test]
fn dry_run_still_validates() {
    let mut files = minimal_feed();
    files.insert(
        "trips.txt",
        "route_id,service_id,trip_id,shape_id\n\
         route,unknown_service,trip,shape\n"
            .to_owned(),
    );
    let err = parse_error(parse(&files, strict().dry_run(true)));
    assert_eq!(("trips.txt".to_owned(), 2), (err.file_name, err.line));
}

#[test]
fn missing_files() {
    let mut files = minimal_feed();
    files.remove("stops.txt");
    match parse(&files, strict().drop_erroneous(true)) {
        Err(Error::MissingFile(file)) => assert_eq!("stops.txt", file),
        r => panic!("unexpected result {:?}", r.map(|_| ())),
    }

    // optional files
    let mut files = minimal_feed();
    for optional in [
        "feed_info.txt",
        "shapes.txt",
        "fare_attributes.txt",
        "fare_rules.txt",
        "frequencies.txt",
        "transfers.txt",
    ] {
        files.remove(optional);
    }
    files.insert(
        "trips.txt",
        "route_id,service_id,trip_id\nroute,service,trip\n".to_owned(),
    );
    let feed = parse(&files, strict()).unwrap();
    assert!(feed.shapes.is_empty());
    assert!(feed.transfers.is_empty());
}

#[test]
fn calendar_files() {
    let mut files = minimal_feed();
    files.remove("calendar.txt");
    files.insert(
        "calendar_dates.txt",
        "service_id,date,exception_type\nservice,20200101,1\n".to_owned(),
    );
    let feed = parse(&files, strict()).unwrap();
    assert_eq!(1, feed.get_service("service").unwrap().exceptions.len());

    files.remove("calendar_dates.txt");
    match parse(&files, strict()) {
        Err(Error::MissingFile(file)) => assert_eq!("calendar.txt", file),
        r => panic!("unexpected result {:?}", r.map(|_| ())),
    }
}

#[test]
fn malformed_csv_is_always_fatal() {
    let mut files = minimal_feed();
    files.insert(
        "stops.txt",
        "stop_id,stop_name,stop_lat,stop_lon\n\
         stop,Stop,48.0,2.0\n\
         other,Other,48.0,2.0,extra\n"
            .to_owned(),
    );
    let options = strict().use_default_on_error(true).drop_erroneous(true);
    let err = parse(&files, options).unwrap_err();
    assert!(matches!(err, Error::CSVError { .. }));
    assert_eq!(Some(("stops.txt", 3)), err.location());
}

#[test]
fn bom_is_ignored() {
    let mut files = minimal_feed();
    let agencies = format!("\u{feff}{}", files["agency.txt"]);
    files.insert("agency.txt", agencies);
    let feed = parse(&files, strict()).unwrap();
    assert!(feed.get_agency("agency").is_ok());
}

#[test]
fn archive_and_directory_are_equal() {
    let files = minimal_feed();
    let from_dir = parse(&files, strict()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("gtfs.zip");
    write_zip(&files, "", &archive);
    assert_eq!(from_dir, ParseOptions::default().parse(&archive).unwrap());

    // files in a folder of the archive
    let archive = dir.path().join("subdirectory.zip");
    write_zip(&files, "gtfs/", &archive);
    assert_eq!(from_dir, Feed::from_path(&archive).unwrap());
}

#[test]
fn archive_root_file_is_preferred() {
    let mut files = minimal_feed();
    files.insert(
        "old/stops.txt",
        "stop_id,stop_name,stop_lat,stop_lon\n\
         stop,Old stop,48.0,2.0\n"
            .to_owned(),
    );
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("gtfs.zip");
    write_zip(&files, "", &archive);
    let feed = Feed::from_path(&archive).unwrap();
    assert_eq!("Stop", feed.get_stop("stop").unwrap().name);
}

#[test]
fn invalid_path() {
    match Feed::from_path("fixtures/does_not_exist") {
        Err(Error::NotFileNorDirectory(_)) => {}
        r => panic!("unexpected result {:?}", r.map(|_| ())),
    }
}
