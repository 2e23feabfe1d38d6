use crate::objects::Exception;
use chrono::NaiveDate;
use rgb::RGB8;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use std::collections::BTreeMap;

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s: &str = Deserialize::deserialize(deserializer)?;
    NaiveDate::parse_from_str(s, "%Y%m%d")
        .map_err(|e| de::Error::custom(format!("{}, YYYYMMDD format is expected", e)))
}

pub fn serialize_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format("%Y%m%d").to_string())
}

pub fn serialize_option_date<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        None => serializer.serialize_none(),
        Some(d) => serialize_date(d, serializer),
    }
}

pub fn serialize_exceptions<S>(
    exceptions: &BTreeMap<NaiveDate, Exception>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(exceptions.len()))?;
    for (date, exception) in exceptions {
        map.serialize_entry(&date.format("%Y%m%d").to_string(), exception)?;
    }
    map.end()
}

/// `None` when a part is not a number or when the total does not fit
pub fn parse_time_impl(h: &str, m: &str, s: &str) -> Option<u32> {
    let hours: u32 = h.parse().ok()?;
    let minutes: u32 = m.parse().ok()?;
    let seconds: u32 = s.parse().ok()?;
    hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)
}

/// Parses a `H:MM:SS` or `HH:MM:SS` time into seconds since midnight
///
/// Hours can go beyond 24 for trips ending after midnight.
pub fn parse_time(s: &str) -> Result<u32, crate::Error> {
    let mk_err = || crate::Error::InvalidTime(s.to_owned());

    if s.len() < 7 {
        Err(mk_err())
    } else {
        let mut parts = s.split(':');

        let hour = parts.next().ok_or_else(mk_err)?;
        let min = parts.next().ok_or_else(mk_err)?;
        let sec = parts.next().ok_or_else(mk_err)?;
        if parts.next().is_some() {
            return Err(mk_err());
        }

        if min.len() != 2 || sec.len() != 2 {
            return Err(mk_err());
        }

        let seconds = parse_time_impl(hour, min, sec).ok_or_else(mk_err)?;
        if min > "59" || sec > "59" {
            return Err(mk_err());
        }
        Ok(seconds)
    }
}

pub fn deserialize_time<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let s: &str = Deserialize::deserialize(deserializer)?;
    parse_time(s).map_err(de::Error::custom)
}

pub fn serialize_time<S>(time: &u32, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(
        format!(
            "{:02}:{:02}:{:02}",
            time / 3600,
            time % 3600 / 60,
            time % 60
        )
        .as_str(),
    )
}

pub fn serialize_optional_time<S>(time: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match time {
        None => serializer.serialize_none(),
        Some(t) => serialize_time(t, serializer),
    }
}

pub fn parse_color(s: &str) -> Result<RGB8, crate::Error> {
    if s.len() != 6 || !s.is_ascii() {
        return Err(crate::Error::InvalidColor(s.to_owned()));
    }
    let r =
        u8::from_str_radix(&s[0..2], 16).map_err(|_| crate::Error::InvalidColor(s.to_owned()))?;
    let g =
        u8::from_str_radix(&s[2..4], 16).map_err(|_| crate::Error::InvalidColor(s.to_owned()))?;
    let b =
        u8::from_str_radix(&s[4..6], 16).map_err(|_| crate::Error::InvalidColor(s.to_owned()))?;
    Ok(RGB8::new(r, g, b))
}

pub fn deserialize_color<'de, D>(deserializer: D) -> Result<RGB8, D::Error>
where
    D: Deserializer<'de>,
{
    let s: &str = Deserialize::deserialize(deserializer)?;
    parse_color(s).map_err(de::Error::custom)
}

pub fn serialize_color<S>(color: &RGB8, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(format!("{:02X}{:02X}{:02X}", color.r, color.g, color.b).as_str())
}

pub fn deserialize_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s: &str = Deserialize::deserialize(deserializer)?;
    match s {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(de::Error::custom(format!(
            "invalid value `{}`, expected 0 or 1",
            s
        ))),
    }
}

pub fn default_route_color() -> RGB8 {
    RGB8::new(255, 255, 255)
}

pub fn default_route_text_color() -> RGB8 {
    RGB8::new(0, 0, 0)
}

#[test]
fn test_parse_time() {
    assert_eq!(Ok(3600 + 60 + 1), parse_time("01:01:01").map_err(|e| e.to_string()));
    assert_eq!(
        Ok((172 * 3600) + (35 * 60) + 42),
        parse_time("172:35:42").map_err(|e| e.to_string())
    );
    assert_eq!(Ok(8 * 3600 + 5 * 60), parse_time("8:05:00").map_err(|e| e.to_string()));
    assert!(parse_time("8:5:00").is_err());
    assert!(parse_time("08:05").is_err());
    assert!(parse_time("08:61:00").is_err());
    assert!(parse_time("aa:bb:cc").is_err());
    // does not fit in a u32
    assert!(parse_time("5000000:00:00").is_err());
    assert!(parse_time("4294967295:00:00").is_err());
}

#[test]
fn test_serialize_time() {
    #[derive(Serialize)]
    struct Test {
        #[serde(serialize_with = "serialize_time")]
        time: u32,
    }
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.serialize(Test {
        time: (172 * 3600) + (35 * 60) + 42,
    })
    .unwrap();
    let data_out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
    assert_eq!("time\n172:35:42\n", data_out);
}

#[test]
fn test_parse_color() {
    assert_eq!(RGB8::new(0, 0, 0), parse_color("000000").unwrap());
    assert_eq!(RGB8::new(255, 0, 16), parse_color("FF0010").unwrap());
    assert!(parse_color("#FF0010").is_err());
    assert!(parse_color("GG0000").is_err());
}
