//! Typed access to the columns of a [Record], applying the default-value policy
//!
//! Each materializer declares its columns through [Fields]: whether a value is
//! mandatory, optional, has a default, or references an already loaded object.
//! When `use_default_on_error` is set, an invalid value is replaced by the
//! default of its declaration instead of failing the record.
use crate::record::Record;
use crate::serde_helpers::{deserialize_bool, deserialize_color, deserialize_date, deserialize_time};
use crate::{Collection, FieldError, Id};
use chrono::NaiveDate;
use log::debug;
use rgb::RGB8;
use serde::de::value::{Error as DeError, StrDeserializer};
use serde::de::{DeserializeOwned, Deserializer, Error as _, IntoDeserializer, Visitor};
use std::fmt;
use std::str::FromStr;

/// Deserializes one trimmed, non-empty csv value
///
/// Numbers are parsed from their text and booleans are `0` or `1`. Enumerations
/// are matched on their code with `#[serde(rename)]`.
struct FieldDeserializer<'a>(&'a str);

impl FieldDeserializer<'_> {
    fn number<T>(&self) -> Result<T, DeError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.0.parse().map_err(DeError::custom)
    }
}

fn not_finite() -> DeError {
    DeError::custom("a finite number is expected")
}

impl<'de> Deserializer<'de> for FieldDeserializer<'de> {
    type Error = DeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_borrowed_str(self.0)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_bool(deserialize_bool(self)?)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_u8(self.number()?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_u16(self.number()?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_u32(self.number()?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_u64(self.number()?)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_i32(self.number()?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_i64(self.number()?)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        let f: f32 = self.number()?;
        if !f.is_finite() {
            return Err(not_finite());
        }
        visitor.visit_f32(f)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        let f: f64 = self.number()?;
        if !f.is_finite() {
            return Err(not_finite());
        }
        visitor.visit_f64(f)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        let code: StrDeserializer<'de, DeError> = self.0.into_deserializer();
        visitor.visit_enum(code)
    }

    serde::forward_to_deserialize_any! {
        i8 i16 i128 u128 char str string bytes byte_buf unit unit_struct
        seq tuple tuple_struct map struct identifier ignored_any
    }
}

/// A time of the day in seconds since midnight, read as `HH:MM:SS`
#[derive(Deserialize)]
struct Time(#[serde(deserialize_with = "deserialize_time")] u32);

/// A `YYYYMMDD` date
#[derive(Deserialize)]
struct Date(#[serde(deserialize_with = "deserialize_date")] NaiveDate);

/// A `RRGGBB` color
#[derive(Deserialize)]
struct Color(#[serde(deserialize_with = "deserialize_color")] RGB8);

pub(crate) struct Fields<'a> {
    record: &'a Record<'a>,
    use_default_on_error: bool,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(record: &'a Record<'a>, use_default_on_error: bool) -> Self {
        Self {
            record,
            use_default_on_error,
        }
    }

    /// The raw value of a column, `None` when absent or empty
    pub(crate) fn raw(&self, field: &str) -> Option<&'a str> {
        self.record.get(field)
    }

    /// Either the default value (with the default policy) or the error
    fn recover<T>(&self, error: FieldError, default: impl FnOnce() -> T) -> Result<T, FieldError> {
        if self.use_default_on_error {
            debug!(
                "{}:{}: {}, using the default value",
                self.record.file_name(),
                self.record.line(),
                error
            );
            Ok(default())
        } else {
            Err(error)
        }
    }

    fn parse<T: DeserializeOwned>(&self, field: &str, value: &str) -> Result<T, FieldError> {
        T::deserialize(FieldDeserializer(value))
            .map_err(|e| FieldError::invalid(field, value, e.to_string()))
    }

    /// Identifier of the record. There is no sensible default for it
    pub(crate) fn id(&self, field: &str) -> Result<String, FieldError> {
        self.raw(field)
            .map(str::to_owned)
            .ok_or_else(|| FieldError::missing(field))
    }

    /// A mandatory value that identifies the record within its parent (a sequence, a date)
    ///
    /// It never gets a default value
    pub(crate) fn strict<T: DeserializeOwned>(&self, field: &str) -> Result<T, FieldError> {
        let value = self.raw(field).ok_or_else(|| FieldError::missing(field))?;
        self.parse(field, value)
    }

    /// A mandatory value, replaced by the zero value of its type under the default policy
    pub(crate) fn required<T: DeserializeOwned + Default>(&self, field: &str) -> Result<T, FieldError> {
        match self.raw(field) {
            None => self.recover(FieldError::missing(field), T::default),
            Some(v) => self
                .parse(field, v)
                .or_else(|e| self.recover(e, T::default)),
        }
    }

    /// An optional value. An invalid one is dropped under the default policy
    pub(crate) fn optional<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>, FieldError> {
        match self.raw(field) {
            None => Ok(None),
            Some(v) => self
                .parse(field, v)
                .map(Some)
                .or_else(|e| self.recover(e, || None)),
        }
    }

    /// A value that falls back to `default` when absent (or invalid under the default policy)
    pub(crate) fn or<T: DeserializeOwned>(&self, field: &str, default: T) -> Result<T, FieldError> {
        match self.raw(field) {
            None => Ok(default),
            Some(v) => match self.parse(field, v) {
                Ok(v) => Ok(v),
                Err(e) => self.recover(e, || default),
            },
        }
    }

    /// A mandatory time of the day, in seconds since midnight
    pub(crate) fn time(&self, field: &str) -> Result<u32, FieldError> {
        match self.raw(field) {
            None => self.recover(FieldError::missing(field), || 0),
            Some(v) => self
                .parse::<Time>(field, v)
                .map(|t| t.0)
                .or_else(|e| self.recover(e, || 0)),
        }
    }

    /// An optional time of the day, in seconds since midnight
    pub(crate) fn optional_time(&self, field: &str) -> Result<Option<u32>, FieldError> {
        self.optional::<Time>(field).map(|t| t.map(|t| t.0))
    }

    /// A mandatory date. Like [Fields::strict], it never gets a default value
    pub(crate) fn date(&self, field: &str) -> Result<NaiveDate, FieldError> {
        self.strict::<Date>(field).map(|d| d.0)
    }

    /// An optional date
    pub(crate) fn optional_date(&self, field: &str) -> Result<Option<NaiveDate>, FieldError> {
        self.optional::<Date>(field).map(|d| d.map(|d| d.0))
    }

    /// A color, `default` when absent
    pub(crate) fn color(&self, field: &str, default: RGB8) -> Result<RGB8, FieldError> {
        self.or(field, Color(default)).map(|c| c.0)
    }

    /// An optional reference to an object of `collection`
    ///
    /// An unknown id becomes "no reference" under the default policy
    pub(crate) fn reference<T>(
        &self,
        field: &str,
        kind: &'static str,
        collection: &Collection<T>,
    ) -> Result<Option<Id<T>>, FieldError> {
        match self.raw(field) {
            None => Ok(None),
            Some(raw_id) => match collection.get_id(raw_id) {
                Some(id) => Ok(Some(id)),
                None => self.recover(
                    FieldError::unknown_reference(field, kind, raw_id),
                    || None,
                ),
            },
        }
    }

    /// A mandatory reference the record cannot exist without (e.g. the trip of a stop time)
    ///
    /// It has no default value: a missing or unknown id always fails the record
    pub(crate) fn anchor<T>(
        &self,
        field: &str,
        kind: &'static str,
        collection: &Collection<T>,
    ) -> Result<Id<T>, FieldError> {
        let raw_id = self.raw(field).ok_or_else(|| FieldError::missing(field))?;
        collection
            .get_id(raw_id)
            .ok_or_else(|| FieldError::unknown_reference(field, kind, raw_id))
    }
}
