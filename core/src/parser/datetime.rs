use crate::{
    error::ParseError,
    parser::{Example, StringParser},
};
use time::{
    format_description::{self, well_known::Rfc3339, BorrowedFormatItem, OwnedFormatItem},
    macros::{date, datetime, format_description, time},
    Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset,
};

fn custom_format(description: &str) -> Result<OwnedFormatItem, ParseError> {
    format_description::parse_owned::<2>(description).map_err(ParseError::new)
}

/// Calendar date, ISO `2025-01-01` unless a custom format is given.
#[derive(Debug, Clone)]
pub struct LocalDateParser {
    format: OwnedFormatItem,
}

impl Default for LocalDateParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalDateParser {
    pub fn new() -> Self {
        Self {
            format: OwnedFormatItem::from(format_description!("[year]-[month]-[day]")),
        }
    }

    /// Format written in the `time` crate description syntax, e.g. `[day].[month].[year]`.
    pub fn with_format(description: &str) -> Result<Self, ParseError> {
        Ok(Self {
            format: custom_format(description)?,
        })
    }
}

impl StringParser for LocalDateParser {
    type Output = Date;

    fn parse(&self, raw: &str) -> Result<Date, ParseError> {
        Date::parse(raw, &self.format).map_err(ParseError::new)
    }

    fn format(&self, value: &Date) -> String {
        value
            .format(&self.format)
            .unwrap_or_else(|_| value.to_string())
    }

    fn example(&self) -> Example<Date> {
        let value = date!(2025 - 01 - 01);
        Example::new(self.format(&value), value)
    }
}

/// Wall clock time. The default accepts `12:30`, `12:30:15` and
/// `12:30:15.250`, and writes seconds always and fractions only when present.
#[derive(Debug, Clone)]
pub struct LocalTimeParser {
    format: DateTimeFormat,
}

impl Default for LocalTimeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalTimeParser {
    pub fn new() -> Self {
        Self {
            format: DateTimeFormat::Iso,
        }
    }

    pub fn with_format(description: &str) -> Result<Self, ParseError> {
        Ok(Self {
            format: DateTimeFormat::Custom(custom_format(description)?),
        })
    }
}

impl StringParser for LocalTimeParser {
    type Output = Time;

    fn parse(&self, raw: &str) -> Result<Time, ParseError> {
        let result = match &self.format {
            DateTimeFormat::Iso => Time::parse(raw, ISO_LOCAL_TIME),
            DateTimeFormat::Custom(format) => Time::parse(raw, format),
        };
        result.map_err(ParseError::new)
    }

    fn format(&self, value: &Time) -> String {
        let result = match &self.format {
            DateTimeFormat::Iso => format_iso_time(value),
            DateTimeFormat::Custom(format) => value.format(format),
        };
        result.unwrap_or_else(|_| value.to_string())
    }

    fn example(&self) -> Example<Time> {
        let value = time!(12:30:00);
        Example::new(self.format(&value), value)
    }
}

#[derive(Debug, Clone)]
pub enum DateTimeFormat {
    /// ISO 8601 with optional seconds, fractions and a trailing `[zone]` id.
    Iso,
    Custom(OwnedFormatItem),
}

const ISO_LOCAL_TIME: &[BorrowedFormatItem<'_>] =
    format_description!("[hour]:[minute][optional [:[second][optional [.[subsecond]]]]]");

const ISO_LOCAL_DATE_TIME: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
);

const ISO_OFFSET: &[BorrowedFormatItem<'_>] = format_description!(
    "[offset_hour sign:mandatory]:[offset_minute][optional [:[offset_second]]]"
);

fn format_iso_time(value: &Time) -> Result<String, time::error::Format> {
    if value.nanosecond() == 0 {
        value.format(format_description!("[hour]:[minute]:[second]"))
    } else {
        value.format(format_description!("[hour]:[minute]:[second].[subsecond]"))
    }
}

/// Splits `2025-01-01T01:01Z[UTC]` into the timestamp and the zone id.
fn split_zone_id(raw: &str) -> Result<(&str, Option<&str>), ParseError> {
    let Some(rest) = raw.strip_suffix(']') else {
        return Ok((raw, None));
    };
    let Some((timestamp, zone)) = rest.rsplit_once('[') else {
        return Err(ParseError::new("unterminated zone id"));
    };
    let valid = !zone.is_empty()
        && zone
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '+' | '-' | ':' | '.'));
    if !valid {
        return Err(ParseError::new(format!("invalid zone id `{zone}`")));
    }
    Ok((timestamp, Some(zone)))
}

fn parse_iso_zoned(raw: &str) -> Result<OffsetDateTime, ParseError> {
    let (timestamp, _) = split_zone_id(raw)?;
    let (local, offset) = match timestamp.strip_suffix(&['Z', 'z'][..]) {
        Some(local) => (local, UtcOffset::UTC),
        None => {
            let time_start = timestamp
                .find('T')
                .ok_or_else(|| ParseError::new("missing time part"))?;
            let offset_start = timestamp[time_start..]
                .rfind(&['+', '-'][..])
                .map(|index| time_start + index)
                .ok_or_else(|| ParseError::new("missing offset"))?;
            let offset = UtcOffset::parse(&timestamp[offset_start..], ISO_OFFSET)
                .map_err(ParseError::new)?;
            (&timestamp[..offset_start], offset)
        }
    };
    let local = PrimitiveDateTime::parse(local, ISO_LOCAL_DATE_TIME).map_err(ParseError::new)?;
    Ok(local.assume_offset(offset))
}

/// Timestamp with a UTC offset. The default accepts RFC 3339 as well as the
/// ISO zoned form `2025-01-01T01:01Z[UTC]`, and writes RFC 3339.
#[derive(Debug, Clone)]
pub struct ZonedDateTimeParser {
    format: DateTimeFormat,
}

impl Default for ZonedDateTimeParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ZonedDateTimeParser {
    pub fn new() -> Self {
        Self {
            format: DateTimeFormat::Iso,
        }
    }

    /// The description must contain an offset component.
    pub fn with_format(description: &str) -> Result<Self, ParseError> {
        Ok(Self {
            format: DateTimeFormat::Custom(custom_format(description)?),
        })
    }
}

impl StringParser for ZonedDateTimeParser {
    type Output = OffsetDateTime;

    fn parse(&self, raw: &str) -> Result<OffsetDateTime, ParseError> {
        match &self.format {
            DateTimeFormat::Iso => parse_iso_zoned(raw),
            DateTimeFormat::Custom(format) => {
                OffsetDateTime::parse(raw, format).map_err(ParseError::new)
            }
        }
    }

    fn format(&self, value: &OffsetDateTime) -> String {
        let result = match &self.format {
            DateTimeFormat::Iso => value.format(&Rfc3339),
            DateTimeFormat::Custom(format) => value.format(format),
        };
        result.unwrap_or_else(|_| value.to_string())
    }

    fn example(&self) -> Example<OffsetDateTime> {
        let value = datetime!(2025-01-01 0:00 UTC);
        Example::new(self.format(&value), value)
    }
}
