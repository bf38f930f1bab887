use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use ical::parser::ical::component::{IcalAlarm, IcalEvent};
use ical::property::Property;

use crate::error::{Error, Result};

const DATE_FORMAT: &str = "%Y%m%d";
const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Properties besides DTSTART/DTEND whose date-times must follow the
/// relabelled start, or recurrence exceptions stop lining up.
const RECURRENCE_TIMES: [&str; 3] = ["EXDATE", "RDATE", "RECURRENCE-ID"];

/// A property as it appears in the file, kept so that re-encoding does not
/// lose anything the filter does not look at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub params: Vec<(String, Vec<String>)>,
    pub value: Option<String>,
}

impl Field {
    pub fn new(name: &str, value: &str) -> Field {
        Field {
            name: name.to_string(),
            params: vec![],
            value: Some(value.to_string()),
        }
    }

    fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(|value| value.trim_matches('"'))
    }

    fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Same as [`EventTime::relabel`] for a comma separated list of
    /// date-times. Dates and periods are left alone.
    fn relabel_times(&mut self, tz: Tz) {
        if matches!(self.param("VALUE"), Some(kind) if !kind.eq_ignore_ascii_case("DATE-TIME")) {
            return;
        }
        let relabelled = match self.value.as_deref() {
            Some(value) if value.contains('T') => value
                .split(',')
                .map(|time| time.trim().trim_end_matches('Z'))
                .collect::<Vec<&str>>()
                .join(","),
            _ => return,
        };
        self.value = Some(relabelled);
        self.params.retain(|(key, _)| !key.eq_ignore_ascii_case("TZID"));
        self.params
            .insert(0, ("TZID".to_string(), vec![tz.name().to_string()]));
    }
}

/// Undoes TEXT escaping (RFC 5545 3.3.11). The parser hands values over as
/// they appear in the file.
pub fn unescape_text(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => text.push('\n'),
            Some(escaped @ ('\\' | ',' | ';')) => text.push(escaped),
            Some(other) => {
                text.push('\\');
                text.push(other);
            }
            None => text.push('\\'),
        }
    }
    text
}

pub fn escape_text(text: &str) -> String {
    let mut raw = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => raw.push_str("\\\\"),
            ',' => raw.push_str("\\,"),
            ';' => raw.push_str("\\;"),
            '\n' => raw.push_str("\\n"),
            other => raw.push(other),
        }
    }
    raw
}

impl From<Property> for Field {
    fn from(property: Property) -> Self {
        Field {
            name: property.name,
            params: property.params.unwrap_or_default(),
            value: property.value,
        }
    }
}

impl From<Field> for Property {
    fn from(field: Field) -> Self {
        Property {
            name: field.name,
            params: if field.params.is_empty() {
                None
            } else {
                Some(field.params)
            },
            value: field.value,
        }
    }
}

/// The timezone label attached to a date-time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Zone {
    Floating,
    Utc,
    Tzid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventTime {
    /// All-day value. iCalendar dates carry no timezone.
    Date(NaiveDate),
    DateTime { local: NaiveDateTime, zone: Zone },
}

impl EventTime {
    pub fn from_field(field: &Field) -> Result<EventTime> {
        let value = field.value.as_deref().unwrap_or_default().trim();
        let invalid = || Error::InvalidTimestamp {
            property: field.name.clone(),
            value: value.to_string(),
        };

        if field.param("VALUE") == Some("DATE") || !value.contains('T') {
            return NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map(EventTime::Date)
                .map_err(|_| invalid());
        }

        let (local, zone) = match value.strip_suffix('Z') {
            Some(local) => (local, Zone::Utc),
            None => match field.param("TZID") {
                Some(tzid) => (value, Zone::Tzid(tzid.to_string())),
                None => (value, Zone::Floating),
            },
        };
        let local = NaiveDateTime::parse_from_str(local, DATE_TIME_FORMAT).map_err(|_| invalid())?;
        Ok(EventTime::DateTime { local, zone })
    }

    pub fn to_field(&self, name: &str) -> Field {
        match self {
            EventTime::Date(date) => Field {
                name: name.to_string(),
                params: vec![("VALUE".to_string(), vec!["DATE".to_string()])],
                value: Some(date.format(DATE_FORMAT).to_string()),
            },
            EventTime::DateTime { local, zone } => {
                let mut value = local.format(DATE_TIME_FORMAT).to_string();
                let params = match zone {
                    Zone::Floating => vec![],
                    Zone::Utc => {
                        value.push('Z');
                        vec![]
                    }
                    Zone::Tzid(tzid) => vec![("TZID".to_string(), vec![tzid.clone()])],
                };
                Field {
                    name: name.to_string(),
                    params,
                    value: Some(value),
                }
            }
        }
    }

    /// Declares the wall-clock time as local time in `tz`. The clock fields
    /// are never touched; dates stay as they are.
    pub fn relabel(&mut self, tz: Tz) {
        if let EventTime::DateTime { zone, .. } = self {
            *zone = Zone::Tzid(tz.name().to_string());
        }
    }
}

/// A single VEVENT. `name`, `start` and `end` are lifted out of the
/// property list, everything else rides along in `fields` and `alarms`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Event {
    /// SUMMARY, unescaped.
    pub name: Option<String>,
    /// Parameters of the SUMMARY line (`LANGUAGE`, `ALTREP`, ...).
    pub name_params: Vec<(String, Vec<String>)>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
    pub fields: Vec<Field>,
    pub alarms: Vec<Vec<Field>>,
}

impl Event {
    pub fn named(name: &str) -> Event {
        Event {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn relabel(&mut self, tz: Tz) {
        for time in [&mut self.start, &mut self.end].into_iter().flatten() {
            time.relabel(tz);
        }
        for field in self.fields.iter_mut() {
            if RECURRENCE_TIMES.iter().any(|name| field.is(name)) {
                field.relabel_times(tz);
            }
        }
    }
}

impl TryFrom<IcalEvent> for Event {
    type Error = Error;

    fn try_from(raw: IcalEvent) -> Result<Self> {
        let mut event = Event::default();
        for property in raw.properties {
            let field = Field::from(property);
            if field.is("SUMMARY") && event.name.is_none() {
                event.name = field.value.as_deref().map(unescape_text);
                event.name_params = field.params;
            } else if field.is("DTSTART") && event.start.is_none() {
                event.start = Some(EventTime::from_field(&field)?);
            } else if field.is("DTEND") && event.end.is_none() {
                event.end = Some(EventTime::from_field(&field)?);
            } else {
                event.fields.push(field);
            }
        }
        event.alarms = raw
            .alarms
            .into_iter()
            .map(|alarm| alarm.properties.into_iter().map(Field::from).collect())
            .collect();
        Ok(event)
    }
}

impl From<Event> for IcalEvent {
    fn from(event: Event) -> Self {
        let mut raw = IcalEvent::new();
        if let Some(name) = &event.name {
            raw.properties.push(
                Field {
                    name: "SUMMARY".to_string(),
                    params: event.name_params.clone(),
                    value: Some(escape_text(name)),
                }
                .into(),
            );
        }
        if let Some(start) = &event.start {
            raw.properties.push(start.to_field("DTSTART").into());
        }
        if let Some(end) = &event.end {
            raw.properties.push(end.to_field("DTEND").into());
        }
        raw.properties
            .extend(event.fields.into_iter().map(Property::from));
        raw.alarms = event
            .alarms
            .into_iter()
            .map(|fields| {
                let mut alarm = IcalAlarm::new();
                alarm.properties = fields.into_iter().map(Property::from).collect();
                alarm
            })
            .collect();
        raw
    }
}
