//! Reading and writing iCalendar text.

use std::io::BufReader;

use ical::generator::Emitter;
use ical::parser::ical::component::{
    IcalAlarm, IcalCalendar, IcalFreeBusy, IcalJournal, IcalTimeZone, IcalTodo,
};
use ical::property::Property;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::event::{Event, Field};

/// A decoded calendar. Only the events are lifted into our own types; the
/// other components are written back as they were read.
#[derive(Debug, Default)]
pub struct Calendar {
    pub fields: Vec<Field>,
    pub events: Vec<Event>,
    pub timezones: Vec<IcalTimeZone>,
    pub todos: Vec<IcalTodo>,
    pub journals: Vec<IcalJournal>,
    pub free_busys: Vec<IcalFreeBusy>,
    pub alarms: Vec<IcalAlarm>,
}

pub fn decode(text: &str) -> Result<Calendar> {
    let bf = BufReader::new(text.as_bytes());
    let reader = ical::IcalParser::new(bf);

    let mut calendar: Option<Calendar> = None;
    for parsed in reader {
        let raw = parsed.map_err(|e| Error::Parse(e.to_string()))?;
        let events = raw
            .events
            .into_iter()
            .map(Event::try_from)
            .collect::<Result<Vec<Event>>>()?;

        match calendar.as_mut() {
            None => {
                calendar = Some(Calendar {
                    fields: raw.properties.into_iter().map(Field::from).collect(),
                    events,
                    timezones: raw.timezones,
                    todos: raw.todos,
                    journals: raw.journals,
                    free_busys: raw.free_busys,
                    alarms: raw.alarms,
                });
            }
            Some(first) => {
                warn!("merging events from an extra VCALENDAR block");
                first.events.extend(events);
                first.timezones.extend(raw.timezones);
                first.todos.extend(raw.todos);
                first.journals.extend(raw.journals);
                first.free_busys.extend(raw.free_busys);
                first.alarms.extend(raw.alarms);
            }
        }
    }

    let calendar =
        calendar.ok_or_else(|| Error::Parse(String::from("no VCALENDAR block found")))?;
    debug!(events = calendar.events.len(), "decoded calendar");
    Ok(calendar)
}

pub fn encode(calendar: &Calendar) -> String {
    let mut raw = IcalCalendar::new();
    raw.properties = calendar
        .fields
        .iter()
        .cloned()
        .map(Property::from)
        .collect();
    raw.events = calendar.events.iter().cloned().map(Into::into).collect();
    raw.timezones = calendar.timezones.clone();
    raw.todos = calendar.todos.clone();
    raw.journals = calendar.journals.clone();
    raw.free_busys = calendar.free_busys.clone();
    raw.alarms = calendar.alarms.clone();
    raw.generate()
}
