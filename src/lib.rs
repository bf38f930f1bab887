//! Relabels the events of an `.ics` file to one timezone and keeps only the
//! courses listed in the settings.

pub mod app;
pub mod codec;
pub mod config;
pub mod error;
pub mod event;
pub mod output;
pub mod transform;
pub mod ui;

pub use app::{process, run, Outcome, Report};
pub use codec::{decode, encode, Calendar};
pub use error::{Error, Result};
pub use event::{Event, EventTime, Zone};
pub use transform::{filter_events, FilterConfig, FilterOutcome};
