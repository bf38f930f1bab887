//! Native dialogs.

use std::path::PathBuf;

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};

use crate::app::Report;
use crate::error::Error;

pub trait FileSelector {
    /// `None` when the user cancelled.
    fn select_calendar(&self) -> Option<PathBuf>;
}

pub trait Notifier {
    fn success(&self, report: &Report);
    fn failure(&self, err: &Error);
}

/// Open dialog and message boxes backed by the platform's own widgets. Holds
/// no window; each dialog is created and torn down on its own.
#[derive(Debug, Default)]
pub struct DesktopUi;

impl FileSelector for DesktopUi {
    fn select_calendar(&self) -> Option<PathBuf> {
        FileDialog::new()
            .set_title("Select the calendar file (.ics)")
            .add_filter("iCalendar", &["ics"])
            .add_filter("All files", &["*"])
            .pick_file()
    }
}

impl Notifier for DesktopUi {
    fn success(&self, report: &Report) {
        let _ = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title("Success")
            .set_description(report.message())
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn failure(&self, err: &Error) {
        let _ = MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title("Error")
            .set_description(format!(
                "Something went wrong while processing the file:\n\n{}",
                err
            ))
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
