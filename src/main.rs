use std::process::ExitCode;

use tracing::Level;
use tracing_subscriber::EnvFilter;

use calendar_fixer::app::{run_interactive, Outcome};
use calendar_fixer::config::Settings;
use calendar_fixer::ui::DesktopUi;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = Settings::load().and_then(Settings::into_filter_config);

    let result = {
        let ui = DesktopUi;
        run_interactive(&ui, config)
    };

    match result {
        Ok(Outcome::Filtered(_)) | Ok(Outcome::Cancelled) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
