use calendar_fixer::config::parse_course_list;
use calendar_fixer::{process, FilterConfig};
use std::path::Path;

fn main() {
    let ics_path = std::env::var("ICS_PATH").unwrap();
    let courses = parse_course_list(&std::env::var("COURSES").unwrap_or_default());
    let text = std::fs::read_to_string(&ics_path).unwrap();
    let config = FilterConfig::new(chrono_tz::Europe::Brussels, courses);
    let (encoded, report) = process(Path::new(&ics_path), &text, &config).unwrap();
    println!("{} of {} events kept", report.kept, report.total);
    print!("{}", encoded);
}
