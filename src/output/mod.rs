mod progress;
mod styling;
mod tables;

pub use progress::Spinner;
use styling::{failed, muted, ok, title};
pub use tables::build_status_table;

/// Prints the jenkins-service banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        title("🔧 jenkins-service"),
        muted(env!("CARGO_PKG_VERSION")),
        muted("Jenkins remote API client")
    );
}

/// Renders a yes/no answer in green or red.
pub fn yes_no(value: bool) -> String {
    if value {
        ok("yes").to_string()
    } else {
        failed("no").to_string()
    }
}
