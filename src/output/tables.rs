use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use jenkins_service::{BuildDetails, BuildResult};

fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn color_coded_result_cell(build: &BuildDetails) -> Cell {
    match build.result {
        _ if build.building => Cell::new("BUILDING").fg(TableColor::Cyan),
        Some(BuildResult::Success) => Cell::new("SUCCESS").fg(TableColor::Green),
        Some(BuildResult::Unstable) => Cell::new("UNSTABLE").fg(TableColor::Yellow),
        Some(result @ (BuildResult::Failure | BuildResult::Aborted)) => {
            Cell::new(result).fg(TableColor::Red)
        }
        Some(result) => Cell::new(result),
        None => Cell::new("-"),
    }
}

fn duration_cell(build: &BuildDetails) -> Cell {
    if build.building {
        return Cell::new("-");
    }
    let seconds = build.duration_secs();
    if seconds >= 60.0 {
        Cell::new(format!("{:.1}min", seconds / 60.0))
    } else {
        Cell::new(format!("{seconds:.1}s"))
    }
}

/// Table describing one build of a job
pub fn build_status_table(job_name: &str, build: &BuildDetails) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Job", "Build", "Result", "Started", "Duration"]);

    let started = build
        .started_at()
        .filter(|_| build.timestamp > 0)
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "-".to_string());

    table.add_row(vec![
        Cell::new(job_name),
        Cell::new(format!("#{}", build.number)),
        color_coded_result_cell(build),
        Cell::new(started),
        duration_cell(build),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(json: &str) -> BuildDetails {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_finished_build_row() {
        let build = build(
            r#"{"number":12,"building":false,"result":"SUCCESS","timestamp":1700000000000,"duration":90000}"#,
        );
        let rendered = build_status_table("myJob", &build).to_string();

        assert!(rendered.contains("#12"));
        assert!(rendered.contains("SUCCESS"));
        assert!(rendered.contains("2023-11-14 22:13:20 UTC"));
        assert!(rendered.contains("1.5min"));
    }

    #[test]
    fn test_running_build_row() {
        let build = build(r#"{"number":3,"building":true,"result":null,"timestamp":0}"#);
        let rendered = build_status_table("myJob", &build).to_string();

        assert!(rendered.contains("BUILDING"));
        assert!(!rendered.contains("1970"));
    }
}
