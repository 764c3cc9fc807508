//! Markdown version status report.

use super::manifest::VersionManifest;
use super::status::VersionCheck;
use comfy_table::{Cell, Table};

/// Container tools shown in the report, with where each version is pinned
pub const CONTAINER_TOOL_LOCATIONS: [(&str, &str); 4] = [
    ("GO_VERSION", "Dockerfile, docker-bake.hcl"),
    ("TINYGO_VERSION", "Dockerfile, docker-bake.hcl"),
    ("GH_VERSION", "Dockerfile, docker-bake.hcl"),
    ("VS_CODE_VERSION", "Dockerfile"),
];

/// File location hint for a container tool key
pub fn file_location(key: &str) -> Option<&'static str> {
    CONTAINER_TOOL_LOCATIONS
        .iter()
        .find(|(tool, _)| *tool == key)
        .map(|(_, location)| *location)
}

fn markdown_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::ASCII_MARKDOWN);
    table.set_header(header);
    table
}

fn code(value: &str) -> String {
    format!("`{value}`")
}

/// Render the report
///
/// Only manifest entries for known container tools are listed; developer-local
/// tools are left out.
pub fn render_report(
    generated_at: &str,
    manifest: &VersionManifest,
    checks: &[VersionCheck],
) -> String {
    let mut configured = markdown_table(vec!["Tool", "Current Version", "File Location"]);
    for (key, version) in manifest.iter() {
        if let Some(location) = file_location(key) {
            configured.add_row(vec![
                Cell::new(key),
                Cell::new(code(version)),
                Cell::new(location),
            ]);
        }
    }

    let mut latest = markdown_table(vec!["Tool", "Current Version", "Latest Version", "Status"]);
    for check in checks {
        latest.add_row(vec![
            Cell::new(&check.key),
            Cell::new(code(&check.current)),
            Cell::new(code(&check.latest.to_string())),
            Cell::new(check.status().label()),
        ]);
    }

    let lines = [
        "# Container Tool Version Report".to_string(),
        format!("Generated: {generated_at}"),
        String::new(),
        "Note: developer-local tools (Docker, Buildx, Git) are managed separately.".to_string(),
        String::new(),
        "## Configured Container Tool Versions".to_string(),
        configured.to_string(),
        String::new(),
        "## Latest Version Comparison".to_string(),
        latest.to_string(),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versions::status::LatestVersion;

    fn sample_manifest() -> VersionManifest {
        let mut manifest = VersionManifest::new();
        manifest.insert("GO_VERSION", "1.22.0");
        manifest.insert("DOCKER_VERSION", "27.0.0");
        manifest.insert("VS_CODE_VERSION", "1.90.0");
        manifest
    }

    fn sample_checks() -> Vec<VersionCheck> {
        vec![
            VersionCheck::new("GO_VERSION", "1.22.0", LatestVersion::CheckManually),
            VersionCheck::new("GH_VERSION", "2.40.0", LatestVersion::Known("2.41.0".to_string())),
            VersionCheck::new("TINYGO_VERSION", "0.31.2", LatestVersion::Unknown),
        ]
    }

    fn row_containing<'a>(report: &'a str, needle: &str, section: &str) -> Option<&'a str> {
        report
            .split(section)
            .nth(1)?
            .lines()
            .find(|line| line.contains(needle))
    }

    #[test]
    fn report_has_header_and_timestamp() {
        let report = render_report("2026-10-19 12:00:00", &sample_manifest(), &sample_checks());
        assert!(report.starts_with("# Container Tool Version Report\nGenerated: 2026-10-19 12:00:00"));
        assert!(report.contains("## Configured Container Tool Versions"));
        assert!(report.contains("## Latest Version Comparison"));
    }

    #[test]
    fn configured_table_lists_only_container_tools() {
        let report = render_report("now", &sample_manifest(), &[]);
        let go_row = row_containing(&report, "GO_VERSION", "## Configured").unwrap();
        assert!(go_row.contains("`1.22.0`"));
        assert!(go_row.contains("Dockerfile, docker-bake.hcl"));
        let vs_code_row = row_containing(&report, "VS_CODE_VERSION", "## Configured").unwrap();
        assert!(vs_code_row.contains("`1.90.0`"));
        assert!(!report.contains("DOCKER_VERSION"));
    }

    #[test]
    fn latest_table_shows_status_per_tool() {
        let report = render_report("now", &sample_manifest(), &sample_checks());
        let section = "## Latest Version Comparison";

        let go_row = row_containing(&report, "GO_VERSION", section).unwrap();
        assert!(go_row.contains("`check manually`"));
        assert!(go_row.contains("manual check"));

        let gh_row = row_containing(&report, "GH_VERSION", section).unwrap();
        assert!(gh_row.contains("`2.41.0`"));
        assert!(gh_row.contains("update available"));

        let tinygo_row = row_containing(&report, "TINYGO_VERSION", section).unwrap();
        assert!(tinygo_row.contains("`unknown`"));
        assert!(tinygo_row.contains("needs check"));
    }

    #[test]
    fn tables_use_markdown_pipes() {
        let report = render_report("now", &sample_manifest(), &sample_checks());
        let header = report
            .lines()
            .find(|line| line.contains("File Location"))
            .unwrap();
        assert!(header.trim_start().starts_with('|'));
        assert!(header.trim_end().ends_with('|'));
    }

    #[test]
    fn file_location_lookup() {
        assert_eq!(file_location("VS_CODE_VERSION"), Some("Dockerfile"));
        assert_eq!(file_location("GH_VERSION"), Some("Dockerfile, docker-bake.hcl"));
        assert_eq!(file_location("GIT_VERSION"), None);
    }
}
