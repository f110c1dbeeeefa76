use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Material category -> coordinate string -> running flag, exactly as the
/// backend serves it. Rebuilt from scratch on every poll, nothing is diffed
/// or cached between cycles.
pub type LineMap = HashMap<String, HashMap<String, bool>>;

/// Aggregate daily production metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_produced_today: u64,
    pub daily_target: u64,
    pub current_efficiency: f64,
    #[serde(default)]
    pub total_errors: u64,
    pub unresolved_errors: u64,
    #[serde(default)]
    pub last_updated: String,
}

impl Summary {
    /// Efficiency below 80% is rendered as a warning.
    pub fn efficiency_low(&self) -> bool {
        self.current_efficiency < 80.0
    }
}

/// Full payload of `GET /api/production_status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionStatus {
    pub manufact_lines: LineMap,
    pub summary: Summary,
    pub material_targets: HashMap<String, u64>,
}

/// One line flattened out of the nested status map, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LineEntry {
    pub material: String,
    pub coord: String,
    pub running: bool,
}

#[derive(Debug, Serialize)]
pub struct LineControlRequest {
    pub material: String,
    pub coordinate: String,
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct SetTargetRequest {
    pub material: String,
    pub target_amount: u64,
}

#[derive(Debug, Serialize)]
pub struct CalculateRequest {
    pub expression: String,
}

#[derive(Debug, Deserialize)]
pub struct ControlResponse {
    pub status: String,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CalculateResponse {
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
}

fn parse_coord(coord: &str) -> Option<(i64, i64)> {
    let mut parts = coord.split('-');
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    Some((row, col))
}

/// Orders `"row-col"` coordinate strings by row, then column, ascending.
/// Segments that do not parse compare as equal, so a stable sort leaves
/// malformed entries in insertion order. The backend owns the format; no
/// stricter validation is done here.
pub fn compare_coords(a: &str, b: &str) -> Ordering {
    match (parse_coord(a), parse_coord(b)) {
        (Some((ar, ac)), Some((br, bc))) => ar.cmp(&br).then(ac.cmp(&bc)),
        _ => Ordering::Equal,
    }
}

/// Flattens the nested status map into display order: materials are walked
/// alphabetically so the pre-sort order is deterministic, then the whole
/// list is stably sorted by coordinate.
pub fn flatten_lines(lines: &LineMap) -> Vec<LineEntry> {
    let mut materials: Vec<&String> = lines.keys().collect();
    materials.sort();

    let mut all = Vec::new();
    for material in materials {
        let mut coords: Vec<(&String, &bool)> = lines[material].iter().collect();
        coords.sort_by(|a, b| a.0.cmp(b.0));
        for (coord, running) in coords {
            all.push(LineEntry {
                material: material.clone(),
                coord: coord.clone(),
                running: *running,
            });
        }
    }

    all.sort_by(|a, b| compare_coords(&a.coord, &b.coord));
    all
}

/// Groups entries two per display row; an odd count leaves the last cell
/// empty, so `n` entries always produce `ceil(n/2)` rows.
pub fn group_rows(entries: &[LineEntry]) -> Vec<(&LineEntry, Option<&LineEntry>)> {
    entries
        .chunks(2)
        .map(|pair| (&pair[0], pair.get(1)))
        .collect()
}

/// Client-side check on target edits: a parseable non-negative integer, or
/// the edit is rejected and no request goes out.
pub fn parse_target(input: &str) -> Option<u64> {
    input.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(material: &str, coord: &str, running: bool) -> LineEntry {
        LineEntry {
            material: material.into(),
            coord: coord.into(),
            running,
        }
    }

    #[test]
    fn test_compare_coords_row_then_column() {
        assert_eq!(compare_coords("1-1", "1-2"), Ordering::Less);
        assert_eq!(compare_coords("1-2", "2-1"), Ordering::Less);
        assert_eq!(compare_coords("3-1", "2-9"), Ordering::Greater);
        assert_eq!(compare_coords("4-2", "4-2"), Ordering::Equal);
    }

    #[test]
    fn test_compare_coords_total_order_on_numeric_input() {
        let mut coords = vec!["5-2", "1-2", "4-1", "1-1", "3-2", "2-1", "10-1"];
        coords.sort_by(|a, b| compare_coords(a, b));
        assert_eq!(
            coords,
            vec!["1-1", "1-2", "2-1", "3-2", "4-1", "5-2", "10-1"]
        );
    }

    #[test]
    fn test_malformed_coords_keep_insertion_order() {
        // Unparseable segments compare as equal, so a stable sort must not
        // move them relative to each other.
        let mut coords = vec!["z-9", "abc", "1+1"];
        coords.sort_by(|a, b| compare_coords(a, b));
        assert_eq!(coords, vec!["z-9", "abc", "1+1"]);
    }

    #[test]
    fn test_flatten_sorts_across_materials() {
        let mut lines: LineMap = HashMap::new();
        lines.insert(
            "paper".into(),
            HashMap::from([("1-1".into(), true), ("4-2".into(), false)]),
        );
        lines.insert(
            "leather".into(),
            HashMap::from([("2-1".into(), true), ("3-2".into(), false)]),
        );

        let flat = flatten_lines(&lines);
        let coords: Vec<&str> = flat.iter().map(|e| e.coord.as_str()).collect();
        assert_eq!(coords, vec!["1-1", "2-1", "3-2", "4-2"]);
        assert_eq!(flat[0].material, "paper");
        assert_eq!(flat[1].material, "leather");
    }

    #[test]
    fn test_group_rows_odd_count_pads_last_row() {
        let entries = vec![
            entry("paper", "1-1", true),
            entry("paper", "1-2", true),
            entry("leather", "2-1", false),
        ];
        let rows = group_rows(&entries);
        assert_eq!(rows.len(), 2); // ceil(3/2)
        assert!(rows[0].1.is_some());
        assert!(rows[1].1.is_none());
    }

    #[test]
    fn test_group_rows_even_count() {
        let entries = vec![entry("paper", "1-1", true), entry("paper", "1-2", true)];
        let rows = group_rows(&entries);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].1.is_some());
    }

    #[test]
    fn test_parse_target_rejects_negative_and_garbage() {
        assert_eq!(parse_target("5"), Some(5));
        assert_eq!(parse_target(" 1000 "), Some(1000));
        assert_eq!(parse_target("-1"), None);
        assert_eq!(parse_target("abc"), None);
        assert_eq!(parse_target(""), None);
    }

    #[test]
    fn test_production_status_deserializes_backend_payload() {
        let raw = r#"{
            "manufact_lines": {
                "paper": {"1-1": true, "4-2": false}
            },
            "summary": {
                "total_produced_today": 1250,
                "daily_target": 1700,
                "current_efficiency": 83.3,
                "total_errors": 5,
                "unresolved_errors": 2,
                "last_updated": "2026-08-28 09:00:00"
            },
            "material_targets": {"paper": 1000}
        }"#;
        let status: ProductionStatus = serde_json::from_str(raw).unwrap();
        assert_eq!(status.summary.daily_target, 1700);
        assert!(!status.summary.efficiency_low());
        assert_eq!(status.manufact_lines["paper"]["4-2"], false);
        assert_eq!(status.material_targets["paper"], 1000);
    }

    #[test]
    fn test_summary_efficiency_threshold() {
        let raw = r#"{
            "total_produced_today": 10,
            "daily_target": 100,
            "current_efficiency": 79.9,
            "unresolved_errors": 0
        }"#;
        let summary: Summary = serde_json::from_str(raw).unwrap();
        assert!(summary.efficiency_low());
    }
}
