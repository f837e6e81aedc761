//! Result reporting: console table and JSON export

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crate::benchmark::ResultSet;

fn human_s(d: Duration) -> String {
    format!("{:.3} s", d.as_secs_f64())
}

/// Render one comparison table, one row per strategy
pub fn render_table(title: &str, results: &[ResultSet]) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.len()));
    out.push('\n');

    let header = format!(
        "{:<18} {:>10} {:>10} {:>10} {:>6}",
        "Model", "median", "min", "max", "runs"
    );
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"-".repeat(header.len()));
    out.push('\n');

    for set in results {
        out.push_str(&format!(
            "{:<18} {:>10} {:>10} {:>10} {:>6}\n",
            set.label,
            human_s(set.median()),
            human_s(set.min()),
            human_s(set.max()),
            set.runs()
        ));
    }
    out
}

pub fn print_table(title: &str, results: &[ResultSet]) {
    print!("{}", render_table(title, results));
    println!();
}

/// Export all ResultSets (summary stats plus raw durations) as JSON
pub fn write_json(path: &Path, config_summary: &str, results: &[ResultSet]) -> io::Result<()> {
    let json = serde_json::json!({
        "config": config_summary,
        "results": results.iter().map(|set| {
            serde_json::json!({
                "model": set.label,
                "runs": set.runs(),
                "median_s": set.median().as_secs_f64(),
                "min_s": set.min().as_secs_f64(),
                "max_s": set.max().as_secs_f64(),
                "durations_s": set.durations.iter()
                    .map(|d| d.as_secs_f64())
                    .collect::<Vec<_>>(),
            })
        }).collect::<Vec<_>>()
    });

    let mut file = File::create(path)?;
    writeln!(file, "{}", serde_json::to_string_pretty(&json)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ResultSet> {
        vec![
            ResultSet::new(
                "threads",
                vec![Duration::from_millis(120), Duration::from_millis(100)],
            ),
            ResultSet::new("processes", vec![Duration::from_millis(300)]),
        ]
    }

    #[test]
    fn test_table_contains_rows() {
        let table = render_table("CPU-bound results (lower is better)", &sample());
        assert!(table.contains("CPU-bound results"));
        assert!(table.contains("Model"));
        assert!(table.contains("threads"));
        assert!(table.contains("processes"));
        assert!(table.contains("0.300 s"));
    }

    #[test]
    fn test_table_run_counts() {
        let table = render_table("t", &sample());
        let threads_row = table.lines().find(|l| l.starts_with("threads")).unwrap();
        assert!(threads_row.trim_end().ends_with('2'));
    }

    #[test]
    fn test_json_export() {
        let dir = std::env::temp_dir().join("parbench-reporter-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("results.json");

        write_json(&path, "tasks=2", &sample()).expect("write json");
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["config"], "tasks=2");
        assert_eq!(parsed["results"][0]["model"], "threads");
        assert_eq!(parsed["results"][0]["durations_s"].as_array().unwrap().len(), 2);

        std::fs::remove_file(&path).ok();
    }
}
