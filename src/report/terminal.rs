use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use pkgnorm::CheckResult;

/// Render a colored terminal report of validation results.
pub fn render(results: &[CheckResult], verbose: bool, quiet: bool) -> Result<()> {
    let total = results.len();
    let valid_count = results.iter().filter(|r| r.valid).count();
    let invalid_count = total - valid_count;

    if quiet {
        println!(
            "Total: {}  Valid: {}  Invalid: {}",
            total,
            valid_count.to_string().green(),
            invalid_count.to_string().red(),
        );
        return Ok(());
    }

    println!("\n {} v{}\n", "pkgnorm".bold(), env!("CARGO_PKG_VERSION"));

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Documents checked : {}", total));
    println!(
        " │  {:<48} │",
        format!("{}  Valid            : {:>4}", "✓".green(), valid_count)
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Invalid          : {:>4}  {}",
            "✗".red(),
            invalid_count,
            summarize_properties(results)
        )
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if invalid_count > 0 {
        println!(" {} Documents failing validation:\n", "[INVALID]".red().bold());
        render_table(results, false);
        println!();
    }

    if verbose && valid_count > 0 {
        println!(" {} Valid documents:\n", "[VALID]".green().bold());
        render_table(results, true);
        println!();
    }

    Ok(())
}

fn render_table(results: &[CheckResult], valid: bool) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("Problems").add_attribute(Attribute::Bold),
            Cell::new("Verdict").add_attribute(Attribute::Bold),
        ]);

    for result in results.iter().filter(|r| r.valid == valid) {
        let (verdict_str, verdict_color) = if result.valid {
            ("✓ valid", Color::Green)
        } else {
            ("✗ invalid", Color::Red)
        };

        let problems: Vec<String> = result.errors.iter().map(ToString::to_string).collect();

        table.add_row(vec![
            Cell::new(&result.source),
            Cell::new(result.name.as_deref().unwrap_or("-")),
            Cell::new(result.version.as_deref().unwrap_or("-")),
            Cell::new(problems.join("\n")).fg(Color::Yellow),
            Cell::new(verdict_str)
                .fg(verdict_color)
                .set_alignment(CellAlignment::Center),
        ]);
    }

    println!("{}", table);
}

/// The most frequently failing properties, e.g. `[name (3), description (1)]`.
fn summarize_properties(results: &[CheckResult]) -> String {
    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for issue in results.iter().flat_map(|r| r.errors.iter()) {
        let property = if issue.property.is_empty() {
            "(document)"
        } else {
            issue.property.as_str()
        };
        *counts.entry(property).or_insert(0) += 1;
    }

    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(property, cnt)| format!("{} ({})", property, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgnorm::ValidationIssue;

    fn result(valid: bool, missing: &[&str]) -> CheckResult {
        CheckResult {
            source: "package.json".to_string(),
            name: None,
            version: None,
            valid,
            errors: missing
                .iter()
                .map(|p| ValidationIssue {
                    property: p.to_string(),
                    message: format!("\"{}\" is a required property", p),
                })
                .collect(),
        }
    }

    #[test]
    fn test_summarize_properties() {
        let results = vec![
            result(false, &["name", "description"]),
            result(false, &["name"]),
            result(true, &[]),
        ];
        assert_eq!(summarize_properties(&results), "[name (2), description (1)]");
        assert_eq!(summarize_properties(&[result(true, &[])]), "");
    }
}
