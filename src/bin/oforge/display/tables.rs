use std::io::{self, Write};

use opls_forge::{Compound, ROOT, RuleCatalog, TypingReport, UNKNOWN_TYPE, Warning};

use crate::util::text::{truncate, wrap};

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();
const MAX_ROWS: usize = 15;

pub fn print_structure_info(compound: &Compound) {
    let real = compound.real_atoms().len();
    let rows = [
        ("Name", compound.kind(ROOT).unwrap_or("-").to_string()),
        ("Atoms", real.to_string()),
        ("Ghost Atoms", (compound.atom_count() - real).to_string()),
        ("Bonds", compound.bond_count().to_string()),
    ];

    print_kv_table(&mut io::stderr().lock(), "Structure Summary", &rows);
}

pub fn print_catalog_summary(catalog: &RuleCatalog) {
    let elements: Vec<&str> = catalog.elements().collect();
    let rows = [
        ("Rules", catalog.len().to_string()),
        ("Elements", elements.join(", ")),
        ("Wildcard Rules", catalog.wildcard().len().to_string()),
        ("Warnings", catalog.warnings().len().to_string()),
    ];

    print_kv_table(&mut io::stderr().lock(), "Rule Catalog", &rows);
}

pub fn print_type_distribution(report: &TypingReport) {
    let mut sorted: Vec<(String, usize)> = report
        .type_counts()
        .into_iter()
        .map(|(id, count)| (id.to_string(), count))
        .collect();
    if report.unresolved_count() > 0 {
        sorted.push((UNKNOWN_TYPE.to_string(), report.unresolved_count()));
    }
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let total = report.typed_count() + report.unresolved_count();
    print_distribution_table(
        &mut io::stderr().lock(),
        "OPLS-AA Type Distribution",
        &sorted,
        total,
    );
}

pub fn print_warnings(title: &str, warnings: &[Warning]) {
    if warnings.is_empty() {
        return;
    }

    let mut out = io::stderr().lock();
    let text_w = SAFE_TABLE_WIDTH - 4;
    let rule = "─".repeat(text_w + 2);

    let _ = writeln!(
        out,
        "{}┌─ {} ({}) ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 12),
        warnings.len()
    );
    let _ = writeln!(out, "{}┌{}┐", INDENT, rule);

    for (n, warning) in warnings.iter().take(MAX_ROWS).enumerate() {
        if n > 0 {
            let _ = writeln!(out, "{}├{}┤", INDENT, rule);
        }
        for line in wrap(&warning.to_string(), text_w) {
            let _ = writeln!(out, "{}│ {:<text_w$} │", INDENT, truncate(&line, text_w));
        }
    }

    if warnings.len() > MAX_ROWS {
        let _ = writeln!(out, "{}├{}┤", INDENT, rule);
        let more = format!("({} more warnings)", warnings.len() - MAX_ROWS);
        let _ = writeln!(out, "{}│ {:<text_w$} │", INDENT, more);
    }

    let _ = writeln!(out, "{}└{}┘", INDENT, rule);
}

fn print_distribution_table(
    out: &mut impl Write,
    title: &str,
    data: &[(String, usize)],
    total: usize,
) {
    let name_w = 10usize;
    let count_w = 8usize;
    let sep_overhead = 6;
    let dist_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + count_w + sep_overhead);
    let max_bar_width = dist_w.saturating_sub(8).min(20);
    let lines = [
        "─".repeat(name_w + 2),
        "─".repeat(count_w + 2),
        "─".repeat(dist_w + 2),
    ];

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(out, "{}┌{}┬{}┬{}┐", INDENT, lines[0], lines[1], lines[2]);
    let _ = writeln!(
        out,
        "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
        INDENT, "Type", "Count", "Distribution"
    );
    let _ = writeln!(out, "{}├{}┼{}┼{}┤", INDENT, lines[0], lines[1], lines[2]);

    for (name, count) in data.iter().take(MAX_ROWS) {
        let pct = if total == 0 {
            0.0
        } else {
            (*count as f64 / total as f64) * 100.0
        };
        let dist_cell = format!("{}  {:>5.1}%", make_bar(pct, max_bar_width), pct);
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            truncate(name, name_w),
            count,
            dist_cell
        );
    }

    if data.len() > MAX_ROWS {
        let _ = writeln!(
            out,
            "{}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            INDENT,
            "...",
            "...",
            format!("({} more types)", data.len() - MAX_ROWS)
        );
    }

    let _ = writeln!(out, "{}└{}┴{}┴{}┘", INDENT, lines[0], lines[1], lines[2]);
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);
    let k_line = "─".repeat(key_w + 2);
    let v_line = "─".repeat(val_w + 2);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(out, "{}┌{}┬{}┐", INDENT, k_line, v_line);
    let _ = writeln!(
        out,
        "{}│ {:<key_w$} │ {:>val_w$} │",
        INDENT, "Metric", "Value"
    );
    let _ = writeln!(out, "{}├{}┼{}┤", INDENT, k_line, v_line);

    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w)
        );
    }

    let _ = writeln!(out, "{}└{}┴{}┘", INDENT, k_line, v_line);
}

fn make_bar(pct: f64, max_width: usize) -> String {
    let filled = ((pct / 100.0) * max_width as f64).round() as usize;
    let empty = max_width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}
