//! FILENAME: app/cli/src/render.rs
//! Text rendering of reports with comfy-table.

use comfy_table::{presets::UTF8_FULL, CellAlignment, Table};
use pivot_engine::{PivotTable, Ranking};

use crate::analysis::Analysis;
use crate::report::{Report, SectionBody};

/// Whole numbers print without decimals, others with two. NaN prints blank.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn align_numbers_right(table: &mut Table, from_column: usize) {
    for column in table.column_iter_mut().skip(from_column) {
        column.set_cell_alignment(CellAlignment::Right);
    }
}

pub fn render_pivot(pivot: &PivotTable) -> Table {
    let mut header = vec![pivot.row_field.clone()];
    header.extend(pivot.column_keys.iter().map(|k| k.label()));

    let mut table = new_table(header);
    for (key, cells) in pivot.rows() {
        let mut row = vec![key.label()];
        row.extend(cells.iter().map(|&v| format_number(v)));
        table.add_row(row);
    }
    align_numbers_right(&mut table, 1);
    table
}

pub fn render_ranking(ranking: &Ranking) -> Table {
    let header = vec![
        "#".to_string(),
        ranking.dimension.clone(),
        format!("{}({})", ranking.aggregation, ranking.measure),
    ];

    let mut table = new_table(header);
    for (position, item) in ranking.items.iter().enumerate() {
        table.add_row(vec![
            (position + 1).to_string(),
            item.key.label(),
            format_number(item.value),
        ]);
    }
    align_numbers_right(&mut table, 2);
    table
}

/// The whole report: title, then each section heading followed by its table.
pub fn render_report(report: &Report) -> String {
    let mut out = format!("{} - {}\n", report.analysis.number(), report.title);

    for section in &report.sections {
        out.push('\n');
        out.push_str(&section.heading);
        out.push('\n');

        let table = match &section.body {
            SectionBody::Table(pivot) if pivot.is_empty() => {
                out.push_str("(sem dados)\n");
                continue;
            }
            SectionBody::Ranking(ranking) if ranking.is_empty() => {
                out.push_str("(sem dados)\n");
                continue;
            }
            SectionBody::Table(pivot) => render_pivot(pivot),
            SectionBody::Ranking(ranking) => render_ranking(ranking),
        };
        out.push_str(&table.to_string());
        out.push('\n');
    }

    out
}

/// The `list` command output.
pub fn render_catalog() -> String {
    let mut table = new_table(vec![
        "#".to_string(),
        "id".to_string(),
        "title".to_string(),
        "columns".to_string(),
    ]);
    for analysis in Analysis::ALL {
        table.add_row(vec![
            analysis.number().to_string(),
            analysis.id().to_string(),
            analysis.title().to_string(),
            analysis.required_fields().join(", "),
        ]);
    }
    table.to_string()
}
