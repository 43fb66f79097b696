use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use dermarch_cli::ingest::BatchReport;

use crate::commands::ApplyResult;

pub fn print_apply_summary(result: &ApplyResult) {
    println!("CSV: {}", result.csv.display());
    println!("Records: {}", result.records.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Image"),
        header_cell("Errors"),
        header_cell("Warnings"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    let mut total_errors = 0usize;
    let mut total_warnings = 0usize;
    for report in &result.batch.rows {
        total_errors += report.errors.len();
        total_warnings += report.warnings.len();
        table.add_row(vec![
            Cell::new(report.row),
            image_cell(report.image.as_deref()),
            count_cell(report.errors.len(), Color::Red),
            count_cell(report.warnings.len(), Color::Yellow),
            status_cell(report.is_clean()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell(format!("{} rows", result.batch.rows.len())),
        count_cell(total_errors, Color::Red).add_attribute(Attribute::Bold),
        count_cell(total_warnings, Color::Yellow).add_attribute(Attribute::Bold),
        status_cell(total_errors == 0).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_error_table(&result.batch);
    if result.persisted {
        println!("Record store updated.");
    } else if result.has_errors {
        eprintln!("Record store not updated: {total_errors} error(s) found.");
    } else {
        println!("Dry run: record store left unchanged.");
    }
}

fn print_error_table(batch: &BatchReport) {
    let mut failures = Vec::new();
    for report in &batch.rows {
        for error in &report.errors {
            failures.push((report.row, report.image.as_deref(), error.as_str()));
        }
    }
    if failures.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Image"),
        header_cell("Error"),
    ]);
    apply_error_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (row, image, error) in failures {
        table.add_row(vec![Cell::new(row), image_cell(image), Cell::new(error)]);
    }
    println!();
    println!("Errors:");
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_error_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 3 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Fixed(18)),
            ColumnConstraint::UpperBoundary(Width::Percentage(70)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn image_cell(name: Option<&str>) -> Cell {
    match name {
        Some(name) => Cell::new(name).fg(Color::Blue),
        None => dim_cell("-"),
    }
}

fn status_cell(clean: bool) -> Cell {
    if clean {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("✗").fg(Color::Red).add_attribute(Attribute::Bold)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
