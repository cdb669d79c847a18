use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use lexitrial::stage::Stage;
use lexitrial::summary::SummaryBook;
use strum::IntoEnumIterator;

pub struct ConfigAuditRow {
    pub stage: String,
    pub true_words: usize,
    pub false_words: usize,
    pub targets: usize,
    pub pinned: usize,
    pub total: usize,
    pub status: String,
}

pub fn print_config_audit(rows: &[ConfigAuditRow]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Stage").add_attribute(Attribute::Bold),
        Cell::new("True"),
        Cell::new("False"),
        Cell::new("Targets"),
        Cell::new("Pinned"),
        Cell::new("Total"),
        Cell::new("Status").add_attribute(Attribute::Bold),
    ]);

    for i in 1..=5 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for row in rows {
        let status_cell = if row.status == "ok" {
            Cell::new(&row.status).fg(Color::Green)
        } else {
            Cell::new(&row.status).fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(&row.stage).add_attribute(Attribute::Bold),
            Cell::new(row.true_words),
            Cell::new(row.false_words),
            Cell::new(row.targets),
            Cell::new(row.pinned),
            Cell::new(row.total),
            status_cell,
        ]);
    }
    println!("\n{}", table);
}

pub fn print_session_report(book: &SummaryBook) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Stage").add_attribute(Attribute::Bold),
        Cell::new("Trials"),
        Cell::new("Lexical %").fg(Color::Cyan),
        Cell::new("Target %").fg(Color::Cyan),
        Cell::new("Mean RT (ms)"),
        Cell::new("Final balance"),
    ]);

    for i in 1..=5 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for stage in Stage::iter() {
        let cols = book.stage(stage);
        if cols.is_empty() {
            continue;
        }
        // Practice retries leave one entry per attempt; show them all.
        let lexical = cols.lexical_accuracy.join(" / ");
        let phonetic = cols.phonetic_accuracy.join(" / ");
        let mean_rt = cols.mean_reaction_times.join(" / ");
        let balance = cols
            .balance_accum
            .as_ref()
            .and_then(|accum| accum.iter().rev().find(|v| !v.is_empty()))
            .map(|v| format!("${}", v))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(stage.prefix()).add_attribute(Attribute::Bold),
            Cell::new(cols.words.len()),
            Cell::new(lexical),
            Cell::new(phonetic),
            Cell::new(mean_rt),
            Cell::new(balance),
        ]);
    }
    println!("\n{}", table);
}
