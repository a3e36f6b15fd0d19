use std::io::Write;

use comfy_table::{Attribute, Cell, ContentArrangement, Table};

use crate::table::{display_value, ResultTable};

pub fn render_table(table: &ResultTable) -> Table {
    let mut rendered = Table::new();
    rendered.set_content_arrangement(ContentArrangement::Dynamic);

    let headers: Vec<Cell> = table
        .columns()
        .iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect();
    rendered.set_header(headers);

    for row in table.rows() {
        rendered.add_row(row.iter().map(display_value).collect::<Vec<_>>());
    }
    rendered
}

/// Header line followed by one record per row; `null` cells are left empty.
pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(display_value))?;
    }
    wtr.flush()?;
    Ok(())
}
