use std::io::Write;

use spendsheet_finance::{PublishRow, Publisher, cell_count};
use spendsheet_finance::publish::SHEET_HEADER;

/// Prints each sheet as an aligned text table.
pub struct StdoutPublisher<W: Write> {
    out: W,
}

impl<W: Write> StdoutPublisher<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

pub fn render_table(rows: &[PublishRow]) -> Vec<String> {
    let cells: Vec<[String; 3]> = rows.iter().map(PublishRow::cells).collect();
    let mut widths = SHEET_HEADER.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(cells.len() + 1);
    lines.push(format!(
        "{:<dw$}  {:<nw$}  {:>aw$}",
        SHEET_HEADER[0],
        SHEET_HEADER[1],
        SHEET_HEADER[2],
        dw = widths[0],
        nw = widths[1],
        aw = widths[2]
    ));
    for [date, name, amount] in &cells {
        lines.push(format!(
            "{date:<dw$}  {name:<nw$}  {amount:>aw$}",
            dw = widths[0],
            nw = widths[1],
            aw = widths[2]
        ));
    }
    lines
}

impl<W: Write> Publisher for StdoutPublisher<W> {
    fn publish(&mut self, sheet: &str, destination: &str, rows: &[PublishRow]) -> anyhow::Result<usize> {
        writeln!(self.out, "== {sheet} ({destination}) ==")?;
        for line in render_table(rows) {
            writeln!(self.out, "{}", line.trim_end())?;
        }
        writeln!(self.out)?;
        Ok(cell_count(rows.len()))
    }
}
