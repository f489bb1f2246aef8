//! Table rendering utilities for CLI outputs.

use crate::utils::colors::display_width;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| display_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(display_width(cell));
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let push_line = |out: &mut String, cells: &[String]| {
            for (i, w) in widths.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                let pad = w.saturating_sub(display_width(cell));
                out.push_str(cell);
                out.push_str(&" ".repeat(pad + 2));
            }
            let trimmed = out.trim_end_matches(' ').len();
            out.truncate(trimmed);
            out.push('\n');
        };

        push_line(&mut out, &self.headers);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut out, &rule);
        for row in &self.rows {
            push_line(&mut out, row);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let mut t = Table::new(["ROLL", "NAME"]);
        t.add_row(vec!["A1".into(), "Ana Maria".into()]);
        t.add_row(vec!["B22222".into(), "Bo".into()]);

        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ROLL    NAME");
        assert_eq!(lines[2], "A1      Ana Maria");
        assert_eq!(lines[3], "B22222  Bo");
    }

    #[test]
    fn ansi_codes_do_not_count() {
        assert_eq!(display_width("\x1b[32mok\x1b[0m"), 2);
    }

    #[test]
    fn wide_names_keep_columns_aligned() {
        let mut t = Table::new(["NAME", "ROLL"]);
        t.add_row(vec!["李明".into(), "A1".into()]);
        t.add_row(vec!["Ana Maria".into(), "B2".into()]);
        t.add_row(vec!["José".into(), "C3".into()]);

        let out = t.render();
        // every row ends with a two-char roll; what precedes it is the name column
        let roll_columns: Vec<usize> = out
            .lines()
            .skip(2)
            .map(|line| display_width(&line[..line.len() - 2]))
            .collect();
        assert_eq!(roll_columns, vec![11, 11, 11]);
    }
}
