//! HTML index page accumulator.
//!
//! Cells are appended in batch order and wrapped into table rows of a
//! fixed column count. The trailing partial row is always closed when
//! the page is finished.

const HEAD: &str = "<!DOCTYPE html>\n<html>\n<head>\n<title>QRvCards</title>\n<style>\n\
table, td, th { border: 1px solid black; }\n\
table { border-collapse: collapse; width: 100%; }\n\
</style>\n</head>\n<body>\n<table>\n";

const TAIL: &str = "</table>\n</body>\n</html>\n";

/// Builder for the browsable index of generated QR images.
#[derive(Debug, Clone)]
pub struct IndexPage {
    columns: usize,
    cells: usize,
    body: String,
}

impl IndexPage {
    /// Create an empty page laid out `columns` cells per table row.
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
            cells: 0,
            body: String::new(),
        }
    }

    /// Append one cell holding the image and its display name heading.
    pub fn push_cell(&mut self, image_href: &str, display_name: &str) {
        if self.cells % self.columns == 0 {
            if self.cells > 0 {
                self.body.push_str("</tr>\n");
            }
            self.body.push_str("<tr>\n");
        }
        self.body.push_str(&format!(
            "<td align=\"center\"><div><img src=\"{}\">\n<h3>{}</h3></div></td>\n",
            escape_html(image_href),
            escape_html(display_name)
        ));
        self.cells += 1;
    }

    pub fn cell_count(&self) -> usize {
        self.cells
    }

    /// Close any open row and emit the complete document.
    pub fn finish(mut self) -> String {
        if self.cells > 0 {
            self.body.push_str("</tr>\n");
        }
        format!("{}{}{}", HEAD, self.body, TAIL)
    }
}

/// Escape the characters that would otherwise corrupt the page markup.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_cell_row_is_closed() {
        let mut page = IndexPage::new(3);
        page.push_cell("a.png", "A B");
        let html = page.finish();
        assert_eq!(html.matches("<tr>").count(), 1);
        assert_eq!(html.matches("</tr>").count(), 1);
        assert!(html.contains("<img src=\"a.png\">"));
        assert!(html.contains("<h3>A B</h3>"));
    }

    #[test]
    fn seven_cells_in_three_columns_close_three_rows() {
        let mut page = IndexPage::new(3);
        for i in 0..7 {
            page.push_cell(&format!("{i}.png"), "x");
        }
        let html = page.finish();
        assert_eq!(html.matches("<tr>").count(), 3);
        assert_eq!(html.matches("</tr>").count(), 3);
    }

    #[test]
    fn exact_multiple_leaves_no_empty_row() {
        let mut page = IndexPage::new(2);
        for i in 0..4 {
            page.push_cell(&format!("{i}.png"), "x");
        }
        let html = page.finish();
        assert_eq!(html.matches("<tr>").count(), 2);
        assert_eq!(html.matches("</tr>").count(), 2);
        assert!(!html.contains("<tr>\n</tr>"));
    }

    #[test]
    fn empty_page_is_a_bare_table() {
        let html = IndexPage::new(3).finish();
        assert!(!html.contains("<tr>"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn markup_characters_in_names_are_escaped() {
        let mut page = IndexPage::new(2);
        page.push_cell("a.png", "Dee <Ampersand> & Co \"D\"");
        let html = page.finish();
        assert!(html.contains("<h3>Dee &lt;Ampersand&gt; &amp; Co &quot;D&quot;</h3>"));
        assert!(!html.contains("<Ampersand>"));
    }

    #[test]
    fn cells_appear_in_insertion_order() {
        let mut page = IndexPage::new(2);
        page.push_cell("first.png", "First");
        page.push_cell("second.png", "Second");
        let html = page.finish();
        assert!(html.find("first.png").unwrap() < html.find("second.png").unwrap());
    }
}
