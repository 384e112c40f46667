use dingbot_core::{ReportEntry, VersionReport};

const HEADER_CLOSE: &str = "</h2>";
const TABLE_OPEN: &str = "<table";
const TABLE_CLOSE: &str = "</table>";
const ROW_OPEN: &str = "<tr>";
const ROW_CLOSE: &str = "</tr>";
const CELL_OPEN: &str = "<td>";
const CELL_CLOSE: &str = "</td>";
const SUCCESS_CELL: &str = "Success!";
const BANNER: &str = "Microsoft (R) Program";

/// Scrape the failure rows out of a build-report fragment.
///
/// The document is a sequence of `<h2>... vNN</h2>` headers, each followed
/// by a two-column `<table>` of (product, outcome) rows. Versions whose
/// rows are all successes (or all malformed) are omitted. This is a marker
/// scan for the two known table shapes, not an HTML parser.
pub fn parse_reports(html: &str) -> Vec<VersionReport> {
    let mut reports = Vec::new();
    let mut pos = 0;

    while let Some(rel) = html[pos..].find(HEADER_CLOSE) {
        let header_end = pos + rel;
        pos = header_end + HEADER_CLOSE.len();

        // The version token sits between the last space and the closing tag.
        let Some(space) = html[..header_end].rfind(' ') else {
            continue;
        };
        let version = html[space + 1..header_end].to_string();
        if version.is_empty() {
            continue;
        }

        let Some(entries) = scrape_table(html, &mut pos) else {
            continue;
        };
        if !entries.is_empty() {
            reports.push(VersionReport { version, entries });
        }
    }

    reports
}

/// Walk the table that follows `*pos`, bounded by the next version header,
/// and advance `*pos` past its closing marker. `None` when the section has
/// no complete table.
fn scrape_table(html: &str, pos: &mut usize) -> Option<Vec<ReportEntry>> {
    let section_end = html[*pos..]
        .find(HEADER_CLOSE)
        .map(|rel| *pos + rel)
        .unwrap_or(html.len());

    let table_start = *pos + html[*pos..section_end].find(TABLE_OPEN)?;
    let table_end = table_start + html[table_start..].find(TABLE_CLOSE)?;

    let mut entries = Vec::new();
    let mut cursor = table_start;
    while cursor < table_end {
        let Some(row_start) = html[cursor..].find(ROW_OPEN).map(|rel| cursor + rel) else {
            break;
        };
        if row_start >= table_end {
            break;
        }
        let Some(row_end) = html[row_start..].find(ROW_CLOSE).map(|rel| row_start + rel)
        else {
            break;
        };
        cursor = row_end + ROW_CLOSE.len();

        let row = &html[row_start + ROW_OPEN.len()..row_end];
        if let Some(entry) = scrape_row(row) {
            entries.push(entry);
        }
    }

    *pos = table_end + TABLE_CLOSE.len();
    Some(entries)
}

/// Extract (product, detail) from one row. Rows without exactly two cells
/// and rows whose outcome cell is the success literal yield `None`.
fn scrape_row(row: &str) -> Option<ReportEntry> {
    let row = row.replace(CELL_CLOSE, "");
    let cells: Vec<&str> = row.split(CELL_OPEN).filter(|c| !c.is_empty()).collect();
    if cells.len() != 2 {
        return None;
    }
    if cells[1] == SUCCESS_CELL {
        return None;
    }

    let product = strip_tags(cells[0]);
    // <br> becomes a newline before tags are discarded wholesale.
    let mut detail = strip_tags(&cells[1].replace("<br>", "\n"));

    // Cut the compiler banner noise that precedes the real output.
    if let Some(at) = detail.find(BANNER) {
        detail = detail[at..].to_string();
    }
    while detail.contains("\n\n") {
        detail = detail.replace("\n\n", "\n");
    }

    Some(ReportEntry { product, detail })
}

/// Drop every `<`..`>` span, keeping the text outside. Known limitation:
/// quotes or a stray `>` inside a tag are not understood, nor are comments.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        "<h2>nsoftware - v20</h2><table>",
        "<tr><td>ProdA</td><td>Error<br><br>line2</td></tr>",
        "<tr><td>ProdB</td><td>Success!</td></tr>",
        "</table>",
    );

    #[test]
    fn scrapes_failures_and_drops_success_rows() {
        let reports = parse_reports(SAMPLE);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].version, "v20");
        assert_eq!(
            reports[0].entries,
            vec![ReportEntry {
                product: "ProdA".to_string(),
                detail: "Error\nline2".to_string(),
            }]
        );
    }

    #[test]
    fn scraping_is_idempotent() {
        assert_eq!(parse_reports(SAMPLE), parse_reports(SAMPLE));
    }

    #[test]
    fn all_success_version_is_omitted() {
        let html = concat!(
            "<h2>nsoftware - v20</h2><table>",
            "<tr><td>ProdA</td><td>Success!</td></tr>",
            "</table>",
            "<h2>nsoftware - v22</h2><table>",
            "<tr><td>ProdC</td><td>boom</td></tr>",
            "</table>",
        );
        let reports = parse_reports(html);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].version, "v22");
    }

    #[test]
    fn versions_keep_document_order() {
        let html = concat!(
            "<h2>nsoftware - v22</h2><table>",
            "<tr><td>ProdC</td><td>boom</td></tr></table>",
            "<h2>nsoftware - v20</h2><table>",
            "<tr><td>ProdA</td><td>bang</td></tr></table>",
        );
        let reports = parse_reports(html);
        let versions: Vec<&str> = reports
            .iter()
            .map(|r| r.version.as_str())
            .collect();
        assert_eq!(versions, vec!["v22", "v20"]);
    }

    #[test]
    fn rows_without_two_cells_are_skipped() {
        let html = concat!(
            "<h2>nsoftware - v20</h2><table>",
            "<tr><td>only one cell</td></tr>",
            "<tr><td>a</td><td>b</td><td>c</td></tr>",
            "<tr><td>ProdA</td><td>err</td></tr>",
            "</table>",
        );
        let reports = parse_reports(html);
        assert_eq!(reports[0].entries.len(), 1);
        assert_eq!(reports[0].entries[0].product, "ProdA");
    }

    #[test]
    fn header_without_preceding_space_is_skipped() {
        let html = "v20</h2><table><tr><td>ProdA</td><td>err</td></tr></table>";
        assert!(parse_reports(html).is_empty());
    }

    #[test]
    fn header_with_trailing_space_is_skipped() {
        // The backward scan stops at the space right before the marker,
        // which would make the version token empty.
        let html =
            "<h2>nsoftware - v20 </h2><table><tr><td>ProdA</td><td>err</td></tr></table>";
        assert!(parse_reports(html).is_empty());
    }

    #[test]
    fn header_without_table_is_skipped() {
        let html = concat!(
            "<h2>nsoftware - v20</h2><p>no table here</p>",
            "<h2>nsoftware - v22</h2><table>",
            "<tr><td>ProdC</td><td>boom</td></tr></table>",
        );
        let reports = parse_reports(html);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].version, "v22");
    }

    #[test]
    fn markup_is_stripped_from_both_cells() {
        let html = concat!(
            "<h2>nsoftware - v20</h2><table>",
            "<tr><td><b>ProdA</b> [C++ Edition]</td>",
            "<td><span style=\"color:red\">failed</span> hard</td></tr>",
            "</table>",
        );
        let reports = parse_reports(html);
        assert_eq!(reports[0].entries[0].product, "ProdA [C++ Edition]");
        assert_eq!(reports[0].entries[0].detail, "failed hard");
    }

    #[test]
    fn compiler_banner_prefix_is_cut() {
        let html = concat!(
            "<h2>nsoftware - v20</h2><table>",
            "<tr><td>ProdA</td>",
            "<td>setting env vars<br>Microsoft (R) Program Maintenance Utility",
            "<br>fatal error U1077</td></tr>",
            "</table>",
        );
        let detail = &parse_reports(html)[0].entries[0].detail;
        assert!(detail.starts_with("Microsoft (R) Program"));
        assert!(detail.contains("fatal error U1077"));
    }

    #[test]
    fn details_never_contain_double_newlines() {
        let html = concat!(
            "<h2>nsoftware - v20</h2><table>",
            "<tr><td>ProdA</td><td>a<br><br><br><br>b<br><br>c</td></tr>",
            "</table>",
        );
        let detail = &parse_reports(html)[0].entries[0].detail;
        assert!(!detail.contains("\n\n"));
        assert_eq!(detail, "a\nb\nc");
    }

    #[test]
    fn empty_input_yields_no_reports() {
        assert!(parse_reports("").is_empty());
        assert!(parse_reports("<p>no headers at all</p>").is_empty());
    }
}
