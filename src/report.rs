// src/report.rs

//! Leaderboard exports: the `.xlsx` download and the graph series.

use rust_xlsxwriter::{Format, FormatAlign, Workbook, XlsxError};
use serde::Serialize;

use crate::models::participant::LeaderboardEntry;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const HEADERS: [&str; 6] = ["Rank", "Name", "Email", "Contact", "Score", "Time (s)"];

/// One spreadsheet row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub rank: usize,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub score: i64,
    pub elapsed_seconds: Option<f64>,
}

/// Flattens ranked entries into rows. Ranks are renumbered 1..N from the input order.
pub fn export_rows(entries: &[LeaderboardEntry]) -> Vec<ExportRow> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| ExportRow {
            rank: i + 1,
            name: entry.participant.name.clone(),
            email: entry.participant.email.clone(),
            contact: entry.participant.contact.clone(),
            score: entry.participant.score,
            elapsed_seconds: entry.participant.elapsed_seconds(),
        })
        .collect()
}

/// Writes the leaderboard workbook and returns the file bytes.
///
/// Row 0 holds the title merged across all columns, row 1 the bold header,
/// then one row per participant.
pub fn leaderboard_workbook(title: &str, rows: &[ExportRow]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Leaderboard")?;

    let title_format = Format::new()
        .set_bold()
        .set_font_size(14)
        .set_align(FormatAlign::Center);
    let header_format = Format::new().set_bold();

    let last_col = (HEADERS.len() - 1) as u16;
    worksheet.merge_range(0, 0, 0, last_col, title, &title_format)?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(1, col as u16, *header, &header_format)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 2) as u32;
        worksheet.write_number(r, 0, row.rank as f64)?;
        worksheet.write_string(r, 1, &row.name)?;
        worksheet.write_string(r, 2, &row.email)?;
        worksheet.write_string(r, 3, &row.contact)?;
        worksheet.write_number(r, 4, row.score as f64)?;
        if let Some(elapsed) = row.elapsed_seconds {
            worksheet.write_number(r, 5, (elapsed * 10.0).round() / 10.0)?;
        }
    }

    worksheet.set_column_width(1, 24)?;
    worksheet.set_column_width(2, 30)?;
    worksheet.set_column_width(3, 16)?;

    workbook.save_to_buffer()
}

/// Name and score series for the bar chart.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub scores: Vec<i64>,
}

impl ChartData {
    pub fn from_entries(entries: &[LeaderboardEntry]) -> Self {
        let (labels, scores) = entries
            .iter()
            .map(|e| (e.participant.name.clone(), e.participant.score))
            .unzip();
        ChartData { labels, scores }
    }

    /// JSON array of labels, safe to embed inside a `<script>` element.
    pub fn labels_json(&self) -> String {
        script_safe_json(&self.labels)
    }

    pub fn scores_json(&self) -> String {
        script_safe_json(&self.scores)
    }
}

fn script_safe_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::participant::{Participant, rank_participants};
    use calamine::{Data, Range, Reader, Xlsx};
    use chrono::{Duration, TimeZone, Utc};
    use std::io::{Cursor, Read};

    fn entries() -> Vec<LeaderboardEntry> {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let people = [("Ada", 3, 42_500), ("Grace", 3, 30_100), ("Linus", 1, 10_000)];
        rank_participants(
            people
                .iter()
                .enumerate()
                .map(|(i, (name, score, ms))| Participant {
                    id: i as i64 + 1,
                    name: name.to_string(),
                    email: format!("{}@example.com", name.to_lowercase()),
                    contact: "555".to_string(),
                    score: *score,
                    started_at: start,
                    finished_at: Some(start + Duration::milliseconds(*ms)),
                })
                .collect(),
        )
    }

    #[test]
    fn export_rows_follow_leaderboard_order() {
        let rows = export_rows(&entries());

        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().map(|r| r.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(rows[0].name, "Grace");
        assert_eq!(rows[1].name, "Ada");
        assert_eq!(rows[2].email, "linus@example.com");
    }

    fn read_sheet(bytes: Vec<u8>) -> (Range<Data>, Vec<((u32, u32), (u32, u32))>) {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        workbook.load_merged_regions().unwrap();
        let merged = workbook
            .merged_regions_by_sheet("Leaderboard")
            .into_iter()
            .map(|(_, _, dims)| (dims.start, dims.end))
            .collect();
        let range = workbook.worksheet_range("Leaderboard").unwrap();
        (range, merged)
    }

    fn archive_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut contents = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        contents
    }

    fn cell(range: &Range<Data>, row: usize, col: usize) -> Option<Data> {
        range.get((row, col)).cloned()
    }

    fn text(value: &str) -> Option<Data> {
        Some(Data::String(value.to_string()))
    }

    #[test]
    fn workbook_rows_match_leaderboard() {
        let bytes = leaderboard_workbook("Results", &export_rows(&entries())).unwrap();
        let (range, _) = read_sheet(bytes);

        assert_eq!(range.start(), Some((0, 0)));
        assert_eq!(range.height(), 3 + 2);
        assert_eq!(cell(&range, 0, 0), text("Results"));
        for (col, header) in HEADERS.iter().enumerate() {
            assert_eq!(cell(&range, 1, col), text(header));
        }

        let ranks: Vec<_> = (2..5).map(|r| cell(&range, r, 0)).collect();
        assert_eq!(
            ranks,
            vec![Some(Data::Float(1.0)), Some(Data::Float(2.0)), Some(Data::Float(3.0))]
        );
        assert_eq!(cell(&range, 2, 1), text("Grace"));
        assert_eq!(cell(&range, 3, 1), text("Ada"));
        assert_eq!(cell(&range, 4, 1), text("Linus"));
        assert_eq!(cell(&range, 2, 2), text("grace@example.com"));
        assert_eq!(cell(&range, 2, 4), Some(Data::Float(3.0)));
        assert_eq!(cell(&range, 2, 5), Some(Data::Float(30.1)));
        assert_eq!(cell(&range, 3, 5), Some(Data::Float(42.5)));
    }

    #[test]
    fn title_spans_every_column() {
        let bytes = leaderboard_workbook("Results", &export_rows(&entries())).unwrap();
        let (_, merged) = read_sheet(bytes);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0], ((0, 0), (0, HEADERS.len() as u32 - 1)));
    }

    #[test]
    fn header_cells_are_bold() {
        let bytes = leaderboard_workbook("Results", &export_rows(&entries())).unwrap();
        let styles = archive_entry(&bytes, "xl/styles.xml");
        let sheet = archive_entry(&bytes, "xl/worksheets/sheet1.xml");

        // One bold font for the title, one for the header row.
        assert_eq!(styles.matches("<b/>").count(), 2);
        for col in ["A", "B", "C", "D", "E", "F"] {
            assert!(sheet.contains(&format!("<c r=\"{col}2\" s=\"")), "{col}2 unstyled");
        }
        assert!(sheet.contains("<c r=\"A3\"><v>1</v></c>"));
    }

    #[test]
    fn empty_workbook_keeps_title_and_header() {
        let bytes = leaderboard_workbook("Results", &[]).unwrap();
        let (range, merged) = read_sheet(bytes);

        assert_eq!(range.height(), 2);
        assert_eq!(cell(&range, 0, 0), text("Results"));
        assert_eq!(cell(&range, 1, 0), text("Rank"));
        assert_eq!(cell(&range, 1, 5), text("Time (s)"));
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn chart_json_cannot_close_script() {
        let data = ChartData {
            labels: vec!["</script><script>alert(1)".to_string()],
            scores: vec![2],
        };
        assert!(!data.labels_json().contains("</script>"));
        assert_eq!(data.scores_json(), "[2]");
    }
}
