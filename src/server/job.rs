use crate::excel::{compute_checksum, load_workbook, write_merged, ExcelError};
use crate::merge::{merge, MergeReport};

/// One uploaded spreadsheet as received from the client
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("unnamed")
    }
}

#[derive(Debug)]
pub struct JobOutcome {
    pub bytes: Vec<u8>,
    pub checksum: String,
    pub report: MergeReport,
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Template is not a readable spreadsheet: {0}")]
    InvalidTemplate(#[source] ExcelError),
    #[error("Data file {index} ({name}) is not a readable spreadsheet: {source}")]
    InvalidDataFile {
        index: usize,
        name: String,
        #[source]
        source: ExcelError,
    },
    #[error("Failed to write merged workbook: {0}")]
    Write(#[source] ExcelError),
}

/// Load all uploads, merge them and write the result back onto the template.
///
/// CPU bound; callers on the async runtime run it on a blocking worker.
pub fn run_job(
    template: &[u8],
    data_files: &[UploadedFile],
    teacher_full_name: &str,
) -> Result<JobOutcome, JobError> {
    let template_book = load_workbook(template).map_err(JobError::InvalidTemplate)?;

    let data_books = data_files
        .iter()
        .enumerate()
        .map(|(i, file)| {
            load_workbook(&file.bytes).map_err(|source| JobError::InvalidDataFile {
                index: i + 1,
                name: file.display_name().to_string(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (merged, report) = merge(template_book, &data_books, teacher_full_name);
    let (bytes, summary) = write_merged(template, &merged).map_err(JobError::Write)?;
    let checksum = compute_checksum(&bytes);

    tracing::info!(
        classes = report.classes.len(),
        unmatched = report.unmatched_classes.len(),
        edits = summary.edits_applied,
        renamed = summary.sheets_renamed,
        "Merge job finished"
    );

    Ok(JobOutcome {
        bytes,
        checksum,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::Cell;
    use std::io::Cursor;

    fn xlsx(title: &str, rows: &[&[&str]]) -> Vec<u8> {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet
                        .get_cell_mut(((c + 1) as u32, (r + 1) as u32))
                        .set_value(*value);
                }
            }
        }
        sheet.set_name(title);

        let mut out = Cursor::new(Vec::new());
        umya_spreadsheet::writer::xlsx::write_writer(&book, &mut out).unwrap();
        out.into_inner()
    }

    fn upload(name: &str, bytes: Vec<u8>) -> UploadedFile {
        UploadedFile {
            file_name: Some(name.to_string()),
            bytes,
        }
    }

    #[test]
    fn test_run_job_fills_template() {
        let template = xlsx(
            "Sheet1",
            &[
                &["O'qituvchi:", "", "Sinf:"],
                &["Familiya ism", "BSB", "ChSB"],
                &["Aliyev Vali", "", ""],
                &["Karimov Anvar", "", ""],
            ],
        );
        let data = xlsx(
            "7-B",
            &[
                &["FIO", "BSB", "CHSB"],
                &["aliyev  vali", "41", "18"],
                &["Karimov Anvar o'g'li", "37,5", ""],
            ],
        );

        let outcome = run_job(&template, &[upload("7-B.xlsx", data)], "Karimova Dilnoza").unwrap();

        assert_eq!(outcome.report.teacher_short, "Karimova D.");
        assert_eq!(outcome.report.classes.len(), 1);
        assert_eq!(outcome.report.classes[0].class_label, "7-B");
        assert_eq!(outcome.report.classes[0].filled, 2);
        assert_eq!(outcome.checksum, compute_checksum(&outcome.bytes));

        let merged = load_workbook(&outcome.bytes).unwrap();
        assert_eq!(merged.sheet_names(), vec!["7-B"]);
        let grid = merged.first().unwrap().grid();
        assert_eq!(grid.text(1, 2), Some("Karimova D."));
        assert_eq!(grid.text(1, 4), Some("7-B"));
        assert_eq!(grid.get(3, 2), &Cell::Number(41.0));
        assert_eq!(grid.get(4, 2), &Cell::Number(37.5));
        assert!(grid.get(4, 3).is_empty());
    }

    #[test]
    fn test_unreadable_data_file_is_named() {
        let template = xlsx("Sheet1", &[&["FIO", "BSB", "ChSB"]]);
        let files = vec![
            upload("5-A.xlsx", xlsx("5-A", &[&["FIO", "BSB"]])),
            upload("scan.pdf", b"%PDF-1.4".to_vec()),
        ];

        let err = run_job(&template, &files, "Karimova").unwrap_err();
        match &err {
            JobError::InvalidDataFile { index, name, .. } => {
                assert_eq!(*index, 2);
                assert_eq!(name, "scan.pdf");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unreadable_template() {
        let err = run_job(b"not a workbook", &[], "Karimova").unwrap_err();
        assert!(matches!(err, JobError::InvalidTemplate(_)));
    }
}
