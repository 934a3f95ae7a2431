use std::fs::File;
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Writer};

use crate::domain::organization::AccountRow;
use crate::domain::ticket::TicketRequestRow;
use crate::error::{AppError, AppResult};

const ACCOUNT_HEADER: [&str; 3] = ["ACCOUNT CODE", "ACCOUNT ID", "ACCOUNT NAME"];

pub fn open_ticket_rows(path: &Path) -> AppResult<TicketRows<File>> {
    let file = File::open(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => {
            AppError::Spreadsheet(format!("file '{}' not found", path.display()))
        }
        _ => AppError::Io(err),
    })?;
    Ok(ticket_rows(file))
}

/// Reads ticket rows positionally; the first line is a header and is skipped.
pub fn ticket_rows<R: io::Read>(input: R) -> TicketRows<R> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    TicketRows {
        records: reader.into_records(),
        row_number: 0,
    }
}

/// Yields one parsed row at a time so earlier rows can be acted on before a
/// malformed one is reached.
pub struct TicketRows<R> {
    records: StringRecordsIntoIter<R>,
    row_number: usize,
}

impl<R: io::Read> Iterator for TicketRows<R> {
    type Item = AppResult<TicketRequestRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        self.row_number += 1;
        let row_number = self.row_number;
        Some(
            record
                .map_err(|err| AppError::Spreadsheet(format!("row {row_number}: {err}")))
                .and_then(|record| ticket_row(&record, row_number)),
        )
    }
}

fn ticket_row(record: &StringRecord, row_number: usize) -> AppResult<TicketRequestRow> {
    let raw_org_id = column(record, row_number, 1, "organization_id")?;
    let organization_id = raw_org_id.trim().parse::<u64>().map_err(|_| {
        AppError::Spreadsheet(format!(
            "row {row_number}: organization_id '{raw_org_id}' is not an integer"
        ))
    })?;

    Ok(TicketRequestRow {
        account_code: column(record, row_number, 0, "account_code")?.to_string(),
        organization_id,
        subject: column(record, row_number, 2, "subject")?.to_string(),
        description: column(record, row_number, 3, "description")?.to_string(),
    })
}

fn column<'a>(
    record: &'a StringRecord,
    row_number: usize,
    index: usize,
    name: &str,
) -> AppResult<&'a str> {
    record.get(index).ok_or_else(|| {
        AppError::Spreadsheet(format!("row {row_number}: missing column '{name}'"))
    })
}

/// Writes organization rows under the account header.
pub struct AccountWriter<W: io::Write> {
    inner: Writer<W>,
}

impl AccountWriter<File> {
    pub fn create(path: &Path) -> AppResult<Self> {
        let file = File::create(path)?;
        Self::new(file)
    }
}

impl<W: io::Write> AccountWriter<W> {
    pub fn new(output: W) -> AppResult<Self> {
        let mut inner = Writer::from_writer(output);
        inner.write_record(ACCOUNT_HEADER)?;
        Ok(Self { inner })
    }

    pub fn write(&mut self, row: &AccountRow) -> AppResult<()> {
        let id = row.id.to_string();
        self.inner
            .write_record([row.account_code.as_str(), id.as_str(), row.name.as_str()])?;
        Ok(())
    }

    pub fn flush(&mut self) -> AppResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> AppResult<W> {
        self.inner
            .into_inner()
            .map_err(|err| AppError::Io(err.into_error()))
    }
}
