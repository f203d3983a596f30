use crate::core::{RecordSource, Row, Table};
use crate::utils::error::{Result, SplitError};
use async_trait::async_trait;
use encoding_rs::Encoding;
use std::path::PathBuf;

pub const DEFAULT_ENCODING: &str = "Shift_JIS";
pub const DEFAULT_DELIMITER: char = ',';

/// Delimited text file in a legacy encoding. The first record is the header.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    encoding: &'static Encoding,
    delimiter: u8,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            encoding: encoding_rs::SHIFT_JIS,
            delimiter: DEFAULT_DELIMITER as u8,
        }
    }

    pub fn with_encoding(mut self, label: &str) -> Result<Self> {
        self.encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
            SplitError::InvalidConfigValueError {
                field: "encoding".to_string(),
                value: label.to_string(),
                reason: "Unknown text encoding label".to_string(),
            }
        })?;
        Ok(self)
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Result<Self> {
        if !delimiter.is_ascii() {
            return Err(SplitError::InvalidConfigValueError {
                field: "delimiter".to_string(),
                value: delimiter.to_string(),
                reason: "Delimiter must be a single ASCII character".to_string(),
            });
        }
        self.delimiter = delimiter as u8;
        Ok(self)
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Decodes and tokenizes raw bytes.
    pub fn parse(&self, bytes: &[u8]) -> Result<Table> {
        let text = decode(self.encoding, bytes)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .from_reader(text.as_bytes());

        let mut records = reader.records();
        let header: Row = match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => {
                return Err(SplitError::ValidationError {
                    message: format!("{} has no header row", self.path.display()),
                })
            }
        };

        let rows = records
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect::<Row>()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Table::new(header, rows))
    }
}

/// Strict decode: any malformed byte sequence fails the whole source.
fn decode<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Result<std::borrow::Cow<'a, str>> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(SplitError::DecodeError {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(text)
}

#[async_trait]
impl RecordSource for CsvSource {
    async fn read(&self) -> Result<Table> {
        tracing::debug!(
            "Reading {} as {}",
            self.path.display(),
            self.encoding.name()
        );
        let bytes = tokio::fs::read(&self.path).await?;
        self.parse(&bytes)
    }
}
