use std::{
    cell::RefCell,
    fs::File,
    io::{self, Write},
    marker::PhantomData,
    path::Path,
};

use csv::{QuoteStyle, Writer, WriterBuilder};
use serde::Serialize;

use crate::{
    BatchError,
    core::item::{ItemWriter, ItemWriterResult},
};

/// Item writer serializing records to CSV.
pub struct CsvItemWriter<T: Write> {
    wrapper: RefCell<Writer<T>>,
}

impl<T: Write, O: Serialize> ItemWriter<O> for CsvItemWriter<T> {
    fn write(&self, items: &[O]) -> ItemWriterResult {
        let mut writer = self.wrapper.borrow_mut();
        for item in items {
            writer
                .serialize(item)
                .map_err(|error| BatchError::ItemWriter(error.to_string()))?;
        }
        Ok(())
    }

    /// Flush the contents of the internal buffer to the underlying writer.
    ///
    /// Note that this also flushes the underlying writer.
    fn flush(&self) -> ItemWriterResult {
        self.wrapper
            .borrow_mut()
            .flush()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))
    }
}

impl<T: Write> CsvItemWriter<T> {
    pub fn into_inner(self) -> Result<T, BatchError> {
        self.wrapper
            .into_inner()
            .into_inner()
            .map_err(|error| BatchError::ItemWriter(error.to_string()))
    }
}

pub struct CsvItemWriterBuilder<O> {
    delimiter: u8,
    has_headers: bool,
    quote_style: QuoteStyle,
    _phantom: PhantomData<O>,
}

impl<O> Default for CsvItemWriterBuilder<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> CsvItemWriterBuilder<O> {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
            quote_style: QuoteStyle::Necessary,
            _phantom: PhantomData,
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    /// Controls quoting of fields; defaults to quoting only when needed.
    pub fn quote_style(mut self, quote_style: QuoteStyle) -> Self {
        self.quote_style = quote_style;
        self
    }

    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvItemWriter<File>, BatchError> {
        let writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .quote_style(self.quote_style)
            .from_path(path)
            .map_err(|error| BatchError::ItemWriter(error.to_string()))?;

        Ok(CsvItemWriter {
            wrapper: RefCell::new(writer),
        })
    }

    /// Serializes records into any [`io::Write`], for example a `Vec<u8>`
    /// buffer in tests.
    pub fn from_writer<W: io::Write>(self, writer: W) -> CsvItemWriter<W> {
        let writer = WriterBuilder::new()
            .flexible(false)
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            .quote_style(self.quote_style)
            .from_writer(writer);

        CsvItemWriter {
            wrapper: RefCell::new(writer),
        }
    }
}
