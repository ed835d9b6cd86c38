use std::fmt::Debug;

use log::info;

use crate::core::item::{ItemWriter, ItemWriterResult};

/// Writer that logs every record, useful for debugging and for previewing a
/// batch without a UI.
#[derive(Default)]
pub struct LoggerWriter;

impl<O> ItemWriter<O> for LoggerWriter
where
    O: Debug,
{
    fn write(&self, items: &[O]) -> ItemWriterResult {
        items.iter().for_each(|item| info!("Record:{:?}", item));
        Ok(())
    }
}
