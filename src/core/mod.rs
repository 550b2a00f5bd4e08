pub mod driver;
pub mod enrich;
pub mod etl;
pub mod extract;
pub mod paginator;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{CsvTable, Page, PageRequest, ResultRecord, ResultSet};
pub use crate::domain::ports::{PageFetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
