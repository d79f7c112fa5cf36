//! # hmmtag Data
//!
//! Loading for tagged corpora shipped as a zip of JSON splits
//! (`train.json`, `val.json`, `test.json`), plus summary statistics for
//! exploring them.
pub mod archive;
pub mod dataset;
pub mod error;
pub mod stats;

pub use archive::{unzip_data, unzip_file};
pub use dataset::{Dataset, Split, load_dataset, read_json};
pub use error::{DataError, Result};
pub use stats::DatasetStats;
