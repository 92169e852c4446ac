//! Data access port trait.

use crate::domain::bar::Bar;
use crate::domain::error::BandtraderError;
use chrono::NaiveDateTime;

pub trait DataPort {
    /// Fetch all bars from the source, sorted ascending by timestamp.
    fn fetch_bars(&self) -> Result<Vec<Bar>, BandtraderError>;

    /// First timestamp, last timestamp, and bar count of the source,
    /// or `None` when the source is empty.
    fn data_range(&self) -> Result<Option<(NaiveDateTime, NaiveDateTime, usize)>, BandtraderError>;
}
