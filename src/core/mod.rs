//! Core-Domaenentypen: Intervallmengen, Pfade, Selektionsdatensaetze und
//! der Copy-on-Write-Selektions-Store.

pub mod interval_set;
pub mod path;
pub mod property;
pub mod selection_data;
pub mod selection_list;

pub use interval_set::{IndexIter, IndexValue, Interval, IntervalSet};
pub use path::ScenePath;
pub use property::PropertyToken;
pub use selection_data::{ComponentChannel, ComponentIndex, IndexIntervals, SelectionData};
pub use selection_list::{SelectionList, SelectionMap, SelectionMask};
