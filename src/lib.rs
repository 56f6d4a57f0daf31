//! DCC Selection Core Library.
//! Intervall-basierte Komponenten-Selektion mit Copy-on-Write-Store,
//! als Library exportiert fuer Editor-Frontends, Picking und Undo/Redo.

pub mod app;
pub mod core;

pub use app::SelectionHistory;
pub use core::{
    ComponentChannel, ComponentIndex, IndexIntervals, IndexIter, IndexValue, Interval,
    IntervalSet, PropertyToken, ScenePath, SelectionData, SelectionList, SelectionMap,
    SelectionMask,
};
