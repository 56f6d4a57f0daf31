//! Undo/Redo fuer Selektionszustaende per Snapshotting.
//!
//! Ein Snapshot ist ein gewoehnlicher [`SelectionList`]-Klon: dank
//! Copy-on-Write kostet er O(1). Der teure Map-Klon faellt erst an, wenn
//! eine der beiden Seiten das naechste Mal mutiert. Undo/Redo braucht damit
//! keine eigene Diff-Logik.

use crate::core::SelectionList;

/// Einfacher Undo/Redo-Manager mit begrenzter Tiefe.
#[derive(Default)]
pub struct SelectionHistory {
    undo_stack: Vec<SelectionList>,
    redo_stack: Vec<SelectionList>,
    max_depth: usize,
}

impl SelectionHistory {
    /// Erstellt einen neuen History-Manager mit maximaler Tiefe.
    /// `max_depth == 0` bedeutet unbegrenzt.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::with_capacity(max_depth),
            max_depth,
        }
    }

    /// Zeichnet den Zustand vor einer mutierenden Operation auf.
    /// Verwirft den Redo-Stack.
    pub fn record(&mut self, snapshot: SelectionList) {
        if self.max_depth > 0 && self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
    }

    /// Prueft ob Undo moeglich ist.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Prueft ob Redo moeglich ist.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pop vom Undo-Stack; `current` wandert auf den Redo-Stack.
    /// Liefert den wiederherzustellenden Zustand.
    pub fn undo(&mut self, current: SelectionList) -> Option<SelectionList> {
        let previous = self.undo_stack.pop()?;
        if self.max_depth > 0 && self.redo_stack.len() >= self.max_depth {
            self.redo_stack.remove(0);
        }
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Pop vom Redo-Stack; `current` wandert auf den Undo-Stack.
    /// Liefert den wiederherzustellenden Zustand.
    pub fn redo(&mut self, current: SelectionList) -> Option<SelectionList> {
        let next = self.redo_stack.pop()?;
        if self.max_depth > 0 && self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(current);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScenePath;

    fn paths(names: &[&str]) -> Vec<ScenePath> {
        names
            .iter()
            .map(|name| ScenePath::parse(name).expect("gueltiger Pfad"))
            .collect()
    }

    fn list_with(names: &[&str]) -> SelectionList {
        SelectionList::from_paths(&paths(names))
    }

    #[test]
    fn empty_history_cannot_undo_or_redo() {
        let mut history = SelectionHistory::new_with_capacity(10);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo(SelectionList::new()).is_none());
        assert!(history.redo(SelectionList::new()).is_none());
    }

    #[test]
    fn undo_restores_previous_selection() {
        let mut history = SelectionHistory::new_with_capacity(10);

        let before = list_with(&["/World/A"]);
        history.record(before.clone());

        let current = list_with(&["/World/A", "/World/B"]);
        let restored = history.undo(current).expect("undo vorhanden");

        assert_eq!(restored, before);
        assert!(!history.can_undo());
        assert!(history.can_redo());
    }

    #[test]
    fn redo_restores_undone_selection() {
        let mut history = SelectionHistory::new_with_capacity(10);

        history.record(list_with(&["/World/A"]));
        let current = list_with(&["/World/A", "/World/B"]);
        let _restored = history.undo(current.clone());

        let redone = history.redo(list_with(&["/World/A"])).expect("redo vorhanden");
        assert_eq!(redone, current);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn new_record_clears_redo_stack() {
        let mut history = SelectionHistory::new_with_capacity(10);
        history.record(list_with(&["/A"]));
        let _ = history.undo(list_with(&["/B"]));
        assert!(history.can_redo());

        history.record(list_with(&["/C"]));
        assert!(!history.can_redo());
    }

    #[test]
    fn respects_max_depth() {
        let mut history = SelectionHistory::new_with_capacity(3);
        for name in ["/A", "/B", "/C", "/D", "/E"] {
            history.record(list_with(&[name]));
        }

        let mut undo_count = 0;
        while history.can_undo() {
            let _ = history.undo(SelectionList::new());
            undo_count += 1;
        }
        assert_eq!(undo_count, 3);
    }

    #[test]
    fn snapshots_are_cheap_and_independent() {
        let mut history = SelectionHistory::new_with_capacity(10);
        let mut working = list_with(&["/World/A"]);

        // Snapshot teilt den Datenblock; die Mutation danach forkt ihn
        history.record(working.clone());
        working.add_prims(&paths(&["/World/B"]));

        let restored = history.undo(working.clone()).expect("undo vorhanden");
        assert_eq!(restored.len(), 1);
        assert_eq!(working.len(), 2);
    }
}
