//! Copy-on-Write-Store fuer Selektionszustand, adressiert ueber Szenen-Pfade.
//!
//! Mehrere [`SelectionList`]-Werte teilen sich denselben Datenblock, bis
//! einer von ihnen mutiert wird; erst dann wird der Block kopiert
//! (`Arc::make_mut`). Undo/Redo-Systeme koennen deshalb Selektionszustaende
//! als O(1)-Snapshots vor und nach einer Operation festhalten, ohne eigene
//! Diffs zu bauen.

use std::collections::HashSet;
use std::ops::Index;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use super::path::ScenePath;
use super::property::PropertyToken;
use super::selection_data::{ComponentChannel, ComponentIndex, IndexIntervals, SelectionData};


bitflags::bitflags! {
    /// Maske ueber die Selektions-Achsen, auf die sich eine Mengen-Operation
    /// auswirkt: die vier Komponenten-Kanaele, Properties und das
    /// Voll-Selektions-Flag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SelectionMask: u32 {
        const POINTS = 1 << 0;
        const EDGES = 1 << 1;
        const ELEMENTS = 1 << 2;
        const INSTANCES = 1 << 3;
        const PROPERTIES = 1 << 4;
        const FULL_SELECTION = 1 << 5;
        const ALL = Self::POINTS.bits()
            | Self::EDGES.bits()
            | Self::ELEMENTS.bits()
            | Self::INSTANCES.bits()
            | Self::PROPERTIES.bits()
            | Self::FULL_SELECTION.bits();
    }
}

impl SelectionMask {
    /// Masken-Bit eines Komponenten-Kanals.
    pub fn for_channel(channel: ComponentChannel) -> Self {
        match channel {
            ComponentChannel::Points => Self::POINTS,
            ComponentChannel::Edges => Self::EDGES,
            ComponentChannel::Elements => Self::ELEMENTS,
            ComponentChannel::Instances => Self::INSTANCES,
        }
    }
}

/// Map von Szenen-Pfad auf Selektionsdatensatz. IndexMap haelt die
/// Einfuege-Reihenfolge stabil und macht Iterationen reproduzierbar.
pub type SelectionMap = IndexMap<ScenePath, SelectionData>;

/// Geteilter Datenblock hinter einer [`SelectionList`].
#[derive(Debug, Default)]
struct SelectionListData {
    map: SelectionMap,
    /// Lazy-Cache der revision-geordneten Pfade. Jede Mutation ersetzt die
    /// Zelle durch eine frische, der Cache ist also nie veraltet.
    ordered_paths: OnceLock<Vec<ScenePath>>,
}

impl Clone for SelectionListData {
    fn clone(&self) -> Self {
        // Der Klon startet mit leerem Cache und baut ihn bei Bedarf neu auf
        Self {
            map: self.map.clone(),
            ordered_paths: OnceLock::new(),
        }
    }
}

fn empty_selection_data() -> &'static SelectionData {
    static EMPTY: OnceLock<SelectionData> = OnceLock::new();
    EMPTY.get_or_init(SelectionData::default)
}

/// Copy-on-Write-Selektionsliste: Pfad → [`SelectionData`].
///
/// Klonen ist O(1) (Arc-Clone); die erste Mutation eines Klons kopiert den
/// Datenblock, Geschwister-Klone bleiben unberuehrt.
#[derive(Debug, Clone, Default)]
pub struct SelectionList {
    data: Arc<SelectionListData>,
}

impl SelectionList {
    /// Erstellt eine leere Selektionsliste.
    pub fn new() -> Self {
        Self::default()
    }

    /// Erstellt eine Liste, in der alle angegebenen Pfade voll selektiert sind.
    pub fn from_paths(paths: &[ScenePath]) -> Self {
        let mut list = Self::new();
        list.set_selected_paths(paths);
        list
    }

    /// Erstellt eine Liste aus einer fertigen Selektions-Map.
    pub fn from_map(map: SelectionMap) -> Self {
        Self {
            data: Arc::new(SelectionListData {
                map,
                ordered_paths: OnceLock::new(),
            }),
        }
    }

    /// Exklusiven Zugriff auf den Datenblock holen und den Pfad-Cache
    /// invalidieren. Kopiert den Block nur, wenn er geteilt ist (CoW).
    fn detach(&mut self) -> &mut SelectionListData {
        if Arc::strong_count(&self.data) > 1 {
            log::trace!("Selektions-Block geteilt, kopiere vor Mutation");
        }
        let data = Arc::make_mut(&mut self.data);
        data.ordered_paths = OnceLock::new();
        data
    }

    /// Anzahl der Pfade mit irgendeiner Selektion.
    pub fn len(&self) -> usize {
        self.data.map.len()
    }

    /// Prueft ob die Liste leer ist.
    pub fn is_empty(&self) -> bool {
        self.data.map.is_empty()
    }

    /// Prueft ob fuer den Pfad irgendetwas selektiert ist.
    pub fn contains(&self, path: &ScenePath) -> bool {
        self.data.map.contains_key(path)
    }

    /// Anzahl der voll selektierten Pfade.
    pub fn fully_selected_path_count(&self) -> usize {
        self.data
            .map
            .values()
            .filter(|record| record.is_fully_selected())
            .count()
    }

    /// Der Datensatz eines Pfads; fuer unbekannte Pfade ein leerer Datensatz.
    /// `contains`/`is_empty` unterscheiden "nie selektiert" von "selektiert,
    /// aber nichts uebrig".
    pub fn selection_data(&self, path: &ScenePath) -> &SelectionData {
        self.data.map.get(path).unwrap_or_else(|| empty_selection_data())
    }

    /// Der Datensatz eines Pfads, falls vorhanden.
    pub fn get(&self, path: &ScenePath) -> Option<&SelectionData> {
        self.data.map.get(path)
    }

    /// Iteriert ueber (Pfad, Datensatz)-Paare in Map-Reihenfolge.
    pub fn iter(&self) -> indexmap::map::Iter<'_, ScenePath, SelectionData> {
        self.data.map.iter()
    }

    /// Alle voll selektierten Pfade, nach Revision geordnet (also in der
    /// Reihenfolge, in der sie selektiert wurden). Wird bei jedem Aufruf neu
    /// berechnet.
    pub fn fully_selected_paths(&self) -> Vec<ScenePath> {
        let mut paths: Vec<ScenePath> = self
            .data
            .map
            .iter()
            .filter(|(_, record)| record.is_fully_selected())
            .map(|(path, _)| path.clone())
            .collect();
        paths.sort_by_key(|path| self.data.map[path].revision());
        paths
    }

    /// Alle Pfade mit irgendeiner Selektion (Komponenten oder voll), nach
    /// Revision geordnet. Das Ergebnis wird im Datenblock gecacht; jede
    /// Mutation verwirft den Cache.
    pub fn selected_paths(&self) -> &[ScenePath] {
        self.data.ordered_paths.get_or_init(|| {
            let mut paths: Vec<ScenePath> = self.data.map.keys().cloned().collect();
            paths.sort_by_key(|path| self.data.map[path].revision());
            paths
        })
    }

    /// Setzt Voll-Selektion fuer alle angegebenen Pfade; bestehende
    /// Komponenten-Selektion bleibt erhalten.
    pub fn add_prims(&mut self, paths: &[ScenePath]) {
        if paths.is_empty() {
            return;
        }
        let data = self.detach();
        for path in paths {
            data.map
                .entry(path.clone())
                .or_default()
                .set_fully_selected(true);
        }
    }

    /// Entfernt ganze Pfade aus der Liste, inklusive Komponenten-Selektion.
    pub fn remove_prims(&mut self, paths: &[ScenePath]) {
        if paths.is_empty() {
            return;
        }
        let data = self.detach();
        for path in paths {
            data.map.shift_remove(path);
        }
    }

    /// Ersetzt den Inhalt durch genau die angegebenen Pfade, voll selektiert.
    pub fn set_selected_paths(&mut self, paths: &[ScenePath]) {
        let data = self.detach();
        data.map = paths
            .iter()
            .map(|path| (path.clone(), SelectionData::prim_selection(true)))
            .collect();
        log::debug!("Selektion ersetzt: {} Pfade", data.map.len());
    }

    /// Leert die Liste.
    pub fn clear(&mut self) {
        let data = self.detach();
        data.map.clear();
    }

    /// Setzt das Voll-Selektions-Flag eines Pfads, ohne die
    /// Komponenten-Kanaele anzufassen. Wird der Datensatz dadurch leer,
    /// faellt der Pfad aus der Liste; unbekannte Pfade werden bei `true`
    /// angelegt.
    pub fn set_full_selection(&mut self, path: &ScenePath, fully_selected: bool) {
        let data = self.detach();
        if let Some(record) = data.map.get_mut(path) {
            if record.is_fully_selected() == fully_selected {
                return;
            }
            record.set_fully_selected(fully_selected);
            if record.is_empty() {
                data.map.shift_remove(path);
            }
        } else if fully_selected {
            data.map
                .insert(path.clone(), SelectionData::prim_selection(true));
        }
    }

    /// Ersetzt den kompletten Datensatz eines Pfads; ein leerer Datensatz
    /// loescht den Eintrag. Vergibt immer eine frische Revision.
    pub fn set_selection_data(&mut self, path: &ScenePath, mut selection_data: SelectionData) {
        let data = self.detach();
        if selection_data.is_empty() {
            data.map.shift_remove(path);
        } else {
            selection_data.touch();
            data.map.insert(path.clone(), selection_data);
        }
    }

    /// Vereinigt `other` kanalweise in diese Liste, beschraenkt auf die
    /// Achsen der Maske. Fehlende Pfade werden angelegt; nur nicht-leere
    /// Ergebnisse werden eingefuegt.
    pub fn merge(&mut self, other: &SelectionList, mask: SelectionMask) {
        if mask.is_empty() || other.is_empty() {
            return;
        }
        let data = self.detach();
        for (path, incoming) in &other.data.map {
            match data.map.get_mut(path) {
                Some(current) => {
                    if mask.contains(SelectionMask::FULL_SELECTION) {
                        current.set_fully_selected(
                            current.is_fully_selected() || incoming.is_fully_selected(),
                        );
                    }
                    for channel in ComponentChannel::ALL {
                        if mask.contains(SelectionMask::for_channel(channel)) {
                            current.add_channel(channel, incoming.channel(channel));
                        }
                    }
                    if mask.contains(SelectionMask::PROPERTIES) {
                        current.add_properties(incoming.properties());
                    }
                }
                None => {
                    let masked = Self::masked_copy(incoming, mask);
                    if !masked.is_empty() {
                        data.map.insert(path.clone(), masked);
                    }
                }
            }
        }
    }

    /// Subtrahiert `other` kanalweise, beschraenkt auf die Achsen der Maske.
    /// Nur Pfade, die in beiden Listen vorkommen, sind betroffen; das
    /// Voll-Selektions-Flag wird zu `self.full && !other.full`. Leer
    /// gewordene Datensaetze werden entfernt.
    pub fn difference(&mut self, other: &SelectionList, mask: SelectionMask) {
        if mask.is_empty() || self.is_empty() || other.is_empty() {
            return;
        }
        let data = self.detach();
        for (path, incoming) in &other.data.map {
            let Some(current) = data.map.get_mut(path) else {
                continue;
            };
            if mask.contains(SelectionMask::FULL_SELECTION) {
                current.set_fully_selected(
                    current.is_fully_selected() && !incoming.is_fully_selected(),
                );
            }
            for channel in ComponentChannel::ALL {
                if mask.contains(SelectionMask::for_channel(channel)) {
                    current.remove_channel(channel, incoming.channel(channel));
                }
            }
            if mask.contains(SelectionMask::PROPERTIES) {
                current.remove_properties(incoming.properties());
            }
            if current.is_empty() {
                data.map.shift_remove(path);
            }
        }
    }

    /// Ersetzt (statt vereinigt) die maskierten Achsen fuer jeden Pfad aus
    /// `other`. Neue Pfade werden angelegt; neu angelegte Pfade, deren
    /// Datensatz leer bleibt, werden nicht als leere Eintraege zurueckgelassen.
    pub fn update(&mut self, other: &SelectionList, mask: SelectionMask) {
        if mask.is_empty() {
            return;
        }
        let data = self.detach();
        for (path, incoming) in &other.data.map {
            let is_new = !data.map.contains_key(path);
            let record = data.map.entry(path.clone()).or_default();
            for channel in ComponentChannel::ALL {
                if mask.contains(SelectionMask::for_channel(channel)) {
                    record.set_channel(channel, incoming.channel(channel).clone());
                }
            }
            if mask.contains(SelectionMask::FULL_SELECTION) {
                record.set_fully_selected(incoming.is_fully_selected());
            }
            if mask.contains(SelectionMask::PROPERTIES) {
                record.set_properties(incoming.properties().clone());
            }
            if is_new && record.is_empty() {
                data.map.shift_remove(path);
            }
        }
    }

    /// Extrahiert die maskierten Achsen aller Pfade in eine neue Liste. Die
    /// Revisionen der Datensaetze bleiben erhalten, damit die
    /// Selektionsreihenfolge der Quelle rekonstruierbar bleibt.
    pub fn extract(&self, mask: SelectionMask) -> SelectionList {
        self.extract_entries(self.data.map.iter(), mask)
    }

    /// Wie [`SelectionList::extract`], beschraenkt auf die angegebenen Pfade.
    pub fn extract_paths(&self, paths: &[ScenePath], mask: SelectionMask) -> SelectionList {
        let entries = paths
            .iter()
            .filter_map(|path| self.data.map.get_key_value(path));
        self.extract_entries(entries, mask)
    }

    fn extract_entries<'a, I>(&self, entries: I, mask: SelectionMask) -> SelectionList
    where
        I: Iterator<Item = (&'a ScenePath, &'a SelectionData)>,
    {
        let mut map = SelectionMap::new();
        if !mask.is_empty() {
            for (path, record) in entries {
                let mut masked = Self::masked_copy(record, mask);
                if masked.is_empty() {
                    continue;
                }
                masked.set_revision(record.revision());
                map.insert(path.clone(), masked);
            }
        }
        Self::from_map(map)
    }

    /// Kopie von `record`, beschraenkt auf die Achsen der Maske. Vergibt eine
    /// frische Revision.
    fn masked_copy(record: &SelectionData, mask: SelectionMask) -> SelectionData {
        let channel_copy = |channel: ComponentChannel| {
            if mask.contains(SelectionMask::for_channel(channel)) {
                record.channel(channel).clone()
            } else {
                IndexIntervals::new()
            }
        };
        SelectionData::from_parts(
            mask.contains(SelectionMask::FULL_SELECTION) && record.is_fully_selected(),
            channel_copy(ComponentChannel::Points),
            channel_copy(ComponentChannel::Edges),
            channel_copy(ComponentChannel::Elements),
            channel_copy(ComponentChannel::Instances),
            if mask.contains(SelectionMask::PROPERTIES) {
                record.properties().clone()
            } else {
                HashSet::new()
            },
        )
    }

    /// Fuegt eine fertige Intervallmenge zum Kanal eines Pfads hinzu; legt
    /// den Datensatz bei Bedarf an.
    pub fn add_component_intervals(
        &mut self,
        path: &ScenePath,
        channel: ComponentChannel,
        indices: IndexIntervals,
    ) {
        if indices.is_empty() {
            return;
        }
        let data = self.detach();
        match data.map.get_mut(path) {
            Some(record) => record.add_channel(channel, &indices),
            None => {
                let mut record = SelectionData::default();
                record.set_channel(channel, indices);
                data.map.insert(path.clone(), record);
            }
        }
    }

    /// Fuegt Komponenten-Indizes (unsortiert, Duplikate erlaubt) zum Kanal
    /// eines Pfads hinzu.
    pub fn add_components(
        &mut self,
        path: &ScenePath,
        channel: ComponentChannel,
        indices: &[ComponentIndex],
    ) {
        self.add_component_intervals(
            path,
            channel,
            IndexIntervals::from_values(indices.iter().copied()),
        );
    }

    /// Wie [`SelectionList::add_components`], erwartet aber bereits
    /// aufsteigend sortierte Indizes und spart damit das Sortieren.
    pub fn add_components_sorted(
        &mut self,
        path: &ScenePath,
        channel: ComponentChannel,
        indices: &[ComponentIndex],
    ) {
        self.add_component_intervals(
            path,
            channel,
            IndexIntervals::from_sorted_values(indices.iter().copied()),
        );
    }

    /// Entfernt eine Intervallmenge aus dem Kanal eines Pfads. Leer
    /// gewordene Datensaetze werden entfernt.
    pub fn remove_component_intervals(
        &mut self,
        path: &ScenePath,
        channel: ComponentChannel,
        indices: &IndexIntervals,
    ) {
        if indices.is_empty() {
            return;
        }
        let data = self.detach();
        let Some(record) = data.map.get_mut(path) else {
            return;
        };
        record.remove_channel(channel, indices);
        if record.is_empty() {
            data.map.shift_remove(path);
        }
    }

    /// Entfernt Komponenten-Indizes (unsortiert) aus dem Kanal eines Pfads.
    pub fn remove_components(
        &mut self,
        path: &ScenePath,
        channel: ComponentChannel,
        indices: &[ComponentIndex],
    ) {
        self.remove_component_intervals(
            path,
            channel,
            &IndexIntervals::from_values(indices.iter().copied()),
        );
    }

    /// Fuegt selektierte Properties eines Pfads hinzu; legt den Datensatz
    /// bei Bedarf an.
    pub fn add_properties(&mut self, path: &ScenePath, properties: &[PropertyToken]) {
        if properties.is_empty() {
            return;
        }
        let data = self.detach();
        match data.map.get_mut(path) {
            Some(record) => record.add_properties(properties),
            None => {
                let mut record = SelectionData::default();
                record.add_properties(properties);
                data.map.insert(path.clone(), record);
            }
        }
    }

    /// Entfernt selektierte Properties eines Pfads. Leer gewordene
    /// Datensaetze werden entfernt.
    pub fn remove_properties(&mut self, path: &ScenePath, properties: &[PropertyToken]) {
        if properties.is_empty() {
            return;
        }
        let data = self.detach();
        let Some(record) = data.map.get_mut(path) else {
            return;
        };
        record.remove_properties(properties);
        if record.is_empty() {
            data.map.shift_remove(path);
        }
    }

    /// Punkt-Indizes zu einem Pfad hinzufuegen.
    pub fn add_points(&mut self, path: &ScenePath, indices: &[ComponentIndex]) {
        self.add_components(path, ComponentChannel::Points, indices);
    }

    /// Kanten-Indizes zu einem Pfad hinzufuegen.
    pub fn add_edges(&mut self, path: &ScenePath, indices: &[ComponentIndex]) {
        self.add_components(path, ComponentChannel::Edges, indices);
    }

    /// Element-Indizes zu einem Pfad hinzufuegen.
    pub fn add_elements(&mut self, path: &ScenePath, indices: &[ComponentIndex]) {
        self.add_components(path, ComponentChannel::Elements, indices);
    }

    /// Instanz-Indizes zu einem Pfad hinzufuegen.
    pub fn add_instances(&mut self, path: &ScenePath, indices: &[ComponentIndex]) {
        self.add_components(path, ComponentChannel::Instances, indices);
    }

    /// Punkt-Indizes eines Pfads entfernen.
    pub fn remove_points(&mut self, path: &ScenePath, indices: &[ComponentIndex]) {
        self.remove_components(path, ComponentChannel::Points, indices);
    }

    /// Kanten-Indizes eines Pfads entfernen.
    pub fn remove_edges(&mut self, path: &ScenePath, indices: &[ComponentIndex]) {
        self.remove_components(path, ComponentChannel::Edges, indices);
    }

    /// Element-Indizes eines Pfads entfernen.
    pub fn remove_elements(&mut self, path: &ScenePath, indices: &[ComponentIndex]) {
        self.remove_components(path, ComponentChannel::Elements, indices);
    }

    /// Instanz-Indizes eines Pfads entfernen.
    pub fn remove_instances(&mut self, path: &ScenePath, indices: &[ComponentIndex]) {
        self.remove_components(path, ComponentChannel::Instances, indices);
    }

    /// Tiefer struktureller Vergleich ueber die Pfad-Map; Revisionen und
    /// Map-Reihenfolge bleiben aussen vor.
    pub fn equals(&self, other: &SelectionList) -> bool {
        if Arc::ptr_eq(&self.data, &other.data) {
            return true;
        }
        if self.data.map.len() != other.data.map.len() {
            return false;
        }
        self.data
            .map
            .iter()
            .all(|(path, record)| other.data.map.get(path) == Some(record))
    }
}

impl PartialEq for SelectionList {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for SelectionList {}

impl Index<&ScenePath> for SelectionList {
    type Output = SelectionData;

    fn index(&self, path: &ScenePath) -> &SelectionData {
        self.selection_data(path)
    }
}

impl<'a> IntoIterator for &'a SelectionList {
    type Item = (&'a ScenePath, &'a SelectionData);
    type IntoIter = indexmap::map::Iter<'a, ScenePath, SelectionData>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
