//! Selektionsdatensatz eines einzelnen Szenen-Objekts.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use super::interval_set::{IndexIter, IntervalSet};
use super::property::PropertyToken;

/// Indextyp der Komponenten-Kanaele. 32 Bit reichen fuer Mesh-Komponenten
/// und Instanzen.
pub type ComponentIndex = u32;

/// Intervallmenge ueber Komponenten-Indizes.
pub type IndexIntervals = IntervalSet<ComponentIndex>;

/// Prozessweiter, monoton steigender Revisionszaehler.
///
/// Relaxed genuegt: die Revisionen dienen ausschliesslich als
/// Ordnungsschluessel, es haengt keine weitere Synchronisation daran.
static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

/// Die vier unabhaengigen Komponenten-Kanaele eines Selektionsdatensatzes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentChannel {
    /// Vertex- bzw. Punkt-Indizes
    Points,
    /// Kanten-Indizes
    Edges,
    /// Flaechen- bzw. Element-Indizes
    Elements,
    /// Instanz-Indizes (Instancer-Prototypen)
    Instances,
}

impl ComponentChannel {
    /// Alle Kanaele in kanonischer Reihenfolge.
    pub const ALL: [ComponentChannel; 4] = [
        ComponentChannel::Points,
        ComponentChannel::Edges,
        ComponentChannel::Elements,
        ComponentChannel::Instances,
    ];
}

/// Selektionszustand eines einzelnen Objekts: vier Komponenten-Kanaele,
/// selektierte Properties, Voll-Selektions-Flag und Revision.
///
/// Voll-Selektion und Komponenten-Selektion sind orthogonale Achsen, die sich
/// nur den Datensatz teilen; das Flag beruehrt die Kanaele nicht. Die
/// Revision wird bei jeder Mutation neu vergeben und erlaubt es, Selektionen
/// in "as-selected"-Reihenfolge statt in Map-Reihenfolge zu praesentieren.
#[derive(Debug, Clone, Default)]
pub struct SelectionData {
    points: IndexIntervals,
    edges: IndexIntervals,
    elements: IndexIntervals,
    instances: IndexIntervals,
    properties: HashSet<PropertyToken>,
    fully_selected: bool,
    /// Ordnungsschluessel der letzten Aenderung (0 = nie veraendert)
    revision: u64,
}

impl SelectionData {
    /// Datensatz, der nur das Voll-Selektions-Flag traegt.
    pub fn prim_selection(selected: bool) -> Self {
        Self {
            fully_selected: selected,
            revision: next_revision(),
            ..Self::default()
        }
    }

    /// Datensatz aus unsortierten Index-Sammlungen pro Kanal plus Properties.
    pub fn from_indices(
        fully_selected: bool,
        points: &[ComponentIndex],
        edges: &[ComponentIndex],
        elements: &[ComponentIndex],
        instances: &[ComponentIndex],
        properties: &[PropertyToken],
    ) -> Self {
        Self {
            points: IndexIntervals::from_values(points.iter().copied()),
            edges: IndexIntervals::from_values(edges.iter().copied()),
            elements: IndexIntervals::from_values(elements.iter().copied()),
            instances: IndexIntervals::from_values(instances.iter().copied()),
            properties: properties.iter().cloned().collect(),
            fully_selected,
            revision: next_revision(),
        }
    }

    /// Datensatz aus fertigen Intervallmengen.
    pub fn from_parts(
        fully_selected: bool,
        points: IndexIntervals,
        edges: IndexIntervals,
        elements: IndexIntervals,
        instances: IndexIntervals,
        properties: HashSet<PropertyToken>,
    ) -> Self {
        Self {
            points,
            edges,
            elements,
            instances,
            properties,
            fully_selected,
            revision: next_revision(),
        }
    }

    /// Leer heisst: nicht voll selektiert, alle vier Kanaele leer und keine
    /// Properties. Leere Datensaetze werden vom Store entfernt.
    pub fn is_empty(&self) -> bool {
        !self.fully_selected
            && self.points.is_empty()
            && self.edges.is_empty()
            && self.elements.is_empty()
            && self.instances.is_empty()
            && self.properties.is_empty()
    }

    /// Ist das ganze Objekt selektiert?
    pub fn is_fully_selected(&self) -> bool {
        self.fully_selected
    }

    /// Revision der letzten Aenderung.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Die Intervallmenge eines Kanals (fuer Mengen-Operationen).
    pub fn channel(&self, channel: ComponentChannel) -> &IndexIntervals {
        match channel {
            ComponentChannel::Points => &self.points,
            ComponentChannel::Edges => &self.edges,
            ComponentChannel::Elements => &self.elements,
            ComponentChannel::Instances => &self.instances,
        }
    }

    /// Lazy-Iterator ueber die Indizes eines Kanals (fuer Konsumenten wie
    /// Renderer und Picking).
    pub fn channel_indices(&self, channel: ComponentChannel) -> IndexIter<'_, ComponentIndex> {
        self.channel(channel).iter()
    }

    /// Punkt-Kanal als Intervallmenge.
    pub fn point_intervals(&self) -> &IndexIntervals {
        &self.points
    }

    /// Punkt-Indizes als Lazy-Iterator.
    pub fn point_indices(&self) -> IndexIter<'_, ComponentIndex> {
        self.points.iter()
    }

    /// Kanten-Kanal als Intervallmenge.
    pub fn edge_intervals(&self) -> &IndexIntervals {
        &self.edges
    }

    /// Kanten-Indizes als Lazy-Iterator.
    pub fn edge_indices(&self) -> IndexIter<'_, ComponentIndex> {
        self.edges.iter()
    }

    /// Element-Kanal als Intervallmenge.
    pub fn element_intervals(&self) -> &IndexIntervals {
        &self.elements
    }

    /// Element-Indizes als Lazy-Iterator.
    pub fn element_indices(&self) -> IndexIter<'_, ComponentIndex> {
        self.elements.iter()
    }

    /// Instanz-Kanal als Intervallmenge.
    pub fn instance_intervals(&self) -> &IndexIntervals {
        &self.instances
    }

    /// Instanz-Indizes als Lazy-Iterator.
    pub fn instance_indices(&self) -> IndexIter<'_, ComponentIndex> {
        self.instances.iter()
    }

    /// Die selektierten Properties.
    pub fn properties(&self) -> &HashSet<PropertyToken> {
        &self.properties
    }

    /// Vergibt eine frische Revision. Wird von jedem Mutator gerufen.
    pub(crate) fn touch(&mut self) {
        self.revision = next_revision();
    }

    fn channel_storage(&mut self, channel: ComponentChannel) -> &mut IndexIntervals {
        match channel {
            ComponentChannel::Points => &mut self.points,
            ComponentChannel::Edges => &mut self.edges,
            ComponentChannel::Elements => &mut self.elements,
            ComponentChannel::Instances => &mut self.instances,
        }
    }

    /// Setzt nur das Voll-Selektions-Flag; die Kanaele bleiben unberuehrt.
    pub(crate) fn set_fully_selected(&mut self, fully_selected: bool) {
        self.fully_selected = fully_selected;
        self.touch();
    }

    /// Ersetzt den Inhalt eines Kanals.
    pub(crate) fn set_channel(&mut self, channel: ComponentChannel, indices: IndexIntervals) {
        *self.channel_storage(channel) = indices;
        self.touch();
    }

    /// Vereinigt einen Kanal mit `indices`.
    pub(crate) fn add_channel(&mut self, channel: ComponentChannel, indices: &IndexIntervals) {
        self.channel_storage(channel).union_with(indices);
        self.touch();
    }

    /// Entfernt `indices` aus einem Kanal.
    pub(crate) fn remove_channel(&mut self, channel: ComponentChannel, indices: &IndexIntervals) {
        self.channel_storage(channel).difference_with(indices);
        self.touch();
    }

    /// Ersetzt die Property-Menge.
    pub(crate) fn set_properties(&mut self, properties: HashSet<PropertyToken>) {
        self.properties = properties;
        self.touch();
    }

    /// Fuegt Properties hinzu.
    pub(crate) fn add_properties<'a, I>(&mut self, properties: I)
    where
        I: IntoIterator<Item = &'a PropertyToken>,
    {
        self.properties.extend(properties.into_iter().cloned());
        self.touch();
    }

    /// Entfernt Properties.
    pub(crate) fn remove_properties<'a, I>(&mut self, properties: I)
    where
        I: IntoIterator<Item = &'a PropertyToken>,
    {
        for property in properties {
            self.properties.remove(property);
        }
        self.touch();
    }

    /// Uebernimmt eine bestehende Revision (fuer Extraktionen, die die
    /// urspruengliche Selektionsreihenfolge erhalten sollen).
    pub(crate) fn set_revision(&mut self, revision: u64) {
        self.revision = revision;
    }
}

/// Strukturelle Gleichheit. Die Revision bleibt aussen vor: sie beschreibt
/// die Reihenfolge, nicht den Inhalt einer Selektion.
impl PartialEq for SelectionData {
    fn eq(&self, other: &Self) -> bool {
        self.fully_selected == other.fully_selected
            && self.points == other.points
            && self.edges == other.edges
            && self.elements == other.elements
            && self.instances == other.instances
            && self.properties == other.properties
    }
}

impl Eq for SelectionData {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_empty() {
        let data = SelectionData::default();
        assert!(data.is_empty());
        assert!(!data.is_fully_selected());
        assert_eq!(data.revision(), 0);
    }

    #[test]
    fn prim_selection_is_not_empty() {
        let data = SelectionData::prim_selection(true);
        assert!(!data.is_empty());
        assert!(data.revision() > 0);
    }

    #[test]
    fn full_selection_flag_keeps_channels_untouched() {
        let mut data = SelectionData::from_indices(false, &[1, 2, 3], &[], &[], &[], &[]);
        data.set_fully_selected(true);
        assert_eq!(data.point_intervals().len(), 3);
        data.set_fully_selected(false);
        assert_eq!(data.point_intervals().len(), 3);
        assert!(!data.is_empty());
    }

    #[test]
    fn mutators_bump_revision() {
        let mut data = SelectionData::prim_selection(false);
        let before = data.revision();
        data.add_channel(
            ComponentChannel::Edges,
            &IndexIntervals::from_values([4u32, 5]),
        );
        assert!(data.revision() > before);
    }

    #[test]
    fn equality_ignores_revision() {
        let a = SelectionData::from_indices(true, &[1, 2], &[], &[7], &[], &[]);
        let b = SelectionData::from_indices(true, &[1, 2], &[], &[7], &[], &[]);
        assert_ne!(a.revision(), b.revision());
        assert_eq!(a, b);
    }

    #[test]
    fn channels_are_independent() {
        let mut data = SelectionData::default();
        data.add_channel(
            ComponentChannel::Points,
            &IndexIntervals::from_values([0u32, 1]),
        );
        data.add_channel(
            ComponentChannel::Instances,
            &IndexIntervals::from_values([9u32]),
        );
        assert_eq!(data.point_intervals().len(), 2);
        assert_eq!(data.edge_intervals().len(), 0);
        assert_eq!(data.instance_intervals().len(), 1);
    }
}
