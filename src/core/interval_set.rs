//! Intervall-basierte Indexmenge.
//!
//! Stellt eine wachsende/schrumpfende Menge nicht-negativer Ganzzahlen
//! (Vertex-, Edge-, Face-, Instanz-Indizes) kompakt als sortierte Liste
//! geschlossener Intervalle dar. Zusammenhaengende Bereiche werden beim
//! Einfuegen automatisch zusammengefasst, sodass z.B. eine Rechteck-Selektion
//! ueber 100k Punkte nur eine Handvoll Intervalle belegt.

use std::fmt;
use std::iter::FusedIterator;


/// Vorzeichenlose Indextypen, die als Intervallgrenzen dienen koennen.
///
/// Die Arithmetik setzt voraus, dass die Extremwerte des Typs nicht als
/// Indizes auftreten: `successor` am Typmaximum bzw. `predecessor` an der Null
/// sind nicht definiert.
pub trait IndexValue: Copy + Ord + fmt::Debug {
    /// Naechster Wert (`self + 1`).
    fn successor(self) -> Self;
    /// Vorheriger Wert (`self - 1`).
    fn predecessor(self) -> Self;
    /// Anzahl der Werte im geschlossenen Intervall `[start, end]`.
    fn count_inclusive(start: Self, end: Self) -> usize;
}

macro_rules! impl_index_value {
    ($($t:ty),*) => {
        $(impl IndexValue for $t {
            #[inline]
            fn successor(self) -> Self {
                self + 1
            }
            #[inline]
            fn predecessor(self) -> Self {
                self - 1
            }
            #[inline]
            fn count_inclusive(start: Self, end: Self) -> usize {
                (end - start) as usize + 1
            }
        })*
    };
}

impl_index_value!(u16, u32, u64, usize);

/// Geschlossenes Intervall `[start, end]`, beide Grenzen inklusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval<T> {
    pub start: T,
    pub end: T,
}

impl<T: IndexValue> Interval<T> {
    /// Erstellt das Intervall `[start, end]`. Erwartet `start <= end`.
    pub fn new(start: T, end: T) -> Self {
        debug_assert!(start <= end, "Intervall mit start > end");
        Self { start, end }
    }

    /// Erstellt ein Intervall aus einem einzelnen Wert.
    pub fn single(value: T) -> Self {
        Self {
            start: value,
            end: value,
        }
    }

    /// Anzahl der abgedeckten Indizes.
    pub fn len(&self) -> usize {
        T::count_inclusive(self.start, self.end)
    }

    /// Prueft ob `value` im Intervall liegt.
    pub fn contains(&self, value: T) -> bool {
        self.start <= value && value <= self.end
    }
}

/// Prueft ob ein Bereich mit Start `start` an einen Bereich mit Ende `end`
/// anschliesst oder ihn ueberlappt, d.h. ob zwischen beiden keine Luecke
/// von mindestens 2 liegt.
///
/// `successor` wird nur ausgewertet wenn `start > end`, also `end < T::MAX`.
#[inline]
fn joins<T: IndexValue>(end: T, start: T) -> bool {
    start <= end || start == end.successor()
}

/// Sortierte, zusammengefasste Menge von Intervallen.
///
/// Invarianten:
/// - Intervalle sind streng aufsteigend nach `start` sortiert.
/// - Zwischen aufeinanderfolgenden Intervallen liegt eine Luecke von
///   mindestens 2 (sonst waeren sie zusammengefasst).
/// - `len` ist die Summe aller Intervall-Laengen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSet<T: IndexValue> {
    intervals: Vec<Interval<T>>,
    /// Gesamtzahl abgedeckter Indizes (Cache, immer konsistent gehalten)
    len: usize,
}

impl<T: IndexValue> Default for IntervalSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: IndexValue> IntervalSet<T> {
    /// Erstellt eine leere Menge.
    pub fn new() -> Self {
        Self {
            intervals: Vec::new(),
            len: 0,
        }
    }

    /// Baut eine Menge aus einer unsortierten Index-Sammlung (Duplikate erlaubt).
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut values: Vec<T> = values.into_iter().collect();
        values.sort_unstable();
        Self::from_sorted_values(values)
    }

    /// Baut eine Menge aus einer bereits aufsteigend sortierten Sammlung
    /// (Duplikate erlaubt).
    pub fn from_sorted_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = Self::new();
        set.insert_sorted(values);
        set
    }

    /// Baut eine Menge aus beliebigen Intervallen: unsortiert, ueberlappend
    /// oder dupliziert. Sortiert nach `start` und fasst anschliessend in
    /// einem linearen Durchlauf zusammen.
    pub fn from_intervals<I>(intervals: I) -> Self
    where
        I: IntoIterator<Item = Interval<T>>,
    {
        let mut sorted: Vec<Interval<T>> = intervals.into_iter().collect();
        sorted.sort_by_key(|interval| interval.start);
        let (intervals, len) = Self::merged(sorted.into_iter(), std::iter::empty());
        Self { intervals, len }
    }

    /// Anzahl der abgedeckten Indizes (nicht der Intervalle).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Prueft ob die Menge leer ist.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Anzahl der gespeicherten Intervalle.
    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// Die Intervalle in aufsteigender Reihenfolge.
    pub fn intervals(&self) -> &[Interval<T>] {
        &self.intervals
    }

    /// Index des ersten Intervalls mit `start > value` (upper bound).
    fn upper_bound(&self, value: T) -> usize {
        self.intervals
            .partition_point(|interval| interval.start <= value)
    }

    /// Prueft ob `value` von einem Intervall abgedeckt wird. O(log Intervalle).
    pub fn contains(&self, value: T) -> bool {
        let idx = self.upper_bound(value);
        idx > 0 && value <= self.intervals[idx - 1].end
    }

    /// Fuegt einen einzelnen Index ein.
    ///
    /// Benachbarte Intervalle werden erweitert bzw. verschmolzen, damit die
    /// Luecken-Invariante erhalten bleibt. Gibt `true` zurueck, wenn der Wert
    /// neu war; bereits abgedeckte Werte sind ein No-op.
    pub fn insert(&mut self, value: T) -> bool {
        let idx = self.upper_bound(value);

        if idx > 0 && value <= self.intervals[idx - 1].end {
            return false;
        }

        let joins_prev = idx > 0 && self.intervals[idx - 1].end.successor() == value;
        let joins_next =
            idx < self.intervals.len() && value.successor() == self.intervals[idx].start;

        match (joins_prev, joins_next) {
            (true, true) => {
                // Wert schliesst die Luecke: beide Nachbarn verschmelzen
                self.intervals[idx - 1].end = self.intervals[idx].end;
                self.intervals.remove(idx);
            }
            (true, false) => self.intervals[idx - 1].end = value,
            (false, true) => self.intervals[idx].start = value,
            (false, false) => self.intervals.insert(idx, Interval::single(value)),
        }
        self.len += 1;
        true
    }

    /// Vereinigt die Menge mit einer aufsteigend sortierten Folge von Indizes
    /// in einem einzigen Durchlauf, O(Intervalle + Eingabe).
    ///
    /// Precondition (im Release-Build ungeprueft): `values` ist aufsteigend
    /// sortiert; Duplikate sind erlaubt. Unsortierte Eingaben liefern ein
    /// unspezifiziertes Ergebnis.
    pub fn insert_sorted<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut last: Option<T> = None;
        let incoming = values.into_iter().map(move |value| {
            if let Some(previous) = last {
                debug_assert!(
                    previous <= value,
                    "insert_sorted erwartet eine aufsteigend sortierte Eingabe"
                );
            }
            last = Some(value);
            Interval::single(value)
        });

        let old = std::mem::take(&mut self.intervals);
        let (intervals, len) = Self::merged(old.into_iter(), incoming);
        self.intervals = intervals;
        self.len = len;
    }

    /// Vereinigt die Menge mit einer anderen Intervallmenge (linearer
    /// Zwei-Zeiger-Merge ueber beide Intervalllisten).
    pub fn union_with(&mut self, other: &IntervalSet<T>) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            self.clone_from(other);
            return;
        }
        let old = std::mem::take(&mut self.intervals);
        let (intervals, len) = Self::merged(old.into_iter(), other.intervals.iter().copied());
        self.intervals = intervals;
        self.len = len;
    }

    /// Entfernt einen einzelnen Index. No-op falls nicht enthalten.
    ///
    /// Randwerte verkuerzen das Intervall, innere Werte spalten es in zwei.
    /// Gibt `true` zurueck, wenn der Wert enthalten war.
    pub fn remove(&mut self, value: T) -> bool {
        let idx = self.upper_bound(value);
        if idx == 0 || value > self.intervals[idx - 1].end {
            return false;
        }

        let interval = self.intervals[idx - 1];
        if interval.start == interval.end {
            self.intervals.remove(idx - 1);
        } else if value == interval.start {
            self.intervals[idx - 1].start = value.successor();
        } else if value == interval.end {
            self.intervals[idx - 1].end = value.predecessor();
        } else {
            // Innerer Wert: Intervall aufspalten
            self.intervals[idx - 1].end = value.predecessor();
            self.intervals
                .insert(idx, Interval::new(value.successor(), interval.end));
        }
        self.len -= 1;
        true
    }

    /// Entfernt eine aufsteigend sortierte Folge von Indizes in einem
    /// einzigen Durchlauf. Nicht enthaltene Werte werden ignoriert.
    ///
    /// Precondition wie bei [`IntervalSet::insert_sorted`].
    pub fn remove_sorted<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        if self.is_empty() {
            return;
        }
        let mut last: Option<T> = None;
        let incoming = values.into_iter().map(move |value| {
            if let Some(previous) = last {
                debug_assert!(
                    previous <= value,
                    "remove_sorted erwartet eine aufsteigend sortierte Eingabe"
                );
            }
            last = Some(value);
            Interval::single(value)
        });

        let old = std::mem::take(&mut self.intervals);
        let (intervals, len) = Self::subtracted(old, incoming);
        self.intervals = intervals;
        self.len = len;
    }

    /// Entfernt alle Indizes, die von `other` abgedeckt werden (linearer
    /// Zwei-Zeiger-Durchlauf ueber beide Intervalllisten).
    pub fn difference_with(&mut self, other: &IntervalSet<T>) {
        if self.is_empty() || other.is_empty() {
            return;
        }
        let old = std::mem::take(&mut self.intervals);
        let (intervals, len) = Self::subtracted(old, other.intervals.iter().copied());
        self.intervals = intervals;
        self.len = len;
    }

    /// Leert die Menge.
    pub fn clear(&mut self) {
        self.intervals.clear();
        self.len = 0;
    }

    /// Materialisiert alle abgedeckten Indizes aufsteigend in einen `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        out.extend(self.iter());
        out
    }

    /// Lazy-Iterator ueber alle abgedeckten Indizes in aufsteigender
    /// Reihenfolge, ohne sie zu materialisieren. Ein erneuter Aufruf liefert
    /// einen frischen Durchlauf.
    pub fn iter(&self) -> IndexIter<'_, T> {
        IndexIter {
            intervals: &self.intervals,
            front: self.intervals.first().map(|interval| (0, interval.start)),
            back: self
                .intervals
                .last()
                .map(|interval| (self.intervals.len() - 1, interval.end)),
            remaining: self.len,
        }
    }

    /// Lineare Vereinigung zweier nach `start` aufsteigend sortierter
    /// Intervall-Quellen.
    ///
    /// Der Akkumulator waechst solange die jeweils naechste Quelle ohne
    /// Luecke anschliesst und wird erst bei einer echten Luecke ausgegeben.
    fn merged<A, B>(a: A, b: B) -> (Vec<Interval<T>>, usize)
    where
        A: Iterator<Item = Interval<T>>,
        B: Iterator<Item = Interval<T>>,
    {
        let mut a = a.peekable();
        let mut b = b.peekable();
        let mut out: Vec<Interval<T>> = Vec::new();
        let mut len = 0usize;
        let mut acc: Option<Interval<T>> = None;

        loop {
            // Naechste Quelle ist die mit dem kleineren Start
            let next = match (a.peek().copied(), b.peek().copied()) {
                (Some(x), Some(y)) if x.start <= y.start => {
                    a.next();
                    x
                }
                (Some(_), Some(y)) => {
                    b.next();
                    y
                }
                (Some(x), None) => {
                    a.next();
                    x
                }
                (None, Some(y)) => {
                    b.next();
                    y
                }
                (None, None) => break,
            };

            match acc.as_mut() {
                None => acc = Some(next),
                Some(current) if joins(current.end, next.start) => {
                    if next.end > current.end {
                        current.end = next.end;
                    }
                }
                Some(current) => {
                    len += current.len();
                    out.push(*current);
                    *current = next;
                }
            }
        }

        if let Some(current) = acc {
            len += current.len();
            out.push(current);
        }
        (out, len)
    }

    /// Lineare Differenz: entfernt aus `old` alle Indizes, die von der nach
    /// `start` sortierten Quelle `remove` abgedeckt werden.
    fn subtracted<R>(old: Vec<Interval<T>>, remove: R) -> (Vec<Interval<T>>, usize)
    where
        R: Iterator<Item = Interval<T>>,
    {
        let mut remove = remove.peekable();
        let mut out: Vec<Interval<T>> = Vec::with_capacity(old.len());
        let mut len = 0usize;

        'outer: for interval in old {
            let mut current = interval;
            loop {
                // Abzugsintervalle ueberspringen, die komplett vor `current` enden
                while remove.peek().is_some_and(|r| r.end < current.start) {
                    remove.next();
                }
                let overlap = match remove.peek() {
                    Some(r) if r.start <= current.end => *r,
                    // Kein Ueberlapp mehr: Rest von `current` bleibt erhalten
                    _ => break,
                };
                if overlap.start > current.start {
                    let kept = Interval::new(current.start, overlap.start.predecessor());
                    len += kept.len();
                    out.push(kept);
                }
                if overlap.end >= current.end {
                    // `current` endet innerhalb des Abzugs: komplett verworfen
                    continue 'outer;
                }
                current.start = overlap.end.successor();
            }
            len += current.len();
            out.push(current);
        }
        (out, len)
    }
}

impl<'a, T: IndexValue> IntoIterator for &'a IntervalSet<T> {
    type Item = T;
    type IntoIter = IndexIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Bidirektionaler Lazy-Iterator ueber die abgedeckten Indizes einer
/// [`IntervalSet`].
///
/// Liefert dieselben Werte wie `to_vec()`, berechnet sie aber on-the-fly als
/// `intervall.start + offset` und ueberschreitet Intervallgrenzen
/// transparent. Die zugrunde liegende Menge wird nie veraendert.
#[derive(Debug, Clone)]
pub struct IndexIter<'a, T: IndexValue> {
    intervals: &'a [Interval<T>],
    /// (Intervall-Index, naechster Wert) von vorn
    front: Option<(usize, T)>,
    /// (Intervall-Index, naechster Wert) von hinten
    back: Option<(usize, T)>,
    /// Verbleibende Werte zwischen beiden Cursorn (inklusive)
    remaining: usize,
}

impl<T: IndexValue> Iterator for IndexIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        let (idx, value) = self.front?;
        self.remaining -= 1;
        if self.remaining > 0 {
            // remaining > 0 garantiert, dass hinter `value` noch Werte liegen
            self.front = if value == self.intervals[idx].end {
                Some((idx + 1, self.intervals[idx + 1].start))
            } else {
                Some((idx, value.successor()))
            };
        }
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: IndexValue> DoubleEndedIterator for IndexIter<'_, T> {
    fn next_back(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        let (idx, value) = self.back?;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.back = if value == self.intervals[idx].start {
                Some((idx - 1, self.intervals[idx - 1].end))
            } else {
                Some((idx, value.predecessor()))
            };
        }
        Some(value)
    }
}

impl<T: IndexValue> ExactSizeIterator for IndexIter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T: IndexValue> FusedIterator for IndexIter<'_, T> {}
