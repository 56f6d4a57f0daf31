//! Integrationstests fuer die Mengen-Algebra des Selektions-Stores:
//! - merge / difference / update unter Achsen-Masken
//! - extract mit Masken- und Pfad-Einschraenkung
//! - Copy-on-Write-Snapshots als Undo-Grundlage

use dcc_selection::{
    PropertyToken, ScenePath, SelectionData, SelectionHistory, SelectionList, SelectionMask,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn path(text: &str) -> ScenePath {
    ScenePath::parse(text).expect("gueltiger Pfad")
}

/// Baut die typische Viewport-Selektion: ein voll selektiertes Prim plus ein
/// Mesh mit Komponenten-Selektion.
fn viewport_selection() -> SelectionList {
    let mut list = SelectionList::new();
    list.add_prims(&[path("/World/Camera")]);
    list.add_points(&path("/World/Mesh"), &[2, 3, 4, 10]);
    list.add_edges(&path("/World/Mesh"), &[7, 8]);
    list
}

#[test]
fn merge_respects_axis_mask() {
    init_logger();

    // Datensatz mit Kanten {1,3}, ohne Voll-Selektion
    let mut target = SelectionList::new();
    target.add_edges(&path("/World/Mesh"), &[1, 3]);

    // Operand nur mit Voll-Selektion
    let mut operand = SelectionList::new();
    operand.add_prims(&[path("/World/Mesh")]);

    target.merge(
        &operand,
        SelectionMask::FULL_SELECTION | SelectionMask::EDGES,
    );

    let record = &target[&path("/World/Mesh")];
    assert!(record.is_fully_selected());
    assert_eq!(record.edge_indices().collect::<Vec<_>>(), vec![1, 3]);

    // difference mit derselben Maske und demselben Operanden entfernt nur
    // die ueberlappenden Achsen: das Flag faellt, die Kanten bleiben
    target.difference(
        &operand,
        SelectionMask::FULL_SELECTION | SelectionMask::EDGES,
    );
    let record = &target[&path("/World/Mesh")];
    assert!(!record.is_fully_selected());
    assert_eq!(record.edge_indices().collect::<Vec<_>>(), vec![1, 3]);
}

#[test]
fn merge_then_difference_keeps_own_contributions() {
    init_logger();
    let mut base = viewport_selection();
    let base_before = base.clone();

    let mut overlay = SelectionList::new();
    overlay.add_prims(&[path("/World/Light")]);
    overlay.add_points(&path("/World/Mesh"), &[100, 101]);

    base.merge(&overlay, SelectionMask::ALL);
    assert_eq!(base.len(), 3);
    assert!(base.contains(&path("/World/Light")));

    base.difference(&overlay, SelectionMask::ALL);
    assert!(!base.contains(&path("/World/Light")));
    assert_eq!(base, base_before);
}

#[test]
fn update_replaces_masked_channels_for_incoming_paths() {
    init_logger();
    let mut base = viewport_selection();

    let mut replacement = SelectionList::new();
    replacement.add_points(&path("/World/Mesh"), &[42]);

    base.update(&replacement, SelectionMask::POINTS);

    let record = &base[&path("/World/Mesh")];
    assert_eq!(record.point_indices().collect::<Vec<_>>(), vec![42]);
    // Kanten lagen ausserhalb der Maske
    assert_eq!(record.edge_indices().collect::<Vec<_>>(), vec![7, 8]);
    // Pfade, die im Operanden fehlen, bleiben unberuehrt
    assert!(base.contains(&path("/World/Camera")));
}

#[test]
fn extract_and_complement_reassemble_the_store() {
    init_logger();
    let mut source = viewport_selection();
    source.add_properties(
        &path("/World/Mesh"),
        &[PropertyToken::new("displayColor")],
    );

    let component_mask =
        SelectionMask::POINTS | SelectionMask::EDGES | SelectionMask::ELEMENTS | SelectionMask::INSTANCES;

    let components = source.extract(component_mask);
    let rest = source.extract(SelectionMask::ALL.difference(component_mask));

    // Kein Pfad geht verloren, nichts Leeres bleibt zurueck
    assert!(components.contains(&path("/World/Mesh")));
    assert!(!components.contains(&path("/World/Camera")));
    assert!(rest.contains(&path("/World/Camera")));

    let mut reassembled = components.clone();
    reassembled.merge(&rest, SelectionMask::ALL);
    assert_eq!(reassembled, source);
}

#[test]
fn extract_paths_with_full_mask_copies_records_verbatim() {
    init_logger();
    let source = viewport_selection();

    let extracted = source.extract_paths(&[path("/World/Mesh")], SelectionMask::ALL);
    assert_eq!(extracted.len(), 1);
    assert_eq!(
        extracted[&path("/World/Mesh")],
        source[&path("/World/Mesh")]
    );
    assert_eq!(
        extracted[&path("/World/Mesh")].revision(),
        source[&path("/World/Mesh")].revision()
    );
}

#[test]
fn set_selection_data_replaces_whole_record() {
    init_logger();
    let mut list = viewport_selection();

    let replacement = SelectionData::from_indices(
        false,
        &[],
        &[],
        &[5, 6],
        &[],
        &[PropertyToken::new("xformOp:translate")],
    );
    list.set_selection_data(&path("/World/Mesh"), replacement);

    let record = &list[&path("/World/Mesh")];
    assert!(record.point_intervals().is_empty());
    assert_eq!(record.element_indices().collect::<Vec<_>>(), vec![5, 6]);
    assert_eq!(record.properties().len(), 1);
}

#[test]
fn undo_roundtrip_via_cow_snapshots() {
    init_logger();
    let mut history = SelectionHistory::new_with_capacity(16);
    let mut selection = viewport_selection();

    // Wie ein Command-System: Zustand vor der Operation festhalten
    history.record(selection.clone());
    selection.set_selected_paths(&[path("/World/Other")]);
    assert_eq!(selection.len(), 1);

    let restored = history.undo(selection.clone()).expect("undo vorhanden");
    assert_eq!(restored, viewport_selection());

    let redone = history.redo(restored).expect("redo vorhanden");
    assert_eq!(redone, selection);
}

#[test]
fn consumers_flatten_or_iterate_lazily() {
    init_logger();
    let mut list = SelectionList::new();
    list.add_points(&path("/World/Mesh"), &[4, 2, 3, 9, 8]);

    let record = &list[&path("/World/Mesh")];

    // Eager fuer GPU-Buffer & Co.
    assert_eq!(record.point_intervals().to_vec(), vec![2, 3, 4, 8, 9]);

    // Lazy fuer Picking-Schleifen; zwei Intervalle, keine Materialisierung
    assert_eq!(record.point_intervals().interval_count(), 2);
    let sum: u64 = record.point_indices().map(u64::from).sum();
    assert_eq!(sum, 26);
}
