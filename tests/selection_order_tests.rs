//! Integrationstests fuer die Selektionsreihenfolge:
//! Revision-geordnete Pfadlisten, Cache-Invalidierung und die
//! Unabhaengigkeit geteilter Copy-on-Write-Bloecke.

use dcc_selection::{ScenePath, SelectionList, SelectionMask};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn path(text: &str) -> ScenePath {
    ScenePath::parse(text).expect("gueltiger Pfad")
}

#[test]
fn selected_paths_follow_selection_order_not_name_order() {
    init_logger();
    let mut list = SelectionList::new();

    // Bewusst gegen die lexikographische Reihenfolge selektieren
    list.add_prims(&[path("/World/Zebra")]);
    list.add_prims(&[path("/World/Ape")]);
    list.add_points(&path("/World/Mesh"), &[1]);

    assert_eq!(
        list.selected_paths(),
        &[path("/World/Zebra"), path("/World/Ape"), path("/World/Mesh")]
    );
}

#[test]
fn fully_selected_paths_are_recomputed_per_call() {
    init_logger();
    let mut list = SelectionList::new();
    list.add_prims(&[path("/A"), path("/B")]);

    assert_eq!(list.fully_selected_paths(), vec![path("/A"), path("/B")]);

    list.set_full_selection(&path("/A"), false);
    assert_eq!(list.fully_selected_paths(), vec![path("/B")]);
}

#[test]
fn cached_path_order_survives_reads_and_resets_on_mutation() {
    init_logger();
    let mut list = SelectionList::new();
    list.add_prims(&[path("/A")]);
    list.add_prims(&[path("/B")]);

    // Mehrfache Reads liefern dieselbe gecachte Reihenfolge
    assert_eq!(list.selected_paths(), list.selected_paths());
    assert_eq!(list.selected_paths(), &[path("/A"), path("/B")]);

    // Mutation invalidiert den Cache: /A wurde erneut beruehrt
    list.add_points(&path("/A"), &[1]);
    assert_eq!(list.selected_paths(), &[path("/B"), path("/A")]);
}

#[test]
fn reading_a_shared_block_does_not_fork_it() {
    init_logger();
    let mut original = SelectionList::new();
    original.add_prims(&[path("/A"), path("/B")]);

    let snapshot = original.clone();

    // Lese-Zugriffe auf beiden Klonen
    assert_eq!(original.selected_paths(), snapshot.selected_paths());
    assert_eq!(original, snapshot);

    // Erst die Mutation trennt die beiden
    original.remove_prims(&[path("/A")]);
    assert_eq!(original.len(), 1);
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.selected_paths(), &[path("/A"), path("/B")]);
}

#[test]
fn extract_preserves_source_selection_order() {
    init_logger();
    let mut source = SelectionList::new();
    source.add_prims(&[path("/Late")]);
    source.add_prims(&[path("/Later")]);
    source.add_prims(&[path("/Latest")]);

    // Reihenfolge im Original veraendern: /Late zuletzt beruehrt
    source.set_full_selection(&path("/Late"), false);
    source.set_full_selection(&path("/Late"), true);

    let extracted = source.extract(SelectionMask::ALL);
    assert_eq!(extracted.selected_paths(), source.selected_paths());
    assert_eq!(
        extracted.selected_paths(),
        &[path("/Later"), path("/Latest"), path("/Late")]
    );
}

#[test]
fn set_selected_paths_resets_order_to_argument_sequence() {
    init_logger();
    let mut list = SelectionList::new();
    list.add_prims(&[path("/Old")]);

    list.set_selected_paths(&[path("/N3"), path("/N1"), path("/N2")]);
    assert_eq!(
        list.selected_paths(),
        &[path("/N3"), path("/N1"), path("/N2")]
    );
    assert_eq!(list.fully_selected_paths().len(), 3);
}
