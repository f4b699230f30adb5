//! Tests for the per-table query API

mod common;

use axtable_dom::{AccessibilityRole, AxTree, BaseDocument};
use common::*;
use pretty_assertions::assert_eq;

/// A table with a header row and a header column:
///
/// ```text
///          | H1 | H2
///   row r1 | R1 | c1
///   row r2 | R2 | c2
/// ```
fn headed_table() -> (BaseDocument, usize) {
    document(h(
        "table",
        &[("id", "t")],
        vec![
            h(
                "thead",
                &[],
                vec![h(
                    "tr",
                    &[("id", "hr")],
                    vec![cell("th", &[("id", "H1")], "H1"), cell("th", &[("id", "H2")], "H2")],
                )],
            ),
            h(
                "tbody",
                &[],
                vec![
                    h(
                        "tr",
                        &[("id", "r1")],
                        vec![cell("th", &[("id", "R1")], "R1"), cell("td", &[("id", "c1")], "1")],
                    ),
                    h(
                        "tr",
                        &[("id", "r2")],
                        vec![cell("th", &[("id", "R2")], "R2"), cell("td", &[("id", "c2")], "2")],
                    ),
                ],
            ),
        ],
    ))
}

#[test]
fn test_cell_at_is_bounds_checked() {
    let (doc, _) = headed_table();
    let mut tree = AxTree::default();
    let table = ax(&mut tree, &doc, "t");

    let c2 = ax(&mut tree, &doc, "c2");
    assert_eq!(tree.cell_at(&doc, table, 2, 1), Some(c2));
    assert_eq!(tree.cell_at(&doc, table, 3, 0), None);
    assert_eq!(tree.cell_at(&doc, table, 0, 2), None);

    let cells = tree.cells(&doc, table);
    assert_eq!(ids(&tree, &doc, &cells), ["H1", "H2", "R1", "c1", "R2", "c2"]);
}

#[test]
fn test_header_roles_from_markup() {
    let (doc, _) = headed_table();
    let mut tree = AxTree::default();
    let table = ax(&mut tree, &doc, "t");
    // Build the grid so the stored indices are final
    assert_eq!(tree.row_count(&doc, table), 3);

    let role = |tree: &mut AxTree, id: &str| {
        let object = ax(tree, &doc, id);
        tree.role(object)
    };
    assert_eq!(role(&mut tree, "H1"), AccessibilityRole::ColumnHeader);
    assert_eq!(role(&mut tree, "H2"), AccessibilityRole::ColumnHeader);
    assert_eq!(role(&mut tree, "R1"), AccessibilityRole::RowHeader);
    assert_eq!(role(&mut tree, "c1"), AccessibilityRole::Cell);
    assert_eq!(role(&mut tree, "r1"), AccessibilityRole::Row);

    let r2 = ax(&mut tree, &doc, "R2");
    assert!(tree.is_row_header(&doc, r2));
    assert!(!tree.is_column_header(&doc, r2));
}

#[test]
fn test_column_headers_and_header_container() {
    let (doc, _) = headed_table();
    let mut tree = AxTree::default();
    let table = ax(&mut tree, &doc, "t");

    let headers = tree.column_headers(&doc, table);
    assert_eq!(ids(&tree, &doc, &headers), ["H1", "H2"]);

    let container = tree.header_container(&doc, table).unwrap();
    assert_eq!(tree.header_container(&doc, table), Some(container), "created once");
    assert_eq!(tree.role(container), AccessibilityRole::TableHeaderContainer);
    assert_eq!(tree.children(&doc, container), headers);

    let children = tree.children(&doc, table);
    let rows = tree.rows(&doc, table);
    let columns = tree.columns(&doc, table);
    assert_eq!(columns.len(), 2);
    assert_eq!(children.len(), rows.len() + columns.len() + 1);
    assert_eq!(children.last(), Some(&container));
}

#[test]
fn test_column_objects_list_their_cells() {
    let (doc, _) = headed_table();
    let mut tree = AxTree::default();
    let table = ax(&mut tree, &doc, "t");

    let columns = tree.columns(&doc, table);
    assert_eq!(tree.role(columns[1]), AccessibilityRole::Column);
    let cells = tree.children(&doc, columns[1]);
    assert_eq!(ids(&tree, &doc, &cells), ["H2", "c1", "c2"]);
}

#[test]
fn test_row_headers() {
    let (doc, _) = headed_table();
    let mut tree = AxTree::default();
    let table = ax(&mut tree, &doc, "t");

    let headers = tree.row_headers(&doc, table);
    assert_eq!(ids(&tree, &doc, &headers), ["R1", "R2"], "an all-header row has no row header");

    let r1 = ax(&mut tree, &doc, "r1");
    let header_row = ax(&mut tree, &doc, "hr");
    let headers = tree.row_headers(&doc, r1);
    assert_eq!(ids(&tree, &doc, &headers), ["R1"]);
    assert_eq!(tree.row_header(&doc, header_row), None);

    let c2 = ax(&mut tree, &doc, "c2");
    let headers = tree.row_headers(&doc, c2);
    assert_eq!(ids(&tree, &doc, &headers), ["R2"]);
}

#[test]
fn test_row_group_scoped_headers() {
    let (doc, _) = document(h(
        "table",
        &[("id", "t")],
        vec![h(
            "tbody",
            &[],
            vec![
                tr(vec![
                    cell("td", &[("id", "group"), ("scope", "rowgroup")], "Fruit"),
                    cell("th", &[("id", "name"), ("scope", "row")], "Apple"),
                    cell("td", &[("id", "price")], "1.00"),
                ]),
                tr(vec![td("Veg"), td("Leek"), td("2.00")]),
            ],
        )],
    ));
    let mut tree = AxTree::default();
    let price = ax(&mut tree, &doc, "price");
    let headers = tree.row_headers(&doc, price);
    assert_eq!(ids(&tree, &doc, &headers), ["group", "name"]);
}

#[test]
fn test_scope_overrides_position() {
    let (doc, _) = document(h(
        "table",
        &[("id", "t")],
        vec![h(
            "tbody",
            &[],
            vec![
                tr(vec![cell("th", &[("id", "corner"), ("scope", "row")], "x"), td("a")]),
                tr(vec![cell("td", &[("id", "col"), ("scope", "col")], "y"), td("b")]),
            ],
        )],
    ));
    let mut tree = AxTree::default();
    let corner = ax(&mut tree, &doc, "corner");
    let col = ax(&mut tree, &doc, "col");
    assert!(!tree.is_column_header(&doc, corner));
    assert!(tree.is_row_header(&doc, corner));
    assert!(tree.is_column_header(&doc, col));
    assert_eq!(tree.role(col), AccessibilityRole::ColumnHeader);
}

#[test]
fn test_non_tables_have_an_empty_model() {
    let (doc, _) = document(h(
        "div",
        &[("id", "d")],
        vec![h("p", &[("id", "p")], vec![t("text")])],
    ));
    let mut tree = AxTree::default();
    let div = ax(&mut tree, &doc, "d");

    assert!(tree.table_model(&doc, div).is_none());
    assert!(tree.rows(&doc, div).is_empty());
    assert!(tree.columns(&doc, div).is_empty());
    assert!(tree.cells(&doc, div).is_empty());
    assert_eq!(tree.cell_slots(&doc, div).height(), 0);
    assert_eq!(tree.cell_at(&doc, div, 0, 0), None);
    assert_eq!(tree.header_container(&doc, div), None);
    assert_eq!(tree.ax_row_count(&doc, div), 0);
    assert!(tree.row_headers(&doc, div).is_empty());
}

#[test]
fn test_flushed_mutations_rebuild_the_grid() {
    let (mut doc, _) = headed_table();
    let mut tree = AxTree::default();
    let table = ax(&mut tree, &doc, "t");
    assert_eq!(tree.row_count(&doc, table), 3);

    let body = doc.get_node(by_id(&doc, "r1")).unwrap().parent.unwrap();
    build(&mut doc, body, &tr(vec![th("R3"), td("3")]));
    assert_eq!(tree.row_count(&doc, table), 3, "stale until flushed");

    tree.flush_document_changes(&mut doc);
    assert_eq!(tree.row_count(&doc, table), 4);
    assert_eq!(tree.row_headers(&doc, table).len(), 3);
}

#[test]
fn test_removed_cells_read_as_empty() {
    let (mut doc, _) = headed_table();
    let mut tree = AxTree::default();
    let table = ax(&mut tree, &doc, "t");
    assert!(tree.cell_at(&doc, table, 1, 1).is_some());

    // Forget the object without invalidating the grid
    tree.remove_dom_node(by_id(&doc, "c1"));
    assert_eq!(tree.cell_at(&doc, table, 1, 1), None);
    assert_eq!(slot_ids(&mut tree, &doc, table)[1], ["R1", ""]);

    // Forgotten rows leave the row list and the count together
    tree.remove_dom_node(by_id(&doc, "r1"));
    assert_eq!(tree.rows(&doc, table).len(), 2);
    assert_eq!(tree.row_count(&doc, table), 2);

    // Removing it from the document rebuilds without it
    let c2 = by_id(&doc, "c2");
    doc.mutate().remove_node(c2).unwrap();
    tree.flush_document_changes(&mut doc);
    assert_eq!(tree.cell_at(&doc, table, 2, 1), None);
    assert_eq!(slot_ids(&mut tree, &doc, table)[2], ["R2", ""]);
}

#[test]
fn test_reclassification_after_attribute_change() {
    let (mut doc, table_id) = document(h(
        "table",
        &[("id", "t")],
        vec![h(
            "tbody",
            &[],
            vec![
                h("tr", &[("id", "r")], vec![td("a"), td("b")]),
                tr(vec![td("c"), td("d")]),
            ],
        )],
    ));
    let mut tree = AxTree::default();
    let table = ax(&mut tree, &doc, "t");
    let row = ax(&mut tree, &doc, "r");
    assert_eq!(tree.role(table), AccessibilityRole::Generic);
    assert_eq!(tree.role(row), AccessibilityRole::Generic);

    doc.mutate().set_attribute(table_id, "summary", "letters").unwrap();
    tree.flush_document_changes(&mut doc);
    assert_eq!(tree.role(table), AccessibilityRole::Table);
    // Roles are current before anything asks for the grid
    assert_eq!(tree.role(row), AccessibilityRole::Row);
    assert!(
        !tree.object_for_id(table).and_then(|object| object.table_model()).unwrap().is_dirty()
    );
    assert_eq!(tree.row_count(&doc, table), 2);

    doc.mutate().clear_attribute(table_id, "summary").unwrap();
    tree.flush_document_changes(&mut doc);
    assert_eq!(tree.role(table), AccessibilityRole::Generic);
    assert_eq!(tree.role(row), AccessibilityRole::Generic);
    assert_eq!(tree.row_count(&doc, table), 0);
}

#[test]
fn test_role_attribute_change_turns_a_div_into_a_grid() {
    let (mut doc, div) = document(h(
        "div",
        &[("id", "g")],
        vec![h("div", &[("role", "row")], vec![cell("div", &[("role", "gridcell")], "1")])],
    ));
    let mut tree = AxTree::default();
    let object = ax(&mut tree, &doc, "g");
    assert_eq!(tree.role(object), AccessibilityRole::Generic);
    assert!(tree.table_model(&doc, object).is_none());

    doc.mutate().set_attribute(div, "role", "grid").unwrap();
    tree.flush_document_changes(&mut doc);
    assert_eq!(tree.role(object), AccessibilityRole::Grid);
    assert_eq!(tree.row_count(&doc, object), 1);
}

#[test]
fn test_aria_counts() {
    let table = |count: &'static str| {
        document(h(
            "table",
            &[("id", "t"), ("aria-rowcount", count), ("aria-colcount", count)],
            vec![
                cell("caption", &[], "Counts"),
                h("tbody", &[], vec![tr(vec![td("a"), td("b")]), tr(vec![td("c"), td("d")])]),
            ],
        ))
    };

    let expectations = [("100", 100), ("2", 2), ("1", 0), ("-1", -1), ("0", 0), ("-5", 0)];
    for (declared, expected) in expectations {
        let (doc, _) = table(declared);
        let mut tree = AxTree::default();
        let object = ax(&mut tree, &doc, "t");
        assert_eq!(tree.ax_row_count(&doc, object), expected, "aria-rowcount={declared}");
        assert_eq!(tree.ax_column_count(&doc, object), expected, "aria-colcount={declared}");
    }
}

#[test]
fn test_aria_indices() {
    let (doc, _) = document(h(
        "table",
        &[("id", "t")],
        vec![h(
            "tbody",
            &[],
            vec![
                h(
                    "tr",
                    &[("aria-rowindex", "5"), ("aria-colindex", "3"), ("aria-rowindextext", "five")],
                    vec![cell("td", &[("id", "a")], "a"), cell("td", &[("id", "b")], "b")],
                ),
                tr(vec![
                    cell("td", &[("id", "c"), ("aria-colindex", "10"), ("aria-colindextext", "ten")], "c"),
                    cell("td", &[("id", "d")], "d"),
                ]),
            ],
        )],
    ));
    let mut tree = AxTree::default();
    let a = ax(&mut tree, &doc, "a");
    let b = ax(&mut tree, &doc, "b");
    let c = ax(&mut tree, &doc, "c");
    let d = ax(&mut tree, &doc, "d");

    assert_eq!(tree.ax_row_index(&doc, a), Some(5));
    assert_eq!(tree.ax_column_index(&doc, a), Some(3));
    assert_eq!(tree.ax_column_index(&doc, b), Some(4));
    assert_eq!(tree.ax_row_index_text(&doc, b).as_deref(), Some("five"));

    assert_eq!(tree.ax_row_index(&doc, c), None);
    assert_eq!(tree.ax_column_index(&doc, c), Some(10));
    assert_eq!(tree.ax_column_index_text(&doc, c).as_deref(), Some("ten"));
    assert_eq!(tree.ax_column_index(&doc, d), None);
}

#[test]
fn test_tree_grid_disclosure() {
    let row = |id: &'static str, level: &'static str| {
        h(
            "div",
            &[("id", id), ("role", "row"), ("aria-level", level)],
            vec![cell("div", &[("role", "gridcell")], id)],
        )
    };
    let (doc, _) = document(h(
        "div",
        &[("id", "tg"), ("role", "treegrid")],
        vec![
            row("r0", "1"),
            row("r1", "2"),
            row("r2", "2"),
            row("r3", "3"),
            row("r4", "1"),
        ],
    ));
    let mut tree = AxTree::default();
    let r0 = ax(&mut tree, &doc, "r0");
    let r2 = ax(&mut tree, &doc, "r2");
    let r3 = ax(&mut tree, &doc, "r3");
    let r4 = ax(&mut tree, &doc, "r4");

    let disclosed = tree.disclosed_rows(&doc, r0);
    assert_eq!(ids(&tree, &doc, &disclosed), ["r1", "r2"]);
    assert_eq!(tree.disclosed_by_row(&doc, r3), Some(r2));
    assert_eq!(tree.disclosed_by_row(&doc, r0), None);
    assert!(tree.disclosed_rows(&doc, r4).is_empty());
}

#[test]
fn test_teardown_empties_everything() {
    let (doc, table_id) = headed_table();
    let mut tree = AxTree::default();
    let table = ax(&mut tree, &doc, "t");
    assert_eq!(tree.row_count(&doc, table), 3);

    tree.teardown();
    assert!(tree.is_empty());
    assert_eq!(tree.row_count(&doc, table), 0);
    assert!(tree.rows(&doc, table).is_empty());
    assert_eq!(tree.get_or_create(&doc, table_id), None);
}

#[test]
fn test_ids_are_never_reused() {
    let (mut doc, _) = headed_table();
    let mut tree = AxTree::default();
    let c1 = ax(&mut tree, &doc, "c1");
    let c1_node = by_id(&doc, "c1");
    doc.mutate().remove_node(c1_node).unwrap();
    tree.flush_document_changes(&mut doc);
    assert!(tree.object_for_id(c1).is_none());

    let row = by_id(&doc, "r1");
    let replacement = build(&mut doc, row, &cell("td", &[("id", "c1b")], "1"));
    let fresh = tree.get_or_create(&doc, replacement).unwrap();
    assert!(fresh > c1);
}

#[cfg(feature = "accessibility")]
#[test]
fn test_export_table_tree_update() {
    use accesskit::Role;

    let (doc, _) = headed_table();
    let mut tree = AxTree::default();
    let table = ax(&mut tree, &doc, "t");
    let update = tree.build_table_tree_update(&doc, table).unwrap();

    // Table, three rows, six cells, two columns and the header container
    assert_eq!(update.nodes.len(), 13);
    let (root_id, root) = &update.nodes[0];
    assert_eq!(root_id.0, table.0);
    assert_eq!(root.role(), Role::Table);
    assert_eq!(root.row_count(), Some(3));
    assert_eq!(root.column_count(), Some(2));
    assert_eq!(update.tree.unwrap().root.0, table.0);

    let c2 = ax(&mut tree, &doc, "c2");
    let (_, cell) = update
        .nodes
        .iter()
        .find(|(id, _)| id.0 == c2.0)
        .unwrap();
    assert_eq!(cell.role(), Role::Cell);
    assert_eq!(cell.row_index(), Some(2));
    assert_eq!(cell.column_index(), Some(1));
    assert_eq!(cell.label(), Some("2"));

    let columns = tree.columns(&doc, table);
    let (_, column) = update
        .nodes
        .iter()
        .find(|(id, _)| id.0 == columns[1].0)
        .unwrap();
    assert_eq!(column.role(), Role::GenericContainer);
    assert_eq!(column.column_index(), Some(1));

    let container = tree.header_container(&doc, table).unwrap();
    let (_, header_container) = update
        .nodes
        .iter()
        .find(|(id, _)| id.0 == container.0)
        .unwrap();
    assert_eq!(header_container.role(), Role::GenericContainer);
    assert!(header_container.children().is_empty());
}

#[cfg(feature = "accessibility")]
#[test]
fn test_layout_tables_are_not_exported() {
    let (doc, _) = document(h(
        "table",
        &[("id", "t")],
        vec![h("tbody", &[], vec![tr(vec![td("only")])])],
    ));
    let mut tree = AxTree::default();
    let table = ax(&mut tree, &doc, "t");
    assert!(tree.build_table_tree_update(&doc, table).is_none());
}
