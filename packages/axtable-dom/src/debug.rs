use crate::accessibility::{AxId, AxTree};
use crate::BaseDocument;

impl BaseDocument {
    pub fn debug_log_node(&self, node_id: usize) {
        let Some(node) = self.get_node(node_id) else {
            eprintln!("Warning: no node with id {node_id}");
            return;
        };

        #[cfg(feature = "tracing")]
        tracing::info!("Style: {:?}", &node.style);

        println!("\nNode {} {}", node.id, node.node_debug_str());

        println!("Attrs:");
        for attr in node.attrs().into_iter().flatten() {
            println!("    {}: {}", attr.name, attr.value);
        }

        println!("Children: {:?}", node.children);
    }
}

impl AxTree {
    /// Print a table's slot grid, one line per row.
    pub fn debug_log_table(&mut self, doc: &BaseDocument, table: AxId) {
        let Some(dom_id) = self.dom_node(table) else {
            eprintln!("Warning: {table:?} is not backed by a DOM node");
            return;
        };
        let slots = self.cell_slots(doc, table);

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Table {:?} (node {}): role={:?} exposed={}",
            table,
            dom_id,
            self.role(table),
            self.is_exposable_table(table)
        );

        println!(
            "\nTable {:?} (node {}) {}x{}",
            table,
            dom_id,
            slots.height(),
            slots.width()
        );
        for (index, row) in slots.rows().iter().enumerate() {
            let cells: Vec<String> = row
                .iter()
                .map(|slot| match slot.and_then(|cell| self.dom_node(cell)) {
                    Some(cell_dom) => cell_dom.to_string(),
                    None => "-".to_string(),
                })
                .collect();
            println!("  {index}: [{}]", cells.join(", "));
        }
    }
}
