/// Thresholds used by the heuristic that tells data tables from layout tables
#[derive(Debug, Clone, PartialEq)]
pub struct TableHeuristics {
    /// A table with at least this many rows (and `min_columns_for_many_rows` columns) is a data table
    pub many_rows: usize,
    pub min_columns_for_many_rows: usize,
    /// A table with at least this many columns (and `min_rows_for_many_columns` rows) is a data table
    pub many_columns: usize,
    pub min_rows_for_many_columns: usize,
    /// Number of bordered or background-distinct cells that settles the verdict early
    pub good_cell_count: usize,
    /// How many leading rows are sampled for zebra striping
    pub zebra_sample_rows: usize,
}

impl Default for TableHeuristics {
    fn default() -> Self {
        Self {
            many_rows: 20,
            min_columns_for_many_rows: 2,
            many_columns: 20,
            min_rows_for_many_columns: 2,
            good_cell_count: 10,
            zebra_sample_rows: 5,
        }
    }
}

/// Clamps applied to cell spans
#[derive(Debug, Clone, PartialEq)]
pub struct SpanLimits {
    pub max_colspan: usize,
    pub max_rowspan: usize,
}

impl Default for SpanLimits {
    fn default() -> Self {
        // https://html.spec.whatwg.org/multipage/tables.html#dom-tdth-colspan
        Self {
            max_colspan: 1000,
            max_rowspan: 65534,
        }
    }
}

/// Options used when constructing an [`AxTree`](crate::accessibility::AxTree)
#[derive(Debug, Clone, Default)]
pub struct AccessibilityConfig {
    pub heuristics: TableHeuristics,
    pub span_limits: SpanLimits,
}

#[cfg(test)]
impl AccessibilityConfig {
    pub fn for_testing() -> Self {
        Self::default()
    }
}
