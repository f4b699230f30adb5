//! Accessibility roles.

/// The resolved role of an accessible node.
///
/// Only the roles that take part in table exposure are distinguished. Everything else
/// collapses to [`AccessibilityRole::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessibilityRole {
    /// Not yet resolved.
    #[default]
    Unknown,
    /// Excluded from the accessibility tree (hidden, `display: none`, ...).
    Ignored,
    /// `role="presentation"` / `role="none"`.
    Presentation,
    Generic,
    Group,
    StaticText,

    Table,
    Grid,
    TreeGrid,
    Caption,
    RowGroup,
    Row,
    Cell,
    GridCell,
    ColumnHeader,
    RowHeader,
    /// Synthetic column proxy created by a table.
    Column,
    /// Synthetic aggregator of a table's column headers.
    TableHeaderContainer,
}

impl AccessibilityRole {
    /// Parse the value of a `role` attribute.
    ///
    /// The attribute is a whitespace separated list of tokens; the first token naming a
    /// known role wins. Returns `None` when no token is recognised.
    pub fn from_aria(value: &str) -> Option<Self> {
        value
            .split_ascii_whitespace()
            .find_map(|token| Self::from_aria_token(&token.to_ascii_lowercase()))
    }

    fn from_aria_token(token: &str) -> Option<Self> {
        let role = match token {
            "table" => Self::Table,
            "grid" => Self::Grid,
            "treegrid" => Self::TreeGrid,
            "row" => Self::Row,
            "rowgroup" => Self::RowGroup,
            "cell" => Self::Cell,
            "gridcell" => Self::GridCell,
            "columnheader" => Self::ColumnHeader,
            "rowheader" => Self::RowHeader,
            "caption" => Self::Caption,
            "group" => Self::Group,
            "presentation" | "none" => Self::Presentation,
            "generic" => Self::Generic,
            _ => return None,
        };
        Some(role)
    }

    /// `table`, `grid` or `treegrid`.
    pub fn is_table_role(self) -> bool {
        matches!(self, Self::Table | Self::Grid | Self::TreeGrid)
    }

    /// Roles an author can put on an element to make it a table cell.
    pub fn is_cell_role(self) -> bool {
        matches!(
            self,
            Self::Cell | Self::GridCell | Self::ColumnHeader | Self::RowHeader
        )
    }

    pub fn is_group(self) -> bool {
        matches!(self, Self::Group | Self::RowGroup)
    }

    pub fn is_grid(self) -> bool {
        matches!(self, Self::Grid | Self::TreeGrid)
    }

    /// Whether a node with this role is left out of the tree. Its children are
    /// promoted to its parent.
    pub fn is_ignored(self) -> bool {
        matches!(self, Self::Ignored | Self::Presentation)
    }
}
