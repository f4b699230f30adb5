//! The subset of computed style read by the table heuristics.

use bitflags::bitflags;
use color::{AlphaColor, Srgb};

pub type Color = AlphaColor<Srgb>;

pub const WHITE: Color = AlphaColor::new([1.0, 1.0, 1.0, 1.0]);
pub const TRANSPARENT: Color = AlphaColor::new([0.0, 0.0, 0.0, 0.0]);

/// Compare two colors component-wise.
pub fn same_color(a: Color, b: Color) -> bool {
    a.components == b.components
}

pub fn is_opaque(color: Color) -> bool {
    color.components[3] >= 1.0
}

/// The outer + inner display type of a box, reduced to what matters for tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    Inline,
    Contents,
    Table,
    TableCaption,
    TableRowGroup,
    TableHeaderGroup,
    TableFooterGroup,
    TableRow,
    TableCell,
    TableColumnGroup,
    TableColumn,
    /// The element generates no box.
    None,
}

impl Display {
    /// `display: table-row-group | table-header-group | table-footer-group`
    pub fn is_table_section(self) -> bool {
        matches!(
            self,
            Self::TableRowGroup | Self::TableHeaderGroup | Self::TableFooterGroup
        )
    }

    pub fn generates_box(self) -> bool {
        !matches!(self, Self::None | Self::Contents)
    }
}

bitflags! {
    /// Sides of a box that have a border of non-zero width.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BorderEdges: u8 {
        const TOP = 0b0001;
        const RIGHT = 0b0010;
        const BOTTOM = 0b0100;
        const LEFT = 0b1000;
    }
}

impl BorderEdges {
    /// Both sides of at least one axis are bordered.
    pub fn is_fully_bordered(self) -> bool {
        self.contains(Self::TOP | Self::BOTTOM) || self.contains(Self::LEFT | Self::RIGHT)
    }
}

/// The `empty-cells` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyCells {
    #[default]
    Show,
    Hide,
}

/// Computed style of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedStyle {
    pub display: Display,
    pub background_color: Color,
    pub border: BorderEdges,
    /// Horizontal `border-spacing` in CSS pixels.
    pub border_spacing_horizontal: f32,
    /// Vertical `border-spacing` in CSS pixels.
    pub border_spacing_vertical: f32,
    pub empty_cells: EmptyCells,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Block,
            background_color: TRANSPARENT,
            border: BorderEdges::empty(),
            border_spacing_horizontal: 0.0,
            border_spacing_vertical: 0.0,
            empty_cells: EmptyCells::Show,
        }
    }
}

impl ComputedStyle {
    pub fn with_display(display: Display) -> Self {
        Self {
            display,
            ..Default::default()
        }
    }

    /// Whether the element has a box of its own. `display: contents` has none.
    pub fn is_rendered(&self) -> bool {
        self.display.generates_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_bordered_needs_a_matching_pair() {
        assert!((BorderEdges::TOP | BorderEdges::BOTTOM).is_fully_bordered());
        assert!((BorderEdges::LEFT | BorderEdges::RIGHT).is_fully_bordered());
        assert!(!(BorderEdges::TOP | BorderEdges::LEFT).is_fully_bordered());
        assert!(BorderEdges::all().is_fully_bordered());
    }

    #[test]
    fn color_helpers() {
        assert!(same_color(WHITE, AlphaColor::new([1.0, 1.0, 1.0, 1.0])));
        assert!(!same_color(WHITE, TRANSPARENT));
        assert!(is_opaque(WHITE));
        assert!(!is_opaque(TRANSPARENT));
    }
}
