use serde_json::Value;

use crate::domain::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use crate::format::Renderer;
use crate::inference::ColumnDescriptor;
use crate::record::{Record, cell_text};

/// Pixels per terminal cell when sizing columns.
const PIXELS_PER_CELL: u16 = 10;

/// What the table widget needs to know about one column.
#[derive(Debug, Clone, PartialEq)]
pub struct GridColumn {
    pub field: String,
    pub header_name: String,
    pub width: u16,
    pub sortable: bool,
    pub render: Option<Renderer>,
}

impl GridColumn {
    pub fn value<'a>(&self, record: &'a Record) -> Option<&'a Value> {
        record.get(&self.field)
    }

    /// Display text of this column's cell in `record`. Missing fields are empty.
    pub fn render_cell(&self, record: &Record) -> String {
        match (self.value(record), self.render) {
            (None, _) => String::new(),
            (Some(v), Some(renderer)) => renderer.render(v),
            (Some(v), None) => cell_text(v),
        }
    }

    pub fn cell_width(&self) -> u16 {
        (self.width / PIXELS_PER_CELL).max(1)
    }
}

impl From<&ColumnDescriptor> for GridColumn {
    fn from(c: &ColumnDescriptor) -> Self {
        GridColumn {
            field: c.id.clone(),
            header_name: c.label.clone(),
            width: c.width,
            sortable: c.sortable,
            render: c.renderer,
        }
    }
}

/// Configuration handed to the table renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub columns: Vec<GridColumn>,
    pub page_size_options: &'static [usize],
    pub initial_page_size: usize,
}

impl GridConfig {
    pub fn new(columns: Vec<GridColumn>, initial_page_size: usize) -> Self {
        let initial_page_size = if PAGE_SIZE_OPTIONS.contains(&initial_page_size) {
            initial_page_size
        } else {
            DEFAULT_PAGE_SIZE
        };
        GridConfig {
            columns,
            page_size_options: &PAGE_SIZE_OPTIONS,
            initial_page_size,
        }
    }
}
