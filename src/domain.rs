use std::path::PathBuf;

use derive_setters::Setters;
use ratatui::crossterm::event::KeyEvent;
use thiserror::Error;

/// Page sizes offered by the pager.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [5, 10, 15, 20, 25];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// At most this many columns are visible after loading a dataset.
pub const DEFAULT_VISIBLE_CAP: usize = 8;

pub const HELP_TEXT: &str = "\
roster - employee table viewer

  q            quit
  ?            show this help
  j/k, up/down move row selection
  h/l, <-/->   move column selection
  n/p          next / previous page
  +/-          larger / smaller page size
  /            search (enter keeps, esc clears)
  s/S          sort selected column ascending / descending
  c            open column chooser
    space      toggle column under cursor
    a          show all columns
    o          show only the name column
  e            export visible data to csv
  y            copy selected row to clipboard
  esc          close popup / chooser";

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("could not parse records: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("could not write csv: {0}")]
    CsvError(#[from] csv::Error),
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    #[error("export failed: {0}")]
    ExportFailed(String),
    #[error("invalid path {0}")]
    InvalidPath(String),
    #[error("file not found")]
    FileNotFound,
    #[error("permission denied")]
    PermissionDenied,
}

#[derive(Debug, Clone, Setters)]
pub struct ViewConfig {
    pub event_poll_time: u64,
    pub page_size: usize,
    pub max_default_visible: usize,
    pub export_dir: PathBuf,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            page_size: DEFAULT_PAGE_SIZE,
            max_default_visible: DEFAULT_VISIBLE_CAP,
            export_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CMDMode {
    Search,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    NextPage,
    PrevPage,
    LargerPageSize,
    SmallerPageSize,
    Search,
    SortAscending,
    SortDescending,
    ToggleColumnChooser,
    ToggleColumn,
    SelectAll,
    SelectNone,
    Export,
    CopyRow,
    Help,
    Exit,
    Enter,
    PointerDown(u16, u16),
    Resize(usize, usize),
    RawKey(KeyEvent),
}
