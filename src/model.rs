use arboard::Clipboard;
use chrono::Local;
use ratatui::crossterm::event::KeyEvent;
use ratatui::layout::{Position, Rect};
use rayon::prelude::*;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, trace, warn};

use crate::domain::{CMDMode, HELP_TEXT, Message, PAGE_SIZE_OPTIONS, RosterError, ViewConfig};
use crate::export::{csv_line, export_to_dir, to_csv};
use crate::grid::{GridColumn, GridConfig};
use crate::inference::{ColumnDescriptor, Inference, infer};
use crate::inputter::{InputResult, Inputter};
use crate::record::{Record, cell_text};
use crate::ui::{CHOOSER_WIDTH, SEARCHBAR_HEIGHT, STATUSLINE_HEIGHT, TABLE_CHROME_HEIGHT};

/// Column kept visible when the user hides everything.
pub const NAME_COLUMN: &str = "name";

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    POPUP,
    CMDINPUT,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub column: String,
    pub ascending: bool,
}

#[derive(Default, Clone, Debug, PartialEq)]
pub struct UILayout {
    pub width: usize,
    pub height: usize,
    pub table_height: usize,
    pub statusline_height: usize,
    pub chooser: Rect,
}

impl UILayout {
    pub fn from_values(ui_width: usize, ui_height: usize, ncolumns: usize) -> Self {
        let table_height = ui_height
            .saturating_sub(SEARCHBAR_HEIGHT)
            .saturating_sub(STATUSLINE_HEIGHT)
            .saturating_sub(TABLE_CHROME_HEIGHT);

        // The column chooser hangs below the search bar at the right edge.
        let width = std::cmp::min(CHOOSER_WIDTH, ui_width);
        let height = std::cmp::min(
            ncolumns + 2,
            ui_height.saturating_sub(SEARCHBAR_HEIGHT + STATUSLINE_HEIGHT),
        );
        let chooser = Rect::new(
            clamp_u16(ui_width - width),
            clamp_u16(SEARCHBAR_HEIGHT),
            clamp_u16(width),
            clamp_u16(height),
        );

        let layout = UILayout {
            width: ui_width,
            height: ui_height,
            table_height,
            statusline_height: STATUSLINE_HEIGHT,
            chooser,
        };
        trace!("Build UILayout: {:?}", layout);
        layout
    }
}

fn clamp_u16(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChooserView {
    pub items: Vec<(String, bool)>,
    pub cursor: usize,
    pub area: Rect,
}

/// Everything the ui needs to draw one frame.
#[derive(Clone, Debug)]
pub struct UIData {
    pub name: String,
    pub grid: GridConfig,
    pub rows: Vec<Vec<String>>,
    pub selected_row: usize,
    pub selected_column: usize,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub nrows: usize,
    pub nrecords: usize,
    pub sort: Option<(String, bool)>,
    pub filter_text: String,
    pub cmdinput: InputResult,
    pub cmd_mode: Option<CMDMode>,
    pub active_cmdinput: bool,
    pub chooser: Option<ChooserView>,
    pub show_popup: bool,
    pub popup_message: String,
    pub layout: UILayout,
    pub status_message: String,
    pub last_update: Instant,
}

impl UIData {
    pub fn empty() -> Self {
        UIData {
            name: String::new(),
            grid: GridConfig::new(Vec::new(), PAGE_SIZE_OPTIONS[1]),
            rows: Vec::new(),
            selected_row: 0,
            selected_column: 0,
            page: 0,
            page_count: 1,
            page_size: PAGE_SIZE_OPTIONS[1],
            nrows: 0,
            nrecords: 0,
            sort: None,
            filter_text: String::new(),
            cmdinput: InputResult::default(),
            cmd_mode: None,
            active_cmdinput: false,
            chooser: None,
            show_popup: false,
            popup_message: String::new(),
            layout: UILayout::default(),
            status_message: String::new(),
            last_update: Instant::now(),
        }
    }
}

pub struct Model {
    config: ViewConfig,
    pub status: Status,
    name: String,
    modus: Modus,
    previous_modus: Modus,
    records: Vec<Record>,
    inference: Inference,
    filter_text: String,
    visible_column_ids: HashSet<String>,
    dropdown_open: bool,
    dropdown_cursor: usize,
    rows: Vec<usize>, // Indices into `records` after filtering and sorting
    sort: Option<SortKey>,
    page: usize,
    page_size: usize,
    curser_row: usize,
    curser_column: usize,
    uilayout: UILayout,
    uidata: UIData,
    clipboard: Option<Clipboard>,
    input: Inputter,
    cmd_mode: Option<CMDMode>,
    last_input: InputResult,
    active_cmdinput: bool,
    status_message: String,
}

impl Model {
    pub fn init(
        config: &ViewConfig,
        name: impl Into<String>,
        records: Vec<Record>,
        ui_width: usize,
        ui_height: usize,
    ) -> Self {
        let page_size = if PAGE_SIZE_OPTIONS.contains(&config.page_size) {
            config.page_size
        } else {
            warn!(
                "Page size {} is not one of {:?}, using default",
                config.page_size, PAGE_SIZE_OPTIONS
            );
            PAGE_SIZE_OPTIONS[1]
        };
        let mut model = Self {
            config: config.clone(),
            status: Status::READY,
            name: name.into(),
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            records: Vec::new(),
            inference: Inference::default(),
            filter_text: String::new(),
            visible_column_ids: HashSet::new(),
            dropdown_open: false,
            dropdown_cursor: 0,
            rows: Vec::new(),
            sort: None,
            page: 0,
            page_size,
            curser_row: 0,
            curser_column: 0,
            uilayout: UILayout::from_values(ui_width, ui_height, 0),
            uidata: UIData::empty(),
            clipboard: None,
            input: Inputter::default(),
            cmd_mode: None,
            last_input: InputResult::default(),
            active_cmdinput: false,
            status_message: "Started roster!".to_string(),
        };
        model.set_records(records);
        let message = format!(
            "Loaded {} records with {} columns",
            model.records.len(),
            model.inference.columns.len()
        );
        model.set_status_message(message);
        model
    }

    // -------------------- Dataset and derived views ----------------------- //

    /// Replace the dataset. Visibility choices for known columns survive,
    /// columns that are new to this dataset become visible.
    pub fn set_records(&mut self, records: Vec<Record>) {
        let start_time = Instant::now();
        let first_load = self.inference.columns.is_empty();
        let previous: HashSet<String> =
            self.inference.columns.iter().map(|c| c.id.clone()).collect();

        self.inference = infer(&records, self.config.max_default_visible);
        self.records = records;

        if first_load {
            self.visible_column_ids = self.inference.default_visible.clone();
        } else {
            let inference = &self.inference;
            self.visible_column_ids.retain(|id| inference.contains(id));
            for column in inference.columns.iter() {
                if !previous.contains(&column.id) && !column.default_hidden {
                    trace!("New column \"{}\" becomes visible", column.id);
                    self.visible_column_ids.insert(column.id.clone());
                }
            }
            if self.visible_column_ids.is_empty() {
                self.visible_column_ids = self.inference.default_visible.clone();
            }
        }
        if self.visible_column_ids.is_empty() {
            self.select_none();
        }

        if let Some(sort) = &self.sort
            && !self.inference.contains(&sort.column)
        {
            self.sort = None;
        }
        self.uilayout = UILayout::from_values(
            self.uilayout.width,
            self.uilayout.height,
            self.inference.columns.len(),
        );
        self.dropdown_cursor = 0;
        self.refresh();
        info!(
            "Inferred {} columns from {} records in {}ms",
            self.inference.columns.len(),
            self.records.len(),
            start_time.elapsed().as_millis()
        );
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn inference(&self) -> &Inference {
        &self.inference
    }

    pub fn set_filter_text(&mut self, text: &str) {
        if self.filter_text == text {
            return;
        }
        trace!("Filter text \"{}\"", text);
        self.filter_text = text.to_string();
        self.page = 0;
        self.curser_row = 0;
        self.refresh();
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// Records containing the filter text in any field, in original order.
    pub fn filtered_records(&self) -> Vec<&Record> {
        self.matching_indices()
            .into_iter()
            .map(|idx| &self.records[idx])
            .collect()
    }

    /// Filtered records in display order.
    pub fn displayed_records(&self) -> Vec<&Record> {
        self.rows.iter().map(|&idx| &self.records[idx]).collect()
    }

    fn matching_indices(&self) -> Vec<usize> {
        if self.filter_text.is_empty() {
            return (0..self.records.len()).collect();
        }
        let needle = self.filter_text.to_lowercase();
        self.records
            .par_iter()
            .enumerate()
            .filter(|(_, record)| record_matches(record, &needle))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn visible_column_ids(&self) -> &HashSet<String> {
        &self.visible_column_ids
    }

    /// Visible columns in inferred order.
    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor> {
        self.inference
            .columns
            .iter()
            .filter(|c| self.visible_column_ids.contains(&c.id))
            .collect()
    }

    pub fn grid_config(&self) -> GridConfig {
        let columns = self
            .visible_columns()
            .into_iter()
            .map(GridColumn::from)
            .collect();
        GridConfig::new(columns, self.page_size)
    }

    // -------------------- Column visibility ------------------------------- //

    /// Flip the visibility of a column. The last visible column stays.
    pub fn toggle_column(&mut self, id: &str) {
        if !self.inference.contains(id) {
            warn!("Toggling unknown column \"{id}\"");
            return;
        }
        if self.visible_column_ids.contains(id) {
            if self.visible_column_ids.len() == 1 {
                trace!("Refusing to hide the last visible column \"{id}\"");
                return;
            }
            self.visible_column_ids.remove(id);
        } else {
            self.visible_column_ids.insert(id.to_string());
        }
        trace!("Visible columns: {:?}", self.visible_column_ids);
        self.refresh();
    }

    /// Show every column that is not hidden by default. Hidden-by-default
    /// columns the user already enabled stay visible.
    pub fn select_all(&mut self) {
        let visible = &self.visible_column_ids;
        self.visible_column_ids = self
            .inference
            .columns
            .iter()
            .filter(|c| !c.default_hidden || visible.contains(&c.id))
            .map(|c| c.id.clone())
            .collect();
        if self.visible_column_ids.is_empty() {
            self.select_none();
            return;
        }
        self.refresh();
    }

    /// Show only the name column, or the first column if there is none.
    pub fn select_none(&mut self) {
        let keep = self
            .inference
            .column(NAME_COLUMN)
            .or_else(|| self.inference.columns.first())
            .map(|c| c.id.clone());
        self.visible_column_ids = keep.into_iter().collect();
        self.refresh();
    }

    // -------------------- Column chooser ---------------------------------- //

    pub fn dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub fn open_dropdown(&mut self) {
        self.dropdown_open = true;
        self.update_uidata();
    }

    pub fn close_dropdown(&mut self) {
        self.dropdown_open = false;
        self.update_uidata();
    }

    /// Pointer press at a screen position. Closes the chooser when the press
    /// is outside of it.
    pub fn dismiss_at(&mut self, x: u16, y: u16) {
        if self.dropdown_open && !self.uilayout.chooser.contains(Position::new(x, y)) {
            trace!("Pointer at {x}:{y} outside chooser, closing");
            self.close_dropdown();
        }
    }

    fn move_dropdown_cursor(&mut self, step: i32) {
        let n = self.inference.columns.len();
        if n == 0 {
            return;
        }
        self.dropdown_cursor = if step < 0 {
            self.dropdown_cursor.saturating_sub(1)
        } else {
            std::cmp::min(self.dropdown_cursor + 1, n - 1)
        };
        self.update_uidata();
    }

    fn toggle_column_under_cursor(&mut self) {
        if let Some(id) = self
            .inference
            .columns
            .get(self.dropdown_cursor)
            .map(|c| c.id.clone())
        {
            self.toggle_column(&id);
        }
    }

    // -------------------- Sorting and paging ------------------------------ //

    pub fn sort_by(&mut self, column: &str, ascending: bool) {
        if !self.inference.column(column).is_some_and(|c| c.sortable) {
            warn!("Column \"{column}\" can not be sorted");
            return;
        }
        self.sort = Some(SortKey {
            column: column.to_string(),
            ascending,
        });
        self.refresh();
    }

    pub fn sort(&self) -> Option<&SortKey> {
        self.sort.as_ref()
    }

    fn sort_current_column(&mut self, ascending: bool) {
        let column = self
            .visible_columns()
            .get(self.curser_column)
            .map(|c| c.id.clone());
        if let Some(column) = column {
            self.sort_by(&column, ascending);
            let direction = if ascending { "ascending" } else { "descending" };
            self.set_status_message(format!("Sorted by {column} {direction}"));
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        std::cmp::max(1, self.rows.len().div_ceil(self.page_size))
    }

    /// Records shown on the current page.
    pub fn page_records(&self) -> Vec<&Record> {
        let begin = std::cmp::min(self.page * self.page_size, self.rows.len());
        let end = std::cmp::min(begin + self.page_size, self.rows.len());
        self.rows[begin..end]
            .iter()
            .map(|&idx| &self.records[idx])
            .collect()
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.curser_row = 0;
            self.update_uidata();
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.curser_row = 0;
            self.update_uidata();
        }
    }

    /// Step through the page size options. The first record of the current
    /// page stays on screen.
    pub fn cycle_page_size(&mut self, step: i32) {
        let idx = PAGE_SIZE_OPTIONS
            .iter()
            .position(|&s| s == self.page_size)
            .unwrap_or(1);
        let new_idx = if step < 0 {
            idx.saturating_sub(1)
        } else {
            std::cmp::min(idx + 1, PAGE_SIZE_OPTIONS.len() - 1)
        };
        let first_record = self.page * self.page_size;
        self.page_size = PAGE_SIZE_OPTIONS[new_idx];
        self.page = first_record / self.page_size;
        self.curser_row = 0;
        self.refresh();
        self.set_status_message(format!("{} rows per page", self.page_size));
    }

    // -------------------- Export ------------------------------------------ //

    /// Displayed records and visible columns as CSV text.
    pub fn export_csv(&self) -> Result<String, RosterError> {
        to_csv(&self.grid_config().columns, &self.displayed_records())
    }

    pub fn export(&self) -> Result<PathBuf, RosterError> {
        export_to_dir(
            &self.config.export_dir,
            Local::now().date_naive(),
            &self.grid_config().columns,
            &self.displayed_records(),
        )
    }

    fn export_with_status(&mut self) {
        match self.export() {
            Ok(path) => {
                let message = format!("Exported {} rows to {}", self.rows.len(), path.display());
                self.set_status_message(message);
            }
            Err(e) => {
                error!("Export failed: {e}");
                self.set_status_message(format!("Export failed: {e}"));
            }
        }
    }

    fn copy_table_row(&mut self) {
        let Some(record) = self.selected_record() else {
            return;
        };
        let line = match csv_line(&self.grid_config().columns, record) {
            Ok(line) => line,
            Err(e) => {
                error!("Could not build row: {e}");
                self.set_status_message(format!("Copying row failed: {e}"));
                return;
            }
        };
        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    error!("Clipboard unavailable: {:?}", e);
                    self.set_status_message("Clipboard unavailable");
                    return;
                }
            }
        }
        if let Some(clipboard) = self.clipboard.as_mut() {
            match clipboard.set_text(line) {
                Ok(_) => {
                    trace!("Copied row to clipboard.");
                    self.set_status_message("Copied row to clipboard");
                }
                Err(e) => {
                    error!("Error copying to clipboard: {:?}", e);
                    self.set_status_message("Copying to clipboard failed");
                }
            }
        }
    }

    fn selected_record(&self) -> Option<&Record> {
        let idx = self.page * self.page_size + self.curser_row;
        self.rows.get(idx).map(|&ridx| &self.records[ridx])
    }

    // -------------------- Derived state ----------------------------------- //

    /// Recompute rows after filter, sort or visibility changes.
    fn refresh(&mut self) {
        let mut rows = self.matching_indices();
        if let Some(sort) = &self.sort {
            let records = &self.records;
            rows.sort_by(|&a, &b| {
                compare_values(
                    records[a].get(&sort.column),
                    records[b].get(&sort.column),
                    sort.ascending,
                )
            });
        }
        self.rows = rows;

        self.page = std::cmp::min(self.page, self.page_count() - 1);
        let page_len = self.page_records().len();
        self.curser_row = std::cmp::min(self.curser_row, page_len.saturating_sub(1));
        let ncolumns = self.visible_column_ids.len();
        self.curser_column = std::cmp::min(self.curser_column, ncolumns.saturating_sub(1));
        self.dropdown_cursor = std::cmp::min(
            self.dropdown_cursor,
            self.inference.columns.len().saturating_sub(1),
        );
        self.update_uidata();
    }

    fn update_uidata(&mut self) {
        let grid = self.grid_config();
        let rows: Vec<Vec<String>> = self
            .page_records()
            .into_iter()
            .map(|record| {
                grid.columns
                    .iter()
                    .map(|c| c.render_cell(record))
                    .collect::<Vec<String>>()
            })
            .collect();
        let sort = self.sort.as_ref().map(|s| (s.column.clone(), s.ascending));
        let chooser = self.dropdown_open.then(|| ChooserView {
            items: self
                .inference
                .columns
                .iter()
                .map(|c| (c.label.clone(), self.visible_column_ids.contains(&c.id)))
                .collect(),
            cursor: self.dropdown_cursor,
            area: self.uilayout.chooser,
        });

        self.uidata = UIData {
            name: self.name.clone(),
            grid,
            rows,
            selected_row: self.curser_row,
            selected_column: self.curser_column,
            page: self.page,
            page_count: self.page_count(),
            page_size: self.page_size,
            nrows: self.rows.len(),
            nrecords: self.records.len(),
            sort,
            filter_text: self.filter_text.clone(),
            cmdinput: self.last_input.clone(),
            cmd_mode: self.cmd_mode,
            active_cmdinput: self.active_cmdinput,
            chooser,
            show_popup: self.modus == Modus::POPUP,
            popup_message: HELP_TEXT.to_string(),
            layout: self.uilayout.clone(),
            status_message: self.status_message.clone(),
            last_update: Instant::now(),
        };
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.uidata.status_message = self.status_message.clone();
        self.uidata.last_update = Instant::now();
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    pub fn raw_keyevents(&self) -> bool {
        self.active_cmdinput
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            self.uilayout.width, width, self.uilayout.height, height
        );
        self.uilayout = UILayout::from_values(width, height, self.inference.columns.len());
        self.update_uidata();
    }

    // -------------------- Message handling -------------------------------- //

    pub fn update(&mut self, message: Option<Message>) -> Result<(), RosterError> {
        let Some(msg) = message else {
            return Ok(());
        };
        match self.modus {
            Modus::TABLE if self.dropdown_open => match msg {
                Message::Quit => self.quit(),
                Message::MoveUp => self.move_dropdown_cursor(-1),
                Message::MoveDown => self.move_dropdown_cursor(1),
                Message::ToggleColumn | Message::Enter => self.toggle_column_under_cursor(),
                Message::SelectAll => self.select_all(),
                Message::SelectNone => self.select_none(),
                Message::ToggleColumnChooser | Message::Exit => self.close_dropdown(),
                Message::PointerDown(x, y) => self.dismiss_at(x, y),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::Help => self.show_help(),
                _ => (),
            },
            Modus::TABLE => match msg {
                Message::Quit => self.quit(),
                Message::MoveUp => self.move_table_selection_up(),
                Message::MoveDown => self.move_table_selection_down(),
                Message::MoveLeft => self.move_table_selection_left(),
                Message::MoveRight => self.move_table_selection_right(),
                Message::NextPage => self.next_page(),
                Message::PrevPage => self.prev_page(),
                Message::LargerPageSize => self.cycle_page_size(1),
                Message::SmallerPageSize => self.cycle_page_size(-1),
                Message::Search => self.enter_cmd_mode(CMDMode::Search),
                Message::SortAscending => self.sort_current_column(true),
                Message::SortDescending => self.sort_current_column(false),
                Message::ToggleColumnChooser => self.open_dropdown(),
                Message::SelectAll => self.select_all(),
                Message::SelectNone => self.select_none(),
                Message::Export => self.export_with_status(),
                Message::CopyRow => self.copy_table_row(),
                Message::Help => self.show_help(),
                Message::Exit => self.set_filter_text(""),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            },
            Modus::POPUP => match msg {
                Message::Quit => self.quit(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::Exit | Message::Enter | Message::Help => self.close_popup(),
                _ => (),
            },
            Modus::CMDINPUT => match msg {
                Message::RawKey(key) => self.raw_input(key),
                Message::Resize(width, height) => self.ui_resize(width, height),
                _ => (),
            },
        }
        Ok(())
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
        self.update_uidata();
    }

    fn close_popup(&mut self) {
        trace!("Close popup ...");
        self.modus = self.previous_modus;
        self.previous_modus = Modus::POPUP;
        self.update_uidata();
    }

    fn enter_cmd_mode(&mut self, mode: CMDMode) {
        trace!("Entering command mode ...");
        self.previous_modus = self.modus;
        self.modus = Modus::CMDINPUT;
        self.cmd_mode = Some(mode);
        self.active_cmdinput = true;

        // Continue editing the current search term.
        self.input.set(&self.filter_text);
        self.last_input = self.input.get();
        self.update_uidata();
    }

    fn raw_input(&mut self, key: KeyEvent) {
        if !self.active_cmdinput {
            return;
        }
        self.last_input = self.input.read(key);
        match self.cmd_mode {
            Some(CMDMode::Search) => {
                let term = self.last_input.input.clone();
                self.set_filter_text(&term);
            }
            None => info!("Cmd mode is none!"),
        }
        if self.last_input.finished {
            self.leave_cmd_mode();
        }
        self.update_uidata();
    }

    fn leave_cmd_mode(&mut self) {
        trace!("Handle cmd input {}", self.last_input.input);
        self.active_cmdinput = false;
        self.modus = self.previous_modus;
        self.previous_modus = Modus::CMDINPUT;
        self.cmd_mode = None;
        let message = if self.filter_text.is_empty() {
            "Search cleared".to_string()
        } else {
            format!("{} of {} records match", self.rows.len(), self.records.len())
        };
        self.set_status_message(message);
    }

    fn move_table_selection_up(&mut self) {
        if self.curser_row > 0 {
            self.curser_row -= 1;
        } else if self.page > 0 {
            self.page -= 1;
            self.curser_row = self.page_records().len().saturating_sub(1);
        }
        self.update_uidata();
    }

    fn move_table_selection_down(&mut self) {
        if self.curser_row + 1 < self.page_records().len() {
            self.curser_row += 1;
        } else if self.page + 1 < self.page_count() {
            self.page += 1;
            self.curser_row = 0;
        }
        self.update_uidata();
    }

    fn move_table_selection_left(&mut self) {
        self.curser_column = self.curser_column.saturating_sub(1);
        self.update_uidata();
    }

    fn move_table_selection_right(&mut self) {
        if self.curser_column + 1 < self.visible_column_ids.len() {
            self.curser_column += 1;
        }
        self.update_uidata();
    }
}

/// Case folded search over every field of a record.
pub fn record_matches(record: &Record, needle_lower: &str) -> bool {
    record
        .values()
        .any(|v| cell_text(v).to_lowercase().contains(needle_lower))
}

/// Order two cells. Missing and null values go last in both directions.
/// Values of different kinds are ordered by kind: numbers, booleans, text.
fn compare_values(a: Option<&Value>, b: Option<&Value>, ascending: bool) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    let ord = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or_default()
            .total_cmp(&y.as_f64().unwrap_or_default()),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => kind_rank(x).cmp(&kind_rank(y)).then_with(|| {
            let (x, y) = (cell_text(x), cell_text(y));
            x.to_lowercase().cmp(&y.to_lowercase()).then_with(|| x.cmp(&y))
        }),
    };
    if ascending { ord } else { ord.reverse() }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Number(_) => 0,
        Value::Bool(_) => 1,
        _ => 2,
    }
}
