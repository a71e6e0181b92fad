use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Position, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState},
};

use crate::model::{ChooserView, Model, UIData};

pub const SEARCHBAR_HEIGHT: usize = 3;
pub const STATUSLINE_HEIGHT: usize = 1;
pub const TABLE_CHROME_HEIGHT: usize = 3; // Two borders and the header row
pub const CHOOSER_WIDTH: usize = 32;

#[derive(Debug, Default)]
pub struct TableUI;

impl TableUI {
    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let uidata = model.get_uidata();
        let [search_area, table_area, status_area] = Layout::vertical([
            Constraint::Length(SEARCHBAR_HEIGHT as u16),
            Constraint::Min(0),
            Constraint::Length(STATUSLINE_HEIGHT as u16),
        ])
        .areas(frame.area());

        Self::draw_searchbar(uidata, frame, search_area);
        Self::draw_table(uidata, frame, table_area);
        Self::draw_statusline(uidata, frame, status_area);

        if let Some(chooser) = &uidata.chooser {
            Self::draw_chooser(chooser, frame);
        }
        if uidata.show_popup {
            Self::draw_popup(&uidata.popup_message, frame);
        }
    }

    fn draw_searchbar(uidata: &UIData, frame: &mut Frame, area: Rect) {
        let (text, title) = if uidata.active_cmdinput {
            (uidata.cmdinput.input.as_str(), " Search (enter: keep, esc: clear) ")
        } else {
            (uidata.filter_text.as_str(), " Search ")
        };
        let mut block = Block::bordered().title(title);
        if uidata.active_cmdinput {
            block = block.border_style(Style::new().yellow());
        }
        frame.render_widget(Paragraph::new(text).block(block), area);

        if uidata.active_cmdinput {
            let x = area.x + 1 + uidata.cmdinput.curser_pos as u16;
            frame.set_cursor_position(Position::new(x, area.y + 1));
        }
    }

    fn draw_table(uidata: &UIData, frame: &mut Frame, area: Rect) {
        let columns = &uidata.grid.columns;
        let header = Row::new(columns.iter().map(|c| {
            let marker = match &uidata.sort {
                Some((field, true)) if *field == c.field => " ▲",
                Some((field, false)) if *field == c.field => " ▼",
                _ => "",
            };
            Cell::from(format!("{}{}", c.header_name, marker))
        }))
        .bold();
        let widths = columns.iter().map(|c| Constraint::Length(c.cell_width()));
        let rows = uidata
            .rows
            .iter()
            .map(|cells| Row::new(cells.iter().map(String::as_str)));

        let title = Line::from(format!(" {} ", uidata.name).bold());
        let pager = Line::from(vec![
            Span::from(format!(" page {}/{} ", uidata.page + 1, uidata.page_count)),
            Span::from(format!("| {} per page ", uidata.page_size)).blue(),
            Span::from(format!("| {} of {} rows ", uidata.nrows, uidata.nrecords)),
        ]);
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(Style::new().reversed())
            .cell_highlight_style(Style::new().yellow().bold())
            .block(
                Block::bordered()
                    .title(title)
                    .title_bottom(pager.right_aligned()),
            );

        let mut state = TableState::default()
            .with_selected(Some(uidata.selected_row))
            .with_selected_column(Some(uidata.selected_column));
        if uidata.rows.is_empty() {
            state.select(None);
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_statusline(uidata: &UIData, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::from(uidata.status_message.as_str()),
            Span::from("  "),
            "?".blue().bold(),
            Span::from(" help "),
            "c".blue().bold(),
            Span::from(" columns "),
            "e".blue().bold(),
            Span::from(" export "),
            "q".blue().bold(),
            Span::from(" quit"),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_chooser(chooser: &ChooserView, frame: &mut Frame) {
        let area = chooser.area.intersection(frame.area());
        let items = chooser.items.iter().map(|(label, checked)| {
            let mark = if *checked { "[x] " } else { "[ ] " };
            ListItem::new(format!("{mark}{label}"))
        });
        let list = List::new(items)
            .block(
                Block::bordered()
                    .title(" Columns ")
                    .title_bottom(Line::from(" a: all  o: none ").right_aligned()),
            )
            .highlight_style(Style::new().reversed());
        let mut state = ListState::default().with_selected(Some(chooser.cursor));

        frame.render_widget(Clear, area);
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_popup(message: &str, frame: &mut Frame) {
        let area = popup_area(frame.area(), 60, 70);
        let popup = Paragraph::new(message).block(Block::bordered().title(" Help ".bold()));
        frame.render_widget(Clear, area);
        frame.render_widget(popup, area);
    }
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Message, ViewConfig};
    use crate::record::parse_records;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(model: &Model) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut ui = TableUI;
        terminal.draw(|f| ui.draw(model, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn model() -> Model {
        let records = parse_records(
            r#"[{"id": 1, "name": "Ann", "salary": 75000, "isRemote": true},
                {"id": 2, "name": "Bo", "salary": 50000, "isRemote": false}]"#,
        )
        .unwrap();
        Model::init(&ViewConfig::default(), "staff", records, 100, 30)
    }

    #[test]
    fn renders_visible_columns_with_display_values() {
        let screen = render(&model());
        assert!(screen.contains("Name"));
        assert!(screen.contains("Is Remote"));
        assert!(screen.contains("$75,000"));
        assert!(screen.contains("Yes"));
        assert!(screen.contains("page 1/1"));
        assert!(!screen.contains("Id "));
    }

    #[test]
    fn renders_chooser_with_checkboxes() {
        let mut model = model();
        model.update(Some(Message::ToggleColumnChooser)).unwrap();
        let screen = render(&model);
        assert!(screen.contains("[ ] Id"));
        assert!(screen.contains("[x] Salary"));
    }

    #[test]
    fn sort_marker_follows_column_not_label() {
        let records = parse_records(
            r#"[{"name": "Ann", "hire_date": "2020-01-01", "hireDate": "2021-02-02"}]"#,
        )
        .unwrap();
        let mut model = Model::init(&ViewConfig::default(), "staff", records, 100, 30);
        model.sort_by("hireDate", false);
        let screen = render(&model);
        assert_eq!(screen.matches("Hire Date ▼").count(), 1);
        assert_eq!(screen.matches("▲").count(), 0);
    }
}
