//! Rendering - paints a grid plan into a ratatui frame.

use level_lib::{
  grid::NoticeLevel,
  grid_layout::{
    GridPlan,
    PlanCell,
    PlanRow,
  },
};
use ratatui::{
  Frame,
  layout::{
    Constraint,
    Layout,
  },
  style::{
    Color,
    Modifier,
    Style,
  },
  text::{
    Line,
    Span,
  },
  widgets::Paragraph,
};

/// Lines taken by everything except data rows: title, header, status and
/// message.
pub const CHROME_ROWS: u16 = 4;

const SEPARATOR: &str = "|";

pub fn draw(frame: &mut Frame, plan: &GridPlan, title: &str) {
  let [title_area, header_area, body_area, status_area, message_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(1),
    Constraint::Min(0),
    Constraint::Length(1),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  frame.render_widget(
    Paragraph::new(title).style(Style::default().add_modifier(Modifier::BOLD)),
    title_area,
  );

  let header_style = Style::default()
    .fg(Color::Cyan)
    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
  frame.render_widget(
    Paragraph::new(cells_line(&plan.header, |_| header_style)),
    header_area,
  );

  let rows: Vec<Line> = plan.rows.iter().map(row_line).collect();
  frame.render_widget(Paragraph::new(rows), body_area);

  frame.render_widget(
    Paragraph::new(plan.status.as_str()).style(Style::default().add_modifier(Modifier::REVERSED)),
    status_area,
  );

  let message = match &plan.message {
    Some(notice) => {
      let color = match notice.level {
        NoticeLevel::Info => Color::Green,
        NoticeLevel::Error => Color::Red,
      };
      Line::styled(notice.text.as_str(), Style::default().fg(color))
    },
    None if plan.modified => Line::styled("[MODIFIED]", Style::default().fg(Color::Yellow)),
    None => Line::default(),
  };
  frame.render_widget(Paragraph::new(message), message_area);
}

fn row_line(row: &PlanRow) -> Line<'static> {
  cells_line(&row.cells, |cell| {
    if cell.editing {
      Style::default().fg(Color::Black).bg(Color::Yellow)
    } else if cell.selected {
      Style::default().add_modifier(Modifier::REVERSED)
    } else if row.current {
      Style::default().add_modifier(Modifier::BOLD)
    } else {
      Style::default()
    }
  })
}

fn cells_line(cells: &[PlanCell], style: impl Fn(&PlanCell) -> Style) -> Line<'static> {
  let spans = cells.iter().flat_map(|cell| {
    [
      Span::styled(cell.padded(), style(cell)),
      Span::raw(SEPARATOR),
    ]
  });
  Line::from(spans.collect::<Vec<_>>())
}
