use ratatui::Frame;

use crate::tui::app::App;
use crate::tui::layout;

mod bottom;
mod detail;
mod lists;
pub mod util;

pub fn render_app(frame: &mut Frame, app: &App) {
    let areas = layout::split(app.screen(), frame.size());

    if let Some(area) = areas.teams {
        lists::render_teams(frame, area, app);
    }
    if let Some(area) = areas.issues {
        lists::render_issues(frame, area, app);
    }
    if let Some(area) = areas.detail {
        detail::render(frame, area, app);
    }
    bottom::render_status(frame, areas.status, app);
}
