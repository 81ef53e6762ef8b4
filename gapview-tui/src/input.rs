use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Metric, Mode};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    None,
    Quit,
    /// Load the dataset named in the path prompt.
    LoadFile,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Backspace, Char, Enter, Esc, Left, Right, Tab};

    // Global quit shortcuts (the prompt captures plain characters)
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.mode {
        Mode::Dashboard => match key.code {
            Char('q') => {
                action = Action::Quit;
            }
            Left | Char('h') => {
                app.step_year(false);
            }
            Right | Char('l') => {
                app.step_year(true);
            }
            Tab => {
                app.view = app.view.next();
            }
            BackTab => {
                app.view = app.view.next().next();
            }
            Char('1') => {
                app.select_metric(Metric::Population);
            }
            Char('2') => {
                app.select_metric(Metric::GdpPerCapita);
            }
            Char('3') => {
                app.select_metric(Metric::LifeExpectancy);
            }
            Char('r') => {
                app.toggle_reduction();
            }
            Char('o') => {
                app.mode = Mode::FilePrompt;
                app.error_message = None;
            }
            _ => {}
        },

        Mode::FilePrompt => match key.code {
            Char(character) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    app.path_input.push(character);
                }
            }
            Backspace => {
                app.path_input.pop();
            }
            Enter => {
                action = Action::LoadFile;
            }
            Esc => {
                app.mode = Mode::Dashboard;
                app.path_input.clear();
            }
            _ => {}
        },
    }
    action
}

#[cfg(test)]
mod tests {
    use gapview_core::{model::TrendReduction, ports::DatasetSource, service::DashboardService};
    use gapview_source_gapminder::GapminderSource;

    use super::*;
    use crate::app::View;

    fn app() -> App {
        let service = DashboardService::open(Box::new(GapminderSource)).unwrap();
        App::new(service)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn year_slider_defaults_to_newest_and_steps_left() {
        let mut app = app();
        let newest = *GapminderSource.load().unwrap().years().last().unwrap();
        assert_eq!(app.selected_year(), Some(newest));

        handle_key_event(press(KeyCode::Left), &mut app);
        assert_eq!(app.selected_year(), Some(newest - 5));

        // Clamped at the upper end
        handle_key_event(press(KeyCode::Right), &mut app);
        handle_key_event(press(KeyCode::Right), &mut app);
        assert_eq!(app.selected_year(), Some(newest));
    }

    #[test]
    fn tab_cycles_views() {
        let mut app = app();
        assert_eq!(app.view, View::Comparison);
        handle_key_event(press(KeyCode::Tab), &mut app);
        assert_eq!(app.view, View::Scatter);
        handle_key_event(press(KeyCode::Tab), &mut app);
        assert_eq!(app.view, View::Trend);
        handle_key_event(press(KeyCode::Tab), &mut app);
        assert_eq!(app.view, View::Comparison);
    }

    #[test]
    fn reduction_toggle_recomputes_the_trend() {
        let mut app = app();
        let sum_first = app.trend[0].population;

        handle_key_event(press(KeyCode::Char('r')), &mut app);
        assert_eq!(app.reduction, TrendReduction::Mean);
        assert!(app.trend[0].population < sum_first);
    }

    #[test]
    fn year_change_recomputes_derived_tables() {
        let mut app = app();
        let before = app.summary.clone().unwrap();

        handle_key_event(press(KeyCode::Left), &mut app);
        let after = app.summary.clone().unwrap();

        assert_ne!(before.year, after.year);
        assert_eq!(app.aggregates.len(), 5);
    }
}
