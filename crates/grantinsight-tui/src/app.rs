// TUI application state
use chrono::NaiveDate;
use grantinsight_core::dashboard::{default_metrics, default_timeline, DashboardModule, MetricCard, TimelineEvent};
use grantinsight_core::display::OpportunityCardView;
use grantinsight_core::{
    Config, ExportFormat, Exporter, FilterEngine, FilterQuery, Opportunity, OpportunitySource, StatusFilter, Theme,
};
use ratatui::widgets::ListState;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Landing,   // Marketing page with the call to action
    Dashboard, // Sidebar + active module
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,    // Navigating modules and cards
    Searching, // Typing in the search box
}

pub struct App {
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub active_module: DashboardModule,
    pub sidebar_collapsed: bool,
    pub search_input: String,
    pub status_filter: StatusFilter,
    pub engine: FilterEngine,
    pub selected_index: usize,
    pub list_state: ListState,
    pub metrics: Vec<MetricCard>,
    pub timeline: Vec<TimelineEvent>,
    pub theme: Theme,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub error_message: Option<String>,
    /// Date every countdown is computed against
    pub today: NaiveDate,
    pub alert_window_days: i64,
    /// Where `e` writes the report; format follows the extension
    pub export_path: PathBuf,
    /// Source `r` reloads from, if the caller handed one over
    source: Option<Box<dyn OpportunitySource>>,
}

impl App {
    pub fn new(engine: FilterEngine, config: &Config, today: NaiveDate) -> grantinsight_core::Result<Self> {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        let mut app = Self {
            should_quit: false,
            screen: if config.ui.start_on_landing {
                Screen::Landing
            } else {
                Screen::Dashboard
            },
            input_mode: InputMode::Normal,
            active_module: config.ui.start_module(),
            sidebar_collapsed: config.ui.sidebar_collapsed,
            search_input: String::new(),
            status_filter: StatusFilter::All,
            engine,
            selected_index: 0,
            list_state,
            metrics: default_metrics(),
            timeline: default_timeline()?,
            theme: config.theme(),
            show_help: false,
            status_message: None,
            error_message: None,
            today,
            alert_window_days: config.display.alert_window_days,
            export_path: PathBuf::from("grantinsight-report.md"),
            source: None,
        };
        app.refilter();
        Ok(app)
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn enter_dashboard(&mut self) {
        self.screen = Screen::Dashboard;
    }

    pub fn back_to_landing(&mut self) {
        self.screen = Screen::Landing;
        self.input_mode = InputMode::Normal;
    }

    /// Switch the main panel. Search and status filter survive the switch.
    pub fn select_module(&mut self, module: DashboardModule) {
        if self.active_module != module {
            tracing::debug!("Switching module {} -> {}", self.active_module.id(), module.id());
            self.active_module = module;
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn next_module(&mut self) {
        self.select_module(self.active_module.next());
    }

    pub fn previous_module(&mut self) {
        self.select_module(self.active_module.previous());
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
    }

    /// Overview and Active show the opportunity list; the rest are placeholders
    pub fn module_has_list(&self) -> bool {
        matches!(
            self.active_module,
            DashboardModule::Overview | DashboardModule::Active
        )
    }

    pub fn enter_search_mode(&mut self) {
        if !self.module_has_list() {
            self.select_module(DashboardModule::Active);
        }
        self.input_mode = InputMode::Searching;
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
        self.refilter();
    }

    pub fn pop_search_char(&mut self) {
        if self.search_input.pop().is_some() {
            self.refilter();
        }
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
        self.refilter();
    }

    pub fn next_status_filter(&mut self) {
        self.set_status_filter(self.status_filter.next());
    }

    pub fn previous_status_filter(&mut self) {
        self.set_status_filter(self.status_filter.previous());
    }

    /// Drop the search term and go back to "Todas"
    pub fn clear_filters(&mut self) {
        self.search_input.clear();
        self.status_filter = StatusFilter::All;
        self.refilter();
    }

    pub fn query(&self) -> FilterQuery {
        FilterQuery::new(self.search_input.clone(), self.status_filter)
    }

    /// Push the current view state through the engine and keep the selection valid
    pub fn refilter(&mut self) {
        let query = self.query();
        self.engine.apply(&query);

        let visible = self.engine.visible_len();
        if visible == 0 {
            self.selected_index = 0;
            self.list_state.select(None);
        } else {
            self.selected_index = self.selected_index.min(visible - 1);
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn next_result(&mut self) {
        let visible = self.engine.visible_len();
        if visible > 0 {
            self.selected_index = (self.selected_index + 1).min(visible - 1);
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn previous_result(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn selected_opportunity(&self) -> Option<&Opportunity> {
        self.engine.visible_at(self.selected_index)
    }

    pub fn visible_cards(&self) -> Vec<OpportunityCardView<'_>> {
        self.engine
            .visible()
            .into_iter()
            .map(|opp| OpportunityCardView::build(opp, self.today, self.alert_window_days))
            .collect()
    }

    pub fn selected_card(&self) -> Option<OpportunityCardView<'_>> {
        self.selected_opportunity()
            .map(|opp| OpportunityCardView::build(opp, self.today, self.alert_window_days))
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn set_export_path<P: AsRef<Path>>(&mut self, path: P) {
        self.export_path = path.as_ref().to_path_buf();
    }

    /// Write the currently visible opportunities to `export_path`
    pub fn export_visible(&mut self) -> Option<ExportFormat> {
        let visible = self.engine.visible();
        match Exporter::export_to_file(&visible, &self.export_path, self.today) {
            Ok(format) => {
                self.status_message = Some(format!(
                    "Reporte exportado: {} ({} oportunidades)",
                    self.export_path.display(),
                    visible.len()
                ));
                self.error_message = None;
                Some(format)
            }
            Err(e) => {
                tracing::warn!("Export failed: {}", e);
                self.error_message = Some(format!("Exportación fallida: {}", e));
                None
            }
        }
    }

    pub fn set_source(&mut self, source: Box<dyn OpportunitySource>) {
        self.source = Some(source);
    }

    /// Re-fetch the data source. On failure the current records stay on screen.
    pub fn reload(&mut self) {
        let Some(source) = self.source.as_deref() else {
            self.error_message = Some("No hay fuente de datos para recargar".to_string());
            return;
        };

        match self.engine.reload(source) {
            Ok(()) => {
                self.status_message = Some(format!(
                    "Datos recargados: {} oportunidades",
                    self.engine.repository().len()
                ));
                self.error_message = None;
                self.refilter();
            }
            Err(e) => {
                tracing::warn!("Reload from {} failed: {}", source.name(), e);
                self.error_message = Some(format!("Recarga fallida: {}", e));
            }
        }
    }

    pub fn clear_messages(&mut self) {
        self.status_message = None;
        self.error_message = None;
    }
}
