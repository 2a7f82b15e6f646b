use crate::display::format_timeline_date;
use crate::theme::Tone;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Views reachable from the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DashboardModule {
    #[default]
    Overview,
    Radar,
    Active,
    Winners,
    Organizations,
}

impl DashboardModule {
    /// Sidebar order
    pub const ALL: [DashboardModule; 5] = [
        DashboardModule::Overview,
        DashboardModule::Radar,
        DashboardModule::Active,
        DashboardModule::Winners,
        DashboardModule::Organizations,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            DashboardModule::Overview => "overview",
            DashboardModule::Radar => "radar",
            DashboardModule::Active => "active",
            DashboardModule::Winners => "winners",
            DashboardModule::Organizations => "organizations",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DashboardModule::Overview => "Vista General",
            DashboardModule::Radar => "Radar Futuras",
            DashboardModule::Active => "Activas",
            DashboardModule::Winners => "Ganadores",
            DashboardModule::Organizations => "Organizaciones",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DashboardModule::Overview => "Dashboard principal",
            DashboardModule::Radar => "Oportunidades previstas",
            DashboardModule::Active => "Convocatorias abiertas",
            DashboardModule::Winners => "Análisis competitivo",
            DashboardModule::Organizations => "Perfiles financiadores",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            DashboardModule::Overview => "▤",
            DashboardModule::Radar => "◎",
            DashboardModule::Active => "▦",
            DashboardModule::Winners => "↗",
            DashboardModule::Organizations => "⚇",
        }
    }

    /// Unknown ids land on the overview
    pub fn from_id(id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|module| module.id() == id)
            .unwrap_or_default()
    }

    pub fn position(&self) -> usize {
        match self {
            DashboardModule::Overview => 0,
            DashboardModule::Radar => 1,
            DashboardModule::Active => 2,
            DashboardModule::Winners => 3,
            DashboardModule::Organizations => 4,
        }
    }

    pub fn from_position(position: usize) -> Option<Self> {
        Self::ALL.get(position).copied()
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Panel copy for the modules that are not built out yet
    pub fn placeholder(&self) -> Option<PlaceholderPanel> {
        match self {
            DashboardModule::Overview | DashboardModule::Active => None,
            DashboardModule::Radar => Some(PlaceholderPanel {
                heading: "Radar de Oportunidades Futuras",
                badge: "Próximos 6 meses",
                title: "Análisis Predictivo en Desarrollo",
                message: "Funcionalidad de predicción de convocatorias basada en IA próximamente disponible.",
            }),
            DashboardModule::Winners => Some(PlaceholderPanel {
                heading: "Base de Datos de Ganadores",
                badge: "Análisis Competitivo",
                title: "Análisis de Ganadores",
                message: "Módulo de inteligencia competitiva y análisis de proyectos financiados.",
            }),
            DashboardModule::Organizations => Some(PlaceholderPanel {
                heading: "Perfil de Organizaciones",
                badge: "Inteligencia de Entidades",
                title: "Perfiles de Financiadores",
                message: "Información detallada sobre organizaciones financiadoras y sus patrones.",
            }),
        }
    }
}

impl FromStr for DashboardModule {
    type Err = Error;

    /// Strict parse, for config values and CLI flags
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|module| module.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::ConfigError(format!("Unknown dashboard module: {}", s)))
    }
}

/// Static copy for a module that only shows a "coming soon" panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderPanel {
    pub heading: &'static str,
    pub badge: &'static str,
    pub title: &'static str,
    pub message: &'static str,
}

/// Sidebar tool shortcuts. Shown but inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarTool {
    Search,
    Alerts,
    Reports,
    Settings,
}

impl SidebarTool {
    pub const ALL: [SidebarTool; 4] = [
        SidebarTool::Search,
        SidebarTool::Alerts,
        SidebarTool::Reports,
        SidebarTool::Settings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SidebarTool::Search => "Búsqueda",
            SidebarTool::Alerts => "Alertas",
            SidebarTool::Reports => "Reportes",
            SidebarTool::Settings => "Configuración",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SidebarTool::Search => "⌕",
            SidebarTool::Alerts => "♪",
            SidebarTool::Reports => "≡",
            SidebarTool::Settings => "⚙",
        }
    }
}

/// Direction arrow next to a metric's change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    pub fn tone(&self) -> Tone {
        match self {
            Trend::Up => Tone::Secondary,
            Trend::Down => Tone::Danger,
            Trend::Neutral => Tone::Muted,
        }
    }

    /// Neutral trends show no arrow at all
    pub fn arrow(&self) -> Option<&'static str> {
        match self {
            Trend::Up => Some("▲"),
            Trend::Down => Some("▼"),
            Trend::Neutral => None,
        }
    }
}

/// What a metric card measures, drives its icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    ActiveOpportunities,
    AvailableFunding,
    UpcomingDeadlines,
    NewOrganizations,
}

impl MetricKind {
    pub fn icon(&self) -> &'static str {
        match self {
            MetricKind::ActiveOpportunities => "◎",
            MetricKind::AvailableFunding => "$",
            MetricKind::UpcomingDeadlines => "▦",
            MetricKind::NewOrganizations => "⚇",
        }
    }
}

/// Headline value of a metric: a count or preformatted text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Text(String),
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCard {
    pub title: String,
    pub value: MetricValue,
    /// Percentage change
    pub change: i32,
    pub change_label: String,
    pub trend: Trend,
    pub kind: MetricKind,
}

impl MetricCard {
    /// `+12%`, `-5%`, `0%`
    pub fn formatted_change(&self) -> String {
        if self.change > 0 {
            format!("+{}%", self.change)
        } else {
            format!("{}%", self.change)
        }
    }
}

/// The four cards on the overview
pub fn default_metrics() -> Vec<MetricCard> {
    vec![
        MetricCard {
            title: "Oportunidades Activas".to_string(),
            value: MetricValue::Count(127),
            change: 12,
            change_label: "vs mes anterior".to_string(),
            trend: Trend::Up,
            kind: MetricKind::ActiveOpportunities,
        },
        MetricCard {
            title: "Monto Total Disponible".to_string(),
            value: MetricValue::Text("€24.8M".to_string()),
            change: 8,
            change_label: "vs mes anterior".to_string(),
            trend: Trend::Up,
            kind: MetricKind::AvailableFunding,
        },
        MetricCard {
            title: "Próximos Cierres".to_string(),
            value: MetricValue::Count(23),
            change: -5,
            change_label: "esta semana".to_string(),
            trend: Trend::Neutral,
            kind: MetricKind::UpcomingDeadlines,
        },
        MetricCard {
            title: "Nuevas Organizaciones".to_string(),
            value: MetricValue::Count(14),
            change: 18,
            change_label: "este mes".to_string(),
            trend: Trend::Up,
            kind: MetricKind::NewOrganizations,
        },
    ]
}

/// Kind of milestone on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Opening,
    Deadline,
    Result,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Opening => "Apertura",
            EventKind::Deadline => "Cierre",
            EventKind::Result => "Resultados",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            EventKind::Opening => Tone::Secondary,
            EventKind::Deadline => Tone::Warning,
            EventKind::Result => Tone::Primary,
        }
    }
}

/// How sure we are the event will happen as announced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    #[serde(rename = "alta")]
    High,
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "baja")]
    Low,
}

impl Confidence {
    pub fn label(&self) -> &'static str {
        match self {
            Confidence::High => "alta",
            Confidence::Medium => "media",
            Confidence::Low => "baja",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Confidence::High => Tone::Secondary,
            Confidence::Medium => Tone::Warning,
            Confidence::Low => Tone::Muted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub title: String,
    pub organization: String,
    pub date: NaiveDate,
    pub kind: EventKind,
    pub amount: String,
    pub region: String,
    pub confidence: Confidence,
}

impl TimelineEvent {
    pub fn date_label(&self) -> String {
        format_timeline_date(self.date)
    }
}

const TIMELINE_JSON: &str = r#"[
  {"id":"1","title":"Horizonte Europa - Cluster Digital","organization":"Comisión Europea","date":"2024-03-15","kind":"opening","amount":"€150M","region":"UE","confidence":"alta"},
  {"id":"2","title":"Innovation Fund - Clean Tech","organization":"EIT Climate-KIC","date":"2024-03-20","kind":"deadline","amount":"€50M","region":"Europa","confidence":"alta"},
  {"id":"3","title":"Global Innovation Challenge","organization":"USAID","date":"2024-04-01","kind":"opening","amount":"$75M","region":"Global","confidence":"media"},
  {"id":"4","title":"Results: Green Transition Fund","organization":"BEI","date":"2024-04-10","kind":"result","amount":"€200M","region":"UE","confidence":"alta"}
]"#;

/// Upcoming milestones shown beside the opportunity list, in date order
pub fn default_timeline() -> Result<Vec<TimelineEvent>> {
    Ok(serde_json::from_str(TIMELINE_JSON)?)
}

/// Inert shortcuts in the overview's side column
pub const QUICK_ACTIONS: [&str; 4] = [
    "Nueva Búsqueda IA",
    "Analizar Competidores",
    "Programar Alertas",
    "Generar Insights",
];

/// One feature tile on the landing screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingFeature {
    pub title: &'static str,
    pub description: &'static str,
    pub highlight: &'static str,
}

/// Copy for the landing screen shown before the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingContent {
    pub product: &'static str,
    pub badge: &'static str,
    pub headline: &'static str,
    pub tagline: &'static str,
    pub features_heading: &'static str,
    pub features: [LandingFeature; 4],
    pub call_to_action: &'static str,
}

pub const LANDING: LandingContent = LandingContent {
    product: "GrantInsight",
    badge: "Inteligencia Artificial para Financiación",
    headline: "Dashboard de Oportunidades de Financiación",
    tagline: "Centraliza y analiza oportunidades de financiación con inteligencia artificial. \
              Desde predicción de convocatorias hasta análisis competitivo de ganadores.",
    features_heading: "Cuatro Módulos Integrados",
    features: [
        LandingFeature {
            title: "Radar de Oportunidades",
            description: "Predicción inteligente de convocatorias futuras basada en análisis histórico y IA.",
            highlight: "Próximos 6 meses",
        },
        LandingFeature {
            title: "Convocatorias Activas",
            description: "Gestión en tiempo real de oportunidades abiertas con alertas automatizadas.",
            highlight: "127 activas",
        },
        LandingFeature {
            title: "Análisis de Ganadores",
            description: "Inteligencia competitiva basada en proyectos financiados anteriormente.",
            highlight: "5000+ proyectos",
        },
        LandingFeature {
            title: "Perfiles de Financiadores",
            description: "Base de datos completa con patrones de financiación y ciclos predictivos.",
            highlight: "200+ organizaciones",
        },
    ],
    call_to_action: "Acceder al Dashboard",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_from_id_falls_back_to_overview() {
        assert_eq!(DashboardModule::from_id("radar"), DashboardModule::Radar);
        assert_eq!(
            DashboardModule::from_id("organizations"),
            DashboardModule::Organizations
        );
        assert_eq!(DashboardModule::from_id("settings"), DashboardModule::Overview);
        assert_eq!(DashboardModule::from_id(""), DashboardModule::Overview);
    }

    #[test]
    fn test_module_strict_parse() {
        assert_eq!(
            "Active".parse::<DashboardModule>().unwrap(),
            DashboardModule::Active
        );
        assert!("alerts".parse::<DashboardModule>().is_err());
    }

    #[test]
    fn test_module_cycling() {
        assert_eq!(DashboardModule::Overview.next(), DashboardModule::Radar);
        assert_eq!(
            DashboardModule::Organizations.next(),
            DashboardModule::Overview
        );
        assert_eq!(
            DashboardModule::Overview.previous(),
            DashboardModule::Organizations
        );
        for module in DashboardModule::ALL {
            assert_eq!(DashboardModule::from_position(module.position()), Some(module));
        }
    }

    #[test]
    fn test_only_unbuilt_modules_have_placeholders() {
        assert!(DashboardModule::Overview.placeholder().is_none());
        assert!(DashboardModule::Active.placeholder().is_none());
        assert_eq!(
            DashboardModule::Winners.placeholder().unwrap().title,
            "Análisis de Ganadores"
        );
    }

    #[test]
    fn test_metric_change_formatting() {
        let metrics = default_metrics();
        assert_eq!(metrics.len(), 4);
        assert_eq!(metrics[0].formatted_change(), "+12%");
        assert_eq!(metrics[2].formatted_change(), "-5%");
        assert_eq!(metrics[1].value.to_string(), "€24.8M");
        assert_eq!(metrics[3].value.to_string(), "14");
        assert_eq!(metrics[2].trend.arrow(), None);
    }

    #[test]
    fn test_timeline_fixture() {
        let events = default_timeline().unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[1].kind, EventKind::Deadline);
        assert_eq!(events[2].confidence, Confidence::Medium);
        assert_eq!(events[0].date_label(), "15 mar 2024");
        assert!(events.windows(2).all(|w| w[0].date <= w[1].date));
    }
}
