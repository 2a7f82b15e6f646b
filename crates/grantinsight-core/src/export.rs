use crate::display::{days_remaining, format_deadline};
use crate::filter::count_statuses;
use crate::models::{Opportunity, Status};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }
}

/// Writes the visible opportunities out as a report
pub struct Exporter;

impl Exporter {
    /// Export to a file, picking the format from its extension
    pub fn export_to_file<P: AsRef<Path>>(
        opportunities: &[&Opportunity],
        path: P,
        today: NaiveDate,
    ) -> Result<ExportFormat> {
        let path = path.as_ref();

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ExportFormat::from_extension)
            .ok_or_else(|| {
                Error::ExportError(
                    "Could not determine export format from extension. Use .json, .csv, or .md"
                        .to_string(),
                )
            })?;

        Self::export_to_file_with_format(opportunities, path, format, today)?;
        Ok(format)
    }

    pub fn export_to_file_with_format<P: AsRef<Path>>(
        opportunities: &[&Opportunity],
        path: P,
        format: ExportFormat,
        today: NaiveDate,
    ) -> Result<()> {
        let path = path.as_ref();
        let content = match format {
            ExportFormat::Json => Self::to_json(opportunities)?,
            ExportFormat::Csv => Self::to_csv(opportunities),
            ExportFormat::Markdown => Self::to_markdown(opportunities, today),
        };

        let mut file = File::create(path)
            .map_err(|e| Error::ExportError(format!("Failed to create {}: {}", path.display(), e)))?;
        file.write_all(content.as_bytes())
            .map_err(|e| Error::ExportError(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::info!(
            "Exported {} opportunities to {} as {}",
            opportunities.len(),
            path.display(),
            format.extension()
        );
        Ok(())
    }

    pub fn to_json(opportunities: &[&Opportunity]) -> Result<String> {
        Ok(serde_json::to_string_pretty(opportunities)?)
    }

    pub fn to_csv(opportunities: &[&Opportunity]) -> String {
        let mut output = String::new();

        output.push_str(
            "ID,Title,Organization,Amount,Deadline,Region,Category,Priority,Status,Tags\n",
        );

        for opp in opportunities {
            output.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{}\n",
                Self::escape_csv(&opp.id),
                Self::escape_csv(&opp.title),
                Self::escape_csv(&opp.organization),
                Self::escape_csv(&opp.amount),
                opp.deadline.format("%Y-%m-%d"),
                Self::escape_csv(&opp.region),
                Self::escape_csv(&opp.category),
                opp.priority.as_str(),
                opp.status.as_str(),
                Self::escape_csv(&opp.tags.join("; ")),
            ));
        }

        output
    }

    pub fn to_markdown(opportunities: &[&Opportunity], today: NaiveDate) -> String {
        let mut output = String::new();

        output.push_str("# Informe de Oportunidades\n\n");
        output.push_str(&format!("Generado: {}\n\n", format_deadline(today)));
        output.push_str(&format!("Total oportunidades: {}\n\n", opportunities.len()));
        output.push_str("---\n\n");

        for opp in opportunities {
            output.push_str(&format!("## {}\n\n", opp.title));
            output.push_str(&format!(
                "**{}** | {} | Prioridad: {}\n\n",
                opp.organization,
                opp.status.label(),
                opp.priority.label()
            ));

            if !opp.description.is_empty() {
                output.push_str(&format!("{}\n\n", opp.description));
            }

            output.push_str("| Campo | Valor |\n");
            output.push_str("|-------|-------|\n");
            output.push_str(&format!("| Monto | {} |\n", opp.amount));
            output.push_str(&format!(
                "| Fecha límite | {} ({} días) |\n",
                format_deadline(opp.deadline),
                days_remaining(opp.deadline, today)
            ));
            output.push_str(&format!("| Región | {} |\n", opp.region));
            output.push_str(&format!("| Categoría | {} |\n", opp.category));

            if !opp.tags.is_empty() {
                let tags: Vec<String> = opp.tags.iter().map(|t| format!("`{}`", t)).collect();
                output.push_str(&format!("\n**Etiquetas:** {}\n", tags.join(", ")));
            }

            output.push_str("\n---\n\n");
        }

        if !opportunities.is_empty() {
            output.push_str("## Resumen por estado\n\n");
            let counts = count_statuses(opportunities.iter().copied());
            for status in Status::ALL {
                output.push_str(&format!(
                    "- {}: {}\n",
                    status.tab_label(),
                    counts.for_status(status)
                ));
            }
        }

        output
    }

    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{FixtureSource, OpportunitySource};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 10).unwrap()
    }

    #[test]
    fn test_export_format_detection() {
        assert_eq!(ExportFormat::from_extension("JSON"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_extension("csv"), Some(ExportFormat::Csv));
        assert_eq!(
            ExportFormat::from_extension("markdown"),
            Some(ExportFormat::Markdown)
        );
        assert_eq!(ExportFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_json_export_uses_wire_values() {
        let records = FixtureSource.fetch().unwrap();
        let refs: Vec<&Opportunity> = records.iter().take(1).collect();
        let json = Exporter::to_json(&refs).unwrap();
        assert!(json.contains("\"status\": \"nueva\""));
        assert!(json.contains("\"deadline\": \"2024-04-15\""));
        assert!(json.contains("\"priority\": \"urgent\""));
    }

    #[test]
    fn test_csv_export() {
        let records = FixtureSource.fetch().unwrap();
        let refs: Vec<&Opportunity> = records.iter().collect();
        let csv = Exporter::to_csv(&refs);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("ID,Title"));
        assert!(lines[2].contains("€100K - €2M"));
        assert!(lines[4].contains("presentada"));
    }

    #[test]
    fn test_markdown_export() {
        let records = FixtureSource.fetch().unwrap();
        let refs: Vec<&Opportunity> = records.iter().collect();
        let md = Exporter::to_markdown(&refs, today());
        assert!(md.contains("# Informe de Oportunidades"));
        assert!(md.contains("Total oportunidades: 4"));
        assert!(md.contains("| Fecha límite | 15/4/2024 (5 días) |"));
        assert!(md.contains("`Colaborativo`"));
        assert!(md.contains("- En Evaluación: 1"));
        assert!(md.contains("**Comisión Europea** | Nueva | Prioridad: Urgente"));
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(Exporter::escape_csv("simple"), "simple");
        assert_eq!(Exporter::escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(Exporter::escape_csv("with\"quote"), "\"with\"\"quote\"");
    }

    #[test]
    fn test_export_to_file_detects_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        let records = FixtureSource.fetch().unwrap();
        let refs: Vec<&Opportunity> = records.iter().collect();

        let format = Exporter::export_to_file(&refs, &path, today()).unwrap();
        assert_eq!(format, ExportFormat::Markdown);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("USAID Innovation Fund"));

        let bad = dir.path().join("report.txt");
        assert!(matches!(
            Exporter::export_to_file(&refs, &bad, today()),
            Err(Error::ExportError(_))
        ));
    }
}
