//! Output formatting for route plans and batch reports.
//!
//! Plans are converted into [`PlanView`]s, which carry location ids and
//! names next to the codes, before being rendered as text or JSON.

use std::io::{self, Write};
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use ecoroute_lib::{
    BatchReport, LocationId, LocationTable, Minutes, RouteKind, RouteLeg, RoutePlan, TravelMode,
};

use crate::terminal::ColorPalette;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// A location as shown to the user.
///
/// `id` and `name` are missing for codes that only appear in the distances
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationView {
    pub id: Option<LocationId>,
    pub code: String,
    pub name: Option<String>,
}

impl LocationView {
    pub fn from_code(locations: &LocationTable, code: &str) -> Self {
        let location = locations.get_by_code(code);
        Self {
            id: location.map(|l| l.id),
            code: code.to_string(),
            name: location.map(|l| l.name.clone()),
        }
    }

    fn render(&self, palette: &ColorPalette) -> String {
        let name = self.name.as_deref().unwrap_or(&self.code);
        match self.id {
            Some(id) => format!(
                "{}{}{} {}[{}]{}",
                palette.white_bold, name, palette.reset, palette.gray, id, palette.reset
            ),
            None => format!("{}{}{}", palette.white_bold, name, palette.reset),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegView {
    pub mode: TravelMode,
    pub steps: Vec<LocationView>,
    pub time: Option<Minutes>,
}

impl LegView {
    fn from_leg(leg: &RouteLeg, locations: &LocationTable) -> Self {
        Self {
            mode: leg.mode,
            steps: leg
                .steps
                .iter()
                .map(|code| LocationView::from_code(locations, code))
                .collect(),
            time: leg.time,
        }
    }
}

/// A planned route ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanView {
    pub kind: RouteKind,
    pub start: LocationView,
    pub goal: LocationView,
    pub found: bool,
    pub legs: Vec<LegView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking: Option<LocationView>,
    pub total_time: Option<Minutes>,
    pub message: String,
}

impl PlanView {
    pub fn from_plan(plan: &RoutePlan, locations: &LocationTable) -> Self {
        Self {
            kind: plan.kind,
            start: LocationView::from_code(locations, &plan.start),
            goal: LocationView::from_code(locations, &plan.goal),
            found: plan.is_found(),
            legs: plan
                .legs
                .iter()
                .map(|leg| LegView::from_leg(leg, locations))
                .collect(),
            parking: plan
                .parking
                .as_deref()
                .map(|code| LocationView::from_code(locations, code)),
            total_time: plan.total_time(),
            message: plan.message.clone(),
        }
    }
}

fn kind_label(kind: RouteKind) -> &'static str {
    match kind {
        RouteKind::Fastest => "Fastest route",
        RouteKind::Alternative => "Alternative route",
        RouteKind::Restricted => "Restricted route",
        RouteKind::Eco => "Eco route",
    }
}

fn render_time(time: Option<Minutes>, palette: &ColorPalette) -> String {
    match time {
        Some(minutes) => format!("{}{} min{}", palette.cyan, minutes, palette.reset),
        None => format!("{}invalid time{}", palette.red, palette.reset),
    }
}

/// Render one plan as text.
///
/// ```text
/// Eco route from Harbour [1] to Riverside [5]: 13 min
///   drive (7 min): Harbour [1] -> Old Town [2] -> Station [6]
///   walk (6 min): Station [6] -> Riverside [5]
///   parking: Station [6]
/// ```
pub fn write_plan_text<W: Write>(
    out: &mut W,
    plan: &PlanView,
    palette: &ColorPalette,
) -> io::Result<()> {
    let header = format!(
        "{} from {} to {}",
        kind_label(plan.kind),
        plan.start.render(palette),
        plan.goal.render(palette)
    );

    if !plan.found {
        return writeln!(out, "{}: {}{}{}", header, palette.red, plan.message, palette.reset);
    }

    writeln!(out, "{}: {}", header, render_time(plan.total_time, palette))?;
    for leg in &plan.legs {
        let color = match leg.mode {
            TravelMode::Driving => palette.green,
            TravelMode::Walking => palette.orange,
        };
        let steps = leg
            .steps
            .iter()
            .map(|step| step.render(palette))
            .collect::<Vec<_>>()
            .join(&format!(" {}->{} ", palette.gray, palette.reset));
        let verb = match leg.mode {
            TravelMode::Driving => "drive",
            TravelMode::Walking => "walk",
        };
        writeln!(
            out,
            "  {}{}{} ({}): {}",
            color,
            verb,
            palette.reset,
            render_time(leg.time, palette),
            steps
        )?;
    }
    if let Some(parking) = &plan.parking {
        writeln!(out, "  parking: {}", parking.render(palette))?;
    }
    Ok(())
}

impl OutputFormat {
    /// Render plans in order: text blocks separated by blank lines, or a JSON
    /// array.
    pub fn render_plans<W: Write>(
        self,
        out: &mut W,
        plans: &[PlanView],
        palette: &ColorPalette,
    ) -> io::Result<()> {
        match self {
            OutputFormat::Text => {
                for (index, plan) in plans.iter().enumerate() {
                    if index > 0 {
                        writeln!(out)?;
                    }
                    write_plan_text(out, plan, palette)?;
                }
                Ok(())
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, plans).map_err(io::Error::other)?;
                out.write_all(b"\n")
            }
        }
    }

    /// Summarise a processed batch request.
    ///
    /// Text output repeats the written result; JSON emits the report itself.
    pub fn render_batch<W: Write>(
        self,
        out: &mut W,
        report: &BatchReport,
        output_path: &Path,
    ) -> io::Result<()> {
        match self {
            OutputFormat::Text => {
                out.write_all(report.render_text().as_bytes())?;
                writeln!(out, "Batch processed. Results written to {}", output_path.display())
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, report).map_err(io::Error::other)?;
                out.write_all(b"\n")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecoroute_lib::{Graph, Location};

    fn locations() -> LocationTable {
        let location = |id, name: &str, code: &str| Location {
            id,
            name: name.to_string(),
            code: code.to_string(),
            has_parking: false,
        };
        LocationTable::new(vec![
            location(1, "Harbour", "HB"),
            location(2, "Old Town", "OT"),
        ])
        .expect("valid table")
    }

    fn plan(steps: &[&str]) -> RoutePlan {
        let mut graph = Graph::new();
        graph.add_edge("HB", "OT", Some(4), Some(12));
        graph.add_edge("OT", "ZZ", Some(2), None);
        RoutePlan::single(
            RouteKind::Fastest,
            &graph,
            "HB",
            "ZZ",
            steps.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn render(view: &PlanView) -> String {
        let mut out = Vec::new();
        write_plan_text(&mut out, view, &ColorPalette::plain()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_lists_names_ids_and_time() {
        let view = PlanView::from_plan(&plan(&["HB", "OT", "ZZ"]), &locations());
        assert_eq!(
            render(&view),
            "Fastest route from Harbour [1] to ZZ: 6 min\n  drive (6 min): Harbour [1] -> Old Town [2] -> ZZ\n"
        );
    }

    #[test]
    fn text_reports_missing_route() {
        let view = PlanView::from_plan(&plan(&[]), &locations());
        assert!(!view.found);
        assert_eq!(
            render(&view),
            "Fastest route from Harbour [1] to ZZ: No route found.\n"
        );
    }

    #[test]
    fn json_output_is_an_array_of_plans() {
        let view = PlanView::from_plan(&plan(&["HB", "OT"]), &locations());
        let mut out = Vec::new();
        OutputFormat::Json
            .render_plans(&mut out, &[view], &ColorPalette::plain())
            .unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json[0]["kind"], "fastest");
        assert_eq!(json[0]["legs"][0]["steps"][1]["name"], "Old Town");
        assert_eq!(json[0]["total_time"], 4);
        assert!(json[0].get("parking").is_none());
    }

    #[test]
    fn colored_output_wraps_names() {
        let view = PlanView::from_plan(&plan(&["HB", "OT"]), &locations());
        let mut out = Vec::new();
        write_plan_text(&mut out, &view, &ColorPalette::colored()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b[1;97mHarbour\x1b[0m"));
    }
}
