//! Route command handlers: fastest, restricted and eco.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;

use ecoroute_lib::{plan_route, Dataset, Minutes, RouteConstraints, RoutePlan, RouteRequest};

use crate::commands::parse_segment;
use crate::output::{OutputFormat, PlanView};
use crate::terminal::ColorPalette;

/// Arguments for the `route` command.
#[derive(Args, Debug, Clone)]
pub struct RouteCommandArgs {
    /// Starting location (id, code or name).
    #[arg(long = "from")]
    pub from: String,
    /// Destination location (id, code or name).
    #[arg(long = "to")]
    pub to: String,
}

/// Locations and segments a route must stay off.
#[derive(Args, Debug, Clone, Default)]
pub struct AvoidArgs {
    /// Location to avoid. Repeat for several.
    #[arg(long = "avoid", value_delimiter = ',')]
    pub avoid: Vec<String>,
    /// Segment to avoid, written A:B. Repeat for several.
    #[arg(long = "avoid-segment", value_parser = parse_segment)]
    pub avoid_segments: Vec<(String, String)>,
}

/// Arguments for the `restricted` command.
#[derive(Args, Debug, Clone)]
pub struct RestrictedCommandArgs {
    #[command(flatten)]
    pub route: RouteCommandArgs,
    #[command(flatten)]
    pub avoid: AvoidArgs,
    /// Location the route must pass through.
    #[arg(long = "include")]
    pub include: Option<String>,
}

/// Arguments for the `eco` command.
#[derive(Args, Debug, Clone)]
pub struct EcoCommandArgs {
    #[command(flatten)]
    pub route: RouteCommandArgs,
    #[command(flatten)]
    pub avoid: AvoidArgs,
    /// Maximum walking time in minutes.
    #[arg(long = "max-walk")]
    pub max_walk: Minutes,
}

impl AvoidArgs {
    fn to_constraints(&self) -> RouteConstraints {
        RouteConstraints {
            avoid_locations: self.avoid.clone(),
            avoid_segments: self.avoid_segments.clone(),
            ..RouteConstraints::default()
        }
    }
}

impl RestrictedCommandArgs {
    pub fn to_request(&self) -> RouteRequest {
        let constraints = RouteConstraints {
            include_location: self.include.clone(),
            ..self.avoid.to_constraints()
        };
        RouteRequest::restricted(&self.route.from, &self.route.to, constraints)
    }
}

impl EcoCommandArgs {
    pub fn to_request(&self) -> RouteRequest {
        RouteRequest::eco(
            &self.route.from,
            &self.route.to,
            self.max_walk,
            self.avoid.to_constraints(),
        )
    }
}

/// Plan every request in order, failing on the first unresolvable one.
pub fn plan_all(dataset: &Dataset, requests: &[RouteRequest]) -> Result<Vec<RoutePlan>> {
    requests
        .iter()
        .map(|request| {
            plan_route(dataset, request).with_context(|| {
                format!(
                    "failed to plan {} route from '{}' to '{}'",
                    request.kind, request.start, request.goal
                )
            })
        })
        .collect()
}

/// Fastest route followed by its independent alternative.
pub fn route_requests(args: &RouteCommandArgs) -> Vec<RouteRequest> {
    vec![
        RouteRequest::fastest(&args.from, &args.to),
        RouteRequest::alternative(&args.from, &args.to),
    ]
}

/// Handle the `route`, `restricted` and `eco` subcommands.
///
/// Impossible routes are printed, not treated as failures; only unknown
/// locations make the command fail.
pub fn handle_route_command(
    dataset: &Dataset,
    format: OutputFormat,
    requests: &[RouteRequest],
) -> Result<()> {
    let plans = plan_all(dataset, requests)?;
    let views: Vec<PlanView> = plans
        .iter()
        .map(|plan| PlanView::from_plan(plan, &dataset.locations))
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    format
        .render_plans(&mut out, &views, &ColorPalette::detect())
        .context("failed to write route output")?;
    out.flush().context("failed to flush output")
}
