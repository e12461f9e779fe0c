//! Interactive menu.
//!
//! Reads choices and location ids line by line and prints plans as text.
//! Bad input is reported and the menu is shown again; end of input exits.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use ecoroute_lib::{Dataset, Minutes, RouteConstraints, RouteRequest};

use crate::commands::batch::process_batch;
use crate::commands::parse_segment;
use crate::commands::route::{plan_all, route_requests, RouteCommandArgs};
use crate::output::{write_plan_text, PlanView};
use crate::terminal::ColorPalette;

const MENU: &str = "\
==========================
=== Choose an option: ===
==========================
1. Fastest route
2. Independent alternative route
3. Route avoiding locations/segments
4. Eco route (drive, park, walk)
5. Run batch mode
6. Exit
==========================
";

/// Settings for an interactive session.
#[derive(Debug, Clone)]
pub struct MenuConfig {
    pub batch_input: PathBuf,
    pub batch_output: PathBuf,
    pub palette: ColorPalette,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            batch_input: PathBuf::from("input.txt"),
            batch_output: PathBuf::from("output.txt"),
            palette: ColorPalette::detect(),
        }
    }
}

/// Run the menu until the user exits or input ends.
pub fn run_menu<R: BufRead, W: Write>(
    dataset: &Dataset,
    config: &MenuConfig,
    input: R,
    output: W,
) -> Result<()> {
    Menu {
        dataset,
        config,
        input,
        output,
    }
    .run()
}

enum Choice {
    Continue,
    Exit,
}

struct Menu<'a, R, W> {
    dataset: &'a Dataset,
    config: &'a MenuConfig,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<'_, R, W> {
    fn run(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "Loaded {} locations and {} segments.",
            self.dataset.locations.len(),
            self.dataset.edges.len()
        )?;

        loop {
            write!(self.output, "\n{}", MENU)?;
            let Some(line) = self.read_line()? else {
                break;
            };
            let choice = match line.parse::<u8>() {
                Ok(option) => self.handle(option)?,
                Err(_) => {
                    writeln!(self.output, "Invalid input. Please enter a number.")?;
                    Choice::Continue
                }
            };
            if let Choice::Exit = choice {
                break;
            }
        }

        self.output.flush().context("failed to flush menu output")
    }

    fn handle(&mut self, option: u8) -> Result<Choice> {
        let requests = match option {
            1 | 2 => {
                let Some((from, to)) = self.read_endpoints()? else {
                    return Ok(Choice::Exit);
                };
                let all = route_requests(&RouteCommandArgs { from, to });
                if option == 1 {
                    vec![all[0].clone()]
                } else {
                    vec![all[1].clone()]
                }
            }
            3 => match self.read_restricted()? {
                Some(request) => vec![request],
                None => return Ok(Choice::Exit),
            },
            4 => match self.read_eco()? {
                Some(Some(request)) => vec![request],
                Some(None) => return Ok(Choice::Continue),
                None => return Ok(Choice::Exit),
            },
            5 => {
                self.run_batch()?;
                return Ok(Choice::Continue);
            }
            6 => {
                writeln!(self.output, "Goodbye!")?;
                return Ok(Choice::Exit);
            }
            _ => {
                writeln!(self.output, "Invalid option. Try again.")?;
                return Ok(Choice::Continue);
            }
        };

        self.show_plans(&requests)?;
        Ok(Choice::Continue)
    }

    fn show_plans(&mut self, requests: &[RouteRequest]) -> Result<()> {
        match plan_all(self.dataset, requests) {
            Ok(plans) => {
                for plan in &plans {
                    let view = PlanView::from_plan(plan, &self.dataset.locations);
                    write_plan_text(&mut self.output, &view, &self.config.palette)?;
                }
            }
            Err(err) => writeln!(self.output, "Error: {:#}", err)?,
        }
        Ok(())
    }

    fn run_batch(&mut self) -> Result<()> {
        let (input, output) = (&self.config.batch_input, &self.config.batch_output);
        match process_batch(self.dataset, input, output) {
            Ok(_) => writeln!(
                self.output,
                "Batch processed. Results written to {}",
                output.display()
            )?,
            Err(err) => writeln!(self.output, "Error: {:#}", err)?,
        }
        Ok(())
    }

    fn read_endpoints(&mut self) -> Result<Option<(String, String)>> {
        let Some(from) = self.prompt("Source id: ")? else {
            return Ok(None);
        };
        let Some(to) = self.prompt("Destination id: ")? else {
            return Ok(None);
        };
        Ok(Some((from, to)))
    }

    fn read_avoidance(&mut self) -> Result<Option<RouteConstraints>> {
        let Some(nodes) = self.prompt("Locations to avoid (comma separated, blank for none): ")?
        else {
            return Ok(None);
        };
        let Some(segments) =
            self.prompt("Segments to avoid (e.g. 1:2 3:4, blank for none): ")?
        else {
            return Ok(None);
        };

        let mut avoid_segments = Vec::new();
        for token in segments.split_whitespace() {
            match parse_segment(token) {
                Ok(segment) => avoid_segments.push(segment),
                Err(message) => writeln!(self.output, "Ignoring segment: {}", message)?,
            }
        }

        Ok(Some(RouteConstraints {
            avoid_locations: split_list(&nodes),
            avoid_segments,
            ..RouteConstraints::default()
        }))
    }

    fn read_restricted(&mut self) -> Result<Option<RouteRequest>> {
        let Some((from, to)) = self.read_endpoints()? else {
            return Ok(None);
        };
        let Some(constraints) = self.read_avoidance()? else {
            return Ok(None);
        };
        let Some(include) = self.prompt("Location to pass through (blank for none): ")? else {
            return Ok(None);
        };

        let constraints = RouteConstraints {
            include_location: (!include.is_empty()).then_some(include),
            ..constraints
        };
        Ok(Some(RouteRequest::restricted(from, to, constraints)))
    }

    /// `None` on end of input, `Some(None)` when the walking ceiling is invalid.
    fn read_eco(&mut self) -> Result<Option<Option<RouteRequest>>> {
        let Some((from, to)) = self.read_endpoints()? else {
            return Ok(None);
        };
        let Some(max_walk) = self.prompt("Maximum walking time (minutes): ")? else {
            return Ok(None);
        };
        let Ok(max_walk) = max_walk.parse::<Minutes>() else {
            writeln!(self.output, "Invalid walking time '{}'.", max_walk)?;
            return Ok(Some(None));
        };
        let Some(constraints) = self.read_avoidance()? else {
            return Ok(None);
        };
        Ok(Some(Some(RouteRequest::eco(from, to, max_walk, constraints))))
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        self.read_line()
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read menu input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecoroute_lib::{load_edges_from_reader, LocationTable};

    fn dataset() -> Dataset {
        let locations = LocationTable::from_reader(
            "Location,Id,Code,Parking\nAlpha,1,A,0\nBeta,2,B,1\nGamma,3,C,0\n".as_bytes(),
        )
        .unwrap();
        let edges = load_edges_from_reader(
            "Location1,Location2,Driving,Walking\nA,B,5,10\nB,C,5,4\nA,C,20,X\n".as_bytes(),
        )
        .unwrap();
        Dataset::from_parts(locations, edges)
    }

    fn session(input: &str) -> String {
        let config = MenuConfig {
            palette: ColorPalette::plain(),
            ..MenuConfig::default()
        };
        let mut output = Vec::new();
        run_menu(&dataset(), &config, input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn fastest_route_then_exit() {
        let text = session("1\n1\n3\n6\n");
        assert!(text.starts_with("Loaded 3 locations and 3 segments."));
        assert!(
            text.contains("Fastest route from Alpha [1] to Gamma [3]: 10 min"),
            "{text}"
        );
        assert!(text.trim_end().ends_with("Goodbye!"));
    }

    #[test]
    fn alternative_avoids_main_route() {
        let text = session("2\n1\n3\n6\n");
        assert!(
            text.contains("Alternative route from Alpha [1] to Gamma [3]: 20 min"),
            "{text}"
        );
    }

    #[test]
    fn restricted_route_reads_avoidance() {
        let text = session("3\n1\n3\n2\n\n\n6\n");
        assert!(
            text.contains("Restricted route from Alpha [1] to Gamma [3]: 20 min"),
            "{text}"
        );
    }

    #[test]
    fn eco_route_reports_parking() {
        let text = session("4\n1\n3\n5\n\n\n6\n");
        assert!(text.contains("Eco route from Alpha [1] to Gamma [3]: 9 min"), "{text}");
        assert!(text.contains("parking: Beta [2]"), "{text}");
    }

    #[test]
    fn invalid_input_is_tolerated() {
        let text = session("abc\n9\n4\n1\n3\nlots\n6\n");
        assert!(text.contains("Invalid input. Please enter a number."));
        assert!(text.contains("Invalid option. Try again."));
        assert!(text.contains("Invalid walking time 'lots'."));
        assert!(text.contains("Goodbye!"));
    }

    #[test]
    fn unknown_location_is_reported_and_menu_continues() {
        let text = session("1\n1\n99\n6\n");
        assert!(text.contains("Error: failed to plan fastest route"), "{text}");
        assert!(text.contains("unknown location: 99"), "{text}");
        assert!(text.contains("Goodbye!"));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let text = session("1\n1\n");
        assert!(!text.contains("Goodbye!"));
    }
}
