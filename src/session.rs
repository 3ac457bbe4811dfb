//! One interactive report run, modeled as an explicit state machine.
//!
//! `Start -> ChooseAggregator -> Aggregate -> ChooseRenderer -> Render ->
//! Export -> Done`, with `Invalid` reachable from both choice points. All
//! user interaction goes through [`Console`], so a run can be driven by
//! pre-resolved selections.

use crate::charts::RendererKind;
use crate::dataset::Dataset;
use crate::error::AppError;
use crate::output;
use crate::reports::AggregatorKind;
use crate::types::Summary;
use crate::util::format_int;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    Aggregator,
    Renderer,
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Menu::Aggregator => write!(f, "report"),
            Menu::Renderer => write!(f, "chart"),
        }
    }
}

/// The user-facing side of a run.
pub trait Console {
    /// Present `menu` and return the raw answer.
    fn choose(&mut self, menu: Menu) -> String;
    fn show_summary(&mut self, title: &str, summary: &Summary);
    fn notify(&mut self, message: &str);
}

/// A report picked by the user together with its result.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub kind: AggregatorKind,
    pub summary: Summary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    Start,
    ChooseAggregator,
    Aggregate(AggregatorKind),
    ChooseRenderer(Report),
    Render(Report, RendererKind),
    Export(Report),
    Done,
    Invalid,
}

impl State {
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Done | State::Invalid)
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionOutcome {
    pub completed: bool,
    pub summary: Option<Summary>,
    pub artifact: Option<PathBuf>,
    pub export: Option<PathBuf>,
    pub notices: Vec<AppError>,
}

pub struct Session<'a> {
    dataset: &'a Dataset,
    out_dir: PathBuf,
    outcome: SessionOutcome,
}

impl<'a> Session<'a> {
    pub fn new(dataset: &'a Dataset, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            dataset,
            out_dir: out_dir.into(),
            outcome: SessionOutcome::default(),
        }
    }

    /// Drive the run to a terminal state.
    pub fn run(mut self, console: &mut dyn Console) -> SessionOutcome {
        let mut state = State::Start;
        while !state.is_terminal() {
            state = self.step(state, console);
        }
        self.outcome.completed = state == State::Done;
        self.outcome
    }

    /// Perform the work of `state` and return the next state.
    pub fn step(&mut self, state: State, console: &mut dyn Console) -> State {
        debug!("Session state: {}", state_name(&state));
        match state {
            State::Start => State::ChooseAggregator,
            State::ChooseAggregator => {
                let input = console.choose(Menu::Aggregator);
                match AggregatorKind::from_choice(&input) {
                    Some(kind) => State::Aggregate(kind),
                    None => self.reject(Menu::Aggregator, input, console),
                }
            }
            State::Aggregate(kind) => {
                let aggregation = kind.aggregate(self.dataset);
                if let Some(missing) = aggregation.missing {
                    console.notify(&format!("Notice: {}; continuing with an empty report.", missing));
                    self.outcome.notices.push(missing);
                }
                if aggregation.dropped_rows > 0 {
                    console.notify(&format!(
                        "Note: {} rows skipped due to missing or unparseable '{}'.",
                        format_int(aggregation.dropped_rows as u64),
                        kind.column()
                    ));
                }
                console.show_summary(kind.title(), &aggregation.summary);
                self.outcome.summary = Some(aggregation.summary.clone());
                State::ChooseRenderer(Report {
                    kind,
                    summary: aggregation.summary,
                })
            }
            State::ChooseRenderer(report) => {
                let input = console.choose(Menu::Renderer);
                match RendererKind::from_choice(&input) {
                    Some(renderer) => State::Render(report, renderer),
                    None => self.reject(Menu::Renderer, input, console),
                }
            }
            State::Render(report, renderer) => {
                match renderer.render(&report.summary, report.kind.title(), &self.out_dir) {
                    Ok(path) => {
                        console.notify(&format!("Chart saved to {}", path.display()));
                        self.outcome.artifact = Some(path);
                        State::Export(report)
                    }
                    Err(e @ AppError::EmptySummary(_)) => {
                        console.notify(&format!("Notice: {}; no chart written.", e));
                        self.outcome.notices.push(e);
                        State::Export(report)
                    }
                    Err(e) => self.abort(e, console),
                }
            }
            State::Export(report) => {
                let path = output::export_path(&self.out_dir, report.kind.title());
                match output::export(&report.summary, &path) {
                    Ok(()) => {
                        console.notify(&format!("Summary exported to {}", path.display()));
                        self.outcome.export = Some(path);
                        State::Done
                    }
                    Err(e) => self.abort(e, console),
                }
            }
            State::Done => State::Done,
            State::Invalid => State::Invalid,
        }
    }

    fn reject(&mut self, menu: Menu, input: String, console: &mut dyn Console) -> State {
        console.notify("Invalid choice. Please enter 1, 2 or 3 next time. Exiting.");
        self.outcome.notices.push(AppError::InvalidSelection {
            menu: menu.to_string(),
            input: input.trim().to_string(),
        });
        State::Invalid
    }

    // Write failures end the run without further output.
    fn abort(&mut self, e: AppError, console: &mut dyn Console) -> State {
        warn!("{}", e);
        console.notify(&format!("Error: {}", e));
        self.outcome.notices.push(e);
        State::Done
    }
}

fn state_name(state: &State) -> &'static str {
    match state {
        State::Start => "Start",
        State::ChooseAggregator => "ChooseAggregator",
        State::Aggregate(_) => "Aggregate",
        State::ChooseRenderer(_) => "ChooseRenderer",
        State::Render(..) => "Render",
        State::Export(_) => "Export",
        State::Done => "Done",
        State::Invalid => "Invalid",
    }
}
