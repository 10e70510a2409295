//! Subcommand implementations

use anyhow::{bail, Context, Result};
use staffopt_core::store::{load_request_or_default, save_request};
use staffopt_core::{
    normalize, HourSlot, NormalizedProblem, Renderer, SolveStatus, Staffer, StaffingError,
    StaffingRequest, StaffingSolution,
};
use staffopt_render::{ExcelRenderer, TextRenderer};
use staffopt_solver::MilpStaffer;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::OutputFormat;

/// Exit status when no assignment satisfies the hard constraints
const EXIT_INFEASIBLE: u8 = 2;

pub struct SolveArgs {
    pub file: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub xlsx: Option<PathBuf>,
    pub time_limit: Option<i64>,
}

/// Starter request: two people, one task, the first four hours.
fn template() -> StaffingRequest {
    let hours: Vec<u8> = HourSlot::all().take(4).map(HourSlot::index).collect();
    let mut request = StaffingRequest::new(["Person 1", "Person 2"], ["Task 1"], hours.clone());
    for hour in hours {
        request = request.with_requirement("Task 1", hour, 1);
    }
    request
}

pub fn init(file: &Path, force: bool) -> Result<ExitCode> {
    if file.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            file.display()
        );
    }

    save_request(file, &template())
        .with_context(|| format!("Failed to write {}", file.display()))?;

    println!("Created: {}", file.display());
    Ok(ExitCode::SUCCESS)
}

fn load(file: &Path) -> Result<StaffingRequest> {
    load_request_or_default(file)
        .with_context(|| format!("Failed to read {}", file.display()))?
        .with_context(|| {
            format!(
                "{} not found (create one with `staffopt init {}`)",
                file.display(),
                file.display()
            )
        })
}

fn hour_range(problem: &NormalizedProblem) -> String {
    match (problem.hours.first(), problem.hours.last()) {
        (Some(first), Some(last)) if first != last => format!("{first}-{last}"),
        (Some(first), _) => first.to_string(),
        _ => String::new(),
    }
}

pub fn check(file: &Path) -> Result<ExitCode> {
    let request = load(file)?;
    let problem = normalize(&request)?;

    println!("People:       {}", problem.person_count());
    println!("Tasks:        {}", problem.task_count());
    println!(
        "Active hours: {} ({})",
        problem.hour_count(),
        hour_range(&problem)
    );
    println!("Time limit:   {}s", problem.time_limit_secs());

    let report = MilpStaffer::new().precheck(&problem);
    if report.is_clear() {
        println!("Coverage pre-check: OK");
        return Ok(ExitCode::SUCCESS);
    }

    println!("Coverage pre-check: {} shortfall(s)", report.shortfalls.len());
    for shortfall in &report.shortfalls {
        println!("  - {shortfall}");
    }
    Ok(ExitCode::from(EXIT_INFEASIBLE))
}

fn render(
    format: OutputFormat,
    problem: &NormalizedProblem,
    solution: &StaffingSolution,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(TextRenderer::new().render(problem, solution)?),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(solution)?;
            json.push('\n');
            Ok(json)
        }
    }
}

pub fn solve(args: &SolveArgs) -> Result<ExitCode> {
    let mut request = load(&args.file)?;
    if let Some(secs) = args.time_limit {
        request.weights.time_limit_secs = secs;
    }
    let problem = normalize(&request)?;

    let staffer = MilpStaffer::new();
    for shortfall in &staffer.precheck(&problem).shortfalls {
        warn!(%shortfall, "coverage shortfall");
    }

    info!(file = %args.file.display(), "solving");
    let solution = match staffer.solve(&problem) {
        Ok(solution) => solution,
        Err(StaffingError::Solver(message)) => {
            error!(%message, "solver failed");
            StaffingSolution::without_schedule(SolveStatus::Error)
        }
        Err(e) => return Err(e.into()),
    };

    let rendered = render(args.format, &problem, &solution)?;
    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "solution written");
        }
        None => print!("{rendered}"),
    }

    if let Some(path) = &args.xlsx {
        if solution.has_schedule() {
            let bytes = ExcelRenderer::new().render(&problem, &solution)?;
            fs::write(path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "staffing plan exported");
        } else {
            warn!(status = %solution.status, "no schedule to export");
        }
    }

    Ok(match solution.status {
        SolveStatus::Optimal | SolveStatus::FeasibleTimeout => ExitCode::SUCCESS,
        SolveStatus::Infeasible => ExitCode::from(EXIT_INFEASIBLE),
        SolveStatus::Error => ExitCode::FAILURE,
    })
}
