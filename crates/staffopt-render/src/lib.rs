//! # staffopt-render
//!
//! Rendering backends for staffopt solutions.
//!
//! This crate provides:
//! - Plain-text staffing tables for the terminal
//! - Excel staffing plans with per-task colors
//! - Custom renderer trait (re-exported from `staffopt-core`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use staffopt_core::Renderer;
//! use staffopt_render::{ExcelRenderer, TextRenderer};
//!
//! let text = TextRenderer::new().render(&problem, &solution)?;
//! println!("{text}");
//!
//! let xlsx_bytes = ExcelRenderer::new().render(&problem, &solution)?;
//! std::fs::write("staffing.xlsx", xlsx_bytes)?;
//! ```

pub mod excel;

pub use excel::ExcelRenderer;
pub use staffopt_core::Renderer;

use staffopt_core::{NormalizedProblem, RenderError, StaffingSolution};
use std::fmt::Write;

/// Plain-text renderer
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Cell text for an idle hour
    pub idle_marker: String,
    /// Cell text for an hour the person is unavailable
    pub unavailable_marker: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            idle_marker: "-".into(),
            unavailable_marker: "x".into(),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn idle_marker(mut self, marker: impl Into<String>) -> Self {
        self.idle_marker = marker.into();
        self
    }

    pub fn unavailable_marker(mut self, marker: impl Into<String>) -> Self {
        self.unavailable_marker = marker.into();
        self
    }

    /// One row of cells per person, in input order
    fn table(&self, problem: &NormalizedProblem, solution: &StaffingSolution) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(problem.person_count() + 1);

        let mut header = vec!["Person".to_string()];
        header.extend(problem.hours.iter().map(|h| h.label()));
        header.push("Total".into());
        rows.push(header);

        for (p, person) in problem.people.iter().enumerate() {
            let mut row = vec![person.clone()];
            for (h, &hour) in problem.hours.iter().enumerate() {
                let cell = match solution.task_at(person, hour) {
                    Some(task) => task.to_string(),
                    None if !problem.is_available(p, h) => self.unavailable_marker.clone(),
                    None => self.idle_marker.clone(),
                };
                row.push(cell);
            }
            row.push(solution.workload_of(person).unwrap_or(0).to_string());
            rows.push(row);
        }
        rows
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(
        &self,
        problem: &NormalizedProblem,
        solution: &StaffingSolution,
    ) -> Result<String, RenderError> {
        let mut out = String::new();
        // writing to a String cannot fail
        let _ = writeln!(out, "Status: {}", solution.status);
        if !solution.has_schedule() {
            return Ok(out);
        }

        if let Some(objective) = solution.objective_value {
            let _ = writeln!(out, "Objective: {objective:.3}");
        }
        let _ = writeln!(
            out,
            "Load: max {}, min {}, spread {}",
            solution.max_load, solution.min_load, solution.load_spread
        );
        out.push('\n');

        let rows = self.table(problem, solution);
        let columns = rows.first().map_or(0, Vec::len);
        let widths: Vec<usize> = (0..columns)
            .map(|c| rows.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
            .collect();

        for row in &rows {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ");
            out.push_str(line.trim_end());
            out.push('\n');
        }

        Ok(out)
    }
}
