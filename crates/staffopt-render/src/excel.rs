//! Excel staffing plan
//!
//! Writes a single worksheet with one row per person and one column per
//! active hour:
//!
//! | Person | 16h  | 17h   | 18h  | Total |
//! |--------|------|-------|------|-------|
//! | Ana    | Desk | Desk  |      | 2     |
//! | Ben    |      | Phone | Desk | 2     |
//!
//! Assigned cells are filled with a color per task. Hours a person is
//! unavailable are shaded light red.

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use staffopt_core::{NormalizedProblem, RenderError, Renderer, StaffingSolution};

/// Material 200-tone fills, assigned to tasks in order and reused cyclically
pub const TASK_PALETTE: [u32; 12] = [
    0x90CAF9, // blue
    0xEF9A9A, // red
    0xA5D6A7, // green
    0xFFE082, // amber
    0xCE93D8, // purple
    0x80DEEA, // cyan
    0xFFCC80, // orange
    0xF48FB1, // pink
    0x80CBC4, // teal
    0x9FA8DA, // indigo
    0xE6EE9C, // lime
    0xBCAAA4, // brown
];

const HEADER_FILL: u32 = 0x4F81BD;
const UNAVAILABLE_FILL: u32 = 0xFFCDD2;

/// Excel staffing plan renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Worksheet name
    pub sheet_name: String,
    /// Task fill colors as 0xRRGGBB
    pub palette: Vec<u32>,
    /// Shade hours the person is unavailable
    pub mark_unavailable: bool,
    /// Keep the header row and name column visible while scrolling
    pub freeze_panes: bool,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            sheet_name: "Staffing Plan".into(),
            palette: TASK_PALETTE.to_vec(),
            mark_unavailable: true,
            freeze_panes: true,
        }
    }
}

/// Reusable cell formats
struct ExcelFormats {
    header: Format,
    person: Format,
    empty: Format,
    unavailable: Format,
    total: Format,
    tasks: Vec<Format>,
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set worksheet name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Replace the task color palette
    pub fn palette(mut self, colors: impl IntoIterator<Item = u32>) -> Self {
        self.palette = colors.into_iter().collect();
        self
    }

    /// Leave unavailable hours unshaded
    pub fn no_unavailable_fill(mut self) -> Self {
        self.mark_unavailable = false;
        self
    }

    pub fn no_freeze_panes(mut self) -> Self {
        self.freeze_panes = false;
        self
    }

    /// Fill color for the task at position `task` in input order
    pub fn task_color(&self, task: usize) -> Option<u32> {
        if self.palette.is_empty() {
            None
        } else {
            Some(self.palette[task % self.palette.len()])
        }
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(
        &self,
        problem: &NormalizedProblem,
        solution: &StaffingSolution,
    ) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let formats = self.create_formats(problem.task_count());

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&self.sheet_name)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        self.write_header(sheet, problem, &formats)?;
        for (p, person) in problem.people.iter().enumerate() {
            self.write_person_row(sheet, problem, solution, p, person, &formats)?;
        }

        sheet.set_column_width(0, 18).ok();
        for h in 0..problem.hour_count() {
            sheet.set_column_width(h as u16 + 1, 9).ok();
        }
        sheet.set_column_width(problem.hour_count() as u16 + 1, 8).ok();

        if self.freeze_panes {
            sheet
                .set_freeze_panes(1, 1)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;

        Ok(buffer)
    }

    fn create_formats(&self, task_count: usize) -> ExcelFormats {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(HEADER_FILL)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let person = Format::new().set_bold().set_border(FormatBorder::Thin);

        let empty = Format::new()
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        let unavailable = Format::new()
            .set_align(FormatAlign::Center)
            .set_background_color(UNAVAILABLE_FILL)
            .set_border(FormatBorder::Thin);

        let total = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_num_format("0")
            .set_border(FormatBorder::Thin);

        let tasks = (0..task_count)
            .map(|t| {
                let format = Format::new()
                    .set_align(FormatAlign::Center)
                    .set_border(FormatBorder::Thin);
                match self.task_color(t) {
                    Some(color) => format.set_background_color(color),
                    None => format,
                }
            })
            .collect();

        ExcelFormats {
            header,
            person,
            empty,
            unavailable,
            total,
            tasks,
        }
    }

    fn write_header(
        &self,
        sheet: &mut Worksheet,
        problem: &NormalizedProblem,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        sheet
            .write_string_with_format(0, 0, "Person", &formats.header)
            .map_err(|e| RenderError::Format(e.to_string()))?;
        for (h, hour) in problem.hours.iter().enumerate() {
            sheet
                .write_string_with_format(0, h as u16 + 1, hour.label(), &formats.header)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }
        sheet
            .write_string_with_format(0, problem.hour_count() as u16 + 1, "Total", &formats.header)
            .map_err(|e| RenderError::Format(e.to_string()))?;
        Ok(())
    }

    fn write_person_row(
        &self,
        sheet: &mut Worksheet,
        problem: &NormalizedProblem,
        solution: &StaffingSolution,
        p: usize,
        person: &str,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let row = p as u32 + 1;
        sheet
            .write_string_with_format(row, 0, person, &formats.person)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        for (h, &hour) in problem.hours.iter().enumerate() {
            let col = h as u16 + 1;
            let written = match solution.task_at(person, hour) {
                Some(task) => {
                    let format = problem
                        .task_index(task)
                        .and_then(|t| formats.tasks.get(t))
                        .unwrap_or(&formats.empty);
                    sheet.write_string_with_format(row, col, task, format)
                }
                None if self.mark_unavailable && !problem.is_available(p, h) => {
                    sheet.write_blank(row, col, &formats.unavailable)
                }
                None => sheet.write_blank(row, col, &formats.empty),
            };
            written.map_err(|e| RenderError::Format(e.to_string()))?;
        }

        let total = solution.workload_of(person).unwrap_or(0);
        sheet
            .write_number_with_format(
                row,
                problem.hour_count() as u16 + 1,
                total as f64,
                &formats.total,
            )
            .map_err(|e| RenderError::Format(e.to_string()))?;
        Ok(())
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(
        &self,
        problem: &NormalizedProblem,
        solution: &StaffingSolution,
    ) -> Result<Vec<u8>, RenderError> {
        if !solution.has_schedule() {
            return Err(RenderError::InvalidData(format!(
                "No schedule to export (status {})",
                solution.status
            )));
        }
        self.render_to_bytes(problem, solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffopt_core::{normalize, SolveStatus, StaffingRequest};
    use std::collections::BTreeMap;

    fn create_test_problem() -> NormalizedProblem {
        let request = StaffingRequest::new(["Ana", "Ben"], ["Desk", "Phone"], [0, 1, 2])
            .with_availability("Ben", 0, false)
            .with_requirement("Desk", 0, 1)
            .with_requirement("Phone", 1, 1);
        normalize(&request).unwrap()
    }

    fn create_test_solution() -> StaffingSolution {
        let mut assignment = BTreeMap::new();
        assignment.insert(
            "Ana".to_string(),
            BTreeMap::from([(0, Some("Desk".to_string())), (1, None), (2, None)]),
        );
        assignment.insert(
            "Ben".to_string(),
            BTreeMap::from([(0, None), (1, Some("Phone".to_string())), (2, None)]),
        );
        StaffingSolution {
            status: SolveStatus::Optimal,
            objective_value: Some(0.0),
            assignment,
            workload: BTreeMap::from([("Ana".to_string(), 1), ("Ben".to_string(), 1)]),
            load_spread: 0,
            max_load: 1,
            min_load: 1,
        }
    }

    #[test]
    fn excel_renderer_creation() {
        let renderer = ExcelRenderer::new();
        assert_eq!(renderer.sheet_name, "Staffing Plan");
        assert_eq!(renderer.palette.len(), 12);
        assert!(renderer.mark_unavailable);
    }

    #[test]
    fn excel_renderer_builder() {
        let renderer = ExcelRenderer::new()
            .sheet_name("Night")
            .palette([0x112233])
            .no_unavailable_fill()
            .no_freeze_panes();
        assert_eq!(renderer.sheet_name, "Night");
        assert_eq!(renderer.palette, vec![0x112233]);
        assert!(!renderer.mark_unavailable);
        assert!(!renderer.freeze_panes);
    }

    #[test]
    fn palette_cycles_after_twelve_tasks() {
        let renderer = ExcelRenderer::new();
        assert_eq!(renderer.task_color(0), Some(0x90CAF9));
        assert_eq!(renderer.task_color(12), Some(0x90CAF9));
        assert_eq!(renderer.task_color(13), Some(0xEF9A9A));
        assert_eq!(ExcelRenderer::new().palette([]).task_color(3), None);
    }

    #[test]
    fn excel_render_produces_xlsx() {
        let bytes = ExcelRenderer::new()
            .render(&create_test_problem(), &create_test_solution())
            .unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn excel_render_without_palette_still_works() {
        let bytes = ExcelRenderer::new()
            .palette([])
            .no_unavailable_fill()
            .render(&create_test_problem(), &create_test_solution())
            .unwrap();
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn excel_render_rejects_infeasible() {
        let solution = StaffingSolution::without_schedule(SolveStatus::Infeasible);
        let result = ExcelRenderer::new().render(&create_test_problem(), &solution);
        assert!(matches!(result, Err(RenderError::InvalidData(_))));
    }

    #[test]
    fn excel_render_rejects_bad_sheet_name() {
        // worksheet names may not contain brackets
        let result = ExcelRenderer::new()
            .sheet_name("[plan]")
            .render(&create_test_problem(), &create_test_solution());
        assert!(matches!(result, Err(RenderError::Format(_))));
    }
}
