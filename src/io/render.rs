//! Plain-text renderers for finished timetables.

use std::fmt;

use crate::models::Timetable;

/// One `course room day period` line per meeting, the format read by
/// the ITC-2007 validator.
#[derive(Debug, Clone, Copy)]
pub struct SolutionView<'a>(pub &'a Timetable);

impl fmt::Display for SolutionView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spec = self.0.spec();
        for c in 0..spec.courses().len() {
            for m in self.0.meetings_by_course(c) {
                writeln!(
                    f,
                    "{} {} {} {}",
                    spec.course(c).id,
                    spec.room(m.room).id,
                    m.day,
                    m.period
                )?;
            }
        }
        Ok(())
    }
}

/// One grid per curriculum: periods down, days across, each cell
/// `course/room/teacher`.
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a>(pub &'a Timetable);

impl fmt::Display for TableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tt = self.0;
        let spec = tt.spec();
        let (days, periods) = (spec.days(), spec.periods_per_day());

        for (q, curriculum) in spec.curricula().iter().enumerate() {
            let mut cells = vec![vec!["-".to_string(); days]; periods];
            for m in tt.meetings_of_curriculum(q) {
                let course = spec.course(m.course);
                cells[m.period][m.day] = format!("{}/{}/{}", course.id, spec.room(m.room).id, course.teacher);
            }

            let width = cells
                .iter()
                .flatten()
                .map(String::len)
                .chain((0..days).map(|d| format!("Day {d}").len()))
                .max()
                .unwrap_or(1);

            writeln!(f, "{}", curriculum.id)?;
            write!(f, "{:<4}", "")?;
            for d in 0..days {
                write!(f, " | {:<width$}", format!("Day {d}"))?;
            }
            writeln!(f)?;
            for (p, row) in cells.iter().enumerate() {
                write!(f, "{:<4}", format!("P{p}"))?;
                for cell in row {
                    write!(f, " | {cell:<width$}")?;
                }
                writeln!(f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Renders the validator line format.
pub fn render_solution(timetable: &Timetable) -> String {
    SolutionView(timetable).to_string()
}

/// Renders the per-curriculum grids.
pub fn render_table(timetable: &Timetable) -> String {
    TableView(timetable).to_string()
}
