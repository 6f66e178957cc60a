//! Instance input and solution output.
//!
//! - [`parse_ctt`]: ITC-2007 `.ctt` / `.ectt` instances into a
//!   [`Specification`](crate::models::Specification).
//! - [`render_solution`], [`render_table`]: text dumps of a finished
//!   [`Timetable`](crate::models::Timetable).

mod ctt;
mod render;

pub use ctt::parse_ctt;
pub use render::{render_solution, render_table, SolutionView, TableView};
