//! egui rendering of the viewer: top bar, figure list, and the figure grid.

pub mod panels;
pub mod plot;
