//! View binding: HTML page layout and Chart.js figure construction.

pub mod panels;
pub mod plot;
