pub mod chart_plotly;
pub mod dashboard;
pub mod history;
pub mod reading_row;
