mod formatter;

pub use formatter::{
    arrow, format_burndown, format_dimension_table, format_history_line, format_overall,
    should_use_colors,
};
