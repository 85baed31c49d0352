pub mod formatter;

pub use formatter::{
    format_adjustment, format_deviation, format_filter_summary, format_json, format_price,
    format_result_table, format_tsv, should_use_colors,
};
