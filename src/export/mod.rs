mod csv_export;
mod proposal;

pub(crate) use csv_export::export_quotes;
pub(crate) use proposal::{render_proposal, write_proposal};
