pub mod figure;
pub mod svg;
pub mod traces;

pub use figure::{assemble, write_html};
pub use traces::render_traces;
