pub mod builder;
pub mod layout;
pub mod palette;

pub use builder::build_graph;
pub use layout::spring_layout;
