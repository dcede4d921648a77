//! Application-level results for the CLI and installer. Library paths use
//! their own `thiserror` enums and only meet this alias at the edges.

pub type Result<T, E = color_eyre::Report> = std::result::Result<T, E>;
