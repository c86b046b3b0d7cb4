mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::PhaseProgress;
pub use summary::print_summary;

/// Writes the one-line tool header to stderr so JSON on stdout stays clean.
pub fn print_banner() {
    eprintln!("{}", banner_line());
    eprintln!();
}

fn banner_line() -> String {
    format!(
        "{} {} {}",
        styling::title("buildlens"),
        styling::label(concat!("v", env!("CARGO_PKG_VERSION"))),
        styling::label("· step inventory for Buildkite pipelines")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_names_tool_and_version() {
        let line = console::strip_ansi_codes(&banner_line()).to_string();
        assert!(line.starts_with("buildlens v"));
        assert!(line.contains(env!("CARGO_PKG_VERSION")));
        assert!(line.contains("Buildkite"));
    }
}
