use std::fmt::Write;

use crate::pipeline_info::PipelineInfo;

use super::styling::{count, heading, identity, label, notice};
use super::tables::steps_table;

/// Prints the pipeline identity and its steps in collation order to stdout.
pub fn print_summary(info: &PipelineInfo) {
    println!("{}", render_summary(info));
}

fn render_summary(info: &PipelineInfo) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{}", heading("Pipeline"));
    for (field, value) in [
        ("name", format!("{} ({})", info.pipeline_name, info.pipeline_id)),
        ("organization", format!("{} ({})", info.org_name, info.org_id)),
        ("repository", info.repository.clone()),
    ] {
        let _ = writeln!(output, "  {:<13}{}", label(field), identity(value));
    }
    let _ = writeln!(output, "  {:<13}{}\n", label("steps"), count(info.steps.len()));

    if info.steps.is_empty() {
        let _ = writeln!(
            output,
            "{}",
            notice("No named jobs found in the requested window.")
        );
        return output;
    }

    let _ = writeln!(output, "{}", heading("Steps"));
    let _ = writeln!(output, "{}\n", steps_table(&info.steps));
    let _ = writeln!(
        output,
        "{}",
        label("Rerun with --format json to get the step list as PipelineInfo JSON.")
    );

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_info(steps: &[&str]) -> PipelineInfo {
        PipelineInfo {
            pipeline_id: "web-app".to_string(),
            pipeline_name: "Web App".to_string(),
            steps: steps.iter().map(ToString::to_string).collect(),
            repository: "git@github.com:acme/web-app.git".to_string(),
            org_id: "acme".to_string(),
            org_name: "Acme Inc".to_string(),
        }
    }

    #[test]
    fn test_render_summary_without_steps() {
        let output = render_summary(&create_test_info(&[]));

        assert!(output.contains("Web App (web-app)"));
        assert!(output.contains("Acme Inc (acme)"));
        assert!(output.contains("No named jobs found"));
        assert!(!output.contains("Steps\n"));
    }

    #[test]
    fn test_render_summary_lists_steps_in_order() {
        let output = render_summary(&create_test_info(&["build", "deploy", "test"]));

        let build = output.find("build").unwrap();
        let deploy = output.find("deploy").unwrap();
        let test = output.find("test").unwrap();
        assert!(build < deploy && deploy < test, "Steps should keep their order");
    }

    #[test]
    fn test_render_summary_shows_repository_and_count() {
        let output = render_summary(&create_test_info(&["lint"]));

        assert!(output.contains("git@github.com:acme/web-app.git"));
        assert!(output.contains("steps"));
        assert!(output.contains("--format json"));
    }
}
