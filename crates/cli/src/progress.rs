use indicatif::{ProgressBar, ProgressStyle};

/// Environment variables set by common CI providers.
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "BUILDKITE",
    "JENKINS_URL",
];

fn is_ci() -> bool {
    CI_VARS.iter().any(|var| std::env::var_os(var).is_some())
}

/// Create a spinner on stderr with a message.
///
/// The spinner is hidden when `visible` is false or in CI environments.
pub fn spinner(message: &str, visible: bool) -> ProgressBar {
    if !visible || is_ci() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ci_hides_spinner() {
        let saved = std::env::var_os("BUILDKITE");
        std::env::set_var("BUILDKITE", "true");

        assert!(is_ci());
        assert!(spinner("Linting...", true).is_hidden());

        match saved {
            Some(value) => std::env::set_var("BUILDKITE", value),
            None => std::env::remove_var("BUILDKITE"),
        }
    }

    #[test]
    fn test_invisible_spinner_is_hidden() {
        let pb = spinner("Linting...", false);
        assert!(pb.is_hidden());
        pb.finish_and_clear();
    }
}
