//! Grouped log output
//!
//! CI hosts render collapsible log groups; under GitHub Actions the
//! `::group::` workflow commands are used, elsewhere a styled header.

use console::style;

fn on_github_actions() -> bool {
    std::env::var("GITHUB_ACTIONS").map(|v| v == "true").unwrap_or(false)
}

/// Open a collapsible log group
pub fn group_start(title: &str) {
    if on_github_actions() {
        println!("::group::{}", title);
    } else {
        println!();
        println!("{}", style(title).cyan().bold());
    }
}

/// Close the current log group
pub fn group_end() {
    if on_github_actions() {
        println!("::endgroup::");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_output_does_not_panic() {
        group_start("Test group");
        group_end();
    }
}
