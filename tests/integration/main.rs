//! Integration tests for gradle-step

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    struct Job {
        workspace: TempDir,
        state_dir: TempDir,
        cache_dir: TempDir,
        gradle_home: TempDir,
    }

    impl Job {
        fn new() -> Self {
            Self {
                workspace: TempDir::new().unwrap(),
                state_dir: TempDir::new().unwrap(),
                cache_dir: TempDir::new().unwrap(),
                gradle_home: TempDir::new().unwrap(),
            }
        }

        fn cmd(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("gradle-step");
            cmd.env("GRADLE_STEP_STATE_DIR", self.state_dir.path())
                .env("GRADLE_STEP_CACHE_DIR", self.cache_dir.path())
                .env("GRADLE_USER_HOME", self.gradle_home.path())
                .env_remove("GITHUB_WORKSPACE")
                .env_remove("GITHUB_ACTIONS")
                .arg("--workspace")
                .arg(self.workspace.path());
            cmd
        }

        #[cfg(unix)]
        fn install_wrapper(&self, script: &str) {
            use std::os::unix::fs::PermissionsExt;
            let wrapper = self.workspace.path().join("gradlew");
            std::fs::write(&wrapper, format!("#!/bin/sh\n{}\n", script)).unwrap();
            std::fs::set_permissions(&wrapper, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    fn gradle_step() -> Command {
        cargo_bin_cmd!("gradle-step")
    }

    #[test]
    fn help_displays() {
        gradle_step()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("caching the Gradle"));
    }

    #[test]
    fn version_displays() {
        gradle_step()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("gradle-step"));
    }

    #[test]
    fn run_without_arguments_is_a_noop() {
        let job = Job::new();
        job.cmd()
            .args(["run", "--arguments", ""])
            .assert()
            .success()
            .stdout(predicate::str::contains("skipping Gradle invocation"));
    }

    #[test]
    fn run_cache_disabled_skips_restore() {
        let job = Job::new();
        job.cmd()
            .args(["run", "--cache-disabled", "--arguments", ""])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cache is disabled"));

        // No state persisted for the save phase
        assert!(std::fs::read_dir(job.state_dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn run_rejects_unbalanced_quoting() {
        let job = Job::new();
        job.cmd()
            .args(["run", "--arguments", "build 'oops"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unbalanced quoting"));
    }

    #[test]
    fn run_missing_wrapper_fails_with_hint() {
        let job = Job::new();
        job.cmd()
            .args(["run", "--arguments", "build"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Gradle wrapper not found"));
    }

    #[cfg(unix)]
    #[test]
    fn run_invokes_wrapper() {
        let job = Job::new();
        job.install_wrapper("echo \"wrapper ran: $1\"; exit 0");

        job.cmd()
            .args(["run", "--arguments", "help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("wrapper ran: help"));
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_exit_status_on_failure() {
        let job = Job::new();
        job.install_wrapper("exit 7");

        job.cmd()
            .args(["run", "--arguments", "build"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("exited with status 7"));
    }

    #[cfg(unix)]
    #[test]
    fn run_failure_prefers_build_scan_url() {
        let job = Job::new();
        job.install_wrapper(
            "printf 'https://gradle.com/s/abc123\\n' > gradle-build-scan.txt; exit 1",
        );

        job.cmd()
            .args(["run", "--arguments", "build --scan"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("https://gradle.com/s/abc123"));
    }

    #[test]
    fn save_without_prior_run_succeeds_silently() {
        let job = Job::new();
        job.cmd()
            .arg("save")
            .assert()
            .success()
            .stdout(predicate::str::contains("Caching Summary").not());
    }

    #[test]
    fn save_after_run_prints_summary() {
        let job = Job::new();
        job.cmd()
            .args(["run", "--arguments", ""])
            .assert()
            .success();

        job.cmd()
            .arg("save")
            .assert()
            .success()
            .stdout(predicate::str::contains("Caching Summary"))
            .stdout(predicate::str::contains("Entry: gradle-dependencies"));
    }

    #[test]
    fn save_read_only_still_reports() {
        let job = Job::new();
        job.cmd()
            .args(["run", "--arguments", ""])
            .assert()
            .success();

        job.cmd()
            .args(["save", "--cache-read-only"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cache is read-only"))
            .stdout(predicate::str::contains("Caching Summary"));

        // Nothing was written to cache storage
        assert!(std::fs::read_dir(job.cache_dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn run_unknown_gradle_version_fails() {
        let job = Job::new();
        let dists = TempDir::new().unwrap();
        job.cmd()
            .env("GRADLE_STEP_DISTS_DIR", dists.path())
            .args(["run", "--gradle-version", "8.5", "--arguments", "build"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not installed"));
    }

    #[cfg(unix)]
    #[test]
    fn run_provisioned_version_wins_over_wrapper() {
        use std::os::unix::fs::PermissionsExt;

        let job = Job::new();
        job.install_wrapper("echo wrapper-ran; exit 0");

        let dists = TempDir::new().unwrap();
        let bin = dists.path().join("gradle-8.5").join("bin");
        std::fs::create_dir_all(&bin).unwrap();
        let exe = bin.join("gradle");
        std::fs::write(&exe, "#!/bin/sh\necho provisioned-ran; exit 0\n").unwrap();
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

        job.cmd()
            .env("GRADLE_STEP_DISTS_DIR", dists.path())
            .args(["run", "--gradle-version", "8.5", "--arguments", "help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("provisioned-ran"))
            .stdout(predicate::str::contains("wrapper-ran").not());
    }
}
