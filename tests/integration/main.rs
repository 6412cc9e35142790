//! Integration tests for n9res

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// A bundle with two resources and a config pinning the watermark to 1000
    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let web = dir.path().join("bundle/resources/web");
            fs::create_dir_all(web.join("img")).unwrap();
            fs::write(web.join("app.css"), "body { margin: 0; }").unwrap();
            fs::write(web.join("img/logo.png"), [0x89u8, b'P', b'N', b'G']).unwrap();
            fs::write(
                dir.path().join("config.toml"),
                "[bundle]\nlast_modified = 1000\n",
            )
            .unwrap();
            Self { dir }
        }

        fn write_config(&self, contents: &str) {
            fs::write(self.path().join("config.toml"), contents).unwrap();
        }

        fn path(&self) -> &Path {
            self.dir.path()
        }

        fn cmd(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("n9res");
            cmd.arg("--config")
                .arg(self.path().join("config.toml"))
                .arg("--bundle")
                .arg(self.path().join("bundle"));
            cmd
        }
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("n9res")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Bundle static resource provider"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("n9res")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("n9res"));
    }

    #[test]
    fn fetch_then_revalidate() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .args(["fetch", ".notesin9/app.css", "--if-modified-since", "999"])
            .args(["--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("200 .notesin9/app.css"));

        fixture
            .cmd()
            .args(["fetch", ".notesin9/app.css", "--if-modified-since", "1000"])
            .args(["--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("304 .notesin9/app.css"));
    }

    #[test]
    fn fetch_json_reports_last_modified() {
        let fixture = Fixture::new();

        let output = fixture
            .cmd()
            .args(["fetch", "/.ibmxspres/.notesin9/img/logo.png", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(parsed[0]["path"], ".notesin9/img/logo.png");
        assert_eq!(parsed[0]["status"], 200);
        assert_eq!(parsed[0]["content_type"], "image/png");
        assert_eq!(parsed[0]["last_modified"], 1000);
    }

    #[test]
    fn fetch_garbled_timestamp_serves_content() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .args(["fetch", ".notesin9/app.css", "--if-modified-since", "whenever"])
            .args(["--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("200 .notesin9/app.css"));
    }

    #[test]
    fn fetch_writes_output() {
        let fixture = Fixture::new();
        let out = fixture.path().join("app.css");

        fixture
            .cmd()
            .args(["fetch", ".notesin9/app.css", "--format", "plain", "--output"])
            .arg(&out)
            .assert()
            .success();

        assert_eq!(fs::read_to_string(out).unwrap(), "body { margin: 0; }");
    }

    #[test]
    fn fetch_far_future_watermark_omits_header() {
        let fixture = Fixture::new();
        fixture.write_config("[bundle]\nlast_modified = 253402300800000\n");

        let output = fixture
            .cmd()
            .args(["fetch", ".notesin9/app.css", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(parsed[0]["status"], 200);
        assert_eq!(parsed[0]["last_modified"], 253_402_300_800_000_i64);
        assert!(parsed[0].get("last_modified_http").is_none());

        fixture
            .cmd()
            .args(["fetch", ".notesin9/app.css"])
            .assert()
            .success()
            .stdout(predicate::str::contains("last modified unknown"));
    }

    #[test]
    fn status_far_future_watermark() {
        let fixture = Fixture::new();
        fixture.write_config("[bundle]\nlast_modified = 253402300800000\n");

        fixture
            .cmd()
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("No Last-Modified header"));
    }

    #[test]
    fn fetch_write_failure_still_stops_bundle() {
        let fixture = Fixture::new();
        let out = fixture.path().join("missing-dir/app.css");

        fixture
            .cmd()
            .arg("-v")
            .args(["fetch", ".notesin9/app.css", "--format", "plain", "--output"])
            .arg(&out)
            .assert()
            .failure()
            .stderr(predicate::str::contains("com.notesin9.base started"))
            .stderr(predicate::str::contains("com.notesin9.base stopped"));
    }

    #[test]
    fn fetch_missing_resource() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .args(["fetch", ".notesin9/missing.css", "--format", "plain"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("404 .notesin9/missing.css"))
            .stderr(predicate::str::contains("Resource not found"));
    }

    #[test]
    fn fetch_outside_namespace() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .args(["fetch", ".other/app.css", "--format", "plain"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Resource not found"));
    }

    #[test]
    fn fetch_traversal_rejected() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .args(["fetch", ".notesin9/../../config.toml", "--format", "plain"])
            .assert()
            .failure()
            .stdout(predicate::str::contains("404"));
    }

    #[test]
    fn fetch_missing_bundle() {
        let fixture = Fixture::new();

        cargo_bin_cmd!("n9res")
            .arg("--config")
            .arg(fixture.path().join("config.toml"))
            .arg("--bundle")
            .arg(fixture.path().join("absent"))
            .args(["fetch", ".notesin9/app.css"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Bundle root not found"));
    }

    #[test]
    fn list_plain() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .args(["list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("/.ibmxspres/.notesin9/app.css"))
            .stdout(predicate::str::contains("/.ibmxspres/.notesin9/img/logo.png"));
    }

    #[test]
    fn status_runs() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("n9res Bundle Status"))
            .stdout(predicate::str::contains("com.notesin9.base.library"));
    }

    #[test]
    fn config_path() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_set_then_show() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .args(["config", "set", "cache.enabled", "false"])
            .assert()
            .success();

        fixture
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[resources]"))
            .stdout(predicate::str::contains("enabled = false"))
            .stdout(predicate::str::contains("last_modified = 1000"));
    }

    #[test]
    fn config_set_unknown_key() {
        let fixture = Fixture::new();

        fixture
            .cmd()
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }
}
