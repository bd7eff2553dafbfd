//! Integration tests for docaudit CLI

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use httpmock::Method::HEAD;
    use std::process::Command;
    use tempfile::tempdir;

    fn docaudit() -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_docaudit"));
        // Keep host configuration out of the tests
        command
            .env_remove("DOCAUDIT_CONCURRENCY")
            .env_remove("DOCAUDIT_TIMEOUT")
            .env_remove("DOCAUDIT_MAX_ATTEMPTS")
            .env_remove("DOCAUDIT_RETRY_DELAY_MS")
            .env_remove("DOCAUDIT_BASE_URL")
            .env_remove("DOCAUDIT_OUTPUT_DIR")
            .env_remove("DOCAUDIT_STATES")
            .env("RUST_LOG", "off");
        command
    }

    #[test]
    fn test_cli_version() {
        let output = docaudit()
            .arg("--version")
            .output()
            .expect("Failed to execute docaudit");

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("docaudit"));
    }

    #[test]
    fn test_cli_help() {
        let output = docaudit()
            .arg("--help")
            .output()
            .expect("Failed to execute docaudit");

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("verify"));
    }

    #[test]
    fn test_verify_missing_path_fails() {
        let temp = tempdir().unwrap();
        let output = docaudit()
            .arg("verify")
            .arg(temp.path().join("does-not-exist"))
            .output()
            .expect("Failed to execute docaudit");

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("input path not found"));
    }

    #[test]
    fn test_verify_writes_reports_and_json_summary() {
        let server = MockServer::start();
        let found = server.mock(|when, then| {
            when.method(HEAD).path("/raw-data/HB1.pdf");
            then.status(200);
        });
        let missing = server.mock(|when, then| {
            when.method(HEAD).path("/raw-data/HB2.pdf");
            then.status(404);
        });
        let broken = server.mock(|when, then| {
            when.method(HEAD).path("/raw-data/HB3.pdf");
            then.status(500);
        });

        let temp = tempdir().unwrap();
        let inputs = temp.path().join("lists");
        std::fs::create_dir(&inputs).unwrap();
        std::fs::write(
            inputs.join("GA_act_nums.txt"),
            "act_num\nHB1\nHB2\n\nnan\nHB3\nHB1\n",
        )
        .unwrap();
        std::fs::write(inputs.join("IA_act_nums.txt"), "SF1\n").unwrap();
        let out = temp.path().join("reports");

        let output = docaudit()
            .arg("--json")
            .arg("verify")
            .arg(&inputs)
            .args(["--states", "GA", "--retry-delay-ms", "1"])
            .arg("--base-url")
            .arg(server.url("/raw-data/"))
            .arg("--output-dir")
            .arg(&out)
            .output()
            .expect("Failed to execute docaudit");

        assert!(
            output.status.success(),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        found.assert();
        missing.assert();
        broken.assert();

        let summaries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(summaries.as_array().unwrap().len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary["label"], "GA");
        assert_eq!(summary["checked"], 3);
        assert_eq!(summary["exists"], 1);
        assert_eq!(summary["missing"], 1);
        assert_eq!(summary["errors"], 1);

        let missing_report =
            std::fs::read_to_string(out.join("GA_missing_act_nums.txt")).unwrap();
        assert!(missing_report.ends_with("\nHB2\n"));
        let error_report: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(out.join("GA_error_act_nums.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(error_report["errors"][0]["act_num"], "HB3");
        assert_eq!(error_report["errors"][0]["error"], "HTTP 500");
        assert!(!out.join("IA_missing_act_nums.txt").exists());
    }

    #[test]
    fn test_state_filter_with_no_match_fails() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("GA_act_nums.txt"), "HB1\n").unwrap();

        let output = docaudit()
            .arg("verify")
            .arg(temp.path())
            .args(["--states", "WV"])
            .output()
            .expect("Failed to execute docaudit");

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("no input files selected"));
    }
}
