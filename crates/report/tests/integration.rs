//! Integration tests for report crate

#[cfg(test)]
mod tests {
    use docaudit_events::{channel, AppEvent, ReportKind, VerifyEvent};
    use docaudit_report::*;
    use docaudit_types::{Aggregate, FailureClass, FailureRecord, Outcome};
    use tempfile::tempdir;

    fn aggregate_with(missing: &[&str], errors: &[(&str, Option<u16>, &str)]) -> Aggregate {
        let mut aggregate = Aggregate::default();
        for id in missing {
            let outcome = Outcome::missing(*id, 404);
            aggregate.missing += 1;
            aggregate.missing_records.push(FailureRecord::from_outcome(&outcome));
            aggregate.details.push(outcome);
        }
        for (id, status, message) in errors {
            let outcome = Outcome::error(*id, FailureClass::UnexpectedStatus, *status, *message);
            aggregate.errors += 1;
            aggregate.error_records.push(FailureRecord::from_outcome(&outcome));
            aggregate.details.push(outcome);
        }
        aggregate
    }

    #[tokio::test]
    async fn test_clean_batch_writes_nothing() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("reports");
        let context = ReportContext::new("GA_act_nums.txt", "GA", &out);

        let mut aggregate = Aggregate::default();
        aggregate.exists = 3;
        let emitted = ReportEmitter::new().emit(&context, &aggregate).await.unwrap();

        assert!(emitted.is_empty());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_missing_list_one_line_per_identifier() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("nested").join("reports");
        let context = ReportContext::new("GA_act_nums.txt", "GA", &out);
        let aggregate = aggregate_with(&["HB 1", "HB 2", "HB 3"], &[]);

        let emitted = ReportEmitter::new().emit(&context, &aggregate).await.unwrap();

        assert!(emitted.errors.is_none());
        let path = emitted.missing.unwrap();
        assert_eq!(path, out.join("GA_missing_act_nums.txt"));

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Missing act_nums for GA_act_nums.txt (GA)");
        assert!(lines[1].starts_with("Generated: "));
        assert_eq!(lines[2], "Total missing: 3");
        assert_eq!(lines[3], "=".repeat(50));
        assert_eq!(lines[4], "");
        assert_eq!(&lines[5..], ["HB 1", "HB 2", "HB 3"]);
        assert!(!out.join("GA_error_act_nums.json").exists());
    }

    #[tokio::test]
    async fn test_error_list_written_as_json() {
        let temp = tempdir().unwrap();
        let context = ReportContext::new("IA_act_nums.txt", "IA", temp.path());
        let aggregate = aggregate_with(&[], &[("SF 1", Some(500), "HTTP 500"), ("SF 2", None, "Timeout")]);
        let (tx, mut rx) = channel();

        let emitted = ReportEmitter::new()
            .with_events(tx)
            .emit(&context, &aggregate)
            .await
            .unwrap();

        assert!(emitted.missing.is_none());
        let content = tokio::fs::read_to_string(emitted.errors.unwrap())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["filename"], "IA_act_nums.txt");
        assert_eq!(json["state_code"], "IA");
        assert_eq!(json["total_errors"], 2);
        assert_eq!(json["errors"][0]["act_num"], "SF 1");
        assert_eq!(json["errors"][0]["status_code"], 500);
        assert_eq!(json["errors"][1]["error"], "Timeout");
        assert!(json["generated"].as_str().unwrap().len() == 19);

        let message = rx.try_recv().unwrap();
        assert!(matches!(
            message.event,
            AppEvent::Verify(VerifyEvent::ReportWritten {
                kind: ReportKind::Errors,
                records: 2,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_unwritable_output_is_report_error() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("not-a-dir");
        tokio::fs::write(&blocker, "x").await.unwrap();
        let context = ReportContext::new("GA.txt", "GA", blocker.join("out"));
        let aggregate = aggregate_with(&["HB 1"], &[]);

        let err = ReportEmitter::new()
            .emit(&context, &aggregate)
            .await
            .unwrap_err();
        assert!(matches!(err, docaudit_errors::Error::Report(_)));
    }
}
