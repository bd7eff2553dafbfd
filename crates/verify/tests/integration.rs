//! Integration tests for verify crate

#[cfg(test)]
mod tests {
    use docaudit_net::{ExistenceProber, NetClient, ObjectUrlResolver, RetryPolicy};
    use docaudit_types::OutcomeKind;
    use docaudit_verify::*;
    use httpmock::prelude::*;
    use httpmock::Method::HEAD;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_batch_against_mock_store() {
        let server = MockServer::start_async().await;
        for id in ["GA_1", "GA_2", "GA_3"] {
            let path = format!("/raw-data/{id}.pdf");
            server
                .mock_async(|when, then| {
                    when.method(HEAD).path(path);
                    then.status(200);
                })
                .await;
        }
        server
            .mock_async(|when, then| {
                when.method(HEAD).path("/raw-data/GA_4.pdf");
                then.status(404);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(HEAD).path("/raw-data/GA_5.pdf");
                then.status(403);
            })
            .await;

        let resolver = ObjectUrlResolver::new(&server.url("/raw-data/"), ".pdf").unwrap();
        let policy = RetryPolicy {
            timeout: Duration::from_secs(2),
            initial_delay: Duration::from_millis(10),
            ..RetryPolicy::default()
        };
        let prober = ExistenceProber::new(NetClient::with_defaults().unwrap(), resolver, policy);

        let identifiers = ["GA_1", "GA_2", "GA_3", "GA_4", "GA_5", "  "]
            .iter()
            .map(ToString::to_string)
            .collect();
        let batch = Verifier::new(Arc::new(prober), 3)
            .verify("GA", identifiers)
            .await;
        let aggregate = batch.aggregate;

        assert!(aggregate.is_consistent(6));
        assert_eq!(aggregate.exists, 3);
        assert_eq!(aggregate.missing, 1);
        assert_eq!(aggregate.errors, 2);
        assert_eq!(aggregate.missing_records[0].identifier, "GA_4");

        let forbidden = aggregate
            .error_records
            .iter()
            .find(|r| r.identifier == "GA_5")
            .unwrap();
        assert_eq!(forbidden.status_code, Some(403));
        assert_eq!(forbidden.error, "HTTP 403");

        let blank = aggregate
            .details
            .iter()
            .find(|o| o.identifier().trim().is_empty())
            .unwrap();
        assert_eq!(blank.kind(), OutcomeKind::Error);
        assert_eq!(blank.error_message(), Some("Empty identifier"));
    }
}
