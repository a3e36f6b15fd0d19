
use serde_json::json;
use sponge_web::clients::MockResponse;
use sponge_web::{MiRnaInteractionQuery, SpongeError};

use crate::test_utils::{interaction_records, mock_client, TEST_BASE_URL};

#[tokio::test]
async fn kidney_scenario_sends_expected_request() {
    let (client, handle) = mock_client(vec![MockResponse::ok(&interaction_records(15))]);

    let query = MiRnaInteractionQuery::new()
        .disease("kidney clear cell carcinoma")
        .mimat_numbers(["MIMAT0000076", "MIMAT0000261"])
        .limit(15);
    let table = client.find_specific_mirna_interactions(&query).await.unwrap();
    assert_eq!(table.len(), 15);

    let request = handle.last_request().unwrap();
    assert_eq!(request.url, format!("{TEST_BASE_URL}miRNAInteraction/findSpecific"));
    assert_eq!(request.query_value("disease_name"), Some("kidney clear cell carcinoma"));
    assert_eq!(request.query_value("mimat_number"), Some("MIMAT0000076,MIMAT0000261"));
    assert_eq!(request.query_value("limit"), Some("15"));
    assert_eq!(request.query_value("information"), Some("false"));
    assert!(!request.has_param("offset"));
    assert!(!request.has_param("hs_number"));
}

#[tokio::test]
async fn rows_follow_server_order() {
    let (client, _handle) = mock_client(vec![MockResponse::ok(&interaction_records(3))]);

    let table = client
        .find_specific_mirna_interactions(&MiRnaInteractionQuery::new().disease("kidney"))
        .await
        .unwrap();

    let ids: Vec<_> = table
        .column("interactions_genegene_ID")
        .unwrap()
        .into_iter()
        .map(|v| v.as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1000, 1001, 1002]);
    assert!(table.columns().iter().any(|c| c == "run.dataset.disease_name"));
    assert!(table.columns().iter().any(|c| c == "mirna.mir_ID"));
}

#[tokio::test]
async fn identifier_lists_are_omitted_when_absent() {
    let (client, handle) = mock_client(vec![MockResponse::ok(&json!([]))]);

    client.find_specific_mirna_interactions(&MiRnaInteractionQuery::new()).await.unwrap();

    let request = handle.last_request().unwrap();
    assert!(!request.has_param("mimat_number"));
    assert!(!request.has_param("hs_number"));
    assert!(!request.has_param("disease_name"));
    assert!(!request.has_param("offset"));
    assert_eq!(request.query_value("limit"), Some("100"));
}

#[tokio::test]
async fn empty_identifier_list_is_sent_blank() {
    let (client, handle) = mock_client(vec![MockResponse::ok(&json!([]))]);

    let query = MiRnaInteractionQuery::new().mimat_numbers(Vec::<String>::new());
    client.find_specific_mirna_interactions(&query).await.unwrap();

    let request = handle.last_request().unwrap();
    assert_eq!(request.query_value("mimat_number"), Some(""));
    assert!(!request.has_param("hs_number"));
}

#[tokio::test]
async fn hs_numbers_and_offset_are_forwarded() {
    let (client, handle) = mock_client(vec![MockResponse::ok(&json!([]))]);

    let query = MiRnaInteractionQuery::new()
        .hs_numbers(["hsa-miR-21-5p", "hsa-miR-155-5p"])
        .limit(1000)
        .offset(200);
    client.find_specific_mirna_interactions(&query).await.unwrap();

    let request = handle.last_request().unwrap();
    assert_eq!(request.query_value("hs_number"), Some("hsa-miR-21-5p,hsa-miR-155-5p"));
    assert_eq!(request.query_value("limit"), Some("1000"));
    assert_eq!(request.query_value("offset"), Some("200"));
}

#[tokio::test]
async fn both_identifier_kinds_are_left_to_the_server() {
    let (client, handle) = mock_client(vec![MockResponse::json(
        400,
        &json!({"detail": "mimat_number and hs_number are mutually exclusive"}),
    )]);

    let query = MiRnaInteractionQuery::new()
        .mimat_numbers(["MIMAT0000076"])
        .hs_numbers(["hsa-miR-21-5p"]);
    let err = client.find_specific_mirna_interactions(&query).await.unwrap_err();

    assert_eq!(handle.request_count(), 1);
    match err {
        SpongeError::UnexpectedStatus { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("mutually exclusive"));
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_array_is_an_empty_table() {
    let (client, _handle) = mock_client(vec![MockResponse::ok(&json!([]))]);

    let table = client
        .find_specific_mirna_interactions(&MiRnaInteractionQuery::new().disease("kidney"))
        .await
        .unwrap();

    assert!(table.is_empty());
    assert_eq!(table.width(), 0);
}

#[tokio::test]
async fn not_found_carries_server_detail() {
    let (client, _handle) = mock_client(vec![MockResponse::json(404, &json!({"detail": "no data found"}))]);

    let err = client
        .find_specific_mirna_interactions(&MiRnaInteractionQuery::new().disease("unicorn"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("no data found"));
}

#[tokio::test]
async fn server_error_is_explicit() {
    let (client, _handle) = mock_client(vec![MockResponse::text(500, "Internal Server Error")]);

    let err = client
        .find_specific_mirna_interactions(&MiRnaInteractionQuery::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(matches!(err, SpongeError::UnexpectedStatus { ref body, .. } if body == "Internal Server Error"));
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let (client, _handle) = mock_client(vec![MockResponse::text(200, "<html>maintenance</html>")]);

    let err = client
        .find_specific_mirna_interactions(&MiRnaInteractionQuery::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SpongeError::Decode(_, ref raw) if raw.contains("maintenance")));
}

#[tokio::test]
async fn transport_failure_propagates() {
    let (client, _handle) = mock_client(vec![MockResponse::transport_error("connection refused")]);

    let err = client
        .find_specific_mirna_interactions(&MiRnaInteractionQuery::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SpongeError::Transport(ref msg) if msg == "connection refused"));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn configured_headers_are_sent_on_every_call() {
    let (client, handle) = mock_client(vec![
        MockResponse::ok(&json!([])),
        MockResponse::ok(&json!([])),
    ]);

    let query = MiRnaInteractionQuery::new();
    client.find_specific_mirna_interactions(&query).await.unwrap();
    client.find_specific_mirna_interactions(&query).await.unwrap();

    let requests = handle.requests();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert!(request
            .headers
            .iter()
            .any(|(name, value)| name == "Accept" && value == "application/json"));
    }
    assert_eq!(requests[0], requests[1]);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let (client, handle) = mock_client(vec![
        MockResponse::ok(&interaction_records(2)),
        MockResponse::ok(&interaction_records(2)),
        MockResponse::ok(&interaction_records(2)),
    ]);

    let mut tasks = tokio::task::JoinSet::new();
    for name in ["kidney", "liver", "breast"] {
        let client = client.clone();
        tasks.spawn(async move {
            client
                .find_specific_mirna_interactions(&MiRnaInteractionQuery::new().disease(name))
                .await
        });
    }
    while let Some(result) = tasks.join_next().await {
        assert_eq!(result.unwrap().unwrap().len(), 2);
    }

    let mut diseases: Vec<String> = handle
        .requests()
        .iter()
        .filter_map(|r| r.query_value("disease_name").map(str::to_string))
        .collect();
    diseases.sort();
    assert_eq!(diseases, ["breast", "kidney", "liver"]);
}
