use std::cell::RefCell;
use std::net::TcpListener;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::task::JoinHandle;

use glyco_client::{submit_with, ClientConfig, PredictClient, PredictionService};
use glyco_core::{
    Field, FormError, FormFields, Outcome, PredictionFormController, PredictionReply,
    PredictionRequest, ResultView, SubmitError,
};

/// Canned service that records every request it sees.
struct FakeService {
    status: u16,
    body: &'static str,
    seen: RefCell<Vec<PredictionRequest>>,
}

impl FakeService {
    fn new(status: u16, body: &'static str) -> Self {
        Self {
            status,
            body,
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl PredictionService for FakeService {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionReply, SubmitError> {
        self.seen.borrow_mut().push(request.clone());
        PredictionReply::from_http(self.status, self.body.as_bytes())
    }
}

fn filled_form() -> FormFields {
    FormFields::from_values(["1", "1", "0", "3", "27.5", "6.1", "158", "1"])
}

#[tokio::test]
async fn renders_a_successful_prediction() {
    let service = FakeService::new(200, r#"{"prediction":1,"probability":[0.2,0.8]}"#);
    let mut controller = PredictionFormController::with_fields(filled_form());

    submit_with(&mut controller, &service).await.unwrap();

    let seen = service.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].smoking_history, 3);
    assert_eq!(seen[0].bmi, 27.5);

    let ResultView::Prediction(view) = controller.result() else {
        panic!("expected a prediction");
    };
    assert_eq!(view.outcome, Outcome::Positive);
    assert_eq!(view.segments[1].percent, "80.0%");
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn incomplete_form_never_reaches_the_service() {
    let service = FakeService::new(200, r#"{"prediction":0}"#);
    let mut form = filled_form();
    form.set(Field::Gender, "");
    let mut controller = PredictionFormController::with_fields(form);

    let err = submit_with(&mut controller, &service).await.unwrap_err();

    assert_eq!(err, FormError::Missing { field: Field::Gender });
    assert!(service.seen.borrow().is_empty());
    assert!(controller.result().is_empty());
}

#[tokio::test]
async fn server_error_without_body_falls_back() {
    let service = FakeService::new(500, "");
    let mut controller = PredictionFormController::with_fields(filled_form());

    submit_with(&mut controller, &service).await.unwrap();

    assert_eq!(controller.result().to_text(), "Error: Unknown error");
    assert!(controller.controls().submit_enabled);
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    // bind then drop to get a local port nobody listens on
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = PredictClient::new(&ClientConfig {
        base_url: format!("http://127.0.0.1:{port}"),
        timeout_secs: 5,
        ..ClientConfig::default()
    })
    .unwrap();
    let mut controller = PredictionFormController::with_fields(filled_form());

    submit_with(&mut controller, &client).await.unwrap();

    let ResultView::Error { message } = controller.result() else {
        panic!("expected an error");
    };
    assert!(message.starts_with("request could not be completed"));
    assert!(
        message.to_lowercase().contains("connection refused"),
        "root cause missing from {message:?}"
    );
    let controls = controller.controls();
    assert!(controls.submit_enabled);
    assert!(controls.reset_enabled);
}

/// What the one-shot server saw.
struct CapturedRequest {
    request_line: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl CapturedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Accept one HTTP/1.1 request, record it, answer with a canned response.
async fn serve_once(
    status_line: &'static str,
    content_type: &'static str,
    body: &'static str,
) -> (String, JoinHandle<CapturedRequest>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8(buf[..header_end].to_vec()).unwrap();
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();

        let content_length = headers
            .iter()
            .find(|(k, _)| k == "content-length")
            .map(|(_, v)| v.parse::<usize>().unwrap())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending the body");
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;

        CapturedRequest {
            request_line,
            headers,
            body: buf[header_end..header_end + content_length].to_vec(),
        }
    });

    (format!("http://{addr}"), handle)
}

fn client_for(base_url: String) -> PredictClient {
    PredictClient::new(&ClientConfig {
        base_url,
        timeout_secs: 5,
        ..ClientConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn posts_the_form_as_json() {
    let (base_url, server) = serve_once(
        "200 OK",
        "application/json",
        r#"{"prediction":1,"probability":[0.2,0.8]}"#,
    )
    .await;
    let client = client_for(base_url);
    let mut controller = PredictionFormController::with_fields(filled_form());

    submit_with(&mut controller, &client).await.unwrap();
    let captured = server.await.unwrap();

    assert_eq!(captured.request_line, "POST /predict HTTP/1.1");
    assert_eq!(captured.header("content-type"), Some("application/json"));

    let body: Value = serde_json::from_slice(&captured.body).unwrap();
    assert_eq!(
        body,
        json!({
            "gender": 1,
            "hypertension": 1,
            "heart_disease": 0,
            "smoking_history": 3,
            "bmi": 27.5,
            "HbA1c_level": 6.1,
            "blood_glucose_level": 158.0,
            "age_category": 1,
        })
    );
    assert_eq!(body.as_object().unwrap().len(), 8);

    let ResultView::Prediction(view) = controller.result() else {
        panic!("expected a prediction");
    };
    assert_eq!(view.outcome, Outcome::Positive);
    let percents: Vec<&str> = view.segments.iter().map(|s| s.percent.as_str()).collect();
    assert_eq!(percents, vec!["20.0%", "80.0%"]);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn server_detail_reaches_the_panel() {
    let (base_url, server) = serve_once(
        "400 Bad Request",
        "application/json",
        r#"{"detail":"bad input"}"#,
    )
    .await;
    let client = client_for(base_url);
    let mut controller = PredictionFormController::with_fields(filled_form());

    submit_with(&mut controller, &client).await.unwrap();
    server.await.unwrap();

    assert_eq!(controller.result().to_text(), "Error: bad input");
    assert!(controller.controls().submit_enabled);
}

#[tokio::test]
async fn html_error_page_falls_back_to_unknown_error() {
    let (base_url, server) =
        serve_once("502 Bad Gateway", "text/html", "<html>Bad Gateway</html>").await;
    let client = client_for(base_url);
    let mut controller = PredictionFormController::with_fields(filled_form());

    submit_with(&mut controller, &client).await.unwrap();
    server.await.unwrap();

    assert_eq!(controller.result().to_text(), "Error: Unknown error");
    assert!(controller.controls().reset_enabled);
}
