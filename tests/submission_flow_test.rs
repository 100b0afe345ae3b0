//! End-to-end submission flow: form state -> request -> round trip ->
//! submission tracker, including the documented overlapping-submission
//! race (last completion wins).

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use risk_cli::api_client::PredictionClient;
use risk_cli::app_state::{SubmissionState, SubmissionTracker};
use risk_cli::form::{FormState, NumericField};

/// One-shot stub server; responds after `delay` so tests can order the
/// completions of overlapping requests.
fn spawn_stub_server(body: &'static str, delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        consume_http_request(&mut stream);
        thread::sleep(delay);
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
    });

    format!("http://{}", addr)
}

fn consume_http_request(stream: &mut TcpStream) {
    let mut data = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..n]);
        if let Some(header_end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&data[..header_end]).to_string();
            let content_length = headers
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if data.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
}

fn filled_form() -> FormState {
    let mut form = FormState::new();
    form.set_field(NumericField::Age, "28".to_string());
    form.set_field(NumericField::Income, "1200000".to_string());
    form.set_field(NumericField::LoanAmount, "2560000".to_string());
    form.set_field(NumericField::LoanTenureMonths, "36".to_string());
    form.set_field(NumericField::AvgDpdPerDelinquency, "20".to_string());
    form.set_field(NumericField::DelinquencyRatio, "30".to_string());
    form.set_field(NumericField::CreditUtilizationRatio, "30".to_string());
    form.set_field(NumericField::NumOpenAccounts, "2".to_string());
    form
}

#[test]
fn successful_submission_ends_idle_with_result() {
    let url = spawn_stub_server(
        r#"{"default_probability":0.0432,"credit_score":742,"rating":"Good","loan_to_income_ratio":2.13}"#,
        Duration::ZERO,
    );

    let client = PredictionClient::new(&url);
    let mut tracker = SubmissionTracker::new();
    let request = filled_form().build_request();

    tracker.begin();
    assert!(tracker.is_submitting());

    match client.predict(&request) {
        Ok(result) => tracker.complete(result),
        Err(e) => tracker.fail(e.to_string()),
    }

    assert!(!tracker.is_submitting());
    let result = tracker.result().expect("result should be displayed");
    assert_eq!(result.credit_score, 742);
    assert_eq!(result.loan_to_income_ratio, 2.13);
}

#[test]
fn transport_failure_ends_idle_with_error_and_no_result() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = PredictionClient::new(&format!("http://{}", addr));
    let mut tracker = SubmissionTracker::new();
    let request = filled_form().build_request();

    tracker.begin();
    match client.predict(&request) {
        Ok(result) => tracker.complete(result),
        Err(e) => tracker.fail(e.to_string()),
    }

    // Exactly one failure signal, no stale result, machine back to the
    // idle family and ready to resubmit
    assert!(!tracker.is_submitting());
    assert!(tracker.result().is_none());
    assert!(tracker.error().is_some());
    assert_eq!(tracker.attempts(), 1);
}

#[test]
fn overlapping_submissions_display_last_completion() {
    // The slow server answers with score 650, the fast one with 810.
    // Both requests are in flight before either resolves; the slow
    // response lands last, so 650 must be what stays displayed.
    let slow_url = spawn_stub_server(
        r#"{"default_probability":0.31,"credit_score":650,"rating":"Average","loan_to_income_ratio":2.13}"#,
        Duration::from_millis(600),
    );
    let fast_url = spawn_stub_server(
        r#"{"default_probability":0.02,"credit_score":810,"rating":"Excellent","loan_to_income_ratio":2.13}"#,
        Duration::ZERO,
    );

    let tracker = Arc::new(Mutex::new(SubmissionTracker::new()));
    let request = filled_form().build_request();

    // Two submit() calls dispatched back to back, no guard in between
    tracker.lock().unwrap().begin();
    tracker.lock().unwrap().begin();

    let mut handles = Vec::new();
    for url in [slow_url, fast_url] {
        let tracker = Arc::clone(&tracker);
        let request = request.clone();
        handles.push(thread::spawn(move || {
            let client = PredictionClient::new(&url);
            match client.predict(&request) {
                Ok(result) => tracker.lock().unwrap().complete(result),
                Err(e) => tracker.lock().unwrap().fail(e.to_string()),
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let tracker = tracker.lock().unwrap();
    let result = tracker.result().expect("a result should be displayed");
    assert_eq!(
        result.credit_score, 650,
        "the response completing last must win, not the first one"
    );
}

#[test]
fn identical_form_state_builds_identical_requests() {
    let form = filled_form();
    let first = form.build_request();
    let second = form.build_request();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn begin_clears_displayed_result_for_new_attempt() {
    let url = spawn_stub_server(
        r#"{"default_probability":0.0432,"credit_score":742,"rating":"Good","loan_to_income_ratio":2.13}"#,
        Duration::ZERO,
    );

    let client = PredictionClient::new(&url);
    let mut tracker = SubmissionTracker::new();
    let request = filled_form().build_request();

    tracker.begin();
    let result = client.predict(&request).unwrap();
    tracker.complete(result);
    assert!(tracker.result().is_some());

    tracker.begin();
    assert_eq!(*tracker.state(), SubmissionState::Submitting);
    assert!(tracker.result().is_none());
}
