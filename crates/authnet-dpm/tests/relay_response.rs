use std::sync::{mpsc, Arc};
use std::thread;

use dpm::{
    CheckoutRequest, Credentials, GatewayConfig, InboundNotification, NotificationProcessor,
    ProcessingState, ResultPage, TransactionEvent, TransactionOutcome,
};

const SIGNATURE_KEY: &str = "5a7e0c";

/// HMAC-SHA512 of the relay fields in `APPROVED_BODY`, computed independently.
const APPROVED_SHA2: &str = "6BEE19B3CE6393C4C04571E681C870B78809FD5A499F2C75DAED09B2AEEF8152\
                             1E990F9DA9E1FF95C91193B1BE892AD01A7DA74D1406B0930B7F4859768E966F";

fn approved_body(signature: &str) -> String {
    format!(
        "x_response_code=1&x_response_reason_code=1\
         &x_response_reason_text=This+transaction+has+been+approved.\
         &x_avs_code=Y&x_auth_code=ABC123&x_trans_id=2149186775&x_method=CC\
         &x_account_number=XXXX0027&x_description=Blue+widget&x_invoice_num=INV-7\
         &x_first_name=Ada&x_last_name=Lovelace&x_zip=98004&x_email=ada%40example.com\
         &x_amount=19.99&x_test_request=false&x_cvv2_resp_code=M&x_SHA2_Hash={signature}"
    )
}

fn config(test_mode: bool) -> GatewayConfig {
    GatewayConfig::new(
        Credentials::new("merch1", "tk", SIGNATURE_KEY).unwrap(),
        test_mode,
    )
}

#[test]
fn approved_relay_response_end_to_end() {
    let (tx, rx) = mpsc::channel::<TransactionEvent>();
    let processor = NotificationProcessor::new(config(false), tx);

    let body = approved_body(APPROVED_SHA2);
    let processed = processor.process(InboundNotification::from_form_body(body.as_bytes()));

    assert_eq!(
        processed.outcome,
        TransactionOutcome::Approved {
            transaction_id: "2149186775".into(),
            result_text: "This transaction has been approved.".into(),
        }
    );

    let url = processed
        .redirect
        .expect("approved responses redirect")
        .to_url("https://shop.example.com/authorize_net-sucess-handler/")
        .unwrap();
    let page = ResultPage::from_query(url.query().unwrap());
    assert_eq!(page.response, "This transaction has been approved.");
    assert_eq!(page.transaction_id.as_deref(), Some("2149186775"));

    let events: Vec<TransactionEvent> = rx.try_iter().collect();
    assert_eq!(events.len(), 1);
    assert!(events[0].is_success());
    // The full payload travels with the event, unsigned fields included.
    assert_eq!(events[0].response().field("x_description"), Some("Blue widget"));
}

#[test]
fn lowercase_signature_is_accepted() {
    let (tx, _rx) = mpsc::channel::<TransactionEvent>();
    let processor = NotificationProcessor::new(config(false), tx);
    let body = approved_body(&APPROVED_SHA2.to_lowercase());
    let processed = processor.process(InboundNotification::from_form_body(body.as_bytes()));
    assert_eq!(processed.outcome.state(), ProcessingState::Approved);
}

#[test]
fn tampered_amount_is_rejected() {
    let (tx, rx) = mpsc::channel::<TransactionEvent>();
    let processor = NotificationProcessor::new(config(false), tx);

    let body = approved_body(APPROVED_SHA2).replace("x_amount=19.99", "x_amount=0.01");
    let processed = processor.process(InboundNotification::from_form_body(body.as_bytes()));

    assert!(processed.outcome.is_rejected());
    assert!(processed.redirect.is_none());
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn unsigned_fields_do_not_affect_verification() {
    let (tx, _rx) = mpsc::channel::<TransactionEvent>();
    let processor = NotificationProcessor::new(config(false), tx);

    let body = approved_body(APPROVED_SHA2).replace("Blue+widget", "Red+widget");
    let processed = processor.process(InboundNotification::from_form_body(body.as_bytes()));
    assert_eq!(processed.outcome.state(), ProcessingState::Approved);
}

#[test]
fn signature_from_another_account_is_rejected() {
    let (tx, rx) = mpsc::channel::<TransactionEvent>();
    let other = GatewayConfig::new(Credentials::new("merch1", "tk", "5a7e0d").unwrap(), false);
    let processor = NotificationProcessor::new(other, tx);

    let body = approved_body(APPROVED_SHA2);
    let processed = processor.process(InboundNotification::from_form_body(body.as_bytes()));
    assert!(processed.outcome.is_rejected());
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn processor_shared_across_threads() {
    let (tx, rx) = mpsc::channel::<TransactionEvent>();
    let processor = Arc::new(NotificationProcessor::new(config(false), tx));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let processor = processor.clone();
            thread::spawn(move || {
                let signature = if i % 2 == 0 {
                    APPROVED_SHA2.to_string()
                } else {
                    "00".repeat(64)
                };
                let body = approved_body(&signature);
                processor
                    .process(InboundNotification::from_form_body(body.as_bytes()))
                    .outcome
                    .state()
            })
        })
        .collect();

    let states: Vec<ProcessingState> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        states.iter().filter(|s| **s == ProcessingState::Approved).count(),
        4
    );
    assert_eq!(
        states.iter().filter(|s| **s == ProcessingState::Rejected).count(),
        4
    );

    drop(processor);
    assert_eq!(rx.iter().count(), 4);
}

#[test]
fn checkout_form_targets_configured_gateway() {
    let (tx, _rx) = mpsc::channel::<TransactionEvent>();

    let live = NotificationProcessor::new(config(false), tx.clone());
    assert_eq!(live.service_url(), dpm::LIVE_SERVICE_URL);

    let test = NotificationProcessor::new(config(true), tx);
    assert_eq!(test.service_url(), dpm::TEST_SERVICE_URL);

    let request = CheckoutRequest::default()
        .with_field("x_fp_sequence", "42")
        .with_field("x_fp_timestamp", "1000")
        .with_field("x_amount", "9.99")
        .with_field("x_relay_url", "https://shop.example.com/authorize_net-notify-handler/");
    let form = test.generate_form(&request).unwrap();
    assert_eq!(form.fingerprint(), "95856cffcfe586f1d642aef69ca63b42");
    assert_eq!(
        form.field("x_relay_url"),
        Some("https://shop.example.com/authorize_net-notify-handler/")
    );
}

#[cfg(feature = "full")]
#[tokio::test]
async fn tokio_channel_sink_only_sees_verified_events() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<TransactionEvent>();
    let processor = NotificationProcessor::new(config(false), tx);

    // Unsigned declines are rejected before any event is raised.
    let processed = processor.process(
        [("x_response_code", "2"), ("x_trans_id", "9")]
            .into_iter()
            .collect(),
    );
    assert!(processed.outcome.is_rejected());
    assert!(rx.try_recv().is_err());

    // Same processor, valid approved notification: exactly one event.
    let body = approved_body(APPROVED_SHA2);
    processor.process(InboundNotification::from_form_body(body.as_bytes()));
    let event = rx.recv().await.unwrap();
    assert!(event.is_success());
    assert!(rx.try_recv().is_err());
}
