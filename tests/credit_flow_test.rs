mod common;

use common::{approved, body, issuer_response, scripted_service, visa};
use credit_gateway::domain::card::{Address, CardHolder, GiftCard};
use credit_gateway::domain::element::Element;
use credit_gateway::domain::market::TransactionDetails;
use credit_gateway::domain::ports::ClientTxnIdGenerator;
use credit_gateway::error::PaymentError;
use credit_gateway::infrastructure::codes::IssuerErrorKind;
use credit_gateway::infrastructure::in_memory::response_document;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicU32, Ordering};

#[tokio::test]
async fn test_sale_of_fifty_dollars() {
    let (service, transport) = scripted_service();
    transport.push_response(approved("CreditSale", 1_234_567)).await;

    let charge = service
        .charge(dec!(50.00))
        .with_currency("usd")
        .with_card(visa())
        .with_allow_duplicates(true)
        .execute()
        .await
        .unwrap();

    assert_eq!(charge.transaction_id(), 1_234_567);
    assert_eq!(charge.response_code(), "00");

    let sent = transport.requests().await;
    assert_eq!(sent.len(), 1);
    let block1 = sent[0].request.child("Block1").unwrap();
    assert_eq!(block1.get_string("AllowDup").unwrap(), "Y");
    assert_eq!(block1.get_string("Amt").unwrap(), "50.00");
    assert_eq!(
        block1.at(&["CardData", "TokenRequest"]).unwrap().text_value(),
        Some("N")
    );
    assert_eq!(
        block1
            .at(&["CardData", "ManualEntry", "CardNbr"])
            .unwrap()
            .text_value(),
        Some("4012002000060016")
    );
}

#[tokio::test]
async fn test_card_holder_subset_is_omitted() {
    let (service, transport) = scripted_service();
    transport.push_response(approved("CreditAuth", 9)).await;

    let holder = CardHolder::new().with_name("Ada", "Lovelace").with_address(Address {
        zip: Some("75024".into()),
        ..Address::default()
    });
    service
        .authorize(dec!(10))
        .with_currency("USD")
        .with_card(visa())
        .with_card_holder(holder)
        .execute()
        .await
        .unwrap();

    let sent = transport.requests().await;
    let data = sent[0].request.at(&["Block1", "CardHolderData"]).unwrap();
    let tags: Vec<_> = data.children().iter().map(|c| c.tag()).collect();
    assert_eq!(
        tags,
        ["CardHolderFirstName", "CardHolderLastName", "CardHolderZip"]
    );
}

#[tokio::test]
async fn test_non_usd_currency_never_reaches_gateway() {
    let (service, transport) = scripted_service();
    let err = service
        .charge(dec!(10))
        .with_currency("eur")
        .with_card(visa())
        .execute()
        .await
        .unwrap_err();

    assert!(
        matches!(err, PaymentError::ValidationError(m) if m == "The only supported currency is \"usd\".")
    );
    assert_eq!(transport.request_count().await, 0);
}

#[tokio::test]
async fn test_non_positive_ids_are_invalid_requests() {
    let (service, transport) = scripted_service();

    let results = [
        service.capture(0).execute().await,
        service.edit(-1).execute().await,
        service.void(0).execute().await,
        service.cpc_edit(-5).execute().await,
    ];
    for result in results {
        assert!(matches!(result, Err(PaymentError::InvalidRequestError(_))));
    }
    assert!(matches!(
        service.transaction_details(0).await,
        Err(PaymentError::InvalidRequestError(_))
    ));
    assert_eq!(transport.request_count().await, 0);
}

#[tokio::test]
async fn test_identifier_operations_are_normalized() {
    let (service, transport) = scripted_service();
    transport
        .push_response(issuer_response("CreditAddToBatch", 11, "", ""))
        .await;
    transport
        .push_response(response_document(12, "0", "Success", None, Some(body("CreditVoid", "", ""))))
        .await;
    transport
        .push_response(issuer_response("CreditReturn", 13, "00", "APPROVAL"))
        .await;

    let capture = service.capture(5).execute().await.unwrap();
    let void = service.void(5).execute().await.unwrap();
    let refund = service
        .refund(dec!(5))
        .with_currency("usd")
        .with_transaction_id(5)
        .execute()
        .await
        .unwrap();

    for (response, id) in [(capture, 11), (void, 12), (refund, 13)] {
        assert_eq!(response.transaction_id, id);
        assert_eq!(response.response_code, "00");
        assert_eq!(response.response_text, "");
    }
}

#[tokio::test]
async fn test_issuer_decline_keeps_code_and_text() {
    let (service, transport) = scripted_service();
    transport
        .push_response(issuer_response("CreditSale", 55, "05", "DECLINE"))
        .await;

    let err = service
        .charge(dec!(10))
        .with_currency("usd")
        .with_card(visa())
        .execute()
        .await
        .unwrap_err();

    match err {
        PaymentError::IssuerDeclineError {
            kind,
            code,
            text,
            transaction_id,
            ..
        } => {
            assert_eq!(kind, IssuerErrorKind::CardDeclined);
            assert_eq!(code, "05");
            assert_eq!(text, "DECLINE");
            assert_eq!(transaction_id, 55);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(transport.request_count().await, 1);
}

#[tokio::test]
async fn test_gift_card_activation() {
    let (service, transport) = scripted_service();
    let mut gift = body("GiftCardActivate", "0", "Success");
    Element::sub_text(&mut gift, "AuthCode", "123456");
    Element::sub_text(&mut gift, "BalanceAmt", "25.00");
    transport
        .push_response(response_document(70, "0", "Success", None, Some(gift)))
        .await;

    let activation = service
        .gift_card_activate(dec!(25.00))
        .with_card(GiftCard::Number("5022440000000000098".into()))
        .with_currency("usd")
        .execute()
        .await
        .unwrap();

    assert_eq!(activation.transaction.transaction_id, 70);
    assert_eq!(activation.authorization_code.as_deref(), Some("123456"));
    assert_eq!(activation.balance_amount, Some(dec!(25.00)));
}

struct Sequence(AtomicU32);

impl ClientTxnIdGenerator for Sequence {
    fn next_id(&self) -> String {
        format!("batch-{}", self.0.fetch_add(1, Ordering::SeqCst))
    }
}

#[tokio::test]
async fn test_client_txn_ids_prefer_details_over_generator() {
    let (service, transport) = scripted_service();
    let service = service.with_client_txn_id_generator(Box::new(Sequence(AtomicU32::new(1))));
    transport.push_response(approved("CreditSale", 1)).await;
    transport.push_response(approved("CreditSale", 2)).await;

    service
        .charge(dec!(1))
        .with_currency("usd")
        .with_card(visa())
        .execute()
        .await
        .unwrap();
    service
        .charge(dec!(1))
        .with_currency("usd")
        .with_card(visa())
        .with_details(TransactionDetails::new().with_client_transaction_id("order-42"))
        .execute()
        .await
        .unwrap();

    let ids: Vec<_> = transport
        .requests()
        .await
        .into_iter()
        .map(|r| r.client_txn_id)
        .collect();
    assert_eq!(ids, [Some("batch-1".to_string()), Some("order-42".to_string())]);
}
