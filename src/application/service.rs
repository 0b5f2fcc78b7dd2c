use super::builders::{
    AuthorizationBuilder, CaptureBuilder, CpcEditBuilder, EditBuilder, GiftCardActivateBuilder,
    RefundBuilder, ReverseBuilder, VerifyBuilder, VoidBuilder,
};
use super::classifier::{Disposition, Timeout, classify, compensable_amount, resolve};
use crate::config::ServicesConfig;
use crate::domain::currency::SUPPORTED_CURRENCY;
use crate::domain::element::{Element, ElementTree};
use crate::domain::ports::{ClientTxnIdGeneratorBox, TransportBox};
use crate::domain::response::{ReportTransactionDetails, ReportTransactionSummary};
use crate::domain::transaction::{TransactionKind, TransactionType};
use crate::error::{PaymentError, Result};
use crate::infrastructure::xml::to_xml;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

const REPORT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Entry point for every credit operation.
///
/// `CreditService` owns the transport and the validated configuration. It is
/// read-only after construction, so one instance can serve any number of
/// sequential calls.
pub struct CreditService {
    config: ServicesConfig,
    transport: TransportBox,
    id_generator: Option<ClientTxnIdGeneratorBox>,
}

impl CreditService {
    /// Creates a new `CreditService`, validating `config` first.
    pub fn new(config: ServicesConfig, transport: TransportBox) -> Result<Self> {
        Ok(Self {
            config: config.validate()?,
            transport,
            id_generator: None,
        })
    }

    /// Supplies client transaction ids for requests whose details carry none.
    pub fn with_client_txn_id_generator(mut self, generator: ClientTxnIdGeneratorBox) -> Self {
        self.id_generator = Some(generator);
        self
    }

    pub fn config(&self) -> &ServicesConfig {
        &self.config
    }

    pub fn charge(&self, amount: impl Into<Option<Decimal>>) -> AuthorizationBuilder<'_> {
        AuthorizationBuilder::new(self, TransactionKind::CreditSale, amount.into())
    }

    pub fn authorize(&self, amount: impl Into<Option<Decimal>>) -> AuthorizationBuilder<'_> {
        AuthorizationBuilder::new(self, TransactionKind::CreditAuth, amount.into())
    }

    pub fn verify(&self) -> VerifyBuilder<'_> {
        VerifyBuilder::new(self)
    }

    pub fn capture(&self, transaction_id: i64) -> CaptureBuilder<'_> {
        CaptureBuilder::new(self, transaction_id)
    }

    pub fn refund(&self, amount: impl Into<Option<Decimal>>) -> RefundBuilder<'_> {
        RefundBuilder::new(self, amount.into())
    }

    pub fn reverse(&self, amount: impl Into<Option<Decimal>>) -> ReverseBuilder<'_> {
        ReverseBuilder::new(self, amount.into())
    }

    pub fn edit(&self, transaction_id: i64) -> EditBuilder<'_> {
        EditBuilder::new(self, transaction_id)
    }

    pub fn void(&self, transaction_id: i64) -> VoidBuilder<'_> {
        VoidBuilder::new(self, transaction_id)
    }

    pub fn cpc_edit(&self, transaction_id: i64) -> CpcEditBuilder<'_> {
        CpcEditBuilder::new(self, transaction_id)
    }

    pub fn gift_card_activate(&self, amount: impl Into<Option<Decimal>>) -> GiftCardActivateBuilder<'_> {
        GiftCardActivateBuilder::new(self, amount.into())
    }

    pub async fn transaction_details(&self, transaction_id: i64) -> Result<ReportTransactionDetails> {
        if transaction_id <= 0 {
            return Err(PaymentError::InvalidRequestError(
                "Invalid transaction id.".to_string(),
            ));
        }
        let mut request = Element::new(TransactionKind::ReportTxnDetail.tag());
        Element::sub_text(&mut request, "TxnId", transaction_id.to_string());

        let response = self
            .submit(request, TransactionKind::ReportTxnDetail, None)
            .await?;
        Ok(ReportTransactionDetails::from_tree(&response)?)
    }

    /// Lists activity between `start` and `end`, optionally keeping only one
    /// transaction type.
    pub async fn list_transactions(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: Option<TransactionType>,
    ) -> Result<Vec<ReportTransactionSummary>> {
        let now = Utc::now();
        if start > now {
            return Err(PaymentError::InvalidRequestError(
                "Start Date cannot be in the future.".to_string(),
            ));
        }
        if end > now {
            return Err(PaymentError::InvalidRequestError(
                "End Date cannot be in the future.".to_string(),
            ));
        }

        let mut request = Element::new(TransactionKind::ReportActivity.tag());
        Element::sub_text(
            &mut request,
            "RptStartUtcDT",
            start.format(REPORT_DATE_FORMAT).to_string(),
        );
        Element::sub_text(
            &mut request,
            "RptEndUtcDT",
            end.format(REPORT_DATE_FORMAT).to_string(),
        );

        let response = self
            .submit(request, TransactionKind::ReportActivity, None)
            .await?;
        Ok(ReportTransactionSummary::list_from_tree(&response, filter)?)
    }

    /// Full request document as it would go over the wire, credentials
    /// included.
    pub fn render(&self, request: &Element, client_txn_id: Option<&str>) -> Result<String> {
        Ok(to_xml(&self.envelope(request, client_txn_id))?)
    }

    fn envelope(&self, request: &Element, client_txn_id: Option<&str>) -> Element {
        let config = &self.config;
        let mut root = Element::new("PosRequest");
        let version = Element::sub_element(&mut root, "Ver1.0");

        let header = Element::sub_element(version, "Header");
        match &config.secret_api_key {
            Some(key) => Element::sub_text(header, "SecretAPIKey", key.as_str()),
            None => {
                Element::sub_text_opt(header, "UserName", config.user_name.as_deref());
                Element::sub_text_opt(header, "Password", config.password.as_deref());
                Element::sub_text_opt(header, "SiteId", config.site_id);
                Element::sub_text_opt(header, "DeviceId", config.device_id);
                Element::sub_text_opt(header, "LicenseId", config.license_id);
            }
        }
        Element::sub_text_opt(header, "DeveloperID", config.developer_id.as_deref());
        Element::sub_text_opt(header, "VersionNbr", config.version_number.as_deref());
        Element::sub_text_opt(header, "SiteTrace", config.site_trace.as_deref());
        Element::sub_text_opt(header, "ClientTxnId", client_txn_id);

        Element::sub_element(version, "Transaction").append(request.clone());
        root
    }

    fn client_txn_id(&self, supplied: Option<String>) -> Option<String> {
        supplied.or_else(|| self.id_generator.as_ref().map(|g| g.next_id()))
    }

    async fn send(
        &self,
        request: &Element,
        kind: TransactionKind,
        client_txn_id: Option<&str>,
    ) -> Result<ElementTree> {
        debug!(%kind, client_txn_id, "submitting transaction");
        let response = self.transport.submit(request, client_txn_id).await?;
        Ok(response)
    }

    /// Submits `request` and classifies the response, compensating a timeout
    /// on a sale or authorization with exactly one reversal.
    pub(crate) async fn submit(
        &self,
        request: Element,
        kind: TransactionKind,
        client_txn_id: Option<String>,
    ) -> Result<ElementTree> {
        let client_txn_id = self.client_txn_id(client_txn_id);
        let response = self.send(&request, kind, client_txn_id.as_deref()).await?;
        let classified = classify(&response, kind)?;

        let outcome = match classified.disposition {
            Disposition::Settled(outcome) => outcome,
            Disposition::Compensate(timeout) => {
                let amount = compensable_amount(&request, kind);
                let reversal = self.compensate(&timeout, amount).await;
                resolve(timeout, reversal)?
            }
        };

        if !outcome.is_success() {
            info!(%kind, transaction_id = classified.transaction_id, ?outcome, "transaction failed");
        }
        outcome.into_result(classified.transaction_id)?;
        Ok(response)
    }

    /// Submission path for reversals. A timeout here is reported as-is and
    /// never triggers another reversal.
    pub(crate) async fn submit_reversal(
        &self,
        request: Element,
        client_txn_id: Option<String>,
    ) -> Result<ElementTree> {
        let kind = TransactionKind::CreditReversal;
        let client_txn_id = self.client_txn_id(client_txn_id);
        let response = self.send(&request, kind, client_txn_id.as_deref()).await?;
        let classified = classify(&response, kind)?;

        let outcome = match classified.disposition {
            Disposition::Settled(outcome) => outcome,
            Disposition::Compensate(timeout) => timeout.uncompensated(),
        };
        outcome.into_result(classified.transaction_id)?;
        Ok(response)
    }

    async fn compensate(&self, timeout: &Timeout, amount: Option<Decimal>) -> Result<()> {
        warn!(
            transaction_id = timeout.transaction_id,
            code = %timeout.code,
            origin = ?timeout.origin,
            "timeout left the transaction unresolved, reversing"
        );
        let reversal = self
            .reverse(amount)
            .with_currency(SUPPORTED_CURRENCY)
            .with_transaction_id(timeout.transaction_id)
            .execute()
            .await;
        match reversal {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(transaction_id = timeout.transaction_id, error = %e, "compensating reversal failed");
                Err(e)
            }
        }
    }
}
