/// Manually entered credit card.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditCard {
    pub number: String,
    pub exp_month: u32,
    pub exp_year: u32,
    pub cvv: Option<String>,
    pub encryption_data: Option<EncryptionData>,
}

impl CreditCard {
    pub fn new(number: impl Into<String>, exp_month: u32, exp_year: u32) -> Self {
        Self {
            number: number.into(),
            exp_month,
            exp_year,
            cvv: None,
            encryption_data: None,
        }
    }

    pub fn with_cvv(mut self, cvv: impl Into<String>) -> Self {
        self.cvv = Some(cvv.into());
        self
    }

    pub fn with_encryption_data(mut self, data: EncryptionData) -> Self {
        self.encryption_data = Some(data);
        self
    }
}

/// End-to-end encryption parameters for card data captured by a secure reader.
///
/// `version` names the encryption method and is the only required field.
#[derive(Debug, Clone, PartialEq)]
pub struct EncryptionData {
    pub version: String,
    pub encrypted_track_number: Option<String>,
    pub ktb: Option<String>,
    pub ksn: Option<String>,
}

impl EncryptionData {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            encrypted_track_number: None,
            ktb: None,
            ksn: None,
        }
    }

    pub fn with_track_number(mut self, track: impl Into<String>) -> Self {
        self.encrypted_track_number = Some(track.into());
        self
    }

    pub fn with_ktb(mut self, ktb: impl Into<String>) -> Self {
        self.ktb = Some(ktb.into());
        self
    }

    pub fn with_ksn(mut self, ksn: impl Into<String>) -> Self {
        self.ksn = Some(ksn.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Address {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// Card-holder details used for AVS. Every field is optional.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CardHolder {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<Address>,
}

impl CardHolder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }
}

/// Gift card identified by exactly one of its number, raw track or a token.
#[derive(Debug, Clone, PartialEq)]
pub enum GiftCard {
    Number(String),
    TrackData(String),
    Token(String),
}
