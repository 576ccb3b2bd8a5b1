//! Shipment data model and its JSON mapping.
//!
//! Keys follow the API contract (snake_case). Optional fields are left out of
//! the encoded body when unset: the API bills a paid option as soon as its key
//! is present, even with a zero value.

use crate::ApiTime;
use serde::{Deserialize, Deserializer, Serialize};

/// A postal address, used for both the recipient and the sender.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// ISO 3166-1 alpha-2 country code, e.g. `NL`.
    pub cc: String,
    /// Region, department, state or province.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub city: String,
    /// Street name. International addresses may carry the house number here.
    pub street: String,
    /// House number. Required for domestic NL and BE shipments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Required for NL and EU destinations, except IE.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// Person at this address, at most 40 characters.
    pub person: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Address {
    /// Create an address with the fields every destination requires.
    pub fn new(
        cc: impl Into<String>,
        city: impl Into<String>,
        street: impl Into<String>,
        person: impl Into<String>,
    ) -> Self {
        Self {
            cc: cc.into(),
            city: city.into(),
            street: street.into(),
            person: person.into(),
            ..Self::default()
        }
    }

    /// Set the house number.
    pub fn number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    /// Set the postal code.
    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    /// Set the region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the phone number.
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the email address.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Insurance currency. The API currently accepts euros only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    #[default]
    Eur,
    /// A code this client does not know yet.
    Other(String),
}

impl Currency {
    /// ISO 4217 code as sent on the wire.
    pub fn code(&self) -> &str {
        match self {
            Self::Eur => "EUR",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for Currency {
    fn from(code: String) -> Self {
        match code.as_str() {
            "EUR" => Self::Eur,
            _ => Self::Other(code),
        }
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        match value {
            Currency::Eur => "EUR".to_string(),
            Currency::Other(code) => code,
        }
    }
}

/// Insured value of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insurance {
    /// Amount in cents, without decimal separators.
    pub amount: u64,
    pub currency: Currency,
}

impl Insurance {
    /// Insure for `cents` euro cents.
    pub const fn eur(cents: u64) -> Self {
        Self {
            amount: cents,
            currency: Currency::Eur,
        }
    }
}

/// Package type of a shipment.
///
/// Only [`PackageType::Package`] supports additional options; the others are
/// priced without them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum PackageType {
    /// Standard package for NL, EU and global shipments.
    #[default]
    Package,
    /// Fits through a mailbox. MyParcel.nl only, NL destinations.
    Mailbox,
    /// Unpaid letter; postage is settled at the post office.
    Letter,
    /// Weight-priced stamp. MyParcel.nl only, NL destinations.
    DigitalStamp,
    /// A code this client does not know yet.
    Other(u32),
}

impl PackageType {
    /// Whether options such as insurance or signature may be added.
    pub const fn allows_additional_options(self) -> bool {
        !matches!(self, Self::Mailbox | Self::Letter | Self::DigitalStamp)
    }
}

impl From<u32> for PackageType {
    fn from(code: u32) -> Self {
        match code {
            1 => Self::Package,
            2 => Self::Mailbox,
            3 => Self::Letter,
            4 => Self::DigitalStamp,
            other => Self::Other(other),
        }
    }
}

impl From<PackageType> for u32 {
    fn from(value: PackageType) -> Self {
        match value {
            PackageType::Package => 1,
            PackageType::Mailbox => 2,
            PackageType::Letter => 3,
            PackageType::DigitalStamp => 4,
            PackageType::Other(code) => code,
        }
    }
}

/// Delivery moment. Only meaningful together with a delivery date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum DeliveryType {
    Morning,
    Standard,
    Evening,
    /// Delivery to a pickup point.
    Pickup,
    Other(u32),
}

impl From<u32> for DeliveryType {
    fn from(code: u32) -> Self {
        match code {
            1 => Self::Morning,
            2 => Self::Standard,
            3 => Self::Evening,
            4 => Self::Pickup,
            other => Self::Other(other),
        }
    }
}

impl From<DeliveryType> for u32 {
    fn from(value: DeliveryType) -> Self {
        match value {
            DeliveryType::Morning => 1,
            DeliveryType::Standard => 2,
            DeliveryType::Evening => 3,
            DeliveryType::Pickup => 4,
            DeliveryType::Other(code) => code,
        }
    }
}

/// The national storefronts through which the API is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Storefront {
    /// MyParcel.nl
    MyParcelNl,
    /// SendMyParcel.be
    SendMyParcelBe,
}

/// Carrier that transports a shipment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum Carrier {
    #[default]
    PostNl,
    Bpost,
    /// Pallet transport.
    CheapCargo,
    Dpd,
    Instabox,
    Ups,
    Other(u32),
}

impl Carrier {
    /// Storefronts that offer this carrier.
    ///
    /// Informational only: the client does not reject a carrier on the
    /// wrong storefront, the API does.
    pub const fn storefronts(self) -> &'static [Storefront] {
        match self {
            Self::Bpost | Self::Dpd => &[Storefront::SendMyParcelBe],
            Self::Instabox | Self::Ups => &[Storefront::MyParcelNl],
            Self::PostNl | Self::CheapCargo | Self::Other(_) => {
                &[Storefront::MyParcelNl, Storefront::SendMyParcelBe]
            }
        }
    }

    /// Whether `storefront` offers this carrier.
    pub fn is_available_on(self, storefront: Storefront) -> bool {
        self.storefronts().contains(&storefront)
    }
}

impl From<u32> for Carrier {
    fn from(code: u32) -> Self {
        match code {
            1 => Self::PostNl,
            2 => Self::Bpost,
            3 => Self::CheapCargo,
            4 => Self::Dpd,
            5 => Self::Instabox,
            8 => Self::Ups,
            other => Self::Other(other),
        }
    }
}

impl From<Carrier> for u32 {
    fn from(value: Carrier) -> Self {
        match value {
            Carrier::PostNl => 1,
            Carrier::Bpost => 2,
            Carrier::CheapCargo => 3,
            Carrier::Dpd => 4,
            Carrier::Instabox => 5,
            Carrier::Ups => 8,
            Carrier::Other(code) => code,
        }
    }
}

/// Shipment options.
///
/// Flags are sent as `1` when set and left out otherwise. `delivery_date` is
/// always sent, as `null` when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub package_type: PackageType,
    /// Deliver to the recipient only.
    #[serde(with = "flag", skip_serializing_if = "is_false")]
    pub only_recipient: bool,
    /// Required when `delivery_date` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_type: Option<DeliveryType>,
    /// Required when `delivery_type` is set.
    pub delivery_date: ApiTime,
    /// Package must be signed for.
    #[serde(with = "flag", skip_serializing_if = "is_false")]
    pub signature: bool,
    /// Return the package if the recipient is not home.
    #[serde(rename = "return", with = "flag", skip_serializing_if = "is_false")]
    pub return_if_absent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance: Option<Insurance>,
    #[serde(with = "flag", skip_serializing_if = "is_false")]
    pub large_format: bool,
    /// Printed on the label. Replaced by the return code on return shipments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_description: Option<String>,
    /// Recipient signs and must be 18 or older.
    #[serde(with = "flag", skip_serializing_if = "is_false")]
    pub age_check: bool,
}

impl Options {
    /// Options for `package_type` with nothing else set.
    pub fn new(package_type: PackageType) -> Self {
        Self {
            package_type,
            ..Self::default()
        }
    }

    /// Names of the billable options that are set, in wire-key form.
    pub fn paid_options(&self) -> Vec<&'static str> {
        let mut set = Vec::new();
        if self.only_recipient {
            set.push("only_recipient");
        }
        if self.delivery_type.is_some() {
            set.push("delivery_type");
        }
        if !self.delivery_date.is_zero() {
            set.push("delivery_date");
        }
        if self.signature {
            set.push("signature");
        }
        if self.return_if_absent {
            set.push("return");
        }
        if self.insurance.is_some() {
            set.push("insurance");
        }
        if self.large_format {
            set.push("large_format");
        }
        if self.age_check {
            set.push("age_check");
        }
        set
    }
}

/// How a shipment takes part in a multi-collo delivery: several packages
/// delivered to one address at the same time.
///
/// Maps onto the `secondary_shipments` and `multi_collo_main_shipment_id`
/// keys of a shipment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MultiColloFields", into = "MultiColloFields")]
pub enum MultiCollo {
    /// A single package.
    #[default]
    Standalone,
    /// The main shipment, with one entry per extra package.
    Main { secondaries: Vec<SecondaryShipment> },
    /// An extra package belonging to the given main shipment.
    Child { main_shipment_id: u64 },
}

impl MultiCollo {
    /// A main shipment with `count` extra packages that copy all of its data.
    pub fn copies(count: usize) -> Self {
        Self::Main {
            secondaries: vec![SecondaryShipment::default(); count],
        }
    }
}

#[derive(Default, Serialize, Deserialize)]
struct MultiColloFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    secondary_shipments: Option<Vec<SecondaryShipment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    multi_collo_main_shipment_id: Option<u64>,
}

impl From<MultiColloFields> for MultiCollo {
    fn from(fields: MultiColloFields) -> Self {
        if let Some(main_shipment_id) = fields.multi_collo_main_shipment_id {
            return Self::Child { main_shipment_id };
        }
        match fields.secondary_shipments {
            Some(secondaries) if !secondaries.is_empty() => Self::Main { secondaries },
            _ => Self::Standalone,
        }
    }
}

impl From<MultiCollo> for MultiColloFields {
    fn from(value: MultiCollo) -> Self {
        match value {
            MultiCollo::Standalone => Self::default(),
            MultiCollo::Main { secondaries } if secondaries.is_empty() => Self::default(),
            MultiCollo::Main { secondaries } => Self {
                secondary_shipments: Some(secondaries),
                multi_collo_main_shipment_id: None,
            },
            MultiCollo::Child { main_shipment_id } => Self {
                secondary_shipments: None,
                multi_collo_main_shipment_id: Some(main_shipment_id),
            },
        }
    }
}

/// An extra package of a multi-collo shipment.
///
/// Unset fields are copied from the main shipment by the API, so the default
/// value encodes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryShipment {
    /// Assigned by the API.
    #[serde(skip_serializing)]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Options>,
}

/// One parcel to be sent.
///
/// The same type is used to create shipments and to read them back. Fields
/// the API assigns (`id`, `barcode`, `created`, `modified`) are never encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    /// Assigned by the API.
    #[serde(default, skip_serializing)]
    pub id: Option<u64>,
    /// Free-form reference chosen by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_identifier: Option<String>,
    pub recipient: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Address>,
    #[serde(default)]
    pub options: Options,
    #[serde(default)]
    pub carrier: Carrier,
    /// Assigned by the API.
    #[serde(default, skip_serializing)]
    pub barcode: Option<String>,
    #[serde(flatten)]
    pub multi_collo: MultiCollo,
    /// Assigned by the API.
    #[serde(default, skip_serializing)]
    pub created: ApiTime,
    /// Assigned by the API.
    #[serde(default, skip_serializing)]
    pub modified: ApiTime,
}

impl Shipment {
    /// A standard package for `recipient` carried by `carrier`.
    pub fn new(recipient: Address, carrier: Carrier) -> Self {
        Self {
            recipient,
            carrier,
            ..Self::default()
        }
    }

    /// Set the caller's reference.
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_identifier = Some(reference.into());
        self
    }

    /// Set the sender address.
    pub fn sender(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Replace the options.
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set the multi-collo linkage.
    pub fn multi_collo(mut self, multi_collo: MultiCollo) -> Self {
        self.multi_collo = multi_collo;
        self
    }
}

/// Id the API assigned to a newly created shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedShipment {
    pub id: u64,
    /// Echo of the caller's reference, if one was sent.
    #[serde(default)]
    pub reference_identifier: Option<String>,
}

/// Shipments returned by a fetch call.
///
/// Both keys are required: a body without them is not a fetch answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    pub shipments: Vec<Shipment>,
    /// Number of results reported by the API.
    pub results: u64,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Integer-encoded boolean flags. Decoding also accepts JSON booleans and
/// `null`.
mod flag {
    use super::{Deserialize, Deserializer};
    use serde::Serializer;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Bool(value)) => value,
            Some(Raw::Int(value)) => value != 0,
            None => false,
        })
    }
}
