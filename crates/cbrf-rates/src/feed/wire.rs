//! Serde mirror of the provider's XML documents.
//!
//! Daily feed (`XML_daily.asp`):
//!
//! ```xml
//! <ValCurs Date="02.03.2002" name="Foreign Currency Market">
//!   <Valute ID="R01010">
//!     <NumCode>036</NumCode>
//!     <CharCode>AUD</CharCode>
//!     <Nominal>1</Nominal>
//!     <Name>Australian Dollar</Name>
//!     <Value>16,0102</Value>
//!   </Valute>
//! </ValCurs>
//! ```
//!
//! Historical feed (`XML_dynamic.asp`):
//!
//! ```xml
//! <ValCurs ID="R01235" DateRange1="01.01.2021" DateRange2="07.01.2021">
//!   <Record Date="01.01.2021" Id="R01235">
//!     <Nominal>1</Nominal>
//!     <Value>73,8757</Value>
//!   </Record>
//! </ValCurs>
//! ```
//!
//! Every numeric field is kept as text here; normalization happens in the parser.

use serde::Deserialize;

/// Root element name shared by both documents.
pub(crate) const ROOT_ELEMENT: &[u8] = b"ValCurs";

#[derive(Debug, Deserialize)]
pub(crate) struct DailyDocument {
    #[serde(rename = "@Date", default)]
    pub date: Option<String>,

    #[serde(rename = "Valute", default)]
    pub entries: Vec<ValuteEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValuteEntry {
    #[serde(rename = "@ID", default)]
    pub id: String,

    #[serde(rename = "NumCode", default)]
    pub num_code: String,

    #[serde(rename = "CharCode")]
    pub char_code: String,

    #[serde(rename = "Nominal")]
    pub nominal: String,

    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DynamicDocument {
    #[serde(rename = "Record", default)]
    pub records: Vec<DynamicRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DynamicRecord {
    #[serde(rename = "@Date")]
    pub date: String,

    #[serde(rename = "Nominal", default)]
    pub nominal: Option<String>,

    #[serde(rename = "Value")]
    pub value: String,
}
