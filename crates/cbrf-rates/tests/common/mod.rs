//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cbrf_rates::{CacheStore, CbrfRates, MemoryCache, RatesConfig, RatesError, Transport};

pub const DAILY_URL: &str = "http://cbr.test/scripts/XML_daily.asp";
pub const DYNAMIC_URL: &str = "http://cbr.test/scripts/XML_dynamic.asp";

pub const DAILY_2021_01_01: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ValCurs Date="01.01.2021" name="Foreign Currency Market">
    <Valute ID="R01010">
        <NumCode>036</NumCode>
        <CharCode>AUD</CharCode>
        <Nominal>1</Nominal>
        <Name>Australian Dollar</Name>
        <Value>56,9359</Value>
    </Valute>
    <Valute ID="R01235">
        <NumCode>840</NumCode>
        <CharCode>USD</CharCode>
        <Nominal>1</Nominal>
        <Name>US Dollar</Name>
        <Value>75,50</Value>
    </Valute>
    <Valute ID="R01239">
        <NumCode>978</NumCode>
        <CharCode>EUR</CharCode>
        <Nominal>1</Nominal>
        <Name>Euro</Name>
        <Value>90,6824</Value>
    </Valute>
    <Valute ID="R01375">
        <NumCode>156</NumCode>
        <CharCode>CNY</CharCode>
        <Nominal>10</Nominal>
        <Name>Chinese Yuan</Name>
        <Value>113,0790</Value>
    </Valute>
    <Valute ID="R01820">
        <NumCode>392</NumCode>
        <CharCode>JPY</CharCode>
        <Nominal>100</Nominal>
        <Name>Japanese Yen</Name>
        <Value>71,4092</Value>
    </Valute>
</ValCurs>"#;

pub const DAILY_LATEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ValCurs Date="15.01.2021" name="Foreign Currency Market">
    <Valute ID="R01235">
        <NumCode>840</NumCode>
        <CharCode>USD</CharCode>
        <Nominal>1</Nominal>
        <Name>US Dollar</Name>
        <Value>73,5264</Value>
    </Valute>
    <Valute ID="R01239">
        <NumCode>978</NumCode>
        <CharCode>EUR</CharCode>
        <Nominal>1</Nominal>
        <Name>Euro</Name>
        <Value>89,4282</Value>
    </Valute>
</ValCurs>"#;

pub const DYNAMIC_USD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ValCurs ID="R01235" DateRange1="01.01.2021" DateRange2="14.01.2021" name="Foreign Currency Market Dynamic">
    <Record Date="12.01.2021" Id="R01235"><Nominal>1</Nominal><Value>74,5962</Value></Record>
    <Record Date="13.01.2021" Id="R01235"><Nominal>1</Nominal><Value>73,7135</Value></Record>
    <Record Date="14.01.2021" Id="R01235"><Nominal>1</Nominal><Value>73,5081</Value></Record>
</ValCurs>"#;

pub const DYNAMIC_EUR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ValCurs ID="R01239" DateRange1="01.01.2021" DateRange2="14.01.2021" name="Foreign Currency Market Dynamic">
    <Record Date="12.01.2021" Id="R01239"><Nominal>1</Nominal><Value>91,3764</Value></Record>
    <Record Date="14.01.2021" Id="R01239"><Nominal>1</Nominal><Value>89,7981</Value></Record>
</ValCurs>"#;

pub fn daily_url(date_req: &str) -> String {
    format!("{}?date_req={}", DAILY_URL, date_req)
}

pub fn dynamic_url(from: &str, to: &str, id: &str) -> String {
    format!(
        "{}?date_req1={}&date_req2={}&VAL_NM_RQ={}",
        DYNAMIC_URL, from, to, id
    )
}

/// Transport serving canned bodies by exact URL and recording every call.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, Vec<u8>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, url: impl Into<String>, body: impl AsRef<[u8]>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.into(), body.as_ref().to_vec());
        self
    }

    /// Replace the body served for `url` mid-test.
    pub fn serve(&self, url: impl Into<String>, body: impl AsRef<[u8]>) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.into(), body.as_ref().to_vec());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| called.as_str() == url)
            .count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn fetch(&self, url: &str) -> cbrf_rates::Result<Vec<u8>> {
        self.calls.lock().unwrap().push(url.to_string());
        self.routes
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| RatesError::Transport {
                url: url.to_string(),
                message: "HTTP 404 Not Found".to_string(),
            })
    }
}

pub fn test_config() -> RatesConfig {
    RatesConfig {
        daily_url: DAILY_URL.to_string(),
        dynamic_url: DYNAMIC_URL.to_string(),
        ..RatesConfig::default()
    }
}

/// The standard fixture: the 2021-01-01 table, the latest table and two series.
pub fn standard_transport() -> FakeTransport {
    FakeTransport::new()
        .route(daily_url("01/01/2021"), DAILY_2021_01_01)
        .route(DAILY_URL, DAILY_LATEST)
        .route(dynamic_url("12/01/2021", "14/01/2021", "R01235"), DYNAMIC_USD)
        .route(dynamic_url("12/01/2021", "14/01/2021", "R01239"), DYNAMIC_EUR)
}

pub fn client_with(transport: Arc<FakeTransport>) -> CbrfRates {
    client_with_cache(transport, Arc::new(MemoryCache::new()))
}

pub fn client_with_cache(transport: Arc<FakeTransport>, cache: Arc<dyn CacheStore>) -> CbrfRates {
    CbrfRates::with_capabilities(test_config(), transport, cache)
}
