//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults, so
//! tests specify only the fields they care about.

use chrono::NaiveDate;
use core_kernel::{Currency, Money, PracticeId};
use domain_claims::{ClaimAttributes, UnderwritingConfig};
use domain_payments::SimulatedProvider;
use fake::faker::name::en::Name;
use fake::Fake;
use funding_service::FundingService;

use crate::fixtures::{DateFixtures, MoneyFixtures, StringFixtures};

/// Builder for claim submission attributes
pub struct ClaimAttributesBuilder {
    practice_id: PracticeId,
    patient_name: Option<String>,
    payer: String,
    procedure_date: NaiveDate,
    billed_amount: Money,
    expected_amount: Money,
}

impl Default for ClaimAttributesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimAttributesBuilder {
    /// Creates a builder with a random practice and patient, the fixture
    /// payer, and the canonical small-claim amounts
    pub fn new() -> Self {
        let billed = MoneyFixtures::usd_small_claim();
        Self {
            practice_id: PracticeId::new(),
            patient_name: Some(Name().fake()),
            payer: StringFixtures::payer().to_string(),
            procedure_date: DateFixtures::procedure_date(),
            billed_amount: billed,
            expected_amount: Money::from_minor(billed.to_minor() * 8 / 10, billed.currency()),
        }
    }

    pub fn with_practice(mut self, practice_id: PracticeId) -> Self {
        self.practice_id = practice_id;
        self
    }

    pub fn with_patient(mut self, patient_name: Option<String>) -> Self {
        self.patient_name = patient_name;
        self
    }

    pub fn with_payer(mut self, payer: impl Into<String>) -> Self {
        self.payer = payer.into();
        self
    }

    pub fn with_procedure_date(mut self, date: NaiveDate) -> Self {
        self.procedure_date = date;
        self
    }

    /// Sets billed in minor units and derives expected at 80%
    pub fn with_billed_minor(mut self, billed_minor: i64) -> Self {
        let currency = self.billed_amount.currency();
        self.billed_amount = Money::from_minor(billed_minor, currency);
        self.expected_amount = Money::from_minor(billed_minor * 8 / 10, currency);
        self
    }

    pub fn with_expected(mut self, expected: Money) -> Self {
        self.expected_amount = expected;
        self
    }

    pub fn build(self) -> ClaimAttributes {
        ClaimAttributes {
            practice_id: self.practice_id,
            patient_name: self.patient_name,
            payer: self.payer,
            procedure_date: self.procedure_date,
            billed_amount: self.billed_amount,
            expected_amount: self.expected_amount,
        }
    }
}

/// Builder for a funding service wired with the simulated provider
pub struct TestServiceBuilder {
    currency: Currency,
    underwriting: UnderwritingConfig,
    seed: Option<Money>,
    failing: Option<(String, String)>,
}

impl Default for TestServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestServiceBuilder {
    /// USD service seeded with the fixture capital amount
    pub fn new() -> Self {
        Self {
            currency: Currency::USD,
            underwriting: UnderwritingConfig::default(),
            seed: Some(MoneyFixtures::usd_seed()),
            failing: None,
        }
    }

    pub fn with_underwriting(mut self, underwriting: UnderwritingConfig) -> Self {
        self.underwriting = underwriting;
        self
    }

    pub fn with_seed(mut self, seed: Option<Money>) -> Self {
        self.seed = seed;
        self
    }

    /// Makes the provider fail every disbursement
    pub fn with_failing_provider(
        mut self,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.failing = Some((code.into(), message.into()));
        self
    }

    pub fn build(self) -> FundingService {
        let provider = match self.failing {
            Some((code, message)) => Box::new(SimulatedProvider::failing(code, message)),
            None => Box::new(SimulatedProvider::new()),
        };
        let mut service = FundingService::new(self.currency, self.underwriting, provider);
        if let Some(seed) = self.seed {
            service
                .seed_capital(seed, "fixture")
                .expect("fixture seed posts on an empty ledger");
        }
        service
    }
}
