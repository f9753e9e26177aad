//! Tithe and offering record domain model

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

/// One offering record as returned by the backend
///
/// Every amount is optional. An absent, `null` or non-numeric value never
/// contributes to a total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    #[serde(default, alias = "_id", deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    // =========================================================================
    // Fixed offering categories
    // =========================================================================
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub thanksgiving: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub welfare: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub community_impact: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub sunday_offering_first_service: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub sunday_offering_second_service: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub sunday_offering_third_service: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub sunday_offering_project_first_service: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub sunday_offering_project_second_service: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub sunday_offering_project_third_service: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub children_service_offering: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub sunday_school: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub mid_week_offering: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount", skip_serializing_if = "Option::is_none")]
    pub friday_prayer_offering: Option<Decimal>,

    // =========================================================================
    // Nested contributions
    // =========================================================================
    /// Individual tithe payers
    #[serde(default, deserialize_with = "lenient::list")]
    pub name_of_those_who_paid: Vec<Payer>,
    /// Special offering events
    #[serde(default, deserialize_with = "lenient::list")]
    pub if_any_special_offering_specify: Vec<SpecialOffering>,
}

/// A named tithe payer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payer {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Option<Decimal>,
}

/// A special offering tied to an event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialOffering {
    #[serde(default, deserialize_with = "lenient::text")]
    pub event: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub amount: Option<Decimal>,
}

/// Anything carrying a single optional amount
pub trait Contribution {
    fn amount(&self) -> Option<Decimal>;
}

impl Contribution for Payer {
    fn amount(&self) -> Option<Decimal> {
        self.amount
    }
}

impl Contribution for SpecialOffering {
    fn amount(&self) -> Option<Decimal> {
        self.amount
    }
}

/// The fixed offering categories, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OfferingField {
    Thanksgiving,
    Welfare,
    CommunityImpact,
    SundayOfferingFirstService,
    SundayOfferingSecondService,
    SundayOfferingThirdService,
    SundayOfferingProjectFirstService,
    SundayOfferingProjectSecondService,
    SundayOfferingProjectThirdService,
    ChildrenServiceOffering,
    SundaySchool,
    MidWeekOffering,
    FridayPrayerOffering,
}

impl OfferingField {
    /// Every category that counts towards a record total
    pub const ALL: [OfferingField; 13] = [
        OfferingField::Thanksgiving,
        OfferingField::Welfare,
        OfferingField::CommunityImpact,
        OfferingField::SundayOfferingFirstService,
        OfferingField::SundayOfferingSecondService,
        OfferingField::SundayOfferingThirdService,
        OfferingField::SundayOfferingProjectFirstService,
        OfferingField::SundayOfferingProjectSecondService,
        OfferingField::SundayOfferingProjectThirdService,
        OfferingField::ChildrenServiceOffering,
        OfferingField::SundaySchool,
        OfferingField::MidWeekOffering,
        OfferingField::FridayPrayerOffering,
    ];

    /// Key used on the wire
    pub fn key(&self) -> &'static str {
        match self {
            OfferingField::Thanksgiving => "thanksgiving",
            OfferingField::Welfare => "welfare",
            OfferingField::CommunityImpact => "communityImpact",
            OfferingField::SundayOfferingFirstService => "sundayOfferingFirstService",
            OfferingField::SundayOfferingSecondService => "sundayOfferingSecondService",
            OfferingField::SundayOfferingThirdService => "sundayOfferingThirdService",
            OfferingField::SundayOfferingProjectFirstService => "sundayOfferingProjectFirstService",
            OfferingField::SundayOfferingProjectSecondService => "sundayOfferingProjectSecondService",
            OfferingField::SundayOfferingProjectThirdService => "sundayOfferingProjectThirdService",
            OfferingField::ChildrenServiceOffering => "childrenServiceOffering",
            OfferingField::SundaySchool => "sundaySchool",
            OfferingField::MidWeekOffering => "midWeekOffering",
            OfferingField::FridayPrayerOffering => "fridayPrayerOffering",
        }
    }

    /// Human-readable name for reports
    pub fn label(&self) -> &'static str {
        match self {
            OfferingField::Thanksgiving => "Thanksgiving",
            OfferingField::Welfare => "Welfare",
            OfferingField::CommunityImpact => "Community Impact",
            OfferingField::SundayOfferingFirstService => "Sunday Offering (1st Service)",
            OfferingField::SundayOfferingSecondService => "Sunday Offering (2nd Service)",
            OfferingField::SundayOfferingThirdService => "Sunday Offering (3rd Service)",
            OfferingField::SundayOfferingProjectFirstService => "Project Offering (1st Service)",
            OfferingField::SundayOfferingProjectSecondService => "Project Offering (2nd Service)",
            OfferingField::SundayOfferingProjectThirdService => "Project Offering (3rd Service)",
            OfferingField::ChildrenServiceOffering => "Children Service",
            OfferingField::SundaySchool => "Sunday School",
            OfferingField::MidWeekOffering => "Mid-week Offering",
            OfferingField::FridayPrayerOffering => "Friday Prayer",
        }
    }
}

impl fmt::Display for OfferingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The two nested contribution lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NestedCollection {
    Payers,
    SpecialOfferings,
}

impl NestedCollection {
    pub const ALL: [NestedCollection; 2] = [NestedCollection::Payers, NestedCollection::SpecialOfferings];

    pub fn key(&self) -> &'static str {
        match self {
            NestedCollection::Payers => "nameOfThoseWhoPaid",
            NestedCollection::SpecialOfferings => "ifAnySpecialOfferingSpecify",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NestedCollection::Payers => "Tithe Payers",
            NestedCollection::SpecialOfferings => "Special Offerings",
        }
    }
}

impl FinancialRecord {
    /// Value of a fixed category, if present
    pub fn amount(&self, field: OfferingField) -> Option<Decimal> {
        match field {
            OfferingField::Thanksgiving => self.thanksgiving,
            OfferingField::Welfare => self.welfare,
            OfferingField::CommunityImpact => self.community_impact,
            OfferingField::SundayOfferingFirstService => self.sunday_offering_first_service,
            OfferingField::SundayOfferingSecondService => self.sunday_offering_second_service,
            OfferingField::SundayOfferingThirdService => self.sunday_offering_third_service,
            OfferingField::SundayOfferingProjectFirstService => self.sunday_offering_project_first_service,
            OfferingField::SundayOfferingProjectSecondService => self.sunday_offering_project_second_service,
            OfferingField::SundayOfferingProjectThirdService => self.sunday_offering_project_third_service,
            OfferingField::ChildrenServiceOffering => self.children_service_offering,
            OfferingField::SundaySchool => self.sunday_school,
            OfferingField::MidWeekOffering => self.mid_week_offering,
            OfferingField::FridayPrayerOffering => self.friday_prayer_offering,
        }
    }

    /// Set a fixed category (used by builders and tests)
    pub fn set_amount(&mut self, field: OfferingField, value: Option<Decimal>) {
        let slot = match field {
            OfferingField::Thanksgiving => &mut self.thanksgiving,
            OfferingField::Welfare => &mut self.welfare,
            OfferingField::CommunityImpact => &mut self.community_impact,
            OfferingField::SundayOfferingFirstService => &mut self.sunday_offering_first_service,
            OfferingField::SundayOfferingSecondService => &mut self.sunday_offering_second_service,
            OfferingField::SundayOfferingThirdService => &mut self.sunday_offering_third_service,
            OfferingField::SundayOfferingProjectFirstService => &mut self.sunday_offering_project_first_service,
            OfferingField::SundayOfferingProjectSecondService => &mut self.sunday_offering_project_second_service,
            OfferingField::SundayOfferingProjectThirdService => &mut self.sunday_offering_project_third_service,
            OfferingField::ChildrenServiceOffering => &mut self.children_service_offering,
            OfferingField::SundaySchool => &mut self.sunday_school,
            OfferingField::MidWeekOffering => &mut self.mid_week_offering,
            OfferingField::FridayPrayerOffering => &mut self.friday_prayer_offering,
        };
        *slot = value;
    }

    /// Amounts of one nested list, in stored order
    pub fn contributions(&self, collection: NestedCollection) -> Vec<Option<Decimal>> {
        match collection {
            NestedCollection::Payers => self.name_of_those_who_paid.iter().map(Contribution::amount).collect(),
            NestedCollection::SpecialOfferings => self
                .if_any_special_offering_specify
                .iter()
                .map(Contribution::amount)
                .collect(),
        }
    }
}
