//! Type-safe step and field identifiers for the order wizard
//!
//! Steps and contact fields are closed sets, so they are modelled as enums
//! with strum derives instead of bare integers and strings.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Wizard steps in the order they are presented.
///
/// # Step Flow
///
/// ```text
/// TradePointSelection -> TariffSelection -> SpeedAndOptions -> ContactInfo -> Confirmation
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(Display, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum WizardStep {
    #[default]
    TradePointSelection = 1,
    TariffSelection = 2,
    SpeedAndOptions = 3,
    ContactInfo = 4,
    Confirmation = 5,
}

impl WizardStep {
    /// Total number of steps.
    pub const TOTAL_STEPS: u8 = 5;

    /// First step of every session.
    pub const FIRST: Self = Self::TradePointSelection;

    /// Last step; advancing from here submits the order.
    pub const LAST: Self = Self::Confirmation;

    /// Step number (1-indexed, as displayed).
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Look up a step by its 1-indexed number.
    ///
    /// Returns `None` for numbers outside `1..=TOTAL_STEPS`.
    pub fn from_number(n: i64) -> Option<Self> {
        Self::iter().find(|step| i64::from(step.number()) == n)
    }

    /// The following step, or `None` at confirmation.
    pub fn next(self) -> Option<Self> {
        Self::from_number(i64::from(self.number()) + 1)
    }

    /// The preceding step, or `None` at the first step.
    pub fn previous(self) -> Option<Self> {
        Self::from_number(i64::from(self.number()) - 1)
    }

    /// Screen title shown in the header.
    pub const fn title(self) -> &'static str {
        match self {
            Self::TradePointSelection => "Выбор точки",
            Self::TariffSelection => "Выбор тарифа",
            Self::SpeedAndOptions => "Скорость и опции",
            Self::ContactInfo => "Ваши данные",
            Self::Confirmation => "Подтверждение",
        }
    }

    /// Progress through the wizard as a percentage.
    pub const fn progress_percent(self) -> u16 {
        (self.number() as u16 * 100) / Self::TOTAL_STEPS as u16
    }

    /// Whether this step is the final confirmation.
    #[inline]
    pub const fn is_last(self) -> bool {
        matches!(self, Self::Confirmation)
    }
}

/// Fields of the contact form on the `ContactInfo` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Display, EnumString, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Phone,
    Email,
    City,
    Street,
    House,
    Apartment,
}

impl ContactField {
    /// Whether the field must be filled before leaving the contact step.
    #[inline]
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::Apartment)
    }

    /// Form label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "ФИО",
            Self::Phone => "Телефон",
            Self::Email => "Email",
            Self::City => "Город",
            Self::Street => "Улица",
            Self::House => "Дом",
            Self::Apartment => "Квартира",
        }
    }

    /// All fields in form order.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}
