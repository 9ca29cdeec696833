//! Locale label table for paystub documents and delivery messages.
//!
//! One static [`Labels`] record per registered country, looked up through the
//! [`Country`] enum. Supporting a new country means adding a table row here,
//! not a conditional branch at every use site.

use crate::country::Country;

/// The full set of display strings for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    /// Document title, also used as the email subject.
    pub title: &'static str,
    /// Lead-in for the message body, followed by the employee name.
    pub body_heading: &'static str,
    pub period: &'static str,
    pub full_name: &'static str,
    pub email: &'static str,
    pub position: &'static str,
    pub gross_salary: &'static str,
    pub gross_payment: &'static str,
    pub discounts: &'static str,
    pub health_discount: &'static str,
    pub social_discount: &'static str,
    pub taxes_discount: &'static str,
    pub other_discount: &'static str,
    pub total_discounts: &'static str,
    pub net_payment: &'static str,
}

const DOMINICAN_REPUBLIC: Labels = Labels {
    title: "Comprobante de Pago",
    body_heading: "Comprobante de Pago para",
    period: "Periodo",
    full_name: "Nombre",
    email: "Email",
    position: "Posición",
    gross_salary: "Salario Bruto",
    gross_payment: "Pago Bruto",
    discounts: "Descuentos",
    health_discount: "SFS",
    social_discount: "AFP",
    taxes_discount: "ISR",
    other_discount: "Otros",
    total_discounts: "Total Descuentos",
    net_payment: "Pago Neto",
};

const UNITED_STATES: Labels = Labels {
    title: "Paystub Payment",
    body_heading: "Paystub Payment for",
    period: "Period",
    full_name: "Full Name",
    email: "Email",
    position: "Position",
    gross_salary: "Gross Salary",
    gross_payment: "Gross Payment",
    discounts: "Discounts",
    health_discount: "Health Insurance",
    social_discount: "Social Security",
    taxes_discount: "Taxes",
    other_discount: "Others",
    total_discounts: "Total Discounts",
    net_payment: "Net Payment",
};

/// Resolve the label set for a country.
pub fn labels(country: Country) -> &'static Labels {
    match country {
        Country::DominicanRepublic => &DOMINICAN_REPUBLIC,
        Country::UnitedStates => &UNITED_STATES,
    }
}
